//! lumen - a minimal display wake scheduler.
//!
//! Usage:
//!   lumen run --on-in 10 --off-in 70   Schedule an awake window and wait
//!   lumen hold --duration 30           Hold the display awake right now

use clap::{Parser, Subcommand};
use lumen::{
    Event, EventBus, EventHandler, LoggingWakeLock, ScreenService, ServiceConfig,
    load_service_config, now_ms,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// lumen - a minimal display wake scheduler
#[derive(Parser)]
#[command(name = "lumen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule an awake window and run until it closes or Ctrl+C
    Run {
        /// Seconds from now to turn the display on
        #[arg(long, default_value = "5")]
        on_in: u64,

        /// Seconds from now to let the display sleep again
        #[arg(long, default_value = "65")]
        off_in: u64,

        /// Path to a YAML service configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Hold the display awake for a fixed duration, bypassing scheduling
    Hold {
        /// Seconds to hold the display awake
        #[arg(long, default_value = "30")]
        duration: u64,

        /// Path to a YAML service configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Simple logging event handler that prints lifecycle events.
struct LoggingHandler;

#[async_trait::async_trait]
impl EventHandler for LoggingHandler {
    async fn handle(&self, event: &Event) {
        match event {
            Event::TriggerRegistered {
                slot,
                kind,
                fire_at_ms,
                ..
            } => {
                info!("Trigger '{}' registered in slot {} for {}", kind, slot, fire_at_ms);
            }
            Event::TriggerFired { kind, .. } => {
                info!("Trigger '{}' fired", kind);
            }
            Event::LockAcquired { tag, .. } => {
                info!("Wake lock '{}' acquired, display stays awake", tag);
            }
            Event::LockReleased { tag, .. } => {
                info!("Wake lock '{}' released, display may sleep", tag);
            }
            Event::SafetyTimeoutExpired { tag, .. } => {
                warn!("Safety timeout expired on '{}', lock was force-released", tag);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            on_in,
            off_in,
            config,
        } => {
            run_window(on_in, off_in, config).await?;
        }
        Commands::Hold { duration, config } => {
            hold(duration, config).await?;
        }
    }

    Ok(())
}

/// Load the config file if one was given, defaults otherwise.
fn load_config(path: Option<PathBuf>) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            info!("Loading config from: {}", path.display());
            Ok(load_service_config(&path)?)
        }
        None => Ok(ServiceConfig::default()),
    }
}

/// Build a service over the logging wake lock with event logging wired up.
async fn build_service(config: ServiceConfig) -> Result<ScreenService, Box<dyn std::error::Error>> {
    let events = EventBus::new();
    events.register(Arc::new(LoggingHandler)).await;

    let service =
        ScreenService::with_event_bus(config, Arc::new(LoggingWakeLock), Arc::new(events))?;
    Ok(service)
}

/// Schedule an awake window and run until it closes.
async fn run_window(
    on_in: u64,
    off_in: u64,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let service = build_service(config).await?;

    let now = now_ms();
    let on_time_ms = now + (on_in as i64) * 1_000;
    let off_time_ms = now + (off_in as i64) * 1_000;

    info!(
        "Scheduling display on in {}s, off in {}s (press Ctrl+C to stop early)",
        on_in, off_in
    );
    service.schedule_screen_on_off(on_time_ms, off_time_ms).await?;

    // Run a little past the window so the off trigger is observable.
    let window_end = Duration::from_secs(off_in + 2);
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down...");
        }
        _ = tokio::time::sleep(window_end) => {
            info!("Window closed");
        }
    }

    service.shutdown().await;
    Ok(())
}

/// Hold the display awake for a fixed duration.
async fn hold(duration: u64, config: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let service = build_service(config).await?;

    info!("Holding display awake for {}s (press Ctrl+C to stop early)", duration);
    service.keep_screen_on().await?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, releasing...");
        }
        _ = tokio::time::sleep(Duration::from_secs(duration)) => {}
    }

    service.release_screen_on().await?;
    service.shutdown().await;
    Ok(())
}
