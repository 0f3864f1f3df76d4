// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/watchpost

//! Watchpost - Personal Safety Monitor
//!
//! Headless runner: position updates come from a scripted track, the SOS
//! button and the emergency modal's cancel button are stdin commands, and
//! every UI notification is rendered as a log line.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use watchpost::{
    feeds::{DisabledHazardFeed, NominatimGeocoder, NwsHazardFeed},
    security::generate_csc,
    sensors::{GeolocationError, PositionSource, TrackSimulator},
    Config, ConsolePresenter, ContactResolver, EventBus, HazardFeed, Monitor, PositionManager,
    Presenter, Scheduler, NAME, VERSION,
};

/// Watchpost - Personal Safety Monitor
#[derive(Parser, Debug)]
#[command(name = "watchpost")]
#[command(author = "bad-antics")]
#[command(version = VERSION)]
#[command(about = "Fuses movement anomalies, weather hazards and manual SOS into one security level")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,

    /// Replay the built-in demo drive
    #[arg(long)]
    demo: bool,

    /// Replay a recorded track (JSON array of track points)
    #[arg(long, value_name = "FILE")]
    track: Option<PathBuf>,

    /// Do not query the weather hazard feed
    #[arg(long)]
    no_hazards: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;

    // Initialize logging
    let log_level = if args.trace {
        "trace".to_string()
    } else if args.debug {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🛡️  {} v{} - Personal Safety Monitor", NAME, VERSION);

    // Override with command line args
    if args.demo {
        config.demo_mode = true;
    }
    if args.no_hazards {
        config.hazards.enabled = false;
    }

    info!("Configuration loaded from {:?}", config_path);
    info!("Demo mode: {}", config.demo_mode);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_headless(config, args.track))
}

fn position_source(config: &Config, track: Option<PathBuf>) -> Result<Option<Box<dyn PositionSource>>> {
    let interval = Duration::from_millis(config.geolocation.demo_interval_ms);

    if let Some(path) = track {
        return Ok(Some(Box::new(TrackSimulator::from_json_file(&path, interval)?)));
    }
    if config.demo_mode {
        return Ok(Some(Box::new(TrackSimulator::demo(interval))));
    }
    Ok(None)
}

/// Run the monitor until Ctrl+C or `quit`
async fn run_headless(config: Config, track: Option<PathBuf>) -> Result<()> {
    let config = Arc::new(config);
    let presenter = Arc::new(ConsolePresenter::new());

    let csc = generate_csc();
    presenter.show_security_code(&csc);

    let (hazards, weather): (Arc<dyn HazardFeed>, Option<Arc<NwsHazardFeed>>) =
        if config.hazards.enabled {
            let feed = Arc::new(NwsHazardFeed::new(config.hazards.clone())?);
            (feed.clone(), Some(feed))
        } else {
            info!("Hazard alerts disabled");
            (Arc::new(DisabledHazardFeed), None)
        };
    let geocoder = Arc::new(NominatimGeocoder::new(&config.contacts)?);
    let contacts = Arc::new(ContactResolver::new(geocoder, &config.contacts));

    let mut monitor = Monitor::new(config.clone(), hazards, contacts.clone(), presenter.clone());
    let bus = monitor.bus();

    let manager = match position_source(&config, track)? {
        Some(source) => {
            let (requests_tx, requests_rx) = mpsc::unbounded_channel();
            monitor = monitor.with_fix_requests(requests_tx);
            Some(
                PositionManager::new(source, bus.clone())
                    .with_timeouts(config.geolocation.fix_timeout(), config.geolocation.forced_timeout())
                    .with_fix_requests(requests_rx),
            )
        }
        None => None,
    };

    let (shutdown_tx, _) = broadcast::channel::<()>(4);

    // Periodic cache sweeps
    let scheduler = Scheduler::new();
    let sweep_period = Duration::from_secs(config.cache_sweep_interval_secs.max(1));
    {
        let contacts = contacts.clone();
        scheduler.every("contact-cache-sweep", sweep_period, move || {
            contacts.cache().sweep();
        });
    }
    if let Some(feed) = weather {
        scheduler.every("zone-cache-sweep", sweep_period, move || {
            feed.zone_cache().sweep();
        });
    }

    let monitor_task = tokio::spawn(monitor.run(shutdown_tx.subscribe()));

    let source_task = match manager {
        Some(manager) => Some(tokio::spawn(manager.run(shutdown_tx.subscribe()))),
        None => {
            warn!("No position source configured; use --demo or --track");
            bus.publish_position_error(GeolocationError::Unsupported);
            None
        }
    };

    let commands = tokio::spawn(read_commands(bus, shutdown_tx.clone()));

    info!("🚀 {} running", NAME);
    info!("   Commands: sos, dismiss, quit. Press Ctrl+C to shutdown");

    let mut quit = shutdown_tx.subscribe();
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received, cleaning up...");
        }
        _ = quit.recv() => {
            info!("Quit requested, cleaning up...");
        }
    }

    let _ = shutdown_tx.send(());
    scheduler.cancel_all();

    match monitor_task.await? {
        Ok(stats) => info!("Monitor stats: {:?}", stats),
        Err(err) => error!("Monitor failed: {:#}", err),
    }
    if let Some(task) = source_task {
        match task.await? {
            Ok(health) => info!("Position source: {:?}", health),
            Err(err) => error!("Position source failed: {:#}", err),
        }
    }
    commands.abort();

    info!("{} shutdown complete", NAME);
    Ok(())
}

/// Map stdin lines onto monitor events
async fn read_commands(bus: EventBus, shutdown_tx: broadcast::Sender<()>) {
    let mut shutdown = shutdown_tx.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        warn!("stdin closed: {}", err);
                        break;
                    }
                };
                match line.trim() {
                    "" => {}
                    "sos" => {
                        bus.toggle_sos();
                    }
                    "dismiss" | "cancel" => {
                        bus.dismiss();
                    }
                    "quit" | "exit" => {
                        let _ = shutdown_tx.send(());
                        break;
                    }
                    other => warn!("Unknown command '{}'", other),
                }
            }
            _ = shutdown.recv() => break,
        }
    }
}
