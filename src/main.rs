//! silentfand - fan-stop daemon for Dell XPS laptops.
//!
//! Startup phases: parse arguments, initialize logging (journald when
//! available, stdout otherwise), load and validate the range config,
//! validate the environment (tools present, running as root), install the
//! signal handler, then hand over to the poll loop until terminated.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info, warn};

use silentfan::actuator::SmbiosThermalCtl;
use silentfan::config::{load_config, Config};
use silentfan::controller::Controller;
use silentfan::sensors::LmSensors;
use silentfan::service::run_loop;
use silentfan::system::validate_environment;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    eprintln!("silentfand {} - XPS BIOS fan control helper", VERSION);
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    silentfand [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -c, --config PATH   Config file to load (default: single range {{\"max\": 49}})");
    eprintln!("    -v, --version       Print version");
    eprintln!("    -h, --help          Print this help");
    eprintln!();
    eprintln!("ENVIRONMENT:");
    eprintln!("    SILENTFAN_LOG       Log level (trace, debug, info, warn, error)");
}

fn print_version() {
    println!("silentfand {}", VERSION);
}

fn init_logging() -> bool {
    let log_level = std::env::var("SILENTFAN_LOG").unwrap_or_else(|_| "info".to_string());

    // Prefer journald on systemd systems, fall back to stdout
    let mut use_journald = std::path::Path::new("/run/systemd/journal/socket").exists();

    if use_journald {
        match tracing_journald::layer() {
            Ok(journald_layer) => {
                use tracing_subscriber::prelude::*;
                tracing_subscriber::registry()
                    .with(journald_layer)
                    .with(tracing_subscriber::EnvFilter::new(&log_level))
                    .init();
            }
            Err(e) => {
                eprintln!("Failed to create journald layer: {}, falling back to stdout", e);
                use_journald = false;
                tracing_subscriber::fmt()
                    .with_target(false)
                    .with_level(true)
                    .with_env_filter(&log_level)
                    .init();
            }
        }
    } else {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_level(true)
            .with_env_filter(&log_level)
            .init();
    }

    use_journald
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-v" | "--version" => {
                print_version();
                return;
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(PathBuf::from(&args[i]));
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let use_journald = init_logging();
    info!("silentfand {} starting", VERSION);
    info!("logging to {}", if use_journald { "systemd journal" } else { "stdout" });

    let config = match &config_path {
        Some(path) => match load_config(path) {
            Ok(cfg) => {
                info!("loaded config from {}", path.display());
                cfg
            }
            Err(e) => {
                error!("{}", e);
                std::process::exit(e.exit_code());
            }
        },
        None => {
            info!("no config file given, using default range (max 49°C)");
            Config::default()
        }
    };
    info!(
        ranges = config.ranges.len(),
        confirm_secs = config.confirm_secs,
        "configuration active"
    );

    if let Err(e) = validate_environment() {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }

    let running = Arc::new(AtomicBool::new(true));
    let running_signal = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("received SIGINT/SIGTERM, shutting down");
        running_signal.store(false, Ordering::SeqCst);
    }) {
        warn!("failed to set signal handler: {}. Shutdown via signals may not work cleanly.", e);
    }

    let mut controller = Controller::new(&config);
    run_loop(&LmSensors, &SmbiosThermalCtl, &mut controller, &running);

    info!("silentfand terminated");
}
