//! tpfand - ThinkPad fan control daemon
//!
//! Keeps the fan on auto unless we smell burning: polls coretemp sensors
//! on a fixed interval, fits a short-horizon temperature trend and drives
//! `/proc/acpi/ibm/fan` between auto, high and full speed through a small
//! state machine (see tp-core).
//!
//! # Lifecycle
//!
//! Single-threaded and strictly serialized: one event (START, TIMER or
//! STOP) is processed at a time, and the select await between ticks is
//! the only suspension point. A termination signal ends the loop, emits
//! one final STOP (fan back to auto) and exits cleanly. SIGHUP only logs
//! a reload notice.
//!
//! # Service integration
//!
//! Notifies `READY=1` once monitoring is initialized and `WATCHDOG=1`
//! once per loop iteration, when running under systemd.

mod notify;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use tp_core::constants::{limits, paths, timing};
use tp_core::{AcpiFan, Event, Monitor};

const VERSION: &str = env!("CARGO_PKG_VERSION");

struct Options {
    fan: PathBuf,
    hwmon: Option<PathBuf>,
    sensor_ids: Vec<String>,
}

fn print_help() {
    eprintln!("tpfand {VERSION} - ThinkPad fan control daemon");
    eprintln!();
    eprintln!("Keep the fan on auto unless we smell burning.");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    tpfand [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!(
        "    -t, --temp ID       Coretemp sensor identifier (repeatable, up to {})",
        limits::MAX_SENSORS
    );
    eprintln!("    -m, --hwmon PATH    Coretemp sensors path (default: auto-discovered)");
    eprintln!("    -f, --fan PATH      Fan control path");
    eprintln!("    -V, --version       Print version");
    eprintln!("    -h, --help          Print this help");
    eprintln!();
    eprintln!("ENVIRONMENT:");
    eprintln!("    TPFAND_LOG          Log level (trace, debug, info, warn, error)");
    eprintln!();
    eprintln!("DEFAULTS:");
    eprintln!("    Fan:    {}", paths::FAN_CONTROL);
    eprintln!("    Hwmon:  {}", paths::HWMON_BASE);
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        fan: PathBuf::from(paths::FAN_CONTROL),
        hwmon: None,
        sensor_ids: Vec::new(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("tpfand {VERSION}");
                std::process::exit(0);
            }
            "-t" | "--temp" => {
                i += 1;
                let Some(id) = args.get(i) else {
                    eprintln!("error: --temp requires a sensor identifier");
                    std::process::exit(1);
                };
                // Identifiers past the cap are silently ignored.
                if options.sensor_ids.len() < limits::MAX_SENSORS {
                    options.sensor_ids.push(id.clone());
                }
            }
            "-m" | "--hwmon" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    eprintln!("error: --hwmon requires a path");
                    std::process::exit(1);
                };
                options.hwmon = Some(PathBuf::from(path));
            }
            "-f" | "--fan" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    eprintln!("error: --fan requires a path");
                    std::process::exit(1);
                };
                options.fan = PathBuf::from(path);
            }
            arg => {
                eprintln!("unknown argument: {arg}");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    if options.sensor_ids.is_empty() {
        options.sensor_ids.push(paths::DEFAULT_SENSOR_ID.to_string());
    }

    options
}

fn init_logging() {
    let filter = std::env::var("TPFAND_LOG").unwrap_or_else(|_| "info".to_string());

    // Prefer the journal when systemd is running, stderr otherwise.
    if Path::new("/run/systemd/journal/socket").exists() {
        match tracing_journald::layer() {
            Ok(layer) => {
                use tracing_subscriber::prelude::*;
                tracing_subscriber::registry()
                    .with(layer)
                    .with(tracing_subscriber::EnvFilter::new(&filter))
                    .init();
                return;
            }
            Err(err) => {
                eprintln!("failed to create journald layer: {err}, falling back to stderr");
            }
        }
    }

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(&filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check_privileges() {
    // SAFETY: geteuid has no preconditions and only returns the id.
    let euid = unsafe { libc::geteuid() };
    if euid != 0 {
        warn!("running without root (euid={euid}); fan control writes may be rejected");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args);

    init_logging();
    info!("startup ** tpfand {VERSION}");
    check_privileges();

    let sensor_base = match options.hwmon {
        Some(path) => path,
        None => match tp_core::find_coretemp(Path::new(paths::HWMON_BASE)) {
            Ok(path) => path,
            Err(err) => {
                error!("shutdown ** {err}");
                std::process::exit(1);
            }
        },
    };

    let mut monitor = match Monitor::init(&options.fan, &sensor_base, &options.sensor_ids) {
        Ok(monitor) => monitor,
        Err(err) => {
            error!("shutdown ** unable to initialize monitor: {err}");
            std::process::exit(1);
        }
    };

    notify::ready();
    monitor.handle_event(Event::Start);

    run_loop(&mut monitor).await?;

    monitor.handle_event(Event::Stop);
    info!("shutdown **");
    Ok(())
}

/// Timer-driven event loop. Returns when a termination signal arrives.
async fn run_loop(monitor: &mut Monitor<AcpiFan>) -> Result<()> {
    let period = timing::POLL_INTERVAL;
    // First fire one full period after start, like a repeating interval
    // timer armed at startup.
    let mut timer = time::interval_at(time::Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigquit = signal(SignalKind::quit())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    loop {
        notify::watchdog();
        tokio::select! {
            _ = timer.tick() => monitor.handle_event(Event::Timer),
            _ = sighup.recv() => info!("reloading **"),
            _ = sigint.recv() => break,
            _ = sigquit.recv() => break,
            _ = sigterm.recv() => break,
        }
    }

    Ok(())
}
