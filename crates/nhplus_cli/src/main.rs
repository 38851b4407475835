//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `nhplus_core` linkage and open the care-records store.
//! - Print row counts so a local database can be sanity-checked quickly.
//!
//! Usage: `nhplus_cli [DB_PATH]` (defaults to `db/nursingHome.db`).
//! Set `NHPLUS_LOG_DIR` (and optionally `NHPLUS_LOG_LEVEL`) to write log files.

use nhplus_core::{
    default_log_level, init_logging, ConnectionManager, LogLevel, Repository, RepositoryFactory,
    StoreConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("nhplus_core version={}", nhplus_core::core_version());

    if let Err(err) = start_logging() {
        eprintln!("logging disabled: {err}");
    }

    let config = match std::env::args().nth(1) {
        Some(path) => StoreConfig::file(path),
        None => StoreConfig::default(),
    };

    // A store that cannot be opened is fatal; nothing below works without it.
    let manager = match ConnectionManager::start(config) {
        Ok(manager) => manager,
        Err(err) => {
            eprintln!("failed to open care-records store: {err}");
            return ExitCode::FAILURE;
        }
    };

    let status = print_counts(&manager);
    if let Err(err) = manager.release() {
        eprintln!("failed to close care-records store: {err}");
        return ExitCode::FAILURE;
    }

    match status {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn print_counts(manager: &ConnectionManager) -> Result<(), Box<dyn std::error::Error>> {
    let conn = manager.acquire()?;
    let repos = RepositoryFactory::new(&conn);

    let patients = repos.patients().read_all()?;
    let caregivers = repos.caregivers().read_all()?;
    let active = caregivers.iter().filter(|item| item.is_active()).count();
    let treatments = repos.treatments().read_all()?;

    println!("patients={}", patients.len());
    println!("caregivers={} active={active}", caregivers.len());
    println!("treatments={}", treatments.len());
    Ok(())
}

fn start_logging() -> Result<(), Box<dyn std::error::Error>> {
    let Some(dir) = std::env::var_os("NHPLUS_LOG_DIR") else {
        return Ok(());
    };
    let level = match std::env::var("NHPLUS_LOG_LEVEL") {
        Ok(value) => value.parse::<LogLevel>()?,
        Err(_) => default_log_level(),
    };
    let dir = PathBuf::from(dir);
    let dir = if dir.is_absolute() {
        dir
    } else {
        std::env::current_dir()?.join(dir)
    };
    init_logging(level, &dir)?;
    Ok(())
}
