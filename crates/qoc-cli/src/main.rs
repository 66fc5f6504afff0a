//! QOC CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use qoc::QocError;
use qoc_cli::{Args, error_adapter::ErrorAdapter};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logger(&args.log_level);

    info!(command:? = args.command; "Starting QOC");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = qoc_cli::run(&args) {
        error!("{}", render_report(&err));
        process::exit(1);
    }

    info!("Completed successfully");
}

/// Sets up `env_logger`, falling back to `warn` on an unknown level name.
fn init_logger(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
}

fn render_report(err: &QocError) -> String {
    let reporter = miette::GraphicalReportHandler::new();
    let mut report = String::new();
    // Plain message if the graphical report cannot be written
    if reporter
        .render_report(&mut report, &ErrorAdapter(err))
        .is_err()
    {
        return err.to_string();
    }
    report
}
