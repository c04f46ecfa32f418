//! `catpoint-cli` – Catpoint interactive shell.
//!
//! Wires the alarm decision engine to an in-memory repository, a simulated
//! cat detector and a console listener, then hands control to a REPL:
//!
//! 1. Loads `~/.catpoint/config.toml`, writing the defaults when absent.
//! 2. Seeds the configured sensors.
//! 3. Runs the interactive REPL until `/quit` or end of input.

mod config;
mod display;
mod repl;

use std::sync::Arc;

use colored::Colorize;
use tracing::warn;

use catpoint_security::{InMemorySecurityRepository, SecurityService};

fn main() {
    // RUST_LOG filters (default "info"); CATPOINT_LOG_FORMAT=json emits
    // newline-delimited JSON. User-facing output stays on println!.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("CATPOINT_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            if let Err(e) = config::save(&cfg) {
                warn!(error = %e, "could not write default config");
            } else {
                println!(
                    "  Default config written to {}",
                    config::config_path().display().to_string().bold()
                );
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };

    let repository = cfg
        .sensors
        .iter()
        .fold(InMemorySecurityRepository::new(), |repo, s| {
            repo.with_sensor(s.to_sensor())
        });
    let mut service = SecurityService::new(repository, cfg.detector.build());
    service.add_status_listener(Arc::new(display::ConsoleListener));

    println!(
        "  Detector: {}   Sensors: {}",
        cfg.detector.to_string().yellow(),
        cfg.sensors.len().to_string().yellow()
    );
    println!();
    println!("  Type {} for a list of commands.\n", "/help".bold().cyan());

    repl::run(&mut service);
}

fn print_banner() {
    println!();
    println!("{}", r#"   /\_/\   "#.bold().cyan());
    println!("{}", r#"  ( o.o )  "#.bold().cyan());
    println!("{}", r#"   > ^ <   "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "Catpoint".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Home Security Controller");
    println!();
}
