//! thermo-monitor: run a thermal test and stop it safely
//!
//! ```text
//! thermo-monitor run.csv --speed 50 --gimbal 45 --defer 120
//! thermo-monitor run.csv --config monitor.json --append
//! thermo-monitor run.csv --steady-window 300 --steady-threshold 0.2 --steady-interval 30 \
//!     -- thermo-fuse fuse -C rig.json -- --power -s 1
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use thermofuse_control::actuator::DEFAULT_ACTUATOR_PROGRAM;
use thermofuse_control::{ChildRows, CliActuator, Controller, MonitorConfig, StopReason};
use thermofuse_core::{Interrupt, MonotonicTime, RowLogger};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "thermo-monitor")]
#[command(version, about = "Log a thermal test run and stop it on limits or steady state")]
struct Cli {
    /// CSV file for the logged rows
    output: PathBuf,

    /// JSON monitor config; flags below override it
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Wheel rate in Hz (requires --gimbal)
    #[arg(long)]
    speed: Option<f64>,

    /// Gimbal angle in degrees (requires --speed)
    #[arg(long)]
    gimbal: Option<f64>,

    /// Temperature limit in degC
    #[arg(long)]
    threshold: Option<f64>,

    /// Maximum run time in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Seconds to wait before activating and checking for steady state
    #[arg(long)]
    defer: Option<f64>,

    #[arg(long, value_name = "SECS")]
    steady_window: Option<f64>,

    #[arg(long, value_name = "STD")]
    steady_threshold: Option<f64>,

    #[arg(long, value_name = "SECS")]
    steady_interval: Option<f64>,

    /// Append to the log instead of truncating it
    #[arg(long)]
    append: bool,

    /// Actuator utility
    #[arg(long, default_value = DEFAULT_ACTUATOR_PROGRAM)]
    actuator_program: String,

    /// Data source command (after `--`)
    #[arg(last = true)]
    command: Vec<String>,
}

impl Cli {
    fn monitor_config(&self) -> Result<MonitorConfig> {
        let mut config = match &self.config {
            Some(path) => MonitorConfig::load(path)
                .with_context(|| format!("Config error in {}", path.display()))?,
            None => MonitorConfig::default(),
        };

        if self.speed.is_some() || self.gimbal.is_some() {
            config.speed = self.speed;
            config.gimbal = self.gimbal;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(limit) = self.time_limit {
            config.time_limit_secs = limit;
        }
        if self.defer.is_some() {
            config.defer_secs = self.defer;
        }
        if self.steady_window.is_some() {
            config.steady.window_secs = self.steady_window;
        }
        if self.steady_threshold.is_some() {
            config.steady.threshold = self.steady_threshold;
        }
        if self.steady_interval.is_some() {
            config.steady.interval_secs = self.steady_interval;
        }
        if !self.command.is_empty() {
            config.command = self.command.clone();
        }
        config.append |= self.append;

        config.validate()?;
        Ok(config)
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let code = match run(&cli) {
        Ok(reason) => reason.exit_code(),
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<StopReason> {
    let config = cli.monitor_config()?;

    let interrupt = Interrupt::new();
    interrupt.install().context("Failed to install signal handler")?;

    let logger = if config.append {
        RowLogger::append(&cli.output)
    } else {
        RowLogger::create(&cli.output)
    }
    .with_context(|| format!("Cannot open {}", cli.output.display()))?;

    let actuator = CliActuator::new(cli.actuator_program.clone());
    let mut controller = Controller::new(&config, actuator, MonotonicTime::new(), logger)?
        .with_interrupt(interrupt.clone());

    // Dropping the controller on a spawn failure idles the actuator.
    let rows = ChildRows::spawn(&config.command, &interrupt)?;
    Ok(controller.run(rows)?)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
