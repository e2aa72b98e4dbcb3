//! thermo-fuse: fuse thermocouple readings into a child's output
//!
//! ```text
//! thermo-fuse fuse --config rig.json -- --power --json
//! thermo-fuse fuse -a 0 -c 1 -k MY_TEMP -- --power
//! thermo-fuse get -a 0 -c 1 -t K --temp --cjc --json
//! thermo-fuse init-config -o rig.json
//! thermo-fuse list
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::warn;
use thermofuse_bridge::board::DEFAULT_BOARD_PROGRAM;
use thermofuse_bridge::{read_channel, CliBoardDriver, FuseBridge, FuseConfig};
use thermofuse_core::constants::{MAX_ADDRESS, MAX_CHANNEL};
use thermofuse_core::{BoardDriver, Interrupt, ReadingKind, TcType, ThermalReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "thermo-fuse")]
#[command(version, about = "Fuse thermocouple readings into another program's output")]
struct Cli {
    /// Board utility used for discovery and reads
    #[arg(long, global = true, default_value = DEFAULT_BOARD_PROGRAM)]
    board_program: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the child command and inject readings into its output
    Fuse {
        /// JSON config with a `sources` list
        #[arg(short = 'C', long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Single mode: board address
        #[arg(short, long, conflicts_with = "config", requires = "channel")]
        address: Option<u8>,

        /// Single mode: channel
        #[arg(short, long, conflicts_with = "config", requires = "address")]
        channel: Option<u8>,

        /// Single mode: injected key
        #[arg(short, long)]
        key: Option<String>,

        /// Single mode: thermocouple type
        #[arg(short, long, default_value = "K")]
        tc_type: TcType,

        /// Arguments for the child command (after `--`)
        #[arg(last = true, required = true)]
        args: Vec<String>,
    },

    /// Read one channel once (temperature unless another kind is asked for)
    Get {
        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=MAX_ADDRESS as i64))]
        address: u8,

        #[arg(short, long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=MAX_CHANNEL as i64))]
        channel: u8,

        #[arg(short, long, default_value = "K")]
        tc_type: TcType,

        /// Thermocouple temperature in degC
        #[arg(long)]
        temp: bool,

        /// Raw input voltage in V
        #[arg(long)]
        adc: bool,

        /// Cold-junction temperature in degC
        #[arg(long)]
        cjc: bool,

        /// Print one JSON object instead of text
        #[arg(short, long)]
        json: bool,
    },

    /// Write an example configuration file
    InitConfig {
        #[arg(short, long, default_value = "thermo_config.json")]
        output: PathBuf,
    },

    /// List connected boards as JSON
    List,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let driver = CliBoardDriver::new(cli.board_program);

    match cli.command {
        Commands::Fuse {
            config,
            address,
            channel,
            key,
            tc_type,
            args,
        } => {
            let config = match (config, address, channel) {
                (Some(path), _, _) => FuseConfig::load(&path)
                    .with_context(|| format!("Config error in {}", path.display()))?,
                (None, Some(address), Some(channel)) => {
                    FuseConfig::single(address, channel, tc_type, key.as_deref())?
                }
                _ => bail!("Must specify --config or (--address and --channel)"),
            };

            let reader = ThermalReader::new(driver, config.sources.clone());
            if let Err(e) = reader.discover() {
                warn!("Board discovery failed: {}", e);
            }

            let interrupt = Interrupt::new();
            interrupt.install().context("Failed to install signal handler")?;

            let mut bridge = FuseBridge::new(reader, interrupt);
            let command = config.child_command(&args);
            let code = bridge.run(&command, &mut std::io::stdout().lock())?;
            std::process::exit(code);
        }
        Commands::Get {
            address,
            channel,
            tc_type,
            temp,
            adc,
            cjc,
            json,
        } => {
            let kinds: Vec<ReadingKind> = [
                (temp, ReadingKind::Temperature),
                (adc, ReadingKind::RawVoltage),
                (cjc, ReadingKind::ColdJunction),
            ]
            .into_iter()
            .filter_map(|(on, kind)| on.then_some(kind))
            .collect();

            let mut driver = driver;
            let report = read_channel(&mut driver, address, channel, tc_type, &kinds)?;
            let mut stdout = std::io::stdout().lock();
            if json {
                writeln!(stdout, "{}", report.to_json())?;
            } else {
                for line in report.text_lines() {
                    writeln!(stdout, "{}", line)?;
                }
            }
        }
        Commands::InitConfig { output } => {
            FuseConfig::write_example(&output)?;
            eprintln!("Created example config: {}", output.display());
        }
        Commands::List => {
            let boards = driver.list_boards()?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", serde_json::json!({ "boards": boards }))?;
        }
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
