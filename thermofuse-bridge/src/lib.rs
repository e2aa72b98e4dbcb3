//! Stream interceptor for thermofuse
//!
//! Runs a data-producing child process and fuses live thermocouple
//! readings into every line it prints.
//!
//! ## Output formats
//!
//! ### Structured
//! One JSON object per line. Readings are merged at the top level:
//!
//! ```text
//! {"TIMESTAMP":"...","POWER":{...}}  ->  {"TIMESTAMP":"...","POWER":{...},"MOTOR_TEMP":31.5}
//! ```
//!
//! ### Text
//! `KEY: VALUE UNIT` lines in repeating cycles. Each cycle is re-emitted
//! with the readings appended and all values on shared columns.
//!
//! The first line that is not a JSON object switches the stream to text
//! for good.
//!
//! ## Example
//!
//! ```no_run
//! use thermofuse_bridge::{CliBoardDriver, FuseBridge, FuseConfig};
//! use thermofuse_core::{Interrupt, ThermalReader};
//!
//! let config = FuseConfig::example();
//! let reader = ThermalReader::new(CliBoardDriver::default(), config.sources.clone());
//! let mut bridge = FuseBridge::new(reader, Interrupt::new());
//! let command = config.child_command(&["--power".into(), "--json".into()]);
//! let code = bridge.run(&command, &mut std::io::stdout())?;
//! std::process::exit(code);
//! # Ok::<(), thermofuse_bridge::BridgeError>(())
//! ```

pub mod board;
pub mod bridge;
pub mod channel;
pub mod config;
pub mod errors;
pub mod inject;
pub mod interceptor;
pub mod text;

pub use board::{CliBoard, CliBoardDriver};
pub use bridge::{FuseBridge, PumpOutcome};
pub use channel::{read_channel, ChannelReport};
pub use config::FuseConfig;
pub use errors::{BridgeError, BridgeResult};
pub use interceptor::{StreamInterceptor, StreamMode};
