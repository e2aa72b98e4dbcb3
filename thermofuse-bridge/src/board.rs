//! Board driver backed by the `thermo-cli` utility
//!
//! Each read is one invocation:
//!
//! ```text
//! thermo-cli get -a 0 -c 1 -t K --temp --json   ->  {"ADDRESS":0,"CHANNEL":1,"TEMPERATURE":31.2}
//! thermo-cli list --json                        ->  {"boards":[{"address":0,"id":"MCC 134","name":"..."}]}
//! ```
//!
//! The utility applies the junction type on every `get`, so
//! `set_channel_type` only records it for the next read.

use std::collections::BTreeMap;
use std::process::{Command, Stdio};

use serde::Deserialize;
use serde_json::Value;
use thermofuse_core::{Board, BoardDriver, BoardInfo, HardwareError, HardwareResult, ReadingKind, TcType};

/// Default board utility
pub const DEFAULT_BOARD_PROGRAM: &str = "thermo-cli";

#[derive(Deserialize)]
struct BoardList {
    boards: Vec<BoardInfo>,
}

/// Opens [`CliBoard`] handles that shell out to the board utility
#[derive(Debug, Clone)]
pub struct CliBoardDriver {
    program: String,
}

impl CliBoardDriver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for CliBoardDriver {
    fn default() -> Self {
        Self::new(DEFAULT_BOARD_PROGRAM)
    }
}

impl BoardDriver for CliBoardDriver {
    type Board = CliBoard;

    fn list_boards(&self) -> HardwareResult<Vec<BoardInfo>> {
        let stdout = run(&self.program, &["list", "--json"]).map_err(|reason| {
            HardwareError::Open {
                address: 0,
                reason,
            }
        })?;
        let list: BoardList = serde_json::from_str(&stdout).map_err(|e| HardwareError::Open {
            address: 0,
            reason: format!("unexpected list output: {}", e),
        })?;
        Ok(list.boards)
    }

    fn open(&mut self, address: u8) -> HardwareResult<CliBoard> {
        Ok(CliBoard {
            program: self.program.clone(),
            address,
            tc_types: BTreeMap::new(),
        })
    }
}

/// One board address, read through the utility
#[derive(Debug)]
pub struct CliBoard {
    program: String,
    address: u8,
    tc_types: BTreeMap<u8, TcType>,
}

impl CliBoard {
    fn field(kind: ReadingKind) -> &'static str {
        match kind {
            ReadingKind::Temperature => "TEMPERATURE",
            ReadingKind::RawVoltage => "ADC",
            ReadingKind::ColdJunction => "CJC",
        }
    }
}

impl Board for CliBoard {
    fn read(&mut self, channel: u8, kind: ReadingKind) -> HardwareResult<f64> {
        let tc_type = self.tc_types.get(&channel).copied().unwrap_or_default();
        let address = self.address.to_string();
        let channel_arg = channel.to_string();
        let flag = format!("--{}", kind.as_str());
        let args = [
            "get",
            "-a",
            address.as_str(),
            "-c",
            channel_arg.as_str(),
            "-t",
            tc_type.as_str(),
            flag.as_str(),
            "--json",
        ];

        let read_error = |reason: String| HardwareError::Read {
            address: self.address,
            channel,
            reason,
        };
        let stdout = run(&self.program, &args).map_err(read_error)?;
        let value: Value = serde_json::from_str(&stdout).map_err(|e| read_error(e.to_string()))?;
        value
            .get(Self::field(kind))
            .and_then(Value::as_f64)
            .ok_or_else(|| read_error(format!("no {} in output", Self::field(kind))))
    }

    fn set_channel_type(&mut self, channel: u8, tc_type: TcType) -> HardwareResult<()> {
        self.tc_types.insert(channel, tc_type);
        Ok(())
    }
}

fn run(program: &str, args: &[&str]) -> Result<String, String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| format!("{}: {}", program, e))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} exited with {}: {}", program, output.status, stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
