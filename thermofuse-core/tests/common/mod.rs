//! Shared fixtures for thermofuse-core integration tests
//!
//! - `FakeDriver`: scripted boards with per-channel values and failures
//! - `frame`: structured rig output lines at one-second cadence

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use thermofuse_core::{
    Board, BoardDriver, BoardInfo, HardwareError, HardwareResult, ReadingKind, TcType,
};

/// Channel behaviour for a fake board
#[derive(Debug, Clone, Copy)]
pub enum Channel {
    Value(f64),
    ReadFails,
    ConfigureFails,
}

/// Driver over an in-memory set of boards
#[derive(Debug, Default)]
pub struct FakeDriver {
    channels: BTreeMap<(u8, u8), Channel>,
    present: BTreeSet<u8>,
    pub opens: usize,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a board that answers at `address`
    pub fn board(mut self, address: u8) -> Self {
        self.present.insert(address);
        self
    }

    pub fn channel(mut self, address: u8, channel: u8, behaviour: Channel) -> Self {
        self.present.insert(address);
        self.channels.insert((address, channel), behaviour);
        self
    }
}

pub struct FakeBoard {
    address: u8,
    channels: BTreeMap<u8, Channel>,
    configured: BTreeMap<u8, TcType>,
}

impl Board for FakeBoard {
    fn read(&mut self, channel: u8, kind: ReadingKind) -> HardwareResult<f64> {
        assert_eq!(kind, ReadingKind::Temperature);
        assert!(self.configured.contains_key(&channel), "read before configure");
        match self.channels.get(&channel) {
            Some(Channel::Value(v)) => Ok(*v),
            _ => Err(HardwareError::Read {
                address: self.address,
                channel,
                reason: "scripted failure".into(),
            }),
        }
    }

    fn set_channel_type(&mut self, channel: u8, tc_type: TcType) -> HardwareResult<()> {
        if let Some(Channel::ConfigureFails) = self.channels.get(&channel) {
            return Err(HardwareError::Configure {
                address: self.address,
                channel,
                reason: "scripted failure".into(),
            });
        }
        self.configured.insert(channel, tc_type);
        Ok(())
    }
}

impl BoardDriver for FakeDriver {
    type Board = FakeBoard;

    fn list_boards(&self) -> HardwareResult<Vec<BoardInfo>> {
        Ok(self
            .present
            .iter()
            .map(|&address| BoardInfo {
                address,
                id: "134".into(),
                name: "MCC 134".into(),
            })
            .collect())
    }

    fn open(&mut self, address: u8) -> HardwareResult<FakeBoard> {
        if !self.present.contains(&address) {
            return Err(HardwareError::NotFound { address });
        }
        self.opens += 1;
        let channels = self
            .channels
            .iter()
            .filter(|((a, _), _)| *a == address)
            .map(|((_, c), b)| (*c, *b))
            .collect();
        Ok(FakeBoard {
            address,
            channels,
            configured: BTreeMap::new(),
        })
    }
}

/// One structured output line `second` seconds into 2025-06-10 12:00
pub fn frame(second: u32, x_temp: f64, tmp2: f64) -> String {
    format!(
        r#"{{"TIMESTAMP":"2025-06-10T12:{:02}:{:02}.000000","POWER":{{"VIN":24.0,"TMP2":{}}},"THERMOCOUPLE":{{"X":{{"TEMP":{}}}}}}}"#,
        second / 60,
        second % 60,
        tmp2,
        x_temp
    )
}
