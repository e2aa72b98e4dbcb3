//! Core traits for the hardware seam
//!
//! The board library is an external collaborator. These traits are the
//! whole of what the rest of the workspace may ask of it: discover boards,
//! open one handle per address, write a channel's junction type, read a
//! value. Keep them narrow - anything wider leaks register details into
//! the control loop.

use serde::{Deserialize, Serialize};

use crate::config::TcType;
use crate::errors::HardwareResult;
use crate::reading::Readings;

/// What to read from a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadingKind {
    /// Linearized thermocouple temperature (°C)
    Temperature,
    /// Raw input voltage before linearization (V)
    RawVoltage,
    /// Cold-junction compensation sensor temperature (°C)
    ColdJunction,
}

impl ReadingKind {
    /// Short name used by board utilities and log lines
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingKind::Temperature => "temp",
            ReadingKind::RawVoltage => "adc",
            ReadingKind::ColdJunction => "cjc",
        }
    }
}

/// A detected board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardInfo {
    /// Jumper address
    pub address: u8,
    /// Product identifier
    pub id: String,
    /// Human-readable product name
    pub name: String,
}

/// An open handle to one board
///
/// Handles are created once per address and reused for the whole run.
pub trait Board {
    /// Read one value from a channel
    fn read(&mut self, channel: u8, kind: ReadingKind) -> HardwareResult<f64>;

    /// Write the junction type for a channel
    fn set_channel_type(&mut self, channel: u8, tc_type: TcType) -> HardwareResult<()>;
}

/// Factory for board handles
pub trait BoardDriver {
    /// Handle type produced by [`BoardDriver::open`]
    type Board: Board;

    /// List boards present on the bus
    fn list_boards(&self) -> HardwareResult<Vec<BoardInfo>>;

    /// Open the board at `address`
    fn open(&mut self, address: u8) -> HardwareResult<Self::Board>;
}

/// Anything that can produce a fresh set of thermal readings on demand
///
/// Implemented by the thermal reader; tests substitute scripted sources.
pub trait ThermalSource {
    /// Sample every configured source once
    fn fetch(&mut self) -> Readings;
}

impl<T: ThermalSource + ?Sized> ThermalSource for Box<T> {
    fn fetch(&mut self) -> Readings {
        (**self).fetch()
    }
}
