//! Thermal Source Reader
//!
//! Samples every configured thermocouple on demand and returns one value
//! per source key. Failures stay local: a board that cannot be opened, a
//! channel that refuses its junction type, a read error or a fault
//! sentinel turns that one key into NaN while every other source is still
//! read.
//!
//! ## Board handles
//!
//! Handles are opened lazily, the first time a source on that address is
//! read, and then kept in a registry owned by the reader for the rest of
//! the run. A failed open is not cached, so the next fetch tries again.
//!
//! ```text
//! fetch()
//!   for each source (sequentially)
//!     handle = registry[address] or driver.open(address)
//!     handle.set_channel_type(channel, tc_type)
//!     handle.read(channel, Temperature)      -> value | NaN
//! ```

use std::collections::BTreeMap;

use log::{debug, info, warn};

use crate::config::SourceConfig;
use crate::constants::hardware::fault_name;
use crate::errors::{HardwareError, HardwareResult};
use crate::reading::Readings;
use crate::traits::{Board, BoardDriver, BoardInfo, ReadingKind, ThermalSource};

/// Reads the configured thermocouple sources through one board driver
pub struct ThermalReader<D: BoardDriver> {
    driver: D,
    sources: Vec<SourceConfig>,
    boards: BTreeMap<u8, D::Board>,
}

impl<D: BoardDriver> ThermalReader<D> {
    /// Create a reader; no board is opened until the first fetch
    pub fn new(driver: D, sources: Vec<SourceConfig>) -> Self {
        Self {
            driver,
            sources,
            boards: BTreeMap::new(),
        }
    }

    /// Configured sources, in injection order
    pub fn sources(&self) -> &[SourceConfig] {
        &self.sources
    }

    /// Number of board handles currently open
    pub fn open_boards(&self) -> usize {
        self.boards.len()
    }

    /// List boards on the bus and warn about configured addresses that are absent
    ///
    /// Missing boards are not fatal; their sources will read NaN.
    pub fn discover(&self) -> HardwareResult<Vec<BoardInfo>> {
        let boards = self.driver.list_boards()?;
        for board in &boards {
            info!("Detected {} at address {}", board.name, board.address);
        }

        let mut missing: Vec<u8> = self
            .sources
            .iter()
            .map(|s| s.address)
            .filter(|addr| !boards.iter().any(|b| b.address == *addr))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        for address in missing {
            warn!("No board detected at configured address {}", address);
        }

        Ok(boards)
    }

    /// Sample every source once
    ///
    /// Always returns exactly one entry per configured source.
    pub fn read_all(&mut self) -> Readings {
        let mut readings = Readings::with_capacity(self.sources.len());

        for index in 0..self.sources.len() {
            let source = self.sources[index].clone();
            let value = match self.read_source(&source) {
                Ok(value) => value,
                Err(e) => {
                    warn!("{} unavailable: {}", source.key, e);
                    f64::NAN
                }
            };
            readings.insert(source.key, value);
        }

        readings
    }

    fn read_source(&mut self, source: &SourceConfig) -> HardwareResult<f64> {
        let board = self.board(source.address)?;
        board.set_channel_type(source.channel, source.tc_type)?;
        let value = board.read(source.channel, ReadingKind::Temperature)?;

        if let Some(fault) = fault_name(value) {
            return Err(HardwareError::Fault {
                address: source.address,
                channel: source.channel,
                fault,
            });
        }

        Ok(value)
    }

    fn board(&mut self, address: u8) -> HardwareResult<&mut D::Board> {
        if !self.boards.contains_key(&address) {
            let handle = self.driver.open(address)?;
            debug!("Opened board at address {}", address);
            self.boards.insert(address, handle);
        }
        self.boards
            .get_mut(&address)
            .ok_or(HardwareError::NotFound { address })
    }
}

impl<D: BoardDriver> ThermalSource for ThermalReader<D> {
    fn fetch(&mut self) -> Readings {
        self.read_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TcType;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        opens: Vec<u8>,
        configured: Vec<(u8, u8, TcType)>,
    }

    struct FakeDriver {
        log: Rc<RefCell<Log>>,
        present: Vec<u8>,
    }

    struct FakeBoard {
        address: u8,
        log: Rc<RefCell<Log>>,
    }

    impl Board for FakeBoard {
        fn read(&mut self, channel: u8, _kind: ReadingKind) -> HardwareResult<f64> {
            match (self.address, channel) {
                (0, 2) => Err(HardwareError::Read {
                    address: 0,
                    channel: 2,
                    reason: "i2c timeout".into(),
                }),
                (0, 3) => Ok(-9999.0),
                (a, c) => Ok(20.0 + a as f64 + c as f64 / 10.0),
            }
        }

        fn set_channel_type(&mut self, channel: u8, tc_type: TcType) -> HardwareResult<()> {
            self.log
                .borrow_mut()
                .configured
                .push((self.address, channel, tc_type));
            Ok(())
        }
    }

    impl BoardDriver for FakeDriver {
        type Board = FakeBoard;

        fn list_boards(&self) -> HardwareResult<Vec<BoardInfo>> {
            Ok(self
                .present
                .iter()
                .map(|a| BoardInfo {
                    address: *a,
                    id: "MCC 134".into(),
                    name: "MCC 134".into(),
                })
                .collect())
        }

        fn open(&mut self, address: u8) -> HardwareResult<FakeBoard> {
            self.log.borrow_mut().opens.push(address);
            if !self.present.contains(&address) {
                return Err(HardwareError::NotFound { address });
            }
            Ok(FakeBoard {
                address,
                log: Rc::clone(&self.log),
            })
        }
    }

    fn reader(sources: Vec<SourceConfig>) -> (ThermalReader<FakeDriver>, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let driver = FakeDriver {
            log: Rc::clone(&log),
            present: vec![0, 1],
        };
        (ThermalReader::new(driver, sources), log)
    }

    #[test]
    fn one_entry_per_source() {
        let (mut reader, _) = reader(vec![
            SourceConfig::new(0, 0, TcType::K, Some("A")),
            SourceConfig::new(0, 1, TcType::J, Some("B")),
            SourceConfig::new(1, 0, TcType::T, None),
        ]);
        let data = reader.fetch();
        assert_eq!(data.len(), 3);
        assert_eq!(data.get("A"), Some(20.0));
        assert_eq!(data.get("B"), Some(20.1));
        assert_eq!(data.get("TEMP_1_0"), Some(21.0));
    }

    #[test]
    fn failures_are_isolated_to_one_key() {
        let (mut reader, _) = reader(vec![
            SourceConfig::new(0, 0, TcType::K, Some("OK")),
            SourceConfig::new(0, 2, TcType::K, Some("BROKEN")),
            SourceConfig::new(0, 3, TcType::K, Some("OPEN")),
            SourceConfig::new(5, 0, TcType::K, Some("ABSENT")),
        ]);
        let data = reader.fetch();
        assert_eq!(data.len(), 4);
        assert_eq!(data.get("OK"), Some(20.0));
        assert!(data.get("BROKEN").unwrap().is_nan());
        assert!(data.get("OPEN").unwrap().is_nan());
        assert!(data.get("ABSENT").unwrap().is_nan());
    }

    #[test]
    fn handles_opened_once_per_address() {
        let (mut reader, log) = reader(vec![
            SourceConfig::new(0, 0, TcType::K, Some("A")),
            SourceConfig::new(0, 1, TcType::K, Some("B")),
            SourceConfig::new(1, 1, TcType::N, Some("C")),
            SourceConfig::new(6, 0, TcType::K, Some("D")),
        ]);
        reader.fetch();
        reader.fetch();

        assert_eq!(reader.open_boards(), 2);
        // the absent board is retried on every fetch
        assert_eq!(log.borrow().opens, vec![0, 1, 6, 6]);
        // junction type is written before every read
        assert_eq!(log.borrow().configured.len(), 6);
        assert!(log.borrow().configured.contains(&(1, 1, TcType::N)));
    }

    #[test]
    fn discover_lists_present_boards() {
        let (reader, _) = reader(vec![SourceConfig::new(4, 0, TcType::K, None)]);
        let boards = reader.discover().unwrap();
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[1].address, 1);
    }
}
