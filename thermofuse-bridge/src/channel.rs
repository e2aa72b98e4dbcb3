//! One-shot read of a single board channel
//!
//! Backs `thermo-fuse get`. The cold-junction value is read before the
//! junction type is written; temperature and voltage are read after.
//!
//! ```text
//! {"ADDRESS":0,"CHANNEL":1,"CJC":22.41,"TEMPERATURE":31.2,"ADC":0.000412}
//! ```

use log::debug;
use serde_json::{Map, Value};
use thermofuse_core::{Board, BoardDriver, HardwareResult, ReadingKind, TcType};

/// Values read from one channel, in read order
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelReport {
    pub address: u8,
    pub channel: u8,
    pub values: Vec<(ReadingKind, f64)>,
}

/// Key used for a reading kind in the JSON report
pub fn json_key(kind: ReadingKind) -> &'static str {
    match kind {
        ReadingKind::Temperature => "TEMPERATURE",
        ReadingKind::RawVoltage => "ADC",
        ReadingKind::ColdJunction => "CJC",
    }
}

/// Open `address` and read the requested kinds from `channel`
///
/// An empty `kinds` reads temperature only. Duplicates are read once.
pub fn read_channel<D: BoardDriver>(
    driver: &mut D,
    address: u8,
    channel: u8,
    tc_type: TcType,
    kinds: &[ReadingKind],
) -> HardwareResult<ChannelReport> {
    let wanted = |kind| kinds.contains(&kind) || (kinds.is_empty() && kind == ReadingKind::Temperature);
    let mut board = driver.open(address)?;
    let mut values = Vec::with_capacity(3);

    if wanted(ReadingKind::ColdJunction) {
        values.push((ReadingKind::ColdJunction, board.read(channel, ReadingKind::ColdJunction)?));
    }
    board.set_channel_type(channel, tc_type)?;
    for kind in [ReadingKind::Temperature, ReadingKind::RawVoltage] {
        if wanted(kind) {
            values.push((kind, board.read(channel, kind)?));
        }
    }

    debug!("Read {} value(s) from board {} channel {}", values.len(), address, channel);
    Ok(ChannelReport {
        address,
        channel,
        values,
    })
}

impl ChannelReport {
    /// `{"ADDRESS":..,"CHANNEL":..,<kind>:..}` with keys in read order
    ///
    /// Non-finite values become `null`.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("ADDRESS".into(), self.address.into());
        map.insert("CHANNEL".into(), self.channel.into());
        for (kind, value) in &self.values {
            map.insert(json_key(*kind).into(), Value::from(*value));
        }
        Value::Object(map)
    }

    /// Human-readable lines, one per value
    pub fn text_lines(&self) -> Vec<String> {
        let (a, c) = (self.address, self.channel);
        self.values
            .iter()
            .map(|(kind, value)| match kind {
                ReadingKind::ColdJunction => format!("CJC (Addr {}): {:.2} °C", a, value),
                ReadingKind::Temperature => format!("Temperature (Addr {} Ch {}): {:.2} °C", a, c, value),
                ReadingKind::RawVoltage => format!("ADC (Addr {} Ch {}): {:.6} V", a, c, value),
            })
            .collect()
    }
}
