//! VCD timescales.
//!
//! Trace ticks are raw VCD timestamps. A [`Timescale`] records what one tick
//! means in physical time so reports can label their time axis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;
/// Femtoseconds per second.
pub const FS_PER_S: u64 = 1_000_000_000_000_000;

/// A physical time unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Femtoseconds.
    Fs,
    /// Picoseconds.
    Ps,
    /// Nanoseconds.
    Ns,
    /// Microseconds.
    Us,
    /// Milliseconds.
    Ms,
    /// Seconds.
    S,
}

impl TimeUnit {
    /// Femtoseconds in one of this unit.
    pub fn fs(self) -> u64 {
        match self {
            TimeUnit::Fs => 1,
            TimeUnit::Ps => FS_PER_PS,
            TimeUnit::Ns => FS_PER_NS,
            TimeUnit::Us => FS_PER_US,
            TimeUnit::Ms => FS_PER_MS,
            TimeUnit::S => FS_PER_S,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Fs => "fs",
            TimeUnit::Ps => "ps",
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }
}

/// The physical length of one VCD tick: `magnitude` × `unit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timescale {
    /// Multiplier, normally 1, 10 or 100.
    pub magnitude: u32,
    /// Base unit.
    pub unit: TimeUnit,
}

impl Timescale {
    /// Creates a timescale.
    pub fn new(magnitude: u32, unit: TimeUnit) -> Self {
        Self { magnitude, unit }
    }

    /// Femtoseconds per tick.
    pub fn fs_per_tick(&self) -> u64 {
        u64::from(self.magnitude) * self.unit.fs()
    }
}

impl Default for Timescale {
    fn default() -> Self {
        Self::new(1, TimeUnit::Fs)
    }
}

/// Error returned when a timescale string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timescale '{0}'")]
pub struct ParseTimescaleError(pub String);

impl FromStr for Timescale {
    type Err = ParseTimescaleError;

    /// Parses strings like `1ns`, `10 ps` or `100fs`. A bare unit means magnitude 1.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseTimescaleError(s.to_string());

        let digit_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (num_str, unit_str) = s.split_at(digit_end);
        let magnitude = if num_str.is_empty() {
            1
        } else {
            num_str.parse().map_err(|_| err())?
        };

        let unit = match unit_str.trim().to_lowercase().as_str() {
            "fs" => TimeUnit::Fs,
            "ps" => TimeUnit::Ps,
            "ns" => TimeUnit::Ns,
            "us" => TimeUnit::Us,
            "ms" => TimeUnit::Ms,
            "s" => TimeUnit::S,
            _ => return Err(err()),
        };
        Ok(Self { magnitude, unit })
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_variants() {
        assert_eq!("1fs".parse::<Timescale>().unwrap(), Timescale::new(1, TimeUnit::Fs));
        assert_eq!("10ns".parse::<Timescale>().unwrap(), Timescale::new(10, TimeUnit::Ns));
        assert_eq!("100 ps".parse::<Timescale>().unwrap(), Timescale::new(100, TimeUnit::Ps));
        assert_eq!("1US".parse::<Timescale>().unwrap(), Timescale::new(1, TimeUnit::Us));
        assert_eq!("ms".parse::<Timescale>().unwrap(), Timescale::new(1, TimeUnit::Ms));
        assert_eq!("1s".parse::<Timescale>().unwrap(), Timescale::new(1, TimeUnit::S));
    }

    #[test]
    fn parse_rejects_unknown_unit() {
        assert!("10 parsecs".parse::<Timescale>().is_err());
        assert!("".parse::<Timescale>().is_err());
    }

    #[test]
    fn fs_per_tick() {
        assert_eq!(Timescale::new(10, TimeUnit::Ps).fs_per_tick(), 10 * FS_PER_PS);
        assert_eq!(Timescale::new(1, TimeUnit::Ns).fs_per_tick(), FS_PER_NS);
        assert_eq!(Timescale::new(1, TimeUnit::S).fs_per_tick(), FS_PER_MS * 1000);
    }

    #[test]
    fn display() {
        assert_eq!(Timescale::new(10, TimeUnit::Ns).to_string(), "10 ns");
        assert_eq!(Timescale::default().to_string(), "1 fs");
    }

    #[test]
    fn serde_roundtrip() {
        let t = Timescale::new(100, TimeUnit::Us);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"us\""));
        let back: Timescale = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
