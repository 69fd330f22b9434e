//! The four fixed frequency partitions shared by the analyzer, the detectors,
//! the fixture registry, and the scheduler.

use std::fmt;

/// One of the four perceptual frequency bands the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Band {
    Bass,
    LowMid,
    HighMid,
    Treble,
}

impl Band {
    pub const ALL: [Band; 4] = [Band::Bass, Band::LowMid, Band::HighMid, Band::Treble];

    /// Index into a fixed `[T; 4]` array keyed by band, in `Band::ALL` order.
    pub const fn index(self) -> usize {
        match self {
            Band::Bass => 0,
            Band::LowMid => 1,
            Band::HighMid => 2,
            Band::Treble => 3,
        }
    }

    /// Inclusive frequency range in Hz this band averages over.
    pub const fn freq_range_hz(self) -> (f32, f32) {
        match self {
            Band::Bass => (20.0, 150.0),
            Band::LowMid => (150.0, 500.0),
            Band::HighMid => (500.0, 2500.0),
            Band::Treble => (2500.0, 20000.0),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Band::Bass => "Bass",
            Band::LowMid => "Low-Mid",
            Band::HighMid => "High-Mid",
            Band::Treble => "Treble",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a band name doesn't match one of the four known bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBand(pub String);

impl fmt::Display for UnknownBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown band name: {:?}", self.0)
    }
}

impl std::error::Error for UnknownBand {}

impl std::str::FromStr for Band {
    type Err = UnknownBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Bass" | "bass" => Ok(Band::Bass),
            "Low-Mid" | "low-mid" | "LowMid" | "low_mid" => Ok(Band::LowMid),
            "High-Mid" | "high-mid" | "HighMid" | "high_mid" => Ok(Band::HighMid),
            "Treble" | "treble" => Ok(Band::Treble),
            other => Err(UnknownBand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trips_through_display_and_from_str() {
        for band in Band::ALL {
            assert_eq!(Band::from_str(band.as_str()).unwrap(), band);
        }
    }

    #[test]
    fn accepts_camel_and_snake_case() {
        assert_eq!(Band::from_str("LowMid").unwrap(), Band::LowMid);
        assert_eq!(Band::from_str("low_mid").unwrap(), Band::LowMid);
    }

    #[test]
    fn rejects_unknown_band() {
        assert!(Band::from_str("Mid-Range").is_err());
    }

    #[test]
    fn index_is_dense_and_matches_all_order() {
        for (i, band) in Band::ALL.iter().enumerate() {
            assert_eq!(band.index(), i);
        }
    }
}
