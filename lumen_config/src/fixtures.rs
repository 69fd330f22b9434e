//! Fixture Registry (C3): a read-mostly store of fixture descriptors, indexed
//! by name, by band, and by kick-responsiveness. Grounded on the source's
//! `FixtureManager._validate_and_normalize_fixtures`, which accepts either
//! snake_case or camelCase keys on read and normalizes to one canonical form.

use crate::error::{ConfigError, Result};
use lumen_core::Band;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Per-color channel offsets, added to `start_channel - 1` to yield the
/// absolute DMX index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelOffsets {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub white: u16,
}

/// A physical RGBW light at a DMX base address.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub name: String,
    pub start_channel: u16,
    pub channels: ChannelOffsets,
    pub band: Band,
    pub responds_to_kicks: bool,
    pub kick_sensitivity: Option<f32>,
}

impl Fixture {
    /// The four absolute DMX indices (0-based) this fixture writes to, in
    /// `[red, green, blue, white]` order.
    pub fn absolute_indices(&self) -> [usize; 4] {
        let base = self.start_channel as usize - 1;
        [
            base + self.channels.red as usize - 1,
            base + self.channels.green as usize - 1,
            base + self.channels.blue as usize - 1,
            base + self.channels.white as usize - 1,
        ]
    }
}

#[derive(Debug, Deserialize)]
struct RawChannels {
    #[serde(alias = "r")]
    red: u16,
    #[serde(alias = "g")]
    green: u16,
    #[serde(alias = "b")]
    blue: u16,
    #[serde(alias = "w")]
    white: u16,
}

#[derive(Debug, Deserialize)]
struct RawFixture {
    name: String,
    #[serde(alias = "startChannel")]
    start_channel: u16,
    channels: RawChannels,
    band: String,
    #[serde(alias = "respondsToKicks", default)]
    responds_to_kicks: bool,
    #[serde(alias = "kickSensitivity", default)]
    kick_sensitivity: Option<f32>,
}

impl RawFixture {
    fn into_fixture(self) -> Result<Fixture> {
        let band = Band::from_str(&self.band)
            .map_err(|source| ConfigError::UnknownBand { context: format!("fixture {:?}", self.name), source })?;
        Ok(Fixture {
            name: self.name,
            start_channel: self.start_channel,
            channels: ChannelOffsets {
                red: self.channels.red,
                green: self.channels.green,
                blue: self.channels.blue,
                white: self.channels.white,
            },
            band,
            responds_to_kicks: self.responds_to_kicks,
            kick_sensitivity: self.kick_sensitivity,
        })
    }
}

/// Read-mostly, indexed store of fixtures, built once at startup.
pub struct FixtureRegistry {
    fixtures: Vec<Fixture>,
    by_name: HashMap<String, usize>,
    by_band: HashMap<Band, Vec<usize>>,
}

impl FixtureRegistry {
    /// Build the registry from raw JSON, validating channel ranges and
    /// rejecting overlapping fixtures (§3 invariant).
    pub fn load(json: &str) -> Result<Self> {
        let raw: Vec<RawFixture> = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: "fixtures.json".into(),
            source,
        })?;

        let fixtures: Vec<Fixture> = raw.into_iter().map(RawFixture::into_fixture).collect::<Result<_>>()?;
        Self::validate(&fixtures)?;

        let mut by_name = HashMap::new();
        let mut by_band: HashMap<Band, Vec<usize>> = HashMap::new();
        for (i, fixture) in fixtures.iter().enumerate() {
            by_name.insert(fixture.name.clone(), i);
            by_band.entry(fixture.band).or_default().push(i);
        }

        Ok(Self { fixtures, by_name, by_band })
    }

    fn validate(fixtures: &[Fixture]) -> Result<()> {
        let mut owner: HashMap<usize, &str> = HashMap::new();
        for fixture in fixtures {
            for &idx in &fixture.absolute_indices() {
                if idx >= 512 {
                    return Err(ConfigError::ChannelOutOfRange { name: fixture.name.clone(), index: idx as i64 });
                }
                if let Some(&other) = owner.get(&idx) {
                    if other != fixture.name {
                        return Err(ConfigError::OverlappingFixtures {
                            a: other.to_string(),
                            b: fixture.name.clone(),
                            channel: idx,
                        });
                    }
                }
                owner.insert(idx, &fixture.name);
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Fixture> {
        self.by_name.get(name).map(|&i| &self.fixtures[i])
    }

    pub fn all(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn by_band(&self, band: Band) -> impl Iterator<Item = &Fixture> {
        self.by_band.get(&band).into_iter().flatten().map(move |&i| &self.fixtures[i])
    }

    pub fn kick_responsive(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter().filter(|f| f.responds_to_kicks)
    }

    /// Deterministic single-fixture default used when no fixtures file is
    /// provided (§4.11).
    pub fn default_catalog() -> Self {
        Self::load(
            r#"[{"name":"default","start_channel":1,"channels":{"red":1,"green":2,"blue":3,"white":4},"band":"Bass","responds_to_kicks":true}]"#,
        )
        .expect("built-in default fixture catalog must be valid")
    }
}
