//! Scene Catalog, half of C4. Replaces the source's duck-typed "scenes"
//! dictionary with a tagged variant, per SPEC_FULL.md §9.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// RGBW channel values for a single scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Channels {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub white: u8,
}

impl Channels {
    pub const BLACK: Channels = Channels { red: 0, green: 0, blue: 0, white: 0 };

    pub fn as_array(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.white]
    }
}

/// A named target state for a fixture's channels.
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    Flash { channels: Channels, decay: Duration },
    Static { channels: Channels },
    Fade { channels: Channels, duration: Duration },
}

impl Scene {
    pub fn channels(&self) -> Channels {
        match self {
            Scene::Flash { channels, .. } | Scene::Static { channels } | Scene::Fade { channels, .. } => *channels,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawChannels {
    #[serde(alias = "red")]
    r: u8,
    #[serde(alias = "green")]
    g: u8,
    #[serde(alias = "blue")]
    b: u8,
    #[serde(alias = "white")]
    w: u8,
}

#[derive(Debug, Deserialize)]
struct RawScene {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    channels: RawChannels,
    decay: Option<f32>,
    duration: Option<f32>,
}

impl RawScene {
    fn into_named_scene(self) -> Result<(String, Scene)> {
        let channels = Channels { red: self.channels.r, green: self.channels.g, blue: self.channels.b, white: self.channels.w };
        let scene = match self.kind.as_str() {
            "flash" => {
                let decay = self
                    .decay
                    .ok_or_else(|| ConfigError::FlashSceneMissingDecay { name: self.name.clone() })?;
                Scene::Flash { channels, decay: Duration::from_secs_f32(decay) }
            }
            "fade" => Scene::Fade { channels, duration: Duration::from_secs_f32(self.duration.unwrap_or(1.0)) },
            _ => Scene::Static { channels },
        };
        Ok((self.name, scene))
    }
}

/// Scenes indexed by name.
pub struct SceneCatalog {
    scenes: HashMap<String, Scene>,
}

impl SceneCatalog {
    pub fn load(json: &str) -> Result<Self> {
        let raw: Vec<RawScene> =
            serde_json::from_str(json).map_err(|source| ConfigError::Parse { path: "scenes.json".into(), source })?;
        let scenes = raw.into_iter().map(RawScene::into_named_scene).collect::<Result<HashMap<_, _>>>()?;
        Ok(Self { scenes })
    }

    pub fn get(&self, name: &str) -> Option<&Scene> {
        self.scenes.get(name)
    }

    pub fn default_catalog() -> Self {
        Self::load(
            r#"[
                {"name":"white_flash","type":"flash","channels":{"r":255,"g":255,"b":255,"w":255},"decay":0.2},
                {"name":"black","type":"static","channels":{"r":0,"g":0,"b":0,"w":0}},
                {"name":"fade_out","type":"fade","channels":{"r":0,"g":0,"b":0,"w":0},"duration":5.0}
            ]"#,
        )
        .expect("built-in default scene catalog must be valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_three_scene_kinds() {
        let catalog = SceneCatalog::default_catalog();
        assert!(matches!(catalog.get("white_flash"), Some(Scene::Flash { .. })));
        assert!(matches!(catalog.get("black"), Some(Scene::Static { .. })));
        assert!(matches!(catalog.get("fade_out"), Some(Scene::Fade { .. })));
    }

    #[test]
    fn flash_scene_without_decay_is_a_config_error() {
        let bad = r#"[{"name":"bad","type":"flash","channels":{"r":1,"g":1,"b":1,"w":1}}]"#;
        assert!(matches!(SceneCatalog::load(bad), Err(ConfigError::FlashSceneMissingDecay { .. })));
    }
}
