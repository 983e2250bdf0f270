//! Character profiles and the TOML catalog they load from.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Base movement speeds in meters per second
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedProfile {
    /// Speed while supported by the ground
    pub on_ground: f32,
    /// Speed while airborne (boost-assisted steering)
    pub in_air: f32,
    /// Multiplier applied to both while boosting
    pub boost_multiplier: f32,
}

impl Default for SpeedProfile {
    fn default() -> Self {
        Self {
            on_ground: 6.0,
            in_air: 4.0,
            boost_multiplier: 2.0,
        }
    }
}

/// Named animation clips for the locomotion actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipNames {
    pub idle: String,
    pub walk: String,
    pub jump: String,
}

impl Default for ClipNames {
    fn default() -> Self {
        Self {
            idle: "Idle".into(),
            walk: "Walk".into(),
            jump: "Jump".into(),
        }
    }
}

/// Immutable-per-session character descriptor.
///
/// Replaced wholesale when the player switches character; every tunable the
/// locomotion, camera reconciliation, and animation systems need lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterProfile {
    /// Display name
    pub name: String,
    /// Character mass; scales speed, friction, and air resistance
    pub mass: f32,
    /// Capsule height in meters
    pub height: f32,
    /// Capsule radius in meters
    pub radius: f32,
    /// Base movement speeds
    #[serde(default)]
    pub speed: SpeedProfile,
    /// Jump apex height in meters (unboosted)
    pub jump_height: f32,
    /// Yaw change per tick while a turn key is held (radians)
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,
    /// Per-tick smoothing factor toward the target yaw (0-1)
    #[serde(default = "default_rotation_smoothing")]
    pub rotation_smoothing: f32,
    /// Animation crossfade duration in milliseconds (0 = hard switch)
    #[serde(default = "default_blend_ms")]
    pub blend_ms: f32,
    /// Delay before the jump animation may play after going airborne (ms)
    #[serde(default = "default_jump_delay_ms")]
    pub jump_delay_ms: f32,
    /// Clip names resolved against the loaded animation set
    #[serde(default)]
    pub clips: ClipNames,
}

fn default_rotation_speed() -> f32 {
    0.05
}

fn default_rotation_smoothing() -> f32 {
    0.2
}

fn default_blend_ms() -> f32 {
    400.0
}

fn default_jump_delay_ms() -> f32 {
    100.0
}

impl Default for CharacterProfile {
    fn default() -> Self {
        Self {
            name: "Scout".into(),
            mass: 1.0,
            height: 1.8,
            radius: 0.6,
            speed: SpeedProfile::default(),
            jump_height: 2.5,
            rotation_speed: default_rotation_speed(),
            rotation_smoothing: default_rotation_smoothing(),
            blend_ms: default_blend_ms(),
            jump_delay_ms: default_jump_delay_ms(),
            clips: ClipNames::default(),
        }
    }
}

/// Errors that can occur loading a character catalog.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read character catalog '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse character catalog '{0}': {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("character catalog '{0}' contains no characters")]
    Empty(PathBuf),
}

#[derive(Debug, Deserialize)]
struct ProfileCatalog {
    #[serde(rename = "character")]
    characters: Vec<CharacterProfile>,
}

/// Load all character profiles from a TOML catalog file.
///
/// The catalog is an array of `[[character]]` tables.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<CharacterProfile>, ProfileError> {
    let path = path.as_ref();
    let text =
        std::fs::read_to_string(path).map_err(|e| ProfileError::Io(path.to_path_buf(), e))?;
    let catalog: ProfileCatalog =
        toml::from_str(&text).map_err(|e| ProfileError::Parse(path.to_path_buf(), e))?;

    if catalog.characters.is_empty() {
        return Err(ProfileError::Empty(path.to_path_buf()));
    }
    Ok(catalog.characters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults() {
        let profile = CharacterProfile::default();
        assert_eq!(profile.mass, 1.0);
        assert_eq!(profile.blend_ms, 400.0);
        assert_eq!(profile.jump_delay_ms, 100.0);
    }

    #[test]
    fn test_catalog_parse() {
        let text = r#"
            [[character]]
            name = "Scout"
            mass = 1.4
            height = 1.9
            radius = 0.5
            jump_height = 3.0

            [character.speed]
            on_ground = 8.0
            in_air = 5.0
            boost_multiplier = 2.5

            [character.clips]
            idle = "ScoutIdle"
            walk = "ScoutWalk"
            jump = "ScoutJump"
        "#;
        let catalog: ProfileCatalog = toml::from_str(text).unwrap();
        let profile = &catalog.characters[0];
        assert_eq!(profile.name, "Scout");
        assert_eq!(profile.mass, 1.4);
        // Absent tunables fall back to defaults.
        assert_eq!(profile.jump_delay_ms, 100.0);
        assert_eq!(profile.rotation_smoothing, 0.2);
    }
}
