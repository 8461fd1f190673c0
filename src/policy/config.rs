//! Tunable parameters of the race policy and the named presets built from them
use crate::orders::Power;
use crate::wire_representation::BRAKING_DAMPING;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

/// What a car does once the race is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// race to the own next checkpoint
    Racer,
    /// get in the way of an opponent
    Interceptor,
}

/// Which opponent an interceptor goes after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterceptTarget {
    #[allow(missing_docs)]
    MostAdvanced,
    #[allow(missing_docs)]
    Lightest,
    #[allow(missing_docs)]
    Heaviest,
}

/// How movement orders are expressed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Steering {
    /// `ForceTowards` with the aim point
    ForceTowards,
    /// `ApplyForce` with the angle from the car to the aim point
    ApplyForce,
}

/// Parameters of [`RacePolicy`](super::RacePolicy). Distances are compared
/// against truncated distances, speeds against the velocity magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// mass requested for the first car of the team before the start
    pub car1_mass: i32,
    /// mass requested for the second car of the team before the start
    pub car2_mass: i32,
    #[allow(missing_docs)]
    pub car1_role: Role,
    #[allow(missing_docs)]
    pub car2_role: Role,
    #[allow(missing_docs)]
    pub steering: Steering,

    // Racer
    /// pass history entries required before boosting; the start entry counts
    pub boost_min_passed_checkpoints: usize,
    /// no boost when the next checkpoint is closer than this
    pub boost_min_distance: i64,
    /// start braking below this distance to the target...
    pub braking_distance: i64,
    /// ...when going faster than this
    pub braking_speed: f64,
    #[allow(missing_docs)]
    pub braking_power: Power,
    /// ticks of coasting compensated by the braking point
    pub braking_damping: f64,
    #[allow(missing_docs)]
    pub cruise_power: Power,

    // Interceptor
    #[allow(missing_docs)]
    pub intercept_target: InterceptTarget,
    /// ram the opponent when closer than this
    pub ram_distance: i64,
    /// ram through the braking point when closer than this
    pub ram_braking_distance: i64,
    /// when out of reach, head for the checkpoint closest to the opponent
    /// (its next one excluded) rather than its next checkpoint
    pub pursue_lookahead: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig {
            car1_mass: 5,
            car2_mass: 15,
            car1_role: Role::Racer,
            car2_role: Role::Interceptor,
            steering: Steering::ForceTowards,
            boost_min_passed_checkpoints: 1,
            boost_min_distance: 100,
            braking_distance: 50,
            braking_speed: 100.0,
            braking_power: Power::FULL,
            braking_damping: BRAKING_DAMPING,
            cruise_power: Power::FULL,
            intercept_target: InterceptTarget::MostAdvanced,
            ram_distance: 300,
            ram_braking_distance: 50,
            pursue_lookahead: false,
        }
    }
}

/// names accepted by [`PolicyConfig::preset`]
pub const PRESET_NAMES: [&str; 5] = [
    "canonical",
    "sprinter",
    "brawler",
    "lightweight-hunter",
    "lookahead",
];

impl PolicyConfig {
    /// Look a preset up by name. `canonical` is the default configuration,
    /// the others are tuned variants of it.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let canonical = PolicyConfig::default();
        let config = match name {
            "canonical" => canonical,
            // two racers, late and gentle braking
            "sprinter" => PolicyConfig {
                car2_role: Role::Racer,
                car1_mass: 10,
                car2_mass: 10,
                braking_distance: 30,
                braking_speed: 30.0,
                ..canonical
            },
            // heavy interceptor ramming from far away, never easing off
            "brawler" => PolicyConfig {
                car1_mass: 3,
                car2_mass: 17,
                intercept_target: InterceptTarget::Heaviest,
                ram_distance: 500,
                ram_braking_distance: 0,
                ..canonical
            },
            "lightweight-hunter" => PolicyConfig {
                intercept_target: InterceptTarget::Lightest,
                pursue_lookahead: true,
                ..canonical
            },
            "lookahead" => PolicyConfig {
                pursue_lookahead: true,
                boost_min_passed_checkpoints: 2,
                ..canonical
            },
            _ => return Err(ConfigError::UnknownPreset(name.to_string())),
        };
        Ok(config)
    }

    /// Apply the keys of a JSON object on top of `self`; keys absent from the
    /// object keep their current value.
    pub fn with_json_overrides(self, overrides: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(overrides)?;
        let overrides = match overrides {
            serde_json::Value::Object(map) => map,
            _ => return Err(ConfigError::NotAnObject),
        };
        let mut merged = match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => map,
            _ => return Err(ConfigError::NotAnObject),
        };
        for (key, value) in overrides {
            if !merged.contains_key(&key) {
                return Err(ConfigError::UnknownKey(key));
            }
            merged.insert(key, value);
        }
        Ok(serde_json::from_value(serde_json::Value::Object(merged))?)
    }

    /// [`with_json_overrides`](Self::with_json_overrides) reading the overrides from a file
    pub fn with_overrides_from_file(self, path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        self.with_json_overrides(&text)
    }
}

/// Errors raised while building a policy configuration
#[derive(Debug)]
pub enum ConfigError {
    #[allow(missing_docs)]
    UnknownPreset(String),
    #[allow(missing_docs)]
    UnknownKey(String),
    /// overrides must be a JSON object
    NotAnObject,
    #[allow(missing_docs)]
    Io(std::io::Error),
    #[allow(missing_docs)]
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownPreset(name) => write!(
                f,
                "unknown preset '{}', expected one of {}",
                name,
                PRESET_NAMES.join(", ")
            ),
            ConfigError::UnknownKey(key) => write!(f, "unknown configuration key '{}'", key),
            ConfigError::NotAnObject => write!(f, "configuration must be a JSON object"),
            ConfigError::Io(e) => write!(f, "cannot read configuration: {}", e),
            ConfigError::Json(e) => write!(f, "invalid configuration: {}", e),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}
