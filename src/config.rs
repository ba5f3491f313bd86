//! Tunable knobs.
//!
//! Knobs can be loaded from TOML so the dashboard can change them without a
//! rebuild. `league_mix` is clamped into [0, 1] as it is parsed; every knob
//! that the core assumes positive is clamped by [`EngineConfig::sanitized`]
//! before it reaches an engine.
//!
//! ```
//! use playcall_core::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     league_mix = 0.8
//!     prior_strength = 2.0
//!
//!     [blend]
//!     live_threshold = 12
//!
//!     [[backoff]]
//!     fields = ["possession", "down", "dist_bucket"]
//!     min_matches = 8
//! "#).unwrap();
//!
//! assert_eq!(config.blend.live_threshold, 12);
//! assert_eq!(config.backoff.len(), 1);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::condition::Field;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Weight given to the college archetype; the pro archetype gets the rest.
///
/// Always in [0, 1], including when deserialized.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct LeagueMix(f64);

impl LeagueMix {
    pub const COLLEGE: LeagueMix = LeagueMix(1.0);
    pub const PRO: LeagueMix = LeagueMix(0.0);

    /// Clamped into [0, 1]; NaN becomes an even mix.
    pub fn new(college_weight: f64) -> Self {
        if college_weight.is_nan() {
            return LeagueMix(0.5);
        }
        LeagueMix(college_weight.clamp(0.0, 1.0))
    }

    pub fn college(self) -> f64 {
        self.0
    }

    pub fn pro(self) -> f64 {
        1.0 - self.0
    }

    /// `college * a + pro * b`.
    pub fn blend(self, college: f64, pro: f64) -> f64 {
        self.college() * college + self.pro() * pro
    }
}

impl From<f64> for LeagueMix {
    fn from(college_weight: f64) -> Self {
        let mix = LeagueMix::new(college_weight);
        if mix.0 != college_weight {
            warn!(event = "knob_clamped", knob = "league_mix", value = college_weight);
        }
        mix
    }
}

impl From<LeagueMix> for f64 {
    fn from(mix: LeagueMix) -> f64 {
        mix.0
    }
}

impl Default for LeagueMix {
    fn default() -> Self {
        LeagueMix(0.5)
    }
}

/// Historical/live blending knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Live matches at which live data is trusted fully.
    pub live_threshold: u32,

    /// Additive smoothing constant.
    pub smoothing_alpha: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        BlendConfig {
            live_threshold: 20,
            smoothing_alpha: 0.5,
        }
    }
}

/// One backoff level: the fields to match on and the matches it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffLevel {
    pub fields: Vec<Field>,
    #[serde(default)]
    pub min_matches: usize,
}

impl BackoffLevel {
    pub fn new(fields: Vec<Field>, min_matches: usize) -> Self {
        BackoffLevel { fields, min_matches }
    }
}

/// The four standard levels, strict to loose.
pub fn standard_backoff() -> Vec<BackoffLevel> {
    use Field::*;

    let strict = vec![
        Possession, Quarter, ClockBucket, HurryUp, Down, DistBucket, FieldZone, OppPersonnel,
        OppFormation, DefShell, Pressure,
    ];
    let no_formation: Vec<Field> = strict.iter().copied().filter(|&f| f != OppFormation).collect();
    let no_personnel: Vec<Field> = no_formation
        .iter()
        .copied()
        .filter(|&f| f != OppPersonnel)
        .collect();

    vec![
        BackoffLevel::new(strict, 20),
        BackoffLevel::new(no_formation, 15),
        BackoffLevel::new(no_personnel, 10),
        BackoffLevel::new(vec![Possession, Down, DistBucket, FieldZone], 5),
    ]
}

/// Knobs shared by the engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// College archetype weight.
    pub league_mix: LeagueMix,

    /// Pseudo-observation scale of the authored priors.
    pub prior_strength: f64,

    pub blend: BlendConfig,

    /// Strict to loose.
    pub backoff: Vec<BackoffLevel>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            league_mix: LeagueMix::default(),
            prior_strength: 1.0,
            blend: BlendConfig::default(),
            backoff: standard_backoff(),
        }
    }
}

impl EngineConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads, validates and sanitizes configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, is not valid TOML, or names
    /// a backoff level without fields.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config.sanitized())
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Structural checks that clamping cannot repair.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(i) = self.backoff.iter().position(|l| l.fields.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "backoff level {} has no fields; the global level is implicit",
                i
            )));
        }
        Ok(())
    }

    /// Copy with every knob clamped into the range the engines assume.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();

        if self.prior_strength <= 0.0 || !self.prior_strength.is_finite() {
            warn!(event = "knob_clamped", knob = "prior_strength", value = self.prior_strength);
            out.prior_strength = 1.0;
        }

        if self.blend.live_threshold == 0 {
            warn!(event = "knob_clamped", knob = "live_threshold", value = 0u32);
            out.blend.live_threshold = 1;
        }

        if self.blend.smoothing_alpha <= 0.0 || !self.blend.smoothing_alpha.is_finite() {
            warn!(
                event = "knob_clamped",
                knob = "smoothing_alpha",
                value = self.blend.smoothing_alpha
            );
            out.blend.smoothing_alpha = BlendConfig::default().smoothing_alpha;
        }

        out
    }
}
