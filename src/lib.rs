//! Playcall Core - situational play-call probabilities for a football staff dashboard.
//!
//! Three engines share one bucket vocabulary:
//!
//! - [`empirical`]: backoff-matched frequencies from tagged history, blended
//!   with the live game log.
//! - [`priors`]: league-archetype Dirichlet priors updated with live counts.
//! - [`expected_points`]: a bucketed expected-points table and per-play EPA.
//!
//! [`preview`] composes them into the 4th-down and two-point previews. Python
//! bindings are built with the `python` feature.

pub mod condition;
pub mod config;
pub mod constants;
pub mod distribution;
pub mod empirical;
pub mod expected_points;
pub mod preview;
pub mod priors;
pub mod taxonomy;

#[cfg(feature = "python")]
mod python;

pub use condition::{count_labels, Condition, Field, Observation, SITUATION_FIELDS};
pub use config::{standard_backoff, BackoffLevel, BlendConfig, ConfigError, EngineConfig, LeagueMix};
pub use distribution::{Alpha, Counts, Distribution};
pub use empirical::{live_weight, Diagnostics, Estimate, LevelUsed, Matcher};
pub use expected_points::{EpModel, EpTables, GameState, PlayResult, TaggedPlay, TaggedResult};
pub use preview::{FourthDownPreview, PreviewContext};
pub use priors::{
    credible_interval, fg_in_range, posterior_mean, CallContext, PassConditionals, PriorEngine,
    PriorTables,
};
pub use taxonomy::{
    Bucket, CallType, ClockBucket, DefShell, DistanceBucket, FieldZone, Formation, FourthDecision,
    Personnel, Possession, PressureTier, TimeoutUsage, Turnover, TwoPointChoice, YardsBucket,
};
