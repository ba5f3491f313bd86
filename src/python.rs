//! Python bindings.
//!
//! Labels cross the boundary as the tagger's strings; dimension arguments
//! must be in vocabulary, outcome labels that are not become null labels.

use std::collections::{BTreeMap, HashMap};

use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

use crate::condition::{Condition, Observation};
use crate::config::{ConfigError, EngineConfig, LeagueMix};
use crate::distribution::{Alpha, Counts, Distribution};
use crate::empirical::{Estimate, Matcher};
use crate::expected_points::{EpModel, GameState, TaggedResult};
use crate::priors::{self, CallContext, PassConditionals, PriorEngine};
use crate::taxonomy::{
    Bucket, CallType, ClockBucket, DefShell, DistanceBucket, FieldZone, Formation, Personnel,
    Possession, PressureTier, TimeoutUsage, Turnover, YardsBucket,
};

impl From<ConfigError> for PyErr {
    fn from(err: ConfigError) -> PyErr {
        match err {
            ConfigError::Io(e) => PyIOError::new_err(format!("Failed to read config: {}", e)),
            other => PyValueError::new_err(other.to_string()),
        }
    }
}

fn parse<B: Bucket>(label: &str, what: &str) -> PyResult<B> {
    B::from_label(label)
        .ok_or_else(|| PyValueError::new_err(format!("Unknown {} label: {:?}", what, label)))
}

fn to_py_map<K: Bucket>(dist: &BTreeMap<K, f64>) -> HashMap<String, f64> {
    dist.iter().map(|(k, &v)| (k.label().to_string(), v)).collect()
}

fn load_config(config_path: Option<&str>) -> PyResult<EngineConfig> {
    match config_path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// A bucketed situation.
#[pyclass(name = "Condition")]
#[derive(Clone, Debug, Default)]
pub struct PyCondition {
    inner: Condition,
}

#[pymethods]
impl PyCondition {
    #[new]
    #[pyo3(signature = (
        down = None,
        dist_bucket = "UNK",
        field_zone = "UNK",
        clock_bucket = None,
        possession = "UNK",
        quarter = None,
        hurry_up = false,
        goal_to_go = false,
        opp_personnel = "UNK",
        opp_formation = "UNK",
        def_shell = "UNK",
        pressure = "UNK",
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        down: Option<u8>,
        dist_bucket: &str,
        field_zone: &str,
        clock_bucket: Option<&str>,
        possession: &str,
        quarter: Option<u8>,
        hurry_up: bool,
        goal_to_go: bool,
        opp_personnel: &str,
        opp_formation: &str,
        def_shell: &str,
        pressure: &str,
    ) -> PyResult<Self> {
        Ok(PyCondition {
            inner: Condition {
                possession: parse::<Possession>(possession, "possession")?,
                quarter,
                clock: clock_bucket
                    .filter(|&c| c != "UNK")
                    .map(|c| parse::<ClockBucket>(c, "clock bucket"))
                    .transpose()?,
                hurry_up,
                down,
                distance: parse::<DistanceBucket>(dist_bucket, "distance bucket")?,
                zone: parse::<FieldZone>(field_zone, "field zone")?,
                goal_to_go,
                personnel: parse::<Personnel>(opp_personnel, "personnel")?,
                formation: parse::<Formation>(opp_formation, "formation")?,
                shell: parse::<DefShell>(def_shell, "shell")?,
                pressure: parse::<PressureTier>(pressure, "pressure")?,
            },
        })
    }

    #[getter]
    fn down(&self) -> Option<u8> {
        self.inner.down
    }

    #[getter]
    fn quarter(&self) -> Option<u8> {
        self.inner.quarter
    }

    #[getter]
    fn dist_bucket(&self) -> &'static str {
        self.inner.distance.label()
    }

    #[getter]
    fn field_zone(&self) -> &'static str {
        self.inner.zone.label()
    }

    #[getter]
    fn clock_bucket(&self) -> Option<&'static str> {
        self.inner.clock.map(|c| c.label())
    }

    #[getter]
    fn possession(&self) -> &'static str {
        self.inner.possession.label()
    }

    #[getter]
    fn hurry_up(&self) -> bool {
        self.inner.hurry_up
    }

    #[getter]
    fn goal_to_go(&self) -> bool {
        self.inner.goal_to_go
    }

    fn __repr__(&self) -> String {
        format!(
            "Condition(down={:?}, dist_bucket={}, field_zone={}, clock_bucket={})",
            self.inner.down,
            self.inner.distance,
            self.inner.zone,
            self.inner.clock.map_or("UNK", |c| c.label())
        )
    }
}

fn observations<L: Bucket>(rows: Vec<(PyCondition, Option<String>)>) -> Vec<Observation<L>> {
    rows.into_iter()
        .map(|(c, label)| Observation::new(c.inner, label.as_deref().and_then(L::from_label)))
        .collect()
}

type PyEstimate = (HashMap<String, f64>, HashMap<String, f64>);

fn estimate_to_py<L: Bucket>(estimate: &Estimate<L>, level_count: usize) -> PyEstimate {
    let d = &estimate.diagnostics;
    let diagnostics = HashMap::from([
        ("level".to_string(), d.level.index(level_count) as f64),
        ("hist_matches".to_string(), d.hist_matches as f64),
        ("live_matches".to_string(), d.live_matches as f64),
        ("live_weight".to_string(), d.live_weight),
        ("live_threshold".to_string(), d.live_threshold as f64),
    ]);
    (to_py_map(&estimate.probabilities), diagnostics)
}

fn blended<L: Bucket>(
    matcher: &Matcher,
    condition: &Condition,
    historical: Vec<(PyCondition, Option<String>)>,
    live: Vec<(PyCondition, Option<String>)>,
) -> PyEstimate {
    let hist = observations::<L>(historical);
    let live = observations::<L>(live);
    let estimate = matcher.estimate(condition, &hist, &live);
    estimate_to_py(&estimate, matcher.levels().len())
}

/// Backoff-matched, live-blended outcome distribution plus diagnostics.
///
/// `outcome` picks the vocabulary: "call_type", "yards" or "pressure".
#[pyfunction]
#[pyo3(name = "blended_probs", signature = (condition, historical, live, outcome = "call_type", config_path = None))]
fn py_blended_probs(
    condition: &PyCondition,
    historical: Vec<(PyCondition, Option<String>)>,
    live: Vec<(PyCondition, Option<String>)>,
    outcome: &str,
    config_path: Option<&str>,
) -> PyResult<PyEstimate> {
    let matcher = Matcher::from_config(&load_config(config_path)?);
    let cond = &condition.inner;
    match outcome {
        "call_type" => Ok(blended::<CallType>(&matcher, cond, historical, live)),
        "yards" => Ok(blended::<YardsBucket>(&matcher, cond, historical, live)),
        "pressure" => Ok(blended::<PressureTier>(&matcher, cond, historical, live)),
        other => Err(PyValueError::new_err(format!("Unknown outcome: {:?}", other))),
    }
}

/// Call-mix pseudo-counts for a situation.
#[pyfunction]
#[pyo3(name = "call_prior_alpha", signature = (
    down,
    dist_bucket,
    field_zone,
    clock_bucket = "OTHER",
    hurry_up = false,
    goal_to_go = false,
    after_first_down = false,
    league_mix = 0.5,
    prior_strength = 1.0,
))]
#[allow(clippy::too_many_arguments)]
fn py_call_prior_alpha(
    down: u8,
    dist_bucket: &str,
    field_zone: &str,
    clock_bucket: &str,
    hurry_up: bool,
    goal_to_go: bool,
    after_first_down: bool,
    league_mix: f64,
    prior_strength: f64,
) -> PyResult<HashMap<String, f64>> {
    let mix = LeagueMix::new(league_mix);
    let zone = parse::<FieldZone>(field_zone, "field zone")?;
    let ctx = CallContext {
        down,
        distance: parse(dist_bucket, "distance bucket")?,
        zone,
        clock: parse(clock_bucket, "clock bucket")?,
        hurry_up,
        goal_to_go,
        after_first_down,
        fg_in_range: priors::fg_in_range(zone, mix),
    };
    Ok(to_py_map(&PriorEngine::default().call_alpha(&ctx, mix, prior_strength)))
}

/// Dirichlet posterior mean over arbitrary string keys.
#[pyfunction]
#[pyo3(name = "posterior_mean")]
fn py_posterior_mean(
    alpha: HashMap<String, f64>,
    counts: HashMap<String, u64>,
) -> HashMap<String, f64> {
    let alpha: Alpha<String> = alpha.into_iter().collect();
    let counts: Counts<String> = counts.into_iter().collect();
    priors::posterior_mean(&alpha, &counts).into_iter().collect()
}

/// P(RUN), P(PASS) and each pass type given pass.
#[pyfunction]
#[pyo3(name = "derived_pass_conditionals")]
fn py_derived_pass_conditionals(probs: HashMap<String, f64>) -> HashMap<String, f64> {
    let calls: Distribution<CallType> = probs
        .iter()
        .filter_map(|(k, &v)| CallType::from_label(k).map(|c| (c, v)))
        .collect();
    let pc = PassConditionals::from_distribution(&calls);
    HashMap::from([
        ("p_run".to_string(), pc.p_run),
        ("p_pass".to_string(), pc.p_pass),
        ("p_quick_given_pass".to_string(), pc.p_quick_given_pass),
        ("p_dropback_given_pass".to_string(), pc.p_dropback_given_pass),
        ("p_play_action_given_pass".to_string(), pc.p_play_action_given_pass),
        ("p_screen_given_pass".to_string(), pc.p_screen_given_pass),
        ("p_shot_given_pass".to_string(), pc.p_shot_given_pass),
    ])
}

#[pyfunction]
#[pyo3(name = "pressure_prior_alpha", signature = (down, dist_bucket, prior_strength = 1.0))]
fn py_pressure_prior_alpha(
    down: u8,
    dist_bucket: &str,
    prior_strength: f64,
) -> PyResult<HashMap<String, f64>> {
    let distance = parse::<DistanceBucket>(dist_bucket, "distance bucket")?;
    Ok(to_py_map(&PriorEngine::default().pressure_alpha(down, distance, prior_strength)))
}

#[pyfunction]
#[pyo3(name = "timeout_prior_alpha", signature = (quarter, clock_bucket, hurry_up = false, prior_strength = 1.0))]
fn py_timeout_prior_alpha(
    quarter: u8,
    clock_bucket: &str,
    hurry_up: bool,
    prior_strength: f64,
) -> PyResult<HashMap<String, f64>> {
    let clock = parse::<ClockBucket>(clock_bucket, "clock bucket")?;
    let alpha = PriorEngine::default().timeout_alpha(quarter, clock, hurry_up, prior_strength);
    Ok(to_py_map(&alpha))
}

#[pyfunction]
#[pyo3(name = "fourth_down_prior_alpha", signature = (dist_bucket, field_zone, league_mix = 0.5, prior_strength = 1.0))]
fn py_fourth_down_prior_alpha(
    dist_bucket: &str,
    field_zone: &str,
    league_mix: f64,
    prior_strength: f64,
) -> PyResult<HashMap<String, f64>> {
    let mix = LeagueMix::new(league_mix);
    let distance = parse::<DistanceBucket>(dist_bucket, "distance bucket")?;
    let zone = parse::<FieldZone>(field_zone, "field zone")?;
    let alpha = PriorEngine::default().fourth_down_alpha(
        distance,
        zone,
        mix,
        prior_strength,
        priors::fg_in_range(zone, mix),
    );
    Ok(to_py_map(&alpha))
}

#[pyfunction]
#[pyo3(name = "fg_in_range", signature = (field_zone, league_mix = 0.5))]
fn py_fg_in_range(field_zone: &str, league_mix: f64) -> PyResult<bool> {
    let zone = parse::<FieldZone>(field_zone, "field zone")?;
    Ok(priors::fg_in_range(zone, LeagueMix::new(league_mix)))
}

fn game_state(
    down: u8,
    dist_bucket: &str,
    field_zone: &str,
    clock_bucket: &str,
    goal_to_go: bool,
) -> PyResult<GameState> {
    Ok(GameState::new(
        down,
        parse(dist_bucket, "distance bucket")?,
        parse(field_zone, "field zone")?,
        parse(clock_bucket, "clock bucket")?,
        goal_to_go,
    ))
}

/// Expected points of a pre-snap state.
#[pyfunction]
#[pyo3(name = "ep_value", signature = (down, dist_bucket, field_zone, clock_bucket = "OTHER", goal_to_go = false, league_mix = 0.5))]
fn py_ep_value(
    down: u8,
    dist_bucket: &str,
    field_zone: &str,
    clock_bucket: &str,
    goal_to_go: bool,
    league_mix: f64,
) -> PyResult<f64> {
    let state = game_state(down, dist_bucket, field_zone, clock_bucket, goal_to_go)?;
    Ok(EpModel::default().value_of(&state, LeagueMix::new(league_mix)))
}

/// EPA of one play; `None` while any result field is untagged.
#[pyfunction]
#[pyo3(name = "epa", signature = (
    down,
    dist_bucket,
    field_zone,
    first_down,
    touchdown,
    yards_bucket,
    turnover,
    clock_bucket = "OTHER",
    goal_to_go = false,
    league_mix = 0.5,
))]
#[allow(clippy::too_many_arguments)]
fn py_epa(
    down: u8,
    dist_bucket: &str,
    field_zone: &str,
    first_down: Option<bool>,
    touchdown: Option<bool>,
    yards_bucket: Option<&str>,
    turnover: Option<&str>,
    clock_bucket: &str,
    goal_to_go: bool,
    league_mix: f64,
) -> PyResult<Option<f64>> {
    let state = game_state(down, dist_bucket, field_zone, clock_bucket, goal_to_go)?;
    let result = TaggedResult {
        first_down,
        touchdown,
        yards: yards_bucket.map(|y| parse::<YardsBucket>(y, "yards bucket")).transpose()?,
        turnover: turnover.map(|t| parse::<Turnover>(t, "turnover")).transpose()?,
    };
    Ok(EpModel::default().epa(&state, &result, LeagueMix::new(league_mix)))
}

fn labels<B: Bucket>() -> Vec<&'static str> {
    B::all().iter().map(|b| b.label()).collect()
}

/// Python module definition
#[pymodule]
fn playcall_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<PyCondition>()?;

    // Empirical engine
    m.add_function(wrap_pyfunction!(py_blended_probs, m)?)?;

    // Priors
    m.add_function(wrap_pyfunction!(py_call_prior_alpha, m)?)?;
    m.add_function(wrap_pyfunction!(py_posterior_mean, m)?)?;
    m.add_function(wrap_pyfunction!(py_derived_pass_conditionals, m)?)?;
    m.add_function(wrap_pyfunction!(py_pressure_prior_alpha, m)?)?;
    m.add_function(wrap_pyfunction!(py_timeout_prior_alpha, m)?)?;
    m.add_function(wrap_pyfunction!(py_fourth_down_prior_alpha, m)?)?;
    m.add_function(wrap_pyfunction!(py_fg_in_range, m)?)?;

    // Expected points
    m.add_function(wrap_pyfunction!(py_ep_value, m)?)?;
    m.add_function(wrap_pyfunction!(py_epa, m)?)?;

    // Vocabularies
    m.add("CALL_TYPES", labels::<CallType>())?;
    m.add("DIST_BUCKETS", labels::<DistanceBucket>())?;
    m.add("FIELD_ZONES", labels::<FieldZone>())?;
    m.add("CLOCK_BUCKETS", labels::<ClockBucket>())?;
    m.add("YARDS_BUCKETS", labels::<YardsBucket>())?;
    m.add("TURNOVERS", labels::<Turnover>())?;
    m.add("PRESSURE_TIERS", labels::<PressureTier>())?;
    m.add("TIMEOUT_USAGE", labels::<TimeoutUsage>())?;

    Ok(())
}
