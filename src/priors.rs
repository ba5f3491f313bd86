//! Prior/posterior call-mix engine.
//!
//! Authored league tables are turned into Dirichlet pseudo-counts for a
//! situation, then combined with live counts into a posterior mean. The same
//! conjugate update serves the call mix, pressure rate, timeout usage, the
//! 4th-down tri-decision and the try after a touchdown.

use std::collections::HashMap;

use statrs::distribution::{Beta, ContinuousCDF};

use crate::config::LeagueMix;
use crate::constants::{self, CallRow};
use crate::distribution::{uniform, Alpha, Counts, Distribution};
use crate::taxonomy::{
    CallType, ClockBucket, DistanceBucket, FieldZone, FourthDecision, PressureTier,
    TimeoutUsage, TwoPointChoice,
};

/// Below this pass-family mass, pass conditionals are reported as 0.
const PASS_MASS_EPSILON: f64 = 1e-9;

/// Per-call-type multiplicative factors; unlisted call types keep factor 1.
pub type Multipliers = HashMap<CallType, f64>;

/// Immutable league tables for the prior engine.
#[derive(Clone, Debug)]
pub struct PriorTables {
    pub college_calls: HashMap<(u8, DistanceBucket), CallRow>,
    pub pro_calls: HashMap<(u8, DistanceBucket), CallRow>,
    pub generic_calls: CallRow,
    pub kick_pseudo_count: f64,
    pub zone_multipliers: HashMap<FieldZone, Multipliers>,
    pub clock_multipliers: HashMap<ClockBucket, Multipliers>,
    pub hurry_up_multipliers: Multipliers,
    pub goal_to_go_multipliers: Multipliers,
    pub after_first_down_multipliers: Multipliers,
    pub pressure: HashMap<(u8, DistanceBucket), [f64; 2]>,
    pub pressure_fallback: [f64; 2],
    pub timeout: HashMap<(u8, ClockBucket, bool), [f64; 2]>,
    pub timeout_fallback: [f64; 2],
    pub college_fourth: HashMap<(DistanceBucket, FieldZone), [f64; 3]>,
    pub pro_fourth: HashMap<(DistanceBucket, FieldZone), [f64; 3]>,
    pub college_fourth_fallback: [f64; 3],
    pub pro_fourth_fallback: [f64; 3],
    pub two_point: [f64; 2],
}

fn multipliers(entries: &[(CallType, f64)]) -> Multipliers {
    entries.iter().copied().collect()
}

impl Default for PriorTables {
    fn default() -> Self {
        PriorTables {
            college_calls: constants::COLLEGE_CALL_PRIORS.into_iter().collect(),
            pro_calls: constants::PRO_CALL_PRIORS.into_iter().collect(),
            generic_calls: constants::GENERIC_CALL_PRIOR,
            kick_pseudo_count: constants::KICK_PSEUDO_COUNT,
            zone_multipliers: constants::ZONE_MULTIPLIERS
                .iter()
                .map(|(z, m)| (*z, multipliers(m)))
                .collect(),
            clock_multipliers: constants::CLOCK_MULTIPLIERS
                .iter()
                .map(|(c, m)| (*c, multipliers(m)))
                .collect(),
            hurry_up_multipliers: multipliers(constants::HURRY_UP_MULTIPLIERS),
            goal_to_go_multipliers: multipliers(constants::GOAL_TO_GO_MULTIPLIERS),
            after_first_down_multipliers: multipliers(constants::AFTER_FIRST_DOWN_MULTIPLIERS),
            pressure: constants::PRESSURE_PRIORS.into_iter().collect(),
            pressure_fallback: constants::PRESSURE_FALLBACK,
            timeout: constants::TIMEOUT_PRIORS.into_iter().collect(),
            timeout_fallback: constants::TIMEOUT_FALLBACK,
            college_fourth: constants::COLLEGE_FOURTH_PRIORS.into_iter().collect(),
            pro_fourth: constants::PRO_FOURTH_PRIORS.into_iter().collect(),
            college_fourth_fallback: constants::COLLEGE_FOURTH_FALLBACK,
            pro_fourth_fallback: constants::PRO_FOURTH_FALLBACK,
            two_point: constants::TWO_POINT_PRIOR,
        }
    }
}

/// The situation a call-mix prior is built for.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CallContext {
    pub down: u8,
    pub distance: DistanceBucket,
    pub zone: FieldZone,
    pub clock: ClockBucket,
    pub hurry_up: bool,
    pub goal_to_go: bool,
    /// The previous play moved the chains.
    pub after_first_down: bool,
    pub fg_in_range: bool,
}

/// Whether a field goal is a live option from `zone`.
///
/// A college-leaning mix (>= 0.6) uses the college range, a pro-leaning mix
/// (<= 0.4) the pro range, and the middle band falls back to the college range.
pub fn fg_in_range(zone: FieldZone, mix: LeagueMix) -> bool {
    let zones = if mix.college() >= 0.6 {
        constants::COLLEGE_FG_ZONES
    } else if mix.college() <= 0.4 {
        constants::PRO_FG_ZONES
    } else {
        constants::COLLEGE_FG_ZONES
    };
    zones.contains(&zone)
}

fn apply_multipliers(alpha: &mut Alpha<CallType>, mult: Option<&Multipliers>) {
    if let Some(mult) = mult {
        for (call, factor) in mult {
            if let Some(a) = alpha.get_mut(call) {
                *a *= factor;
            }
        }
    }
}

/// Builds Dirichlet pseudo-counts from league tables.
#[derive(Clone, Debug, Default)]
pub struct PriorEngine {
    tables: PriorTables,
}

impl PriorEngine {
    pub fn new(tables: PriorTables) -> Self {
        PriorEngine { tables }
    }

    pub fn tables(&self) -> &PriorTables {
        &self.tables
    }

    /// League-blended base pseudo-counts over the offensive call types.
    pub fn base_alpha(&self, down: u8, distance: DistanceBucket, mix: LeagueMix) -> Alpha<CallType> {
        let key = (down, distance);
        let college = self.tables.college_calls.get(&key).unwrap_or(&self.tables.generic_calls);
        let pro = self.tables.pro_calls.get(&key).unwrap_or(&self.tables.generic_calls);

        CallType::OFFENSE
            .iter()
            .enumerate()
            .map(|(i, &call)| (call, mix.blend(college[i], pro[i])))
            .collect()
    }

    /// Call-type pseudo-counts for a situation, spanning every call type.
    ///
    /// Kickoff, PAT and two-point are never a next offensive play and are
    /// always 0. Punt and field goal are only non-zero on 4th down, and field
    /// goal only when in range.
    pub fn call_alpha(&self, ctx: &CallContext, mix: LeagueMix, strength: f64) -> Alpha<CallType> {
        let mut alpha = self.base_alpha(ctx.down, ctx.distance, mix);

        apply_multipliers(&mut alpha, self.tables.zone_multipliers.get(&ctx.zone));
        apply_multipliers(&mut alpha, self.tables.clock_multipliers.get(&ctx.clock));
        if ctx.hurry_up {
            apply_multipliers(&mut alpha, Some(&self.tables.hurry_up_multipliers));
        }
        if ctx.goal_to_go {
            apply_multipliers(&mut alpha, Some(&self.tables.goal_to_go_multipliers));
        }
        if ctx.after_first_down {
            apply_multipliers(&mut alpha, Some(&self.tables.after_first_down_multipliers));
        }

        for a in alpha.values_mut() {
            *a = (*a * strength).max(0.0);
        }

        alpha.insert(CallType::Kickoff, 0.0);
        alpha.insert(CallType::PatKick, 0.0);
        alpha.insert(CallType::TwoPoint, 0.0);

        let kick = (self.tables.kick_pseudo_count * strength).max(0.0);
        if ctx.down == 4 {
            alpha.insert(CallType::Punt, kick);
            alpha.insert(CallType::FieldGoal, if ctx.fg_in_range { kick } else { 0.0 });
        } else {
            alpha.insert(CallType::Punt, 0.0);
            alpha.insert(CallType::FieldGoal, 0.0);
        }

        for &call in CallType::ALL {
            alpha.entry(call).or_insert(0.0);
        }
        alpha
    }

    /// Four vs five-plus rushers, keyed by (down, distance).
    pub fn pressure_alpha(&self, down: u8, distance: DistanceBucket, strength: f64) -> Alpha<PressureTier> {
        let row = self
            .tables
            .pressure
            .get(&(down, distance))
            .unwrap_or(&self.tables.pressure_fallback);
        [PressureTier::Four, PressureTier::FivePlus]
            .into_iter()
            .zip(row.iter())
            .map(|(tier, &v)| (tier, (v * strength).max(0.0)))
            .collect()
    }

    /// Timeout before the next snap, keyed by (quarter, clock, hurry-up).
    pub fn timeout_alpha(
        &self,
        quarter: u8,
        clock: ClockBucket,
        hurry_up: bool,
        strength: f64,
    ) -> Alpha<TimeoutUsage> {
        let row = self
            .tables
            .timeout
            .get(&(quarter, clock, hurry_up))
            .unwrap_or(&self.tables.timeout_fallback);
        [TimeoutUsage::No, TimeoutUsage::Yes]
            .into_iter()
            .zip(row.iter())
            .map(|(usage, &v)| (usage, (v * strength).max(0.0)))
            .collect()
    }

    /// GO / FIELD_GOAL / PUNT on 4th down, keyed by (distance, zone).
    pub fn fourth_down_alpha(
        &self,
        distance: DistanceBucket,
        zone: FieldZone,
        mix: LeagueMix,
        strength: f64,
        fg_in_range: bool,
    ) -> Alpha<FourthDecision> {
        let key = (distance, zone);
        let college = self
            .tables
            .college_fourth
            .get(&key)
            .unwrap_or(&self.tables.college_fourth_fallback);
        let pro = self
            .tables
            .pro_fourth
            .get(&key)
            .unwrap_or(&self.tables.pro_fourth_fallback);

        let decisions = [FourthDecision::Go, FourthDecision::FieldGoal, FourthDecision::Punt];
        decisions
            .into_iter()
            .enumerate()
            .map(|(i, decision)| {
                let base = if decision == FourthDecision::FieldGoal && !fg_in_range {
                    0.0
                } else {
                    mix.blend(college[i], pro[i])
                };
                (decision, (base * strength).max(0.0))
            })
            .collect()
    }

    /// Kick vs two-point try.
    pub fn two_point_alpha(&self, strength: f64) -> Alpha<TwoPointChoice> {
        [TwoPointChoice::Kick, TwoPointChoice::Two]
            .into_iter()
            .zip(self.tables.two_point.iter())
            .map(|(choice, &v)| (choice, (v * strength).max(0.0)))
            .collect()
    }
}

/// Dirichlet-multinomial posterior mean.
///
/// `(alpha[k] + counts[k]) / sum(alpha + counts)` over the keys of `alpha`.
/// Counts for keys outside `alpha` are ignored. A non-positive total falls
/// back to uniform over `alpha`'s keys.
pub fn posterior_mean<K: Ord + Clone>(alpha: &Alpha<K>, counts: &Counts<K>) -> Distribution<K> {
    let numerators: Vec<(K, f64)> = alpha
        .iter()
        .map(|(k, &a)| (k.clone(), a + counts.get(k).copied().unwrap_or(0) as f64))
        .collect();
    let denom: f64 = numerators.iter().map(|(_, v)| v).sum();

    if denom <= 0.0 {
        let keys: Vec<K> = alpha.keys().cloned().collect();
        return uniform(&keys);
    }
    numerators.into_iter().map(|(k, v)| (k, v / denom)).collect()
}

/// Equal-tailed credible interval for one key's posterior probability.
///
/// The marginal of a Dirichlet is `Beta(a_k, sum(a) - a_k)`. `None` when the
/// marginal is degenerate (a zero pseudo-count on either side).
pub fn credible_interval<K: Ord>(
    alpha: &Alpha<K>,
    counts: &Counts<K>,
    key: &K,
    level: f64,
) -> Option<(f64, f64)> {
    if !(0.0..1.0).contains(&level) {
        return None;
    }
    let a = alpha.get(key)? + counts.get(key).copied().unwrap_or(0) as f64;
    let total: f64 = alpha
        .iter()
        .map(|(k, &v)| v + counts.get(k).copied().unwrap_or(0) as f64)
        .sum();
    let beta = Beta::new(a, total - a).ok()?;
    let tail = (1.0 - level) / 2.0;
    Some((beta.inverse_cdf(tail), beta.inverse_cdf(1.0 - tail)))
}

/// Run/pass split and pass sub-type conditionals of a call distribution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PassConditionals {
    pub p_run: f64,
    pub p_pass: f64,
    pub p_quick_given_pass: f64,
    pub p_dropback_given_pass: f64,
    pub p_play_action_given_pass: f64,
    pub p_screen_given_pass: f64,
    pub p_shot_given_pass: f64,
}

impl PassConditionals {
    pub fn from_distribution(calls: &Distribution<CallType>) -> Self {
        let p = |c: CallType| calls.get(&c).copied().unwrap_or(0.0);
        let p_pass: f64 = CallType::PASS_FAMILY.iter().map(|&c| p(c)).sum();
        let given = |c: CallType| {
            if p_pass > PASS_MASS_EPSILON {
                p(c) / p_pass
            } else {
                0.0
            }
        };

        PassConditionals {
            p_run: p(CallType::Run),
            p_pass,
            p_quick_given_pass: given(CallType::PassQuick),
            p_dropback_given_pass: given(CallType::PassDropback),
            p_play_action_given_pass: given(CallType::PlayAction),
            p_screen_given_pass: given(CallType::Screen),
            p_shot_given_pass: given(CallType::Shot),
        }
    }

    /// `P(call | pass family)`; 0 for non-pass calls.
    pub fn given_pass(&self, call: CallType) -> f64 {
        match call {
            CallType::PassQuick => self.p_quick_given_pass,
            CallType::PassDropback => self.p_dropback_given_pass,
            CallType::PlayAction => self.p_play_action_given_pass,
            CallType::Screen => self.p_screen_given_pass,
            CallType::Shot => self.p_shot_given_pass,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::total;

    fn ctx(down: u8) -> CallContext {
        CallContext {
            down,
            distance: DistanceBucket::Medium,
            zone: FieldZone::Midfield,
            clock: ClockBucket::Other,
            ..CallContext::default()
        }
    }

    #[test]
    fn test_base_alpha_blends_archetypes() {
        let engine = PriorEngine::default();
        let college = engine.base_alpha(1, DistanceBucket::Medium, LeagueMix::COLLEGE);
        let pro = engine.base_alpha(1, DistanceBucket::Medium, LeagueMix::PRO);
        let even = engine.base_alpha(1, DistanceBucket::Medium, LeagueMix::new(0.5));

        assert!((college[&CallType::Run] - 28.0).abs() < 1e-12);
        assert!((pro[&CallType::Run] - 22.0).abs() < 1e-12);
        assert!((even[&CallType::Run] - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_base_alpha_falls_back_to_generic() {
        let engine = PriorEngine::default();
        let alpha = engine.base_alpha(2, DistanceBucket::Unk, LeagueMix::new(0.3));
        assert!((alpha[&CallType::PassDropback] - 25.0).abs() < 1e-12);
        assert!((alpha[&CallType::Sack] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_call_alpha_spans_vocabulary_and_masks_special_teams() {
        let engine = PriorEngine::default();
        let alpha = engine.call_alpha(&ctx(2), LeagueMix::default(), 1.0);

        assert_eq!(alpha.len(), CallType::ALL.len());
        for call in [
            CallType::Kickoff,
            CallType::PatKick,
            CallType::TwoPoint,
            CallType::Punt,
            CallType::FieldGoal,
        ] {
            assert_eq!(alpha[&call], 0.0, "{} must be masked off 4th down", call);
        }
    }

    #[test]
    fn test_fourth_down_kicks() {
        let engine = PriorEngine::default();
        let mut c = ctx(4);
        let out_of_range = engine.call_alpha(&c, LeagueMix::default(), 2.0);
        assert!((out_of_range[&CallType::Punt] - 1.4).abs() < 1e-12);
        assert_eq!(out_of_range[&CallType::FieldGoal], 0.0);

        c.fg_in_range = true;
        let in_range = engine.call_alpha(&c, LeagueMix::default(), 2.0);
        assert!(in_range[&CallType::FieldGoal] > 0.0);
    }

    #[test]
    fn test_multipliers_compose() {
        let engine = PriorEngine::default();
        let mut c = ctx(1);
        c.zone = FieldZone::LowRed;
        c.goal_to_go = true;
        let plain = engine.base_alpha(1, DistanceBucket::Medium, LeagueMix::COLLEGE);
        let alpha = engine.call_alpha(&c, LeagueMix::COLLEGE, 1.0);

        let expected_run = plain[&CallType::Run] * 1.25 * 1.20;
        assert!((alpha[&CallType::Run] - expected_run).abs() < 1e-9);
        // Untouched by either table.
        assert!((alpha[&CallType::PassDropback] - plain[&CallType::PassDropback]).abs() < 1e-12);
    }

    #[test]
    fn test_strength_scales_and_clamps() {
        let engine = PriorEngine::default();
        let one = engine.call_alpha(&ctx(1), LeagueMix::default(), 1.0);
        let three = engine.call_alpha(&ctx(1), LeagueMix::default(), 3.0);
        assert!((three[&CallType::Run] - 3.0 * one[&CallType::Run]).abs() < 1e-9);

        let negative = engine.call_alpha(&ctx(1), LeagueMix::default(), -1.0);
        assert!(negative.values().all(|&a| a == 0.0));
    }

    #[test]
    fn test_posterior_mean_without_counts_normalizes_alpha() {
        let alpha: Alpha<&str> = [("A", 3.0), ("B", 1.0)].into_iter().collect();
        let post = posterior_mean(&alpha, &Counts::new());
        assert!((post["A"] - 0.75).abs() < 1e-12);
        assert!((post["B"] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_posterior_mean_moves_toward_counts() {
        let alpha: Alpha<&str> = [("A", 1.0), ("B", 1.0)].into_iter().collect();
        let counts: Counts<&str> = [("B", 998)].into_iter().collect();
        let post = posterior_mean(&alpha, &counts);
        assert!(post["B"] > 0.99);
        assert!((total(&post) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_posterior_mean_degenerate_is_uniform() {
        let alpha: Alpha<&str> = [("A", 0.0), ("B", 0.0), ("C", 0.0), ("D", 0.0)]
            .into_iter()
            .collect();
        let post = posterior_mean(&alpha, &Counts::new());
        assert_eq!(post.len(), 4);
        assert!(post.values().all(|&p| (p - 0.25).abs() < 1e-12));

        assert!(posterior_mean(&Alpha::<&str>::new(), &Counts::new()).is_empty());
    }

    #[test]
    fn test_pressure_and_timeout_tables() {
        let engine = PriorEngine::default();
        let press = engine.pressure_alpha(3, DistanceBucket::Long, 1.0);
        assert_eq!(press[&PressureTier::Four], 24.0);
        assert_eq!(press[&PressureTier::FivePlus], 16.0);

        let fallback = engine.pressure_alpha(1, DistanceBucket::Unk, 0.5);
        assert_eq!(fallback[&PressureTier::FivePlus], 5.0);

        let timeout = engine.timeout_alpha(4, ClockBucket::From2To0, true, 1.0);
        assert_eq!(timeout[&TimeoutUsage::Yes], 24.0);
        let quiet = engine.timeout_alpha(1, ClockBucket::Other, false, 1.0);
        assert_eq!(quiet[&TimeoutUsage::Yes], 4.0);
    }

    #[test]
    fn test_fourth_down_alpha_masks_field_goal() {
        let engine = PriorEngine::default();
        let alpha = engine.fourth_down_alpha(
            DistanceBucket::Long,
            FieldZone::HighRed,
            LeagueMix::COLLEGE,
            1.0,
            false,
        );
        assert_eq!(alpha[&FourthDecision::FieldGoal], 0.0);
        assert_eq!(alpha[&FourthDecision::Go], 4.0);
        assert_eq!(alpha[&FourthDecision::Punt], 6.0);

        let pro = engine.fourth_down_alpha(
            DistanceBucket::Long,
            FieldZone::HighRed,
            LeagueMix::PRO,
            1.0,
            true,
        );
        assert_eq!(pro[&FourthDecision::FieldGoal], 34.0);
    }

    #[test]
    fn test_fg_range_bands() {
        assert!(fg_in_range(FieldZone::Midfield, LeagueMix::new(0.2)));
        assert!(!fg_in_range(FieldZone::Midfield, LeagueMix::new(0.8)));
        // Middle band uses the college range.
        assert!(!fg_in_range(FieldZone::Midfield, LeagueMix::new(0.5)));
        assert!(fg_in_range(FieldZone::HighRed, LeagueMix::new(0.5)));
        assert!(!fg_in_range(FieldZone::OwnSide, LeagueMix::PRO));
    }

    #[test]
    fn test_pass_conditionals() {
        let calls: Distribution<CallType> = [
            (CallType::Run, 0.5),
            (CallType::PassQuick, 0.25),
            (CallType::Shot, 0.25),
        ]
        .into_iter()
        .collect();
        let cond = PassConditionals::from_distribution(&calls);
        assert!((cond.p_run - 0.5).abs() < 1e-12);
        assert!((cond.p_pass - 0.5).abs() < 1e-12);
        assert!((cond.p_shot_given_pass - 0.5).abs() < 1e-12);
        assert_eq!(cond.given_pass(CallType::Screen), 0.0);
        assert_eq!(cond.given_pass(CallType::Run), 0.0);
    }

    #[test]
    fn test_pass_conditionals_without_pass_mass() {
        let calls: Distribution<CallType> = [(CallType::Run, 1.0)].into_iter().collect();
        let cond = PassConditionals::from_distribution(&calls);
        assert_eq!(cond.p_pass, 0.0);
        assert_eq!(cond.p_dropback_given_pass, 0.0);
    }

    #[test]
    fn test_credible_interval_brackets_mean() {
        let engine = PriorEngine::default();
        let alpha = engine.pressure_alpha(2, DistanceBucket::Medium, 1.0);
        let counts: Counts<PressureTier> = [(PressureTier::FivePlus, 6)].into_iter().collect();
        let mean = posterior_mean(&alpha, &counts)[&PressureTier::FivePlus];

        let (lo, hi) = credible_interval(&alpha, &counts, &PressureTier::FivePlus, 0.9).unwrap();
        assert!(lo < mean && mean < hi, "{} not in ({}, {})", mean, lo, hi);
        assert!(lo > 0.0 && hi < 1.0);
    }

    #[test]
    fn test_credible_interval_degenerate() {
        let alpha: Alpha<&str> = [("A", 0.0), ("B", 2.0)].into_iter().collect();
        assert!(credible_interval(&alpha, &Counts::new(), &"A", 0.9).is_none());
        assert!(credible_interval(&alpha, &Counts::new(), &"Z", 0.9).is_none());
    }
}
