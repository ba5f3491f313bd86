//! Condition matcher and historical/live blender.
//!
//! For a situation, the matcher walks the backoff levels strict to loose and
//! stops at the first one with enough matching rows across both datasets.
//! Each dataset's slice is smoothed independently and the two are blended
//! with a live weight that ramps from 0 to 1 as live matches reach the
//! threshold.

use rayon::prelude::*;
use tracing::debug;

use crate::condition::{Condition, Observation};
use crate::config::{BackoffLevel, BlendConfig, EngineConfig};
use crate::distribution::{blend, laplace, Counts, Distribution};
use crate::taxonomy::{Bucket, ClockBucket};

/// Which level produced an estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelUsed {
    /// Index into the configured levels.
    Level(usize),
    /// No level qualified; every labeled row was used.
    Global,
}

impl LevelUsed {
    /// Level index, with the global level reported as `level_count`.
    pub fn index(self, level_count: usize) -> usize {
        match self {
            LevelUsed::Level(i) => i,
            LevelUsed::Global => level_count,
        }
    }
}

/// How an estimate was reached. Informational only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diagnostics {
    pub level: LevelUsed,
    pub hist_matches: usize,
    pub live_matches: usize,
    pub live_weight: f64,
    pub live_threshold: u32,
}

/// Blended outcome distribution plus diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct Estimate<L> {
    pub probabilities: Distribution<L>,
    pub diagnostics: Diagnostics,
}

/// `min(1, live / threshold)`; a zero threshold trusts live data fully.
pub fn live_weight(live_matches: usize, threshold: u32) -> f64 {
    if threshold == 0 {
        return 1.0;
    }
    (live_matches as f64 / threshold as f64).min(1.0)
}

fn counts_of<L: Bucket>(rows: &[&Observation<L>]) -> Counts<L> {
    let mut counts = Counts::new();
    for row in rows {
        if let Some(label) = row.label {
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    counts
}

/// Backoff matcher over labeled datasets.
#[derive(Clone, Debug)]
pub struct Matcher {
    levels: Vec<BackoffLevel>,
    blend: BlendConfig,
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher::from_config(&EngineConfig::default())
    }
}

impl Matcher {
    pub fn new(levels: Vec<BackoffLevel>, blend: BlendConfig) -> Self {
        Matcher { levels, blend }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Matcher::new(config.backoff.clone(), config.blend.clone())
    }

    pub fn levels(&self) -> &[BackoffLevel] {
        &self.levels
    }

    /// Blended outcome distribution for `condition`.
    ///
    /// Rows with a null label never count. The distribution always spans
    /// the outcome vocabulary minus its unknown sentinel.
    pub fn estimate<L: Bucket>(
        &self,
        condition: &Condition,
        historical: &[Observation<L>],
        live: &[Observation<L>],
    ) -> Estimate<L> {
        let vocabulary = L::known();
        let hist: Vec<&Observation<L>> = historical.iter().filter(|o| o.label.is_some()).collect();
        let live: Vec<&Observation<L>> = live.iter().filter(|o| o.label.is_some()).collect();

        let mut chosen = None;
        for (i, level) in self.levels.iter().enumerate() {
            let hist_slice: Vec<&Observation<L>> = hist
                .iter()
                .copied()
                .filter(|o| o.condition.matches(condition, &level.fields))
                .collect();
            let live_slice: Vec<&Observation<L>> = live
                .iter()
                .copied()
                .filter(|o| o.condition.matches(condition, &level.fields))
                .collect();

            if hist_slice.len() + live_slice.len() >= level.min_matches {
                chosen = Some((LevelUsed::Level(i), hist_slice, live_slice));
                break;
            }
        }
        let (level, hist_slice, live_slice) =
            chosen.unwrap_or_else(|| (LevelUsed::Global, hist, live));

        let alpha = self.blend.smoothing_alpha;
        let hist_probs = laplace(&counts_of(&hist_slice), &vocabulary, alpha);
        let live_probs = laplace(&counts_of(&live_slice), &vocabulary, alpha);
        let w = live_weight(live_slice.len(), self.blend.live_threshold);

        debug!(
            event = "backoff_selected",
            backoff_level = level.index(self.levels.len()),
            hist_matches = hist_slice.len(),
            live_matches = live_slice.len(),
            live_weight = w,
        );

        Estimate {
            probabilities: blend(&hist_probs, &live_probs, w, &vocabulary),
            diagnostics: Diagnostics {
                level,
                hist_matches: hist_slice.len(),
                live_matches: live_slice.len(),
                live_weight: w,
                live_threshold: self.blend.live_threshold,
            },
        }
    }

    /// One estimate per clock bucket, with `base`'s clock replaced.
    pub fn estimate_by_clock<L: Bucket>(
        &self,
        base: &Condition,
        historical: &[Observation<L>],
        live: &[Observation<L>],
        clocks: &[ClockBucket],
    ) -> Vec<(ClockBucket, Estimate<L>)> {
        clocks
            .par_iter()
            .map(|&clock| {
                let condition = base.clone().with_clock(clock);
                (clock, self.estimate(&condition, historical, live))
            })
            .collect()
    }

    /// One estimate per labelled variant condition, in input order.
    pub fn estimate_variants<L: Bucket>(
        &self,
        variants: &[(String, Condition)],
        historical: &[Observation<L>],
        live: &[Observation<L>],
    ) -> Vec<(String, Estimate<L>)> {
        variants
            .par_iter()
            .map(|(label, condition)| (label.clone(), self.estimate(condition, historical, live)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Field;
    use crate::distribution::{laplace, total};
    use crate::taxonomy::{CallType, DistanceBucket, FieldZone, Possession};

    fn cond() -> Condition {
        Condition::situation(1, DistanceBucket::Medium, FieldZone::Midfield, ClockBucket::Other)
    }

    fn rows(condition: &Condition, label: CallType, n: usize) -> Vec<Observation<CallType>> {
        (0..n).map(|_| Observation::labeled(condition.clone(), label)).collect()
    }

    fn matcher(threshold: u32, alpha: f64) -> Matcher {
        Matcher::new(
            vec![
                BackoffLevel::new(vec![Field::Down, Field::DistBucket, Field::FieldZone, Field::ClockBucket], 10),
                BackoffLevel::new(vec![Field::Down], 4),
            ],
            BlendConfig {
                live_threshold: threshold,
                smoothing_alpha: alpha,
            },
        )
    }

    #[test]
    fn test_empty_datasets_are_uniform() {
        let est = Matcher::default().estimate::<CallType>(&cond(), &[], &[]);
        assert_eq!(est.diagnostics.level, LevelUsed::Global);
        assert_eq!(est.probabilities.len(), CallType::ALL.len());
        let u = 1.0 / CallType::ALL.len() as f64;
        for p in est.probabilities.values() {
            assert!((p - u).abs() < 1e-12);
        }
    }

    #[test]
    fn test_strictest_qualifying_level_is_used() {
        let mut hist = rows(&cond(), CallType::Run, 6);
        hist.extend(rows(&cond(), CallType::PassDropback, 6));
        let est = matcher(20, 0.5).estimate(&cond(), &hist, &[]);
        assert_eq!(est.diagnostics.level, LevelUsed::Level(0));
        assert_eq!(est.diagnostics.hist_matches, 12);
    }

    #[test]
    fn test_untagged_clock_is_not_counted_as_other() {
        let by_clock = Matcher::new(
            vec![BackoffLevel::new(vec![Field::ClockBucket], 1)],
            BlendConfig::default(),
        );
        let hist = vec![Observation::labeled(Condition::default(), CallType::Run)];
        let query = Condition::default().with_clock(ClockBucket::Other);

        let est = by_clock.estimate(&query, &hist, &[]);
        assert_eq!(est.diagnostics.level, LevelUsed::Global);
        assert_eq!(est.diagnostics.hist_matches, 1);

        let tagged = vec![Observation::labeled(query.clone(), CallType::Run)];
        let est = by_clock.estimate(&query, &tagged, &[]);
        assert_eq!(est.diagnostics.level, LevelUsed::Level(0));
    }

    #[test]
    fn test_backs_off_when_strict_level_is_thin() {
        let other_zone = Condition::situation(1, DistanceBucket::Long, FieldZone::OwnSide, ClockBucket::Other);
        let mut hist = rows(&cond(), CallType::Run, 2);
        hist.extend(rows(&other_zone, CallType::Shot, 3));
        let est = matcher(20, 0.5).estimate(&cond(), &hist, &[]);
        assert_eq!(est.diagnostics.level, LevelUsed::Level(1));
        assert_eq!(est.diagnostics.hist_matches, 5);
    }

    #[test]
    fn test_global_fallback_counts_everything() {
        let third = Condition::situation(3, DistanceBucket::Long, FieldZone::OwnSide, ClockBucket::Other);
        let hist = rows(&third, CallType::Shot, 2);
        let live = rows(&third, CallType::Run, 1);
        let est = matcher(20, 0.5).estimate(&cond(), &hist, &live);
        assert_eq!(est.diagnostics.level, LevelUsed::Global);
        assert_eq!(est.diagnostics.level.index(2), 2);
        assert_eq!(est.diagnostics.hist_matches, 2);
        assert_eq!(est.diagnostics.live_matches, 1);
    }

    #[test]
    fn test_null_labels_are_ignored() {
        let mut hist = rows(&cond(), CallType::Run, 10);
        hist.extend((0..50).map(|_| Observation::new(cond(), None)));
        let est = matcher(20, 0.5).estimate(&cond(), &hist, &[]);
        assert_eq!(est.diagnostics.hist_matches, 10);
    }

    #[test]
    fn test_no_live_rows_returns_smoothed_historical() {
        let mut hist = rows(&cond(), CallType::Run, 10);
        hist.extend(rows(&cond(), CallType::PassDropback, 10));
        let est = matcher(20, 0.5).estimate(&cond(), &hist, &[]);

        let vocab = CallType::known();
        let counts: Counts<CallType> = [(CallType::Run, 10), (CallType::PassDropback, 10)]
            .into_iter()
            .collect();
        assert_eq!(est.diagnostics.live_weight, 0.0);
        assert_eq!(est.probabilities, laplace(&counts, &vocab, 0.5));
        assert!((est.probabilities[&CallType::Run] - est.probabilities[&CallType::PassDropback]).abs() < 1e-12);
    }

    #[test]
    fn test_live_saturates_at_threshold() {
        let mut hist = rows(&cond(), CallType::Run, 10);
        hist.extend(rows(&cond(), CallType::PassDropback, 10));
        let live = rows(&cond(), CallType::PassQuick, 12);
        let est = matcher(12, 1e-6).estimate(&cond(), &hist, &live);

        assert_eq!(est.diagnostics.live_weight, 1.0);
        assert!(est.probabilities[&CallType::PassQuick] > 0.999);
        assert!((total(&est.probabilities) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_live_weight_ramp() {
        assert_eq!(live_weight(0, 20), 0.0);
        assert!((live_weight(5, 20) - 0.25).abs() < 1e-12);
        assert_eq!(live_weight(20, 20), 1.0);
        assert_eq!(live_weight(45, 20), 1.0);
        assert_eq!(live_weight(0, 0), 1.0);
    }

    #[test]
    fn test_missing_tags_match_each_other() {
        let level = vec![BackoffLevel::new(vec![Field::Possession, Field::OppPersonnel], 1)];
        let m = Matcher::new(level, BlendConfig::default());
        let hist = rows(&Condition::default(), CallType::Screen, 1);
        let est = m.estimate(&Condition::default(), &hist, &[]);
        assert_eq!(est.diagnostics.level, LevelUsed::Level(0));

        let tagged = Condition::default().with_possession(Possession::Offense);
        let est = m.estimate(&tagged, &hist, &[]);
        assert_eq!(est.diagnostics.level, LevelUsed::Global);
    }

    #[test]
    fn test_estimate_by_clock_keeps_order() {
        let hist = rows(&cond().with_clock(ClockBucket::From2To0), CallType::PassQuick, 10);
        let clocks = [ClockBucket::From2To0, ClockBucket::Other];
        let table = matcher(20, 0.5).estimate_by_clock(&cond(), &hist, &[], &clocks);

        assert_eq!(table.len(), 2);
        assert_eq!(table[0].0, ClockBucket::From2To0);
        assert_eq!(table[0].1.diagnostics.level, LevelUsed::Level(0));
        assert_eq!(table[1].1.diagnostics.level, LevelUsed::Level(1));
    }

    #[test]
    fn test_estimate_variants() {
        let hist = rows(&cond(), CallType::Run, 12);
        let variants = vec![
            ("mid".to_string(), cond()),
            ("own".to_string(), Condition::situation(1, DistanceBucket::Medium, FieldZone::OwnSide, ClockBucket::Other)),
        ];
        let table = matcher(20, 0.5).estimate_variants(&variants, &hist, &[]);
        assert_eq!(table[0].0, "mid");
        assert_eq!(table[0].1.diagnostics.level, LevelUsed::Level(0));
        assert_eq!(table[1].1.diagnostics.level, LevelUsed::Level(1));
    }
}
