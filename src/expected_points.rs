//! Bucketed expected-points model.
//!
//! EP is a table lookup plus arithmetic over a discretized game state; EPA is
//! the value after a play minus the value before it. There is no randomness
//! and nothing is learned.

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::trace;

use crate::config::LeagueMix;
use crate::constants;
use crate::taxonomy::{ClockBucket, DistanceBucket, FieldZone, Turnover, YardsBucket};

/// Immutable EP tables.
#[derive(Clone, Debug)]
pub struct EpTables {
    /// (college, pro) base value per zone.
    pub zone_value: HashMap<FieldZone, (f64, f64)>,
    pub distance_penalty: HashMap<DistanceBucket, f64>,
    /// Indexed by down - 1.
    pub down_penalty: [f64; 4],
    pub down_penalty_fallback: f64,
    pub clock_compression: HashMap<ClockBucket, f64>,
    pub goal_to_go_bonus: f64,
    pub floor: f64,
    pub ceiling: f64,
    pub touchdown: f64,
}

impl Default for EpTables {
    fn default() -> Self {
        EpTables {
            zone_value: constants::EP_BY_ZONE
                .iter()
                .map(|&(zone, college, pro)| (zone, (college, pro)))
                .collect(),
            distance_penalty: constants::EP_DISTANCE_PENALTY.into_iter().collect(),
            down_penalty: constants::EP_DOWN_PENALTY,
            down_penalty_fallback: constants::EP_DOWN_PENALTY_FALLBACK,
            clock_compression: constants::EP_CLOCK_COMPRESSION.into_iter().collect(),
            goal_to_go_bonus: constants::EP_GOAL_TO_GO_BONUS,
            floor: constants::EP_FLOOR,
            ceiling: constants::EP_CEILING,
            touchdown: constants::TOUCHDOWN_POINTS,
        }
    }
}

/// Bucketed pre-snap state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    pub down: u8,
    pub distance: DistanceBucket,
    pub zone: FieldZone,
    pub clock: ClockBucket,
    pub goal_to_go: bool,
}

impl Default for GameState {
    fn default() -> Self {
        GameState {
            down: 1,
            distance: DistanceBucket::Unk,
            zone: FieldZone::Unk,
            clock: ClockBucket::Other,
            goal_to_go: false,
        }
    }
}

impl GameState {
    pub fn new(down: u8, distance: DistanceBucket, zone: FieldZone, clock: ClockBucket, goal_to_go: bool) -> Self {
        GameState {
            down,
            distance,
            zone,
            clock,
            goal_to_go,
        }
    }
}

/// A fully labeled play result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayResult {
    pub first_down: bool,
    pub touchdown: bool,
    pub yards: YardsBucket,
    pub turnover: Turnover,
}

impl PlayResult {
    pub fn touchdown() -> Self {
        PlayResult {
            touchdown: true,
            ..PlayResult::default()
        }
    }

    pub fn turnover(kind: Turnover) -> Self {
        PlayResult {
            turnover: kind,
            ..PlayResult::default()
        }
    }

    pub fn gain(yards: YardsBucket, first_down: bool) -> Self {
        PlayResult {
            first_down,
            yards,
            ..PlayResult::default()
        }
    }
}

/// Result fields as tagged; any of them may still be missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaggedResult {
    pub first_down: Option<bool>,
    pub touchdown: Option<bool>,
    pub yards: Option<YardsBucket>,
    pub turnover: Option<Turnover>,
}

impl TaggedResult {
    /// The result, if every field has been tagged.
    pub fn complete(&self) -> Option<PlayResult> {
        Some(PlayResult {
            first_down: self.first_down?,
            touchdown: self.touchdown?,
            yards: self.yards?,
            turnover: self.turnover?,
        })
    }
}

impl From<PlayResult> for TaggedResult {
    fn from(result: PlayResult) -> Self {
        TaggedResult {
            first_down: Some(result.first_down),
            touchdown: Some(result.touchdown),
            yards: Some(result.yards),
            turnover: Some(result.turnover),
        }
    }
}

/// One row of a play log.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaggedPlay {
    pub state: GameState,
    pub result: TaggedResult,
}

/// Rungs a gain moves the ball along the zone ladder.
fn zone_step(yards: YardsBucket, zone: FieldZone) -> i32 {
    match yards {
        YardsBucket::Over20 => 2,
        YardsBucket::From11To20 => 1,
        YardsBucket::From7To10 => {
            if matches!(zone, FieldZone::BackedUp | FieldZone::OwnSide) {
                1
            } else {
                0
            }
        }
        YardsBucket::Neg => -1,
        YardsBucket::Na | YardsBucket::From0To2 | YardsBucket::From3To6 => 0,
    }
}

/// Distance to go after a play that did not move the chains.
///
/// No recorded gain is treated like a short gain.
fn distance_after(yards: YardsBucket) -> DistanceBucket {
    match yards {
        YardsBucket::From11To20 | YardsBucket::Over20 => DistanceBucket::Short,
        YardsBucket::From7To10 | YardsBucket::From3To6 => DistanceBucket::Medium,
        YardsBucket::From0To2 | YardsBucket::Na => DistanceBucket::Long,
        YardsBucket::Neg => DistanceBucket::XLong,
    }
}

/// State value model.
#[derive(Clone, Debug, Default)]
pub struct EpModel {
    tables: EpTables,
}

impl EpModel {
    pub fn new(tables: EpTables) -> Self {
        EpModel { tables }
    }

    pub fn tables(&self) -> &EpTables {
        &self.tables
    }

    /// Expected points of the team in possession.
    ///
    /// Always within `[floor, ceiling]`.
    pub fn value_of(&self, state: &GameState, mix: LeagueMix) -> f64 {
        let t = &self.tables;
        let (college, pro) = t
            .zone_value
            .get(&state.zone)
            .or_else(|| t.zone_value.get(&FieldZone::Unk))
            .copied()
            .unwrap_or((2.0, 1.8));

        let down_penalty = match state.down {
            1..=4 => t.down_penalty[usize::from(state.down - 1)],
            _ => t.down_penalty_fallback,
        };
        let distance_penalty = t
            .distance_penalty
            .get(&state.distance)
            .or_else(|| t.distance_penalty.get(&DistanceBucket::Unk))
            .copied()
            .unwrap_or(0.0);
        let compression = t.clock_compression.get(&state.clock).copied().unwrap_or(1.0);

        let mut value = (mix.blend(college, pro) + down_penalty + distance_penalty) * compression;
        if state.goal_to_go && state.zone.is_red() {
            value += t.goal_to_go_bonus;
        }
        value.max(t.floor).min(t.ceiling)
    }

    /// State after a non-terminal play.
    ///
    /// Touchdowns and turnovers end the possession; their value is handled
    /// by [`EpModel::value_after`] and the state is returned unchanged.
    pub fn next_state(&self, state: &GameState, result: &PlayResult) -> GameState {
        if result.touchdown || result.turnover.is_turnover() {
            return *state;
        }

        let zone = state.zone.shifted(zone_step(result.yards, state.zone));

        if result.first_down {
            return GameState {
                down: 1,
                distance: DistanceBucket::Medium,
                zone,
                clock: state.clock,
                goal_to_go: state.goal_to_go && zone.is_red(),
            };
        }

        GameState {
            down: state.down.saturating_add(1).min(4),
            distance: distance_after(result.yards),
            zone,
            clock: state.clock,
            goal_to_go: state.goal_to_go,
        }
    }

    /// Value after the play, from the perspective of the team that had the ball.
    pub fn value_after(&self, pre: &GameState, result: &PlayResult, mix: LeagueMix) -> f64 {
        if result.turnover.is_return_touchdown() {
            return -self.tables.touchdown;
        }
        if result.touchdown {
            return self.tables.touchdown;
        }
        if result.turnover.is_turnover() {
            return -self.value_of(pre, mix);
        }
        self.value_of(&self.next_state(pre, result), mix)
    }

    /// EPA of a fully labeled play.
    pub fn epa_of(&self, pre: &GameState, result: &PlayResult, mix: LeagueMix) -> f64 {
        self.value_after(pre, result, mix) - self.value_of(pre, mix)
    }

    /// EPA of a tagged play; `None` until every result field is tagged.
    pub fn epa(&self, pre: &GameState, result: &TaggedResult, mix: LeagueMix) -> Option<f64> {
        match result.complete() {
            Some(r) => Some(self.epa_of(pre, &r, mix)),
            None => {
                trace!(event = "epa_skipped", reason = "incomplete_result");
                None
            }
        }
    }

    /// EPA for every play of a log, in order.
    pub fn epa_batch(&self, plays: &[TaggedPlay], mix: LeagueMix) -> Vec<Option<f64>> {
        plays
            .par_iter()
            .map(|play| self.epa(&play.state, &play.result, mix))
            .collect()
    }
}
