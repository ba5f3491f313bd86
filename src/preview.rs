//! Situational previews composed from the engines.
//!
//! The dashboard shows a 4th-down decision preview right after a failed
//! 3rd down, and a kick-or-go-for-two preview right after a touchdown.

use crate::condition::{count_labels, Condition, Observation, SITUATION_FIELDS};
use crate::config::LeagueMix;
use crate::distribution::{mode, Counts, Distribution};
use crate::expected_points::{EpModel, GameState, PlayResult};
use crate::priors::{fg_in_range, posterior_mean, PriorEngine};
use crate::taxonomy::{CallType, FourthDecision, TwoPointChoice};

/// Projected 4th-down decision after a failed 3rd down.
#[derive(Clone, Debug, PartialEq)]
pub struct FourthDownPreview {
    pub state: GameState,
    pub fg_in_range: bool,
    pub probabilities: Distribution<FourthDecision>,
    pub most_likely: FourthDecision,
}

impl FourthDownPreview {
    pub fn p(&self, decision: FourthDecision) -> f64 {
        self.probabilities.get(&decision).copied().unwrap_or(0.0)
    }

    /// Anything but going for it.
    pub fn p_no_go(&self) -> f64 {
        1.0 - self.p(FourthDecision::Go)
    }
}

/// Shared engines and knobs for previews.
#[derive(Clone, Copy, Debug)]
pub struct PreviewContext<'a> {
    pub priors: &'a PriorEngine,
    pub ep: &'a EpModel,
    pub mix: LeagueMix,
    pub strength: f64,
}

impl PreviewContext<'_> {
    /// 4th-down preview for a labeled 3rd-down play.
    ///
    /// `situation` carries the tags the state does not (possession, quarter,
    /// hurry-up). `live` is the live call-type log; its 4th-down rows are
    /// read as decisions. `None` unless the play was a 3rd down with no first
    /// down, no touchdown and no turnover.
    pub fn fourth_down_preview(
        &self,
        situation: &Condition,
        pre: &GameState,
        result: &PlayResult,
        live: &[Observation<CallType>],
    ) -> Option<FourthDownPreview> {
        if pre.down != 3 || result.first_down || result.touchdown || result.turnover.is_turnover() {
            return None;
        }

        let state = self.ep.next_state(pre, result);
        if state.down != 4 {
            return None;
        }

        let condition = Condition {
            down: Some(4),
            distance: state.distance,
            zone: state.zone,
            clock: Some(state.clock),
            goal_to_go: state.goal_to_go,
            ..situation.clone()
        };
        let in_range = fg_in_range(state.zone, self.mix);

        let decisions: Vec<Observation<FourthDecision>> = live
            .iter()
            .filter(|o| o.condition.down == Some(4))
            .map(|o| o.map_label(|&call| FourthDecision::from_call(call)))
            .collect();
        let counts = count_labels(&decisions, &condition, &SITUATION_FIELDS);

        let alpha = self.priors.fourth_down_alpha(
            state.distance,
            state.zone,
            self.mix,
            self.strength,
            in_range,
        );
        let probabilities = posterior_mean(&alpha, &counts);
        let most_likely = mode(&probabilities).unwrap_or(FourthDecision::Punt);

        Some(FourthDownPreview {
            state,
            fg_in_range: in_range,
            probabilities,
            most_likely,
        })
    }

    /// Kick vs two-point posterior; only defined right after a touchdown.
    pub fn two_point_preview(
        &self,
        result: &PlayResult,
        live_choices: &Counts<TwoPointChoice>,
    ) -> Option<Distribution<TwoPointChoice>> {
        if !result.touchdown {
            return None;
        }
        let alpha = self.priors.two_point_alpha(self.strength);
        Some(posterior_mean(&alpha, live_choices))
    }
}
