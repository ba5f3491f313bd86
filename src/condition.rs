//! Situational conditions and labeled observations.

use serde::{Deserialize, Serialize};

use crate::distribution::Counts;
use crate::taxonomy::{
    Bucket, ClockBucket, DefShell, DistanceBucket, FieldZone, Formation, Personnel, Possession,
    PressureTier,
};

/// A dimension a condition can be matched on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Possession,
    Quarter,
    ClockBucket,
    HurryUp,
    Down,
    DistBucket,
    FieldZone,
    GoalToGo,
    OppPersonnel,
    OppFormation,
    DefShell,
    Pressure,
}

/// Fields that describe the pre-snap situation, used to count live labels
/// for the posterior engines.
pub const SITUATION_FIELDS: [Field; 8] = [
    Field::Possession,
    Field::Quarter,
    Field::Down,
    Field::DistBucket,
    Field::FieldZone,
    Field::ClockBucket,
    Field::HurryUp,
    Field::GoalToGo,
];

/// A fully specified, bucketed game situation.
///
/// Unknown dimensions are `UNK`/`None`/`false`, never absent, so two
/// conditions that both lack a tag still compare equal on it. An untagged
/// clock is `None` and never matches an explicit `OTHER`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Condition {
    pub possession: Possession,
    pub quarter: Option<u8>,
    pub clock: Option<ClockBucket>,
    pub hurry_up: bool,
    pub down: Option<u8>,
    pub distance: DistanceBucket,
    pub zone: FieldZone,
    pub goal_to_go: bool,
    pub personnel: Personnel,
    pub formation: Formation,
    pub shell: DefShell,
    pub pressure: PressureTier,
}

impl Condition {
    /// Condition for a down/distance/zone/clock situation, everything else unknown.
    pub fn situation(down: u8, distance: DistanceBucket, zone: FieldZone, clock: ClockBucket) -> Self {
        Condition {
            down: Some(down),
            distance,
            zone,
            clock: Some(clock),
            ..Condition::default()
        }
    }

    pub fn with_possession(mut self, possession: Possession) -> Self {
        self.possession = possession;
        self
    }

    pub fn with_quarter(mut self, quarter: u8) -> Self {
        self.quarter = Some(quarter);
        self
    }

    pub fn with_hurry_up(mut self, hurry_up: bool) -> Self {
        self.hurry_up = hurry_up;
        self
    }

    pub fn with_goal_to_go(mut self, goal_to_go: bool) -> Self {
        self.goal_to_go = goal_to_go;
        self
    }

    pub fn with_clock(mut self, clock: ClockBucket) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Exact equality on one field.
    pub fn agrees_on(&self, other: &Condition, field: Field) -> bool {
        match field {
            Field::Possession => self.possession == other.possession,
            Field::Quarter => self.quarter == other.quarter,
            Field::ClockBucket => self.clock == other.clock,
            Field::HurryUp => self.hurry_up == other.hurry_up,
            Field::Down => self.down == other.down,
            Field::DistBucket => self.distance == other.distance,
            Field::FieldZone => self.zone == other.zone,
            Field::GoalToGo => self.goal_to_go == other.goal_to_go,
            Field::OppPersonnel => self.personnel == other.personnel,
            Field::OppFormation => self.formation == other.formation,
            Field::DefShell => self.shell == other.shell,
            Field::Pressure => self.pressure == other.pressure,
        }
    }

    /// Exact equality on every field of the projection.
    pub fn matches(&self, other: &Condition, fields: &[Field]) -> bool {
        fields.iter().all(|&f| self.agrees_on(other, f))
    }
}

/// One tagged row: a situation plus an optional label.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation<L> {
    pub condition: Condition,
    pub label: Option<L>,
}

impl<L> Observation<L> {
    pub fn new(condition: Condition, label: Option<L>) -> Self {
        Observation { condition, label }
    }

    pub fn labeled(condition: Condition, label: L) -> Self {
        Observation {
            condition,
            label: Some(label),
        }
    }

    /// Relabel, e.g. call type into 4th-down decision.
    pub fn map_label<M>(&self, f: impl Fn(&L) -> M) -> Observation<M> {
        Observation {
            condition: self.condition.clone(),
            label: self.label.as_ref().map(f),
        }
    }
}

/// Counts of non-null labels among observations matching `condition` on `fields`.
pub fn count_labels<L: Bucket>(
    observations: &[Observation<L>],
    condition: &Condition,
    fields: &[Field],
) -> Counts<L> {
    let mut counts = Counts::new();
    for obs in observations {
        if let Some(label) = obs.label {
            if obs.condition.matches(condition, fields) {
                *counts.entry(label).or_insert(0) += 1;
            }
        }
    }
    counts
}
