//! Authored league tables.
//!
//! Call-mix rows are pseudo-counts in [`CallType::OFFENSE`] order:
//! RUN, PASS_QUICK, PASS_DROPBACK, PLAY_ACTION, SCREEN, SHOT, SACK, PENALTY.

use crate::taxonomy::{CallType, ClockBucket, DistanceBucket, FieldZone};

use crate::taxonomy::ClockBucket as C;
use crate::taxonomy::DistanceBucket::{Long, Medium, Short, XLong};
use crate::taxonomy::FieldZone::{BackedUp, HighRed, LowRed, Midfield, OwnSide};

/// Pseudo-counts over the eight offensive call types.
pub type CallRow = [f64; 8];

/// College archetype call mix by (down, distance).
pub const COLLEGE_CALL_PRIORS: [((u8, DistanceBucket), CallRow); 16] = [
    ((1, Short), [40.0, 16.0, 12.0, 10.0, 6.0, 6.0, 1.0, 1.0]),
    ((1, Medium), [28.0, 18.0, 18.0, 12.0, 8.0, 8.0, 1.0, 1.0]),
    ((1, Long), [16.0, 14.0, 28.0, 10.0, 10.0, 10.0, 1.0, 1.0]),
    ((1, XLong), [10.0, 12.0, 34.0, 8.0, 12.0, 12.0, 1.0, 1.0]),
    ((2, Short), [36.0, 18.0, 12.0, 10.0, 6.0, 6.0, 1.0, 1.0]),
    ((2, Medium), [24.0, 18.0, 22.0, 12.0, 8.0, 8.0, 1.0, 1.0]),
    ((2, Long), [12.0, 14.0, 32.0, 10.0, 12.0, 10.0, 1.0, 1.0]),
    ((2, XLong), [8.0, 12.0, 36.0, 8.0, 14.0, 12.0, 1.0, 1.0]),
    ((3, Short), [24.0, 20.0, 18.0, 8.0, 6.0, 6.0, 1.0, 1.0]),
    ((3, Medium), [10.0, 16.0, 38.0, 8.0, 12.0, 12.0, 2.0, 2.0]),
    ((3, Long), [6.0, 12.0, 44.0, 6.0, 14.0, 14.0, 3.0, 2.0]),
    ((3, XLong), [4.0, 10.0, 46.0, 4.0, 16.0, 16.0, 3.0, 1.0]),
    ((4, Short), [18.0, 12.0, 16.0, 4.0, 8.0, 6.0, 2.0, 2.0]),
    ((4, Medium), [8.0, 12.0, 34.0, 3.0, 16.0, 14.0, 2.0, 1.0]),
    ((4, Long), [5.0, 10.0, 40.0, 2.0, 18.0, 18.0, 2.0, 1.0]),
    ((4, XLong), [4.0, 8.0, 44.0, 2.0, 20.0, 18.0, 2.0, 0.0]),
];

/// Pro archetype call mix by (down, distance).
pub const PRO_CALL_PRIORS: [((u8, DistanceBucket), CallRow); 16] = [
    ((1, Short), [34.0, 20.0, 12.0, 10.0, 6.0, 6.0, 1.0, 1.0]),
    ((1, Medium), [22.0, 20.0, 22.0, 12.0, 8.0, 8.0, 1.0, 1.0]),
    ((1, Long), [10.0, 14.0, 36.0, 8.0, 14.0, 14.0, 2.0, 2.0]),
    ((1, XLong), [6.0, 12.0, 40.0, 6.0, 16.0, 16.0, 2.0, 2.0]),
    ((2, Short), [28.0, 22.0, 14.0, 10.0, 6.0, 6.0, 2.0, 2.0]),
    ((2, Medium), [16.0, 18.0, 30.0, 10.0, 12.0, 10.0, 2.0, 2.0]),
    ((2, Long), [8.0, 12.0, 44.0, 6.0, 16.0, 12.0, 2.0, 2.0]),
    ((2, XLong), [6.0, 10.0, 46.0, 5.0, 16.0, 13.0, 2.0, 2.0]),
    ((3, Short), [14.0, 22.0, 30.0, 6.0, 12.0, 10.0, 3.0, 3.0]),
    ((3, Medium), [6.0, 16.0, 52.0, 4.0, 12.0, 8.0, 2.0, 2.0]),
    ((3, Long), [4.0, 12.0, 56.0, 3.0, 12.0, 8.0, 3.0, 2.0]),
    ((3, XLong), [3.0, 10.0, 58.0, 2.0, 13.0, 8.0, 4.0, 2.0]),
    ((4, Short), [14.0, 14.0, 40.0, 2.0, 14.0, 10.0, 3.0, 3.0]),
    ((4, Medium), [5.0, 12.0, 58.0, 2.0, 14.0, 7.0, 1.0, 1.0]),
    ((4, Long), [3.0, 10.0, 60.0, 2.0, 13.0, 8.0, 2.0, 2.0]),
    ((4, XLong), [2.0, 8.0, 62.0, 2.0, 14.0, 8.0, 2.0, 2.0]),
];

/// Used for both archetypes when (down, distance) is not authored.
pub const GENERIC_CALL_PRIOR: CallRow = [20.0, 15.0, 25.0, 10.0, 10.0, 10.0, 5.0, 5.0];

/// Punt and field-goal pseudo-count on 4th down, before strength scaling.
pub const KICK_PSEUDO_COUNT: f64 = 0.7;

pub const ZONE_MULTIPLIERS: [(FieldZone, &[(CallType, f64)]); 4] = [
    (
        LowRed,
        &[(CallType::Run, 1.25), (CallType::Shot, 0.70), (CallType::Screen, 0.90)],
    ),
    (HighRed, &[(CallType::Run, 1.10), (CallType::Shot, 0.85)]),
    (OwnSide, &[(CallType::Shot, 0.95)]),
    (
        BackedUp,
        &[(CallType::Run, 0.85), (CallType::PassQuick, 1.10), (CallType::Screen, 1.10)],
    ),
];

pub const CLOCK_MULTIPLIERS: [(ClockBucket, &[(CallType, f64)]); 3] = [
    (
        C::ScriptStart,
        &[(CallType::PlayAction, 1.10), (CallType::Shot, 1.05)],
    ),
    (C::From15To10, &[(CallType::PlayAction, 1.05)]),
    (
        C::From2To0,
        &[(CallType::PassQuick, 1.10), (CallType::Shot, 0.90), (CallType::Run, 0.90)],
    ),
];

pub const HURRY_UP_MULTIPLIERS: &[(CallType, f64)] = &[
    (CallType::PassQuick, 1.15),
    (CallType::Screen, 1.05),
    (CallType::PlayAction, 0.85),
];

pub const GOAL_TO_GO_MULTIPLIERS: &[(CallType, f64)] = &[
    (CallType::Run, 1.20),
    (CallType::Shot, 0.80),
    (CallType::PlayAction, 1.05),
];

pub const AFTER_FIRST_DOWN_MULTIPLIERS: &[(CallType, f64)] =
    &[(CallType::Run, 1.05), (CallType::PlayAction, 1.05)];

/// (four rushers, five-plus) pseudo-counts by (down, distance).
pub const PRESSURE_PRIORS: [((u8, DistanceBucket), [f64; 2]); 16] = [
    ((1, Short), [34.0, 6.0]),
    ((1, Medium), [32.0, 8.0]),
    ((1, Long), [30.0, 10.0]),
    ((1, XLong), [28.0, 12.0]),
    ((2, Short), [32.0, 8.0]),
    ((2, Medium), [30.0, 10.0]),
    ((2, Long), [28.0, 12.0]),
    ((2, XLong), [26.0, 14.0]),
    ((3, Short), [30.0, 10.0]),
    ((3, Medium), [26.0, 14.0]),
    ((3, Long), [24.0, 16.0]),
    ((3, XLong), [22.0, 18.0]),
    ((4, Short), [26.0, 14.0]),
    ((4, Medium), [22.0, 18.0]),
    ((4, Long), [20.0, 20.0]),
    ((4, XLong), [18.0, 22.0]),
];

pub const PRESSURE_FALLBACK: [f64; 2] = [30.0, 10.0];

/// (no timeout, timeout) pseudo-counts by (quarter, clock, hurry-up).
pub const TIMEOUT_PRIORS: [((u8, ClockBucket, bool), [f64; 2]); 8] = [
    ((2, C::From3To2, false), [34.0, 6.0]),
    ((2, C::From2To0, false), [28.0, 12.0]),
    ((2, C::From3To2, true), [26.0, 14.0]),
    ((2, C::From2To0, true), [18.0, 22.0]),
    ((4, C::From3To2, false), [32.0, 8.0]),
    ((4, C::From2To0, false), [24.0, 16.0]),
    ((4, C::From3To2, true), [24.0, 16.0]),
    ((4, C::From2To0, true), [16.0, 24.0]),
];

pub const TIMEOUT_FALLBACK: [f64; 2] = [36.0, 4.0];

/// (GO, FIELD_GOAL, PUNT) pseudo-counts by (distance, zone), college archetype.
pub const COLLEGE_FOURTH_PRIORS: [((DistanceBucket, FieldZone), [f64; 3]); 20] = [
    ((Short, LowRed), [26.0, 10.0, 4.0]),
    ((Short, HighRed), [18.0, 16.0, 6.0]),
    ((Short, Midfield), [10.0, 2.0, 28.0]),
    ((Short, OwnSide), [4.0, 0.5, 35.0]),
    ((Short, BackedUp), [2.0, 0.2, 38.0]),
    ((Medium, LowRed), [16.0, 16.0, 8.0]),
    ((Medium, HighRed), [10.0, 22.0, 8.0]),
    ((Medium, Midfield), [6.0, 1.0, 33.0]),
    ((Medium, OwnSide), [2.0, 0.2, 38.0]),
    ((Medium, BackedUp), [1.0, 0.1, 39.0]),
    ((Long, LowRed), [8.0, 26.0, 6.0]),
    ((Long, HighRed), [4.0, 30.0, 6.0]),
    ((Long, Midfield), [3.0, 0.5, 36.0]),
    ((Long, OwnSide), [1.0, 0.1, 39.0]),
    ((Long, BackedUp), [0.5, 0.1, 39.4]),
    ((XLong, LowRed), [5.0, 30.0, 5.0]),
    ((XLong, HighRed), [3.0, 32.0, 5.0]),
    ((XLong, Midfield), [2.0, 0.2, 37.8]),
    ((XLong, OwnSide), [0.5, 0.1, 39.4]),
    ((XLong, BackedUp), [0.2, 0.1, 39.7]),
];

/// (GO, FIELD_GOAL, PUNT) pseudo-counts by (distance, zone), pro archetype.
pub const PRO_FOURTH_PRIORS: [((DistanceBucket, FieldZone), [f64; 3]); 20] = [
    ((Short, LowRed), [22.0, 14.0, 4.0]),
    ((Short, HighRed), [14.0, 22.0, 4.0]),
    ((Short, Midfield), [8.0, 8.0, 24.0]),
    ((Short, OwnSide), [3.0, 1.0, 36.0]),
    ((Short, BackedUp), [1.5, 0.2, 38.3]),
    ((Medium, LowRed), [14.0, 20.0, 6.0]),
    ((Medium, HighRed), [8.0, 26.0, 6.0]),
    ((Medium, Midfield), [5.0, 10.0, 25.0]),
    ((Medium, OwnSide), [2.0, 1.0, 37.0]),
    ((Medium, BackedUp), [1.0, 0.2, 38.8]),
    ((Long, LowRed), [8.0, 30.0, 2.0]),
    ((Long, HighRed), [4.0, 34.0, 2.0]),
    ((Long, Midfield), [3.0, 12.0, 25.0]),
    ((Long, OwnSide), [1.0, 1.0, 38.0]),
    ((Long, BackedUp), [0.5, 0.2, 39.3]),
    ((XLong, LowRed), [5.0, 34.0, 1.0]),
    ((XLong, HighRed), [3.0, 36.0, 1.0]),
    ((XLong, Midfield), [2.0, 10.0, 28.0]),
    ((XLong, OwnSide), [0.5, 0.5, 39.0]),
    ((XLong, BackedUp), [0.2, 0.2, 39.6]),
];

pub const COLLEGE_FOURTH_FALLBACK: [f64; 3] = [6.0, 6.0, 28.0];
pub const PRO_FOURTH_FALLBACK: [f64; 3] = [6.0, 8.0, 26.0];

/// (KICK, TWO) pseudo-counts for the try after a touchdown.
pub const TWO_POINT_PRIOR: [f64; 2] = [36.0, 4.0];

/// Zones a college kicker is in range from.
pub const COLLEGE_FG_ZONES: &[FieldZone] = &[LowRed, HighRed];

/// Zones a pro kicker is in range from.
pub const PRO_FG_ZONES: &[FieldZone] = &[LowRed, HighRed, Midfield];

/// Base expected points by zone: (zone, college, pro).
pub const EP_BY_ZONE: [(FieldZone, f64, f64); 6] = [
    (BackedUp, 0.6, 0.4),
    (OwnSide, 1.2, 1.0),
    (Midfield, 2.0, 1.8),
    (HighRed, 3.4, 3.2),
    (LowRed, 4.8, 4.6),
    (FieldZone::Unk, 2.0, 1.8),
];

/// Behind-the-sticks penalty by distance.
pub const EP_DISTANCE_PENALTY: [(DistanceBucket, f64); 5] = [
    (Short, 0.00),
    (Medium, -0.25),
    (Long, -0.55),
    (XLong, -0.80),
    (DistanceBucket::Unk, -0.35),
];

/// Penalty by down, 1st through 4th.
pub const EP_DOWN_PENALTY: [f64; 4] = [0.00, -0.15, -0.45, -0.80];

/// Penalty for a down outside 1..=4.
pub const EP_DOWN_PENALTY_FALLBACK: f64 = -0.2;

/// Less time, fewer points.
pub const EP_CLOCK_COMPRESSION: [(ClockBucket, f64); 8] = [
    (C::From15To10, 1.00),
    (C::From10To7, 1.00),
    (C::From7To6, 0.98),
    (C::From5To3, 0.95),
    (C::From3To2, 0.92),
    (C::From2To0, 0.88),
    (C::ScriptStart, 1.00),
    (C::Other, 1.00),
];

/// Added for goal-to-go in the red zones.
pub const EP_GOAL_TO_GO_BONUS: f64 = 0.35;

pub const EP_FLOOR: f64 = -1.5;
pub const EP_CEILING: f64 = 6.8;

/// Value of a touchdown, for and against.
pub const TOUCHDOWN_POINTS: f64 = 7.0;
