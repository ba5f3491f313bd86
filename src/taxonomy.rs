//! Bucket vocabulary.
//!
//! Every discretized dimension the core reasons about is a closed enum with a
//! fixed label per variant. Labels are the strings the tagging UI writes, so
//! parsing is exact (`from_label`) or total (`parse_lenient`, which falls back
//! to the dimension's default bucket).

use std::fmt;
use std::hash::Hash;

/// A closed, labelled vocabulary.
pub trait Bucket: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every variant, in declaration order.
    fn all() -> &'static [Self];

    /// The label written by the tagger.
    fn label(self) -> &'static str;

    /// Exact label lookup.
    fn from_label(label: &str) -> Option<Self>;

    /// True for the "unknown" sentinel of dimensions that carry one.
    fn is_unknown(self) -> bool {
        false
    }

    /// Total label lookup: out-of-vocabulary labels map to the default bucket.
    fn parse_lenient(label: &str) -> Self
    where
        Self: Default,
    {
        Self::from_label(label).unwrap_or_default()
    }

    /// The vocabulary with the unknown sentinel removed.
    fn known() -> Vec<Self> {
        Self::all().iter().copied().filter(|b| !b.is_unknown()).collect()
    }
}

macro_rules! buckets {
    (
        $(#[$meta:meta])*
        pub enum $name:ident $(unknown = $unk:ident)? {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl Bucket for $name {
            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            fn from_label(label: &str) -> Option<Self> {
                match label.trim() {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }

            $(
            fn is_unknown(self) -> bool {
                self == $name::$unk
            }
            )?
        }

        $(
        impl Default for $name {
            fn default() -> Self {
                $name::$unk
            }
        }
        )?

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

buckets! {
    /// Yards-to-gain bucket.
    pub enum DistanceBucket unknown = Unk {
        Short => "SHORT",
        Medium => "MEDIUM",
        Long => "LONG",
        XLong => "X_LONG",
        Unk => "UNK",
    }
}

buckets! {
    /// Field position bucket. The five known zones form the zone ladder.
    pub enum FieldZone unknown = Unk {
        BackedUp => "BACKED_UP",
        OwnSide => "OWN_SIDE",
        Midfield => "MIDFIELD",
        HighRed => "HIGH_RED",
        LowRed => "LOW_RED",
        Unk => "UNK",
    }
}

impl FieldZone {
    /// Deepest own territory first, nearest to scoring last.
    pub const LADDER: [FieldZone; 5] = [
        FieldZone::BackedUp,
        FieldZone::OwnSide,
        FieldZone::Midfield,
        FieldZone::HighRed,
        FieldZone::LowRed,
    ];

    /// Position on the ladder, `None` for `Unk`.
    pub fn rung(self) -> Option<usize> {
        Self::LADDER.iter().position(|&z| z == self)
    }

    /// Move `step` rungs along the ladder, clamped to its ends.
    ///
    /// `Unk` has no rung and stays `Unk`.
    pub fn shifted(self, step: i32) -> FieldZone {
        match self.rung() {
            Some(i) => {
                let last = (Self::LADDER.len() - 1) as i32;
                let j = (i as i32).saturating_add(step).clamp(0, last);
                Self::LADDER[j as usize]
            }
            None => FieldZone::Unk,
        }
    }

    /// HIGH_RED or LOW_RED.
    pub fn is_red(self) -> bool {
        matches!(self, FieldZone::HighRed | FieldZone::LowRed)
    }
}

buckets! {
    /// Game clock bucket.
    pub enum ClockBucket {
        From15To10 => "15-10",
        From10To7 => "10-7",
        From7To6 => "7-6",
        From5To3 => "5-3",
        From3To2 => "3-2",
        From2To0 => "2-0",
        ScriptStart => "SCRIPT_START",
        Other => "OTHER",
    }
}

impl Default for ClockBucket {
    fn default() -> Self {
        ClockBucket::Other
    }
}

buckets! {
    /// What the play is.
    pub enum CallType {
        Run => "RUN",
        PassQuick => "PASS_QUICK",
        PassDropback => "PASS_DROPBACK",
        PlayAction => "PLAY_ACTION",
        Screen => "SCREEN",
        Shot => "SHOT",
        Punt => "PUNT",
        FieldGoal => "FIELD_GOAL",
        Kickoff => "KICKOFF",
        PatKick => "PAT_KICK",
        TwoPoint => "TWO_POINT",
        Sack => "SACK",
        Penalty => "PENALTY",
    }
}

impl CallType {
    /// Call types the league tables author pseudo-counts for.
    pub const OFFENSE: [CallType; 8] = [
        CallType::Run,
        CallType::PassQuick,
        CallType::PassDropback,
        CallType::PlayAction,
        CallType::Screen,
        CallType::Shot,
        CallType::Sack,
        CallType::Penalty,
    ];

    /// The pass-like call types.
    pub const PASS_FAMILY: [CallType; 5] = [
        CallType::PassQuick,
        CallType::PassDropback,
        CallType::PlayAction,
        CallType::Screen,
        CallType::Shot,
    ];

    pub fn is_pass_family(self) -> bool {
        Self::PASS_FAMILY.contains(&self)
    }
}

buckets! {
    /// Gain bucket of a play result.
    pub enum YardsBucket {
        Na => "NA",
        Neg => "NEG",
        From0To2 => "0-2",
        From3To6 => "3-6",
        From7To10 => "7-10",
        From11To20 => "11-20",
        Over20 => "21+",
    }
}

impl Default for YardsBucket {
    fn default() -> Self {
        YardsBucket::Na
    }
}

buckets! {
    pub enum Turnover {
        None => "NONE",
        Int => "INT",
        Fumble => "FUMBLE",
        Pick6 => "PICK6",
        Scoop6 => "SCOOP6",
    }
}

impl Default for Turnover {
    fn default() -> Self {
        Turnover::None
    }
}

impl Turnover {
    /// Returned for a touchdown by the defense.
    pub fn is_return_touchdown(self) -> bool {
        matches!(self, Turnover::Pick6 | Turnover::Scoop6)
    }

    pub fn is_turnover(self) -> bool {
        self != Turnover::None
    }
}

buckets! {
    /// Rushers sent: four or five-plus.
    pub enum PressureTier unknown = Unk {
        Four => "4",
        FivePlus => "5+",
        Unk => "UNK",
    }
}

buckets! {
    /// Whether a timeout was used before the next snap.
    pub enum TimeoutUsage {
        No => "NO",
        Yes => "YES",
    }
}

impl From<bool> for TimeoutUsage {
    fn from(used: bool) -> Self {
        if used {
            TimeoutUsage::Yes
        } else {
            TimeoutUsage::No
        }
    }
}

buckets! {
    /// 4th-down tri-decision.
    pub enum FourthDecision {
        Go => "GO",
        Punt => "PUNT",
        FieldGoal => "FIELD_GOAL",
    }
}

impl FourthDecision {
    /// Decision implied by the call that was run on 4th down.
    pub fn from_call(call: CallType) -> Self {
        match call {
            CallType::Punt => FourthDecision::Punt,
            CallType::FieldGoal => FourthDecision::FieldGoal,
            _ => FourthDecision::Go,
        }
    }
}

buckets! {
    /// Try after a touchdown.
    pub enum TwoPointChoice {
        Kick => "KICK",
        Two => "TWO",
    }
}

buckets! {
    /// Which side of the ball the tagged team is on.
    pub enum Possession unknown = Unk {
        Offense => "PV_OFF",
        Defense => "PV_DEF",
        Unk => "UNK",
    }
}

buckets! {
    pub enum Personnel unknown = Unk {
        Unk => "UNK",
        P10 => "10",
        P11 => "11",
        P12 => "12",
        P13 => "13",
        P20 => "20",
        P21 => "21",
        P22 => "22",
    }
}

buckets! {
    pub enum Formation unknown = Unk {
        Unk => "UNK",
        TwoByTwo => "2x2",
        ThreeByOne => "3x1",
        Trips => "trips",
        Bunch => "bunch",
        Empty => "empty",
        Compressed => "compressed",
    }
}

buckets! {
    /// Safeties deep.
    pub enum DefShell unknown = Unk {
        Unk => "UNK",
        Zero => "0",
        One => "1",
        Two => "2",
    }
}
