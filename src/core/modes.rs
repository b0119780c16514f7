use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Privilege bit carried by accounts whose scores are publicly ranked.
pub const USER_PUBLIC_PRIVILEGE: u64 = 1 << 0;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[strum(to_string = "standard", serialize = "std")]
    #[serde(alias = "std")]
    Standard,
    Taiko,
    Catch,
    Mania,
}

impl Mode {
    /// Numeric id stored in the `play_mode` column.
    pub fn as_id(&self) -> u8 {
        match self {
            Mode::Standard => 0,
            Mode::Taiko => 1,
            Mode::Catch => 2,
            Mode::Mania => 3,
        }
    }
}

/// Scoring ruleset family. Selects the score table and which numeric field
/// drives the ranking.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Vanilla,
    #[strum(to_string = "relax", serialize = "rx")]
    Relax,
    #[strum(to_string = "autopilot", serialize = "ap")]
    Autopilot,
}

impl Variant {
    pub fn db_table(&self) -> &'static str {
        match self {
            Variant::Vanilla => "scores",
            Variant::Relax => "scores_relax",
            Variant::Autopilot => "scores_ap",
        }
    }

    /// Whether the leaderboard is ordered by performance instead of raw score.
    pub fn uses_ppboard(&self) -> bool {
        match self {
            Variant::Vanilla => false,
            Variant::Relax | Variant::Autopilot => true,
        }
    }

    pub fn scoring_column(&self) -> &'static str {
        if self.uses_ppboard() {
            "pp"
        } else {
            "score"
        }
    }
}

/// Where a piece of leaderboard data was sourced from. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    None,
    Cache,
    Database,
    Api,
}

/// Completion status stored with each score row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Failed = 0,
    Quit = 1,
    Completed = 2,
    Best = 3,
}

impl Completion {
    pub fn as_id(&self) -> u8 {
        *self as u8
    }
}
