use clap::Parser;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

use crate::core::modes::{Mode, Variant};

fn is_false(b: &bool) -> bool {
    !b
}

fn negate<S: Serializer>(b: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(!b)
}

/// Inspect the ranked leaderboard of a map from a JSON dump of maps and scores.
#[derive(Debug, Parser, Serialize)]
pub struct Cli {
    /// JSON dump holding `maps` and `scores`
    #[arg(long)]
    #[serde(skip)]
    pub data: PathBuf,

    /// md5 hash of the map
    #[arg(long)]
    #[serde(skip)]
    pub map: String,

    #[arg(long, default_value = "std")]
    #[serde(skip)]
    pub mode: Mode,

    #[arg(long, default_value = "vanilla")]
    #[serde(skip)]
    pub variant: Variant,

    /// Also print the placement of this user
    #[arg(long)]
    #[serde(skip)]
    pub user: Option<u64>,

    /// Number of rows to print
    #[arg(long, default_value_t = 10)]
    #[serde(skip)]
    pub top: usize,

    /// Settings file, defaults to `leaderboard.yaml`
    #[arg(long)]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<usize>,

    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_level: Option<String>,

    /// Build the leaderboard without keeping it in the cache
    #[arg(long)]
    #[serde(
        skip_serializing_if = "is_false",
        rename = "cache_leaderboards",
        serialize_with = "negate"
    )]
    pub no_cache: bool,
}
