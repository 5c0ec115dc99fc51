//! Selection options: how the engine settles ambiguous level names and
//! repeated constraints.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// What to do when a level name occurs at more than one depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateLevelPolicy {
    /// Resolve to the outermost level carrying the name.
    #[default]
    FirstMatch,
    /// Fail with `DuplicateLevelName`.
    Reject,
}

/// What to do when two constraints address the same depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RepeatedConstraintPolicy {
    /// Always fail with `ConflictingLevelConstraint`.
    #[default]
    Reject,
    /// Accept a repeat that is identical to the first constraint.
    MergeIdentical,
}

/// Options threaded through level resolution and merging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOptions {
    pub duplicate_levels: DuplicateLevelPolicy,
    pub repeated_constraints: RepeatedConstraintPolicy,
}

impl SelectOptions {
    /// Read options from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading options file {}", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing selection options")
    }
}
