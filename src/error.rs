//! Error types for selection and frame construction.

use thiserror::Error;

use crate::data::model::{format_key, Label};
use crate::data::selector::{Axis, LevelKey};

/// Everything that can go wrong while resolving or applying a selection.
#[derive(Debug, Error, PartialEq)]
pub enum DlocError {
    /// Only 0 (rows) and 1 (columns) exist.
    #[error("No axis {0}; expected 0 (rows) or 1 (columns)")]
    InvalidAxis(usize),

    /// An index or frame was built from inconsistent parts.
    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    /// A named mapping refers to a level the axis does not have.
    #[error("Unknown {axis} level {key}")]
    UnknownLevel { axis: Axis, key: LevelKey },

    /// A level name is carried by several depths and the options forbid guessing.
    #[error("Level name '{name}' is ambiguous on the {axis} axis")]
    DuplicateLevelName { axis: Axis, name: String },

    /// Two constraints landed on the same depth.
    #[error("Conflicting constraints for {axis} level at depth {depth}")]
    ConflictingLevelConstraint { axis: Axis, depth: usize },

    /// A positional tuple has more slots than the axis has levels.
    #[error("Too many indexers for the {axis} axis: {given} given, {depth} levels")]
    TooManyIndexers {
        axis: Axis,
        given: usize,
        depth: usize,
    },

    /// A label does not occur in its level.
    #[error("Label {label} not found in {axis} level at depth {depth}")]
    LabelNotFound {
        axis: Axis,
        depth: usize,
        label: Label,
    },

    /// Every label exists but their combination does not.
    #[error("Key {} not found on the {axis} axis", format_key(.key))]
    KeyNotFound { axis: Axis, key: Vec<Label> },

    /// The assigned value does not fit the selection.
    #[error("Cannot assign {found} values to a selection of shape {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        found: usize,
    },

    /// A selector expression could not be parsed.
    #[error("Invalid selector expression: {0}")]
    Parse(String),
}

/// A convenience `Result` type alias using the crate's `DlocError` type.
pub type Result<T> = std::result::Result<T, DlocError>;
