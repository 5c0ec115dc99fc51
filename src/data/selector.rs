use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::model::Label;
use crate::error::DlocError;

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// Which dimension of a frame a selector addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Row,
    Column,
}

impl TryFrom<usize> for Axis {
    type Error = DlocError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        match n {
            0 => Ok(Axis::Row),
            1 => Ok(Axis::Column),
            other => Err(DlocError::InvalidAxis(other)),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-level selectors
// ---------------------------------------------------------------------------

/// How a level is referred to in a named mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LevelKey {
    Name(String),
    /// Zero-based depth.
    Position(usize),
}

impl fmt::Display for LevelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelKey::Name(n) => write!(f, "'{n}'"),
            LevelKey::Position(d) => write!(f, "#{d}"),
        }
    }
}

impl From<&str> for LevelKey {
    fn from(s: &str) -> Self {
        LevelKey::Name(s.to_string())
    }
}

impl From<String> for LevelKey {
    fn from(s: String) -> Self {
        LevelKey::Name(s)
    }
}

impl From<usize> for LevelKey {
    fn from(d: usize) -> Self {
        LevelKey::Position(d)
    }
}

/// What one level is restricted to.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSelector {
    /// Every label of the level.
    Unconstrained,
    Label(Label),
    /// Any of these labels.
    List(Vec<Label>),
    /// Inclusive label range; `None` leaves that side open.
    Range {
        start: Option<Label>,
        end: Option<Label>,
    },
}

impl LevelSelector {
    pub fn label(label: impl Into<Label>) -> Self {
        LevelSelector::Label(label.into())
    }

    pub fn list<L: Into<Label>>(labels: impl IntoIterator<Item = L>) -> Self {
        LevelSelector::List(labels.into_iter().map(Into::into).collect())
    }

    /// Closed range `start ..= end`.
    pub fn between(start: impl Into<Label>, end: impl Into<Label>) -> Self {
        LevelSelector::Range {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Fully open range; selects everything like `Unconstrained`.
    pub fn all() -> Self {
        LevelSelector::Range {
            start: None,
            end: None,
        }
    }

    /// True when the selector places no restriction on its level.
    pub fn is_everything(&self) -> bool {
        matches!(
            self,
            LevelSelector::Unconstrained
                | LevelSelector::Range {
                    start: None,
                    end: None
                }
        )
    }

    /// Whether `label` passes this selector.
    pub fn matches(&self, label: &Label) -> bool {
        match self {
            LevelSelector::Unconstrained => true,
            LevelSelector::Label(l) => l == label,
            LevelSelector::List(ls) => ls.contains(label),
            LevelSelector::Range { start, end } => {
                start.as_ref().map_or(true, |s| label.cmp_value(s).is_ge())
                    && end.as_ref().map_or(true, |e| label.cmp_value(e).is_le())
            }
        }
    }
}

impl From<Label> for LevelSelector {
    fn from(l: Label) -> Self {
        LevelSelector::Label(l)
    }
}

impl From<&str> for LevelSelector {
    fn from(s: &str) -> Self {
        LevelSelector::Label(s.into())
    }
}

impl From<Vec<Label>> for LevelSelector {
    fn from(ls: Vec<Label>) -> Self {
        LevelSelector::List(ls)
    }
}

impl fmt::Display for LevelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSelector::Unconstrained => write!(f, ".."),
            LevelSelector::Label(l) => write!(f, "{l}"),
            LevelSelector::List(ls) => {
                let parts: Vec<String> = ls.iter().map(|l| l.to_string()).collect();
                write!(f, "[{}]", parts.join(","))
            }
            LevelSelector::Range { start, end } => {
                if let Some(s) = start {
                    write!(f, "{s}")?;
                }
                write!(f, "..")?;
                if let Some(e) = end {
                    write!(f, "{e}")?;
                }
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Axis selectors
// ---------------------------------------------------------------------------

/// Level name (or depth) → selector, in caller order.
///
/// Keys may repeat; the merger rejects two constraints on one depth.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NamedSelector {
    entries: Vec<(LevelKey, LevelSelector)>,
}

impl NamedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint, builder style.
    pub fn with(mut self, key: impl Into<LevelKey>, selector: impl Into<LevelSelector>) -> Self {
        self.insert(key, selector);
        self
    }

    pub fn insert(&mut self, key: impl Into<LevelKey>, selector: impl Into<LevelSelector>) {
        self.entries.push((key.into(), selector.into()));
    }

    pub fn entries(&self) -> &[(LevelKey, LevelSelector)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, S> FromIterator<(K, S)> for NamedSelector
where
    K: Into<LevelKey>,
    S: Into<LevelSelector>,
{
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        let mut named = NamedSelector::new();
        for (k, s) in iter {
            named.insert(k, s);
        }
        named
    }
}

/// Positional tuple understood by `loc`: one slot per depth, outermost first.
///
/// Slots past the end are `Unconstrained`, so an empty selector picks the whole axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConventionalSelector {
    slots: Vec<LevelSelector>,
}

impl ConventionalSelector {
    /// Selects the whole axis.
    pub fn everything() -> Self {
        Self::default()
    }

    pub fn tuple(slots: Vec<LevelSelector>) -> Self {
        Self { slots }
    }

    /// Outermost-level label.
    pub fn label(label: impl Into<Label>) -> Self {
        Self::tuple(vec![LevelSelector::label(label)])
    }

    /// All slots `Unconstrained`, one per depth.
    pub fn unconstrained(depth: usize) -> Self {
        Self::tuple(vec![LevelSelector::Unconstrained; depth])
    }

    pub fn slots(&self) -> &[LevelSelector] {
        &self.slots
    }

    pub(crate) fn slots_mut(&mut self) -> &mut [LevelSelector] {
        &mut self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl From<LevelSelector> for ConventionalSelector {
    fn from(s: LevelSelector) -> Self {
        Self::tuple(vec![s])
    }
}

impl From<Vec<LevelSelector>> for ConventionalSelector {
    fn from(slots: Vec<LevelSelector>) -> Self {
        Self::tuple(slots)
    }
}

impl fmt::Display for ConventionalSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.slots.iter().map(|s| s.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// A [`ConventionalSelector`] with exactly one slot per level of its axis.
pub type ResolvedAxisSelector = ConventionalSelector;

// ---------------------------------------------------------------------------
// Caller input
// ---------------------------------------------------------------------------

/// What a caller passes for one axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisInput {
    /// Resolved by level name.
    Named(NamedSelector),
    /// Handed to `loc` as is.
    Bare(ConventionalSelector),
}

impl AxisInput {
    /// A bare selector that picks the whole axis.
    pub fn everything() -> Self {
        AxisInput::Bare(ConventionalSelector::everything())
    }
}

impl From<NamedSelector> for AxisInput {
    fn from(n: NamedSelector) -> Self {
        AxisInput::Named(n)
    }
}

impl From<ConventionalSelector> for AxisInput {
    fn from(c: ConventionalSelector) -> Self {
        AxisInput::Bare(c)
    }
}

impl From<LevelSelector> for AxisInput {
    fn from(s: LevelSelector) -> Self {
        AxisInput::Bare(s.into())
    }
}

/// Input to the tuple form of the facade.
#[derive(Debug, Clone, PartialEq)]
pub enum CallerInput {
    /// Rows only; columns unconstrained.
    Axis(AxisInput),
    /// `(rows, columns)`.
    AxisPair(AxisInput, AxisInput),
}

macro_rules! caller_input_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CallerInput {
                fn from(input: $t) -> Self {
                    CallerInput::Axis(input.into())
                }
            }
        )*
    };
}

macro_rules! caller_pair_from {
    ($(($r:ty, $c:ty)),*) => {
        $(
            impl From<($r, $c)> for CallerInput {
                fn from((rows, columns): ($r, $c)) -> Self {
                    CallerInput::AxisPair(rows.into(), columns.into())
                }
            }
        )*
    };
}

caller_input_from!(AxisInput, NamedSelector, ConventionalSelector, LevelSelector);

caller_pair_from!(
    (AxisInput, AxisInput),
    (NamedSelector, NamedSelector),
    (NamedSelector, ConventionalSelector),
    (ConventionalSelector, NamedSelector),
    (ConventionalSelector, ConventionalSelector)
);

/// The selector handed to the conventional accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeSelector {
    /// One axis; the other is implicitly everything.
    Single {
        axis: Axis,
        selector: ConventionalSelector,
    },
    Pair {
        rows: ConventionalSelector,
        columns: ConventionalSelector,
    },
}

// ---------------------------------------------------------------------------
// Assignment values
// ---------------------------------------------------------------------------

/// Value written into a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Assign {
    /// Broadcast to every selected cell.
    Scalar(f64),
    /// One value per selected cell, row-major.
    Values(Vec<f64>),
    /// Exactly the selection's shape.
    Grid(Vec<Vec<f64>>),
}

impl From<f64> for Assign {
    fn from(v: f64) -> Self {
        Assign::Scalar(v)
    }
}

impl From<Vec<f64>> for Assign {
    fn from(v: Vec<f64>) -> Self {
        Assign::Values(v)
    }
}

impl From<Vec<Vec<f64>>> for Assign {
    fn from(v: Vec<Vec<f64>>) -> Self {
        Assign::Grid(v)
    }
}
