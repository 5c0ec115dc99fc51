use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::selector::Axis;
use crate::error::{DlocError, Result};

// ---------------------------------------------------------------------------
// Label – a single entry of one index level
// ---------------------------------------------------------------------------

/// A dynamically-typed label mirroring common Pandas index dtypes.
/// Labels are compared by range selectors, so `Label` must be `Ord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so labels sort and compare across dtypes --

impl Label {
    /// Sort group: integers and floats share one so they compare by value.
    fn rank(&self) -> u8 {
        match self {
            Label::Null => 0,
            Label::Bool(_) => 1,
            Label::Integer(_) | Label::Float(_) => 2,
            Label::String(_) => 3,
        }
    }
}

impl Label {
    /// Like `cmp`, but an integer and a float of the same value compare equal.
    /// Range bounds use this.
    pub(crate) fn cmp_value(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Label::Integer(a), Label::Float(b)) => (*a as f64).total_cmp(b),
            (Label::Float(a), Label::Integer(b)) => a.total_cmp(&(*b as f64)),
            _ => self.cmp(other),
        }
    }
}

impl PartialEq for Label {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Label {}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        use Label::*;
        let (ra, rb) = (self.rank(), other.rank());
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Equal values: the integer sorts first.
            (Integer(_), Float(_)) => self.cmp_value(other).then(Ordering::Less),
            (Float(_), Integer(_)) => self.cmp_value(other).then(Ordering::Greater),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Label {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Label::String(s) => s.hash(state),
            Label::Integer(i) => i.hash(state),
            Label::Float(f) => f.to_bits().hash(state),
            Label::Bool(b) => b.hash(state),
            Label::Null => {}
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::String(s) => write!(f, "{s}"),
            Label::Integer(i) => write!(f, "{i}"),
            Label::Float(v) => write!(f, "{v}"),
            Label::Bool(b) => write!(f, "{b}"),
            Label::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::String(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::String(s)
    }
}

impl From<i64> for Label {
    fn from(i: i64) -> Self {
        Label::Integer(i)
    }
}

impl From<f64> for Label {
    fn from(v: f64) -> Self {
        Label::Float(v)
    }
}

impl From<bool> for Label {
    fn from(b: bool) -> Self {
        Label::Bool(b)
    }
}

/// Render a full or partial key as `(A, B)`.
pub fn format_key(key: &[Label]) -> String {
    let parts: Vec<String> = key.iter().map(|l| l.to_string()).collect();
    format!("({})", parts.join(", "))
}

// ---------------------------------------------------------------------------
// MultiIndex – the labels of one axis
// ---------------------------------------------------------------------------

/// Hierarchical labels of one axis.
///
/// Every position carries one label per level, so `tuples[pos].len() == depth()`
/// for all positions. Level names are optional and may repeat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiIndex {
    names: Vec<Option<String>>,
    tuples: Vec<Vec<Label>>,
}

impl MultiIndex {
    /// Build an index from one label tuple per position.
    pub fn from_tuples(tuples: Vec<Vec<Label>>, names: Vec<Option<String>>) -> Result<Self> {
        if names.is_empty() {
            return Err(DlocError::InvalidIndex(
                "an index needs at least one level".to_string(),
            ));
        }
        for (pos, tuple) in tuples.iter().enumerate() {
            if tuple.len() != names.len() {
                return Err(DlocError::InvalidIndex(format!(
                    "position {pos} has {} labels but the index has {} levels",
                    tuple.len(),
                    names.len()
                )));
            }
        }
        Ok(Self { names, tuples })
    }

    /// Convenience constructor taking named levels.
    pub fn from_named_tuples<L, N>(tuples: Vec<Vec<L>>, names: &[N]) -> Result<Self>
    where
        L: Into<Label>,
        N: AsRef<str>,
    {
        let tuples = tuples
            .into_iter()
            .map(|t| t.into_iter().map(Into::into).collect())
            .collect();
        let names = names.iter().map(|n| Some(n.as_ref().to_string())).collect();
        Self::from_tuples(tuples, names)
    }

    /// A single-level index.
    pub fn flat(labels: Vec<Label>, name: Option<String>) -> Self {
        Self {
            names: vec![name],
            tuples: labels.into_iter().map(|l| vec![l]).collect(),
        }
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.names.len()
    }

    /// Number of positions along the axis.
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Level names, outermost first.
    pub fn level_names(&self) -> &[Option<String>] {
        &self.names
    }

    /// Full key at a position.
    pub fn key(&self, pos: usize) -> &[Label] {
        &self.tuples[pos]
    }

    pub fn label(&self, pos: usize, depth: usize) -> &Label {
        &self.tuples[pos][depth]
    }

    /// Labels of one level in position order.
    pub fn level_values(&self, depth: usize) -> impl Iterator<Item = &Label> + '_ {
        self.tuples.iter().map(move |t| &t[depth])
    }

    /// Names that occur at more than one depth.
    pub fn duplicate_level_names(&self) -> Vec<&str> {
        let mut dups: Vec<&str> = Vec::new();
        for (i, name) in self.names.iter().enumerate() {
            let Some(name) = name.as_deref() else {
                continue;
            };
            let repeated = self.names[..i].iter().any(|n| n.as_deref() == Some(name));
            if repeated && !dups.contains(&name) {
                dups.push(name);
            }
        }
        dups
    }

    /// Sub-index over the given positions, optionally without the outer `drop` levels.
    pub(crate) fn take(&self, positions: &[usize], drop: usize) -> Self {
        Self {
            names: self.names[drop..].to_vec(),
            tuples: positions
                .iter()
                .map(|&p| self.tuples[p][drop..].to_vec())
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Frame – a dense table addressed by two MultiIndexes
// ---------------------------------------------------------------------------

/// A 2-D table of `f64` values stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    index: MultiIndex,
    columns: MultiIndex,
    values: Vec<f64>,
}

impl Frame {
    /// Build a frame from one `Vec` per row.
    pub fn new(index: MultiIndex, columns: MultiIndex, rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.len() != index.len() {
            return Err(DlocError::InvalidIndex(format!(
                "{} data rows for an index of length {}",
                rows.len(),
                index.len()
            )));
        }
        let mut values = Vec::with_capacity(index.len() * columns.len());
        for (r, row) in rows.into_iter().enumerate() {
            if row.len() != columns.len() {
                return Err(DlocError::InvalidIndex(format!(
                    "row {r} has {} values but there are {} columns",
                    row.len(),
                    columns.len()
                )));
            }
            values.extend(row);
        }
        Ok(Self {
            index,
            columns,
            values,
        })
    }

    pub(crate) fn from_parts(index: MultiIndex, columns: MultiIndex, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), index.len() * columns.len());
        Self {
            index,
            columns,
            values,
        }
    }

    pub fn index(&self) -> &MultiIndex {
        &self.index
    }

    pub fn columns(&self) -> &MultiIndex {
        &self.columns
    }

    /// The index along `axis`.
    pub fn axis_index(&self, axis: Axis) -> &MultiIndex {
        match axis {
            Axis::Row => &self.index,
            Axis::Column => &self.columns,
        }
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.columns.len() + col]
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: f64) {
        let n_cols = self.columns.len();
        self.values[row * n_cols + col] = value;
    }

    /// Values as one `Vec` per row.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        if self.columns.is_empty() {
            return vec![Vec::new(); self.index.len()];
        }
        self.values
            .chunks(self.columns.len())
            .map(|c| c.to_vec())
            .collect()
    }
}

// Same layout the JSON loader reads: `{index, columns, data: [[row], ...]}`.
impl Serialize for Frame {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = serializer.serialize_struct("Frame", 3)?;
        st.serialize_field("index", &self.index)?;
        st.serialize_field("columns", &self.columns)?;
        st.serialize_field("data", &self.rows())?;
        st.end()
    }
}

// ---------------------------------------------------------------------------
// Series / Selected – results of a read
// ---------------------------------------------------------------------------

/// One row or column of a frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub index: MultiIndex,
    pub values: Vec<f64>,
    /// Key of the collapsed position on the other axis.
    pub name: Option<Vec<Label>>,
}

/// What a read returns, depending on how specific the selectors were.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selected {
    Scalar(f64),
    Series(Series),
    Frame(Frame),
}

impl Selected {
    pub fn as_series(&self) -> Option<&Series> {
        match self {
            Selected::Series(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&Frame> {
        match self {
            Selected::Frame(f) => Some(f),
            _ => None,
        }
    }
}
