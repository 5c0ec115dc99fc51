use std::borrow::Cow;

use log::debug;

use super::model::{Frame, Label, MultiIndex, Selected, Series};
use super::selector::{Assign, Axis, CompositeSelector, ConventionalSelector, LevelSelector};
use crate::error::{DlocError, Result};

// ---------------------------------------------------------------------------
// Per-axis pick: positional selector → positions
// ---------------------------------------------------------------------------

/// Outcome of applying one conventional selector to one axis.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxisPick {
    /// Matching positions in index order.
    pub positions: Vec<usize>,
    /// Number of outer levels removed from the result index.
    pub drop: usize,
    /// Full key, when it matched a single position and the axis collapses.
    pub collapsed: Option<Vec<Label>>,
}

/// Apply `selector` to `index`.
///
/// Leading scalar slots followed only by "everything" slots form a key: a partial
/// key drops its levels from the result, a full key collapses the axis.
pub(crate) fn pick(
    index: &MultiIndex,
    axis: Axis,
    selector: &ConventionalSelector,
) -> Result<AxisPick> {
    let depth = index.depth();
    let slots = selector.slots();
    if slots.len() > depth {
        return Err(DlocError::TooManyIndexers {
            axis,
            given: slots.len(),
            depth,
        });
    }

    for (d, slot) in slots.iter().enumerate() {
        check_labels(index, axis, d, slot)?;
    }

    let positions: Vec<usize> = (0..index.len())
        .filter(|&p| {
            slots
                .iter()
                .enumerate()
                .all(|(d, slot)| slot.matches(index.label(p, d)))
        })
        .collect();

    let mut drop = 0;
    let mut collapsed = None;
    if let Some(key) = scalar_prefix(slots) {
        if positions.is_empty() {
            return Err(DlocError::KeyNotFound { axis, key });
        }
        if key.len() < depth {
            drop = key.len();
        } else if positions.len() == 1 {
            collapsed = Some(key);
        }
    }

    Ok(AxisPick {
        positions,
        drop,
        collapsed,
    })
}

/// Labels of the leading scalar slots, if nothing after them restricts the axis.
fn scalar_prefix(slots: &[LevelSelector]) -> Option<Vec<Label>> {
    let mut key = Vec::new();
    let mut rest = slots.iter();
    for slot in rest.by_ref() {
        match slot {
            LevelSelector::Label(l) => key.push(l.clone()),
            other if other.is_everything() => break,
            _ => return None,
        }
    }
    if key.is_empty() || !rest.all(LevelSelector::is_everything) {
        return None;
    }
    Some(key)
}

fn check_labels(index: &MultiIndex, axis: Axis, depth: usize, slot: &LevelSelector) -> Result<()> {
    let wanted: &[Label] = match slot {
        LevelSelector::Label(l) => std::slice::from_ref(l),
        LevelSelector::List(ls) => ls,
        LevelSelector::Unconstrained | LevelSelector::Range { .. } => return Ok(()),
    };
    for label in wanted {
        if !index.level_values(depth).any(|l| l == label) {
            return Err(DlocError::LabelNotFound {
                axis,
                depth,
                label: label.clone(),
            });
        }
    }
    Ok(())
}

type SelectorPair<'a> = (Cow<'a, ConventionalSelector>, Cow<'a, ConventionalSelector>);

fn split(composite: &CompositeSelector) -> SelectorPair<'_> {
    let everything = || Cow::Owned(ConventionalSelector::everything());
    match composite {
        CompositeSelector::Single {
            axis: Axis::Row,
            selector,
        } => (Cow::Borrowed(selector), everything()),
        CompositeSelector::Single {
            axis: Axis::Column,
            selector,
        } => (everything(), Cow::Borrowed(selector)),
        CompositeSelector::Pair { rows, columns } => {
            (Cow::Borrowed(rows), Cow::Borrowed(columns))
        }
    }
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// The conventional label accessor: positional tuples, outermost level first.
#[derive(Debug, Clone, Copy)]
pub struct Loc<'a> {
    frame: &'a Frame,
}

impl<'a> Loc<'a> {
    /// `loc[rows, columns]`.
    pub fn get(
        &self,
        rows: &ConventionalSelector,
        columns: &ConventionalSelector,
    ) -> Result<Selected> {
        debug!("loc read rows={rows} columns={columns}");
        let r = pick(self.frame.index(), Axis::Row, rows)?;
        let c = pick(self.frame.columns(), Axis::Column, columns)?;
        Ok(assemble(self.frame, r, c))
    }

    /// `loc(axis=N)[..]`.
    pub fn axis(&self, axis: Axis) -> LocAxis<'a> {
        LocAxis {
            frame: self.frame,
            axis,
        }
    }

    pub fn select(&self, composite: &CompositeSelector) -> Result<Selected> {
        let (rows, columns) = split(composite);
        self.get(&rows, &columns)
    }
}

/// [`Loc`] restricted to one axis.
#[derive(Debug, Clone, Copy)]
pub struct LocAxis<'a> {
    frame: &'a Frame,
    axis: Axis,
}

impl LocAxis<'_> {
    pub fn get(&self, selector: &ConventionalSelector) -> Result<Selected> {
        Loc { frame: self.frame }.select(&CompositeSelector::Single {
            axis: self.axis,
            selector: selector.clone(),
        })
    }
}

fn assemble(frame: &Frame, rows: AxisPick, cols: AxisPick) -> Selected {
    match (rows.collapsed, cols.collapsed) {
        (Some(_), Some(_)) => Selected::Scalar(frame.get(rows.positions[0], cols.positions[0])),
        (Some(row_key), None) => {
            let r = rows.positions[0];
            Selected::Series(Series {
                index: frame.columns().take(&cols.positions, cols.drop),
                values: cols.positions.iter().map(|&c| frame.get(r, c)).collect(),
                name: Some(row_key),
            })
        }
        (None, Some(col_key)) => {
            let c = cols.positions[0];
            Selected::Series(Series {
                index: frame.index().take(&rows.positions, rows.drop),
                values: rows.positions.iter().map(|&r| frame.get(r, c)).collect(),
                name: Some(col_key),
            })
        }
        (None, None) => {
            let mut values = Vec::with_capacity(rows.positions.len() * cols.positions.len());
            for &r in &rows.positions {
                values.extend(cols.positions.iter().map(|&c| frame.get(r, c)));
            }
            Selected::Frame(Frame::from_parts(
                frame.index().take(&rows.positions, rows.drop),
                frame.columns().take(&cols.positions, cols.drop),
                values,
            ))
        }
    }
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Assigning side of [`Loc`].
#[derive(Debug)]
pub struct LocMut<'a> {
    frame: &'a mut Frame,
}

impl LocMut<'_> {
    /// `loc[rows, columns] = value`.
    pub fn set(
        &mut self,
        rows: &ConventionalSelector,
        columns: &ConventionalSelector,
        value: impl Into<Assign>,
    ) -> Result<()> {
        debug!("loc write rows={rows} columns={columns}");
        let r = pick(self.frame.index(), Axis::Row, rows)?;
        let c = pick(self.frame.columns(), Axis::Column, columns)?;
        write(&mut *self.frame, &r.positions, &c.positions, value.into())
    }

    pub fn axis(&mut self, axis: Axis) -> LocAxisMut<'_> {
        LocAxisMut {
            frame: &mut *self.frame,
            axis,
        }
    }

    pub fn assign(&mut self, composite: &CompositeSelector, value: impl Into<Assign>) -> Result<()> {
        let (rows, columns) = split(composite);
        self.set(&rows, &columns, value)
    }
}

/// [`LocMut`] restricted to one axis.
#[derive(Debug)]
pub struct LocAxisMut<'a> {
    frame: &'a mut Frame,
    axis: Axis,
}

impl LocAxisMut<'_> {
    pub fn set(&mut self, selector: &ConventionalSelector, value: impl Into<Assign>) -> Result<()> {
        let composite = CompositeSelector::Single {
            axis: self.axis,
            selector: selector.clone(),
        };
        LocMut {
            frame: &mut *self.frame,
        }
        .assign(&composite, value)
    }
}

fn write(frame: &mut Frame, rows: &[usize], cols: &[usize], value: Assign) -> Result<()> {
    let expected = (rows.len(), cols.len());
    let cells = rows.iter().flat_map(|&r| cols.iter().map(move |&c| (r, c)));
    match value {
        Assign::Scalar(v) => {
            for (r, c) in cells {
                frame.set(r, c, v);
            }
        }
        Assign::Values(values) => {
            if values.len() != expected.0 * expected.1 {
                return Err(DlocError::ShapeMismatch {
                    expected,
                    found: values.len(),
                });
            }
            for ((r, c), v) in cells.zip(values) {
                frame.set(r, c, v);
            }
        }
        Assign::Grid(grid) => {
            let fits = grid.len() == expected.0 && grid.iter().all(|row| row.len() == expected.1);
            if !fits {
                return Err(DlocError::ShapeMismatch {
                    expected,
                    found: grid.iter().map(Vec::len).sum(),
                });
            }
            for (&r, row) in rows.iter().zip(grid) {
                for (&c, v) in cols.iter().zip(row) {
                    frame.set(r, c, v);
                }
            }
        }
    }
    Ok(())
}

impl Frame {
    /// Conventional label accessor.
    pub fn loc(&self) -> Loc<'_> {
        Loc { frame: self }
    }

    pub fn loc_mut(&mut self) -> LocMut<'_> {
        LocMut { frame: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::selector::LevelSelector as S;

    fn frame() -> Frame {
        let tuples = vec![
            vec!["A", "A"],
            vec!["A", "B"],
            vec!["A", "C"],
            vec!["B", "A"],
        ];
        let index = MultiIndex::from_named_tuples(tuples.clone(), &["level0", "level1"]).unwrap();
        let columns = MultiIndex::from_named_tuples(tuples, &["level0", "level1"]).unwrap();
        let rows = (0..4)
            .map(|r| (0..4).map(|c| (r * 4 + c) as f64).collect())
            .collect();
        Frame::new(index, columns, rows).unwrap()
    }

    fn sel(slots: Vec<S>) -> ConventionalSelector {
        ConventionalSelector::tuple(slots)
    }

    #[test]
    fn partial_scalar_key_drops_its_level() {
        let f = frame();
        let out = f.loc().axis(Axis::Row).get(&ConventionalSelector::label("B")).unwrap();
        let out = out.as_frame().unwrap();
        assert_eq!(out.shape(), (1, 4));
        assert_eq!(out.index().depth(), 1);
        assert_eq!(out.index().level_names(), &[Some("level1".to_string())]);
        assert_eq!(out.rows(), vec![vec![12.0, 13.0, 14.0, 15.0]]);
    }

    #[test]
    fn trailing_everything_slots_still_drop() {
        let f = frame();
        let bare = f.loc().axis(Axis::Row).get(&ConventionalSelector::label("B")).unwrap();
        let padded = f
            .loc()
            .axis(Axis::Row)
            .get(&sel(vec![S::label("B"), S::Unconstrained]))
            .unwrap();
        assert_eq!(bare, padded);
    }

    #[test]
    fn inner_level_selection_keeps_all_levels() {
        let f = frame();
        let out = f
            .loc()
            .axis(Axis::Row)
            .get(&sel(vec![S::all(), S::label("A")]))
            .unwrap();
        let out = out.as_frame().unwrap();
        assert_eq!(out.index().depth(), 2);
        assert_eq!(out.rows(), vec![vec![0.0, 1.0, 2.0, 3.0], vec![12.0, 13.0, 14.0, 15.0]]);
    }

    #[test]
    fn full_key_collapses_to_series() {
        let f = frame();
        let out = f
            .loc()
            .axis(Axis::Column)
            .get(&sel(vec![S::label("A"), S::label("B")]))
            .unwrap();
        let series = out.as_series().unwrap();
        assert_eq!(series.values, vec![1.0, 5.0, 9.0, 13.0]);
        assert_eq!(series.name, Some(vec!["A".into(), "B".into()]));
        assert_eq!(series.index, *f.index());
    }

    #[test]
    fn full_keys_on_both_axes_give_a_scalar() {
        let f = frame();
        let key = sel(vec![S::label("B"), S::label("A")]);
        let out = f.loc().get(&key, &key).unwrap();
        assert_eq!(out, Selected::Scalar(15.0));
    }

    #[test]
    fn range_and_list_keep_index_order() {
        let f = frame();
        let out = f
            .loc()
            .get(
                &sel(vec![S::all(), S::list(["C", "A"])]),
                &sel(vec![S::between("B", "B")]),
            )
            .unwrap();
        let out = out.as_frame().unwrap();
        assert_eq!(out.rows(), vec![vec![3.0], vec![11.0], vec![15.0]]);
    }

    #[test]
    fn missing_label_is_a_key_error() {
        let f = frame();
        let err = f.loc().axis(Axis::Row).get(&ConventionalSelector::label("Z")).unwrap_err();
        assert_eq!(
            err,
            DlocError::LabelNotFound {
                axis: Axis::Row,
                depth: 0,
                label: "Z".into()
            }
        );

        let err = f
            .loc()
            .axis(Axis::Row)
            .get(&sel(vec![S::label("B"), S::label("B")]))
            .unwrap_err();
        assert!(matches!(err, DlocError::KeyNotFound { axis: Axis::Row, .. }));
    }

    #[test]
    fn too_many_slots_are_rejected() {
        let f = frame();
        let err = f
            .loc()
            .axis(Axis::Column)
            .get(&sel(vec![S::all(), S::all(), S::all()]))
            .unwrap_err();
        assert_eq!(
            err,
            DlocError::TooManyIndexers {
                axis: Axis::Column,
                given: 3,
                depth: 2
            }
        );
    }

    #[test]
    fn scalar_assignment_broadcasts() {
        let mut f = frame();
        f.loc_mut()
            .axis(Axis::Column)
            .set(&sel(vec![S::all(), S::label("A")]), 99.0)
            .unwrap();
        for r in 0..4 {
            assert_eq!(f.get(r, 0), 99.0);
            assert_eq!(f.get(r, 3), 99.0);
            assert_eq!(f.get(r, 1), (r * 4 + 1) as f64);
        }
    }

    #[test]
    fn grid_assignment_must_match_shape() {
        let mut f = frame();
        let rows = ConventionalSelector::label("A");
        let cols = ConventionalSelector::label("B");
        let err = f
            .loc_mut()
            .set(&rows, &cols, vec![vec![1.0, 2.0]])
            .unwrap_err();
        assert_eq!(
            err,
            DlocError::ShapeMismatch {
                expected: (3, 1),
                found: 2
            }
        );
        assert_eq!(f, frame());

        f.loc_mut()
            .set(&rows, &cols, vec![vec![1.0], vec![2.0], vec![3.0]])
            .unwrap();
        assert_eq!(f.get(2, 3), 3.0);
    }

    #[test]
    fn values_assignment_fills_row_major() {
        let mut f = frame();
        f.loc_mut()
            .set(
                &ConventionalSelector::label("B"),
                &sel(vec![S::label("A"), S::list(["A", "B"])]),
                vec![7.0, 8.0],
            )
            .unwrap();
        assert_eq!(f.get(3, 0), 7.0);
        assert_eq!(f.get(3, 1), 8.0);
    }
}
