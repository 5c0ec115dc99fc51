use log::debug;

use super::model::{Frame, Selected};
use super::resolve::{compose, dispatch};
use super::selector::{Assign, Axis, AxisInput, CallerInput, CompositeSelector};
use crate::config::SelectOptions;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Resolution shared by the read and write sides
// ---------------------------------------------------------------------------

fn resolve_caller(
    frame: &Frame,
    input: &CallerInput,
    options: &SelectOptions,
) -> Result<CompositeSelector> {
    match input {
        CallerInput::Axis(rows) => resolve_axis(frame, Axis::Row, rows, options),
        CallerInput::AxisPair(rows, columns) => {
            let rows = dispatch(frame.index(), Axis::Row, rows, options)?;
            let columns = dispatch(frame.columns(), Axis::Column, columns, options)?;
            Ok(compose(Some(rows), Some(columns)))
        }
    }
}

fn resolve_axis(
    frame: &Frame,
    axis: Axis,
    input: &AxisInput,
    options: &SelectOptions,
) -> Result<CompositeSelector> {
    let selector = dispatch(frame.axis_index(axis), axis, input, options)?;
    Ok(match axis {
        Axis::Row => compose(Some(selector), None),
        Axis::Column => compose(None, Some(selector)),
    })
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Selection by level name.
///
/// Every call resolves names against the frame's indexes, then reads through
/// [`Frame::loc`], so results and label errors are exactly those of `loc` for
/// the equivalent positional selector.
#[derive(Debug, Clone, Copy)]
pub struct Dloc<'a> {
    frame: &'a Frame,
    options: SelectOptions,
}

impl<'a> Dloc<'a> {
    /// Tuple form: `Axis(rows)` or `AxisPair(rows, columns)`.
    pub fn get(&self, input: impl Into<CallerInput>) -> Result<Selected> {
        let composite = resolve_caller(self.frame, &input.into(), &self.options)?;
        debug!("dloc read {composite:?}");
        self.frame.loc().select(&composite)
    }

    /// Bind to one axis, leaving the other unconstrained.
    pub fn axis(&self, axis: Axis) -> DlocAxis<'a> {
        DlocAxis {
            frame: self.frame,
            axis,
            options: self.options,
        }
    }

    pub fn rows(&self, input: impl Into<AxisInput>) -> Result<Selected> {
        self.axis(Axis::Row).get(input)
    }

    pub fn columns(&self, input: impl Into<AxisInput>) -> Result<Selected> {
        self.axis(Axis::Column).get(input)
    }
}

/// [`Dloc`] bound to one axis.
#[derive(Debug, Clone, Copy)]
pub struct DlocAxis<'a> {
    frame: &'a Frame,
    axis: Axis,
    options: SelectOptions,
}

impl DlocAxis<'_> {
    pub fn get(&self, input: impl Into<AxisInput>) -> Result<Selected> {
        let composite = resolve_axis(self.frame, self.axis, &input.into(), &self.options)?;
        debug!("dloc read {composite:?}");
        self.frame.loc().select(&composite)
    }
}

// ---------------------------------------------------------------------------
// Write
// ---------------------------------------------------------------------------

/// Assigning side of [`Dloc`]. Nothing is written unless resolution succeeds.
#[derive(Debug)]
pub struct DlocMut<'a> {
    frame: &'a mut Frame,
    options: SelectOptions,
}

impl DlocMut<'_> {
    pub fn set(&mut self, input: impl Into<CallerInput>, value: impl Into<Assign>) -> Result<()> {
        let composite = resolve_caller(self.frame, &input.into(), &self.options)?;
        debug!("dloc write {composite:?}");
        self.frame.loc_mut().assign(&composite, value)
    }

    pub fn axis(&mut self, axis: Axis) -> DlocAxisMut<'_> {
        DlocAxisMut {
            frame: &mut *self.frame,
            axis,
            options: self.options,
        }
    }

    pub fn set_rows(&mut self, input: impl Into<AxisInput>, value: impl Into<Assign>) -> Result<()> {
        self.axis(Axis::Row).set(input, value)
    }

    pub fn set_columns(
        &mut self,
        input: impl Into<AxisInput>,
        value: impl Into<Assign>,
    ) -> Result<()> {
        self.axis(Axis::Column).set(input, value)
    }
}

/// [`DlocMut`] bound to one axis.
#[derive(Debug)]
pub struct DlocAxisMut<'a> {
    frame: &'a mut Frame,
    axis: Axis,
    options: SelectOptions,
}

impl DlocAxisMut<'_> {
    pub fn set(&mut self, input: impl Into<AxisInput>, value: impl Into<Assign>) -> Result<()> {
        let composite = resolve_axis(self.frame, self.axis, &input.into(), &self.options)?;
        debug!("dloc write {composite:?}");
        self.frame.loc_mut().assign(&composite, value)
    }
}

impl Frame {
    /// Level-name accessor with default options.
    pub fn dloc(&self) -> Dloc<'_> {
        self.dloc_with(SelectOptions::default())
    }

    pub fn dloc_with(&self, options: SelectOptions) -> Dloc<'_> {
        Dloc {
            frame: self,
            options,
        }
    }

    pub fn dloc_mut(&mut self) -> DlocMut<'_> {
        self.dloc_mut_with(SelectOptions::default())
    }

    pub fn dloc_mut_with(&mut self, options: SelectOptions) -> DlocMut<'_> {
        DlocMut {
            frame: self,
            options,
        }
    }
}
