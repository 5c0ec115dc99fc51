use log::{debug, trace};

use super::model::MultiIndex;
use super::selector::{
    AxisInput, Axis, CompositeSelector, ConventionalSelector, LevelKey, LevelSelector,
    ResolvedAxisSelector,
};
use crate::config::{DuplicateLevelPolicy, RepeatedConstraintPolicy, SelectOptions};
use crate::error::{DlocError, Result};

// ---------------------------------------------------------------------------
// Level resolver
// ---------------------------------------------------------------------------

/// Depth of the level `key` refers to.
///
/// Names resolve to the outermost level carrying them, unless
/// `DuplicateLevelPolicy::Reject` is set and the name is ambiguous.
pub fn resolve_level(
    index: &MultiIndex,
    axis: Axis,
    key: &LevelKey,
    options: &SelectOptions,
) -> Result<usize> {
    let unknown = || DlocError::UnknownLevel {
        axis,
        key: key.clone(),
    };
    let depth = match key {
        LevelKey::Position(d) if *d < index.depth() => *d,
        LevelKey::Position(_) => return Err(unknown()),
        LevelKey::Name(name) => {
            let mut depths = index
                .level_names()
                .iter()
                .enumerate()
                .filter(|(_, n)| n.as_deref() == Some(name.as_str()))
                .map(|(d, _)| d);
            let first = depths.next().ok_or_else(unknown)?;
            if options.duplicate_levels == DuplicateLevelPolicy::Reject && depths.next().is_some() {
                return Err(DlocError::DuplicateLevelName {
                    axis,
                    name: name.clone(),
                });
            }
            first
        }
    };
    trace!("{axis} level {key} -> depth {depth}");
    Ok(depth)
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// A full-length tuple with `value` at `depth` and every other slot unconstrained.
///
/// `depth` must come from [`resolve_level`], so it is below `total_depths`.
pub fn normalize(depth: usize, value: LevelSelector, total_depths: usize) -> ConventionalSelector {
    debug_assert!(
        depth < total_depths,
        "depth {depth} outside an axis of {total_depths} levels"
    );
    let mut selector = ConventionalSelector::unconstrained(total_depths);
    if let Some(slot) = selector.slots_mut().get_mut(depth) {
        *slot = value;
    }
    selector
}

// ---------------------------------------------------------------------------
// Merger
// ---------------------------------------------------------------------------

/// Fold selectors into one, slot by slot.
///
/// Each depth may be constrained by at most one input; a repeat fails with
/// `ConflictingLevelConstraint` unless the options allow identical repeats.
pub fn merge<'s>(
    axis: Axis,
    selectors: impl IntoIterator<Item = &'s ConventionalSelector>,
    total_depths: usize,
    options: &SelectOptions,
) -> Result<ResolvedAxisSelector> {
    let mut merged = ConventionalSelector::unconstrained(total_depths);
    for selector in selectors {
        if selector.len() > total_depths {
            return Err(DlocError::TooManyIndexers {
                axis,
                given: selector.len(),
                depth: total_depths,
            });
        }
        for (depth, slot) in selector.slots().iter().enumerate() {
            if slot.is_everything() {
                continue;
            }
            let target = &mut merged.slots_mut()[depth];
            if target.is_everything() {
                *target = slot.clone();
                continue;
            }
            let identical_ok =
                options.repeated_constraints == RepeatedConstraintPolicy::MergeIdentical;
            if !(identical_ok && *target == *slot) {
                return Err(DlocError::ConflictingLevelConstraint { axis, depth });
            }
        }
    }
    Ok(merged)
}

// ---------------------------------------------------------------------------
// Axis dispatcher
// ---------------------------------------------------------------------------

/// Turn one axis' caller input into the selector handed to `loc`.
///
/// Bare selectors pass through untouched.
pub fn dispatch(
    index: &MultiIndex,
    axis: Axis,
    input: &AxisInput,
    options: &SelectOptions,
) -> Result<ConventionalSelector> {
    let named = match input {
        AxisInput::Bare(selector) => return Ok(selector.clone()),
        AxisInput::Named(named) => named,
    };
    let total = index.depth();
    let normalized = named
        .entries()
        .iter()
        .map(|(key, value)| {
            let depth = resolve_level(index, axis, key, options)?;
            Ok(normalize(depth, value.clone(), total))
        })
        .collect::<Result<Vec<_>>>()?;
    let resolved = merge(axis, &normalized, total, options)?;
    debug!("resolved {axis} selector {resolved}");
    Ok(resolved)
}

// ---------------------------------------------------------------------------
// Dual-axis composer
// ---------------------------------------------------------------------------

/// Pair per-axis selectors into what the conventional accessor takes.
pub fn compose(
    rows: Option<ConventionalSelector>,
    columns: Option<ConventionalSelector>,
) -> CompositeSelector {
    match (rows, columns) {
        (Some(rows), Some(columns)) => CompositeSelector::Pair { rows, columns },
        (None, Some(selector)) => CompositeSelector::Single {
            axis: Axis::Column,
            selector,
        },
        (Some(selector), None) => CompositeSelector::Single {
            axis: Axis::Row,
            selector,
        },
        (None, None) => CompositeSelector::Single {
            axis: Axis::Row,
            selector: ConventionalSelector::everything(),
        },
    }
}
