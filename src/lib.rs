//! # rusty-dloc
//!
//! Select rows and columns of tables with multi-level labels by naming the
//! levels instead of ordering positional tuples.
//!
//! ```
//! use rusty_dloc::{Frame, MultiIndex, NamedSelector};
//!
//! let index = MultiIndex::from_named_tuples(
//!     vec![vec!["A", "A"], vec!["A", "B"], vec!["B", "A"]],
//!     &["level0", "level1"],
//! )
//! .unwrap();
//! let columns = MultiIndex::from_named_tuples(vec![vec!["v"]], &["value"]).unwrap();
//! let frame = Frame::new(index, columns, vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
//!
//! let picked = frame.dloc().rows(NamedSelector::new().with("level1", "A")).unwrap();
//! assert_eq!(picked.as_frame().unwrap().shape(), (2, 1));
//! ```
pub mod config;
pub mod data;
pub mod error;

// Re-export the main types for convenience
pub use config::{DuplicateLevelPolicy, RepeatedConstraintPolicy, SelectOptions};
pub use data::{
    dloc::{Dloc, DlocAxis, DlocAxisMut, DlocMut},
    loc::{Loc, LocAxis, LocAxisMut, LocMut},
    model::{Frame, Label, MultiIndex, Selected, Series},
    selector::{
        Assign, Axis, AxisInput, CallerInput, CompositeSelector, ConventionalSelector, LevelKey,
        LevelSelector, NamedSelector, ResolvedAxisSelector,
    },
};
pub use error::{DlocError, Result};
