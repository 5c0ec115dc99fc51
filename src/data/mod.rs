/// Data layer: frames, selectors, and the two label accessors.
///
/// Architecture:
/// ```text
///  .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Frame
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐   {level name → selector}
///   │   dloc    │◄─────────────────────────── caller
///   └──────────┘
///        │ resolve: name → depth, normalize, merge, compose
///        ▼
///   ┌──────────┐
///   │   loc     │  positional tuple → Scalar / Series / Frame, or assignment
///   └──────────┘
/// ```

pub mod dloc;
pub mod loader;
pub mod loc;
pub mod model;
pub mod parse;
pub mod resolve;
pub mod selector;
