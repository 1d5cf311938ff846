//! regionfx — region-selection image processing engine.
//!
//! Turns a viewer-drawn selection (box or freehand lasso) into a pixel mask,
//! applies a filter or enhancement confined to that mask, and composites the
//! result back into the full image, leaving everything outside the selection
//! byte-for-byte untouched. The UI around it (upload widget, dropdowns,
//! plotting canvas) is external; this crate is the engine they call into.
//!
//! Pipeline: viewer selection event + operation choice → [`coords`] →
//! [`mask`] → [`compositor`] (dispatching through [`ops`]) → updated raster →
//! [`codec`] → viewer.

pub mod cli;
pub mod codec;
pub mod compositor;
pub mod coords;
pub mod engine;
pub mod error;
pub mod mask;
pub mod ops;
pub mod session;

pub use cli::{CliArgs, run as cli_run};
pub use coords::SelectionEvent;
pub use engine::{Engine, OperationOutcome, ViewerImage};
pub use error::{Error, Result};
pub use mask::{BoxRegion, PixelMask, SelectionGeometry};
pub use ops::{OperationKind, OperationSpec};
