//! Typed, schema-aware document and grid data model.
//!
//! The model is built leaf-first:
//!
//! 1. **Types**: the [`DataType`] scalar set plus the string parsers and
//!    name/title conversion rules ([`types`]).
//! 2. **Item**: a named, typed, possibly multi-value field with metadata
//!    ([`DataItem`]).
//! 3. **Document**: an ordered, name-keyed collection of items plus named
//!    groups of child documents ([`DataDoc`]).
//! 4. **Grid**: a document-defined column schema plus rows of raw cell
//!    values, with per-column descriptive statistics ([`DataGrid`]).
//!
//! Everything is a single-threaded, in-memory value container: no
//! interior locking, no I/O, no shared state. Callers that need
//! concurrent access clone - the deep-copy semantics of [`DataDoc`]
//! exist precisely to hand out independent snapshots.
//!
//! Serialization to JSON and CSV lives in the companion `strata_io`
//! crate.

pub mod doc;
pub mod error;
pub mod grid;
pub mod item;
pub mod stats;
pub mod types;

pub use doc::DataDoc;
pub use error::DataError;
pub use grid::{DataGrid, DataRow};
pub use item::DataItem;
pub use stats::DescriptiveStatistics;
pub use types::{DataType, DataValue};
