//! JSON and CSV codecs for the strata document/grid model.
//!
//! - [`DataDocJson`]: recursive two-way mapping between [`strata_data::DataDoc`]
//!   trees and JSON objects.
//! - [`DataGridCsv`]: flat two-way mapping between [`strata_data::DataGrid`]
//!   instances and Excel-dialect CSV, with an optional self-describing
//!   header encoding.
//!
//! All I/O is bounded and blocking on the calling thread; a failure aborts
//! the whole load/save and surfaces immediately as a [`CodecError`].

pub mod doc_json;
pub mod error;
pub mod grid_csv;

pub use doc_json::DataDocJson;
pub use error::CodecError;
pub use grid_csv::DataGridCsv;
