//! A column schema plus an ordered list of rows of raw cell values.

use indexmap::IndexMap;
use std::fmt;

use crate::doc::DataDoc;
use crate::error::DataError;
use crate::item::DataItem;
use crate::stats::DescriptiveStatistics;
use crate::types::{create_double, DataValue};

/// One row of cell values: column name to the cell's value list.
pub type DataRow = IndexMap<String, Vec<String>>;

/// A data grid manages a collection of columns and rows of data items.
///
/// The schema lives in a [`DataDoc`] whose items define the columns (name,
/// type, title, default, display size); each row stores raw string cell
/// values keyed by column name. Columns freeze once the first row lands,
/// which guarantees every stored row matches the schema.
///
/// Rows can be appended from a whole [`DataDoc`] or built incrementally
/// with the staged-row workflow: [`new_row`](Self::new_row) seeds the
/// column defaults, [`set_value_by_name`](Self::set_value_by_name) fills
/// cells, and [`add_row`](Self::add_row) commits.
#[derive(Debug, Clone)]
pub struct DataGrid {
    name: String,
    columns: DataDoc,
    staged_row: Option<DataRow>,
    rows: Vec<DataRow>,
}

impl DataGrid {
    /// Constructs a data grid with the given name and an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        DataGrid {
            name: name.into(),
            columns: DataDoc::new("data_grid"),
            staged_row: None,
            rows: Vec::new(),
        }
    }

    /// Constructs a data grid whose columns are defined by the items of the
    /// given document.
    pub fn with_columns(name: impl Into<String>, columns: DataDoc) -> Self {
        DataGrid {
            name: name.into(),
            columns,
            staged_row: None,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Adds a column to the schema. A silent no-op once any row has been
    /// stored: the schema is frozen for the rows' sake.
    pub fn add_col(&mut self, item: DataItem) {
        if self.row_count() == 0 {
            self.columns.add(item);
        }
    }

    pub fn col_count(&self) -> usize {
        self.columns.count()
    }

    /// The column schema as a data document.
    pub fn columns(&self) -> &DataDoc {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut DataDoc {
        &mut self.columns
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    /// Stages a new row seeded with every column's default value. Any
    /// previously staged row is discarded.
    pub fn new_row(&mut self) {
        let mut row = DataRow::new();
        for column in self.columns.items() {
            row.insert(
                column.name().to_string(),
                cell_values(column.default_value()),
            );
        }
        self.staged_row = Some(row);
    }

    /// Assigns a cell value in the staged row. A no-op without a staged
    /// row (call [`new_row`](Self::new_row) first).
    pub fn set_value_by_name(&mut self, name: &str, value: impl DataValue) {
        if let Some(row) = self.staged_row.as_mut() {
            row.insert(name.to_string(), cell_values(&value.to_value_string()));
        }
    }

    /// Assigns a cell's whole value list in the staged row. A no-op
    /// without a staged row.
    pub fn set_values_by_name(&mut self, name: &str, values: Vec<String>) {
        if let Some(row) = self.staged_row.as_mut() {
            row.insert(name.to_string(), values);
        }
    }

    /// Commits the staged row. Returns `false` when no row is staged.
    pub fn add_row(&mut self) -> bool {
        match self.staged_row.take() {
            Some(row) => {
                self.rows.push(row);
                true
            }
            None => false,
        }
    }

    /// Appends the document's item values as a new row. The document must
    /// carry exactly one item per column; a mismatch is rejected by
    /// returning `false`.
    pub fn add_row_doc(&mut self, doc: &DataDoc) -> bool {
        if doc.count() != self.columns.count() {
            return false;
        }
        let mut row = DataRow::new();
        for item in doc.items() {
            row.insert(item.name().to_string(), item.values().to_vec());
        }
        self.rows.push(row);
        true
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    // ------------------------------------------------------------------
    // Row-to-document seam
    // ------------------------------------------------------------------

    /// Reconstructs a document from the row at the offset: every column
    /// item is cloned and its values replaced with the row's cell list, so
    /// row data flows through the full typed item surface.
    pub fn row_as_doc_optional(&self, row_offset: usize) -> Option<DataDoc> {
        let row = self.rows.get(row_offset)?;
        let mut doc = self.columns.clone();
        for (name, values) in row {
            if let Some(column) = self.columns.item_by_name_optional(name) {
                let mut cell = column.clone();
                cell.set_values(values.clone());
                doc.add(cell);
            }
        }
        Some(doc)
    }

    /// As [`row_as_doc_optional`](Self::row_as_doc_optional), failing with
    /// [`DataError::NotFound`] when the offset is out of range.
    pub fn row_as_doc(&self, row_offset: usize) -> Result<DataDoc, DataError> {
        self.row_as_doc_optional(row_offset)
            .ok_or_else(|| DataError::not_found(format!("row offset {}", row_offset)))
    }

    /// Every row as a reconstructed document.
    pub fn rows_as_docs(&self) -> Vec<DataDoc> {
        (0..self.row_count())
            .filter_map(|row| self.row_as_doc_optional(row))
            .collect()
    }

    /// Iterator of reconstructed row documents.
    pub fn docs(&self) -> impl Iterator<Item = DataDoc> + '_ {
        (0..self.row_count()).filter_map(|row| self.row_as_doc_optional(row))
    }

    // ------------------------------------------------------------------
    // Statistics
    // ------------------------------------------------------------------

    /// Descriptive statistics over the named column, coercing each row's
    /// cell through the `f64` parser.
    ///
    /// Fails with [`DataError::NotFound`] for an unknown column name; a
    /// non-numeric column yields an empty statistics result rather than
    /// failing. A malformed numeric cell propagates its parse error.
    pub fn descriptive_statistics(&self, name: &str) -> Result<DescriptiveStatistics, DataError> {
        let column = self.columns.item_by_name(name)?;
        let mut statistics = DescriptiveStatistics::new();
        if column.data_type().is_number() {
            for row in &self.rows {
                let cell = row.get(name).and_then(|values| values.first());
                if let Some(value) = cell {
                    statistics.add_value(create_double(value)?);
                }
            }
        }
        Ok(statistics)
    }
}

fn cell_values(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}

impl fmt::Display for DataGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "data_grid"
        } else {
            &self.name
        };
        write!(
            f,
            "{} [{} cols x {} rows]",
            name,
            self.columns.count(),
            self.rows.len()
        )
    }
}
