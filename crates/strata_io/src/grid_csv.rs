//! CSV codec for [`DataGrid`] instances.
//!
//! Grids serialize as Excel-dialect CSV (comma-delimited, quoted on
//! demand). The optional header row can carry the self-describing encoded
//! form `name[Type](Title)`, which packs each column's declared type and
//! title into the column-name cell so a file reloads with its full schema.

use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

use strata_data::types::name_to_title;
use strata_data::{DataGrid, DataItem, DataType};

use crate::error::CodecError;

/// Saves and loads data grids as CSV rows.
#[derive(Debug)]
pub struct DataGridCsv {
    grid: DataGrid,
    field_name_preferred: bool,
}

impl Default for DataGridCsv {
    fn default() -> Self {
        Self::new()
    }
}

impl DataGridCsv {
    /// Constructs a codec around an empty grid; loading fills it.
    pub fn new() -> Self {
        DataGridCsv {
            grid: DataGrid::new("csv_data_grid"),
            field_name_preferred: false,
        }
    }

    /// Constructs a codec around an existing grid, e.g. to load rows into
    /// a pre-seeded column schema.
    pub fn from_grid(grid: DataGrid) -> Self {
        DataGridCsv {
            grid,
            field_name_preferred: false,
        }
    }

    /// When set, header cells carry the bare field name instead of the
    /// encoded `name[Type](Title)` form.
    pub fn set_field_name_preferred(&mut self, preferred: bool) {
        self.field_name_preferred = preferred;
    }

    pub fn grid(&self) -> &DataGrid {
        &self.grid
    }

    pub fn into_grid(self) -> DataGrid {
        self.grid
    }

    // ------------------------------------------------------------------
    // Load
    // ------------------------------------------------------------------

    /// Loads rows (and, when `with_headers` is set and the grid has no
    /// columns yet, the column schema) from a CSV stream.
    ///
    /// Data rows shorter than the schema truncate - the missing trailing
    /// cells keep each column's default value. Surplus cells are ignored.
    pub fn load_from_reader<R: Read>(
        &mut self,
        reader: R,
        with_headers: bool,
    ) -> Result<(), CodecError> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = csv_reader.records();

        if with_headers {
            if let Some(header) = records.next() {
                let header = header?;
                if self.grid.col_count() == 0 {
                    for (offset, cell) in header.iter().enumerate() {
                        self.grid.add_col(header_to_item(cell, offset + 1)?);
                    }
                }
            }
        }

        let column_names: Vec<String> = self
            .grid
            .columns()
            .items()
            .map(|column| column.name().to_string())
            .collect();

        let mut row_count = 0usize;
        for record in records {
            let record = record?;
            self.grid.new_row();
            for (column_name, cell) in column_names.iter().zip(record.iter()) {
                self.grid.set_value_by_name(column_name, cell);
            }
            self.grid.add_row();
            row_count += 1;
        }
        debug!(
            rows = row_count,
            cols = self.grid.col_count(),
            "loaded grid from CSV"
        );

        Ok(())
    }

    /// Loads a grid from a CSV file.
    pub fn load_from_file(
        &mut self,
        path: impl AsRef<Path>,
        with_headers: bool,
    ) -> Result<(), CodecError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CodecError::resource_unavailable(path));
        }
        let file = File::open(path)?;
        self.load_from_reader(BufReader::new(file), with_headers)
    }

    // ------------------------------------------------------------------
    // Save
    // ------------------------------------------------------------------

    /// Writes the grid as CSV. With `title_only`, header cells carry just
    /// the column title (derived from the name when the title is empty);
    /// otherwise they carry the encoded `name[Type](Title)` form. A grid
    /// without rows or columns writes nothing.
    pub fn save_to_writer<W: Write>(
        &self,
        grid: &DataGrid,
        writer: W,
        with_headers: bool,
        title_only: bool,
    ) -> Result<(), CodecError> {
        if grid.row_count() == 0 || grid.col_count() == 0 {
            return Ok(());
        }

        let mut csv_writer = WriterBuilder::new().from_writer(writer);
        if with_headers {
            let header: Vec<String> = grid
                .columns()
                .items()
                .map(|column| {
                    if self.field_name_preferred {
                        column.name().to_string()
                    } else {
                        column_header(column, title_only)
                    }
                })
                .collect();
            csv_writer.write_record(&header)?;
        }

        for row in 0..grid.row_count() {
            if let Some(doc) = grid.row_as_doc_optional(row) {
                let cells: Vec<String> = doc.items().map(|item| item.collapsed_values()).collect();
                csv_writer.write_record(&cells)?;
            }
        }
        csv_writer.flush()?;
        debug!(
            rows = grid.row_count(),
            cols = grid.col_count(),
            "saved grid as CSV"
        );

        Ok(())
    }

    /// Writes the grid to a CSV file with encoded headers.
    pub fn save_to_file(
        &self,
        grid: &DataGrid,
        path: impl AsRef<Path>,
        with_headers: bool,
    ) -> Result<(), CodecError> {
        let file = File::create(path.as_ref())?;
        self.save_to_writer(grid, BufWriter::new(file), with_headers, false)
    }

    /// Writes the grid to a CSV file using column titles as the header
    /// row.
    pub fn save_with_title_header(
        &self,
        grid: &DataGrid,
        path: impl AsRef<Path>,
    ) -> Result<(), CodecError> {
        let file = File::create(path.as_ref())?;
        self.save_to_writer(grid, BufWriter::new(file), true, true)
    }
}

/// Recovers a column item from a header cell. `name[Type](Title)` decodes
/// all three parts; a cell without bracket/paren content is a Text column
/// named by the cell; an empty cell becomes a positional placeholder.
fn header_to_item(label: &str, col_offset: usize) -> Result<DataItem, CodecError> {
    if label.is_empty() {
        let column_name = format!("column_name_{:02}", col_offset);
        return Ok(DataItem::new(DataType::Text, column_name));
    }

    let mut column_name = label;
    let mut column_title = "";
    let mut data_type = DataType::Text;

    let type_bounds = match (label.find('['), label.find(']')) {
        (Some(open), Some(close)) if open > 0 && close > open => Some((open, close)),
        _ => None,
    };
    if let Some((open, close)) = type_bounds {
        column_name = &label[..open];
        data_type = label[open + 1..close].parse()?;
    }
    if let (Some(open), Some(close)) = (label.find('('), label.find(')')) {
        if open > 0 && close > open {
            if type_bounds.is_none() {
                column_name = &label[..open];
            }
            column_title = &label[open + 1..close];
        }
    }

    Ok(DataItem::new(data_type, column_name).with_title(column_title))
}

fn column_header(column: &DataItem, title_only: bool) -> String {
    let name = column.name();
    let title = column.title();

    if title_only {
        if title.is_empty() {
            name_to_title(name)
        } else {
            title.to_string()
        }
    } else {
        let mut label = format!("{}[{}]", name, column.data_type());
        if !title.is_empty() {
            label.push('(');
            label.push_str(title);
            label.push(')');
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_label_round_trip() {
        let column = DataItem::new(DataType::Integer, "calories").with_title("Calories");
        let label = column_header(&column, false);
        assert_eq!(label, "calories[Integer](Calories)");

        let decoded = header_to_item(&label, 1).unwrap();
        assert_eq!(decoded.name(), "calories");
        assert_eq!(decoded.data_type(), DataType::Integer);
        assert_eq!(decoded.title(), "Calories");
    }

    #[test]
    fn test_header_without_title() {
        let column = DataItem::new(DataType::Boolean, "vegetarian");
        assert_eq!(column_header(&column, false), "vegetarian[Boolean]");

        let decoded = header_to_item("vegetarian[Boolean]", 1).unwrap();
        assert_eq!(decoded.data_type(), DataType::Boolean);
        assert_eq!(decoded.title(), "");
    }

    #[test]
    fn test_plain_header_defaults_to_text() {
        let decoded = header_to_item("price", 3).unwrap();
        assert_eq!(decoded.name(), "price");
        assert_eq!(decoded.data_type(), DataType::Text);
    }

    #[test]
    fn test_title_only_header_with_paren_form() {
        let decoded = header_to_item("price(Unit Price)", 2).unwrap();
        assert_eq!(decoded.name(), "price");
        assert_eq!(decoded.data_type(), DataType::Text);
        assert_eq!(decoded.title(), "Unit Price");
    }

    #[test]
    fn test_empty_header_gets_placeholder_name() {
        let decoded = header_to_item("", 4).unwrap();
        assert_eq!(decoded.name(), "column_name_04");
        assert_eq!(decoded.data_type(), DataType::Text);
    }

    #[test]
    fn test_unknown_type_in_header_fails() {
        let err = header_to_item("price[Money]", 1).unwrap_err();
        assert!(matches!(err, CodecError::Data(_)));
    }

    #[test]
    fn test_title_only_header_derives_from_name() {
        let column = DataItem::new(DataType::Text, "meal_type");
        assert_eq!(column_header(&column, true), "Meal Type");
        let titled = DataItem::new(DataType::Text, "meal_type").with_title("Kind");
        assert_eq!(column_header(&titled, true), "Kind");
    }
}
