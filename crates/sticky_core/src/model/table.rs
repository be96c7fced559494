//! Table embedded object: an editable grid of text cells.
//!
//! # Responsibility
//! - Own the cell grid and its layout settings (column widths, alignment).
//! - Rebuild the grid on dimension changes while keeping overlapping cells.
//!
//! # Invariants
//! - `cells` has exactly `rows` rows of exactly `cols` entries at all times.
//! - `rows` and `cols` never exceed `MAX_TABLE_DIMENSION`.
//! - Failed operations leave every field untouched.

use crate::model::frame::Frame;
use crate::model::record::TableRecord;
use log::warn;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_TABLE_ROWS: usize = 3;
pub const DEFAULT_TABLE_COLS: usize = 3;
pub const DEFAULT_CELL_WIDTH: u32 = 10;
pub const DEFAULT_TABLE_WIDTH: u32 = 300;
pub const DEFAULT_TABLE_HEIGHT: u32 = 150;
pub const DEFAULT_TABLE_BACKGROUND: &str = "gray";
/// Largest accepted row or column count.
pub const MAX_TABLE_DIMENSION: usize = 1000;

/// Table operation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Width input is not a number or a comma-separated list of numbers.
    InvalidWidth(String),
    /// Row/column count input is not an integer in `0..=MAX_TABLE_DIMENSION`.
    InvalidDimension { field: &'static str, value: String },
    /// Alignment input is not `left|center|right`.
    InvalidAlignment(String),
    /// Cell index lies outside the current grid.
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

impl Display for TableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWidth(value) => write!(
                f,
                "invalid column width `{value}`; expected a number or comma-separated numbers"
            ),
            Self::InvalidDimension { field, value } => {
                write!(
                    f,
                    "invalid {field} `{value}`; expected an integer from 0 to {MAX_TABLE_DIMENSION}"
                )
            }
            Self::InvalidAlignment(value) => write!(
                f,
                "invalid alignment `{value}`; expected left|center|right"
            ),
            Self::CellOutOfRange {
                row,
                col,
                rows,
                cols,
            } => write!(f, "cell ({row}, {col}) is outside a {rows}x{cols} table"),
        }
    }
}

impl Error for TableError {}

impl TableError {
    /// Returns whether this error came from malformed settings input.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::CellOutOfRange { .. })
    }
}

/// Horizontal text alignment applied to every cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

impl FromStr for Alignment {
    type Err = TableError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(TableError::InvalidAlignment(value.to_string())),
        }
    }
}

// Persisted files may carry alignments typed freely into the settings
// dialog; anything unrecognized renders centered.
impl<'de> Deserialize<'de> for Alignment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(raw
            .as_str()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default())
    }
}

/// Column widths for a table.
///
/// A list shorter than the column count is reused cyclically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnWidths {
    /// One width for every column.
    Uniform(u32),
    /// Per-column widths, never empty.
    List(Vec<u32>),
}

impl ColumnWidths {
    /// Parses settings input: a single width or a comma-separated list.
    pub fn parse(input: &str) -> Result<Self, TableError> {
        let trimmed = input.trim();
        if trimmed.contains(',') {
            let widths = trimmed
                .split(',')
                .map(|part| parse_width(part, input))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::List(widths));
        }
        parse_width(trimmed, input).map(Self::Uniform)
    }

    /// Width for column `col`, cycling through a shorter list.
    pub fn width_for(&self, col: usize) -> u32 {
        let values = self.values();
        if values.is_empty() {
            return DEFAULT_CELL_WIDTH;
        }
        values[col % values.len()]
    }

    pub fn values(&self) -> &[u32] {
        match self {
            Self::Uniform(width) => std::slice::from_ref(width),
            Self::List(widths) => widths,
        }
    }
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self::Uniform(DEFAULT_CELL_WIDTH)
    }
}

/// Text pre-filled into the width field of the settings dialog.
impl Display for ColumnWidths {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uniform(width) => write!(f, "{width}"),
            Self::List(widths) => {
                let joined = widths
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                f.write_str(&joined)
            }
        }
    }
}

impl Serialize for ColumnWidths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Uniform(width) => serializer.serialize_u32(*width),
            Self::List(_) => serializer.serialize_str(&self.to_string()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedWidths {
    Number(u64),
    Text(String),
    Numbers(Vec<u32>),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for ColumnWidths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match PersistedWidths::deserialize(deserializer)? {
            PersistedWidths::Number(width) => u32::try_from(width).ok().map(Self::Uniform),
            PersistedWidths::Text(value) => Self::parse(&value).ok(),
            PersistedWidths::Numbers(widths) if !widths.is_empty() => Some(Self::List(widths)),
            PersistedWidths::Numbers(_) | PersistedWidths::Other(_) => None,
        };
        Ok(parsed.unwrap_or_else(|| {
            warn!("event=table_widths_fallback module=model status=skip reason=malformed_cell_width");
            Self::default()
        }))
    }
}

fn parse_width(part: &str, input: &str) -> Result<u32, TableError> {
    part.trim()
        .parse::<u32>()
        .map_err(|_| TableError::InvalidWidth(input.trim().to_string()))
}

fn parse_dimension(value: &str, field: &'static str) -> Result<usize, TableError> {
    let parsed = value
        .trim()
        .parse::<usize>()
        .map_err(|_| TableError::InvalidDimension {
            field,
            value: value.to_string(),
        })?;
    check_dimension(parsed, field)?;
    Ok(parsed)
}

/// Rejects a row or column count above `MAX_TABLE_DIMENSION`.
pub fn check_dimension(value: usize, field: &'static str) -> Result<(), TableError> {
    if value > MAX_TABLE_DIMENSION {
        return Err(TableError::InvalidDimension {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Live state of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    rows: usize,
    cols: usize,
    widths: ColumnWidths,
    alignment: Alignment,
    cells: Vec<Vec<String>>,
    frame: Frame,
}

impl Table {
    /// Creates an empty `rows x cols` table with default layout and frame.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_layout(
            rows,
            cols,
            ColumnWidths::default(),
            Alignment::default(),
            Frame::new(
                DEFAULT_TABLE_WIDTH,
                DEFAULT_TABLE_HEIGHT,
                DEFAULT_TABLE_BACKGROUND,
            ),
        )
    }

    pub fn with_layout(
        rows: usize,
        cols: usize,
        widths: ColumnWidths,
        alignment: Alignment,
        frame: Frame,
    ) -> Self {
        let rows = rows.min(MAX_TABLE_DIMENSION);
        let cols = cols.min(MAX_TABLE_DIMENSION);
        Self {
            rows,
            cols,
            widths,
            alignment,
            cells: blank_grid(rows, cols),
            frame,
        }
    }

    /// Rebuilds a table from a decoded persisted record.
    ///
    /// Saved cell data is clipped to the record's own dimensions.
    pub fn from_record(record: TableRecord) -> Self {
        let mut table = Self::with_layout(
            record.rows,
            record.cols,
            record.cell_width,
            record.align,
            Frame::new(record.width, record.height, record.bg),
        );
        table.restore_cells(&record.data);
        table
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn column_widths(&self) -> &ColumnWidths {
        &self.widths
    }

    /// Display width of column `col`.
    pub fn column_width(&self, col: usize) -> u32 {
        self.widths.width_for(col)
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.cells
            .get(row)
            .and_then(|values| values.get(col))
            .map(String::as_str)
    }

    /// Replaces one cell value.
    ///
    /// # Errors
    /// - `CellOutOfRange` when `row >= rows` or `col >= cols`.
    pub fn set_cell(
        &mut self,
        row: usize,
        col: usize,
        value: impl Into<String>,
    ) -> Result<(), TableError> {
        if row >= self.rows || col >= self.cols {
            return Err(TableError::CellOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.cells[row][col] = value.into();
        Ok(())
    }

    /// Changes dimensions and layout, keeping cells where old and new grids
    /// overlap. New cells start empty. Dimensions are capped at
    /// `MAX_TABLE_DIMENSION`.
    pub fn rebuild(&mut self, rows: usize, cols: usize, widths: ColumnWidths, alignment: Alignment) {
        let rows = rows.min(MAX_TABLE_DIMENSION);
        let cols = cols.min(MAX_TABLE_DIMENSION);
        let mut grid = blank_grid(rows, cols);
        for (old_row, new_row) in self.cells.iter_mut().zip(grid.iter_mut()) {
            for (old_value, new_value) in old_row.iter_mut().zip(new_row.iter_mut()) {
                *new_value = std::mem::take(old_value);
            }
        }

        self.cells = grid;
        self.rows = rows;
        self.cols = cols;
        self.widths = widths;
        self.alignment = alignment;
    }

    /// Validates raw settings-dialog input and rebuilds with it.
    ///
    /// # Errors
    /// - Any validation error; the table is left unchanged.
    pub fn apply_settings(
        &mut self,
        rows: &str,
        cols: &str,
        widths: &str,
        alignment: &str,
    ) -> Result<(), TableError> {
        let rows = parse_dimension(rows, "rows")?;
        let cols = parse_dimension(cols, "columns")?;
        let widths = ColumnWidths::parse(widths)?;
        let alignment = alignment.parse::<Alignment>()?;
        self.rebuild(rows, cols, widths, alignment);
        Ok(())
    }

    /// Copies saved values into the grid, discarding anything beyond the
    /// current dimensions.
    pub fn restore_cells(&mut self, saved: &[Vec<String>]) {
        for (saved_row, row) in saved.iter().zip(self.cells.iter_mut()) {
            for (saved_value, value) in saved_row.iter().zip(row.iter_mut()) {
                value.clone_from(saved_value);
            }
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn set_color(&mut self, color: impl Into<String>) {
        self.frame.set_background(color);
    }

    /// See [`Frame::resize`].
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        self.frame.resize(width, height)
    }

    /// Snapshot of all current fields, including cell values.
    pub fn data(&self) -> TableRecord {
        TableRecord {
            rows: self.rows,
            cols: self.cols,
            cell_width: self.widths.clone(),
            align: self.alignment,
            width: self.frame.width(),
            height: self.frame.height(),
            bg: self.frame.background().to_string(),
            data: self.cells.clone(),
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE_ROWS, DEFAULT_TABLE_COLS)
    }
}

fn blank_grid(rows: usize, cols: usize) -> Vec<Vec<String>> {
    vec![vec![String::new(); cols]; rows]
}
