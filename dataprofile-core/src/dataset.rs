//! In-memory tabular dataset loaded from delimited text

use crate::config::LoadOptions;
use crate::{ProfileError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Cell contents treated as missing when reading
static MISSING_TOKENS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
        "#N/A", "#NA", "#N/A N/A", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN",
    ]
    .into_iter()
    .collect()
});

pub fn is_missing_token(cell: &str) -> bool {
    MISSING_TOKENS.contains(cell)
}

/// Storage type inferred for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Integer => "int64",
            DataType::Float => "float64",
            DataType::Boolean => "bool",
            DataType::Text => "object",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }
}

/// A named column holding raw cells and the type inferred from them
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    cells: Vec<String>,
    dtype: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<String>) -> Self {
        let dtype = infer_dtype(&cells);
        Self {
            name: name.into(),
            cells,
            dtype,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, row: usize) -> &str {
        &self.cells[row]
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn is_missing(&self, row: usize) -> bool {
        is_missing_token(&self.cells[row])
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| is_missing_token(c)).count()
    }

    /// Non-missing cells in row order
    pub fn present(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells
            .iter()
            .map(String::as_str)
            .filter(|c| !is_missing_token(c))
    }

    /// Cells as floats, `None` where missing or unparseable
    pub fn as_f64(&self) -> Vec<Option<f64>> {
        self.cells
            .iter()
            .map(|c| {
                if is_missing_token(c) {
                    None
                } else {
                    c.trim().parse::<f64>().ok()
                }
            })
            .collect()
    }

    /// Cells as booleans, `None` where missing or not a boolean literal
    pub fn as_bool(&self) -> Vec<Option<bool>> {
        self.cells
            .iter()
            .map(|c| if is_missing_token(c) { None } else { parse_bool(c) })
            .collect()
    }

    /// Approximate bytes held by the cells
    pub fn memory_size(&self) -> usize {
        self.cells.iter().map(String::len).sum()
    }

    fn display_cell(&self, row: usize) -> &str {
        if self.is_missing(row) {
            "NaN"
        } else {
            self.cell(row)
        }
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    let cell = cell.trim();
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Integer if every present cell is an i64, then float, then bool, else text.
/// A column with nothing present is float, as an all-NaN column would be.
fn infer_dtype(cells: &[String]) -> DataType {
    let mut present = cells
        .iter()
        .filter(|c| !is_missing_token(c))
        .map(|c| c.trim())
        .peekable();

    if present.peek().is_none() {
        return DataType::Float;
    }

    let present: Vec<&str> = present.collect();
    if present.iter().all(|c| c.parse::<i64>().is_ok()) {
        DataType::Integer
    } else if present.iter().all(|c| c.parse::<f64>().is_ok()) {
        DataType::Float
    } else if present.iter().all(|c| parse_bool(c).is_some()) {
        DataType::Boolean
    } else {
        DataType::Text
    }
}

/// Column-oriented table loaded fully into memory
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset from named columns; all columns must have the same length
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(ProfileError::InvalidDataFormat(format!(
                "column '{}' has {} rows, expected {}",
                bad.name(),
                bad.len(),
                n_rows
            )));
        }
        Ok(Self { columns, n_rows })
    }

    /// Read a delimited file into memory
    pub fn from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file, options)
    }

    /// Read delimited text from any reader into memory
    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter_byte()?)
            .quoting(options.quoting)
            .has_headers(options.has_headers)
            .flexible(false)
            .from_reader(reader);

        let mut names: Vec<String> = if options.has_headers {
            let headers = reader.headers()?;
            if headers.is_empty() {
                return Err(ProfileError::EmptyInput(
                    "the first line must name the columns".into(),
                ));
            }
            headers.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for result in reader.records() {
            let record = result?;
            if cells.is_empty() {
                // Headerless input: the first record fixes the width
                names = (0..record.len()).map(|i| i.to_string()).collect();
                cells = vec![Vec::new(); record.len()];
            }
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
        }

        let names = dedupe_names(names);
        let columns: Vec<Column> = names
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();

        let dataset = Self::from_columns(columns)?;
        for column in &dataset.columns {
            debug!("Column '{}' inferred as {}", column.name(), column.dtype().as_str());
        }
        info!(
            "Loaded {} rows x {} columns",
            dataset.n_rows(),
            dataset.n_columns()
        );
        Ok(dataset)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Cells of one row, in column order
    pub fn row(&self, index: usize) -> Vec<&str> {
        self.columns.iter().map(|c| c.cell(index)).collect()
    }

    /// First `n` rows as owned cells
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        self.rows_owned(0..n.min(self.n_rows))
    }

    /// Last `n` rows as owned cells
    pub fn tail(&self, n: usize) -> Vec<Vec<String>> {
        let start = self.n_rows.saturating_sub(n);
        self.rows_owned(start..self.n_rows)
    }

    fn rows_owned(&self, range: std::ops::Range<usize>) -> Vec<Vec<String>> {
        range
            .map(|i| self.row(i).into_iter().map(str::to_string).collect())
            .collect()
    }

    /// Plain-text table of the first `n` rows with a row-index column
    pub fn preview(&self, n: usize) -> String {
        let shown = n.min(self.n_rows);
        let index_width = shown.saturating_sub(1).to_string().len();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .map(|c| {
                (0..shown)
                    .map(|row| c.display_cell(row).chars().count())
                    .chain(std::iter::once(c.name().chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&" ".repeat(index_width));
        for (column, width) in self.columns.iter().zip(&widths) {
            let _ = write!(out, "  {:>width$}", column.name(), width = width);
        }
        out.push('\n');

        for row in 0..shown {
            let _ = write!(out, "{:<width$}", row, width = index_width);
            for (column, width) in self.columns.iter().zip(&widths) {
                let _ = write!(out, "  {:>width$}", column.display_cell(row), width = width);
            }
            out.push('\n');
        }

        let _ = write!(
            out,
            "\n[{} rows x {} columns]",
            self.n_rows,
            self.n_columns()
        );
        out
    }
}

/// Repeated names get `.1`, `.2`, ... suffixes in order of appearance
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            if *count == 0 {
                *count = 1;
                return name;
            }
            loop {
                let candidate = format!("{}.{}", name, count);
                *count += 1;
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
            }
        })
        .collect()
}
