//! Tabular Data Loader Module
//! Reads `.csv`, `.tsv` and `.xlsx` files into a Polars DataFrame.

use calamine::{open_workbook, Data, Reader, Xlsx};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Load(String),
}

/// Recognized input formats, keyed by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xlsx,
    Csv,
    Tsv,
}

impl FileFormat {
    pub const EXTENSIONS: [&'static str; 3] = ["xlsx", "csv", "tsv"];

    /// Detect the format from the extension, ignoring case.
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(LoaderError::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                format!(".{}", ext)
            })),
        }
    }
}

/// Owns the currently loaded table. A failed load never replaces it.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Parse `path` and, on success, make it the current table.
    pub fn load(&mut self, path: &Path) -> Result<&DataFrame, LoaderError> {
        let df = Self::read_file(path)?;
        self.file_path = Some(path.to_path_buf());
        Ok(self.df.insert(df))
    }

    /// Parse a file without touching any loader state.
    pub fn read_file(path: &Path) -> Result<DataFrame, LoaderError> {
        match FileFormat::from_path(path)? {
            FileFormat::Csv => Self::read_delimited(path, b','),
            FileFormat::Tsv => Self::read_delimited(path, b'\t'),
            FileFormat::Xlsx => Self::read_xlsx(path),
        }
    }

    fn read_delimited(path: &Path, separator: u8) -> Result<DataFrame, LoaderError> {
        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(separator)
            .with_infer_schema_length(Some(10000))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|e| LoaderError::Load(e.to_string()))
    }

    /// First worksheet only; the first row holds the headers.
    fn read_xlsx(path: &Path) -> Result<DataFrame, LoaderError> {
        let mut workbook: Xlsx<_> =
            open_workbook(path).map_err(|e| LoaderError::Load(format!("Excel: {}", e)))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoaderError::Load("Excel file has no worksheets".to_string()))?
            .map_err(|e| LoaderError::Load(format!("Excel: {}", e)))?;

        let rows: Vec<&[Data]> = range.rows().collect();
        let Some((header, body)) = rows.split_first() else {
            return Ok(DataFrame::default());
        };

        let columns = Self::header_names(header)
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let cells: Vec<&Data> = body
                    .iter()
                    .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                    .collect();
                Self::cells_to_column(&name, &cells)
            })
            .collect();

        DataFrame::new(columns).map_err(|e| LoaderError::Load(e.to_string()))
    }

    /// Column names from the header row. Blank cells become `Unnamed: <idx>`;
    /// repeats get the same `_duplicated_<n>` suffix the CSV reader uses.
    fn header_names(header: &[Data]) -> Vec<String> {
        let mut seen = HashSet::new();
        header
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let base = match cell {
                    Data::Empty => format!("Unnamed: {}", idx),
                    other => other.to_string(),
                };
                let mut name = base.clone();
                let mut n = 0;
                while seen.contains(&name) {
                    name = format!("{}_duplicated_{}", base, n);
                    n += 1;
                }
                seen.insert(name.clone());
                name
            })
            .collect()
    }

    /// Whole numbers are stored as floats in xlsx; read them back as integers.
    fn as_int(cell: &Data) -> Option<i64> {
        match cell {
            Data::Int(v) => Some(*v),
            Data::Float(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => Some(*v as i64),
            _ => None,
        }
    }

    /// Int64 if every non-empty cell is a whole number, Float64 if every one
    /// is a number, String otherwise.
    fn cells_to_column(name: &str, cells: &[&Data]) -> Column {
        let filled = || cells.iter().filter(|c| !matches!(c, Data::Empty));
        let all_int = filled().all(|c| Self::as_int(c).is_some());
        let all_numeric = filled().all(|c| matches!(c, Data::Int(_) | Data::Float(_)));

        if all_int {
            let values: Vec<Option<i64>> = cells.iter().map(|c| Self::as_int(c)).collect();
            Column::new(name.into(), values)
        } else if all_numeric {
            let values: Vec<Option<f64>> = cells
                .iter()
                .map(|c| match c {
                    Data::Int(v) => Some(*v as f64),
                    Data::Float(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        } else {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| match c {
                    Data::Empty => None,
                    other => Some(other.to_string()),
                })
                .collect();
            Column::new(name.into(), values)
        }
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}
