//! CSV Data Loader Module
//! Reads the survey CSV into a typed DataFrame using Polars.

use crate::data::columns;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Required column missing: {0}")]
    MissingColumn(String),
    #[error("Column {column} could not be read as {dtype}: {source}")]
    InvalidColumn {
        column: String,
        dtype: DataType,
        #[source]
        source: PolarsError,
    },
}

/// Loads the survey dataset and coerces the required columns to their types.
pub struct DataLoader {
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: 10000,
        }
    }

    /// Load a CSV file. A row with more fields than the header or an untyped required
    /// column fails the load; short rows are padded with nulls.
    pub fn load_csv(&self, path: &Path) -> Result<DataFrame, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .finish()?
            .collect()?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "csv parsed"
        );

        let df = Self::coerce_required(df)?;
        info!(path = %path.display(), rows = df.height(), "dataset loaded");
        Ok(df)
    }

    /// Check that every required column is present and cast it strictly to its type.
    pub fn coerce_required(mut df: DataFrame) -> Result<DataFrame, LoadError> {
        for (name, dtype) in columns::REQUIRED {
            let column = df
                .column(name)
                .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
            if column.dtype() == &dtype {
                continue;
            }

            // strict_cast can only report failures on a single-chunk series
            let cast = column
                .as_materialized_series()
                .rechunk()
                .strict_cast(&dtype)
                .map_err(|source| LoadError::InvalidColumn {
                    column: name.to_string(),
                    dtype: dtype.clone(),
                    source,
                })?;
            df.with_column(cast)?;
        }
        Ok(df)
    }
}
