use crate::error::{Result, TradetuneError};
use polars::prelude::*;
use std::path::Path;
use super::{types::RequiredColumn, validator::DataValidator};

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| TradetuneError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a price file ready for backtesting.
    ///
    /// Column names are normalised, a numeric `close` column is required and
    /// OHLC consistency is checked when all four price columns are present.
    pub fn load_and_validate<P: AsRef<Path>>(path: P, min_rows: Option<usize>) -> Result<DataFrame> {
        let df = Self::normalize_columns(Self::load(&path)?)?;

        let close_map = DataValidator::validate_columns(&df, &[RequiredColumn::Close])?;
        let price_columns = [
            RequiredColumn::Open,
            RequiredColumn::High,
            RequiredColumn::Low,
            RequiredColumn::Close,
        ];
        if price_columns
            .iter()
            .all(|c| DataValidator::find_column(&df, c).is_some())
        {
            let column_map = DataValidator::validate_columns(&df, &price_columns)?;
            DataValidator::validate_ohlc_relationships(&df, &column_map)?;
        }

        DataValidator::validate_minimum_rows(&df, min_rows.unwrap_or(100))?;

        // Warn about nulls but don't fail
        let null_report = DataValidator::check_nulls(&df);
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        log::info!(
            "Loaded {} rows from {} (close column '{}')",
            df.height(),
            path.as_ref().display(),
            close_map[&RequiredColumn::Close]
        );
        Ok(df)
    }

    /// Rename recognised OHLCV aliases to lowercase standard names
    pub fn normalize_columns(mut df: DataFrame) -> Result<DataFrame> {
        for required in RequiredColumn::all() {
            let Some(actual_name) = DataValidator::find_column(&df, &required).map(str::to_string) else {
                continue;
            };
            let standard_name = required.as_str();
            if actual_name != standard_name {
                df.rename(&actual_name, standard_name.into()).map_err(|e| {
                    TradetuneError::DataLoading(format!("Failed to rename column: {}", e))
                })?;
            }
        }

        Ok(df)
    }
}
