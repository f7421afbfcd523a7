use crate::error::{Result, TradetuneError};
use polars::prelude::*;
use super::types::RequiredColumn;
use std::collections::HashMap;

pub struct DataValidator;

impl DataValidator {
    /// Map each required column to the name it has in `df`, checking it is numeric.
    pub fn validate_columns(
        df: &DataFrame,
        required: &[RequiredColumn],
    ) -> Result<HashMap<RequiredColumn, String>> {
        let mut column_map = HashMap::new();

        for req in required {
            let col_name = Self::find_column(df, req).ok_or_else(|| {
                TradetuneError::DataLoading(format!(
                    "Missing required column: {} (tried aliases: {:?})",
                    req.as_str(),
                    req.aliases()
                ))
            })?;

            let series = df.column(col_name)?;
            if !matches!(series.dtype(), DataType::Float64 | DataType::Float32 | DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32) {
                return Err(TradetuneError::DataLoading(format!(
                    "Column '{}' ({}) must be numeric, found {:?}",
                    col_name,
                    req.as_str(),
                    series.dtype()
                )));
            }
            column_map.insert(*req, col_name.to_string());
        }

        Ok(column_map)
    }

    /// Validate that DataFrame has all OHLCV columns with consistent bars
    pub fn validate_ohlcv(df: &DataFrame) -> Result<HashMap<RequiredColumn, String>> {
        let column_map = Self::validate_columns(df, &RequiredColumn::all())?;
        Self::validate_ohlc_relationships(df, &column_map)?;
        Ok(column_map)
    }

    /// Find column by checking aliases
    pub fn find_column<'a>(df: &'a DataFrame, required: &RequiredColumn) -> Option<&'a str> {
        df.get_column_names()
            .into_iter()
            .find(|col| required.aliases().contains(&col.as_str()))
            .map(|col| col.as_str())
    }

    /// Validate OHLC relationships (high >= low, high >= open, high >= close, etc.)
    pub fn validate_ohlc_relationships(
        df: &DataFrame,
        column_map: &HashMap<RequiredColumn, String>,
    ) -> Result<()> {
        let column = |req: RequiredColumn| -> Result<Column> {
            let name = column_map.get(&req).ok_or_else(|| {
                TradetuneError::DataLoading(format!("Missing required column: {}", req.as_str()))
            })?;
            Ok(df.column(name)?.cast(&DataType::Float64)?)
        };

        let open = column(RequiredColumn::Open)?;
        let high = column(RequiredColumn::High)?;
        let low = column(RequiredColumn::Low)?;
        let close = column(RequiredColumn::Close)?;

        let (open, high, low, close) = (open.f64()?, high.f64()?, low.f64()?, close.f64()?);

        for i in 0..df.height() {
            if let (Some(h), Some(l), Some(o), Some(c)) =
                (high.get(i), low.get(i), open.get(i), close.get(i))
            {
                if h < l {
                    return Err(TradetuneError::DataLoading(format!(
                        "Invalid data at row {}: high ({}) < low ({})",
                        i, h, l
                    )));
                }
                if h < o || h < c {
                    return Err(TradetuneError::DataLoading(format!(
                        "Invalid data at row {}: high ({}) < open ({}) or close ({})",
                        i, h, o, c
                    )));
                }
                if l > o || l > c {
                    return Err(TradetuneError::DataLoading(format!(
                        "Invalid data at row {}: low ({}) > open ({}) or close ({})",
                        i, l, o, c
                    )));
                }
            }
        }

        Ok(())
    }

    /// Check for minimum required rows
    pub fn validate_minimum_rows(df: &DataFrame, min_rows: usize) -> Result<()> {
        if df.height() < min_rows {
            return Err(TradetuneError::DataLoading(format!(
                "Insufficient data: {} rows, minimum {} required",
                df.height(),
                min_rows
            )));
        }
        Ok(())
    }

    /// Null counts per column, only for columns that have any
    pub fn check_nulls(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_validate_good_data() {
        let df = df! {
            "open" => &[100.0, 101.0, 102.0],
            "high" => &[101.0, 103.0, 104.0],
            "low" => &[99.0, 100.0, 101.0],
            "close" => &[100.5, 102.0, 103.0],
            "volume" => &[1000.0, 1500.0, 1200.0],
        }
        .unwrap();

        assert!(DataValidator::validate_ohlcv(&df).is_ok());
    }

    #[test]
    fn test_validate_missing_column() {
        let df = df! {
            "open" => &[100.0, 101.0],
            "high" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            "volume" => &[1000.0, 1500.0],
        }
        .unwrap();

        assert!(DataValidator::validate_ohlcv(&df).is_err());
        assert!(DataValidator::validate_columns(&df, &[RequiredColumn::Close]).is_err());
    }

    #[test]
    fn test_validate_invalid_ohlc() {
        let df = df! {
            "open" => &[100.0, 101.0],
            "high" => &[99.0, 103.0], // High < Open at row 0
            "low" => &[99.0, 100.0],
            "close" => &[100.5, 102.0],
            "volume" => &[1000.0, 1500.0],
        }
        .unwrap();

        assert!(DataValidator::validate_ohlcv(&df).is_err());
    }

    #[test]
    fn test_column_aliases() {
        let df = df! {
            "Open" => &[100.0, 101.0],
            "HIGH" => &[101.0, 103.0],
            "low" => &[99.0, 100.0],
            "Close" => &[100.5, 102.0],
            "Vol" => &[1000.0, 1500.0],
        }
        .unwrap();

        let map = DataValidator::validate_ohlcv(&df).unwrap();
        assert_eq!(map[&RequiredColumn::Close], "Close");
    }

    #[test]
    fn test_non_numeric_close_rejected() {
        let df = df! { "close" => &["a", "b"] }.unwrap();
        assert!(DataValidator::validate_columns(&df, &[RequiredColumn::Close]).is_err());
    }

    #[test]
    fn test_minimum_rows_and_nulls() {
        let df = df! { "close" => &[Some(1.0), None, Some(3.0)] }.unwrap();
        assert!(DataValidator::validate_minimum_rows(&df, 3).is_ok());
        assert!(DataValidator::validate_minimum_rows(&df, 4).is_err());
        assert_eq!(DataValidator::check_nulls(&df), vec![("close".to_string(), 1)]);
    }
}
