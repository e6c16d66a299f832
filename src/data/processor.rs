//! Data Processor Module
//! Extracts plot-ready values from DataFrame columns.

use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
}

/// Values of a column as they land on an axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisValues {
    Numeric(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
}

/// One group of Y values sharing the same X label.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueGroup {
    pub label: String,
    pub values: Vec<f64>,
}

/// Handles column lookups and conversions for the renderers.
pub struct DataProcessor;

impl DataProcessor {
    pub fn is_numeric_dtype(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name)
            .map_err(|_| ProcessorError::ColumnNotFound(name.to_string()))
    }

    /// True if the named column holds a numeric dtype.
    pub fn is_numeric(df: &DataFrame, name: &str) -> Result<bool, ProcessorError> {
        Ok(Self::is_numeric_dtype(Self::column(df, name)?.dtype()))
    }

    /// Column cast to f64. NaN is reported as missing.
    pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ProcessorError> {
        let column = Self::column(df, name)?;
        if !Self::is_numeric_dtype(column.dtype()) {
            return Err(ProcessorError::NotNumeric(name.to_string()));
        }
        let value_f64 = column.cast(&DataType::Float64)?;
        let value_ca = value_f64.f64()?;
        Ok(value_ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Non-missing numeric values only.
    pub fn finite_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, ProcessorError> {
        Ok(Self::numeric_values(df, name)?.into_iter().flatten().collect())
    }

    /// Column rendered as text, one entry per row.
    pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, ProcessorError> {
        let column = Self::column(df, name)?;
        let series = column.as_materialized_series();
        Ok((0..series.len())
            .map(|i| {
                series.get(i).ok().and_then(|val| {
                    if val.is_null() {
                        None
                    } else {
                        Some(val.to_string().trim_matches('"').to_string())
                    }
                })
            })
            .collect())
    }

    /// Numeric columns stay numeric, everything else becomes categorical text.
    pub fn axis_values(df: &DataFrame, name: &str) -> Result<AxisValues, ProcessorError> {
        if Self::is_numeric(df, name)? {
            Ok(AxisValues::Numeric(Self::numeric_values(df, name)?))
        } else {
            Ok(AxisValues::Categorical(Self::text_values(df, name)?))
        }
    }

    /// Group the numeric `y` column by the values of `x`.
    ///
    /// Numeric group keys are ordered by value, text keys by first appearance.
    /// Rows with a missing key or value are skipped.
    pub fn group_by_category(
        df: &DataFrame,
        x: &str,
        y: &str,
    ) -> Result<Vec<ValueGroup>, ProcessorError> {
        let values = Self::numeric_values(df, y)?;
        let keys = Self::text_values(df, x)?;
        let numeric_keys = if Self::is_numeric(df, x)? {
            Some(Self::numeric_values(df, x)?)
        } else {
            None
        };

        let mut groups: Vec<(Option<f64>, ValueGroup)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        for (i, (key, value)) in keys.into_iter().zip(values).enumerate() {
            let (Some(key), Some(value)) = (key, value) else {
                continue;
            };
            match slots.get(&key) {
                Some(&slot) => groups[slot].1.values.push(value),
                None => {
                    let order = numeric_keys.as_ref().and_then(|k| k[i]);
                    slots.insert(key.clone(), groups.len());
                    groups.push((
                        order,
                        ValueGroup {
                            label: key,
                            values: vec![value],
                        },
                    ));
                }
            }
        }

        if numeric_keys.is_some() {
            groups.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        }

        Ok(groups.into_iter().map(|(_, g)| g).collect())
    }
}
