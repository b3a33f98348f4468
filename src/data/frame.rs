use crate::error::{Result, SlidecvError};
use crate::splitters::{DataSplit, RowId, TimeSeriesTable};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::cmp::Ordering;
use std::fmt;

/// Comparable time value read out of a polars column.
///
/// Integer and temporal dtypes map to `Int` through their physical
/// representation, floats to `Float`, strings to `Text`. A single column only
/// ever produces one variant.
#[derive(Debug, Clone)]
pub enum ColumnValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ColumnValue {
    fn rank(&self) -> u8 {
        match self {
            Self::Int(_) => 0,
            Self::Float(_) => 1,
            Self::Text(_) => 2,
        }
    }
}

impl PartialEq for ColumnValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ColumnValue {}

impl PartialOrd for ColumnValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ColumnValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            // -0.0 and 0.0 compare equal
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b)),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => write!(f, "{}", v),
        }
    }
}

pub fn is_supported_time_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::String
            | DataType::Date
            | DataType::Datetime(_, _)
            | DataType::Duration(_)
            | DataType::Time
    )
}

fn null_at(name: &str, row: usize) -> SlidecvError {
    SlidecvError::Data(format!("null value in time column '{}' at row {}", name, row))
}

fn float_value(name: &str, row: usize, value: Option<f64>) -> Result<ColumnValue> {
    match value {
        Some(v) if v.is_nan() => Err(SlidecvError::Data(format!(
            "NaN in time column '{}' at row {}",
            name, row
        ))),
        // Adding 0.0 turns -0.0 into 0.0
        Some(v) => Ok(ColumnValue::Float(v + 0.0)),
        None => Err(null_at(name, row)),
    }
}

/// Read a column into comparable values, rejecting nulls and NaN.
pub fn column_values(series: &Series) -> Result<Vec<ColumnValue>> {
    let name = series.name().as_str();

    match series.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let cast = series.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| float_value(name, row, v))
                .collect()
        }
        DataType::String => series
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.map(|s| ColumnValue::Text(s.to_string()))
                    .ok_or_else(|| null_at(name, row))
            })
            .collect(),
        dtype if is_supported_time_dtype(dtype) => {
            let physical = series
                .to_physical_repr()
                .strict_cast(&DataType::Int64)
                .map_err(|e| {
                    SlidecvError::Data(format!(
                        "time column '{}' has values outside the Int64 range: {}",
                        name, e
                    ))
                })?;
            physical
                .i64()?
                .into_iter()
                .enumerate()
                .map(|(row, v)| v.map(ColumnValue::Int).ok_or_else(|| null_at(name, row)))
                .collect()
        }
        dtype => Err(SlidecvError::Data(format!(
            "column '{}' has dtype {:?}, which cannot be used as a time axis",
            name, dtype
        ))),
    }
}

impl TimeSeriesTable for DataFrame {
    type Value = ColumnValue;

    fn num_rows(&self) -> usize {
        self.height()
    }

    fn get_column(&self, name: &str) -> Result<Vec<ColumnValue>> {
        let column = self
            .column(name)
            .map_err(|_| SlidecvError::ColumnNotFound(name.to_string()))?;
        column_values(column.as_materialized_series())
    }
}

/// Train and test rows of one fold, materialized
#[derive(Debug, Clone)]
pub struct FrameSplit {
    pub fold_num: usize,
    pub train: DataFrame,
    pub test: DataFrame,
}

fn to_idx(ids: &[RowId]) -> IdxCa {
    IdxCa::from_vec(
        "idx".into(),
        ids.iter().map(|&id| id as IdxSize).collect(),
    )
}

/// Gather the rows a fold selected, keeping their original order.
pub fn take_split<T>(df: &DataFrame, split: &DataSplit<T>) -> Result<FrameSplit> {
    Ok(FrameSplit {
        fold_num: split.fold_num,
        train: df.take(&to_idx(&split.train_ids))?,
        test: df.take(&to_idx(&split.test_ids))?,
    })
}

/// Deterministically permute the rows of `df`.
pub fn shuffle_rows(df: &DataFrame, seed: u64) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<RowId> = (0..df.height()).collect();
    order.shuffle(&mut rng);
    Ok(df.take(&to_idx(&order))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    #[test]
    fn test_int_column() {
        let df = df! { "t" => &[3i64, 1, 2] }.unwrap();
        let values = TimeSeriesTable::get_column(&df, "t").unwrap();
        assert_eq!(values, vec![ColumnValue::Int(3), ColumnValue::Int(1), ColumnValue::Int(2)]);
    }

    #[test]
    fn test_date_column_uses_physical_days() {
        let mut df = df! { "d" => &[0i32, 31, 59] }.unwrap();
        let dates = df.column("d").unwrap().cast(&DataType::Date).unwrap();
        df.with_column(dates).unwrap();
        assert_eq!(df.column("d").unwrap().dtype(), &DataType::Date);
        let values = TimeSeriesTable::get_column(&df, "d").unwrap();
        assert_eq!(values[1], ColumnValue::Int(31));
    }

    #[test]
    fn test_text_ordering() {
        let a = ColumnValue::Text("1949-01".to_string());
        let b = ColumnValue::Text("1949-02".to_string());
        assert!(a < b);
    }

    #[test]
    fn test_null_in_time_column() {
        let df = df! { "t" => &[Some(1i64), None, Some(3)] }.unwrap();
        assert!(matches!(TimeSeriesTable::get_column(&df, "t"), Err(SlidecvError::Data(_))));
    }

    #[test]
    fn test_nan_in_float_column() {
        let df = df! { "t" => &[1.0, 2.0, f64::NAN, 4.0] }.unwrap();
        assert!(matches!(
            TimeSeriesTable::get_column(&df, "t"),
            Err(SlidecvError::Data(msg)) if msg.contains("NaN")
        ));
    }

    #[test]
    fn test_negative_zero_equals_zero() {
        let df = df! { "t" => &[-0.0f64, 0.0] }.unwrap();
        let values = TimeSeriesTable::get_column(&df, "t").unwrap();
        assert_eq!(values[0], values[1]);
        assert_eq!(ColumnValue::Float(-0.0), ColumnValue::Float(0.0));
    }

    #[test]
    fn test_uint64_overflow_is_not_reported_as_null() {
        let df = df! { "t" => &[1u64, u64::MAX] }.unwrap();
        match TimeSeriesTable::get_column(&df, "t") {
            Err(SlidecvError::Data(msg)) => {
                assert!(msg.contains("Int64"));
                assert!(!msg.contains("null"));
            }
            other => panic!("expected a data error, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_dtype() {
        let df = df! { "flag" => &[true, false] }.unwrap();
        assert!(matches!(TimeSeriesTable::get_column(&df, "flag"), Err(SlidecvError::Data(_))));
    }

    #[test]
    fn test_missing_column() {
        let df = df! { "t" => &[1i64] }.unwrap();
        assert!(matches!(TimeSeriesTable::get_column(&df, "x"), Err(SlidecvError::ColumnNotFound(_))));
    }

    #[test]
    fn test_shuffle_is_seeded() {
        let df = df! { "t" => (0..20i64).collect::<Vec<_>>() }.unwrap();
        let a = shuffle_rows(&df, 7).unwrap();
        let b = shuffle_rows(&df, 7).unwrap();
        assert!(a.equals(&b));
        assert_eq!(a.height(), 20);
    }
}
