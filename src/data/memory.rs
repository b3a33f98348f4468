use crate::error::Result;
use polars::prelude::*;
use rayon::prelude::*;

/// Fractional mass under which a float column is treated as integral.
const INTEGRAL_TOLERANCE: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub column: String,
    pub from: DataType,
    pub to: DataType,
}

/// Outcome of [`reduce_mem_usage`]
#[derive(Debug, Clone)]
pub struct MemoryReduction {
    /// Columns whose nulls/NaNs were filled with `min - 1`
    pub na_columns: Vec<String>,
    pub conversions: Vec<Conversion>,
    pub start_bytes: usize,
    pub end_bytes: usize,
}

impl MemoryReduction {
    pub fn size_ratio(&self) -> f64 {
        if self.start_bytes == 0 {
            return 1.0;
        }
        self.end_bytes as f64 / self.start_bytes as f64
    }
}

struct ColumnPlan {
    name: PlSmallStr,
    from: DataType,
    to: Option<DataType>,
    missing: bool,
    fill: Option<f64>,
}

fn is_numeric(dtype: &DataType) -> bool {
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
    )
}

fn integer_target(min: f64, max: f64) -> Option<DataType> {
    if min >= 0.0 {
        let dtype = if max < u8::MAX as f64 {
            DataType::UInt8
        } else if max < u16::MAX as f64 {
            DataType::UInt16
        } else if max < u32::MAX as f64 {
            DataType::UInt32
        } else {
            DataType::UInt64
        };
        return Some(dtype);
    }

    let signed = [
        (i8::MIN as f64, i8::MAX as f64, DataType::Int8),
        (i16::MIN as f64, i16::MAX as f64, DataType::Int16),
        (i32::MIN as f64, i32::MAX as f64, DataType::Int32),
        (i64::MIN as f64, i64::MAX as f64, DataType::Int64),
    ];
    signed
        .into_iter()
        .find(|(lo, hi, _)| *lo < min && max < *hi)
        .map(|(_, _, dtype)| dtype)
}

fn plan_column(series: &Series) -> Result<Option<ColumnPlan>> {
    if !is_numeric(series.dtype()) {
        return Ok(None);
    }

    let floats = series.cast(&DataType::Float64)?;
    let ca = floats.f64()?;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut missing = 0usize;
    let mut infinite = false;
    let mut fractional = 0.0;

    for value in ca.into_iter() {
        match value {
            Some(v) if v.is_finite() => {
                min = min.min(v);
                max = max.max(v);
                fractional += (v - v.trunc()).abs();
            }
            Some(v) if v.is_nan() => missing += 1,
            Some(_) => infinite = true,
            None => missing += 1,
        }
    }

    let fill = (missing > 0 && min.is_finite()).then(|| min - 1.0);
    if let Some(f) = fill {
        fractional += (f - f.trunc()).abs() * missing as f64;
    }

    let integral = !infinite
        && min.is_finite()
        && (missing == 0 || fill.is_some())
        && fractional < INTEGRAL_TOLERANCE;

    let to = if integral {
        // The fill value lowers the minimum by one
        let low = fill.map_or(min, |f| f.min(min));
        integer_target(low, max)
    } else {
        Some(DataType::Float32)
    };

    Ok(Some(ColumnPlan {
        name: series.name().clone(),
        from: series.dtype().clone(),
        to,
        missing: missing > 0,
        fill,
    }))
}

fn fill_missing(series: &Series, fill: f64) -> Result<Series> {
    let floats = series.cast(&DataType::Float64)?;
    let filled: Float64Chunked = floats
        .f64()?
        .into_iter()
        .map(|v| match v {
            Some(x) if !x.is_nan() => Some(x),
            _ => Some(fill),
        })
        .collect();
    Ok(filled.with_name(series.name().clone()).into_series())
}

/// Downcast every numeric column of `df` in place to the narrowest integer
/// type that holds it, or to `Float32` when the values are not integral.
///
/// Nulls and NaNs are filled with `min - 1` first; the names of those columns
/// are reported in [`MemoryReduction::na_columns`].
pub fn reduce_mem_usage(df: &mut DataFrame) -> Result<MemoryReduction> {
    let start_bytes = df.estimated_size();
    log::info!(
        "Memory usage of dataframe is {:.3} MB",
        start_bytes as f64 / 1024f64.powi(2)
    );

    let plans = df
        .get_columns()
        .par_iter()
        .map(|column| plan_column(column.as_materialized_series()))
        .collect::<Result<Vec<_>>>()?;

    let mut na_columns = Vec::new();
    let mut conversions = Vec::new();

    for plan in plans.into_iter().flatten() {
        if plan.missing {
            na_columns.push(plan.name.to_string());
        }

        let series = df.column(plan.name.as_str())?.as_materialized_series().clone();
        let base = match plan.fill {
            Some(fill) => fill_missing(&series, fill)?,
            None => series,
        };
        // No integer type holds the filled range: keep the column's own dtype
        let target = plan.to.unwrap_or_else(|| {
            log::debug!("Column {}: no narrower type fits, keeping {:?}", plan.name, plan.from);
            plan.from.clone()
        });

        if base.dtype() != &target || plan.fill.is_some() {
            df.with_column(base.cast(&target)?)?;
        }

        log::debug!("Column {}: {:?} -> {:?}", plan.name, plan.from, target);

        if plan.from != target {
            conversions.push(Conversion {
                column: plan.name.to_string(),
                from: plan.from,
                to: target,
            });
        }
    }

    let end_bytes = df.estimated_size();
    log::info!(
        "Memory usage after reduction is {:.3} MB ({:.1}% of the initial size)",
        end_bytes as f64 / 1024f64.powi(2),
        100.0 * end_bytes as f64 / start_bytes.max(1) as f64
    );

    Ok(MemoryReduction {
        na_columns,
        conversions,
        start_bytes,
        end_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_thresholds() {
        assert_eq!(integer_target(0.0, 254.0), Some(DataType::UInt8));
        assert_eq!(integer_target(0.0, 255.0), Some(DataType::UInt16));
        assert_eq!(integer_target(0.0, 70_000.0), Some(DataType::UInt32));
        assert_eq!(integer_target(0.0, 5e9), Some(DataType::UInt64));
    }

    #[test]
    fn test_signed_thresholds_are_strict() {
        assert_eq!(integer_target(-5.0, 100.0), Some(DataType::Int8));
        assert_eq!(integer_target(-128.0, 0.0), Some(DataType::Int16));
        assert_eq!(integer_target(-1.0, 127.0), Some(DataType::Int16));
        assert_eq!(integer_target(-40_000.0, 1.0), Some(DataType::Int32));
    }
}
