// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Window aggregation kernels.
//!
//! Each kernel folds the rows `[from, to)` of a table into one output row per
//! window of `resolution` consecutive rows. The range must tile exactly: a
//! trailing partial window is rejected rather than silently truncated.

use timefold_core::{TimefoldError, VariableTable};

/// Validates a window addressing and returns the output row count.
pub fn check_windows(
    rows: usize,
    from: usize,
    to: usize,
    resolution: usize,
) -> Result<usize, TimefoldError> {
    if resolution == 0 {
        return Err(TimefoldError::invalid_input("resolution must be >= 1"));
    }
    if from >= to || to > rows {
        return Err(TimefoldError::invalid_input(format!(
            "window range [{from}, {to}) is not within 0..{rows}"
        )));
    }
    let span = to - from;
    if span % resolution != 0 {
        return Err(TimefoldError::invalid_input(format!(
            "range of {span} rows does not tile into windows of {resolution}"
        )));
    }
    Ok(span / resolution)
}

/// Column-wise sum per window.
pub fn sum_windows(
    table: &VariableTable,
    from: usize,
    to: usize,
    resolution: usize,
) -> Result<VariableTable, TimefoldError> {
    let windows = check_windows(table.rows(), from, to, resolution)?;
    let cols = table.cols();
    let mut values = Vec::with_capacity(windows * cols);
    for w in 0..windows {
        let base = from + w * resolution;
        for c in 0..cols {
            let mut acc = 0.0;
            for j in 0..resolution {
                acc += table.value(base + j, c);
            }
            values.push(acc);
        }
    }
    VariableTable::new(values, windows, cols)
}

/// Column-wise mean per window.
pub fn average_windows(
    table: &VariableTable,
    from: usize,
    to: usize,
    resolution: usize,
) -> Result<VariableTable, TimefoldError> {
    let windows = check_windows(table.rows(), from, to, resolution)?;
    let cols = table.cols();
    let mut values = Vec::with_capacity(windows * cols);
    for w in 0..windows {
        let base = from + w * resolution;
        for c in 0..cols {
            let mut acc = 0.0;
            for j in 0..resolution {
                acc += table.value(base + j, c);
            }
            values.push(acc / resolution as f64);
        }
    }
    VariableTable::new(values, windows, cols)
}

/// Subsample: the first row of each window survives unchanged.
///
/// A single-window range degenerates to taking the range's first row, which
/// is the same selection rule, so no special case is needed.
pub fn cut_windows(
    table: &VariableTable,
    from: usize,
    to: usize,
    resolution: usize,
) -> Result<VariableTable, TimefoldError> {
    let windows = check_windows(table.rows(), from, to, resolution)?;
    let cols = table.cols();
    let mut values = Vec::with_capacity(windows * cols);
    for w in 0..windows {
        values.extend_from_slice(table.row(from + w * resolution));
    }
    VariableTable::new(values, windows, cols)
}

/// Per-window, per-column weighted mean:
/// `sum_j(w[base+j] * x[base+j]) / sum_j(w[base+j])`.
///
/// A window whose weights sum to zero has no defined mean; the quotient is
/// replaced by `0.0` (this also covers the non-finite `x/0` cases).
pub fn weighted_average_windows(
    target: &VariableTable,
    weights: &VariableTable,
    from: usize,
    to: usize,
    resolution: usize,
) -> Result<VariableTable, TimefoldError> {
    if weights.rows() != target.rows() || weights.cols() != target.cols() {
        return Err(TimefoldError::alignment_mismatch(format!(
            "weights table is {}x{}, target is {}x{}",
            weights.rows(),
            weights.cols(),
            target.rows(),
            target.cols()
        )));
    }
    let windows = check_windows(target.rows(), from, to, resolution)?;
    let cols = target.cols();
    let mut values = Vec::with_capacity(windows * cols);
    for w in 0..windows {
        let base = from + w * resolution;
        for c in 0..cols {
            let mut weighted = 0.0;
            let mut total_weight = 0.0;
            for j in 0..resolution {
                weighted += weights.value(base + j, c) * target.value(base + j, c);
                total_weight += weights.value(base + j, c);
            }
            let quotient = weighted / total_weight;
            values.push(if quotient.is_finite() { quotient } else { 0.0 });
        }
    }
    VariableTable::new(values, windows, cols)
}
