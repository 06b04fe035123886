// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::TimefoldError;

/// Owned, row-major 2-D table of `f64` values.
///
/// Rows are timestamps, columns are sites/entities. Shape is validated on
/// construction; the checked product guards against `rows * cols` overflow.
#[derive(Clone, Debug, PartialEq)]
pub struct VariableTable {
    values: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl VariableTable {
    /// Constructs a validated table from row-major values.
    pub fn new(values: Vec<f64>, rows: usize, cols: usize) -> Result<Self, TimefoldError> {
        if cols == 0 {
            return Err(TimefoldError::invalid_input("cols must be >= 1"));
        }
        let expected_len = rows.checked_mul(cols).ok_or_else(|| {
            TimefoldError::invalid_input("rows*cols overflow while validating shape")
        })?;
        if values.len() != expected_len {
            return Err(TimefoldError::invalid_input(format!(
                "value length mismatch: got {}, expected {expected_len} (rows={rows}, cols={cols})",
                values.len()
            )));
        }
        Ok(Self { values, rows, cols })
    }

    /// Builds a table from per-timestamp rows; all rows must share a width.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TimefoldError> {
        let Some(first) = rows.first() else {
            return Err(TimefoldError::invalid_input(
                "from_rows requires at least one row",
            ));
        };
        let cols = first.len();
        let n = rows.len();
        let mut values = Vec::with_capacity(n * cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(TimefoldError::invalid_input(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            values.extend(row);
        }
        Self::new(values, n, cols)
    }

    /// Builds a single-column table; infallible shape.
    pub fn single_column(values: Vec<f64>) -> Self {
        let rows = values.len();
        Self {
            values,
            rows,
            cols: 1,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major backing slice.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Borrows one row.
    pub fn row(&self, r: usize) -> &[f64] {
        &self.values[r * self.cols..(r + 1) * self.cols]
    }

    pub fn value(&self, r: usize, c: usize) -> f64 {
        self.values[r * self.cols + c]
    }

    /// Sum across all columns of one row.
    pub fn row_sum(&self, r: usize) -> f64 {
        self.row(r).iter().sum()
    }

    /// Copies one column out; convenient for assertions.
    pub fn column(&self, c: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.value(r, c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::VariableTable;

    #[test]
    fn new_accepts_a_consistent_shape() {
        let table = VariableTable::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2)
            .expect("3x2 shape should validate");
        assert_eq!(table.rows(), 3);
        assert_eq!(table.cols(), 2);
        assert_eq!(table.row(1), &[3.0, 4.0]);
        assert_eq!(table.value(2, 0), 5.0);
        assert_eq!(table.row_sum(2), 11.0);
        assert_eq!(table.column(1), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn rejects_zero_columns() {
        let err = VariableTable::new(vec![], 0, 0).expect_err("cols=0 must fail");
        assert!(err.to_string().contains("cols must be >= 1"));
    }

    #[test]
    fn rejects_value_length_mismatch() {
        let err = VariableTable::new(vec![1.0, 2.0, 3.0], 2, 2).expect_err("mismatch must fail");
        assert!(err.to_string().contains("value length mismatch"));
    }

    #[test]
    fn rejects_checked_mul_overflow() {
        let err = VariableTable::new(vec![], usize::MAX, 2).expect_err("overflow must fail");
        assert!(err.to_string().contains("overflow"));
    }

    #[test]
    fn from_rows_rejects_ragged_rows() {
        let err = VariableTable::from_rows(vec![vec![1.0, 2.0], vec![3.0]])
            .expect_err("ragged rows must fail");
        assert!(err.to_string().contains("row 1 has 1 columns"));
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        let err = VariableTable::from_rows(vec![]).expect_err("empty input must fail");
        assert!(err.to_string().contains("at least one row"));
    }

    #[test]
    fn single_column_wraps_a_series() {
        let table = VariableTable::single_column(vec![10.0, 20.0]);
        assert_eq!(table.rows(), 2);
        assert_eq!(table.cols(), 1);
        assert_eq!(table.column(0), vec![10.0, 20.0]);
    }
}
