// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{TimefoldError, VariableTable};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Half-open `[start, end)` range of row positions.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRange {
    start: usize,
    end: usize,
}

impl RowRange {
    pub fn new(start: usize, end: usize) -> Result<Self, TimefoldError> {
        if start >= end {
            return Err(TimefoldError::invalid_input(format!(
                "RowRange must be non-empty and half-open; got [{start}, {end})"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Always false; construction rejects empty ranges.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Rejects ranges that address rows beyond `rows`.
    pub fn check_bounds(&self, rows: usize) -> Result<(), TimefoldError> {
        if self.end > rows {
            return Err(TimefoldError::invalid_input(format!(
                "RowRange [{}, {}) exceeds row count {rows}",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Multi-variable time-series dataset.
///
/// The two time axes (`steps`, the integer timestep index, and `datetimes`,
/// the calendar axis) define the master row ordering; every variable table
/// must carry exactly one row per timestep. Operations never mutate a
/// `Dataset` in place: they return a new value, and unchanged variables share
/// their `Arc<VariableTable>` with the input.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    steps: Vec<i64>,
    datetimes: Vec<DateTime<Utc>>,
    variables: BTreeMap<String, Arc<VariableTable>>,
    time_res: Option<Vec<u32>>,
}

impl Dataset {
    /// Constructs a validated dataset with no `time_res` series.
    pub fn new(
        steps: Vec<i64>,
        datetimes: Vec<DateTime<Utc>>,
        variables: BTreeMap<String, Arc<VariableTable>>,
    ) -> Result<Self, TimefoldError> {
        if steps.is_empty() {
            return Err(TimefoldError::invalid_input(
                "dataset requires at least one timestep",
            ));
        }
        if let Some(w) = steps.windows(2).find(|w| w[1] <= w[0]) {
            return Err(TimefoldError::invalid_input(format!(
                "timestep index must be strictly increasing; got {} after {}",
                w[1], w[0]
            )));
        }
        if datetimes.len() != steps.len() {
            return Err(TimefoldError::alignment_mismatch(format!(
                "datetime axis has {} rows, timestep axis has {}",
                datetimes.len(),
                steps.len()
            )));
        }
        for (name, table) in &variables {
            if table.rows() != steps.len() {
                return Err(TimefoldError::alignment_mismatch(format!(
                    "variable '{name}' has {} rows, timestep axis has {}",
                    table.rows(),
                    steps.len()
                )));
            }
        }
        Ok(Self {
            steps,
            datetimes,
            variables,
            time_res: None,
        })
    }

    /// Adds or replaces one variable, keeping the alignment invariant.
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        table: VariableTable,
    ) -> Result<Self, TimefoldError> {
        let name = name.into();
        if table.rows() != self.steps.len() {
            return Err(TimefoldError::alignment_mismatch(format!(
                "variable '{name}' has {} rows, timestep axis has {}",
                table.rows(),
                self.steps.len()
            )));
        }
        self.variables.insert(name, Arc::new(table));
        Ok(self)
    }

    /// Attaches the fold-count series; one entry per current row.
    pub fn with_time_res(mut self, time_res: Vec<u32>) -> Result<Self, TimefoldError> {
        if time_res.len() != self.steps.len() {
            return Err(TimefoldError::alignment_mismatch(format!(
                "time_res series has {} rows, timestep axis has {}",
                time_res.len(),
                self.steps.len()
            )));
        }
        self.time_res = Some(time_res);
        Ok(self)
    }

    /// Number of rows (timesteps).
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[i64] {
        &self.steps
    }

    pub fn datetimes(&self) -> &[DateTime<Utc>] {
        &self.datetimes
    }

    pub fn variables(&self) -> &BTreeMap<String, Arc<VariableTable>> {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Arc<VariableTable>> {
        self.variables.get(name)
    }

    /// Looks a variable up, surfacing a typed error when absent.
    pub fn require_variable(&self, name: &str) -> Result<&Arc<VariableTable>, TimefoldError> {
        self.variables
            .get(name)
            .ok_or_else(|| TimefoldError::unknown_variable(name))
    }

    /// Fold counts per surviving row, once a reduction has produced them.
    pub fn time_res_series(&self) -> Option<&[u32]> {
        self.time_res.as_deref()
    }
}
