// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::methods;
use std::collections::BTreeMap;
use std::sync::Arc;
use timefold_core::{Dataset, PolicyTable, ReduceMethod, RowRange, TimefoldError, VariableTable};

/// Applies per-variable reduction policies at a fixed downsampling factor.
///
/// The reducer owns the policy table; the datasets it touches are taken by
/// shared reference and a new `Dataset` value is returned.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolutionReducer {
    policies: PolicyTable,
}

impl ResolutionReducer {
    pub fn new(policies: PolicyTable) -> Self {
        Self { policies }
    }

    /// Reducer preloaded with [`PolicyTable::energy_defaults`].
    pub fn energy_defaults() -> Self {
        Self::new(PolicyTable::energy_defaults())
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Folds every `resolution` consecutive rows of `data` into one.
    ///
    /// With no `range`, the whole series is reduced and the result carries a
    /// constant-`resolution` fold-count series. With a `range`, only the
    /// addressed rows are reduced and spliced back between the untouched head
    /// and tail; fold-count bookkeeping is then the caller's responsibility
    /// and any existing series is dropped.
    ///
    /// Policy-governed variables use their configured method; all other
    /// variables (and the two time axes) are positionally subsampled so the
    /// row alignment invariant survives.
    pub fn reduce_resolution(
        &self,
        data: &Dataset,
        resolution: usize,
        range: Option<RowRange>,
    ) -> Result<Dataset, TimefoldError> {
        let (from, to) = match range {
            None => (0, data.len()),
            Some(r) => {
                r.check_bounds(data.len())?;
                (r.start(), r.end())
            }
        };
        let windows = methods::check_windows(data.len(), from, to, resolution)?;
        self.policies.check_weights(data)?;
        tracing::debug!(rows = data.len(), resolution, from, to, "reducing resolution");

        let steps = cut_index(data.steps(), from, to, resolution);
        let datetimes = cut_index(data.datetimes(), from, to, resolution);
        let whole_series = from == 0 && to == data.len();

        let mut variables = BTreeMap::new();
        for (name, table) in data.variables() {
            let reduced = self.reduce_variable(data, name, table, from, to, resolution)?;
            let table = if whole_series {
                reduced
            } else {
                splice_rows(table, &reduced, from, to)?
            };
            variables.insert(name.clone(), Arc::new(table));
        }

        if whole_series {
            let fold = fold_count(resolution)?;
            return Dataset::new(steps, datetimes, variables)?.with_time_res(vec![fold; windows]);
        }
        Dataset::new(
            splice_index(data.steps(), steps, from, to),
            splice_index(data.datetimes(), datetimes, from, to),
            variables,
        )
    }

    fn reduce_variable(
        &self,
        data: &Dataset,
        name: &str,
        table: &VariableTable,
        from: usize,
        to: usize,
        resolution: usize,
    ) -> Result<VariableTable, TimefoldError> {
        match self.policies.method(name).unwrap_or(&ReduceMethod::Cut) {
            ReduceMethod::Sum => methods::sum_windows(table, from, to, resolution),
            ReduceMethod::Average => methods::average_windows(table, from, to, resolution),
            ReduceMethod::Cut => methods::cut_windows(table, from, to, resolution),
            ReduceMethod::WeightedAverage { weights } => {
                let weights = data.require_variable(weights)?;
                methods::weighted_average_windows(table, weights, from, to, resolution)
            }
        }
    }
}

/// Converts a fold factor to the `u32` fold-count representation.
pub(crate) fn fold_count(resolution: usize) -> Result<u32, TimefoldError> {
    u32::try_from(resolution).map_err(|_| {
        TimefoldError::invalid_input(format!("fold count {resolution} exceeds the u32 range"))
    })
}

/// First element of each window of an index axis.
fn cut_index<T: Clone>(axis: &[T], from: usize, to: usize, resolution: usize) -> Vec<T> {
    (from..to)
        .step_by(resolution)
        .map(|i| axis[i].clone())
        .collect()
}

/// Untouched head, reduced middle, untouched tail.
fn splice_index<T: Clone>(axis: &[T], reduced: Vec<T>, from: usize, to: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(axis.len() - (to - from) + reduced.len());
    out.extend_from_slice(&axis[..from]);
    out.extend(reduced);
    out.extend_from_slice(&axis[to..]);
    out
}

fn splice_rows(
    original: &VariableTable,
    reduced: &VariableTable,
    from: usize,
    to: usize,
) -> Result<VariableTable, TimefoldError> {
    let cols = original.cols();
    let rows = original.rows() - (to - from) + reduced.rows();
    let mut values = Vec::with_capacity(rows * cols);
    values.extend_from_slice(&original.values()[..from * cols]);
    values.extend_from_slice(reduced.values());
    values.extend_from_slice(&original.values()[to * cols..]);
    VariableTable::new(values, rows, cols)
}
