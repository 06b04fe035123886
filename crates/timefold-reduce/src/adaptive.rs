// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::mask::{ActivityMask, RunKind};
use crate::uniform::{ResolutionReducer, fold_count};
use timefold_core::{Dataset, RowRange, TimefoldError};

/// Row accounting for one adaptive timestepping call.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReductionReport {
    pub input_rows: usize,
    pub output_rows: usize,
    /// Number of flagged runs that were folded into single rows.
    pub runs_collapsed: usize,
    /// Total original rows absorbed by those runs.
    pub rows_folded: usize,
}

/// Reduced dataset plus its accounting report.
#[derive(Clone, Debug, PartialEq)]
pub struct AdaptiveResult {
    pub dataset: Dataset,
    pub report: ReductionReport,
}

impl ResolutionReducer {
    /// Collapses every maximal run of flagged rows into a single timestep.
    ///
    /// The mask must be row-aligned with `data`. Unflagged rows survive
    /// untouched with a fold count of 1; each flagged run is handed to
    /// [`ResolutionReducer::reduce_resolution`] with a resolution equal to the
    /// run length, so the run becomes exactly one output row whose fold count
    /// is the run length. A flagged run that touches the end of the series is
    /// collapsed like any other, and a mask with no flags at all returns the
    /// dataset unchanged apart from an all-ones fold-count series.
    pub fn apply_dynamic_timestepping(
        &self,
        data: &Dataset,
        mask: &ActivityMask,
    ) -> Result<AdaptiveResult, TimefoldError> {
        if mask.len() != data.len() {
            return Err(TimefoldError::alignment_mismatch(format!(
                "mask has {} rows, dataset has {}",
                mask.len(),
                data.len()
            )));
        }

        let runs = mask.runs();
        let mut time_res = Vec::new();
        let mut runs_collapsed = 0;
        let mut rows_folded = 0;
        for run in &runs {
            match run.kind {
                RunKind::Keep => time_res.extend(std::iter::repeat(1).take(run.len)),
                RunKind::Collapse => {
                    time_res.push(fold_count(run.len)?);
                    runs_collapsed += 1;
                    rows_folded += run.len;
                }
            }
        }

        // Collapsing right to left keeps the row positions of the remaining
        // runs valid while the dataset shrinks underneath them.
        let mut current = data.clone();
        for run in runs.iter().rev() {
            if run.kind != RunKind::Collapse {
                continue;
            }
            let range = RowRange::new(run.start, run.end())?;
            current = self.reduce_resolution(&current, run.len, Some(range))?;
        }
        let current = current.with_time_res(time_res)?;

        let report = ReductionReport {
            input_rows: data.len(),
            output_rows: current.len(),
            runs_collapsed,
            rows_folded,
        };
        tracing::debug!(
            input_rows = report.input_rows,
            output_rows = report.output_rows,
            runs_collapsed = report.runs_collapsed,
            "dynamic timestepping applied"
        );
        Ok(AdaptiveResult {
            dataset: current,
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ReductionReport;
    use crate::mask::ActivityMask;
    use crate::uniform::ResolutionReducer;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use timefold_core::{Dataset, PolicyTable, ReduceMethod, VariableTable};

    fn hourly(n: usize) -> Vec<chrono::DateTime<Utc>> {
        (0..n)
            .map(|i| Utc.timestamp_opt(i as i64 * 3600, 0).unwrap())
            .collect()
    }

    fn demand_dataset(values: &[f64]) -> Dataset {
        Dataset::new(
            (0..values.len() as i64).collect(),
            hourly(values.len()),
            BTreeMap::new(),
        )
        .unwrap()
        .with_variable("D", VariableTable::single_column(values.to_vec()))
        .unwrap()
    }

    fn sum_reducer() -> ResolutionReducer {
        ResolutionReducer::new(PolicyTable::new().with_method("D", ReduceMethod::Sum))
    }

    fn mask(flags: &[u8]) -> ActivityMask {
        ActivityMask::from_flags(flags.to_vec()).unwrap()
    }

    #[test]
    fn all_zero_mask_is_a_no_op_with_unit_fold_counts() {
        let data = demand_dataset(&[1.0, 2.0, 3.0]);
        let out = sum_reducer()
            .apply_dynamic_timestepping(&data, &mask(&[0, 0, 0]))
            .unwrap();

        assert_eq!(out.dataset.steps(), data.steps());
        assert_eq!(out.dataset.time_res_series(), Some(&[1, 1, 1][..]));
        // Untouched variables share their tables with the input.
        assert!(Arc::ptr_eq(
            data.variable("D").unwrap(),
            out.dataset.variable("D").unwrap()
        ));
        assert_eq!(
            out.report,
            ReductionReport {
                input_rows: 3,
                output_rows: 3,
                runs_collapsed: 0,
                rows_folded: 0,
            }
        );
    }

    #[test]
    fn all_one_mask_collapses_to_a_single_row() {
        let data = demand_dataset(&[1.0, 2.0, 3.0, 4.0]);
        let out = sum_reducer()
            .apply_dynamic_timestepping(&data, &mask(&[1, 1, 1, 1]))
            .unwrap();

        assert_eq!(out.dataset.len(), 1);
        assert_eq!(out.dataset.steps(), &[0]);
        assert_eq!(out.dataset.variable("D").unwrap().column(0), vec![10.0]);
        assert_eq!(out.dataset.time_res_series(), Some(&[4][..]));
    }

    #[test]
    fn interior_and_trailing_runs_collapse_independently() {
        let data = demand_dataset(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let out = sum_reducer()
            .apply_dynamic_timestepping(&data, &mask(&[0, 1, 1, 0, 0, 1, 1]))
            .unwrap();

        assert_eq!(out.dataset.steps(), &[0, 1, 3, 4, 5]);
        assert_eq!(
            out.dataset.variable("D").unwrap().column(0),
            vec![1.0, 5.0, 4.0, 5.0, 13.0]
        );
        assert_eq!(out.dataset.time_res_series(), Some(&[1, 2, 1, 1, 2][..]));
        assert_eq!(out.report.runs_collapsed, 2);
        assert_eq!(out.report.rows_folded, 4);
    }

    #[test]
    fn singleton_flags_survive_without_dropping_keep_rows() {
        let data = demand_dataset(&[1.0, 2.0, 3.0, 4.0]);
        let out = sum_reducer()
            .apply_dynamic_timestepping(&data, &mask(&[0, 1, 0, 1]))
            .unwrap();

        assert_eq!(out.dataset.len(), 4);
        assert_eq!(
            out.dataset.variable("D").unwrap().column(0),
            vec![1.0, 2.0, 3.0, 4.0]
        );
        assert_eq!(out.dataset.time_res_series(), Some(&[1, 1, 1, 1][..]));
    }

    #[test]
    fn leading_run_collapses_like_any_other() {
        let data = demand_dataset(&[1.0, 2.0, 3.0, 4.0]);
        let out = sum_reducer()
            .apply_dynamic_timestepping(&data, &mask(&[1, 1, 1, 0]))
            .unwrap();

        assert_eq!(out.dataset.steps(), &[0, 3]);
        assert_eq!(out.dataset.variable("D").unwrap().column(0), vec![6.0, 4.0]);
        assert_eq!(out.dataset.time_res_series(), Some(&[3, 1][..]));
    }

    #[test]
    fn misaligned_mask_is_rejected() {
        let data = demand_dataset(&[1.0, 2.0, 3.0]);
        let err = sum_reducer()
            .apply_dynamic_timestepping(&data, &mask(&[0, 0]))
            .expect_err("short mask must fail");
        assert!(err.to_string().contains("mask has 2 rows"));
    }

    #[test]
    fn fold_counts_always_account_for_every_input_row() {
        let data = demand_dataset(&[1.0; 10]);
        let flags = [0, 1, 1, 0, 1, 0, 0, 1, 1, 1];
        let out = sum_reducer()
            .apply_dynamic_timestepping(&data, &mask(&flags))
            .unwrap();

        let total: u32 = out.dataset.time_res_series().unwrap().iter().sum();
        assert_eq!(total, 10);
    }
}
