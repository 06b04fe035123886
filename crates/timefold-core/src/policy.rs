// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{Dataset, TimefoldError};
use std::collections::BTreeMap;

/// How one variable is folded when timesteps are merged.
///
/// The set is closed on purpose: dispatch matches exhaustively, so adding a
/// method is a compile-checked change rather than a string lookup.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReduceMethod {
    /// Column-wise sum per window (extensive quantities).
    Sum,
    /// Column-wise mean per window (intensive quantities).
    Average,
    /// Mean per window weighted by a second, row-aligned variable.
    WeightedAverage { weights: String },
    /// Subsample: the first row of each window, no aggregation.
    Cut,
}

/// Mapping from variable name to its reduction method.
///
/// Variables absent from the table are positionally subsampled (`Cut`
/// semantics) so they stay row-aligned after any reduction. The time axes are
/// handled structurally by the reducer and never appear here.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyTable {
    methods: BTreeMap<String, ReduceMethod>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The reference energy-model mapping: per-site irradiance and demand are
    /// summed, the electric efficiency is averaged, and the solar-field
    /// efficiency is averaged weighted by irradiance.
    pub fn energy_defaults() -> Self {
        Self::new()
            .with_method("dni", ReduceMethod::Sum)
            .with_method(
                "n_sf",
                ReduceMethod::WeightedAverage {
                    weights: "dni".to_string(),
                },
            )
            .with_method("n_el", ReduceMethod::Average)
            .with_method("D", ReduceMethod::Sum)
    }

    pub fn with_method(mut self, variable: impl Into<String>, method: ReduceMethod) -> Self {
        self.methods.insert(variable.into(), method);
        self
    }

    pub fn insert(&mut self, variable: impl Into<String>, method: ReduceMethod) {
        self.methods.insert(variable.into(), method);
    }

    pub fn method(&self, variable: &str) -> Option<&ReduceMethod> {
        self.methods.get(variable)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.methods.contains_key(variable)
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Checks that every weighted-average entry whose target exists in
    /// `data` can also resolve its weights variable there.
    pub fn check_weights(&self, data: &Dataset) -> Result<(), TimefoldError> {
        for (variable, method) in &self.methods {
            let ReduceMethod::WeightedAverage { weights } = method else {
                continue;
            };
            if data.variable(variable).is_some() && data.variable(weights).is_none() {
                return Err(TimefoldError::unknown_variable(format!(
                    "weights variable '{weights}' for '{variable}' is not in the dataset"
                )));
            }
        }
        Ok(())
    }
}
