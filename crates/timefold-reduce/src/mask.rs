// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use timefold_core::{Dataset, TimefoldError};

/// Per-row collapse flags: `0` keeps the row at native resolution, `1` marks
/// it as a candidate for folding into a coarse timestep.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityMask {
    flags: Vec<u8>,
}

/// Whether a run of rows survives untouched or collapses into one row.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunKind {
    Keep,
    Collapse,
}

/// Maximal contiguous block of rows sharing one mask flag.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskRun {
    pub kind: RunKind,
    pub start: usize,
    pub len: usize,
}

impl MaskRun {
    /// One past the run's last row.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

impl ActivityMask {
    /// Wraps externally computed flags; only `0`/`1` bytes are accepted.
    pub fn from_flags(flags: Vec<u8>) -> Result<Self, TimefoldError> {
        if let Some((idx, val)) = flags
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| *v != 0 && *v != 1)
        {
            return Err(TimefoldError::invalid_input(format!(
                "mask must contain only 0/1 bytes: index {idx} has {val}"
            )));
        }
        Ok(Self { flags })
    }

    pub fn flags(&self) -> &[u8] {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Decomposes the mask into its maximal runs, left to right.
    ///
    /// The runs partition `0..len()` exactly, a flagged run that touches the
    /// end of the mask included. An all-`0` mask is one `Keep` run; an
    /// all-`1` mask is one `Collapse` run.
    pub fn runs(&self) -> Vec<MaskRun> {
        let mut runs = Vec::new();
        let mut start = 0;
        for i in 1..=self.flags.len() {
            if i == self.flags.len() || self.flags[i] != self.flags[start] {
                let kind = if self.flags[start] == 1 {
                    RunKind::Collapse
                } else {
                    RunKind::Keep
                };
                runs.push(MaskRun {
                    kind,
                    start,
                    len: i - start,
                });
                start = i;
            }
        }
        runs
    }
}

/// Flags every row whose cross-site sum of `signal_variable` is non-positive.
///
/// The reference use marks night hours from per-site solar irradiance, but any
/// intensity-like variable works. Pure; `data` is left untouched.
pub fn build_zero_signal_mask(
    data: &Dataset,
    signal_variable: &str,
) -> Result<ActivityMask, TimefoldError> {
    let table = data.require_variable(signal_variable)?;
    let flags = (0..table.rows())
        .map(|r| u8::from(table.row_sum(r) <= 0.0))
        .collect();
    Ok(ActivityMask { flags })
}
