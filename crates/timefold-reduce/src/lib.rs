// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod adaptive;
pub mod mask;
pub mod methods;
pub mod uniform;

pub use adaptive::{AdaptiveResult, ReductionReport};
pub use mask::{ActivityMask, MaskRun, RunKind, build_zero_signal_mask};
pub use uniform::ResolutionReducer;

/// Resolution-reduction engine namespace placeholder.
pub fn crate_name() -> &'static str {
    let _ = timefold_core::crate_name();
    "timefold-reduce"
}
