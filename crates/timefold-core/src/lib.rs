// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod dataset;
pub mod error;
pub mod policy;
pub mod table;

pub use dataset::{Dataset, RowRange};
pub use error::TimefoldError;
pub use policy::{PolicyTable, ReduceMethod};
pub use table::VariableTable;

/// Core shared types for the timefold crates.
pub fn crate_name() -> &'static str {
    "timefold-core"
}
