pub mod error;
pub mod experiment;
pub mod matrix;
pub mod normalization;
pub mod progress;
pub mod topdom;

#[doc(hidden)]
pub mod _internal_test_data;

pub use error::{HicError, HicResult};
pub use experiment::{HicExperiment, HicExperimentBuilder};
pub use matrix::{ContactField, MatrixStats, SparseContactMatrix, RAW_COUNT_FIELD};
