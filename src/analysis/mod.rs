/// Measurement math: patch statistics and the DOC calibration formula

pub mod estimator;
pub mod patch;

pub use estimator::DocEstimator;
pub use patch::{extract, extract_scaled, patch_stats, PatchRect};
