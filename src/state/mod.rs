/// State management module
///
/// This module handles all workflow state, including:
/// - Shared data structures (data.rs)
/// - The results table (ledger.rs)
/// - The photo queue and position (queue.rs)
/// - Click points for the photo on screen (roi.rs)
/// - The controller tying them together (workflow.rs)

pub mod data;
pub mod ledger;
pub mod queue;
pub mod roi;
pub mod workflow;

pub use data::{MeasurementRecord, PatchStats, Point};
pub use ledger::ResultsLedger;
pub use queue::ImageQueue;
pub use roi::RoiCapture;
pub use workflow::{AfterMeasurement, Notice, WorkflowController, WorkflowState};
