//! Dissolved organic carbon (DOC) estimation from photos.
//!
//! Each photo shows a water sample next to a white paper reference. The user
//! clicks the water patch, then the paper patch; the blue-channel means of
//! both patches go through a calibration formula to give a DOC estimate. A
//! folder of photos can be walked as a batch, one measurement per photo.

pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod photo;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::{Notice, WorkflowController, WorkflowState};
