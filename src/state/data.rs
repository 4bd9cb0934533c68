/// Shared data structures for the workflow
///
/// These structs represent the data model that flows between the
/// measurement code, the results ledger and the UI layer.

/// A pixel position in the decoded image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Mean channel values of one patch, scaled to 0-255
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchStats {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// One completed measurement, i.e. one row of the results table
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    /// Filename only (e.g., "lake_03.jpg")
    pub image_name: String,
    pub water: PatchStats,
    pub paper: PatchStats,
    pub estimated_doc: f64,
}
