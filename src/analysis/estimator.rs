/// DOC estimation from blue-channel patch means
///
/// A darker water patch next to a brighter paper patch means more of the blue
/// light was absorbed by the sample:
///
/// ```text
/// absorbance = water_blue + (255 - paper_blue)
/// doc        = exp((absorbance - offset) / slope)
/// ```
///
/// Units are those of the reference data the profile was fit against.

use crate::config::CalibrationProfile;

/// Applies a calibration profile to patch means
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocEstimator {
    profile: CalibrationProfile,
}

impl DocEstimator {
    pub fn new(profile: CalibrationProfile) -> Self {
        Self { profile }
    }

    /// Relative blue attenuation of water against paper, 0..=510
    pub fn absorbance_proxy(water_blue: u8, paper_blue: u8) -> u32 {
        water_blue as u32 + (255 - paper_blue as u32)
    }

    pub fn estimate(&self, water_blue: u8, paper_blue: u8) -> f64 {
        let absorbance = Self::absorbance_proxy(water_blue, paper_blue) as f64;
        ((absorbance - self.profile.offset) / self.profile.slope).exp()
    }
}
