/// Patch statistics
///
/// A patch is the axis-aligned rectangle whose top-left corner is the clicked
/// anchor. When the rectangle runs past the right or bottom edge it is
/// clamped to the image and only the in-bounds pixels are averaged. The
/// anchor itself must lie inside the image.

use crate::config::PatchSize;
use crate::error::{Error, Result};
use crate::photo::{Channel, PixelBuffer};
use crate::state::data::{PatchStats, Point};

/// The in-bounds part of a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PatchRect {
    /// Clamp the patch anchored at `anchor` to the buffer bounds
    ///
    /// The result always covers at least the anchor pixel.
    pub fn clamped(buffer: &PixelBuffer, anchor: Point, size: PatchSize) -> Result<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "patch size must be positive, got {}x{}",
                size.width, size.height
            )));
        }
        if !buffer.contains(anchor.x, anchor.y) {
            return Err(Error::PointOutOfBounds {
                x: anchor.x,
                y: anchor.y,
                width: buffer.width(),
                height: buffer.height(),
            });
        }

        Ok(Self {
            x: anchor.x,
            y: anchor.y,
            width: size.width.min(buffer.width() - anchor.x),
            height: size.height.min(buffer.height() - anchor.y),
        })
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Sum of the raw samples of `channel` inside `rect`
fn channel_sum(buffer: &PixelBuffer, channel: Channel, rect: PatchRect) -> u64 {
    let mut sum = 0u64;
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            sum += buffer.sample(channel, x, y) as u64;
        }
    }
    sum
}

/// Mean intensity of `channel` over the patch, in [0, 1]
pub fn extract(buffer: &PixelBuffer, channel: Channel, anchor: Point, size: PatchSize) -> Result<f64> {
    let rect = PatchRect::clamped(buffer, anchor, size)?;
    let sum = channel_sum(buffer, channel, rect);
    Ok(sum as f64 / (rect.pixel_count() * buffer.max_value() as u64) as f64)
}

/// Mean of `channel` scaled to 0-255, truncated toward zero
///
/// Computed on the integer samples so a patch of uniform value `v` in an
/// 8-bit image always yields exactly `v`.
pub fn extract_scaled(buffer: &PixelBuffer, channel: Channel, anchor: Point, size: PatchSize) -> Result<u8> {
    let rect = PatchRect::clamped(buffer, anchor, size)?;
    let sum = channel_sum(buffer, channel, rect);
    let scaled = sum * 255 / (rect.pixel_count() * buffer.max_value() as u64);
    Ok(scaled.min(255) as u8)
}

/// Scaled means of all three channels
pub fn patch_stats(buffer: &PixelBuffer, anchor: Point, size: PatchSize) -> Result<PatchStats> {
    Ok(PatchStats {
        r: extract_scaled(buffer, Channel::Red, anchor, size)?,
        g: extract_scaled(buffer, Channel::Green, anchor, size)?,
        b: extract_scaled(buffer, Channel::Blue, anchor, size)?,
    })
}
