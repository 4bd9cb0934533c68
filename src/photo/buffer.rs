/// Decoded pixel data
///
/// Samples are kept as integers together with the maximum sample value of the
/// source (255 for 8-bit files, 65535 for 16-bit ones). Normalized intensities
/// in [0, 1] are `sample / max_value`; keeping the integers lets patch means be
/// scaled to 0-255 without floating point drift.

use image::{DynamicImage, ImageBuffer, Rgb};

/// One of the three color planes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// A decoded RGB image
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixels: ImageBuffer<Rgb<u16>, Vec<u16>>,
    max_value: u16,
}

impl PixelBuffer {
    /// Wrap a decoded image, keeping 16-bit precision when the source has it
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
            | DynamicImage::ImageRgb16(_)
            | DynamicImage::ImageRgba16(_)
            | DynamicImage::ImageRgb32F(_)
            | DynamicImage::ImageRgba32F(_) => Self {
                pixels: image.to_rgb16(),
                max_value: u16::MAX,
            },
            _ => {
                let rgb8 = image.to_rgb8();
                let pixels = ImageBuffer::from_fn(rgb8.width(), rgb8.height(), |x, y| {
                    let Rgb([r, g, b]) = *rgb8.get_pixel(x, y);
                    Rgb([r as u16, g as u16, b as u16])
                });
                Self {
                    pixels,
                    max_value: u8::MAX as u16,
                }
            }
        }
    }

    /// Build an 8-bit buffer from a function of the pixel position
    pub fn from_fn_rgb8(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> Self {
        let pixels = ImageBuffer::from_fn(width, height, |x, y| {
            let [r, g, b] = f(x, y);
            Rgb([r as u16, g as u16, b as u16])
        });
        Self {
            pixels,
            max_value: u8::MAX as u16,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Largest possible sample value (255 or 65535)
    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }

    /// Raw integer sample; caller guarantees the position is in bounds
    pub fn sample(&self, channel: Channel, x: u32, y: u32) -> u16 {
        self.pixels.get_pixel(x, y).0[channel.index()]
    }

    /// Interleaved 8-bit RGBA, row-major, for display
    pub fn to_rgba8(&self) -> Vec<u8> {
        let max = self.max_value as u32;
        let mut out = Vec::with_capacity(self.width() as usize * self.height() as usize * 4);
        for Rgb([r, g, b]) in self.pixels.pixels() {
            for sample in [r, g, b] {
                out.push((*sample as u32 * 255 / max) as u8);
            }
            out.push(u8::MAX);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb as Px, RgbImage};

    #[test]
    fn test_from_rgb8_keeps_samples() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(1, 0, Px([10, 20, 255]));
        let buffer = PixelBuffer::from_dynamic(&DynamicImage::ImageRgb8(img));

        assert_eq!(buffer.max_value(), 255);
        assert_eq!(buffer.sample(Channel::Green, 1, 0), 20);
        assert_eq!(buffer.sample(Channel::Blue, 1, 0), 255);
        assert_eq!(buffer.sample(Channel::Red, 0, 0), 0);
    }

    #[test]
    fn test_from_rgb16_keeps_precision() {
        let img = ImageBuffer::from_pixel(1, 1, Rgb([0u16, 32768, 65535]));
        let buffer = PixelBuffer::from_dynamic(&DynamicImage::ImageRgb16(img));

        assert_eq!(buffer.max_value(), u16::MAX);
        assert_eq!(buffer.sample(Channel::Green, 0, 0), 32768);
    }

    #[test]
    fn test_to_rgba8() {
        let img = ImageBuffer::from_pixel(1, 1, Rgb([65535u16, 0, 257]));
        let buffer = PixelBuffer::from_dynamic(&DynamicImage::ImageRgb16(img));
        assert_eq!(buffer.to_rgba8(), [255, 0, 1, 255]);

        let small = PixelBuffer::from_fn_rgb8(2, 1, |x, _| [x as u8, 7, 9]);
        assert_eq!(small.to_rgba8(), [0, 7, 9, 255, 1, 7, 9, 255]);
    }

    #[test]
    fn test_contains() {
        let buffer = PixelBuffer::from_fn_rgb8(3, 2, |_, _| [0, 0, 0]);
        assert!(buffer.contains(2, 1));
        assert!(!buffer.contains(3, 0));
        assert!(!buffer.contains(0, 2));
    }
}
