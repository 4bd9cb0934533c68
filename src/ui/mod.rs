/// UI widgets that are more than a layout of stock widgets

pub mod overlay;

use iced::Size;

/// Largest area the photo is drawn into
pub const MAX_VIEW_WIDTH: f32 = 900.0;
pub const MAX_VIEW_HEIGHT: f32 = 600.0;

/// Display size for a photo: fits the view area, keeps the aspect ratio
pub fn fit_size(width: u32, height: u32) -> Size {
    if width == 0 || height == 0 {
        return Size::new(0.0, 0.0);
    }
    let scale = (MAX_VIEW_WIDTH / width as f32)
        .min(MAX_VIEW_HEIGHT / height as f32)
        .min(1.0);
    Size::new(width as f32 * scale, height as f32 * scale)
}
