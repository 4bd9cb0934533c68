use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Path, Program, Stroke};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use doc_analyzer::config::PatchSize;
use doc_analyzer::state::Point as PixelPoint;

use crate::Message;

const WATER_COLOR: Color = Color::from_rgb(0.2, 0.6, 1.0);
const PAPER_COLOR: Color = Color::from_rgb(1.0, 0.85, 0.2);

/// Transparent layer over the displayed photo
///
/// Turns clicks into image pixel coordinates and outlines the patches picked
/// so far. The photo is drawn underneath at exactly the canvas size, so the
/// mapping is a plain rescale.
#[derive(Debug, Clone)]
pub struct RoiOverlay {
    /// Decoded image size in pixels
    pub image_width: u32,
    pub image_height: u32,
    pub water: Option<PixelPoint>,
    pub paper: Option<PixelPoint>,
    pub patch: PatchSize,
    /// Only forward clicks while the workflow takes points
    pub accepting: bool,
}

impl RoiOverlay {
    /// Display position to pixel, clamped to the last row/column
    fn to_pixel(&self, position: Point, display: Size) -> Option<PixelPoint> {
        if display.width <= 0.0 || display.height <= 0.0 {
            return None;
        }
        let x = (position.x / display.width * self.image_width as f32).floor() as u32;
        let y = (position.y / display.height * self.image_height as f32).floor() as u32;
        Some(PixelPoint::new(
            x.min(self.image_width.saturating_sub(1)),
            y.min(self.image_height.saturating_sub(1)),
        ))
    }

    fn scale(&self, display: Size) -> (f32, f32) {
        (
            display.width / self.image_width.max(1) as f32,
            display.height / self.image_height.max(1) as f32,
        )
    }

    /// On-screen rectangle of a patch, clipped to the photo
    fn patch_rect(&self, anchor: PixelPoint, display: Size) -> (Point, Size) {
        let (sx, sy) = self.scale(display);
        let top_left = Point::new(anchor.x as f32 * sx, anchor.y as f32 * sy);
        let size = Size::new(
            (self.patch.width as f32 * sx).min(display.width - top_left.x),
            (self.patch.height as f32 * sy).min(display.height - top_left.y),
        );
        (top_left, size)
    }
}

impl Program<Message> for RoiOverlay {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if let canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
            if !self.accepting {
                return (canvas::event::Status::Ignored, None);
            }
            if let Some(point) = cursor
                .position_in(bounds)
                .and_then(|position| self.to_pixel(position, bounds.size()))
            {
                return (canvas::event::Status::Captured, Some(Message::ImageClicked(point)));
            }
        }

        (canvas::event::Status::Ignored, None)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        for (anchor, color) in [(self.water, WATER_COLOR), (self.paper, PAPER_COLOR)] {
            let Some(anchor) = anchor else { continue };
            let (top_left, size) = self.patch_rect(anchor, bounds.size());
            frame.stroke(
                &Path::rectangle(top_left, size),
                Stroke::default().with_color(color).with_width(2.0),
            );
        }

        vec![frame.into_geometry()]
    }
}
