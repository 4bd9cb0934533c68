use super::data::Point;

/// Click points collected for the image on screen
///
/// The first accepted point anchors the water patch, the second the paper
/// patch. The pair is cleared whenever a different image is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoiCapture {
    water: Option<Point>,
    paper: Option<Point>,
}

impl RoiCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the next point; returns `false` when the pair is already full
    pub fn push(&mut self, point: Point) -> bool {
        if self.water.is_none() {
            self.water = Some(point);
        } else if self.paper.is_none() {
            self.paper = Some(point);
        } else {
            return false;
        }
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn water(&self) -> Option<Point> {
        self.water
    }

    pub fn paper(&self) -> Option<Point> {
        self.paper
    }

    pub fn len(&self) -> usize {
        self.water.is_some() as usize + self.paper.is_some() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.water.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_then_paper() {
        let mut roi = RoiCapture::new();
        assert!(roi.push(Point::new(1, 2)));
        assert_eq!(roi.water(), Some(Point::new(1, 2)));
        assert_eq!(roi.paper(), None);

        assert!(roi.push(Point::new(3, 4)));
        assert_eq!(roi.water(), Some(Point::new(1, 2)));
        assert_eq!(roi.paper(), Some(Point::new(3, 4)));
        assert_eq!(roi.len(), 2);
    }

    #[test]
    fn test_third_point_rejected() {
        let mut roi = RoiCapture::new();
        roi.push(Point::new(1, 1));
        roi.push(Point::new(2, 2));
        assert!(!roi.push(Point::new(3, 3)));
        assert_eq!(roi.paper(), Some(Point::new(2, 2)));
    }

    #[test]
    fn test_clear() {
        let mut roi = RoiCapture::new();
        roi.push(Point::new(1, 1));
        roi.clear();
        assert!(roi.is_empty());
        assert_eq!(roi.len(), 0);
    }
}
