/// What a detected rectangle represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Face,
    Eye,
}

/// An axis-aligned detection rectangle in pixel coordinates.
///
/// Eye regions are reported relative to the face crop they were found in;
/// [`Region::offset`] maps them back into frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub kind: RegionKind,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32, kind: RegionKind) -> Self {
        Self {
            x,
            y,
            width,
            height,
            kind,
        }
    }

    pub fn face(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, width, height, RegionKind::Face)
    }

    pub fn eye(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, width, height, RegionKind::Eye)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Integer centre, truncating like the pixel grid does.
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Inclusive on all four edges.
    pub fn contains_point(&self, (px, py): (i32, i32)) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Intersects the region with a `frame_width × frame_height` frame.
    ///
    /// Returns `None` when nothing of the region is visible.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Option<Self> {
        let x1 = self.x.max(0);
        let y1 = self.y.max(0);
        let x2 = (self.x + self.width).min(frame_width as i32);
        let y2 = (self.y + self.height).min(frame_height as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
            kind: self.kind,
        })
    }
}

/// Circle drawn for one eye, in full-frame coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyeMark {
    pub center: (i32, i32),
    pub radius: i32,
}

impl EyeMark {
    /// Builds the mark for an eye found inside `face`'s crop.
    ///
    /// Radius is the mean of the half-width and half-height.
    pub fn from_eye_in_face(face: &Region, eye: &Region) -> Self {
        let center = eye.offset(face.x, face.y).center();
        let radius = ((eye.width + eye.height) as f64 * 0.25) as i32;
        Self { center, radius }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_center_truncates() {
        let r = Region::face(10, 20, 5, 7);
        assert_eq!(r.center(), (12, 23));
    }

    #[rstest]
    #[case::inside((50, 50), true)]
    #[case::top_left_corner((10, 10), true)]
    #[case::bottom_right_corner((110, 110), true)]
    #[case::left_of((9, 50), false)]
    #[case::below((50, 111), false)]
    fn test_contains_point(#[case] point: (i32, i32), #[case] expected: bool) {
        let r = Region::face(10, 10, 100, 100);
        assert_eq!(r.contains_point(point), expected);
    }

    #[test]
    fn test_offset_keeps_size_and_kind() {
        let r = Region::eye(1, 2, 3, 4).offset(10, 20);
        assert_eq!(r, Region::eye(11, 22, 3, 4));
    }

    #[rstest]
    #[case::inside(Region::face(10, 10, 20, 20), Some(Region::face(10, 10, 20, 20)))]
    #[case::overhangs_right(Region::face(90, 10, 20, 20), Some(Region::face(90, 10, 10, 20)))]
    #[case::overhangs_top_left(Region::face(-5, -5, 20, 20), Some(Region::face(0, 0, 15, 15)))]
    #[case::outside(Region::face(120, 10, 20, 20), None)]
    fn test_clamp_to(#[case] region: Region, #[case] expected: Option<Region>) {
        assert_eq!(region.clamp_to(100, 100), expected);
    }

    #[test]
    fn test_degenerate() {
        assert!(Region::face(0, 0, 0, 10).is_degenerate());
        assert!(!Region::face(0, 0, 1, 1).is_degenerate());
    }

    #[test]
    fn test_eye_mark_maps_into_frame_coordinates() {
        let face = Region::face(100, 50, 80, 80);
        let eye = Region::eye(10, 20, 20, 12);
        let mark = EyeMark::from_eye_in_face(&face, &eye);
        assert_eq!(mark.center, (120, 76));
        assert_eq!(mark.radius, 8);
    }
}
