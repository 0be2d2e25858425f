/// Axis-aligned box in integer pixel coordinates.
///
/// Stored as `(x1, y1)` = top-left and `(x2, y2)` = bottom-right.
/// Coordinates are kept exactly as the producer reported them: no clamping
/// to the frame, no ordering checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Round floating-point detector output to pixel coordinates.
    pub fn from_f64(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(
            x1.round() as i32,
            y1.round() as i32,
            x2.round() as i32,
            y2.round() as i32,
        )
    }

    pub fn top(&self) -> i32 {
        self.y1
    }

    pub fn left(&self) -> i32 {
        self.x1
    }

    /// Intersection of the box with a `width` × `height` frame, as
    /// `(x, y, w, h)`. `None` when nothing of the box is inside the frame.
    ///
    /// Used for reading pixels out of a frame; drawing never clamps.
    pub fn visible_region(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x1 = self.x1.min(self.x2).max(0);
        let y1 = self.y1.min(self.y2).max(0);
        let x2 = self.x1.max(self.x2).min(width as i32);
        let y2 = self.y1.max(self.y2).min(height as i32);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some((x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32))
    }
}
