// src/zones.rs - Fixed 3x3 zone grid over the camera frame
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Zone identifier 0-8, row-major from the top-left cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Zone(u8);

impl Zone {
    pub const COUNT: usize = 9;

    pub fn new(id: u8) -> Option<Self> {
        (usize::from(id) < Self::COUNT).then_some(Self(id))
    }

    fn from_cell(row: u8, col: u8) -> Self {
        Self(row * 3 + col)
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn index(&self) -> usize {
        usize::from(self.0)
    }

    pub fn row(&self) -> u8 {
        self.0 / 3
    }

    pub fn col(&self) -> u8 {
        self.0 % 3
    }

    pub fn is_top_row(&self) -> bool {
        self.row() == 0
    }

    pub fn name(&self) -> &'static str {
        const NAMES: [&str; Zone::COUNT] = [
            "top-left",
            "top-center",
            "top-right",
            "mid-left",
            "mid-center",
            "mid-right",
            "bottom-left",
            "bottom-center",
            "bottom-right",
        ];
        NAMES[self.index()]
    }
}

/// Grid lines in camera pixels, computed once from the frame size.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneGrid {
    width: f64,
    height: f64,
    col_bounds: [f64; 2],
    row_bounds: [f64; 2],
}

impl ZoneGrid {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            col_bounds: [width / 3.0, width * 2.0 / 3.0],
            row_bounds: [height / 3.0, height * 2.0 / 3.0],
        }
    }

    pub fn dimensions(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Zone for a pixel position. A point on a grid line goes to the
    /// upper/left cell; points outside the frame clamp to the border cells.
    pub fn classify_pixels(&self, x: f64, y: f64) -> Zone {
        Zone::from_cell(band(y, &self.row_bounds), band(x, &self.col_bounds))
    }

    /// Zone for a normalized position.
    pub fn classify(&self, position: Vector2<f64>) -> Zone {
        self.classify_pixels(position.x * self.width, position.y * self.height)
    }
}

fn band(value: f64, bounds: &[f64; 2]) -> u8 {
    if value <= bounds[0] {
        0
    } else if value <= bounds[1] {
        1
    } else {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_map_row_major() {
        let grid = ZoneGrid::new(640.0, 480.0);
        for row in 0..3u8 {
            for col in 0..3u8 {
                let x = (f64::from(col) + 0.5) / 3.0;
                let y = (f64::from(row) + 0.5) / 3.0;
                assert_eq!(grid.classify(Vector2::new(x, y)).id(), row * 3 + col);
            }
        }
    }

    #[test]
    fn grid_lines_belong_to_lower_zone() {
        let grid = ZoneGrid::new(600.0, 300.0);
        assert_eq!(grid.classify_pixels(200.0, 50.0).id(), 0);
        assert_eq!(grid.classify_pixels(400.0, 50.0).id(), 1);
        assert_eq!(grid.classify_pixels(50.0, 100.0).id(), 0);
        assert_eq!(grid.classify_pixels(50.0, 200.0).id(), 3);
        assert_eq!(grid.classify_pixels(200.0, 100.0).id(), 0);
        assert_eq!(grid.classify_pixels(200.1, 100.1).id(), 4);
    }

    #[test]
    fn outside_points_clamp_to_border_cells() {
        let grid = ZoneGrid::new(640.0, 480.0);
        assert_eq!(grid.classify(Vector2::new(-0.2, -0.1)).id(), 0);
        assert_eq!(grid.classify(Vector2::new(1.3, 2.0)).id(), 8);
    }

    #[test]
    fn zone_accessors() {
        let zone = Zone::new(5).unwrap();
        assert_eq!((zone.row(), zone.col()), (1, 2));
        assert_eq!(zone.name(), "mid-right");
        assert!(!zone.is_top_row());
        assert!(Zone::new(2).unwrap().is_top_row());
        assert!(Zone::new(9).is_none());
    }
}
