//! Dirt raster the player excavates
//!
//! One `Soil` per pixel, row-major. Point queries are O(1) lookups and anything
//! outside the field reads as solid so the borders behave like walls.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

/// Contents of a single pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Soil {
    /// Excavated, ingredients fall through
    Clear = 0,
    /// Untouched dirt
    #[default]
    Dirt = 1,
    /// Bridge laid down by the brush tool
    Plank = 2,
}

impl Soil {
    #[inline]
    pub fn is_solid(self) -> bool {
        self != Soil::Clear
    }
}

/// Mutable occupancy raster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainField {
    width: u32,
    height: u32,
    cells: Vec<Soil>,
}

impl TerrainField {
    /// Create a field completely filled with dirt
    pub fn new(width: u32, height: u32) -> Result<Self, LevelError> {
        if width == 0 || height == 0 {
            return Err(LevelError::EmptyField { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Soil::Dirt; width as usize * height as usize],
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major raster for drawing
    pub fn cells(&self) -> &[Soil] {
        &self.cells
    }

    /// Pixel index for a point, `None` outside the field
    #[inline]
    fn index_of(&self, x: f32, y: f32) -> Option<usize> {
        if !(x >= 0.0 && y >= 0.0) {
            // Also rejects NaN
            return None;
        }
        let px = x.floor();
        let py = y.floor();
        if px >= self.width as f32 || py >= self.height as f32 {
            return None;
        }
        Some(py as usize * self.width as usize + px as usize)
    }

    /// Soil at a point; `None` outside the field
    pub fn soil_at(&self, x: f32, y: f32) -> Option<Soil> {
        self.index_of(x, y).map(|i| self.cells[i])
    }

    /// Whether a point is solid. Out-of-bounds points are always solid.
    #[inline]
    pub fn is_occupied(&self, x: f32, y: f32) -> bool {
        match self.index_of(x, y) {
            Some(i) => self.cells[i].is_solid(),
            None => true,
        }
    }

    /// Excavate every pixel touched by the circle
    pub fn clear_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.paint_circle(cx, cy, r, Soil::Clear);
    }

    /// Lay planks over every pixel touched by the circle
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32) {
        self.paint_circle(cx, cy, r, Soil::Plank);
    }

    /// Excavate the pixels covered by the rectangle `[x, x + w) x [y, y + h)`
    pub fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let Some((x0, x1)) = self.clip_span(x, (x + w).ceil() - 1.0, self.width) else {
            return;
        };
        let Some((y0, y1)) = self.clip_span(y, (y + h).ceil() - 1.0, self.height) else {
            return;
        };
        for py in y0..=y1 {
            let row = py as usize * self.width as usize;
            self.cells[row + x0 as usize..=row + x1 as usize].fill(Soil::Clear);
        }
    }

    /// Share of pixels that have been excavated (0..=1)
    pub fn cleared_fraction(&self) -> f32 {
        let cleared = self.cells.iter().filter(|c| !c.is_solid()).count();
        cleared as f32 / self.cells.len() as f32
    }

    /// Pixel range `[lo, hi]` covering the continuous span, clipped to `0..limit`
    fn clip_span(&self, lo: f32, hi: f32, limit: u32) -> Option<(u32, u32)> {
        if !(lo.is_finite() && hi.is_finite()) {
            return None;
        }
        let lo = lo.floor().max(0.0);
        let hi = hi.floor().min(limit as f32 - 1.0);
        if lo > hi {
            return None;
        }
        Some((lo as u32, hi as u32))
    }

    /// Set every pixel whose unit square intersects the circle.
    ///
    /// Covering whole touched pixels (not just pixel centers) means every point
    /// inside the circle lands on a painted pixel.
    fn paint_circle(&mut self, cx: f32, cy: f32, r: f32, soil: Soil) {
        if !(r >= 0.0 && r.is_finite()) {
            return;
        }
        let Some((x0, x1)) = self.clip_span(cx - r, cx + r, self.width) else {
            return;
        };
        let Some((y0, y1)) = self.clip_span(cy - r, cy + r, self.height) else {
            return;
        };
        let r_sq = r * r;
        for py in y0..=y1 {
            let near_y = cy.clamp(py as f32, py as f32 + 1.0);
            let dy = cy - near_y;
            let row = py as usize * self.width as usize;
            for px in x0..=x1 {
                let near_x = cx.clamp(px as f32, px as f32 + 1.0);
                let dx = cx - near_x;
                if dx * dx + dy * dy <= r_sq {
                    self.cells[row + px as usize] = soil;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_field_is_solid() {
        let field = TerrainField::new(40, 30).unwrap();
        assert!(field.is_occupied(0.0, 0.0));
        assert!(field.is_occupied(39.9, 29.9));
        assert_eq!(field.cleared_fraction(), 0.0);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert_eq!(
            TerrainField::new(0, 10).unwrap_err(),
            LevelError::EmptyField {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn test_out_of_bounds_is_occupied() {
        let mut field = TerrainField::new(20, 20).unwrap();
        field.clear_rect(0.0, 0.0, 20.0, 20.0);
        assert!(!field.is_occupied(10.0, 10.0));
        assert!(field.is_occupied(-0.01, 10.0));
        assert!(field.is_occupied(10.0, -0.01));
        assert!(field.is_occupied(20.0, 10.0));
        assert!(field.is_occupied(10.0, 20.0));
        assert!(field.is_occupied(f32::NAN, 10.0));
        assert_eq!(field.soil_at(25.0, 5.0), None);
    }

    #[test]
    fn test_clear_circle_clips_at_border() {
        let mut field = TerrainField::new(20, 20).unwrap();
        field.clear_circle(0.0, 0.0, 8.0);
        assert!(!field.is_occupied(1.0, 1.0));
        assert!(field.is_occupied(15.0, 15.0));
        // Border still acts as a wall
        assert!(field.is_occupied(-1.0, 1.0));
    }

    #[test]
    fn test_fill_overwrites_cleared() {
        let mut field = TerrainField::new(50, 50).unwrap();
        field.clear_circle(25.0, 25.0, 15.0);
        assert!(!field.is_occupied(25.0, 25.0));
        field.fill_circle(25.0, 25.0, 4.0);
        assert!(field.is_occupied(25.0, 25.0));
        assert_eq!(field.soil_at(25.0, 25.0), Some(Soil::Plank));
        // Outside the plank the hole remains
        assert!(!field.is_occupied(25.0, 35.0));
    }

    #[test]
    fn test_clear_rect_partial_overlap() {
        let mut field = TerrainField::new(30, 30).unwrap();
        field.clear_rect(-10.0, 20.0, 100.0, 50.0);
        assert!(!field.is_occupied(0.0, 29.5));
        assert!(!field.is_occupied(29.5, 20.0));
        assert!(field.is_occupied(15.0, 19.5));
    }

    #[test]
    fn test_clear_rect_is_half_open() {
        let mut field = TerrainField::new(30, 30).unwrap();
        field.clear_rect(5.0, 5.0, 10.0, 10.0);
        assert!(!field.is_occupied(5.0, 5.0));
        assert!(!field.is_occupied(14.9, 14.9));
        assert!(field.is_occupied(15.0, 10.0));
        assert!(field.is_occupied(10.0, 15.0));
        assert!((field.cleared_fraction() - 100.0 / 900.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_cleared_circle_is_open(
            cx in -20.0f32..120.0,
            cy in -20.0f32..120.0,
            r in 0.0f32..40.0,
            angle in 0.0f32..std::f32::consts::TAU,
            frac in 0.0f32..0.999,
        ) {
            let mut field = TerrainField::new(100, 100).unwrap();
            field.clear_circle(cx, cy, r);
            let x = cx + angle.cos() * r * frac;
            let y = cy + angle.sin() * r * frac;
            let inside_field = x >= 0.0 && y >= 0.0 && x < 100.0 && y < 100.0;
            if inside_field {
                prop_assert!(!field.is_occupied(x, y));
            }
        }

        #[test]
        fn prop_fill_center_is_solid(
            cx in 0.0f32..100.0,
            cy in 0.0f32..100.0,
            r in 0.0f32..30.0,
            pre_clear in any::<bool>(),
        ) {
            let mut field = TerrainField::new(100, 100).unwrap();
            if pre_clear {
                field.clear_circle(cx, cy, r + 10.0);
            }
            field.fill_circle(cx, cy, r);
            prop_assert!(field.is_occupied(cx, cy));
        }
    }
}
