use nalgebra::Point2;

use crate::{GridConfigError, GridGeometry, GridSquare};

/// The pixel handed to the mapper lies outside the playable grid.
///
/// This is an ordinary outcome, not a failure: the caller decides what to
/// do with the piece (the encoder drops it).
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
#[error("pixel ({x}, {y}) is outside the playable grid")]
pub struct OutOfBounds {
    pub x: f32,
    pub y: f32,
}

/// Canonical-image pixel -> algebraic square.
#[derive(Clone, Debug)]
pub struct GridMapper {
    geometry: GridGeometry,
    block: i32,
}

impl Default for GridMapper {
    fn default() -> Self {
        let geometry = GridGeometry::default();
        let block = geometry.block_size();
        Self { geometry, block }
    }
}

impl GridMapper {
    pub fn new(geometry: GridGeometry) -> Result<Self, GridConfigError> {
        geometry.validate()?;
        let block = geometry.block_size();
        Ok(Self { geometry, block })
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Map an integer pixel of the canonical image to its square.
    pub fn map_pixel(&self, x: i32, y: i32) -> Result<GridSquare, OutOfBounds> {
        let oob = OutOfBounds {
            x: x as f32,
            y: y as f32,
        };
        let g = &self.geometry;
        let adj_x = x - g.border;
        let adj_y = y - g.border;
        if adj_x < 0 || adj_y < 0 || adj_x >= g.grid_extent || adj_y >= g.grid_extent {
            return Err(oob);
        }

        let col = (adj_x / self.block) as usize;
        let row = (adj_y / self.block) as usize;
        // the truncated block leaves a sliver past column/row 7
        if col > 7 || row > 7 {
            return Err(oob);
        }

        let file = g.file_labels[col];
        let rank = 8 - g.rank_labels[row] + 1;
        GridSquare::from_label(file, rank).ok_or(oob)
    }

    /// Map a sub-pixel point by truncating both coordinates toward zero.
    /// Non-finite points are always out of bounds.
    pub fn map_point(&self, p: Point2<f32>) -> Result<GridSquare, OutOfBounds> {
        let oob = OutOfBounds { x: p.x, y: p.y };
        if !p.x.is_finite() || !p.y.is_finite() {
            return Err(oob);
        }
        let (fx, fy) = (p.x.trunc(), p.y.trunc());
        if fx.abs() > i32::MAX as f32 / 2.0 || fy.abs() > i32::MAX as f32 / 2.0 {
            return Err(oob);
        }
        self.map_pixel(fx as i32, fy as i32).map_err(|_| oob)
    }

    /// Centre pixel of `square`; the inverse of [`GridMapper::map_pixel`].
    pub fn square_center(&self, square: GridSquare) -> (i32, i32) {
        let g = &self.geometry;
        let col = g
            .file_labels
            .iter()
            .position(|&f| f == square.file_char())
            .unwrap_or(0) as i32;
        let label = 9 - square.rank();
        let row = g
            .rank_labels
            .iter()
            .position(|&r| r == label)
            .unwrap_or(0) as i32;
        (
            g.border + col * self.block + self.block / 2,
            g.border + row * self.block + self.block / 2,
        )
    }
}
