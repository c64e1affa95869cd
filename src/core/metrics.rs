//! Grid metrics and the background extents derived from them.

use crate::core::geo::{Point, Size, TileCoord};
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Immutable description of the lattice and its sprite extents for a loaded
/// map/asset set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridMetrics {
    /// Base tile footprint width (e.g. 64)
    pub tile_width: f64,
    /// Base tile footprint height (e.g. 32)
    pub tile_height: f64,
    /// Widest sprite in the asset set, never smaller than `tile_width`
    pub max_sprite_width: f64,
    /// Tallest sprite in the asset set, never smaller than `tile_height`
    pub max_sprite_height: f64,
    pub rows: u32,
    pub cols: u32,
}

impl GridMetrics {
    /// Creates metrics for a `rows` x `cols` grid whose sprites all fit the
    /// base footprint.
    pub fn new(tile_width: f64, tile_height: f64, rows: u32, cols: u32) -> Result<Self> {
        Self::with_sprite_extents(tile_width, tile_height, tile_width, tile_height, rows, cols)
    }

    pub fn with_sprite_extents(
        tile_width: f64,
        tile_height: f64,
        max_sprite_width: f64,
        max_sprite_height: f64,
        rows: u32,
        cols: u32,
    ) -> Result<Self> {
        if !(tile_width.is_finite() && tile_width > 0.0) {
            return Err(MapError::InvalidMetrics(format!(
                "tile width must be positive, got {tile_width}"
            )));
        }
        if !(tile_height.is_finite() && tile_height > 0.0) {
            return Err(MapError::InvalidMetrics(format!(
                "tile height must be positive, got {tile_height}"
            )));
        }
        if !max_sprite_width.is_finite() || !max_sprite_height.is_finite() {
            return Err(MapError::InvalidMetrics(
                "sprite extents must be finite".to_string(),
            ));
        }

        Ok(Self {
            tile_width,
            tile_height,
            max_sprite_width: max_sprite_width.max(tile_width),
            max_sprite_height: max_sprite_height.max(tile_height),
            rows,
            cols,
        })
    }

    /// Returns a copy whose sprite extents also cover `sprite`.
    pub fn including_sprite(&self, sprite: Size) -> Self {
        Self {
            max_sprite_width: self.max_sprite_width.max(sprite.width),
            max_sprite_height: self.max_sprite_height.max(sprite.height),
            ..*self
        }
    }

    pub fn half_tile_width(&self) -> f64 {
        self.tile_width / 2.0
    }

    pub fn half_tile_height(&self) -> f64 {
        self.tile_height / 2.0
    }

    /// Whether `tile` lies in `[0, rows) x [0, cols)`
    pub fn contains(&self, tile: TileCoord) -> bool {
        tile.row >= 0
            && tile.col >= 0
            && (tile.row as i64) < self.rows as i64
            && (tile.col as i64) < self.cols as i64
    }

    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

/// Background raster size and the world position of the lattice.
///
/// Always produced whole by [`measure_bounds`]; never patched field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub background_width: f64,
    pub background_height: f64,
    /// World X of the top-left corner of tile (0, 0)'s footprint box
    pub origin_x: f64,
    /// World Y of the top-left corner of tile (0, 0)'s footprint box
    pub origin_y: f64,
}

impl MapBounds {
    pub fn background_size(&self) -> Size {
        Size::new(self.background_width, self.background_height)
    }

    /// World position of the center of tile (0, 0); lattice coordinates are
    /// measured from here so that integer (u, v) land on diamond centers.
    pub fn lattice_origin(&self, metrics: &GridMetrics) -> Point {
        Point::new(
            self.origin_x + metrics.half_tile_width(),
            self.origin_y + metrics.half_tile_height(),
        )
    }
}

/// Computes a snug background size and lattice origin that avoid clipping
/// the widest and tallest sprite.
pub fn measure_bounds(metrics: &GridMetrics) -> MapBounds {
    let w = metrics.tile_width;
    let h = metrics.tile_height;
    let w_max = metrics.max_sprite_width.max(w);
    let h_max = metrics.max_sprite_height.max(h);
    let span = (metrics.rows as f64) + (metrics.cols as f64);

    let bounds = MapBounds {
        background_width: (span * w / 2.0 + (w_max - w)).ceil(),
        background_height: (span * h / 2.0 + (h_max - h)).ceil(),
        // Center wide sprites horizontally; lift tall sprites vertically
        origin_x: ((metrics.rows as f64) - 1.0) * w / 2.0 + (w_max - w) / 2.0,
        origin_y: h_max - h,
    };

    log::debug!(
        "measured {}x{} grid: background {}x{}, origin ({}, {})",
        metrics.rows,
        metrics.cols,
        bounds.background_width,
        bounds.background_height,
        bounds.origin_x,
        bounds.origin_y
    );

    bounds
}
