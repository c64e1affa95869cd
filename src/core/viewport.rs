//! Pure geometry between world, screen and lattice space.
//!
//! * **World**: unscaled pixel space of the static background raster.
//! * **Screen**: canvas pixels after zoom and pan.
//! * **Lattice**: (row, col) indices of the isometric diamond grid.
//!
//! Nothing in here holds state. A [`ViewTransform`] is rebuilt from the
//! camera, the map bounds and the canvas size whenever it is needed.

use crate::core::constants::PICK_EPSILON;
use crate::core::geo::{Point, Size, TileCoord};
use crate::core::metrics::{GridMetrics, MapBounds};
use serde::{Deserialize, Serialize};

/// Scale + translation mapping world pixels to screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub zoom: f64,
    /// Translation X in screen pixels
    pub translate_x: f64,
    /// Translation Y in screen pixels
    pub translate_y: f64,
}

impl ViewTransform {
    /// View transform shared by rendering and picking.
    ///
    /// Centers the background on the canvas at pan (0, 0). The translation
    /// is left unrounded; see [`ViewTransform::snapped`].
    pub fn compute(canvas: Size, background: Size, zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self {
            zoom,
            translate_x: canvas.width / 2.0 + pan_x - background.width * zoom / 2.0,
            translate_y: canvas.height / 2.0 + pan_y - background.height * zoom / 2.0,
        }
    }

    /// Integer-snapped copy for crisp pixel-art rendering. Never use the
    /// result for hit-testing.
    pub fn snapped(&self) -> Self {
        Self {
            zoom: self.zoom,
            translate_x: self.translate_x.round(),
            translate_y: self.translate_y.round(),
        }
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.translate_x,
            world.y * self.zoom + self.translate_y,
        )
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.translate_x) / self.zoom,
            (screen.y - self.translate_y) / self.zoom,
        )
    }
}

/// Base-footprint top-left of a tile in world space (ignores sprite overhang)
pub fn tile_top_left_world(tile: TileCoord, metrics: &GridMetrics, bounds: &MapBounds) -> Point {
    let row = tile.row as f64;
    let col = tile.col as f64;
    Point::new(
        (col - row) * metrics.tile_width / 2.0 + bounds.origin_x,
        (col + row) * metrics.tile_height / 2.0 + bounds.origin_y,
    )
}

/// World position of the diamond center of a tile's base footprint
pub fn tile_center_world(tile: TileCoord, metrics: &GridMetrics, bounds: &MapBounds) -> Point {
    let top_left = tile_top_left_world(tile, metrics, bounds);
    Point::new(
        top_left.x + metrics.half_tile_width(),
        top_left.y + metrics.half_tile_height(),
    )
}

/// The four diamond corners of a tile in world space: top, right, bottom, left
pub fn tile_diamond_world(tile: TileCoord, metrics: &GridMetrics, bounds: &MapBounds) -> [Point; 4] {
    let center = tile_center_world(tile, metrics, bounds);
    let hw = metrics.half_tile_width();
    let hh = metrics.half_tile_height();
    [
        Point::new(center.x, center.y - hh),
        Point::new(center.x + hw, center.y),
        Point::new(center.x, center.y + hh),
        Point::new(center.x - hw, center.y),
    ]
}

/// Continuous lattice coordinates `(u ≈ col, v ≈ row)` of a world point.
///
/// Measured from the center of tile (0, 0) so that every diamond center maps
/// to integral `(u, v)` and every diamond to the unit square around it.
pub fn world_to_lattice(world: Point, metrics: &GridMetrics, bounds: &MapBounds) -> (f64, f64) {
    let origin = bounds.lattice_origin(metrics);
    let local_x = world.x - origin.x;
    let local_y = world.y - origin.y;
    let hw = metrics.half_tile_width();
    let hh = metrics.half_tile_height();

    let u = (local_x / hw + local_y / hh) / 2.0;
    let v = (local_y / hh - local_x / hw) / 2.0;
    (u, v)
}

/// Nearest-center rounding with a small bias so exact seams resolve the
/// same way in every direction.
pub fn round_to_tile(u: f64, v: f64) -> TileCoord {
    let col = (u + 0.5 - PICK_EPSILON).floor();
    let row = (v + 0.5 - PICK_EPSILON).floor();
    TileCoord::new(saturate(row), saturate(col))
}

fn saturate(value: f64) -> i32 {
    // `as` saturates and maps NaN to 0; clamp first so far-off picks stay far off
    value.clamp(i32::MIN as f64 + 2.0, i32::MAX as f64 - 2.0) as i32
}
