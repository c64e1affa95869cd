//! Pointer position to tile resolution.

use crate::core::geo::{Point, TileCoord};
use crate::core::metrics::{GridMetrics, MapBounds};
use crate::core::viewport::{round_to_tile, tile_center_world, world_to_lattice, ViewTransform};

/// Resolves screen positions to tiles for one set of grid metrics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePicker {
    metrics: GridMetrics,
    bounds: MapBounds,
}

impl TilePicker {
    pub fn new(metrics: GridMetrics, bounds: MapBounds) -> Self {
        Self { metrics, bounds }
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    pub fn bounds(&self) -> &MapBounds {
        &self.bounds
    }

    /// Tile under `screen`, or `None` outside the grid. `transform` must be
    /// the unsnapped transform of the current tick.
    pub fn pick(&self, screen: Point, transform: &ViewTransform) -> Option<TileCoord> {
        pick_tile(screen, transform, &self.metrics, &self.bounds)
    }
}

/// Tile under a screen position.
///
/// The rounded lattice cell is only a first guess: near diamond edges the
/// true owner can be a neighbour, so the cell and its eight neighbours are
/// scored by L1 distance from their screen-space centers, each axis
/// normalized by the on-screen half tile size. That metric is exact for
/// rhombus cells; Euclidean distance favours the wrong neighbour near
/// edges. On equal scores the earlier candidate wins.
pub fn pick_tile(
    screen: Point,
    transform: &ViewTransform,
    metrics: &GridMetrics,
    bounds: &MapBounds,
) -> Option<TileCoord> {
    if !screen.is_finite() || !(transform.zoom.is_finite() && transform.zoom > 0.0) {
        return None;
    }

    let world = transform.screen_to_world(screen);
    let (u, v) = world_to_lattice(world, metrics, bounds);
    if !(u.is_finite() && v.is_finite()) {
        return None;
    }
    let rounded = round_to_tile(u, v);

    let half_width = metrics.half_tile_width() * transform.zoom;
    let half_height = metrics.half_tile_height() * transform.zoom;
    let score = |tile: TileCoord| {
        let center = transform.world_to_screen(tile_center_world(tile, metrics, bounds));
        (screen.x - center.x).abs() / half_width + (screen.y - center.y).abs() / half_height
    };

    let mut best = rounded;
    let mut best_score = score(rounded);
    for d_row in -1..=1 {
        for d_col in -1..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }
            let candidate = TileCoord::new(
                rounded.row.saturating_add(d_row),
                rounded.col.saturating_add(d_col),
            );
            let candidate_score = score(candidate);
            if candidate_score < best_score {
                best = candidate;
                best_score = candidate_score;
            }
        }
    }

    metrics.contains(best).then_some(best)
}
