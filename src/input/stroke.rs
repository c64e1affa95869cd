//! Multi-tile paint strokes.
//!
//! A stroke is fixed at its start tile. Every pointer move recomputes the
//! whole tile set from the start to the current tile under the active
//! [`PaintConstraint`]; nothing accumulates between moves, so revisiting a
//! position always yields the same preview.

use crate::core::geo::TileCoord;
use crate::core::metrics::GridMetrics;
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Policy deciding which tiles a stroke selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintConstraint {
    /// Only the tile under the pointer
    Single,
    /// Straight run along a shared row or column, nothing otherwise
    #[default]
    Diagonal,
    /// Straight run along the axis chosen by the first movement
    Axial,
    /// Filled rectangle spanned by start and current
    Area,
}

/// Which coordinate an axial stroke varies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    /// Axis for the movement from `start` to `current`. Ties favour rows.
    pub fn for_delta(start: TileCoord, current: TileCoord) -> Self {
        let d_row = (current.row as i64 - start.row as i64).abs();
        let d_col = (current.col as i64 - start.col as i64).abs();
        if d_row >= d_col {
            Axis::Row
        } else {
            Axis::Column
        }
    }
}

/// A finished stroke, ready to be applied to map data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintStroke {
    pub start: TileCoord,
    pub end: TileCoord,
    pub constraint: PaintConstraint,
    pub tiles: Vec<TileCoord>,
}

#[derive(Debug, Clone)]
struct ActiveStroke {
    start: TileCoord,
    current: TileCoord,
    constraint: PaintConstraint,
    axis: Option<Axis>,
    tiles: Vec<TileCoord>,
}

/// Expands a drag into the tiles to paint
#[derive(Debug, Clone)]
pub struct StrokeRasterizer {
    rows: u32,
    cols: u32,
    active: Option<ActiveStroke>,
}

impl StrokeRasterizer {
    pub fn new(metrics: &GridMetrics) -> Self {
        Self {
            rows: metrics.rows,
            cols: metrics.cols,
            active: None,
        }
    }

    /// Follow a grid resize. An active stroke is re-clipped on its next update.
    pub fn resize(&mut self, metrics: &GridMetrics) {
        self.rows = metrics.rows;
        self.cols = metrics.cols;
    }

    /// Start a stroke at `start`, discarding any stroke in progress
    pub fn begin(&mut self, start: TileCoord, constraint: PaintConstraint) -> &[TileCoord] {
        let tiles = self.clip(vec![start]);
        let stroke = self.active.insert(ActiveStroke {
            start,
            current: start,
            constraint,
            axis: None,
            tiles,
        });
        &stroke.tiles
    }

    /// Move the stroke's end to `current` and return the new preview.
    /// `None` when no stroke is active.
    pub fn update(&mut self, current: TileCoord) -> Option<&[TileCoord]> {
        let mut stroke = self.active.take()?;
        if stroke.constraint == PaintConstraint::Axial && stroke.axis.is_none() && current != stroke.start {
            stroke.axis = Some(Axis::for_delta(stroke.start, current));
        }
        stroke.current = current;
        stroke.tiles = self.clip(rasterize(stroke.constraint, stroke.start, current, stroke.axis));
        Some(self.active.insert(stroke).tiles.as_slice())
    }

    /// Finish the stroke. A stale end (no stroke active) is a no-op.
    pub fn end(&mut self) -> Option<PaintStroke> {
        let Some(stroke) = self.active.take() else {
            log::trace!("stroke end without an active stroke");
            return None;
        };
        log::debug!(
            "stroke {:?} -> {:?} ({:?}) finalized with {} tiles",
            stroke.start,
            stroke.current,
            stroke.constraint,
            stroke.tiles.len()
        );
        Some(PaintStroke {
            start: stroke.start,
            end: stroke.current,
            constraint: stroke.constraint,
            tiles: stroke.tiles,
        })
    }

    /// Abort the stroke without producing a batch
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Current preview, empty when idle
    pub fn tiles(&self) -> &[TileCoord] {
        self.active
            .as_ref()
            .map(|stroke| stroke.tiles.as_slice())
            .unwrap_or_default()
    }

    pub fn locked_axis(&self) -> Option<Axis> {
        self.active.as_ref().and_then(|stroke| stroke.axis)
    }

    fn clip(&self, tiles: Vec<TileCoord>) -> Vec<TileCoord> {
        let mut seen = FxHashSet::default();
        tiles
            .into_iter()
            .filter(|tile| {
                tile.row >= 0
                    && tile.col >= 0
                    && (tile.row as i64) < self.rows as i64
                    && (tile.col as i64) < self.cols as i64
            })
            .filter(|tile| seen.insert(*tile))
            .collect()
    }
}

/// Tiles selected between `start` and `current`, unclipped.
///
/// `axis` is only consulted for [`PaintConstraint::Axial`]; without a lock
/// the stroke has not moved yet and covers just the start tile.
pub fn rasterize(
    constraint: PaintConstraint,
    start: TileCoord,
    current: TileCoord,
    axis: Option<Axis>,
) -> Vec<TileCoord> {
    match constraint {
        PaintConstraint::Single => vec![current],
        PaintConstraint::Diagonal => {
            if start.row == current.row {
                run(start.col, current.col)
                    .map(|col| TileCoord::new(start.row, col))
                    .collect()
            } else if start.col == current.col {
                run(start.row, current.row)
                    .map(|row| TileCoord::new(row, start.col))
                    .collect()
            } else {
                Vec::new()
            }
        }
        PaintConstraint::Axial => match axis {
            None => vec![start],
            Some(Axis::Row) => run(start.row, current.row)
                .map(|row| TileCoord::new(row, start.col))
                .collect(),
            Some(Axis::Column) => run(start.col, current.col)
                .map(|col| TileCoord::new(start.row, col))
                .collect(),
        },
        PaintConstraint::Area => {
            let (row_min, row_max) = (start.row.min(current.row), start.row.max(current.row));
            let (col_min, col_max) = (start.col.min(current.col), start.col.max(current.col));
            (row_min..=row_max)
                .flat_map(|row| (col_min..=col_max).map(move |col| TileCoord::new(row, col)))
                .collect()
        }
    }
}

/// Inclusive integer run from `from` towards `to`
fn run(from: i32, to: i32) -> impl Iterator<Item = i32> {
    let ascending = to >= from;
    let len = (to as i64 - from as i64).unsigned_abs() as usize + 1;
    (0..len).map(move |step| {
        if ascending {
            from + step as i32
        } else {
            from - step as i32
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(row: i32, col: i32) -> TileCoord {
        TileCoord::new(row, col)
    }

    fn rasterizer() -> StrokeRasterizer {
        StrokeRasterizer::new(&GridMetrics::new(64.0, 32.0, 8, 8).unwrap())
    }

    #[test]
    fn test_diagonal_along_row() {
        let mut stroke = rasterizer();
        stroke.begin(t(2, 2), PaintConstraint::Diagonal);
        let tiles = stroke.update(t(2, 5)).unwrap().to_vec();
        assert_eq!(tiles, vec![t(2, 2), t(2, 3), t(2, 4), t(2, 5)]);
    }

    #[test]
    fn test_diagonal_runs_backwards_and_rejects_off_axis() {
        assert_eq!(
            rasterize(PaintConstraint::Diagonal, t(4, 1), t(2, 1), None),
            vec![t(4, 1), t(3, 1), t(2, 1)]
        );
        assert!(rasterize(PaintConstraint::Diagonal, t(0, 0), t(1, 2), None).is_empty());
    }

    #[test]
    fn test_axial_lock_survives_reversal() {
        let mut stroke = rasterizer();
        stroke.begin(t(0, 0), PaintConstraint::Axial);
        assert_eq!(stroke.update(t(1, 0)).unwrap(), &[t(0, 0), t(1, 0)]);
        assert_eq!(stroke.locked_axis(), Some(Axis::Row));

        // column delta now dominates, but the row lock holds
        assert_eq!(stroke.update(t(1, 3)).unwrap(), &[t(0, 0), t(1, 0)]);
        assert_eq!(stroke.update(t(4, 7)).unwrap().len(), 5);
    }

    #[test]
    fn test_axial_tie_favours_row_and_waits_for_movement() {
        let mut stroke = rasterizer();
        stroke.begin(t(3, 3), PaintConstraint::Axial);
        assert_eq!(stroke.update(t(3, 3)).unwrap(), &[t(3, 3)]);
        assert_eq!(stroke.locked_axis(), None);

        stroke.update(t(4, 4));
        assert_eq!(stroke.locked_axis(), Some(Axis::Row));
        assert_eq!(stroke.tiles(), &[t(3, 3), t(4, 3)]);
    }

    #[test]
    fn test_area_spans_bounding_rectangle() {
        let tiles = rasterize(PaintConstraint::Area, t(1, 1), t(3, 0), None);
        assert_eq!(tiles.len(), 6);
        for row in 1..=3 {
            for col in 0..=1 {
                assert!(tiles.contains(&t(row, col)));
            }
        }
    }

    #[test]
    fn test_single_paints_current_only() {
        let mut stroke = rasterizer();
        stroke.begin(t(1, 1), PaintConstraint::Single);
        assert_eq!(stroke.update(t(5, 2)).unwrap(), &[t(5, 2)]);
    }

    #[test]
    fn test_tiles_clipped_to_grid() {
        let mut stroke = rasterizer();
        stroke.begin(t(6, 6), PaintConstraint::Area);
        let tiles = stroke.update(t(9, 9)).unwrap();
        assert_eq!(tiles, &[t(6, 6), t(6, 7), t(7, 6), t(7, 7)]);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut stroke = rasterizer();
        stroke.begin(t(2, 2), PaintConstraint::Area);
        let first = stroke.update(t(4, 5)).unwrap().to_vec();
        stroke.update(t(0, 0));
        let again = stroke.update(t(4, 5)).unwrap().to_vec();
        assert_eq!(first, again);
    }

    #[test]
    fn test_end_emits_once_then_clears() {
        let mut stroke = rasterizer();
        stroke.begin(t(2, 2), PaintConstraint::Diagonal);
        stroke.update(t(2, 4));
        let finished = stroke.end().unwrap();
        assert_eq!(finished.start, t(2, 2));
        assert_eq!(finished.end, t(2, 4));
        assert_eq!(finished.tiles.len(), 3);

        assert!(!stroke.is_active());
        assert!(stroke.end().is_none());
        assert!(stroke.update(t(2, 5)).is_none());
    }

    #[test]
    fn test_cancel_discards() {
        let mut stroke = rasterizer();
        stroke.begin(t(0, 0), PaintConstraint::Area);
        stroke.update(t(2, 2));
        assert!(stroke.cancel());
        assert!(stroke.tiles().is_empty());
        assert!(stroke.end().is_none());
    }
}
