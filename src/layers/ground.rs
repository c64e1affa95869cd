//! Ground tiles: the grid that finished paint strokes are applied to.

use crate::core::geo::TileCoord;
use crate::input::stroke::PaintStroke;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// Stack of tile codes drawn bottom to top in one cell
pub type TileStack = Vec<u32>;

/// Row-major grid of tile stacks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundLayer {
    rows: u32,
    cols: u32,
    cells: Vec<TileStack>,
}

/// Undo record for one applied stroke
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedStroke {
    pub code: u32,
    /// Each touched cell with the stack it had before
    pub previous: Vec<(TileCoord, TileStack)>,
}

impl GroundLayer {
    /// Grid where every cell holds `fill`
    pub fn new(rows: u32, cols: u32, fill: u32) -> Self {
        Self {
            rows,
            cols,
            cells: vec![vec![fill]; rows as usize * cols as usize],
        }
    }

    /// Build from nested rows; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<TileStack>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|row| row.len() != cols) {
            return Err(MapError::InvalidMetrics(format!(
                "ground row {bad} has {} cells, expected {cols}",
                rows[bad].len()
            )));
        }
        let row_count = rows.len();
        Ok(Self {
            rows: row_count as u32,
            cols: cols as u32,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.row < 0 || tile.col < 0 || tile.row as u32 >= self.rows || tile.col as u32 >= self.cols {
            return None;
        }
        Some(tile.row as usize * self.cols as usize + tile.col as usize)
    }

    pub fn stack(&self, tile: TileCoord) -> Option<&[u32]> {
        self.index(tile).map(|index| self.cells[index].as_slice())
    }

    /// Replace one cell; returns the previous stack
    pub fn set(&mut self, tile: TileCoord, stack: TileStack) -> Option<TileStack> {
        let index = self.index(tile)?;
        Some(std::mem::replace(&mut self.cells[index], stack))
    }

    /// Paint `code` over every in-range tile of `stroke`
    pub fn apply_stroke(&mut self, stroke: &PaintStroke, code: u32) -> AppliedStroke {
        let previous = stroke
            .tiles
            .iter()
            .filter_map(|tile| self.set(*tile, vec![code]).map(|old| (*tile, old)))
            .collect();
        AppliedStroke { code, previous }
    }

    /// Undo an applied stroke
    pub fn revert(&mut self, applied: &AppliedStroke) {
        for (tile, stack) in applied.previous.iter().rev() {
            self.set(*tile, stack.clone());
        }
    }

    /// Redo an applied stroke
    pub fn reapply(&mut self, applied: &AppliedStroke) {
        for (tile, _) in &applied.previous {
            self.set(*tile, vec![applied.code]);
        }
    }

    /// Grow or shrink, filling new cells with `fill` and keeping overlap
    pub fn resize(&mut self, rows: u32, cols: u32, fill: u32) {
        let mut cells = vec![vec![fill]; rows as usize * cols as usize];
        for row in 0..rows.min(self.rows) {
            for col in 0..cols.min(self.cols) {
                let from = row as usize * self.cols as usize + col as usize;
                let to = row as usize * cols as usize + col as usize;
                cells[to] = std::mem::take(&mut self.cells[from]);
            }
        }
        self.rows = rows;
        self.cols = cols;
        self.cells = cells;
    }

    /// Cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &[u32])> + '_ {
        self.cells.iter().enumerate().map(move |(index, stack)| {
            let row = (index / self.cols.max(1) as usize) as i32;
            let col = (index % self.cols.max(1) as usize) as i32;
            (TileCoord::new(row, col), stack.as_slice())
        })
    }
}
