use crate::core::geo::{Point, Rect, Size};
use crate::Result;

/// How a tile outline is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineStyle {
    /// Hovered or selected tile
    Cursor,
    /// Tile the active stroke would paint
    Preview,
}

/// Commands that can be issued to a surface. All geometry is in screen
/// pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginFrame {
        size: Size,
    },
    /// The pre-rendered ground raster; `revision` changes whenever the
    /// ground data does, so backends know when to rebuild it
    Background {
        dest: Rect,
        revision: u64,
    },
    Sprite {
        code: u32,
        source: Rect,
        dest: Rect,
    },
    /// Diamond corners: top, right, bottom, left
    Outline {
        corners: [Point; 4],
        style: OutlineStyle,
    },
    EndFrame,
}

/// A drawing backend (canvas, GPU, image buffer, ...)
pub trait Surface {
    fn begin_frame(&mut self, size: Size) -> Result<()>;

    fn draw_background(&mut self, dest: Rect, revision: u64) -> Result<()>;

    fn draw_sprite(&mut self, code: u32, source: Rect, dest: Rect) -> Result<()>;

    fn draw_outline(&mut self, corners: [Point; 4], style: OutlineStyle) -> Result<()>;

    fn end_frame(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Surface that only records what it was asked to draw; used headless and
/// in tests
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the most recent frame
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sprites(&self) -> impl Iterator<Item = (u32, Rect, Rect)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Sprite { code, source, dest } => Some((*code, *source, *dest)),
            _ => None,
        })
    }

    pub fn outlines(&self, style: OutlineStyle) -> usize {
        self.commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Outline { style: s, .. } if *s == style))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn begin_frame(&mut self, size: Size) -> Result<()> {
        self.commands.clear();
        self.commands.push(DrawCommand::BeginFrame { size });
        Ok(())
    }

    fn draw_background(&mut self, dest: Rect, revision: u64) -> Result<()> {
        self.commands.push(DrawCommand::Background { dest, revision });
        Ok(())
    }

    fn draw_sprite(&mut self, code: u32, source: Rect, dest: Rect) -> Result<()> {
        self.commands.push(DrawCommand::Sprite { code, source, dest });
        Ok(())
    }

    fn draw_outline(&mut self, corners: [Point; 4], style: OutlineStyle) -> Result<()> {
        self.commands.push(DrawCommand::Outline { corners, style });
        Ok(())
    }

    fn end_frame(&mut self) -> Result<()> {
        self.commands.push(DrawCommand::EndFrame);
        self.frames += 1;
        Ok(())
    }
}
