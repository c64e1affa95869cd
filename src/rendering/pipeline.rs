//! Per-tick draw list: background, entities back to front, then overlays.

use crate::animation::sprite::{AnimationClock, SpriteSheet};
use crate::core::config::RenderConfig;
use crate::core::geo::{Point, Rect, Size, TileCoord};
use crate::core::metrics::{GridMetrics, MapBounds};
use crate::core::viewport::{tile_center_world, tile_diamond_world, tile_top_left_world, ViewTransform};
use crate::layers::entity::{Entity, EntityLayer};
use crate::rendering::context::{OutlineStyle, Surface};
use crate::Result;
use fxhash::FxHashMap;
use instant::Instant;

/// Everything visible in one frame
pub struct FrameScene<'a> {
    pub canvas: Size,
    pub metrics: &'a GridMetrics,
    pub bounds: &'a MapBounds,
    /// Unsnapped transform of this tick, shared with picking
    pub transform: ViewTransform,
    pub ground_revision: u64,
    pub entities: &'a EntityLayer,
    pub sheets: &'a FxHashMap<u32, SpriteSheet>,
    pub cursor: Option<TileCoord>,
    pub preview: &'a [TileCoord],
}

/// What a frame drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub sprites: usize,
    /// Entities whose sprite sheet is not registered
    pub skipped: usize,
    pub outlines: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    config: RenderConfig,
}

impl FrameRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Draw `scene` onto `surface`, advancing entity animations to `now`
    pub fn render<S: Surface + ?Sized>(
        &self,
        scene: &FrameScene<'_>,
        clock: &mut AnimationClock,
        now: Instant,
        surface: &mut S,
    ) -> Result<FrameStats> {
        // Snapping is for crisp output only; picking keeps the exact transform
        let transform = if self.config.pixel_snap {
            scene.transform.snapped()
        } else {
            scene.transform
        };
        let mut stats = FrameStats::default();

        surface.begin_frame(scene.canvas)?;
        surface.draw_background(
            to_screen_rect(&transform, Rect::new(0.0, 0.0, scene.bounds.background_width, scene.bounds.background_height)),
            scene.ground_revision,
        )?;

        for entity in scene.entities.painter_order() {
            let Some(sheet) = scene.sheets.get(&entity.code) else {
                log::debug!("no sprite sheet for entity {} (code {})", entity.id, entity.code);
                stats.skipped += 1;
                continue;
            };
            let animation = entity
                .animation
                .as_deref()
                .or(sheet.default_animation.as_deref())
                .unwrap_or_default();
            let source = clock.source_rect(&entity.id, animation, sheet, now);
            let dest = to_screen_rect(&transform, sprite_world_rect(entity, sheet, scene.metrics, scene.bounds));
            surface.draw_sprite(entity.code, source, dest)?;
            stats.sprites += 1;
        }

        if self.config.show_cursor {
            if let Some(tile) = scene.cursor.filter(|tile| scene.metrics.contains(*tile)) {
                surface.draw_outline(screen_diamond(&transform, tile, scene), OutlineStyle::Cursor)?;
                stats.outlines += 1;
            }
        }
        for tile in scene.preview {
            surface.draw_outline(screen_diamond(&transform, *tile, scene), OutlineStyle::Preview)?;
            stats.outlines += 1;
        }

        surface.end_frame()?;
        Ok(stats)
    }
}

/// World rect of an entity's sprite: bottom edge on the bottom corner of its
/// footprint, centered horizontally on the footprint
pub fn sprite_world_rect(entity: &Entity, sheet: &SpriteSheet, metrics: &GridMetrics, bounds: &MapBounds) -> Rect {
    let front = entity.front();
    let back_x = tile_center_world(entity.anchor, metrics, bounds).x;
    let center_x = (back_x + tile_center_world(front, metrics, bounds).x) / 2.0;
    let front_top = tile_top_left_world(front, metrics, bounds).y;
    Rect::new(
        center_x - sheet.width / 2.0 + entity.offset_px.x,
        front_top + metrics.tile_height - sheet.height + entity.offset_px.y,
        sheet.width,
        sheet.height,
    )
}

fn to_screen_rect(transform: &ViewTransform, world: Rect) -> Rect {
    let origin = transform.world_to_screen(world.origin());
    Rect::new(
        origin.x,
        origin.y,
        world.width * transform.zoom,
        world.height * transform.zoom,
    )
}

fn screen_diamond(transform: &ViewTransform, tile: TileCoord, scene: &FrameScene<'_>) -> [Point; 4] {
    tile_diamond_world(tile, scene.metrics, scene.bounds).map(|corner| transform.world_to_screen(corner))
}
