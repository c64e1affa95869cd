use crate::{
    animation::sprite::{AnimationClock, SpriteSheet},
    camera::{Camera, CameraEvent},
    core::{
        config::{EngineConfig, EngineProfile},
        geo::{Point, Size, TileCoord},
        history::History,
        metrics::{measure_bounds, GridMetrics, MapBounds},
        viewport::ViewTransform,
    },
    input::{
        events::InputEvent,
        gestures::{AppMode, InteractionContext, InteractionController, InteractionEvent},
        picker::TilePicker,
        stroke::PaintConstraint,
    },
    layers::{
        entity::{Entity, EntityLayer},
        ground::{AppliedStroke, GroundLayer},
    },
    rendering::{
        context::Surface,
        pipeline::{FrameRenderer, FrameScene, FrameStats},
    },
    Result,
};
use crossbeam_channel::Receiver;
use fxhash::FxHashMap;
use instant::Instant;

/// An isometric map with its camera, input handling and render state.
///
/// Owns every component; nothing is global. The view transform is rebuilt
/// from the camera on each call so rendering and picking in the same tick
/// always agree.
#[derive(Debug)]
pub struct IsoMap {
    config: EngineConfig,
    metrics: GridMetrics,
    bounds: MapBounds,
    canvas: Size,
    camera: Camera,
    controller: InteractionController,
    ground: GroundLayer,
    ground_revision: u64,
    entities: EntityLayer,
    sheets: FxHashMap<u32, SpriteSheet>,
    clock: AnimationClock,
    history: History<AppliedStroke>,
    renderer: FrameRenderer,
    paint_code: u32,
}

impl IsoMap {
    pub fn new(metrics: GridMetrics, canvas: Size, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            bounds: measure_bounds(&metrics),
            camera: Camera::new(config.camera.clone()),
            controller: InteractionController::new(config.input.clone(), &metrics),
            ground: GroundLayer::new(metrics.rows, metrics.cols, 0),
            ground_revision: 0,
            entities: EntityLayer::new(),
            sheets: FxHashMap::default(),
            clock: AnimationClock::new(),
            history: History::new(),
            renderer: FrameRenderer::new(config.render.clone()),
            paint_code: 0,
            metrics,
            canvas,
            config,
        })
    }

    pub fn with_profile(metrics: GridMetrics, canvas: Size, profile: EngineProfile) -> Result<Self> {
        Self::new(metrics, canvas, profile.resolve())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    pub fn bounds(&self) -> &MapBounds {
        &self.bounds
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn set_canvas_size(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn subscribe_camera(&mut self) -> Receiver<CameraEvent> {
        self.camera.subscribe()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut InteractionController {
        &mut self.controller
    }

    pub fn set_mode(&mut self, mode: AppMode) -> Vec<InteractionEvent> {
        self.controller.set_mode(mode)
    }

    pub fn set_constraint(&mut self, constraint: PaintConstraint) {
        self.controller.set_constraint(constraint);
    }

    /// Tile code that finished strokes paint
    pub fn set_paint_code(&mut self, code: u32) {
        self.paint_code = code;
    }

    pub fn paint_code(&self) -> u32 {
        self.paint_code
    }

    /// Exact (unsnapped) transform for the current camera and canvas
    pub fn view_transform(&self) -> ViewTransform {
        self.camera
            .view_transform(self.canvas, self.bounds.background_size())
    }

    pub fn picker(&self) -> TilePicker {
        TilePicker::new(self.metrics, self.bounds)
    }

    /// Tile under a canvas position
    pub fn pick(&self, screen: Point) -> Option<TileCoord> {
        self.picker().pick(screen, &self.view_transform())
    }

    /// Resize the grid, keeping sprite extents, ground overlap and camera
    pub fn resize_grid(&mut self, rows: u32, cols: u32) {
        self.metrics = GridMetrics { rows, cols, ..self.metrics };
        self.ground.resize(rows, cols, 0);
        self.ground_revision += 1;
        // undo records may point outside the new grid
        self.history.clear();
        self.remeasure();
    }

    /// Register (or replace) the sheet drawn for entities with `code`.
    /// Grows the background if the sprite is larger than any seen so far.
    pub fn register_sprite_sheet(&mut self, code: u32, sheet: SpriteSheet) -> Result<()> {
        sheet.validate()?;
        let grown = self.metrics.including_sprite(Size::new(sheet.width, sheet.height));
        self.sheets.insert(code, sheet);
        if grown != self.metrics {
            self.metrics = grown;
            self.remeasure();
        }
        Ok(())
    }

    pub fn sprite_sheet(&self, code: u32) -> Option<&SpriteSheet> {
        self.sheets.get(&code)
    }

    fn remeasure(&mut self) {
        self.bounds = measure_bounds(&self.metrics);
        self.controller.resize(&self.metrics);
    }

    pub fn ground(&self) -> &GroundLayer {
        &self.ground
    }

    /// Replace the ground wholesale; the grid follows its size
    pub fn set_ground(&mut self, ground: GroundLayer) {
        self.metrics = GridMetrics {
            rows: ground.rows(),
            cols: ground.cols(),
            ..self.metrics
        };
        self.ground = ground;
        self.ground_revision += 1;
        self.history.clear();
        self.remeasure();
    }

    /// Bumped whenever ground data changes
    pub fn ground_revision(&self) -> u64 {
        self.ground_revision
    }

    pub fn entities(&self) -> &EntityLayer {
        &self.entities
    }

    pub fn add_entity(&mut self, entity: Entity) -> Option<Entity> {
        let replaced = self.entities.insert(entity);
        if let Some(old) = &replaced {
            self.clock.discard(&old.id);
        }
        replaced
    }

    /// Remove an entity together with its animation state
    pub fn remove_entity(&mut self, id: &str) -> Option<Entity> {
        let removed = self.entities.remove(id)?;
        self.clock.discard(id);
        Some(removed)
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    /// Route one input event. Finished strokes are painted onto the ground
    /// with the current paint code and recorded for undo.
    pub fn handle_input(&mut self, event: &InputEvent, now: Instant) -> Vec<InteractionEvent> {
        let picker = self.picker();
        let mut ctx = InteractionContext {
            camera: &mut self.camera,
            picker: &picker,
            canvas: self.canvas,
        };
        let events = self.controller.handle(event, &mut ctx, now);

        for event in &events {
            if let InteractionEvent::StrokeApplied(stroke) = event {
                let applied = self.ground.apply_stroke(stroke, self.paint_code);
                if !applied.previous.is_empty() {
                    self.history.push(applied);
                    self.ground_revision += 1;
                }
            }
        }
        events
    }

    pub fn undo(&mut self) -> bool {
        let Some(applied) = self.history.undo() else {
            return false;
        };
        self.ground.revert(applied);
        self.ground_revision += 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(applied) = self.history.redo() else {
            return false;
        };
        self.ground.reapply(applied);
        self.ground_revision += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Advance camera animations; returns the number of camera events
    pub fn update(&mut self, now: Instant) -> usize {
        self.camera.update(now)
    }

    pub fn is_animating(&self) -> bool {
        self.camera.is_animating()
    }

    /// Draw the current frame
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> Result<FrameStats> {
        let scene = FrameScene {
            canvas: self.canvas,
            metrics: &self.metrics,
            bounds: &self.bounds,
            transform: self.view_transform(),
            ground_revision: self.ground_revision,
            entities: &self.entities,
            sheets: &self.sheets,
            cursor: self.controller.hovered().or(self.controller.selected()),
            preview: self.controller.preview(),
        };
        self.renderer.render(&scene, &mut self.clock, now, surface)
    }
}
