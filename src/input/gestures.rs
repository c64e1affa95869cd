//! Gesture arbitration and the interaction controller.
//!
//! Raw [`InputEvent`]s are ambiguous: a left-drag may pan the map or paint
//! tiles, one finger may pan or paint, two fingers pinch. The
//! [`GestureArbiter`] records which interpretation owns each pointer/touch
//! session, and the [`InteractionController`] routes every event to that
//! owner only.

use crate::camera::{Camera, Direction};
use crate::core::config::InputConfig;
use crate::core::constants::DEFAULT_ZOOM;
use crate::core::geo::{Point, Size, TileCoord};
use crate::core::metrics::GridMetrics;
use crate::input::events::{InputEvent, Key, MouseButton, TouchPhase, TouchPoint};
use crate::input::handler::{KeyAction, KeyBindings};
use crate::input::picker::TilePicker;
use crate::input::stroke::{PaintConstraint, PaintStroke, StrokeRasterizer};
use fxhash::{FxHashMap, FxHashSet};
use instant::Instant;
use serde::{Deserialize, Serialize};

/// Whether pointer input edits the map or only navigates it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AppMode {
    #[default]
    Navigation,
    Edit,
}

/// One pointer or one finger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureSession {
    Mouse,
    Touch(u64),
}

/// Interpretation claiming a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureOwner {
    DragPan,
    PaintStroke,
    TouchPan,
    Pinch,
}

/// Exclusive session ownership.
///
/// A session keeps its owner until released; competing claims fail.
#[derive(Debug, Clone, Default)]
pub struct GestureArbiter {
    claims: FxHashMap<GestureSession, GestureOwner>,
}

impl GestureArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `session` for `owner`. Fails if anything already owns it.
    pub fn claim(&mut self, session: GestureSession, owner: GestureOwner) -> bool {
        if self.claims.contains_key(&session) {
            return false;
        }
        self.claims.insert(session, owner);
        true
    }

    /// Hand `session` from `from` to `to`; fails unless `from` owns it
    pub fn convert(&mut self, session: GestureSession, from: GestureOwner, to: GestureOwner) -> bool {
        match self.claims.get_mut(&session) {
            Some(owner) if *owner == from => {
                *owner = to;
                true
            }
            _ => false,
        }
    }

    pub fn owner(&self, session: GestureSession) -> Option<GestureOwner> {
        self.claims.get(&session).copied()
    }

    /// First session owned by `owner`
    pub fn session_of(&self, owner: GestureOwner) -> Option<GestureSession> {
        self.claims
            .iter()
            .find(|(_, claimed)| **claimed == owner)
            .map(|(session, _)| *session)
    }

    pub fn release(&mut self, session: GestureSession) -> Option<GestureOwner> {
        self.claims.remove(&session)
    }

    pub fn release_touches(&mut self) {
        self.claims
            .retain(|session, _| !matches!(session, GestureSession::Touch(_)));
    }

    pub fn clear(&mut self) {
        self.claims.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.claims.is_empty()
    }
}

/// What the controller observed, for the host and renderer
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// Tile under the idle pointer changed
    HoverChanged(Option<TileCoord>),
    /// Click selected a tile (or empty space)
    TileSelected(Option<TileCoord>),
    /// Tiles the active stroke would paint
    StrokePreview(Vec<TileCoord>),
    PreviewCleared,
    /// A finished stroke to apply to map data
    StrokeApplied(PaintStroke),
}

/// Everything the controller reads or drives for one event
pub struct InteractionContext<'a> {
    pub camera: &'a mut Camera,
    pub picker: &'a TilePicker,
    /// Canvas size in pixels
    pub canvas: Size,
}

impl InteractionContext<'_> {
    /// Tile under a canvas position with the camera as it is right now
    fn pick(&self, position: Point) -> Option<TileCoord> {
        let transform = self
            .camera
            .view_transform(self.canvas, self.picker.bounds().background_size());
        self.picker.pick(position, &transform)
    }
}

#[derive(Debug, Clone, Default)]
struct MouseDrag {
    last: Point,
    distance: f64,
}

/// Turns raw input into camera motion, hover/selection and paint strokes
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: InputConfig,
    bindings: KeyBindings,
    mode: AppMode,
    constraint: PaintConstraint,
    arbiter: GestureArbiter,
    stroke: StrokeRasterizer,
    hovered: Option<TileCoord>,
    selected: Option<TileCoord>,
    drag: Option<MouseDrag>,
    suppress_click: bool,
    last_touch: Option<Point>,
    pinch_distance: Option<f64>,
    edge_pans: FxHashSet<Direction>,
}

impl InteractionController {
    pub fn new(config: InputConfig, metrics: &GridMetrics) -> Self {
        Self {
            constraint: config.default_constraint,
            config,
            bindings: KeyBindings::default(),
            mode: AppMode::default(),
            arbiter: GestureArbiter::new(),
            stroke: StrokeRasterizer::new(metrics),
            hovered: None,
            selected: None,
            drag: None,
            suppress_click: false,
            last_touch: None,
            pinch_distance: None,
            edge_pans: FxHashSet::default(),
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut KeyBindings {
        &mut self.bindings
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Switch mode. Leaving edit mode abandons any stroke in progress.
    pub fn set_mode(&mut self, mode: AppMode) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        if self.mode == AppMode::Edit && mode != AppMode::Edit {
            self.abort_stroke(&mut events);
        }
        self.mode = mode;
        events
    }

    pub fn constraint(&self) -> PaintConstraint {
        self.constraint
    }

    /// Applies from the next stroke on
    pub fn set_constraint(&mut self, constraint: PaintConstraint) {
        self.constraint = constraint;
    }

    pub fn hovered(&self) -> Option<TileCoord> {
        self.hovered
    }

    pub fn selected(&self) -> Option<TileCoord> {
        self.selected
    }

    /// Preview tiles of the active stroke
    pub fn preview(&self) -> &[TileCoord] {
        self.stroke.tiles()
    }

    pub fn is_stroke_active(&self) -> bool {
        self.stroke.is_active()
    }

    pub fn arbiter(&self) -> &GestureArbiter {
        &self.arbiter
    }

    /// Follow a grid resize; hover and selection may now be out of range
    pub fn resize(&mut self, metrics: &GridMetrics) {
        self.stroke.resize(metrics);
        self.hovered = self.hovered.filter(|tile| metrics.contains(*tile));
        self.selected = self.selected.filter(|tile| metrics.contains(*tile));
    }

    pub fn handle(
        &mut self,
        event: &InputEvent,
        ctx: &mut InteractionContext<'_>,
        now: Instant,
    ) -> Vec<InteractionEvent> {
        let mut events = Vec::new();
        match event {
            InputEvent::PointerDown { position, button } => {
                if *button == MouseButton::Left {
                    self.pointer_down(*position, ctx, &mut events);
                }
            }
            InputEvent::PointerMove { position } => {
                self.pointer_move(*position, ctx, &mut events);
                if self.config.scroll_at_edges {
                    self.scroll_at_edges(*position, ctx, now);
                }
            }
            InputEvent::PointerUp { position, button } => {
                if *button == MouseButton::Left {
                    self.pointer_up(Some(*position), ctx, &mut events);
                }
            }
            InputEvent::PointerLeave => {
                self.pointer_up(None, ctx, &mut events);
                self.set_hover(None, &mut events);
                self.stop_edge_pans(ctx);
            }
            InputEvent::Click { position, button } => {
                if *button == MouseButton::Left {
                    self.click(*position, ctx, &mut events);
                }
            }
            InputEvent::Wheel { delta_y, .. } => {
                if *delta_y < 0.0 {
                    ctx.camera.zoom_out();
                } else if *delta_y > 0.0 {
                    ctx.camera.zoom_in();
                }
            }
            InputEvent::Touch {
                phase,
                touches,
                changed,
            } => match phase {
                TouchPhase::Start => self.touch_start(touches, changed, ctx, &mut events),
                TouchPhase::Move => self.touch_move(touches, ctx, &mut events),
                TouchPhase::End => self.touch_end(touches, changed, &mut events),
                TouchPhase::Cancel => self.touch_cancel(touches, changed, &mut events),
            },
            InputEvent::KeyDown { key } => {
                if let Some(action) = self.bindings.on_key_down(*key) {
                    self.apply_key_action(action, ctx.camera, now);
                }
            }
            InputEvent::KeyUp { key } => {
                if let Some(action) = self.bindings.on_key_up(*key) {
                    self.apply_key_action(action, ctx.camera, now);
                }
            }
            InputEvent::Blur => {
                self.abort_stroke(&mut events);
                ctx.camera.stop_all_panning();
                self.edge_pans.clear();
                self.drag = None;
                self.arbiter.clear();
                self.last_touch = None;
                self.pinch_distance = None;
            }
        }
        events
    }

    /// Camera effect of a key binding
    pub fn apply_key_action(&mut self, action: KeyAction, camera: &mut Camera, now: Instant) {
        match action {
            KeyAction::StartPan(direction) => camera.start_panning(direction, now),
            KeyAction::StopPan(direction) => camera.stop_panning(direction),
            KeyAction::ZoomIn => {
                camera.zoom_in();
            }
            KeyAction::ZoomOut => {
                camera.zoom_out();
            }
            KeyAction::ResetZoom => {
                camera.reset_zoom_with_smoothing(self.config.zoom_reset_duration(), DEFAULT_ZOOM, now)
            }
            KeyAction::Recenter => camera.reset_pan_with_smoothing(self.config.recenter_duration(), now),
        }
    }

    /// Convenience for hosts that receive key names rather than [`Key`]s
    pub fn key_down_by_name(&mut self, name: &str, camera: &mut Camera, now: Instant) {
        if let Some(action) = Key::from_name(name).and_then(|key| self.bindings.on_key_down(key)) {
            self.apply_key_action(action, camera, now);
        }
    }

    fn pointer_down(
        &mut self,
        position: Point,
        ctx: &mut InteractionContext<'_>,
        events: &mut Vec<InteractionEvent>,
    ) {
        ctx.camera.begin_drag();
        self.suppress_click = false;

        if self.mode == AppMode::Edit {
            // One stroke at a time; a finger already painting keeps it
            if let Some(owner) = self.arbiter.session_of(GestureOwner::PaintStroke) {
                log::trace!("mouse press ignored, stroke owned by {owner:?}");
                return;
            }
            if let Some(tile) = ctx.pick(position) {
                if self.arbiter.claim(GestureSession::Mouse, GestureOwner::PaintStroke) {
                    let preview = self.stroke.begin(tile, self.constraint).to_vec();
                    events.push(InteractionEvent::StrokePreview(preview));
                }
                return;
            }
        }

        if self.config.mouse_panning && self.arbiter.claim(GestureSession::Mouse, GestureOwner::DragPan) {
            self.drag = Some(MouseDrag {
                last: position,
                distance: 0.0,
            });
        }
    }

    fn pointer_move(
        &mut self,
        position: Point,
        ctx: &mut InteractionContext<'_>,
        events: &mut Vec<InteractionEvent>,
    ) {
        match self.arbiter.owner(GestureSession::Mouse) {
            Some(GestureOwner::PaintStroke) => {
                if let Some(tile) = ctx.pick(position) {
                    self.extend_stroke(tile, events);
                }
            }
            Some(GestureOwner::DragPan) => {
                if let Some(drag) = self.drag.as_mut() {
                    let delta = position.subtract(&drag.last);
                    drag.last = position;
                    drag.distance += delta.x.hypot(delta.y);
                    if drag.distance > self.config.drag_threshold {
                        self.suppress_click = true;
                    }
                    ctx.camera.drag_by(delta.x, delta.y);
                }
            }
            _ => {
                let tile = ctx.pick(position);
                self.set_hover(tile, events);
            }
        }
    }

    /// Release the mouse gesture. `position` is `None` when the pointer left
    /// the canvas; a drag then ends without momentum.
    fn pointer_up(
        &mut self,
        position: Option<Point>,
        ctx: &mut InteractionContext<'_>,
        events: &mut Vec<InteractionEvent>,
    ) {
        match self.arbiter.release(GestureSession::Mouse) {
            Some(GestureOwner::PaintStroke) => self.finish_stroke(events),
            Some(GestureOwner::DragPan) => {
                self.drag = None;
                ctx.camera.end_drag(position.is_some() && self.config.momentum);
                // hover was frozen while the map moved under the pointer
                if let Some(position) = position {
                    let tile = ctx.pick(position);
                    self.set_hover(tile, events);
                }
            }
            Some(other) => log::trace!("mouse released while owned by {other:?}"),
            None => log::trace!("pointer release without a gesture"),
        }
    }

    fn click(
        &mut self,
        position: Point,
        ctx: &mut InteractionContext<'_>,
        events: &mut Vec<InteractionEvent>,
    ) {
        if std::mem::take(&mut self.suppress_click) || self.stroke.is_active() {
            return;
        }
        let tile = ctx.pick(position);
        if tile != self.selected {
            self.selected = tile;
            events.push(InteractionEvent::TileSelected(tile));
        }
    }

    fn touch_start(
        &mut self,
        touches: &[TouchPoint],
        changed: &[TouchPoint],
        ctx: &mut InteractionContext<'_>,
        events: &mut Vec<InteractionEvent>,
    ) {
        match touches {
            [finger] => {
                let finger = changed.first().copied().unwrap_or(*finger);
                let session = GestureSession::Touch(finger.id);
                ctx.camera.begin_drag();

                if self.mode == AppMode::Edit {
                    if self.arbiter.session_of(GestureOwner::PaintStroke).is_none()
                        && self.arbiter.claim(session, GestureOwner::PaintStroke)
                    {
                        if let Some(tile) = ctx.pick(finger.position) {
                            let preview = self.stroke.begin(tile, self.constraint).to_vec();
                            events.push(InteractionEvent::StrokePreview(preview));
                        }
                    }
                } else if self.arbiter.claim(session, GestureOwner::TouchPan) {
                    self.last_touch = Some(finger.position);
                }
            }
            [first, second, ..] => {
                // A paint stroke keeps its finger; extra fingers are ignored
                if self.arbiter.session_of(GestureOwner::PaintStroke).is_some() {
                    return;
                }
                let converted = self
                    .arbiter
                    .session_of(GestureOwner::TouchPan)
                    .map(|session| {
                        self.arbiter
                            .convert(session, GestureOwner::TouchPan, GestureOwner::Pinch)
                    })
                    .unwrap_or(false);
                if converted
                    || self.arbiter.session_of(GestureOwner::Pinch).is_some()
                    || self.arbiter.claim(GestureSession::Touch(first.id), GestureOwner::Pinch)
                {
                    self.last_touch = None;
                    self.pinch_distance = Some(first.position.distance_to(&second.position));
                }
            }
            [] => {}
        }
    }

    fn touch_move(
        &mut self,
        touches: &[TouchPoint],
        ctx: &mut InteractionContext<'_>,
        events: &mut Vec<InteractionEvent>,
    ) {
        match self.arbiter.session_of(GestureOwner::PaintStroke) {
            Some(GestureSession::Touch(id)) => {
                if let Some(finger) = touches.iter().find(|touch| touch.id == id) {
                    if let Some(tile) = ctx.pick(finger.position) {
                        self.extend_stroke(tile, events);
                    }
                }
                return;
            }
            // the mouse is painting; fingers must not move the map under it
            Some(GestureSession::Mouse) => return,
            None => {}
        }

        if self.arbiter.session_of(GestureOwner::Pinch).is_some() {
            if let [first, second, ..] = touches {
                let distance = first.position.distance_to(&second.position);
                if let Some(previous) = self.pinch_distance.filter(|d| *d > 0.0) {
                    ctx.camera.adjust_zoom(distance / previous);
                }
                self.pinch_distance = Some(distance);
            }
            return;
        }

        if let Some(GestureSession::Touch(id)) = self.arbiter.session_of(GestureOwner::TouchPan) {
            if let ([finger], Some(last)) = (touches, self.last_touch) {
                if finger.id == id {
                    let delta = finger.position.subtract(&last);
                    ctx.camera.add_pan(delta.x, delta.y);
                    self.last_touch = Some(finger.position);
                }
            }
        }
    }

    fn touch_end(&mut self, touches: &[TouchPoint], changed: &[TouchPoint], events: &mut Vec<InteractionEvent>) {
        for finger in changed {
            let session = GestureSession::Touch(finger.id);
            if self.arbiter.owner(session) == Some(GestureOwner::PaintStroke) {
                self.arbiter.release(session);
                self.finish_stroke(events);
            }
        }
        if touches.len() < 2 {
            if let Some(session) = self.arbiter.session_of(GestureOwner::Pinch) {
                self.arbiter.release(session);
                self.pinch_distance = None;
            }
        }
        if touches.is_empty() {
            self.arbiter.release_touches();
            self.last_touch = None;
            self.pinch_distance = None;
        }
    }

    fn touch_cancel(&mut self, touches: &[TouchPoint], changed: &[TouchPoint], events: &mut Vec<InteractionEvent>) {
        for finger in changed {
            let session = GestureSession::Touch(finger.id);
            if self.arbiter.owner(session) == Some(GestureOwner::PaintStroke) {
                self.arbiter.release(session);
                self.abort_stroke(events);
            }
        }
        if touches.is_empty() {
            self.arbiter.release_touches();
            self.last_touch = None;
            self.pinch_distance = None;
        }
    }

    fn extend_stroke(&mut self, tile: TileCoord, events: &mut Vec<InteractionEvent>) {
        let before = self.stroke.tiles().to_vec();
        if let Some(preview) = self.stroke.update(tile) {
            if preview != before.as_slice() {
                events.push(InteractionEvent::StrokePreview(preview.to_vec()));
            }
        }
    }

    fn finish_stroke(&mut self, events: &mut Vec<InteractionEvent>) {
        if let Some(stroke) = self.stroke.end() {
            events.push(InteractionEvent::PreviewCleared);
            events.push(InteractionEvent::StrokeApplied(stroke));
        }
    }

    fn abort_stroke(&mut self, events: &mut Vec<InteractionEvent>) {
        if self.stroke.cancel() {
            events.push(InteractionEvent::PreviewCleared);
        }
        if self.arbiter.owner(GestureSession::Mouse) == Some(GestureOwner::PaintStroke) {
            self.arbiter.release(GestureSession::Mouse);
        }
        if let Some(session) = self.arbiter.session_of(GestureOwner::PaintStroke) {
            self.arbiter.release(session);
        }
    }

    fn set_hover(&mut self, tile: Option<TileCoord>, events: &mut Vec<InteractionEvent>) {
        if tile != self.hovered {
            self.hovered = tile;
            events.push(InteractionEvent::HoverChanged(tile));
        }
    }

    fn scroll_at_edges(&mut self, position: Point, ctx: &mut InteractionContext<'_>, now: Instant) {
        let threshold = self.config.edge_threshold;
        for direction in Direction::ALL {
            let near = match direction {
                Direction::Left => position.x < threshold,
                Direction::Right => position.x > ctx.canvas.width - threshold,
                Direction::Up => position.y < threshold,
                Direction::Down => position.y > ctx.canvas.height - threshold,
            };
            if near && self.edge_pans.insert(direction) {
                ctx.camera.start_panning(direction, now);
            } else if !near && self.edge_pans.remove(&direction) {
                ctx.camera.stop_panning(direction);
            }
        }
    }

    fn stop_edge_pans(&mut self, ctx: &mut InteractionContext<'_>) {
        for direction in self.edge_pans.drain() {
            ctx.camera.stop_panning(direction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::measure_bounds;
    use crate::core::viewport::tile_center_world;

    struct Rig {
        camera: Camera,
        picker: TilePicker,
        canvas: Size,
        controller: InteractionController,
    }

    impl Rig {
        fn new(config: InputConfig) -> Self {
            let metrics = GridMetrics::new(64.0, 32.0, 10, 10).unwrap();
            let bounds = measure_bounds(&metrics);
            Self {
                camera: Camera::default(),
                picker: TilePicker::new(metrics, bounds),
                canvas: Size::new(800.0, 600.0),
                controller: InteractionController::new(config, &metrics),
            }
        }

        fn send(&mut self, event: InputEvent) -> Vec<InteractionEvent> {
            let mut ctx = InteractionContext {
                camera: &mut self.camera,
                picker: &self.picker,
                canvas: self.canvas,
            };
            self.controller.handle(&event, &mut ctx, Instant::now())
        }

        fn screen_of(&self, row: i32, col: i32) -> Point {
            let transform = self
                .camera
                .view_transform(self.canvas, self.picker.bounds().background_size());
            let world = tile_center_world(TileCoord::new(row, col), self.picker.metrics(), self.picker.bounds());
            transform.world_to_screen(world)
        }
    }

    fn down(position: Point) -> InputEvent {
        InputEvent::PointerDown {
            position,
            button: MouseButton::Left,
        }
    }

    fn up(position: Point) -> InputEvent {
        InputEvent::PointerUp {
            position,
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_arbiter_is_exclusive() {
        let mut arbiter = GestureArbiter::new();
        assert!(arbiter.claim(GestureSession::Mouse, GestureOwner::PaintStroke));
        assert!(!arbiter.claim(GestureSession::Mouse, GestureOwner::DragPan));
        assert!(!arbiter.convert(GestureSession::Mouse, GestureOwner::TouchPan, GestureOwner::Pinch));
        assert_eq!(arbiter.release(GestureSession::Mouse), Some(GestureOwner::PaintStroke));
        assert!(arbiter.claim(GestureSession::Mouse, GestureOwner::DragPan));
    }

    #[test]
    fn test_hover_reports_changes_only() {
        let mut rig = Rig::new(InputConfig::default());
        let at = rig.screen_of(2, 3);
        let events = rig.send(InputEvent::PointerMove { position: at });
        assert_eq!(events, vec![InteractionEvent::HoverChanged(Some(TileCoord::new(2, 3)))]);
        assert!(rig.send(InputEvent::PointerMove { position: at }).is_empty());
        assert_eq!(
            rig.send(InputEvent::PointerLeave),
            vec![InteractionEvent::HoverChanged(None)]
        );
    }

    #[test]
    fn test_edit_mode_paints_stroke() {
        let mut rig = Rig::new(InputConfig::default());
        rig.controller.set_mode(AppMode::Edit);

        let start = rig.screen_of(2, 2);
        let end = rig.screen_of(2, 5);
        let events = rig.send(down(start));
        assert_eq!(events, vec![InteractionEvent::StrokePreview(vec![TileCoord::new(2, 2)])]);

        rig.send(InputEvent::PointerMove { position: end });
        assert_eq!(rig.controller.preview().len(), 4);
        // painting never pans
        assert_eq!(rig.camera.pan(), Point::default());

        let events = rig.send(up(end));
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], InteractionEvent::PreviewCleared);
        match &events[1] {
            InteractionEvent::StrokeApplied(stroke) => {
                assert_eq!(stroke.tiles.first(), Some(&TileCoord::new(2, 2)));
                assert_eq!(stroke.tiles.last(), Some(&TileCoord::new(2, 5)));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(rig.controller.arbiter().is_idle());
    }

    #[test]
    fn test_leave_finalizes_stroke_and_stale_up_is_noop() {
        let mut rig = Rig::new(InputConfig::default());
        rig.controller.set_mode(AppMode::Edit);
        rig.send(down(rig.screen_of(1, 1)));
        let events = rig.send(InputEvent::PointerLeave);
        assert!(events.iter().any(|e| matches!(e, InteractionEvent::StrokeApplied(_))));

        assert!(rig.send(up(Point::new(0.0, 0.0))).is_empty());
    }

    #[test]
    fn test_drag_pans_and_suppresses_click() {
        let mut rig = Rig::new(InputConfig::default());
        rig.send(down(Point::new(100.0, 100.0)));
        rig.send(InputEvent::PointerMove { position: Point::new(110.0, 104.0) });
        assert_eq!(rig.camera.pan(), Point::new(10.0, 4.0));
        rig.send(up(Point::new(110.0, 104.0)));

        let click = InputEvent::Click {
            position: rig.screen_of(0, 0),
            button: MouseButton::Left,
        };
        assert!(rig.send(click.clone()).is_empty());
        // the next click goes through
        assert_eq!(
            rig.send(click),
            vec![InteractionEvent::TileSelected(Some(TileCoord::new(0, 0)))]
        );
    }

    #[test]
    fn test_short_drag_keeps_click() {
        let mut rig = Rig::new(InputConfig::default());
        let at = rig.screen_of(4, 4);
        rig.send(down(at));
        rig.send(InputEvent::PointerMove { position: at.add(&Point::new(2.0, 1.0)) });
        rig.send(up(at));
        let events = rig.send(InputEvent::Click {
            position: rig.screen_of(4, 4),
            button: MouseButton::Left,
        });
        assert_eq!(events, vec![InteractionEvent::TileSelected(Some(TileCoord::new(4, 4)))]);
    }

    #[test]
    fn test_wheel_direction() {
        let mut rig = Rig::new(InputConfig::default());
        rig.send(InputEvent::Wheel { delta_y: 120.0, position: Point::default() });
        assert!(rig.camera.zoom() > 1.0);
        rig.send(InputEvent::Wheel { delta_y: -120.0, position: Point::default() });
        assert!((rig.camera.zoom() - 1.0).abs() < 1e-12);
        rig.send(InputEvent::Wheel { delta_y: 0.0, position: Point::default() });
        assert!((rig.camera.zoom() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_touch_pan_then_pinch() {
        let mut rig = Rig::new(InputConfig::default());
        let a = TouchPoint::new(1, 100.0, 100.0);
        rig.send(InputEvent::Touch { phase: TouchPhase::Start, touches: vec![a], changed: vec![a] });
        let a_moved = TouchPoint::new(1, 120.0, 90.0);
        rig.send(InputEvent::Touch { phase: TouchPhase::Move, touches: vec![a_moved], changed: vec![a_moved] });
        assert_eq!(rig.camera.pan(), Point::new(20.0, -10.0));

        let b = TouchPoint::new(2, 220.0, 90.0);
        rig.send(InputEvent::Touch { phase: TouchPhase::Start, touches: vec![a_moved, b], changed: vec![b] });
        assert_eq!(rig.controller.arbiter().owner(GestureSession::Touch(1)), Some(GestureOwner::Pinch));

        let b_far = TouchPoint::new(2, 320.0, 90.0);
        rig.send(InputEvent::Touch { phase: TouchPhase::Move, touches: vec![a_moved, b_far], changed: vec![b_far] });
        assert!((rig.camera.zoom() - 2.0).abs() < 1e-12);

        rig.send(InputEvent::Touch { phase: TouchPhase::End, touches: vec![], changed: vec![a_moved, b_far] });
        assert!(rig.controller.arbiter().is_idle());
    }

    #[test]
    fn test_touch_paint_is_not_stolen_by_second_finger() {
        let mut rig = Rig::new(InputConfig::default());
        rig.controller.set_mode(AppMode::Edit);
        let p = rig.screen_of(3, 3);
        let a = TouchPoint::new(7, p.x, p.y);
        rig.send(InputEvent::Touch { phase: TouchPhase::Start, touches: vec![a], changed: vec![a] });
        assert!(rig.controller.is_stroke_active());

        let b = TouchPoint::new(8, 10.0, 10.0);
        rig.send(InputEvent::Touch { phase: TouchPhase::Start, touches: vec![a, b], changed: vec![b] });
        assert_eq!(rig.controller.arbiter().session_of(GestureOwner::Pinch), None);
        assert_eq!(rig.camera.zoom(), 1.0);

        let events = rig.send(InputEvent::Touch { phase: TouchPhase::Cancel, touches: vec![], changed: vec![a, b] });
        assert_eq!(events, vec![InteractionEvent::PreviewCleared]);
        assert!(!rig.controller.is_stroke_active());
    }

    #[test]
    fn test_mouse_cannot_take_touch_stroke() {
        let mut rig = Rig::new(InputConfig::default());
        rig.controller.set_mode(AppMode::Edit);
        let p = rig.screen_of(3, 3);
        let finger = TouchPoint::new(7, p.x, p.y);
        rig.send(InputEvent::Touch { phase: TouchPhase::Start, touches: vec![finger], changed: vec![finger] });

        let other = rig.screen_of(1, 1);
        assert!(rig.send(down(other)).is_empty());
        assert_eq!(rig.controller.arbiter().owner(GestureSession::Mouse), None);
        // no drag-pan either
        rig.send(InputEvent::PointerMove { position: other.add(&Point::new(40.0, 0.0)) });
        assert_eq!(rig.camera.pan(), Point::default());
        assert_eq!(rig.controller.preview(), &[TileCoord::new(3, 3)]);

        let events = rig.send(InputEvent::Touch { phase: TouchPhase::End, touches: vec![], changed: vec![finger] });
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], InteractionEvent::PreviewCleared);
        match &events[1] {
            InteractionEvent::StrokeApplied(stroke) => assert_eq!(stroke.start, TileCoord::new(3, 3)),
            other => panic!("unexpected {other:?}"),
        }

        assert!(rig.send(up(other)).is_empty());
        assert!(rig.controller.arbiter().is_idle());
    }

    #[test]
    fn test_fingers_wait_for_mouse_stroke() {
        let mut rig = Rig::new(InputConfig::default());
        rig.controller.set_mode(AppMode::Edit);
        rig.send(down(rig.screen_of(2, 2)));

        let p = rig.screen_of(5, 5);
        let finger = TouchPoint::new(3, p.x, p.y);
        assert!(rig
            .send(InputEvent::Touch { phase: TouchPhase::Start, touches: vec![finger], changed: vec![finger] })
            .is_empty());
        let moved = TouchPoint::new(3, p.x + 50.0, p.y);
        rig.send(InputEvent::Touch { phase: TouchPhase::Move, touches: vec![moved], changed: vec![moved] });
        assert_eq!(rig.camera.pan(), Point::default());
        assert_eq!(rig.controller.preview(), &[TileCoord::new(2, 2)]);
    }

    #[test]
    fn test_drag_release_refreshes_hover() {
        let mut rig = Rig::new(InputConfig {
            momentum: false,
            ..InputConfig::default()
        });
        let at = rig.screen_of(2, 3);
        assert!(rig.send(down(at)).is_empty());
        let to = at.add(&Point::new(64.0, 32.0));
        assert!(rig.send(InputEvent::PointerMove { position: to }).is_empty());
        assert_eq!(rig.controller.hovered(), None);

        // the map moved with the pointer, so the same tile is under it
        let events = rig.send(up(to));
        assert_eq!(events, vec![InteractionEvent::HoverChanged(Some(TileCoord::new(2, 3)))]);
        assert_eq!(rig.controller.hovered(), Some(TileCoord::new(2, 3)));
    }

    #[test]
    fn test_leaving_edit_mode_cancels_stroke() {
        let mut rig = Rig::new(InputConfig::default());
        rig.controller.set_mode(AppMode::Edit);
        rig.send(down(rig.screen_of(0, 0)));
        let events = rig.controller.set_mode(AppMode::Navigation);
        assert_eq!(events, vec![InteractionEvent::PreviewCleared]);
        assert!(rig.send(up(Point::default())).is_empty());
    }

    #[test]
    fn test_keys_drive_camera() {
        let mut rig = Rig::new(InputConfig::default());
        rig.send(InputEvent::KeyDown { key: Key::Equal });
        assert!(rig.camera.zoom() > 1.0);
        rig.send(InputEvent::KeyDown { key: Key::ArrowLeft });
        assert!(rig.camera.is_panning(Direction::Left));
        rig.send(InputEvent::KeyUp { key: Key::ArrowLeft });
        assert!(!rig.camera.is_panning(Direction::Left));
    }

    #[test]
    fn test_edge_scrolling() {
        let mut rig = Rig::new(InputConfig {
            scroll_at_edges: true,
            ..InputConfig::default()
        });
        rig.send(InputEvent::PointerMove { position: Point::new(3.0, 300.0) });
        assert!(rig.camera.is_panning(Direction::Left));
        rig.send(InputEvent::PointerMove { position: Point::new(400.0, 595.0) });
        assert!(!rig.camera.is_panning(Direction::Left));
        assert!(rig.camera.is_panning(Direction::Down));
        rig.send(InputEvent::PointerLeave);
        assert!(!rig.camera.is_panning(Direction::Down));
    }
}
