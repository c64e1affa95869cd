//! The camera: single owner of zoom and pan.
//!
//! Every mutation goes through [`Camera`] and publishes exactly one
//! [`CameraEvent`] per logical change. Mutations that change nothing
//! (clamped to the same zoom, zero pan delta, degenerate input) publish
//! nothing. Time-based behaviour (eased resets, momentum, directional
//! panning) advances only inside [`Camera::update`].

pub mod momentum;
pub mod ticker;

pub use momentum::Momentum;
pub use ticker::{Direction, PanTicker};

use crate::animation::tweening::{TaskStep, TimedTask};
use crate::core::config::CameraConfig;
use crate::core::constants::{DEFAULT_ZOOM, VERTICAL_PAN_RATIO};
use crate::core::events::EventBus;
use crate::core::geo::{Point, Size};
use crate::core::viewport::ViewTransform;
use crossbeam_channel::Receiver;
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot of the camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl CameraState {
    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }
}

/// Why the camera changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraChange {
    Zoom,
    Pan,
    Reset,
    ZoomAnimation,
    PanAnimation,
    Momentum,
    DirectionalPan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraEvent {
    pub state: CameraState,
    pub cause: CameraChange,
}

#[derive(Debug)]
pub struct Camera {
    state: CameraState,
    config: CameraConfig,
    events: EventBus<CameraEvent>,
    zoom_task: Option<TimedTask<f64>>,
    pan_task: Option<TimedTask<Point>>,
    momentum: Momentum,
    ticker: PanTicker,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        let zoom = config.clamp_zoom(DEFAULT_ZOOM);
        Self {
            state: CameraState {
                zoom,
                pan_x: 0.0,
                pan_y: 0.0,
                min_zoom: config.min_zoom,
                max_zoom: config.max_zoom,
            },
            momentum: Momentum::new(config.momentum_friction, config.momentum_min_velocity),
            ticker: PanTicker::new(config.pan_tick(), config.max_catch_up_ticks),
            events: EventBus::new(),
            zoom_task: None,
            pan_task: None,
            config,
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn pan(&self) -> Point {
        self.state.pan()
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Receive one event per camera change from now on
    pub fn subscribe(&mut self) -> Receiver<CameraEvent> {
        self.events.subscribe()
    }

    /// Transform for a canvas of `canvas` pixels showing a background of
    /// `background` world pixels
    pub fn view_transform(&self, canvas: Size, background: Size) -> ViewTransform {
        ViewTransform::compute(
            canvas,
            background,
            self.state.zoom,
            self.state.pan_x,
            self.state.pan_y,
        )
    }

    /// Set the zoom level, keeping the view center fixed.
    ///
    /// Non-finite or non-positive levels are ignored. Cancels an eased zoom
    /// in flight. Returns whether the zoom changed.
    pub fn set_zoom(&mut self, level: f64) -> bool {
        self.cancel_zoom_task();
        self.apply_zoom(level, CameraChange::Zoom)
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.state.zoom * self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.state.zoom / self.config.zoom_step)
    }

    /// Multiply the zoom by `factor` (pinch gestures)
    pub fn adjust_zoom(&mut self, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            log::debug!("ignoring degenerate zoom factor {factor}");
            return false;
        }
        self.set_zoom(self.state.zoom * factor)
    }

    /// Accumulate a raw pixel delta
    pub fn add_pan(&mut self, dx: f64, dy: f64) -> bool {
        self.apply_pan_delta(dx, dy, CameraChange::Pan)
    }

    pub fn set_pan(&mut self, x: f64, y: f64) -> bool {
        self.cancel_pan_task();
        self.apply_pan(Point::new(x, y), CameraChange::Pan)
    }

    /// Snap to the default zoom and pan, stopping all motion
    pub fn reset(&mut self) -> bool {
        self.cancel_zoom_task();
        self.cancel_pan_task();
        self.momentum.stop();
        self.ticker.stop_all();

        let zoom = self.config.clamp_zoom(DEFAULT_ZOOM);
        if zoom == self.state.zoom && self.state.pan_x == 0.0 && self.state.pan_y == 0.0 {
            return false;
        }
        self.state.zoom = zoom;
        self.state.pan_x = 0.0;
        self.state.pan_y = 0.0;
        self.publish(CameraChange::Reset);
        true
    }

    /// Snap back to the default zoom, rescaling pan like [`Camera::set_zoom`]
    pub fn reset_zoom(&mut self) -> bool {
        self.cancel_zoom_task();
        self.apply_zoom(DEFAULT_ZOOM, CameraChange::Reset)
    }

    pub fn reset_pan(&mut self) -> bool {
        self.cancel_pan_task();
        self.apply_pan(Point::default(), CameraChange::Reset)
    }

    /// Ease the zoom to `target` over `duration`, starting at `now`.
    /// Supersedes any eased zoom already running.
    pub fn reset_zoom_with_smoothing(&mut self, duration: Duration, target: f64, now: Instant) {
        self.cancel_zoom_task();
        if !(target.is_finite() && target > 0.0) {
            log::debug!("ignoring degenerate zoom target {target}");
            return;
        }
        let target = self.config.clamp_zoom(target);
        let task = TimedTask::new(self.state.zoom, target, now, duration)
            .with_easing(self.config.easing);
        self.zoom_task = Some(task);
    }

    /// Ease the pan back to the origin over `duration`, starting at `now`.
    /// Supersedes any eased pan already running.
    pub fn reset_pan_with_smoothing(&mut self, duration: Duration, now: Instant) {
        self.cancel_pan_task();
        self.momentum.stop();
        let task = TimedTask::new(self.pan(), Point::default(), now, duration)
            .with_easing(self.config.easing);
        self.pan_task = Some(task);
    }

    /// Hold a panning direction. The ticker starts with the first held
    /// direction.
    pub fn start_panning(&mut self, direction: Direction, now: Instant) {
        self.ticker.start(direction, now);
    }

    /// Release a panning direction. The ticker stops once none remain.
    pub fn stop_panning(&mut self, direction: Direction) {
        self.ticker.stop(direction);
    }

    pub fn stop_all_panning(&mut self) {
        self.ticker.stop_all();
    }

    pub fn is_panning(&self, direction: Direction) -> bool {
        self.ticker.is_active(direction)
    }

    /// Pointer went down: any glide in progress ends
    pub fn begin_drag(&mut self) {
        self.momentum.stop();
    }

    /// Pan by a drag delta and remember it as the release velocity
    pub fn drag_by(&mut self, dx: f64, dy: f64) -> bool {
        self.momentum.track(dx, dy);
        self.add_pan(dx, dy)
    }

    /// Pointer released. With `momentum` the map keeps gliding.
    pub fn end_drag(&mut self, momentum: bool) -> bool {
        if momentum {
            self.momentum.release()
        } else {
            self.momentum.stop();
            false
        }
    }

    pub fn stop_momentum(&mut self) {
        self.momentum.stop();
    }

    /// Whether `update` still has work to do
    pub fn is_animating(&self) -> bool {
        self.zoom_task.is_some()
            || self.pan_task.is_some()
            || self.momentum.is_gliding()
            || self.ticker.is_running()
    }

    /// Advance every time-based behaviour to `now`: eased zoom, eased pan,
    /// momentum, then directional panning. Returns the number of events
    /// published.
    pub fn update(&mut self, now: Instant) -> usize {
        let mut changes = 0;

        if let Some(task) = self.zoom_task.take() {
            match task.sample(now) {
                TaskStep::Running(zoom) => {
                    changes += self.apply_zoom(zoom, CameraChange::ZoomAnimation) as usize;
                    self.zoom_task = Some(task);
                }
                TaskStep::Finished(zoom) => {
                    changes += self.apply_zoom(zoom, CameraChange::ZoomAnimation) as usize;
                }
                TaskStep::Cancelled => {}
            }
        }

        if let Some(task) = self.pan_task.take() {
            match task.sample(now) {
                TaskStep::Running(pan) => {
                    changes += self.apply_pan(pan, CameraChange::PanAnimation) as usize;
                    self.pan_task = Some(task);
                }
                TaskStep::Finished(pan) => {
                    changes += self.apply_pan(pan, CameraChange::PanAnimation) as usize;
                }
                TaskStep::Cancelled => {}
            }
        }

        if let Some(delta) = self.momentum.step() {
            changes += self.apply_pan_delta(delta.x, delta.y, CameraChange::Momentum) as usize;
        }

        let ticks = self.ticker.due_ticks(now);
        if ticks > 0 {
            let delta = self.ticker.delta(self.config.pan_speed, VERTICAL_PAN_RATIO);
            for _ in 0..ticks {
                log::trace!("pan tick ({}, {})", delta.x, delta.y);
                changes += self.apply_pan_delta(delta.x, delta.y, CameraChange::DirectionalPan) as usize;
            }
        }

        changes
    }

    fn apply_zoom(&mut self, level: f64, cause: CameraChange) -> bool {
        if !(level.is_finite() && level > 0.0) {
            log::debug!("ignoring degenerate zoom {level}");
            return false;
        }
        let zoom = self.config.clamp_zoom(level);
        let previous = self.state.zoom;
        if zoom == previous {
            return false;
        }

        let ratio = zoom / previous;
        self.state.zoom = zoom;
        self.state.pan_x *= ratio;
        self.state.pan_y *= ratio;
        self.publish(cause);
        true
    }

    fn apply_pan(&mut self, pan: Point, cause: CameraChange) -> bool {
        if !pan.is_finite() || pan == self.pan() {
            return false;
        }
        self.state.pan_x = pan.x;
        self.state.pan_y = pan.y;
        self.publish(cause);
        true
    }

    fn apply_pan_delta(&mut self, dx: f64, dy: f64, cause: CameraChange) -> bool {
        if !(dx.is_finite() && dy.is_finite()) || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        self.state.pan_x += dx;
        self.state.pan_y += dy;
        self.publish(cause);
        true
    }

    fn cancel_zoom_task(&mut self) {
        if let Some(task) = self.zoom_task.take() {
            task.cancel();
        }
    }

    fn cancel_pan_task(&mut self) {
        if let Some(task) = self.pan_task.take() {
            task.cancel();
        }
    }

    fn publish(&mut self, cause: CameraChange) {
        self.events.publish(CameraEvent {
            state: self.state,
            cause,
        });
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::interpolation::EasingFunction;

    fn drain(rx: &Receiver<CameraEvent>) -> Vec<CameraEvent> {
        rx.try_iter().collect()
    }

    #[test]
    fn test_set_zoom_then_reset_returns_to_origin() {
        let mut camera = Camera::default();
        camera.set_zoom(2.7);
        camera.reset_zoom();
        assert_eq!(camera.zoom(), 1.0);
        assert_eq!(camera.pan(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_set_zoom_rescales_pan() {
        let mut camera = Camera::default();
        camera.add_pan(10.0, -4.0);
        camera.set_zoom(2.0);
        assert_eq!(camera.pan(), Point::new(20.0, -8.0));
    }

    #[test]
    fn test_degenerate_zoom_is_ignored() {
        let mut camera = Camera::default();
        let rx = camera.subscribe();
        camera.set_zoom(1.5);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(!camera.set_zoom(bad));
        }
        assert!(!camera.adjust_zoom(0.0));
        assert_eq!(camera.zoom(), 1.5);
        assert_eq!(drain(&rx).len(), 1);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new(CameraConfig {
            min_zoom: Some(0.5),
            max_zoom: Some(2.0),
            ..CameraConfig::default()
        });
        let rx = camera.subscribe();
        camera.set_zoom(10.0);
        assert_eq!(camera.zoom(), 2.0);
        // already at the bound: no change, no event
        assert!(!camera.zoom_in());
        camera.set_zoom(0.01);
        assert_eq!(camera.zoom(), 0.5);
        assert_eq!(drain(&rx).len(), 2);
    }

    #[test]
    fn test_zoom_steps() {
        let mut camera = Camera::default();
        camera.zoom_in();
        assert!((camera.zoom() - 1.1).abs() < 1e-12);
        camera.zoom_out();
        camera.zoom_out();
        assert!((camera.zoom() - 1.0 / 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_one_event_per_change() {
        let mut camera = Camera::default();
        let rx = camera.subscribe();
        camera.add_pan(3.0, 4.0);
        camera.add_pan(0.0, 0.0);
        camera.set_zoom(2.0);
        camera.reset();

        let causes: Vec<CameraChange> = drain(&rx).into_iter().map(|e| e.cause).collect();
        assert_eq!(causes, vec![CameraChange::Pan, CameraChange::Zoom, CameraChange::Reset]);
        assert!(!camera.reset());
    }

    #[test]
    fn test_directional_pan_left_up() {
        let start = Instant::now();
        let mut camera = Camera::default();
        let rx = camera.subscribe();
        camera.start_panning(Direction::Left, start);
        camera.start_panning(Direction::Up, start);

        assert_eq!(camera.update(start + Duration::from_millis(16)), 1);
        assert_eq!(camera.pan(), Point::new(10.0, 5.0));
        assert_eq!(camera.update(start + Duration::from_millis(48)), 2);
        assert_eq!(camera.pan(), Point::new(30.0, 15.0));

        let events = drain(&rx);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.cause == CameraChange::DirectionalPan));

        camera.stop_panning(Direction::Left);
        camera.stop_panning(Direction::Up);
        assert!(!camera.is_animating());
        assert_eq!(camera.update(start + Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_opposing_directions_emit_nothing() {
        let start = Instant::now();
        let mut camera = Camera::default();
        camera.start_panning(Direction::Left, start);
        camera.start_panning(Direction::Right, start);
        assert_eq!(camera.update(start + Duration::from_millis(32)), 0);
        assert_eq!(camera.pan(), Point::default());
    }

    #[test]
    fn test_smoothed_zoom_reset_lands_exactly() {
        let start = Instant::now();
        let mut camera = Camera::default();
        camera.set_zoom(3.0);
        camera.reset_zoom_with_smoothing(Duration::from_millis(300), 1.0, start);

        camera.update(start + Duration::from_millis(100));
        let midway = camera.zoom();
        assert!(midway < 3.0 && midway > 1.0);

        camera.update(start + Duration::from_millis(300));
        assert_eq!(camera.zoom(), 1.0);
        assert!(!camera.is_animating());
    }

    #[test]
    fn test_smoothing_follows_configured_easing() {
        let start = Instant::now();
        let mut camera = Camera::new(CameraConfig {
            easing: EasingFunction::Linear,
            ..CameraConfig::default()
        });
        camera.set_zoom(3.0);
        camera.add_pan(80.0, -40.0);
        camera.reset_zoom_with_smoothing(Duration::from_millis(200), 1.0, start);
        camera.reset_pan_with_smoothing(Duration::from_millis(200), start);

        camera.update(start + Duration::from_millis(100));
        assert!((camera.zoom() - 2.0).abs() < 1e-12);
        assert_eq!(camera.pan(), Point::new(40.0, -20.0));

        camera.update(start + Duration::from_millis(200));
        assert_eq!(camera.zoom(), 1.0);
        assert_eq!(camera.pan(), Point::default());
    }

    #[test]
    fn test_new_smoothing_request_supersedes_old() {
        let start = Instant::now();
        let mut camera = Camera::default();
        camera.add_pan(100.0, 50.0);
        camera.reset_pan_with_smoothing(Duration::from_millis(1000), start);
        camera.update(start + Duration::from_millis(500));

        // a fresh request restarts from the current position
        let restart = start + Duration::from_millis(500);
        camera.reset_pan_with_smoothing(Duration::from_millis(100), restart);
        camera.update(restart + Duration::from_millis(100));
        assert_eq!(camera.pan(), Point::default());
        assert!(!camera.is_animating());
    }

    #[test]
    fn test_direct_zoom_cancels_eased_zoom() {
        let start = Instant::now();
        let mut camera = Camera::default();
        camera.reset_zoom_with_smoothing(Duration::from_millis(300), 2.0, start);
        camera.set_zoom(0.5);
        camera.update(start + Duration::from_millis(300));
        assert_eq!(camera.zoom(), 0.5);
    }

    #[test]
    fn test_momentum_glides_after_release() {
        let start = Instant::now();
        let mut camera = Camera::default();
        camera.begin_drag();
        camera.drag_by(5.0, 0.0);
        camera.drag_by(20.0, 0.0);
        assert!(camera.end_drag(true));

        camera.update(start);
        assert_eq!(camera.pan(), Point::new(25.0 + 19.0, 0.0));

        let mut frames = 0;
        while camera.is_animating() && frames < 1000 {
            camera.update(start);
            frames += 1;
        }
        assert!(!camera.is_animating());

        // a new press stops the glide immediately
        camera.drag_by(30.0, 0.0);
        camera.end_drag(true);
        camera.begin_drag();
        let before = camera.pan();
        camera.update(start);
        assert_eq!(camera.pan(), before);
    }
}
