//! Time-based sprite frame selection.
//!
//! A [`SpriteSheet`] describes where frames live in an image and which
//! named animations sequence them. The [`AnimationClock`] keeps one
//! [`AnimationState`] per entity, created on the entity's first draw, and
//! turns a timestamp into the source rectangle to blit.

use crate::core::geo::Rect;
use crate::{MapError, Result};
use fxhash::FxHashMap;
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happens once the last frame of a sequence has been shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopMode {
    /// Wrap around to the first frame
    #[default]
    Loop,
    /// Freeze on the last frame
    Hold,
    /// Run forwards then backwards
    PingPong,
}

/// One named animation: an ordered list of sheet frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub frames: Vec<usize>,
    pub frame_duration_ms: u64,
    #[serde(default)]
    pub loop_mode: LoopMode,
}

impl AnimationSpec {
    pub fn new(frames: Vec<usize>, frame_duration_ms: u64, loop_mode: LoopMode) -> Self {
        Self {
            frames,
            frame_duration_ms,
            loop_mode,
        }
    }

    /// Position within `frames` after `elapsed`
    pub fn position_at(&self, elapsed: Duration) -> usize {
        let count = self.frames.len();
        if count <= 1 || self.frame_duration_ms == 0 {
            return 0;
        }
        let step = (elapsed.as_millis() / self.frame_duration_ms as u128) as usize;

        match self.loop_mode {
            LoopMode::Loop => step % count,
            LoopMode::Hold => step.min(count - 1),
            LoopMode::PingPong => {
                let period = 2 * (count - 1);
                let phase = step % period;
                if phase < count {
                    phase
                } else {
                    period - phase
                }
            }
        }
    }

    /// Sheet frame index shown after `elapsed`
    pub fn frame_at(&self, elapsed: Duration) -> usize {
        self.frames
            .get(self.position_at(elapsed))
            .copied()
            .unwrap_or(0)
    }
}

/// Order in which grid cells are numbered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridOrder {
    #[default]
    RowMajor,
    ColumnMajor,
}

/// Where frames live inside the sheet image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameLayout {
    /// Explicit source rectangle per frame
    Rects(Vec<Rect>),
    /// Uniform cells of `frame_width` x `frame_height`
    Grid {
        frame_width: f64,
        frame_height: f64,
        columns: u32,
        rows: u32,
        #[serde(default)]
        order: GridOrder,
    },
}

impl FrameLayout {
    pub fn frame_count(&self) -> usize {
        match self {
            FrameLayout::Rects(rects) => rects.len(),
            FrameLayout::Grid { columns, rows, .. } => *columns as usize * *rows as usize,
        }
    }

    /// Source rect for `index`; out-of-range indices resolve to frame 0
    pub fn rect(&self, index: usize) -> Option<Rect> {
        let index = if index < self.frame_count() { index } else { 0 };
        match self {
            FrameLayout::Rects(rects) => rects.get(index).copied(),
            FrameLayout::Grid {
                frame_width,
                frame_height,
                columns,
                rows,
                order,
            } => {
                if *columns == 0 || *rows == 0 {
                    return None;
                }
                let (col, row) = match order {
                    GridOrder::RowMajor => (index % *columns as usize, index / *columns as usize),
                    GridOrder::ColumnMajor => (index / *rows as usize, index % *rows as usize),
                };
                Some(Rect::new(
                    col as f64 * frame_width,
                    row as f64 * frame_height,
                    *frame_width,
                    *frame_height,
                ))
            }
        }
    }
}

/// Sprite image metadata for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Drawn size of one frame in world pixels
    pub width: f64,
    pub height: f64,
    pub layout: FrameLayout,
    #[serde(default)]
    pub animations: FxHashMap<String, AnimationSpec>,
    #[serde(default)]
    pub default_animation: Option<String>,
}

impl SpriteSheet {
    /// Single-frame sheet covering the whole image
    pub fn static_image(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            layout: FrameLayout::Rects(vec![Rect::new(0.0, 0.0, width, height)]),
            animations: FxHashMap::default(),
            default_animation: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let sheet: SpriteSheet = serde_json::from_str(json)?;
        sheet.validate()?;
        Ok(sheet)
    }

    pub fn with_animation(mut self, name: impl Into<String>, spec: AnimationSpec) -> Self {
        let name = name.into();
        if self.default_animation.is_none() {
            self.default_animation = Some(name.clone());
        }
        self.animations.insert(name, spec);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(MapError::InvalidSpriteSheet(format!(
                "sprite size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let FrameLayout::Grid { columns, rows, .. } = &self.layout {
            if *columns == 0 || *rows == 0 {
                return Err(MapError::InvalidSpriteSheet(
                    "grid layout needs at least one row and column".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Named animation, falling back to the sheet's default
    pub fn resolve_animation(&self, name: &str) -> Option<&AnimationSpec> {
        self.animations.get(name).or_else(|| {
            self.default_animation
                .as_deref()
                .and_then(|default| self.animations.get(default))
        })
    }

    /// True when `name` asks for an animation this sheet lacks. The empty
    /// name means "default" and is never missing.
    pub fn is_missing(&self, name: &str) -> bool {
        !name.is_empty() && !self.animations.contains_key(name)
    }

    /// Source rect of a sheet frame; degrades to the first defined frame and
    /// then to the whole sprite
    pub fn frame_rect(&self, index: usize) -> Rect {
        self.layout
            .rect(index)
            .unwrap_or_else(|| Rect::new(0.0, 0.0, self.width, self.height))
    }
}

/// Per-entity animation playback state
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    pub animation: String,
    pub started_at: Instant,
    /// Sequence position to freeze on while paused
    pub paused_position: Option<usize>,
    /// Sheet frame forced by the caller; wins over everything else
    pub frame_override: Option<usize>,
    /// Whether `animation` had to fall back on the sheet it was drawn with.
    /// `None` until the first draw after a switch.
    pub fallback: Option<bool>,
}

impl AnimationState {
    pub fn new(animation: impl Into<String>, started_at: Instant) -> Self {
        Self {
            animation: animation.into(),
            started_at,
            paused_position: None,
            frame_override: None,
            fallback: None,
        }
    }

    /// Sheet frame index to show at `now`
    pub fn frame_index(&self, sheet: &SpriteSheet, now: Instant) -> usize {
        if let Some(frame) = self.frame_override {
            return frame;
        }
        let Some(spec) = sheet.resolve_animation(&self.animation) else {
            return 0;
        };
        if let Some(position) = self.paused_position {
            return spec.frames.get(position).copied().unwrap_or(0);
        }
        spec.frame_at(now.saturating_duration_since(self.started_at))
    }
}

/// Drives frame selection for every animated entity
#[derive(Debug, Default)]
pub struct AnimationClock {
    states: FxHashMap<String, AnimationState>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source rect for `entity_id` at `now`.
    ///
    /// The entity's clock starts on its first call, so entities placed at
    /// different times are not phase-locked. Asking for a different
    /// animation than the one playing restarts the clock.
    pub fn source_rect(
        &mut self,
        entity_id: &str,
        animation: &str,
        sheet: &SpriteSheet,
        now: Instant,
    ) -> Rect {
        let state = self
            .states
            .entry(entity_id.to_string())
            .or_insert_with(|| AnimationState::new(animation, now));
        if state.animation != animation {
            state.animation = animation.to_string();
            state.started_at = now;
            state.paused_position = None;
            state.fallback = None;
        }
        if state.fallback.is_none() {
            let missing = sheet.is_missing(animation);
            if missing {
                log::warn!(
                    "entity '{}': animation '{}' not found, falling back to {}",
                    entity_id,
                    animation,
                    if sheet.resolve_animation(animation).is_some() {
                        "default animation"
                    } else {
                        "static first frame"
                    }
                );
            }
            state.fallback = Some(missing);
        }
        sheet.frame_rect(state.frame_index(sheet, now))
    }

    pub fn state(&self, entity_id: &str) -> Option<&AnimationState> {
        self.states.get(entity_id)
    }

    /// Switch animation and restart its clock at `now`
    pub fn play(&mut self, entity_id: &str, animation: &str, now: Instant) {
        self.states
            .insert(entity_id.to_string(), AnimationState::new(animation, now));
    }

    /// Freeze on the first frame of the current sequence
    pub fn pause(&mut self, entity_id: &str) {
        self.pause_at(entity_id, 0);
    }

    pub fn pause_at(&mut self, entity_id: &str, position: usize) {
        if let Some(state) = self.states.get_mut(entity_id) {
            state.paused_position = Some(position);
        }
    }

    /// Resume from the beginning of the sequence
    pub fn resume(&mut self, entity_id: &str, now: Instant) {
        if let Some(state) = self.states.get_mut(entity_id) {
            state.paused_position = None;
            state.started_at = now;
        }
    }

    pub fn set_frame_override(&mut self, entity_id: &str, frame: Option<usize>) {
        if let Some(state) = self.states.get_mut(entity_id) {
            state.frame_override = frame;
        }
    }

    /// Forget an entity's state (called when the entity is removed)
    pub fn discard(&mut self, entity_id: &str) -> Option<AnimationState> {
        self.states.remove(entity_id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn walk_sheet() -> SpriteSheet {
        SpriteSheet {
            width: 32.0,
            height: 48.0,
            layout: FrameLayout::Grid {
                frame_width: 32.0,
                frame_height: 48.0,
                columns: 4,
                rows: 2,
                order: GridOrder::RowMajor,
            },
            animations: FxHashMap::default(),
            default_animation: None,
        }
        .with_animation("idle", AnimationSpec::new(vec![0], 100, LoopMode::Loop))
        .with_animation("walk", AnimationSpec::new(vec![4, 5, 6, 7], 100, LoopMode::Loop))
    }

    #[test]
    fn test_loop_wraps() {
        let spec = AnimationSpec::new(vec![0, 1, 2], 100, LoopMode::Loop);
        assert_eq!(spec.frame_at(ms(250)), 2);
        assert_eq!(spec.frame_at(ms(300)), 0);
        assert_eq!(spec.frame_at(ms(0)), 0);
    }

    #[test]
    fn test_hold_clamps_to_last_frame() {
        let spec = AnimationSpec::new(vec![0, 1, 2], 100, LoopMode::Hold);
        assert_eq!(spec.frame_at(ms(1000)), 2);
        assert_eq!(spec.frame_at(ms(150)), 1);
    }

    #[test]
    fn test_pingpong_bounces() {
        let spec = AnimationSpec::new(vec![10, 11, 12, 13], 10, LoopMode::PingPong);
        let frames: Vec<usize> = (0..8).map(|i| spec.frame_at(ms(i * 10))).collect();
        assert_eq!(frames, vec![10, 11, 12, 13, 12, 11, 10, 11]);
    }

    #[test]
    fn test_single_frame_pingpong_degenerates() {
        let spec = AnimationSpec::new(vec![3], 10, LoopMode::PingPong);
        assert_eq!(spec.frame_at(ms(12345)), 3);
    }

    #[test]
    fn test_zero_duration_is_static() {
        let spec = AnimationSpec::new(vec![5, 6], 0, LoopMode::Loop);
        assert_eq!(spec.frame_at(ms(500)), 5);
    }

    #[test]
    fn test_grid_orders() {
        let row_major = FrameLayout::Grid {
            frame_width: 10.0,
            frame_height: 20.0,
            columns: 3,
            rows: 2,
            order: GridOrder::RowMajor,
        };
        assert_eq!(row_major.rect(4), Some(Rect::new(10.0, 20.0, 10.0, 20.0)));

        let column_major = FrameLayout::Grid {
            frame_width: 10.0,
            frame_height: 20.0,
            columns: 3,
            rows: 2,
            order: GridOrder::ColumnMajor,
        };
        assert_eq!(column_major.rect(4), Some(Rect::new(20.0, 0.0, 10.0, 20.0)));
    }

    #[test]
    fn test_out_of_range_frame_clamps_to_first() {
        let layout = FrameLayout::Rects(vec![
            Rect::new(0.0, 0.0, 8.0, 8.0),
            Rect::new(8.0, 0.0, 8.0, 8.0),
        ]);
        assert_eq!(layout.rect(9), Some(Rect::new(0.0, 0.0, 8.0, 8.0)));

        let sheet = walk_sheet();
        assert_eq!(sheet.frame_rect(99), Rect::new(0.0, 0.0, 32.0, 48.0));
    }

    #[test]
    fn test_clock_starts_on_first_draw() {
        let sheet = walk_sheet();
        let mut clock = AnimationClock::new();
        let t0 = Instant::now();

        // First draw of "a" at t0, of "b" 150ms later
        clock.source_rect("a", "walk", &sheet, t0);
        let b_first = clock.source_rect("b", "walk", &sheet, t0 + ms(150));
        let a_now = clock.source_rect("a", "walk", &sheet, t0 + ms(150));

        // frame 4 sits at column 0, row 1; frame 5 at column 1
        assert_eq!(b_first, Rect::new(0.0, 48.0, 32.0, 48.0));
        assert_eq!(a_now, Rect::new(32.0, 48.0, 32.0, 48.0));
    }

    #[test]
    fn test_override_beats_pause_beats_time() {
        let sheet = walk_sheet();
        let mut clock = AnimationClock::new();
        let t0 = Instant::now();
        clock.source_rect("e", "walk", &sheet, t0);

        clock.pause("e");
        assert_eq!(
            clock.source_rect("e", "walk", &sheet, t0 + ms(250)),
            sheet.frame_rect(4)
        );

        clock.set_frame_override("e", Some(2));
        assert_eq!(
            clock.source_rect("e", "walk", &sheet, t0 + ms(250)),
            sheet.frame_rect(2)
        );

        clock.set_frame_override("e", None);
        clock.resume("e", t0 + ms(300));
        assert_eq!(
            clock.source_rect("e", "walk", &sheet, t0 + ms(410)),
            sheet.frame_rect(5)
        );
    }

    #[test]
    fn test_missing_animation_falls_back() {
        let sheet = walk_sheet();
        let mut clock = AnimationClock::new();
        let t0 = Instant::now();
        // default animation is "idle" (first registered)
        assert_eq!(
            clock.source_rect("e", "dance", &sheet, t0 + ms(500)),
            sheet.frame_rect(0)
        );

        let bare = SpriteSheet::static_image(64.0, 64.0);
        assert_eq!(
            clock.source_rect("f", "anything", &bare, t0),
            Rect::new(0.0, 0.0, 64.0, 64.0)
        );
    }

    #[test]
    fn test_fallback_is_resolved_once_per_animation() {
        let sheet = walk_sheet();
        let mut clock = AnimationClock::new();
        let t0 = Instant::now();

        clock.source_rect("e", "dance", &sheet, t0);
        let first = clock.state("e").cloned().unwrap();
        assert_eq!(first.fallback, Some(true));
        for tick in 1..50 {
            clock.source_rect("e", "dance", &sheet, t0 + ms(tick * 16));
        }
        // later frames reuse the verdict and keep the clock running
        assert_eq!(clock.state("e"), Some(&first));

        clock.source_rect("e", "walk", &sheet, t0 + ms(900));
        assert_eq!(clock.state("e").unwrap().fallback, Some(false));

        clock.source_rect("s", "", &sheet, t0);
        assert_eq!(clock.state("s").unwrap().fallback, Some(false));
        assert!(!sheet.is_missing(""));
        assert!(sheet.is_missing("dance"));
    }

    #[test]
    fn test_switching_animation_restarts_clock() {
        let sheet = walk_sheet();
        let mut clock = AnimationClock::new();
        let t0 = Instant::now();
        clock.source_rect("e", "idle", &sheet, t0);
        let rect = clock.source_rect("e", "walk", &sheet, t0 + ms(1000));
        assert_eq!(rect, sheet.frame_rect(4));
        assert_eq!(clock.state("e").unwrap().started_at, t0 + ms(1000));
    }

    #[test]
    fn test_discard() {
        let sheet = walk_sheet();
        let mut clock = AnimationClock::new();
        clock.source_rect("e", "walk", &sheet, Instant::now());
        assert_eq!(clock.len(), 1);
        assert!(clock.discard("e").is_some());
        assert!(clock.is_empty());
    }

    #[test]
    fn test_sheet_from_json() {
        let sheet = SpriteSheet::from_json_str(
            r#"{
                "width": 64, "height": 64,
                "layout": { "grid": { "frame_width": 64, "frame_height": 64, "columns": 3, "rows": 1 } },
                "animations": { "spin": { "frames": [0, 1, 2], "frame_duration_ms": 80, "loop_mode": "pingpong" } },
                "default_animation": "spin"
            }"#,
        )
        .unwrap();
        assert_eq!(sheet.animations["spin"].loop_mode, LoopMode::PingPong);
        assert_eq!(sheet.frame_rect(2), Rect::new(128.0, 0.0, 64.0, 64.0));

        let bad = SpriteSheet::from_json_str(
            r#"{ "width": 64, "height": 64, "layout": { "grid": { "frame_width": 64, "frame_height": 64, "columns": 0, "rows": 1 } } }"#,
        );
        assert!(matches!(bad, Err(MapError::InvalidSpriteSheet(_))));
    }
}
