//! Fixed-rate directional panning (keyboard arrows, edge scrolling).

use crate::core::geo::Point;
use fxhash::FxHashSet;
use instant::Instant;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Pan direction in screen axes. Panning moves the map, so "left"
    /// reveals what lies to the left by shifting content right.
    pub fn pan_unit(self) -> Point {
        match self {
            Direction::Left => Point::new(1.0, 0.0),
            Direction::Right => Point::new(-1.0, 0.0),
            Direction::Up => Point::new(0.0, 1.0),
            Direction::Down => Point::new(0.0, -1.0),
        }
    }
}

/// Set of held directions plus the schedule of the next tick.
///
/// The ticker runs only while at least one direction is held. It does not
/// follow the display rate: [`PanTicker::due_ticks`] reports how many fixed
/// intervals elapsed since the last call.
#[derive(Debug, Clone)]
pub struct PanTicker {
    active: FxHashSet<Direction>,
    next_tick: Option<Instant>,
    interval: Duration,
    max_catch_up: u32,
}

impl PanTicker {
    pub fn new(interval: Duration, max_catch_up: u32) -> Self {
        Self {
            active: FxHashSet::default(),
            next_tick: None,
            interval,
            max_catch_up: max_catch_up.max(1),
        }
    }

    /// Hold `direction`. Returns `true` when this started the ticker.
    pub fn start(&mut self, direction: Direction, now: Instant) -> bool {
        let was_idle = self.active.is_empty();
        self.active.insert(direction);
        if was_idle {
            self.next_tick = Some(now + self.interval);
            log::debug!("pan ticker started ({direction:?})");
        }
        was_idle
    }

    /// Release `direction`. Returns `true` when this stopped the ticker.
    pub fn stop(&mut self, direction: Direction) -> bool {
        if !self.active.remove(&direction) || !self.active.is_empty() {
            return false;
        }
        self.next_tick = None;
        log::debug!("pan ticker stopped");
        true
    }

    pub fn stop_all(&mut self) {
        if !self.active.is_empty() {
            self.active.clear();
            self.next_tick = None;
            log::debug!("pan ticker stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    pub fn is_active(&self, direction: Direction) -> bool {
        self.active.contains(&direction)
    }

    /// Combined per-tick delta of all held directions. Vertical speed is
    /// `vertical_ratio` of horizontal so diagonals track the 2:1 diamond.
    pub fn delta(&self, speed: f64, vertical_ratio: f64) -> Point {
        self.active.iter().fold(Point::default(), |acc, direction| {
            let unit = direction.pan_unit();
            acc.add(&Point::new(unit.x * speed, unit.y * speed * vertical_ratio))
        })
    }

    /// Number of ticks due at `now`, advancing the schedule past them.
    ///
    /// After a stall longer than `max_catch_up` intervals the backlog is
    /// dropped and the schedule restarts from `now`.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(next) = self.next_tick else {
            return 0;
        };
        if now < next {
            return 0;
        }

        let interval = self.interval.as_nanos().max(1);
        let behind = now.saturating_duration_since(next).as_nanos() / interval + 1;
        if behind > self.max_catch_up as u128 {
            self.next_tick = Some(now + self.interval);
            return self.max_catch_up;
        }

        let due = behind as u32;
        self.next_tick = Some(next + self.interval * due);
        due
    }
}
