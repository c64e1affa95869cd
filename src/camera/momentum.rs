use crate::core::geo::Point;

/// Inertia carried over from a drag release.
///
/// Tracks the last per-move drag delta; once released, each frame decays the
/// velocity by `friction` and yields it as a pan delta until both axes fall
/// to `min_velocity` or below.
#[derive(Debug, Clone)]
pub struct Momentum {
    velocity: Point,
    friction: f64,
    min_velocity: f64,
    gliding: bool,
}

impl Momentum {
    pub fn new(friction: f64, min_velocity: f64) -> Self {
        Self {
            velocity: Point::default(),
            friction,
            min_velocity,
            gliding: false,
        }
    }

    /// Record the most recent drag delta
    pub fn track(&mut self, dx: f64, dy: f64) {
        self.velocity = Point::new(dx, dy);
    }

    /// Start gliding if the tracked velocity is fast enough
    pub fn release(&mut self) -> bool {
        self.gliding = self.is_fast(self.velocity);
        if !self.gliding {
            self.velocity = Point::default();
        }
        self.gliding
    }

    pub fn stop(&mut self) {
        self.velocity = Point::default();
        self.gliding = false;
    }

    pub fn is_gliding(&self) -> bool {
        self.gliding
    }

    /// Pan delta for one display frame, `None` once the glide is over
    pub fn step(&mut self) -> Option<Point> {
        if !self.gliding {
            return None;
        }
        self.velocity = self.velocity.multiply(self.friction);
        let delta = self.velocity;
        if !self.is_fast(delta) {
            self.stop();
        }
        Some(delta)
    }

    fn is_fast(&self, velocity: Point) -> bool {
        velocity.x.abs() > self.min_velocity || velocity.y.abs() > self.min_velocity
    }
}
