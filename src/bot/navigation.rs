//! Timed movement state machine.
//!
//! ```text
//!          walk_to            arrive | warp | stop
//!   Idle ─────────▶ Walking ──────────────────────▶ Idle
//!     │                                              ▲
//!     └──fly_to───▶ Flying ──────────────────────────┘
//! ```
//!
//! Each leg has a deadline. A bot that has not arrived when it expires is
//! warped straight to the destination.

use std::time::Duration;

use crate::region::Vector3;

/// Ground speed in metres per second.
pub const WALK_SPEED: f32 = 3.0;
/// Flying speed in metres per second.
pub const FLY_SPEED: f32 = 10.0;
/// Time allowed for one leg before warping.
pub const DEFAULT_LEG_TIMEOUT: Duration = Duration::from_secs(600);

/// Per-axis arrival tolerance while walking (x and y only).
const WALK_TOLERANCE: f32 = 1.0;
/// Per-axis arrival tolerance while flying (all three axes).
const FLY_TOLERANCE: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Idle,
    Walking,
    Flying,
}

/// Reported when a leg ends on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    Arrived(Vector3),
    Warped(Vector3),
}

#[derive(Debug)]
pub struct Navigator {
    state: MotionState,
    destination: Vector3,
    elapsed: Duration,
    timeout: Duration,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            state: MotionState::Idle,
            destination: Vector3::ZERO,
            elapsed: Duration::ZERO,
            timeout: DEFAULT_LEG_TIMEOUT,
        }
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    /// Current target, if moving.
    pub fn destination(&self) -> Option<Vector3> {
        (self.state != MotionState::Idle).then_some(self.destination)
    }

    /// Start walking. Returns `false` when already standing on `to`.
    pub fn walk_to(&mut self, from: Vector3, to: Vector3, timeout: Option<Duration>) -> bool {
        self.start_leg(MotionState::Walking, from, to, timeout)
    }

    /// Start flying. Returns `false` when already at `to`.
    pub fn fly_to(&mut self, from: Vector3, to: Vector3, timeout: Option<Duration>) -> bool {
        self.start_leg(MotionState::Flying, from, to, timeout)
    }

    fn start_leg(
        &mut self,
        state: MotionState,
        from: Vector3,
        to: Vector3,
        timeout: Option<Duration>,
    ) -> bool {
        if to.sub(from) == Vector3::ZERO {
            return false;
        }
        self.state = state;
        self.destination = to;
        self.elapsed = Duration::ZERO;
        self.timeout = timeout.unwrap_or(DEFAULT_LEG_TIMEOUT);
        true
    }

    pub fn stop(&mut self) {
        self.state = MotionState::Idle;
    }

    fn arrived(&self, position: Vector3) -> bool {
        let d = self.destination.sub(position);
        match self.state {
            MotionState::Idle => false,
            MotionState::Walking => d.x.abs() < WALK_TOLERANCE && d.y.abs() < WALK_TOLERANCE,
            MotionState::Flying => {
                d.x.abs() < FLY_TOLERANCE && d.y.abs() < FLY_TOLERANCE && d.z.abs() < FLY_TOLERANCE
            }
        }
    }

    /// Advance one frame of `dt`, moving `position` toward the destination.
    pub fn on_tick(&mut self, dt: Duration, position: &mut Vector3) -> Option<Transition> {
        if self.state == MotionState::Idle {
            return None;
        }

        if self.arrived(*position) {
            self.state = MotionState::Idle;
            return Some(Transition::Arrived(*position));
        }

        self.elapsed += dt;
        if self.elapsed >= self.timeout {
            *position = self.destination;
            self.state = MotionState::Idle;
            return Some(Transition::Warped(self.destination));
        }

        let (speed, target) = match self.state {
            MotionState::Walking => (
                WALK_SPEED,
                Vector3::new(self.destination.x, self.destination.y, position.z),
            ),
            _ => (FLY_SPEED, self.destination),
        };
        let remaining = target.sub(*position);
        let distance = remaining.length();
        let step = speed * dt.as_secs_f32();
        if distance <= step {
            *position = target;
        } else {
            let scale = step / distance;
            *position = Vector3::new(
                position.x + remaining.x * scale,
                position.y + remaining.y * scale,
                position.z + remaining.z * scale,
            );
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(100);

    fn run(nav: &mut Navigator, pos: &mut Vector3, max_ticks: usize) -> Option<Transition> {
        (0..max_ticks).find_map(|_| nav.on_tick(TICK, pos))
    }

    #[test]
    fn test_walk_arrives_ignoring_height() {
        let mut nav = Navigator::new();
        let mut pos = Vector3::new(128.0, 128.0, 25.0);
        assert!(nav.walk_to(pos, Vector3::new(134.0, 128.0, 90.0), None));
        assert_eq!(nav.state(), MotionState::Walking);

        let t = run(&mut nav, &mut pos, 100).unwrap();
        assert!(matches!(t, Transition::Arrived(_)));
        assert_eq!(nav.state(), MotionState::Idle);
        assert!((pos.x - 134.0).abs() < 1.0);
        assert_eq!(pos.z, 25.0);
    }

    #[test]
    fn test_fly_needs_all_axes() {
        let mut nav = Navigator::new();
        let mut pos = Vector3::new(0.0, 0.0, 0.0);
        nav.fly_to(pos, Vector3::new(0.0, 0.0, 30.0), None);

        // One tick climbs 1 m; not there yet.
        assert_eq!(nav.on_tick(TICK, &mut pos), None);
        assert!((pos.z - 1.0).abs() < 1e-4);

        assert!(matches!(run(&mut nav, &mut pos, 100), Some(Transition::Arrived(_))));
        assert!((pos.z - 30.0).abs() < FLY_TOLERANCE);
    }

    #[test]
    fn test_timeout_warps() {
        let mut nav = Navigator::new();
        let mut pos = Vector3::new(0.0, 0.0, 0.0);
        let far = Vector3::new(200.0, 200.0, 0.0);
        nav.walk_to(pos, far, Some(Duration::from_millis(300)));

        assert_eq!(nav.on_tick(TICK, &mut pos), None);
        assert_eq!(nav.on_tick(TICK, &mut pos), None);
        assert_eq!(nav.on_tick(TICK, &mut pos), Some(Transition::Warped(far)));
        assert_eq!(pos, far);
        assert_eq!(nav.destination(), None);
    }

    #[test]
    fn test_same_spot_is_ignored() {
        let mut nav = Navigator::new();
        let here = Vector3::new(5.0, 5.0, 5.0);
        assert!(!nav.walk_to(here, here, None));
        assert!(!nav.fly_to(here, here, None));
        assert_eq!(nav.state(), MotionState::Idle);
    }

    #[test]
    fn test_stop() {
        let mut nav = Navigator::new();
        let mut pos = Vector3::ZERO;
        nav.walk_to(pos, Vector3::new(50.0, 0.0, 0.0), None);
        nav.on_tick(TICK, &mut pos);
        nav.stop();
        let frozen = pos;
        assert_eq!(nav.on_tick(TICK, &mut pos), None);
        assert_eq!(pos, frozen);
    }
}
