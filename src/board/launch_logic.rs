use bevy::prelude::Vec2;

use crate::constants::{FUSE_SECS, MAX_VELOCITY, OVERSPEED_TOLERANCE};

/// One velocity component from a free-text field. Empty or unparsable input
/// is not an error; it launches with that component at zero.
pub fn parse_velocity_component(raw: &str) -> f32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f32>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Rescale a velocity to MAX_VELOCITY in the same direction when it exceeds
/// the cap; identity otherwise.
pub fn clamp_velocity(v: Vec2) -> Vec2 {
    let speed = v.length();
    if speed > MAX_VELOCITY {
        v * (MAX_VELOCITY / speed)
    } else {
        v
    }
}

/// The post-step sweep tolerates integrator overshoot up to 10% before it
/// re-clamps, so it does not fight the per-launch clamp every tick.
pub fn is_overspeed(v: Vec2) -> bool {
    v.length() > MAX_VELOCITY * OVERSPEED_TOLERANCE
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LaunchPhase {
    /// Stationary pre-launch ball, no trigger armed.
    #[default]
    Idle,
    /// Single-body flight with the fuse and collision trigger armed.
    Flying,
    /// The ball has fragmented; nothing can fire again until relaunch.
    Exploded,
}

/// Lifecycle of one launch. `Flying` doubles as the armed token: both the
/// fuse and the collision trigger go through `try_burst`, and whichever
/// observes `Flying` first flips the phase and thereby disarms the other.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlightState {
    pub phase: LaunchPhase,
    pub fuse_secs_left: f32,
    /// Speed magnitude at the moment the burst was decided; 0 until then.
    pub impact_speed: f32,
}

impl FlightState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn launched() -> Self {
        Self {
            phase: LaunchPhase::Flying,
            fuse_secs_left: FUSE_SECS,
            impact_speed: 0.0,
        }
    }

    /// Advance the fuse by one fixed step. Returns true exactly when the
    /// countdown crosses zero while still flying; the caller is expected to
    /// attempt the burst in the same tick.
    pub fn tick_fuse(&mut self, dt: f32) -> bool {
        if self.phase != LaunchPhase::Flying || self.fuse_secs_left <= 0.0 {
            return false;
        }
        self.fuse_secs_left -= dt;
        self.fuse_secs_left <= 0.0
    }

    /// The one-shot gate between both triggers and the world mutation.
    /// Succeeds only from `Flying`; a second call, however it arrives, is a
    /// silent no-op.
    pub fn try_burst(&mut self, speed: f32) -> bool {
        if self.phase != LaunchPhase::Flying {
            return false;
        }
        self.phase = LaunchPhase::Exploded;
        self.fuse_secs_left = 0.0;
        self.impact_speed = speed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn tick_for(state: &mut FlightState, secs: f32) -> bool {
        let steps = (secs / DT).round() as usize;
        let mut fired = false;
        for _ in 0..steps {
            fired |= state.tick_fuse(DT);
        }
        fired
    }

    #[test]
    fn empty_and_garbage_velocity_default_to_zero() {
        assert_eq!(parse_velocity_component(""), 0.0);
        assert_eq!(parse_velocity_component("   "), 0.0);
        assert_eq!(parse_velocity_component("fast"), 0.0);
        assert_eq!(parse_velocity_component("NaN"), 0.0);
    }

    #[test]
    fn numeric_velocity_parses_with_sign_and_whitespace() {
        assert_eq!(parse_velocity_component("600"), 600.0);
        assert_eq!(parse_velocity_component(" -400.5 "), -400.5);
    }

    #[test]
    fn clamp_preserves_direction_and_caps_magnitude() {
        let v = Vec2::new(3000.0, -4000.0);
        let clamped = clamp_velocity(v);
        assert!((clamped.length() - MAX_VELOCITY).abs() < 1e-3);
        let cross = v.x * clamped.y - v.y * clamped.x;
        assert!(cross.abs() < 1.0);
    }

    #[test]
    fn clamp_is_identity_below_the_cap() {
        let v = Vec2::new(100.0, -50.0);
        assert_eq!(clamp_velocity(v), v);
        assert_eq!(clamp_velocity(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn overspeed_trips_only_above_the_tolerance_band() {
        assert!(!is_overspeed(Vec2::new(MAX_VELOCITY, 0.0)));
        assert!(!is_overspeed(Vec2::new(MAX_VELOCITY * 1.05, 0.0)));
        assert!(is_overspeed(Vec2::new(MAX_VELOCITY * 1.2, 0.0)));
    }

    #[test]
    fn short_flight_stays_flying() {
        // 500ms with no wall contact: still a single ball.
        let mut state = FlightState::launched();
        let fired = tick_for(&mut state, 0.5);
        assert!(!fired);
        assert_eq!(state.phase, LaunchPhase::Flying);
    }

    #[test]
    fn fuse_fires_once_at_two_seconds() {
        let mut state = FlightState::launched();
        assert!(!tick_for(&mut state, 1.9));
        assert!(tick_for(&mut state, 0.2));
        // Once fired, further ticks stay quiet even if the burst has not
        // been performed yet.
        assert!(!tick_for(&mut state, 1.0));
    }

    #[test]
    fn collision_at_300ms_bursts_and_disarms_the_fuse() {
        let mut state = FlightState::launched();
        tick_for(&mut state, 0.3);
        assert!(state.try_burst(750.0));
        assert_eq!(state.phase, LaunchPhase::Exploded);
        assert_eq!(state.impact_speed, 750.0);
        // The fuse can no longer fire.
        assert!(!tick_for(&mut state, 3.0));
    }

    #[test]
    fn burst_is_idempotent_per_launch() {
        let mut state = FlightState::launched();
        assert!(state.try_burst(500.0));
        assert!(!state.try_burst(900.0));
        assert_eq!(state.impact_speed, 500.0);
    }

    #[test]
    fn idle_ball_never_bursts() {
        let mut state = FlightState::idle();
        assert!(!state.try_burst(500.0));
        assert!(!tick_for(&mut state, 5.0));
        assert_eq!(state.phase, LaunchPhase::Idle);
    }

    #[test]
    fn relaunch_rearms_after_a_burst() {
        let mut state = FlightState::launched();
        state.try_burst(400.0);
        state = FlightState::launched();
        assert_eq!(state.phase, LaunchPhase::Flying);
        assert_eq!(state.impact_speed, 0.0);
        assert!(state.try_burst(100.0));
    }

    #[test]
    fn reset_returns_to_idle_with_no_armed_fuse() {
        let mut state = FlightState::launched();
        tick_for(&mut state, 1.0);
        state = FlightState::idle();
        assert_eq!(state.phase, LaunchPhase::Idle);
        assert_eq!(state.fuse_secs_left, 0.0);
        assert!(!tick_for(&mut state, 5.0));
    }
}
