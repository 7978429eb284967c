/// Rapier pixels_per_meter scaling factor. Rapier divides internally by this
/// so we can work in pixel coordinates everywhere.
pub const PPM: f32 = 100.0;

/// Gravity in pixel-space, Bevy Y-up (the page had 0.4 g pointing down).
pub const GRAVITY_Y: f32 = -400.0;

/// Hard ceiling on any dynamic body's speed, px/s.
pub const MAX_VELOCITY: f32 = 1800.0;
/// The post-step sweep only intervenes above this fraction of MAX_VELOCITY.
pub const OVERSPEED_TOLERANCE: f32 = 1.1;

pub const PHYSICS_DT: f32 = 1.0 / 60.0;
pub const PHYSICS_SUBSTEPS: usize = 1;
pub const PHYSICS_MAX_STEPS_PER_FRAME: u32 = 3;
/// Max simulated time per rendered frame; excess wall-clock time is dropped.
pub const PHYSICS_MAX_CATCHUP_SECS: f64 = PHYSICS_DT as f64 * PHYSICS_MAX_STEPS_PER_FRAME as f64;

pub const WALL_THICKNESS: f32 = 50.0;
pub const WALL_RESTITUTION: f32 = 1.0;

pub const BALL_RADIUS: f32 = 30.0;
pub const BALL_RESTITUTION: f32 = 0.95;
pub const BALL_FRICTION: f32 = 0.05;
pub const BALL_DENSITY: f32 = 0.001;

pub const FRAGMENT_RESTITUTION: f32 = 0.95;
pub const FRAGMENT_FRICTION: f32 = 0.02;
pub const FRAGMENT_DENSITY: f32 = 0.001;
pub const FRAGMENT_RADIUS_MIN: f32 = 5.0;
pub const FRAGMENT_RADIUS_MAX: f32 = 10.0;
pub const FRAGMENT_OFFSET_MIN: f32 = 20.0;
pub const FRAGMENT_OFFSET_MAX: f32 = 30.0;

/// Seconds of flight before the ball bursts on its own.
pub const FUSE_SECS: f32 = 2.0;

pub const DEFAULT_VELOCITY_X: &str = "600";
pub const DEFAULT_VELOCITY_Y: &str = "-400";
pub const DEFAULT_FRAGMENTS: &str = "20";

#[derive(Clone, Copy)]
pub struct Colors;

impl Colors {
    pub const BACKGROUND: u32 = 0x1a1a2e;
    pub const BALL: u32 = 0xff6b6b;
    pub const BALL_STROKE: u32 = 0xee5a6f;
    pub const UI_TEXT: u32 = 0xcccccc;
    pub const UI_DIM: u32 = 0x888888;
    pub const UI_ACCENT: u32 = 0x4da6a6;
    pub const WARNING: u32 = 0xffaa00;
}

pub fn color_from_hex(rgb: u32) -> bevy::prelude::Color {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    bevy::prelude::Color::srgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_from_hex_parses_correctly() {
        let c = color_from_hex(0xFF8040);
        if let bevy::prelude::Color::Srgba(srgba) = c {
            assert!((srgba.red - 1.0).abs() < 1e-3);
            assert!((srgba.green - 0.502).abs() < 1e-2);
            assert!((srgba.blue - 0.251).abs() < 1e-2);
        } else {
            panic!("Expected Srgba color variant");
        }
    }

    #[test]
    fn catchup_cap_is_three_fixed_steps() {
        assert!((PHYSICS_MAX_CATCHUP_SECS - 3.0 / 60.0).abs() < 1e-9);
    }
}
