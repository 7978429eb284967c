use bevy::prelude::{Vec2, Vec3};

/// Pixel coordinates in canvas screen space (origin top-left, Y-down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PxPos {
    pub x: f32,
    pub y: f32,
}

impl PxPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Convert canvas pixel coordinates (Y-down) to Bevy world coordinates (Y-up).
/// The canvas always spans the window, so the mapping depends on its size.
pub fn px_to_world(px: PxPos, canvas: Vec2, z: f32) -> Vec3 {
    let wx = px.x - canvas.x * 0.5;
    let wy = (canvas.y - px.y) - canvas.y * 0.5;
    Vec3::new(wx, wy, z)
}

/// Convert Bevy world coordinates (Y-up) to canvas pixel coordinates (Y-down).
pub fn world_to_px(world_xy: Vec2, canvas: Vec2) -> PxPos {
    PxPos {
        x: world_xy.x + canvas.x * 0.5,
        y: canvas.y * 0.5 - world_xy.y,
    }
}

/// Canvas-space velocity (Y-down positive) to Bevy velocity (Y-up positive).
/// Input fields use canvas convention: positive Y moves the ball downward.
pub fn px_vel_to_world(v: Vec2) -> Vec2 {
    Vec2::new(v.x, -v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Vec2 = Vec2::new(1024.0, 768.0);

    #[test]
    fn px_world_roundtrip() {
        for (x, y) in [
            (0.0, 0.0),
            (CANVAS.x, 0.0),
            (0.0, CANVAS.y),
            (CANVAS.x, CANVAS.y),
            (CANVAS.x * 0.5, CANVAS.y * 0.5),
        ] {
            let world = px_to_world(PxPos::new(x, y), CANVAS, 0.0);
            let roundtrip = world_to_px(world.truncate(), CANVAS);
            assert!((roundtrip.x - x).abs() < 1e-6);
            assert!((roundtrip.y - y).abs() < 1e-6);
        }
    }

    #[test]
    fn canvas_origin_maps_to_top_left() {
        let world = px_to_world(PxPos::new(0.0, 0.0), CANVAS, 0.0);
        assert!((world.x - (-CANVAS.x * 0.5)).abs() < 1e-6);
        assert!((world.y - CANVAS.y * 0.5).abs() < 1e-6);
    }

    #[test]
    fn downward_px_velocity_maps_to_negative_world_y() {
        let v = px_vel_to_world(Vec2::new(600.0, 400.0));
        assert!((v.x - 600.0).abs() < 1e-6);
        assert!((v.y - (-400.0)).abs() < 1e-6);
    }
}
