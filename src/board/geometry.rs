use bevy::prelude::Vec2;

use crate::constants::WALL_THICKNESS;

/// Axis-aligned wall rectangle in canvas coordinates (origin top-left, Y-down).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallRect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

/// The four arena walls for a canvas of the given size. Each wall is centered
/// half a thickness outside the boundary so its inner face sits exactly on the
/// visible edge. Top/bottom span the width, left/right span the height.
pub fn wall_rects(canvas: Vec2) -> [WallRect; 4] {
    let w = canvas.x;
    let h = canvas.y;
    let t = WALL_THICKNESS;

    [
        // top
        WallRect {
            center: Vec2::new(w * 0.5, -t * 0.5),
            half_extents: Vec2::new(w * 0.5, t * 0.5),
        },
        // bottom
        WallRect {
            center: Vec2::new(w * 0.5, h + t * 0.5),
            half_extents: Vec2::new(w * 0.5, t * 0.5),
        },
        // left
        WallRect {
            center: Vec2::new(-t * 0.5, h * 0.5),
            half_extents: Vec2::new(t * 0.5, h * 0.5),
        },
        // right
        WallRect {
            center: Vec2::new(w + t * 0.5, h * 0.5),
            half_extents: Vec2::new(t * 0.5, h * 0.5),
        },
    ]
}

/// Where a freshly launched ball appears: quarter-width, mid-height.
pub fn spawn_point(canvas: Vec2) -> Vec2 {
    Vec2::new(canvas.x / 4.0, canvas.y / 2.0)
}

/// Walls must be rebuilt when none exist yet or the canvas changed size.
pub fn needs_rebuild(built_for: Option<Vec2>, canvas: Vec2) -> bool {
    match built_for {
        None => true,
        Some(size) => size != canvas,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn inner_faces_sit_on_the_canvas_edges() {
        let [top, bottom, left, right] = wall_rects(CANVAS);

        assert!((top.center.y + top.half_extents.y - 0.0).abs() < 1e-6);
        assert!((bottom.center.y - bottom.half_extents.y - CANVAS.y).abs() < 1e-6);
        assert!((left.center.x + left.half_extents.x - 0.0).abs() < 1e-6);
        assert!((right.center.x - right.half_extents.x - CANVAS.x).abs() < 1e-6);
    }

    #[test]
    fn top_and_bottom_span_the_width() {
        let [top, bottom, ..] = wall_rects(CANVAS);
        assert_eq!(top.half_extents.x * 2.0, CANVAS.x);
        assert_eq!(bottom.half_extents.x * 2.0, CANVAS.x);
    }

    #[test]
    fn rects_are_a_pure_function_of_size() {
        assert_eq!(wall_rects(CANVAS), wall_rects(CANVAS));
        assert_ne!(
            wall_rects(CANVAS)[0],
            wall_rects(Vec2::new(801.0, 600.0))[0]
        );
    }

    #[test]
    fn spawn_point_is_quarter_width_mid_height() {
        let p = spawn_point(CANVAS);
        assert_eq!(p, Vec2::new(200.0, 300.0));
    }

    #[test]
    fn rebuild_only_when_missing_or_resized() {
        assert!(needs_rebuild(None, CANVAS));
        assert!(!needs_rebuild(Some(CANVAS), CANVAS));
        assert!(needs_rebuild(Some(Vec2::new(640.0, 480.0)), CANVAS));
    }
}
