use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::*;

use crate::board::geometry::{needs_rebuild, wall_rects};
use crate::constants::WALL_RESTITUTION;
use crate::coord::{px_to_world, PxPos};

use super::UpdateSet;

pub struct WallsPlugin;

#[derive(Component)]
pub(crate) struct Wall;

#[derive(Resource, Default)]
struct WallLayout {
    built_for: Option<Vec2>,
}

impl Plugin for WallsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WallLayout>()
            .add_systems(Update, sync_walls_to_window.in_set(UpdateSet::Layout));
    }
}

/// Keep the four static walls congruent with the window. Walls are replaced
/// wholesale on resize, never stretched in place; unchanged dimensions leave
/// the set untouched. Walls carry no visual, they are never drawn.
fn sync_walls_to_window(
    mut commands: Commands,
    mut layout: ResMut<WallLayout>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_walls: Query<Entity, With<Wall>>,
) {
    let Ok(window) = q_window.single() else {
        return;
    };

    let canvas = Vec2::new(window.width(), window.height());
    if canvas.x <= 0.0 || canvas.y <= 0.0 {
        return;
    }
    if !needs_rebuild(layout.built_for, canvas) {
        return;
    }

    for wall in &q_walls {
        commands.entity(wall).despawn();
    }

    for rect in wall_rects(canvas) {
        let world = px_to_world(PxPos::new(rect.center.x, rect.center.y), canvas, 0.0);
        commands.spawn((
            RigidBody::Fixed,
            Collider::cuboid(rect.half_extents.x, rect.half_extents.y),
            Restitution {
                coefficient: WALL_RESTITUTION,
                combine_rule: CoefficientCombineRule::Max,
            },
            Friction {
                coefficient: 0.0,
                combine_rule: CoefficientCombineRule::Min,
            },
            Transform::from_translation(world),
            GlobalTransform::default(),
            Wall,
        ));
    }

    layout.built_for = Some(canvas);
}
