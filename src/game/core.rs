use bevy::prelude::*;
use bevy::time::Virtual;
use bevy_rapier2d::prelude::{PhysicsSet, RapierConfiguration, TimestepMode};
use std::time::Duration;

use crate::constants::{
    color_from_hex, Colors, GRAVITY_Y, PHYSICS_DT, PHYSICS_MAX_CATCHUP_SECS,
    PHYSICS_MAX_STEPS_PER_FRAME, PHYSICS_SUBSTEPS,
};

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum UpdateSet {
    Input,
    Layout,
    Visuals,
}

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum FixedSet {
    Simulate,
    PostPhysics,
    Spawn,
}

pub struct CorePlugin;

#[derive(Component)]
struct MainCamera;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(color_from_hex(Colors::BACKGROUND)))
            .insert_resource(Time::<Fixed>::from_seconds(PHYSICS_DT as f64))
            .insert_resource(TimestepMode::Fixed {
                dt: PHYSICS_DT,
                substeps: PHYSICS_SUBSTEPS,
            })
            .configure_sets(
                Update,
                (UpdateSet::Input, UpdateSet::Layout, UpdateSet::Visuals).chain(),
            )
            .configure_sets(
                FixedUpdate,
                (FixedSet::Simulate, FixedSet::PostPhysics, FixedSet::Spawn).chain(),
            )
            .configure_sets(
                FixedUpdate,
                FixedSet::Simulate.before(PhysicsSet::SyncBackend),
            )
            .configure_sets(
                FixedUpdate,
                FixedSet::PostPhysics.after(PhysicsSet::Writeback),
            )
            .add_systems(
                Startup,
                (
                    setup_camera,
                    configure_frame_catchup_cap,
                    configure_rapier_gravity,
                )
                    .chain(),
            );
    }
}

fn setup_camera(mut commands: Commands) {
    // WebGL2 MSAA is expensive (often CPU fallback); lyon already provides AA via tessellation.
    #[cfg(target_arch = "wasm32")]
    let msaa = Msaa::Off;
    #[cfg(not(target_arch = "wasm32"))]
    let msaa = Msaa::Sample4;

    commands.spawn((Camera2d, msaa, MainCamera));
}

fn configure_rapier_gravity(mut q_config: Query<&mut RapierConfiguration>) {
    for mut cfg in &mut q_config {
        cfg.gravity = Vec2::new(0.0, GRAVITY_Y);
    }
}

/// Bound catch-up work after a long frame: at most three fixed steps are
/// simulated, the rest of the wall-clock delta is dropped and the simulation
/// falls behind real time instead.
fn configure_frame_catchup_cap(mut virtual_time: ResMut<Time<Virtual>>) {
    let max_delta = Duration::from_secs_f64(PHYSICS_MAX_CATCHUP_SECS);
    debug_assert_eq!(
        PHYSICS_MAX_CATCHUP_SECS,
        (PHYSICS_DT as f64) * (PHYSICS_MAX_STEPS_PER_FRAME as f64)
    );
    virtual_time.set_max_delta(max_delta);
}
