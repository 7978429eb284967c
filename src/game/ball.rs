use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_prototype_lyon::prelude::*;
use bevy_rapier2d::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::board::burst_logic::{
    burst_speed, fragment_layout, parse_fragment_count, CountWarning,
};
use crate::board::geometry::spawn_point;
use crate::board::launch_logic::{
    clamp_velocity, is_overspeed, parse_velocity_component, FlightState,
};
use crate::constants::{
    color_from_hex, Colors, BALL_DENSITY, BALL_FRICTION, BALL_RADIUS, BALL_RESTITUTION,
    FRAGMENT_DENSITY, FRAGMENT_FRICTION, FRAGMENT_RESTITUTION,
};
use crate::coord::{px_to_world, px_vel_to_world, world_to_px, PxPos};

use super::hud::UiFields;
use super::walls::Wall;
use super::FixedSet;

pub struct BallPlugin;

#[derive(Message, Clone, Copy)]
pub(crate) struct LaunchMessage;

#[derive(Message, Clone, Copy)]
pub(crate) struct ResetMessage;

#[derive(Component)]
pub(crate) struct MainBall;

#[derive(Component)]
pub(crate) struct Fragment;

/// Sole owner of the main-ball/fragment lifecycle. Systems in this module
/// are the only writers; everything else reads.
#[derive(Resource, Default)]
pub(crate) struct FlightControl {
    pub(crate) state: FlightState,
    pub(crate) ball: Option<Entity>,
}

#[derive(Resource)]
pub(crate) struct BurstRng(ChaCha8Rng);

impl Default for BurstRng {
    fn default() -> Self {
        // Fixed seed: runs replay identically and wasm needs no entropy source.
        Self(ChaCha8Rng::seed_from_u64(0x0b0a11))
    }
}

/// Render geometry, declared once at body construction instead of probed
/// from the collider later.
pub(crate) enum BodyShape {
    Circle { radius: f32 },
    #[allow(dead_code)]
    Polygon { points: Vec<Vec2> },
}

pub(crate) fn body_visual(shape: &BodyShape, fill: Color, stroke: Option<(Color, f32)>) -> Shape {
    match shape {
        BodyShape::Circle { radius } => {
            let circle = shapes::Circle {
                radius: *radius,
                center: Vec2::ZERO,
            };
            match stroke {
                Some(line) => ShapeBuilder::with(&circle).fill(fill).stroke(line).build(),
                None => ShapeBuilder::with(&circle).fill(fill).build(),
            }
        }
        BodyShape::Polygon { points } => {
            let polygon = shapes::Polygon {
                points: points.clone(),
                closed: true,
            };
            match stroke {
                Some(line) => ShapeBuilder::with(&polygon).fill(fill).stroke(line).build(),
                None => ShapeBuilder::with(&polygon).fill(fill).build(),
            }
        }
    }
}

impl Plugin for BallPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlightControl>()
            .init_resource::<BurstRng>()
            .add_message::<LaunchMessage>()
            .add_message::<ResetMessage>()
            .add_systems(Startup, spawn_idle_ball)
            .add_systems(FixedUpdate, fuse_system.in_set(FixedSet::Simulate))
            .add_systems(
                FixedUpdate,
                (collision_burst_system, overspeed_system)
                    .chain()
                    .in_set(FixedSet::PostPhysics),
            )
            .add_systems(
                FixedUpdate,
                (launch_system, reset_system).chain().in_set(FixedSet::Spawn),
            );
    }
}

fn spawn_idle_ball(
    mut commands: Commands,
    mut flight: ResMut<FlightControl>,
    q_window: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = q_window.single() else {
        return;
    };
    let canvas = Vec2::new(window.width(), window.height());
    let ball = spawn_main_ball(&mut commands, canvas, Vec2::ZERO);
    flight.state = FlightState::idle();
    flight.ball = Some(ball);
}

fn spawn_main_ball(commands: &mut Commands, canvas: Vec2, vel_canvas: Vec2) -> Entity {
    let p = spawn_point(canvas);
    let velocity = clamp_velocity(px_vel_to_world(vel_canvas));
    let shape = BodyShape::Circle {
        radius: BALL_RADIUS,
    };

    commands
        .spawn((
            RigidBody::Dynamic,
            Collider::ball(BALL_RADIUS),
            Restitution::coefficient(BALL_RESTITUTION),
            Friction::coefficient(BALL_FRICTION),
            ColliderMassProperties::Density(BALL_DENSITY),
            CollisionGroups::new(Group::GROUP_1, Group::ALL),
            ActiveEvents::COLLISION_EVENTS,
            Ccd::enabled(),
            Velocity::linear(velocity),
            Transform::from_translation(px_to_world(PxPos::new(p.x, p.y), canvas, 1.0)),
            body_visual(
                &shape,
                color_from_hex(Colors::BALL),
                Some((color_from_hex(Colors::BALL_STROKE), 2.0)),
            ),
            MainBall,
        ))
        .id()
}

/// `launch`: replace whatever is in the arena with a fresh ball at the spawn
/// point, moving at the parsed, clamped field velocity, fuse armed.
fn launch_system(
    mut commands: Commands,
    mut launches: MessageReader<LaunchMessage>,
    mut flight: ResMut<FlightControl>,
    fields: Res<UiFields>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_ball: Query<Entity, With<MainBall>>,
    q_fragments: Query<Entity, With<Fragment>>,
) {
    if launches.read().count() == 0 {
        return;
    }
    let Ok(window) = q_window.single() else {
        return;
    };
    let canvas = Vec2::new(window.width(), window.height());

    for entity in q_ball.iter().chain(q_fragments.iter()) {
        commands.entity(entity).despawn();
    }

    let vel_canvas = Vec2::new(
        parse_velocity_component(&fields.velocity_x),
        parse_velocity_component(&fields.velocity_y),
    );
    let ball = spawn_main_ball(&mut commands, canvas, vel_canvas);
    flight.state = FlightState::launched();
    flight.ball = Some(ball);
    info!("launch: velocity ({}, {}) px/s", vel_canvas.x, vel_canvas.y);
}

/// `reset`: tear down every dynamic body and restore the stationary
/// pre-launch ball with nothing armed.
fn reset_system(
    mut commands: Commands,
    mut resets: MessageReader<ResetMessage>,
    mut flight: ResMut<FlightControl>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_ball: Query<Entity, With<MainBall>>,
    q_fragments: Query<Entity, With<Fragment>>,
) {
    if resets.read().count() == 0 {
        return;
    }
    let Ok(window) = q_window.single() else {
        return;
    };
    let canvas = Vec2::new(window.width(), window.height());

    for entity in q_ball.iter().chain(q_fragments.iter()) {
        commands.entity(entity).despawn();
    }

    let ball = spawn_main_ball(&mut commands, canvas, Vec2::ZERO);
    flight.state = FlightState::idle();
    flight.ball = Some(ball);
}

/// Timeout trigger: when the fuse runs out mid-flight, the ball bursts where
/// it is, using its last known speed as the impact speed.
fn fuse_system(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut flight: ResMut<FlightControl>,
    fields: Res<UiFields>,
    mut rng: ResMut<BurstRng>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_ball: Query<(&Transform, &Velocity), With<MainBall>>,
    q_fragments: Query<Entity, With<Fragment>>,
) {
    if !flight.state.tick_fuse(time.delta_secs()) {
        return;
    }
    let Some(ball) = flight.ball else {
        return;
    };
    let Ok((transform, velocity)) = q_ball.get(ball) else {
        return;
    };
    let Ok(window) = q_window.single() else {
        return;
    };

    let speed = velocity.linvel.length();
    if flight.state.try_burst(speed) {
        burst(
            &mut commands,
            &mut flight,
            transform.translation.truncate(),
            Vec2::new(window.width(), window.height()),
            &fields,
            &mut rng,
            &q_fragments,
        );
    }
}

/// Collision trigger: a contact between the tracked ball and any wall bursts
/// the ball at the impact point. Stale events (already burst, or naming a
/// replaced ball) fall through the `try_burst` gate as no-ops.
fn collision_burst_system(
    mut commands: Commands,
    mut collisions: MessageReader<CollisionEvent>,
    mut flight: ResMut<FlightControl>,
    fields: Res<UiFields>,
    mut rng: ResMut<BurstRng>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_ball: Query<(&Transform, &Velocity), With<MainBall>>,
    q_walls: Query<(), With<Wall>>,
    q_fragments: Query<Entity, With<Fragment>>,
) {
    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        let Some(ball) = flight.ball else {
            continue;
        };
        let other = if *a == ball {
            *b
        } else if *b == ball {
            *a
        } else {
            continue;
        };
        if q_walls.get(other).is_err() {
            continue;
        }
        let Ok((transform, velocity)) = q_ball.get(ball) else {
            continue;
        };
        let Ok(window) = q_window.single() else {
            continue;
        };

        let speed = velocity.linvel.length();
        if flight.state.try_burst(speed) {
            burst(
                &mut commands,
                &mut flight,
                transform.translation.truncate(),
                Vec2::new(window.width(), window.height()),
                &fields,
                &mut rng,
                &q_fragments,
            );
        }
    }
}

/// The fragmentation itself. Runs exactly once per launch, after `try_burst`
/// has recorded the impact speed and flipped the phase.
fn burst(
    commands: &mut Commands,
    flight: &mut FlightControl,
    origin: Vec2,
    canvas: Vec2,
    fields: &UiFields,
    rng: &mut BurstRng,
    q_fragments: &Query<Entity, With<Fragment>>,
) {
    if let Some(ball) = flight.ball.take() {
        commands.entity(ball).despawn();
    }
    for fragment in q_fragments.iter() {
        commands.entity(fragment).despawn();
    }

    // Fragment count comes from the field as it reads right now, not as it
    // read at launch.
    let request = parse_fragment_count(&fields.fragments);
    match request.warning {
        Some(CountWarning::OutOfRange { clamped_to }) => {
            warn!("fragment count clamped to {clamped_to} (valid range: 1-100)");
        }
        Some(CountWarning::HighCount { count }) => {
            warn!("high fragment count ({count}) may cause performance issues");
        }
        None => {}
    }

    let kick = burst_speed(flight.state.impact_speed);
    for seed in fragment_layout(request.count, &mut rng.0) {
        let dir = seed.direction();
        let hue = rng.0.gen_range(0.0..360.0);
        let shape = BodyShape::Circle {
            radius: seed.radius,
        };

        commands.spawn((
            RigidBody::Dynamic,
            Collider::ball(seed.radius),
            Restitution::coefficient(FRAGMENT_RESTITUTION),
            Friction::coefficient(FRAGMENT_FRICTION),
            ColliderMassProperties::Density(FRAGMENT_DENSITY),
            CollisionGroups::new(Group::GROUP_1, Group::ALL),
            Velocity::linear(dir * kick),
            Transform::from_translation((origin + dir * seed.offset).extend(1.0)),
            body_visual(&shape, Color::hsl(hue, 0.7, 0.6), None),
            Fragment,
        ));
    }

    let px = world_to_px(origin, canvas);
    info!(
        "burst at ({:.0}, {:.0}): {} fragments, impact speed {:.0} px/s",
        px.x, px.y, request.count, flight.state.impact_speed
    );
}

/// Safety net against integrator spikes: after the engine has written back,
/// any dynamic body past the tolerance band is pulled back to the cap.
fn overspeed_system(mut q_bodies: Query<&mut Velocity>) {
    for mut velocity in &mut q_bodies {
        if is_overspeed(velocity.linvel) {
            velocity.linvel = clamp_velocity(velocity.linvel);
        }
    }
}
