mod board;
mod constants;
mod coord;
mod game;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use bevy_prototype_lyon::prelude::ShapePlugin;
use bevy_rapier2d::prelude::*;

use constants::{DEFAULT_FRAGMENTS, DEFAULT_VELOCITY_X, DEFAULT_VELOCITY_Y, PPM};
use game::{BallPlugin, CorePlugin, FieldDefaults, HudPlugin, InputPlugin, WallsPlugin};

fn main() {
    let defaults = field_defaults_from_env_or_location();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Ball Burst".to_string(),
                resolution: WindowResolution::new(1024, 768),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                #[cfg(target_arch = "wasm32")]
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(PPM).in_fixed_schedule())
        .add_plugins(ShapePlugin)
        .add_plugins(CorePlugin)
        .add_plugins(WallsPlugin)
        .add_plugins(BallPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(HudPlugin { defaults })
        .run();
}

#[cfg(not(target_arch = "wasm32"))]
fn field_defaults_from_env_or_location() -> FieldDefaults {
    let var = |name: &str, fallback: &str| {
        std::env::var(name).unwrap_or_else(|_| fallback.to_string())
    };

    FieldDefaults {
        velocity_x: var("BALLBURST_VX", DEFAULT_VELOCITY_X),
        velocity_y: var("BALLBURST_VY", DEFAULT_VELOCITY_Y),
        fragments: var("BALLBURST_FRAGMENTS", DEFAULT_FRAGMENTS),
    }
}

#[cfg(target_arch = "wasm32")]
fn field_defaults_from_env_or_location() -> FieldDefaults {
    let mut defaults = FieldDefaults {
        velocity_x: DEFAULT_VELOCITY_X.to_string(),
        velocity_y: DEFAULT_VELOCITY_Y.to_string(),
        fragments: DEFAULT_FRAGMENTS.to_string(),
    };

    let Some(window) = web_sys::window() else {
        return defaults;
    };
    let Ok(search) = window.location().search() else {
        return defaults;
    };

    for pair in search.trim_start_matches('?').split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "vx" => defaults.velocity_x = value.to_string(),
            "vy" => defaults.velocity_y = value.to_string(),
            "fragments" => defaults.fragments = value.to_string(),
            _ => {}
        }
    }

    defaults
}
