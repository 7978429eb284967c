use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;

use super::ball::{LaunchMessage, ResetMessage};
use super::hud::UiFields;
use super::UpdateSet;

pub struct InputPlugin;

const MAX_FIELD_LEN: usize = 12;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (typing_system, shortcut_system)
                .chain()
                .in_set(UpdateSet::Input),
        );
    }
}

/// Route keystrokes into whichever field is focused. Enter and Escape blur.
fn typing_system(mut fields: ResMut<UiFields>, mut keys: MessageReader<KeyboardInput>) {
    let Some(kind) = fields.focused else {
        keys.clear();
        return;
    };

    for input in keys.read() {
        if input.state != ButtonState::Pressed {
            continue;
        }
        match &input.logical_key {
            Key::Character(typed) => {
                let buffer = fields.buffer_mut(kind);
                for c in typed.chars() {
                    let accepted = c.is_ascii_digit() || c == '-' || c == '+' || c == '.';
                    if accepted && buffer.len() < MAX_FIELD_LEN {
                        buffer.push(c);
                    }
                }
            }
            Key::Backspace => {
                fields.buffer_mut(kind).pop();
            }
            Key::Enter | Key::Escape => {
                fields.focused = None;
            }
            _ => {}
        }
    }
}

/// Space launches, R resets, but only while no field is capturing keystrokes.
fn shortcut_system(
    fields: Res<UiFields>,
    keys: Res<ButtonInput<KeyCode>>,
    mut launch: MessageWriter<LaunchMessage>,
    mut reset: MessageWriter<ResetMessage>,
) {
    if fields.focused.is_some() {
        return;
    }

    if keys.just_pressed(KeyCode::Space) {
        launch.write(LaunchMessage);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        reset.write(ResetMessage);
    }
}
