use bevy::prelude::*;

use crate::board::launch_logic::LaunchPhase;
use crate::constants::{color_from_hex, Colors};

use super::ball::{FlightControl, Fragment, LaunchMessage, ResetMessage};
use super::UpdateSet;

pub struct HudPlugin {
    pub defaults: FieldDefaults,
}

/// Startup values for the three text fields, resolved in main.rs from env
/// vars (native) or the page query string (wasm).
#[derive(Clone)]
pub struct FieldDefaults {
    pub velocity_x: String,
    pub velocity_y: String,
    pub fragments: String,
}

const PANEL_LEFT: f32 = 12.0;
const PANEL_TOP: f32 = 12.0;
const PANEL_WIDTH: f32 = 190.0;
const FIELD_WIDTH: f32 = 90.0;
const FIELD_HEIGHT: f32 = 22.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FieldKind {
    VelocityX,
    VelocityY,
    Fragments,
}

/// The three free-text buffers plus which one the keyboard edits. Parsing
/// happens at launch (velocities) and at burst time (fragment count), never
/// while typing.
#[derive(Resource)]
pub(crate) struct UiFields {
    pub(crate) velocity_x: String,
    pub(crate) velocity_y: String,
    pub(crate) fragments: String,
    pub(crate) focused: Option<FieldKind>,
}

impl UiFields {
    fn from_defaults(defaults: &FieldDefaults) -> Self {
        Self {
            velocity_x: defaults.velocity_x.clone(),
            velocity_y: defaults.velocity_y.clone(),
            fragments: defaults.fragments.clone(),
            focused: None,
        }
    }

    pub(crate) fn buffer(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::VelocityX => &self.velocity_x,
            FieldKind::VelocityY => &self.velocity_y,
            FieldKind::Fragments => &self.fragments,
        }
    }

    pub(crate) fn buffer_mut(&mut self, kind: FieldKind) -> &mut String {
        match kind {
            FieldKind::VelocityX => &mut self.velocity_x,
            FieldKind::VelocityY => &mut self.velocity_y,
            FieldKind::Fragments => &mut self.fragments,
        }
    }
}

#[derive(Component)]
pub(crate) struct HudField(pub(crate) FieldKind);

#[derive(Component)]
struct HudFieldText(FieldKind);

#[derive(Component)]
struct HudLaunchButton;

#[derive(Component)]
struct HudResetButton;

#[derive(Component)]
struct HudWarningText;

#[derive(Component)]
struct HudStatusText;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(UiFields::from_defaults(&self.defaults))
            .add_systems(Startup, spawn_hud)
            .add_systems(
                Update,
                (
                    handle_button_interactions,
                    update_field_ui,
                    update_warning_ui,
                    update_status_ui,
                )
                    .chain()
                    .in_set(UpdateSet::Visuals),
            );
    }
}

fn spawn_hud(mut commands: Commands) {
    let small = TextFont::from_font_size(10.0);
    let medium = TextFont::from_font_size(14.0);

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(PANEL_LEFT),
                top: Val::Px(PANEL_TOP),
                width: Val::Px(PANEL_WIDTH),
                flex_direction: FlexDirection::Column,
                border: UiRect::all(Val::Px(1.0)),
                padding: UiRect {
                    left: Val::Px(10.0),
                    right: Val::Px(10.0),
                    top: Val::Px(8.0),
                    bottom: Val::Px(8.0),
                },
                row_gap: Val::Px(6.0),
                ..default()
            },
            BackgroundColor(panel_bg(0.92)),
            BorderColor::all(panel_border(0.3)),
            BorderRadius::all(Val::Px(6.0)),
        ))
        .with_children(|parent| {
            for (label, kind) in [
                ("vel x", FieldKind::VelocityX),
                ("vel y", FieldKind::VelocityY),
                ("fragments", FieldKind::Fragments),
            ] {
                parent
                    .spawn(Node {
                        flex_direction: FlexDirection::Row,
                        justify_content: JustifyContent::SpaceBetween,
                        align_items: AlignItems::Center,
                        column_gap: Val::Px(8.0),
                        ..default()
                    })
                    .with_children(|row| {
                        row.spawn((
                            Text::new(label),
                            small.clone(),
                            TextColor(color_from_hex(Colors::UI_DIM)),
                        ));
                        row.spawn((
                            Button,
                            Node {
                                width: Val::Px(FIELD_WIDTH),
                                height: Val::Px(FIELD_HEIGHT),
                                align_items: AlignItems::Center,
                                padding: UiRect {
                                    left: Val::Px(6.0),
                                    ..UiRect::default()
                                },
                                border: UiRect::all(Val::Px(1.0)),
                                ..default()
                            },
                            BackgroundColor(panel_bg(0.6)),
                            BorderColor::all(panel_border(0.4)),
                            BorderRadius::all(Val::Px(4.0)),
                            HudField(kind),
                        ))
                        .with_children(|button| {
                            button.spawn((
                                Text::new(""),
                                small.clone(),
                                TextColor(color_from_hex(Colors::UI_TEXT)),
                                HudFieldText(kind),
                            ));
                        });
                    });
            }

            parent.spawn((
                Text::new(""),
                small.clone(),
                TextColor(color_from_hex(Colors::WARNING)),
                Visibility::Hidden,
                HudWarningText,
            ));

            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(8.0),
                    ..default()
                })
                .with_children(|row| {
                    row.spawn((
                        Button,
                        Node {
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            padding: UiRect::all(Val::Px(6.0)),
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                        BackgroundColor(panel_bg(0.6)),
                        BorderColor::all(panel_border(0.7)),
                        BorderRadius::all(Val::Px(4.0)),
                        HudLaunchButton,
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new("Launch"),
                            medium.clone(),
                            TextColor(panel_border(0.9)),
                        ));
                    });

                    row.spawn((
                        Button,
                        Node {
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            padding: UiRect::all(Val::Px(6.0)),
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                        BackgroundColor(panel_bg(0.6)),
                        BorderColor::all(panel_border(0.4)),
                        BorderRadius::all(Val::Px(4.0)),
                        HudResetButton,
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new("Reset"),
                            medium,
                            TextColor(panel_border(0.7)),
                        ));
                    });
                });

            parent.spawn((
                Text::new("idle"),
                small,
                TextColor(color_from_hex(Colors::UI_DIM)),
                HudStatusText,
            ));
        });
}

fn handle_button_interactions(
    mut q_buttons: Query<
        (
            &Interaction,
            Option<&HudField>,
            Option<&HudLaunchButton>,
            Option<&HudResetButton>,
        ),
        (Changed<Interaction>, With<Button>),
    >,
    mut fields: ResMut<UiFields>,
    mut launch: MessageWriter<LaunchMessage>,
    mut reset: MessageWriter<ResetMessage>,
) {
    for (interaction, field, launch_button, reset_button) in &mut q_buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }

        if let Some(field) = field {
            fields.focused = Some(field.0);
        }
        if launch_button.is_some() {
            fields.focused = None;
            launch.write(LaunchMessage);
        }
        if reset_button.is_some() {
            fields.focused = None;
            reset.write(ResetMessage);
        }
    }
}

fn update_field_ui(
    fields: Res<UiFields>,
    mut q_fields: Query<(&HudField, &mut BorderColor)>,
    mut q_texts: Query<(&HudFieldText, &mut Text)>,
) {
    for (field, mut border) in &mut q_fields {
        let alpha = if fields.focused == Some(field.0) {
            0.9
        } else {
            0.4
        };
        *border = BorderColor::all(panel_border(alpha));
    }

    for (marker, mut text) in &mut q_texts {
        let buffer = fields.buffer(marker.0);
        text.0 = if fields.focused == Some(marker.0) {
            format!("{buffer}_")
        } else {
            buffer.to_string()
        };
    }
}

/// Live client-side validation of the fragment field, advisory only; the
/// burst itself still resolves any input to an in-range count.
fn update_warning_ui(
    fields: Res<UiFields>,
    mut q_warning: Query<(&mut Text, &mut Visibility), With<HudWarningText>>,
) {
    let Ok((mut text, mut visibility)) = q_warning.single_mut() else {
        return;
    };

    match live_warning(&fields.fragments) {
        Some(message) => {
            text.0 = message;
            *visibility = Visibility::Visible;
        }
        None => *visibility = Visibility::Hidden,
    }
}

fn live_warning(raw: &str) -> Option<String> {
    match raw.trim().parse::<f64>() {
        Ok(v) if (1.0..=100.0).contains(&v) => (v > 50.0).then(|| {
            format!(
                "High value ({}) may cause performance issues. Recommended: 5-50",
                v.floor() as i64
            )
        }),
        _ => Some("Please enter a value between 1 and 100".to_string()),
    }
}

fn update_status_ui(
    flight: Res<FlightControl>,
    q_fragments: Query<(), With<Fragment>>,
    mut q_status: Query<&mut Text, With<HudStatusText>>,
) {
    let Ok(mut text) = q_status.single_mut() else {
        return;
    };

    let phase = match flight.state.phase {
        LaunchPhase::Idle => "idle",
        LaunchPhase::Flying => "flying",
        LaunchPhase::Exploded => "burst",
    };
    let fragments = q_fragments.iter().count();

    text.0 = if flight.state.impact_speed > 0.0 {
        format!(
            "{phase} | fragments {fragments} | impact {:.0} px/s",
            flight.state.impact_speed
        )
    } else {
        format!("{phase} | fragments {fragments}")
    };
}

fn panel_bg(alpha: f32) -> Color {
    Color::srgba(26.0 / 255.0, 26.0 / 255.0, 46.0 / 255.0, alpha)
}

fn panel_border(alpha: f32) -> Color {
    Color::srgba(77.0 / 255.0, 166.0 / 255.0, 166.0 / 255.0, alpha)
}
