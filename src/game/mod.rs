mod ball;
mod core;
mod hud;
mod input;
mod walls;

pub use ball::BallPlugin;
pub use self::core::CorePlugin;
pub(crate) use self::core::{FixedSet, UpdateSet};
pub use hud::{FieldDefaults, HudPlugin};
pub use input::InputPlugin;
pub use walls::WallsPlugin;
