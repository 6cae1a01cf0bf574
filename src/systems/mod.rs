//! The Entity-Component-System (ECS) module.
//!
//! Components, resources and systems for the simulation, plus the window-only render systems.

pub mod animation;
pub mod collision;
pub mod components;
pub mod formatting;
pub mod input;
pub mod movement;
pub mod render;
pub mod spawn;
pub mod state;
pub mod typing;

pub use self::animation::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::input::*;
pub use self::movement::*;
pub use self::spawn::*;
pub use self::state::*;
pub use self::typing::*;
