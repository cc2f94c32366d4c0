//! Simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - One step per displayed frame
//! - Seeded RNG only
//! - Stable iteration order (pool order decides capture priority)
//! - No rendering or browser dependencies

pub mod autopilot;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_action;
pub use collision::Aabb;
pub use spawn::{create_entity, level_entities};
pub use state::{Entity, EntityKind, GameMode, GameState, Hook, Ship, SpriteCounts};
pub use tick::{Action, TickInput, apply_action, tick};
