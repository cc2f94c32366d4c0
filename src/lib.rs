//! Ocean Clean - hook trash out of the sea, leave the fish alone
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, hook physics, game state)
//! - `input`: Keyboard and touch gestures mapped to actions
//! - `renderer`: Display list and Canvas2D backend
//! - `assets`: Sprite discovery with embedded fallbacks
//! - `pwa`: Install prompt, service-worker lifecycle and offline cache policy
//! - `platform`: Browser/native platform abstraction
//! - `settings` / `tuning`: Player preferences and data-driven game balance
//! - `ui`: Loading, menu and guide overlays

pub mod assets;
pub mod input;
pub mod platform;
pub mod pwa;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::Settings;
pub use tuning::Tuning;

/// Fixed simulation constants
pub mod consts {
    /// Canvas size used when the page reports none (and by headless runs)
    pub const DEFAULT_CANVAS: (f32, f32) = (800.0, 600.0);
    /// Frames averaged by the FPS counter
    pub const FPS_WINDOW: usize = 60;
}
