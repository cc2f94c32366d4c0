//! Rendering module
//!
//! The scene builder is platform independent; the Canvas2D painter only
//! exists on wasm32.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{DrawCmd, HudInfo, SpriteRef, TextAlign, build_scene};
