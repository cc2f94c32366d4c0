//! Player preferences
//!
//! Persisted separately from balance overrides in LocalStorage.

use serde::{Deserialize, Serialize};

/// Touch gesture thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchSettings {
    /// Max gap between two taps that still counts as a double tap (ms)
    pub double_tap_ms: f64,
    /// A touch held longer than this starts reeling in (ms)
    pub hold_ms: f64,
    /// Horizontal drag distance that moves the ship one step (px)
    pub swipe_threshold_px: f32,
}

impl Default for TouchSettings {
    fn default() -> Self {
        Self {
            double_tap_ms: 300.0,
            hold_ms: 300.0,
            swipe_threshold_px: 5.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === HUD ===
    /// Show control hints along the bottom edge
    pub show_hints: bool,
    /// Show FPS counter
    pub show_fps: bool,

    // === Input ===
    pub touch: TouchSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_hints: true,
            show_fps: false,
            touch: TouchSettings::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "ocean_clean_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
