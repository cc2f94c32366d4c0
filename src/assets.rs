//! Sprite loading with discovery and built-in fallbacks
//!
//! Fish and trash sprites are numbered files (`fish1.png`, `fish2.png`, ...)
//! requested one at a time until a few misses in a row. Anything that cannot be
//! found is replaced by an embedded SVG so a fully offline, asset-less build
//! is still playable. The loader is generic over the image handle and the
//! fetch function so the browser backend and tests share the same logic.

use std::fmt;
use std::future::Future;

use crate::sim::SpriteCounts;

/// Where sprites are looked up
#[derive(Debug, Clone, PartialEq)]
pub struct AssetConfig {
    pub ship: String,
    pub hook: String,
    /// Prefix for numbered fish sprites
    pub fish_base: String,
    /// Prefix for numbered trash sprites
    pub trash_base: String,
    /// Highest sprite number requested
    pub max_attempts: u32,
    /// Consecutive misses that end discovery
    pub max_consecutive_misses: u32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            ship: "statics/ship.png".to_string(),
            hook: "statics/hook.png".to_string(),
            fish_base: "statics/fishes/fish".to_string(),
            trash_base: "statics/trashes/trash".to_string(),
            max_attempts: 50,
            max_consecutive_misses: 3,
        }
    }
}

/// Asset could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Request failed or image could not be decoded
    NotFound { url: String },
    /// The platform refused to create an image
    Platform(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { url } => write!(f, "asset not found: {url}"),
            Self::Platform(msg) => write!(f, "platform error: {msg}"),
        }
    }
}

impl std::error::Error for AssetError {}

/// Sequential walk over numbered sprite URLs
#[derive(Debug, Clone)]
pub struct Discovery {
    base: String,
    next_index: u32,
    max_attempts: u32,
    misses_in_a_row: u32,
    max_misses: u32,
    found: usize,
}

impl Discovery {
    pub fn new(base: &str, config: &AssetConfig) -> Self {
        Self {
            base: base.to_string(),
            next_index: 1,
            max_attempts: config.max_attempts,
            misses_in_a_row: 0,
            max_misses: config.max_consecutive_misses,
            found: 0,
        }
    }

    /// Next URL to load, or `None` once discovery is over
    pub fn next_url(&mut self) -> Option<String> {
        if self.next_index > self.max_attempts || self.misses_in_a_row >= self.max_misses {
            return None;
        }
        let url = format!("{}{}.png", self.base, self.next_index);
        self.next_index += 1;
        Some(url)
    }

    pub fn record_hit(&mut self) {
        self.misses_in_a_row = 0;
        self.found += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses_in_a_row += 1;
    }

    pub fn found(&self) -> usize {
        self.found
    }
}

/// Built-in vector sprites used when nothing can be downloaded
pub mod fallback {
    pub const SHIP: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="80" height="40"><path d="M8 28 L18 12 L62 12 L72 28 Z" fill="#8B5A2B"/><rect x="16" y="14" width="48" height="6" fill="#C77C3A"/><rect x="36" y="4" width="8" height="9" fill="#5C3A1E"/></svg>"##;

    pub const HOOK: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="30" height="30"><circle cx="15" cy="8" r="3" fill="#BFBFBF"/><path d="M15 11 V22 Q15 28 10 27 Q7 26 8 22" stroke="#BFBFBF" stroke-width="2" fill="none"/></svg>"##;

    pub const FISH: [&str; 3] = [
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="60"><ellipse cx="34" cy="30" rx="20" ry="13" fill="#F28C38"/><path d="M14 30 L4 20 L4 40 Z" fill="#E0662A"/><circle cx="42" cy="26" r="2.5" fill="#1A1A1A"/></svg>"##,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="60"><ellipse cx="34" cy="30" rx="22" ry="15" fill="#3F8CD9"/><path d="M12 30 L3 19 L3 41 Z" fill="#2F6FB0"/><circle cx="44" cy="26" r="2.5" fill="#1A1A1A"/></svg>"##,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="60"><ellipse cx="34" cy="30" rx="18" ry="12" fill="#5CC274"/><path d="M16 30 L6 22 L6 38 Z" fill="#3E9E55"/><circle cx="41" cy="27" r="2.5" fill="#1A1A1A"/></svg>"##,
    ];

    pub const TRASH: [&str; 3] = [
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="60"><rect x="23" y="10" width="14" height="8" rx="2" fill="#7A4A1F"/><rect x="20" y="18" width="20" height="30" rx="3" fill="#8EDC8E" opacity="0.75"/></svg>"##,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="60"><rect x="23" y="10" width="14" height="8" rx="2" fill="#5C3A1E"/><rect x="20" y="18" width="20" height="30" rx="3" fill="#84C8EA" opacity="0.75"/></svg>"##,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="60" height="60"><rect x="18" y="20" width="24" height="26" rx="2" fill="#9E9E9E"/><rect x="18" y="18" width="24" height="4" fill="#6E6E6E"/></svg>"##,
    ];
}

/// Fallback URLs handed to the loader (already encoded by the platform)
#[derive(Debug, Clone, Default)]
pub struct FallbackUrls {
    pub ship: String,
    pub hook: String,
    pub fish: Vec<String>,
    pub trash: Vec<String>,
}

/// Loaded sprites. Ship and hook may be missing if even the fallback failed.
#[derive(Debug, Clone)]
pub struct SpriteSet<T> {
    pub ship: Option<T>,
    pub hook: Option<T>,
    pub fish: Vec<T>,
    pub trash: Vec<T>,
}

impl<T> SpriteSet<T> {
    pub fn counts(&self) -> SpriteCounts {
        SpriteCounts {
            fish: self.fish.len(),
            trash: self.trash.len(),
        }
    }
}

/// Loading-bar percentage after `loaded` successes (never shows 100 early)
pub fn progress_percent(loaded: u32) -> f32 {
    (loaded as f32 / 20.0 * 100.0).min(95.0)
}

/// Try `primary`, then `fallback`
pub async fn load_with_fallback<T, F, Fut>(
    primary: &str,
    fallback: &str,
    load: &mut F,
) -> Result<T, AssetError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, AssetError>>,
{
    match load(primary.to_string()).await {
        Ok(image) => {
            log::debug!("Loaded {primary}");
            Ok(image)
        }
        Err(e) => {
            log::warn!("{e}, using built-in sprite");
            load(fallback.to_string()).await
        }
    }
}

/// Request numbered sprites until discovery gives up; fall back to the
/// embedded set when nothing was found
pub async fn discover<T, F, Fut>(
    base: &str,
    fallbacks: &[String],
    config: &AssetConfig,
    load: &mut F,
    on_loaded: &mut dyn FnMut(),
) -> Vec<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, AssetError>>,
{
    let mut discovery = Discovery::new(base, config);
    let mut images = Vec::new();

    while let Some(url) = discovery.next_url() {
        match load(url).await {
            Ok(image) => {
                discovery.record_hit();
                images.push(image);
                on_loaded();
            }
            Err(e) => {
                log::debug!("{e}");
                discovery.record_miss();
            }
        }
    }

    if images.is_empty() {
        log::warn!("No sprites found under {base}, using built-in set");
        for url in fallbacks {
            match load(url.clone()).await {
                Ok(image) => {
                    images.push(image);
                    on_loaded();
                }
                Err(e) => log::warn!("Built-in sprite failed: {e}"),
            }
        }
    }

    images
}

/// Load ship, hook, fish and trash sprites in that order, reporting the
/// running success count after each image
pub async fn load_sprite_set<T, F, Fut>(
    config: &AssetConfig,
    fallbacks: &FallbackUrls,
    mut load: F,
    mut on_progress: impl FnMut(u32),
) -> SpriteSet<T>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<T, AssetError>>,
{
    let mut loaded = 0u32;
    let mut bump = || {
        loaded += 1;
        on_progress(loaded);
    };

    let ship = match load_with_fallback(&config.ship, &fallbacks.ship, &mut load).await {
        Ok(image) => {
            bump();
            Some(image)
        }
        Err(e) => {
            log::warn!("Ship sprite unavailable: {e}");
            None
        }
    };
    let hook = match load_with_fallback(&config.hook, &fallbacks.hook, &mut load).await {
        Ok(image) => {
            bump();
            Some(image)
        }
        Err(e) => {
            log::warn!("Hook sprite unavailable: {e}");
            None
        }
    };

    let fish = discover(&config.fish_base, &fallbacks.fish, config, &mut load, &mut bump).await;
    let trash = discover(&config.trash_base, &fallbacks.trash, config, &mut load, &mut bump).await;

    log::info!("Sprites ready: {} fish, {} trash", fish.len(), trash.len());
    SpriteSet { ship, hook, fish, trash }
}
