//! Progressive Web App lifecycle
//!
//! The browser fires install and service-worker events whenever it likes. The
//! host forwards each one to a hook on these small state machines, which
//! decide what the page should show. The offline cache policy lives here as
//! well and is exported to the worker script on wasm32.

/// Cache name; bump on every release so old caches get purged
pub const CACHE_VERSION: &str = "oclean-v2";

/// Message that tells a waiting worker to activate immediately
pub const SKIP_WAITING: &str = "SKIP_WAITING";

/// App shell fetched into the cache when the worker installs. Sprites are
/// discovered at runtime and land in the cache through the cache-first fetch.
pub const PRECACHE_MANIFEST: &[&str] = &[
    "./",
    "./index.html",
    "./manifest.json",
    "./ocean-clean.js",
    "./ocean-clean_bg.wasm",
];

/// How the worker answers an intercepted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPlan {
    /// Serve from cache, else fetch and store the response
    CacheFirst,
    /// Pass straight through to the network
    NetworkOnly,
}

/// Only idempotent GETs over http(s) are cached
pub fn fetch_plan(method: &str, url: &str) -> FetchPlan {
    let cacheable_scheme = url.starts_with("http://") || url.starts_with("https://") || url.starts_with("./");
    if method.eq_ignore_ascii_case("GET") && cacheable_scheme {
        FetchPlan::CacheFirst
    } else {
        FetchPlan::NetworkOnly
    }
}

/// Caches left behind by previous versions
pub fn stale_caches<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    names.into_iter().filter(|name| *name != CACHE_VERSION).collect()
}

/// Install affordance state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallState {
    /// Browser has not offered installation
    #[default]
    Unavailable,
    /// A deferred prompt is held and can be shown
    Available,
    /// Prompt is on screen, waiting for the user's choice
    Prompting,
    /// App installed
    Installed,
}

/// What the host should do when the install button is pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallRequest {
    /// Show the deferred browser prompt
    ShowPrompt,
    /// Tell the player why nothing happens
    Unavailable(&'static str),
}

/// Message shown when installation is requested but not offered
pub const INSTALL_UNAVAILABLE: &str =
    "Install not available. Please use Chrome, Edge, or Safari to install this app.";

/// Install prompt handler driven by browser hooks
#[derive(Debug, Clone, Default)]
pub struct InstallPrompt {
    state: InstallState,
}

impl InstallPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InstallState {
        self.state
    }

    /// Whether the install button should be visible
    pub fn button_visible(&self) -> bool {
        self.state == InstallState::Available
    }

    /// `beforeinstallprompt`: the browser deferred a prompt for us
    pub fn on_before_install_prompt(&mut self) {
        if self.state != InstallState::Installed {
            log::info!("Install prompt available");
            self.state = InstallState::Available;
        }
    }

    /// Player pressed the install button
    pub fn request_install(&mut self) -> InstallRequest {
        match self.state {
            InstallState::Available => {
                self.state = InstallState::Prompting;
                InstallRequest::ShowPrompt
            }
            _ => InstallRequest::Unavailable(INSTALL_UNAVAILABLE),
        }
    }

    /// The deferred prompt resolved; it cannot be reused either way
    pub fn on_user_choice(&mut self, accepted: bool) {
        log::info!("Install prompt outcome: {}", if accepted { "accepted" } else { "dismissed" });
        if self.state == InstallState::Prompting {
            self.state = InstallState::Unavailable;
        }
    }

    /// `appinstalled`
    pub fn on_app_installed(&mut self) {
        log::info!("App installed");
        self.state = InstallState::Installed;
    }
}

/// Service worker states as reported by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    Redundant,
}

/// Registration progress and update detection
#[derive(Debug, Clone, Default)]
pub struct WorkerLifecycle {
    update_waiting: bool,
    supported: bool,
}

impl WorkerLifecycle {
    pub fn new(supported: bool) -> Self {
        Self {
            supported,
            ..Default::default()
        }
    }

    pub fn supported(&self) -> bool {
        self.supported
    }

    pub fn update_waiting(&self) -> bool {
        self.update_waiting
    }

    pub fn on_registered(&mut self, scope: &str) {
        log::info!("Service worker registered: {scope}");
    }

    pub fn on_registration_failed(&mut self, reason: &str) {
        log::warn!("Service worker registration failed: {reason}");
    }

    /// A new worker changed state. Returns true when it just became a
    /// waiting update, i.e. installed while another worker controls the page.
    pub fn on_state_change(&mut self, state: WorkerState, page_controlled: bool) -> bool {
        match state {
            WorkerState::Installed if page_controlled && !self.update_waiting => {
                log::info!("New version available");
                self.update_waiting = true;
                true
            }
            WorkerState::Activated => {
                self.update_waiting = false;
                false
            }
            _ => false,
        }
    }
}

/// Exports consumed by the service-worker script
#[cfg(target_arch = "wasm32")]
mod bindings {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen]
    pub fn cache_version() -> String {
        super::CACHE_VERSION.to_string()
    }

    #[wasm_bindgen]
    pub fn precache_manifest() -> js_sys::Array {
        super::PRECACHE_MANIFEST
            .iter()
            .map(|path| JsValue::from_str(path))
            .collect()
    }

    #[wasm_bindgen]
    pub fn is_stale_cache(name: &str) -> bool {
        !super::stale_caches([name]).is_empty()
    }

    #[wasm_bindgen]
    pub fn cache_first(method: &str, url: &str) -> bool {
        super::fetch_plan(method, url) == super::FetchPlan::CacheFirst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_unavailable_message() {
        let mut prompt = InstallPrompt::new();
        assert!(!prompt.button_visible());
        assert_eq!(prompt.request_install(), InstallRequest::Unavailable(INSTALL_UNAVAILABLE));
    }

    #[test]
    fn test_install_prompt_flow() {
        let mut prompt = InstallPrompt::new();
        prompt.on_before_install_prompt();
        assert!(prompt.button_visible());
        assert_eq!(prompt.request_install(), InstallRequest::ShowPrompt);
        assert!(!prompt.button_visible());
        // A second press while the prompt is up does nothing useful
        assert!(matches!(prompt.request_install(), InstallRequest::Unavailable(_)));
        prompt.on_user_choice(false);
        assert_eq!(prompt.state(), InstallState::Unavailable);
    }

    #[test]
    fn test_installed_is_sticky() {
        let mut prompt = InstallPrompt::new();
        prompt.on_app_installed();
        prompt.on_before_install_prompt();
        assert_eq!(prompt.state(), InstallState::Installed);
        assert!(!prompt.button_visible());
    }

    #[test]
    fn test_update_detection() {
        let mut sw = WorkerLifecycle::new(true);
        assert!(sw.supported());
        sw.on_registered("/");
        // First install: nothing controls the page yet
        assert!(!sw.on_state_change(WorkerState::Installed, false));
        assert!(sw.on_state_change(WorkerState::Installed, true));
        assert!(sw.update_waiting());
        assert!(!sw.on_state_change(WorkerState::Installed, true));
        sw.on_state_change(WorkerState::Activated, true);
        assert!(!sw.update_waiting());
    }

    #[test]
    fn test_cache_policy() {
        assert_eq!(fetch_plan("GET", "https://example.com/statics/ship.png"), FetchPlan::CacheFirst);
        assert_eq!(fetch_plan("get", "./index.html"), FetchPlan::CacheFirst);
        assert_eq!(fetch_plan("POST", "https://example.com/api"), FetchPlan::NetworkOnly);
        assert_eq!(fetch_plan("GET", "chrome-extension://abc/x.js"), FetchPlan::NetworkOnly);
    }

    #[test]
    fn test_stale_caches() {
        let names = ["oclean", CACHE_VERSION, "oclean-v1"];
        assert_eq!(stale_caches(names), vec!["oclean", "oclean-v1"]);
        assert!(stale_caches([CACHE_VERSION]).is_empty());
    }

    #[test]
    fn test_manifest_entries_ship_with_the_build() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
        let bundle_js = format!("./{}.js", env!("CARGO_PKG_NAME"));
        let bundle_wasm = format!("./{}_bg.wasm", env!("CARGO_PKG_NAME"));
        // The bundle is emitted by the build under unhashed names
        let trunk = std::fs::read_to_string(root.join("Trunk.toml")).unwrap();
        assert!(trunk.contains("filehash = false"));
        assert!(PRECACHE_MANIFEST.contains(&bundle_js.as_str()));
        assert!(PRECACHE_MANIFEST.contains(&bundle_wasm.as_str()));

        for &path in PRECACHE_MANIFEST {
            if path == bundle_js || path == bundle_wasm {
                continue;
            }
            let source = match path {
                "./" | "./index.html" => root.join("index.html"),
                "./manifest.json" => root.join("web/manifest.json"),
                other => root.join(other.trim_start_matches("./")),
            };
            assert!(source.is_file(), "{path} has no source at {}", source.display());
        }
    }
}
