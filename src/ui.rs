//! Page overlays around the canvas
//!
//! Loading bar, start menu and the multi-step guide are plain DOM panels.
//! [`Shell`] tracks which one is visible; the host maps each screen to an
//! element id and toggles the `hidden` class.

use crate::sim::Action;

/// Number of pages in the guide
pub const GUIDE_STEPS: u8 = 3;

/// Delay between "Ready!" and the menu appearing (ms)
pub const MENU_DELAY_MS: i32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Menu,
    /// Guide page, 1-based
    Guide(u8),
    /// No overlay, canvas only
    Playing,
}

impl Screen {
    /// DOM id of the panel shown for this screen
    pub fn element_id(self) -> Option<&'static str> {
        match self {
            Screen::Loading => Some("loadingScreen"),
            Screen::Menu => Some("menuScreen"),
            Screen::Guide(_) => Some("guideScreen"),
            Screen::Playing => None,
        }
    }
}

/// Id of a guide page element
pub fn guide_step_id(step: u8) -> String {
    format!("guideStep{step}")
}

/// Overlay navigation
#[derive(Debug, Clone)]
pub struct Shell {
    screen: Screen,
}

impl Default for Shell {
    fn default() -> Self {
        Self { screen: Screen::Loading }
    }
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Sprites are loaded; the menu may be shown
    pub fn assets_ready(&mut self) {
        if self.screen == Screen::Loading {
            self.screen = Screen::Menu;
        }
    }

    /// "Play" pressed on the menu
    pub fn start(&mut self) -> Option<Action> {
        if self.screen != Screen::Menu {
            return None;
        }
        self.screen = Screen::Playing;
        Some(Action::Start)
    }

    /// "How to play" pressed on the menu
    pub fn open_guide(&mut self) {
        if self.screen == Screen::Menu {
            self.screen = Screen::Guide(1);
        }
    }

    /// Jump to guide page `step`, clamped to the valid range
    pub fn guide_step(&mut self, step: u8) {
        if let Screen::Guide(_) = self.screen {
            self.screen = Screen::Guide(step.clamp(1, GUIDE_STEPS));
        }
    }

    /// Closing the guide starts the game
    pub fn close_guide(&mut self) -> Option<Action> {
        if !matches!(self.screen, Screen::Guide(_)) {
            return None;
        }
        self.screen = Screen::Playing;
        Some(Action::Start)
    }
}

/// Text under the loading bar
pub fn loading_text(loaded: u32) -> String {
    format!("Loading assets: {loaded}")
}

/// Text shown once every sprite is in
pub fn ready_text(fish: usize, trash: usize) -> String {
    format!("Ready! {fish} fish, {trash} trash")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_start() {
        let mut shell = Shell::new();
        assert_eq!(shell.start(), None);
        shell.assets_ready();
        assert_eq!(shell.screen(), Screen::Menu);
        assert_eq!(shell.start(), Some(Action::Start));
        assert_eq!(shell.screen(), Screen::Playing);
        assert_eq!(shell.start(), None);
    }

    #[test]
    fn test_guide_flow() {
        let mut shell = Shell::new();
        shell.assets_ready();
        shell.open_guide();
        assert_eq!(shell.screen(), Screen::Guide(1));
        shell.guide_step(2);
        assert_eq!(shell.screen(), Screen::Guide(2));
        shell.guide_step(9);
        assert_eq!(shell.screen(), Screen::Guide(GUIDE_STEPS));
        assert_eq!(shell.close_guide(), Some(Action::Start));
        assert_eq!(shell.close_guide(), None);
    }

    #[test]
    fn test_ids_and_text() {
        assert_eq!(Screen::Menu.element_id(), Some("menuScreen"));
        assert_eq!(Screen::Playing.element_id(), None);
        assert_eq!(guide_step_id(2), "guideStep2");
        assert_eq!(ready_text(3, 5), "Ready! 3 fish, 5 trash");
        assert_eq!(loading_text(4), "Loading assets: 4");
    }
}
