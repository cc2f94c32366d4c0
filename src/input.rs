//! Input routing
//!
//! Keyboard and touch gestures are normalized into the same [`Action`]
//! vocabulary. The router only tracks gesture bookkeeping (tap times, drag
//! anchor, held touch); the state machine decides whether an action applies.
//!
//! A held touch is not timed by a separate timer: the frame loop calls
//! [`InputRouter::sample_hold`] once per frame with the frame timestamp.

use crate::settings::TouchSettings;
use crate::sim::{Action, GameMode};

/// Game-relevant keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Down,
    Up,
    Enter,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value (letters case-insensitive)
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "ArrowDown" => Some(Key::Down),
            "ArrowUp" => Some(Key::Up),
            "Enter" => Some(Key::Enter),
            _ if key.len() == 1 => match key.to_ascii_lowercase().as_str() {
                "a" => Some(Key::Left),
                "d" => Some(Key::Right),
                "s" => Some(Key::Down),
                "w" => Some(Key::Up),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Keyboard and touch gesture state
#[derive(Debug, Clone)]
pub struct InputRouter {
    config: TouchSettings,
    touching: bool,
    /// Drag anchor, re-based after every move step
    anchor_x: f32,
    touch_start_ms: f64,
    /// Time of the last lone tap (0 = none pending)
    last_tap_ms: f64,
}

impl InputRouter {
    pub fn new(config: TouchSettings) -> Self {
        Self {
            config,
            touching: false,
            anchor_x: 0.0,
            touch_start_ms: 0.0,
            last_tap_ms: 0.0,
        }
    }

    /// Forget any gesture in progress
    pub fn reset(&mut self) {
        self.touching = false;
        self.last_tap_ms = 0.0;
    }

    pub fn is_touching(&self) -> bool {
        self.touching
    }

    /// Key pressed (auto-repeat included)
    pub fn key_down(&mut self, key: Key, mode: GameMode) -> Option<Action> {
        match (key, mode) {
            (Key::Left, GameMode::Ready) => Some(Action::MoveLeft),
            (Key::Right, GameMode::Ready) => Some(Action::MoveRight),
            (Key::Down, GameMode::Ready) => Some(Action::Drop),
            (Key::Up, GameMode::Dropping | GameMode::Pulling) => Some(Action::PullStart),
            (Key::Enter, GameMode::GameOver) => Some(Action::Restart),
            _ => None,
        }
    }

    /// Key released
    pub fn key_up(&mut self, key: Key) -> Option<Action> {
        (key == Key::Up).then_some(Action::PullEnd)
    }

    /// First finger down at canvas-relative `x`
    pub fn touch_start(&mut self, x: f32, now_ms: f64, mode: GameMode) -> Option<Action> {
        if !mode.is_active() {
            return None;
        }
        self.touching = true;
        self.anchor_x = x;
        self.touch_start_ms = now_ms;

        let gap = now_ms - self.last_tap_ms;
        if self.last_tap_ms > 0.0 && gap > 0.0 && gap < self.config.double_tap_ms {
            self.last_tap_ms = 0.0;
            (mode == GameMode::Ready).then_some(Action::Drop)
        } else {
            self.last_tap_ms = now_ms;
            None
        }
    }

    /// Finger moved to canvas-relative `x`
    pub fn touch_move(&mut self, x: f32, mode: GameMode) -> Option<Action> {
        if !self.touching || mode != GameMode::Ready {
            return None;
        }
        let delta = x - self.anchor_x;
        if delta.abs() < self.config.swipe_threshold_px {
            return None;
        }
        self.anchor_x = x;
        Some(if delta > 0.0 { Action::MoveRight } else { Action::MoveLeft })
    }

    /// Finger lifted
    pub fn touch_end(&mut self) -> Option<Action> {
        self.touching = false;
        Some(Action::PullEnd)
    }

    /// Per-frame check for a long press while the hook is out
    pub fn sample_hold(&self, now_ms: f64, mode: GameMode) -> Option<Action> {
        let held = self.touching && now_ms - self.touch_start_ms > self.config.hold_ms;
        (held && mode.hook_out()).then_some(Action::PullStart)
    }
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(TouchSettings::default())
    }
}
