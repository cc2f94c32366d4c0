//! Display list generation
//!
//! [`build_scene`] turns a read-only view of the game into a flat list of
//! draw commands. Painting them is left to a backend, which keeps layout and
//! draw order testable without a browser.

use std::f32::consts::PI;

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::{Aabb, EntityKind, GameMode, GameState};

/// CSS colors used by the scene
pub mod colors {
    pub const SKY: &str = "#87CEEB";
    pub const WATER: &str = "#008080";
    pub const TETHER: &str = "#fff";
    pub const TEXT: &str = "#fff";
    pub const OVERLAY: &str = "rgba(0, 0, 0, 0.7)";
    pub const FPS: &str = "#ff0";
}

/// Fonts used by the HUD and overlay
pub mod fonts {
    pub const SCORE: &str = "bold 24px Arial";
    pub const HINT: &str = "14px Arial";
    pub const TITLE: &str = "48px Arial";
    pub const BODY: &str = "24px Arial";
}

/// Fixed tilt applied to trash sprites
pub const TRASH_TILT: f32 = PI / 6.0;

/// Tether line width
pub const TETHER_WIDTH: f32 = 2.0;

pub const HINT_READY: &str = "A/D or \u{2190} \u{2192} to move | S or \u{2193} to drop hook";
pub const HINT_HOOK_OUT: &str = "W or \u{2191} to pull up hook | Catch trash, avoid fish!";

/// Which loaded image a sprite command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteRef {
    Ship,
    Hook,
    Fish(usize),
    Trash(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Value for `CanvasRenderingContext2D.textAlign`
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// One paint operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        rect: Aabb,
        color: &'static str,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: &'static str,
    },
    Sprite {
        sprite: SpriteRef,
        center: Vec2,
        size: Vec2,
        /// Radians, clockwise on screen
        rotation: f32,
        flip_x: bool,
    },
    Text {
        text: String,
        /// Baseline anchor
        pos: Vec2,
        font: &'static str,
        color: &'static str,
        align: TextAlign,
    },
}

/// Frame-level values that are not part of the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HudInfo {
    pub fps: u32,
}

/// Build the display list for the current frame
pub fn build_scene(state: &GameState, settings: &Settings, hud: HudInfo) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(state.entities.len() + 12);
    let size = state.canvas;
    let water_y = state.water_y();

    cmds.push(DrawCmd::Rect {
        rect: Aabb::from_min_size(Vec2::ZERO, Vec2::new(size.x, water_y)),
        color: colors::SKY,
    });
    cmds.push(DrawCmd::Rect {
        rect: Aabb::from_min_size(Vec2::new(0.0, water_y), Vec2::new(size.x, size.y - water_y)),
        color: colors::WATER,
    });

    if state.mode == GameMode::Idle {
        return cmds;
    }

    let ship = &state.ship;
    cmds.push(DrawCmd::Line {
        from: Vec2::new(ship.pos.x, ship.pos.y + ship.height / 2.0),
        to: state.hook.pos,
        width: TETHER_WIDTH,
        color: colors::TETHER,
    });
    cmds.push(DrawCmd::Sprite {
        sprite: SpriteRef::Ship,
        center: ship.pos,
        size: Vec2::new(ship.width, ship.height),
        rotation: 0.0,
        flip_x: false,
    });
    cmds.push(DrawCmd::Sprite {
        sprite: SpriteRef::Hook,
        center: state.hook.pos,
        size: Vec2::splat(state.hook.size),
        rotation: 0.0,
        flip_x: false,
    });

    for entity in &state.entities {
        let (sprite, rotation, flip_x) = match entity.kind {
            EntityKind::Trash => (SpriteRef::Trash(entity.sprite), TRASH_TILT, entity.direction < 0.0),
            EntityKind::Fish => (SpriteRef::Fish(entity.sprite), 0.0, entity.direction > 0.0),
        };
        cmds.push(DrawCmd::Sprite {
            sprite,
            center: entity.center(),
            size: Vec2::splat(entity.size),
            rotation,
            flip_x,
        });
    }

    push_hud(&mut cmds, state, settings, hud);

    if state.mode == GameMode::GameOver {
        push_game_over(&mut cmds, state);
    }

    cmds
}

fn push_hud(cmds: &mut Vec<DrawCmd>, state: &GameState, settings: &Settings, hud: HudInfo) {
    cmds.push(DrawCmd::Text {
        text: format!("Score: {}", state.score),
        pos: Vec2::new(10.0, 30.0),
        font: fonts::SCORE,
        color: colors::TEXT,
        align: TextAlign::Left,
    });

    if settings.show_hints && state.mode != GameMode::GameOver {
        let hint = if state.mode == GameMode::Ready {
            HINT_READY
        } else {
            HINT_HOOK_OUT
        };
        cmds.push(DrawCmd::Text {
            text: hint.to_string(),
            pos: Vec2::new(10.0, state.canvas.y - 10.0),
            font: fonts::HINT,
            color: colors::TEXT,
            align: TextAlign::Left,
        });
    }

    if settings.show_fps {
        cmds.push(DrawCmd::Text {
            text: format!("{} FPS", hud.fps),
            pos: Vec2::new(state.canvas.x - 10.0, 30.0),
            font: fonts::HINT,
            color: colors::FPS,
            align: TextAlign::Right,
        });
    }
}

fn push_game_over(cmds: &mut Vec<DrawCmd>, state: &GameState) {
    let size = state.canvas;
    let mid = size / 2.0;
    cmds.push(DrawCmd::Rect {
        rect: Aabb::from_min_size(Vec2::ZERO, size),
        color: colors::OVERLAY,
    });
    let lines = [
        ("GAME OVER".to_string(), fonts::TITLE, -40.0),
        (format!("Final Score: {}", state.score), fonts::BODY, 0.0),
        ("Press Enter to Restart".to_string(), fonts::BODY, 40.0),
    ];
    for (text, font, dy) in lines {
        cmds.push(DrawCmd::Text {
            text,
            pos: Vec2::new(mid.x, mid.y + dy),
            font,
            color: colors::TEXT,
            align: TextAlign::Center,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Entity, SpriteCounts};
    use crate::tuning::Tuning;

    fn state() -> GameState {
        GameState::new(3, Vec2::new(800.0, 600.0), Tuning::default(), SpriteCounts::default())
    }

    fn texts(cmds: &[DrawCmd]) -> Vec<&str> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn entity(kind: EntityKind, direction: f32) -> Entity {
        Entity {
            id: 1,
            kind,
            pos: Vec2::new(100.0, 300.0),
            size: 60.0,
            speed: 1.0,
            direction,
            sprite: 0,
        }
    }

    #[test]
    fn test_idle_draws_background_only() {
        let cmds = build_scene(&state(), &Settings::default(), HudInfo::default());
        assert_eq!(cmds.len(), 2);
        match &cmds[0] {
            DrawCmd::Rect { rect, color } => {
                assert_eq!(*color, colors::SKY);
                assert_eq!(rect.max, Vec2::new(800.0, 240.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_draw_order() {
        let mut s = state();
        s.reset();
        let cmds = build_scene(&s, &Settings::default(), HudInfo::default());
        assert!(matches!(cmds[2], DrawCmd::Line { .. }));
        assert!(matches!(cmds[3], DrawCmd::Sprite { sprite: SpriteRef::Ship, .. }));
        assert!(matches!(cmds[4], DrawCmd::Sprite { sprite: SpriteRef::Hook, .. }));
        let sprites = cmds.iter().filter(|c| matches!(c, DrawCmd::Sprite { .. })).count();
        assert_eq!(sprites, 2 + s.entities.len());
        assert_eq!(texts(&cmds), vec!["Score: 0", HINT_READY]);
    }

    #[test]
    fn test_hint_follows_mode() {
        let mut s = state();
        s.reset();
        s.mode = GameMode::Dropping;
        let cmds = build_scene(&s, &Settings::default(), HudInfo::default());
        assert!(texts(&cmds).contains(&HINT_HOOK_OUT));

        let quiet = Settings {
            show_hints: false,
            ..Default::default()
        };
        let cmds = build_scene(&s, &quiet, HudInfo::default());
        assert_eq!(texts(&cmds), vec!["Score: 0"]);
    }

    #[test]
    fn test_sprite_orientation() {
        let mut s = state();
        s.reset();
        s.entities = vec![
            entity(EntityKind::Trash, -1.0),
            entity(EntityKind::Trash, 1.0),
            entity(EntityKind::Fish, 1.0),
            entity(EntityKind::Fish, -1.0),
        ];
        let cmds = build_scene(&s, &Settings::default(), HudInfo::default());
        let flips: Vec<(f32, bool)> = cmds
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Sprite { sprite: SpriteRef::Trash(_) | SpriteRef::Fish(_), rotation, flip_x, center, .. } => {
                    assert_eq!(*center, Vec2::new(130.0, 330.0));
                    Some((*rotation, *flip_x))
                }
                _ => None,
            })
            .collect();
        assert_eq!(flips, vec![(TRASH_TILT, true), (TRASH_TILT, false), (0.0, true), (0.0, false)]);
    }

    #[test]
    fn test_game_over_overlay() {
        let mut s = state();
        s.reset();
        s.score = 4;
        s.mode = GameMode::GameOver;
        let cmds = build_scene(&s, &Settings::default(), HudInfo::default());
        assert_eq!(
            texts(&cmds),
            vec!["Score: 4", "GAME OVER", "Final Score: 4", "Press Enter to Restart"]
        );
        match cmds.iter().rev().nth(3) {
            Some(DrawCmd::Rect { color, .. }) => assert_eq!(*color, colors::OVERLAY),
            other => panic!("overlay missing: {other:?}"),
        }
    }

    #[test]
    fn test_fps_counter() {
        let mut s = state();
        s.reset();
        let settings = Settings {
            show_fps: true,
            ..Default::default()
        };
        let cmds = build_scene(&s, &settings, HudInfo { fps: 59 });
        assert!(texts(&cmds).contains(&"59 FPS"));
    }
}
