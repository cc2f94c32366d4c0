//! Demo-mode player
//!
//! Produces the same actions a human would. Leads moving trash, drops when
//! the column under the hook is clear, and reels in when a fish is about to
//! cross the hook.

use std::cmp::Ordering;

use glam::Vec2;

use super::collision::Aabb;
use super::state::{Entity, EntityKind, GameMode, GameState};
use super::tick::Action;

/// How many frames ahead fish movement is extrapolated
const LOOKAHEAD_FRAMES: f32 = 30.0;

/// Where the entity's center will be after `frames`
fn predicted_center(entity: &Entity, frames: f32) -> Vec2 {
    entity.center() + Vec2::new(entity.speed * entity.direction * frames, 0.0)
}

/// Box swept by an entity over the lookahead window
fn swept_aabb(entity: &Entity) -> Aabb {
    let now = entity.aabb();
    let shift = Vec2::new(entity.speed * entity.direction * LOOKAHEAD_FRAMES, 0.0);
    Aabb {
        min: now.min.min(now.min + shift),
        max: now.max.max(now.max + shift),
    }
}

/// A fish will meet the hook (or the stretch right below it) soon
fn fish_threatens(state: &GameState) -> bool {
    let hook = state.hook.aabb();
    let zone = Aabb {
        min: hook.min,
        max: hook.max + Vec2::new(0.0, state.hook.speed * LOOKAHEAD_FRAMES),
    };
    state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Fish && !state.is_attached(e.id))
        .any(|e| swept_aabb(e).overlaps(&zone))
}

/// Horizontal position to wait at for the best trash target
fn trash_intercept_x(state: &GameState) -> Option<f32> {
    let hook_y = state.hook.pos.y;
    let width = state.canvas.x;
    let ship_x = state.ship.pos.x;

    state
        .entities
        .iter()
        .filter(|e| e.kind == EntityKind::Trash)
        .map(|e| {
            let frames = ((e.center().y - hook_y) / state.hook.speed).max(0.0);
            predicted_center(e, frames).x
        })
        .filter(|x| *x > 0.0 && *x < width)
        .min_by(|a, b| {
            (a - ship_x)
                .abs()
                .partial_cmp(&(b - ship_x).abs())
                .unwrap_or(Ordering::Equal)
        })
}

/// Next action for an unattended session, if any
pub fn autopilot_action(state: &GameState) -> Option<Action> {
    match state.mode {
        GameMode::Idle => None,
        GameMode::GameOver => Some(Action::Restart),
        GameMode::Ready => {
            let target = trash_intercept_x(state)?;
            let dx = target - state.ship.pos.x;
            if dx.abs() > state.ship.step {
                Some(if dx < 0.0 { Action::MoveLeft } else { Action::MoveRight })
            } else if fish_threatens(state) {
                None
            } else {
                Some(Action::Drop)
            }
        }
        GameMode::Dropping => fish_threatens(state).then_some(Action::PullStart),
        GameMode::Pulling => {
            let reeling_nothing = state.hook.attached.is_none();
            (reeling_nothing && !fish_threatens(state)).then_some(Action::PullEnd)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SpriteCounts;
    use crate::sim::tick::{TickInput, tick};
    use crate::tuning::Tuning;

    fn ready_state() -> GameState {
        let mut state = GameState::new(
            42,
            Vec2::new(800.0, 600.0),
            Tuning::default(),
            SpriteCounts::default(),
        );
        state.reset();
        state
    }

    fn still(id: u32, kind: EntityKind, x: f32, y: f32) -> Entity {
        Entity {
            id,
            kind,
            pos: Vec2::new(x, y),
            size: 60.0,
            speed: 0.0,
            direction: 1.0,
            sprite: 0,
        }
    }

    #[test]
    fn test_steers_toward_trash() {
        let mut state = ready_state();
        state.entities = vec![still(1, EntityKind::Trash, 100.0, 400.0)];
        assert_eq!(autopilot_action(&state), Some(Action::MoveLeft));
        state.entities = vec![still(1, EntityKind::Trash, 600.0, 400.0)];
        assert_eq!(autopilot_action(&state), Some(Action::MoveRight));
    }

    #[test]
    fn test_drops_when_aligned_and_clear() {
        let mut state = ready_state();
        state.entities = vec![still(1, EntityKind::Trash, 370.0, 400.0)];
        assert_eq!(autopilot_action(&state), Some(Action::Drop));
    }

    #[test]
    fn test_waits_when_fish_below() {
        let mut state = ready_state();
        state.entities = vec![
            still(1, EntityKind::Trash, 370.0, 450.0),
            still(2, EntityKind::Fish, 370.0, 270.0),
        ];
        assert_eq!(autopilot_action(&state), None);
    }

    #[test]
    fn test_pulls_away_from_fish() {
        let mut state = ready_state();
        state.mode = GameMode::Dropping;
        state.hook.pos.y = 350.0;
        state.entities = vec![still(2, EntityKind::Fish, 370.0, 370.0)];
        assert_eq!(autopilot_action(&state), Some(Action::PullStart));

        state.mode = GameMode::Pulling;
        assert_eq!(autopilot_action(&state), None);
        state.entities.clear();
        assert_eq!(autopilot_action(&state), Some(Action::PullEnd));
    }

    #[test]
    fn test_restarts_after_game_over() {
        let mut state = ready_state();
        state.mode = GameMode::GameOver;
        assert_eq!(autopilot_action(&state), Some(Action::Restart));
    }

    #[test]
    fn test_demo_session_keeps_running() {
        let mut state = ready_state();
        let input = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..20_000 {
            tick(&mut state, &input);
            assert!(state.mode.is_active() || state.mode == GameMode::GameOver);
            assert!(state.ship.pos.x >= 40.0 && state.ship.pos.x <= 760.0);
        }
    }
}
