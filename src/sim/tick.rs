//! Per-frame simulation step
//!
//! `tick` first applies the actions routed since the previous frame, then
//! advances hook and entities and resolves captures and catches.

use super::autopilot::autopilot_action;
use super::spawn::{level_entities, recycle_entity};
use super::state::{EntityKind, GameMode, GameState};

/// Transition vocabulary shared by keyboard, touch and the autopilot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Leave the menu and start the first session
    Start,
    MoveLeft,
    MoveRight,
    /// Release the hook
    Drop,
    /// Begin reeling in
    PullStart,
    /// Stop reeling in
    PullEnd,
    /// New session after a game over
    Restart,
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Actions in arrival order
    pub actions: Vec<Action>,
    /// Idle/demo mode - the autopilot plays
    pub idle_mode: bool,
}

/// Apply one action to the state machine. Actions that make no sense in the
/// current mode are ignored.
pub fn apply_action(state: &mut GameState, action: Action) {
    match (state.mode, action) {
        (GameMode::Idle, Action::Start) | (GameMode::GameOver, Action::Restart) => {
            state.reset();
        }
        (GameMode::Ready, Action::MoveLeft) => state.move_ship(-1.0),
        (GameMode::Ready, Action::MoveRight) => state.move_ship(1.0),
        (GameMode::Ready, Action::Drop) => state.mode = GameMode::Dropping,
        (GameMode::Dropping | GameMode::Pulling, Action::PullStart) => {
            state.mode = GameMode::Pulling;
        }
        (GameMode::Pulling, Action::PullEnd) if state.hook.attached.is_none() => {
            state.mode = GameMode::Dropping;
        }
        (mode, action) => log::trace!("Ignored {action:?} in {mode:?}"),
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    for &action in &input.actions {
        apply_action(state, action);
    }
    if input.idle_mode {
        if let Some(action) = autopilot_action(state) {
            apply_action(state, action);
        }
    }

    if !state.mode.is_active() {
        return;
    }

    state.time_ticks += 1;
    state.hook.size = state.hook_size();
    state.hook.pos.x = state.ship.pos.x;
    let rest_y = state.ship.hook_anchor_y();

    match state.mode {
        GameMode::Ready => {
            state.hook.pos.y = rest_y;
            advance_entities(state);
            return;
        }
        GameMode::Pulling => {
            state.hook.pos.y -= state.hook.speed;
            if state.hook.pos.y <= rest_y {
                state.hook.pos.y = rest_y;
                if state.hook.attached.is_none() {
                    state.mode = GameMode::Ready;
                }
            }
            carry_attached(state);
        }
        GameMode::Dropping => {
            state.hook.pos.y = (state.hook.pos.y + state.hook.speed).min(state.canvas.y);
        }
        GameMode::Idle | GameMode::GameOver => return,
    }

    advance_entities(state);
    resolve_catch(state);
    if state.mode.hook_out() {
        try_capture(state);
    }
}

/// Move every free entity horizontally, recycling those that left the screen
fn advance_entities(state: &mut GameState) {
    let attached = state.hook.attached;
    let score = state.score;
    let width = state.canvas.x;
    let sprites = state.sprites;
    let tuning = state.tuning.clone();
    let (entities, rng) = state.entities_and_rng();

    for entity in entities.iter_mut().filter(|e| Some(e.id) != attached) {
        entity.pos.x += entity.speed * entity.direction;
        if entity.is_offscreen(width) {
            recycle_entity(entity, rng, &tuning, score, width, sprites.for_kind(entity.kind));
        }
    }
}

/// Hang the carried entity just above the hook
fn carry_attached(state: &mut GameState) {
    let Some(id) = state.hook.attached else {
        return;
    };
    let hook_pos = state.hook.pos;
    match state.entities.iter_mut().find(|e| e.id == id) {
        Some(entity) => {
            entity.pos.x = hook_pos.x - entity.size / 2.0;
            entity.pos.y = hook_pos.y - entity.size;
        }
        None => {
            log::warn!("Hook referenced missing entity {id}, releasing");
            state.hook.attached = None;
        }
    }
}

/// Land the carried entity once it reaches the ship
fn resolve_catch(state: &mut GameState) {
    let Some(entity) = state.attached_entity() else {
        return;
    };
    if !entity.aabb().overlaps(&state.ship.catch_aabb()) {
        return;
    }
    let (id, kind) = (entity.id, entity.kind);

    match kind {
        EntityKind::Trash => {
            state.score += 1;
            state.entities.retain(|e| e.id != id);
            state.hook.attached = None;
            state.mode = GameMode::Ready;
            log::info!("Trash landed, score {}", state.score);
            level_entities(state);
        }
        EntityKind::Fish => {
            state.mode = GameMode::GameOver;
            log::info!("Fish landed, game over at score {}", state.score);
        }
    }
}

/// Attach the first free entity (in pool order) touching the hook
fn try_capture(state: &mut GameState) {
    if state.hook.attached.is_some() {
        return;
    }
    let hook_box = state.hook.aabb();
    if let Some(entity) = state.entities.iter().find(|e| e.aabb().overlaps(&hook_box)) {
        log::debug!("Hooked {:?} #{}", entity.kind, entity.id);
        state.hook.attached = Some(entity.id);
        state.mode = GameMode::Pulling;
    }
}
