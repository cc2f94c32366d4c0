//! Entity factory and pool leveling
//!
//! The pool is kept at score-dependent target counts per kind. Surplus entities
//! are trimmed in pool order, deficits are filled with fresh spawns.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Entity, EntityKind, GameState};
use crate::tuning::Tuning;

/// Pick an entering side: returns `(direction, x)` for an entity of `size`
fn entering_edge(rng: &mut Pcg32, size: f32, canvas_width: f32) -> (f32, f32) {
    if rng.random_bool(0.5) {
        (1.0, -size)
    } else {
        (-1.0, canvas_width + size)
    }
}

fn random_speed(rng: &mut Pcg32, tuning: &Tuning, score: u32) -> f32 {
    rng.random_range(tuning.speed_jitter_min..tuning.speed_jitter_max) * tuning.speed_factor(score)
}

fn random_sprite(rng: &mut Pcg32, count: usize) -> usize {
    if count == 0 { 0 } else { rng.random_range(0..count) }
}

/// Create a new entity entering from a random side of the water
pub fn create_entity(state: &mut GameState, kind: EntityKind) -> Entity {
    let id = state.next_entity_id();
    let score = state.score;
    let size = state.tuning.entity_size(score);
    let canvas = state.canvas;
    let water_y = state.water_y();
    let depth_span = (canvas.y * (1.0 - state.tuning.water_line) - size).max(0.0);
    let sprite_count = state.sprites.for_kind(kind);
    let tuning = state.tuning.clone();

    let rng = state.rng();
    let (direction, x) = entering_edge(rng, size, canvas.x);
    let y = water_y + rng.random::<f32>() * depth_span;
    let speed = random_speed(rng, &tuning, score);
    let sprite = random_sprite(rng, sprite_count);

    Entity {
        id,
        kind,
        pos: Vec2::new(x, y),
        size,
        speed,
        direction,
        sprite,
    }
}

/// Send an entity that left the screen back in from a fresh random side,
/// with a fresh speed and sprite. Keeps its depth and size.
pub(crate) fn recycle_entity(
    entity: &mut Entity,
    rng: &mut Pcg32,
    tuning: &Tuning,
    score: u32,
    canvas_width: f32,
    sprite_count: usize,
) {
    let (direction, x) = entering_edge(rng, entity.size, canvas_width);
    entity.direction = direction;
    entity.pos.x = x;
    entity.speed = random_speed(rng, tuning, score);
    entity.sprite = random_sprite(rng, sprite_count);
}

/// Level the pool to the current score's targets.
///
/// The attached entity always survives trimming and counts toward its
/// kind's quota.
pub fn level_entities(state: &mut GameState) {
    let score = state.score;
    let trash_target = state.tuning.trash_target(score);
    let fish_target = state.tuning.fish_target(score);
    let target_for = |kind: EntityKind| match kind {
        EntityKind::Fish => fish_target,
        EntityKind::Trash => trash_target,
    };

    let attached = state.hook.attached;
    let attached_kind = state.attached_entity().map(|e| e.kind);
    let mut kept_fish = 0usize;
    let mut kept_trash = 0usize;
    let before = state.entities.len();

    state.entities.retain(|e| {
        if Some(e.id) == attached {
            return true;
        }
        let reserved = usize::from(attached_kind == Some(e.kind));
        let kept = match e.kind {
            EntityKind::Fish => &mut kept_fish,
            EntityKind::Trash => &mut kept_trash,
        };
        if *kept + reserved < target_for(e.kind) {
            *kept += 1;
            true
        } else {
            false
        }
    });
    let trimmed = before - state.entities.len();

    let mut spawned = 0;
    for kind in [EntityKind::Trash, EntityKind::Fish] {
        let have = state.count_of(kind);
        for _ in have..target_for(kind) {
            let entity = create_entity(state, kind);
            state.entities.push(entity);
            spawned += 1;
        }
    }

    if trimmed > 0 || spawned > 0 {
        log::debug!(
            "Pool leveled at score {score}: -{trimmed} +{spawned} (trash {trash_target}, fish {fish_target})"
        );
    }
}
