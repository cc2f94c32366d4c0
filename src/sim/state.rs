//! Game state and core simulation types
//!
//! Everything a session needs lives in [`GameState`]: there is no module-level
//! mutable state, so independent sessions (tests, demo mode) can coexist.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::spawn::level_entities;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Menu/guide showing, no session yet
    Idle,
    /// Hook at rest under the ship, ship can move
    Ready,
    /// Hook descending
    Dropping,
    /// Hook ascending (possibly carrying an entity)
    Pulling,
    /// A fish was landed
    GameOver,
}

impl GameMode {
    /// True while a session is being played
    pub fn is_active(self) -> bool {
        matches!(self, GameMode::Ready | GameMode::Dropping | GameMode::Pulling)
    }

    /// True while the hook is away from the ship
    pub fn hook_out(self) -> bool {
        matches!(self, GameMode::Dropping | GameMode::Pulling)
    }
}

/// Entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Must be avoided; landing one ends the run
    Fish,
    /// Scores a point when landed
    Trash,
}

/// A fish or trash item swimming across the water
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    /// Edge length (entities are square)
    pub size: f32,
    /// Horizontal speed magnitude (px per frame)
    pub speed: f32,
    /// +1.0 moving right, -1.0 moving left
    pub direction: f32,
    /// Index into the sprite collection for `kind`
    pub sprite: usize,
}

impl Entity {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_min_size(self.pos, Vec2::splat(self.size))
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size * 0.5)
    }

    /// Past the far edge in its direction of travel
    pub fn is_offscreen(&self, canvas_width: f32) -> bool {
        (self.direction > 0.0 && self.pos.x > canvas_width + self.size)
            || (self.direction < 0.0 && self.pos.x < -self.size)
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    /// Center position
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Distance per move action
    pub step: f32,
}

impl Ship {
    /// Region where a carried entity counts as landed: the hull plus the
    /// stretch of line down to the hook's rest height
    pub fn catch_aabb(&self) -> Aabb {
        let hull = Aabb::from_center(self.pos, Vec2::new(self.width, self.height));
        Aabb {
            min: hull.min,
            max: Vec2::new(hull.max.x, self.hook_anchor_y()),
        }
    }

    /// Height at which the hook rests and the tether is anchored
    pub fn hook_anchor_y(&self) -> f32 {
        self.pos.y + self.height
    }

    /// Clamp so the whole hull stays on the canvas
    pub fn clamp_x(&mut self, canvas_width: f32) {
        let half = self.width / 2.0;
        let max = (canvas_width - half).max(half);
        self.pos.x = self.pos.x.clamp(half, max);
    }
}

/// The hook on its tether
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hook {
    /// Center position
    pub pos: Vec2,
    /// Edge length, follows the score
    pub size: f32,
    /// Vertical speed (px per frame)
    pub speed: f32,
    /// Entity currently carried (by id, non-owning)
    pub attached: Option<u32>,
}

impl Hook {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size))
    }
}

/// Number of sprites available per entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteCounts {
    pub fish: usize,
    pub trash: usize,
}

impl SpriteCounts {
    pub fn for_kind(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Fish => self.fish,
            EntityKind::Trash => self.trash,
        }
    }
}

impl Default for SpriteCounts {
    fn default() -> Self {
        Self { fish: 1, trash: 1 }
    }
}

/// Complete simulation context for one player
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Balance constants
    pub tuning: Tuning,
    /// Canvas size in CSS pixels
    pub canvas: Vec2,
    pub sprites: SpriteCounts,
    pub mode: GameMode,
    pub score: u32,
    pub ship: Ship,
    pub hook: Hook,
    /// Live entity pool (iteration order is capture priority)
    pub entities: Vec<Entity>,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl GameState {
    /// Create an idle state; call [`GameState::reset`] to start playing
    pub fn new(seed: u64, canvas: Vec2, tuning: Tuning, sprites: SpriteCounts) -> Self {
        let ship = Self::spawn_ship(&tuning, canvas);
        let hook = Hook {
            pos: Vec2::new(ship.pos.x, ship.hook_anchor_y()),
            size: tuning.hook_size(0),
            speed: tuning.hook_speed,
            attached: None,
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            canvas,
            sprites,
            mode: GameMode::Idle,
            score: 0,
            ship,
            hook,
            entities: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        }
    }

    fn spawn_ship(tuning: &Tuning, canvas: Vec2) -> Ship {
        Ship {
            pos: Vec2::new(
                canvas.x / 2.0,
                canvas.y * tuning.water_line - tuning.ship_height / 2.0,
            ),
            width: tuning.ship_width,
            height: tuning.ship_height,
            step: tuning.ship_step,
        }
    }

    /// Start a fresh session: score 0, new ship and hook, leveled pool
    pub fn reset(&mut self) {
        self.score = 0;
        self.mode = GameMode::Ready;
        self.ship = Self::spawn_ship(&self.tuning, self.canvas);
        self.hook = Hook {
            pos: Vec2::new(self.ship.pos.x, self.ship.hook_anchor_y()),
            size: self.tuning.hook_size(0),
            speed: self.tuning.hook_speed,
            attached: None,
        };
        self.entities.clear();
        level_entities(self);
        log::info!(
            "New session: {} trash, {} fish",
            self.count_of(EntityKind::Trash),
            self.count_of(EntityKind::Fish)
        );
    }

    /// Canvas size changed. Repositions the ship, never changes the mode.
    pub fn resize(&mut self, canvas: Vec2) {
        self.canvas = canvas;
        if self.mode == GameMode::Idle {
            return;
        }
        self.ship.pos.y = canvas.y * self.tuning.water_line - self.ship.height / 2.0;
        self.ship.clamp_x(canvas.x);
        if self.mode == GameMode::Ready {
            self.hook.pos = Vec2::new(self.ship.pos.x, self.ship.hook_anchor_y());
        }
    }

    /// Move the ship by `dir` steps, clamped to the canvas
    pub fn move_ship(&mut self, dir: f32) {
        self.ship.pos.x += dir * self.ship.step;
        self.ship.clamp_x(self.canvas.x);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Split borrow used by the update step
    pub(crate) fn entities_and_rng(&mut self) -> (&mut Vec<Entity>, &mut Pcg32) {
        (&mut self.entities, &mut self.rng)
    }

    /// The entity the hook carries, if it is still in the pool
    pub fn attached_entity(&self) -> Option<&Entity> {
        let id = self.hook.attached?;
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn is_attached(&self, id: u32) -> bool {
        self.hook.attached == Some(id)
    }

    /// Live entities of one kind
    pub fn count_of(&self, kind: EntityKind) -> usize {
        self.entities.iter().filter(|e| e.kind == kind).count()
    }

    /// Current hook edge length for the score
    pub fn hook_size(&self) -> f32 {
        self.tuning.hook_size(self.score)
    }

    /// Height of the water surface
    pub fn water_y(&self) -> f32 {
        self.canvas.y * self.tuning.water_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_800x600() -> GameState {
        GameState::new(7, Vec2::new(800.0, 600.0), Tuning::default(), SpriteCounts::default())
    }

    #[test]
    fn test_new_state_is_idle_and_empty() {
        let state = state_800x600();
        assert_eq!(state.mode, GameMode::Idle);
        assert!(state.entities.is_empty());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_reset_layout() {
        let mut state = state_800x600();
        state.reset();
        assert_eq!(state.mode, GameMode::Ready);
        assert_eq!(state.ship.width, 80.0);
        assert_eq!(state.ship.pos, Vec2::new(400.0, 220.0));
        assert_eq!(state.hook.pos, Vec2::new(400.0, 260.0));
        assert!((state.hook.size - 24.0).abs() < 1e-4);
        assert_eq!(state.count_of(EntityKind::Trash), 10);
        assert_eq!(state.count_of(EntityKind::Fish), 5);
    }

    #[test]
    fn test_move_ship_clamps() {
        let mut state = state_800x600();
        state.reset();
        for _ in 0..200 {
            state.move_ship(-1.0);
        }
        assert_eq!(state.ship.pos.x, 40.0);
        for _ in 0..200 {
            state.move_ship(1.0);
        }
        assert_eq!(state.ship.pos.x, 760.0);
    }

    #[test]
    fn test_resize_keeps_mode() {
        let mut state = state_800x600();
        state.reset();
        state.mode = GameMode::Dropping;
        state.ship.pos.x = 780.0;
        state.resize(Vec2::new(400.0, 1000.0));
        assert_eq!(state.mode, GameMode::Dropping);
        assert_eq!(state.ship.pos.y, 380.0);
        assert_eq!(state.ship.pos.x, 360.0);
    }

    #[test]
    fn test_resize_moves_resting_hook() {
        let mut state = state_800x600();
        state.reset();
        state.resize(Vec2::new(800.0, 1000.0));
        assert_eq!(state.hook.pos.y, state.ship.hook_anchor_y());
    }

    #[test]
    fn test_catch_box_reaches_hook_rest() {
        let mut state = state_800x600();
        state.reset();
        let catch = state.ship.catch_aabb();
        assert_eq!(catch.min, Vec2::new(360.0, 200.0));
        assert_eq!(catch.max, Vec2::new(440.0, state.ship.hook_anchor_y()));
    }

    #[test]
    fn test_dangling_attachment_is_none() {
        let mut state = state_800x600();
        state.reset();
        state.hook.attached = Some(9999);
        assert!(state.attached_entity().is_none());
    }
}
