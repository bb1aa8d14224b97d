//! Session state
//!
//! A session owns every entity of one run. It is created when the game
//! overlay opens and thrown away on reset or close.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arena::{Camera, Obstacle, clamp_to_world, generate_layout};
use super::entity::{DropItem, Enemy, ItemKind, Player, Projectile};
use super::targeting::{FireMode, Targeting};
use crate::tuning::Tuning;
use crate::world_center;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Active gameplay
    Running,
    /// Suspended by the player
    Paused,
    /// Waiting for the player to pick level-up upgrades
    LevelUp,
    /// Player died; only a reset leaves this phase
    GameOver,
}

/// Everything one run of the game owns
#[derive(Debug, Clone)]
pub struct Session {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub targeting: Targeting,
    pub fire_mode: FireMode,
    pub phase: SessionPhase,
    pub player: Player,
    /// Sorted by id (ids only grow, removal is by filtering)
    pub enemies: Vec<Enemy>,
    /// Sorted by id
    pub projectiles: Vec<Projectile>,
    /// Sorted by id
    pub items: Vec<DropItem>,
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    pub kills: u32,
    pub boss_kills: u32,
    /// Current gap between normal spawns (ms); shrinks as bosses fall
    pub spawn_interval_ms: f64,
    pub last_spawn_ms: f64,
    pub last_attack_ms: f64,
    /// Last pulse trigger, `None` until the first one
    pub last_pulse_ms: Option<f64>,
    /// Score at which the last boss was due
    pub last_boss_milestone: u32,
    /// Upgrade choices still owed to the player
    pub pending_upgrades: u32,
    /// Aim point (world) seen by the last step
    pub aim: Option<Vec2>,
    /// Session clock at the last processed step (ms)
    pub time_ms: f64,
    /// Steps processed while running
    pub frames: u64,
    pub(crate) rng: Pcg32,
    next_enemy_id: u32,
    next_projectile_id: u32,
    next_item_id: u32,
}

impl Session {
    /// Start a fresh run: player at the arena center, new obstacle layout
    pub fn new(seed: u64, tuning: Tuning, targeting: Targeting, fire_mode: FireMode) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let spawn = world_center();
        let obstacles = generate_layout(&mut rng, spawn, &tuning.arena);
        let player = Player::new(spawn, &tuning.player, &tuning.level);

        Self {
            seed,
            targeting,
            fire_mode,
            phase: SessionPhase::Running,
            player,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            items: Vec::new(),
            obstacles,
            score: 0,
            kills: 0,
            boss_kills: 0,
            spawn_interval_ms: tuning.enemy.spawn_interval_ms,
            last_spawn_ms: 0.0,
            last_attack_ms: 0.0,
            last_pulse_ms: None,
            last_boss_milestone: 0,
            pending_upgrades: 0,
            aim: None,
            time_ms: 0.0,
            frames: 0,
            rng,
            next_enemy_id: 1,
            next_projectile_id: 1,
            next_item_id: 1,
            tuning,
        }
    }

    /// Same as `new` but with the obstacle layout replaced (tests, demos)
    pub fn with_obstacles(mut self, obstacles: Vec<Obstacle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    /// Flip between Running and Paused; other phases are unaffected
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            SessionPhase::Running => SessionPhase::Paused,
            SessionPhase::Paused => SessionPhase::Running,
            other => other,
        };
    }

    /// Camera centered on the player
    pub fn camera(&self, viewport: Vec2) -> Camera {
        Camera::follow(self.player.pos, viewport)
    }

    /// True while the pulse ring should be drawn at `now_ms`
    pub fn pulse_effect_active(&self, now_ms: f64) -> bool {
        self.last_pulse_ms
            .is_some_and(|t| now_ms - t < self.tuning.weapons.pulse_effect_ms)
    }

    /// Add a normal enemy at `pos`, scaled to the player's level. Returns its id.
    pub fn spawn_enemy(&mut self, pos: Vec2) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        let pos = clamp_to_world(pos, self.tuning.enemy.radius);
        self.enemies
            .push(Enemy::normal(id, pos, self.player.level, &self.tuning.enemy));
        id
    }

    /// Add a boss at `pos`. Returns its id.
    pub fn spawn_boss(&mut self, pos: Vec2) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        let pos = clamp_to_world(pos, self.tuning.boss.radius);
        self.enemies
            .push(Enemy::boss(id, pos, self.player.level, &self.tuning.boss));
        id
    }

    /// Fire one projectile from the player. Returns its id.
    pub fn spawn_projectile(&mut self, pos: Vec2, dir: Vec2) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        self.projectiles.push(Projectile::new(
            id,
            pos,
            dir,
            self.tuning.weapons.projectile_speed,
            self.player.stats.attack_power,
            self.player.has_laser,
        ));
        id
    }

    /// Place a drop item. Returns its id.
    pub fn spawn_item(&mut self, pos: Vec2, kind: ItemKind) -> u32 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        self.items.push(DropItem { id, pos, kind });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_clean() {
        let s = Session::new(42, Tuning::default(), Targeting::Nearest, FireMode::Auto);
        assert_eq!(s.phase, SessionPhase::Running);
        assert_eq!(s.player.pos, world_center());
        assert!(s.enemies.is_empty() && s.projectiles.is_empty() && s.items.is_empty());
        assert_eq!(s.obstacles.len(), s.tuning.arena.obstacle_count);
        assert_eq!(s.player.stats.current_health, s.player.stats.max_health);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut s = Session::new(1, Tuning::default(), Targeting::Nearest, FireMode::Auto);
        let a = s.spawn_enemy(Vec2::new(100.0, 100.0));
        s.enemies.clear();
        let b = s.spawn_enemy(Vec2::new(100.0, 100.0));
        assert!(b > a);

        let p1 = s.spawn_projectile(Vec2::ZERO, Vec2::X);
        s.projectiles.clear();
        let p2 = s.spawn_projectile(Vec2::ZERO, Vec2::X);
        assert!(p2 > p1);
    }

    #[test]
    fn test_pause_toggle_only_from_running() {
        let mut s = Session::new(1, Tuning::default(), Targeting::Nearest, FireMode::Auto);
        s.toggle_pause();
        assert_eq!(s.phase, SessionPhase::Paused);
        s.toggle_pause();
        assert_eq!(s.phase, SessionPhase::Running);

        s.phase = SessionPhase::GameOver;
        s.toggle_pause();
        assert_eq!(s.phase, SessionPhase::GameOver);
    }

    #[test]
    fn test_spawn_clamps_inside_world() {
        let mut s = Session::new(1, Tuning::default(), Targeting::Nearest, FireMode::Auto);
        s.spawn_enemy(Vec2::new(-500.0, 10_000.0));
        let e = &s.enemies[0];
        assert!(crate::sim::arena::in_world(e.pos));
        assert_eq!(e.pos.x, e.radius);
    }
}
