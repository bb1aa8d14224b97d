//! Per-frame simulation step
//!
//! Advances a session by exactly one animation frame. Sub-steps run in a fixed
//! order; each reads and writes the shared session:
//! movement, pulse, spawning, attack, projectiles, enemies, deaths, pickups.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use super::arena::in_world;
use super::collision::move_circle;
use super::entity::{Enemy, ItemKind, Upgrade};
use super::state::{Session, SessionPhase};
use super::targeting::{FireMode, volley_angles};
use crate::tuning::{DropPolicy, LevelUpPolicy};

/// Held movement keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Unscaled movement vector (screen convention, +y is down)
    pub fn vector(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    pub fn is_idle(&self) -> bool {
        self.vector() == Vec2::ZERO
    }
}

/// Input snapshot for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub movement: MoveIntent,
    /// Aim point in world coordinates (pointer targeting)
    pub aim: Option<Vec2>,
    /// Fire request (click-to-fire)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Upgrade picked on the level-up screen
    pub upgrade: Option<Upgrade>,
}

/// Advance the session by one frame at session time `now_ms`
pub fn tick(session: &mut Session, input: &TickInput, now_ms: f64) {
    if input.pause {
        session.toggle_pause();
        log::info!("Session {:?}", session.phase);
    }

    if let Some(upgrade) = input.upgrade {
        choose_upgrade(session, upgrade);
    }

    if !session.is_running() {
        return;
    }

    session.time_ms = now_ms;
    session.frames += 1;
    session.aim = input.aim;

    move_player(session, input);
    trigger_pulse(session, now_ms);
    spawn_enemies(session, now_ms);
    attack(session, input, now_ms);
    update_projectiles(session);
    if update_enemies(session) {
        // Kills landed this step earn nothing once the player is down
        session.enemies.retain(Enemy::is_alive);
        return;
    }
    resolve_deaths(session);
    collect_items(session);
}

/// Spend one pending level-up on `upgrade`
fn choose_upgrade(session: &mut Session, upgrade: Upgrade) {
    if session.phase != SessionPhase::LevelUp || session.pending_upgrades == 0 {
        return;
    }
    upgrade.apply(&mut session.player.stats, &session.tuning.level);
    session.pending_upgrades -= 1;
    log::info!("Upgrade chosen: {}", upgrade.as_str());
    if session.pending_upgrades == 0 {
        session.phase = SessionPhase::Running;
    }
}

fn move_player(session: &mut Session, input: &TickInput) {
    let delta = input.movement.vector() * session.player.stats.move_speed;
    if delta != Vec2::ZERO {
        move_circle(
            &mut session.player.pos,
            delta,
            session.player.radius,
            &session.obstacles,
        );
    }
}

fn trigger_pulse(session: &mut Session, now_ms: f64) {
    if !session.player.has_pulse {
        return;
    }
    let weapons = &session.tuning.weapons;
    let ready = session
        .last_pulse_ms
        .is_none_or(|t| now_ms - t > weapons.pulse_cooldown_ms);
    if !ready {
        return;
    }

    let center = session.player.pos;
    for enemy in session.enemies.iter_mut().filter(|e| e.is_alive()) {
        if enemy.pos.distance(center) <= weapons.pulse_radius {
            enemy.take_damage(weapons.pulse_damage);
        }
    }
    session.last_pulse_ms = Some(now_ms);
}

/// Point at `distance` from `center` in a random direction
fn random_ring_point(rng: &mut impl Rng, center: Vec2, distance: f32) -> Vec2 {
    let angle = rng.random_range(0.0..TAU);
    center + Vec2::from_angle(angle) * distance
}

fn spawn_enemies(session: &mut Session, now_ms: f64) {
    let distance = session.tuning.enemy.spawn_distance;

    if now_ms - session.last_spawn_ms > session.spawn_interval_ms {
        let pos = random_ring_point(&mut session.rng, session.player.pos, distance);
        let id = session.spawn_enemy(pos);
        session.last_spawn_ms = now_ms;
        log::debug!("Spawned enemy {} at ({:.0}, {:.0})", id, pos.x, pos.y);
    }

    let threshold = session.tuning.boss.score_threshold;
    if session.score.saturating_sub(session.last_boss_milestone) >= threshold {
        let pos = random_ring_point(&mut session.rng, session.player.pos, distance);
        let id = session.spawn_boss(pos);
        session.last_boss_milestone += threshold;
        log::info!("Boss {} spawned at score {}", id, session.score);
    }
}

fn attack(session: &mut Session, input: &TickInput, now_ms: f64) {
    if session.fire_mode == FireMode::Click && !input.fire {
        return;
    }
    if now_ms - session.last_attack_ms <= session.player.attack_interval_ms() {
        return;
    }

    let origin = session.player.pos;
    let Some(center) = session
        .targeting
        .shot_angle(origin, &session.enemies, input.aim)
    else {
        return;
    };

    let spread = session.tuning.weapons.shot_spread;
    for angle in volley_angles(center, session.player.shot_count, spread) {
        session.spawn_projectile(origin, Vec2::from_angle(angle));
    }
    session.last_attack_ms = now_ms;
}

fn update_projectiles(session: &mut Session) {
    let hit_margin = session.tuning.weapons.projectile_radius;
    let obstacles = &session.obstacles;
    let enemies = &mut session.enemies;

    session.projectiles.retain_mut(|projectile| {
        projectile.advance();
        if !in_world(projectile.pos) || obstacles.iter().any(|o| o.contains(projectile.pos)) {
            return false;
        }

        // Enemies are sorted by id, so the first match is the lowest id
        for enemy in enemies.iter_mut().filter(|e| e.is_alive()) {
            if projectile.has_hit(enemy.id) {
                continue;
            }
            if projectile.pos.distance(enemy.pos) < enemy.radius + hit_margin {
                enemy.take_damage(projectile.damage);
                if !projectile.laser {
                    return false;
                }
                projectile.hits.push(enemy.id);
            }
        }
        true
    });
}

/// Chase the player and apply contact damage. Returns true on game over.
fn update_enemies(session: &mut Session) -> bool {
    let target = session.player.pos;
    let contact_damage = session.tuning.enemy.contact_damage;

    for enemy in session.enemies.iter_mut().filter(|e| e.is_alive()) {
        let to_player = target - enemy.pos;
        let dist = to_player.length();
        if dist > 0.0 {
            let delta = to_player / dist * enemy.speed;
            move_circle(&mut enemy.pos, delta, enemy.radius, &session.obstacles);
        }

        if enemy.pos.distance(target) < session.player.radius + enemy.radius
            && session.player.take_damage(contact_damage)
        {
            session.phase = SessionPhase::GameOver;
            log::info!(
                "Game over: score {} level {} kills {}",
                session.score,
                session.player.level,
                session.kills
            );
            return true;
        }
    }
    false
}

fn drop_kind(session: &mut Session) -> ItemKind {
    match session.tuning.boss.drop_policy {
        DropPolicy::Fixed(kind) => kind,
        DropPolicy::Random => ItemKind::ALL[session.rng.random_range(0..ItemKind::ALL.len())],
    }
}

fn resolve_deaths(session: &mut Session) {
    let (dead, alive): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut session.enemies)
        .into_iter()
        .partition(|e| !e.is_alive());
    session.enemies = alive;

    let mut experience = 0;
    for enemy in dead {
        session.kills += 1;
        if enemy.boss {
            let boss = &session.tuning.boss;
            session.score += boss.kill_score;
            experience += boss.kill_experience;
            session.spawn_interval_ms = (session.spawn_interval_ms
                - boss.spawn_interval_reduction_ms)
                .max(session.tuning.enemy.min_spawn_interval_ms);
            session.boss_kills += 1;

            let kind = drop_kind(session);
            session.spawn_item(enemy.pos, kind);
            log::info!(
                "Boss {} defeated, dropped {:?}, spawn interval now {:.0}ms",
                enemy.id,
                kind,
                session.spawn_interval_ms
            );
        } else {
            session.score += session.tuning.enemy.kill_score;
            experience += session.tuning.enemy.kill_experience;
        }
    }

    if experience == 0 {
        return;
    }
    let levels = session
        .player
        .gain_experience(experience, &session.tuning.level);
    if levels == 0 {
        return;
    }

    log::info!("Level up! Now level {}", session.player.level);
    match session.tuning.level.level_up_policy {
        LevelUpPolicy::FixedBoost => {
            for _ in 0..levels {
                session.player.apply_level_boost(&session.tuning.level);
            }
        }
        LevelUpPolicy::Choose => {
            session.pending_upgrades += levels;
            session.phase = SessionPhase::LevelUp;
        }
    }
}

fn collect_items(session: &mut Session) {
    let reach = session.tuning.player.pickup_radius;
    let pos = session.player.pos;
    let (picked, remaining): (Vec<_>, Vec<_>) = std::mem::take(&mut session.items)
        .into_iter()
        .partition(|item| item.pos.distance(pos) <= reach);
    session.items = remaining;

    for item in picked {
        session.player.apply_item(item.kind);
        log::info!("Picked up {:?}", item.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arena::Obstacle;
    use crate::sim::targeting::Targeting;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    /// Open arena, no obstacles, nothing fires or spawns before 1000ms
    fn open_session() -> Session {
        Session::new(12345, Tuning::default(), Targeting::Nearest, FireMode::Auto)
            .with_obstacles(Vec::new())
    }

    fn boss_count(s: &Session) -> usize {
        s.enemies.iter().filter(|e| e.boss).count()
    }

    #[test]
    fn test_basic_kill() {
        let mut s = open_session();
        let origin = s.player.pos;
        let id = s.spawn_enemy(origin + Vec2::new(50.0, 0.0));
        s.enemies[0].health = 20.0;
        s.enemies[0].max_health = 20.0;
        s.spawn_projectile(origin, Vec2::X);
        assert_eq!(s.projectiles[0].damage, 20.0);

        let input = TickInput::default();
        let mut frame = 0;
        while s.enemies.iter().any(|e| e.id == id) && frame < 10 {
            frame += 1;
            tick(&mut s, &input, 100.0 + frame as f64);
        }

        assert!(s.enemies.is_empty());
        assert!(s.projectiles.is_empty());
        assert_eq!(s.score, 10);
        assert_eq!(s.kills, 1);
        assert_eq!(s.player.experience, 10);
    }

    #[test]
    fn test_wall_blocks_one_axis() {
        let mut s = open_session();
        let p = s.player.pos;
        let wall = Obstacle::new(p.x + s.player.radius + 1.0, p.y - 100.0, 50.0, 200.0);
        s.obstacles = vec![wall];

        let input = TickInput {
            movement: MoveIntent {
                right: true,
                up: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut s, &input, 100.0);

        assert_eq!(s.player.pos.x, p.x);
        assert_eq!(s.player.pos.y, p.y - s.player.stats.move_speed);
        assert!(!wall.overlaps_circle(s.player.pos, s.player.radius));
    }

    #[test]
    fn test_pickup_at_player() {
        let mut s = open_session();
        let pos = s.player.pos;
        s.spawn_item(pos, ItemKind::Shotgun);
        tick(&mut s, &TickInput::default(), 100.0);
        assert_eq!(s.player.shot_count, 2);
        assert!(s.items.is_empty());

        // Consumed exactly once
        tick(&mut s, &TickInput::default(), 101.0);
        assert_eq!(s.player.shot_count, 2);
    }

    #[test]
    fn test_distant_item_stays() {
        let mut s = open_session();
        let pos = s.player.pos + Vec2::new(200.0, 0.0);
        s.spawn_item(pos, ItemKind::Laser);
        tick(&mut s, &TickInput::default(), 100.0);
        assert!(!s.player.has_laser);
        assert_eq!(s.items.len(), 1);
    }

    #[test]
    fn test_non_laser_hits_first_enemy_only() {
        let mut s = open_session();
        let p = s.player.pos;
        let first = s.spawn_enemy(p + Vec2::new(100.0, 0.0));
        let second = s.spawn_enemy(p + Vec2::new(102.0, 0.0));
        for e in &mut s.enemies {
            e.health = 100.0;
        }
        s.spawn_projectile(p + Vec2::new(92.0, 0.0), Vec2::X);

        tick(&mut s, &TickInput::default(), 100.0);

        let health = |id: u32| s.enemies.iter().find(|e| e.id == id).unwrap().health;
        assert_eq!(health(first), 80.0);
        assert_eq!(health(second), 100.0);
        assert!(s.projectiles.is_empty());
    }

    #[test]
    fn test_laser_hits_each_enemy_once() {
        let mut s = open_session();
        s.player.has_laser = true;
        let p = s.player.pos;
        s.spawn_enemy(p + Vec2::new(100.0, 0.0));
        s.spawn_enemy(p + Vec2::new(200.0, 0.0));
        for e in &mut s.enemies {
            e.health = 100.0;
        }
        s.spawn_projectile(p + Vec2::new(90.0, 0.0), Vec2::X);
        assert!(s.projectiles[0].laser);

        for frame in 0..5 {
            tick(&mut s, &TickInput::default(), 100.0 + frame as f64);
        }
        assert_eq!(s.enemies[0].health, 80.0);
        assert_eq!(s.projectiles.len(), 1);

        for frame in 5..25 {
            tick(&mut s, &TickInput::default(), 100.0 + frame as f64);
        }
        assert_eq!(s.enemies[0].health, 80.0);
        assert_eq!(s.enemies[1].health, 80.0);
    }

    #[test]
    fn test_projectile_stops_at_obstacle() {
        let mut s = open_session();
        let p = s.player.pos;
        s.obstacles = vec![Obstacle::new(p.x + 20.0, p.y - 50.0, 30.0, 100.0)];
        s.spawn_projectile(p + Vec2::new(15.0, 0.0), Vec2::X);
        tick(&mut s, &TickInput::default(), 100.0);
        assert!(s.projectiles.is_empty());
    }

    #[test]
    fn test_no_target_no_shot() {
        let mut s = open_session();
        tick(&mut s, &TickInput::default(), 1500.0);
        assert!(s.projectiles.is_empty());
        assert_eq!(s.last_attack_ms, 0.0);
    }

    #[test]
    fn test_volley_fans_shot_count() {
        let mut s = open_session();
        s.player.shot_count = 3;
        let p = s.player.pos;
        s.spawn_enemy(p + Vec2::new(300.0, 0.0));
        tick(&mut s, &TickInput::default(), 1500.0);
        assert_eq!(s.projectiles.len(), 3);
        assert_eq!(s.last_attack_ms, 1500.0);
        assert!(s.projectiles.iter().all(|pr| pr.damage == s.player.stats.attack_power));
    }

    #[test]
    fn test_click_mode_waits_for_press() {
        let mut s = Session::new(1, Tuning::default(), Targeting::Pointer, FireMode::Click)
            .with_obstacles(Vec::new());
        let aim = Some(s.player.pos + Vec2::new(0.0, -100.0));
        tick(&mut s, &TickInput { aim, ..Default::default() }, 1500.0);
        assert!(s.projectiles.is_empty());

        tick(
            &mut s,
            &TickInput {
                aim,
                fire: true,
                ..Default::default()
            },
            1501.0,
        );
        assert_eq!(s.projectiles.len(), 1);
        assert!(s.projectiles[0].dir.y < -0.99);
    }

    #[test]
    fn test_boss_cadence() {
        let mut s = open_session();
        s.score = 140;
        tick(&mut s, &TickInput::default(), 100.0);
        assert_eq!(boss_count(&s), 0);

        s.score = 150;
        tick(&mut s, &TickInput::default(), 101.0);
        assert_eq!(boss_count(&s), 1);
        tick(&mut s, &TickInput::default(), 102.0);
        assert_eq!(boss_count(&s), 1);

        s.score = 299;
        tick(&mut s, &TickInput::default(), 103.0);
        assert_eq!(boss_count(&s), 1);

        s.score = 300;
        tick(&mut s, &TickInput::default(), 104.0);
        assert_eq!(boss_count(&s), 2);
        assert_eq!(s.last_boss_milestone, 300);
    }

    #[test]
    fn test_boss_kill_drops_item_and_speeds_spawns() {
        let mut tuning = Tuning::default();
        tuning.boss.drop_policy = DropPolicy::Fixed(ItemKind::Laser);
        let mut s = Session::new(3, tuning, Targeting::Nearest, FireMode::Auto)
            .with_obstacles(Vec::new());
        let pos = s.player.pos + Vec2::new(300.0, 0.0);
        s.spawn_boss(pos);
        s.enemies[0].health = 0.0;

        resolve_deaths(&mut s);

        assert!(s.enemies.is_empty());
        assert_eq!(s.items.len(), 1);
        assert_eq!(s.items[0].kind, ItemKind::Laser);
        assert_eq!(s.items[0].pos, pos);
        assert_eq!(s.score, 50);
        assert_eq!(s.boss_kills, 1);
        assert_eq!(s.spawn_interval_ms, 1800.0);
    }

    #[test]
    fn test_spawn_interval_floor() {
        let mut s = open_session();
        for _ in 0..20 {
            let pos = s.player.pos + Vec2::new(300.0, 0.0);
            s.spawn_boss(pos);
            s.enemies.last_mut().unwrap().health = 0.0;
            resolve_deaths(&mut s);
        }
        assert_eq!(s.spawn_interval_ms, s.tuning.enemy.min_spawn_interval_ms);
    }

    #[test]
    fn test_normal_spawn_timer() {
        let mut s = open_session();
        tick(&mut s, &TickInput::default(), 2000.0);
        assert!(s.enemies.is_empty());
        tick(&mut s, &TickInput::default(), 2001.0);
        assert_eq!(s.enemies.len(), 1);
        let d = s.enemies[0].pos.distance(s.player.pos);
        assert!(d <= s.tuning.enemy.spawn_distance + 0.01);
    }

    #[test]
    fn test_pulse_damages_nearby_and_cools_down() {
        let mut s = open_session();
        s.player.has_pulse = true;
        let p = s.player.pos;
        s.spawn_enemy(p + Vec2::new(100.0, 0.0));
        s.spawn_enemy(p + Vec2::new(400.0, 0.0));
        for e in &mut s.enemies {
            e.health = 100.0;
        }

        tick(&mut s, &TickInput::default(), 100.0);
        assert_eq!(s.enemies[0].health, 70.0);
        assert_eq!(s.enemies[1].health, 100.0);
        assert!(s.pulse_effect_active(200.0));
        assert!(!s.pulse_effect_active(500.0));

        tick(&mut s, &TickInput::default(), 200.0);
        assert_eq!(s.enemies[0].health, 70.0);
    }

    #[test]
    fn test_contact_kills_and_freezes() {
        let mut s = open_session();
        let p = s.player.pos;
        s.spawn_enemy(p + Vec2::new(5.0, 0.0));
        s.player.stats.current_health = 0.4;

        tick(&mut s, &TickInput::default(), 100.0);
        assert_eq!(s.phase, SessionPhase::GameOver);
        assert_eq!(s.player.stats.current_health, 0.0);

        let frames = s.frames;
        let enemy_pos = s.enemies[0].pos;
        tick(&mut s, &TickInput::default(), 5000.0);
        assert_eq!(s.frames, frames);
        assert_eq!(s.enemies[0].pos, enemy_pos);
        assert_eq!(s.enemies.len(), 1);
    }

    #[test]
    fn test_game_over_step_drops_fresh_corpses() {
        let mut s = open_session();
        let p = s.player.pos;
        s.spawn_enemy(p + Vec2::new(5.0, 0.0));
        let shot = s.spawn_enemy(p - Vec2::new(100.0, 0.0));
        s.enemies[1].health = 5.0;
        s.spawn_projectile(p - Vec2::new(92.0, 0.0), -Vec2::X);
        s.player.stats.current_health = 0.4;

        tick(&mut s, &TickInput::default(), 100.0);

        assert_eq!(s.phase, SessionPhase::GameOver);
        assert!(s.projectiles.is_empty());
        assert!(s.enemies.iter().all(|e| e.is_alive()));
        assert!(s.enemies.iter().all(|e| e.id != shot));
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.kills, 0);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut s = open_session();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut s, &pause, 100.0);
        assert_eq!(s.phase, SessionPhase::Paused);

        let frames = s.frames;
        let right = TickInput {
            movement: MoveIntent {
                right: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut s, &right, 5000.0);
        assert_eq!(s.frames, frames);
        assert!(s.enemies.is_empty());

        tick(&mut s, &pause, 5001.0);
        assert_eq!(s.phase, SessionPhase::Running);
    }

    #[test]
    fn test_fixed_boost_level_up() {
        let mut s = open_session();
        s.player.stats.current_health = 50.0;
        let pos = s.player.pos + Vec2::new(300.0, 0.0);
        for _ in 0..10 {
            s.spawn_enemy(pos);
        }
        for e in &mut s.enemies {
            e.health = 0.0;
        }
        resolve_deaths(&mut s);

        assert_eq!(s.player.level, 2);
        assert_eq!(s.player.stats.attack_power, 25.0);
        assert_eq!(s.player.stats.max_health, 120.0);
        assert_eq!(s.player.stats.current_health, 120.0);
        assert_eq!(s.phase, SessionPhase::Running);
    }

    #[test]
    fn test_choose_level_up() {
        let mut tuning = Tuning::default();
        tuning.level.level_up_policy = LevelUpPolicy::Choose;
        let mut s = Session::new(9, tuning, Targeting::Nearest, FireMode::Auto)
            .with_obstacles(Vec::new());
        let pos = s.player.pos + Vec2::new(300.0, 0.0);
        for _ in 0..10 {
            s.spawn_enemy(pos);
        }
        for e in &mut s.enemies {
            e.health = 0.0;
        }
        resolve_deaths(&mut s);
        assert_eq!(s.phase, SessionPhase::LevelUp);
        assert_eq!(s.pending_upgrades, 1);

        // Suspended: the world does not advance
        let frames = s.frames;
        tick(&mut s, &TickInput::default(), 100.0);
        assert_eq!(s.frames, frames);

        let pick = TickInput {
            upgrade: Some(Upgrade::MoveSpeed),
            ..Default::default()
        };
        tick(&mut s, &pick, 101.0);
        assert_eq!(s.phase, SessionPhase::Running);
        assert_eq!(s.player.stats.move_speed, 3.5);
        assert_eq!(s.frames, frames + 1);
    }

    #[test]
    fn test_upgrade_ignored_while_running() {
        let mut s = open_session();
        let pick = TickInput {
            upgrade: Some(Upgrade::Attack),
            ..Default::default()
        };
        tick(&mut s, &pick, 100.0);
        assert_eq!(s.player.stats.attack_power, 20.0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = Session::new(777, Tuning::default(), Targeting::Nearest, FireMode::Auto);
        let mut b = Session::new(777, Tuning::default(), Targeting::Nearest, FireMode::Auto);
        let input = TickInput {
            movement: MoveIntent {
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        for frame in 0..600 {
            let now = frame as f64 * crate::consts::FRAME_MS;
            tick(&mut a, &input, now);
            tick(&mut b, &input, now);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.obstacles, b.obstacles);
    }

    fn intent_from_bits(bits: u8) -> MoveIntent {
        MoveIntent {
            up: bits & 1 != 0,
            down: bits & 2 != 0,
            left: bits & 4 != 0,
            right: bits & 8 != 0,
        }
    }

    proptest! {
        #[test]
        fn prop_health_stays_bounded(seed in any::<u64>(), moves in prop::collection::vec(0u8..16, 1..400)) {
            let mut tuning = Tuning::default();
            tuning.enemy.contact_damage = 5.0;
            tuning.enemy.spawn_interval_ms = 100.0;
            tuning.enemy.min_spawn_interval_ms = 100.0;
            let mut s = Session::new(seed, tuning, Targeting::Nearest, FireMode::Auto);

            for (frame, bits) in moves.iter().enumerate() {
                let input = TickInput { movement: intent_from_bits(*bits), ..Default::default() };
                tick(&mut s, &input, frame as f64 * 16.0);
                let hp = s.player.stats.current_health;
                prop_assert!(hp >= 0.0 && hp <= s.player.stats.max_health);
                if hp == 0.0 {
                    prop_assert_eq!(s.phase, SessionPhase::GameOver);
                }
            }
        }

        #[test]
        fn prop_obstacles_impermeable(seed in any::<u64>(), moves in prop::collection::vec(0u8..16, 1..300)) {
            let mut s = Session::new(seed, Tuning::default(), Targeting::Nearest, FireMode::Auto);
            s.player.stats.move_speed = 9.0;

            for (frame, bits) in moves.iter().enumerate() {
                let before: Vec<bool> = s.obstacles.iter()
                    .map(|o| o.overlaps_circle(s.player.pos, s.player.radius))
                    .collect();
                let enemy_before: Vec<(u32, Vec<bool>)> = s.enemies.iter()
                    .map(|e| (e.id, s.obstacles.iter().map(|o| o.overlaps_circle(e.pos, e.radius)).collect()))
                    .collect();

                let input = TickInput { movement: intent_from_bits(*bits), ..Default::default() };
                tick(&mut s, &input, frame as f64 * 50.0);

                for (o, was) in s.obstacles.iter().zip(&before) {
                    prop_assert!(*was || !o.overlaps_circle(s.player.pos, s.player.radius));
                }
                for (id, was) in &enemy_before {
                    if let Some(e) = s.enemies.iter().find(|e| e.id == *id) {
                        for (o, was) in s.obstacles.iter().zip(was) {
                            prop_assert!(*was || !o.overlaps_circle(e.pos, e.radius));
                        }
                    }
                }
            }
        }

        #[test]
        fn prop_level_thresholds_predictable(kills in 0u32..120) {
            let mut s = open_session();
            let pos = s.player.pos + Vec2::new(300.0, 0.0);
            for _ in 0..kills {
                s.spawn_enemy(pos);
                s.enemies.last_mut().unwrap().health = 0.0;
                resolve_deaths(&mut s);
            }

            let total = kills * s.tuning.enemy.kill_experience;
            let mut expected_level = 1;
            let mut threshold = s.tuning.level.first_threshold;
            let mut spent = 0;
            while spent + threshold <= total {
                spent += threshold;
                expected_level += 1;
                threshold = (threshold as f32 * s.tuning.level.threshold_growth).floor() as u32;
            }
            prop_assert_eq!(s.player.level, expected_level);
            prop_assert_eq!(s.player.experience, total - spent);
            prop_assert_eq!(s.player.experience_to_next_level, threshold);
        }
    }
}
