//! Frame building
//!
//! Turns a session into a screen-space triangle list plus the text model the
//! DOM HUD shows. Reads the session only; calling it twice yields the same
//! frame.

use glam::Vec2;

use super::shapes::{bar, circle, line, rect, rect_outline, ring};
use super::vertex::{Vertex, colors};
use crate::consts::{GRID_SPACING, WORLD_HEIGHT, WORLD_WIDTH};
use crate::settings::Settings;
use crate::sim::arena::Camera;
use crate::sim::entity::ItemKind;
use crate::sim::state::{Session, SessionPhase};
use crate::sim::targeting::Targeting;

const CIRCLE_SEGMENTS: u32 = 24;
const EDGE_WIDTH: f32 = 2.0;
const ITEM_RADIUS: f32 = 10.0;

const HUD_MARGIN: f32 = 10.0;
const HUD_BAR_WIDTH: f32 = 200.0;
const HEALTH_BAR_HEIGHT: f32 = 14.0;
const EXPERIENCE_BAR_HEIGHT: f32 = 8.0;
const ICON_SIZE: f32 = 12.0;
const ICON_GAP: f32 = 4.0;

const ENEMY_BAR_HEIGHT: f32 = 4.0;
const ENEMY_BAR_GAP: f32 = 6.0;

const AIM_LENGTH: f32 = 40.0;
const AIM_MARKER_RADIUS: f32 = 6.0;

/// Modal screen shown over the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Paused,
    /// Upgrade choices still owed
    LevelUp { pending: u32 },
    /// Final summary
    GameOver { score: u32, level: u32, kills: u32 },
}

/// Text values for the DOM HUD
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub level: u32,
    pub kills: u32,
    pub health: f32,
    pub max_health: f32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub attack_power: f32,
    pub attack_speed: f32,
    pub move_speed: f32,
    pub shot_count: u32,
    pub has_laser: bool,
    pub has_pulse: bool,
    pub overlay: Overlay,
}

impl Hud {
    pub fn from_session(session: &Session) -> Self {
        let player = &session.player;
        let overlay = match session.phase {
            SessionPhase::Running => Overlay::None,
            SessionPhase::Paused => Overlay::Paused,
            SessionPhase::LevelUp => Overlay::LevelUp {
                pending: session.pending_upgrades,
            },
            SessionPhase::GameOver => Overlay::GameOver {
                score: session.score,
                level: player.level,
                kills: session.kills,
            },
        };

        Self {
            score: session.score,
            level: player.level,
            kills: session.kills,
            health: player.stats.current_health,
            max_health: player.stats.max_health,
            experience: player.experience,
            experience_to_next_level: player.experience_to_next_level,
            attack_power: player.stats.attack_power,
            attack_speed: player.stats.attack_speed,
            move_speed: player.stats.move_speed,
            shot_count: player.shot_count,
            has_laser: player.has_laser,
            has_pulse: player.has_pulse,
            overlay,
        }
    }
}

/// Everything needed to present one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Screen-space triangle list, back to front
    pub vertices: Vec<Vertex>,
    pub hud: Hud,
}

/// Build the frame for `session` as seen through a `viewport`-sized camera
pub fn build_frame(session: &Session, viewport: Vec2, settings: &Settings) -> Frame {
    let camera = session.camera(viewport);
    let mut out = Vec::with_capacity(4096);

    if settings.show_grid {
        draw_grid(&mut out, &camera);
    }
    draw_world_border(&mut out, &camera);
    draw_obstacles(&mut out, session, &camera);
    draw_items(&mut out, session, &camera);
    draw_projectiles(&mut out, session, &camera);
    draw_enemies(&mut out, session, &camera, settings.enemy_health_bars);
    draw_player(&mut out, session, &camera, settings);
    draw_hud_bars(&mut out, session);

    if session.phase != SessionPhase::Running {
        out.extend(rect(Vec2::ZERO, viewport, colors::OVERLAY_DIM));
    }

    Frame {
        vertices: out,
        hud: Hud::from_session(session),
    }
}

fn draw_grid(out: &mut Vec<Vertex>, camera: &Camera) {
    let (min, max) = camera.visible_world();
    let lo = min.max(Vec2::ZERO);
    let hi = max.min(Vec2::new(WORLD_WIDTH, WORLD_HEIGHT));
    if lo.x >= hi.x || lo.y >= hi.y {
        return;
    }

    let mut x = (lo.x / GRID_SPACING).ceil() * GRID_SPACING;
    while x <= hi.x {
        let a = camera.world_to_screen(Vec2::new(x, lo.y));
        let b = camera.world_to_screen(Vec2::new(x, hi.y));
        out.extend(line(a, b, 1.0, colors::GRID));
        x += GRID_SPACING;
    }

    let mut y = (lo.y / GRID_SPACING).ceil() * GRID_SPACING;
    while y <= hi.y {
        let a = camera.world_to_screen(Vec2::new(lo.x, y));
        let b = camera.world_to_screen(Vec2::new(hi.x, y));
        out.extend(line(a, b, 1.0, colors::GRID));
        y += GRID_SPACING;
    }
}

fn draw_world_border(out: &mut Vec<Vertex>, camera: &Camera) {
    let min = camera.world_to_screen(Vec2::ZERO);
    out.extend(rect_outline(
        min,
        Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
        EDGE_WIDTH,
        colors::WORLD_BORDER,
    ));
}

fn draw_obstacles(out: &mut Vec<Vertex>, session: &Session, camera: &Camera) {
    let (view_min, view_max) = camera.visible_world();
    for o in &session.obstacles {
        let (min, max) = (o.min(), o.max());
        if max.x < view_min.x || min.x > view_max.x || max.y < view_min.y || min.y > view_max.y {
            continue;
        }
        let screen = camera.world_to_screen(min);
        out.extend(rect(screen, o.size(), colors::OBSTACLE));
        out.extend(rect_outline(screen, o.size(), EDGE_WIDTH, colors::OBSTACLE_EDGE));
    }
}

fn item_color(kind: ItemKind) -> [f32; 4] {
    match kind {
        ItemKind::Shotgun => colors::ITEM_SHOTGUN,
        ItemKind::Laser => colors::ITEM_LASER,
        ItemKind::Pulse => colors::ITEM_PULSE,
    }
}

fn draw_items(out: &mut Vec<Vertex>, session: &Session, camera: &Camera) {
    for item in session.items.iter().filter(|i| camera.is_visible(i.pos, ITEM_RADIUS)) {
        let p = camera.world_to_screen(item.pos);
        let color = item_color(item.kind);
        out.extend(circle(p, ITEM_RADIUS * 0.6, color, CIRCLE_SEGMENTS));
        out.extend(ring(p, ITEM_RADIUS - EDGE_WIDTH, ITEM_RADIUS, color, CIRCLE_SEGMENTS));
    }
}

fn draw_projectiles(out: &mut Vec<Vertex>, session: &Session, camera: &Camera) {
    let radius = session.tuning.weapons.projectile_radius;
    for shot in session.projectiles.iter().filter(|p| camera.is_visible(p.pos, radius)) {
        let p = camera.world_to_screen(shot.pos);
        if shot.laser {
            let tail = p - shot.dir * shot.speed * 2.0;
            out.extend(line(tail, p, radius, colors::LASER));
        } else {
            out.extend(circle(p, radius, colors::PROJECTILE, 12));
        }
    }
}

fn draw_enemies(out: &mut Vec<Vertex>, session: &Session, camera: &Camera, health_bars: bool) {
    for enemy in session.enemies.iter().filter(|e| camera.is_visible(e.pos, e.radius)) {
        let p = camera.world_to_screen(enemy.pos);
        let (fill, edge) = if enemy.boss {
            (colors::BOSS, colors::BOSS_EDGE)
        } else {
            (colors::ENEMY, colors::ENEMY_EDGE)
        };
        out.extend(circle(p, enemy.radius, fill, CIRCLE_SEGMENTS));
        out.extend(ring(p, enemy.radius - EDGE_WIDTH, enemy.radius, edge, CIRCLE_SEGMENTS));

        if health_bars {
            let width = enemy.radius * 2.0;
            let top = p.y - enemy.radius - ENEMY_BAR_GAP - ENEMY_BAR_HEIGHT;
            let min = Vec2::new(p.x - enemy.radius, top);
            out.extend(bar(
                min,
                Vec2::new(width, ENEMY_BAR_HEIGHT),
                enemy.health_ratio(),
                colors::BAR_BACK,
                colors::ENEMY_HEALTH,
            ));
        }
    }
}

fn draw_player(out: &mut Vec<Vertex>, session: &Session, camera: &Camera, settings: &Settings) {
    let player = &session.player;
    let p = camera.world_to_screen(player.pos);

    if settings.effective_pulse_ring() && session.pulse_effect_active(session.time_ms) {
        let r = session.tuning.weapons.pulse_radius;
        out.extend(ring(p, r - 3.0, r, colors::PULSE_RING, 48));
    }

    out.extend(circle(p, player.radius, colors::PLAYER, CIRCLE_SEGMENTS));
    out.extend(ring(
        p,
        player.radius - EDGE_WIDTH,
        player.radius,
        colors::PLAYER_EDGE,
        CIRCLE_SEGMENTS,
    ));

    let aim = session.aim.filter(|_| session.targeting == Targeting::Pointer);
    if let Some(aim) = aim {
        let dir = (aim - player.pos).normalize_or_zero();
        if dir != Vec2::ZERO {
            let start = p + dir * player.radius;
            out.extend(line(start, start + dir * AIM_LENGTH, 2.0, colors::AIM));
            let marker = camera.world_to_screen(aim);
            out.extend(ring(marker, AIM_MARKER_RADIUS - 1.5, AIM_MARKER_RADIUS, colors::AIM, 16));
        }
    }
}

fn draw_hud_bars(out: &mut Vec<Vertex>, session: &Session) {
    let player = &session.player;
    let mut y = HUD_MARGIN;

    out.extend(bar(
        Vec2::new(HUD_MARGIN, y),
        Vec2::new(HUD_BAR_WIDTH, HEALTH_BAR_HEIGHT),
        player.health_ratio(),
        colors::BAR_BACK,
        colors::HEALTH,
    ));
    y += HEALTH_BAR_HEIGHT + ICON_GAP;

    out.extend(bar(
        Vec2::new(HUD_MARGIN, y),
        Vec2::new(HUD_BAR_WIDTH, EXPERIENCE_BAR_HEIGHT),
        player.experience_ratio(),
        colors::BAR_BACK,
        colors::EXPERIENCE,
    ));
    y += EXPERIENCE_BAR_HEIGHT + ICON_GAP;

    // One icon per extra shot, then laser and pulse
    let extra_shots = player.shot_count.saturating_sub(1) as usize;
    let icons = std::iter::repeat_n(ItemKind::Shotgun, extra_shots)
        .chain(player.has_laser.then_some(ItemKind::Laser))
        .chain(player.has_pulse.then_some(ItemKind::Pulse));
    for (i, kind) in icons.enumerate() {
        let x = HUD_MARGIN + i as f32 * (ICON_SIZE + ICON_GAP);
        out.extend(rect(Vec2::new(x, y), Vec2::splat(ICON_SIZE), item_color(kind)));
    }
}
