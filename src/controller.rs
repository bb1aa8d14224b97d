//! Session controller
//!
//! Owns the session lifecycle (open, reset, close), the input snapshot that
//! event handlers write into, and the frame clock. The platform layer calls
//! `frame` once per animation frame and draws what comes back.

use glam::Vec2;

use crate::consts::MAX_FRAME_DELTA_MS;
use crate::input::{KeyAction, action_for_code};
use crate::renderer::frame::{Frame, build_frame};
use crate::settings::Settings;
use crate::sim::entity::Upgrade;
use crate::sim::state::Session;
use crate::sim::tick::{TickInput, tick};
use crate::tuning::Tuning;
use crate::viewport_size;

pub struct Controller {
    session: Option<Session>,
    input: TickInput,
    /// Last pointer position in logical screen units
    pointer_screen: Option<Vec2>,
    tuning: Tuning,
    settings: Settings,
    /// Session clock (ms); only advances while running
    clock_ms: f64,
    last_frame_ts: Option<f64>,
    viewport: Vec2,
}

impl Controller {
    pub fn new(tuning: Tuning, settings: Settings) -> Self {
        Self {
            session: None,
            input: TickInput::default(),
            pointer_screen: None,
            tuning,
            settings,
            clock_ms: 0.0,
            last_frame_ts: None,
            viewport: viewport_size(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace preferences; rule changes apply from the next session
    pub fn set_settings(&mut self, settings: Settings) {
        if let Some(session) = self.session.as_mut() {
            session.targeting = settings.targeting;
            session.fire_mode = settings.fire_mode;
        }
        self.settings = settings;
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Start a fresh session, discarding any current one
    pub fn open(&mut self, seed: u64) {
        let mut tuning = self.tuning.clone();
        self.settings.apply_rules(&mut tuning);

        self.session = Some(Session::new(
            seed,
            tuning,
            self.settings.targeting,
            self.settings.fire_mode,
        ));
        self.input = TickInput::default();
        self.clock_ms = 0.0;
        self.last_frame_ts = None;
        log::info!("Session opened (seed {})", seed);
    }

    /// Same as `open`; kept separate for the game-over and reset buttons
    pub fn reset(&mut self, seed: u64) {
        log::info!("Resetting session");
        self.open(seed);
    }

    /// Drop the session. The platform layer tears down listeners and the
    /// pending animation frame.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!(
                "Session closed: score {} level {} after {} frames",
                session.score,
                session.player.level,
                session.frames
            );
        }
        self.input = TickInput::default();
        self.pointer_screen = None;
        self.last_frame_ts = None;
    }

    /// Returns true if the key is bound (the caller should swallow the event)
    pub fn key_down(&mut self, code: &str, repeat: bool) -> bool {
        match action_for_code(code) {
            Some(KeyAction::Move(direction)) => {
                self.input.movement.set(direction, true);
                true
            }
            Some(KeyAction::Pause) => {
                if !repeat {
                    self.request_pause_toggle();
                }
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        match action_for_code(code) {
            Some(KeyAction::Move(direction)) => {
                self.input.movement.set(direction, false);
                true
            }
            Some(KeyAction::Pause) => true,
            None => false,
        }
    }

    /// Pointer moved to `screen` (logical units)
    pub fn pointer_move(&mut self, screen: Vec2) {
        self.pointer_screen = Some(screen);
    }

    /// Pointer pressed at `screen`; fires in click mode
    pub fn pointer_down(&mut self, screen: Vec2) {
        self.pointer_screen = Some(screen);
        self.input.fire = true;
    }

    /// Toggle pause at the next step. Two requests in one frame cancel out.
    pub fn request_pause_toggle(&mut self) {
        self.input.pause = !self.input.pause;
    }

    /// Pick a level-up upgrade at the next step
    pub fn choose_upgrade(&mut self, upgrade: Upgrade) {
        self.input.upgrade = Some(upgrade);
    }

    /// Window lost focus: release held keys and pause a running game
    pub fn focus_lost(&mut self) {
        self.input.movement = Default::default();
        let running = self.session.as_ref().is_some_and(Session::is_running);
        if running && !self.input.pause {
            self.input.pause = true;
            log::debug!("Auto-pause on focus loss");
        }
    }

    /// Advance one animation frame at `timestamp_ms` and build what to draw.
    ///
    /// Returns `None` when no session is open.
    pub fn frame(&mut self, timestamp_ms: f64) -> Option<Frame> {
        let session = self.session.as_mut()?;

        let delta = self
            .last_frame_ts
            .map_or(0.0, |prev| (timestamp_ms - prev).clamp(0.0, MAX_FRAME_DELTA_MS));
        self.last_frame_ts = Some(timestamp_ms);
        if session.is_running() {
            self.clock_ms += delta;
        }

        let camera = session.camera(self.viewport);
        self.input.aim = self.pointer_screen.map(|p| camera.screen_to_world(p));

        tick(session, &self.input, self.clock_ms);

        // One-shot requests are consumed by the step
        self.input.fire = false;
        self.input.pause = false;
        self.input.upgrade = None;

        Some(build_frame(session, self.viewport, &self.settings))
    }
}
