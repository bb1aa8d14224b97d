//! Survival Arena entry point
//!
//! On the web this wires the DOM (buttons, keyboard, pointer, canvas) to the
//! controller and runs the animation-frame loop. Natively it plays a seeded
//! headless session on autopilot and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, Event, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent,
    };

    use survival_arena::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
    use survival_arena::renderer::{Frame, Hud, Overlay, RenderState};
    use survival_arena::sim::Upgrade;
    use survival_arena::{Controller, Settings, Tuning, viewport_size};

    type Shared = Rc<RefCell<App>>;
    type FrameLoop = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

    /// A DOM event listener that unregisters itself when dropped
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    }

    impl Listener {
        fn new(
            target: &EventTarget,
            kind: &'static str,
            handler: Box<dyn FnMut(Event)>,
        ) -> Option<Self> {
            let callback = Closure::wrap(handler);
            target
                .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
                .ok()?;
            Some(Self {
                target: target.clone(),
                kind,
                callback,
            })
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
        }
    }

    /// Game instance holding all state
    struct App {
        controller: Controller,
        render_state: RenderState,
        canvas: HtmlCanvasElement,
        /// Listeners that only live while the game overlay is open
        session_listeners: Vec<Listener>,
        frame_loop: FrameLoop,
        frame_id: Option<i32>,
    }

    impl App {
        /// Render the current frame
        fn render(&mut self, frame: &Frame) {
            match self.render_state.render(frame) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Match the drawing buffer to the canvas's displayed size
        fn fit_canvas(&mut self) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (self.canvas.client_width() as f64 * dpr) as u32;
            let height = (self.canvas.client_height() as f64 * dpr) as u32;
            if width > 0 && height > 0 {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
                self.render_state.resize(width, height);
            }
        }

        /// Pointer position in logical viewport units
        fn logical_pointer(&self, event: &MouseEvent) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let scale = Vec2::new(
                VIEWPORT_WIDTH / rect.width().max(1.0) as f32,
                VIEWPORT_HEIGHT / rect.height().max(1.0) as f32,
            );
            let client = Vec2::new(
                (event.client_x() as f64 - rect.left()) as f32,
                (event.client_y() as f64 - rect.top()) as f32,
            );
            client * scale
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn new_seed() -> u64 {
        js_sys::Date::now() as u64
    }

    /// Run `f` against the app if it is still alive
    fn with_app(app: &Weak<RefCell<App>>, f: impl FnOnce(&mut App)) {
        if let Some(app) = app.upgrade() {
            f(&mut app.borrow_mut());
        }
    }

    fn set_hidden(el: Option<Element>, hidden: bool) {
        if let Some(el) = el {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Survival Arena starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Logical size until the overlay is shown and the canvas has a layout
        let width = VIEWPORT_WIDTH as u32;
        let height = VIEWPORT_HEIGHT as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = match RenderState::new(surface, &adapter, width, height, viewport_size()).await {
            Ok(state) => state,
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                return;
            }
        };

        let app: Shared = Rc::new(RefCell::new(App {
            controller: Controller::new(Tuning::load(), Settings::load()),
            render_state,
            canvas,
            session_listeners: Vec::new(),
            frame_loop: Rc::new(RefCell::new(None)),
            frame_id: None,
        }));

        setup_overlay_buttons(&document, &app);

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        log::info!("Survival Arena ready");
    }

    /// Open/close buttons live for the whole page
    fn setup_overlay_buttons(document: &Document, app: &Shared) {
        if let Some(btn) = document.get_element_by_id("open-game-btn") {
            let app = Rc::downgrade(app);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                if let Some(app) = app.upgrade() {
                    open_game(&app);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("close-game-btn") {
            let app = Rc::downgrade(app);
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                if let Some(app) = app.upgrade() {
                    close_game(&app);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn open_game(app: &Shared) {
        let seed = new_seed();
        set_hidden(document().and_then(|d| d.get_element_by_id("game-overlay")), false);

        let needs_listeners = {
            let mut a = app.borrow_mut();
            a.fit_canvas();
            a.controller.open(seed);
            a.session_listeners.is_empty()
        };

        if needs_listeners {
            let listeners = session_listeners(app);
            app.borrow_mut().session_listeners = listeners;
        }
        start_frame_loop(app);
    }

    fn close_game(app: &Shared) {
        let mut a = app.borrow_mut();
        if let Some(id) = a.frame_id.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        a.frame_loop.borrow_mut().take();
        a.session_listeners.clear();
        a.controller.close();
        drop(a);

        set_hidden(document().and_then(|d| d.get_element_by_id("game-overlay")), true);
    }

    /// Keyboard, pointer, focus and in-game buttons
    fn session_listeners(app: &Shared) -> Vec<Listener> {
        let (Some(window), Some(document)) = (web_sys::window(), document()) else {
            return Vec::new();
        };
        let canvas: EventTarget = app.borrow().canvas.clone().into();
        let weak = Rc::downgrade(app);
        let mut listeners = Vec::new();

        {
            let app = weak.clone();
            listeners.extend(Listener::new(
                &window,
                "keydown",
                Box::new(move |event: Event| {
                    let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    with_app(&app, |a| {
                        if a.controller.key_down(&key.code(), key.repeat()) {
                            event.prevent_default();
                        }
                    });
                }),
            ));
        }

        {
            let app = weak.clone();
            listeners.extend(Listener::new(
                &window,
                "keyup",
                Box::new(move |event: Event| {
                    let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    with_app(&app, |a| {
                        if a.controller.key_up(&key.code()) {
                            event.prevent_default();
                        }
                    });
                }),
            ));
        }

        {
            let app = weak.clone();
            listeners.extend(Listener::new(
                &canvas,
                "pointermove",
                Box::new(move |event: Event| {
                    let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    with_app(&app, |a| {
                        let p = a.logical_pointer(mouse);
                        a.controller.pointer_move(p);
                    });
                }),
            ));
        }

        {
            let app = weak.clone();
            listeners.extend(Listener::new(
                &canvas,
                "pointerdown",
                Box::new(move |event: Event| {
                    let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    with_app(&app, |a| {
                        let p = a.logical_pointer(mouse);
                        a.controller.pointer_down(p);
                    });
                }),
            ));
        }

        // Auto-pause on blur and tab switch
        {
            let app = weak.clone();
            listeners.extend(Listener::new(
                &window,
                "blur",
                Box::new(move |_event: Event| {
                    with_app(&app, |a| a.controller.focus_lost());
                }),
            ));
        }

        {
            let app = weak.clone();
            let doc = document.clone();
            listeners.extend(Listener::new(
                &document,
                "visibilitychange",
                Box::new(move |_event: Event| {
                    if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                        with_app(&app, |a| a.controller.focus_lost());
                    }
                }),
            ));
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let app = weak.clone();
            listeners.extend(Listener::new(
                &btn,
                "click",
                Box::new(move |_event: Event| {
                    with_app(&app, |a| a.controller.request_pause_toggle());
                }),
            ));
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let app = weak.clone();
            listeners.extend(Listener::new(
                &btn,
                "click",
                Box::new(move |_event: Event| {
                    with_app(&app, |a| a.controller.reset(new_seed()));
                }),
            ));
        }

        if let Ok(buttons) = document.query_selector_all("[data-upgrade]") {
            for i in 0..buttons.length() {
                let Some(btn) = buttons.get(i) else { continue };
                let upgrade = btn
                    .dyn_ref::<Element>()
                    .and_then(|el| el.get_attribute("data-upgrade"))
                    .and_then(|name| Upgrade::from_str(&name));
                let Some(upgrade) = upgrade else {
                    log::warn!("Unknown upgrade button");
                    continue;
                };
                let app = weak.clone();
                listeners.extend(Listener::new(
                    &btn,
                    "click",
                    Box::new(move |_event: Event| {
                        with_app(&app, |a| a.controller.choose_upgrade(upgrade));
                    }),
                ));
            }
        }

        log::debug!("Attached {} session listeners", listeners.len());
        listeners
    }

    fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Option<i32> {
        web_sys::window()?
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .ok()
    }

    fn start_frame_loop(app: &Shared) {
        let frame_loop = app.borrow().frame_loop.clone();
        if frame_loop.borrow().is_none() {
            let handle = frame_loop.clone();
            let weak = Rc::downgrade(app);
            *frame_loop.borrow_mut() = Some(Closure::new(move |time: f64| {
                with_app(&weak, |a| {
                    a.frame_id = None;
                    let Some(frame) = a.controller.frame(time) else {
                        return;
                    };
                    a.render(&frame);
                    update_hud(&frame.hud);
                    if let Some(callback) = handle.borrow().as_ref() {
                        a.frame_id = request_frame(callback);
                    }
                });
            }));
        }

        let mut a = app.borrow_mut();
        if a.frame_id.is_none() {
            if let Some(callback) = frame_loop.borrow().as_ref() {
                a.frame_id = request_frame(callback);
            }
        }
    }

    /// Update HUD elements in DOM
    fn update_hud(hud: &Hud) {
        let Some(document) = document() else {
            return;
        };

        set_text(&document, "#hud-score .hud-value", &hud.score.to_string());
        set_text(&document, "#hud-level .hud-value", &hud.level.to_string());
        set_text(&document, "#hud-kills .hud-value", &hud.kills.to_string());
        set_text(
            &document,
            "#hud-health .hud-value",
            &format!("{:.0}/{:.0}", hud.health, hud.max_health),
        );
        set_text(
            &document,
            "#hud-xp .hud-value",
            &format!("{}/{}", hud.experience, hud.experience_to_next_level),
        );

        // Stats panel
        set_text(&document, "#stat-attack", &format!("{:.0}", hud.attack_power));
        set_text(&document, "#stat-max-health", &format!("{:.0}", hud.max_health));
        set_text(&document, "#stat-attack-speed", &format!("{:.1}", hud.attack_speed));
        set_text(&document, "#stat-move-speed", &format!("{:.1}", hud.move_speed));
        set_text(&document, "#stat-shots", &hud.shot_count.to_string());

        set_hidden(
            document.get_element_by_id("pause-menu"),
            hud.overlay != Overlay::Paused,
        );

        match hud.overlay {
            Overlay::LevelUp { pending } => {
                set_hidden(document.get_element_by_id("level-up-menu"), false);
                set_text(&document, "#level-up-pending", &pending.to_string());
            }
            _ => set_hidden(document.get_element_by_id("level-up-menu"), true),
        }

        match hud.overlay {
            Overlay::GameOver { score, level, kills } => {
                set_hidden(document.get_element_by_id("game-over"), false);
                set_text(&document, "#final-score", &score.to_string());
                set_text(&document, "#final-level", &level.to_string());
                set_text(&document, "#final-kills", &kills.to_string());
            }
            _ => set_hidden(document.get_element_by_id("game-over"), true),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use survival_arena::consts::FRAME_MS;
    use survival_arena::sim::{Session, SessionPhase, Upgrade, nearest_enemy};
    use survival_arena::{Controller, Settings, Tuning};

    /// Five minutes of play at 60 fps
    const MAX_FRAMES: u64 = 60 * 60 * 5;
    /// Enemies closer than this are fled from
    const FLEE_DISTANCE: f32 = 160.0;

    /// Key codes to hold this frame: run straight away from the nearest enemy
    fn autopilot_keys(session: &Session) -> [(&'static str, bool); 4] {
        let pos = session.player.pos;
        let away = nearest_enemy(pos, &session.enemies)
            .filter(|e| e.pos.distance(pos) < FLEE_DISTANCE)
            .map(|e| pos - e.pos)
            .unwrap_or_default();

        [
            ("KeyW", away.y < -0.5),
            ("KeyS", away.y > 0.5),
            ("KeyA", away.x < -0.5),
            ("KeyD", away.x > 0.5),
        ]
    }

    pub fn run(seed: u64) {
        let mut controller = Controller::new(Tuning::load(), Settings::load());
        controller.open(seed);

        let mut frame = 0u64;
        let mut upgrade_turn = 0usize;
        while frame < MAX_FRAMES {
            let Some(session) = controller.session() else {
                break;
            };
            match session.phase {
                SessionPhase::GameOver => break,
                SessionPhase::LevelUp => {
                    controller.choose_upgrade(Upgrade::ALL[upgrade_turn % Upgrade::ALL.len()]);
                    upgrade_turn += 1;
                }
                _ => {
                    for (code, held) in autopilot_keys(session) {
                        if held {
                            controller.key_down(code, false);
                        } else {
                            controller.key_up(code);
                        }
                    }
                }
            }

            controller.frame(frame as f64 * FRAME_MS);
            frame += 1;
        }

        if let Some(session) = controller.session() {
            log::info!(
                "Run finished after {} frames ({:.1}s session time)",
                session.frames,
                controller.clock_ms() / 1000.0
            );
            println!(
                "seed {} | score {} | level {} | kills {} (bosses {}) | hp {:.0}/{:.0} | {}",
                seed,
                session.score,
                session.player.level,
                session.kills,
                session.boss_kills,
                session.player.stats.current_health,
                session.player.stats.max_health,
                if session.is_game_over() { "died" } else { "survived" }
            );
        }
        controller.close();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Survival Arena (native) starting...");
    log::info!("The game runs in the browser; running a headless autopilot session");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(42);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
