//! slyme entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use slyme::audio::{AudioManager, SoundEffect};
    use slyme::highscores::format_date;
    use slyme::persistence::{KeyValueStore, open_browser_store};
    use slyme::platform::{BEST_SCORE_LEADERBOARD, GameServices, LocalGameServices};
    use slyme::renderer::{RenderState, scene_vertices, screen_to_grid};
    use slyme::sim::{Direction, GameEvent, GamePhase, GridSize};
    use slyme::ui::{self, HudText, MainMenu, MenuAction};
    use slyme::{Session, Settings};

    // Share sheet with clipboard fallback
    #[wasm_bindgen(inline_js = "
        export function share_text(text) {
            if (navigator.share) {
                navigator.share({ text }).catch((e) => console.warn('share cancelled', e));
                return true;
            }
            if (navigator.clipboard) {
                navigator.clipboard.writeText(text).catch((e) => console.warn('clipboard failed', e));
            }
            return false;
        }
    ")]
    extern "C" {
        fn share_text(text: &str) -> bool;
    }

    type Store = Box<dyn KeyValueStore>;
    type WebSession = Session<Store, LocalGameServices<Store>>;

    /// Game instance holding all state
    struct Game {
        session: WebSession,
        render_state: Option<RenderState>,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        last_time: f64,
        start_time: f64,
        /// Title screen is up; the board doesn't advance
        in_menu: bool,
        /// Where the current touch began (CSS px)
        touch_start: Option<(f32, f32)>,
    }

    impl Game {
        /// Board size that fits the canvas at the configured cell size
        fn viewport_grid(&self) -> GridSize {
            GridSize::from_viewport(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
                self.session.settings.effective_cell_size(),
            )
        }

        /// CSS pixel position on the canvas to grid units
        fn to_grid(&self, x: f32, y: f32) -> (f32, f32) {
            let viewport = (
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            );
            screen_to_grid(self.session.state.grid, viewport, x, y)
        }

        fn turn(&mut self, dir: Direction) {
            if self.session.turn(dir) {
                self.audio.play(SoundEffect::Turn);
            }
        }

        fn start_new_run(&mut self) {
            let seed = js_sys::Date::now() as u64;
            let grid = self.viewport_grid();
            self.session.new_run(grid, seed);
            self.in_menu = false;
            show_board_ui();
            log::info!("Started new game with seed: {} on {}x{}", seed, grid.width, grid.height);
        }

        fn continue_run(&mut self) {
            if self.session.resume_saved() {
                self.in_menu = false;
                show_board_ui();
            } else {
                self.start_new_run();
            }
        }

        fn update(&mut self, dt: f32) {
            if self.in_menu {
                return;
            }
            let events = self.session.update(dt, js_sys::Date::now());
            let new_best = self
                .session
                .game_over
                .as_ref()
                .is_some_and(|panel| panel.is_new_best());
            for event in &events {
                self.audio.play(SoundEffect::for_event(event, new_best));
                if let GameEvent::GameOver { .. } = event {
                    show_game_over(&self.session);
                }
            }
        }

        fn render(&mut self, time: f64) {
            let time_secs = ((time - self.start_time) / 1000.0) as f32;
            let vertices = scene_vertices(&self.session.state, &self.session.settings, time_secs);
            if let Some(ref mut render_state) = self.render_state {
                render_state.set_grid(self.session.state.grid);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let hud = HudText::from_state(&self.session.state);
            set_text("hud-score", &hud.score);
            set_text("hud-level", &hud.level);
            set_text("hud-length", &hud.length);
            set_visible(
                "pause-menu",
                !self.in_menu && self.session.state.phase == GamePhase::Paused,
            );
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    fn on_click(id: &str, mut handler: impl FnMut() + 'static) {
        let Some(el) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::warn!("Missing element #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn show_board_ui() {
        set_visible("menu", false);
        set_visible("game-over", false);
        set_visible("hud", true);
    }

    fn show_menu(session: &mut WebSession) {
        let has_save = session.saved_run().is_some();
        let menu = MainMenu::new(has_save);
        set_text("menu-title", menu.title);
        set_text("menu-subtitle", menu.subtitle);
        set_visible(MenuAction::Continue.element_id(), has_save);
        for button in &menu.buttons {
            set_text(button.action.element_id(), button.label);
        }
        set_visible("hud", false);
        set_visible("game-over", false);
        set_visible("menu", true);
    }

    fn show_alert(alert: &ui::Alert) {
        set_text("alert-title", &alert.title);
        set_text("alert-message", &alert.message);
        set_visible("alert", true);
    }

    fn show_game_over(session: &WebSession) {
        let Some(panel) = &session.game_over else {
            return;
        };
        set_text("game-over-heading", &panel.heading);
        set_text("final-score", &panel.final_score);
        set_text("final-rank", panel.rank.as_deref().unwrap_or(""));
        set_text("restart-prompt", &panel.prompt);

        let unlocked: Vec<&str> = session
            .unlocked
            .iter()
            .filter_map(|id| slyme::achievements::find(id))
            .map(|a| a.title)
            .collect();
        set_text(
            "final-achievements",
            &if unlocked.is_empty() {
                String::new()
            } else {
                format!("unlocked: {}", unlocked.join(", "))
            },
        );
        set_visible("game-over", true);
    }

    fn show_leaderboard(session: &WebSession) {
        let Some(document) = document() else { return };
        let Some(list) = document.get_element_by_id("leaderboard-list") else {
            return;
        };
        list.set_inner_html("");

        let now = js_sys::Date::now();
        let mut lines: Vec<String> = Vec::new();
        if session.services.auth_state().is_authenticated() {
            for (i, entry) in session
                .services
                .leaderboard(BEST_SCORE_LEADERBOARD)
                .iter()
                .enumerate()
            {
                lines.push(format!("{}. {} - {}", i + 1, entry.alias, entry.score));
            }
        }
        if lines.is_empty() {
            for (i, entry) in session.highscores.entries.iter().enumerate() {
                lines.push(format!(
                    "{}. {} (level {}) - {}",
                    i + 1,
                    entry.score,
                    entry.level,
                    format_date(entry.timestamp, now)
                ));
            }
        }
        if lines.is_empty() {
            lines.push("no scores yet".to_string());
        }

        for line in lines {
            if let Ok(item) = document.create_element("li") {
                item.set_text_content(Some(&line));
                let _ = list.append_child(&item);
            }
        }
        set_visible("leaderboard", true);
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("slyme starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        set_visible("loading", false);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Settings, services and session
        let store = open_browser_store();
        let settings = Settings::load(&store);
        let mut services =
            LocalGameServices::new(open_browser_store(), &settings.player_alias, settings.game_services);
        services.authenticate();

        let grid = GridSize::from_viewport(
            client_w as f32,
            client_h as f32,
            settings.effective_cell_size(),
        );
        let seed = js_sys::Date::now() as u64;
        let audio = AudioManager::new(settings.effective_volume());
        let session = Session::new(store, services, settings, grid, seed);

        let now = js_sys::Date::now();
        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            audio,
            canvas: canvas.clone(),
            last_time: 0.0,
            start_time: now,
            in_menu: true,
            touch_start: None,
        }));

        log::info!("Game initialized with seed: {}", seed);

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
                power_preference: wgpu::PowerPreference::LowPower,
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

        match RenderState::new(surface, &adapter, width, height, grid).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => {
                log::error!("Failed to create renderer: {}", e);
                return;
            }
        }

        show_menu(&mut game.borrow_mut().session);

        setup_input_handlers(&canvas, game.clone());
        setup_menu(game.clone());
        setup_overlays(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);

        log::info!("slyme running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.in_menu {
                    return;
                }
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => g.turn(Direction::Up),
                    "ArrowDown" | "s" | "S" => g.turn(Direction::Down),
                    "ArrowLeft" | "a" | "A" => g.turn(Direction::Left),
                    "ArrowRight" | "d" | "D" => g.turn(Direction::Right),
                    "Escape" | "p" | "P" => g.session.toggle_pause(),
                    " " | "Enter" => {
                        if g.session.state.phase == GamePhase::GameOver {
                            g.session.restart();
                            show_board_ui();
                        }
                    }
                    "i" | "I" => {
                        g.session.autopilot = !g.session.autopilot;
                        log::info!("Idle mode: {}", g.session.autopilot);
                    }
                    "m" | "M" => {
                        let mut settings = g.session.settings.clone();
                        settings.sound = !settings.sound;
                        g.audio.set_volume(settings.effective_volume());
                        g.session.update_settings(settings);
                    }
                    "g" | "G" => {
                        let mut settings = g.session.settings.clone();
                        settings.show_grid = !settings.show_grid;
                        g.session.update_settings(settings);
                    }
                    _ => return,
                }
                event.prevent_default();
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - remember where the swipe began
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    g.touch_start = Some((x, y));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - swipe, or tap when the finger barely moved
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let Some((x0, y0)) = g.touch_start.take() else {
                    return;
                };
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                if g.in_menu {
                    return;
                }
                let rect = canvas_clone.get_bounding_client_rect();
                let x = touch.client_x() as f32 - rect.left() as f32;
                let y = touch.client_y() as f32 - rect.top() as f32;

                // Screen y grows downward
                if g.session.swipe(x - x0, y0 - y) {
                    g.audio.play(SoundEffect::Turn);
                } else {
                    let was_over = g.session.state.phase == GamePhase::GameOver;
                    let (gx, gy) = g.to_grid(x, y);
                    if g.session.tap(gx, gy) && was_over {
                        show_board_ui();
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click - same as a tap
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                if g.in_menu {
                    return;
                }
                let was_over = g.session.state.phase == GamePhase::GameOver;
                let (gx, gy) = g.to_grid(event.offset_x() as f32, event.offset_y() as f32);
                if g.session.tap(gx, gy) && was_over {
                    show_board_ui();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(MenuAction::Play.element_id(), move || {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.start_new_run();
            });
        }
        {
            let game = game.clone();
            on_click(MenuAction::Continue.element_id(), move || {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.continue_run();
            });
        }
        on_click(MenuAction::Instructions.element_id(), || {
            show_alert(&ui::instructions());
        });
        on_click(MenuAction::HighScores.element_id(), move || {
            show_leaderboard(&game.borrow().session);
        });
    }

    fn setup_overlays(game: Rc<RefCell<Game>>) {
        on_click("alert-ok", || set_visible("alert", false));
        on_click("leaderboard-close", || set_visible("leaderboard", false));

        {
            let game = game.clone();
            on_click("resume-btn", move || {
                game.borrow_mut().session.toggle_pause();
            });
        }
        {
            let game = game.clone();
            on_click("quit-btn", move || {
                let mut g = game.borrow_mut();
                g.session.save();
                g.in_menu = true;
                show_menu(&mut g.session);
            });
        }
        {
            let game = game.clone();
            on_click("restart-btn", move || {
                game.borrow_mut().session.restart();
                show_board_ui();
            });
        }
        {
            let game = game.clone();
            on_click("menu-btn", move || {
                let mut g = game.borrow_mut();
                g.in_menu = true;
                show_menu(&mut g.session);
            });
        }
        {
            let game = game.clone();
            on_click("share-btn", move || {
                let g = game.borrow();
                let state = &g.session.state;
                let text = ui::share_message(state.score, state.level);
                if !share_text(&text) {
                    show_alert(&ui::Alert {
                        title: "copied".to_string(),
                        message: text,
                    });
                }
            });
        }
        on_click("idle-btn", move || {
            let mut g = game.borrow_mut();
            g.session.autopilot = !g.session.autopilot;
        });
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, app switch): pause and save
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if !g.in_menu {
                        g.session.suspend();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if !g.in_menu && g.session.state.phase == GamePhase::Playing {
                    g.session.suspend();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let mut g = game.borrow_mut();
            let dpr = window.device_pixel_ratio();
            let width = (g.canvas.client_width() as f64 * dpr) as u32;
            let height = (g.canvas.client_height() as f64 * dpr) as u32;
            g.canvas.set_width(width);
            g.canvas.set_height(height);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use slyme::persistence::MemoryStore;
    use slyme::platform::{BEST_SCORE_LEADERBOARD, GameServices, LocalGameServices};
    use slyme::sim::{GamePhase, GridSize};
    use slyme::{Session, Settings, achievements};

    /// Simulated frame length
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    /// Suspend and resume once, as a backgrounded app would
    const SUSPEND_AT_FRAME: u32 = 60 * 5;

    fn now_ms() -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }

    /// Autopilot demo run on a phone-sized board
    pub fn run(seed: u64) {
        let settings = Settings::default();
        let mut services = LocalGameServices::new(
            MemoryStore::new(),
            &settings.player_alias,
            settings.game_services,
        );
        services.authenticate();

        let grid = GridSize::from_viewport(390.0, 844.0, settings.effective_cell_size());
        let mut session = Session::new(MemoryStore::new(), services, settings, grid, seed);
        session.autopilot = true;

        log::info!(
            "Headless run: seed {}, board {}x{}",
            seed,
            grid.width,
            grid.height
        );

        for frame in 0..MAX_FRAMES {
            if frame == SUSPEND_AT_FRAME {
                session.suspend();
                if !session.resume_saved() {
                    log::warn!("Suspended run did not come back");
                }
                session.toggle_pause();
            }

            session.update(FRAME_DT, now_ms());
            if session.state.phase == GamePhase::GameOver {
                break;
            }
        }

        let state = &session.state;
        match &session.game_over {
            Some(panel) => {
                println!("{}", panel.heading);
                println!("{}", panel.final_score);
                if let Some(rank) = &panel.rank {
                    println!("{}", rank);
                }
            }
            None => println!("Demo ended: score {}, length {}", state.score, state.len()),
        }
        println!("Level {}, {} moves", state.level, state.time_ticks);

        for entry in session.services.leaderboard(BEST_SCORE_LEADERBOARD) {
            println!("leaderboard: {} {}", entry.alias, entry.score);
        }
        for progress in session.services.achievements() {
            let title = achievements::find(&progress.id)
                .map(|a| a.title)
                .unwrap_or("?");
            println!("achievement: {} {:.0}%", title, progress.percent);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("slyme (native) starting...");
    log::info!("Native mode runs a headless autopilot game - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x5eed);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
