//! Ocean Clean entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::{JsFuture, spawn_local};
    use web_sys::{
        AddEventListenerOptions, HtmlCanvasElement, HtmlImageElement, KeyboardEvent,
        RegistrationOptions, ServiceWorker, ServiceWorkerRegistration, ServiceWorkerState, TouchEvent,
    };

    use ocean_clean::assets::{self, AssetConfig, SpriteSet};
    use ocean_clean::consts::{DEFAULT_CANVAS, FPS_WINDOW};
    use ocean_clean::input::{InputRouter, Key};
    use ocean_clean::platform::{self, web};
    use ocean_clean::pwa::{self, InstallPrompt, InstallRequest, WorkerLifecycle, WorkerState};
    use ocean_clean::renderer::{CanvasRenderer, HudInfo, build_scene};
    use ocean_clean::sim::{Action, GameState, TickInput, tick};
    use ocean_clean::ui::{self, Screen, Shell};
    use ocean_clean::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        router: InputRouter,
        shell: Shell,
        settings: Settings,
        renderer: CanvasRenderer,
        sprites: SpriteSet<HtmlImageElement>,
        // FPS tracking
        frame_times: [f64; FPS_WINDOW],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        /// Queue an action for the next tick
        fn push(&mut self, action: Option<Action>) {
            if let Some(action) = action {
                // A new round starts with no gesture carried over
                if matches!(action, Action::Start | Action::Restart) {
                    self.router.reset();
                }
                self.input.actions.push(action);
            }
        }

        /// Show the panel for the current screen and hide the others
        fn sync_screens(&self) {
            let current = self.shell.screen();
            for screen in [Screen::Loading, Screen::Menu, Screen::Guide(1)] {
                if let Some(id) = screen.element_id() {
                    let visible = current.element_id() == Some(id);
                    web::set_hidden(id, !visible);
                }
            }
            if let Screen::Guide(step) = current {
                for s in 1..=ui::GUIDE_STEPS {
                    web::set_hidden(&ui::guide_step_id(s), s != step);
                }
            }
        }

        fn track_fps(&mut self, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

            // Oldest sample is the one about to be overwritten
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 {
                let elapsed = time - oldest;
                if elapsed > 0.0 {
                    self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
                }
            }
        }

        /// One display refresh: input sampling, update, render
        fn frame(&mut self, time: f64) {
            let hold = self.router.sample_hold(platform::now_ms(), self.state.mode);
            self.push(hold);

            tick(&mut self.state, &self.input);
            self.input.actions.clear();

            self.track_fps(time);
            let scene = build_scene(&self.state, &self.settings, HudInfo { fps: self.fps });
            self.renderer.draw(&scene, &self.sprites);
        }
    }

    /// Browser install/offline state, alive before the game is
    #[derive(Default)]
    struct Pwa {
        install: InstallPrompt,
        /// The deferred `beforeinstallprompt` event
        deferred: Option<JsValue>,
        worker: WorkerLifecycle,
    }

    fn window_size() -> Vec2 {
        let Some(window) = web_sys::window() else {
            return Vec2::new(DEFAULT_CANVAS.0, DEFAULT_CANVAS.1);
        };
        let read = |v: Result<JsValue, JsValue>, fallback: f32| {
            v.ok().and_then(|v| v.as_f64()).map_or(fallback, |v| v as f32)
        };
        Vec2::new(
            read(window.inner_width(), DEFAULT_CANVAS.0),
            read(window.inner_height(), DEFAULT_CANVAS.1),
        )
    }

    fn fit_canvas(canvas: &HtmlCanvasElement) -> Vec2 {
        let size = window_size();
        canvas.set_width(size.x as u32);
        canvas.set_height(size.y as u32);
        size
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        // Already installed when the page re-runs the module
        let _ = console_log::init_with_level(log::Level::Info);

        // The same module is imported by the service worker, which has no window
        let Some(document) = web::document() else {
            return;
        };

        log::info!("Ocean Clean starting...");

        let pwa_state = Rc::new(RefCell::new(Pwa::default()));
        setup_install_prompt(pwa_state.clone());
        register_service_worker(pwa_state);

        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };
        let size = fit_canvas(&canvas);

        let renderer = match CanvasRenderer::new(&canvas) {
            Ok(renderer) => renderer,
            Err(e) => {
                log::error!("Canvas2D unavailable: {e:?}");
                web::set_hidden("errorMessage", false);
                return;
            }
        };

        let settings = Settings::load();
        let tuning = Tuning::load();

        let sprites = assets::load_sprite_set(
            &AssetConfig::default(),
            &web::fallback_urls(),
            web::load_image,
            |loaded| web::set_progress(assets::progress_percent(loaded), &ui::loading_text(loaded)),
        )
        .await;
        web::set_progress(100.0, &ui::ready_text(sprites.fish.len(), sprites.trash.len()));

        let seed = platform::fresh_seed();
        let state = GameState::new(seed, size, tuning, sprites.counts());
        log::info!("Game initialized with seed: {}", seed);

        let game = Rc::new(RefCell::new(Game {
            state,
            input: TickInput::default(),
            router: InputRouter::new(settings.touch.clone()),
            shell: Shell::new(),
            settings,
            renderer,
            sprites,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }));

        {
            let game = game.clone();
            web::set_timeout(ui::MENU_DELAY_MS, move || {
                let mut g = game.borrow_mut();
                g.shell.assets_ready();
                g.sync_screens();
            });
        }

        setup_menu(game.clone());
        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_resize(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Ocean Clean running!");
    }

    fn setup_menu(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            web::on_click("startButton", move |_| {
                let mut g = game.borrow_mut();
                let action = g.shell.start();
                g.push(action);
                g.sync_screens();
            });
        }
        {
            let game = game.clone();
            web::on_click("guideButton", move |_| {
                let mut g = game.borrow_mut();
                g.shell.open_guide();
                g.sync_screens();
            });
        }
        for step in 1..ui::GUIDE_STEPS {
            let game = game.clone();
            web::on_click(&format!("guideNext{step}"), move |_| {
                let mut g = game.borrow_mut();
                g.shell.guide_step(step + 1);
                g.sync_screens();
            });
        }
        web::on_click("guideClose", move |_| {
            let mut g = game.borrow_mut();
            let action = g.shell.close_guide();
            g.push(action);
            g.sync_screens();
        });
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if let Some(k) = Key::from_dom(&key) {
                    let mode = g.state.mode;
                    let action = g.router.key_down(k, mode);
                    if action.is_some() {
                        event.prevent_default();
                    }
                    g.push(action);
                    return;
                }
                match key.as_str() {
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    "f" | "F" => {
                        g.settings.show_fps = !g.settings.show_fps;
                        g.settings.save();
                    }
                    "h" | "H" => {
                        g.settings.show_hints = !g.settings.show_hints;
                        g.settings.save();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(k) = Key::from_dom(&event.key()) {
                    let mut g = game.borrow_mut();
                    let action = g.router.key_up(k);
                    g.push(action);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Canvas-relative x of the first touch point
    fn touch_x(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<f32> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(touch.client_x() as f32 - rect.left() as f32)
    }

    fn add_touch_listener(
        canvas: &HtmlCanvasElement,
        kind: &str,
        handler: impl FnMut(TouchEvent) + 'static,
    ) {
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let closure = Closure::<dyn FnMut(TouchEvent)>::new(handler);
        let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &options,
        );
        closure.forget();
    }

    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            add_touch_listener(canvas, "touchstart", move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&canvas_clone, &event) {
                    let mut g = game.borrow_mut();
                    let mode = g.state.mode;
                    let action = g.router.touch_start(x, platform::now_ms(), mode);
                    g.push(action);
                }
            });
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            add_touch_listener(canvas, "touchmove", move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&canvas_clone, &event) {
                    let mut g = game.borrow_mut();
                    let mode = g.state.mode;
                    let action = g.router.touch_move(x, mode);
                    g.push(action);
                }
            });
        }

        // Touch end
        add_touch_listener(canvas, "touchend", move |event: TouchEvent| {
            event.prevent_default();
            let mut g = game.borrow_mut();
            let action = g.router.touch_end();
            g.push(action);
        });

        // No long-press menu on the canvas
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
            });
            let _ = canvas
                .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let size = fit_canvas(&canvas);
            game.borrow_mut().state.resize(size);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_install_prompt(pwa_state: Rc<RefCell<Pwa>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Browser offers installation
        {
            let pwa_state = pwa_state.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                let mut p = pwa_state.borrow_mut();
                p.install.on_before_install_prompt();
                p.deferred = Some(event.into());
                web::set_shown("installButton", p.install.button_visible());
            });
            let _ = window.add_event_listener_with_callback(
                "beforeinstallprompt",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Installed
        {
            let pwa_state = pwa_state.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut p = pwa_state.borrow_mut();
                p.install.on_app_installed();
                p.deferred = None;
                web::set_shown("installButton", false);
            });
            let _ = window
                .add_event_listener_with_callback("appinstalled", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        web::on_click("installButton", move |_| {
            let request = pwa_state.borrow_mut().install.request_install();
            match request {
                InstallRequest::Unavailable(message) => web::alert(message),
                InstallRequest::ShowPrompt => {
                    web::set_shown("installButton", false);
                    let Some(deferred) = pwa_state.borrow_mut().deferred.take() else {
                        return;
                    };
                    let pwa_state = pwa_state.clone();
                    spawn_local(async move {
                        let accepted = show_install_prompt(&deferred).await.unwrap_or_else(|e| {
                            log::warn!("Install prompt failed: {e:?}");
                            false
                        });
                        pwa_state.borrow_mut().install.on_user_choice(accepted);
                    });
                }
            }
        });
    }

    /// Call `prompt()` on the deferred event and wait for `userChoice`
    async fn show_install_prompt(event: &JsValue) -> Result<bool, JsValue> {
        let prompt: js_sys::Function = js_sys::Reflect::get(event, &"prompt".into())?.dyn_into()?;
        prompt.call0(event)?;
        let choice: js_sys::Promise = js_sys::Reflect::get(event, &"userChoice".into())?.dyn_into()?;
        let choice = JsFuture::from(choice).await?;
        let outcome = js_sys::Reflect::get(&choice, &"outcome".into())?;
        Ok(outcome.as_string().as_deref() == Some("accepted"))
    }

    fn register_service_worker(pwa_state: Rc<RefCell<Pwa>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let navigator = window.navigator();
        let supported = js_sys::Reflect::has(&navigator, &"serviceWorker".into()).unwrap_or(false);
        pwa_state.borrow_mut().worker = WorkerLifecycle::new(supported);
        if !pwa_state.borrow().worker.supported() {
            log::info!("Service workers not supported");
            return;
        }

        spawn_local(async move {
            let container = navigator.service_worker();
            // The worker script is an ES module importing this crate's bindings
            let options = js_sys::Object::new();
            let _ = js_sys::Reflect::set(&options, &"type".into(), &"module".into());
            let options: RegistrationOptions = options.unchecked_into();
            let registration = container.register_with_options("service-worker.js", &options);
            match JsFuture::from(registration).await {
                Ok(reg) => {
                    let reg: ServiceWorkerRegistration = reg.unchecked_into();
                    pwa_state.borrow_mut().worker.on_registered(&reg.scope());
                    watch_updates(&reg, pwa_state);
                }
                Err(e) => {
                    let reason = format!("{e:?}");
                    pwa_state.borrow_mut().worker.on_registration_failed(&reason);
                }
            }
        });
    }

    fn worker_state(worker: &ServiceWorker) -> WorkerState {
        match worker.state() {
            ServiceWorkerState::Parsed => WorkerState::Parsed,
            ServiceWorkerState::Installing => WorkerState::Installing,
            ServiceWorkerState::Installed => WorkerState::Installed,
            ServiceWorkerState::Activating => WorkerState::Activating,
            ServiceWorkerState::Activated => WorkerState::Activated,
            _ => WorkerState::Redundant,
        }
    }

    /// Report new versions and activate them right away
    fn watch_updates(reg: &ServiceWorkerRegistration, pwa_state: Rc<RefCell<Pwa>>) {
        let reg_clone = reg.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(worker) = reg_clone.installing() else {
                return;
            };
            let pwa_state = pwa_state.clone();
            let worker_clone = worker.clone();
            let on_state = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let controlled = web_sys::window()
                    .and_then(|w| w.navigator().service_worker().controller())
                    .is_some();
                let update = pwa_state
                    .borrow_mut()
                    .worker
                    .on_state_change(worker_state(&worker_clone), controlled);
                if update {
                    let _ = worker_clone.post_message(&JsValue::from_str(pwa::SKIP_WAITING));
                }
            });
            let _ = worker
                .add_event_listener_with_callback("statechange", on_state.as_ref().unchecked_ref());
            on_state.forget();
        });
        let _ = reg.add_event_listener_with_callback("updatefound", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: the autopilot plays a fixed number of frames
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use ocean_clean::consts::DEFAULT_CANVAS;
    use ocean_clean::sim::{Action, GameMode, GameState, SpriteCounts, TickInput, tick};
    use ocean_clean::{Tuning, platform};

    env_logger::init();
    log::info!("Ocean Clean (native) starting...");
    log::info!("The playable build targets wasm32 - run with `trunk serve` for the web version");

    let frames: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(36_000);
    let seed = platform::fresh_seed();
    let canvas = Vec2::new(DEFAULT_CANVAS.0, DEFAULT_CANVAS.1);
    let mut state = GameState::new(seed, canvas, Tuning::default(), SpriteCounts::default());

    let mut input = TickInput {
        actions: vec![Action::Start],
        idle_mode: true,
    };
    let mut sessions = 0u32;
    let mut best = 0u32;
    for _ in 0..frames {
        let before = state.mode;
        tick(&mut state, &input);
        input.actions.clear();
        if before != GameMode::GameOver && state.mode == GameMode::GameOver {
            sessions += 1;
            best = best.max(state.score);
            log::info!("Session {} over, score {}", sessions, state.score);
        }
    }
    best = best.max(state.score);

    println!(
        "seed {seed}: {frames} frames, {sessions} sessions ended, best score {best}, current score {}",
        state.score
    );
}
