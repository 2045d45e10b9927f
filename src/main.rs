//! Laddoo Catch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlImageElement, TouchEvent};

    use laddoo_catch::consts::*;
    use laddoo_catch::renderer::{RenderError, RenderState};
    use laddoo_catch::sim::{Direction, GameEvent, GamePhase, GameState, InputState, tick};
    use laddoo_catch::ui::{self, Screen, ids};
    use laddoo_catch::{AssetRegistry, SpriteKey, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        assets: AssetRegistry,
        accumulator: f32,
        last_time: f64,
        input: InputState,
        /// CSS width of the canvas, for pointer mapping
        css_width: f32,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            Self {
                state: GameState::with_tuning(seed, tuning),
                render_state: None,
                assets: AssetRegistry::new(),
                accumulator: 0.0,
                last_time: 0.0,
                input: InputState::default(),
                css_width: 0.0,
            }
        }

        /// Ready once every sprite has loaded or failed
        fn ready(&self) -> bool {
            self.assets.is_settled()
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.tick_input();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render_snapshot(&self.state.snapshot(), &self.assets) {
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

        /// Apply queued game events to the DOM chrome
        fn sync_dom(&mut self, document: &Document) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::PhaseChanged { to, .. } => {
                        show_screen(document, Screen::for_phase(to));
                        // Held keys and fingers do not carry across screens
                        self.input.release_all();
                        if to == GamePhase::Running {
                            self.accumulator = 0.0;
                        }
                        set_text(document, ids::SCORE_TEXT, &self.score_text());
                    }
                    GameEvent::CountdownStep { remaining } => {
                        set_text(document, ids::COUNTDOWN_NUMBER, &ui::countdown_text(remaining));
                    }
                    GameEvent::TimerUpdated {
                        time_left,
                        fill_percent,
                    } => {
                        set_text(document, ids::TIMER_TEXT, &ui::timer_text(time_left));
                        if let Some(fill) = html_element(document, ids::TIMER_FILL) {
                            let _ = fill
                                .style()
                                .set_property("width", &ui::timer_fill_css(fill_percent));
                        }
                    }
                    GameEvent::CollectibleCaught { .. } | GameEvent::HazardCaught { .. } => {
                        set_text(document, ids::SCORE_TEXT, &self.score_text());
                    }
                }
            }
        }

        fn score_text(&self) -> String {
            ui::score_text(self.state.score, self.state.tuning.target_score)
        }

        /// Client x (viewport) to game units
        fn pointer_x(&self, canvas: &HtmlCanvasElement, client_x: i32) -> f32 {
            let rect = canvas.get_bounding_client_rect();
            ui::client_to_game_x(
                client_x as f32 - rect.left() as f32,
                self.css_width,
                self.state.tuning.game_width,
            )
        }
    }

    fn html_element(document: &Document, id: &str) -> Option<HtmlElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Exactly one screen carries the `active` class
    fn show_screen(document: &Document, screen: Screen) {
        for s in Screen::ALL {
            if let Some(el) = document.get_element_by_id(s.element_id()) {
                let classes = el.class_list();
                let _ = if s == screen {
                    classes.add_1("active")
                } else {
                    classes.remove_1("active")
                };
            }
        }
    }

    pub async fn run() -> Result<(), RenderError> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Laddoo Catch starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(ids::CANVAS)
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let tuning = Tuning::load();
        let playfield = (tuning.game_width, tuning.game_height);

        // Backing store is the logical playfield at device pixel ratio
        let dpr = window.device_pixel_ratio();
        let width = (playfield.0 as f64 * dpr) as u32;
        let height = (playfield.1 as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new(seed, tuning)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, playfield).await?;
        game.borrow_mut().render_state = Some(render_state);

        fit_canvas(&canvas, game.clone());
        show_screen(&document, Screen::Start);

        load_sprites(game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_screen_buttons(game.clone());
        setup_resize(&canvas, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Laddoo Catch running!");
        Ok(())
    }

    /// Preload every sprite; a failure is logged and still counts as settled
    fn load_sprites(game: Rc<RefCell<Game>>) {
        for key in SpriteKey::ALL {
            let Ok(img) = HtmlImageElement::new() else {
                game.borrow_mut().assets.mark_failed(key);
                continue;
            };

            let onload = {
                let game = game.clone();
                Closure::<dyn FnMut()>::new(move || {
                    let mut g = game.borrow_mut();
                    g.assets.mark_loaded(key);
                    if g.ready() {
                        log::info!("All sprites settled");
                    }
                })
            };
            let onerror = {
                let game = game.clone();
                Closure::<dyn FnMut()>::new(move || {
                    let mut g = game.borrow_mut();
                    g.assets.mark_failed(key);
                    if g.ready() {
                        log::info!(
                            "All sprites settled ({} missing)",
                            g.assets.failures().len()
                        );
                    }
                })
            };
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onload.forget();
            onerror.forget();
            img.set_src(key.path());
        }
    }

    /// Size the canvas to its container, keeping the playfield aspect
    fn fit_canvas(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(container) = document.get_element_by_id(ids::CONTAINER) else {
            return;
        };
        let mut g = game.borrow_mut();
        let (w, h) = ui::fit_canvas(
            container.client_width() as f32,
            container.client_height() as f32,
            g.state.tuning.game_width,
            g.state.tuning.game_height,
        );
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{w}px"));
        let _ = style.set_property("height", &format!("{h}px"));
        g.css_width = w as f32;
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            fit_canvas(&canvas, game.clone());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if key == "i" || key == "I" {
                    g.input.idle_mode = !g.input.idle_mode;
                    log::info!("Idle mode: {}", g.input.idle_mode);
                    return;
                }
                g.input.key_down(&key);
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = document
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus loss drops everything held
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch drag on the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.pointer_x(&canvas_clone, touch.client_x());
                    g.input.pointer_start(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.pointer_x(&canvas_clone, touch.client_x());
                    g.input.pointer_move(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for name in ["touchend", "touchcancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.pointer_end();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keep the page from scrolling under a drag
        if let Some(container) = document.get_element_by_id(ids::CONTAINER) {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
            });
            let _ = container
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Optional on-screen buttons
        for (id, direction) in [(ids::LEFT_BTN, Direction::Left), (ids::RIGHT_BTN, Direction::Right)] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            for (name, pressed) in [
                ("touchstart", true),
                ("touchend", false),
                ("mousedown", true),
                ("mouseup", false),
            ] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    if name.starts_with("touch") {
                        event.prevent_default();
                    }
                    game.borrow_mut().input.button(direction, pressed);
                });
                let _ = btn.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut() + 'static) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{id}");
            return;
        };
        let mut handler = handler;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_screen_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        for id in [ids::START_BTN, ids::TRY_AGAIN_BTN] {
            let game = game.clone();
            on_click(&document, id, move || {
                let mut g = game.borrow_mut();
                if !g.ready() {
                    log::debug!("Start pressed before sprites settled");
                    return;
                }
                g.state.start();
            });
        }

        {
            let game = game.clone();
            on_click(&document, ids::PLAY_AGAIN_BTN, move || {
                game.borrow_mut().state.play_again();
            });
        }

        if let Ok(buttons) = document.query_selector_all(ids::CLOSE_BTN_SELECTOR) {
            for i in 0..buttons.length() {
                let Some(btn) = buttons.item(i) else {
                    continue;
                };
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    game.borrow_mut().state.reset();
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.sync_dom(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Failed to start: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), laddoo_catch::TuningError> {
    use laddoo_catch::Tuning;
    use laddoo_catch::consts::SIM_DT;
    use laddoo_catch::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Laddoo Catch (native) starting...");
    log::info!("Native mode runs a headless autopilot round - use `trunk serve` for the web version");

    let mut seed = 42u64;
    let mut tuning = Tuning::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => match args.next().map(|s| s.parse()) {
                Some(Ok(s)) => seed = s,
                _ => log::warn!("--seed expects an integer, keeping {seed}"),
            },
            "--tuning" => match args.next() {
                Some(path) => tuning = Tuning::load_file(std::path::Path::new(&path))?,
                None => log::warn!("--tuning expects a file path"),
            },
            other => log::warn!("Ignoring unknown argument {other}"),
        }
    }

    let mut state = GameState::with_tuning(seed, tuning);
    state.start();
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let (mut caught, mut penalties) = (0u32, 0u32);
    while !state.phase.is_over() {
        tick(&mut state, &input, SIM_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::CollectibleCaught { .. } => caught += 1,
                GameEvent::HazardCaught { penalized: true, .. } => penalties += 1,
                _ => {}
            }
        }
    }

    log::info!(
        "Round over after {} ticks: {:?} with {}/{} ({} caught, {} penalties)",
        state.time_ticks,
        state.phase,
        state.score,
        state.tuning.target_score,
        caught,
        penalties,
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
