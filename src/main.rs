//! Brickfall entry point
//!
//! Handles platform-specific initialization and runs the game loop. All
//! gameplay lives in `brickfall::sim`; this file only wires DOM input to
//! `TickInput`, drives `tick` from requestAnimationFrame, and draws the
//! state to a 2D canvas. The native build runs the same sim headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlSelectElement, KeyboardEvent,
        MouseEvent, TouchEvent,
    };

    use brickfall::consts::*;
    use brickfall::sim::{ArenaConfig, GamePhase, GameState, TickInput, tick};
    use brickfall::{Settings, SpeedPreset};

    const BRICK_COLOR: &str = "#0095DD";
    const SPECIAL_COLOR: &str = "#FFD700";

    /// Game instance holding sim state and pending input
    struct Game {
        state: GameState,
        input: TickInput,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d, seed: u64) -> Self {
            let settings = Settings::load();
            let config = ArenaConfig::new(canvas.width() as f32, canvas.height() as f32);
            Self {
                state: GameState::new(config, settings.speed.multiplier(), seed),
                input: TickInput::default(),
                canvas,
                ctx,
            }
        }

        fn render(&self) {
            let w = self.canvas.width() as f64;
            let h = self.canvas.height() as f64;
            self.ctx.clear_rect(0.0, 0.0, w, h);

            // Bricks
            for brick in &self.state.bricks.bricks {
                if !brick.alive {
                    continue;
                }
                let r = self.state.bricks.rect_of(brick);
                self.ctx.set_fill_style_str(if brick.special {
                    SPECIAL_COLOR
                } else {
                    BRICK_COLOR
                });
                self.ctx
                    .fill_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
            }

            // Balls (primary + splits)
            self.ctx.set_fill_style_str(BRICK_COLOR);
            for ball in
                std::iter::once(&self.state.ball).chain(self.state.extra_balls.iter())
            {
                self.ctx.begin_path();
                let _ = self.ctx.arc(
                    ball.pos.x as f64,
                    ball.pos.y as f64,
                    BALL_RADIUS as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                self.ctx.fill();
            }

            // Paddle
            let p = self.state.paddle.rect();
            self.ctx
                .fill_rect(p.x as f64, p.y as f64, p.w as f64, p.h as f64);

            // Powerups
            self.ctx.set_fill_style_str(SPECIAL_COLOR);
            for powerup in &self.state.powerups {
                let r = powerup.rect();
                self.ctx
                    .fill_rect(r.x as f64, r.y as f64, r.w as f64, r.h as f64);
            }

            // Score
            self.ctx.set_font("16px Arial");
            self.ctx.set_fill_style_str(BRICK_COLOR);
            let _ = self
                .ctx
                .fill_text(&format!("Score: {}", self.state.score), 8.0, 20.0);

            // Terminal message
            match self.state.phase {
                GamePhase::Won => self.draw_banner("You win! Reload to play again."),
                GamePhase::Lost => self.draw_banner("Game over. Reload to play again."),
                _ => {}
            }
        }

        fn draw_banner(&self, text: &str) {
            let w = self.canvas.width() as f64;
            let h = self.canvas.height() as f64;
            self.ctx.set_font("24px Arial");
            self.ctx.set_fill_style_str("#333333");
            let _ = self.ctx.fill_text(text, w / 4.0, h / 2.0);
        }
    }

    /// Size the canvas for the current screen, portrait or landscape
    fn setup_canvas(canvas: &HtmlCanvasElement) {
        let window = web_sys::window().expect("no window");
        let screen_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let screen_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);

        if screen_w < screen_h {
            canvas.set_width((screen_w * 0.95) as u32);
            canvas.set_height((screen_w * 1.2) as u32);
        } else {
            let size = (screen_w * 0.9).min(screen_h * 0.9).min(800.0);
            canvas.set_width(size as u32);
            canvas.set_height((size * 0.75) as u32);
        }
    }

    /// Translate a client-x coordinate to a paddle target (left edge)
    fn pointer_to_target(canvas: &HtmlCanvasElement, client_x: f32) -> f32 {
        let rect = canvas.get_bounding_client_rect();
        client_x - rect.left() as f32 - PADDLE_WIDTH / 2.0
    }

    fn setup_input(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Pointer move over the canvas
        {
            let game = game.clone();
            let canvas = game.borrow().canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let target = pointer_to_target(&g.canvas, event.client_x() as f32);
                g.input.target_x = Some(target);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move anywhere on the document
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let target = pointer_to_target(&g.canvas, touch.client_x() as f32);
                    g.input.target_x = Some(target);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Arrow keys nudge the paddle by a fixed step
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let x = g.state.paddle.pos.x;
                match event.key().as_str() {
                    "ArrowLeft" => g.input.target_x = Some(x - PADDLE_KEY_STEP),
                    "ArrowRight" => g.input.target_x = Some(x + PADDLE_KEY_STEP),
                    _ => {}
                }
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Start button: read the speed selection, then fire the start signal
        if let Some(btn) = document.get_element_by_id("startButton") {
            let game = game.clone();
            let selector = document
                .get_element_by_id("gameSpeed")
                .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok());
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if let Some(selector) = &selector {
                    if let Some(preset) = SpeedPreset::from_str(&selector.value()) {
                        g.state.speed_multiplier = preset.multiplier();
                        let settings = Settings { speed: preset };
                        settings.save();
                    }
                }
                g.input.start = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(f: &Closure<dyn FnMut()>) {
        web_sys::window()
            .expect("no window")
            .request_animation_frame(f.as_ref().unchecked_ref())
            .expect("requestAnimationFrame failed");
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Debug).expect("logger init");

        let document = web_sys::window()
            .expect("no window")
            .document()
            .expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no #gameCanvas element")
            .dyn_into()
            .expect("#gameCanvas is not a canvas");
        setup_canvas(&canvas);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("context is not 2d");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(canvas, ctx, seed)));
        setup_input(game.clone());

        log::info!("Brickfall starting, seed {}", seed);

        // requestAnimationFrame loop; stops scheduling once the game is over
        let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        *g.borrow_mut() = Some(Closure::new(move || {
            let mut game_ref = game.borrow_mut();
            let input = game_ref.input;
            tick(&mut game_ref.state, &input);
            game_ref.input.start = false;
            game_ref.render();

            if !game_ref.state.phase.is_over() {
                request_animation_frame(f.borrow().as_ref().unwrap());
            }
        }));
        request_animation_frame(g.borrow().as_ref().unwrap());
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brickfall::Settings;
    use brickfall::sim::{ArenaConfig, GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Brickfall (native) starting - headless demo run");

    let settings = Settings::load();
    let config = ArenaConfig::new(800.0, 600.0);
    let mut state = GameState::new(config, settings.speed.multiplier(), 0xB41C);

    // Scripted driver: start, then track the lowest ball with the paddle.
    // Demonstrates the sim running synchronously without any host loop.
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
    );

    let max_ticks = 200_000;
    for i in 0..max_ticks {
        let lowest_x = state
            .extra_balls
            .iter()
            .chain(std::iter::once(&state.ball))
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|b| b.pos.x)
            .unwrap_or(state.config.width / 2.0);
        let input = TickInput {
            target_x: Some(lowest_x - brickfall::consts::PADDLE_WIDTH / 2.0),
            ..Default::default()
        };
        tick(&mut state, &input);

        if state.phase.is_over() {
            log::info!(
                "finished after {} ticks: {:?}, score {}",
                i + 1,
                state.phase,
                state.score
            );
            break;
        }
    }

    match state.phase {
        GamePhase::Won => println!("Cleared the grid with score {}", state.score),
        GamePhase::Lost => println!("Game over at score {}", state.score),
        _ => println!("Stopped after {} ticks at score {}", max_ticks, state.score),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
