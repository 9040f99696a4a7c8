//! Charge Leap entry point
//!
//! Native builds run a headless autopilot demo (the simulation is fully
//! playable without a canvas). Wasm builds expose the game to a JS host that
//! owns the drawing surface and raw event capture.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use charge_leap::consts::{MAX_SUBSTEPS, SIM_DT};
    use charge_leap::gesture::GestureDecoder;
    use charge_leap::input::{InputCode, InputHub};
    use charge_leap::render::{RenderSink, ScreenRect, Visual};
    use charge_leap::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use charge_leap::{HighScores, Tuning};

    /// Forwards rectangles to a JS callback as
    /// `(x, y, w, h, tag, power)` with tags 0=platform, 1=scored platform,
    /// 2=player, 3=charging player, 4=dead player.
    struct JsSink<'a> {
        callback: &'a js_sys::Function,
    }

    impl RenderSink for JsSink<'_> {
        fn draw_rect(&mut self, rect: ScreenRect, visual: Visual) {
            let (tag, power) = match visual {
                Visual::Platform => (0u32, 0.0f32),
                Visual::PlatformScored => (1, 0.0),
                Visual::Player => (2, 0.0),
                Visual::PlayerCharging { power } => (3, power),
                Visual::PlayerDead => (4, 0.0),
            };
            let args = js_sys::Array::new();
            args.push(&JsValue::from_f64(rect.x as f64));
            args.push(&JsValue::from_f64(rect.y as f64));
            args.push(&JsValue::from_f64(rect.w as f64));
            args.push(&JsValue::from_f64(rect.h as f64));
            args.push(&JsValue::from_f64(tag as f64));
            args.push(&JsValue::from_f64(power as f64));
            let _ = self.callback.apply(&JsValue::NULL, &args);
        }
    }

    /// The game as seen from JS: the host drives `frame`, feeds input edges
    /// and gesture samples, and draws whatever the sink callback receives.
    #[wasm_bindgen]
    pub struct WebGame {
        state: GameState,
        hub: InputHub,
        decoder: GestureDecoder,
        scores: HighScores,
        on_rect: js_sys::Function,
        accumulator: f32,
        last_time: f64,
        autopilot: bool,
    }

    #[wasm_bindgen]
    impl WebGame {
        /// Build a run for the given canvas size. Stored tuning that fails
        /// validation falls back to defaults at load; construction still
        /// re-validates and throws rather than simulate undefined gameplay.
        #[wasm_bindgen(constructor)]
        pub fn new(canvas_w: f32, canvas_h: f32, on_rect: js_sys::Function) -> Result<WebGame, JsValue> {
            let tuning = Tuning::load();
            let seed = js_sys::Date::now() as u64;
            let state = GameState::new(canvas_w, canvas_h, tuning, seed)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(WebGame {
                decoder: GestureDecoder::new(&state.tuning),
                state,
                hub: InputHub::new(),
                scores: HighScores::load(),
                on_rect,
                accumulator: 0.0,
                last_time: 0.0,
                autopilot: false,
            })
        }

        /// Advance and draw one display frame. `now_ms` is the host's
        /// animation-frame timestamp.
        pub fn frame(&mut self, now_ms: f64) {
            let dt = if self.last_time > 0.0 {
                (((now_ms - self.last_time) / 1000.0) as f32).min(0.1)
            } else {
                SIM_DT
            };
            self.last_time = now_ms;
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = TickInput {
                    press: self.hub.is_just_pressed(InputCode::Jump),
                    release: self.hub.is_just_released(InputCode::Jump),
                    restart: self.hub.is_just_pressed(InputCode::Restart),
                    autopilot: self.autopilot,
                };
                tick(&mut self.state, &input, SIM_DT);
                self.hub.flush();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            for event in self.state.take_events() {
                match event {
                    GameEvent::PlatformScored { total } => {
                        log::debug!("score {total}");
                    }
                    GameEvent::PlayerDied { score } => {
                        if self
                            .scores
                            .add_score(score, self.state.seed, js_sys::Date::now())
                            .is_some()
                        {
                            self.scores.save();
                        }
                    }
                }
            }

            let mut sink = JsSink {
                callback: &self.on_rect,
            };
            charge_leap::render::draw(&self.state, &mut sink);
        }

        /// Keyboard/touch press proxy (host captures the raw events).
        pub fn press(&self) {
            self.hub.trigger_press(InputCode::Jump);
        }

        /// Keyboard/touch release proxy.
        pub fn release(&self) {
            self.hub.trigger_release(InputCode::Jump);
        }

        pub fn request_restart(&self) {
            self.hub.trigger_press(InputCode::Restart);
            self.hub.trigger_release(InputCode::Restart);
        }

        /// One gesture sample; pass `undefined` when tracking is lost.
        pub fn gesture_sample(&mut self, ratio: Option<f64>) {
            self.decoder.feed(ratio.map(|r| r as f32), &self.hub);
        }

        pub fn set_autopilot(&mut self, enabled: bool) {
            self.autopilot = enabled;
        }

        pub fn score(&self) -> u32 {
            self.state.score
        }

        pub fn charge_fraction(&self) -> f32 {
            self.state.player.charge_fraction(&self.state.tuning)
        }

        pub fn is_game_over(&self) -> bool {
            self.state.phase == GamePhase::GameOver
        }

        pub fn top_score(&self) -> u32 {
            self.scores.top_score().unwrap_or(0)
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Charge Leap wasm module loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use charge_leap::consts::SIM_DT;
    use charge_leap::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use charge_leap::{HighScores, Tuning};

    env_logger::init();

    let seed: u64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);

    let tuning = Tuning::load();
    if let Err(e) = tuning.validate() {
        log::error!("refusing to start: {e}");
        std::process::exit(1);
    }

    log::info!("Charge Leap headless demo, seed {seed}");
    let mut state = match GameState::new(480.0, 720.0, tuning, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("refusing to start: {e}");
            std::process::exit(1);
        }
    };

    let mut scores = HighScores::load();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    // Three autopilot runs of up to 60 simulated seconds each
    for run in 1..=3 {
        let mut ticks = 0u32;
        while state.phase == GamePhase::Playing && ticks < 60 * 120 {
            tick(&mut state, &input, SIM_DT);
            ticks += 1;
            for event in state.take_events() {
                if let GameEvent::PlatformScored { total } = event {
                    log::info!("run {run}: landed platform {total}");
                }
            }
        }

        let outcome = if state.phase == GamePhase::GameOver {
            "fell"
        } else {
            "timed out"
        };
        println!(
            "run {run}: {outcome} with score {} after {:.1}s",
            state.score,
            ticks as f32 * SIM_DT
        );
        scores.add_score(state.score, state.seed, 0.0);

        tick(&mut state, &TickInput { restart: true, ..Default::default() }, SIM_DT);
    }

    if let Some(best) = scores.top_score() {
        println!("best of session: {best}");
    }
}
