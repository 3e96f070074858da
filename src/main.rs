//! Zen Arcade entry point
//!
//! The wasm build exposes mount/unmount handles for each mini-game to the
//! hosting page; the native build runs a short headless demo round.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

    use zen_arcade::Settings;
    use zen_arcade::audio::{AudioManager, SoundEffect};
    use zen_arcade::consts::*;
    use zen_arcade::render;
    use zen_arcade::sim::{BubbleRound, GameEvent, GardenRound};

    pub fn init() {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);
            log::info!("Zen Arcade ready");
        });
    }

    /// Self-rescheduling animation-frame loop with synchronous cancellation.
    ///
    /// Each completed frame arms the next request; `stop` cancels the
    /// pending request and drops the callback, so no tick runs after it
    /// returns. The tick returns false to stop the loop from the inside
    /// (terminal state).
    struct FrameLoop {
        raf_id: Rc<Cell<Option<i32>>>,
        callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    }

    impl FrameLoop {
        fn start(mut tick: impl FnMut(f64) -> bool + 'static) -> Self {
            let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
            let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
                Rc::new(RefCell::new(None));

            let id = raf_id.clone();
            let cb = callback.clone();
            *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                // A cancelled loop never ticks again even if the browser
                // had already queued this callback.
                if id.get().is_none() {
                    return;
                }
                if tick(time) {
                    id.set(request_frame(cb.borrow().as_ref().unwrap()));
                } else {
                    id.set(None);
                }
            }));
            raf_id.set(request_frame(callback.borrow().as_ref().unwrap()));
            Self { raf_id, callback }
        }

        /// Cancel the pending frame request and release the callback
        fn stop(&self) {
            if let Some(id) = self.raf_id.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(id);
                }
            }
            self.callback.borrow_mut().take();
        }
    }

    fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Option<i32> {
        web_sys::window()
            .and_then(|w| w.request_animation_frame(callback.as_ref().unchecked_ref()).ok())
    }

    /// A canvas event listener that detaches itself on drop
    struct Listener {
        canvas: HtmlCanvasElement,
        kind: &'static str,
        closure: Closure<dyn FnMut(MouseEvent)>,
    }

    impl Listener {
        fn attach(
            canvas: &HtmlCanvasElement,
            kind: &'static str,
            handler: impl FnMut(MouseEvent) + 'static,
        ) -> Result<Self, JsValue> {
            let closure = Closure::new(handler);
            canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            Ok(Self {
                canvas: canvas.clone(),
                kind,
                closure,
            })
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(
                    self.kind,
                    self.closure.as_ref().unchecked_ref(),
                );
        }
    }

    /// Pointer position in canvas-local coordinates
    fn event_pos(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            event.client_x() as f32 - rect.left() as f32,
            event.client_y() as f32 - rect.top() as f32,
        )
    }

    fn lookup_canvas(
        canvas_id: &str,
        width: f32,
        height: f32,
    ) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
        let document = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("canvas not found"))?
            .dyn_into()?;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok((canvas, ctx))
    }

    fn load_audio() -> Rc<AudioManager> {
        let settings = Settings::load();
        let mut audio = AudioManager::new();
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        Rc::new(audio)
    }

    // === Bubble Pop ===

    /// A mounted Bubble Pop game. Owns the frame loop, the click listener
    /// and the round state; `unmount` releases all three synchronously.
    #[wasm_bindgen]
    pub struct BubbleHandle {
        round: Rc<RefCell<BubbleRound>>,
        ctx: CanvasRenderingContext2d,
        audio: Rc<AudioManager>,
        frame_loop: Option<FrameLoop>,
        click: Option<Listener>,
    }

    impl BubbleHandle {
        /// (Re)arm the frame loop; it stops itself at the terminal state
        /// so the end panel is drawn exactly once.
        fn start_loop(&mut self) {
            if let Some(frame_loop) = self.frame_loop.take() {
                frame_loop.stop();
            }
            let round = self.round.clone();
            let audio = self.audio.clone();
            let ctx = self.ctx.clone();
            self.frame_loop = Some(FrameLoop::start(move |_time| {
                let now = js_sys::Date::now();
                let mut round = round.borrow_mut();
                round.frame(now);
                for event in round.take_events() {
                    audio.play(match event {
                        GameEvent::GoodPop => SoundEffect::Pop,
                        GameEvent::BadPop => SoundEffect::Boom,
                    });
                }
                render::draw_bubble_frame(&ctx, &round, now);
                !round.is_over()
            }));
        }
    }

    #[wasm_bindgen]
    impl BubbleHandle {
        /// Discard the round and start a fresh one
        pub fn restart(&mut self) {
            if self.click.is_none() {
                log::warn!("restart on unmounted game ignored");
                return;
            }
            let now = js_sys::Date::now();
            *self.round.borrow_mut() = BubbleRound::new(now as u64, now);
            self.start_loop();
            log::info!("Bubble Pop restarted");
        }

        /// Stop the frame loop and remove the input listener. Idempotent;
        /// no simulation state mutates after this returns.
        pub fn unmount(&mut self) {
            if let Some(frame_loop) = self.frame_loop.take() {
                frame_loop.stop();
            }
            if self.click.take().is_some() {
                log::info!("Bubble Pop unmounted");
            }
        }

        pub fn is_over(&self) -> bool {
            self.round.borrow().is_over()
        }

        pub fn score(&self) -> u32 {
            self.round.borrow().score
        }

        pub fn lives(&self) -> u32 {
            self.round.borrow().lives
        }

        /// Frozen hit percentage; 0 until the round is over
        pub fn accuracy(&self) -> f64 {
            self.round.borrow().stats().map_or(0.0, |s| s.accuracy)
        }

        /// Frozen mean reaction time in seconds; 0 until the round is over
        pub fn avg_reaction_secs(&self) -> f64 {
            self.round
                .borrow()
                .stats()
                .map_or(0.0, |s| s.avg_reaction_secs)
        }
    }

    impl Drop for BubbleHandle {
        fn drop(&mut self) {
            self.unmount();
        }
    }

    /// Mount Bubble Pop onto the canvas with the given element id and
    /// start its frame loop immediately.
    #[wasm_bindgen]
    pub fn mount_bubble(canvas_id: &str) -> Result<BubbleHandle, JsValue> {
        init();
        let (canvas, ctx) = lookup_canvas(canvas_id, BUBBLE_WIDTH, BUBBLE_HEIGHT)?;
        let audio = load_audio();

        let now = js_sys::Date::now();
        let round = Rc::new(RefCell::new(BubbleRound::new(now as u64, now)));

        let click = {
            let round = round.clone();
            let canvas_for_pos = canvas.clone();
            Listener::attach(&canvas, "mousedown", move |event: MouseEvent| {
                let pos = event_pos(&canvas_for_pos, &event);
                round.borrow_mut().pointer_down(pos, js_sys::Date::now());
            })?
        };

        let mut handle = BubbleHandle {
            round,
            ctx,
            audio,
            frame_loop: None,
            click: Some(click),
        };
        handle.start_loop();
        log::info!("Bubble Pop mounted");
        Ok(handle)
    }

    // === Zen Sorting ===

    /// A mounted Zen Sorting game. Owns the frame loop, the three pointer
    /// listeners and the round state.
    #[wasm_bindgen]
    pub struct GardenHandle {
        round: Rc<RefCell<GardenRound>>,
        ctx: CanvasRenderingContext2d,
        frame_loop: Option<FrameLoop>,
        listeners: Vec<Listener>,
    }

    impl GardenHandle {
        fn start_loop(&mut self) {
            if let Some(frame_loop) = self.frame_loop.take() {
                frame_loop.stop();
            }
            let round = self.round.clone();
            let ctx = self.ctx.clone();
            self.frame_loop = Some(FrameLoop::start(move |_time| {
                let now = js_sys::Date::now();
                let mut round = round.borrow_mut();
                round.frame(now);
                render::draw_garden_frame(&ctx, &round, now);
                !round.is_complete()
            }));
        }
    }

    #[wasm_bindgen]
    impl GardenHandle {
        /// Discard the round and start a fresh one
        pub fn restart(&mut self) {
            if self.listeners.is_empty() {
                log::warn!("restart on unmounted game ignored");
                return;
            }
            *self.round.borrow_mut() = GardenRound::new();
            self.start_loop();
            log::info!("Zen Sorting restarted");
        }

        /// Stop the frame loop and remove all pointer listeners. Idempotent.
        pub fn unmount(&mut self) {
            if let Some(frame_loop) = self.frame_loop.take() {
                frame_loop.stop();
            }
            if !self.listeners.is_empty() {
                self.listeners.clear();
                log::info!("Zen Sorting unmounted");
            }
        }

        pub fn is_complete(&self) -> bool {
            self.round.borrow().is_complete()
        }
    }

    impl Drop for GardenHandle {
        fn drop(&mut self) {
            self.unmount();
        }
    }

    /// Mount Zen Sorting onto the canvas with the given element id and
    /// start its frame loop immediately.
    #[wasm_bindgen]
    pub fn mount_garden(canvas_id: &str) -> Result<GardenHandle, JsValue> {
        init();
        let (canvas, ctx) = lookup_canvas(canvas_id, GARDEN_WIDTH, GARDEN_HEIGHT)?;

        let round = Rc::new(RefCell::new(GardenRound::new()));

        let down = {
            let round = round.clone();
            let canvas_for_pos = canvas.clone();
            Listener::attach(&canvas, "mousedown", move |event: MouseEvent| {
                let pos = event_pos(&canvas_for_pos, &event);
                round.borrow_mut().pointer_down(pos);
            })?
        };
        let moved = {
            let round = round.clone();
            let canvas_for_pos = canvas.clone();
            Listener::attach(&canvas, "mousemove", move |event: MouseEvent| {
                let pos = event_pos(&canvas_for_pos, &event);
                round.borrow_mut().pointer_move(pos);
            })?
        };
        let up = {
            let round = round.clone();
            Listener::attach(&canvas, "mouseup", move |_event: MouseEvent| {
                round.borrow_mut().pointer_up(js_sys::Date::now());
            })?
        };

        let mut handle = GardenHandle {
            round,
            ctx,
            frame_loop: None,
            listeners: vec![down, moved, up],
        };
        handle.start_loop();
        log::info!("Zen Sorting mounted");
        Ok(handle)
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Zen Arcade (native) starting...");
    headless_demo();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive a short seeded Bubble Pop round at a simulated 60 Hz, popping
/// whatever drifts under a fixed cursor, and log the frozen stats.
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() {
    use glam::Vec2;
    use zen_arcade::circle_contains;
    use zen_arcade::sim::BubbleRound;

    let mut round = BubbleRound::new(12345, 0.0);
    let cursor = Vec2::new(350.0, 225.0);
    let mut now = 0.0;
    while !round.is_over() {
        now += 1000.0 / 60.0;
        round.frame(now);
        if round
            .bubbles
            .iter()
            .any(|b| circle_contains(b.pos, b.radius, cursor))
        {
            round.pointer_down(cursor, now);
        }
    }

    let stats = round.stats().expect("round finished");
    log::info!(
        "headless round: score {} lives {} accuracy {:.1}% avg reaction {:.2}s",
        stats.score,
        stats.lives,
        stats.accuracy,
        stats.avg_reaction_secs
    );
}
