//! Browser shell around [`PuzzleController`]: DOM lookups, event wiring,
//! the one-second ticker and canvas redraws.
//!
//! Expected page elements (all optional except the document itself):
//! `#startGame` button, `#difficulty` select, `#imageUpload` file input,
//! `#timer` text, `#newGameSound` / `#correctSound` audio, and either a
//! `#puzzleCanvas` canvas or a `#puzzleBoard` container to create it in.

use std::cell::RefCell;

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Interval;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlInputElement,
    HtmlSelectElement, MouseEvent, TouchEvent, Window, window,
};

use crate::config::PuzzleConfig;
use crate::controller::{DragState, DropOutcome, InputOutcome, PuzzleController};
use crate::error::{ConfigurationError, DecodeError, PuzzleError};
use crate::input::{InputEvent, InputEventKind, PointerKind, TouchPoint};
use crate::layout::{Point, Rect};

mod audio;
mod image;
mod render;

use audio::AudioFeedback;
use image::LoadedImage;

const CANVAS_ID: &str = "puzzleCanvas";

struct WebState {
    controller: PuzzleController<AudioFeedback>,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    picture: Option<LoadedImage>,
    // Dropping the interval cancels it.
    ticker: Option<Interval>,
    timer_display: Option<Element>,
}

thread_local! {
    static APP: RefCell<Option<WebState>> = const { RefCell::new(None) };
}

/// Runs `f` against the mounted app. Returns `None` before mount or if the
/// state is already borrowed further up the stack.
fn with_app<T>(f: impl FnOnce(&mut WebState) -> T) -> Option<T> {
    APP.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

/// Shows a configuration or decode problem to the player.
fn report(err: PuzzleError) {
    gloo::console::warn!("puzzle:", err.to_string());
    gloo::dialogs::alert(&err.to_string());
}

fn parse_config(raw: Option<&str>) -> Result<PuzzleConfig, ConfigurationError> {
    match raw {
        #[cfg(feature = "serde_json")]
        Some(json) => PuzzleConfig::from_json(json),
        #[cfg(not(feature = "serde_json"))]
        Some(_) => {
            gloo::console::warn!("puzzle: JSON config ignored (built without serde_json)");
            Ok(PuzzleConfig::default())
        }
        None => Ok(PuzzleConfig::default()),
    }
}

fn viewport_width(win: &Window) -> f64 {
    win.inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(f64::NAN)
}

fn find_or_create_canvas(doc: &Document) -> Result<HtmlCanvasElement, JsValue> {
    if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        return Ok(el.dyn_into()?);
    }
    let canvas: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    canvas.set_id(CANVAS_ID);
    canvas
        .set_attribute("style", "touch-action:none; display:block; margin:0 auto;")
        .ok();
    let host: Element = match doc.get_element_by_id("puzzleBoard") {
        Some(board) => board,
        None => doc
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .into(),
    };
    host.append_child(&canvas)?;
    Ok(canvas)
}

pub(crate) fn mount(config_json: Option<String>) -> Result<(), JsValue> {
    // Listeners are forgotten, so a second mount would double every handler.
    if APP.with(|cell| cell.try_borrow().map_or(true, |app| app.is_some())) {
        return Err(JsValue::from_str("puzzle already mounted"));
    }
    let config = parse_config(config_json.as_deref())?;
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas = find_or_create_canvas(&doc)?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let feedback = AudioFeedback::from_document(&doc, config.completion_notice_delay_ms);
    let mut controller = PuzzleController::new(config, feedback, StdRng::from_entropy())?;
    controller.set_viewport_width(viewport_width(&win));
    if let Some(select) = doc
        .get_element_by_id("difficulty")
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
    {
        if let Err(err) = controller.set_difficulty(&select.value()) {
            gloo::console::warn!("puzzle: ignoring initial difficulty:", err.to_string());
        }
    }

    let state = WebState {
        controller,
        canvas: canvas.clone(),
        ctx,
        picture: None,
        ticker: None,
        timer_display: doc.get_element_by_id("timer"),
    };
    APP.with(|cell| *cell.borrow_mut() = Some(state));

    wire_controls(&doc);
    wire_pointer(&win, &canvas);
    with_app(|app| {
        app.fit_canvas();
        app.show_time(0);
        app.redraw();
    });
    gloo::console::log!("puzzle: mounted");
    Ok(())
}

fn wire_controls(doc: &Document) {
    if let Some(button) = doc.get_element_by_id("startGame") {
        EventListener::new(&button, "click", |_| {
            with_app(WebState::start);
        })
        .forget();
    }

    if let Some(select) = doc
        .get_element_by_id("difficulty")
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
    {
        let source = select.clone();
        EventListener::new(&select, "change", move |_| {
            let value = source.value();
            with_app(|app| app.change_difficulty(&value));
        })
        .forget();
    }

    if let Some(input) = doc
        .get_element_by_id("imageUpload")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        let source = input.clone();
        EventListener::new(&input, "change", move |_| {
            let Some(file) = source.files().and_then(|files| files.get(0)) else {
                return;
            };
            let started = image::load_file(file, |result| {
                with_app(|app| app.picture_loaded(result));
            });
            if let Err(err) = started {
                gloo::console::error!("puzzle: could not start image load", err);
            }
        })
        .forget();
    }
}

fn wire_pointer(win: &Window, canvas: &HtmlCanvasElement) {
    EventListener::new(canvas, "mousedown", |event| {
        let Some(evt) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        if evt.button() != 0 {
            return;
        }
        with_app(|app| app.on_mouse(InputEventKind::Down, evt));
    })
    .forget();
    // Move and release are tracked on the window so a drop outside the
    // canvas still resolves (back to the tray).
    EventListener::new(win, "mousemove", |event| {
        if let Some(evt) = event.dyn_ref::<MouseEvent>() {
            with_app(|app| app.on_mouse(InputEventKind::Move, evt));
        }
    })
    .forget();
    EventListener::new(win, "mouseup", |event| {
        if let Some(evt) = event.dyn_ref::<MouseEvent>() {
            with_app(|app| app.on_mouse(InputEventKind::Up, evt));
        }
    })
    .forget();
    EventListener::new(win, "blur", |_| {
        with_app(|app| app.on_cancel());
    })
    .forget();
    EventListener::new(win, "resize", |_| {
        let width = window().map(|w| viewport_width(&w)).unwrap_or(f64::NAN);
        with_app(|app| app.controller.set_viewport_width(width));
    })
    .forget();

    let touch_kinds = [
        ("touchstart", InputEventKind::Down),
        ("touchmove", InputEventKind::Move),
        ("touchend", InputEventKind::Up),
        ("touchcancel", InputEventKind::Cancel),
    ];
    for (name, kind) in touch_kinds {
        EventListener::new_with_options(
            canvas,
            name,
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                if let Some(evt) = event.dyn_ref::<TouchEvent>() {
                    with_app(|app| app.on_touch(kind, evt));
                }
            },
        )
        .forget();
    }
}

impl WebState {
    fn client_point(&self, client_x: i32, client_y: i32) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        Point::from_client(
            Point::new(client_x as f64, client_y as f64),
            Rect::new(rect.left(), rect.top(), rect.width(), rect.height()),
            (self.canvas.width() as f64, self.canvas.height() as f64),
        )
    }

    fn on_mouse(&mut self, kind: InputEventKind, evt: &MouseEvent) {
        let p = self.client_point(evt.client_x(), evt.client_y());
        self.on_input(InputEvent::mouse(kind, p.x, p.y));
    }

    fn on_touch(&mut self, kind: InputEventKind, evt: &TouchEvent) {
        let list = evt.changed_touches();
        let changed: Vec<TouchPoint> = (0..list.length())
            .filter_map(|i| list.get(i))
            .map(|touch| TouchPoint {
                identifier: touch.identifier(),
                point: self.client_point(touch.client_x(), touch.client_y()),
            })
            .collect();
        let active = match self.controller.drag() {
            DragState::Dragging(active) => Some(active.pointer),
            DragState::Idle => None,
        };
        if let Some(event) = InputEvent::from_touches(kind, active, &changed) {
            self.on_input(event);
        }
    }

    fn on_cancel(&mut self) {
        if self.controller.cancel_drag().is_some() {
            self.redraw();
        }
    }

    fn on_input(&mut self, event: InputEvent) {
        let outcome = self.controller.handle_input(event);
        match outcome {
            InputOutcome::Ignored => return,
            InputOutcome::Dropped(DropOutcome::Rejected { violation, .. }) => {
                let source = match event.pointer_kind {
                    PointerKind::Mouse => "mouse",
                    PointerKind::Touch => "touch",
                };
                gloo::console::warn!("puzzle: malformed", source, "drop:", violation.to_string());
            }
            InputOutcome::Dropped(drop) => {
                if let Some(done) = drop.completion() {
                    self.ticker = None;
                    self.show_time(done.elapsed_secs);
                }
            }
            _ => {}
        }
        self.redraw();
    }

    fn start(&mut self) {
        match self.controller.start_game() {
            Ok(()) => self.on_new_session(),
            Err(err) => report(err.into()),
        }
    }

    fn change_difficulty(&mut self, value: &str) {
        match self.controller.set_difficulty(value) {
            Ok(true) => self.on_new_session(),
            Ok(false) => {}
            Err(err) => report(err.into()),
        }
    }

    fn picture_loaded(&mut self, result: Result<LoadedImage, DecodeError>) {
        let loaded = match result {
            Ok(loaded) => loaded,
            Err(err) => return report(err.into()),
        };
        match self.controller.load_image(loaded.source()) {
            Ok(()) => {
                self.picture = Some(loaded);
                self.on_new_session();
            }
            Err(err) => report(err),
        }
    }

    fn on_new_session(&mut self) {
        let tick_ms = self.controller.config().tick_ms;
        self.ticker = Some(Interval::new(tick_ms, || {
            with_app(WebState::on_tick);
        }));
        self.fit_canvas();
        self.show_time(0);
        self.redraw();
        gloo::console::log!(
            "puzzle: new game",
            u32::from(self.controller.grid_size().get())
        );
    }

    fn on_tick(&mut self) {
        if let Some(elapsed) = self.controller.tick() {
            self.show_time(elapsed);
        }
    }

    fn show_time(&self, elapsed: u32) {
        if let Some(el) = &self.timer_display {
            el.set_text_content(Some(&crate::timer::format_elapsed(elapsed)));
        }
    }

    fn fit_canvas(&self) {
        let Some(layout) = self.controller.layout() else {
            self.canvas.set_width(render::IDLE_CANVAS_PX);
            self.canvas.set_height(render::IDLE_CANVAS_PX);
            return;
        };
        let (w, h) = layout.canvas_size();
        self.canvas.set_width(w.ceil() as u32);
        self.canvas.set_height(h.ceil() as u32);
    }

    fn redraw(&self) {
        let picture = self.picture.as_ref().map(LoadedImage::element);
        if let Err(err) = render::draw(&self.ctx, &self.canvas, &self.controller, picture) {
            gloo::console::error!("puzzle: draw failed", err);
        }
    }
}
