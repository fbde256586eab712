use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, HtmlButtonElement, HtmlCanvasElement,
    HtmlElement, PointerEvent, Window,
};

use mathboard_shared::{PendingReveal, SubmitError, REVEAL_DELAY_MS, SWATCHES};

use crate::config::{debug_enabled, resolve_api_url, BUILD_API_URL};
use crate::dom::{
    event_to_point, get_element, resize_canvas, set_retry_visible, set_status, set_surface_inked,
};
use crate::net::{fetch_config, submit};
use crate::overlay::{dragged_position, label_id_from_event, place_label, sync_labels};
use crate::palette::{render_palette, swatch_index_from_event};
use crate::render::{paint_region, redraw};
use crate::state::{DragMode, State};
use crate::typeset::{MathJax, Typesetter};

/// Elements and capabilities every handler needs.
#[derive(Clone)]
struct Ui {
    document: Document,
    overlay_el: HtmlElement,
    status_el: Element,
    status_text: Element,
    retry_button: HtmlButtonElement,
    typesetter: Rc<dyn Typesetter>,
}

impl Ui {
    fn status(&self, state: &str, text: &str) {
        set_status(&self.status_el, &self.status_text, state, text);
    }
}

fn canvas_context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

fn init_logging(window: &Window) {
    let search = window.location().search().ok().unwrap_or_default();
    let level = if debug_enabled(&search) {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    let _ = console_log::init_with_level(level);
}

#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
    init_logging(&window);
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("Missing document"))?;

    let canvas: HtmlCanvasElement = get_element(&document, "board")?;
    let ctx = canvas_context(&canvas);
    if ctx.is_none() {
        log::warn!("canvas has no 2d context; drawing is disabled");
    }
    let palette_el: HtmlElement = get_element(&document, "palette")?;
    let overlay_el: HtmlElement = get_element(&document, "overlay")?;
    let reset_button: HtmlButtonElement = get_element(&document, "reset")?;
    let run_button: HtmlButtonElement = get_element(&document, "run")?;
    let retry_button: HtmlButtonElement = get_element(&document, "retry")?;
    let status_el = document
        .get_element_by_id("status")
        .ok_or_else(|| JsValue::from_str("Missing status element"))?;
    let status_text = document
        .get_element_by_id("statusText")
        .ok_or_else(|| JsValue::from_str("Missing status text"))?;

    let typesetter: Rc<dyn Typesetter> = MathJax::load(&window, &document)?;
    let ui = Ui {
        document: document.clone(),
        overlay_el: overlay_el.clone(),
        status_el,
        status_text,
        retry_button: retry_button.clone(),
        typesetter,
    };

    let state = Rc::new(RefCell::new(State::new(
        canvas.clone(),
        ctx,
        resolve_api_url(None, BUILD_API_URL),
    )));

    {
        let mut state = state.borrow_mut();
        resize_canvas(&window, &mut state);
        render_palette(&document, &palette_el, &SWATCHES, state.palette_selected);
    }
    set_retry_visible(&retry_button, false);
    ui.status("idle", "Ready");

    {
        let state = state.clone();
        spawn_local(async move {
            let served = fetch_config().await;
            let api_url = resolve_api_url(served.as_ref(), BUILD_API_URL);
            log::info!("recognizer endpoint {api_url}");
            state.borrow_mut().api_url = api_url;
        });
    }

    {
        let resize_state = state.clone();
        let window_cb = window.clone();
        let onresize = Closure::<dyn FnMut()>::new(move || {
            let mut state = resize_state.borrow_mut();
            resize_canvas(&window_cb, &mut state);
        });
        window.add_event_listener_with_callback("resize", onresize.as_ref().unchecked_ref())?;
        onresize.forget();
    }

    {
        let palette_state = state.clone();
        let palette_el_cb = palette_el.clone();
        let document = document.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(index) = swatch_index_from_event(&event) else {
                return;
            };
            let mut state = palette_state.borrow_mut();
            if !state.board.select_swatch(index) {
                return;
            }
            state.palette_selected = Some(index);
            render_palette(&document, &palette_el_cb, &SWATCHES, Some(index));
        });
        palette_el.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let reset_state = state.clone();
        let ui = ui.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            let mut state = reset_state.borrow_mut();
            state.board.reset();
            state.drag = DragMode::Idle;
            redraw(&state);
            sync_labels(&ui.document, &ui.overlay_el, state.board.labels());
            set_retry_visible(&ui.retry_button, false);
            ui.status("idle", "Ready");
            log::debug!("board reset epoch={}", state.board.epoch());
        });
        reset_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let run_state = state.clone();
        let ui = ui.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            submit_canvas(run_state.clone(), ui.clone());
        });
        run_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let retry_state = state.clone();
        let ui = ui.clone();
        let onclick = Closure::<dyn FnMut(Event)>::new(move |_| {
            submit_canvas(retry_state.clone(), ui.clone());
        });
        retry_button.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }

    {
        let down_state = state.clone();
        let down_canvas = canvas.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            let Some(point) = event_to_point(&down_canvas, &event) else {
                return;
            };
            event.prevent_default();
            let mut state = down_state.borrow_mut();
            state.board.pointer_down(point);
            set_surface_inked(&down_canvas, state.board.inked());
        });
        canvas.add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let move_state = state.clone();
        let move_canvas = canvas.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = move_state.borrow_mut();
            if !state.board.is_drawing() {
                return;
            }
            let Some(point) = event_to_point(&move_canvas, &event) else {
                return;
            };
            event.prevent_default();
            if let Some(dirty) = state.board.pointer_move(point) {
                paint_region(&state, dirty);
            }
        });
        canvas.add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let stop_state = state.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = stop_state.borrow_mut();
            if !state.board.is_drawing() {
                return;
            }
            if event.type_() == "pointerleave" {
                state.board.pointer_leave();
            } else {
                state.board.pointer_up();
            }
        });
        canvas.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        canvas
            .add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        canvas.add_event_listener_with_callback("pointerleave", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    {
        let drag_state = state.clone();
        let drag_overlay = overlay_el.clone();
        let ondown = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            let Some(id) = label_id_from_event(&event) else {
                return;
            };
            let mut state = drag_state.borrow_mut();
            let Some(origin) = state.board.label(id).map(|label| label.position) else {
                return;
            };
            event.prevent_default();
            state.drag = DragMode::Dragging {
                id,
                pointer_id: event.pointer_id(),
                start_x: event.client_x() as f64,
                start_y: event.client_y() as f64,
                origin,
            };
            let _ = drag_overlay.set_pointer_capture(event.pointer_id());
        });
        overlay_el
            .add_event_listener_with_callback("pointerdown", ondown.as_ref().unchecked_ref())?;
        ondown.forget();
    }

    {
        let drag_state = state.clone();
        let drag_overlay = overlay_el.clone();
        let onmove = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = drag_state.borrow_mut();
            let DragMode::Dragging {
                id,
                pointer_id,
                start_x,
                start_y,
                origin,
            } = state.drag
            else {
                return;
            };
            if pointer_id != event.pointer_id() {
                return;
            }
            let position = dragged_position(
                origin,
                (start_x, start_y),
                (event.client_x() as f64, event.client_y() as f64),
            );
            if state.board.drag_label(id, position) {
                place_label(&drag_overlay, id, position);
            }
        });
        overlay_el
            .add_event_listener_with_callback("pointermove", onmove.as_ref().unchecked_ref())?;
        onmove.forget();
    }

    {
        let drag_state = state.clone();
        let drag_overlay = overlay_el.clone();
        let onstop = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let mut state = drag_state.borrow_mut();
            let DragMode::Dragging { pointer_id, .. } = state.drag else {
                return;
            };
            if pointer_id != event.pointer_id() {
                return;
            }
            state.drag = DragMode::Idle;
            if drag_overlay.has_pointer_capture(pointer_id) {
                let _ = drag_overlay.release_pointer_capture(pointer_id);
            }
        });
        overlay_el.add_event_listener_with_callback("pointerup", onstop.as_ref().unchecked_ref())?;
        overlay_el
            .add_event_listener_with_callback("pointercancel", onstop.as_ref().unchecked_ref())?;
        onstop.forget();
    }

    log::info!("mathboard ready");
    Ok(())
}

fn show_failure(ui: &Ui, error: &SubmitError) {
    log::warn!("submission failed: {error}");
    ui.status("error", &error.to_string());
    set_retry_visible(&ui.retry_button, error.is_retryable());
}

/// Serializes the canvas, posts it, and schedules the reveals. The canvas
/// stays drawable while the request is out.
fn submit_canvas(state: Rc<RefCell<State>>, ui: Ui) {
    let (submission, api_url) = {
        let state = state.borrow();
        match state.board.prepare_submission() {
            Ok(submission) => (submission, state.api_url.clone()),
            Err(error) => {
                show_failure(&ui, &error);
                return;
            }
        }
    };
    set_retry_visible(&ui.retry_button, false);
    ui.status("busy", "Calculating...");
    state.borrow_mut().in_flight += 1;

    spawn_local(async move {
        let result = submit(&api_url, &submission.request).await;
        let (reveals, still_pending) = {
            let mut state = state.borrow_mut();
            state.in_flight = state.in_flight.saturating_sub(1);
            let still_pending = state.in_flight > 0;
            match result {
                Ok(response) => {
                    let Some(reveals) = state.board.accept_response(&submission, &response)
                    else {
                        log::warn!(
                            "dropping response from epoch {} (board is at {})",
                            submission.epoch,
                            state.board.epoch()
                        );
                        return;
                    };
                    log::debug!(
                        "received {} results, {} variables bound",
                        reveals.len(),
                        state.board.bindings().len()
                    );
                    (reveals, still_pending)
                }
                Err(error) => {
                    show_failure(&ui, &error);
                    return;
                }
            }
        };
        if still_pending {
            ui.status("busy", "Calculating...");
        } else if reveals.is_empty() {
            ui.status("idle", "Nothing recognized");
        } else {
            ui.status("idle", "Ready");
        }
        reveal_in_sequence(state, ui, reveals).await;
    });
}

async fn reveal_in_sequence(state: Rc<RefCell<State>>, ui: Ui, reveals: Vec<PendingReveal>) {
    for pending in reveals {
        TimeoutFuture::new(REVEAL_DELAY_MS).await;
        let mut state = state.borrow_mut();
        let Some(id) = state.board.reveal(pending) else {
            log::debug!("reveal skipped after reset");
            return;
        };
        log::debug!("revealed label {id}");
        redraw(&state);
        sync_labels(&ui.document, &ui.overlay_el, state.board.labels());
        drop(state);
        ui.typesetter.typeset(&ui.overlay_el);
    }
}
