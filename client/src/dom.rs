use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlCanvasElement, PointerEvent, Window};

use mathboard_shared::{normalize_point, Point};

use crate::render::redraw;
use crate::state::State;

pub fn get_element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element: {id}")))?;
    element
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Invalid element type: {id}")))
}

pub fn set_status(status_el: &Element, status_text: &Element, state: &str, text: &str) {
    let _ = status_el.set_attribute("data-state", state);
    status_text.set_text_content(Some(text));
}

pub fn set_retry_visible(retry_button: &HtmlButtonElement, visible: bool) {
    if visible {
        let _ = retry_button.remove_attribute("hidden");
    } else {
        let _ = retry_button.set_attribute("hidden", "");
    }
}

pub fn set_surface_inked(canvas: &HtmlCanvasElement, inked: bool) {
    if inked {
        let _ = canvas.style().set_property("background", "black");
    }
}

pub fn resize_canvas(window: &Window, state: &mut State) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0)
        - state.canvas.offset_top() as f64;
    let width = width.max(0.0) as u32;
    let height = height.max(0.0) as u32;
    log::debug!("resizing canvas to {width}x{height}");

    state.canvas.set_width(width);
    state.canvas.set_height(height);
    state.board.resize(width, height);
    redraw(state);
}

pub fn event_to_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Option<Point> {
    let rect = canvas.get_bounding_client_rect();
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return None;
    }
    let x = event.client_x() as f64 - rect.left();
    let y = event.client_y() as f64 - rect.top();
    normalize_point(Point {
        x: x as f32,
        y: y as f32,
    })
}
