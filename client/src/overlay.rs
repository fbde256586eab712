use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement};

use mathboard_shared::{LabelId, OverlayLabel, Point};

const LABEL_ATTR: &str = "data-label-id";

fn position_css(position: Point) -> String {
    format!("translate({}px, {}px)", position.x, position.y)
}

fn label_element(overlay_el: &HtmlElement, id: LabelId) -> Option<HtmlElement> {
    overlay_el
        .query_selector(&format!("[{LABEL_ATTR}=\"{id}\"]"))
        .ok()
        .flatten()
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
}

pub fn place_label(overlay_el: &HtmlElement, id: LabelId, position: Point) {
    if let Some(element) = label_element(overlay_el, id) {
        let _ = element
            .style()
            .set_property("transform", &position_css(position));
    }
}

/// Brings the overlay layer in line with the board's labels. Existing
/// elements keep their (possibly already typeset) content and only move.
pub fn sync_labels(document: &Document, overlay_el: &HtmlElement, labels: &[OverlayLabel]) {
    if labels.is_empty() {
        overlay_el.set_inner_html("");
        return;
    }
    for label in labels {
        if label_element(overlay_el, label.id).is_some() {
            place_label(overlay_el, label.id, label.position);
            continue;
        }
        let Ok(element) = document.create_element("div") else {
            continue;
        };
        let Ok(wrapper) = element.dyn_into::<HtmlElement>() else {
            continue;
        };
        let _ = wrapper.set_attribute("class", "label");
        let _ = wrapper.set_attribute(LABEL_ATTR, &label.id.to_string());
        let _ = wrapper
            .style()
            .set_property("transform", &position_css(label.position));
        if let Ok(content) = document.create_element("div") {
            let _ = content.set_attribute("class", "latex-content");
            content.set_text_content(Some(&label.latex));
            let _ = wrapper.append_child(&content);
        }
        let _ = overlay_el.append_child(&wrapper);
    }
}

pub fn label_id_from_event(event: &Event) -> Option<LabelId> {
    let mut current = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = current {
        if let Some(id) = element.get_attribute(LABEL_ATTR) {
            return id.parse::<LabelId>().ok();
        }
        current = element.parent_element();
    }
    None
}

/// Position of a label after the pointer moved from `start` to `now`.
pub fn dragged_position(origin: Point, start: (f64, f64), now: (f64, f64)) -> Point {
    Point {
        x: origin.x + (now.0 - start.0) as f32,
        y: origin.y + (now.1 - start.1) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_offsets_from_origin() {
        let moved = dragged_position(Point::new(10.0, 20.0), (100.0, 100.0), (130.0, 90.0));
        assert_eq!(moved, Point::new(40.0, 10.0));
    }

    #[test]
    fn position_is_a_translate() {
        assert_eq!(position_css(Point::new(1.5, 2.0)), "translate(1.5px, 2px)");
    }
}
