use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlScriptElement, Window};

pub const MATHJAX_SRC: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.7.9/MathJax.js?config=TeX-MML-AM_CHTML";

/// Renders math markup inside an element. Calls are best-effort and return
/// before the typesetting finishes.
pub trait Typesetter {
    fn is_ready(&self) -> bool;
    fn typeset(&self, root: &Element);
}

/// MathJax 2 loaded from a CDN script tag, once per page.
pub struct MathJax {
    window: Window,
    ready: Rc<Cell<bool>>,
    queued: Rc<RefCell<Vec<Element>>>,
}

impl MathJax {
    pub fn load(window: &Window, document: &Document) -> Result<Rc<Self>, JsValue> {
        let typesetter = Rc::new(MathJax {
            window: window.clone(),
            ready: Rc::new(Cell::new(false)),
            queued: Rc::new(RefCell::new(Vec::new())),
        });

        if hub(window).is_some() {
            configure(window);
            typesetter.ready.set(true);
            return Ok(typesetter);
        }

        let script: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
        script.set_src(MATHJAX_SRC);
        script.set_async(true);

        {
            let window = window.clone();
            let ready = typesetter.ready.clone();
            let queued = typesetter.queued.clone();
            let onload = Closure::<dyn FnMut(Event)>::new(move |_| {
                configure(&window);
                ready.set(true);
                log::info!("MathJax ready");
                let pending = std::mem::take(&mut *queued.borrow_mut());
                for root in pending {
                    queue_typeset(&window, &root);
                }
            });
            script.add_event_listener_with_callback("load", onload.as_ref().unchecked_ref())?;
            onload.forget();
        }
        {
            let onerror = Closure::<dyn FnMut(Event)>::new(move |_| {
                log::warn!("MathJax failed to load; results stay as raw markup");
            });
            script.add_event_listener_with_callback("error", onerror.as_ref().unchecked_ref())?;
            onerror.forget();
        }

        let head = document
            .head()
            .ok_or_else(|| JsValue::from_str("Missing document head"))?;
        head.append_child(&script)?;
        Ok(typesetter)
    }
}

impl Typesetter for MathJax {
    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn typeset(&self, root: &Element) {
        if !self.is_ready() {
            let mut queued = self.queued.borrow_mut();
            if !queued.iter().any(|element| element == root) {
                queued.push(root.clone());
            }
            return;
        }
        queue_typeset(&self.window, root);
    }
}

fn hub(window: &Window) -> Option<JsValue> {
    let mathjax = Reflect::get(window.as_ref(), &JsValue::from_str("MathJax")).ok()?;
    if mathjax.is_undefined() || mathjax.is_null() {
        return None;
    }
    let hub = Reflect::get(&mathjax, &JsValue::from_str("Hub")).ok()?;
    if hub.is_undefined() || hub.is_null() {
        None
    } else {
        Some(hub)
    }
}

fn hub_method(hub: &JsValue, name: &str) -> Option<Function> {
    Reflect::get(hub, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

fn configure(window: &Window) {
    let Some(hub) = hub(window) else {
        return;
    };
    let Some(config) = hub_method(&hub, "Config") else {
        return;
    };
    let inline_math = Array::of2(
        &Array::of2(&"$".into(), &"$".into()),
        &Array::of2(&"\\(".into(), &"\\)".into()),
    );
    let tex2jax = Object::new();
    let _ = Reflect::set(&tex2jax, &"inlineMath".into(), &inline_math);
    let options = Object::new();
    let _ = Reflect::set(&options, &"tex2jax".into(), &tex2jax);
    if let Err(error) = config.call1(&hub, &options) {
        log::warn!("MathJax config failed: {error:?}");
    }
}

fn queue_typeset(window: &Window, root: &Element) {
    let Some(hub) = hub(window) else {
        return;
    };
    let Some(queue) = hub_method(&hub, "Queue") else {
        return;
    };
    let command = Array::of3(&"Typeset".into(), &hub, &JsValue::from(root.clone()));
    if let Err(error) = queue.call1(&hub, &command) {
        log::warn!("MathJax typeset failed: {error:?}");
    }
}
