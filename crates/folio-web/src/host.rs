//! Browser implementation of the Folio host
//!
//! Backs the `Host` trait with `web-sys`: frames from [`FrameSource`],
//! location and history from `window`, anchors from the document.

use std::cell::RefCell;

use folio_core::SiteConfig;
use folio_hal::{ClickHandler, FrameCallback, Host, HostError, PopStateHandler};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlAnchorElement, Window};

use crate::frames::{js_error, FrameSource};
use crate::log;

/// JS property holding the click handler of an anchor wired for soft
/// navigation; the handler is collected together with its anchor
const HIJACKED_PROPERTY: &str = "hijacked";

/// Host over the page's `window` and `document`
pub struct WebHost {
    window: Window,
    document: Document,
    frames: FrameSource,
    stats_element_id: String,
    stats_element: RefCell<Option<Element>>,
    /// Window-level closures must be stored to prevent garbage collection
    listeners: RefCell<Vec<Closure<dyn FnMut(Event)>>>,
}

impl WebHost {
    /// Bind to the global `window` and `document`
    pub fn new(config: &SiteConfig) -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::MissingGlobal("window"))?;
        let document = window
            .document()
            .ok_or(HostError::MissingGlobal("document"))?;
        let frames = FrameSource::detect(&window, config.fallback_frame_ms);
        if !frames.is_native() {
            log("[web-host] requestAnimationFrame unavailable, using timer frames");
        }

        Ok(Self {
            window,
            document,
            frames,
            stats_element_id: config.stats_element_id.clone(),
            stats_element: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// Page document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Diagnostics element, looked up until it is found
    pub fn stats_element(&self) -> Option<Element> {
        let mut cached = self.stats_element.borrow_mut();
        if cached.is_none() {
            *cached = self.document.get_element_by_id(&self.stats_element_id);
        }
        cached.clone()
    }

    /// Number of window-level listeners held by the host
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn listen<T>(&self, target: &T, event: &str, closure: Closure<dyn FnMut(Event)>) -> Result<(), HostError>
    where
        T: AsRef<web_sys::EventTarget>,
    {
        target
            .as_ref()
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.listeners.borrow_mut().push(closure);
        Ok(())
    }
}

impl Host for WebHost {
    type Anchor = HtmlAnchorElement;

    fn request_frame(&self, callback: FrameCallback) -> Result<(), HostError> {
        self.frames.request(&self.window, self.now_ms(), callback)
    }

    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn location_href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn origin(&self) -> String {
        let location = self.window.location();
        let protocol = location.protocol().unwrap_or_default();
        let hostname = location.hostname().unwrap_or_default();
        match location.port() {
            Ok(port) if !port.is_empty() => format!("{}//{}:{}", protocol, hostname, port),
            _ => format!("{}//{}", protocol, hostname),
        }
    }

    fn supports_history(&self) -> bool {
        self.window
            .history()
            .map(|history| {
                js_sys::Reflect::has(&history, &"pushState".into()).unwrap_or(false)
            })
            .unwrap_or(false)
    }

    fn push_state(&self, href: &str) -> Result<(), HostError> {
        self.window
            .history()
            .map_err(js_error)?
            .push_state_with_url(&JsValue::NULL, "", Some(href))
            .map_err(js_error)
    }

    fn load(&self, href: &str) -> Result<(), HostError> {
        self.window.location().set_href(href).map_err(js_error)
    }

    fn on_popstate(&self, handler: PopStateHandler) -> Result<(), HostError> {
        let closure = Closure::wrap(Box::new(move |_: Event| handler()) as Box<dyn FnMut(Event)>);
        self.listen(&self.window, "popstate", closure)
    }

    fn anchors(&self) -> Vec<Self::Anchor> {
        let nodes = match self.document.query_selector_all("a[href]") {
            Ok(nodes) => nodes,
            Err(e) => {
                log(&format!("[web-host] anchor query failed: {:?}", e));
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<HtmlAnchorElement>().ok())
            .collect()
    }

    fn anchor_attr(&self, anchor: &Self::Anchor, name: &str) -> Option<String> {
        anchor.get_attribute(name)
    }

    fn anchor_href(&self, anchor: &Self::Anchor) -> String {
        anchor.href()
    }

    fn is_hijacked(&self, anchor: &Self::Anchor) -> bool {
        js_sys::Reflect::get(anchor, &HIJACKED_PROPERTY.into())
            .map(|v| v.is_truthy())
            .unwrap_or(false)
    }

    fn hijack(&self, anchor: &Self::Anchor, handler: ClickHandler) -> Result<(), HostError> {
        let on_click = Closure::wrap(Box::new(move |event: Event| {
            let href = event
                .current_target()
                .and_then(|t| t.dyn_into::<HtmlAnchorElement>().ok())
                .map(|a| a.href());
            if let Some(href) = href {
                event.prevent_default();
                handler(href);
            }
        }) as Box<dyn FnMut(Event)>)
        .into_js_value();

        anchor
            .add_event_listener_with_callback("click", on_click.unchecked_ref())
            .map_err(js_error)?;
        js_sys::Reflect::set(anchor, &HIJACKED_PROPERTY.into(), &on_click).map_err(js_error)?;
        Ok(())
    }

    fn show_stats(&self, markup: &str) -> bool {
        match self.stats_element() {
            Some(element) => {
                element.set_inner_html(markup);
                true
            }
            None => false,
        }
    }

    fn debug_write(&self, msg: &str) {
        log(msg);
    }
}
