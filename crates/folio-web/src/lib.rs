//! Browser bindings for the Folio site framework
//!
//! This crate runs `folio-core` on a real page:
//! - `WebHost`: the `Host` trait over `web-sys`
//! - `SiteController`: the wasm-bindgen surface page scripts talk to
//!
//! Payloads cross the JS boundary as JSON.

mod fps_display;
mod frames;
mod host;

pub use fps_display::FpsDisplay;
pub use frames::FrameSource;
pub use host::WebHost;

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{
    listener, subscriber, FrameListener, Host, Payload, Site, SiteConfig, Subscriber,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn log_error(s: &str);
}

/// JS subscriber registered through the controller
struct JsSubscription {
    topic: String,
    func: js_sys::Function,
    subscriber: Subscriber<Payload>,
}

/// JS frame listener registered through the controller
struct JsFrameListener {
    func: js_sys::Function,
    listener: FrameListener,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteInfo {
    route: Option<String>,
    prev_route: Option<String>,
    soft_navigation: bool,
}

/// Site controller for WASM - wraps `Site` with a JS-friendly API
///
/// Every method takes `&self` so page callbacks may call back into the
/// controller while a message or frame is being dispatched.
#[wasm_bindgen]
pub struct SiteController {
    site: Site<WebHost>,
    subscriptions: RefCell<Vec<JsSubscription>>,
    frame_listeners: RefCell<Vec<JsFrameListener>>,
    _fps_display: Option<FpsDisplay>,
}

#[wasm_bindgen]
impl SiteController {
    /// Create a controller from a JSON config (empty for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<SiteController, JsValue> {
        // Set up panic hook for better error messages
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();

        let config = if config_json.trim().is_empty() {
            SiteConfig::default()
        } else {
            SiteConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let host = WebHost::new(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let fps_display = FpsDisplay::install(
            host.document(),
            &config.stats_element_id,
            &config.stats_reveal_key,
        )
        .unwrap_or_else(|e| {
            log(&format!("[site] fps display unavailable: {}", e));
            None
        });

        Ok(Self {
            site: Site::new(Rc::new(host), config),
            subscriptions: RefCell::new(Vec::new()),
            frame_listeners: RefCell::new(Vec::new()),
            _fps_display: fps_display,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start the frame loop and hijack the page's links
    #[wasm_bindgen]
    pub fn start(&self) {
        self.site.start();
    }

    /// Stop the frame loop
    #[wasm_bindgen]
    pub fn stop(&self) {
        self.site.frames().stop();
    }

    // =========================================================================
    // Message Bus
    // =========================================================================

    /// Subscribe `func` to `topic`; it receives the payload as a JS value
    ///
    /// An exception thrown by `func` is reported on `console.error` and the
    /// remaining subscribers still run.
    #[wasm_bindgen]
    pub fn on(&self, topic: &str, func: js_sys::Function) {
        if self.find_subscription(topic, &func).is_some() {
            return;
        }

        let callee = func.clone();
        let topic_name = topic.to_string();
        let sub = subscriber(move |payload: &Payload| {
            if let Err(e) = callee.call1(&JsValue::NULL, &payload_to_js(payload)) {
                log_error(&format!("[site] subscriber on {} threw: {:?}", topic_name, e));
            }
        });
        self.site.bus().on(topic, sub.clone());
        self.subscriptions.borrow_mut().push(JsSubscription {
            topic: topic.to_string(),
            func,
            subscriber: sub,
        });
    }

    /// Unsubscribe `func` from `topic`
    #[wasm_bindgen]
    pub fn off(&self, topic: &str, func: js_sys::Function) {
        if let Some(index) = self.find_subscription(topic, &func) {
            let entry = self.subscriptions.borrow_mut().remove(index);
            self.site.bus().off(topic, &entry.subscriber);
        }
    }

    /// Publish `value` on `topic`
    #[wasm_bindgen]
    pub fn send(&self, topic: &str, value: JsValue) {
        self.site.bus().send(topic, payload_from_js(&value));
    }

    // =========================================================================
    // Frames
    // =========================================================================

    /// Run `func(timestamp)` on every animation frame
    ///
    /// An exception thrown by `func` is reported on `console.error`; the
    /// frame loop keeps running.
    #[wasm_bindgen]
    pub fn on_frame(&self, func: js_sys::Function) {
        if self.find_frame_listener(&func).is_some() {
            return;
        }

        let callee = func.clone();
        let frame_listener = listener(move |timestamp| {
            if let Err(e) = callee.call1(&JsValue::NULL, &JsValue::from_f64(timestamp)) {
                log_error(&format!("[frames] listener threw: {:?}", e));
            }
        });
        self.site.frames().on(frame_listener.clone());
        self.frame_listeners.borrow_mut().push(JsFrameListener {
            func,
            listener: frame_listener,
        });
    }

    /// Stop calling `func` after the current frame
    #[wasm_bindgen]
    pub fn off_frame(&self, func: js_sys::Function) {
        if let Some(index) = self.find_frame_listener(&func) {
            let entry = self.frame_listeners.borrow_mut().remove(index);
            self.site.frames().off(&entry.listener);
        }
    }

    /// Frame statistics as JSON (`frameIndex`, `avgFrameTime`, `avgFps`)
    #[wasm_bindgen]
    pub fn get_stats_json(&self) -> String {
        serde_json::to_string(&self.site.frames().stats()).unwrap_or_else(|_| "{}".to_string())
    }

    // =========================================================================
    // Router
    // =========================================================================

    /// Navigate to `href`
    #[wasm_bindgen]
    pub fn navigate(&self, href: &str) {
        self.site.router().navigate(href);
    }

    /// Wire links added since the last scan; returns how many were wired
    #[wasm_bindgen]
    pub fn hijack_links(&self) -> u32 {
        self.site.router().hijack_links() as u32
    }

    /// Current route as JSON (`route`, `prevRoute`, `softNavigation`)
    #[wasm_bindgen]
    pub fn get_route_json(&self) -> String {
        let router = self.site.router();
        let info = RouteInfo {
            route: router.current_route(),
            prev_route: router.previous_route(),
            soft_navigation: router.soft_navigation(),
        };
        serde_json::to_string(&info).unwrap_or_else(|_| "{}".to_string())
    }

    /// Site origin the router strips from locations
    #[wasm_bindgen]
    pub fn origin(&self) -> String {
        self.site.host().origin()
    }
}

impl SiteController {
    fn find_subscription(&self, topic: &str, func: &js_sys::Function) -> Option<usize> {
        self.subscriptions
            .borrow()
            .iter()
            .position(|s| s.topic == topic && same_function(&s.func, func))
    }

    fn find_frame_listener(&self, func: &js_sys::Function) -> Option<usize> {
        self.frame_listeners
            .borrow()
            .iter()
            .position(|l| same_function(&l.func, func))
    }
}

/// JS identity (`===`)
fn same_function(a: &js_sys::Function, b: &js_sys::Function) -> bool {
    let a: &JsValue = a.as_ref();
    let b: &JsValue = b.as_ref();
    a == b
}

/// Convert a payload into a JS value through JSON
pub fn payload_to_js(payload: &Payload) -> JsValue {
    match payload {
        Payload::Empty => JsValue::UNDEFINED,
        Payload::Text(text) => JsValue::from_str(text),
        other => js_sys::JSON::parse(&other.to_json().to_string()).unwrap_or(JsValue::NULL),
    }
}

/// Convert a JS value into a payload through JSON
pub fn payload_from_js(value: &JsValue) -> Payload {
    if value.is_undefined() || value.is_null() {
        return Payload::Empty;
    }
    if let Some(text) = value.as_string() {
        return Payload::Text(text);
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|json| json.as_string())
        .and_then(|json| serde_json::from_str::<serde_json::Value>(&json).ok())
        .map(Payload::from_json)
        .unwrap_or(Payload::Empty)
}
