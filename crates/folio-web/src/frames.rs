//! Animation-frame primitive for the browser
//!
//! Prefers `requestAnimationFrame` (or a vendor-prefixed variant) and falls
//! back to `setTimeout` paced by [`FrameFallback`].

use std::cell::RefCell;

use folio_hal::{FrameCallback, FrameFallback, HostError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Names probed on `window`, in order of preference
const FRAME_PRIMITIVES: [&str; 3] = [
    "requestAnimationFrame",
    "webkitRequestAnimationFrame",
    "mozRequestAnimationFrame",
];

/// Resolved frame primitive
pub enum FrameSource {
    /// Native animation-frame function
    Native(js_sys::Function),
    /// Timer pacing
    Timer(RefCell<FrameFallback>),
}

impl FrameSource {
    /// Probe `window` for an animation-frame function
    pub fn detect(window: &Window, fallback_frame_ms: f64) -> Self {
        for name in FRAME_PRIMITIVES {
            let func = js_sys::Reflect::get(window, &JsValue::from_str(name))
                .ok()
                .and_then(|f| f.dyn_into::<js_sys::Function>().ok());
            if let Some(func) = func {
                return FrameSource::Native(func);
            }
        }
        FrameSource::Timer(RefCell::new(FrameFallback::new(fallback_frame_ms)))
    }

    /// Whether frames come from a native primitive
    pub fn is_native(&self) -> bool {
        matches!(self, FrameSource::Native(_))
    }

    /// Schedule `callback` for the next frame
    pub fn request(
        &self,
        window: &Window,
        now_ms: f64,
        callback: FrameCallback,
    ) -> Result<(), HostError> {
        match self {
            FrameSource::Native(func) => {
                let cb = Closure::once_into_js(move |timestamp: f64| callback(timestamp));
                func.call1(window, &cb).map_err(js_error)?;
            }
            FrameSource::Timer(fallback) => {
                let (delay, timestamp) = fallback.borrow_mut().next(now_ms);
                let cb = Closure::once_into_js(move || callback(timestamp));
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        cb.unchecked_ref(),
                        delay as i32,
                    )
                    .map_err(js_error)?;
            }
        }
        Ok(())
    }
}

/// Convert a thrown JS value into a [`HostError`]
pub fn js_error(value: JsValue) -> HostError {
    let message = value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(&value, &"message".into())
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value));
    HostError::Js(message)
}
