//! Hidden FPS readout
//!
//! The diagnostics element starts transparent and is shown once the reveal
//! key is pressed.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, KeyboardEvent};

use folio_hal::HostError;

use crate::frames::js_error;

/// Keeps the reveal listener alive
pub struct FpsDisplay {
    _on_keydown: Closure<dyn FnMut(KeyboardEvent)>,
}

impl FpsDisplay {
    /// Hide the element with id `element_id` until `reveal_key` is pressed
    ///
    /// Returns `Ok(None)` when the page has no such element.
    pub fn install(
        document: &Document,
        element_id: &str,
        reveal_key: &str,
    ) -> Result<Option<Self>, HostError> {
        let element = match document
            .get_element_by_id(element_id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
        {
            Some(element) => element,
            None => return Ok(None),
        };
        element
            .style()
            .set_property("opacity", "0")
            .map_err(js_error)?;

        let reveal_key = reveal_key.to_string();
        let on_keydown = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            if event.key() == reveal_key {
                let _ = element.style().set_property("opacity", "1");
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        document
            .add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref())
            .map_err(js_error)?;

        Ok(Some(Self {
            _on_keydown: on_keydown,
        }))
    }
}
