//! Browser tests for the Folio web bindings
//!
//! Run with `wasm-pack test --headless --firefox crates/folio-web`.

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{Host, Payload, SiteConfig};
use folio_web::{payload_from_js, payload_to_js, SiteController, WebHost};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn add_anchor(href: &str, attrs: &[(&str, &str)]) -> web_sys::HtmlAnchorElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let anchor = document
        .create_element("a")
        .unwrap()
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .unwrap();
    anchor.set_attribute("href", href).unwrap();
    for (name, value) in attrs {
        anchor.set_attribute(name, value).unwrap();
    }
    document.body().unwrap().append_child(&anchor).unwrap();
    anchor
}

#[wasm_bindgen_test]
fn test_origin_matches_location() {
    let host = WebHost::new(&SiteConfig::default()).unwrap();
    let location = web_sys::window().unwrap().location();
    assert_eq!(host.origin(), location.origin().unwrap());
    assert!(host.supports_history());
}

#[wasm_bindgen_test]
fn test_hijack_marks_anchor_once() {
    let host = WebHost::new(&SiteConfig::default()).unwrap();
    let anchor = add_anchor("/hijack-me", &[]);
    assert!(!host.is_hijacked(&anchor));

    host.hijack(&anchor, Rc::new(|_| {})).unwrap();

    assert!(host.is_hijacked(&anchor));
    assert!(host.anchor_href(&anchor).ends_with("/hijack-me"));
    anchor.remove();
}

#[wasm_bindgen_test]
fn test_click_handlers_live_on_their_anchor() {
    let host = WebHost::new(&SiteConfig::default()).unwrap();
    let anchors: Vec<_> = (0..3).map(|i| add_anchor(&format!("/owned/{}", i), &[])).collect();

    for anchor in &anchors {
        host.hijack(anchor, Rc::new(|_| {})).unwrap();
    }

    assert_eq!(host.listener_count(), 0);
    for anchor in &anchors {
        let handler = js_sys::Reflect::get(anchor, &"hijacked".into()).unwrap();
        assert!(handler.is_function());
        anchor.remove();
    }
}

#[wasm_bindgen_test]
fn test_hijacked_click_prevents_default() {
    let host = WebHost::new(&SiteConfig::default()).unwrap();
    let anchor = add_anchor("/clicked", &[]);
    let seen = Rc::new(RefCell::new(None));

    let sink = seen.clone();
    host.hijack(&anchor, Rc::new(move |href| *sink.borrow_mut() = Some(href)))
        .unwrap();
    anchor.click();

    let href = seen.borrow().clone().unwrap();
    assert!(href.ends_with("/clicked"));
    anchor.remove();
}

#[wasm_bindgen_test]
fn test_payload_conversion() {
    assert_eq!(payload_from_js(&JsValue::UNDEFINED), Payload::Empty);
    assert_eq!(payload_from_js(&JsValue::from_str("/about")), Payload::from("/about"));
    assert_eq!(payload_to_js(&Payload::from("/work")).as_string().as_deref(), Some("/work"));

    let object = js_sys::JSON::parse(r#"{"id":3}"#).unwrap();
    assert_eq!(
        payload_from_js(&object),
        Payload::Json(serde_json::json!({ "id": 3 }))
    );
}

#[wasm_bindgen_test]
fn test_controller_bus_and_navigation() {
    let controller = SiteController::new(r#"{"statsWindow": 30}"#).unwrap();
    let routes = Rc::new(RefCell::new(Vec::new()));

    let sink = routes.clone();
    let on_route = Closure::wrap(Box::new(move |value: JsValue| {
        let route = js_sys::Reflect::get(&value, &"route".into()).unwrap();
        sink.borrow_mut().push(route.as_string().unwrap());
    }) as Box<dyn FnMut(JsValue)>);
    let func: js_sys::Function = on_route.as_ref().unchecked_ref::<js_sys::Function>().clone();

    controller.on("route", func.clone());
    controller.on("route", func.clone());
    controller.navigate("/folio-test");

    assert_eq!(*routes.borrow(), vec!["/folio-test".to_string()]);
    assert!(controller.get_route_json().contains("\"route\":\"/folio-test\""));

    controller.off("route", func);
    controller.navigate("/folio-test/again");
    assert_eq!(routes.borrow().len(), 1);
}

#[wasm_bindgen_test]
fn test_throwing_subscriber_does_not_stop_dispatch() {
    let controller = SiteController::new("").unwrap();
    let thrower = js_sys::Function::new_with_args("value", "throw new Error('boom ' + value)");
    let seen = Rc::new(RefCell::new(Vec::new()));

    let sink = seen.clone();
    let on_project = Closure::wrap(Box::new(move |value: JsValue| {
        sink.borrow_mut().push(value.as_string().unwrap());
    }) as Box<dyn FnMut(JsValue)>);
    let after: js_sys::Function = on_project.as_ref().unchecked_ref::<js_sys::Function>().clone();

    controller.on("project", thrower);
    controller.on("project", after);
    controller.send("project", JsValue::from_str("kinect-lab"));
    controller.send("project", JsValue::from_str("sound-wall"));

    assert_eq!(
        *seen.borrow(),
        vec!["kinect-lab".to_string(), "sound-wall".to_string()]
    );
}

#[wasm_bindgen_test]
fn test_controller_rejects_bad_config() {
    assert!(SiteController::new("{not json").is_err());
    assert!(SiteController::new(r#"{"statsWindow": 0}"#).is_err());
}
