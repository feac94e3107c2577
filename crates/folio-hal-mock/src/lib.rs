//! Mock host implementation for testing the Folio site framework
//!
//! This provides a mock implementation of the `Host` trait that can be used
//! for unit testing the framework core without requiring a browser.
//! Frames are fired by hand, location and history live in memory, and the
//! document is a list of scripted anchors.

#![no_std]
extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use folio_hal::{ClickHandler, FrameCallback, Host, HostError, PopStateHandler};

/// Index of an anchor in the mock document
pub type MockAnchorId = usize;

/// Default origin of a fresh mock page
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Mock host for unit testing
///
/// Provides simulated frames, time, location, history and anchors for
/// testing framework logic without a real page.
pub struct MockHost {
    /// Simulated time in milliseconds
    time: Cell<f64>,
    /// Captured debug messages
    debug_log: RefCell<Vec<String>>,
    /// Page origin (`protocol//host[:port]`)
    origin: String,
    /// Current location href
    location: RefCell<String>,
    /// Session history entries and the active index
    history: RefCell<Vec<String>>,
    history_index: Cell<usize>,
    history_supported: Cell<bool>,
    /// Full page loads requested through the host
    loads: RefCell<Vec<String>>,
    /// Frame callbacks waiting for the next `fire_frame`
    frames: RefCell<Vec<FrameCallback>>,
    frames_supported: Cell<bool>,
    popstate_handlers: RefCell<Vec<PopStateHandler>>,
    anchors: RefCell<Vec<MockAnchor>>,
    /// Whether the page has a diagnostics display element
    stats_display: Cell<bool>,
    stats_markup: RefCell<Option<String>>,
}

/// Simulated anchor element
struct MockAnchor {
    attrs: BTreeMap<String, String>,
    hijacked: bool,
    handler: Option<ClickHandler>,
}

impl MockHost {
    /// Create a mock host at the root of [`DEFAULT_ORIGIN`]
    pub fn new() -> Self {
        Self::with_origin(DEFAULT_ORIGIN)
    }

    /// Create a mock host at the root of `origin`
    pub fn with_origin(origin: &str) -> Self {
        let start = alloc::format!("{}/", origin);
        Self {
            time: Cell::new(0.0),
            debug_log: RefCell::new(Vec::new()),
            origin: String::from(origin),
            location: RefCell::new(start.clone()),
            history: RefCell::new(alloc::vec![start]),
            history_index: Cell::new(0),
            history_supported: Cell::new(true),
            loads: RefCell::new(Vec::new()),
            frames: RefCell::new(Vec::new()),
            frames_supported: Cell::new(true),
            popstate_handlers: RefCell::new(Vec::new()),
            anchors: RefCell::new(Vec::new()),
            stats_display: Cell::new(true),
            stats_markup: RefCell::new(None),
        }
    }

    // === Time & Frames ===

    /// Advance the simulated time by the given duration
    pub fn advance_time(&self, ms: f64) {
        self.time.set(self.time.get() + ms);
    }

    /// Fire every pending frame callback with `timestamp`
    ///
    /// Callbacks requested while firing wait for the next call.
    /// Returns the number of callbacks run.
    pub fn fire_frame(&self, timestamp: f64) -> usize {
        self.time.set(timestamp);
        let pending = core::mem::take(&mut *self.frames.borrow_mut());
        let count = pending.len();
        for callback in pending {
            callback(timestamp);
        }
        count
    }

    /// Number of frame callbacks waiting to fire
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Make `request_frame` fail, as on a page without any frame primitive
    pub fn set_frames_supported(&self, supported: bool) {
        self.frames_supported.set(supported);
    }

    // === Location & History ===

    /// Resolve `href` against the mock origin the way an anchor's `href`
    /// property would
    pub fn resolve(&self, href: &str) -> String {
        if has_scheme(href) {
            return String::from(href);
        }
        if let Some(rest) = href.strip_prefix("//") {
            let scheme = self.origin.split("//").next().unwrap_or("http:");
            return alloc::format!("{}//{}", scheme, rest);
        }
        if href.starts_with('/') {
            return alloc::format!("{}{}", self.origin, href);
        }
        if href.starts_with('#') || href.starts_with('?') {
            let current = self.location.borrow();
            let base = current
                .find(['#', '?'])
                .map(|i| &current[..i])
                .unwrap_or(current.as_str());
            return alloc::format!("{}{}", base, href);
        }
        alloc::format!("{}/{}", self.origin, href)
    }

    /// Toggle history API support
    pub fn set_history_supported(&self, supported: bool) {
        self.history_supported.set(supported);
    }

    /// Replace the current location without touching history
    pub fn set_location(&self, href: &str) {
        let resolved = self.resolve(href);
        let index = self.history_index.get();
        self.history.borrow_mut()[index] = resolved.clone();
        *self.location.borrow_mut() = resolved;
    }

    /// Session history entries, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }

    /// Number of entries added through `push_state`
    pub fn pushed_count(&self) -> usize {
        self.history.borrow().len() - 1
    }

    /// Full page loads requested so far
    pub fn loads(&self) -> Vec<String> {
        self.loads.borrow().clone()
    }

    /// Simulate the browser back button
    ///
    /// Returns `false` when there is no earlier entry.
    pub fn back(&self) -> bool {
        let index = self.history_index.get();
        if index == 0 {
            return false;
        }
        self.traverse_to(index - 1);
        true
    }

    /// Simulate the browser forward button
    ///
    /// Returns `false` when there is no later entry.
    pub fn forward(&self) -> bool {
        let index = self.history_index.get();
        if index + 1 >= self.history.borrow().len() {
            return false;
        }
        self.traverse_to(index + 1);
        true
    }

    fn traverse_to(&self, index: usize) {
        self.history_index.set(index);
        let href = self.history.borrow()[index].clone();
        *self.location.borrow_mut() = href;

        let handlers: Vec<PopStateHandler> = self.popstate_handlers.borrow().clone();
        for handler in handlers {
            handler();
        }
    }

    // === Document ===

    /// Add an anchor with the given `href` and no other attributes
    pub fn add_link(&self, href: &str) -> MockAnchorId {
        self.add_anchor(&[("href", href)])
    }

    /// Add an anchor with arbitrary attributes
    pub fn add_anchor(&self, attrs: &[(&str, &str)]) -> MockAnchorId {
        let attrs = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut anchors = self.anchors.borrow_mut();
        anchors.push(MockAnchor {
            attrs,
            hijacked: false,
            handler: None,
        });
        anchors.len() - 1
    }

    /// Simulate a click on an anchor
    ///
    /// Hijacked anchors forward to their handler and return `true` (default
    /// prevented). Other anchors perform a full load and return `false`.
    pub fn click(&self, id: MockAnchorId) -> bool {
        let (handler, href) = {
            let anchors = self.anchors.borrow();
            let anchor = match anchors.get(id) {
                Some(a) => a,
                None => return false,
            };
            let href = anchor.attrs.get("href").cloned().unwrap_or_default();
            (anchor.handler.clone(), self.resolve(&href))
        };

        match handler {
            Some(handler) => {
                handler(href);
                true
            }
            None => {
                self.loads.borrow_mut().push(href.clone());
                *self.location.borrow_mut() = href;
                false
            }
        }
    }

    /// Whether an anchor has been wired for soft navigation
    pub fn anchor_hijacked(&self, id: MockAnchorId) -> bool {
        self.anchors
            .borrow()
            .get(id)
            .map(|a| a.hijacked)
            .unwrap_or(false)
    }

    // === Diagnostics ===

    /// Toggle the presence of the diagnostics display element
    pub fn set_stats_display(&self, present: bool) {
        self.stats_display.set(present);
    }

    /// Last markup written to the diagnostics display
    pub fn stats_markup(&self) -> Option<String> {
        self.stats_markup.borrow().clone()
    }

    /// Get all captured debug messages
    pub fn get_debug_log(&self) -> Vec<String> {
        self.debug_log.borrow().clone()
    }

    /// Clear the debug log
    pub fn clear_debug_log(&self) {
        self.debug_log.borrow_mut().clear();
    }

    /// Check if a specific message was logged
    pub fn has_log_containing(&self, substr: &str) -> bool {
        self.debug_log
            .borrow()
            .iter()
            .any(|msg| msg.contains(substr))
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

/// `scheme:` prefix, as in `https:` or `mailto:`
fn has_scheme(href: &str) -> bool {
    match href.find(':') {
        Some(colon) => {
            colon > 0
                && href[..colon]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        None => false,
    }
}

impl Host for MockHost {
    type Anchor = MockAnchorId;

    fn request_frame(&self, callback: FrameCallback) -> Result<(), HostError> {
        if !self.frames_supported.get() {
            return Err(HostError::NotSupported("requestAnimationFrame"));
        }
        self.frames.borrow_mut().push(callback);
        Ok(())
    }

    fn now_ms(&self) -> f64 {
        self.time.get()
    }

    fn location_href(&self) -> String {
        self.location.borrow().clone()
    }

    fn origin(&self) -> String {
        self.origin.clone()
    }

    fn supports_history(&self) -> bool {
        self.history_supported.get()
    }

    fn push_state(&self, href: &str) -> Result<(), HostError> {
        if !self.history_supported.get() {
            return Err(HostError::NotSupported("pushState"));
        }
        let resolved = self.resolve(href);
        let index = self.history_index.get();
        let mut history = self.history.borrow_mut();
        history.truncate(index + 1);
        history.push(resolved.clone());
        self.history_index.set(index + 1);
        *self.location.borrow_mut() = resolved;
        Ok(())
    }

    fn load(&self, href: &str) -> Result<(), HostError> {
        let resolved = self.resolve(href);
        self.loads.borrow_mut().push(resolved.clone());
        *self.location.borrow_mut() = resolved;
        Ok(())
    }

    fn on_popstate(&self, handler: PopStateHandler) -> Result<(), HostError> {
        self.popstate_handlers.borrow_mut().push(handler);
        Ok(())
    }

    fn anchors(&self) -> Vec<Self::Anchor> {
        self.anchors
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.attrs.contains_key("href"))
            .map(|(id, _)| id)
            .collect()
    }

    fn anchor_attr(&self, anchor: &Self::Anchor, name: &str) -> Option<String> {
        self.anchors
            .borrow()
            .get(*anchor)
            .and_then(|a| a.attrs.get(name).cloned())
    }

    fn anchor_href(&self, anchor: &Self::Anchor) -> String {
        let raw = self.anchor_attr(anchor, "href").unwrap_or_default();
        self.resolve(&raw)
    }

    fn is_hijacked(&self, anchor: &Self::Anchor) -> bool {
        self.anchor_hijacked(*anchor)
    }

    fn hijack(&self, anchor: &Self::Anchor, handler: ClickHandler) -> Result<(), HostError> {
        let mut anchors = self.anchors.borrow_mut();
        let entry = anchors
            .get_mut(*anchor)
            .ok_or(HostError::Js(String::from("anchor detached")))?;
        entry.hijacked = true;
        entry.handler = Some(handler);
        Ok(())
    }

    fn show_stats(&self, markup: &str) -> bool {
        if !self.stats_display.get() {
            return false;
        }
        *self.stats_markup.borrow_mut() = Some(String::from(markup));
        true
    }

    fn debug_write(&self, msg: &str) {
        self.debug_log.borrow_mut().push(String::from(msg));
    }
}
