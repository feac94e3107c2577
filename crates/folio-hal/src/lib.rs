//! Host Abstraction Layer trait for the Folio site framework
//!
//! This crate defines the `Host` trait that lets the framework core run
//! against different environments (a real browser, a test double) by
//! abstracting the page capabilities it needs.
//!
//! # Host Implementations
//!
//! - **Browser**: `requestAnimationFrame` for frames, `History` for soft
//!   navigation, `a[href]` elements for links, `console.log()` for debug output
//! - **Mock**: scripted frames, in-memory location/history and anchors

#![no_std]

extern crate alloc;

mod fallback;

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

pub use fallback::FrameFallback;

/// Callback run once before the next repaint, with the frame timestamp in ms
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Callback run when a hijacked anchor is clicked, with the anchor's resolved href
pub type ClickHandler = Rc<dyn Fn(String)>;

/// Callback run on browser back/forward navigation
pub type PopStateHandler = Rc<dyn Fn()>;

/// Host Abstraction Layer trait
///
/// Implementations provide page-level functionality for:
/// - Animation frame scheduling and a monotonic clock
/// - Location, history and back/forward notifications
/// - Anchor enumeration and click interception
/// - Diagnostics display and debug output
///
/// Everything runs on the single UI event loop, so implementations are free
/// to use `Rc`/`RefCell` internally and are not required to be `Send`.
///
/// # Associated Types
///
/// - `Anchor`: Handle to a hyperlink element
///   - In a browser: an `HtmlAnchorElement`
///   - In tests: an index into the mock document
pub trait Host: 'static {
    /// Handle to a hyperlink element in the current document
    type Anchor: Clone;

    // === Frames ===

    /// Schedule `callback` to run before the next repaint
    ///
    /// In a browser: `requestAnimationFrame`, or a ~16ms timer when the
    /// primitive is unavailable (see [`FrameFallback`])
    ///
    /// # Returns
    /// * `Ok(())` - Callback scheduled
    /// * `Err(HostError::NotSupported)` - No way to schedule a frame
    fn request_frame(&self, callback: FrameCallback) -> Result<(), HostError>;

    /// Get current time in milliseconds (monotonic)
    fn now_ms(&self) -> f64;

    // === Location & History ===

    /// Full href of the current document location
    fn location_href(&self) -> String;

    /// Site root: `protocol//hostname[:port]`
    fn origin(&self) -> String;

    /// Whether the history API (`pushState`) is usable
    fn supports_history(&self) -> bool;

    /// Push a history entry for `href` without reloading the page
    fn push_state(&self, href: &str) -> Result<(), HostError>;

    /// Perform a full page load of `href`
    fn load(&self, href: &str) -> Result<(), HostError>;

    /// Register a handler for back/forward navigation
    fn on_popstate(&self, handler: PopStateHandler) -> Result<(), HostError>;

    // === Document ===

    /// All anchors carrying an `href` attribute, in document order
    fn anchors(&self) -> Vec<Self::Anchor>;

    /// Raw attribute value of an anchor
    fn anchor_attr(&self, anchor: &Self::Anchor, name: &str) -> Option<String>;

    /// The anchor's href resolved against the document base
    fn anchor_href(&self, anchor: &Self::Anchor) -> String;

    /// Whether the anchor has already been wired for soft navigation
    fn is_hijacked(&self, anchor: &Self::Anchor) -> bool;

    /// Mark the anchor as hijacked, prevent its default click navigation and
    /// forward clicks to `handler` with the resolved href
    fn hijack(&self, anchor: &Self::Anchor, handler: ClickHandler) -> Result<(), HostError>;

    // === Diagnostics ===

    /// Show frame statistics markup on the diagnostics display
    ///
    /// Returns `false` when the page has no display element.
    fn show_stats(&self, markup: &str) -> bool;

    /// Write a debug message to the platform's console/log
    ///
    /// In a browser: Uses `console.log()`
    fn debug_write(&self, msg: &str);
}

/// Host errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostError {
    /// Capability not available on this host
    NotSupported(&'static str),
    /// A required global (window, document, history) is missing
    MissingGlobal(&'static str),
    /// The underlying JavaScript call threw
    Js(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::NotSupported(what) => write!(f, "Not supported: {}", what),
            HostError::MissingGlobal(name) => write!(f, "Missing global: {}", name),
            HostError::Js(msg) => write!(f, "JavaScript error: {}", msg),
        }
    }
}
