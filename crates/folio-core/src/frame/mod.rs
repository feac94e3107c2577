//! Shared animation-frame scheduler
//!
//! One self-sustaining frame loop fans out to every registered listener.
//!
//! - `stats`: Rolling frame-time/FPS statistics shown on the diagnostics display

mod stats;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_hal::Host;

use crate::config::SiteConfig;

pub use stats::{FrameStats, StatsSnapshot, DEFAULT_SLOW_FRAME_MS, DEFAULT_WINDOW};

/// Per-frame callback, given the frame timestamp in ms
///
/// Identity is the `Rc` allocation, as for bus subscribers.
pub type FrameListener = Rc<dyn Fn(f64)>;

/// Wrap a closure as a [`FrameListener`]
pub fn listener<F>(f: F) -> FrameListener
where
    F: Fn(f64) + 'static,
{
    Rc::new(f)
}

/// Animation-frame scheduler
///
/// Listeners run in registration order once per frame. Removal is deferred:
/// a listener passed to `off` during frame K still runs in frame K and is
/// dropped once every listener for K has run.
pub struct FrameScheduler<H: Host> {
    host: Rc<H>,
    listeners: RefCell<Vec<FrameListener>>,
    pending_removal: RefCell<Vec<FrameListener>>,
    stats: RefCell<FrameStats>,
    slow_frame_ms: f64,
    running: Cell<bool>,
    frames: Cell<u64>,
}

impl<H: Host> FrameScheduler<H> {
    /// Create a stopped scheduler
    pub fn new(host: Rc<H>, config: &SiteConfig) -> Rc<Self> {
        Rc::new(Self {
            host,
            listeners: RefCell::new(Vec::new()),
            pending_removal: RefCell::new(Vec::new()),
            stats: RefCell::new(FrameStats::new(config.stats_window)),
            slow_frame_ms: config.slow_frame_ms,
            running: Cell::new(false),
            frames: Cell::new(0),
        })
    }

    /// Register `listener`; already registered listeners are ignored
    ///
    /// Re-registering a listener whose removal is pending cancels the removal.
    pub fn on(&self, listener: FrameListener) {
        self.pending_removal
            .borrow_mut()
            .retain(|l| !Rc::ptr_eq(l, &listener));

        let mut listeners = self.listeners.borrow_mut();
        if listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
            return;
        }
        listeners.push(listener);
    }

    /// Schedule `listener` for removal at the end of the current frame
    pub fn off(&self, listener: &FrameListener) {
        let mut pending = self.pending_removal.borrow_mut();
        if pending.iter().any(|l| Rc::ptr_eq(l, listener)) {
            return;
        }
        pending.push(listener.clone());
    }

    /// Start the frame loop. Idempotent.
    pub fn start(self: &Rc<Self>) {
        if self.running.replace(true) {
            return;
        }
        self.host.debug_write("[frames] loop started");
        self.schedule();
    }

    /// Stop the frame loop; the in-flight request lapses without running
    pub fn stop(&self) {
        if self.running.replace(false) {
            self.host.debug_write("[frames] loop stopped");
        }
    }

    /// Whether the frame loop is running
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    fn schedule(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let request = self.host.request_frame(Box::new(move |timestamp| {
            if let Some(scheduler) = weak.upgrade() {
                scheduler.run(timestamp);
            }
        }));
        if let Err(e) = request {
            self.running.set(false);
            self.host
                .debug_write(&format!("[frames] cannot schedule frame: {}", e));
        }
    }

    /// Frame callback: queue the next frame first, then do the work
    fn run(self: &Rc<Self>, timestamp: f64) {
        if !self.running.get() {
            return;
        }
        self.schedule();
        self.tick(timestamp);
    }

    /// Process one frame at `timestamp`
    ///
    /// Called by the frame loop; hosts that drive their own loop may call it
    /// directly.
    pub fn tick(&self, timestamp: f64) {
        self.frames.set(self.frames.get() + 1);

        let markup = {
            let mut stats = self.stats.borrow_mut();
            stats.record(timestamp);
            stats.display_markup(self.slow_frame_ms)
        };
        self.host.show_stats(&markup);

        let snapshot: Vec<FrameListener> = self.listeners.borrow().clone();
        for listener in &snapshot {
            listener(timestamp);
        }

        let removals = std::mem::take(&mut *self.pending_removal.borrow_mut());
        if !removals.is_empty() {
            self.listeners
                .borrow_mut()
                .retain(|l| !removals.iter().any(|r| Rc::ptr_eq(l, r)));
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Frames processed since creation
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames.get()
    }

    /// Current frame statistics
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.borrow().snapshot()
    }
}
