//! Composition root
//!
//! Builds the bus, the frame scheduler and the router once per page and
//! hands out shared references to page code.

use std::rc::Rc;

use folio_hal::Host;

use crate::bus::MessageBus;
use crate::config::SiteConfig;
use crate::frame::FrameScheduler;
use crate::message::Payload;
use crate::router::Router;

/// The framework for one page load
pub struct Site<H: Host> {
    host: Rc<H>,
    config: SiteConfig,
    bus: Rc<MessageBus<Payload>>,
    frames: Rc<FrameScheduler<H>>,
    router: Rc<Router<H>>,
}

impl<H: Host> Site<H> {
    /// Wire the framework components to `host`
    pub fn new(host: Rc<H>, config: SiteConfig) -> Self {
        let bus = Rc::new(MessageBus::new());
        let frames = FrameScheduler::new(host.clone(), &config);
        let router = Router::new(bus.clone(), host.clone(), &config);

        Self {
            host,
            config,
            bus,
            frames,
            router,
        }
    }

    /// Start the frame loop and hijack the initial set of links
    pub fn start(&self) {
        self.frames.start();
        self.router.init();
        self.host.debug_write("[site] started");
    }

    /// Shared message bus
    #[inline]
    pub fn bus(&self) -> &Rc<MessageBus<Payload>> {
        &self.bus
    }

    /// Shared frame scheduler
    #[inline]
    pub fn frames(&self) -> &Rc<FrameScheduler<H>> {
        &self.frames
    }

    /// History router
    #[inline]
    pub fn router(&self) -> &Rc<Router<H>> {
        &self.router
    }

    /// Host the framework runs on
    #[inline]
    pub fn host(&self) -> &Rc<H> {
        &self.host
    }

    /// Active configuration
    #[inline]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }
}
