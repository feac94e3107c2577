//! History router
//!
//! Turns link clicks, programmatic navigation and back/forward into one
//! stream of [`RouteChange`]s published on the message bus.
//!
//! - `state`: Route state and pure transitions
//! - `links`: Which anchors may be hijacked

mod links;
mod state;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use folio_hal::Host;

use crate::bus::{subscriber, MessageBus, Subscriber};
use crate::config::SiteConfig;
use crate::message::{self, Payload};

pub use links::{eligibility, is_same_origin, LinkCandidate, SkipReason};
pub use state::{route_parts, strip_root, RouteChange, RouteState};

/// History router
///
/// Construction wires the router to the bus (`hijack-links`, `navigate`) and
/// to the host's popstate notifications. Those callbacks hold weak
/// references, so dropping the last `Rc<Router>` detaches it.
pub struct Router<H: Host> {
    bus: Rc<MessageBus<Payload>>,
    host: Rc<H>,
    /// Site root (`protocol//hostname[:port]`)
    root: String,
    soft_navigation: bool,
    opt_out_attribute: String,
    opt_out_value: String,
    state: RefCell<RouteState>,
    /// Bus subscriptions made at construction, removed on drop
    subscriptions: Vec<(&'static str, Subscriber<Payload>)>,
}

impl<H: Host> Router<H> {
    /// Create a router and attach it to `bus` and `host`
    pub fn new(bus: Rc<MessageBus<Payload>>, host: Rc<H>, config: &SiteConfig) -> Rc<Self> {
        let root = host.origin();
        let soft_navigation = config.soft_navigation && host.supports_history();
        host.debug_write(&format!(
            "[router] root {} (soft navigation {})",
            root,
            if soft_navigation { "on" } else { "off" }
        ));

        let router = Rc::new_cyclic(|weak: &Weak<Self>| {
            let hijack = {
                let weak = weak.clone();
                subscriber(move |_: &Payload| {
                    if let Some(router) = weak.upgrade() {
                        router.hijack_links();
                    }
                })
            };
            let navigate = {
                let weak = weak.clone();
                subscriber(move |payload: &Payload| {
                    if let (Some(router), Some(href)) = (weak.upgrade(), payload.as_str()) {
                        router.navigate(href);
                    }
                })
            };

            Self {
                bus: bus.clone(),
                host: host.clone(),
                root,
                soft_navigation,
                opt_out_attribute: config.opt_out_attribute.clone(),
                opt_out_value: config.opt_out_value.clone(),
                state: RefCell::new(RouteState::new()),
                subscriptions: vec![(message::HIJACK_LINKS, hijack), (message::NAVIGATE, navigate)],
            }
        });

        for (topic, sub) in &router.subscriptions {
            bus.on(topic, sub.clone());
        }

        let weak = Rc::downgrade(&router);
        let popstate = Rc::new(move || {
            if let Some(router) = weak.upgrade() {
                router.transition();
            }
        });
        if let Err(e) = host.on_popstate(popstate) {
            host.debug_write(&format!("[router] popstate unavailable: {}", e));
        }

        router
    }

    /// Initial link scan. Does not publish a route.
    pub fn init(self: &Rc<Self>) {
        self.hijack_links();
    }

    /// Wire every eligible, not yet hijacked anchor for soft navigation
    ///
    /// Returns the number of anchors wired by this call. No-op when soft
    /// navigation is off.
    pub fn hijack_links(self: &Rc<Self>) -> usize {
        if !self.soft_navigation {
            return 0;
        }

        let mut wired = 0;
        for anchor in self.host.anchors() {
            let candidate = LinkCandidate {
                resolved_href: self.host.anchor_href(&anchor),
                target: self.host.anchor_attr(&anchor, "target"),
                opted_out: self
                    .host
                    .anchor_attr(&anchor, &self.opt_out_attribute)
                    .is_some_and(|v| v == self.opt_out_value),
            };
            if eligibility(&candidate, &self.root).is_err() || self.host.is_hijacked(&anchor) {
                continue;
            }

            let weak = Rc::downgrade(self);
            let on_click = Rc::new(move |href: String| {
                if let Some(router) = weak.upgrade() {
                    router.navigate(&href);
                }
            });
            match self.host.hijack(&anchor, on_click) {
                Ok(()) => wired += 1,
                Err(e) => self.host.debug_write(&format!(
                    "[router] failed to hijack {}: {}",
                    candidate.resolved_href, e
                )),
            }
        }
        wired
    }

    /// Navigate to `href`
    ///
    /// With soft navigation a history entry is pushed and a route change is
    /// published. Without it the host performs a full page load and nothing
    /// is published.
    pub fn navigate(&self, href: &str) {
        if !self.soft_navigation {
            if let Err(e) = self.host.load(href) {
                self.host
                    .debug_write(&format!("[router] load {} failed: {}", href, e));
            }
            return;
        }

        if let Err(e) = self.host.push_state(href) {
            self.host
                .debug_write(&format!("[router] pushState {} failed: {}", href, e));
            return;
        }
        self.transition();
    }

    /// Rotate route state to the host's current location and publish
    fn transition(&self) {
        let href = self.host.location_href();
        let change = {
            let mut state = self.state.borrow_mut();
            let (next, change) = state.advance(&href, &self.root);
            *state = next;
            change
        };
        self.bus.send(message::ROUTE, Payload::Route(change));
    }

    /// Current root-relative route, `None` before the first navigation
    pub fn current_route(&self) -> Option<String> {
        self.state.borrow().current().map(str::to_string)
    }

    /// Route before the latest navigation
    pub fn previous_route(&self) -> Option<String> {
        self.state.borrow().previous().map(str::to_string)
    }

    /// Whether links are hijacked and history entries pushed
    #[inline]
    pub fn soft_navigation(&self) -> bool {
        self.soft_navigation
    }

    /// Site root stripped from locations
    #[inline]
    pub fn root(&self) -> &str {
        &self.root
    }
}

impl<H: Host> Drop for Router<H> {
    fn drop(&mut self) {
        for (topic, sub) in &self.subscriptions {
            self.bus.off(topic, sub);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_hal_mock::MockHost;

    fn setup(config: SiteConfig) -> (Rc<MockHost>, Rc<MessageBus<Payload>>, Rc<Router<MockHost>>, Rc<RefCell<Vec<RouteChange>>>) {
        let host = Rc::new(MockHost::new());
        let bus = Rc::new(MessageBus::new());
        let router = Router::new(bus.clone(), host.clone(), &config);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        bus.on(
            message::ROUTE,
            subscriber(move |p: &Payload| {
                if let Some(change) = p.as_route() {
                    sink.borrow_mut().push(change.clone());
                }
            }),
        );
        (host, bus, router, seen)
    }

    #[test]
    fn test_construction_publishes_nothing() {
        let (_host, _bus, router, seen) = setup(SiteConfig::default());
        router.init();
        assert!(seen.borrow().is_empty());
        assert_eq!(router.current_route(), None);
    }

    #[test]
    fn test_navigate_publishes_route() {
        let (host, _bus, router, seen) = setup(SiteConfig::default());

        router.navigate("/about");

        assert_eq!(
            seen.borrow()[0],
            RouteChange {
                route: "/about".into(),
                parts: vec!["about".into()],
                prev_route: None,
            }
        );
        assert_eq!(host.pushed_count(), 1);
        assert_eq!(router.current_route().as_deref(), Some("/about"));
    }

    #[test]
    fn test_navigate_disabled_loads_page() {
        let config = SiteConfig {
            soft_navigation: false,
            ..SiteConfig::default()
        };
        let (host, _bus, router, seen) = setup(config);

        router.navigate("/about");

        assert!(seen.borrow().is_empty());
        assert_eq!(host.pushed_count(), 0);
        assert_eq!(host.loads(), vec!["http://localhost:8080/about".to_string()]);
    }

    #[test]
    fn test_history_capability_gates_soft_navigation() {
        let host = Rc::new(MockHost::new());
        host.set_history_supported(false);
        let bus = Rc::new(MessageBus::new());
        let router = Router::new(bus, host.clone(), &SiteConfig::default());

        assert!(!router.soft_navigation());
        assert!(host.has_log_containing("soft navigation off"));
    }

    #[test]
    fn test_bus_navigate_topic() {
        let (_host, bus, router, seen) = setup(SiteConfig::default());

        bus.send(message::NAVIGATE, Payload::from("/work"));
        bus.send(message::NAVIGATE, Payload::Empty);

        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(router.current_route().as_deref(), Some("/work"));
    }

    #[test]
    fn test_drop_detaches_from_bus() {
        let (_host, bus, router, _seen) = setup(SiteConfig::default());
        assert_eq!(bus.subscriber_count(message::NAVIGATE), 1);

        drop(router);

        assert_eq!(bus.subscriber_count(message::NAVIGATE), 0);
        assert_eq!(bus.subscriber_count(message::HIJACK_LINKS), 0);
    }

    #[test]
    fn test_hijack_skips_ineligible() {
        let (host, _bus, router, _seen) = setup(SiteConfig::default());
        let internal = host.add_link("/about");
        let external = host.add_link("http://external.example/");
        let blank = host.add_anchor(&[("href", "/cv.pdf"), ("target", "_blank")]);
        let opted = host.add_anchor(&[("href", "/raw"), ("data-hj", "no")]);
        let not_opted = host.add_anchor(&[("href", "/lab"), ("data-hj", "yes")]);

        assert_eq!(router.hijack_links(), 2);

        assert!(host.anchor_hijacked(internal));
        assert!(host.anchor_hijacked(not_opted));
        assert!(!host.anchor_hijacked(external));
        assert!(!host.anchor_hijacked(blank));
        assert!(!host.anchor_hijacked(opted));
    }
}
