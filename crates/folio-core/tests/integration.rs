//! Integration tests for the Folio framework
//!
//! These tests drive a full `Site` on a mock host:
//! - Message bus delivery and removal
//! - Frame loop pacing, deferred removal and statistics
//! - Soft navigation through clicks, the bus and back/forward
//! - Full-load fallback when soft navigation is off

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::{
    listener, message, subscriber, Host, Payload, RouteChange, Site, SiteConfig, Subscriber,
};
use folio_hal_mock::MockHost;

fn site_with(config: SiteConfig) -> (Rc<MockHost>, Site<MockHost>, Rc<RefCell<Vec<RouteChange>>>) {
    let host = Rc::new(MockHost::new());
    let site = Site::new(host.clone(), config);

    let routes = Rc::new(RefCell::new(Vec::new()));
    let sink = routes.clone();
    site.bus().on(
        message::ROUTE,
        subscriber(move |p: &Payload| {
            if let Some(change) = p.as_route() {
                sink.borrow_mut().push(change.clone());
            }
        }),
    );
    (host, site, routes)
}

fn site() -> (Rc<MockHost>, Site<MockHost>, Rc<RefCell<Vec<RouteChange>>>) {
    site_with(SiteConfig::default())
}

// =============================================================================
// Message Bus
// =============================================================================

#[test]
fn test_bus_subscriber_called_once_per_send() {
    let (_host, site, _routes) = site();
    let hits = Rc::new(RefCell::new(Vec::new()));

    let sink = hits.clone();
    let s: Subscriber<Payload> = subscriber(move |p: &Payload| {
        sink.borrow_mut().push(p.clone());
    });
    site.bus().on("project", s.clone());
    site.bus().on("project", s.clone());

    site.bus().send("project", Payload::from("kinect-lab"));
    assert_eq!(*hits.borrow(), vec![Payload::from("kinect-lab")]);

    site.bus().off("project", &s);
    site.bus().send("project", Payload::Empty);
    assert_eq!(hits.borrow().len(), 1);
}

#[test]
fn test_bus_off_on_empty_topic_leaves_others() {
    let (_host, site, routes) = site();
    let stray: Subscriber<Payload> = subscriber(|_: &Payload| {});

    assert!(!site.bus().off("nothing-here", &stray));
    assert!(!site.bus().off(message::ROUTE, &stray));

    site.router().navigate("/about");
    assert_eq!(routes.borrow().len(), 1);
}

// =============================================================================
// Frame Scheduler
// =============================================================================

#[test]
fn test_frame_listener_runs_once_per_frame() {
    let (host, site, _routes) = site();
    let stamps = Rc::new(RefCell::new(Vec::new()));

    let sink = stamps.clone();
    site.frames().on(listener(move |ts| sink.borrow_mut().push(ts)));
    site.start();

    for i in 1..=10 {
        host.fire_frame(i as f64 * 16.0);
    }

    let stamps = stamps.borrow();
    assert_eq!(stamps.len(), 10);
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_frame_off_during_frame_k() {
    let (host, site, _routes) = site();
    let count = Rc::new(RefCell::new(0u32));

    let slot: Rc<RefCell<Option<folio_core::FrameListener>>> = Rc::new(RefCell::new(None));
    let l = {
        let count = count.clone();
        let slot = slot.clone();
        let frames = Rc::downgrade(site.frames());
        listener(move |_| {
            *count.borrow_mut() += 1;
            if *count.borrow() == 3 {
                if let (Some(frames), Some(me)) = (frames.upgrade(), slot.borrow().as_ref()) {
                    frames.off(me);
                }
            }
        })
    };
    *slot.borrow_mut() = Some(l.clone());
    site.frames().on(l);
    site.start();

    for i in 1..=6 {
        host.fire_frame(i as f64 * 16.0);
    }

    assert_eq!(*count.borrow(), 3);
    assert_eq!(site.frames().listener_count(), 0);
}

#[test]
fn test_frame_stats_window_wraps_at_sixty() {
    let (host, site, _routes) = site();
    site.start();

    for i in 1..=60 {
        host.fire_frame(i as f64 * 16.0);
    }
    let stats = site.frames().stats();
    assert_eq!(stats.frame_index, 60);
    assert!((stats.avg_frame_time - 16.0).abs() < 0.001);
    assert!((stats.avg_fps - 62.5).abs() < 0.001);

    host.fire_frame(61.0 * 16.0);
    assert_eq!(site.frames().stats().frame_index, 1);
}

#[test]
fn test_slow_frames_emphasised_on_display() {
    let (host, site, _routes) = site();
    site.start();

    for i in 1..=5 {
        host.fire_frame(i as f64 * 40.0);
    }

    assert_eq!(host.stats_markup().as_deref(), Some("<b>40</b> | 25"));
}

#[test]
fn test_stats_computed_without_display() {
    let (host, site, _routes) = site();
    host.set_stats_display(false);
    site.start();

    host.fire_frame(16.0);
    host.fire_frame(32.0);

    assert_eq!(site.frames().stats().frame_index, 2);
    assert_eq!(host.stats_markup(), None);
}

// =============================================================================
// Router
// =============================================================================

#[test]
fn test_navigate_from_root_to_about() {
    let (_host, site, routes) = site();
    site.start();

    site.router().navigate("/about");

    assert_eq!(
        routes.borrow()[0],
        RouteChange {
            route: "/about".into(),
            parts: vec!["about".into()],
            prev_route: None,
        }
    );
}

#[test]
fn test_navigate_about_to_team() {
    let (_host, site, routes) = site();
    site.start();

    site.router().navigate("/about");
    site.router().navigate("/about/team");

    assert_eq!(
        routes.borrow()[1],
        RouteChange {
            route: "/about/team".into(),
            parts: vec!["about".into(), "team".into()],
            prev_route: Some("/about".into()),
        }
    );
}

#[test]
fn test_click_on_hijacked_link_soft_navigates() {
    let (host, site, routes) = site();
    let link = host.add_link("/work/lab");
    site.start();

    assert!(host.click(link));

    assert!(host.loads().is_empty());
    assert_eq!(host.location_href(), "http://localhost:8080/work/lab");
    assert_eq!(routes.borrow()[0].parts, vec!["work", "lab"]);
}

#[test]
fn test_external_link_never_hijacked() {
    let (host, site, routes) = site();
    let link = host.add_link("http://external.example/profile");
    site.start();

    assert!(!host.anchor_hijacked(link));
    assert!(!host.click(link));
    assert_eq!(host.loads(), vec!["http://external.example/profile".to_string()]);
    assert!(routes.borrow().is_empty());
}

#[test]
fn test_rescan_after_dynamic_content() {
    let (host, site, _routes) = site();
    let first = host.add_link("/about");
    site.start();

    let added = host.add_link("/work");
    site.bus().send(message::HIJACK_LINKS, Payload::Empty);
    site.bus().send(message::HIJACK_LINKS, Payload::Empty);

    assert!(host.anchor_hijacked(first));
    assert!(host.anchor_hijacked(added));
    assert_eq!(site.router().hijack_links(), 0);
}

#[test]
fn test_navigate_request_over_bus() {
    let (host, site, routes) = site();
    site.start();

    site.bus().send(message::NAVIGATE, Payload::from("/contact"));

    assert_eq!(host.pushed_count(), 1);
    assert_eq!(routes.borrow()[0].route, "/contact");
}

#[test]
fn test_back_button_publishes_without_push() {
    let (host, site, routes) = site();
    site.start();
    site.router().navigate("/about");
    site.router().navigate("/about/team");

    assert!(host.back());

    assert_eq!(host.pushed_count(), 2);
    let last = routes.borrow().last().cloned().unwrap();
    assert_eq!(last.route, "/about");
    assert_eq!(last.prev_route.as_deref(), Some("/about/team"));
    assert_eq!(site.router().previous_route().as_deref(), Some("/about/team"));
}

#[test]
fn test_query_and_fragment_kept_in_route() {
    let (_host, site, routes) = site();
    site.start();

    site.router().navigate("/work?filter=3d#top");

    let change = routes.borrow()[0].clone();
    assert_eq!(change.route, "/work?filter=3d#top");
    assert_eq!(change.parts, vec!["work"]);
}

#[test]
fn test_soft_navigation_disabled() {
    let config = SiteConfig {
        soft_navigation: false,
        ..SiteConfig::default()
    };
    let (host, site, routes) = site_with(config);
    let link = host.add_link("/about");
    site.start();

    assert_eq!(site.router().hijack_links(), 0);
    assert!(!host.anchor_hijacked(link));

    site.router().navigate("/about");
    assert_eq!(host.pushed_count(), 0);
    assert_eq!(host.loads(), vec!["http://localhost:8080/about".to_string()]);
    assert!(routes.borrow().is_empty());
}

#[test]
fn test_push_state_failure_publishes_nothing() {
    let (host, site, routes) = site();
    site.start();
    host.set_history_supported(false);

    site.router().navigate("/about");

    assert!(routes.borrow().is_empty());
    assert_eq!(host.pushed_count(), 0);
    assert!(host.loads().is_empty());
    assert!(host.has_log_containing("pushState /about failed"));
    assert_eq!(site.router().current_route(), None);
}

#[test]
fn test_popstate_after_location_replace() {
    let (host, site, routes) = site();
    site.start();
    site.router().navigate("/work");
    host.set_location("/work?tab=3d");

    assert!(host.back());
    assert!(host.forward());

    assert_eq!(
        host.history(),
        vec![
            "http://localhost:8080/".to_string(),
            "http://localhost:8080/work?tab=3d".to_string(),
        ]
    );
    let last = routes.borrow().last().cloned().unwrap();
    assert_eq!(last.route, "/work?tab=3d");
    assert_eq!(last.parts, vec!["work"]);
    assert_eq!(last.prev_route.as_deref(), Some("/"));
}

#[test]
fn test_route_subscriber_can_navigate_again() {
    let (host, site, routes) = site();
    site.start();

    let bus = Rc::downgrade(site.bus());
    site.bus().on(
        message::ROUTE,
        subscriber(move |p: &Payload| {
            let redirect = p.as_route().is_some_and(|c| c.route == "/old");
            if let (true, Some(bus)) = (redirect, bus.upgrade()) {
                bus.send(message::NAVIGATE, Payload::from("/new"));
            }
        }),
    );

    site.router().navigate("/old");

    assert_eq!(host.location_href(), "http://localhost:8080/new");
    let routes = routes.borrow();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[1].prev_route.as_deref(), Some("/old"));
}
