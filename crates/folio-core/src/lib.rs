//! Client-side micro-framework for the Folio portfolio site
//!
//! This crate provides the pieces every page builds on:
//! - A topic-based message bus
//! - One shared animation-frame loop with FPS statistics
//! - A history router that turns link clicks into soft navigations
//!
//! ## Architecture
//!
//! - [`bus`]: `MessageBus` publish/subscribe registry
//! - [`frame`]: `FrameScheduler` and `FrameStats`
//! - [`router`]: `Router`, route state and link eligibility
//! - [`message`]: Framework topics and the `Payload` type
//! - [`config`]: `SiteConfig`
//!
//! `Site` wires them together for one page load.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use folio_core::{message, subscriber, Payload, Site, SiteConfig};
//! use folio_hal_mock::MockHost;
//!
//! let host = Rc::new(MockHost::new());
//! let site = Site::new(host.clone(), SiteConfig::default());
//!
//! site.bus().on(message::ROUTE, subscriber(|p: &Payload| {
//!     if let Some(change) = p.as_route() {
//!         assert_eq!(change.parts, vec!["about"]);
//!     }
//! }));
//! site.start();
//! site.router().navigate("/about");
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: All state management is pure Rust, testable without a browser
//! 2. **Host Abstraction**: Frames, history and the document come from a `Host`
//! 3. **Explicit Ownership**: Components are constructed once and shared by `Rc`, no globals
//! 4. **Fail Silent**: Unknown topics and listeners are no-ops; host failures are logged

pub mod bus;
pub mod config;
pub mod frame;
pub mod message;
pub mod router;

mod site;

// Re-export core types for convenience
pub use bus::{subscriber, MessageBus, Subscriber};
pub use config::{ConfigError, SiteConfig};
pub use frame::{listener, FrameListener, FrameScheduler, FrameStats, StatsSnapshot};
pub use message::Payload;
pub use router::{RouteChange, RouteState, Router};
pub use site::Site;

pub use folio_hal::{Host, HostError};
