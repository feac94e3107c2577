//! Route state and transitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Route change published after a navigation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteChange {
    /// New root-relative route, query and fragment included
    pub route: String,
    /// Non-empty path segments of `route`
    pub parts: Vec<String>,
    /// Route before this navigation, `None` on the first one
    pub prev_route: Option<String>,
}

impl RouteChange {
    /// JSON form `{ route, parts, prevRoute }`
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Current and previous route
///
/// Both are `None` until the first navigation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteState {
    current: Option<String>,
    previous: Option<String>,
}

impl RouteState {
    /// Fresh state before any navigation
    pub fn new() -> Self {
        Self::default()
    }

    /// Current root-relative route
    #[inline]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Route before the latest navigation
    #[inline]
    pub fn previous(&self) -> Option<&str> {
        self.previous.as_deref()
    }

    /// Rotate to the location `href` under site root `root`
    ///
    /// Returns the next state and the change to publish.
    pub fn advance(&self, href: &str, root: &str) -> (RouteState, RouteChange) {
        let route = strip_root(href, root);
        let change = RouteChange {
            parts: route_parts(&route),
            prev_route: self.current.clone(),
            route: route.clone(),
        };
        let next = RouteState {
            current: Some(route),
            previous: self.current.clone(),
        };
        (next, change)
    }
}

/// Root-relative form of `href`
///
/// Hrefs outside `root` are returned unchanged. The bare root maps to `/`.
pub fn strip_root(href: &str, root: &str) -> String {
    match href.strip_prefix(root) {
        Some("") => "/".to_string(),
        Some(rest) => rest.to_string(),
        None => href.to_string(),
    }
}

/// Non-empty path segments of a root-relative route
pub fn route_parts(route: &str) -> Vec<String> {
    let path = route.split(['?', '#']).next().unwrap_or("");
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
