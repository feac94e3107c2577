//! Framework topics and message payloads

use serde_json::Value;

use crate::router::RouteChange;

/// Published by the router after every navigation
pub const ROUTE: &str = "route";

/// Ask the router to re-scan the document for anchors to hijack
pub const HIJACK_LINKS: &str = "hijack-links";

/// Ask the router to navigate; the payload carries the href
pub const NAVIGATE: &str = "navigate";

/// Payload carried by the framework's message bus
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// No data
    Empty,
    /// Plain text, such as an href
    Text(String),
    /// Route change published on [`ROUTE`]
    Route(RouteChange),
    /// Arbitrary page data
    Json(Value),
}

impl Payload {
    /// Text content, also accepting a JSON string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Payload::Text(s) => Some(s),
            Payload::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Route change content
    pub fn as_route(&self) -> Option<&RouteChange> {
        match self {
            Payload::Route(change) => Some(change),
            _ => None,
        }
    }

    /// JSON form handed to page scripts
    pub fn to_json(&self) -> Value {
        match self {
            Payload::Empty => Value::Null,
            Payload::Text(s) => Value::String(s.clone()),
            Payload::Route(change) => change.to_json(),
            Payload::Json(v) => v.clone(),
        }
    }

    /// Payload for a value received from a page script
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => Payload::Empty,
            Value::String(s) => Payload::Text(s),
            other => Payload::Json(other),
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<RouteChange> for Payload {
    fn from(change: RouteChange) -> Self {
        Payload::Route(change)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}
