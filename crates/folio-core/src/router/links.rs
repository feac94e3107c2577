//! Anchor eligibility for soft navigation

/// What the router knows about an anchor when deciding to hijack it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkCandidate {
    /// href resolved against the document base
    pub resolved_href: String,
    /// `target` attribute
    pub target: Option<String>,
    /// Whether the anchor carries the opt-out marker
    pub opted_out: bool,
}

/// Why an anchor keeps native navigation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Resolved href points at another origin or a non-http scheme
    CrossOrigin,
    /// Opens in a new browsing context
    NewWindow,
    /// Explicitly opted out by markup
    OptedOut,
}

/// Decide whether an anchor under `origin` may be hijacked
pub fn eligibility(candidate: &LinkCandidate, origin: &str) -> Result<(), SkipReason> {
    if !is_same_origin(&candidate.resolved_href, origin) {
        return Err(SkipReason::CrossOrigin);
    }
    if candidate.target.as_deref() == Some("_blank") {
        return Err(SkipReason::NewWindow);
    }
    if candidate.opted_out {
        return Err(SkipReason::OptedOut);
    }
    Ok(())
}

/// Check that `href` lives under `origin`
///
/// Scheme and host compare case-insensitively. The origin must be followed
/// by the end of the href or a path, query or fragment delimiter, so
/// `http://site.dev.evil` is not under `http://site.dev`.
pub fn is_same_origin(href: &str, origin: &str) -> bool {
    if origin.is_empty() {
        return false;
    }
    let head = match href.get(..origin.len()) {
        Some(head) => head,
        None => return false,
    };
    if !head.eq_ignore_ascii_case(origin) {
        return false;
    }
    matches!(
        href[origin.len()..].chars().next(),
        None | Some('/') | Some('?') | Some('#')
    )
}
