use std::fmt;

use serde::{Deserialize, Serialize};

/// A location inside the application, as seen by the routing layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub pathname: String,
    /// Query string including the leading `?`, empty when absent.
    #[serde(default)]
    pub search: String,
    /// Fragment including the leading `#`, empty when absent.
    #[serde(default)]
    pub hash: String,
}

impl Location {
    /// Parse an href such as `/admin/users?page=2#top`.
    pub fn parse(href: &str) -> Self {
        let (rest, hash) = match href.find('#') {
            Some(idx) => (&href[..idx], &href[idx..]),
            None => (href, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let pathname = if pathname.is_empty() { "/" } else { pathname };

        Location {
            pathname: pathname.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }
}

impl From<&str> for Location {
    fn from(href: &str) -> Self {
        Location::parse(href)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Where the routing layer should send the user instead of the protected view.
///
/// Serialises as `{"pathname": ..., "state": {"from": ...}}`, with `state`
/// left out when there is no saved location.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(into = "RedirectWire", from = "RedirectWire")]
pub struct Redirect {
    pub pathname: String,
    /// The originally requested location, kept so a login flow can return to it.
    pub from: Option<Location>,
}

#[derive(Serialize, Deserialize)]
struct RedirectWire {
    pathname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    state: Option<RedirectState>,
}

#[derive(Serialize, Deserialize)]
struct RedirectState {
    from: Location,
}

impl From<Redirect> for RedirectWire {
    fn from(redirect: Redirect) -> Self {
        RedirectWire {
            pathname: redirect.pathname,
            state: redirect.from.map(|from| RedirectState { from }),
        }
    }
}

impl From<RedirectWire> for Redirect {
    fn from(wire: RedirectWire) -> Self {
        Redirect {
            pathname: wire.pathname,
            from: wire.state.map(|state| state.from),
        }
    }
}

impl Redirect {
    /// Redirect that remembers where the user was going.
    pub fn with_from(pathname: impl Into<String>, from: Location) -> Self {
        Redirect {
            pathname: pathname.into(),
            from: Some(from),
        }
    }

    pub fn to(pathname: impl Into<String>) -> Self {
        Redirect {
            pathname: pathname.into(),
            from: None,
        }
    }
}

/// Outcome of a guard evaluation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }

    /// Produce the protected content when allowed, or hand back the redirect.
    pub fn render<T>(self, content: impl FnOnce() -> T) -> Result<T, Redirect> {
        match self {
            GuardDecision::Allow => Ok(content()),
            GuardDecision::Redirect(redirect) => Err(redirect),
        }
    }
}
