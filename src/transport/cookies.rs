//! Cookie store scoped to a single origin.
//!
//! Cookie matching in a plain [`Jar`] follows RFC 6265 and ignores ports and
//! schemes, so a cookie set by another service on the same host would be
//! replayed to ours. [`SameOriginJar`] only reads and writes the jar for URLs
//! whose origin (scheme, host, port) equals the configured one. The client
//! consults it on every hop, redirects included.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use reqwest::Url;
use tracing::debug;

#[derive(Debug)]
pub struct SameOriginJar {
    origin: Url,
    jar: Arc<Jar>,
}

impl SameOriginJar {
    pub fn new(origin: Url, jar: Arc<Jar>) -> Self {
        SameOriginJar { origin, jar }
    }

    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.origin.origin()
    }
}

impl CookieStore for SameOriginJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        if !self.is_same_origin(url) {
            debug!(
                event_name = "transport.cookie_rejected",
                event_domain = "transport",
                url = url.as_str(),
                "ignoring cookies from another origin"
            );
            return;
        }
        self.jar.set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        if !self.is_same_origin(url) {
            return None;
        }
        self.jar.cookies(url)
    }
}
