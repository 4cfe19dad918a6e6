/// Cookie the back-end uses to hand out the anti-forgery token.
pub const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header the token is echoed in on state-changing requests.
pub const XSRF_HEADER: &str = "x-xsrf-token";

/// Extract the `XSRF-TOKEN` value from a `Cookie` header string.
///
/// Mirrors how browser scripts read `document.cookie`: the last pair with
/// that name wins, whitespace around the name and `=` is ignored, and a
/// missing cookie yields an empty string.
pub fn xsrf_token_from_cookies(cookies: &str) -> String {
    cookies
        .split(';')
        .enumerate()
        .filter_map(|(index, pair)| {
            // Only the first pair may start without a separator.
            let pair = if index == 0 { pair } else { pair.trim_start() };
            let rest = pair.strip_prefix(XSRF_COOKIE)?;
            let value = rest.trim_start().strip_prefix('=')?;
            Some(value.trim_start())
        })
        .last()
        .unwrap_or_default()
        .to_string()
}
