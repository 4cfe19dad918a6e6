use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::cookies::SameOriginJar;
use super::interceptor::{self, ResponseStatus};
use super::request::RequestOptions;
use super::xsrf::{xsrf_token_from_cookies, XSRF_HEADER};
use crate::config::TransportConfig;
use crate::error::AuthError;
use crate::session::Session;
use crate::store::AuthStore;

/// Talks to the authentication back-end on behalf of one [`Session`].
///
/// The cookie jar stands in for the browser cookie store. The client reads
/// and fills it through a [`SameOriginJar`], so only responses from the
/// configured origin (on any redirect hop) can set cookies, and cookies are
/// only sent back there.
pub struct AuthTransport<U> {
    session: Session<U>,
    client: Client,
    base_url: Url,
    cookies: Arc<SameOriginJar>,
}

impl<U> Clone for AuthTransport<U> {
    fn clone(&self) -> Self {
        AuthTransport {
            session: self.session.clone(),
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            cookies: self.cookies.clone(),
        }
    }
}

impl<U> AuthTransport<U>
where
    U: DeserializeOwned + Clone,
{
    pub fn new(session: Session<U>, config: &TransportConfig) -> Result<Self, AuthError> {
        Self::with_cookie_jar(session, config, Arc::new(Jar::default()))
    }

    /// Like [`new`](Self::new), sharing `jar` with other clients of the same origin.
    pub fn with_cookie_jar(
        session: Session<U>,
        config: &TransportConfig,
        jar: Arc<Jar>,
    ) -> Result<Self, AuthError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| AuthError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let cookies = Arc::new(SameOriginJar::new(base_url.clone(), jar));
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .cookie_provider(cookies.clone())
            .build()?;

        info!(
            base_url = base_url.as_str(),
            timeout_in_ms = config.timeout_in_ms,
            "Creating authentication transport"
        );
        Ok(AuthTransport {
            session,
            client,
            base_url,
            cookies,
        })
    }

    pub fn session(&self) -> &Session<U> {
        &self.session
    }

    pub fn store(&self) -> &AuthStore<U> {
        self.session.store()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cookie_jar(&self) -> &Arc<Jar> {
        self.cookies.jar()
    }

    /// Resolve `url` against the configured origin; absolute URLs pass through.
    pub fn resolve(&self, url: &str) -> Result<Url, AuthError> {
        self.base_url.join(url).map_err(|e| AuthError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// The current anti-forgery token, empty when the cookie is absent.
    pub fn xsrf_token(&self) -> String {
        self.cookies
            .cookies(&self.base_url)
            .and_then(|header| header.to_str().map(xsrf_token_from_cookies).ok())
            .unwrap_or_default()
    }

    /// POST `credentials` as JSON to the authentication endpoint and store
    /// the returned user on success.
    pub async fn login<C: Serialize + ?Sized>(&self, credentials: &C) -> Result<(), AuthError> {
        let url = self.session.config().authentication_url.clone();
        let options = RequestOptions::post().json(credentials)?;

        let response = self.send(&url, options).await?;
        let user = parse_user::<U>(response).await?;

        info!(
            event_name = "transport.login",
            event_domain = "transport",
            "login succeeded"
        );
        self.store().login(user);
        Ok(())
    }

    /// GET the current user and store it on success.
    pub async fn fetch_current_user(&self) -> Result<(), AuthError> {
        let url = self.session.config().current_user_url.clone();
        let options =
            RequestOptions::get().header(ACCEPT, HeaderValue::from_static("application/json"));

        let response = self.send(&url, options).await?;
        let user = parse_user::<U>(response).await?;

        debug!(
            event_name = "transport.current_user",
            event_domain = "transport",
            "current user retrieved"
        );
        self.store().login(user);
        Ok(())
    }

    /// DELETE the authentication resource, logging the store out on 200.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let url = self.session.config().authentication_url.clone();

        let response = self.send(&url, RequestOptions::delete()).await?;
        if response.status() != StatusCode::OK {
            return Err(request_failed(response).await);
        }

        info!(
            event_name = "transport.logout",
            event_domain = "transport",
            "logout succeeded"
        );
        self.store().logout();
        Ok(())
    }

    /// Send a request with same-origin credentials and, for anything but a
    /// GET, the anti-forgery header.
    ///
    /// A 401 response logs the store out and is still returned to the caller.
    pub async fn authenticated_request(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<Response, AuthError> {
        let response = self.send(url, options).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!(
                event_name = "transport.unauthorized",
                event_domain = "transport",
                url = response.url().as_str(),
                "received 401, logging out"
            );
            self.store().logout();
        }
        Ok(response)
    }

    /// Interceptor entry point for pipelines that surface HTTP failures as
    /// errors. Logs out on 401 and always returns the error.
    pub fn on_response_error<T, E: ResponseStatus>(&self, error: E) -> Result<T, E> {
        interceptor::on_response_error(self.store(), error)
    }

    async fn send(&self, url: &str, options: RequestOptions) -> Result<Response, AuthError> {
        let method = options.method;
        let (url, request) = self.prepare(url, options)?;

        debug!(method = method.as_str(), url = url.as_str(), "sending request");
        let response = request.send().await?;
        debug!(
            method = method.as_str(),
            url = response.url().as_str(),
            status = response.status().as_u16(),
            "received response"
        );
        Ok(response)
    }

    fn prepare(&self, url: &str, options: RequestOptions) -> Result<(Url, RequestBuilder), AuthError> {
        let url = self.resolve(url)?;
        let RequestOptions {
            method,
            mut headers,
            body,
        } = options;

        let xsrf_header = HeaderName::from_static(XSRF_HEADER);
        if !method.is_read() && !headers.contains_key(&xsrf_header) {
            let token = HeaderValue::from_str(&self.xsrf_token())
                .map_err(|e| AuthError::InvalidHeader(format!("{XSRF_HEADER}: {e}")))?;
            headers.insert(xsrf_header, token);
        }

        let mut request = self
            .client
            .request(method.as_method(), url.clone())
            .headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }
        Ok((url, request))
    }
}

/// Decode a 200 response body as the user, anything else is a failure.
async fn parse_user<U: DeserializeOwned>(response: Response) -> Result<U, AuthError> {
    if response.status() != StatusCode::OK {
        return Err(request_failed(response).await);
    }
    Ok(response.json::<U>().await?)
}

async fn request_failed(response: Response) -> AuthError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!(
        event_name = "transport.request_failed",
        event_domain = "transport",
        status = status.as_u16(),
        "authentication request failed"
    );
    AuthError::RequestFailed { status, body }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    fn transport(base_url: &str) -> AuthTransport<serde_json::Value> {
        AuthTransport::new(
            Session::configure(SessionConfig::default()),
            &TransportConfig::new(base_url),
        )
        .expect("transport should build")
    }

    #[test]
    fn relative_urls_resolve_against_base() {
        let transport = transport("https://app.example.org/");
        assert_eq!(
            transport.resolve("/api/authentication").unwrap().as_str(),
            "https://app.example.org/api/authentication"
        );
        assert_eq!(
            transport.resolve("https://other.example.org/x").unwrap().as_str(),
            "https://other.example.org/x"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = AuthTransport::<serde_json::Value>::new(
            Session::with_defaults(),
            &TransportConfig::new("not a url"),
        );
        assert!(matches!(result, Err(AuthError::InvalidUrl { .. })));
    }

    #[test]
    fn xsrf_token_comes_from_same_origin_cookie() {
        let transport = transport("https://app.example.org");
        assert_eq!(transport.xsrf_token(), "");

        let url = Url::parse("https://app.example.org/").unwrap();
        transport
            .cookie_jar()
            .add_cookie_str("XSRF-TOKEN=d3add0g", &url);

        assert_eq!(transport.xsrf_token(), "d3add0g");
    }

    #[test]
    fn xsrf_token_ignores_other_origins() {
        let transport = transport("https://app.example.org");
        let other = Url::parse("https://evil.example.com/").unwrap();
        transport
            .cookie_jar()
            .add_cookie_str("XSRF-TOKEN=stolen", &other);

        assert_eq!(transport.xsrf_token(), "");
    }

    #[test]
    fn post_gets_xsrf_header_and_get_does_not() {
        let transport = transport("https://app.example.org");
        let url = Url::parse("https://app.example.org/").unwrap();
        transport
            .cookie_jar()
            .add_cookie_str("XSRF-TOKEN=d3add0g", &url);

        let (_, post) = transport.prepare("/api/things", RequestOptions::post()).unwrap();
        let post = post.build().unwrap();
        assert_eq!(post.headers()[XSRF_HEADER], "d3add0g");

        let (_, get) = transport.prepare("/api/things", RequestOptions::get()).unwrap();
        let get = get.build().unwrap();
        assert!(get.headers().get(XSRF_HEADER).is_none());
    }

    #[test]
    fn caller_xsrf_header_is_not_overwritten() {
        let transport = transport("https://app.example.org");
        let url = Url::parse("https://app.example.org/").unwrap();
        transport
            .cookie_jar()
            .add_cookie_str("XSRF-TOKEN=d3add0g", &url);

        let options = RequestOptions::put()
            .try_header("X-XSRF-TOKEN", "caller")
            .unwrap();
        let (_, request) = transport.prepare("/api/things", options).unwrap();
        let request = request.build().unwrap();

        assert_eq!(request.headers()[XSRF_HEADER], "caller");
    }
}
