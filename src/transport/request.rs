use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::error::AuthError;

/// Methods accepted by the authenticated request wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl RequestMethod {
    /// Pure reads never carry the anti-forgery header.
    pub fn is_read(self) -> bool {
        self == RequestMethod::Get
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequestMethod::Get => "get",
            RequestMethod::Post => "post",
            RequestMethod::Put => "put",
            RequestMethod::Patch => "patch",
            RequestMethod::Delete => "delete",
        }
    }

    pub fn as_method(self) -> Method {
        match self {
            RequestMethod::Get => Method::GET,
            RequestMethod::Post => Method::POST,
            RequestMethod::Put => Method::PUT,
            RequestMethod::Patch => Method::PATCH,
            RequestMethod::Delete => Method::DELETE,
        }
    }
}

/// The options bag for [`AuthTransport::authenticated_request`](super::AuthTransport::authenticated_request).
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: RequestMethod,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new(method: RequestMethod) -> Self {
        RequestOptions {
            method,
            ..Default::default()
        }
    }

    pub fn get() -> Self {
        Self::new(RequestMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(RequestMethod::Post)
    }

    pub fn put() -> Self {
        Self::new(RequestMethod::Put)
    }

    pub fn patch() -> Self {
        Self::new(RequestMethod::Patch)
    }

    pub fn delete() -> Self {
        Self::new(RequestMethod::Delete)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Like [`header`](Self::header) for names and values only known at runtime.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, AuthError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AuthError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| AuthError::InvalidHeader(format!("{name}: {e}")))?;
        Ok(self.header(name, value))
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialise `value` as the body and mark it as JSON unless the caller
    /// already chose a content type.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self, AuthError> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static("application/json"));
        Ok(self)
    }
}
