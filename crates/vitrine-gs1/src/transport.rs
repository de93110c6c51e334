//! HTTP transport seam.
//!
//! The client never talks to reqwest directly: it hands an [`HttpRequest`] to
//! an [`HttpTransport`] and gets back status plus body text. Tests substitute
//! a counting fake; production uses [`ReqwestTransport`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT};
use tracing::debug;

use crate::error::{Gs1Error, Gs1Result};

pub const GS1_USER_AGENT: &str = concat!("vitrine-gs1/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Request body variants the registry APIs use.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(url)
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Body::Json(body);
        self
    }

    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Body::Form(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Encoded body text, as sent on the wire.
    pub fn body_text(&self) -> Gs1Result<Option<String>> {
        match &self.body {
            Body::Empty => Ok(None),
            Body::Json(value) => serde_json::to_string(value)
                .map(Some)
                .map_err(|e| Gs1Error::validation(format!("unserializable payload: {e}"))),
            Body::Form(pairs) => Ok(Some(
                url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish(),
            )),
        }
    }
}

/// Status and body text of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns exactly one reply or error. No retries.
#[async_trait]
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    async fn send(&self, request: HttpRequest) -> Gs1Result<HttpReply>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout_secs: u64) -> Gs1Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(GS1_USER_AGENT));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| Gs1Error::Transport {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Gs1Result<HttpReply> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = self.client.request(method, &request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Form(_) => builder
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(request.body_text()?.unwrap_or_default()),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| Gs1Error::Transport {
            message: format!("failed to read response body: {}", e),
        })?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpReply { status, body })
    }
}
