//! HTTP layer: token exchange, status mapping, LookupOutcome.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{IssuedToken, TokenCache};
use crate::error::{excerpt, Gs1Error, Gs1Result, ERROR_EXCERPT_LEN};
use crate::extract;
use crate::strategy::Strategy;
use crate::transport::{HttpReply, HttpRequest, HttpTransport};

/// Outcome of a product lookup (404 is an answer, not an error).
#[derive(Debug)]
pub(crate) enum LookupOutcome {
    Found(Value),
    Missing,
}

/// Holds transport, strategy and token cache.
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) strategy: Arc<dyn Strategy>,
    pub(crate) tokens: Arc<TokenCache>,
}

impl HttpBackend {
    /// Cached or freshly exchanged token; `None` for strategies without one.
    pub(crate) async fn token(&self) -> Gs1Result<Option<String>> {
        if !self.strategy.needs_token() {
            return Ok(None);
        }
        let request = self
            .strategy
            .token_request()
            .ok_or_else(|| Gs1Error::AuthFailure {
                message: format!("{} strategy has no credential exchange", self.strategy.name()),
            })?;

        self.tokens
            .get_or_acquire(|| self.exchange(request))
            .await
            .map(Some)
    }

    async fn exchange(&self, request: HttpRequest) -> Gs1Result<IssuedToken> {
        debug!(url = %request.url, "exchanging credentials");
        let reply = self.transport.send(request).await?;

        if !reply.is_success() {
            let detail = parse_json(&reply.body)
                .as_ref()
                .and_then(extract::error_message)
                .unwrap_or_else(|| excerpt(&reply.body, ERROR_EXCERPT_LEN));
            return Err(Gs1Error::AuthFailure {
                message: format!("credential exchange rejected: HTTP {} - {}", reply.status, detail),
            });
        }

        let body = parse_json(&reply.body).ok_or_else(|| {
            Gs1Error::protocol("invalid credential exchange response", reply.body.clone())
        })?;

        let access_token = body
            .get("access_token")
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Gs1Error::AuthFailure {
                message: "credential exchange returned no access_token".to_string(),
            })?;

        // Some providers send expires_in as a string.
        let expires_in = body.get("expires_in").and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        });

        Ok(IssuedToken {
            access_token: access_token.to_string(),
            expires_in,
        })
    }

    /// Send a registry call and return the parsed success body.
    pub(crate) async fn submit(&self, request: HttpRequest, authenticated: bool) -> Gs1Result<Value> {
        let reply = self.transport.send(request).await?;
        self.map_reply(reply, authenticated).await
    }

    /// Send a lookup; 404, an empty body and an explicit `"found": false`
    /// mean Missing.
    pub(crate) async fn lookup(
        &self,
        request: HttpRequest,
        authenticated: bool,
    ) -> Gs1Result<LookupOutcome> {
        let reply = self.transport.send(request).await?;

        if reply.status == 404 {
            debug!("lookup returned 404");
            return Ok(LookupOutcome::Missing);
        }

        let body = self.map_reply(reply, authenticated).await?;
        if body.is_null() {
            debug!("lookup returned an empty body");
            return Ok(LookupOutcome::Missing);
        }
        if body.get("found").and_then(Value::as_bool) == Some(false) {
            return Ok(LookupOutcome::Missing);
        }
        // Relay envelope: {"found": true, "product": {...}}
        if body.get("found").is_some() {
            if let Some(product) = body.get("product") {
                return Ok(LookupOutcome::Found(product.clone()));
            }
        }
        Ok(LookupOutcome::Found(body))
    }

    async fn map_reply(&self, reply: HttpReply, authenticated: bool) -> Gs1Result<Value> {
        let HttpReply { status, body } = reply;

        match status {
            200..=299 => {
                let parsed = if body.trim().is_empty() {
                    Value::Null
                } else {
                    parse_json(&body)
                        .ok_or_else(|| Gs1Error::protocol("invalid JSON in registry response", body.clone()))?
                };

                if let Some(message) = declined_in_body(&parsed) {
                    return Err(Gs1Error::Registry { status, message });
                }
                Ok(parsed)
            }

            401 | 403 => {
                if authenticated {
                    self.tokens.invalidate().await;
                }
                let detail = message_or_excerpt(status, &body);
                warn!(status, "registry rejected credentials");
                Err(Gs1Error::AuthFailure {
                    message: format!("registry rejected credentials: {detail}"),
                })
            }

            _ => Err(Gs1Error::Registry {
                status,
                message: message_or_excerpt(status, &body),
            }),
        }
    }
}

fn parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok()
}

/// Registry-supplied message, or `error <status>: <excerpt>`.
fn message_or_excerpt(status: u16, body: &str) -> String {
    parse_json(body)
        .as_ref()
        .and_then(extract::error_message)
        .unwrap_or_else(|| {
            let body = body.trim();
            if body.is_empty() {
                format!("error {status}")
            } else {
                format!("error {}: {}", status, excerpt(body, ERROR_EXCERPT_LEN))
            }
        })
}

/// A 2xx body that still reports failure (`"success": false`, or an error
/// field with no identifier), as relays that cannot set status codes do.
fn declined_in_body(body: &Value) -> Option<String> {
    let explicit_failure = body.get("success").and_then(Value::as_bool) == Some(false)
        || body.get("ok").and_then(Value::as_bool) == Some(false);
    let error_only = body
        .get("error")
        .is_some_and(|e| !e.is_null() && e != &Value::Bool(false))
        && extract::gtin(body).is_none();

    if !(explicit_failure || error_only) {
        return None;
    }
    Some(extract::error_message(body).unwrap_or_else(|| "registry declined the request".to_string()))
}
