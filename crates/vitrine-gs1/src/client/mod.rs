//! Registration client for the GS1 registry.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::TokenCache;
use crate::checksum::digits_only;
use crate::error::{Gs1Error, Gs1Result};
use crate::extract;
use crate::strategy::{self, Strategy};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{Gs1Config, Gtin, RegistrationOutcome, RegistrationRequest, Verification, VerifySource};

mod http;

use http::{HttpBackend, LookupOutcome};

/// Registers and verifies products against the GS1 registry.
///
/// Cloning is cheap; clones share the token cache.
#[derive(Debug, Clone)]
pub struct RegistrationClient {
    http: HttpBackend,
}

impl RegistrationClient {
    /// Build a client with the reqwest transport and the strategy selected by
    /// `config.variant`.
    pub fn new(config: Gs1Config) -> Gs1Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout_secs)?;
        let tokens = TokenCache::new(config.token_margin_secs);

        Ok(Self::with_parts(
            strategy::from_config(&config),
            Arc::new(transport),
            Arc::new(tokens),
        ))
    }

    pub fn from_env() -> Gs1Result<Self> {
        Self::new(Gs1Config::from_env()?)
    }

    /// Assemble a client from explicit parts (custom transport, shared cache).
    pub fn with_parts(
        strategy: Arc<dyn Strategy>,
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<TokenCache>,
    ) -> Self {
        Self {
            http: HttpBackend {
                transport,
                strategy,
                tokens,
            },
        }
    }

    /// Register a product.
    ///
    /// Fails with [`Gs1Error::Validation`] before any network call when the
    /// description is blank, when a supplied identifier fails the checksum,
    /// or when no identifier is supplied and the registry cannot assign one.
    pub async fn register(&self, request: &RegistrationRequest) -> Gs1Result<RegistrationOutcome> {
        if request.description.trim().is_empty() {
            return Err(Gs1Error::validation("product description is required"));
        }

        let gtin = match request.supplied_gtin() {
            Some(raw) => Some(Gtin::parse(raw)?),
            None if self.http.strategy.assigns_identifiers() => None,
            None => {
                return Err(Gs1Error::validation(format!(
                    "EAN/GTIN is required for the {} registry",
                    self.http.strategy.name()
                )))
            }
        };

        let token = self.http.token().await?;
        let http_request =
            self.http
                .strategy
                .registration_request(token.as_deref(), request, gtin.as_ref())?;

        info!(
            strategy = self.http.strategy.name(),
            gtin = gtin.as_ref().map(Gtin::as_str).unwrap_or("<assign>"),
            "submitting registration"
        );
        let body = self.http.submit(http_request, token.is_some()).await?;

        let outcome = RegistrationOutcome {
            success: true,
            gtin: extract::gtin(&body),
            status: extract::status(&body),
            error_message: None,
            raw: body,
        };
        info!(gtin = ?outcome.gtin, status = ?outcome.status, "registration accepted");
        Ok(outcome)
    }

    /// Look up an identifier.
    ///
    /// Not found is a successful answer. When the account lookup misses and
    /// the strategy has a public lookup, that lookup decides the result.
    pub async fn verify(&self, identifier: &str) -> Gs1Result<Verification> {
        let digits = digits_only(identifier);
        if digits.is_empty() {
            return Err(Gs1Error::validation("identifier is required"));
        }
        if digits.len() > 14 {
            return Err(Gs1Error::validation(format!(
                "identifier has {} digits, at most 14 allowed",
                digits.len()
            )));
        }
        let gtin = Gtin::from_digits(digits);

        let token = self.http.token().await?;
        let request = self.http.strategy.lookup_request(token.as_deref(), &gtin);

        debug!(gtin = %gtin, "verifying identifier");
        if let LookupOutcome::Found(product) = self.http.lookup(request, token.is_some()).await? {
            return Ok(Verification::found(VerifySource::Own, product));
        }

        let Some(public) = self.http.strategy.public_lookup_request(&gtin) else {
            return Ok(Verification::not_found(VerifySource::Own));
        };

        debug!(gtin = %gtin, "own lookup missed, trying public lookup");
        match self.http.lookup(public, false).await? {
            LookupOutcome::Found(product) => Ok(Verification::found(VerifySource::Registry, product)),
            LookupOutcome::Missing => Ok(Verification::not_found(VerifySource::Registry)),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.http.strategy.name()
    }

    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.http.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ManualClock;
    use crate::strategy::{BasicAuthExchange, OAuthPasswordGrant, Relay};
    use crate::transport::{HttpReply, HttpRequest};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned replies and records every request.
    #[derive(Debug, Default)]
    struct ScriptedTransport {
        replies: Mutex<VecDeque<HttpReply>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        fn new(replies: impl IntoIterator<Item = HttpReply>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
                seen: Mutex::default(),
            })
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn urls(&self) -> Vec<String> {
            self.seen.lock().unwrap().iter().map(|r| r.url.clone()).collect()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: HttpRequest) -> Gs1Result<HttpReply> {
            self.seen.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Gs1Error::Transport {
                    message: "connection reset".into(),
                })
        }
    }

    fn config() -> Gs1Config {
        Gs1Config::default()
            .with_base_url("https://gs1.test")
            .with_client("id", "secret")
            .with_account("ops@example.com", "pw")
    }

    fn client(strategy: Arc<dyn Strategy>, transport: Arc<ScriptedTransport>) -> RegistrationClient {
        let tokens = TokenCache::with_clock(60, Arc::new(ManualClock::default()));
        RegistrationClient::with_parts(strategy, transport, Arc::new(tokens))
    }

    fn token_reply() -> HttpReply {
        HttpReply::new(200, r#"{"access_token":"tok-1","expires_in":3600}"#)
    }

    #[tokio::test]
    async fn test_empty_description_makes_no_calls() {
        let transport = ScriptedTransport::new(Vec::<HttpReply>::new());
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport.clone());

        let result = client
            .register(&RegistrationRequest::new("  ").with_gtin("7891234567895"))
            .await;

        assert!(matches!(result, Err(Gs1Error::Validation { .. })));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_bad_check_digit_makes_no_calls() {
        let transport = ScriptedTransport::new(Vec::<HttpReply>::new());
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport.clone());

        let err = client
            .register(&RegistrationRequest::new("Caneca").with_gtin("7891234567890"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::error::ErrorKind::ValidationError);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_oauth_requires_supplied_gtin() {
        let transport = ScriptedTransport::new(Vec::<HttpReply>::new());
        let client = client(Arc::new(OAuthPasswordGrant::new(config())), transport.clone());

        let result = client.register(&RegistrationRequest::new("Caneca")).await;
        assert!(matches!(result, Err(Gs1Error::Validation { .. })));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_register_extracts_nested_gtin() {
        let transport = ScriptedTransport::new([
            token_reply(),
            HttpReply::new(
                201,
                r#"{"product":{"gs1TradeItemIdentificationKey":{"gtin":"07891234567895"},"gtinStatusCode":"ACTIVE"}}"#,
            ),
        ]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport.clone());

        let outcome = client
            .register(&RegistrationRequest::new("Caneca").with_gtin("7891234567895"))
            .await
            .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.gtin.as_deref(), Some("07891234567895"));
        assert_eq!(outcome.status.as_deref(), Some("ACTIVE"));
        assert_eq!(
            transport.urls(),
            vec![
                "https://gs1.test/oauth/access-token".to_string(),
                "https://gs1.test/gs1/v2/products".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_register_unknown_shape_yields_null_gtin() {
        let transport = ScriptedTransport::new([token_reply(), HttpReply::new(200, r#"{"id":99}"#)]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport);

        let outcome = client
            .register(&RegistrationRequest::new("Caneca"))
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.gtin, None);
        assert_eq!(outcome.raw, json!({ "id": 99 }));
    }

    #[tokio::test]
    async fn test_registry_error_message_is_surfaced() {
        let transport = ScriptedTransport::new([
            token_reply(),
            HttpReply::new(409, r#"{"message":"GTIN já cadastrado"}"#),
        ]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport);

        let err = client
            .register(&RegistrationRequest::new("Caneca").with_gtin("7891234567895"))
            .await
            .unwrap_err();

        match err {
            Gs1Error::Registry { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "GTIN já cadastrado");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_success_is_protocol_error() {
        let transport = ScriptedTransport::new([token_reply(), HttpReply::new(200, "<html>ok</html>")]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport);

        let err = client
            .register(&RegistrationRequest::new("Caneca").with_gtin("7891234567895"))
            .await
            .unwrap_err();
        match err {
            Gs1Error::Protocol { raw, .. } => assert_eq!(raw, "<html>ok</html>"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_auth_rejection_is_auth_failure_and_not_cached() {
        let transport = ScriptedTransport::new([
            HttpReply::new(401, r#"{"error":"invalid_grant","error_description":"Bad credentials"}"#),
            token_reply(),
            HttpReply::new(200, r#"{"gtin":"7891234567895"}"#),
        ]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport.clone());
        let req = RegistrationRequest::new("Caneca").with_gtin("7891234567895");

        let err = client.register(&req).await.unwrap_err();
        assert!(matches!(err, Gs1Error::AuthFailure { .. }));
        assert!(err.to_string().contains("Bad credentials"));
        assert_eq!(transport.calls(), 1);

        client.register(&req).await.unwrap();
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_token_without_access_token_is_auth_failure() {
        let transport = ScriptedTransport::new([HttpReply::new(200, r#"{"token_type":"bearer"}"#)]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport);

        let err = client
            .register(&RegistrationRequest::new("Caneca"))
            .await
            .unwrap_err();
        assert!(matches!(err, Gs1Error::AuthFailure { .. }));
    }

    #[tokio::test]
    async fn test_registry_401_invalidates_cached_token() {
        let transport = ScriptedTransport::new([token_reply(), HttpReply::new(401, "")]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport);

        let err = client
            .register(&RegistrationRequest::new("Caneca"))
            .await
            .unwrap_err();
        assert!(matches!(err, Gs1Error::AuthFailure { .. }));
        assert!(client.tokens().snapshot().await.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let transport = ScriptedTransport::new([token_reply()]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport.clone());

        let err = client
            .register(&RegistrationRequest::new("Caneca"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::TransportError);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_verify_found_and_missing() {
        let transport = ScriptedTransport::new([
            token_reply(),
            HttpReply::new(200, r#"{"gtin":"07891234567895"}"#),
            HttpReply::new(404, ""),
        ]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport.clone());

        let found = client.verify("7891234567895").await.unwrap();
        assert!(found.found);
        assert_eq!(found.source, VerifySource::Own);

        let missing = client.verify("96385074").await.unwrap();
        assert!(!missing.found);
        assert_eq!(missing.source, VerifySource::Own);
        assert_eq!(transport.calls(), 3, "token exchanged once");
    }

    #[tokio::test]
    async fn test_verify_empty_success_body_is_missing() {
        let transport = ScriptedTransport::new([token_reply(), HttpReply::new(200, "  ")]);
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport.clone());

        let result = client.verify("7891234567895").await.unwrap();
        assert!(!result.found);
        assert!(result.product.is_none());
        assert_eq!(result.source, VerifySource::Own);
    }

    #[tokio::test]
    async fn test_verify_falls_back_to_public_lookup() {
        let transport = ScriptedTransport::new([
            token_reply(),
            HttpReply::new(404, ""),
            HttpReply::new(200, r#"{"gtin":"07891234567895","brandName":"Acme"}"#),
        ]);
        let strategy = BasicAuthExchange::new(config().with_verified_url("https://verified.test"));
        let client = client(Arc::new(strategy), transport.clone());

        let result = client.verify("7891234567895").await.unwrap();
        assert!(result.found);
        assert_eq!(result.source, VerifySource::Registry);
        assert_eq!(result.product.unwrap()["brandName"], "Acme");
        assert_eq!(
            transport.urls().last().map(String::as_str),
            Some("https://verified.test/07891234567895")
        );
    }

    #[tokio::test]
    async fn test_verify_empty_identifier() {
        let transport = ScriptedTransport::new(Vec::<HttpReply>::new());
        let client = client(Arc::new(BasicAuthExchange::new(config())), transport.clone());

        assert!(matches!(
            client.verify(" - ").await,
            Err(Gs1Error::Validation { .. })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_relay_register_and_verify_without_token() {
        let transport = ScriptedTransport::new([
            HttpReply::new(200, r#"{"success":true,"data":{"gtin":"7890000000001"}}"#),
            HttpReply::new(200, r#"{"found":false}"#),
            HttpReply::new(200, r#"{"success":false,"error":"secret inválido"}"#),
        ]);
        let relay = Relay::new(Gs1Config::default().with_relay("https://relay.test/exec", "shh"));
        let client = client(Arc::new(relay), transport.clone());

        let outcome = client.register(&RegistrationRequest::new("Caneca")).await.unwrap();
        assert_eq!(outcome.gtin.as_deref(), Some("7890000000001"));

        let verification = client.verify("7890000000001").await.unwrap();
        assert!(!verification.found);

        let err = client
            .register(&RegistrationRequest::new("Caneca"))
            .await
            .unwrap_err();
        assert!(matches!(err, Gs1Error::Registry { status: 200, .. }));
        assert_eq!(transport.calls(), 3);
    }
}
