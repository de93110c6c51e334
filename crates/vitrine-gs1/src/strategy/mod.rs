//! Registry integration strategies.
//!
//! Deployments reach GS1 Brasil in incompatible ways. Each [`Strategy`] only
//! builds requests; sending them and interpreting status codes stays in the
//! client, so every variant shares the checksum engine and error taxonomy.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::error::Gs1Result;
use crate::transport::HttpRequest;
use crate::types::{Gs1Config, Gtin, RegistrationRequest, Variant};

mod basic;
mod oauth;
mod relay;

pub use basic::BasicAuthExchange;
pub use oauth::OAuthPasswordGrant;
pub use relay::Relay;

/// Request builder for one registry integration.
pub trait Strategy: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Whether registry calls need an access token.
    fn needs_token(&self) -> bool {
        true
    }

    /// Whether the registry can assign an identifier when none is supplied.
    fn assigns_identifiers(&self) -> bool {
        false
    }

    /// Credential exchange request. `None` when [`Self::needs_token`] is false.
    fn token_request(&self) -> Option<HttpRequest>;

    /// Registration request. `gtin` is `None` for registry-assigned flows.
    fn registration_request(
        &self,
        token: Option<&str>,
        request: &RegistrationRequest,
        gtin: Option<&Gtin>,
    ) -> Gs1Result<HttpRequest>;

    /// Account-scoped lookup.
    fn lookup_request(&self, token: Option<&str>, gtin: &Gtin) -> HttpRequest;

    /// Secondary public lookup tried when the account lookup misses.
    fn public_lookup_request(&self, _gtin: &Gtin) -> Option<HttpRequest> {
        None
    }
}

/// Build the strategy selected by `config.variant`.
pub fn from_config(config: &Gs1Config) -> Arc<dyn Strategy> {
    match config.variant {
        Variant::OAuth => Arc::new(OAuthPasswordGrant::new(config.clone())),
        Variant::Basic => Arc::new(BasicAuthExchange::new(config.clone())),
        Variant::Relay => Arc::new(Relay::new(config.clone())),
    }
}

/// `Basic base64(id:secret)`.
pub(crate) fn basic_auth(client_id: &str, client_secret: &str) -> String {
    format!("Basic {}", BASE64.encode(format!("{client_id}:{client_secret}")))
}
