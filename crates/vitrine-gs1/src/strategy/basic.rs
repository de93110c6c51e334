//! Basic-auth token exchange against the v2 products API.
//!
//! Registry calls carry the Basic header plus `client_id` and `access_token`
//! sidecar headers. Identifiers are sent as GTIN-14.

use serde_json::json;

use crate::error::Gs1Result;
use crate::payload::trade_item_payload;
use crate::transport::HttpRequest;
use crate::types::{non_blank, Gs1Config, Gtin, RegistrationRequest};

use super::{basic_auth, Strategy};

#[derive(Debug, Clone)]
pub struct BasicAuthExchange {
    config: Gs1Config,
}

impl BasicAuthExchange {
    pub fn new(config: Gs1Config) -> Self {
        Self { config }
    }

    fn products_url(&self) -> String {
        format!("{}/gs1/v2/products", self.config.base())
    }

    fn authorize(&self, request: HttpRequest, token: Option<&str>) -> HttpRequest {
        let c = &self.config;
        let request = request
            .header("Authorization", basic_auth(&c.client_id, &c.client_secret))
            .header("client_id", c.client_id.as_str());
        match token {
            Some(token) => request.header("access_token", token),
            None => request,
        }
    }
}

impl Strategy for BasicAuthExchange {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn assigns_identifiers(&self) -> bool {
        true
    }

    fn token_request(&self) -> Option<HttpRequest> {
        let c = &self.config;
        Some(
            HttpRequest::post(format!("{}/oauth/access-token", c.base()))
                .header("Authorization", basic_auth(&c.client_id, &c.client_secret))
                .json(json!({
                    "grant_type": "password",
                    "username": c.username,
                    "password": c.password,
                })),
        )
    }

    fn registration_request(
        &self,
        token: Option<&str>,
        request: &RegistrationRequest,
        gtin: Option<&Gtin>,
    ) -> Gs1Result<HttpRequest> {
        let payload = trade_item_payload(
            request,
            gtin,
            non_blank(self.config.company_cad.as_deref()),
        );
        Ok(self
            .authorize(HttpRequest::post(self.products_url()), token)
            .json(payload))
    }

    fn lookup_request(&self, token: Option<&str>, gtin: &Gtin) -> HttpRequest {
        self.authorize(
            HttpRequest::get(format!("{}/{}", self.products_url(), gtin.to_gtin14())),
            token,
        )
    }

    fn public_lookup_request(&self, gtin: &Gtin) -> Option<HttpRequest> {
        let base = non_blank(self.config.verified_url.as_deref())?.trim_end_matches('/');
        // Third-party endpoint: no account credentials.
        Some(HttpRequest::get(format!("{}/{}", base, gtin.to_gtin14())))
    }
}
