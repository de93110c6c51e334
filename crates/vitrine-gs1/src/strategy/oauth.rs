//! OAuth password grant against the v1 products API.

use crate::error::{Gs1Error, Gs1Result};
use crate::payload::flat_payload;
use crate::transport::HttpRequest;
use crate::types::{non_blank, Gs1Config, Gtin, RegistrationRequest};

use super::Strategy;

#[derive(Debug, Clone)]
pub struct OAuthPasswordGrant {
    config: Gs1Config,
}

impl OAuthPasswordGrant {
    pub fn new(config: Gs1Config) -> Self {
        Self { config }
    }

    fn products_url(&self) -> String {
        format!("{}/v1/products", self.config.base())
    }

    fn bearer(request: HttpRequest, token: Option<&str>) -> HttpRequest {
        match token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }
}

impl Strategy for OAuthPasswordGrant {
    fn name(&self) -> &'static str {
        "oauth"
    }

    fn token_request(&self) -> Option<HttpRequest> {
        let c = &self.config;
        Some(
            HttpRequest::post(format!("{}/oauth/token", c.base())).form([
                ("grant_type", "password"),
                ("client_id", c.client_id.as_str()),
                ("client_secret", c.client_secret.as_str()),
                ("username", c.username.as_str()),
                ("password", c.password.as_str()),
                ("scope", "openid"),
            ]),
        )
    }

    fn registration_request(
        &self,
        token: Option<&str>,
        request: &RegistrationRequest,
        gtin: Option<&Gtin>,
    ) -> Gs1Result<HttpRequest> {
        let gtin = gtin.ok_or_else(|| {
            Gs1Error::validation("EAN/GTIN is required to register with this registry")
        })?;
        let payload = flat_payload(request, gtin, non_blank(self.config.company_cad.as_deref()));

        Ok(Self::bearer(HttpRequest::post(self.products_url()), token).json(payload))
    }

    fn lookup_request(&self, token: Option<&str>, gtin: &Gtin) -> HttpRequest {
        Self::bearer(
            HttpRequest::get(format!("{}/{}", self.products_url(), gtin.as_str())),
            token,
        )
    }
}
