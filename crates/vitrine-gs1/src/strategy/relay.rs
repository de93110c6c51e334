//! Relay through a script endpoint that holds the GS1 credentials.
//!
//! The relay authenticates callers with a shared secret in the body, so no
//! token exchange happens on this side. It can register products without an
//! identifier and returns the one GS1 assigned.

use serde_json::json;

use crate::error::{Gs1Error, Gs1Result};
use crate::payload::relay_product;
use crate::transport::HttpRequest;
use crate::types::{Gs1Config, Gtin, RegistrationRequest};

use super::Strategy;

#[derive(Debug, Clone)]
pub struct Relay {
    config: Gs1Config,
}

impl Relay {
    pub fn new(config: Gs1Config) -> Self {
        Self { config }
    }

    fn url(&self) -> &str {
        self.config.relay_url.as_deref().unwrap_or_default()
    }

    fn secret(&self) -> &str {
        self.config.relay_secret.as_deref().unwrap_or_default()
    }
}

impl Strategy for Relay {
    fn name(&self) -> &'static str {
        "relay"
    }

    fn needs_token(&self) -> bool {
        false
    }

    fn assigns_identifiers(&self) -> bool {
        true
    }

    fn token_request(&self) -> Option<HttpRequest> {
        None
    }

    fn registration_request(
        &self,
        _token: Option<&str>,
        request: &RegistrationRequest,
        gtin: Option<&Gtin>,
    ) -> Gs1Result<HttpRequest> {
        if self.url().trim().is_empty() {
            return Err(Gs1Error::Config {
                message: "relay URL not configured".into(),
            });
        }

        let mut product = relay_product(request);
        if let (Some(gtin), Some(obj)) = (gtin, product.as_object_mut()) {
            obj.insert("gtin".into(), json!(gtin.as_str()));
        }

        Ok(HttpRequest::post(self.url()).json(json!({
            "secret": self.secret(),
            "action": "register",
            "product": product,
        })))
    }

    fn lookup_request(&self, _token: Option<&str>, gtin: &Gtin) -> HttpRequest {
        HttpRequest::post(self.url()).json(json!({
            "secret": self.secret(),
            "action": "verify",
            "gtin": gtin.to_gtin14(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Body;

    fn relay() -> Relay {
        Relay::new(Gs1Config::default().with_relay("https://relay.test/exec", "shh"))
    }

    #[test]
    fn test_register_body() {
        let req = relay()
            .registration_request(None, &RegistrationRequest::new("Caneca"), None)
            .unwrap();
        assert_eq!(req.url, "https://relay.test/exec");
        assert!(req.header_value("authorization").is_none());
        match &req.body {
            Body::Json(v) => {
                assert_eq!(v["secret"], "shh");
                assert_eq!(v["action"], "register");
                assert_eq!(v["product"]["nome"], "Caneca");
            }
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[test]
    fn test_register_uses_normalized_gtin() {
        let gtin = Gtin::parse("789 1234 567895").unwrap();
        let req = relay()
            .registration_request(
                None,
                &RegistrationRequest::new("Caneca").with_gtin("789 1234 567895"),
                Some(&gtin),
            )
            .unwrap();
        match &req.body {
            Body::Json(v) => assert_eq!(v["product"]["gtin"], "7891234567895"),
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let relay = Relay::new(Gs1Config::default());
        let result = relay.registration_request(None, &RegistrationRequest::new("x"), None);
        assert!(matches!(result, Err(Gs1Error::Config { .. })));
    }

    #[test]
    fn test_verify_body() {
        let gtin = Gtin::parse("96385074").unwrap();
        let req = relay().lookup_request(None, &gtin);
        match &req.body {
            Body::Json(v) => {
                assert_eq!(v["action"], "verify");
                assert_eq!(v["gtin"], "00000096385074");
            }
            other => panic!("expected JSON body, got {other:?}"),
        }
    }
}
