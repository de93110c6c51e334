//! Request, outcome and configuration types for the GS1 registry.

use serde::{Deserialize, Serialize};

use crate::checksum;
use crate::error::{Gs1Error, Gs1Result};

/// A checksum-valid product identifier (8, 12, 13 or 14 digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gtin(String);

impl Gtin {
    /// Strip non-digits and validate the check digit.
    pub fn parse(input: &str) -> Gs1Result<Self> {
        let result = checksum::validate(input);
        if result.valid {
            return Ok(Self(checksum::digits_only(input)));
        }

        let message = match (result.expected, result.got) {
            (Some(expected), Some(got)) => format!(
                "invalid check digit in {}: expected {}, got {}",
                input.trim(),
                expected,
                got
            ),
            _ => format!(
                "identifier must have 8, 12, 13 or 14 digits (got {})",
                result.length
            ),
        };
        Err(Gs1Error::validation(message))
    }

    /// Lookup key that skipped the checksum. Callers strip non-digits first.
    pub(crate) fn from_digits(digits: String) -> Self {
        Self(digits)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Left-pad with zeros to the 14-digit form the v2 API expects.
    pub fn to_gtin14(&self) -> String {
        format!("{:0>14}", self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Gtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Default country of origin (ISO 3166 numeric, Brazil).
pub const DEFAULT_ORIGIN: &str = "076";

/// Product attributes submitted to the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Product description. Required.
    pub description: String,

    /// Brand name. Falls back to the SKU, then to the description.
    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub sku: Option<String>,

    /// NCM tax classification.
    #[serde(default)]
    pub ncm: Option<String>,

    /// CEST tax classification.
    #[serde(default)]
    pub cest: Option<String>,

    /// Identifier to register. `None` asks the registry to assign one.
    #[serde(default)]
    pub gtin: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,

    /// GS1 Global Product Classification brick code.
    #[serde(default)]
    pub gpc_code: Option<String>,

    /// Gross weight in kilograms.
    #[serde(default)]
    pub gross_weight: Option<String>,

    /// Net weight in kilograms.
    #[serde(default)]
    pub net_weight: Option<String>,

    /// Net content with unit, e.g. "500 ml".
    #[serde(default)]
    pub net_content: Option<String>,

    /// Country of origin, ISO 3166 numeric.
    #[serde(default)]
    pub origin: Option<String>,
}

impl RegistrationRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_gtin(mut self, gtin: impl Into<String>) -> Self {
        self.gtin = Some(gtin.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn with_ncm(mut self, ncm: impl Into<String>) -> Self {
        self.ncm = Some(ncm.into());
        self
    }

    pub fn with_cest(mut self, cest: impl Into<String>) -> Self {
        self.cest = Some(cest.into());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_gpc_code(mut self, code: impl Into<String>) -> Self {
        self.gpc_code = Some(code.into());
        self
    }

    pub fn with_weights(mut self, gross: Option<String>, net: Option<String>) -> Self {
        self.gross_weight = gross;
        self.net_weight = net;
        self
    }

    pub fn with_net_content(mut self, content: impl Into<String>) -> Self {
        self.net_content = Some(content.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Brand to send: explicit brand, else SKU, else description.
    pub fn brand_or_fallback(&self) -> &str {
        non_blank(self.brand.as_deref())
            .or_else(|| non_blank(self.sku.as_deref()))
            .unwrap_or(&self.description)
    }

    /// Non-blank identifier input, if any.
    pub fn supplied_gtin(&self) -> Option<&str> {
        non_blank(self.gtin.as_deref())
    }
}

/// `Some(s)` when `s` has non-whitespace content.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Normalized result of a registration call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    pub success: bool,

    /// Assigned or confirmed identifier, when the response carries one.
    pub gtin: Option<String>,

    /// Registry status token (e.g. "ACTIVE").
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Parsed registry response.
    #[serde(default)]
    pub raw: serde_json::Value,
}

/// Which endpoint answered a verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifySource {
    /// Account-scoped product lookup.
    Own,
    /// Public registry lookup.
    Registry,
}

impl std::fmt::Display for VerifySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Own => "own",
            Self::Registry => "registry",
        })
    }
}

/// Result of a verification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verification {
    pub found: bool,
    pub source: VerifySource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<serde_json::Value>,
}

impl Verification {
    pub fn found(source: VerifySource, product: serde_json::Value) -> Self {
        Self {
            found: true,
            source,
            product: Some(product),
        }
    }

    pub fn not_found(source: VerifySource) -> Self {
        Self {
            found: false,
            source,
            product: None,
        }
    }
}

/// Which registry integration a deployment uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// OAuth password grant with a form body, Bearer auth on the v1 API.
    #[serde(rename = "oauth")]
    OAuth,
    /// Basic-auth token exchange, sidecar headers on the v2 API.
    #[default]
    Basic,
    /// Relay through a third-party script endpoint guarded by a shared secret.
    Relay,
}

impl std::str::FromStr for Variant {
    type Err = Gs1Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oauth" | "password" => Ok(Self::OAuth),
            "basic" | "" => Ok(Self::Basic),
            "relay" => Ok(Self::Relay),
            other => Err(Gs1Error::Config {
                message: format!("unknown GS1 variant: {other} (expected oauth, basic or relay)"),
            }),
        }
    }
}

/// GS1 client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gs1Config {
    #[serde(default)]
    pub variant: Variant,

    /// Registry host.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// Service account login.
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Company prefix registration number (CAD).
    #[serde(default)]
    pub company_cad: Option<String>,

    /// Base URL of the public lookup used when the account lookup misses.
    #[serde(default)]
    pub verified_url: Option<String>,

    #[serde(default)]
    pub relay_url: Option<String>,

    #[serde(default)]
    pub relay_secret: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Seconds subtracted from the provider TTL before a token counts as expired.
    #[serde(default = "default_token_margin")]
    pub token_margin_secs: u64,
}

fn default_base_url() -> String {
    "https://api.gs1br.org".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_token_margin() -> u64 {
    60
}

impl Default for Gs1Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            base_url: default_base_url(),
            client_id: String::new(),
            client_secret: String::new(),
            username: String::new(),
            password: String::new(),
            company_cad: None,
            verified_url: None,
            relay_url: None,
            relay_secret: None,
            timeout_secs: default_timeout(),
            token_margin_secs: default_token_margin(),
        }
    }
}

impl Gs1Config {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `GS1_VARIANT` | `oauth`, `basic` (default) or `relay` |
    /// | `GS1_BASE_URL` | Registry host |
    /// | `GS1_CLIENT_ID` / `GS1_CLIENT_SECRET` | Service client credentials |
    /// | `GS1_USERNAME` / `GS1_PASSWORD` | Service account |
    /// | `GS1_CAD` | Company identifier |
    /// | `GS1_VERIFIED_URL` | Public lookup base URL |
    /// | `GS1_RELAY_URL` / `GS1_RELAY_SECRET` | Relay endpoint and shared secret |
    /// | `GS1_TIMEOUT` | Request timeout in seconds (default: 30) |
    /// | `GS1_TOKEN_MARGIN` | Token safety margin in seconds (default: 60) |
    pub fn from_env() -> Gs1Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let variant = match var("GS1_VARIANT") {
            Some(v) => v.parse()?,
            None => Variant::default(),
        };

        Ok(Self {
            variant,
            base_url: var("GS1_BASE_URL").unwrap_or_else(default_base_url),
            client_id: var("GS1_CLIENT_ID").unwrap_or_default(),
            client_secret: var("GS1_CLIENT_SECRET").unwrap_or_default(),
            username: var("GS1_USERNAME").unwrap_or_default(),
            password: var("GS1_PASSWORD").unwrap_or_default(),
            company_cad: var("GS1_CAD"),
            verified_url: var("GS1_VERIFIED_URL"),
            relay_url: var("GS1_RELAY_URL"),
            relay_secret: var("GS1_RELAY_SECRET"),
            timeout_secs: var("GS1_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_timeout),
            token_margin_secs: var("GS1_TOKEN_MARGIN")
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_token_margin),
        })
    }

    /// Check that every setting the selected variant needs is present.
    pub fn validate(&self) -> Gs1Result<()> {
        let mut missing = Vec::new();
        match self.variant {
            Variant::OAuth | Variant::Basic => {
                for (name, value) in [
                    ("GS1_CLIENT_ID", &self.client_id),
                    ("GS1_CLIENT_SECRET", &self.client_secret),
                    ("GS1_USERNAME", &self.username),
                    ("GS1_PASSWORD", &self.password),
                ] {
                    if value.trim().is_empty() {
                        missing.push(name);
                    }
                }
            }
            Variant::Relay => {
                if non_blank(self.relay_url.as_deref()).is_none() {
                    missing.push("GS1_RELAY_URL");
                }
                if non_blank(self.relay_secret.as_deref()).is_none() {
                    missing.push("GS1_RELAY_SECRET");
                }
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Gs1Error::Config {
                message: format!("GS1 credentials not configured: {}", missing.join(", ")),
            })
        }
    }

    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_client(mut self, id: impl Into<String>, secret: impl Into<String>) -> Self {
        self.client_id = id.into();
        self.client_secret = secret.into();
        self
    }

    pub fn with_account(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_company_cad(mut self, cad: impl Into<String>) -> Self {
        self.company_cad = Some(cad.into());
        self
    }

    pub fn with_verified_url(mut self, url: impl Into<String>) -> Self {
        self.verified_url = Some(url.into());
        self
    }

    pub fn with_relay(mut self, url: impl Into<String>, secret: impl Into<String>) -> Self {
        self.relay_url = Some(url.into());
        self.relay_secret = Some(secret.into());
        self
    }

    pub fn with_token_margin(mut self, secs: u64) -> Self {
        self.token_margin_secs = secs;
        self
    }

    /// Base URL without a trailing slash.
    pub(crate) fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
