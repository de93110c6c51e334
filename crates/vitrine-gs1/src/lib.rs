//! GTIN checksum engine and GS1 Brasil registration client.
//!
//! This crate provides:
//!
//! - Check digit validation and completion for GTIN-8/12/13/14
//! - A registration client with interchangeable registry strategies
//! - Access-token caching with a safety margin
//! - Table-driven extraction of identifiers from registry responses
//!
//! # Quick Start
//!
//! ```no_run
//! use vitrine_gs1::{RegistrationClient, RegistrationRequest};
//!
//! # async fn example() -> Result<(), vitrine_gs1::Gs1Error> {
//! let client = RegistrationClient::from_env()?;
//!
//! let request = RegistrationRequest::new("Caneca Cerâmica 350ml")
//!     .with_sku("CAN-350")
//!     .with_ncm("6912.00.00");
//! let outcome = client.register(&request).await?;
//! println!("assigned: {:?}", outcome.gtin);
//! # Ok(())
//! # }
//! ```
//!
//! The checksum engine needs no client:
//!
//! ```
//! let result = vitrine_gs1::checksum::validate("7891234567895");
//! assert!(result.valid);
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `GS1_VARIANT` | `oauth`, `basic` (default) or `relay` |
//! | `GS1_BASE_URL` | Registry host (default: `https://api.gs1br.org`) |
//! | `GS1_CLIENT_ID` / `GS1_CLIENT_SECRET` | Service client credentials |
//! | `GS1_USERNAME` / `GS1_PASSWORD` | Service account |
//! | `GS1_CAD` | Company identifier sent with registrations |
//! | `GS1_VERIFIED_URL` | Public lookup used when the account lookup misses |
//! | `GS1_RELAY_URL` / `GS1_RELAY_SECRET` | Relay endpoint and shared secret |
//! | `GS1_TIMEOUT` | Request timeout in seconds (default: 30) |
//! | `GS1_TOKEN_MARGIN` | Token safety margin in seconds (default: 60) |

pub mod auth;
pub mod checksum;
pub mod client;
pub mod error;
pub mod extract;
pub mod payload;
pub mod strategy;
pub mod transport;
pub mod types;

// Re-export main types
pub use auth::{AccessToken, Clock, ManualClock, SystemClock, TokenCache, TokenState};
pub use checksum::{ChecksumReason, ChecksumResult};
pub use client::RegistrationClient;
pub use error::{ErrorKind, Gs1Error, Gs1Result};
pub use strategy::{BasicAuthExchange, OAuthPasswordGrant, Relay, Strategy};
pub use transport::{HttpReply, HttpRequest, HttpTransport, ReqwestTransport, GS1_USER_AGENT};
pub use types::{
    Gs1Config, Gtin, RegistrationOutcome, RegistrationRequest, Variant, Verification,
    VerifySource,
};
