//! Access-token cache for the registry.
//!
//! One live token per cache (single service account). The lifecycle is
//!
//! ```text
//! NoToken --acquire ok--> Valid --now >= expires_at--> Expired --acquire ok--> Valid
//!    ^                                                    |
//!    +------------------- acquire failed ----------------+
//! ```
//!
//! Acquisition runs while the cache mutex is held, so concurrent callers that
//! find the cache empty or expired wait for one exchange instead of issuing
//! their own. Nothing is persisted; a new process starts in `NoToken`.

use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::Gs1Result;

/// TTL assumed when the provider does not send `expires_in`.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;

/// Ceiling for lifetimes and margins taken from the provider or config.
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

fn clamped_seconds(secs: u64) -> Duration {
    Duration::seconds(secs.min(MAX_TOKEN_TTL_SECS) as i64)
}

/// Source of the current instant.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<StdMutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(StdMutex::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Token as issued by a credential exchange.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,

    /// Provider TTL in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Cached bearer credential with an absolute expiry.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    NoToken,
    /// An exchange is in flight.
    Acquiring,
    Valid,
    Expired,
}

/// Process-wide token cache, injected into the client.
#[derive(Debug)]
pub struct TokenCache {
    slot: Mutex<Option<AccessToken>>,
    clock: Arc<dyn Clock>,
    margin: Duration,
}

impl TokenCache {
    pub fn new(margin_secs: u64) -> Self {
        Self::with_clock(margin_secs, Arc::new(SystemClock))
    }

    pub fn with_clock(margin_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: Mutex::new(None),
            clock,
            margin: clamped_seconds(margin_secs),
        }
    }

    /// Return the cached token if still valid, otherwise run `acquire` and
    /// cache its result. A failed acquisition leaves the cache empty.
    pub async fn get_or_acquire<F, Fut>(&self, acquire: F) -> Gs1Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Gs1Result<IssuedToken>>,
    {
        let mut slot = self.slot.lock().await;
        let now = self.clock.now();

        if let Some(cached) = slot.as_ref() {
            if now < cached.expires_at {
                debug!(expires_at = %cached.expires_at, "using cached access token");
                return Ok(cached.value.clone());
            }
            debug!(expires_at = %cached.expires_at, "cached access token expired");
        }

        *slot = None;
        let issued = match acquire().await {
            Ok(issued) => issued,
            Err(e) => {
                warn!(error = %e, "credential exchange failed");
                return Err(e);
            }
        };

        let ttl_secs = issued.expires_in.unwrap_or(DEFAULT_TOKEN_TTL_SECS);
        if ttl_secs > MAX_TOKEN_TTL_SECS {
            warn!(expires_in = ttl_secs, "provider lifetime out of range, clamping");
        }
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(clamped_seconds(ttl_secs) - self.margin)
            .unwrap_or(now);

        info!(
            expires_in = ttl_secs,
            margin_secs = self.margin.num_seconds(),
            "obtained registry access token"
        );

        let value = issued.access_token;
        *slot = Some(AccessToken {
            value: value.clone(),
            expires_at,
        });
        Ok(value)
    }

    /// Drop the cached token so the next call re-acquires.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            debug!("access token invalidated");
        }
    }

    /// Snapshot of the cached token, valid or not.
    pub async fn snapshot(&self) -> Option<AccessToken> {
        self.slot.lock().await.clone()
    }

    /// Current lifecycle state. Reports `Acquiring` while an exchange holds
    /// the cache.
    pub fn state(&self) -> TokenState {
        match self.slot.try_lock() {
            Err(_) => TokenState::Acquiring,
            Ok(slot) => match slot.as_ref() {
                None => TokenState::NoToken,
                Some(t) if self.clock.now() < t.expires_at => TokenState::Valid,
                Some(_) => TokenState::Expired,
            },
        }
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(60)
    }
}
