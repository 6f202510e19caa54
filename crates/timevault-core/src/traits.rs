//! Adapter contracts between the sweep engine and the outside world.
//!
//! Implementations live in `timevault-store` (Firestore) and
//! `timevault-channels` (SMTP, FCM); tests implement these with in-memory
//! fakes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::{EmailMessage, PushMessage, UserRef, VaultRecord};

/// Narrow view of the persistent store: exactly the four operations the
/// sweep needs, nothing else.
#[async_trait]
pub trait VaultStore: Send + Sync {
    /// Enumerate all users. The one call whose failure aborts a sweep.
    async fn list_users(&self) -> Result<Vec<UserRef>>;

    /// The user's vaults with `unlocked == false`, filtered store-side so
    /// settled vaults never travel over the wire again.
    async fn list_locked_vaults(&self, user_id: &str) -> Result<Vec<VaultRecord>>;

    /// Partial update setting `unlocked = true, status = "Unlocked"` in one
    /// atomic write. Never called twice for the same vault within a run.
    async fn mark_unlocked(&self, user_id: &str, vault_id: &str) -> Result<()>;

    /// The user's push token, or `None` if the user never registered one.
    async fn user_push_token(&self, user_id: &str) -> Result<Option<String>>;
}

/// Outbound email, one attempt per call.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Outbound push, one attempt per call.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn send(&self, message: &PushMessage) -> Result<()>;
}

/// Time source. The engine snapshots `now()` once per run so every
/// eligibility comparison in a sweep sees the same instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used by the binary.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
