//! Domain records and run reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user as enumerated by the store — just the ID, everything else is
/// fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub user_id: String,
}

/// A still-locked vault, as returned by the store's locked-vaults query.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultRecord {
    pub vault_id: String,
    /// Human-readable label shown in notifications.
    pub vaultname: String,
    /// Scheduled unlock instant. Vaults without one are never eligible.
    pub unlock_time: Option<DateTime<Utc>>,
    /// Destination address for the unlock email.
    pub email_recipient: String,
}

/// A fully composed unlock email, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Display name + address, e.g. `"Time Vault" <vault@example.com>`.
    pub from: String,
    pub reply_to: String,
    pub to: String,
    pub subject: String,
    /// Stable per-vault Message-ID so downstream dedup works across runs.
    pub message_id: String,
    pub text: String,
    pub html: String,
}

/// Data-only push payload. Field names match what the mobile client reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushData {
    pub vaultname: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "notificationId")]
    pub notification_id: String,
}

/// A push message addressed to one device token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub token: String,
    pub data: PushData,
}

/// Outcome of one notification channel for one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChannelOutcome {
    Sent,
    /// Expected no-op (e.g. user has no push token). Not a failure.
    Skipped,
    Failed(String),
}

impl ChannelOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ChannelOutcome::Failed(_))
    }
}

/// Per-vault notification result. Both channels are always attempted
/// independently; neither outcome affects the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotifyReport {
    pub email: ChannelOutcome,
    pub push: ChannelOutcome,
}

/// A recoverable failure recorded during a sweep, with the IDs that were
/// being processed when it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepError {
    pub user_id: String,
    pub vault_id: Option<String>,
    pub detail: String,
}

/// Summary of one full sweep, for operational logging.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub users_scanned: usize,
    /// Locked vaults evaluated against the eligibility rule.
    pub vaults_inspected: usize,
    /// Vaults whose unlock transition committed this run.
    pub vaults_unlocked: usize,
    pub errors: Vec<SweepError>,
}

impl SweepReport {
    pub fn record_error(&mut self, user_id: &str, vault_id: Option<&str>, detail: impl Into<String>) {
        self.errors.push(SweepError {
            user_id: user_id.to_string(),
            vault_id: vault_id.map(String::from),
            detail: detail.into(),
        });
    }
}
