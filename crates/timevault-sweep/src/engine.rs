//! Sweep engine — one pass over every user's locked vaults.
//!
//! Eligibility is boundary-inclusive (`unlockTime <= now`) against a single
//! `now` snapshot taken at run start. The unlock write commits before the
//! dispatcher runs; dispatcher failures are folded into the report, never
//! propagated.

use std::sync::Arc;

use timevault_core::{ChannelOutcome, Clock, Result, SweepReport, VaultStore};

use crate::dispatch::NotificationDispatcher;

/// Orchestrates one sweep: traversal, eligibility, transition, dispatch.
pub struct SweepEngine {
    store: Arc<dyn VaultStore>,
    dispatcher: NotificationDispatcher,
    clock: Arc<dyn Clock>,
}

impl SweepEngine {
    pub fn new(
        store: Arc<dyn VaultStore>,
        dispatcher: NotificationDispatcher,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            clock,
        }
    }

    /// Run one sweep. Only a failure to enumerate users is fatal; every
    /// other error is recorded in the report and the run continues.
    pub async fn run_sweep(&self) -> Result<SweepReport> {
        let now = self.clock.now();
        let mut report = SweepReport::default();

        let users = self.store.list_users().await?;
        tracing::info!("🧪 Sweep started: {} user(s), now = {now}", users.len());

        for user in &users {
            let user_id = &user.user_id;
            report.users_scanned += 1;

            let vaults = match self.store.list_locked_vaults(user_id).await {
                Ok(vaults) => vaults,
                Err(e) => {
                    tracing::warn!("❌ Failed to list vaults for user {user_id}: {e}");
                    report.record_error(user_id, None, e.to_string());
                    continue;
                }
            };

            tracing::info!("🔐 User {user_id} has {} locked vault(s)", vaults.len());

            for vault in &vaults {
                let vault_id = vault.vault_id.as_str();
                report.vaults_inspected += 1;

                tracing::debug!(
                    "🔍 Checking vault {vault_id} for user {user_id} (unlockTime: {:?})",
                    vault.unlock_time
                );

                // Eligible iff an unlock time exists and has arrived;
                // equality counts.
                let Some(unlock_time) = vault.unlock_time else {
                    continue;
                };
                if unlock_time > now {
                    continue;
                }

                tracing::info!("⏰ Vault {vault_id} is due (unlockTime {unlock_time})");

                // Transition first: a crash after this write leaves the
                // vault unlocked but unnotified, never double-unlocked.
                if let Err(e) = self.store.mark_unlocked(user_id, vault_id).await {
                    tracing::error!(
                        "❌ Failed to unlock vault {vault_id} for user {user_id}: {e}"
                    );
                    report.record_error(user_id, Some(vault_id), e.to_string());
                    continue;
                }
                report.vaults_unlocked += 1;

                let notify = self.dispatcher.notify(user_id, vault).await;
                if let ChannelOutcome::Failed(detail) = &notify.email {
                    report.record_error(user_id, Some(vault_id), format!("email: {detail}"));
                }
                if let ChannelOutcome::Failed(detail) = &notify.push {
                    report.record_error(user_id, Some(vault_id), format!("push: {detail}"));
                }
            }
        }

        tracing::info!(
            "✅ Sweep complete: {} user(s), {} vault(s) inspected, {} unlocked, {} error(s)",
            report.users_scanned,
            report.vaults_inspected,
            report.vaults_unlocked,
            report.errors.len()
        );

        Ok(report)
    }
}
