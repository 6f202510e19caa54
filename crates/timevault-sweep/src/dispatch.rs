//! Notification dispatch — composes and sends the unlock email and push.
//!
//! `notify` never returns an error: each channel's outcome is caught,
//! logged, and reported individually, and neither channel's failure stops
//! the other. By the time this runs the unlock is already committed, so
//! nothing here can roll it back.

use std::sync::Arc;

use timevault_core::{
    ChannelOutcome, Clock, EmailMessage, EmailTransport, NotifyReport, PushData, PushMessage,
    PushTransport, TimeVaultConfig, VaultRecord, VaultStore,
};

/// Composes unlock notifications and delivers them over the two channels.
pub struct NotificationDispatcher {
    store: Arc<dyn VaultStore>,
    email: Arc<dyn EmailTransport>,
    push: Arc<dyn PushTransport>,
    clock: Arc<dyn Clock>,
    sender_name: String,
    sender_address: String,
    vault_web_base: String,
    push_enabled: bool,
}

impl NotificationDispatcher {
    pub fn new(
        store: Arc<dyn VaultStore>,
        email: Arc<dyn EmailTransport>,
        push: Arc<dyn PushTransport>,
        clock: Arc<dyn Clock>,
        config: &TimeVaultConfig,
    ) -> Self {
        Self {
            store,
            email,
            push,
            clock,
            sender_name: config.email.display_name.clone(),
            sender_address: config.email.address.clone(),
            vault_web_base: config.links.vault_web_base.clone(),
            push_enabled: config.push.enabled,
        }
    }

    /// Deliver both unlock notifications for a just-transitioned vault.
    pub async fn notify(&self, user_id: &str, vault: &VaultRecord) -> NotifyReport {
        let email = self.send_email(user_id, vault).await;
        let push = self.send_push(user_id, vault).await;
        NotifyReport { email, push }
    }

    async fn send_email(&self, user_id: &str, vault: &VaultRecord) -> ChannelOutcome {
        let message = self.compose_email(user_id, vault);
        match self.email.send(&message).await {
            Ok(()) => {
                tracing::info!(
                    "✅ Vault {} unlocked and email sent to {}",
                    vault.vault_id,
                    message.to
                );
                ChannelOutcome::Sent
            }
            Err(e) => {
                tracing::warn!("❌ Email error for vault {}: {e}", vault.vault_id);
                ChannelOutcome::Failed(e.to_string())
            }
        }
    }

    async fn send_push(&self, user_id: &str, vault: &VaultRecord) -> ChannelOutcome {
        if !self.push_enabled {
            return ChannelOutcome::Skipped;
        }

        let token = match self.store.user_push_token(user_id).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                // Expected, common state — not an error.
                tracing::info!("🚫 No push token for user {user_id}");
                return ChannelOutcome::Skipped;
            }
            Err(e) => {
                tracing::warn!("❌ Token lookup failed for user {user_id}: {e}");
                return ChannelOutcome::Failed(e.to_string());
            }
        };

        let message = self.compose_push(user_id, vault, token);
        match self.push.send(&message).await {
            Ok(()) => {
                tracing::info!("📲 Push sent to {user_id}");
                ChannelOutcome::Sent
            }
            Err(e) => {
                tracing::warn!("❌ Push error for user {user_id}: {e}");
                ChannelOutcome::Failed(e.to_string())
            }
        }
    }

    fn compose_email(&self, user_id: &str, vault: &VaultRecord) -> EmailMessage {
        let vault_id = &vault.vault_id;
        let link = format!(
            "{}?userId={user_id}&vaultId={vault_id}",
            self.vault_web_base
        );

        EmailMessage {
            from: format!("\"{}\" <{}>", self.sender_name, self.sender_address),
            reply_to: self.sender_address.clone(),
            to: vault.email_recipient.clone(),
            subject: "Your Vault is Unlocked!".into(),
            // Deterministic per vault, so transport-level dedup can catch
            // a re-send of the same unlock.
            message_id: format!("<vault-{vault_id}@timevault.local>"),
            text: format!(
                "Hi There,\nYour vault {vault_id} has just been unlocked.\n\n\
                 Open Vault: {link}\n\nThank you for using TimeVault!"
            ),
            html: format!(
                "<p>Hi There,</p>\
                 <p>Your vault <strong>{vault_id}</strong> has just been unlocked.</p>\
                 <p><a href=\"{link}\" style=\"color: #1a73e8; text-decoration: underline;\">\
                 🔓 Open Vault in App</a></p>\
                 <p>If the link doesn't work, open the TimeVault app manually.</p>\
                 <p><em>Thank you for using TimeVault!</em></p>"
            ),
        }
    }

    fn compose_push(&self, user_id: &str, vault: &VaultRecord, token: String) -> PushMessage {
        // Timestamped so repeated payloads stay distinguishable even for
        // the same user/vault pair.
        let notification_id = format!(
            "{user_id}_{}_{}",
            vault.vault_id,
            self.clock.now().timestamp_millis()
        );

        PushMessage {
            token,
            data: PushData {
                vaultname: vault.vaultname.clone(),
                title: "Vault Unlocked!!".into(),
                body: format!("Your Vault {} is now unlocked.", vault.vaultname),
                notification_id,
            },
        }
    }
}
