//! FCM push transport — HTTP v1 `messages:send` with a service-account
//! bearer token.
//!
//! Payloads are data-only: the mobile client builds the visible
//! notification itself from the `data` map.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use timevault_core::{PushMessage, PushTransport, Result, TimeVaultError};
use timevault_google::{SCOPE_MESSAGING, TokenProvider};

/// FCM-backed `PushTransport`.
pub struct FcmPushTransport {
    auth: Arc<TokenProvider>,
    client: reqwest::Client,
    endpoint: String,
}

impl FcmPushTransport {
    pub fn new(auth: Arc<TokenProvider>) -> Self {
        let endpoint = format!(
            "https://fcm.googleapis.com/v1/projects/{}/messages:send",
            auth.project_id()
        );
        Self {
            auth,
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl PushTransport for FcmPushTransport {
    async fn send(&self, message: &PushMessage) -> Result<()> {
        let token = self.auth.token(SCOPE_MESSAGING).await?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&fcm_payload(message))
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| TimeVaultError::Push(format!("FCM send failed: {e}")))?;

        if response.status().is_success() {
            tracing::info!("📲 Push sent ({})", message.data.notification_id);
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(TimeVaultError::Push(format!("FCM error {status}: {body}")))
        }
    }
}

fn fcm_payload(message: &PushMessage) -> Value {
    json!({
        "message": {
            "token": message.token,
            "data": message.data,
        }
    })
}
