//! Firestore REST adapter for the vault store.
//!
//! Four operations, matching the `VaultStore` trait exactly:
//! - list `USERS` documents (paginated),
//! - `:runQuery` a user's `Vaults` subcollection with `unlocked == false`
//!   filtered server-side,
//! - `PATCH` one vault with an update mask covering only
//!   `unlocked`/`status`,
//! - masked read of the user document for `fcmToken`.
//!
//! Note: the store schema spells the recipient field `emailrecipent` —
//! existing documents use that name, so the adapter does too.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use timevault_core::{Result, TimeVaultError, UserRef, VaultRecord, VaultStore};
use timevault_google::{SCOPE_DATASTORE, TokenProvider};

const USERS_COLLECTION: &str = "USERS";
const VAULTS_COLLECTION: &str = "Vaults";
const PAGE_SIZE: u32 = 300;

/// Firestore-backed `VaultStore`.
pub struct FirestoreVaultStore {
    auth: Arc<TokenProvider>,
    client: reqwest::Client,
    documents_base: String,
}

impl FirestoreVaultStore {
    pub fn new(auth: Arc<TokenProvider>) -> Self {
        let documents_base = format!(
            "https://firestore.googleapis.com/v1/projects/{}/databases/(default)/documents",
            auth.project_id()
        );
        Self {
            auth,
            client: reqwest::Client::new(),
            documents_base,
        }
    }

    async fn bearer(&self) -> Result<String> {
        self.auth.token(SCOPE_DATASTORE).await
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let token = self.bearer().await?;
        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| TimeVaultError::Store(format!("Firestore GET failed: {e}")))?;
        Self::json_body(response).await
    }

    async fn json_body(response: reqwest::Response) -> Result<Value> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TimeVaultError::Store(format!(
                "Firestore error {status}: {body}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| TimeVaultError::Store(format!("Invalid Firestore response: {e}")))
    }
}

#[async_trait]
impl VaultStore for FirestoreVaultStore {
    async fn list_users(&self) -> Result<Vec<UserRef>> {
        let mut users = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = format!(
                "{}/{USERS_COLLECTION}?pageSize={PAGE_SIZE}",
                self.documents_base
            );
            if let Some(token) = &page_token {
                url.push_str("&pageToken=");
                url.push_str(token);
            }

            let body = self.get_json(&url).await?;
            if let Some(documents) = body["documents"].as_array() {
                for doc in documents {
                    if let Some(name) = doc["name"].as_str() {
                        users.push(UserRef {
                            user_id: document_id(name).to_string(),
                        });
                    }
                }
            }

            match body["nextPageToken"].as_str() {
                Some(next) => page_token = Some(next.to_string()),
                None => break,
            }
        }

        Ok(users)
    }

    async fn list_locked_vaults(&self, user_id: &str) -> Result<Vec<VaultRecord>> {
        let url = format!(
            "{}/{USERS_COLLECTION}/{user_id}:runQuery",
            self.documents_base
        );
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": VAULTS_COLLECTION }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "unlocked" },
                        "op": "EQUAL",
                        "value": { "booleanValue": false }
                    }
                }
            }
        });

        let token = self.bearer().await?;
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&query)
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| TimeVaultError::Store(format!("Firestore query failed: {e}")))?;
        let body = Self::json_body(response).await?;

        // runQuery returns a row per result; rows without a "document" key
        // are read-time markers, not results.
        let mut vaults = Vec::new();
        if let Some(rows) = body.as_array() {
            for row in rows {
                let doc = &row["document"];
                if doc.is_null() {
                    continue;
                }
                match vault_from_document(doc) {
                    Some(vault) => vaults.push(vault),
                    None => {
                        tracing::warn!("⚠️ Skipping malformed vault document for user {user_id}");
                    }
                }
            }
        }

        Ok(vaults)
    }

    async fn mark_unlocked(&self, user_id: &str, vault_id: &str) -> Result<()> {
        let url = format!(
            "{}/{USERS_COLLECTION}/{user_id}/{VAULTS_COLLECTION}/{vault_id}\
             ?updateMask.fieldPaths=unlocked&updateMask.fieldPaths=status",
            self.documents_base
        );

        let token = self.bearer().await?;
        let response = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(&unlock_patch_body())
            .timeout(std::time::Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| TimeVaultError::Store(format!("Firestore update failed: {e}")))?;
        Self::json_body(response).await?;

        Ok(())
    }

    async fn user_push_token(&self, user_id: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/{USERS_COLLECTION}/{user_id}?mask.fieldPaths=fcmToken",
            self.documents_base
        );
        let body = self.get_json(&url).await?;
        Ok(string_field(&body["fields"], "fcmToken").filter(|t| !t.is_empty()))
    }
}

/// Last path segment of a Firestore document name.
fn document_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// The partial update applied on unlock: both fields in one write so
/// `status` can never disagree with `unlocked`.
fn unlock_patch_body() -> Value {
    json!({
        "fields": {
            "unlocked": { "booleanValue": true },
            "status": { "stringValue": "Unlocked" }
        }
    })
}

fn string_field(fields: &Value, name: &str) -> Option<String> {
    fields[name]["stringValue"].as_str().map(String::from)
}

fn timestamp_field(fields: &Value, name: &str) -> Option<DateTime<Utc>> {
    fields[name]["timestampValue"]
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// Map a Firestore vault document to a `VaultRecord`. Only the document
/// name is required; missing fields degrade the same way the store's other
/// clients treat them (absent unlock time means never eligible).
fn vault_from_document(doc: &Value) -> Option<VaultRecord> {
    let name = doc["name"].as_str()?;
    let fields = &doc["fields"];

    Some(VaultRecord {
        vault_id: document_id(name).to_string(),
        vaultname: string_field(fields, "vaultname").unwrap_or_default(),
        unlock_time: timestamp_field(fields, "unlockTime"),
        email_recipient: string_field(fields, "emailrecipent").unwrap_or_default(),
    })
}
