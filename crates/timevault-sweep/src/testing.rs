//! In-memory fakes behind the core traits, shared by the engine and
//! dispatcher tests. The store, email, and push fakes can share one
//! operation log so tests can assert cross-component ordering.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use timevault_core::{
    Clock, EmailMessage, EmailTransport, PushMessage, PushTransport, Result, TimeVaultConfig,
    TimeVaultError, UserRef, VaultRecord, VaultStore,
};

/// Config fixture matching the fixtures' sender and link expectations.
pub fn test_config() -> TimeVaultConfig {
    let mut config = TimeVaultConfig::default();
    config.store.project_id = "timevault-test".into();
    config.email.address = "vault@example.com".into();
    config
}

/// Vault fixture: named "Letters", addressed to a@x.com, locked until the
/// given instant.
pub fn vault(vault_id: &str, unlock_time: &str) -> VaultRecord {
    VaultRecord {
        vault_id: vault_id.into(),
        vaultname: "Letters".into(),
        unlock_time: Some(parse_instant(unlock_time)),
        email_recipient: "a@x.com".into(),
    }
}

fn parse_instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn at(instant: &str) -> Self {
        Self(parse_instant(instant))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

struct StoredVault {
    record: VaultRecord,
    unlocked: bool,
    status: String,
}

/// In-memory `VaultStore` with switchable per-operation failures.
pub struct FakeStore {
    vaults: Mutex<HashMap<String, Vec<StoredVault>>>,
    tokens: HashMap<String, String>,
    fail_user_list: bool,
    fail_vault_list_for: Option<String>,
    fail_mark_for: Option<(String, String)>,
    fail_token_for: Option<String>,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            vaults: Mutex::new(HashMap::new()),
            tokens: HashMap::new(),
            fail_user_list: false,
            fail_vault_list_for: None,
            fail_mark_for: None,
            fail_token_for: None,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_vault(self, user_id: &str, record: VaultRecord) -> Self {
        self.vaults
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(StoredVault {
                record,
                unlocked: false,
                status: "Locked".into(),
            });
        self
    }

    pub fn with_token(mut self, user_id: &str, token: &str) -> Self {
        self.tokens.insert(user_id.into(), token.into());
        self
    }

    pub fn failing_user_list(mut self) -> Self {
        self.fail_user_list = true;
        self
    }

    pub fn failing_vault_list(mut self, user_id: &str) -> Self {
        self.fail_vault_list_for = Some(user_id.into());
        // The user must still exist so enumeration reaches it.
        self.vaults.lock().unwrap().entry(user_id.into()).or_default();
        self
    }

    pub fn failing_mark(mut self, user_id: &str, vault_id: &str) -> Self {
        self.fail_mark_for = Some((user_id.into(), vault_id.into()));
        self
    }

    pub fn failing_token_lookup(mut self, user_id: &str) -> Self {
        self.fail_token_for = Some(user_id.into());
        self
    }

    pub fn is_unlocked(&self, user_id: &str, vault_id: &str) -> bool {
        self.find(user_id, vault_id, |v| v.unlocked).unwrap_or(false)
    }

    pub fn status(&self, user_id: &str, vault_id: &str) -> Option<String> {
        self.find(user_id, vault_id, |v| v.status.clone())
    }

    fn find<T>(&self, user_id: &str, vault_id: &str, f: impl Fn(&StoredVault) -> T) -> Option<T> {
        self.vaults
            .lock()
            .unwrap()
            .get(user_id)?
            .iter()
            .find(|v| v.record.vault_id == vault_id)
            .map(f)
    }
}

#[async_trait]
impl VaultStore for FakeStore {
    async fn list_users(&self) -> Result<Vec<UserRef>> {
        if self.fail_user_list {
            return Err(TimeVaultError::Store("user enumeration failed".into()));
        }
        let mut user_ids: Vec<String> = self.vaults.lock().unwrap().keys().cloned().collect();
        user_ids.sort();
        Ok(user_ids.into_iter().map(|user_id| UserRef { user_id }).collect())
    }

    async fn list_locked_vaults(&self, user_id: &str) -> Result<Vec<VaultRecord>> {
        if self.fail_vault_list_for.as_deref() == Some(user_id) {
            return Err(TimeVaultError::Store(format!(
                "vault query failed for {user_id}"
            )));
        }
        Ok(self
            .vaults
            .lock()
            .unwrap()
            .get(user_id)
            .map(|vaults| {
                vaults
                    .iter()
                    .filter(|v| !v.unlocked)
                    .map(|v| v.record.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn mark_unlocked(&self, user_id: &str, vault_id: &str) -> Result<()> {
        if self.fail_mark_for == Some((user_id.to_string(), vault_id.to_string())) {
            return Err(TimeVaultError::Store(format!(
                "update failed for {user_id}/{vault_id}"
            )));
        }
        let mut vaults = self.vaults.lock().unwrap();
        let vault = vaults
            .get_mut(user_id)
            .and_then(|vs| vs.iter_mut().find(|v| v.record.vault_id == vault_id))
            .ok_or_else(|| TimeVaultError::Store(format!("no such vault {vault_id}")))?;
        vault.unlocked = true;
        vault.status = "Unlocked".into();
        self.log.lock().unwrap().push(format!("mark:{user_id}/{vault_id}"));
        Ok(())
    }

    async fn user_push_token(&self, user_id: &str) -> Result<Option<String>> {
        if self.fail_token_for.as_deref() == Some(user_id) {
            return Err(TimeVaultError::Store(format!(
                "token read failed for {user_id}"
            )));
        }
        Ok(self.tokens.get(user_id).cloned())
    }
}

/// Recording `EmailTransport`, optionally failing every send.
pub struct FakeEmail {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakeEmail {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn sharing_log(mut self, log: &Arc<Mutex<Vec<String>>>) -> Self {
        self.log = log.clone();
        self
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailTransport for FakeEmail {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        if self.fail {
            return Err(TimeVaultError::Email("smtp refused".into()));
        }
        self.log.lock().unwrap().push(format!("email:{}", message.to));
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Recording `PushTransport`, optionally failing every send.
pub struct FakePush {
    sent: Mutex<Vec<PushMessage>>,
    fail: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl FakePush {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: false,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[allow(dead_code)]
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn sharing_log(mut self, log: &Arc<Mutex<Vec<String>>>) -> Self {
        self.log = log.clone();
        self
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for FakePush {
    async fn send(&self, message: &PushMessage) -> Result<()> {
        if self.fail {
            return Err(TimeVaultError::Push("fcm refused".into()));
        }
        self.log.lock().unwrap().push(format!("push:{}", message.token));
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
