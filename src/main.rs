//! # TimeVault Sweeper
//!
//! Scheduled unlock sweep: scans every user's locked vaults in Firestore,
//! transitions the ones whose unlock time has arrived, and notifies the
//! owner by email and push. One run per invocation — an external scheduler
//! (cron, systemd timer) decides cadence, and must not run two sweeps
//! against the same store concurrently.
//!
//! No CLI arguments. Configuration lives at `~/.timevault/config.toml`;
//! `TIMEVAULT_EMAIL_PASSWORD` and `TIMEVAULT_SERVICE_ACCOUNT` override the
//! secrets, `RUST_LOG` controls verbosity.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use timevault_channels::{FcmPushTransport, SmtpEmailTransport};
use timevault_core::{SystemClock, TimeVaultConfig};
use timevault_google::{ServiceAccountKey, TokenProvider};
use timevault_store::FirestoreVaultStore;
use timevault_sweep::{NotificationDispatcher, SweepEngine};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = TimeVaultConfig::load().context("Failed to load config")?;
    config.validate().context("Invalid config")?;

    let key = ServiceAccountKey::from_file(Path::new(&config.store.credentials_path))
        .context("Failed to load service account")?;
    tracing::info!("🔐 Using Firebase project ID: {}", key.project_id);

    let auth = Arc::new(TokenProvider::new(key).context("Failed to build token provider")?);
    let store = Arc::new(FirestoreVaultStore::new(auth.clone()));
    let email = Arc::new(SmtpEmailTransport::new(&config.email).context("Failed to build SMTP transport")?);
    let push = Arc::new(FcmPushTransport::new(auth));
    let clock = Arc::new(SystemClock);

    let dispatcher =
        NotificationDispatcher::new(store.clone(), email, push, clock.clone(), &config);
    let engine = SweepEngine::new(store, dispatcher, clock);

    let report = engine.run_sweep().await.context("Sweep failed")?;
    tracing::info!(
        "✅ Vault check complete: {} unlocked across {} user(s), {} error(s)",
        report.vaults_unlocked,
        report.users_scanned,
        report.errors.len()
    );

    Ok(())
}
