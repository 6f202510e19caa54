//! # TimeVault Core
//!
//! Shared foundation for the unlock sweeper: the error type, the config
//! system, the domain records, and the adapter traits every other crate
//! implements or consumes.
//!
//! The sweep engine never talks to Firestore, SMTP, or FCM directly — it
//! only sees the `VaultStore`, `EmailTransport`, and `PushTransport` traits
//! defined here, so the whole pipeline runs against in-memory fakes in tests.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::TimeVaultConfig;
pub use error::{Result, TimeVaultError};
pub use traits::{Clock, EmailTransport, PushTransport, SystemClock, VaultStore};
pub use types::{
    ChannelOutcome, EmailMessage, NotifyReport, PushData, PushMessage, SweepError, SweepReport,
    UserRef, VaultRecord,
};
