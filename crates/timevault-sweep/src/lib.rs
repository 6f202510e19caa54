//! # TimeVault Sweep
//!
//! The reconciliation core: one `run_sweep()` pass walks every user's
//! still-locked vaults, transitions the ones whose unlock time has arrived,
//! and hands each transition to the notification dispatcher.
//!
//! ## Guarantees
//! - One `now` snapshot per run — eligibility is temporally consistent.
//! - The unlock write commits *before* any notification is attempted; a
//!   crash in between leaves the vault unlocked but unnotified, never the
//!   reverse.
//! - Fault isolation at vault granularity: a failing vault or user is
//!   logged, recorded in the `SweepReport`, and skipped — it never aborts
//!   the run. The only fatal error is failing to enumerate users at all.
//! - No internal locking: exactly one sweep may run against a store at a
//!   time; concurrent runs must be serialized by the external scheduler.

pub mod dispatch;
pub mod engine;

#[cfg(test)]
pub(crate) mod testing;

pub use dispatch::NotificationDispatcher;
pub use engine::SweepEngine;
