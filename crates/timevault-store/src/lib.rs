//! # TimeVault Store
//!
//! Firestore-backed implementation of the `VaultStore` contract. Talks to
//! the Firestore REST API directly (no SDK): users live at `USERS/{uid}`,
//! vaults at `USERS/{uid}/Vaults/{vid}`.

pub mod firestore;

pub use firestore::FirestoreVaultStore;
