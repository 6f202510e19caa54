//! # TimeVault Channels
//!
//! The two outbound notification transports: SMTP email (lettre) and FCM
//! push (HTTP v1). Both implement the one-attempt `send` contracts from
//! `timevault-core`; retry policy belongs to the caller, not here.

pub mod email;
pub mod push;

pub use email::SmtpEmailTransport;
pub use push::FcmPushTransport;
