//! `otpforge-core` — HOTP/TOTP engine.
//!
//! Secret generation, RFC 4226 HOTP, RFC 6238 TOTP with windowed
//! verification, and `otpauth://` provisioning URIs. No network, no async,
//! no stored state: every operation is a function of its inputs.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod secret;

pub mod hotp;
pub mod totp;

pub mod uri;

pub mod config;
pub mod service;

pub use config::{TotpConfig, TotpOverrides, DEFAULT_LABEL};
pub use error::OtpError;
pub use hotp::{
    generate_hotp, verify_hotp, HmacSigner, OtpAlgorithm, OtpDigits, RingSigner, VerifyOutcome,
    MAX_WINDOW,
};
pub use secret::{Secret, SecretCharset, SecretEncoding, DEFAULT_SECRET_LENGTH};
pub use service::TotpService;
pub use totp::{
    generate_totp, time_step, verify_totp, Clock, FixedClock, SystemClock, TotpParams,
    DEFAULT_STEP, DEFAULT_WINDOW,
};
pub use uri::{build_uri, build_uri_for, OtpKind};
