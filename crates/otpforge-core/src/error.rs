//! Error types for `otpforge-core`.

use thiserror::Error;

/// Errors produced by OTP generation, verification and provisioning.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    /// A required input (secret, token) was missing or empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested secret length was zero.
    #[error("invalid secret length: {0} (must be > 0)")]
    InvalidLength(usize),

    /// Hash algorithm name is not one of SHA1, SHA256, SHA512.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Digit count outside the supported 6..=8 range.
    #[error("invalid digits: {0} (supported: 6, 7, 8)")]
    InvalidDigits(u8),

    /// Provisioning URI requested without a secret.
    #[error("missing secret")]
    MissingSecret,

    /// Time step of zero seconds.
    #[error("invalid step: must be > 0 seconds")]
    InvalidStep,

    /// Verification window wider than [`crate::hotp::MAX_WINDOW`] steps.
    #[error("invalid window: {0} (maximum {max})", max = crate::hotp::MAX_WINDOW)]
    InvalidWindow(u32),

    /// Caller-provided secret text does not decode in the declared encoding.
    #[error("invalid {encoding} secret: {reason}")]
    InvalidEncoding {
        /// Declared encoding of the input.
        encoding: &'static str,
        /// Decoder failure message.
        reason: String,
    },

    /// Configuration file unreadable or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// System clock reported a time before the Unix epoch.
    #[error("clock error: {0}")]
    Clock(String),
}
