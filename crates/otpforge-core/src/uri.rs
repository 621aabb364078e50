//! `otpauth://` provisioning URIs for authenticator apps.
//!
//! Format: `otpauth://<kind>/<label>?secret=<base32>&algorithm=<ALG>&digits=<N>`
//! followed by `&period=<step>` (TOTP) or `&counter=<c>` (HOTP), then
//! `&issuer=<issuer>` when one is configured. Label and issuer are
//! percent-encoded; the secret is always unpadded Base32.

use urlencoding::encode;

use crate::config::TotpConfig;
use crate::error::OtpError;
use crate::secret::Secret;

/// Credential type carried in the URI authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtpKind {
    /// Time-based; emits `period`.
    Totp,
    /// Counter-based; emits the initial `counter`.
    Hotp {
        /// Initial counter value.
        counter: u64,
    },
}

impl OtpKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Totp => "totp",
            Self::Hotp { .. } => "hotp",
        }
    }
}

/// Build a TOTP provisioning URI from `secret` and a resolved `config`.
///
/// # Errors
/// Returns [`OtpError::MissingSecret`] if `secret` is empty and
/// [`OtpError::InvalidStep`] if the step is 0.
pub fn build_uri(secret: &Secret, config: &TotpConfig) -> Result<String, OtpError> {
    build_uri_for(OtpKind::Totp, secret, config)
}

/// Build a provisioning URI of the given kind.
///
/// # Errors
/// Returns [`OtpError::MissingSecret`] if `secret` is empty and
/// [`OtpError::InvalidStep`] for a TOTP URI with a zero step.
pub fn build_uri_for(
    kind: OtpKind,
    secret: &Secret,
    config: &TotpConfig,
) -> Result<String, OtpError> {
    if secret.is_empty() {
        return Err(OtpError::MissingSecret);
    }
    if kind == OtpKind::Totp && config.step == 0 {
        return Err(OtpError::InvalidStep);
    }

    let mut uri = format!(
        "otpauth://{}/{}?secret={}&algorithm={}&digits={}",
        kind.as_str(),
        encode(&config.label),
        secret.to_base32(),
        config.algorithm.uri_name(),
        config.digits.value(),
    );

    match kind {
        OtpKind::Totp => uri.push_str(&format!("&period={}", config.step)),
        OtpKind::Hotp { counter } => uri.push_str(&format!("&counter={counter}")),
    }

    if let Some(issuer) = &config.issuer {
        uri.push_str(&format!("&issuer={}", encode(issuer)));
    }

    Ok(uri)
}
