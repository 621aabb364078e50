//! RFC 4226 HOTP generation and counter-mode verification.
//!
//! The HMAC primitive is reached through [`HmacSigner`]; [`RingSigner`]
//! provides HMAC-SHA1, HMAC-SHA256 and HMAC-SHA512 via `ring::hmac`.

use std::fmt;
use std::str::FromStr;

use ring::hmac;
use serde::{Deserialize, Serialize};

use crate::error::OtpError;

/// Constant-time byte comparison for OTP codes.
///
/// Returns `true` iff both slices have equal length and identical contents.
/// Uses bitwise OR accumulation to avoid short-circuit timing leaks.
///
/// The early return on length mismatch only reveals the digit count, which
/// is public configuration. The constant-time property protects the code value.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

// ── Types ───────────────────────────────────────────────────────────

/// HMAC algorithm used for OTP generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OtpAlgorithm {
    /// HMAC-SHA1 (RFC 4226 baseline).
    #[serde(rename = "sha1", alias = "SHA1")]
    Sha1,
    /// HMAC-SHA256.
    #[serde(rename = "sha256", alias = "SHA256")]
    Sha256,
    /// HMAC-SHA512.
    #[default]
    #[serde(rename = "sha512", alias = "SHA512")]
    Sha512,
}

impl OtpAlgorithm {
    /// Map to the corresponding `ring::hmac::Algorithm`.
    const fn to_ring_algorithm(self) -> hmac::Algorithm {
        match self {
            Self::Sha1 => hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
            Self::Sha256 => hmac::HMAC_SHA256,
            Self::Sha512 => hmac::HMAC_SHA512,
        }
    }

    /// Upper-case name used in the `algorithm` URI parameter.
    #[must_use]
    pub const fn uri_name(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

impl fmt::Display for OtpAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri_name())
    }
}

impl FromStr for OtpAlgorithm {
    type Err = OtpError;

    /// Parse `sha1`, `SHA-256`, `Sha512` and similar spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(OtpError::UnsupportedAlgorithm(s.to_owned())),
        }
    }
}

/// Number of digits in an OTP code (6, 7 or 8).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum OtpDigits {
    /// 6-digit code (standard).
    #[default]
    Six,
    /// 7-digit code.
    Seven,
    /// 8-digit code.
    Eight,
}

impl OtpDigits {
    /// Return the numeric digit count.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }

    /// Return the modulus value (10^digits) for truncation.
    #[must_use]
    const fn modulus(self) -> u32 {
        match self {
            Self::Six => 1_000_000,
            Self::Seven => 10_000_000,
            Self::Eight => 100_000_000,
        }
    }
}

impl TryFrom<u8> for OtpDigits {
    type Error = OtpError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            other => Err(OtpError::InvalidDigits(other)),
        }
    }
}

impl From<OtpDigits> for u8 {
    fn from(digits: OtpDigits) -> Self {
        digits.value()
    }
}

/// Outcome of a windowed verification.
///
/// `delta` is the step (or counter) offset of the first matching candidate,
/// `None` when nothing matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    /// Whether any candidate in the window matched.
    pub matched: bool,
    /// Offset at which the match occurred.
    pub delta: Option<i64>,
}

impl VerifyOutcome {
    /// No candidate matched.
    pub const NO_MATCH: Self = Self {
        matched: false,
        delta: None,
    };

    /// Match at `delta`.
    #[must_use]
    pub const fn at(delta: i64) -> Self {
        Self {
            matched: true,
            delta: Some(delta),
        }
    }

    /// Returns `true` if a candidate matched.
    #[must_use]
    pub const fn is_match(self) -> bool {
        self.matched
    }
}

// ── HMAC seam ───────────────────────────────────────────────────────

/// Keyed-hash primitive used by the OTP engines.
///
/// Implementations must return the full digest for `algorithm`
/// (20, 32 or 64 bytes).
pub trait HmacSigner {
    /// Compute `HMAC(algorithm, key, message)`.
    fn sign(&self, algorithm: OtpAlgorithm, key: &[u8], message: &[u8]) -> Vec<u8>;
}

/// [`HmacSigner`] backed by `ring::hmac`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RingSigner;

impl HmacSigner for RingSigner {
    fn sign(&self, algorithm: OtpAlgorithm, key: &[u8], message: &[u8]) -> Vec<u8> {
        let key = hmac::Key::new(algorithm.to_ring_algorithm(), key);
        hmac::sign(&key, message).as_ref().to_vec()
    }
}

/// Reject absent inputs before any HMAC work is done.
/// Widest accepted verification window, in steps (or counters) per side.
///
/// Verification cost grows as `2 * window + 1` HMACs.
pub const MAX_WINDOW: u32 = 10;

/// Reject windows wider than [`MAX_WINDOW`].
pub(crate) const fn ensure_window(window: u32) -> Result<(), OtpError> {
    if window > MAX_WINDOW {
        return Err(OtpError::InvalidWindow(window));
    }
    Ok(())
}

pub(crate) fn ensure_inputs(secret: &[u8], token: &str) -> Result<(), OtpError> {
    if secret.is_empty() {
        return Err(OtpError::InvalidArgument("secret must not be empty".to_owned()));
    }
    if token.is_empty() {
        return Err(OtpError::InvalidArgument("token must not be empty".to_owned()));
    }
    Ok(())
}

// ── HOTP (RFC 4226) ────────────────────────────────────────────────

/// Dynamic Truncation (RFC 4226 §5.3).
fn dynamic_truncate(digest: &[u8]) -> Option<u32> {
    // offset = low-order 4 bits of last byte.
    let offset = usize::from(digest.last()? & 0x0F);
    let window = digest.get(offset..offset.wrapping_add(4))?;

    // Mask the high bit (0x7FFFFFFF) to get a 31-bit value.
    Some(u32::from_be_bytes([
        window[0] & 0x7F,
        window[1],
        window[2],
        window[3],
    ]))
}

/// Generate an HOTP code per RFC 4226 using [`RingSigner`].
///
/// # Errors
/// Returns [`OtpError::InvalidArgument`] if the secret is empty.
#[must_use = "OTP code should be used or stored"]
pub fn generate_hotp(
    secret: &[u8],
    counter: u64,
    digits: OtpDigits,
    algorithm: OtpAlgorithm,
) -> Result<String, OtpError> {
    generate_hotp_with(&RingSigner, secret, counter, digits, algorithm)
}

/// Generate an HOTP code per RFC 4226 with an explicit HMAC signer.
///
/// # Errors
/// Returns [`OtpError::InvalidArgument`] if the secret is empty or the
/// signer returns a digest too short to truncate.
#[must_use = "OTP code should be used or stored"]
pub fn generate_hotp_with<S: HmacSigner + ?Sized>(
    signer: &S,
    secret: &[u8],
    counter: u64,
    digits: OtpDigits,
    algorithm: OtpAlgorithm,
) -> Result<String, OtpError> {
    if secret.is_empty() {
        return Err(OtpError::InvalidArgument("secret must not be empty".to_owned()));
    }

    // HMAC(K, C) where C is counter as 8-byte big-endian (RFC 4226 §5.2).
    let digest = signer.sign(algorithm, secret, &counter.to_be_bytes());
    let binary_code = dynamic_truncate(&digest).ok_or_else(|| {
        OtpError::InvalidArgument(format!(
            "HMAC digest of {} bytes is too short to truncate",
            digest.len()
        ))
    })?;

    // modulus is always a non-zero power of ten.
    #[allow(clippy::arithmetic_side_effects)]
    let code = binary_code % digits.modulus();
    let width = usize::from(digits.value());

    Ok(format!("{code:0>width$}"))
}

/// Verify an HOTP code against `counter..=counter + window`.
///
/// Returns the forward offset of the first matching counter. Every counter
/// in the window is computed regardless of where the match occurs.
///
/// # Errors
/// Returns [`OtpError::InvalidArgument`] if `secret` or `token` is empty.
#[must_use = "verification result should be checked"]
pub fn verify_hotp(
    secret: &[u8],
    token: &str,
    counter: u64,
    window: u32,
    digits: OtpDigits,
    algorithm: OtpAlgorithm,
) -> Result<VerifyOutcome, OtpError> {
    verify_hotp_with(&RingSigner, secret, token, counter, window, digits, algorithm)
}

/// [`verify_hotp`] with an explicit HMAC signer.
///
/// # Errors
/// Returns [`OtpError::InvalidArgument`] if `secret` or `token` is empty
/// and [`OtpError::InvalidWindow`] if `window` exceeds [`MAX_WINDOW`].
#[must_use = "verification result should be checked"]
pub fn verify_hotp_with<S: HmacSigner + ?Sized>(
    signer: &S,
    secret: &[u8],
    token: &str,
    counter: u64,
    window: u32,
    digits: OtpDigits,
    algorithm: OtpAlgorithm,
) -> Result<VerifyOutcome, OtpError> {
    ensure_inputs(secret, token)?;
    ensure_window(window)?;

    let mut outcome = VerifyOutcome::NO_MATCH;
    for ahead in 0..=window {
        let Some(candidate) = counter.checked_add(u64::from(ahead)) else {
            break;
        };
        let expected = generate_hotp_with(signer, secret, candidate, digits, algorithm)?;
        if constant_time_eq(expected.as_bytes(), token.as_bytes()) && !outcome.matched {
            outcome = VerifyOutcome::at(i64::from(ahead));
        }
    }

    Ok(outcome)
}

// ── Tests ───────────────────────────────────────────────────────────
