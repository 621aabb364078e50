//! RFC 6238 TOTP generation and windowed verification.
//!
//! Time is mapped to an HOTP counter as `floor((time - epoch) / step)`;
//! the counter is then fed to [`crate::hotp`]. Wall-clock time is read
//! through [`Clock`] so callers and tests can pin it.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::OtpError;
use crate::hotp::{
    constant_time_eq, ensure_inputs, ensure_window, generate_hotp_with, HmacSigner, OtpAlgorithm,
    OtpDigits, RingSigner, VerifyOutcome,
};

// ── Constants ───────────────────────────────────────────────────────

/// Default TOTP step in seconds (RFC 6238 §4).
pub const DEFAULT_STEP: u32 = 30;

/// Default verification window (±1 step, RFC 6238 §5.2).
pub const DEFAULT_WINDOW: u32 = 1;

// ── Clock ───────────────────────────────────────────────────────────

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in seconds.
    ///
    /// # Errors
    /// Returns [`OtpError::Clock`] if the time cannot be read.
    fn now(&self) -> Result<u64, OtpError>;
}

/// Reads [`SystemTime::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<u64, OtpError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| OtpError::Clock(e.to_string()))
    }
}

/// Always reports the same instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> Result<u64, OtpError> {
        Ok(self.0)
    }
}

// ── Parameters ──────────────────────────────────────────────────────

/// Fully resolved inputs of the time-to-counter mapping and code derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TotpParams {
    /// HMAC algorithm.
    pub algorithm: OtpAlgorithm,
    /// Code length.
    pub digits: OtpDigits,
    /// Step in seconds. Must be non-zero.
    pub step: u32,
    /// `T0`, the Unix time at which counting starts.
    pub epoch: u64,
}

/// Map a Unix time to an HOTP counter: `floor((time - epoch) / step)`.
///
/// # Errors
/// Returns [`OtpError::InvalidStep`] if `step` is 0, and
/// [`OtpError::InvalidArgument`] if `time` precedes `epoch`.
pub fn time_step(time: u64, epoch: u64, step: u32) -> Result<u64, OtpError> {
    if step == 0 {
        return Err(OtpError::InvalidStep);
    }
    let elapsed = time.checked_sub(epoch).ok_or_else(|| {
        OtpError::InvalidArgument(format!("time {time} precedes epoch {epoch}"))
    })?;

    // step is validated non-zero above.
    #[allow(clippy::arithmetic_side_effects)]
    let counter = elapsed / u64::from(step);
    Ok(counter)
}

// ── TOTP (RFC 6238) ────────────────────────────────────────────────

/// Generate a TOTP code per RFC 6238 with `T0 = 0`.
///
/// # Errors
/// Returns [`OtpError::InvalidStep`] if `step` is 0, or
/// [`OtpError::InvalidArgument`] if the secret is empty.
#[must_use = "OTP code should be used or stored"]
pub fn generate_totp(
    secret: &[u8],
    time: u64,
    digits: OtpDigits,
    step: u32,
    algorithm: OtpAlgorithm,
) -> Result<String, OtpError> {
    let params = TotpParams {
        algorithm,
        digits,
        step,
        epoch: 0,
    };
    generate_totp_with(&RingSigner, secret, time, &params)
}

/// Generate a TOTP code with an explicit signer and parameters.
///
/// # Errors
/// Returns [`OtpError::InvalidArgument`] if the secret is empty or `time`
/// precedes the epoch, and [`OtpError::InvalidStep`] if the step is 0.
#[must_use = "OTP code should be used or stored"]
pub fn generate_totp_with<S: HmacSigner + ?Sized>(
    signer: &S,
    secret: &[u8],
    time: u64,
    params: &TotpParams,
) -> Result<String, OtpError> {
    if secret.is_empty() {
        return Err(OtpError::InvalidArgument("secret must not be empty".to_owned()));
    }
    let counter = time_step(time, params.epoch, params.step)?;
    generate_hotp_with(signer, secret, counter, params.digits, params.algorithm)
}

/// Verify a TOTP code within `±window` steps of `time`, with `T0 = 0`.
///
/// # Errors
/// See [`verify_totp_with`].
#[must_use = "verification result should be checked"]
pub fn verify_totp(
    secret: &[u8],
    token: &str,
    time: u64,
    window: u32,
    digits: OtpDigits,
    step: u32,
    algorithm: OtpAlgorithm,
) -> Result<VerifyOutcome, OtpError> {
    let params = TotpParams {
        algorithm,
        digits,
        step,
        epoch: 0,
    };
    verify_totp_with(&RingSigner, secret, token, time, window, &params)
}

/// Verify a TOTP code within `±window` steps of `time`.
///
/// Candidates are scanned from `-window` to `+window` (oldest to newest)
/// and compared in constant time. The first matching offset is reported as
/// the delta; every candidate is computed regardless of where it matches.
/// Candidate counters below 0 or above `u64::MAX` are skipped.
///
/// # Errors
/// Returns [`OtpError::InvalidArgument`] if `secret` or `token` is empty
/// (before any HMAC is computed) or `time` precedes the epoch,
/// [`OtpError::InvalidWindow`] if `window` exceeds
/// [`crate::hotp::MAX_WINDOW`], and [`OtpError::InvalidStep`] if the step
/// is 0.
#[must_use = "verification result should be checked"]
pub fn verify_totp_with<S: HmacSigner + ?Sized>(
    signer: &S,
    secret: &[u8],
    token: &str,
    time: u64,
    window: u32,
    params: &TotpParams,
) -> Result<VerifyOutcome, OtpError> {
    ensure_inputs(secret, token)?;
    ensure_window(window)?;
    let base = time_step(time, params.epoch, params.step)?;

    let window = i64::from(window);
    let mut outcome = VerifyOutcome::NO_MATCH;

    for offset in 0i64.saturating_sub(window)..=window {
        let Some(candidate) = base.checked_add_signed(offset) else {
            continue;
        };
        let expected =
            generate_hotp_with(signer, secret, candidate, params.digits, params.algorithm)?;
        // Constant-time comparison to prevent timing attacks.
        if constant_time_eq(expected.as_bytes(), token.as_bytes()) && !outcome.matched {
            outcome = VerifyOutcome::at(offset);
        }
    }

    Ok(outcome)
}

// ── Tests ───────────────────────────────────────────────────────────
