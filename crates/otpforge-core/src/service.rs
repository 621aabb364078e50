//! Host-facing OTP service.
//!
//! [`TotpService`] bundles a validated [`TotpConfig`], a [`Clock`] and an
//! [`HmacSigner`]. It holds no mutable state, so one instance can be shared
//! across threads or request handlers; every call resolves its own
//! configuration with [`TotpConfig::merge`].

use tracing::{debug, warn};

use crate::config::{TotpConfig, TotpOverrides};
use crate::error::OtpError;
use crate::hotp::{ensure_inputs, HmacSigner, RingSigner, VerifyOutcome};
use crate::secret::Secret;
use crate::totp::{generate_totp_with, verify_totp_with, Clock, SystemClock};
use crate::uri::build_uri;

/// Stateless TOTP issuer/verifier with instance defaults.
#[derive(Debug, Clone)]
pub struct TotpService<C = SystemClock, S = RingSigner> {
    config: TotpConfig,
    clock: C,
    signer: S,
}

impl TotpService {
    /// Service on the system clock and `ring` HMAC.
    ///
    /// # Errors
    /// Returns the [`TotpConfig::validate`] errors.
    pub fn new(config: TotpConfig) -> Result<Self, OtpError> {
        Self::with_parts(config, SystemClock, RingSigner)
    }
}

impl<C: Clock> TotpService<C> {
    /// Service on an injected clock and `ring` HMAC.
    ///
    /// # Errors
    /// Returns the [`TotpConfig::validate`] errors.
    pub fn with_clock(config: TotpConfig, clock: C) -> Result<Self, OtpError> {
        Self::with_parts(config, clock, RingSigner)
    }
}

impl<C: Clock, S: HmacSigner> TotpService<C, S> {
    /// Service on an injected clock and HMAC signer.
    ///
    /// # Errors
    /// Returns the [`TotpConfig::validate`] errors.
    pub fn with_parts(config: TotpConfig, clock: C, signer: S) -> Result<Self, OtpError> {
        config.validate()?;
        debug!(
            algorithm = %config.algorithm,
            digits = config.digits.value(),
            step = config.step,
            window = config.window,
            "TOTP service configured"
        );
        Ok(Self {
            config,
            clock,
            signer,
        })
    }

    /// Instance defaults.
    #[must_use]
    pub const fn config(&self) -> &TotpConfig {
        &self.config
    }

    /// Generate a secret of `length` bytes, or the configured default.
    ///
    /// # Errors
    /// Returns [`OtpError::InvalidLength`] if `length` is `Some(0)`.
    pub fn generate_secret(&self, length: Option<usize>) -> Result<Secret, OtpError> {
        let length = length.unwrap_or(self.config.secret_length);
        let secret = Secret::generate(length)?;
        debug!(length, "generated OTP secret");
        Ok(secret)
    }

    /// Token for the current time.
    ///
    /// # Errors
    /// Returns [`OtpError::InvalidArgument`] for an empty secret, plus the
    /// clock and step errors of [`TotpService::generate_token_at`].
    pub fn generate_token(
        &self,
        secret: &Secret,
        overrides: &TotpOverrides,
    ) -> Result<String, OtpError> {
        if secret.is_empty() {
            return Err(OtpError::InvalidArgument("secret must not be empty".to_owned()));
        }
        let now = self.clock.now()?;
        self.generate_token_at(secret, now, overrides)
    }

    /// Token for an explicit Unix time.
    ///
    /// # Errors
    /// Returns [`OtpError::InvalidArgument`] for an empty secret or a time
    /// before the epoch, and [`OtpError::InvalidStep`] for a zero step.
    pub fn generate_token_at(
        &self,
        secret: &Secret,
        time: u64,
        overrides: &TotpOverrides,
    ) -> Result<String, OtpError> {
        let config = self.config.merge(overrides);
        generate_totp_with(&self.signer, secret.expose(), time, &config.params())
    }

    /// Provisioning URI for `secret`.
    ///
    /// # Errors
    /// Returns [`OtpError::MissingSecret`] for an empty secret and the
    /// [`TotpConfig::validate`] errors for the merged configuration.
    pub fn provisioning_uri(
        &self,
        secret: &Secret,
        overrides: &TotpOverrides,
    ) -> Result<String, OtpError> {
        let config = self.config.merge(overrides);
        config.validate()?;
        build_uri(secret, &config)
    }

    /// Verify `token` against the current time.
    ///
    /// # Errors
    /// Returns [`OtpError::InvalidArgument`] for an empty secret or token,
    /// before the clock is read or any HMAC is computed.
    pub fn verify(
        &self,
        secret: &Secret,
        token: &str,
        overrides: &TotpOverrides,
    ) -> Result<VerifyOutcome, OtpError> {
        ensure_inputs(secret.expose(), token)?;
        let now = self.clock.now()?;
        self.verify_at(secret, token, now, overrides)
    }

    /// Verify `token` against an explicit Unix time.
    ///
    /// # Errors
    /// Returns [`OtpError::InvalidArgument`] for an empty secret or token or
    /// a time before the epoch, [`OtpError::InvalidWindow`] for a window
    /// above [`crate::MAX_WINDOW`], and [`OtpError::InvalidStep`] for a zero
    /// step.
    pub fn verify_at(
        &self,
        secret: &Secret,
        token: &str,
        time: u64,
        overrides: &TotpOverrides,
    ) -> Result<VerifyOutcome, OtpError> {
        let config = self.config.merge(overrides);
        let outcome = verify_totp_with(
            &self.signer,
            secret.expose(),
            token,
            time,
            config.window,
            &config.params(),
        )?;

        match outcome.delta {
            Some(0) => debug!("OTP verified on current step"),
            Some(delta) => debug!(delta, "OTP verified with clock drift"),
            None => debug!(window = config.window, "OTP rejected"),
        }
        Ok(outcome)
    }

    /// Boolean form of [`TotpService::verify`]: errors count as no match.
    #[must_use]
    pub fn check(&self, secret: &Secret, token: &str, overrides: &TotpOverrides) -> bool {
        match self.verify(secret, token, overrides) {
            Ok(outcome) => outcome.is_match(),
            Err(e) => {
                warn!(error = %e, "OTP verification failed");
                false
            }
        }
    }
}
