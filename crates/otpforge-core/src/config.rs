//! Instance configuration and per-call overrides.
//!
//! A [`TotpConfig`] holds the defaults of one service instance. Each call
//! may carry a [`TotpOverrides`]; [`TotpConfig::merge`] overlays it on the
//! defaults and returns a new resolved configuration, leaving the instance
//! untouched.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OtpError;
use crate::hotp::{OtpAlgorithm, OtpDigits, MAX_WINDOW};
use crate::secret::DEFAULT_SECRET_LENGTH;
use crate::totp::{TotpParams, DEFAULT_STEP, DEFAULT_WINDOW};

/// Label shown by authenticator apps when none is configured.
pub const DEFAULT_LABEL: &str = "Fastify";

// ── Instance configuration ─────────────────────────────────────────

/// Resolved OTP configuration.
///
/// Deserializes from JSON with camelCase keys; every field is optional in
/// the input and falls back to its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TotpConfig {
    /// Length of generated secrets in bytes.
    #[serde(default = "default_secret_length")]
    pub secret_length: usize,

    /// Account label in provisioning URIs.
    #[serde(default = "default_label")]
    pub label: String,

    /// Issuer in provisioning URIs, omitted when `None`.
    #[serde(default)]
    pub issuer: Option<String>,

    /// Steps tolerated on each side during verification.
    #[serde(default = "default_window")]
    pub window: u32,

    /// HMAC algorithm.
    #[serde(default = "default_algorithm")]
    pub algorithm: OtpAlgorithm,

    /// Time step in seconds.
    #[serde(default = "default_step")]
    pub step: u32,

    /// Code length.
    #[serde(default)]
    pub digits: OtpDigits,

    /// `T0` in Unix seconds.
    #[serde(default)]
    pub epoch: u64,
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            secret_length: default_secret_length(),
            label: default_label(),
            issuer: None,
            window: default_window(),
            algorithm: default_algorithm(),
            step: default_step(),
            digits: OtpDigits::default(),
            epoch: 0,
        }
    }
}

const fn default_secret_length() -> usize {
    DEFAULT_SECRET_LENGTH
}
fn default_label() -> String {
    DEFAULT_LABEL.into()
}
const fn default_window() -> u32 {
    DEFAULT_WINDOW
}
const fn default_algorithm() -> OtpAlgorithm {
    OtpAlgorithm::Sha512
}
const fn default_step() -> u32 {
    DEFAULT_STEP
}

// ── Per-call overrides ─────────────────────────────────────────────

/// Fields a single call may override. `None` keeps the instance value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TotpOverrides {
    /// Override for [`TotpConfig::label`].
    pub label: Option<String>,
    /// Override for [`TotpConfig::issuer`].
    pub issuer: Option<String>,
    /// Override for [`TotpConfig::window`].
    pub window: Option<u32>,
    /// Override for [`TotpConfig::algorithm`].
    pub algorithm: Option<OtpAlgorithm>,
    /// Override for [`TotpConfig::step`].
    pub step: Option<u32>,
    /// Override for [`TotpConfig::digits`].
    pub digits: Option<OtpDigits>,
}

impl TotpOverrides {
    /// No overrides.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the issuer.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the verification window.
    #[must_use]
    pub const fn window(mut self, window: u32) -> Self {
        self.window = Some(window);
        self
    }

    /// Set the algorithm.
    #[must_use]
    pub const fn algorithm(mut self, algorithm: OtpAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Set the step.
    #[must_use]
    pub const fn step(mut self, step: u32) -> Self {
        self.step = Some(step);
        self
    }

    /// Set the digit count.
    #[must_use]
    pub const fn digits(mut self, digits: OtpDigits) -> Self {
        self.digits = Some(digits);
        self
    }
}

// ── Merge / validation ─────────────────────────────────────────────

impl TotpConfig {
    /// Overlay `overrides` on this configuration.
    ///
    /// `Some(0)` for `window` is honoured (exact-step matching); it is not
    /// treated as "unset".
    #[must_use]
    pub fn merge(&self, overrides: &TotpOverrides) -> Self {
        Self {
            secret_length: self.secret_length,
            label: overrides
                .label
                .clone()
                .unwrap_or_else(|| self.label.clone()),
            issuer: overrides.issuer.clone().or_else(|| self.issuer.clone()),
            window: overrides.window.unwrap_or(self.window),
            algorithm: overrides.algorithm.unwrap_or(self.algorithm),
            step: overrides.step.unwrap_or(self.step),
            digits: overrides.digits.unwrap_or(self.digits),
            epoch: self.epoch,
        }
    }

    /// Check values the type system does not rule out.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::InvalidStep`] for a zero step,
    /// [`OtpError::InvalidWindow`] for a window above [`MAX_WINDOW`] and
    /// [`OtpError::InvalidLength`] for a zero secret length.
    pub fn validate(&self) -> Result<(), OtpError> {
        if self.step == 0 {
            return Err(OtpError::InvalidStep);
        }
        if self.window > MAX_WINDOW {
            return Err(OtpError::InvalidWindow(self.window));
        }
        if self.secret_length == 0 {
            return Err(OtpError::InvalidLength(self.secret_length));
        }
        Ok(())
    }

    /// Parameters of the TOTP engine.
    #[must_use]
    pub const fn params(&self) -> TotpParams {
        TotpParams {
            algorithm: self.algorithm,
            digits: self.digits,
            step: self.step,
            epoch: self.epoch,
        }
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Config`] for malformed JSON or unsupported values,
    /// and the [`TotpConfig::validate`] errors otherwise.
    pub fn from_json(json: &str) -> Result<Self, OtpError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| OtpError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    ///
    /// Returns [`Default::default()`] when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::Config`] when the file exists but cannot be read
    /// or parsed, and the [`TotpConfig::validate`] errors otherwise.
    pub fn load(path: &Path) -> Result<Self, OtpError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(OtpError::Config(format!("{}: {e}", path.display()))),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────
