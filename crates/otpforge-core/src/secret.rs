//! Shared OTP secrets.
//!
//! A [`Secret`] is a byte string held in a zeroize-on-drop allocation
//! (via [`secrecy`]) whose `Debug`/`Display` output is masked. Encodings
//! are views computed on demand from the same bytes:
//! - ASCII (only when every byte is ASCII, always true for generated secrets)
//! - lower-case hexadecimal
//! - unpadded RFC 4648 Base32, the form authenticator apps expect
//! - padded standard Base64
//!
//! Generation uses `OsRng` (OS-level CSPRNG) for all randomness.

use std::fmt;

use data_encoding::{BASE32_NOPAD, BASE64, HEXLOWER, HEXLOWER_PERMISSIVE};
use rand::rngs::OsRng;
use rand::Rng;
use secrecy::{ExposeSecret, SecretSlice};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::OtpError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default secret length in bytes (160 bits, the RFC 4226 recommendation).
pub const DEFAULT_SECRET_LENGTH: usize = 20;

/// Generation alphabet. The first [`ALPHANUMERIC_LEN`] characters are
/// alphanumerics, the remainder are symbols.
const ALPHABET: &[u8] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!@#$%^&*()<>?/[]{},.:;";

const ALPHANUMERIC_LEN: usize = 62;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Character pool used when generating a secret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretCharset {
    /// `0-9A-Za-z` only.
    Alphanumeric,
    /// Alphanumerics plus `!@#$%^&*()<>?/[]{},.:;`.
    #[default]
    WithSymbols,
}

impl SecretCharset {
    fn alphabet(self) -> &'static [u8] {
        match self {
            Self::Alphanumeric => &ALPHABET[..ALPHANUMERIC_LEN],
            Self::WithSymbols => ALPHABET,
        }
    }
}

/// Text encoding of a caller-supplied secret.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretEncoding {
    /// Characters are the key bytes.
    #[default]
    Ascii,
    /// Hexadecimal, case-insensitive, whitespace ignored.
    Hex,
    /// RFC 4648 Base32, case-insensitive, whitespace and `=` padding ignored.
    Base32,
    /// Standard padded Base64.
    Base64,
}

impl SecretEncoding {
    /// Lower-case name of the encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Hex => "hex",
            Self::Base32 => "base32",
            Self::Base64 => "base64",
        }
    }
}

/// Shared secret bytes for HOTP/TOTP.
pub struct Secret {
    inner: SecretSlice<u8>,
}

impl Secret {
    /// Copy `bytes` into a new secret. The caller should zeroize the source.
    #[must_use]
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            inner: bytes.to_vec().into(),
        }
    }

    /// Generate a secret of `length` characters from the default charset.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::InvalidLength`] if `length` is 0.
    pub fn generate(length: usize) -> Result<Self, OtpError> {
        Self::generate_with(length, SecretCharset::default())
    }

    /// Generate a secret of `length` characters drawn uniformly from `charset`.
    ///
    /// Each character is one byte, so the secret is exactly `length` bytes
    /// long and its ASCII view always exists.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::InvalidLength`] if `length` is 0.
    pub fn generate_with(length: usize, charset: SecretCharset) -> Result<Self, OtpError> {
        if length == 0 {
            return Err(OtpError::InvalidLength(length));
        }

        let alphabet = charset.alphabet();
        let mut rng = OsRng;
        let mut bytes: Vec<u8> = (0..length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect();

        let secret = Self::new(&bytes);
        bytes.zeroize();
        Ok(secret)
    }

    /// Build a secret from text in the given encoding.
    ///
    /// # Errors
    ///
    /// Returns [`OtpError::InvalidEncoding`] if `text` is not valid in
    /// `encoding`.
    pub fn decode(text: &str, encoding: SecretEncoding) -> Result<Self, OtpError> {
        let invalid = |e: data_encoding::DecodeError| OtpError::InvalidEncoding {
            encoding: encoding.as_str(),
            reason: e.to_string(),
        };

        let mut bytes = match encoding {
            SecretEncoding::Ascii => return Ok(Self::new(text.as_bytes())),
            SecretEncoding::Hex => {
                let clean: String = text.chars().filter(|c| !c.is_whitespace()).collect();
                HEXLOWER_PERMISSIVE
                    .decode(clean.as_bytes())
                    .map_err(invalid)?
            }
            SecretEncoding::Base32 => {
                let clean: String = text
                    .chars()
                    .filter(|c| !c.is_whitespace() && *c != '=')
                    .map(|c| c.to_ascii_uppercase())
                    .collect();
                BASE32_NOPAD.decode(clean.as_bytes()).map_err(invalid)?
            }
            SecretEncoding::Base64 => BASE64.decode(text.trim().as_bytes()).map_err(invalid)?,
        };

        let secret = Self::new(&bytes);
        bytes.zeroize();
        Ok(secret)
    }

    /// Secret whose bytes are the characters of `text`.
    #[must_use]
    pub fn from_ascii(text: &str) -> Self {
        Self::new(text.as_bytes())
    }

    /// Expose the raw key bytes for an HMAC computation.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.inner.expose_secret()
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expose().len()
    }

    /// Returns `true` if the secret has no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// ASCII view, or `None` if any byte is outside the ASCII range.
    #[must_use]
    pub fn to_ascii(&self) -> Option<String> {
        let bytes = self.expose();
        if bytes.is_ascii() {
            Some(bytes.iter().map(|&b| char::from(b)).collect())
        } else {
            None
        }
    }

    /// Lower-case hexadecimal view.
    #[must_use]
    pub fn to_hex(&self) -> String {
        HEXLOWER.encode(self.expose())
    }

    /// Unpadded upper-case Base32 view, as used in provisioning URIs.
    #[must_use]
    pub fn to_base32(&self) -> String {
        BASE32_NOPAD.encode(self.expose())
    }

    /// Padded standard Base64 view.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.expose())
    }

    /// View in the requested encoding. `None` only for a non-ASCII secret
    /// asked for [`SecretEncoding::Ascii`].
    #[must_use]
    pub fn encode(&self, encoding: SecretEncoding) -> Option<String> {
        match encoding {
            SecretEncoding::Ascii => self.to_ascii(),
            SecretEncoding::Hex => Some(self.to_hex()),
            SecretEncoding::Base32 => Some(self.to_base32()),
            SecretEncoding::Base64 => Some(self.to_base64()),
        }
    }
}

impl Clone for Secret {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
