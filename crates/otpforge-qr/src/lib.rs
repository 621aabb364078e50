//! `otpforge-qr` — QR rendering for provisioning URIs.
//!
//! Encodes any string as a QR code and returns PNG bytes or a
//! `data:image/png;base64,` URL. The input is not interpreted; URI
//! well-formedness is the caller's responsibility.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use thiserror::Error;

/// Minimum edge length in pixels used by [`render_data_url`].
pub const DEFAULT_MIN_DIMENSION: u32 = 200;

/// Prefix of every URL returned by [`render_data_url`].
pub const DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// QR rendering failures.
#[derive(Debug, Error)]
pub enum QrError {
    /// Input does not fit in a QR code.
    #[error("QR encoding failed: {0}")]
    Encode(#[from] qrcode::types::QrError),

    /// PNG serialization failed.
    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Render `uri` as a grayscale PNG at least `min_dimension` pixels wide.
///
/// # Errors
///
/// Returns [`QrError::Encode`] if the input exceeds QR capacity and
/// [`QrError::Image`] if PNG encoding fails.
pub fn render_png(uri: &str, min_dimension: u32) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(uri.as_bytes())?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(min_dimension, min_dimension)
        .build();

    let mut cursor = Cursor::new(Vec::<u8>::new());
    DynamicImage::ImageLuma8(img).write_to(&mut cursor, ImageFormat::Png)?;

    let png = cursor.into_inner();
    tracing::debug!(bytes = png.len(), "rendered provisioning QR code");
    Ok(png)
}

/// Render `uri` as a `data:image/png;base64,` URL.
///
/// # Errors
///
/// See [`render_png`].
pub fn render_data_url(uri: &str) -> Result<String, QrError> {
    let png = render_png(uri, DEFAULT_MIN_DIMENSION)?;
    Ok(format!("{DATA_URL_PREFIX}{}", STANDARD.encode(png)))
}
