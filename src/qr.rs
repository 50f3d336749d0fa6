use anyhow::{Context, Result};
use qrcode::{Color, EcLevel, QrCode, Version};

use crate::raster::Bitmap;

/// QR version is forced so every signature yields the same grid dimensions
/// (version 10 = 57x57 modules), with high error correction for visual
/// density.
const QR_VERSION: i16 = 10;

/// Encode a signature string as a square binary bitmap: dark modules are
/// live cells.
pub fn generate(signature: &str) -> Result<Bitmap> {
  let code = QrCode::with_version(signature.as_bytes(), Version::Normal(QR_VERSION), EcLevel::H)
    .with_context(|| format!("failed to encode {signature:?} as a QR code"))?;
  let width = code.width();
  let rows = code
    .to_colors()
    .chunks(width)
    .map(|row| row.iter().map(|&c| c == Color::Dark).collect())
    .collect();
  Ok(Bitmap::new(rows))
}
