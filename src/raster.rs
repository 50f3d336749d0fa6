use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::config::Config;

/// Dark (live) and light (dead) module values, matching QR convention.
pub const LIVE: bool = true;
pub const DEAD: bool = false;

/// A binary raster: the construction input and output of the simulation.
/// Rows are stored row-major, all the same length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
  width: usize,
  height: usize,
  rows: Vec<Vec<bool>>,
}

impl Bitmap {
  pub fn new(rows: Vec<Vec<bool>>) -> Self {
    let height = rows.len();
    let width = rows.first().map(Vec::len).unwrap_or(0);
    Self {
      width,
      height,
      rows,
    }
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn rows(&self) -> &[Vec<bool>] {
    &self.rows
  }

  pub fn get(&self, x: usize, y: usize) -> bool {
    if x >= self.width || y >= self.height {
      return DEAD;
    }
    self.rows[y][x]
  }
}

/// Render a bitmap as a square RGBA raster of side `size`: live cells black,
/// dead cells white, scaled with nearest-neighbor so module edges stay crisp.
pub fn to_rgba(bitmap: &Bitmap, size: u32) -> RgbaImage {
  let black = Rgba([0u8, 0, 0, 255]);
  let white = Rgba([255u8, 255, 255, 255]);
  let mut img = RgbaImage::from_pixel(bitmap.width() as u32, bitmap.height() as u32, white);
  for (y, row) in bitmap.rows().iter().enumerate() {
    for (x, &cell) in row.iter().enumerate() {
      if cell == LIVE {
        img.put_pixel(x as u32, y as u32, black);
      }
    }
  }
  imageops::resize(&img, size, size, FilterType::Nearest)
}

/// Persist a bitmap as `<name>.<format>` at the configured raster size.
/// Unsupported formats are an error, propagated unchanged to the caller.
pub fn save(bitmap: &Bitmap, name: &str, config: &Config) -> Result<PathBuf> {
  let path = PathBuf::from(format!("{}.{}", name, config.format));
  let img = to_rgba(bitmap, config.size);
  match config.format.as_str() {
    "png" => img
      .save_with_format(&path, ImageFormat::Png)
      .with_context(|| format!("failed to write {}", path.display()))?,
    // JPEG has no alpha channel; flatten first.
    "jpeg" | "jpg" => DynamicImage::ImageRgba8(img)
      .to_rgb8()
      .save_with_format(&path, ImageFormat::Jpeg)
      .with_context(|| format!("failed to write {}", path.display()))?,
    other => bail!("unsupported output format: {other}"),
  }
  Ok(path)
}
