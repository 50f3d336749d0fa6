/// Values driving one simulation run. The core treats all of these as opaque
/// inputs supplied by its caller; only the binary knows where they come from.
#[derive(Clone, Debug)]
pub struct Config {
  /// Identifying name, encoded into the starting QR code and used to derive
  /// every output file name.
  pub signature: String,
  /// Output raster format: `png` or `jpeg`.
  pub format: String,
  /// Side length of the square output rasters and video frames, in pixels.
  pub size: u32,
  /// Generation budget: the run stops here even without a repeated state.
  pub max_iter: u32,
  /// Capture every generation into a video next to the output rasters.
  pub save_video: bool,
}

impl Config {
  pub fn new(
    signature: impl Into<String>,
    format: impl Into<String>,
    size: u32,
    max_iter: u32,
    save_video: bool,
  ) -> Self {
    Self {
      signature: signature.into(),
      format: format.into(),
      size,
      max_iter,
      save_video,
    }
  }
}
