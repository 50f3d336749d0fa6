use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use image::RgbaImage;
use log::{debug, info, warn};

use crate::config::Config;
use crate::ffmpeg::check_ffmpeg;
use crate::grid::Grid;
use crate::pool::WorkerPool;
use crate::qr;
use crate::raster;
use crate::stability::StabilityDetector;
use crate::video::VideoStreamer;

/// Result of one simulation run. Reaching the generation budget without a
/// repeated state is a normal outcome, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
  /// Whether a previously seen state (fixed point or cycle) was reached.
  pub stable: bool,
  /// Number of generation advances performed.
  pub generations: u32,
}

/// Drive the grid until its state repeats or the generation budget runs out.
///
/// Per generation: optionally emit a rendered frame (blocking on a full
/// channel, which throttles the simulation to encoder throughput), advance
/// through the worker pool, fingerprint, and check against history. The
/// initial state is fingerprinted before the loop, so a still life is
/// detected after exactly one advance and a period-N oscillator after N.
///
/// The frame sender, if any, is dropped on return, closing the channel for
/// the consumer.
pub fn evolve(
  grid: &Grid,
  config: &Config,
  pool: &WorkerPool,
  mut frames: Option<Sender<RgbaImage>>,
) -> Outcome {
  let mut detector = StabilityDetector::new();
  detector.observe(grid.fingerprint());

  for generation in 0..config.max_iter {
    if let Some(tx) = &frames {
      let frame = raster::to_rgba(&grid.to_bitmap(), config.size);
      if tx.send(frame).is_err() {
        warn!("frame consumer is gone, disabling capture");
        frames = None;
      }
    }

    grid.advance(pool);
    debug!("generation {} complete", generation + 1);

    if detector.observe(grid.fingerprint()) {
      info!("stable after {} generations", generation + 1);
      return Outcome {
        stable: true,
        generations: generation + 1,
      };
    }
  }

  info!("no repeated state within {} generations", config.max_iter);
  Outcome {
    stable: false,
    generations: config.max_iter,
  }
}

/// The whole pipeline: encode the signature as a QR bitmap, save the "before"
/// raster, evolve to stability (streaming frames to the video encoder when
/// requested), then save the "<signature>_after" raster.
///
/// Collaborator errors (QR encoding, image output) propagate unchanged;
/// video capture failures are contained inside the streamer and only logged.
pub fn run(config: &Config) -> Result<Outcome> {
  let bitmap = qr::generate(&config.signature)?;
  info!(
    "encoded {:?} as a {}x{} QR bitmap",
    config.signature,
    bitmap.width(),
    bitmap.height()
  );

  raster::save(&bitmap, &config.signature, config).context("failed to save the initial raster")?;

  let grid = Grid::from_bitmap(&bitmap);
  let pool = WorkerPool::new();

  let outcome = if config.save_video {
    if !check_ffmpeg() {
      warn!("ffmpeg not found, video capture will likely fail");
    }
    let streamer = VideoStreamer::spawn(&config.signature);
    let outcome = evolve(&grid, config, &pool, Some(streamer.frames()));
    streamer.finish();
    outcome
  } else {
    evolve(&grid, config, &pool, None)
  };

  let after = grid.to_bitmap();
  let name = format!("{}_after", config.signature);
  raster::save(&after, &name, config).context("failed to save the final raster")?;

  Ok(outcome)
}
