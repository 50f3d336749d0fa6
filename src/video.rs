use std::io::{BufWriter, Write};
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, Receiver, Sender};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use log::{debug, info, warn};

use crate::ffmpeg::FfmpegCommand;

/// Capacity of the bounded frame channel. A full channel blocks the driver,
/// throttling simulation speed to encoder throughput instead of buffering
/// frames without bound.
pub const FRAME_BUFFER: usize = 10;

/// Input frame rate passed to the encoder.
const FRAME_RATE: u32 = 30;

/// Streams rendered generation snapshots to an external ffmpeg process.
///
/// A single consumer thread owns the child process: it PNG-encodes every
/// frame received over the bounded channel, in strict arrival order, and
/// writes the bytes to the encoder's stdin. Channel closure flushes and
/// closes the stream, then waits for the encoder to exit.
///
/// Capture is best-effort: a failure to start ffmpeg, a broken pipe, or a
/// non-zero exit is logged at warn level and never fails the simulation.
pub struct VideoStreamer {
  tx: Sender<RgbaImage>,
  handle: JoinHandle<()>,
}

impl VideoStreamer {
  /// Start the consumer thread encoding into `<name>.mp4`.
  pub fn spawn(name: &str) -> Self {
    let (tx, rx) = bounded(FRAME_BUFFER);
    let output = format!("{name}.mp4");
    let handle = std::thread::spawn(move || stream_frames(rx, output));
    Self { tx, handle }
  }

  /// A sender half for the driver. Frames sent here arrive at the encoder in
  /// send order; sending blocks while the channel is full.
  pub fn frames(&self) -> Sender<RgbaImage> {
    self.tx.clone()
  }

  /// Close the frame channel and wait for the consumer (and the encoder
  /// process) to finish. Shutdown is a barrier: returning means the child
  /// has exited.
  pub fn finish(self) {
    drop(self.tx);
    let _ = self.handle.join();
  }
}

fn stream_frames(rx: Receiver<RgbaImage>, output: String) {
  let mut child = match FfmpegCommand::new()
    .overwrite()
    .format("image2pipe")
    .codec_video("png")
    .rate(FRAME_RATE)
    .input("pipe:0")
    .codec_video("libx264")
    .preset("superfast")
    .threads(4)
    .output(&output)
    .spawn()
  {
    Ok(child) => child,
    Err(e) => {
      warn!("failed to start ffmpeg, skipping video capture: {e}");
      return;
    }
  };

  let Some(stdin) = child.take_stdin() else {
    warn!("ffmpeg stdin not piped, skipping video capture");
    let _ = child.wait();
    return;
  };
  let mut writer = BufWriter::new(stdin);

  let mut count = 0u32;
  for frame in rx {
    let encoder = PngEncoder::new(&mut writer);
    if let Err(e) = encoder.write_image(
      frame.as_raw(),
      frame.width(),
      frame.height(),
      ExtendedColorType::Rgba8,
    ) {
      warn!("failed to pipe frame {count} to ffmpeg: {e}");
      break;
    }
    count += 1;
    debug!("streamed frame {count}");
  }

  if let Err(e) = writer.flush() {
    warn!("failed to flush frames to ffmpeg: {e}");
  }
  // Dropping the writer closes stdin and signals end of input.
  drop(writer);

  match child.wait() {
    Ok(status) if status.success() => info!("wrote {output} ({count} frames)"),
    Ok(status) => warn!("ffmpeg exited with {status}"),
    Err(e) => warn!("failed to wait for ffmpeg: {e}"),
  }
}
