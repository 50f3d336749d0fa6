use std::{
  env::current_exe,
  ffi::OsStr,
  io,
  path::{Path, PathBuf},
  process::{Child, ChildStdin, Command, CommandArgs, ExitStatus, Stdio},
};

use anyhow::Result;

/// Check if the ffmpeg command exists. Uses system-wide scope by default
/// (e.g. the PATH var).
pub fn check_ffmpeg() -> bool {
  check_ffmpeg_with_path(ffmpeg_path())
}

/// Check if ffmpeg exists at the given path.
pub fn check_ffmpeg_with_path<S: AsRef<OsStr>>(ffmpeg_exe: S) -> bool {
  Command::new(ffmpeg_exe)
    .arg("-version")
    .stdout(Stdio::null())
    .stderr(Stdio::null())
    .status()
    .map(|s| s.success())
    .unwrap_or(false)
}

/// Returns the path of the FFmpeg executable to be used as the argument to
/// `Command::new`. First looks for an FFmpeg binary adjacent to the Rust
/// executable, falling back to `ffmpeg` on the system path. A missing binary
/// only surfaces as an error when the command is actually run.
pub fn ffmpeg_path() -> PathBuf {
  let default = Path::new("ffmpeg").to_path_buf();
  match adjacent_path() {
    Ok(path) => match path.exists() {
      true => path,
      false => default,
    },
    Err(_) => default,
  }
}

/// The (expected) path to an FFmpeg binary adjacent to the Rust binary.
fn adjacent_path() -> Result<PathBuf> {
  let mut path = current_exe()?
    .parent()
    .ok_or_else(|| anyhow::anyhow!("can't get parent of current_exe"))?
    .join("ffmpeg");
  if cfg!(windows) {
    path.set_extension("exe");
  }
  Ok(path)
}

/// A wrapper around [`std::process::Command`] with preset argument aliases
/// for `ffmpeg` specifically. Stdin is piped so callers can stream input to
/// the encoder; stdout and stderr are discarded since only the exit status
/// is interpreted.
pub struct FfmpegCommand {
  inner: Command,
}

impl FfmpegCommand {
  pub fn new() -> Self {
    Self::new_with_exe(ffmpeg_path())
  }

  pub fn new_with_exe<S: AsRef<OsStr>>(exe: S) -> Self {
    let mut inner = Command::new(exe);
    inner.stdin(Stdio::piped());
    inner.stdout(Stdio::null());
    inner.stderr(Stdio::null());
    Self { inner }
  }

  /// Alias for `-y` argument: overwrite output files without asking.
  pub fn overwrite(&mut self) -> &mut Self {
    self.arg("-y");
    self
  }

  /// Alias for `-f` argument, the input or output container format.
  pub fn format<S: AsRef<str>>(&mut self, format: S) -> &mut Self {
    self.arg("-f");
    self.arg(format.as_ref());
    self
  }

  /// Alias for `-c:v` argument.
  ///
  /// Selects a decoder when placed before an input, or an encoder when
  /// placed before an output.
  pub fn codec_video<S: AsRef<str>>(&mut self, codec: S) -> &mut Self {
    self.arg("-c:v");
    self.arg(codec.as_ref());
    self
  }

  /// Alias for `-r` argument, the frame rate in frames per second.
  pub fn rate(&mut self, fps: u32) -> &mut Self {
    self.arg("-r");
    self.arg(fps.to_string());
    self
  }

  /// Alias for `-preset` argument, the encoder speed/compression tradeoff.
  pub fn preset<S: AsRef<str>>(&mut self, preset: S) -> &mut Self {
    self.arg("-preset");
    self.arg(preset.as_ref());
    self
  }

  /// Alias for `-threads` argument.
  pub fn threads(&mut self, count: u32) -> &mut Self {
    self.arg("-threads");
    self.arg(count.to_string());
    self
  }

  /// Alias for `-i` argument, the input file path or URL.
  ///
  /// To take input from stdin, use the value `pipe:0`.
  pub fn input<S: AsRef<str>>(&mut self, path_or_url: S) -> &mut Self {
    self.arg("-i");
    self.arg(path_or_url.as_ref());
    self
  }

  /// The output file path, a bare trailing argument in ffmpeg's syntax.
  pub fn output<S: AsRef<str>>(&mut self, path: S) -> &mut Self {
    self.arg(path.as_ref());
    self
  }

  /// Identical to `arg` in [`std::process::Command`].
  pub fn arg<S: AsRef<OsStr>>(&mut self, arg: S) -> &mut Self {
    self.inner.arg(arg.as_ref());
    self
  }

  /// Identical to `get_args` in [`std::process::Command`].
  pub fn get_args(&self) -> CommandArgs<'_> {
    self.inner.get_args()
  }

  /// Identical to `spawn` in [`std::process::Command`].
  pub fn spawn(&mut self) -> io::Result<FfmpegChild> {
    self.inner.spawn().map(FfmpegChild::from_inner)
  }
}

impl Default for FfmpegCommand {
  fn default() -> Self {
    Self::new()
  }
}

/// A wrapper around [`std::process::Child`] containing a spawned FFmpeg
/// command. Exposes the piped stdin for streaming input and the exit status
/// for best-effort failure reporting.
pub struct FfmpegChild {
  inner: Child,
}

impl FfmpegChild {
  fn from_inner(inner: Child) -> Self {
    Self { inner }
  }

  /// Take ownership of the piped stdin. Dropping the returned handle closes
  /// the stream, which signals end of input to ffmpeg.
  pub fn take_stdin(&mut self) -> Option<ChildStdin> {
    self.inner.stdin.take()
  }

  /// Wait for the process to exit, identical to `wait` in
  /// [`std::process::Child`].
  pub fn wait(&mut self) -> io::Result<ExitStatus> {
    self.inner.wait()
  }
}
