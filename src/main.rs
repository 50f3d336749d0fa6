use clap::Parser;
use lifesign::config::Config;
use lifesign::engine;

#[derive(Parser)]
#[command(name = "lifesign")]
#[command(version)]
#[command(about = "Evolve a QR-encoded signature under Conway's Game of Life")]
struct Cli {
  /// Signature text encoded into the starting QR code
  #[arg(short, long)]
  signature: String,

  /// Output image format (png or jpeg)
  #[arg(short, long, default_value = "png")]
  format: String,

  /// Side length of the square output images, in pixels
  #[arg(long, default_value_t = 255)]
  size: u32,

  /// Maximum number of generations to simulate
  #[arg(short, long, default_value_t = 20)]
  iter: u32,

  /// Capture every generation into <signature>.mp4
  #[arg(long)]
  video: bool,
}

fn main() -> anyhow::Result<()> {
  env_logger::init();
  let cli = Cli::parse();

  let config = Config::new(cli.signature, cli.format, cli.size, cli.iter, cli.video);
  let outcome = engine::run(&config)?;

  match outcome.stable {
    true => println!("stable after {} generations", outcome.generations),
    false => println!(
      "did not stabilize within {} generations",
      config.max_iter
    ),
  }
  Ok(())
}
