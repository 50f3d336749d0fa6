//! Evolve a QR-encoded signature under Conway's Game of Life, optionally
//! streaming every generation to a standalone FFmpeg binary as a video.
//!
//! ## Example
//!
//! ```rust,no_run
//! use lifesign::{config::Config, engine};
//!
//! fn main() -> anyhow::Result<()> {
//!   let config = Config::new("alice", "png", 255, 20, false);
//!   let outcome = engine::run(&config)?; // <- writes alice.png and alice_after.png
//!   match outcome.stable {
//!     true => println!("stable after {} generations", outcome.generations),
//!     false => println!("did not stabilize within {} generations", outcome.generations),
//!   }
//!   Ok(())
//! }
//! ```

#[cfg(test)]
mod test;

pub mod config;
pub mod engine;
pub mod ffmpeg;
pub mod grid;
pub mod pool;
pub mod qr;
pub mod raster;
pub mod rule;
pub mod stability;
pub mod video;
