use crossbeam_channel::bounded;
use image::RgbaImage;

use crate::config::Config;
use crate::engine::{evolve, Outcome};
use crate::grid::Grid;
use crate::pool::WorkerPool;
use crate::raster::{self, Bitmap};

fn config(max_iter: u32) -> Config {
  Config::new("test", "png", 32, max_iter, false)
}

fn grid_from(rows: Vec<Vec<bool>>) -> Grid {
  let bitmap = Bitmap::new(rows);
  Grid::from_bitmap(&bitmap)
}

fn blinker_5x5() -> Vec<Vec<bool>> {
  let mut rows = vec![vec![false; 5]; 5];
  rows[1][2] = true;
  rows[2][2] = true;
  rows[3][2] = true;
  rows
}

fn r_pentomino_16x16() -> Vec<Vec<bool>> {
  let mut rows = vec![vec![false; 16]; 16];
  rows[7][8] = true;
  rows[7][9] = true;
  rows[8][7] = true;
  rows[8][8] = true;
  rows[9][8] = true;
  rows
}

#[test]
fn still_life_is_stable_after_one_generation() {
  let mut rows = vec![vec![false; 4]; 4];
  rows[1][1] = true;
  rows[1][2] = true;
  rows[2][1] = true;
  rows[2][2] = true;
  let grid = grid_from(rows);
  let pool = WorkerPool::new();
  let outcome = evolve(&grid, &config(10), &pool, None);
  assert_eq!(
    outcome,
    Outcome {
      stable: true,
      generations: 1
    }
  );
}

#[test]
fn period_two_oscillator_is_stable_after_two_generations() {
  let grid = grid_from(blinker_5x5());
  let pool = WorkerPool::new();
  let outcome = evolve(&grid, &config(10), &pool, None);
  assert_eq!(
    outcome,
    Outcome {
      stable: true,
      generations: 2
    }
  );
}

#[test]
fn all_dead_grid_stays_dead_and_stabilizes_immediately() {
  let grid = grid_from(vec![vec![false; 8]; 8]);
  let pool = WorkerPool::new();
  let outcome = evolve(&grid, &config(5), &pool, None);
  assert_eq!(
    outcome,
    Outcome {
      stable: true,
      generations: 1
    }
  );
  let after = grid.to_bitmap();
  assert!(after.rows().iter().all(|row| row.iter().all(|&c| !c)));
}

#[test]
fn zero_budget_performs_no_advances() {
  let grid = grid_from(blinker_5x5());
  let before = grid.fingerprint();
  let pool = WorkerPool::new();
  let outcome = evolve(&grid, &config(0), &pool, None);
  assert_eq!(
    outcome,
    Outcome {
      stable: false,
      generations: 0
    }
  );
  assert_eq!(grid.fingerprint(), before);
}

#[test]
fn results_are_identical_for_any_pool_size() {
  let fingerprints: Vec<_> = [1, 5, 50]
    .iter()
    .map(|&workers| {
      let grid = grid_from(r_pentomino_16x16());
      let pool = WorkerPool::with_size(workers, 10);
      evolve(&grid, &config(8), &pool, None);
      grid.fingerprint()
    })
    .collect();
  assert_eq!(fingerprints[0], fingerprints[1]);
  assert_eq!(fingerprints[0], fingerprints[2]);
}

/// Frames must reach the consumer in generation order, one per generation,
/// regardless of the channel capacity.
fn assert_frames_in_order(capacity: usize) {
  let config = config(10);
  let grid = grid_from(blinker_5x5());
  let pool = WorkerPool::new();

  let (tx, rx) = bounded::<RgbaImage>(capacity);
  let collector = std::thread::spawn(move || rx.iter().collect::<Vec<_>>());

  let outcome = evolve(&grid, &config, &pool, Some(tx));
  let frames = collector.join().unwrap();

  // One frame per generation: the blinker oscillates A -> B -> A, detected
  // stable after two advances, so exactly the A and B states are emitted.
  assert_eq!(outcome.generations, 2);
  assert_eq!(frames.len(), 2);

  let state_a = raster::to_rgba(&Bitmap::new(blinker_5x5()), config.size);
  let mut horizontal = vec![vec![false; 5]; 5];
  horizontal[2][1] = true;
  horizontal[2][2] = true;
  horizontal[2][3] = true;
  let state_b = raster::to_rgba(&Bitmap::new(horizontal), config.size);

  assert_eq!(frames[0].as_raw(), state_a.as_raw());
  assert_eq!(frames[1].as_raw(), state_b.as_raw());
}

#[test]
fn frames_arrive_in_generation_order_with_minimal_buffering() {
  assert_frames_in_order(1);
}

#[test]
fn frames_arrive_in_generation_order_with_default_buffering() {
  assert_frames_in_order(10);
}

#[test]
fn dropping_the_consumer_does_not_fail_the_run() {
  let grid = grid_from(blinker_5x5());
  let pool = WorkerPool::new();
  let (tx, rx) = bounded::<RgbaImage>(1);
  drop(rx);
  let outcome = evolve(&grid, &config(10), &pool, Some(tx));
  assert!(outcome.stable);
}
