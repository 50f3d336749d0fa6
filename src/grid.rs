use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crossbeam_utils::sync::WaitGroup;
use sha2::{Digest, Sha256};

use crate::pool::{Task, WorkerPool};
use crate::raster::Bitmap;
use crate::stability::Fingerprint;

/// A dense binary cell matrix with a shadow previous-generation buffer.
///
/// Both buffers are flat, row-major, and always the same `width × height`.
/// A generation advance fully overwrites `cells` from `previous` through the
/// worker pool, then copies the result back into `previous` so the next
/// advance reads consistent data.
///
/// The read/write lock makes `advance` atomic with respect to the single-cell
/// accessors: an external caller observes either the pre- or the post-advance
/// state, never a half-written generation. Workers themselves never touch the
/// lock; they receive transient buffer access through task descriptors and
/// write disjoint coordinates.
pub struct Grid {
  width: usize,
  height: usize,
  cells: Arc<Vec<AtomicBool>>,
  previous: Arc<Vec<AtomicBool>>,
  lock: RwLock<()>,
}

impl Grid {
  /// Build a grid from a binary matrix. The input is deep-copied into both
  /// buffers, so later mutation of the source cannot corrupt the grid.
  pub fn new(width: usize, height: usize, rows: &[Vec<bool>]) -> Self {
    let copy = || -> Vec<AtomicBool> {
      rows
        .iter()
        .flat_map(|row| row.iter().map(|&b| AtomicBool::new(b)))
        .collect()
    };
    Self {
      width,
      height,
      cells: Arc::new(copy()),
      previous: Arc::new(copy()),
      lock: RwLock::new(()),
    }
  }

  pub fn from_bitmap(bitmap: &Bitmap) -> Self {
    Self::new(bitmap.width(), bitmap.height(), bitmap.rows())
  }

  /// Deep copy of the current generation, for rendering and file output.
  pub fn to_bitmap(&self) -> Bitmap {
    let _guard = read_guard(&self.lock);
    let rows = (0..self.height)
      .map(|y| {
        (0..self.width)
          .map(|x| self.cells[y * self.width + x].load(Ordering::Relaxed))
          .collect()
      })
      .collect();
    Bitmap::new(rows)
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  /// State of one cell. Out-of-bounds coordinates read as dead rather than
  /// erroring.
  pub fn get_cell(&self, x: usize, y: usize) -> bool {
    if x >= self.width || y >= self.height {
      return false;
    }
    let _guard = read_guard(&self.lock);
    self.cells[y * self.width + x].load(Ordering::Relaxed)
  }

  /// Overwrite one cell immediately, bypassing the worker pool. Out-of-bounds
  /// writes are silently ignored. The write lands in both buffers so the next
  /// advance observes it.
  pub fn set_cell(&self, x: usize, y: usize, value: bool) {
    if x >= self.width || y >= self.height {
      return;
    }
    let _guard = write_guard(&self.lock);
    let idx = y * self.width + x;
    self.cells[idx].store(value, Ordering::Relaxed);
    self.previous[idx].store(value, Ordering::Relaxed);
  }

  /// Advance one generation: enqueue a transition task per coordinate, wait
  /// for all of them to complete, then refresh the previous-generation
  /// buffer. The pool barrier guarantees no task from the next generation is
  /// dispatched before this one fully drains.
  pub fn advance(&self, pool: &WorkerPool) {
    let _guard = write_guard(&self.lock);
    let wg = WaitGroup::new();
    for y in 0..self.height {
      for x in 0..self.width {
        pool.submit(Task {
          x,
          y,
          read: Arc::clone(&self.previous),
          write: Arc::clone(&self.cells),
          width: self.width,
          height: self.height,
          done: wg.clone(),
        });
      }
    }
    wg.wait();
    for idx in 0..self.width * self.height {
      self.previous[idx].store(self.cells[idx].load(Ordering::Relaxed), Ordering::Relaxed);
    }
  }

  /// SHA-256 digest of the current generation: rows are packed into 64-bit
  /// words, little-endian, one run of words per row. Identical contents hash
  /// identically; any differing cell flips the digest.
  pub fn fingerprint(&self) -> Fingerprint {
    let _guard = read_guard(&self.lock);
    let mut hasher = Sha256::new();
    for y in 0..self.height {
      let mut packed: u64 = 0;
      for x in 0..self.width {
        if self.cells[y * self.width + x].load(Ordering::Relaxed) {
          packed |= 1 << (x % 64);
        }
        if x % 64 == 63 || x == self.width - 1 {
          hasher.update(packed.to_le_bytes());
          packed = 0;
        }
      }
    }
    hasher.finalize().into()
  }
}

fn read_guard(lock: &RwLock<()>) -> std::sync::RwLockReadGuard<'_, ()> {
  lock.read().unwrap_or_else(|poison| poison.into_inner())
}

fn write_guard(lock: &RwLock<()>) -> std::sync::RwLockWriteGuard<'_, ()> {
  lock.write().unwrap_or_else(|poison| poison.into_inner())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rows(matrix: &[&[bool]]) -> Vec<Vec<bool>> {
    matrix.iter().map(|row| row.to_vec()).collect()
  }

  fn snapshot(grid: &Grid) -> Vec<Vec<bool>> {
    grid.to_bitmap().rows().to_vec()
  }

  #[test]
  fn construction_deep_copies_the_source() {
    let mut source = rows(&[&[true, false], &[false, true]]);
    let grid = Grid::new(2, 2, &source);
    source[0][0] = false;
    assert!(grid.get_cell(0, 0));
  }

  #[test]
  fn out_of_bounds_reads_dead_and_writes_are_ignored() {
    let grid = Grid::new(2, 2, &rows(&[&[true, true], &[true, true]]));
    assert!(!grid.get_cell(2, 0));
    assert!(!grid.get_cell(0, 99));
    grid.set_cell(5, 5, true);
    assert!(!grid.get_cell(5, 5));
  }

  #[test]
  fn set_cell_survives_the_next_advance() {
    let pool = WorkerPool::new();
    let grid = Grid::new(4, 4, &vec![vec![false; 4]; 4]);
    // A 2x2 block is a still life; seed it cell by cell.
    grid.set_cell(1, 1, true);
    grid.set_cell(2, 1, true);
    grid.set_cell(1, 2, true);
    grid.set_cell(2, 2, true);
    grid.advance(&pool);
    assert!(grid.get_cell(1, 1) && grid.get_cell(2, 1) && grid.get_cell(1, 2) && grid.get_cell(2, 2));
  }

  #[test]
  fn plus_shape_becomes_a_ring() {
    let pool = WorkerPool::new();
    let grid = Grid::new(
      3,
      3,
      &rows(&[
        &[false, true, false],
        &[true, true, true],
        &[false, true, false],
      ]),
    );
    grid.advance(&pool);
    let expected = rows(&[
      &[true, true, true],
      &[true, false, true],
      &[true, true, true],
    ]);
    assert_eq!(snapshot(&grid), expected);
  }

  #[test]
  fn fingerprint_tracks_content() {
    let a = Grid::new(3, 2, &rows(&[&[true, false, true], &[false, true, false]]));
    let b = Grid::new(3, 2, &rows(&[&[true, false, true], &[false, true, false]]));
    assert_eq!(a.fingerprint(), b.fingerprint());
    b.set_cell(0, 0, false);
    assert_ne!(a.fingerprint(), b.fingerprint());
  }

  #[test]
  fn fingerprint_covers_wide_rows() {
    // Rows longer than one packed word must still distinguish far columns.
    let width = 130;
    let mut base = vec![vec![false; width]];
    let a = Grid::new(width, 1, &base);
    base[0][129] = true;
    let b = Grid::new(width, 1, &base);
    assert_ne!(a.fingerprint(), b.fingerprint());
  }
}
