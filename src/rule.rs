use std::sync::atomic::{AtomicBool, Ordering};

/// Classic B3/S23 Game of Life transition for a single cell.
///
/// Reads only the previous-generation buffer (flat, row-major). The grid has
/// hard edges: neighbors outside `0..width × 0..height` simply don't count,
/// there is no wraparound. Out-of-range `(x, y)` yields a dead cell.
pub fn next_state(cells: &[AtomicBool], x: usize, y: usize, width: usize, height: usize) -> bool {
  if x >= width || y >= height {
    return false;
  }
  let alive = cells[y * width + x].load(Ordering::Relaxed);
  let neighbors = live_neighbors(cells, x, y, width, height);
  neighbors == 3 || (alive && neighbors == 2)
}

/// Count the live cells among the (at most 8) neighbors of `(x, y)`,
/// diagonals included, clipped at the grid edges.
pub fn live_neighbors(cells: &[AtomicBool], x: usize, y: usize, width: usize, height: usize) -> u8 {
  let mut count = 0;
  for dy in -1i64..=1 {
    for dx in -1i64..=1 {
      if dx == 0 && dy == 0 {
        continue;
      }
      let nx = x as i64 + dx;
      let ny = y as i64 + dy;
      if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
        continue;
      }
      if cells[ny as usize * width + nx as usize].load(Ordering::Relaxed) {
        count += 1;
      }
    }
  }
  count
}

#[cfg(test)]
mod tests {
  use super::*;

  fn buffer(rows: &[&[bool]]) -> (Vec<AtomicBool>, usize, usize) {
    let height = rows.len();
    let width = rows[0].len();
    let cells = rows
      .iter()
      .flat_map(|row| row.iter().map(|&b| AtomicBool::new(b)))
      .collect();
    (cells, width, height)
  }

  #[test]
  fn corner_cell_sees_at_most_three_neighbors() {
    let (cells, w, h) = buffer(&[
      &[false, true, true],
      &[true, true, true],
      &[true, true, true],
    ]);
    // (0,0) has exactly 3 in-bounds neighbors, all live.
    assert_eq!(live_neighbors(&cells, 0, 0, w, h), 3);
    assert!(next_state(&cells, 0, 0, w, h));
  }

  #[test]
  fn birth_on_exactly_three() {
    let (cells, w, h) = buffer(&[
      &[true, true, false],
      &[true, false, false],
      &[false, false, false],
    ]);
    assert!(next_state(&cells, 1, 1, w, h));
  }

  #[test]
  fn survival_on_two_or_three() {
    let (cells, w, h) = buffer(&[
      &[true, true, false],
      &[false, true, false],
      &[false, false, false],
    ]);
    assert!(next_state(&cells, 1, 1, w, h));
  }

  #[test]
  fn death_by_isolation_and_overcrowding() {
    let (lonely, w, h) = buffer(&[
      &[false, false, false],
      &[false, true, false],
      &[false, false, false],
    ]);
    assert!(!next_state(&lonely, 1, 1, w, h));

    let (crowded, w2, h2) = buffer(&[
      &[true, true, true],
      &[true, true, false],
      &[false, false, false],
    ]);
    assert!(!next_state(&crowded, 1, 1, w2, h2));
  }

  #[test]
  fn out_of_range_coordinate_is_dead() {
    let (cells, w, h) = buffer(&[&[true, true], &[true, true]]);
    assert!(!next_state(&cells, 2, 0, w, h));
    assert!(!next_state(&cells, 0, 7, w, h));
  }
}
