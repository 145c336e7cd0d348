//! Bounded run scanning along the four line axes through a stone.
//!
//! Each axis is split into two opposite rays. A ray is walked outward for at
//! most `SCAN_DEPTH` cells and stops at the first cell that does not extend
//! the run: an opposing stone costs half a stone, an empty cell becomes the
//! ray's open end. Cells past the grid edge read as empty.

use crate::board::{Board, Coord, Stone};
use crate::scores::threat::SCAN_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
  Horizontal,
  Vertical,
  Diagonal,     // ↘
  AntiDiagonal, // ↙
}

impl Axis {
  pub const ALL: [Axis; 4] = [Axis::Horizontal, Axis::Vertical, Axis::Diagonal, Axis::AntiDiagonal];

  /// The two opposite unit steps along this axis.
  pub fn rays(self) -> [(i32, i32); 2] {
    match self {
      Axis::Horizontal => [(0, -1), (0, 1)],
      Axis::Vertical => [(-1, 0), (1, 0)],
      Axis::Diagonal => [(-1, -1), (1, 1)],
      Axis::AntiDiagonal => [(-1, 1), (1, -1)],
    }
  }
}

/// Result of walking one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfScan {
  /// Same-color stones passed, minus 0.5 if an opposing stone ended the walk.
  pub run: f64,
  /// First empty (or off-grid) cell, if the walk ended on one.
  pub open_end: Option<Coord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScan {
  pub axis: Axis,
  pub halves: [HalfScan; 2],
}

impl AxisScan {
  /// Run total of both rays, not counting the origin stone.
  pub fn combined(&self) -> f64 {
    self.halves[0].run + self.halves[1].run
  }

  pub fn open_ends(&self) -> impl Iterator<Item = Coord> + '_ {
    self.halves.iter().filter_map(|half| half.open_end)
  }
}

pub fn scan_ray(board: &Board, stone: &Stone, step: (i32, i32)) -> HalfScan {
  let mut run = 0.0;
  let mut open_end = None;
  for k in 1..=SCAN_DEPTH {
    let cell = stone.coord.offset(step, k);
    match board.get(cell) {
      Some(other) if other.role == stone.role => run += 1.0,
      Some(_) => {
        run -= 0.5;
        break;
      }
      None => {
        open_end = Some(cell);
        break;
      }
    }
  }
  HalfScan { run, open_end }
}

pub fn scan_axis(board: &Board, stone: &Stone, axis: Axis) -> AxisScan {
  let [back, forth] = axis.rays();
  AxisScan {
    axis,
    halves: [scan_ray(board, stone, back), scan_ray(board, stone, forth)],
  }
}

pub fn scan_stone(board: &Board, stone: &Stone) -> [AxisScan; 4] {
  Axis::ALL.map(|axis| scan_axis(board, stone, axis))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::board::tests::board_with;
  use crate::player::Role::{Black, White};
  use std::collections::HashSet;

  fn scan_from(board: &Board, row: i32, col: i32, step: (i32, i32)) -> HalfScan {
    let stone = *board.get(Coord::new(row, col)).unwrap();
    scan_ray(board, &stone, step)
  }

  #[test]
  fn opposite_rays_never_visit_the_same_cell() {
    for origin in [Coord::new(7, 7), Coord::new(0, 0), Coord::new(14, 3)] {
      for axis in Axis::ALL {
        let [a, b] = axis.rays();
        let left: HashSet<_> = (1..=SCAN_DEPTH).map(|k| origin.offset(a, k)).collect();
        let right: HashSet<_> = (1..=SCAN_DEPTH).map(|k| origin.offset(b, k)).collect();
        assert!(left.is_disjoint(&right), "{axis:?} from {origin}");
        assert!(!left.contains(&origin) && !right.contains(&origin));
      }
    }
  }

  #[test]
  fn run_counts_same_color_up_to_the_first_empty_cell() {
    let board = board_with(&[(7, 7, Black), (7, 8, Black), (7, 9, Black)]);
    let half = scan_from(&board, 7, 7, (0, 1));
    assert_eq!(half.run, 2.0);
    assert_eq!(half.open_end, Some(Coord::new(7, 10)));
  }

  #[test]
  fn opposing_stone_is_a_half_block() {
    let board = board_with(&[(7, 7, Black), (7, 8, Black), (7, 9, White)]);
    let half = scan_from(&board, 7, 7, (0, 1));
    assert_eq!(half.run, 0.5);
    assert_eq!(half.open_end, None);

    let touching = scan_from(&board, 7, 8, (0, 1));
    assert_eq!(touching.run, -0.5);
    assert_eq!(touching.open_end, None);
  }

  #[test]
  fn gap_stops_the_walk() {
    let board = board_with(&[(7, 7, Black), (7, 9, Black), (7, 10, Black)]);
    let half = scan_from(&board, 7, 7, (0, 1));
    assert_eq!(half.run, 0.0);
    assert_eq!(half.open_end, Some(Coord::new(7, 8)));
  }

  #[test]
  fn walk_is_capped_at_scan_depth() {
    let stones: Vec<_> = (3..9).map(|col| (7, col, Black)).collect();
    let board = board_with(&stones);
    let half = scan_from(&board, 7, 3, (0, 1));
    assert_eq!(half.run, 4.0);
    assert_eq!(half.open_end, None);
  }

  #[test]
  fn off_grid_cells_read_as_empty() {
    let board = board_with(&[(0, 0, Black), (1, 1, Black)]);
    let up = scan_from(&board, 0, 0, (-1, 0));
    assert_eq!(up.run, 0.0);
    assert_eq!(up.open_end, Some(Coord::new(-1, 0)));

    let stone = *board.get(Coord::new(1, 1)).unwrap();
    let diagonal = scan_axis(&board, &stone, Axis::Diagonal);
    assert_eq!(diagonal.halves[0].run, 1.0);
    assert_eq!(diagonal.halves[0].open_end, Some(Coord::new(-1, -1)));
    assert_eq!(diagonal.combined(), 1.0);
  }

  #[test]
  fn scan_stone_covers_every_axis() {
    let board = board_with(&[(7, 7, White)]);
    let stone = *board.get(Coord::new(7, 7)).unwrap();
    let scans = scan_stone(&board, &stone);
    for (scan, axis) in scans.iter().zip(Axis::ALL) {
      assert_eq!(scan.axis, axis);
      assert_eq!(scan.combined(), 0.0);
      assert_eq!(scan.open_ends().count(), 2);
    }
  }
}
