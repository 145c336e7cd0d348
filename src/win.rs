//! Five-in-a-row detection on top of the run scanner.
//!
//! A stone wins along an axis when the ceiling of its combined run is exactly
//! `WIN_RUN`: four more stones of its color reachable within scan depth. An
//! overline seen from one of its interior stones totals five or more and does
//! not count, but its end stones still only see four.

use crate::board::{Board, Coord, Stone};
use crate::player::Role;
use crate::scanner::{scan_axis, Axis};
use crate::scores::threat::WIN_RUN;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Victory {
  pub winner: Role,
  /// Stone whose scan completed the line.
  pub origin: Coord,
  pub axis: Axis,
}

/// First axis along which `stone` completes five, if any.
pub fn winning_axis(board: &Board, stone: &Stone) -> Option<Axis> {
  Axis::ALL
    .into_iter()
    .find(|&axis| scan_axis(board, stone, axis).combined().ceil() == WIN_RUN)
}

/// Checks every stone in placement order and stops at the first win.
pub fn find_victory(board: &Board) -> Option<Victory> {
  let victory = board.stones().find_map(|stone| {
    winning_axis(board, stone).map(|axis| Victory {
      winner: stone.role,
      origin: stone.coord,
      axis,
    })
  });
  if let Some(v) = &victory {
    debug!(winner = %v.winner, origin = %v.origin, axis = ?v.axis, "five in a row");
  }
  victory
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::board::tests::board_with;
  use crate::player::Role::{Black, White};

  fn stone_at(board: &Board, row: i32, col: i32) -> Stone {
    *board.get(Coord::new(row, col)).unwrap()
  }

  #[test]
  fn every_stone_of_a_five_sees_the_win() {
    let lines: [(Axis, [(i32, i32); 5]); 4] = [
      (Axis::Horizontal, [(7, 3), (7, 4), (7, 5), (7, 6), (7, 7)]),
      (Axis::Vertical, [(2, 9), (3, 9), (4, 9), (5, 9), (6, 9)]),
      (Axis::Diagonal, [(4, 4), (5, 5), (6, 6), (7, 7), (8, 8)]),
      (Axis::AntiDiagonal, [(2, 12), (3, 11), (4, 10), (5, 9), (6, 8)]),
    ];
    for (axis, cells) in lines {
      let stones: Vec<_> = cells.iter().map(|&(r, c)| (r, c, White)).collect();
      let board = board_with(&stones);
      for &(r, c) in &cells {
        assert_eq!(winning_axis(&board, &stone_at(&board, r, c)), Some(axis), "{r},{c}");
      }
      let victory = find_victory(&board).unwrap();
      assert_eq!(victory.winner, White);
      assert_eq!(victory.axis, axis);
    }
  }

  #[test]
  fn four_in_a_row_is_not_a_win() {
    let board = board_with(&[(7, 7, Black), (7, 8, Black), (7, 9, Black), (7, 10, Black)]);
    assert_eq!(find_victory(&board), None);
  }

  #[test]
  fn five_closed_on_one_side_still_wins() {
    let board = board_with(&[
      (7, 2, White),
      (7, 3, Black),
      (7, 4, Black),
      (7, 5, Black),
      (7, 6, Black),
      (7, 7, Black),
    ]);
    let victory = find_victory(&board).unwrap();
    assert_eq!(victory.winner, Black);
  }

  #[test]
  fn five_against_the_edge_wins() {
    let stones: Vec<_> = (0..5).map(|col| (0, col, Black)).collect();
    let board = board_with(&stones);
    assert_eq!(find_victory(&board).map(|v| v.winner), Some(Black));
  }

  #[test]
  fn broken_five_is_not_a_win() {
    let board = board_with(&[(7, 3, Black), (7, 4, Black), (7, 5, Black), (7, 7, Black), (7, 8, Black)]);
    assert_eq!(find_victory(&board), None);
  }

  #[test]
  fn overline_interior_stones_do_not_register_a_win() {
    // Six in a row: the four inner stones total five and are ignored.
    let stones: Vec<_> = (3..9).map(|col| (7, col, Black)).collect();
    let board = board_with(&stones);
    for col in 4..8 {
      assert_eq!(winning_axis(&board, &stone_at(&board, 7, col)), None, "col {col}");
    }
    // The end stones only see four beyond themselves.
    assert_eq!(winning_axis(&board, &stone_at(&board, 7, 3)), Some(Axis::Horizontal));
    assert_eq!(winning_axis(&board, &stone_at(&board, 7, 8)), Some(Axis::Horizontal));
    assert_eq!(find_victory(&board).map(|v| v.origin), Some(Coord::new(7, 3)));
  }

  #[test]
  fn overline_placed_from_the_middle_is_judged_by_placement_order() {
    // Ply order puts an interior stone first; the scan still reaches the end stone.
    let board = board_with(&[
      (7, 5, Black),
      (7, 6, Black),
      (7, 4, Black),
      (7, 7, Black),
      (7, 3, Black),
      (7, 8, Black),
    ]);
    let victory = find_victory(&board).unwrap();
    assert_eq!(victory.origin, Coord::new(7, 3));
  }
}
