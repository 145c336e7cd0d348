use crate::player::Role;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Side length of the grid.
pub const BOARD_SIZE: i32 = 15;

/// Opening cell and the fallback when no scored cell is playable.
pub const CENTER: Coord = Coord::new(BOARD_SIZE / 2, BOARD_SIZE / 2);

/// A cell on the grid, `(row, col)`.
///
/// Either component may fall outside `[0, BOARD_SIZE)` while the scanner
/// steps past an edge; `is_on_board` tells the two apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
  pub row: i32,
  pub col: i32,
}

impl Coord {
  pub const fn new(row: i32, col: i32) -> Self {
    Self { row, col }
  }

  // Step `k` cells along the unit vector `(dr, dc)`
  pub fn offset(&self, (dr, dc): (i32, i32), k: i32) -> Coord {
    Coord::new(self.row + dr * k, self.col + dc * k)
  }

  pub fn is_on_board(&self) -> bool {
    (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
  }
}

impl fmt::Display for Coord {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{},{}", self.row, self.col)
  }
}

/// A placed stone. `index` is the 1-based ply it was placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stone {
  pub role: Role,
  pub index: u32,
  pub coord: Coord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlaceError {
  #[error("position {0} is outside the board")]
  OutOfBounds(Coord),
  #[error("a stone is already placed at {0}")]
  Occupied(Coord),
}

/// Placed stones keyed by coordinate. Append only: an occupied cell is
/// never cleared or overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
  stones: HashMap<Coord, Stone>,
  history: Vec<Coord>, // placement order
}

impl Board {
  pub fn new() -> Self {
    Self::default()
  }

  // Place a stone on the next ply
  pub fn put(&mut self, coord: Coord, role: Role) -> Result<Stone, PlaceError> {
    if !coord.is_on_board() {
      return Err(PlaceError::OutOfBounds(coord));
    }
    if self.stones.contains_key(&coord) {
      return Err(PlaceError::Occupied(coord));
    }
    let stone = Stone {
      role,
      index: self.next_index(),
      coord,
    };
    self.stones.insert(coord, stone);
    self.history.push(coord);
    Ok(stone)
  }

  pub fn get(&self, coord: Coord) -> Option<&Stone> {
    self.stones.get(&coord)
  }

  pub fn is_occupied(&self, coord: Coord) -> bool {
    self.stones.contains_key(&coord)
  }

  /// Stones in the order they were placed.
  pub fn stones(&self) -> impl Iterator<Item = &Stone> + '_ {
    self.history.iter().filter_map(move |coord| self.stones.get(coord))
  }

  pub fn occupied(&self) -> HashSet<Coord> {
    self.stones.keys().copied().collect()
  }

  pub fn last(&self) -> Option<&Stone> {
    self.history.last().and_then(|coord| self.stones.get(coord))
  }

  pub fn next_index(&self) -> u32 {
    self.history.len() as u32 + 1
  }

  pub fn len(&self) -> usize {
    self.history.len()
  }

  pub fn is_empty(&self) -> bool {
    self.history.is_empty()
  }

  pub fn is_full(&self) -> bool {
    self.history.len() >= (BOARD_SIZE * BOARD_SIZE) as usize
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  /// Board built from `(row, col, role)` triples in placement order.
  pub(crate) fn board_with(stones: &[(i32, i32, Role)]) -> Board {
    let mut board = Board::new();
    for &(row, col, role) in stones {
      board.put(Coord::new(row, col), role).unwrap();
    }
    board
  }

  #[test]
  fn put_assigns_consecutive_ply_indices() {
    let mut board = Board::new();
    let first = board.put(Coord::new(7, 7), Role::Black).unwrap();
    let second = board.put(Coord::new(7, 8), Role::White).unwrap();
    assert_eq!(first.index, 1);
    assert_eq!(second.index, 2);
    assert_eq!(board.next_index(), 3);
    assert_eq!(board.last().map(|s| s.coord), Some(Coord::new(7, 8)));
  }

  #[test]
  fn occupied_cell_is_never_overwritten() {
    let mut board = board_with(&[(3, 3, Role::Black)]);
    assert_eq!(
      board.put(Coord::new(3, 3), Role::White),
      Err(PlaceError::Occupied(Coord::new(3, 3)))
    );
    assert_eq!(board.get(Coord::new(3, 3)).map(|s| s.role), Some(Role::Black));
    assert_eq!(board.len(), 1);
  }

  #[test]
  fn put_rejects_cells_off_the_grid() {
    let mut board = Board::new();
    for coord in [Coord::new(-1, 0), Coord::new(0, 15), Coord::new(15, 15)] {
      assert_eq!(board.put(coord, Role::Black), Err(PlaceError::OutOfBounds(coord)));
    }
    assert!(board.is_empty());
  }

  #[test]
  fn stones_iterate_in_placement_order() {
    let board = board_with(&[(9, 9, Role::Black), (0, 0, Role::White), (4, 2, Role::Black)]);
    let order: Vec<_> = board.stones().map(|s| s.coord).collect();
    assert_eq!(order, vec![Coord::new(9, 9), Coord::new(0, 0), Coord::new(4, 2)]);
  }

  #[test]
  fn coordinates_order_row_major() {
    assert!(Coord::new(0, 14) < Coord::new(1, 0));
    assert!(Coord::new(5, 3) < Coord::new(5, 4));
    assert_eq!(Coord::new(2, 3).to_string(), "2,3");
  }
}
