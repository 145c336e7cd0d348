//! Approximate double-three exclusion.
//!
//! A cell is forbidden when exactly `DOUBLE_THREE_TALLY` open-three
//! contributions landed on it for one color. Lower and higher tallies are
//! both legal; double-four and overline are not checked here.

use crate::board::Coord;
use crate::player::Role;
use crate::scores::threat::DOUBLE_THREE_TALLY;
use crate::threat::{ColorTable, ScoreMap, ThreatTables};
use std::collections::BTreeSet;
use tracing::debug;

/// Cells of one color whose open-three tally is exactly the threshold.
pub fn saturated(table: &ColorTable) -> impl Iterator<Item = Coord> + '_ {
  table
    .open_threes
    .iter()
    .filter(|&(_, &count)| count == DOUBLE_THREE_TALLY)
    .map(|(&cell, _)| cell)
}

/// Union over both colors of saturated cells.
pub fn forbidden_cells(tables: &ThreatTables) -> BTreeSet<Coord> {
  let mut cells = BTreeSet::new();
  for role in Role::ALL {
    for cell in saturated(tables.for_role(role)) {
      debug!(%cell, %role, "double three");
      cells.insert(cell);
    }
  }
  cells
}

/// Forces every forbidden cell to negative infinity in `scores`.
pub fn exclude(scores: &mut ScoreMap, cells: &BTreeSet<Coord>) {
  for &cell in cells {
    scores.insert(cell, f64::NEG_INFINITY);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::board::tests::board_with;
  use crate::player::Role::{Black, White};
  use crate::threat::aggregate;

  const TARGET: Coord = Coord::new(7, 7);

  // A row pair and a column pair both pointing at (7,7): two tallies each.
  fn crossing_pairs(role: Role) -> Vec<(i32, i32, Role)> {
    vec![(7, 8, role), (7, 9, role), (8, 7, role), (9, 7, role)]
  }

  #[test]
  fn four_open_three_tallies_forbid_the_cell() {
    let board = board_with(&crossing_pairs(Black));
    let tables = aggregate(&board, Black);
    assert_eq!(tables.for_role(Black).open_threes(TARGET), 4);
    assert!(forbidden_cells(&tables).contains(&TARGET));
  }

  #[test]
  fn only_the_exact_tally_saturates() {
    // Stones tally in pairs, so odd counts are checked on a hand-built table.
    let mut table = ColorTable::default();
    for count in 1..=6 {
      table.open_threes.insert(Coord::new(count as i32, 0), count);
    }
    let cells: Vec<_> = saturated(&table).collect();
    assert_eq!(cells, vec![Coord::new(4, 0)]);
  }

  #[test]
  fn single_pair_is_legal() {
    let board = board_with(&[(7, 8, Black), (7, 9, Black)]);
    let tables = aggregate(&board, Black);
    assert_eq!(tables.for_role(Black).open_threes(TARGET), 2);
    assert!(forbidden_cells(&tables).is_empty());
  }

  #[test]
  fn three_crossing_pairs_overshoot_the_threshold() {
    let mut stones = crossing_pairs(Black);
    stones.extend([(8, 8, Black), (9, 9, Black)]);
    let board = board_with(&stones);
    let tables = aggregate(&board, Black);
    assert_eq!(tables.for_role(Black).open_threes(TARGET), 6);
    assert!(!forbidden_cells(&tables).contains(&TARGET));
  }

  #[test]
  fn white_shapes_are_checked_the_same_way() {
    let board = board_with(&crossing_pairs(White));
    for moving in Role::ALL {
      let tables = aggregate(&board, moving);
      assert!(forbidden_cells(&tables).contains(&TARGET), "moving {moving}");
    }
  }

  #[test]
  fn exclude_overwrites_with_negative_infinity() {
    let mut scores = ScoreMap::new();
    scores.insert(TARGET, 1.9);
    scores.insert(Coord::new(0, 0), 0.9);
    exclude(&mut scores, &BTreeSet::from([TARGET, Coord::new(3, 3)]));
    assert_eq!(scores[&TARGET], f64::NEG_INFINITY);
    assert_eq!(scores[&Coord::new(3, 3)], f64::NEG_INFINITY);
    assert_eq!(scores[&Coord::new(0, 0)], 0.9);
  }
}
