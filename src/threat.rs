//! Board-wide threat accumulation.
//!
//! Every stone scores the open ends of each of its axes with the axis run
//! total plus a color bonus. A cell keeps the best value any stone gave it
//! per color, and separately tallies how many of those values rounded up to
//! an open three.

use crate::board::{Board, Coord};
use crate::player::Role;
use crate::scanner::scan_stone;
use crate::scores::threat::OPEN_THREE_CEIL;
use crate::scores::Scores;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Per-cell desirability. Absent cells carry no information;
/// `f64::NEG_INFINITY` marks a forbidden cell.
pub type ScoreMap = BTreeMap<Coord, f64>;

#[derive(Debug, Clone, Default)]
pub struct ColorTable {
  pub scores: HashMap<Coord, f64>,
  pub open_threes: HashMap<Coord, u32>,
}

impl ColorTable {
  fn record(&mut self, cell: Coord, value: f64) {
    let best = self.scores.entry(cell).or_insert(0.0);
    *best = best.max(value);
    if value.ceil() == OPEN_THREE_CEIL {
      *self.open_threes.entry(cell).or_insert(0) += 1;
    }
  }

  pub fn score(&self, cell: Coord) -> f64 {
    self.scores.get(&cell).copied().unwrap_or(0.0)
  }

  pub fn open_threes(&self, cell: Coord) -> u32 {
    self.open_threes.get(&cell).copied().unwrap_or(0)
  }
}

/// Black and white tables from one pass over a board, evaluated for `moving`.
#[derive(Debug, Clone)]
pub struct ThreatTables {
  pub moving: Role,
  tables: [ColorTable; 2],
}

impl ThreatTables {
  pub fn for_role(&self, role: Role) -> &ColorTable {
    &self.tables[role.index()]
  }

  /// Both colors folded into one map, taking the larger value per cell after
  /// the mover's low scores are flattened.
  pub fn merged(&self) -> ScoreMap {
    let mut merged = ScoreMap::new();
    for role in Role::ALL {
      for (&cell, &score) in &self.for_role(role).scores {
        let score = Scores::clamp(score, role, self.moving);
        let entry = merged.entry(cell).or_insert(0.0);
        *entry = entry.max(score);
      }
    }
    merged
  }
}

pub fn aggregate(board: &Board, moving: Role) -> ThreatTables {
  let mut tables: [ColorTable; 2] = Default::default();
  for stone in board.stones() {
    let bonus = Scores::bonus(stone.role, moving);
    let table = &mut tables[stone.role.index()];
    for scan in scan_stone(board, stone) {
      let value = scan.combined() + bonus;
      // Off-grid ends can never be played
      for end in scan.open_ends().filter(Coord::is_on_board) {
        table.record(end, value);
      }
    }
  }
  trace!(
    black = tables[0].scores.len(),
    white = tables[1].scores.len(),
    "threat tables built"
  );
  ThreatTables { moving, tables }
}
