use crate::player::Role;

#[rustfmt::skip]
pub mod threat {
  // Cells visited per half-direction
  pub const SCAN_DEPTH: i32          = 4;
  // Run total whose ceiling means five in a row
  pub const WIN_RUN: f64             = 4.0;

  pub const MOVER_BONUS: f64         = 0.9;
  pub const OPPONENT_BONUS: f64      = 1.0;

  // Threat ceiling that counts as one open three
  pub const OPEN_THREE_CEIL: f64     = 2.0;
  // Open-three tally that makes a cell forbidden (exact match only)
  pub const DOUBLE_THREE_TALLY: u32  = 4;

  // Mover's own scores at or below the limit are flattened to the value
  pub const MOVER_CLAMP_LIMIT: f64   = 2.0;
  pub const MOVER_CLAMP_VALUE: f64   = 0.9;
}

pub struct Scores;

impl Scores {
  /// Bonus added to a run total when its open end is scored.
  pub fn bonus(stone: Role, moving: Role) -> f64 {
    if stone == moving {
      threat::MOVER_BONUS
    } else {
      threat::OPPONENT_BONUS
    }
  }

  /// Flattens low scores of the moving color before the two colors merge.
  pub fn clamp(score: f64, stone: Role, moving: Role) -> f64 {
    if stone == moving && score <= threat::MOVER_CLAMP_LIMIT {
      threat::MOVER_CLAMP_VALUE
    } else {
      score
    }
  }
}
