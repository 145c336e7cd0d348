use crate::ai::Evaluation;
use crate::board::{Board, Coord, BOARD_SIZE};
use crate::player::Role;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// Candidates listed per move
const TOP_CANDIDATES: usize = 10;

/// Move-by-move analysis log for headless games.
pub struct GameLogger<W: Write = BufWriter<File>> {
  out: W,
  move_number: u32,
}

impl GameLogger {
  pub fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
    let file = File::create(path)?;
    Ok(Self::new(BufWriter::new(file)))
  }
}

impl<W: Write> GameLogger<W> {
  pub fn new(out: W) -> Self {
    Self { out, move_number: 0 }
  }

  pub fn into_inner(self) -> W {
    self.out
  }

  pub fn log_move_start(&mut self, role: Role, ply: u32) -> std::io::Result<()> {
    self.move_number = ply;
    writeln!(
      self.out,
      "\n{}\nMove #{} - Player: {} ({})\n{}",
      "=".repeat(80),
      ply,
      role,
      role.symbol(),
      "=".repeat(80)
    )
  }

  pub fn log_board_state(&mut self, board: &Board) -> std::io::Result<()> {
    writeln!(self.out, "\nCurrent board state:")?;
    writeln!(
      self.out,
      "   {}",
      (0..BOARD_SIZE).map(|i| format!("{:2}", i)).collect::<Vec<_>>().join(" ")
    )?;

    for row in 0..BOARD_SIZE {
      write!(self.out, "{:2} ", row)?;
      for col in 0..BOARD_SIZE {
        let ch = board.get(Coord::new(row, col)).map_or(".", |stone| stone.role.symbol());
        write!(self.out, " {} ", ch)?;
      }
      writeln!(self.out)?;
    }
    writeln!(self.out)
  }

  /// Highest-scoring cells of the evaluation the mover chooses from.
  pub fn log_candidates(&mut self, evaluation: &Evaluation) -> std::io::Result<()> {
    let mut ranked: Vec<(Coord, f64)> = evaluation
      .scores
      .iter()
      .filter(|(_, score)| score.is_finite())
      .map(|(&cell, &score)| (cell, score))
      .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

    writeln!(self.out, "\nCandidate moves ({}): ", ranked.len())?;
    for (i, (cell, score)) in ranked.iter().enumerate().take(TOP_CANDIDATES) {
      if i > 0 && i % 5 == 0 {
        writeln!(self.out)?;
      }
      write!(self.out, "  ({:2},{:2})={:.1}", cell.row, cell.col, score)?;
    }
    if ranked.len() > TOP_CANDIDATES {
      write!(self.out, "\n  ... and {} more", ranked.len() - TOP_CANDIDATES)?;
    }
    writeln!(self.out)?;

    if !evaluation.illegal.is_empty() {
      let cells: Vec<String> = evaluation.illegal.iter().map(Coord::to_string).collect();
      writeln!(self.out, "Forbidden (double three): {}", cells.join("  "))?;
    }
    Ok(())
  }

  pub fn log_final_decision(&mut self, chosen: Option<Coord>, score: Option<f64>, reason: &str) -> std::io::Result<()> {
    writeln!(self.out, "\n*** FINAL DECISION (move #{}) ***", self.move_number)?;
    match chosen {
      Some(cell) => writeln!(self.out, "  Chosen move: ({}, {})", cell.row, cell.col)?,
      None => writeln!(self.out, "  Chosen move: none")?,
    }
    match score {
      Some(score) => writeln!(self.out, "  Score: {:.1}", score)?,
      None => writeln!(self.out, "  Score: unscored")?,
    }
    writeln!(self.out, "  Reason: {}", reason)?;
    writeln!(self.out, "\n")?;
    self.out.flush()
  }

  pub fn log_game_end(&mut self, winner: Option<Role>, total_moves: usize) -> std::io::Result<()> {
    writeln!(self.out, "\n\n{}", "=".repeat(80))?;
    writeln!(self.out, "GAME OVER")?;
    writeln!(self.out, "{}", "=".repeat(80))?;

    match winner {
      None => writeln!(self.out, "Result: NO WINNER")?,
      Some(role) => writeln!(self.out, "Result: {} ({}) WINS!", role.to_string().to_uppercase(), role.symbol())?,
    }

    writeln!(self.out, "Total moves: {}", total_moves)?;
    writeln!(self.out, "{}\n", "=".repeat(80))?;
    self.out.flush()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ai::evaluate;
  use crate::board::tests::board_with;
  use crate::player::Role::{Black, White};

  fn written(logger: GameLogger<Vec<u8>>) -> String {
    String::from_utf8(logger.into_inner()).unwrap()
  }

  #[test]
  fn board_state_marks_both_colors() {
    let board = board_with(&[(0, 0, Black), (0, 1, White)]);
    let mut logger = GameLogger::new(Vec::new());
    logger.log_board_state(&board).unwrap();
    let text = written(logger);
    assert!(text.contains(" 0  X  O  . "));
    assert_eq!(text.lines().filter(|l| l.starts_with("14 ")).count(), 1);
  }

  #[test]
  fn candidates_are_ranked_and_capped() {
    let board = board_with(&[(7, 7, Black), (7, 8, Black), (7, 9, Black), (3, 3, White)]);
    let evaluation = evaluate(&board, White);
    let mut logger = GameLogger::new(Vec::new());
    logger.log_candidates(&evaluation).unwrap();
    let text = written(logger);
    let first = text.lines().nth(2).unwrap();
    assert!(first.trim_start().starts_with("( 7, 6)=3.0"), "{first}");
    assert!(text.contains("... and"));
  }

  #[test]
  fn forbidden_cells_are_listed() {
    let board = board_with(&[(7, 8, Black), (7, 9, Black), (8, 7, Black), (9, 7, Black)]);
    let evaluation = evaluate(&board, Black);
    let mut logger = GameLogger::new(Vec::new());
    logger.log_candidates(&evaluation).unwrap();
    assert!(written(logger).contains("Forbidden (double three): 7,7"));
  }

  #[test]
  fn game_end_names_the_winner() {
    let mut logger = GameLogger::new(Vec::new());
    logger.log_move_start(White, 9).unwrap();
    logger.log_final_decision(Some(Coord::new(3, 4)), Some(4.0), "completes five").unwrap();
    logger.log_game_end(Some(White), 9).unwrap();
    let text = written(logger);
    assert!(text.contains("Move #9 - Player: white (O)"));
    assert!(text.contains("*** FINAL DECISION (move #9) ***"));
    assert!(text.contains("Chosen move: (3, 4)"));
    assert!(text.contains("Result: WHITE (O) WINS!"));
  }
}
