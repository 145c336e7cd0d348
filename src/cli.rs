use crate::player::Role;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GameModeArg {
  /// Human vs AI in the terminal
  HumanAi,
  /// AI vs AI, logged to a file
  AiAi,
  /// Two humans taking turns at one terminal
  HumanHuman,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
  Black,
  White,
}

impl From<ColorArg> for Role {
  fn from(color: ColorArg) -> Self {
    match color {
      ColorArg::Black => Role::Black,
      ColorArg::White => Role::White,
    }
  }
}

/// Omok (five in a row) against a heuristic opponent
#[derive(Parser, Debug)]
#[command(name = "omok", version)]
pub struct CliArgs {
  /// Game mode
  #[arg(long, value_enum, default_value_t = GameModeArg::HumanAi)]
  pub mode: GameModeArg,

  /// Color the human plays; black moves first
  #[arg(long, value_enum, default_value_t = ColorArg::Black)]
  pub color: ColorArg,

  /// Seed for the opponent's tie-breaks
  #[arg(long)]
  pub seed: Option<u64>,

  /// Answer immediately instead of pausing to "think"
  #[arg(long)]
  pub no_delay: bool,

  /// Log file (engine log in the terminal modes, game analysis in ai-ai mode)
  #[arg(long, default_value = "omok_game.log")]
  pub log_file: PathBuf,

  /// Stop an ai-ai game after this many stones
  #[arg(long, default_value_t = 225)]
  pub max_moves: usize,
}
