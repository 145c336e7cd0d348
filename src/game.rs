use crate::ai::{evaluate, AIEngine, Clock, Evaluation};
use crate::board::{Board, Coord, PlaceError, BOARD_SIZE, CENTER};
use crate::game_logger::GameLogger;
use crate::player::Role;
use crate::session::{ResponseCode, RoomRegistry, SessionError, TurnReply};
use crate::terminal_ui::{GameAction, TerminalUI};
use log::{info, warn};
use rand::Rng;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

// Client id of the terminal player
const LOCAL_CLIENT: &str = "local";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
  AIvHuman,
  AIvAI,
  HumanvHuman,
}

#[derive(Debug, Clone)]
pub struct GameConfig {
  pub mode: GameMode,
  pub human_role: Role,
  pub seed: Option<u64>,
  pub think: bool,
  pub log_file: PathBuf,
  pub max_moves: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
  pub winner: Option<Role>,
  pub moves: usize,
  pub board: Board,
}

/// Result of one hot-seat placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalStep {
  Placed,
  Victory(Role),
  Forbidden,
  Rejected(PlaceError),
}

/// Two people sharing one board. Every stone is checked the same way the
/// room layer checks it, without an opponent engine.
#[derive(Debug, Clone)]
pub struct LocalGame {
  pub board: Board,
  pub to_move: Role,
  pub evaluation: Evaluation,
}

impl LocalGame {
  pub fn new() -> Self {
    let board = Board::new();
    let evaluation = evaluate(&board, Role::White);
    Self {
      board,
      to_move: Role::Black,
      evaluation,
    }
  }

  /// Places a stone for the side to move unless the cell is illegal or
  /// taken. Once someone has won, every step repeats the victory.
  pub fn step(&mut self, coord: Coord) -> LocalStep {
    if let Some(winner) = self.evaluation.winner() {
      return LocalStep::Victory(winner);
    }
    if self.evaluation.illegal.contains(&coord) {
      return LocalStep::Forbidden;
    }

    let role = self.to_move;
    let stone = match self.board.put(coord, role) {
      Ok(stone) => stone,
      Err(err) => return LocalStep::Rejected(err),
    };
    info!("{} #{} at {}", role, stone.index, coord);

    self.evaluation = evaluate(&self.board, role);
    match self.evaluation.winner() {
      Some(winner) => LocalStep::Victory(winner),
      None => {
        self.to_move = role.opponent();
        LocalStep::Placed
      }
    }
  }
}

impl Default for LocalGame {
  fn default() -> Self {
    Self::new()
  }
}

pub struct Game {
  pub config: GameConfig,

  // Current position "cursor" for human move
  pub cursor: Coord,
  pub last_stone: Option<Coord>,
  pub illegal: BTreeSet<Coord>,

  pub ui: TerminalUI,
}

impl Game {
  pub fn new(config: GameConfig) -> Self {
    Self {
      config,
      cursor: CENTER,
      last_stone: None,
      illegal: BTreeSet::new(),
      ui: TerminalUI::new(),
    }
  }

  pub fn run(&mut self) -> anyhow::Result<()> {
    let GameConfig {
      mode,
      seed,
      think,
      max_moves,
      ..
    } = self.config;
    match mode {
      GameMode::AIvHuman => {
        let mut registry = RoomRegistry::new(AIEngine::new(seed, think));
        self.run_online(&mut registry)
      }
      GameMode::HumanvHuman => self.on_screen(Self::play_local),
      GameMode::AIvAI => {
        // Distinct streams for the two sides, both derived from one seed
        let mut black = AIEngine::new(seed, think);
        let mut white = AIEngine::new(seed.map(|seed| seed.wrapping_add(1)), think);
        let path = self.config.log_file.clone();
        self.run_with_logging(&mut black, &mut white, &path, max_moves)?;
        Ok(())
      }
    }
  }

  // Raw-mode screen around `play`, restored even if the loop fails
  fn on_screen(&mut self, play: impl FnOnce(&mut Self) -> anyhow::Result<()>) -> anyhow::Result<()> {
    self.ui.init_screen()?;
    let result = play(self);
    self.ui.restore_terminal()?;
    result
  }

  /// Plays one terminal game through `registry`, as a remote client would.
  pub fn run_online<R: Rng, C: Clock>(&mut self, registry: &mut RoomRegistry<R, C>) -> anyhow::Result<()> {
    let key = format!("{:032x}", rand::random::<u128>());
    let opened = registry.start(LOCAL_CLIENT, &key, self.config.human_role)?;
    self.absorb(&opened);
    self.on_screen(|game| game.play_online(registry, &key))
  }

  fn play_online<R: Rng, C: Clock>(&mut self, registry: &mut RoomRegistry<R, C>, key: &str) -> anyhow::Result<()> {
    let human_role = self.config.human_role;
    let mut game_is_over = false;
    self.ui.show_message(&format!(
      "You play {} ({}). Arrows move, Enter places, s surrenders, q quits.",
      human_role,
      human_role.symbol()
    ));

    loop {
      if let Some(room) = registry.room(LOCAL_CLIENT) {
        self.ui.draw_board(&room.board, &self.illegal, self.cursor, self.last_stone);
      }

      let action = self.ui.read_input();
      if game_is_over {
        break;
      }

      match action {
        GameAction::Quit => break,
        GameAction::Surrender => {
          let reply = registry.surrender(LOCAL_CLIENT, key)?;
          game_is_over = self.announce(&reply);
        }
        GameAction::MoveLeft | GameAction::MoveRight | GameAction::MoveUp | GameAction::MoveDown => {
          self.cursor = moved(self.cursor, action);
        }
        GameAction::PlaceStone => {
          if self.illegal.contains(&self.cursor) {
            self.ui.show_message("Forbidden: that cell makes a double three.");
            continue;
          }
          match registry.place(LOCAL_CLIENT, key, self.cursor) {
            Ok(reply) => {
              self.absorb(&reply);
              game_is_over = self.announce(&reply);
            }
            Err(SessionError::StoneAlreadyPlaced(_)) => {
              self.ui.show_message("A stone is already placed there.");
            }
            Err(err) => return Err(err.into()),
          }
        }
        GameAction::None => {}
      }
    }
    Ok(())
  }

  // Hot seat: both colors from the same keyboard
  fn play_local(&mut self) -> anyhow::Result<()> {
    let mut local = LocalGame::new();
    let mut game_is_over = false;
    self.ui.show_message("Black (X) to play. Arrows move, Enter places, s surrenders, q quits.");

    loop {
      self.ui.draw_board(&local.board, &local.evaluation.illegal, self.cursor, self.last_stone);

      let action = self.ui.read_input();
      if game_is_over {
        break;
      }

      match action {
        GameAction::Quit => break,
        GameAction::Surrender => {
          let msg = format!("{} surrenders, {} wins.", local.to_move, local.to_move.opponent());
          info!("{}", msg);
          self.ui.show_message(&format!("{} Press any key.", msg));
          game_is_over = true;
        }
        GameAction::MoveLeft | GameAction::MoveRight | GameAction::MoveUp | GameAction::MoveDown => {
          self.cursor = moved(self.cursor, action);
        }
        GameAction::PlaceStone => match local.step(self.cursor) {
          LocalStep::Placed if local.board.is_full() => {
            self.last_stone = Some(self.cursor);
            self.ui.show_message("The board is full, no winner. Press any key.");
            game_is_over = true;
          }
          LocalStep::Placed => {
            self.last_stone = Some(self.cursor);
            let next = local.to_move;
            self.ui.show_message(&format!("{} ({}) to play.", next, next.symbol()));
          }
          LocalStep::Victory(winner) => {
            self.last_stone = Some(self.cursor);
            info!("{} wins", winner);
            self.ui
              .show_message(&format!("{} ({}) wins! Press any key.", winner, winner.symbol()));
            game_is_over = true;
          }
          LocalStep::Forbidden => {
            self.ui.show_message("Forbidden: that cell makes a double three.");
          }
          LocalStep::Rejected(err) => self.ui.show_message(&err.to_string()),
        },
        GameAction::None => {}
      }
    }
    Ok(())
  }

  fn absorb(&mut self, reply: &TurnReply) {
    if let Some(stone) = reply.placed.last() {
      self.last_stone = Some(stone.coord);
    }
    self.illegal = reply.illegal.clone();
  }

  // Shows the reply to the player; true once the game is over
  fn announce(&mut self, reply: &TurnReply) -> bool {
    let human_role = self.config.human_role;
    match outcome_message(reply.code, human_role) {
      Some(msg) => {
        info!("{}", msg);
        self.ui.show_message(&format!("{} Press any key.", msg));
        true
      }
      None => {
        if let Some(stone) = reply.placed.iter().find(|s| s.role != human_role) {
          self.ui
            .show_message(&format!("AI ({}) played {},{}", stone.role, stone.coord.row, stone.coord.col));
        }
        false
      }
    }
  }

  /// Plays two engines against each other, writing the analysis to `path`.
  pub fn run_with_logging<R: Rng, C: Clock>(
    &mut self,
    black: &mut AIEngine<R, C>,
    white: &mut AIEngine<R, C>,
    path: &Path,
    max_moves: usize,
  ) -> anyhow::Result<MatchResult> {
    let mut logger = GameLogger::create(path)?;

    println!("Starting AI vs AI game with logging...");
    println!("Log file: {}", path.display());
    println!("Board size: {}", BOARD_SIZE);
    println!();

    let result = play_match(black, white, &mut logger, max_moves)?;

    println!("\nGame Over!");
    match result.winner {
      Some(role) => println!("Result: {} ({}) WINS!", role.to_string().to_uppercase(), role.symbol()),
      None => println!("Result: NO WINNER"),
    }
    println!("Total moves: {}", result.moves);
    println!("\nSee {} for detailed analysis.", path.display());
    Ok(result)
  }
}

/// Final message for a finished game, from the human's point of view.
pub fn outcome_message(code: ResponseCode, human_role: Role) -> Option<String> {
  match code {
    ResponseCode::VictoryBlack | ResponseCode::VictoryWhite => {
      let winner = if code == ResponseCode::VictoryBlack {
        Role::Black
      } else {
        Role::White
      };
      let verdict = if winner == human_role { "You win!" } else { "AI wins." };
      Some(format!("{} wins. {}", winner, verdict))
    }
    ResponseCode::DefeatSurrender => Some("You surrendered.".to_string()),
    ResponseCode::DefeatTimeout => Some("Time is up.".to_string()),
    _ => None,
  }
}

// Cursor after a movement action, kept on the board
fn moved(cursor: Coord, action: GameAction) -> Coord {
  let (dr, dc) = match action {
    GameAction::MoveLeft => (0, -1),
    GameAction::MoveRight => (0, 1),
    GameAction::MoveUp => (-1, 0),
    GameAction::MoveDown => (1, 0),
    _ => (0, 0),
  };
  let next = cursor.offset((dr, dc), 1);
  if next.is_on_board() {
    next
  } else {
    cursor
  }
}

fn reason(score: Option<f64>) -> &'static str {
  match score {
    None => "No scored cell, center fallback",
    Some(s) if s > 3.0 => "End of a four-stone line",
    Some(s) if s > 2.0 => "End of a three-stone line",
    Some(s) if s > 1.0 => "End of a two-stone line",
    Some(_) => "Next to a single stone",
  }
}

/// Alternates two engines on a fresh board until one makes five, no cell is
/// left, or `max_moves` stones are down. Each side picks from the evaluation
/// made right after its opponent's stone.
pub fn play_match<R: Rng, C: Clock, W: Write>(
  black: &mut AIEngine<R, C>,
  white: &mut AIEngine<R, C>,
  logger: &mut GameLogger<W>,
  max_moves: usize,
) -> anyhow::Result<MatchResult> {
  let mut board = Board::new();
  let mut role = Role::Black;
  let mut evaluation = evaluate(&board, role.opponent());
  let mut winner = None;

  while board.len() < max_moves && !board.is_full() {
    logger.log_move_start(role, board.next_index())?;
    logger.log_board_state(&board)?;
    logger.log_candidates(&evaluation)?;

    let engine = match role {
      Role::Black => &mut *black,
      Role::White => &mut *white,
    };
    let started = engine.clock().now();
    let target = engine.choose(&evaluation, &board);
    if board.is_occupied(target) {
      warn!("{} has no playable cell", role);
      logger.log_final_decision(None, None, "No playable cell")?;
      break;
    }

    let score = evaluation.scores.get(&target).copied();
    let stone = board.put(target, role)?;
    info!("{} #{} at {}", role, stone.index, target);
    logger.log_final_decision(Some(target), score, reason(score))?;

    evaluation = evaluate(&board, role);
    engine.think(started);
    if let Some(won) = evaluation.winner() {
      winner = Some(won);
      break;
    }
    role = role.opponent();
  }

  logger.log_board_state(&board)?;
  logger.log_game_end(winner, board.len())?;
  Ok(MatchResult {
    winner,
    moves: board.len(),
    board,
  })
}
