use crossterm::{
  cursor::{Hide, MoveTo, Show},
  event::{read, Event, KeyCode, KeyEvent, KeyEventKind},
  execute,
  style::{Color, Print, ResetColor, SetForegroundColor},
  terminal::{disable_raw_mode, enable_raw_mode, size, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::board::{Board, Coord, BOARD_SIZE};
use crate::player::Role;
use std::collections::BTreeSet;
use std::io::{stdout, Result as IoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
  None,
  Quit,
  Surrender,
  MoveLeft,
  MoveRight,
  MoveUp,
  MoveDown,
  PlaceStone,
}

/// What one cell looks like on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
  Stone(Role),
  Forbidden,
  Empty,
}

// Maps a key to an action; unknown keys do nothing
pub fn action_for(code: KeyCode) -> GameAction {
  match code {
    KeyCode::Esc | KeyCode::Char('q') => GameAction::Quit,
    KeyCode::Char('s') => GameAction::Surrender,
    KeyCode::Left | KeyCode::Char('h') => GameAction::MoveLeft,
    KeyCode::Right | KeyCode::Char('l') => GameAction::MoveRight,
    KeyCode::Up | KeyCode::Char('k') => GameAction::MoveUp,
    KeyCode::Down | KeyCode::Char('j') => GameAction::MoveDown,
    KeyCode::Enter | KeyCode::Char(' ') => GameAction::PlaceStone,
    _ => GameAction::None,
  }
}

pub fn cell_view(board: &Board, illegal: &BTreeSet<Coord>, cell: Coord) -> CellView {
  match board.get(cell) {
    Some(stone) => CellView::Stone(stone.role),
    None if illegal.contains(&cell) => CellView::Forbidden,
    None => CellView::Empty,
  }
}

pub struct TerminalUI {
  /// Store the last message to be displayed on the bottom line.
  last_message: String,
}

impl TerminalUI {
  /// "Light green" for the cursor, RGB value
  const CURSOR_COLOR: Color = Color::Rgb { r: 120, g: 255, b: 120 };
  /// "Light red" for the last stone, RGB value
  const LAST_STONE_COLOR: Color = Color::Rgb { r: 255, g: 140, b: 140 };
  const FORBIDDEN_COLOR: Color = Color::Rgb { r: 200, g: 90, b: 90 };

  pub fn new() -> Self {
    Self {
      last_message: String::new(),
    }
  }

  pub fn init_screen(&mut self) -> IoResult<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, Hide)?;
    Ok(())
  }

  pub fn restore_terminal(&mut self) -> IoResult<()> {
    execute!(stdout(), Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
  }

  // Blocks for the next key press
  pub fn read_input(&mut self) -> GameAction {
    match read() {
      Ok(Event::Key(KeyEvent {
        code,
        kind: KeyEventKind::Press,
        ..
      })) => action_for(code),
      _ => GameAction::None,
    }
  }

  /// Set (and immediately draw) a new message
  pub fn show_message(&mut self, msg: &str) {
    self.last_message = msg.to_string();
    self.draw_message();
  }

  fn draw_message(&mut self) {
    let (cols, rows) = size().unwrap_or((80, 24));
    let y = rows.saturating_sub(2);

    let msg_len = self.last_message.len() as u16;
    let x = if cols > msg_len { (cols - msg_len) / 2 } else { 0 };

    execute!(stdout(), MoveTo(0, y), Print(" ".repeat(cols as usize))).ok();
    execute!(stdout(), MoveTo(x, y), Print(&self.last_message)).ok();
  }

  pub fn draw_board(&mut self, board: &Board, illegal: &BTreeSet<Coord>, cursor: Coord, last_stone: Option<Coord>) {
    let (cols, rows) = size().unwrap_or((80, 24));

    let bsize = BOARD_SIZE as u16;
    let cell_width: u16 = 3;
    let used_width = bsize * cell_width - 1;
    let used_height = bsize;

    // Center the board, leaving a row for the top border
    let offset_x = if cols > used_width { (cols - used_width) / 2 } else { 0 };
    let offset_y = (if rows > used_height { (rows - used_height) / 2 } else { 0 }).max(1);

    let mut stdout_ = stdout();

    for row in 0..rows {
      execute!(stdout_, MoveTo(0, row), Print(" ".repeat(cols as usize))).ok();
    }

    execute!(stdout_, MoveTo(offset_x, offset_y - 1), Print("╔")).ok();
    for _ in 0..used_width {
      execute!(stdout_, Print("═")).ok();
    }
    execute!(stdout_, Print("╗")).ok();

    for row in 0..BOARD_SIZE {
      let sy = offset_y + row as u16;
      execute!(stdout_, MoveTo(offset_x, sy), Print("║")).ok();
      for col in 0..BOARD_SIZE {
        let cell = Coord::new(row, col);
        let sx = offset_x + (col as u16) * cell_width + 1;
        let is_cursor = cell == cursor;
        let is_last_stone = last_stone == Some(cell);

        let (symbol, color) = match cell_view(board, illegal, cell) {
          CellView::Stone(role) if is_cursor => (role.symbol(), Some(Self::CURSOR_COLOR)),
          CellView::Stone(role) if is_last_stone => (role.symbol(), Some(Self::LAST_STONE_COLOR)),
          CellView::Stone(role) => (role.symbol(), None),
          CellView::Forbidden if is_cursor => ("×", Some(Self::CURSOR_COLOR)),
          CellView::Forbidden => ("×", Some(Self::FORBIDDEN_COLOR)),
          CellView::Empty if is_cursor => ("+", Some(Self::CURSOR_COLOR)),
          CellView::Empty => (".", None),
        };

        if let Some(fg) = color {
          execute!(stdout_, MoveTo(sx, sy), SetForegroundColor(fg), Print(symbol), ResetColor).ok();
        } else {
          execute!(stdout_, MoveTo(sx, sy), Print(symbol)).ok();
        }
        execute!(stdout_, Print(" ")).ok();
      }
      execute!(stdout_, Print("║")).ok();
    }

    execute!(stdout_, MoveTo(offset_x, offset_y + used_height), Print("╚")).ok();
    for _ in 0..used_width {
      execute!(stdout_, Print("═")).ok();
    }
    execute!(stdout_, Print("╝")).ok();

    // Redraw the saved message so the clear above does not erase it
    self.draw_message();
  }
}
