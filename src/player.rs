use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerType {
  Human,
  AI,
}

// Color of the stone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
  Black, // moves first
  White,
}

impl Role {
  pub const ALL: [Role; 2] = [Role::Black, Role::White];

  // Get the opponent's role
  pub fn opponent(&self) -> Role {
    match self {
      Role::Black => Role::White,
      Role::White => Role::Black,
    }
  }

  // Index into per-color tables
  pub fn index(&self) -> usize {
    match self {
      Role::Black => 0,
      Role::White => 1,
    }
  }

  // Symbol used by the terminal board and the game log
  pub fn symbol(&self) -> &'static str {
    match self {
      Role::Black => "X",
      Role::White => "O",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Role::Black => write!(f, "black"),
      Role::White => write!(f, "white"),
    }
  }
}

/// A seat in a room: who plays it, which color, and the opaque key that
/// identifies it on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
  pub player_type: PlayerType,
  pub role: Role,
  pub key: String,
}

impl Player {
  pub fn new(player_type: PlayerType, role: Role, key: impl Into<String>) -> Self {
    Self {
      player_type,
      role,
      key: key.into(),
    }
  }
}
