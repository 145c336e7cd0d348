//! In-memory rooms pairing one human client with the automated opponent.
//!
//! Every request names the client and presents its key. The registry checks
//! both before the engine sees the board, places the human stone, and answers
//! with the opponent's reply stone in the same turn.

use crate::ai::{evaluate, AIEngine, Clock, Evaluation, SystemClock};
use crate::board::{Board, Coord, PlaceError, Stone, CENTER};
use crate::player::{Player, PlayerType, Role};
use crate::threat::ScoreMap;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::{BTreeSet, HashMap};

/// Wire status codes shared with clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
  Waiting,
  Processing,
  VictoryBlack,
  VictoryWhite,
  DefeatSurrender,
  DefeatTimeout,    // reserved, never produced
  DefeatDisconnect, // reserved, never produced
  // Forbidden-rule variants, reserved: only the double three is enforced
  ThreeByThree,
  ThreeByThreeBlackOnly,
  FourByThree,
  FourByFour,
  FourByFourBlackOnly,
  FourByThreeByThree,
  FourByFourByThree,
  OverStones,
  OverStonesContinue,
  ErrorUnknown, // reserved, never produced
  RoomMissing,
  IdentityMismatch,
  StoneAlreadyPlaced,
}

impl ResponseCode {
  const TABLE: [(ResponseCode, u16); 20] = [
    (ResponseCode::Waiting, 0),
    (ResponseCode::Processing, 100),
    (ResponseCode::VictoryBlack, 101),
    (ResponseCode::VictoryWhite, 102),
    (ResponseCode::DefeatSurrender, 103),
    (ResponseCode::DefeatTimeout, 104),
    (ResponseCode::DefeatDisconnect, 105),
    (ResponseCode::ThreeByThree, 200),
    (ResponseCode::ThreeByThreeBlackOnly, 201),
    (ResponseCode::FourByThree, 202),
    (ResponseCode::FourByFour, 203),
    (ResponseCode::FourByFourBlackOnly, 204),
    (ResponseCode::FourByThreeByThree, 205),
    (ResponseCode::FourByFourByThree, 206),
    (ResponseCode::OverStones, 207),
    (ResponseCode::OverStonesContinue, 208),
    (ResponseCode::ErrorUnknown, 500),
    (ResponseCode::RoomMissing, 501),
    (ResponseCode::IdentityMismatch, 502),
    (ResponseCode::StoneAlreadyPlaced, 503),
  ];

  pub fn code(self) -> u16 {
    Self::TABLE
      .iter()
      .find(|(response, _)| *response == self)
      .map_or(0, |&(_, code)| code)
  }

  pub fn from_code(code: u16) -> Option<Self> {
    Self::TABLE.iter().find(|&&(_, c)| c == code).map(|&(response, _)| response)
  }

  pub fn victory(winner: Role) -> Self {
    match winner {
      Role::Black => ResponseCode::VictoryBlack,
      Role::White => ResponseCode::VictoryWhite,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Victory(Role),
  Surrender,
  IntegrityError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
  Waiting,
  Active,
  Finished(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
  #[error("no room exists for client {0}")]
  RoomMissing(String),
  #[error("player key does not match room {0}")]
  IdentityMismatch(u64),
  #[error("a stone is already placed at {0}")]
  StoneAlreadyPlaced(Coord),
  #[error("position {0} is outside the board")]
  OutOfBounds(Coord),
  #[error("game in room {0} is already finished")]
  GameFinished(u64),
}

impl SessionError {
  pub fn code(&self) -> Option<ResponseCode> {
    match self {
      SessionError::RoomMissing(_) => Some(ResponseCode::RoomMissing),
      SessionError::IdentityMismatch(_) => Some(ResponseCode::IdentityMismatch),
      SessionError::StoneAlreadyPlaced(_) => Some(ResponseCode::StoneAlreadyPlaced),
      SessionError::OutOfBounds(_) | SessionError::GameFinished(_) => None,
    }
  }
}

impl From<PlaceError> for SessionError {
  fn from(err: PlaceError) -> Self {
    match err {
      PlaceError::OutOfBounds(coord) => SessionError::OutOfBounds(coord),
      PlaceError::Occupied(coord) => SessionError::StoneAlreadyPlaced(coord),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Room {
  pub id: u64,
  pub human: Player,
  pub ai: Player,
  pub board: Board,
  pub status: GameStatus,
}

impl Room {
  fn admits(&self, key: &str) -> bool {
    self.human.key == key || self.ai.key == key
  }
}

/// What one request changed: stones placed this turn and the position as
/// last evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
  pub code: ResponseCode,
  pub placed: Vec<Stone>,
  pub illegal: BTreeSet<Coord>,
  pub scores: ScoreMap,
}

impl TurnReply {
  fn new(code: ResponseCode, placed: Vec<Stone>) -> Self {
    Self {
      code,
      placed,
      illegal: BTreeSet::new(),
      scores: ScoreMap::new(),
    }
  }

  fn with_evaluation(code: ResponseCode, placed: Vec<Stone>, evaluation: Evaluation) -> Self {
    Self {
      code,
      placed,
      illegal: evaluation.illegal,
      scores: evaluation.scores,
    }
  }
}

pub struct RoomRegistry<R = StdRng, C = SystemClock> {
  room_count: u64,
  rooms: HashMap<u64, Room>,
  client_rooms: HashMap<String, u64>,
  ai: AIEngine<R, C>,
}

impl<R: Rng, C: Clock> RoomRegistry<R, C> {
  pub fn new(ai: AIEngine<R, C>) -> Self {
    Self {
      room_count: 0,
      rooms: HashMap::new(),
      client_rooms: HashMap::new(),
      ai,
    }
  }

  pub fn room(&self, client: &str) -> Option<&Room> {
    self.client_rooms.get(client).and_then(|id| self.rooms.get(id))
  }

  pub fn status(&self, client: &str) -> GameStatus {
    self.room(client).map_or(GameStatus::Waiting, |room| room.status)
  }

  /// Opens a fresh room for `client`, replacing any previous game. When the
  /// human takes white the opponent opens on the center.
  pub fn start(&mut self, client: &str, key: &str, human_role: Role) -> Result<TurnReply, SessionError> {
    let room_count = &mut self.room_count;
    let id = *self.client_rooms.entry(client.to_string()).or_insert_with(|| {
      *room_count += 1;
      *room_count
    });

    let ai_key = format!("{:032x}", self.ai.rng().gen::<u128>());
    let mut room = Room {
      id,
      human: Player::new(PlayerType::Human, human_role, key),
      ai: Player::new(PlayerType::AI, human_role.opponent(), ai_key),
      board: Board::new(),
      status: GameStatus::Active,
    };
    info!("room {} started for {}, human plays {}", id, client, human_role);

    let mut placed = Vec::new();
    if room.ai.role == Role::Black {
      placed.push(room.board.put(CENTER, room.ai.role)?);
    }
    self.rooms.insert(id, room);
    Ok(TurnReply::new(ResponseCode::Processing, placed))
  }

  /// Places the human stone and, unless that ends the game, the opponent's
  /// reply.
  pub fn place(&mut self, client: &str, key: &str, coord: Coord) -> Result<TurnReply, SessionError> {
    let id = self.authorize(client, key)?;
    let room = self.rooms.get_mut(&id).ok_or_else(|| SessionError::RoomMissing(client.to_string()))?;

    let human = room.human.role;
    let stone = room.board.put(coord, human)?;
    info!("room {}: {} #{} at {}", id, human, stone.index, coord);
    let mut placed = vec![stone];

    let evaluation = evaluate(&room.board, human);
    if let Some(winner) = evaluation.winner() {
      room.status = GameStatus::Finished(Outcome::Victory(winner));
      info!("room {}: {} wins", id, winner);
      return Ok(TurnReply::with_evaluation(ResponseCode::victory(winner), placed, evaluation));
    }

    let started = self.ai.clock().now();
    let target = self.ai.choose(&evaluation, &room.board);
    if room.board.is_occupied(target) {
      warn!("room {}: no playable cell left for {}", id, room.ai.role);
      return Ok(TurnReply::with_evaluation(ResponseCode::Processing, placed, evaluation));
    }
    let reply = room.board.put(target, room.ai.role)?;
    info!("room {}: {} #{} at {}", id, reply.role, reply.index, target);
    placed.push(reply);

    let evaluation = evaluate(&room.board, room.ai.role);
    let code = match evaluation.winner() {
      Some(winner) => {
        room.status = GameStatus::Finished(Outcome::Victory(winner));
        info!("room {}: {} wins", id, winner);
        ResponseCode::victory(winner)
      }
      None => ResponseCode::Processing,
    };
    self.ai.think(started);
    Ok(TurnReply::with_evaluation(code, placed, evaluation))
  }

  pub fn surrender(&mut self, client: &str, key: &str) -> Result<TurnReply, SessionError> {
    let id = self.authorize(client, key)?;
    if let Some(room) = self.rooms.get_mut(&id) {
      room.status = GameStatus::Finished(Outcome::Surrender);
    }
    info!("room {}: surrendered", id);
    Ok(TurnReply::new(ResponseCode::DefeatSurrender, Vec::new()))
  }

  // Room exists, key matches, game still running
  fn authorize(&mut self, client: &str, key: &str) -> Result<u64, SessionError> {
    let room = self
      .client_rooms
      .get(client)
      .and_then(|id| self.rooms.get_mut(id))
      .ok_or_else(|| SessionError::RoomMissing(client.to_string()))?;
    let finished = matches!(room.status, GameStatus::Finished(_));
    if !room.admits(key) {
      warn!("room {}: key mismatch for {}", room.id, client);
      // A recorded outcome is never overwritten
      if !finished {
        room.status = GameStatus::Finished(Outcome::IntegrityError);
      }
      return Err(SessionError::IdentityMismatch(room.id));
    }
    if finished {
      return Err(SessionError::GameFinished(room.id));
    }
    Ok(room.id)
  }
}
