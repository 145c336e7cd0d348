use crate::board::{Board, Coord, CENTER};
use crate::forbidden::{exclude, forbidden_cells};
use crate::player::Role;
use crate::threat::{aggregate, ScoreMap};
use crate::win::find_victory;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeSet, HashSet};
use std::ops::Range;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default bounds of the simulated thinking delay, in milliseconds.
pub const THINK_TIME_MS: Range<u64> = 250..400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Continuing,
  Victory(Role),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
  pub status: Status,
  pub illegal: BTreeSet<Coord>,
  pub scores: ScoreMap,
}

impl Evaluation {
  fn victory(winner: Role) -> Self {
    Self {
      status: Status::Victory(winner),
      illegal: BTreeSet::new(),
      scores: ScoreMap::new(),
    }
  }

  pub fn winner(&self) -> Option<Role> {
    match self.status {
      Status::Victory(role) => Some(role),
      Status::Continuing => None,
    }
  }
}

/// Scores every empty cell reachable from the stones on `board`, from the
/// point of view of `moving`. Recomputed from scratch on each call; a five
/// anywhere on the board short-circuits with no score map.
pub fn evaluate(board: &Board, moving: Role) -> Evaluation {
  if let Some(victory) = find_victory(board) {
    return Evaluation::victory(victory.winner);
  }

  let tables = aggregate(board, moving);
  let mut scores = tables.merged();
  let illegal = forbidden_cells(&tables);
  exclude(&mut scores, &illegal);

  debug!(%moving, cells = scores.len(), illegal = illegal.len(), "evaluated");
  Evaluation {
    status: Status::Continuing,
    illegal,
    scores,
  }
}

/// Picks the highest finite score among playable cells, breaking ties
/// uniformly with `rng`. Falls back to `fallback` when nothing qualifies.
pub fn select_move<R: Rng + ?Sized>(
  scores: &ScoreMap,
  illegal: &BTreeSet<Coord>,
  occupied: &HashSet<Coord>,
  fallback: Coord,
  rng: &mut R,
) -> Coord {
  let mut best = f64::NEG_INFINITY;
  let mut candidates = Vec::new();
  for (&cell, &score) in scores {
    if !score.is_finite() || !cell.is_on_board() || illegal.contains(&cell) || occupied.contains(&cell) {
      continue;
    }
    if score > best {
      best = score;
      candidates.clear();
    }
    if score == best {
      candidates.push(cell);
    }
  }
  debug!(best, ties = candidates.len(), "selecting move");
  candidates.choose(rng).copied().unwrap_or(fallback)
}

/// Source of time for the thinking delay.
pub trait Clock {
  fn now(&self) -> Instant;
  fn sleep(&self, duration: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> Instant {
    Instant::now()
  }

  fn sleep(&self, duration: Duration) {
    thread::sleep(duration);
  }
}

/// The automated opponent: move selection plus its cosmetic pause.
pub struct AIEngine<R = StdRng, C = SystemClock> {
  rng: R,
  clock: C,
  think_time: Option<Range<u64>>,
}

impl AIEngine {
  // Seeded engines repeat their tie-breaks exactly
  pub fn new(seed: Option<u64>, think: bool) -> Self {
    let rng = match seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    Self::with_parts(rng, SystemClock, think.then_some(THINK_TIME_MS))
  }
}

impl<R: Rng, C: Clock> AIEngine<R, C> {
  pub fn with_parts(rng: R, clock: C, think_time: Option<Range<u64>>) -> Self {
    Self { rng, clock, think_time }
  }

  pub fn rng(&mut self) -> &mut R {
    &mut self.rng
  }

  pub fn clock(&self) -> &C {
    &self.clock
  }

  /// Chooses the next cell from an evaluation of `board`.
  pub fn choose(&mut self, evaluation: &Evaluation, board: &Board) -> Coord {
    select_move(
      &evaluation.scores,
      &evaluation.illegal,
      &board.occupied(),
      CENTER,
      &mut self.rng,
    )
  }

  /// Pads the time since `started` up to a random thinking delay.
  pub fn think(&mut self, started: Instant) {
    let Some(range) = self.think_time.clone() else {
      return;
    };
    let target = Duration::from_millis(self.rng.gen_range(range));
    let elapsed = self.clock.now().saturating_duration_since(started);
    if let Some(remaining) = target.checked_sub(elapsed) {
      self.clock.sleep(remaining);
    }
  }
}
