//! Game state module - the single owner of all mutable game data
//!
//! This module ties together the board, the piece catalog, the generator,
//! scoring and particles. Every mutation (moves, rotations, locks, spawns,
//! lifecycle transitions) goes through `&mut GameSession`, so no caller can
//! ever observe a half-applied update.
//!
//! Lifecycle:
//!
//! ```text
//! NotStarted --start--> Running <--toggle_pause--> Paused
//!                          |
//!                  lock at spawn row
//!                          v
//!                      GameOver --start--> Running
//! ```

use log::{debug, info};

use crate::board::{Board, CompletedRows};
use crate::collision::{is_valid, Position};
use crate::particles::ParticleField;
use crate::pieces::{get_shape, get_spawn_shape, next_rotation, Shape};
use crate::rng::PieceGenerator;
use crate::scoring::{calculate_level, calculate_line_score, drop_interval_ms};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
use crate::types::*;

/// Undrained notifications kept before the oldest are discarded
const MAX_PENDING_NOTIFICATIONS: usize = 32;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Index into the kind's rotation states (always in range)
    pub rotation: usize,
    pub position: Position,
}

impl ActivePiece {
    /// A fresh piece at the spawn anchor in rotation state 0
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: 0,
            position: Position::new(SPAWN_X, SPAWN_Y),
        }
    }

    /// Shape of the current rotation state
    pub fn shape(&self) -> Shape {
        get_shape(self.kind, self.rotation)
    }

    pub fn fits(&self, board: &Board) -> bool {
        is_valid(&self.shape(), self.position, board)
    }
}

/// Result of committing a piece to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOutcome {
    /// Completed rows, top to bottom, in pre-clear numbering
    pub rows_cleared: CompletedRows,
    /// Score awarded for the clear
    pub points: u32,
    /// The piece locked while overlapping the spawn row
    pub game_over: bool,
}

impl LockOutcome {
    pub fn lines_cleared(&self) -> usize {
        self.rows_cleared.len()
    }
}

/// Result of a move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// No active piece, or the session is not running
    Ignored,
    /// The anchor moved
    Moved,
    /// The target position was illegal and nothing changed
    Blocked,
    /// A downward move was blocked, so the piece locked
    Locked(LockOutcome),
}

impl MoveOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved)
    }

    pub fn locked(&self) -> Option<&LockOutcome> {
        match self {
            MoveOutcome::Locked(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    active: Option<ActivePiece>,
    next: Option<PieceKind>,
    generator: PieceGenerator,
    particles: ParticleField,
    score: u32,
    lines: u32,
    level: u32,
    phase: Phase,
    fast_drop: bool,
    /// Monotonic game counter (increments on every start/restart)
    episode_id: u32,
    /// Pieces spawned in the current game
    pieces_spawned: u32,
    /// Pending notifications (consumed by observers)
    notifications: Vec<Notification>,
}

impl GameSession {
    /// Create a session with a deterministic generator
    pub fn new(seed: u64) -> Self {
        Self::with_generator(PieceGenerator::new(seed))
    }

    /// Create a session seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::with_generator(PieceGenerator::from_entropy())
    }

    fn with_generator(generator: PieceGenerator) -> Self {
        Self {
            board: Board::new(),
            active: None,
            next: None,
            generator,
            particles: ParticleField::new(),
            score: 0,
            lines: 0,
            level: 1,
            phase: Phase::NotStarted,
            fast_drop: false,
            episode_id: 0,
            pieces_spawned: 0,
            notifications: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// `gameStarted` flag: a game is in progress (running or paused)
    pub fn started(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::Paused)
    }

    pub fn paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn fast_drop(&self) -> bool {
        self.fast_drop
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    /// Effective gravity interval for the current level and fast-drop flag
    pub fn drop_interval_ms(&self) -> u64 {
        drop_interval_ms(self.level, self.fast_drop)
    }

    /// Start a fresh game from any phase, discarding the previous one.
    pub fn start_game(&mut self) {
        self.board.clear();
        self.active = None;
        self.next = None;
        self.particles.clear();
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.fast_drop = false;
        self.pieces_spawned = 0;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.phase = Phase::Running;
        self.spawn();
        info!("game {} started", self.episode_id);
    }

    /// Toggle between Running and Paused.
    ///
    /// Returns false (and does nothing) in any other phase.
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            _ => return false,
        };
        info!("game {} {}", self.episode_id, if self.paused() { "paused" } else { "resumed" });
        true
    }

    pub fn set_fast_drop(&mut self, enabled: bool) {
        if self.fast_drop != enabled {
            debug!("fast drop {}", if enabled { "on" } else { "off" });
        }
        self.fast_drop = enabled;
    }

    /// Promote the queued next piece (drawing one if absent) to the active
    /// piece at the spawn anchor, then queue a fresh next piece.
    fn spawn(&mut self) {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.generator.next_kind(),
        };
        self.active = Some(ActivePiece::spawn(kind));
        self.next = Some(self.generator.next_kind());
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);
    }

    /// Move the active piece by (dx, dy).
    ///
    /// A blocked downward move locks the piece; a blocked horizontal move
    /// changes nothing.
    pub fn move_piece(&mut self, dx: i8, dy: i8) -> MoveOutcome {
        if !self.is_running() {
            return MoveOutcome::Ignored;
        }
        let Some(active) = self.active else {
            return MoveOutcome::Ignored;
        };

        // An offset past the i8 range is as illegal as one past a wall.
        let target = active
            .position
            .checked_offset(dx, dy)
            .filter(|&target| is_valid(&active.shape(), target, &self.board));
        if let Some(target) = target {
            self.active = Some(ActivePiece {
                position: target,
                ..active
            });
            return MoveOutcome::Moved;
        }

        if dy > 0 {
            return MoveOutcome::Locked(self.lock(active));
        }

        MoveOutcome::Blocked
    }

    /// Step to the next rotation state if it fits at the current anchor.
    ///
    /// No kick offsets are tried; a rejected rotation leaves the piece untouched.
    pub fn rotate_piece(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let rotation = next_rotation(active.kind, active.rotation);
        let candidate = ActivePiece { rotation, ..active };
        if candidate.fits(&self.board) {
            self.active = Some(candidate);
            return true;
        }
        false
    }

    /// Lock the active piece and run the whole
    /// `Locking -> LineClear -> Spawning | GameOver` transition in one step.
    fn lock(&mut self, active: ActivePiece) -> LockOutcome {
        self.active = None;

        // Locking: cells above the top edge are dropped.
        for (c, r, value) in active.shape().cells() {
            let x = active.position.x + c;
            let y = active.position.y + r;
            if y >= 0 {
                self.board.set(x, y, value);
            }
        }

        // LineClear: bursts for every completed row, then remove them together.
        let completed = self.board.completed_rows();
        for &row in &completed {
            self.particles.spawn_burst(row, &mut self.generator);
        }
        let rows_cleared = self.board.clear_full_rows();
        debug_assert_eq!(completed, rows_cleared);

        let count = rows_cleared.len();
        let points = calculate_line_score(count, self.level);
        if count > 0 {
            self.score = self.score.saturating_add(points);
            self.lines += count as u32;
            self.level = self.level.max(calculate_level(self.lines));
            debug!(
                "cleared {} row(s) for {} points (lines={}, level={})",
                count, points, self.lines, self.level
            );
            self.notify(Notification::LinesCleared {
                lines: count as u32,
                points,
            });
        }

        // Spawning, unless the piece never left the spawn row.
        let game_over = active.position.y <= 0;
        if game_over {
            self.phase = Phase::GameOver;
            info!("game {} over with score {}", self.episode_id, self.score);
            self.notify(Notification::GameOver { score: self.score });
        } else {
            self.spawn();
        }

        LockOutcome {
            rows_cleared,
            points,
            game_over,
        }
    }

    /// Advance the particle simulation by one frame
    pub fn tick_particles(&mut self) {
        self.particles.tick();
    }

    /// Apply a command; returns whether it changed anything
    pub fn apply(&mut self, command: GameCommand) -> bool {
        match command {
            GameCommand::Start => {
                self.start_game();
                true
            }
            GameCommand::TogglePause => self.toggle_pause(),
            GameCommand::Move { dx, dy } => {
                !matches!(self.move_piece(dx, dy), MoveOutcome::Ignored | MoveOutcome::Blocked)
            }
            GameCommand::Rotate => self.rotate_piece(),
            GameCommand::SetFastDrop(enabled) => {
                let changed = self.fast_drop != enabled;
                self.set_fast_drop(enabled);
                changed
            }
        }
    }

    /// Queue a notification, dropping the oldest once nobody has drained
    /// the queue for a while.
    fn notify(&mut self, notification: Notification) {
        if self.notifications.len() >= MAX_PENDING_NOTIFICATIONS {
            debug!("notification queue full, dropping oldest");
            self.notifications.remove(0);
        }
        self.notifications.push(notification);
    }

    /// Take all pending notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Mutable board access for puzzle setups and tests
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replace the active piece (puzzle setups and tests).
    ///
    /// Returns false and leaves the session unchanged if the placement does not fit.
    pub fn set_active(&mut self, kind: PieceKind, rotation: usize, position: Position) -> bool {
        let piece = ActivePiece {
            kind,
            rotation: rotation % crate::pieces::state_count(kind),
            position,
        };
        if !piece.fits(&self.board) {
            return false;
        }
        self.active = Some(piece);
        true
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.next = self.next.map(|kind| NextSnapshot {
            kind,
            shape: get_spawn_shape(kind),
        });
        out.particles.clear();
        out.particles.extend_from_slice(self.particles.particles());
        out.score = self.score;
        out.lines = self.lines;
        out.level = self.level;
        out.game_started = self.started();
        out.game_over = self.game_over();
        out.is_paused = self.paused();
        out.is_fast_drop = self.fast_drop;
        out.episode_id = self.episode_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(1)
    }
}
