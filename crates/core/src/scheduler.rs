//! Gravity scheduler - drives automatic descent from the frame clock
//!
//! The scheduler is armed only while the session is running. On every frame it
//! compares the elapsed time since the last automatic step with the session's
//! effective interval (level or fast drop) and, once due, issues a single
//! one-row descent and resets its baseline to the current frame time. At most
//! one step happens per frame regardless of how late the frame is.

use log::trace;

use crate::game_state::{GameSession, MoveOutcome};

#[derive(Debug, Clone, Default)]
pub struct DropScheduler {
    /// Time of the last automatic step (or of arming); `None` while disarmed
    last_drop_ms: Option<u64>,
    /// Game the baseline belongs to
    episode_id: u32,
}

impl DropScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.last_drop_ms.is_some()
    }

    /// Run one frame: gravity first, then particles.
    ///
    /// Returns the outcome of the automatic descent when one was due.
    pub fn frame(&mut self, now_ms: u64, session: &mut GameSession) -> Option<MoveOutcome> {
        if !session.is_running() {
            self.last_drop_ms = None;
            return None;
        }

        // Arming (start, resume or restart) sets a fresh baseline.
        let last = match self.last_drop_ms {
            Some(last) if self.episode_id == session.episode_id() => last,
            _ => {
                self.episode_id = session.episode_id();
                self.last_drop_ms = Some(now_ms);
                now_ms
            }
        };

        let mut outcome = None;
        if now_ms.saturating_sub(last) >= session.drop_interval_ms() {
            trace!("gravity step at {}ms", now_ms);
            outcome = Some(session.move_piece(0, 1));
            self.last_drop_ms = Some(now_ms);
        }

        session.tick_particles();
        outcome
    }

    /// Forget the baseline; the next running frame re-arms.
    pub fn disarm(&mut self) {
        self.last_drop_ms = None;
    }
}
