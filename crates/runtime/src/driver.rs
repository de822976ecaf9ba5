//! Game driver - the single command dispatcher
//!
//! The driver owns the session together with everything that produces
//! commands for it: the gravity scheduler, the key repeat controller and the
//! held-key set. External input arrives as [`ControlEvent`]s through
//! [`GameDriver::dispatch`]; timers advance in [`GameDriver::frame`]. Every
//! resulting [`GameCommand`] is applied immediately and in emission order, so
//! a manual move and a gravity step in the same frame are never merged.
//!
//! Cancellation rule: whenever the session leaves play (game over, or never
//! started), every pending repeat timer is cancelled and the scheduler is
//! disarmed, leaving nothing outstanding.

use blockfall_input::{binding_for, Binding, HeldKeys, KeyCode, KeyRepeatController};
use log::{debug, trace};

use crate::config::SessionConfig;
use crate::core::{DropScheduler, GameSession, GameSnapshot, MoveOutcome};
use crate::types::{GameCommand, Notification, RepeatKey};

/// Input accepted by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    StartGame,
    TogglePause,
    MovePiece { dx: i8, dy: i8 },
    RotatePiece,
    StartKeyRepeat(RepeatKey),
    StopKeyRepeat(RepeatKey),
    /// Raw key-down, mapped through the key bindings
    KeyDown(KeyCode),
    /// Raw key-up
    KeyUp(KeyCode),
}

#[derive(Debug, Clone)]
pub struct GameDriver {
    session: GameSession,
    scheduler: DropScheduler,
    repeats: KeyRepeatController,
    held: HeldKeys,
}

impl GameDriver {
    pub fn new(config: &SessionConfig) -> Self {
        let session = match config.seed {
            Some(seed) => GameSession::new(seed),
            None => GameSession::from_entropy(),
        };
        Self::with_session(session, config)
    }

    /// Drive an existing session (puzzle setups, tests)
    pub fn with_session(session: GameSession, config: &SessionConfig) -> Self {
        Self {
            session,
            scheduler: DropScheduler::new(),
            repeats: KeyRepeatController::with_config(config.repeat_delay_ms, config.repeat_interval_ms),
            held: HeldKeys::new().with_release_timeout_ms(config.key_release_timeout_ms),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn repeats(&self) -> &KeyRepeatController {
        &self.repeats
    }

    pub fn held_keys(&self) -> &HeldKeys {
        &self.held
    }

    /// Whether the host should keep delivering frames
    pub fn wants_frames(&self) -> bool {
        self.session.is_running() || self.repeats.active_timers() > 0
    }

    /// Number of outstanding timers (repeat timers plus the armed scheduler)
    pub fn outstanding_timers(&self) -> usize {
        self.repeats.active_timers() + usize::from(self.scheduler.is_armed())
    }

    /// Handle one input event. Returns whether the session changed.
    pub fn dispatch(&mut self, event: ControlEvent, now_ms: u64) -> bool {
        trace!("dispatch {:?} at {}ms", event, now_ms);
        self.expire_stale_keys(now_ms);

        let changed = match event {
            ControlEvent::StartGame => self.apply(GameCommand::Start),
            ControlEvent::TogglePause => self.apply(GameCommand::TogglePause),
            ControlEvent::MovePiece { dx, dy } => self.apply(GameCommand::Move { dx, dy }),
            ControlEvent::RotatePiece => self.apply(GameCommand::Rotate),
            ControlEvent::StartKeyRepeat(key) => self.start_repeat(key, now_ms),
            ControlEvent::StopKeyRepeat(key) => self.stop_repeat(key),
            ControlEvent::KeyDown(code) => self.key_down(code, now_ms),
            ControlEvent::KeyUp(code) => self.key_up(code),
        };

        self.enforce_cancellation();
        changed
    }

    /// Advance timers to `now_ms`: stale keys, repeat ticks, then gravity.
    pub fn frame(&mut self, now_ms: u64) -> Option<MoveOutcome> {
        self.expire_stale_keys(now_ms);

        for command in self.repeats.poll(now_ms) {
            self.apply(command);
        }

        let gravity = self.scheduler.frame(now_ms, &mut self.session);
        self.enforce_cancellation();
        gravity
    }

    /// Cancel every timer; used when the host tears down.
    pub fn shutdown(&mut self) {
        self.cancel_timers();
        self.held.clear();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        self.session.snapshot()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.session.snapshot_into(out);
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.session.take_notifications()
    }

    fn apply(&mut self, command: GameCommand) -> bool {
        let changed = self.session.apply(command);
        if self.session.game_over() {
            self.cancel_timers();
        }
        changed
    }

    fn start_repeat(&mut self, key: RepeatKey, now_ms: u64) -> bool {
        if !self.session.is_running() {
            return false;
        }
        let mut changed = false;
        for command in self.repeats.start_repeat(key, now_ms) {
            // The immediate move may have ended the game.
            if !self.session.is_running() {
                break;
            }
            changed |= self.apply(command);
        }
        changed
    }

    fn stop_repeat(&mut self, key: RepeatKey) -> bool {
        match self.repeats.stop_repeat(key) {
            Some(command) => self.apply(command),
            None => false,
        }
    }

    fn key_down(&mut self, code: KeyCode, now_ms: u64) -> bool {
        let fresh = self.held.press(code, now_ms);
        let Some(binding) = binding_for(code) else {
            return false;
        };
        if !self.session.is_running() && !binding.allowed_when_idle() {
            return false;
        }

        match binding {
            // Already-active repeats ignore the OS auto-repeat on their own.
            Binding::Repeat(key) => self.start_repeat(key, now_ms),
            Binding::Rotate if fresh => self.apply(GameCommand::Rotate),
            Binding::Pause if fresh => self.apply(GameCommand::TogglePause),
            Binding::Start if fresh && !self.session.started() => self.apply(GameCommand::Start),
            _ => false,
        }
    }

    fn key_up(&mut self, code: KeyCode) -> bool {
        self.held.release(code);
        match binding_for(code) {
            Some(Binding::Repeat(key)) => self.stop_repeat(key),
            _ => false,
        }
    }

    fn expire_stale_keys(&mut self, now_ms: u64) {
        for code in self.held.expire(now_ms) {
            debug!("releasing stale key {:?}", code);
            if let Some(Binding::Repeat(key)) = binding_for(code) {
                self.stop_repeat(key);
            }
        }
    }

    fn enforce_cancellation(&mut self) {
        if !self.session.started() && self.outstanding_timers() > 0 {
            self.cancel_timers();
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(command) = self.repeats.cancel_all() {
            self.session.apply(command);
        }
        self.scheduler.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Position;
    use crate::types::PieceKind;

    fn driver() -> GameDriver {
        GameDriver::new(&SessionConfig::default().with_seed(11))
    }

    fn running() -> GameDriver {
        let mut d = driver();
        d.dispatch(ControlEvent::StartGame, 0);
        d
    }

    fn x(d: &GameDriver) -> i8 {
        d.session().active().unwrap().position.x
    }

    #[test]
    fn test_idle_driver_ignores_movement_keys() {
        let mut d = driver();
        assert!(!d.dispatch(ControlEvent::KeyDown(KeyCode::Left), 0));
        assert_eq!(d.repeats().active_timers(), 0);
        assert!(!d.wants_frames());
    }

    #[test]
    fn test_enter_starts_game() {
        let mut d = driver();
        assert!(d.dispatch(ControlEvent::KeyDown(KeyCode::Enter), 0));
        assert!(d.session().is_running());
        assert!(d.wants_frames());

        // Enter mid-game does not restart.
        assert!(!d.dispatch(ControlEvent::KeyDown(KeyCode::Enter), 10));
        assert_eq!(d.session().episode_id(), 1);
    }

    #[test]
    fn test_held_left_moves_then_repeats() {
        let mut d = running();
        d.session_mut().set_active(PieceKind::O, 0, Position::new(8, 5));

        d.dispatch(ControlEvent::KeyDown(KeyCode::Left), 0);
        assert_eq!(x(&d), 7);

        d.frame(160);
        assert_eq!(x(&d), 7);
        d.frame(208);
        assert_eq!(x(&d), 6);
        d.frame(256);
        assert_eq!(x(&d), 5);

        d.dispatch(ControlEvent::KeyUp(KeyCode::Left), 260);
        d.frame(400);
        assert_eq!(x(&d), 5);
        assert_eq!(d.repeats().active_timers(), 0);
    }

    #[test]
    fn test_os_repeat_does_not_rerotate() {
        let mut d = running();
        d.session_mut().set_active(PieceKind::T, 0, Position::new(3, 5));

        d.dispatch(ControlEvent::KeyDown(KeyCode::Up), 0);
        d.dispatch(ControlEvent::KeyDown(KeyCode::Up), 30);
        d.dispatch(ControlEvent::KeyDown(KeyCode::Up), 60);
        assert_eq!(d.session().active().unwrap().rotation, 1);

        d.dispatch(ControlEvent::KeyUp(KeyCode::Up), 90);
        d.dispatch(ControlEvent::KeyDown(KeyCode::Up), 120);
        assert_eq!(d.session().active().unwrap().rotation, 2);
    }

    #[test]
    fn test_soft_drop_sets_and_clears_fast_drop() {
        let mut d = running();
        d.dispatch(ControlEvent::KeyDown(KeyCode::Down), 0);
        assert!(d.session().fast_drop());
        assert_eq!(d.session().active().unwrap().position.y, 1);

        d.dispatch(ControlEvent::KeyUp(KeyCode::Down), 20);
        assert!(!d.session().fast_drop());
    }

    #[test]
    fn test_pause_suspends_mutation_but_not_repeat_timers() {
        let mut d = running();
        d.session_mut().set_active(PieceKind::O, 0, Position::new(4, 5));
        d.frame(0);

        d.dispatch(ControlEvent::KeyDown(KeyCode::Right), 0);
        assert_eq!(x(&d), 5);
        d.dispatch(ControlEvent::KeyDown(KeyCode::Char('p')), 10);
        assert!(d.session().paused());

        // Timers still tick while paused, but the moves are no-ops.
        d.frame(300);
        assert_eq!(x(&d), 5);
        assert_eq!(d.session().active().unwrap().position.y, 5);
        assert!(d.repeats().is_active(RepeatKey::Right));
        assert!(d.wants_frames());

        // Resume while still holding Right: the next tick moves again.
        d.dispatch(ControlEvent::KeyUp(KeyCode::Char('p')), 310);
        d.dispatch(ControlEvent::KeyDown(KeyCode::Char('P')), 320);
        assert!(d.session().is_running());
        d.frame(350);
        assert_eq!(x(&d), 6);
    }

    #[test]
    fn test_game_over_cancels_all_timers() {
        let mut d = running();
        d.session_mut().board_mut().fill_row(2, 1);
        d.session_mut().board_mut().set(9, 2, 0);
        d.session_mut().set_active(PieceKind::O, 0, Position::new(0, 0));

        d.dispatch(ControlEvent::KeyDown(KeyCode::Right), 0);
        d.dispatch(ControlEvent::KeyDown(KeyCode::Down), 5);
        assert!(d.session().game_over());
        assert_eq!(d.outstanding_timers(), 0);
        assert!(!d.session().fast_drop());
        assert!(!d.wants_frames());

        // Only start is honoured now.
        assert!(!d.dispatch(ControlEvent::KeyDown(KeyCode::Left), 10));
        assert!(d.dispatch(ControlEvent::KeyDown(KeyCode::Enter), 20));
        assert!(d.session().is_running());
    }

    #[test]
    fn test_stale_key_expires_when_no_release_arrives() {
        let config = SessionConfig {
            key_release_timeout_ms: Some(100),
            ..SessionConfig::default().with_seed(3)
        };
        let mut d = GameDriver::new(&config);
        d.dispatch(ControlEvent::StartGame, 0);

        d.dispatch(ControlEvent::KeyDown(KeyCode::Down), 0);
        assert!(d.session().fast_drop());

        d.frame(101);
        assert!(!d.session().fast_drop());
        assert!(!d.repeats().is_active(RepeatKey::SoftDrop));
        assert!(d.held_keys().is_empty());
    }

    #[test]
    fn test_direct_commands() {
        let mut d = running();
        d.session_mut().set_active(PieceKind::T, 0, Position::new(3, 5));

        assert!(d.dispatch(ControlEvent::MovePiece { dx: 1, dy: 0 }, 0));
        assert!(d.dispatch(ControlEvent::RotatePiece, 0));
        assert!(d.dispatch(ControlEvent::StartKeyRepeat(RepeatKey::Left), 0));
        assert!(d.repeats().is_active(RepeatKey::Left));
        d.dispatch(ControlEvent::StopKeyRepeat(RepeatKey::Left), 0);
        d.dispatch(ControlEvent::StopKeyRepeat(RepeatKey::Left), 0);
        assert_eq!(d.repeats().active_timers(), 0);
        assert!(d.dispatch(ControlEvent::TogglePause, 0));
        assert!(d.session().paused());
    }

    #[test]
    fn test_shutdown_leaves_nothing_outstanding() {
        let mut d = running();
        d.frame(0);
        d.dispatch(ControlEvent::KeyDown(KeyCode::Left), 0);
        d.dispatch(ControlEvent::KeyDown(KeyCode::Down), 0);

        d.shutdown();
        assert_eq!(d.outstanding_timers(), 0);
    }
}
