//! Key repeat controller for held movement keys.
//!
//! Each repeatable key owns at most one timer. Pressing a key emits its
//! command immediately and arms a one-shot delay; once the delay elapses the
//! timer switches to a fixed interval and emits the command on every tick
//! until the key is released. The first repeat therefore lands at
//! `delay + interval` after the press.
//!
//! Time is virtual: the caller passes a monotonic millisecond timestamp to
//! [`KeyRepeatController::poll`] every frame, so tests can step the clock
//! deterministically.

use arrayvec::ArrayVec;
use log::debug;

use crate::types::{GameCommand, RepeatKey, KEY_REPEAT_DELAY_MS, KEY_REPEAT_INTERVAL_MS};

/// Upper bound on ticks one key may emit in a single poll. A stalled clock
/// drops the overdue ticks beyond this instead of bursting them.
const MAX_CATCH_UP: usize = 10;

const MAX_DUE: usize = 32;
const _: () = assert!(RepeatKey::COUNT * MAX_CATCH_UP <= MAX_DUE);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RepeatPhase {
    /// Waiting for the initial delay to elapse
    Delay { fires_at: u64 },
    /// Recurring interval is active
    Repeating { next_at: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RepeatTimer {
    key: RepeatKey,
    phase: RepeatPhase,
}

/// Registry of the repeat timers for every repeatable key.
#[derive(Debug, Clone)]
pub struct KeyRepeatController {
    timers: [Option<RepeatTimer>; RepeatKey::COUNT],
    delay_ms: u64,
    interval_ms: u64,
}

impl KeyRepeatController {
    pub fn new() -> Self {
        Self::with_config(KEY_REPEAT_DELAY_MS, KEY_REPEAT_INTERVAL_MS)
    }

    pub fn with_config(delay_ms: u64, interval_ms: u64) -> Self {
        Self {
            timers: [None; RepeatKey::COUNT],
            delay_ms,
            // A zero interval would never advance.
            interval_ms: interval_ms.max(1),
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_active(&self, key: RepeatKey) -> bool {
        self.timers[key.index()].is_some()
    }

    /// Number of keys with a pending delay or recurring interval
    pub fn active_timers(&self) -> usize {
        self.timers.iter().filter(|t| t.is_some()).count()
    }

    /// Begin repeating `key`.
    ///
    /// Returns the commands to apply right now: the key's own command and,
    /// for soft drop, raising the fast-drop flag. Starting a key that is
    /// already repeating returns nothing and leaves its timer alone.
    pub fn start_repeat(&mut self, key: RepeatKey, now_ms: u64) -> ArrayVec<GameCommand, 2> {
        let mut commands = ArrayVec::new();
        let slot = &mut self.timers[key.index()];
        if slot.is_some() {
            return commands;
        }

        *slot = Some(RepeatTimer {
            key,
            phase: RepeatPhase::Delay {
                fires_at: now_ms.saturating_add(self.delay_ms),
            },
        });
        debug!("repeat armed for {} at {}ms", key.as_str(), now_ms);

        commands.push(key.command());
        if key.is_fast_drop() {
            commands.push(GameCommand::SetFastDrop(true));
        }
        commands
    }

    /// Cancel the delay and interval for `key`.
    ///
    /// Returns `SetFastDrop(false)` when releasing soft drop. Safe to call
    /// for a key that is not repeating.
    pub fn stop_repeat(&mut self, key: RepeatKey) -> Option<GameCommand> {
        if self.timers[key.index()].take().is_some() {
            debug!("repeat stopped for {}", key.as_str());
        }
        key.is_fast_drop().then_some(GameCommand::SetFastDrop(false))
    }

    /// Emit every repeat tick due at or before `now_ms`, in firing order.
    pub fn poll(&mut self, now_ms: u64) -> ArrayVec<GameCommand, MAX_DUE> {
        let mut due = ArrayVec::<(u64, GameCommand), MAX_DUE>::new();
        let interval = self.interval_ms;

        for timer in self.timers.iter_mut().flatten() {
            if let RepeatPhase::Delay { fires_at } = timer.phase {
                if now_ms < fires_at {
                    continue;
                }
                timer.phase = RepeatPhase::Repeating {
                    next_at: fires_at.saturating_add(interval),
                };
            }

            let RepeatPhase::Repeating { next_at } = &mut timer.phase else {
                continue;
            };
            let mut emitted = 0;
            while *next_at <= now_ms {
                if emitted < MAX_CATCH_UP {
                    due.push((*next_at, timer.key.command()));
                    emitted += 1;
                }
                *next_at = next_at.saturating_add(interval);
            }
        }

        // Stable: keys firing at the same instant keep table order.
        due.sort_by_key(|&(at, _)| at);
        due.into_iter().map(|(_, command)| command).collect()
    }

    /// Drop every timer (game over, teardown). Returns `SetFastDrop(false)`
    /// if soft drop was held.
    pub fn cancel_all(&mut self) -> Option<GameCommand> {
        let had_soft_drop = self.is_active(RepeatKey::SoftDrop);
        let cancelled = self.active_timers();
        self.timers = [None; RepeatKey::COUNT];
        if cancelled > 0 {
            debug!("cancelled {} repeat timer(s)", cancelled);
        }
        had_soft_drop.then_some(GameCommand::SetFastDrop(false))
    }
}

impl Default for KeyRepeatController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: GameCommand = GameCommand::Move { dx: -1, dy: 0 };
    const RIGHT: GameCommand = GameCommand::Move { dx: 1, dy: 0 };
    const DOWN: GameCommand = GameCommand::Move { dx: 0, dy: 1 };

    #[test]
    fn test_press_fires_immediately_then_repeats_after_delay() {
        let mut rc = KeyRepeatController::new();

        assert_eq!(rc.start_repeat(RepeatKey::Left, 0).as_slice(), &[LEFT]);

        // Delay elapses at 150; the first repeat is one interval later.
        assert!(rc.poll(150).is_empty());
        assert!(rc.poll(199).is_empty());
        assert_eq!(rc.poll(200).as_slice(), &[LEFT]);
        assert!(rc.poll(249).is_empty());
        assert_eq!(rc.poll(250).as_slice(), &[LEFT]);
    }

    #[test]
    fn test_hold_for_one_second_counts() {
        let mut rc = KeyRepeatController::new();
        let mut count = rc.start_repeat(RepeatKey::Right, 0).len();
        let mut now = 0;
        while now <= 1000 {
            count += rc.poll(now).len();
            now += 16;
        }
        count += rc.poll(1000).len();
        // Immediate + ticks at 200, 250, ..., 1000.
        assert_eq!(count, 1 + 17);
    }

    #[test]
    fn test_duplicate_start_is_ignored() {
        let mut rc = KeyRepeatController::new();
        rc.start_repeat(RepeatKey::Left, 0);

        assert!(rc.start_repeat(RepeatKey::Left, 100).is_empty());
        // The original schedule stands.
        assert_eq!(rc.poll(200).as_slice(), &[LEFT]);
    }

    #[test]
    fn test_soft_drop_toggles_fast_drop() {
        let mut rc = KeyRepeatController::new();

        assert_eq!(
            rc.start_repeat(RepeatKey::SoftDrop, 0).as_slice(),
            &[DOWN, GameCommand::SetFastDrop(true)]
        );
        assert_eq!(rc.stop_repeat(RepeatKey::SoftDrop), Some(GameCommand::SetFastDrop(false)));
        assert_eq!(rc.active_timers(), 0);
    }

    #[test]
    fn test_stop_twice_is_safe() {
        let mut rc = KeyRepeatController::new();
        rc.start_repeat(RepeatKey::Left, 0);

        assert_eq!(rc.stop_repeat(RepeatKey::Left), None);
        assert_eq!(rc.stop_repeat(RepeatKey::Left), None);
        assert!(!rc.is_active(RepeatKey::Left));
        assert!(rc.poll(10_000).is_empty());
    }

    #[test]
    fn test_release_during_delay_cancels_repeat() {
        let mut rc = KeyRepeatController::new();
        rc.start_repeat(RepeatKey::Right, 0);
        assert!(rc.poll(100).is_empty());

        rc.stop_repeat(RepeatKey::Right);
        assert!(rc.poll(500).is_empty());
    }

    #[test]
    fn test_interleaved_keys_fire_in_time_order() {
        let mut rc = KeyRepeatController::new();
        rc.start_repeat(RepeatKey::Right, 0);
        rc.start_repeat(RepeatKey::Left, 20);

        // Right: 200, 250. Left: 220, 270.
        assert_eq!(rc.poll(280).as_slice(), &[RIGHT, LEFT, RIGHT, LEFT]);
    }

    #[test]
    fn test_stalled_clock_is_capped() {
        let mut rc = KeyRepeatController::new();
        rc.start_repeat(RepeatKey::Left, 0);

        assert_eq!(rc.poll(60_000).len(), MAX_CATCH_UP);
        // Missed ticks are dropped rather than replayed.
        assert!(rc.poll(60_010).is_empty());
    }

    #[test]
    fn test_every_key_stalled_fits_one_poll() {
        let mut rc = KeyRepeatController::new();
        for key in RepeatKey::ALL {
            rc.start_repeat(key, 0);
        }

        let due = rc.poll(60_000);
        assert_eq!(due.len(), RepeatKey::COUNT * MAX_CATCH_UP);
        assert_eq!(due.iter().filter(|&&c| c == DOWN).count(), MAX_CATCH_UP);
    }

    #[test]
    fn test_cancel_all_clears_every_timer() {
        let mut rc = KeyRepeatController::with_config(100, 25);
        rc.start_repeat(RepeatKey::Left, 0);
        rc.start_repeat(RepeatKey::SoftDrop, 0);
        assert_eq!(rc.active_timers(), 2);

        assert_eq!(rc.cancel_all(), Some(GameCommand::SetFastDrop(false)));
        assert_eq!(rc.active_timers(), 0);
        assert!(rc.poll(1_000).is_empty());
        assert_eq!(rc.cancel_all(), None);
    }
}
