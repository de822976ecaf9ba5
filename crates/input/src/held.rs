//! Raw keys currently held down.
//!
//! Terminals and operating systems re-send key-down while a key is held. The
//! held set makes one-shot bindings (rotate, pause) fire once per physical
//! press: a key-down for a key already in the set is reported as a repeat.
//!
//! Some terminals never emit key-release events. With a release timeout
//! configured, a key that has not been re-reported within the timeout is
//! expired by [`HeldKeys::expire`] and should be treated as released.

use arrayvec::ArrayVec;
use crossterm::event::KeyCode;
use log::trace;

const MAX_HELD: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeldKey {
    code: KeyCode,
    last_seen_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    keys: ArrayVec<HeldKey, MAX_HELD>,
    release_timeout_ms: Option<u64>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release_timeout_ms(mut self, timeout_ms: Option<u64>) -> Self {
        self.release_timeout_ms = timeout_ms.filter(|&ms| ms > 0);
        self
    }

    pub fn release_timeout_ms(&self) -> Option<u64> {
        self.release_timeout_ms
    }

    /// Record a key-down. Returns true for a fresh press, false for an
    /// auto-repeat of a key that is already held.
    pub fn press(&mut self, code: KeyCode, now_ms: u64) -> bool {
        if let Some(held) = self.keys.iter_mut().find(|k| k.code == code) {
            held.last_seen_ms = now_ms;
            return false;
        }
        if self
            .keys
            .try_push(HeldKey {
                code,
                last_seen_ms: now_ms,
            })
            .is_err()
        {
            trace!("held set full, not tracking {:?}", code);
        }
        true
    }

    /// Record a key-up. Returns whether the key was held.
    pub fn release(&mut self, code: KeyCode) -> bool {
        match self.keys.iter().position(|k| k.code == code) {
            Some(index) => {
                self.keys.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, code: KeyCode) -> bool {
        self.keys.iter().any(|k| k.code == code)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Remove and return keys not re-reported within the release timeout.
    ///
    /// Always empty when no timeout is configured.
    pub fn expire(&mut self, now_ms: u64) -> ArrayVec<KeyCode, MAX_HELD> {
        let mut expired = ArrayVec::new();
        let Some(timeout) = self.release_timeout_ms else {
            return expired;
        };
        self.keys.retain(|k| {
            if now_ms.saturating_sub(k.last_seen_ms) > timeout {
                expired.push(k.code);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }
}
