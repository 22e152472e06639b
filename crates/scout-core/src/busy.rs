//! Scoped "working" flags.
//!
//! An interaction (a chat turn, a catalog query) holds a [`BusyGuard`] for
//! as long as it is outstanding. Dropping the guard clears the flag, so every
//! exit path, success, error or a dropped task, releases it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    held: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the flag, or `None` if the interaction is already in progress.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                held: self.held.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Releases its [`BusyFlag`] on drop.
#[derive(Debug)]
pub struct BusyGuard {
    held: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
    }
}
