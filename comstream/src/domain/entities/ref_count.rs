//! Reference count entity governing the adapter lifecycle.

use core::sync::atomic::{AtomicU32, Ordering};

/// Outcome of a reference count change.
///
/// The count moves through these states:
/// - StillAlive: at least one reference remains
/// - FinalRelease: this change took the count from 1 to 0
/// - AlreadyDisposed: the count was already 0, nothing changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefCountResult {
    /// The count was updated and is still positive.
    StillAlive(u32),
    /// The count reached zero with this change. Exactly one caller ever
    /// observes this.
    FinalRelease,
    /// The count was already zero.
    AlreadyDisposed,
    /// Incrementing would overflow the counter.
    Overflow,
}

/// Atomic, lock-free reference count.
///
/// Starts at 1 (the creator's reference). Once it reaches 0 it stays there:
/// increments after the final release fail instead of resurrecting the
/// object.
#[derive(Debug)]
pub struct RefCount(AtomicU32);

impl RefCount {
    /// A count holding the creator's single reference.
    pub const fn new() -> Self {
        Self(AtomicU32::new(1))
    }

    /// Current value. Only a snapshot when other threads hold references.
    #[inline]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    /// `true` once the final release happened.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.get() == 0
    }

    /// Add one reference.
    pub fn increment(&self) -> RefCountResult {
        self.alter(1)
    }

    /// Drop one reference.
    pub fn decrement(&self) -> RefCountResult {
        self.alter(-1)
    }

    fn alter(&self, delta: i32) -> RefCountResult {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return RefCountResult::AlreadyDisposed;
            }
            let Some(next) = current.checked_add_signed(delta) else {
                return RefCountResult::Overflow;
            };
            match self
                .0
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) if next == 0 => return RefCountResult::FinalRelease,
                Ok(_) => return RefCountResult::StillAlive(next),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for RefCount {
    fn default() -> Self {
        Self::new()
    }
}
