//! Process-wide token registry.
//!
//! Native headers never store the address of a Rust object. They store a
//! token, and every dispatched call resolves the token here to the live
//! adapter instance. Tokens come from a monotonically increasing counter and
//! are never reused, so a stale token can only fail to resolve, never alias a
//! newer instance.

use core::fmt;
use core::num::NonZeroUsize;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::methods::StreamMethods;

/// Opaque identity of a live adapter instance, stored in header word 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(NonZeroUsize);

impl Token {
    /// The raw value written into the native header.
    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }

    #[inline]
    pub(crate) const fn from_raw(raw: usize) -> Option<Self> {
        match NonZeroUsize::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type Entry = Arc<dyn StreamMethods>;

static NEXT_TOKEN: AtomicUsize = AtomicUsize::new(1);
static LIVE: RwLock<BTreeMap<Token, Entry>> = RwLock::new(BTreeMap::new());

/// Hand out a fresh token.
pub(crate) fn allocate_token() -> Token {
    let raw = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    // Wrapping would take 2^64 wrapped streams on 64-bit targets.
    Token::from_raw(raw).unwrap_or_else(|| panic!("stream token space exhausted"))
}

/// Make `object` reachable through `token`.
pub(crate) fn register(token: Token, object: Entry) {
    let previous = LIVE.write().insert(token, object);
    debug_assert!(previous.is_none(), "token {} registered twice", token);
}

/// Remove `token`, returning the instance so the caller controls where it is
/// dropped (never under the registry lock).
pub(crate) fn unregister(token: Token) -> Option<Entry> {
    LIVE.write().remove(&token)
}

/// Resolve `token` to a strong handle. The handle keeps the instance alive
/// for the duration of a dispatched call even if another thread performs the
/// final release meanwhile.
pub(crate) fn resolve(token: Token) -> Option<Entry> {
    LIVE.read().get(&token).cloned()
}

/// Whether `token` still names a live instance.
pub fn is_registered(token: Token) -> bool {
    LIVE.read().contains_key(&token)
}

/// Number of instances currently reachable from native code.
pub fn live_objects() -> usize {
    LIVE.read().len()
}
