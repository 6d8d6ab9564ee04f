//! Domain-level errors.
//!
//! These are lifecycle violations raised on the Rust side of the boundary.
//! Backing stream failures never become an `AdapterError`; they are turned
//! into status codes by [`crate::domain::translate`].

use core::fmt;

use crate::domain::value_objects::HResult;

/// Errors raised by the owner-facing lifecycle API of a `ManagedStream`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AdapterError {
    /// The reference count already reached zero; the native object is gone.
    ///
    /// This is a programming error by the owner (a release too many, or use
    /// after the final release), not an I/O condition.
    Disposed,

    /// Adding a reference would overflow the counter.
    RefCountOverflow,
}

impl AdapterError {
    /// Status reported if this error ever has to be expressed natively.
    pub const fn status(&self) -> HResult {
        match self {
            Self::Disposed => HResult::RO_E_CLOSED,
            Self::RefCountOverflow => HResult::E_FAIL,
        }
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disposed => write!(f, "Stream object has already been released"),
            Self::RefCountOverflow => write!(f, "Reference count overflow"),
        }
    }
}

impl core::error::Error for AdapterError {}
