//! The safe form of the `IStream` method set.
//!
//! The trampolines in [`super::vtable`] validate native pointers, turn them
//! into slices and output values, and call these methods on the instance the
//! header token resolves to.

use core::ptr::NonNull;

use crate::domain::{AdapterError, Guid, HResult, StatStg};

use super::foreign::ForeignStream;
use super::object::RawStream;

/// Status plus byte count of a single `Read` or `Write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Native status of the call.
    pub status: HResult,
    /// Bytes actually transferred, also on failure.
    pub count: u32,
}

impl Transfer {
    /// A transfer of `count` bytes that ended with `status`.
    #[inline]
    pub const fn new(status: HResult, count: u32) -> Self {
        Self { status, count }
    }
}

/// Status plus cumulative counters of a `CopyTo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Native status of the call.
    pub status: HResult,
    /// Bytes read from the source.
    pub read: u64,
    /// Bytes the target reported as written.
    pub written: u64,
}

impl Default for CopyOutcome {
    fn default() -> Self {
        Self {
            status: HResult::S_OK,
            read: 0,
            written: 0,
        }
    }
}

impl CopyOutcome {
    /// The same counters with a different final status.
    #[inline]
    pub const fn with_status(self, status: HResult) -> Self {
        Self { status, ..self }
    }
}

/// Every operation of the `IStream` dispatch table, in table order.
///
/// Implemented by `ManagedStream`; the registry stores instances as
/// `Arc<dyn StreamMethods>` so the trampolines stay non-generic.
pub trait StreamMethods: Send + Sync {
    /// Answer an identity query. On success the reference count has been
    /// incremented and the shared object pointer is returned.
    ///
    /// Unknown identifiers fail with `E_NOINTERFACE`; a failed implicit
    /// add-ref fails with `E_FAIL`.
    fn query_interface(&self, iid: &Guid) -> Result<NonNull<RawStream>, HResult>;

    /// Add a reference and return the new count.
    fn add_ref(&self) -> Result<u32, AdapterError>;

    /// Drop a reference and return the new count. The call that reaches zero
    /// frees the native header.
    fn release(&self) -> Result<u32, AdapterError>;

    /// Fill `buf` from the current position. `S_FALSE` reports a short read.
    fn read(&self, buf: &mut [u8]) -> Transfer;

    /// Write all of `buf` at the current position.
    fn write(&self, buf: &[u8]) -> Transfer;

    /// Move the position. `origin` is the raw `STREAM_SEEK_*` value.
    fn seek(&self, offset: i64, origin: u32) -> Result<u64, HResult>;

    /// Truncate or extend to exactly `size` bytes.
    fn set_size(&self, size: u64) -> HResult;

    /// Copy up to `count` bytes from the current position into `target`.
    fn copy_to(&self, target: &ForeignStream, count: u64) -> CopyOutcome;

    /// Commit buffered changes.
    fn commit(&self, flags: u32) -> HResult;

    /// Discard buffered changes.
    fn revert(&self) -> HResult;

    /// Lock a byte range.
    fn lock_region(&self, offset: u64, len: u64, lock_type: u32) -> HResult;

    /// Unlock a byte range.
    fn unlock_region(&self, offset: u64, len: u64, lock_type: u32) -> HResult;

    /// Describe the stream.
    fn stat(&self, flags: u32) -> Result<StatStg, HResult>;

    /// Create an independent stream over the same bytes.
    fn clone_stream(&self) -> Result<NonNull<RawStream>, HResult>;
}
