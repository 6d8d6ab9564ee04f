//! ByteStream port - Secondary (driven) port for the wrapped stream.
//!
//! This port defines what the adapter needs from the stream it exposes to
//! native code. Adapters implement it for in-memory buffers, files, and
//! `embedded-io` streams.

use core::fmt;
use std::io::{self, SeekFrom};

use crate::domain::value_objects::HResult;

/// Failure class of a backing stream error, as far as status translation
/// cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// The volume or buffer has no room left.
    StorageFull,
    /// The error already carries a native status.
    Status(HResult),
    /// Any other I/O failure.
    Other,
}

impl Fault {
    /// `true` when the fault means there is no room left, either directly or
    /// through a carried disk-full status.
    #[inline]
    pub const fn is_storage_full(self) -> bool {
        match self {
            Fault::StorageFull => true,
            Fault::Status(status) => status.is_disk_full(),
            Fault::Other => false,
        }
    }
}

/// Classification of backing stream errors.
pub trait ClassifyFault: fmt::Debug {
    /// How this error should be translated at the native boundary.
    fn fault(&self) -> Fault;

    /// `true` if the operation may simply be retried.
    fn is_interrupted(&self) -> bool {
        false
    }
}

impl ClassifyFault for io::Error {
    fn fault(&self) -> Fault {
        if self.kind() == io::ErrorKind::StorageFull {
            return Fault::StorageFull;
        }
        match self.get_ref().and_then(|inner| inner.downcast_ref::<HResult>()) {
            Some(status) if status.is_failure() => Fault::Status(*status),
            _ => Fault::Other,
        }
    }

    fn is_interrupted(&self) -> bool {
        self.kind() == io::ErrorKind::Interrupted
    }
}

/// Port for the seekable byte stream behind a `ManagedStream`.
///
/// This is a **secondary (driven) port** in hexagonal architecture terms.
/// The adapter owns exactly one implementation and drives it from whatever
/// thread the native caller uses, so implementations must be `Send`.
///
/// # Hexagonal Architecture
///
/// ```text
/// ┌─────────────────────┐
/// │  Native caller      │
/// │  (IStream vtable)   │
/// └──────────┬──────────┘
///            │ dispatches to
///            ▼
/// ┌─────────────────────┐
/// │  ManagedStream<S>   │
/// └──────────┬──────────┘
///            │ depends on
///            ▼
/// ┌─────────────────────┐
/// │  ByteStream Port    │  ◄── This trait
/// └──────────┬──────────┘
///            │ implemented by
///            ▼
/// ┌─────────────────────┐
/// │  Cursor, FileStream │
/// │  EmbeddedIoStream   │
/// └─────────────────────┘
/// ```
pub trait ByteStream: Send + 'static {
    /// The error type for stream operations.
    type Error: ClassifyFault;

    /// Read up to `buf.len()` bytes at the current position.
    ///
    /// Returns the number of bytes read; 0 means no data is available right
    /// now, which callers treat the same as end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write up to `buf.len()` bytes at the current position.
    ///
    /// Returns the number of bytes accepted; 0 means nothing more fits.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;

    /// Move the position and return the new absolute offset.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error>;

    /// Total length in bytes.
    fn length(&mut self) -> Result<u64, Self::Error>;

    /// Truncate or extend the stream to exactly `size` bytes.
    fn set_len(&mut self, size: u64) -> Result<(), Self::Error>;

    /// Whether reads are currently possible.
    fn can_read(&self) -> bool;

    /// Whether writes are currently possible.
    fn can_write(&self) -> bool;
}
