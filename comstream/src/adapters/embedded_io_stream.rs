//! Backing stream over `embedded-io` traits.
//!
//! Lets any blocking `embedded_io::{Read, Write, Seek}` implementation, such
//! as a file on an embedded filesystem, be exposed as a native stream.

use core::fmt;
use std::io::SeekFrom;

use embedded_io::{Error as _, ErrorKind, ErrorType, Read, Seek, Write};

use crate::domain::{ByteStream, ClassifyFault, Fault};

/// Error of an [`EmbeddedIoStream`].
#[derive(Debug)]
pub enum EmbeddedIoError<E> {
    /// The wrapped stream failed.
    Io(E),
    /// The operation has no `embedded-io` equivalent.
    Unsupported,
}

impl<E: fmt::Debug> fmt::Display for EmbeddedIoError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {:?}", e),
            Self::Unsupported => write!(f, "Operation not supported by the wrapped stream"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for EmbeddedIoError<E> {}

impl<E: embedded_io::Error> ClassifyFault for EmbeddedIoError<E> {
    fn fault(&self) -> Fault {
        match self {
            Self::Io(e) => match e.kind() {
                ErrorKind::WriteZero | ErrorKind::OutOfMemory => Fault::StorageFull,
                _ => Fault::Other,
            },
            Self::Unsupported => Fault::Other,
        }
    }

    fn is_interrupted(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == ErrorKind::Interrupted)
    }
}

impl<E> From<E> for EmbeddedIoError<E> {
    fn from(e: E) -> Self {
        Self::Io(e)
    }
}

fn convert_seek_from(pos: SeekFrom) -> embedded_io::SeekFrom {
    match pos {
        SeekFrom::Start(n) => embedded_io::SeekFrom::Start(n),
        SeekFrom::End(n) => embedded_io::SeekFrom::End(n),
        SeekFrom::Current(n) => embedded_io::SeekFrom::Current(n),
    }
}

/// Wrapper giving an `embedded-io` stream the capability flags the native
/// side needs.
///
/// `embedded-io` has no truncate operation, so resizing always fails.
pub struct EmbeddedIoStream<T> {
    inner: T,
    readable: bool,
    writable: bool,
}

impl<T> EmbeddedIoStream<T> {
    /// Wrap a stream that is both readable and writable.
    pub fn new(inner: T) -> Self {
        Self::with_access(inner, true, true)
    }

    /// Wrap a stream with explicit capabilities.
    pub fn with_access(inner: T, readable: bool, writable: bool) -> Self {
        Self {
            inner,
            readable,
            writable,
        }
    }

    /// Get a reference to the inner stream.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Consume the wrapper and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> ByteStream for EmbeddedIoStream<T>
where
    T: Read + Write + Seek + Send + 'static,
{
    type Error = EmbeddedIoError<<T as ErrorType>::Error>;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(self.inner.read(buf)?)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Ok(self.inner.write(buf)?)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        Ok(self.inner.seek(convert_seek_from(pos))?)
    }

    fn length(&mut self) -> Result<u64, Self::Error> {
        let position = self.inner.seek(embedded_io::SeekFrom::Current(0))?;
        let end = self.inner.seek(embedded_io::SeekFrom::End(0))?;
        self.inner.seek(embedded_io::SeekFrom::Start(position))?;
        Ok(end)
    }

    fn set_len(&mut self, _size: u64) -> Result<(), Self::Error> {
        Err(EmbeddedIoError::Unsupported)
    }

    fn can_read(&self) -> bool {
        self.readable
    }

    fn can_write(&self) -> bool {
        self.writable
    }
}
