//! File-backed stream.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::debug;

use crate::domain::{AccessMode, ByteStream, HResult};

/// A `std::fs::File` with the access it was opened for.
///
/// Capabilities come from the open mode rather than from probing the file.
/// After [`FileStream::close`] the stream reports neither capability and
/// every operation fails with `STG_E_REVERTED`.
#[derive(Debug)]
pub struct FileStream {
    file: Option<File>,
    access: AccessMode,
}

impl FileStream {
    /// Open an existing file.
    pub fn open(path: impl AsRef<Path>, access: AccessMode) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(access != AccessMode::Write)
            .write(access != AccessMode::Read)
            .open(path)?;
        debug!("Opened {} for {:?}", path.display(), access);
        Ok(Self::from_file(file, access))
    }

    /// Create or truncate a file for reading and writing.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        debug!("Created {}", path.display());
        Ok(Self::from_file(file, AccessMode::ReadWrite))
    }

    /// Wrap an already opened file. `access` must match how it was opened.
    pub fn from_file(file: File, access: AccessMode) -> Self {
        Self {
            file: Some(file),
            access,
        }
    }

    /// Access the stream was opened with.
    pub fn access(&self) -> AccessMode {
        self.access
    }

    /// Close the file. Later operations fail.
    pub fn close(&mut self) {
        self.file = None;
    }

    /// Whether [`FileStream::close`] was called.
    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Unwrap the file, if still open.
    pub fn into_inner(self) -> Option<File> {
        self.file
    }

    fn file(&mut self) -> io::Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other(HResult::STG_E_REVERTED))
    }
}

impl ByteStream for FileStream {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.file()?.read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.file()?.write(buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        self.file()?.seek(pos)
    }

    fn length(&mut self) -> Result<u64, Self::Error> {
        Ok(self.file()?.metadata()?.len())
    }

    fn set_len(&mut self, size: u64) -> Result<(), Self::Error> {
        self.file()?.set_len(size)
    }

    fn can_read(&self) -> bool {
        self.file.is_some() && self.access != AccessMode::Write
    }

    fn can_write(&self) -> bool {
        self.file.is_some() && self.access != AccessMode::Read
    }
}
