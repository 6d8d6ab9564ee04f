//! In-memory backing stream.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use crate::domain::ByteStream;

/// A growable in-memory buffer. Always readable and writable.
///
/// Writing past the end extends the buffer, filling any gap with zeros.
impl ByteStream for Cursor<Vec<u8>> {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        Read::read(self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        Write::write(self, buf)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        Seek::seek(self, pos)
    }

    fn length(&mut self) -> Result<u64, Self::Error> {
        Ok(self.get_ref().len() as u64)
    }

    fn set_len(&mut self, size: u64) -> Result<(), Self::Error> {
        let size = usize::try_from(size).map_err(|_| io::Error::from(io::ErrorKind::StorageFull))?;
        let data = self.get_mut();
        if let Some(extra) = size.checked_sub(data.len()) {
            data.try_reserve(extra)
                .map_err(|_| io::Error::from(io::ErrorKind::StorageFull))?;
        }
        data.resize(size, 0);
        if self.position() > size as u64 {
            self.set_position(size as u64);
        }
        Ok(())
    }

    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        true
    }
}
