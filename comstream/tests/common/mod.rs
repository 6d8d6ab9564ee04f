//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::io::{self, SeekFrom};
use std::ptr::NonNull;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use comstream::{ByteStream, HResult, IStreamVtbl, RawStream};

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The dispatch table behind a native pointer.
pub fn vtbl(raw: NonNull<RawStream>) -> &'static IStreamVtbl {
    unsafe { &*raw.as_ref().vtbl }
}

/// Failure injected into a [`MockStream`] operation.
#[derive(Debug, Clone, Copy)]
pub enum Inject {
    Kind(io::ErrorKind),
    Status(HResult),
}

impl Inject {
    fn error(self) -> io::Error {
        match self {
            Inject::Kind(kind) => io::Error::from(kind),
            Inject::Status(status) => io::Error::other(status),
        }
    }
}

/// In-memory stream with knobs for every failure the adapter translates.
#[derive(Default)]
pub struct MockStream {
    pub data: Vec<u8>,
    pub pos: usize,
    pub unreadable: bool,
    pub unwritable: bool,
    /// Writes past this size fail with `StorageFull` once nothing fits.
    pub capacity: Option<usize>,
    /// Largest number of bytes returned by one backing read.
    pub read_limit: Option<usize>,
    pub read_error: Option<Inject>,
    pub write_error: Option<Inject>,
    pub resize_error: Option<Inject>,
    pub length_error: Option<Inject>,
    /// Number of `Interrupted` errors returned before reads succeed.
    pub interrupts: usize,
    pub panic_on_read: bool,
    /// Backing writes that report success without accepting a byte.
    pub accept_nothing: bool,
    /// Largest buffer handed to one backing write so far.
    pub largest_write: usize,
    pub drops: Option<DropCounter>,
}

/// Bumps a shared counter when the stream owning it is dropped.
pub struct DropCounter(Arc<AtomicUsize>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

impl MockStream {
    pub fn with_data(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
            ..Self::default()
        }
    }

    /// A stream that counts how often it is dropped.
    pub fn counted(data: &[u8]) -> (Self, Arc<AtomicUsize>) {
        let drops = Arc::new(AtomicUsize::new(0));
        let stream = Self {
            data: data.to_vec(),
            drops: Some(DropCounter(drops.clone())),
            ..Self::default()
        };
        (stream, drops)
    }
}

impl ByteStream for MockStream {
    type Error = io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if self.panic_on_read {
            panic!("backing stream exploded");
        }
        if self.interrupts > 0 {
            self.interrupts -= 1;
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        if let Some(inject) = self.read_error {
            return Err(inject.error());
        }
        let available = self.data.len().saturating_sub(self.pos);
        let n = buf
            .len()
            .min(available)
            .min(self.read_limit.unwrap_or(usize::MAX));
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if let Some(inject) = self.write_error {
            return Err(inject.error());
        }
        self.largest_write = self.largest_write.max(buf.len());
        if self.accept_nothing {
            return Ok(0);
        }
        let room = self
            .capacity
            .map_or(usize::MAX, |cap| cap.saturating_sub(self.pos));
        if room == 0 && !buf.is_empty() {
            return Err(io::Error::from(io::ErrorKind::StorageFull));
        }
        let n = buf.len().min(room);
        let end = self.pos + n;
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[self.pos..end].copy_from_slice(&buf[..n]);
        self.pos = end;
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let target = match pos {
            SeekFrom::Start(n) => i64::try_from(n).ok(),
            SeekFrom::End(n) => (self.data.len() as i64).checked_add(n),
            SeekFrom::Current(n) => (self.pos as i64).checked_add(n),
        };
        match target {
            Some(p) if p >= 0 => {
                self.pos = p as usize;
                Ok(p as u64)
            }
            _ => Err(io::Error::from(io::ErrorKind::InvalidInput)),
        }
    }

    fn length(&mut self) -> Result<u64, Self::Error> {
        if let Some(inject) = self.length_error {
            return Err(inject.error());
        }
        Ok(self.data.len() as u64)
    }

    fn set_len(&mut self, size: u64) -> Result<(), Self::Error> {
        if let Some(inject) = self.resize_error {
            return Err(inject.error());
        }
        let size = size as usize;
        if self.capacity.is_some_and(|cap| size > cap) {
            return Err(io::Error::from(io::ErrorKind::StorageFull));
        }
        self.data.resize(size, 0);
        Ok(())
    }

    fn can_read(&self) -> bool {
        !self.unreadable
    }

    fn can_write(&self) -> bool {
        !self.unwritable
    }
}
