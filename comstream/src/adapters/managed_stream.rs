//! The stream adapter itself: one native `IStream` object per wrapped stream.

use core::ptr::{self, NonNull};
use core::sync::atomic::{AtomicPtr, Ordering};
use std::sync::Arc;

use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::domain::{
    translate, value_objects::is_supported_interface, AccessMode, AdapterConfig, AdapterError,
    ByteStream, ClassifyFault, Guid, HResult, RefCount, RefCountResult, SeekOrigin, StatStg,
};
use crate::infrastructure::native::{
    registry, ComObject, CopyOutcome, ForeignStream, RawStream, StreamMethods, Token, Transfer,
};

/// A seekable byte stream exposed to native code as an `IStream`.
///
/// Creating a `ManagedStream` allocates its native header and registers the
/// instance, with the reference count at 1 on behalf of the creator. That
/// reference is given up either by handing it to native code with
/// [`ManagedStream::into_raw`] or by calling [`StreamMethods::release`].
/// When the count reaches zero the header is freed and the instance becomes
/// unreachable from native code; the backing stream itself is dropped with
/// the last `Arc`.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use comstream::{ManagedStream, SeekOrigin, StreamMethods};
///
/// let stream = ManagedStream::new(Cursor::new(b"hello".to_vec()));
/// let native = stream.to_foreign().unwrap();
///
/// let mut buf = [0u8; 5];
/// assert_eq!(native.read(&mut buf).count, 5);
/// assert_eq!(&buf, b"hello");
/// assert_eq!(native.seek(0, SeekOrigin::Current), Ok(5));
///
/// drop(native);
/// stream.release().unwrap();
/// assert!(stream.is_disposed());
/// ```
pub struct ManagedStream<S: ByteStream> {
    stream: Mutex<S>,
    refs: RefCount,
    token: Token,
    header: AtomicPtr<ComObject>,
    config: AdapterConfig,
}

impl<S: ByteStream> ManagedStream<S> {
    /// Wrap `stream` with the default transfer sizes.
    pub fn new(stream: S) -> Arc<Self> {
        Self::with_config(stream, AdapterConfig::DEFAULT)
    }

    /// Wrap `stream` with explicit transfer sizes.
    pub fn with_config(stream: S, config: AdapterConfig) -> Arc<Self> {
        let token = registry::allocate_token();
        let header = ComObject::allocate(token);
        let this = Arc::new(Self {
            stream: Mutex::new(stream),
            refs: RefCount::new(),
            token,
            header: AtomicPtr::new(header.as_ptr()),
            config,
        });
        registry::register(token, this.clone());
        debug!(
            "Created stream object {} at {:p} (max chunk {}, copy buffer {})",
            token,
            header,
            config.max_chunk(),
            config.copy_buffer()
        );
        this
    }

    /// The native object pointer, without adding a reference.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Disposed`] after the final release.
    pub fn as_raw(&self) -> Result<NonNull<RawStream>, AdapterError> {
        NonNull::new(self.header.load(Ordering::Acquire))
            .map(ComObject::as_raw)
            .ok_or(AdapterError::Disposed)
    }

    /// Hand the creator's reference to native code.
    ///
    /// The returned pointer owns one reference; the native side is expected
    /// to `Release` it. The instance stays registered until then even though
    /// `self` is consumed.
    pub fn into_raw(self: Arc<Self>) -> Result<NonNull<RawStream>, AdapterError> {
        self.as_raw()
    }

    /// Add a reference and wrap it as a [`ForeignStream`], so the owner can
    /// drive the object through its dispatch table like any native caller.
    pub fn to_foreign(&self) -> Result<ForeignStream, AdapterError> {
        self.add_ref()?;
        let raw = self.as_raw()?;
        // SAFETY: the header is live and the reference just added is handed
        // to the wrapper.
        unsafe { ForeignStream::from_raw(raw.as_ptr()) }.ok_or(AdapterError::Disposed)
    }

    /// Registry token stored in the native header.
    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Current reference count.
    #[inline]
    pub fn ref_count(&self) -> u32 {
        self.refs.get()
    }

    /// `true` once the final release happened.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.refs.is_disposed()
    }

    /// Transfer sizes in effect.
    #[inline]
    pub fn config(&self) -> AdapterConfig {
        self.config
    }

    /// Run `f` with exclusive access to the backing stream.
    pub fn with_stream<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.stream.lock())
    }

    fn dispose(&self) {
        let header = self.header.swap(ptr::null_mut(), Ordering::AcqRel);
        // Dropped after the registry lock is released.
        let entry = registry::unregister(self.token);
        if let Some(header) = NonNull::new(header) {
            // SAFETY: only the final release reaches this point and the
            // swap above makes sure it frees the header once.
            unsafe { ComObject::free(header) };
        }
        debug!("Released stream object {}", self.token);
        drop(entry);
    }
}

impl<S: ByteStream> StreamMethods for ManagedStream<S> {
    fn query_interface(&self, iid: &Guid) -> Result<NonNull<RawStream>, HResult> {
        if !is_supported_interface(iid) {
            debug!("Stream object {} does not implement {}", self.token, iid);
            return Err(HResult::E_NOINTERFACE);
        }
        self.add_ref().map_err(translate::query_failure)?;
        self.as_raw().map_err(translate::query_failure)
    }

    fn add_ref(&self) -> Result<u32, AdapterError> {
        match self.refs.increment() {
            RefCountResult::StillAlive(count) => Ok(count),
            RefCountResult::Overflow => Err(AdapterError::RefCountOverflow),
            RefCountResult::AlreadyDisposed | RefCountResult::FinalRelease => {
                Err(AdapterError::Disposed)
            }
        }
    }

    fn release(&self) -> Result<u32, AdapterError> {
        match self.refs.decrement() {
            RefCountResult::StillAlive(count) => Ok(count),
            RefCountResult::FinalRelease => {
                self.dispose();
                Ok(0)
            }
            RefCountResult::AlreadyDisposed | RefCountResult::Overflow => {
                Err(AdapterError::Disposed)
            }
        }
    }

    fn read(&self, buf: &mut [u8]) -> Transfer {
        let len = buf.len().min(u32::MAX as usize);
        let buf = &mut buf[..len];
        let max_chunk = self.config.max_chunk() as usize;

        let mut stream = self.stream.lock();
        let mut total = 0usize;
        while total < len {
            let end = total + (len - total).min(max_chunk);
            match stream.read(&mut buf[total..end]) {
                Ok(0) => break,
                Ok(n) => total += n.min(end - total),
                Err(err) if err.is_interrupted() => continue,
                Err(err) => {
                    warn!("Read on stream object {} failed: {:?}", self.token, err);
                    return Transfer::new(translate::read_failure(err.fault()), total as u32);
                }
            }
        }

        let count = total as u32;
        Transfer::new(translate::read_status(count, len as u32), count)
    }

    fn write(&self, buf: &[u8]) -> Transfer {
        let len = buf.len().min(u32::MAX as usize);
        let max_chunk = self.config.max_chunk() as usize;

        let mut stream = self.stream.lock();
        let mut total = 0usize;
        while total < len {
            let end = total + (len - total).min(max_chunk);
            match stream.write(&buf[total..end]) {
                Ok(0) => {
                    warn!("Stream object {} accepted no more bytes", self.token);
                    return Transfer::new(HResult::STG_E_MEDIUMFULL, total as u32);
                }
                Ok(n) => total += n.min(end - total),
                Err(err) if err.is_interrupted() => continue,
                Err(err) => {
                    warn!("Write on stream object {} failed: {:?}", self.token, err);
                    return Transfer::new(translate::write_failure(err.fault()), total as u32);
                }
            }
        }

        Transfer::new(HResult::S_OK, total as u32)
    }

    fn seek(&self, offset: i64, origin: u32) -> Result<u64, HResult> {
        let pos = SeekOrigin::from_raw(origin)
            .and_then(|origin| origin.to_seek_from(offset))
            .ok_or(HResult::STG_E_INVALIDFUNCTION)?;
        self.stream.lock().seek(pos).map_err(|err| {
            trace!("Seek on stream object {} failed: {:?}", self.token, err);
            translate::seek_failure(err.fault())
        })
    }

    fn set_size(&self, size: u64) -> HResult {
        if i64::try_from(size).is_err() {
            return HResult::STG_E_INVALIDFUNCTION;
        }
        match self.stream.lock().set_len(size) {
            Ok(()) => HResult::S_OK,
            Err(err) => {
                warn!("Resizing stream object {} to {} failed: {:?}", self.token, size, err);
                translate::resize_failure(err.fault())
            }
        }
    }

    fn copy_to(&self, target: &ForeignStream, count: u64) -> CopyOutcome {
        let capacity = u64::try_from(self.config.copy_buffer())
            .unwrap_or(u64::MAX)
            .min(count);
        let mut buf = vec![0u8; capacity as usize];
        let mut outcome = CopyOutcome::default();

        while outcome.read < count {
            let want = (count - outcome.read).min(capacity) as usize;
            // The lock is not held while the target writes: the target may
            // be this very object.
            let got = loop {
                let result = self.stream.lock().read(&mut buf[..want]);
                match result {
                    Ok(n) => break n.min(want),
                    Err(err) if err.is_interrupted() => continue,
                    Err(err) => {
                        warn!("CopyTo from stream object {} failed: {:?}", self.token, err);
                        return outcome.with_status(translate::copy_failure(err.fault()));
                    }
                }
            };
            if got == 0 {
                break;
            }
            outcome.read += got as u64;

            let transfer = target.write(&buf[..got]);
            outcome.written += u64::from(transfer.count);
            if transfer.status.is_failure() {
                debug!(
                    "CopyTo target of stream object {} refused data: {}",
                    self.token, transfer.status
                );
                return outcome.with_status(transfer.status);
            }
        }

        outcome
    }

    fn commit(&self, _flags: u32) -> HResult {
        HResult::S_OK
    }

    fn revert(&self) -> HResult {
        HResult::S_OK
    }

    fn lock_region(&self, _offset: u64, _len: u64, _lock_type: u32) -> HResult {
        HResult::STG_E_INVALIDFUNCTION
    }

    fn unlock_region(&self, _offset: u64, _len: u64, _lock_type: u32) -> HResult {
        HResult::STG_E_INVALIDFUNCTION
    }

    fn stat(&self, _flags: u32) -> Result<StatStg, HResult> {
        // No name is ever allocated, so both flag values produce the same
        // record.
        let mut stream = self.stream.lock();
        let mode = AccessMode::from_capabilities(stream.can_read(), stream.can_write())
            .ok_or(HResult::STG_E_REVERTED)?;
        let size = stream
            .length()
            .map_err(|err| translate::unexpected(err.fault()))?;
        Ok(StatStg::stream(size, mode))
    }

    fn clone_stream(&self) -> Result<NonNull<RawStream>, HResult> {
        Err(HResult::E_NOTIMPL)
    }
}
