//! Calling into native stream objects.
//!
//! [`ForeignStream`] owns one reference to any object that speaks the
//! `IStream` ABI, whether it was produced by this crate or by someone else,
//! and calls it strictly through its dispatch table. `CopyTo` uses it for its
//! target, and owners use it to drive their own adapters the way a native
//! caller would.

use core::fmt;
use core::mem::ManuallyDrop;
use core::ptr::{self, NonNull};

use crate::domain::{Guid, HResult, SeekOrigin, StatStg};

use super::methods::{CopyOutcome, Transfer};
use super::object::RawStream;
use super::vtable::IStreamVtbl;

/// An owned reference to a native `IStream`.
///
/// Dropping it calls `Release` once.
pub struct ForeignStream {
    ptr: NonNull<RawStream>,
}

// SAFETY: native `IStream` objects handed across threads must be callable
// from any of them; the wrapped pointer is only ever dereferenced through the
// object's own dispatch table.
unsafe impl Send for ForeignStream {}
unsafe impl Sync for ForeignStream {}

impl ForeignStream {
    /// Take ownership of one reference to `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or point at a live object with an `IStream`
    /// dispatch table, and the caller must own the reference being handed
    /// over.
    pub unsafe fn from_raw(ptr: *mut RawStream) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    /// Wrap `ptr` without taking a reference. The returned value never calls
    /// `Release`.
    ///
    /// # Safety
    ///
    /// Same as [`ForeignStream::from_raw`], except the caller keeps its
    /// reference and must keep it alive while the wrapper is in use.
    pub unsafe fn from_raw_borrowed(ptr: *mut RawStream) -> Option<ManuallyDrop<Self>> {
        NonNull::new(ptr).map(|ptr| ManuallyDrop::new(Self { ptr }))
    }

    /// The object pointer, still owned by `self`.
    #[inline]
    pub fn as_raw(&self) -> *mut RawStream {
        self.ptr.as_ptr()
    }

    /// Give up ownership of the reference without releasing it.
    pub fn into_raw(self) -> *mut RawStream {
        let this = ManuallyDrop::new(self);
        this.ptr.as_ptr()
    }

    #[inline]
    fn vtbl(&self) -> &IStreamVtbl {
        // SAFETY: a live object's first word is its dispatch table pointer.
        unsafe { &*(*self.ptr.as_ptr()).vtbl }
    }

    /// `IUnknown::QueryInterface`. On success the returned wrapper owns the
    /// new reference.
    pub fn query_interface(&self, iid: &Guid) -> Result<ForeignStream, HResult> {
        let mut out: *mut core::ffi::c_void = ptr::null_mut();
        let status = unsafe { (self.vtbl().query_interface)(self.as_raw(), iid, &mut out) };
        if status.is_failure() {
            return Err(status);
        }
        // SAFETY: a successful query hands us a reference to an object
        // implementing the requested interface, all of which share the
        // `IStream` table prefix.
        unsafe { ForeignStream::from_raw(out.cast()) }.ok_or(HResult::E_POINTER)
    }

    /// `IUnknown::AddRef`. Returns the count reported by the object.
    pub fn add_ref(&self) -> u32 {
        unsafe { (self.vtbl().add_ref)(self.as_raw()) }
    }

    /// `IUnknown::Release` without giving up the wrapper.
    ///
    /// # Safety
    ///
    /// Must balance an earlier [`ForeignStream::add_ref`]; releasing the
    /// reference the wrapper owns leaves it dangling.
    pub unsafe fn release(&self) -> u32 {
        unsafe { (self.vtbl().release)(self.as_raw()) }
    }

    /// `ISequentialStream::Read` into `buf`, clamped to `u32::MAX` bytes.
    pub fn read(&self, buf: &mut [u8]) -> Transfer {
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let mut count = 0u32;
        let status =
            unsafe { (self.vtbl().read)(self.as_raw(), buf.as_mut_ptr().cast(), len, &mut count) };
        Transfer::new(status, count)
    }

    /// `ISequentialStream::Write` of `buf`, clamped to `u32::MAX` bytes.
    pub fn write(&self, buf: &[u8]) -> Transfer {
        let len = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let mut count = 0u32;
        let status =
            unsafe { (self.vtbl().write)(self.as_raw(), buf.as_ptr().cast(), len, &mut count) };
        Transfer::new(status, count)
    }

    /// `IStream::Seek` with a typed origin.
    pub fn seek(&self, offset: i64, origin: SeekOrigin) -> Result<u64, HResult> {
        self.seek_raw(offset, origin as u32)
    }

    /// `IStream::Seek` with a raw `STREAM_SEEK_*` origin.
    pub fn seek_raw(&self, offset: i64, origin: u32) -> Result<u64, HResult> {
        let mut position = 0u64;
        let status = unsafe { (self.vtbl().seek)(self.as_raw(), offset, origin, &mut position) };
        if status.is_failure() { Err(status) } else { Ok(position) }
    }

    /// `IStream::SetSize`
    pub fn set_size(&self, size: u64) -> HResult {
        unsafe { (self.vtbl().set_size)(self.as_raw(), size) }
    }

    /// `IStream::CopyTo` into `target`.
    pub fn copy_to(&self, target: &ForeignStream, count: u64) -> CopyOutcome {
        let mut read = 0u64;
        let mut written = 0u64;
        let status = unsafe {
            (self.vtbl().copy_to)(self.as_raw(), target.as_raw(), count, &mut read, &mut written)
        };
        CopyOutcome { status, read, written }
    }

    /// `IStream::Commit`
    pub fn commit(&self, flags: u32) -> HResult {
        unsafe { (self.vtbl().commit)(self.as_raw(), flags) }
    }

    /// `IStream::Revert`
    pub fn revert(&self) -> HResult {
        unsafe { (self.vtbl().revert)(self.as_raw()) }
    }

    /// `IStream::LockRegion`
    pub fn lock_region(&self, offset: u64, len: u64, lock_type: u32) -> HResult {
        unsafe { (self.vtbl().lock_region)(self.as_raw(), offset, len, lock_type) }
    }

    /// `IStream::UnlockRegion`
    pub fn unlock_region(&self, offset: u64, len: u64, lock_type: u32) -> HResult {
        unsafe { (self.vtbl().unlock_region)(self.as_raw(), offset, len, lock_type) }
    }

    /// `IStream::Stat`
    pub fn stat(&self, flags: u32) -> Result<StatStg, HResult> {
        let mut record = StatStg::default();
        let status = unsafe { (self.vtbl().stat)(self.as_raw(), &mut record, flags) };
        if status.is_failure() { Err(status) } else { Ok(record) }
    }

    /// `IStream::Clone`
    pub fn clone_stream(&self) -> Result<ForeignStream, HResult> {
        let mut out: *mut RawStream = ptr::null_mut();
        let status = unsafe { (self.vtbl().clone)(self.as_raw(), &mut out) };
        if status.is_failure() {
            return Err(status);
        }
        unsafe { ForeignStream::from_raw(out) }.ok_or(HResult::E_POINTER)
    }
}

impl Drop for ForeignStream {
    fn drop(&mut self) {
        unsafe { (self.vtbl().release)(self.as_raw()) };
    }
}

impl fmt::Debug for ForeignStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignStream").field("ptr", &self.ptr).finish()
    }
}
