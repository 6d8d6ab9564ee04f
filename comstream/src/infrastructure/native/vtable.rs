//! The `IStream` dispatch table and its trampolines.
//!
//! Slot order is fixed by the native ABI: the three `IUnknown` methods, the
//! two `ISequentialStream` methods, then the nine `IStream` methods. Every
//! entry uses the platform's `system` calling convention and receives the
//! object pointer first.
//!
//! The table holds no per-instance state, so a single `static` is shared by
//! every header this crate produces.

use core::ffi::c_void;
use core::ptr;
use core::slice;

use log::warn;

use crate::domain::{Guid, HResult, StatStg};

use super::boundary::dispatch;
use super::foreign::ForeignStream;
use super::object::RawStream;

/// `IUnknown::QueryInterface`
pub type QueryInterfaceFn =
    unsafe extern "system" fn(this: *mut RawStream, iid: *const Guid, out: *mut *mut c_void) -> HResult;
/// `IUnknown::AddRef`
pub type AddRefFn = unsafe extern "system" fn(this: *mut RawStream) -> u32;
/// `IUnknown::Release`
pub type ReleaseFn = unsafe extern "system" fn(this: *mut RawStream) -> u32;
/// `ISequentialStream::Read`
pub type ReadFn =
    unsafe extern "system" fn(this: *mut RawStream, buf: *mut c_void, len: u32, out_read: *mut u32) -> HResult;
/// `ISequentialStream::Write`
pub type WriteFn = unsafe extern "system" fn(
    this: *mut RawStream,
    buf: *const c_void,
    len: u32,
    out_written: *mut u32,
) -> HResult;
/// `IStream::Seek`
pub type SeekFn =
    unsafe extern "system" fn(this: *mut RawStream, offset: i64, origin: u32, out_position: *mut u64) -> HResult;
/// `IStream::SetSize`
pub type SetSizeFn = unsafe extern "system" fn(this: *mut RawStream, size: u64) -> HResult;
/// `IStream::CopyTo`
pub type CopyToFn = unsafe extern "system" fn(
    this: *mut RawStream,
    target: *mut RawStream,
    count: u64,
    out_read: *mut u64,
    out_written: *mut u64,
) -> HResult;
/// `IStream::Commit`
pub type CommitFn = unsafe extern "system" fn(this: *mut RawStream, flags: u32) -> HResult;
/// `IStream::Revert`
pub type RevertFn = unsafe extern "system" fn(this: *mut RawStream) -> HResult;
/// `IStream::LockRegion` and `IStream::UnlockRegion`
pub type RegionFn =
    unsafe extern "system" fn(this: *mut RawStream, offset: u64, len: u64, lock_type: u32) -> HResult;
/// `IStream::Stat`
pub type StatFn = unsafe extern "system" fn(this: *mut RawStream, out: *mut StatStg, flags: u32) -> HResult;
/// `IStream::Clone`
pub type CloneFn = unsafe extern "system" fn(this: *mut RawStream, out: *mut *mut RawStream) -> HResult;

/// Native `IStreamVtbl`. Each slot has the signature of the alias it is
/// declared with.
#[repr(C)]
#[derive(Debug)]
#[allow(missing_docs)]
pub struct IStreamVtbl {
    pub query_interface: QueryInterfaceFn,
    pub add_ref: AddRefFn,
    pub release: ReleaseFn,
    pub read: ReadFn,
    pub write: WriteFn,
    pub seek: SeekFn,
    pub set_size: SetSizeFn,
    pub copy_to: CopyToFn,
    pub commit: CommitFn,
    pub revert: RevertFn,
    pub lock_region: RegionFn,
    pub unlock_region: RegionFn,
    pub stat: StatFn,
    pub clone: CloneFn,
}

const _: () = assert!(core::mem::size_of::<IStreamVtbl>() == 14 * core::mem::size_of::<usize>());

/// The dispatch table installed in every `ComObject`.
pub(crate) static ISTREAM_VTBL: IStreamVtbl = IStreamVtbl {
    query_interface,
    add_ref,
    release,
    read,
    write,
    seek,
    set_size,
    copy_to,
    commit,
    revert,
    lock_region,
    unlock_region,
    stat,
    clone,
};

/// Write through an optional output slot.
///
/// # Safety
///
/// `out` must be null or valid for a write of `T`.
#[inline]
unsafe fn store<T>(out: *mut T, value: T) {
    if !out.is_null() {
        unsafe { out.write(value) };
    }
}

unsafe extern "system" fn query_interface(
    this: *mut RawStream,
    iid: *const Guid,
    out: *mut *mut c_void,
) -> HResult {
    if out.is_null() || iid.is_null() {
        return HResult::E_POINTER;
    }
    dispatch(this, "QueryInterface", HResult::E_FAIL, |object| {
        // SAFETY: both pointers were checked for null; the caller guarantees
        // they are valid otherwise.
        let iid = unsafe { &*iid };
        match object.query_interface(iid) {
            Ok(shared) => {
                unsafe { out.write(shared.as_ptr().cast()) };
                HResult::S_OK
            }
            Err(HResult::E_NOINTERFACE) => {
                unsafe { out.write(ptr::null_mut()) };
                HResult::E_NOINTERFACE
            }
            Err(status) => status,
        }
    })
}

unsafe extern "system" fn add_ref(this: *mut RawStream) -> u32 {
    dispatch(this, "AddRef", 0, |object| {
        object.add_ref().unwrap_or_else(|err| {
            warn!("AddRef: {}", err);
            0
        })
    })
}

unsafe extern "system" fn release(this: *mut RawStream) -> u32 {
    dispatch(this, "Release", 0, |object| {
        object.release().unwrap_or_else(|err| {
            warn!("Release: {}", err);
            0
        })
    })
}

unsafe extern "system" fn read(
    this: *mut RawStream,
    buf: *mut c_void,
    len: u32,
    out_read: *mut u32,
) -> HResult {
    // Counts read as zero unless the call gets far enough to transfer bytes.
    unsafe { store(out_read, 0) };
    dispatch(this, "Read", HResult::E_FAIL, |object| {
        if len > 0 && buf.is_null() {
            return HResult::STG_E_INVALIDPOINTER;
        }
        let buf: &mut [u8] = if len == 0 {
            &mut []
        } else {
            // SAFETY: non-null and, per the ABI, valid for `len` bytes.
            unsafe { slice::from_raw_parts_mut(buf.cast::<u8>(), len as usize) }
        };
        let transfer = object.read(buf);
        unsafe { store(out_read, transfer.count) };
        transfer.status
    })
}

unsafe extern "system" fn write(
    this: *mut RawStream,
    buf: *const c_void,
    len: u32,
    out_written: *mut u32,
) -> HResult {
    unsafe { store(out_written, 0) };
    dispatch(this, "Write", HResult::E_FAIL, |object| {
        if len > 0 && buf.is_null() {
            return HResult::STG_E_INVALIDPOINTER;
        }
        let buf: &[u8] = if len == 0 {
            &[]
        } else {
            // SAFETY: non-null and, per the ABI, valid for `len` bytes.
            unsafe { slice::from_raw_parts(buf.cast::<u8>(), len as usize) }
        };
        let transfer = object.write(buf);
        unsafe { store(out_written, transfer.count) };
        transfer.status
    })
}

unsafe extern "system" fn seek(
    this: *mut RawStream,
    offset: i64,
    origin: u32,
    out_position: *mut u64,
) -> HResult {
    dispatch(this, "Seek", HResult::E_FAIL, |object| {
        match object.seek(offset, origin) {
            Ok(position) => {
                unsafe { store(out_position, position) };
                HResult::S_OK
            }
            Err(status) => status,
        }
    })
}

unsafe extern "system" fn set_size(this: *mut RawStream, size: u64) -> HResult {
    dispatch(this, "SetSize", HResult::E_FAIL, |object| object.set_size(size))
}

unsafe extern "system" fn copy_to(
    this: *mut RawStream,
    target: *mut RawStream,
    count: u64,
    out_read: *mut u64,
    out_written: *mut u64,
) -> HResult {
    unsafe {
        store(out_read, 0);
        store(out_written, 0);
    }
    dispatch(this, "CopyTo", HResult::E_FAIL, |object| {
        // SAFETY: the caller passes a live stream it holds a reference to.
        let Some(target) = (unsafe { ForeignStream::from_raw_borrowed(target) }) else {
            return HResult::STG_E_INVALIDPOINTER;
        };
        let outcome = object.copy_to(&target, count);
        unsafe {
            store(out_read, outcome.read);
            store(out_written, outcome.written);
        }
        outcome.status
    })
}

unsafe extern "system" fn commit(this: *mut RawStream, flags: u32) -> HResult {
    dispatch(this, "Commit", HResult::E_FAIL, |object| object.commit(flags))
}

unsafe extern "system" fn revert(this: *mut RawStream) -> HResult {
    dispatch(this, "Revert", HResult::E_FAIL, |object| object.revert())
}

unsafe extern "system" fn lock_region(
    this: *mut RawStream,
    offset: u64,
    len: u64,
    lock_type: u32,
) -> HResult {
    dispatch(this, "LockRegion", HResult::E_FAIL, |object| {
        object.lock_region(offset, len, lock_type)
    })
}

unsafe extern "system" fn unlock_region(
    this: *mut RawStream,
    offset: u64,
    len: u64,
    lock_type: u32,
) -> HResult {
    dispatch(this, "UnlockRegion", HResult::E_FAIL, |object| {
        object.unlock_region(offset, len, lock_type)
    })
}

unsafe extern "system" fn stat(this: *mut RawStream, out: *mut StatStg, flags: u32) -> HResult {
    if out.is_null() {
        return HResult::STG_E_INVALIDPOINTER;
    }
    dispatch(this, "Stat", HResult::E_FAIL, |object| match object.stat(flags) {
        Ok(record) => {
            unsafe { out.write(record) };
            HResult::S_OK
        }
        Err(status) => status,
    })
}

unsafe extern "system" fn clone(this: *mut RawStream, out: *mut *mut RawStream) -> HResult {
    dispatch(this, "Clone", HResult::E_FAIL, |object| match object.clone_stream() {
        Ok(stream) => {
            unsafe { store(out, stream.as_ptr()) };
            HResult::S_OK
        }
        Err(status) => {
            unsafe { store(out, ptr::null_mut()) };
            status
        }
    })
}
