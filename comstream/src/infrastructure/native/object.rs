//! The native object header.
//!
//! A native caller only ever sees a pointer to [`ComObject`]. Its first word
//! is the dispatch table pointer, which makes it a valid `IUnknown`,
//! `ISequentialStream`, and `IStream` pointer at the same time. The second
//! word is the registry token of the owning `ManagedStream`.

use core::ptr::NonNull;

use super::registry::Token;
use super::vtable::{IStreamVtbl, ISTREAM_VTBL};

/// Any native stream object: a pointer to a pointer to an `IStream`
/// dispatch table.
///
/// This is the type of the `this` argument of every dispatched method and of
/// the stream pointers exchanged with native code.
#[repr(C)]
#[derive(Debug)]
pub struct RawStream {
    /// Dispatch table of the object.
    pub vtbl: *const IStreamVtbl,
}

/// Header of a stream object produced by this crate.
///
/// Boxed once per `ManagedStream` and never moved, so the address handed to
/// native code stays valid until the final release frees it.
#[repr(C)]
#[derive(Debug)]
pub struct ComObject {
    iface: RawStream,
    token: usize,
}

// Layout is part of the ABI: two machine words, table pointer first.
const _: () = assert!(core::mem::size_of::<ComObject>() == 2 * core::mem::size_of::<usize>());
const _: () = assert!(core::mem::offset_of!(ComObject, iface) == 0);

impl ComObject {
    /// Allocate a header for `token` pointing at the shared dispatch table.
    pub(crate) fn allocate(token: Token) -> NonNull<ComObject> {
        let header = Box::new(ComObject {
            iface: RawStream { vtbl: &ISTREAM_VTBL },
            token: token.get(),
        });
        NonNull::from(Box::leak(header))
    }

    /// Free a header produced by [`ComObject::allocate`].
    ///
    /// # Safety
    ///
    /// `header` must come from `allocate` and must not be freed twice or used
    /// afterwards.
    pub(crate) unsafe fn free(header: NonNull<ComObject>) {
        drop(unsafe { Box::from_raw(header.as_ptr()) });
    }

    /// View the header as a generic stream pointer.
    #[inline]
    pub(crate) fn as_raw(header: NonNull<ComObject>) -> NonNull<RawStream> {
        header.cast()
    }

    /// Read the token out of a stream pointer that dispatched into our table.
    ///
    /// # Safety
    ///
    /// `this` must be null or point at a live `ComObject`.
    pub(crate) unsafe fn token_of(this: *const RawStream) -> Option<Token> {
        if this.is_null() {
            return None;
        }
        let header = this.cast::<ComObject>();
        Token::from_raw(unsafe { (*header).token })
    }

    /// The dispatch table this header points at.
    pub fn vtbl(&self) -> *const IStreamVtbl {
        self.iface.vtbl
    }
}
