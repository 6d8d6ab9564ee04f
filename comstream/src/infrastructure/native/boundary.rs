//! The native call boundary.
//!
//! Nothing but a status code may leave a dispatched call: an unresolvable
//! object yields the caller's fallback value and a panic is caught and turned
//! into the same fallback. Unwinding into native frames would abort the
//! process.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::{trace, warn};

use super::methods::StreamMethods;
use super::object::{ComObject, RawStream};
use super::registry;

/// Resolve `this` and run `call` against the instance it belongs to.
///
/// `this` is the first argument of a trampoline. Trampolines are only
/// reachable through [`super::vtable::ISTREAM_VTBL`], which is only ever
/// installed in a [`ComObject`], so a non-null `this` points at one of our
/// headers for as long as the caller holds a reference.
pub(super) fn dispatch<R>(
    this: *mut RawStream,
    op: &'static str,
    fallback: R,
    call: impl FnOnce(&dyn StreamMethods) -> R,
) -> R {
    // SAFETY: see above; a caller without a reference is violating the ABI
    // and a null pointer is handled by `token_of`.
    let Some(token) = (unsafe { ComObject::token_of(this) }) else {
        warn!("{}: called through a null stream pointer", op);
        return fallback;
    };
    let Some(object) = registry::resolve(token) else {
        warn!("{}: stream object {} is no longer registered", op, token);
        return fallback;
    };
    trace!("{} on stream object {}", op, token);

    // The instance handle is dropped inside the guarded region: if this call
    // performed the final release, the backing stream is dropped here.
    let guarded = catch_unwind(AssertUnwindSafe(move || {
        let result = call(object.as_ref());
        drop(object);
        result
    }));
    match guarded {
        Ok(result) => result,
        Err(payload) => {
            warn!(
                "{}: panic contained at native boundary of stream object {}: {}",
                op,
                token,
                panic_message(payload.as_ref())
            );
            fallback
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
