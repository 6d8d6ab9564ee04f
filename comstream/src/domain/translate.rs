//! Status translation - maps local failures onto native status codes.
//!
//! Every function here is pure. Each dispatched operation family has its own
//! mapping because the same fault means different things depending on where
//! it happens: running out of space is `STG_E_MEDIUMFULL` for writes and
//! resizes, while every other write failure is `STG_E_CANTSAVE` and every
//! other resize failure is `STG_E_INVALIDFUNCTION`.

use crate::domain::{error::AdapterError, ports::Fault, value_objects::HResult};

/// Outcome status of a read that transferred `read` of `requested` bytes.
///
/// A short read is a success variant (`S_FALSE`), never an error.
#[inline]
pub const fn read_status(read: u32, requested: u32) -> HResult {
    if read == requested {
        HResult::S_OK
    } else {
        HResult::S_FALSE
    }
}

/// A backing read failed part-way.
pub const fn read_failure(fault: Fault) -> HResult {
    unexpected(fault)
}

/// A backing write failed.
pub const fn write_failure(fault: Fault) -> HResult {
    if fault.is_storage_full() {
        HResult::STG_E_MEDIUMFULL
    } else {
        HResult::STG_E_CANTSAVE
    }
}

/// A seek failed, including seeks to a negative position.
pub const fn seek_failure(_fault: Fault) -> HResult {
    HResult::STG_E_INVALIDFUNCTION
}

/// Truncating or extending the stream failed.
pub const fn resize_failure(fault: Fault) -> HResult {
    if fault.is_storage_full() {
        HResult::STG_E_MEDIUMFULL
    } else {
        HResult::STG_E_INVALIDFUNCTION
    }
}

/// The source side of a copy failed.
pub const fn copy_failure(fault: Fault) -> HResult {
    if fault.is_storage_full() {
        HResult::STG_E_MEDIUMFULL
    } else {
        unexpected(fault)
    }
}

/// Any failure with no operation-specific mapping: the carried status when
/// it is a failure, otherwise `E_FAIL`.
pub const fn unexpected(fault: Fault) -> HResult {
    match fault {
        Fault::Status(status) if status.is_failure() => status,
        _ => HResult::E_FAIL,
    }
}

/// The implicit add-ref of an identity query failed.
pub const fn query_failure(_err: AdapterError) -> HResult {
    HResult::E_FAIL
}
