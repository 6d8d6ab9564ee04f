//! Domain entities.
//!
//! Entities have identity and a lifecycle. Here that is the reference count
//! that decides when an adapter instance stops being reachable from native
//! code.

mod ref_count;

pub use ref_count::{RefCount, RefCountResult};
