//! The native `IStream` surface.
//!
//! - [`object`]: the two-word header native code holds a pointer to
//! - [`vtable`]: the shared dispatch table and its trampolines
//! - [`registry`]: token to instance resolution
//! - [`boundary`]: the guard every dispatched call runs under
//! - [`foreign`]: calling any `IStream` through its table

mod boundary;
pub mod foreign;
pub mod methods;
pub mod object;
pub mod registry;
pub mod vtable;

pub use foreign::ForeignStream;
pub use methods::{CopyOutcome, StreamMethods, Transfer};
pub use object::{ComObject, RawStream};
pub use registry::Token;
pub use vtable::IStreamVtbl;
