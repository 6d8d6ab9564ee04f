//! Infrastructure layer - the native object model.
//!
//! Everything that knows about raw pointers, calling conventions, and object
//! layout lives here. The domain layer never sees a pointer; the adapter
//! layer only sees [`native::StreamMethods`] and the header handle.

pub mod native;
