//! Adapter layer - Concrete implementations connecting domain to infrastructure.
//!
//! This layer contains the stream adapter that turns a [`ByteStream`] into a
//! native object, and the backing streams that implement the port.
//!
//! # Hexagonal Architecture
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │  Infrastructure (native ABI)     │
//!     │  - IStream vtable, registry      │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ dispatches to
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │  ◄── This module
//!     │  - ManagedStream                 │
//!     │  - Cursor<Vec<u8>>, FileStream   │
//!     │  - EmbeddedIoStream              │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ implements
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer                │
//!     │  - ByteStream (port)             │
//!     │  - translate, RefCount           │
//!     └──────────────────────────────────┘
//! ```
//!
//! [`ByteStream`]: crate::domain::ByteStream

mod file_stream;
mod managed_stream;
mod memory;

#[cfg(feature = "embedded-io")]
mod embedded_io_stream;

pub use file_stream::FileStream;
pub use managed_stream::ManagedStream;

#[cfg(feature = "embedded-io")]
pub use embedded_io_stream::{EmbeddedIoError, EmbeddedIoStream};
