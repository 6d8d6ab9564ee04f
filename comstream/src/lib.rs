//! Native `IStream` objects backed by Rust byte streams.
//!
//! This crate wraps any seekable byte stream in an object that native code
//! can call through the binary `IStream` interface: a two-word header whose
//! first word points at a shared dispatch table, an atomic reference count,
//! and fourteen methods that translate every outcome into a status code.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! ## Domain Layer (`domain`)
//! Pure logic with no pointers and no I/O:
//! - **Entities**: `RefCount`
//! - **Value Objects**: `HResult`, `Guid`, `SeekOrigin`, `StatStg`, `AdapterConfig`
//! - **Status translation**: `translate`
//! - **Ports**: `ByteStream` interface
//!
//! ## Adapter Layer (`adapters`)
//! - **`ManagedStream`**: the stream adapter, one native object per stream
//! - **`Cursor<Vec<u8>>`**, **`FileStream`**: backing streams
//! - **`EmbeddedIoStream`**: backing stream over `embedded-io` (feature `embedded-io`)
//!
//! ## Infrastructure Layer (`infrastructure`)
//! The binary interface: object header, dispatch table, token registry,
//! panic boundary, and `ForeignStream` for calling any native stream.
//!
//! # Quick Start
//!
//! ```
//! use std::io::Cursor;
//! use comstream::{HResult, ManagedStream, StreamMethods, IID_ISTREAM};
//!
//! let stream = ManagedStream::new(Cursor::new(Vec::new()));
//! let native = stream.to_foreign().unwrap();
//!
//! assert_eq!(native.write(b"hello").status, HResult::S_OK);
//! assert_eq!(native.stat(0).unwrap().size, 5);
//!
//! // Any of the four identities resolves to the same object.
//! let same = native.query_interface(&IID_ISTREAM).unwrap();
//! assert_eq!(same.as_raw(), native.as_raw());
//!
//! drop(same);
//! drop(native);
//! stream.release().unwrap();
//! ```
//!
//! # Features
//!
//! - `embedded-io` (default): `EmbeddedIoStream` over blocking `embedded-io` traits

#![warn(missing_docs)]

// Core layers
pub mod adapters;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    AccessMode, AdapterConfig, AdapterError, ByteStream, ClassifyFault, ConfigError, Fault, Guid,
    HResult, SeekOrigin, StatStg, IID_ISEQUENTIAL_STREAM, IID_ISTREAM, IID_IUNKNOWN,
    MANAGED_STREAM_IID,
};

pub use adapters::{FileStream, ManagedStream};

#[cfg(feature = "embedded-io")]
pub use adapters::{EmbeddedIoError, EmbeddedIoStream};

pub use infrastructure::native::{
    CopyOutcome, ForeignStream, IStreamVtbl, RawStream, StreamMethods, Token, Transfer,
};

#[cfg(feature = "embedded-io")]
pub use embedded_io;
