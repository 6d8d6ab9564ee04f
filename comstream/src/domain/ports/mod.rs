//! Ports define the interfaces between the domain and the outside world.
//!
//! In hexagonal architecture, ports are the boundaries of the application:
//! - **Primary (Driving) Ports**: What the domain exposes to the outside world
//! - **Secondary (Driven) Ports**: What the domain needs from the outside world
//!
//! The primary port of this crate is the native `IStream` dispatch table in
//! `infrastructure::native`. This module holds the **secondary (driven)
//! port**: the byte stream being wrapped.

mod byte_stream;

pub use byte_stream::{ByteStream, ClassifyFault, Fault};
