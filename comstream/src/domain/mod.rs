//! Domain layer - Pure logic with zero native or I/O dependencies.
//!
//! This is the core of the hexagonal architecture. The domain layer contains:
//! - **Entities**: Objects with a lifecycle (`RefCount`)
//! - **Value Objects**: Validated data with native layouts (`Guid`, `HResult`,
//!   `StatStg`, `SeekOrigin`, `AdapterConfig`)
//! - **Ports**: Interfaces to the outside world (`ByteStream`)
//! - **Status translation**: How local failures become native status codes
//! - **Domain Errors**: Lifecycle violations
//!
//! # Hexagonal Architecture
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer (Core)         │
//!     │                                  │
//!     │  ┌────────────────────────────┐  │
//!     │  │  Entities & Value Objects  │  │
//!     │  │  - RefCount, HResult, ...  │  │
//!     │  └────────────────────────────┘  │
//!     │              ▲                   │
//!     │              │                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Status translation      │  │
//!     │  └────────────────────────────┘  │
//!     │              │                   │
//!     │              ▼                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Ports (Interfaces)      │  │
//!     │  │    - ByteStream            │  │
//!     │  └────────────────────────────┘  │
//!     └──────────────────────────────────┘
//!                    ▲
//!                    │ implemented by
//!                    │
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │
//!     │  - ManagedStream                 │
//!     │  - Cursor / FileStream           │
//!     │  - EmbeddedIoStream              │
//!     └──────────────────────────────────┘
//! ```

pub mod entities;
pub mod error;
pub mod ports;
pub mod translate;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{RefCount, RefCountResult};
pub use error::AdapterError;
pub use ports::{ByteStream, ClassifyFault, Fault};
pub use value_objects::{
    AccessMode, AdapterConfig, ConfigError, Guid, HResult, SeekOrigin, StatStg,
    IID_ISEQUENTIAL_STREAM, IID_ISTREAM, IID_IUNKNOWN, MANAGED_STREAM_IID,
};
