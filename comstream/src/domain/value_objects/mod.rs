//! Value objects for the domain layer.
//!
//! Value objects are immutable, validated data types with a fixed native
//! layout where they cross the boundary: identifiers, status codes, seek
//! origins, and stream metadata.

mod adapter_config;
mod guid;
mod hresult;
mod seek_origin;
mod stat;

pub use adapter_config::{AdapterConfig, ConfigError, DEFAULT_COPY_BUFFER, DEFAULT_MAX_CHUNK};
pub use guid::{
    is_supported_interface, Guid, IID_ISEQUENTIAL_STREAM, IID_ISTREAM, IID_IUNKNOWN,
    MANAGED_STREAM_IID, SUPPORTED_INTERFACES,
};
pub use hresult::HResult;
pub use seek_origin::{SeekOrigin, STREAM_SEEK_CUR, STREAM_SEEK_END, STREAM_SEEK_SET};
pub use stat::{AccessMode, FileTime, StatStg, STATFLAG_DEFAULT, STATFLAG_NONAME, STGTY_STREAM};
