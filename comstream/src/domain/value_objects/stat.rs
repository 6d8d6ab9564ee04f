//! Stream metadata record in native `STATSTG` layout.

use super::Guid;

/// `STGTY_STREAM`
pub const STGTY_STREAM: u32 = 2;

/// `STATFLAG_DEFAULT`: the caller asks for the name as well.
pub const STATFLAG_DEFAULT: u32 = 0;
/// `STATFLAG_NONAME`: the caller does not want the name.
pub const STATFLAG_NONAME: u32 = 1;

/// Native `FILETIME`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(C)]
pub struct FileTime {
    /// Low 32 bits.
    pub low: u32,
    /// High 32 bits.
    pub high: u32,
}

/// Access mode bits reported in [`StatStg::grf_mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum AccessMode {
    /// `STGM_READ`
    Read = 0,
    /// `STGM_WRITE`
    Write = 1,
    /// `STGM_READWRITE`
    ReadWrite = 2,
}

impl AccessMode {
    /// Derive the mode from the stream's current capabilities, or `None`
    /// if it can do neither (closed stream).
    pub const fn from_capabilities(readable: bool, writable: bool) -> Option<Self> {
        match (readable, writable) {
            (true, true) => Some(Self::ReadWrite),
            (true, false) => Some(Self::Read),
            (false, true) => Some(Self::Write),
            (false, false) => None,
        }
    }
}

/// Native `STATSTG`.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct StatStg {
    /// Name of the element. Always null: the adapter never allocates one.
    pub name: *mut u16,
    /// `STGTY_*` element type.
    pub kind: u32,
    /// Size in bytes.
    pub size: u64,
    /// Modification time.
    pub mtime: FileTime,
    /// Creation time.
    pub ctime: FileTime,
    /// Access time.
    pub atime: FileTime,
    /// `STGM_*` access mode.
    pub grf_mode: u32,
    /// Supported region lock types.
    pub grf_locks_supported: u32,
    /// Class identifier.
    pub clsid: Guid,
    /// State bits.
    pub grf_state_bits: u32,
    /// Reserved.
    pub reserved: u32,
}

impl StatStg {
    /// A stream record of `size` bytes opened with `mode`.
    pub const fn stream(size: u64, mode: AccessMode) -> Self {
        Self {
            name: core::ptr::null_mut(),
            kind: STGTY_STREAM,
            size,
            mtime: FileTime { low: 0, high: 0 },
            ctime: FileTime { low: 0, high: 0 },
            atime: FileTime { low: 0, high: 0 },
            grf_mode: mode as u32,
            grf_locks_supported: 0,
            clsid: Guid::ZERO,
            grf_state_bits: 0,
            reserved: 0,
        }
    }

    /// The access mode, if `grf_mode` holds one of the known values.
    pub const fn access_mode(&self) -> Option<AccessMode> {
        match self.grf_mode {
            0 => Some(AccessMode::Read),
            1 => Some(AccessMode::Write),
            2 => Some(AccessMode::ReadWrite),
            _ => None,
        }
    }
}

impl Default for StatStg {
    fn default() -> Self {
        Self::stream(0, AccessMode::Read)
    }
}
