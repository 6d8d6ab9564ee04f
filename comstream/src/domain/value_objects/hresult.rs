//! Native status code value object.

use core::fmt;

/// A signed 32-bit native status code.
///
/// Zero and positive values are success variants, negative values are
/// failures. The layout is a bare `i32`, so an `HResult` can be returned
/// directly from an `extern "system"` function.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct HResult(i32);

impl HResult {
    /// Plain success.
    pub const S_OK: Self = Self(0);
    /// Success, but fewer bytes than requested (used by `Read`).
    pub const S_FALSE: Self = Self(1);
    /// The method is not implemented.
    pub const E_NOTIMPL: Self = Self::from_bits(0x8000_4001);
    /// The requested interface is not supported.
    pub const E_NOINTERFACE: Self = Self::from_bits(0x8000_4002);
    /// A required pointer argument was null.
    pub const E_POINTER: Self = Self::from_bits(0x8000_4003);
    /// Unspecified failure.
    pub const E_FAIL: Self = Self::from_bits(0x8000_4005);
    /// The object has been closed (local disposed-object condition).
    pub const RO_E_CLOSED: Self = Self::from_bits(0x8000_0013);
    /// The function is invalid or unsupported for this stream.
    pub const STG_E_INVALIDFUNCTION: Self = Self::from_bits(0x8003_0001);
    /// An invalid pointer was passed to a storage method.
    pub const STG_E_INVALIDPOINTER: Self = Self::from_bits(0x8003_0009);
    /// The medium is full.
    pub const STG_E_MEDIUMFULL: Self = Self::from_bits(0x8003_0070);
    /// The stream has been reverted or closed.
    pub const STG_E_REVERTED: Self = Self::from_bits(0x8003_0102);
    /// The data could not be saved.
    pub const STG_E_CANTSAVE: Self = Self::from_bits(0x8003_0103);
    /// `ERROR_DISK_FULL` reported by the host file system.
    pub const E_DISK_FULL: Self = Self::from_win32(112);
    /// `ERROR_HANDLE_DISK_FULL` reported by the host file system.
    pub const E_HANDLE_DISK_FULL: Self = Self::from_win32(39);

    /// Wrap a raw status value.
    #[inline]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Build a status from its unsigned bit pattern, e.g. `0x80004005`.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits as i32)
    }

    /// Build the `FACILITY_WIN32` status for a Win32 error code.
    ///
    /// ```
    /// use comstream::HResult;
    ///
    /// assert_eq!(HResult::from_win32(112).bits(), 0x8007_0070);
    /// assert_eq!(HResult::from_win32(0), HResult::S_OK);
    /// ```
    #[inline]
    pub const fn from_win32(code: u32) -> Self {
        if code == 0 {
            Self::S_OK
        } else {
            Self::from_bits((code & 0xFFFF) | 0x8007_0000)
        }
    }

    /// The raw signed value.
    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// The unsigned bit pattern.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0 as u32
    }

    /// `true` for zero and positive values.
    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 >= 0
    }

    /// `true` for negative values.
    #[inline]
    pub const fn is_failure(self) -> bool {
        self.0 < 0
    }

    /// `true` for the host statuses that mean the volume ran out of space.
    #[inline]
    pub const fn is_disk_full(self) -> bool {
        self.0 == Self::E_DISK_FULL.0 || self.0 == Self::E_HANDLE_DISK_FULL.0
    }

    fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::S_OK => "S_OK",
            Self::S_FALSE => "S_FALSE",
            Self::E_NOTIMPL => "E_NOTIMPL",
            Self::E_NOINTERFACE => "E_NOINTERFACE",
            Self::E_POINTER => "E_POINTER",
            Self::E_FAIL => "E_FAIL",
            Self::RO_E_CLOSED => "RO_E_CLOSED",
            Self::STG_E_INVALIDFUNCTION => "STG_E_INVALIDFUNCTION",
            Self::STG_E_INVALIDPOINTER => "STG_E_INVALIDPOINTER",
            Self::STG_E_MEDIUMFULL => "STG_E_MEDIUMFULL",
            Self::STG_E_REVERTED => "STG_E_REVERTED",
            Self::STG_E_CANTSAVE => "STG_E_CANTSAVE",
            Self::E_DISK_FULL => "ERROR_DISK_FULL",
            Self::E_HANDLE_DISK_FULL => "ERROR_HANDLE_DISK_FULL",
            _ => return None,
        };
        Some(name)
    }
}

impl Default for HResult {
    fn default() -> Self {
        Self::S_OK
    }
}

impl fmt::Debug for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HResult({})", self)
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} (0x{:08X})", name, self.bits()),
            None => write!(f, "0x{:08X}", self.bits()),
        }
    }
}

// Lets a backing stream carry a specific status inside its error value,
// e.g. `std::io::Error::other(HResult::STG_E_CANTSAVE)`.
impl core::error::Error for HResult {}

impl From<HResult> for i32 {
    fn from(hr: HResult) -> Self {
        hr.value()
    }
}
