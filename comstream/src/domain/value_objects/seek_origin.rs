//! Seek origin value object.

/// `STREAM_SEEK_SET`
pub const STREAM_SEEK_SET: u32 = 0;
/// `STREAM_SEEK_CUR`
pub const STREAM_SEEK_CUR: u32 = 1;
/// `STREAM_SEEK_END`
pub const STREAM_SEEK_END: u32 = 2;

/// Where a seek offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum SeekOrigin {
    /// From the start of the stream.
    Begin = STREAM_SEEK_SET,
    /// From the current position.
    Current = STREAM_SEEK_CUR,
    /// From the end of the stream.
    End = STREAM_SEEK_END,
}

impl SeekOrigin {
    /// Decode a native origin value. Anything outside the three defined
    /// values is rejected.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            STREAM_SEEK_SET => Some(Self::Begin),
            STREAM_SEEK_CUR => Some(Self::Current),
            STREAM_SEEK_END => Some(Self::End),
            _ => None,
        }
    }

    /// Combine with a signed offset into a standard seek target.
    ///
    /// Returns `None` for a negative offset from the beginning, which can
    /// never name a valid position.
    pub fn to_seek_from(self, offset: i64) -> Option<std::io::SeekFrom> {
        match self {
            Self::Begin => u64::try_from(offset).ok().map(std::io::SeekFrom::Start),
            Self::Current => Some(std::io::SeekFrom::Current(offset)),
            Self::End => Some(std::io::SeekFrom::End(offset)),
        }
    }
}
