//! Byte range specifications for CLI commands
//!
//! Commands that read from a file accept an optional byte range after the
//! path:
//!
//! - `data.bin` - the whole file
//! - `data.bin@128` - everything from offset 128
//! - `data.bin@128+64` - 64 bytes starting at offset 128
//!
//! The range is applied with `Seek` and a byte count, so it exercises the
//! same native calls a caller positioning a stream would make.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// A file plus the byte range to operate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    /// File on the host filesystem.
    pub path: PathBuf,
    /// Absolute offset of the first byte.
    pub offset: u64,
    /// Number of bytes, or `None` for everything up to the end.
    pub len: Option<u64>,
}

impl RangeSpec {
    /// Parse `path[@offset[+len]]`.
    ///
    /// Only the last `@` starts a range, so paths containing `@` still work
    /// as long as a range follows them or the text after the last `@` is not
    /// a number.
    pub fn parse(spec: &str) -> Result<Self> {
        let Some((path, range)) = spec.rsplit_once('@') else {
            return Ok(Self::whole(spec));
        };
        let (offset, len) = match range.split_once('+') {
            Some((offset, len)) => (offset, Some(len)),
            None => (range, None),
        };
        let Ok(offset) = offset.parse::<u64>() else {
            return Ok(Self::whole(spec));
        };
        if path.is_empty() {
            anyhow::bail!("Missing file name in '{}'", spec);
        }
        let len = len
            .map(|len| {
                len.parse::<u64>()
                    .with_context(|| format!("Invalid byte count '{}' in '{}'", len, spec))
            })
            .transpose()?;

        Ok(Self {
            path: PathBuf::from(path),
            offset,
            len,
        })
    }

    fn whole(path: &str) -> Self {
        Self {
            path: PathBuf::from(path),
            offset: 0,
            len: None,
        }
    }

    /// Byte count to request from `CopyTo`.
    pub fn count(&self) -> u64 {
        self.len.unwrap_or(u64::MAX)
    }

    /// Seek offset, as the signed value the native call takes.
    pub fn seek_offset(&self) -> Result<i64> {
        i64::try_from(self.offset)
            .with_context(|| format!("Offset {} is beyond what a stream can seek to", self.offset))
    }
}
