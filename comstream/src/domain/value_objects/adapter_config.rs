//! Adapter configuration value object.

/// Default per-iteration transfer cap for `Read` and `Write` (256 MiB).
pub const DEFAULT_MAX_CHUNK: u32 = 0x1000_0000;

/// Default size of the intermediate buffer used by `CopyTo` (8 KiB).
pub const DEFAULT_COPY_BUFFER: usize = 8 * 1024;

/// Transfer sizing for a `ManagedStream`.
///
/// Both sizes stay well below the 32-bit ceiling so every partial sum of a
/// single native call fits in a `u32` and every chunk fits a signed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterConfig {
    max_chunk: u32,
    copy_buffer: usize,
}

impl AdapterConfig {
    /// 256 MiB read/write chunks, 8 KiB copy buffer.
    pub const DEFAULT: Self = Self {
        max_chunk: DEFAULT_MAX_CHUNK,
        copy_buffer: DEFAULT_COPY_BUFFER,
    };

    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Fails if either size is zero, if `max_chunk` exceeds `i32::MAX`, or if
    /// the copy buffer is larger than one chunk.
    ///
    /// # Examples
    ///
    /// ```
    /// use comstream::AdapterConfig;
    ///
    /// let config = AdapterConfig::new(64 * 1024, 4096).unwrap();
    /// assert_eq!(config.max_chunk(), 65536);
    ///
    /// assert!(AdapterConfig::new(0, 4096).is_err());
    /// ```
    pub const fn new(max_chunk: u32, copy_buffer: usize) -> Result<Self, ConfigError> {
        if max_chunk == 0 {
            return Err(ConfigError::ZeroChunk);
        }
        if max_chunk > i32::MAX as u32 {
            return Err(ConfigError::ChunkTooLarge { max_chunk });
        }
        if copy_buffer == 0 {
            return Err(ConfigError::ZeroCopyBuffer);
        }
        if copy_buffer > max_chunk as usize {
            return Err(ConfigError::CopyBufferExceedsChunk {
                copy_buffer,
                max_chunk,
            });
        }

        Ok(Self {
            max_chunk,
            copy_buffer,
        })
    }

    /// Largest number of bytes moved to or from the backing stream per call.
    #[inline]
    pub const fn max_chunk(&self) -> u32 {
        self.max_chunk
    }

    /// Size of the `CopyTo` intermediate buffer.
    #[inline]
    pub const fn copy_buffer(&self) -> usize {
        self.copy_buffer
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Errors that can occur when creating an [`AdapterConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_chunk` is zero.
    ZeroChunk,
    /// `max_chunk` does not fit a signed 32-bit length.
    ChunkTooLarge {
        /// The requested chunk size.
        max_chunk: u32,
    },
    /// `copy_buffer` is zero.
    ZeroCopyBuffer,
    /// `copy_buffer` is larger than one chunk.
    CopyBufferExceedsChunk {
        /// The requested copy buffer size.
        copy_buffer: usize,
        /// The chunk size it was checked against.
        max_chunk: u32,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroChunk => write!(f, "Chunk size cannot be zero"),
            Self::ChunkTooLarge { max_chunk } => {
                write!(f, "Chunk size {} exceeds {}", max_chunk, i32::MAX)
            }
            Self::ZeroCopyBuffer => write!(f, "Copy buffer size cannot be zero"),
            Self::CopyBufferExceedsChunk {
                copy_buffer,
                max_chunk,
            } => write!(
                f,
                "Copy buffer size {} exceeds chunk size {}",
                copy_buffer, max_chunk
            ),
        }
    }
}

impl core::error::Error for ConfigError {}
