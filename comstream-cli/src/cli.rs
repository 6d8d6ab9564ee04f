//! Command definitions and their implementations.
//!
//! Every command wraps host files in `ManagedStream`s and then talks to them
//! only through the native dispatch table, exactly as a native consumer of
//! the objects would.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comstream::{
    AccessMode, AdapterConfig, FileStream, ForeignStream, HResult, ManagedStream, SeekOrigin,
    StreamMethods, Token,
};
use log::{debug, info};

use crate::range_spec::RangeSpec;

/// Drive files through native IStream objects
#[derive(Debug, Parser)]
#[command(name = "comstream", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show what Stat reports for a file
    Stat {
        /// File to describe
        file: PathBuf,
        /// Open the file read-only
        #[arg(long)]
        read_only: bool,
    },
    /// Write a file, or a byte range of it, to stdout using Read
    Cat {
        /// File with optional range: path[@offset[+len]]
        source: String,
        /// Bytes requested per Read call
        #[arg(long, default_value_t = 64 * 1024)]
        chunk: u32,
    },
    /// Copy a file, or a byte range of it, into a new file using CopyTo
    Copy {
        /// File with optional range: path[@offset[+len]]
        source: String,
        /// File to create or overwrite
        destination: PathBuf,
        /// Size of the intermediate CopyTo buffer
        #[arg(long)]
        copy_buffer: Option<usize>,
    },
    /// Truncate or extend a file using SetSize
    Truncate {
        /// File to resize
        file: PathBuf,
        /// New size in bytes
        size: u64,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Stat { file, read_only } => stat(&file, read_only, &mut stdout),
        Command::Cat { source, chunk } => cat(&RangeSpec::parse(&source)?, chunk, &mut stdout),
        Command::Copy {
            source,
            destination,
            copy_buffer,
        } => copy(&RangeSpec::parse(&source)?, &destination, copy_buffer, &mut stdout),
        Command::Truncate { file, size } => truncate(&file, size, &mut stdout),
    }
}

/// A host file reachable only through its native object.
///
/// Holds the single outstanding reference; dropping it performs the final
/// release.
struct NativeFile {
    token: Token,
    native: ForeignStream,
}

impl NativeFile {
    fn wrap(stream: FileStream, config: AdapterConfig) -> Result<Self> {
        let owner = ManagedStream::with_config(stream, config);
        let native = owner.to_foreign()?;
        // From here on the object lives only as long as `native`.
        owner.release()?;
        debug!("Wrapped file as stream object {}", owner.token());
        Ok(Self {
            token: owner.token(),
            native,
        })
    }

    fn open(path: &Path, access: AccessMode, config: AdapterConfig) -> Result<Self> {
        let stream = FileStream::open(path, access)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Self::wrap(stream, config)
    }

    fn create(path: &Path, config: AdapterConfig) -> Result<Self> {
        let stream = FileStream::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Self::wrap(stream, config)
    }

    fn seek_to(&self, spec: &RangeSpec) -> Result<()> {
        let offset = spec.seek_offset()?;
        self.native
            .seek(offset, SeekOrigin::Begin)
            .map_err(|status| anyhow::anyhow!("Seek to {} failed: {}", offset, status))?;
        Ok(())
    }
}

impl Drop for NativeFile {
    fn drop(&mut self) {
        debug!("Releasing stream object {}", self.token);
    }
}

fn check(status: HResult, what: &str) -> Result<()> {
    if status.is_failure() {
        anyhow::bail!("{} failed: {}", what, status);
    }
    Ok(())
}

fn mode_name(mode: Option<AccessMode>) -> &'static str {
    match mode {
        Some(AccessMode::Read) => "read",
        Some(AccessMode::Write) => "write",
        Some(AccessMode::ReadWrite) => "read-write",
        None => "unknown",
    }
}

fn stat(path: &Path, read_only: bool, out: &mut impl Write) -> Result<()> {
    let access = if read_only {
        AccessMode::Read
    } else {
        AccessMode::ReadWrite
    };
    let file = NativeFile::open(path, access, AdapterConfig::DEFAULT)?;
    let record = file
        .native
        .stat(0)
        .map_err(|status| anyhow::anyhow!("Stat failed: {}", status))?;

    writeln!(out, "file: {}", path.display())?;
    writeln!(out, "size: {}", record.size)?;
    writeln!(out, "type: {}", record.kind)?;
    writeln!(out, "mode: {}", mode_name(record.access_mode()))?;
    Ok(())
}

fn cat(spec: &RangeSpec, chunk: u32, out: &mut impl Write) -> Result<()> {
    if chunk == 0 {
        anyhow::bail!("Chunk size must be at least 1 byte");
    }
    let file = NativeFile::open(&spec.path, AccessMode::Read, AdapterConfig::DEFAULT)?;
    file.seek_to(spec)?;

    let mut buf = vec![0u8; chunk as usize];
    let mut remaining = spec.count();
    let mut total = 0u64;
    while remaining > 0 {
        let want = remaining.min(u64::from(chunk)) as usize;
        let transfer = file.native.read(&mut buf[..want]);
        check(transfer.status, "Read")?;
        out.write_all(&buf[..transfer.count as usize])?;
        total += u64::from(transfer.count);
        remaining -= u64::from(transfer.count);
        if transfer.status == HResult::S_FALSE {
            break;
        }
    }
    out.flush()?;
    debug!("Read {} bytes from {}", total, spec.path.display());
    Ok(())
}

fn copy(
    spec: &RangeSpec,
    destination: &Path,
    copy_buffer: Option<usize>,
    out: &mut impl Write,
) -> Result<()> {
    let config = match copy_buffer {
        Some(size) => AdapterConfig::new(AdapterConfig::DEFAULT.max_chunk(), size)
            .context("Invalid copy buffer size")?,
        None => AdapterConfig::DEFAULT,
    };
    let source = NativeFile::open(&spec.path, AccessMode::Read, config)?;
    let target = NativeFile::create(destination, AdapterConfig::DEFAULT)?;
    source.seek_to(spec)?;

    let outcome = source.native.copy_to(&target.native, spec.count());
    check(outcome.status, "CopyTo")?;
    info!(
        "Copied {} to {} ({} bytes)",
        spec.path.display(),
        destination.display(),
        outcome.written
    );
    writeln!(out, "{} bytes read, {} bytes written", outcome.read, outcome.written)?;
    Ok(())
}

fn truncate(path: &Path, size: u64, out: &mut impl Write) -> Result<()> {
    let file = NativeFile::open(path, AccessMode::ReadWrite, AdapterConfig::DEFAULT)?;
    check(file.native.set_size(size), "SetSize")?;
    let record = file
        .native
        .stat(0)
        .map_err(|status| anyhow::anyhow!("Stat failed: {}", status))?;
    writeln!(out, "{}: {} bytes", path.display(), record.size)?;
    Ok(())
}
