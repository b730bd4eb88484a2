//! Unbuffered file access through `O_DIRECT`.
//!
//! The kernel rejects `O_DIRECT` transfers whose buffer address or length is
//! not a multiple of the device block size. [`DirectFile`] checks both
//! against [`DIRECT_IO_ALIGNMENT`] before issuing the system call, so a bad
//! buffer surfaces as a [`DirectIoError`] instead of an `EINVAL`.

use std::{
  fs::{File, OpenOptions},
  io::{self, Read, Write},
  os::unix::fs::OpenOptionsExt,
  path::Path,
};

use thiserror::Error;

use crate::{align::is_aligned, containers::DIRECT_IO_ALIGNMENT};

#[derive(Error, Debug)]
pub enum DirectIoError {
  #[error("buffer at {addr:#x} is not aligned to {align} bytes")]
  Misaligned { addr: usize, align: usize },

  #[error("buffer length {len} is not a multiple of {align} bytes")]
  UnalignedLength { len: usize, align: usize },

  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Checks that `buf` can be handed to an `O_DIRECT` transfer.
///
/// An empty buffer always passes: the kernel accepts zero-length transfers
/// and a container that has not allocated yet has no aligned address.
pub fn check_io_buffer(buf: &[u8]) -> Result<(), DirectIoError> {
  if buf.is_empty() {
    return Ok(());
  }

  if !is_aligned(buf.as_ptr(), DIRECT_IO_ALIGNMENT) {
    return Err(DirectIoError::Misaligned {
      addr: buf.as_ptr().addr(),
      align: DIRECT_IO_ALIGNMENT,
    });
  }

  if buf.len() % DIRECT_IO_ALIGNMENT != 0 {
    return Err(DirectIoError::UnalignedLength {
      len: buf.len(),
      align: DIRECT_IO_ALIGNMENT,
    });
  }

  Ok(())
}

/// A file opened with `O_DIRECT`.
#[derive(Debug)]
pub struct DirectFile {
  file: File,
}

impl DirectFile {
  /// Creates (or truncates) `path` for unbuffered reading and writing.
  pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
    let path = path.as_ref();

    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .create(true)
      .truncate(true)
      .mode(0o644)
      .custom_flags(libc::O_DIRECT)
      .open(path)?;

    tracing::debug!(path = %path.display(), "opened file with O_DIRECT");

    Ok(Self { file })
  }

  /// Opens an existing file for unbuffered reading and writing.
  pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
    let path = path.as_ref();

    let file = OpenOptions::new()
      .read(true)
      .write(true)
      .custom_flags(libc::O_DIRECT)
      .open(path)?;

    tracing::debug!(path = %path.display(), "opened file with O_DIRECT");

    Ok(Self { file })
  }

  /// Writes `buf` with a single `write(2)` after checking its alignment.
  pub fn write_aligned(
    &mut self,
    buf: &[u8],
  ) -> Result<usize, DirectIoError> {
    check_io_buffer(buf)?;

    let written = self.file.write(buf)?;
    tracing::debug!(len = buf.len(), written, "direct write");

    Ok(written)
  }

  /// Reads into `buf` with a single `read(2)` after checking its alignment.
  pub fn read_aligned(
    &mut self,
    buf: &mut [u8],
  ) -> Result<usize, DirectIoError> {
    check_io_buffer(buf)?;

    let read = self.file.read(buf)?;
    tracing::debug!(len = buf.len(), read, "direct read");

    Ok(read)
  }

  /// Writes `buf` without any checks; the kernel decides.
  pub fn write_unchecked(
    &mut self,
    buf: &[u8],
  ) -> io::Result<usize> {
    self.file.write(buf)
  }
}
