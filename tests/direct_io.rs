#![cfg(target_os = "linux")]

use std::{
  io,
  path::{Path, PathBuf},
};

use aligned_allocator::{
  DIRECT_IO_ALIGNMENT, DirectFile, DirectIoBuffer, DirectIoError, aligned_vec, is_aligned,
};

const LENGTH: usize = 16 * 1024 * 1024;

fn scratch_dir() -> tempfile::TempDir {
  tempfile::tempdir_in(env!("CARGO_TARGET_TMPDIR")).unwrap()
}

// tmpfs and a few other filesystems refuse O_DIRECT at open time.
fn create_or_skip(path: &Path) -> Option<DirectFile> {
  match DirectFile::create(path) {
    Ok(file) => Some(file),
    Err(err) if err.raw_os_error() == Some(libc::EINVAL) => {
      eprintln!("skipping: {} does not support O_DIRECT", path.display());
      None
    }
    Err(err) => panic!("failed to open {}: {err}", path.display()),
  }
}

fn filled_buffer() -> DirectIoBuffer {
  let mut buf = aligned_vec();

  buf.clear();
  buf.reserve(100);
  buf.extend(std::iter::repeat_n(b'z', LENGTH));
  buf
}

#[test]
fn empty_buffer_then_aligned_after_reserve() {
  // An empty buffer has not allocated, so its address is not checked.
  let mut buf: DirectIoBuffer = aligned_vec();
  assert_eq!(buf.capacity(), 0);

  buf.clear();
  buf.reserve(1);
  assert!(is_aligned(buf.as_ptr(), DIRECT_IO_ALIGNMENT));

  buf.extend(std::iter::repeat_n(b'z', LENGTH));
  assert!(is_aligned(buf.as_ptr(), DIRECT_IO_ALIGNMENT));
}

#[test]
fn aligned_buffer_is_written_in_full() {
  let dir = scratch_dir();
  let path: PathBuf = dir.path().join("output");

  let Some(mut file) = create_or_skip(&path) else {
    return;
  };

  let buf = filled_buffer();
  let written = file.write_aligned(&buf).unwrap();
  assert_eq!(written, buf.len());

  drop(file);
  assert_eq!(std::fs::metadata(&path).unwrap().len(), LENGTH as u64);

  let mut file = DirectFile::open(&path).unwrap();
  let mut back: DirectIoBuffer = aligned_vec();
  back.resize(LENGTH, 0);

  let read = file.read_aligned(&mut back).unwrap();
  assert!(read > 0 && read <= LENGTH);
  assert!(back[..read].iter().all(|&b| b == b'z'));
}

#[test]
fn unaligned_buffer_is_rejected() {
  let dir = scratch_dir();
  let path = dir.path().join("output");

  let Some(mut file) = create_or_skip(&path) else {
    return;
  };

  let mut buf: DirectIoBuffer = aligned_vec();
  buf.resize(2 * 4096, b'z');
  let shifted = &buf[1..4097];

  match file.write_aligned(shifted) {
    Err(DirectIoError::Misaligned { align, .. }) => assert_eq!(align, DIRECT_IO_ALIGNMENT),
    other => panic!("unexpected result: {other:?}"),
  }

  assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn kernel_rejects_unaligned_buffer() {
  let dir = scratch_dir();
  let path = dir.path().join("output");

  let Some(mut file) = create_or_skip(&path) else {
    return;
  };

  let mut buf: DirectIoBuffer = aligned_vec();
  buf.resize(2 * 4096, b'z');

  match file.write_unchecked(&buf[1..4097]) {
    Err(err) => assert_eq!(err.raw_os_error(), Some(libc::EINVAL), "{err}"),
    Ok(written) => {
      eprintln!("skipping: {} accepted an unaligned O_DIRECT write of {written} bytes", path.display());
    }
  }
}

#[test]
fn empty_buffer_is_a_zero_length_write() {
  let dir = scratch_dir();
  let path = dir.path().join("output");

  let Some(mut file) = create_or_skip(&path) else {
    return;
  };

  let empty: DirectIoBuffer = aligned_vec();
  assert_eq!(file.write_aligned(&empty).unwrap(), 0);
  assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn io_errors_pass_through() {
  let dir = scratch_dir();

  let err = DirectFile::open(dir.path().join("missing")).unwrap_err();
  assert_eq!(err.kind(), io::ErrorKind::NotFound);

  let err: DirectIoError = err.into();
  assert!(matches!(err, DirectIoError::Io(_)));
}
