use std::path::PathBuf;

use aligned_allocator::{
  DIRECT_IO_ALIGNMENT, DirectFile, DirectIoBuffer, aligned_vec, try_reserve_aligned,
};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Grows 512-byte aligned buffers and writes one with O_DIRECT.
#[derive(Parser, Debug)]
struct Args {
  /// File written with O_DIRECT.
  #[arg(long, default_value = "output")]
  output: PathBuf,

  /// Bytes appended to the buffer before the write.
  #[arg(long, default_value_t = 128 * 1024 * 1024)]
  length: usize,

  /// Values pushed onto the u32 vector.
  #[arg(long, default_value_t = 2 * 1024 * 1024)]
  elements: u32,
}

/// Prints the address of a buffer and its remainder modulo the block size.
fn print_address<T>(
  label: &str,
  ptr: *const T,
) {
  println!(
    "[{}] Buffer address: {:#x}, address % {} = {}",
    label,
    ptr.addr(),
    DIRECT_IO_ALIGNMENT,
    ptr.addr() % DIRECT_IO_ALIGNMENT
  );
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let args = Args::parse();

  // --------------------------------------------------------------------
  // 1) An empty buffer. Nothing has been allocated yet, so the pointer is
  //    whatever the container uses for "no storage" and is not aligned.
  // --------------------------------------------------------------------
  let mut buf: DirectIoBuffer = aligned_vec();
  print_address("1", buf.as_ptr());

  // --------------------------------------------------------------------
  // 2) Reserve some space. The allocator ran, so the buffer is aligned.
  // --------------------------------------------------------------------
  buf.clear();
  try_reserve_aligned(&mut buf, 100)?;
  print_address("2", buf.as_ptr());

  // --------------------------------------------------------------------
  // 3) Grow it. Every reallocation goes through the allocator again.
  // --------------------------------------------------------------------
  try_reserve_aligned(&mut buf, args.length)?;
  buf.extend(std::iter::repeat_n(b'z', args.length));
  print_address("3", buf.as_ptr());

  // --------------------------------------------------------------------
  // 4) Write the whole buffer with O_DIRECT, then try a buffer shifted by
  //    one byte and let the kernel reject it.
  // --------------------------------------------------------------------
  let mut file = DirectFile::create(&args.output)
    .with_context(|| format!("failed to open {} with O_DIRECT", args.output.display()))?;

  match file.write_aligned(&buf) {
    Ok(written) => println!("[4] Successfully written {written} bytes."),
    Err(err) => println!("[4] error: {err}"),
  }

  if buf.len() > DIRECT_IO_ALIGNMENT {
    let shifted = &buf[1..=DIRECT_IO_ALIGNMENT];
    match file.write_unchecked(shifted) {
      Ok(written) => println!("[4] Unaligned write unexpectedly wrote {written} bytes."),
      Err(err) => println!("[4] Unaligned write rejected: {err}"),
    }
  }

  // --------------------------------------------------------------------
  // 5) Vectors of other element types work the same way.
  // --------------------------------------------------------------------
  let mut vec = aligned_vec::<u32, DIRECT_IO_ALIGNMENT>();
  vec.resize(50, 0);
  print_address("5", vec.as_ptr());

  for i in 0..args.elements {
    vec.push(i);
  }
  print_address("5", vec.as_ptr());

  Ok(())
}
