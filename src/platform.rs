use std::ptr::{self, NonNull};

use libc::c_void;

use crate::{AllocError, Result};

/// Asks `posix_memalign` for `size` bytes aligned to `align`.
///
/// The platform rejects alignments that are not a power of two multiple of
/// `size_of::<*const ()>()` with `EINVAL`. The returned block is
/// uninitialized and must be released with [`free_raw`].
pub fn aligned_alloc_raw(
  size: usize,
  align: usize,
) -> Result<NonNull<u8>> {
  let mut address: *mut c_void = ptr::null_mut();

  let code = unsafe { libc::posix_memalign(&mut address, align, size) };

  if code != 0 {
    return Err(AllocError::AllocationFailure { size, align, code });
  }

  let block = NonNull::new(address.cast::<u8>()).ok_or(AllocError::AllocationFailure {
    size,
    align,
    code: libc::ENOMEM,
  })?;

  tracing::trace!(size, align, address = ?block, "posix_memalign");

  Ok(block)
}

/// Hands a block back to `free`.
///
/// # Safety
///
/// `block` must come from [`aligned_alloc_raw`] and must not have been
/// freed already.
pub unsafe fn free_raw(block: NonNull<u8>) {
  tracing::trace!(address = ?block, "free");

  unsafe { libc::free(block.as_ptr().cast::<c_void>()) }
}
