use std::mem;

use crate::{AllocError, Result};

/// Rounds `value` up to the next multiple of `align`.
///
/// `align` must be a power of two, which every alignment handled by this
/// crate is.
///
/// # Examples
///
/// ```rust
/// use aligned_allocator::align_up;
///
/// assert_eq!(align_up!(1, 512), 512);
/// assert_eq!(align_up!(512, 512), 512);
/// assert_eq!(align_up!(513, 512), 1024);
/// assert_eq!(align_up!(13, 8), 16);
/// ```
#[macro_export]
macro_rules! align_up {
  ($value:expr, $align:expr) => {
    ($value + $align - 1) & !($align - 1)
  };
}

/// Smallest alignment accepted by `posix_memalign`: the size of a pointer.
pub const MIN_ALIGNMENT: usize = mem::size_of::<*const ()>();

/// Returns `true` if `align` is a power of two no smaller than a pointer.
pub const fn alignment_is_valid(align: usize) -> bool {
  align.is_power_of_two() && align >= MIN_ALIGNMENT
}

/// Runtime counterpart of [`alignment_is_valid`].
pub fn validate_alignment(align: usize) -> Result<()> {
  if alignment_is_valid(align) {
    Ok(())
  } else {
    Err(AllocError::InvalidAlignment { align })
  }
}

/// Returns `true` if `ptr` is a multiple of `align`.
///
/// Nothing is aligned to an `align` that is not a power of two, zero
/// included.
pub fn is_aligned<T>(
  ptr: *const T,
  align: usize,
) -> bool {
  align.is_power_of_two() && ptr.addr() & (align - 1) == 0
}
