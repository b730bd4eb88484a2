//! Growable containers backed by [`AlignedAllocator`].
//!
//! The containers themselves are `allocator_api2::vec::Vec`; this module only
//! names the aligned instantiations and wraps the calls that perform the
//! first heap allocation.

use std::mem;

use allocator_api2::collections::TryReserveErrorKind;

use crate::{AlignedAllocator, AllocError, Result};

/// Block size assumed for `O_DIRECT` buffers.
pub const DIRECT_IO_ALIGNMENT: usize = 512;

/// A `Vec` whose heap buffer starts on an `ALIGN`-byte boundary.
///
/// A freshly constructed, empty vector has not allocated yet and its
/// `as_ptr()` is not aligned to `ALIGN`. The buffer is aligned from the first
/// heap allocation on, through every later reallocation.
pub type AlignedVec<T, const ALIGN: usize> = allocator_api2::vec::Vec<T, AlignedAllocator<T, ALIGN>>;

/// A growable byte buffer aligned to `ALIGN`.
pub type AlignedBytes<const ALIGN: usize> = AlignedVec<u8, ALIGN>;

/// A byte buffer suitable for `O_DIRECT` reads and writes.
pub type DirectIoBuffer = AlignedBytes<DIRECT_IO_ALIGNMENT>;

/// Creates an empty vector. No memory is allocated.
pub fn aligned_vec<T, const ALIGN: usize>() -> AlignedVec<T, ALIGN> {
  allocator_api2::vec::Vec::new_in(AlignedAllocator::new())
}

/// Creates a vector with room for `capacity` elements.
///
/// Aborts through `handle_alloc_error` if the allocation fails, like every
/// infallible `Vec` constructor.
pub fn aligned_vec_with_capacity<T, const ALIGN: usize>(capacity: usize) -> AlignedVec<T, ALIGN> {
  allocator_api2::vec::Vec::with_capacity_in(capacity, AlignedAllocator::new())
}

/// Reserves room for `additional` more elements, reporting failure instead
/// of aborting.
///
/// A capacity that cannot be expressed in `isize::MAX` bytes is reported as
/// [`AllocError::CapacityOverflow`]; a refused allocation as
/// [`AllocError::AllocationFailure`] with `ENOMEM`.
pub fn try_reserve_aligned<T, const ALIGN: usize>(
  vec: &mut AlignedVec<T, ALIGN>,
  additional: usize,
) -> Result<()> {
  let requested = vec.len().saturating_add(additional);

  vec.try_reserve(additional).map_err(|err| match err.kind() {
    TryReserveErrorKind::CapacityOverflow => AllocError::CapacityOverflow {
      count: requested,
      elem_size: mem::size_of::<T>(),
    },
    // posix_memalign only fails with EINVAL for a bad alignment, which
    // AlignedAllocator rules out at compile time.
    TryReserveErrorKind::AllocError { layout, .. } => AllocError::AllocationFailure {
      size: layout.size(),
      align: layout.align().max(ALIGN),
      code: libc::ENOMEM,
    },
  })
}
