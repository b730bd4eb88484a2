//! Error types returned by the allocator and the container helpers.
use thiserror::Error;

/// Result type for allocation operations.
pub type Result<T> = std::result::Result<T, AllocError>;

/// Failure of an aligned allocation request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  /// The platform primitive could not satisfy the request.
  #[error("failed to allocate {size} bytes aligned to {align}: os error {code}")]
  AllocationFailure {
    /// Requested size in bytes.
    size: usize,
    /// Requested alignment in bytes.
    align: usize,
    /// Status code returned by `posix_memalign`.
    code: i32,
  },

  /// `count * elem_size` does not fit in `isize::MAX` bytes.
  #[error("capacity overflow: {count} elements of {elem_size} bytes")]
  CapacityOverflow {
    /// Requested element count.
    count: usize,
    /// Size of one element in bytes.
    elem_size: usize,
  },

  /// Alignment is not a power of two or is smaller than a pointer.
  #[error("invalid alignment {align}: must be a power of two and at least pointer-sized")]
  InvalidAlignment {
    /// The rejected alignment.
    align: usize,
  },
}

impl AllocError {
  /// Returns `true` when the platform ran out of memory.
  pub fn is_out_of_memory(&self) -> bool {
    matches!(self, AllocError::AllocationFailure { code, .. } if *code == libc::ENOMEM)
  }
}

impl From<AllocError> for allocator_api2::alloc::AllocError {
  fn from(_: AllocError) -> Self {
    allocator_api2::alloc::AllocError
  }
}
