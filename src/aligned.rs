use std::{
  alloc::Layout,
  cmp,
  fmt,
  marker::PhantomData,
  mem,
  ptr::{self, NonNull},
};

use allocator_api2::alloc::Allocator;

use crate::{
  AllocError,
  align::alignment_is_valid,
  platform::{aligned_alloc_raw, free_raw},
};

/// A stateless allocator whose blocks start on an `ALIGN`-byte boundary.
///
/// The type is zero-sized: all configuration lives in the type parameters,
/// so every `AlignedAllocator<T, ALIGN>` is interchangeable with every
/// other one of the same `ALIGN`. Memory comes from `posix_memalign` and
/// goes back through `free`.
///
/// `ALIGN` must be a power of two and at least pointer-sized. This is
/// checked at compile time; an invalid `ALIGN` fails to build:
///
/// ```compile_fail
/// use aligned_allocator::AlignedAllocator;
///
/// let _ = AlignedAllocator::<u8, 100>::new();
/// ```
///
/// Allocators with different `ALIGN` values are different types and cannot
/// be compared or mixed:
///
/// ```compile_fail
/// use aligned_allocator::AlignedAllocator;
///
/// let small = AlignedAllocator::<u8, 512>::new();
/// let large = AlignedAllocator::<u8, 4096>::new();
///
/// assert!(small == large);
/// ```
///
/// The same `ALIGN` with any element types compares equal:
///
/// ```
/// use aligned_allocator::AlignedAllocator;
///
/// let bytes = AlignedAllocator::<u8, 512>::new();
/// let words = AlignedAllocator::<u64, 512>::new();
///
/// assert!(bytes == words);
/// ```
///
/// Containers only call the allocator when they need heap storage. An
/// empty container, or one using inline storage, exposes a pointer that is
/// not aligned to `ALIGN`: the buffer is aligned only after the first heap
/// allocation.
pub struct AlignedAllocator<T, const ALIGN: usize> {
  _marker: PhantomData<fn() -> T>,
}

impl<T, const ALIGN: usize> AlignedAllocator<T, ALIGN> {
  /// Byte boundary every allocation is aligned to.
  pub const ALIGNMENT: usize = ALIGN;

  const VALID: () = assert!(
    alignment_is_valid(ALIGN),
    "ALIGN must be a power of two and at least pointer-sized"
  );

  pub const fn new() -> Self {
    let () = Self::VALID;

    Self { _marker: PhantomData }
  }

  pub const fn alignment(&self) -> usize {
    ALIGN
  }

  /// Returns an allocator for `U` with the same alignment.
  pub const fn rebind<U>(&self) -> AlignedAllocator<U, ALIGN> {
    AlignedAllocator::new()
  }

  /// Allocates uninitialized storage for `n` values of `T`.
  ///
  /// The returned address is a multiple of `ALIGN` (and of `align_of::<T>()`
  /// when that is larger). Requests for zero bytes never reach the platform
  /// and yield a dangling, aligned pointer that must not be dereferenced.
  pub fn allocate(
    &self,
    n: usize,
  ) -> crate::Result<NonNull<T>> {
    let layout = Self::layout_for(n)?;

    allocate_aligned(layout.size(), Self::effective_align()).map(NonNull::cast)
  }

  /// Releases storage obtained from [`allocate`](Self::allocate).
  ///
  /// `n` is only used to recognise zero-byte allocations; the platform
  /// primitive does not check it.
  ///
  /// # Safety
  ///
  /// `ptr` must have been returned by `allocate(n)` on an allocator equal to
  /// this one and must not have been deallocated already.
  pub unsafe fn deallocate(
    &self,
    ptr: NonNull<T>,
    n: usize,
  ) {
    let size = mem::size_of::<T>().wrapping_mul(n);

    unsafe { deallocate_aligned(ptr.cast(), size) }
  }

  fn layout_for(n: usize) -> crate::Result<Layout> {
    Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow {
      count: n,
      elem_size: mem::size_of::<T>(),
    })
  }

  const fn effective_align() -> usize {
    let () = Self::VALID;

    if mem::align_of::<T>() > ALIGN {
      mem::align_of::<T>()
    } else {
      ALIGN
    }
  }
}

fn allocate_aligned(
  size: usize,
  align: usize,
) -> crate::Result<NonNull<u8>> {
  if size == 0 {
    return NonNull::new(ptr::without_provenance_mut(align))
      .ok_or(AllocError::InvalidAlignment { align });
  }

  aligned_alloc_raw(size, align)
}

unsafe fn deallocate_aligned(
  ptr: NonNull<u8>,
  size: usize,
) {
  if size == 0 {
    return;
  }

  unsafe { free_raw(ptr) }
}

/// Allocators that can produce a sibling for another element type.
pub trait Rebind {
  type Rebound<U>;

  fn rebind<U>(&self) -> Self::Rebound<U>;
}

impl<T, const ALIGN: usize> Rebind for AlignedAllocator<T, ALIGN> {
  type Rebound<U> = AlignedAllocator<U, ALIGN>;

  fn rebind<U>(&self) -> Self::Rebound<U> {
    AlignedAllocator::rebind(self)
  }
}

impl<T, const ALIGN: usize> Default for AlignedAllocator<T, ALIGN> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T, const ALIGN: usize> Clone for AlignedAllocator<T, ALIGN> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T, const ALIGN: usize> Copy for AlignedAllocator<T, ALIGN> {}

impl<T, const ALIGN: usize> fmt::Debug for AlignedAllocator<T, ALIGN> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("AlignedAllocator")
      .field("element", &std::any::type_name::<T>())
      .field("align", &ALIGN)
      .finish()
  }
}

// Memory from one instance can always be freed by another with the same
// ALIGN, whatever the element type.
impl<T, U, const ALIGN: usize> PartialEq<AlignedAllocator<U, ALIGN>> for AlignedAllocator<T, ALIGN> {
  fn eq(
    &self,
    _other: &AlignedAllocator<U, ALIGN>,
  ) -> bool {
    true
  }
}

impl<T, const ALIGN: usize> Eq for AlignedAllocator<T, ALIGN> {}

// SAFETY: blocks come from posix_memalign with an alignment of at least
// `layout.align()` and stay valid until `deallocate`. The allocator has no
// state, so copies and clones free each other's blocks.
unsafe impl<T, const ALIGN: usize> Allocator for AlignedAllocator<T, ALIGN> {
  fn allocate(
    &self,
    layout: Layout,
  ) -> Result<NonNull<[u8]>, allocator_api2::alloc::AllocError> {
    let align = cmp::max(layout.align(), Self::effective_align());
    let block = allocate_aligned(layout.size(), align)?;

    Ok(NonNull::slice_from_raw_parts(block, layout.size()))
  }

  unsafe fn deallocate(
    &self,
    ptr: NonNull<u8>,
    layout: Layout,
  ) {
    unsafe { deallocate_aligned(ptr, layout.size()) }
  }
}
