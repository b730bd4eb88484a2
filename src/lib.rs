//! # aligned-allocator - Aligned Memory for Growable Containers
//!
//! This crate provides a **stateless aligned allocator**: every block it hands
//! out starts at an address that is a multiple of a compile-time power-of-two
//! boundary. Plug it into a growable container and the container's buffer
//! stays aligned through every reallocation.
//!
//! ## Overview
//!
//! Unbuffered file I/O (`O_DIRECT`) requires buffers that start on the
//! device block size:
//!
//! ```text
//!   Address space (ALIGN = 512):
//!
//!   0        512       1024      1536      2048      2560
//!   ├─────────┼─────────┼─────────┼─────────┼─────────┤
//!   │         │█████████████████████████████│         │
//!   │         │      AlignedVec<u8, 512>    │         │
//!   │         ▲                             │         │
//!   │         └── as_ptr() % 512 == 0       │         │
//!   └─────────┴─────────────────────────────┴─────────┘
//!
//!   The kernel accepts this buffer for an O_DIRECT write.
//!   A buffer starting at 515 is rejected with EINVAL.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   aligned_allocator
//!   ├── align       - Alignment arithmetic (align_up!, is_aligned)
//!   ├── aligned     - AlignedAllocator<T, ALIGN> and the Rebind trait
//!   ├── containers  - AlignedVec / AlignedBytes / DirectIoBuffer aliases
//!   ├── direct      - DirectFile, O_DIRECT reads and writes (Linux)
//!   ├── error       - AllocError
//!   └── platform    - posix_memalign / free wrappers (internal)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use aligned_allocator::{AlignedAllocator, aligned_vec, is_aligned};
//!
//! // Raw allocation of 1000 u32 values on a 512-byte boundary.
//! let allocator = AlignedAllocator::<u32, 512>::new();
//! let block = allocator.allocate(1000).unwrap();
//! assert!(is_aligned(block.as_ptr(), 512));
//! unsafe { allocator.deallocate(block, 1000) };
//!
//! // A growable buffer. Aligned only after its first heap allocation.
//! let mut buf = aligned_vec::<u8, 512>();
//! buf.reserve(100);
//! buf.extend(std::iter::repeat_n(b'z', 1 << 20));
//! assert!(is_aligned(buf.as_ptr(), 512));
//! ```
//!
//! ## How It Works
//!
//! The allocator is a zero-sized type. `allocate` and `deallocate` forward to
//! the platform:
//!
//! ```text
//!   container grows
//!        │
//!        ▼
//!   AlignedAllocator::allocate(layout)
//!        │   align = max(layout.align(), ALIGN)
//!        ▼
//!   posix_memalign(&ptr, align, size) ──── non-zero ──▶ AllocError
//!        │ 0
//!        ▼
//!   container copies old elements, then
//!   AlignedAllocator::deallocate(old) ──▶ free(old)
//! ```
//!
//! Zero-byte requests never reach `posix_memalign`; they get a dangling,
//! aligned pointer that is never freed.
//!
//! ## Limitations
//!
//! - **Empty containers are not aligned**: `Vec::new_in` does not allocate,
//!   so its pointer is only aligned to the element type.
//! - **No realloc-in-place**: growth always allocates, copies and frees.
//! - **Unix-only**: requires `libc` and `posix_memalign`; `direct` is Linux
//!   only.
//!
//! ## Safety
//!
//! Allocation is safe and returns a `Result`. Deallocation is `unsafe`: the
//! pointer must come from an equal allocator and must be freed only once.

pub mod align;
mod aligned;
pub mod containers;
#[cfg(target_os = "linux")]
pub mod direct;
mod error;
mod platform;

pub use align::{MIN_ALIGNMENT, alignment_is_valid, is_aligned, validate_alignment};
pub use aligned::{AlignedAllocator, Rebind};
pub use containers::{
  AlignedBytes, AlignedVec, DIRECT_IO_ALIGNMENT, DirectIoBuffer, aligned_vec, aligned_vec_with_capacity,
  try_reserve_aligned,
};
#[cfg(target_os = "linux")]
pub use direct::{DirectFile, DirectIoError, check_io_buffer};
pub use error::{AllocError, Result};
