use std::alloc::Layout;

use aligned_allocator::{AlignedAllocator, MIN_ALIGNMENT, aligned_vec, is_aligned};
use allocator_api2::alloc::Allocator;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Property: allocate(n) is aligned for every supported ALIGN and n > 0
// ---------------------------------------------------------------------------

macro_rules! allocate_is_aligned {
  ($($name:ident => $align:literal),* $(,)?) => {
    proptest! {
      $(
        #[test]
        fn $name(n in 1usize..4096) {
          let allocator = AlignedAllocator::<u32, $align>::new();

          let block = allocator.allocate(n).unwrap();
          prop_assert_eq!(block.as_ptr().addr() % $align, 0);
          unsafe { allocator.deallocate(block, n) };

          let again = allocator.allocate(n).unwrap();
          prop_assert!(is_aligned(again.as_ptr(), $align));
          unsafe { allocator.deallocate(again, n) };
        }
      )*
    }
  };
}

allocate_is_aligned! {
  allocate_aligned_to_8 => 8,
  allocate_aligned_to_16 => 16,
  allocate_aligned_to_64 => 64,
  allocate_aligned_to_512 => 512,
  allocate_aligned_to_4096 => 4096,
  allocate_aligned_to_65536 => 65536,
}

// ---------------------------------------------------------------------------
// Property: layouts asking for more than ALIGN still get what they ask for
// ---------------------------------------------------------------------------

proptest! {
  #[test]
  fn allocator_trait_honours_layout_alignment(
    shift in 0u32..16,
    size in 1usize..8192,
  ) {
    let align = (1usize << shift).max(MIN_ALIGNMENT);
    let layout = Layout::from_size_align(size, align).unwrap();
    let allocator = AlignedAllocator::<u8, 512>::new();

    let block = Allocator::allocate(&allocator, layout).unwrap();
    prop_assert!(is_aligned(block.as_ptr().cast::<u8>(), align.max(512)));
    prop_assert_eq!(block.len(), size);

    unsafe { Allocator::deallocate(&allocator, block.cast(), layout) };
  }
}

// ---------------------------------------------------------------------------
// Property: a growing vector stays aligned across every reallocation
// ---------------------------------------------------------------------------

proptest! {
  #![proptest_config(ProptestConfig::with_cases(32))]

  #[test]
  fn growth_keeps_alignment(chunks in proptest::collection::vec(1usize..10_000, 1..20)) {
    let mut vec = aligned_vec::<u16, 512>();

    for chunk in chunks {
      vec.extend(std::iter::repeat_n(7u16, chunk));
      prop_assert!(
        is_aligned(vec.as_ptr(), 512),
        "buffer at {:p} with capacity {} is not aligned",
        vec.as_ptr(),
        vec.capacity(),
      );
    }
  }
}
