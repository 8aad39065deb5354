//! # Packplan Sort
//!
//! Length-ordering sort engine for packplan.
//!
//! [`SortEngine`] picks one of several interchangeable sorters by input size,
//! key spread, worker count and CPU capability:
//!
//! - **Insertion** for tiny inputs
//! - **Radix**: serial LSD over 8-bit digits, and a vectorized variant
//! - **Parallel radix**: per-worker histograms and stable scatter offsets
//! - **Counting**: serial and parallel (atomic cursors), bounded key range
//! - **Parallel merge**: one extra worker per split up to a depth limit
//! - **Lock-free**: bucket sorts over `crossbeam` multi-producer queues
//!
//! ## Feature Flags
//!
//! - `simd` (default): compile the AVX2 lane path, taken only when the CPU
//!   reports AVX2 at runtime

pub mod counting;
pub mod engine;
pub mod insertion;
pub mod key;
pub mod lockfree;
pub mod merge;
pub mod parallel_radix;
pub mod radix;
mod scatter;
pub mod simd;

// Re-exports
pub use counting::{counting_sort, parallel_counting_sort, MAX_COUNTING_RANGE};
pub use engine::{SortAlgorithm, SortEngine, DEFAULT_PARALLEL_THRESHOLD};
pub use insertion::{insertion_sort, INSERTION_THRESHOLD};
pub use key::{is_sorted_by_key, RadixKey};
pub use lockfree::{lock_free_counting_sort, lock_free_radix_sort};
pub use merge::parallel_merge_sort;
pub use parallel_radix::parallel_radix_sort;
pub use radix::radix_sort;
pub use simd::{detect_simd, simd_level, simd_radix_sort, SimdLevel};
