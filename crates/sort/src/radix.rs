//! Serial LSD radix sort over 8-bit digits.
//!
//! Direction is handled by laying out bucket offsets from the low end
//! (ascending) or the high end (descending). Every pass is stable, so the
//! result is stable in both directions.

use crate::key::{key_bounds, passes_for, RadixKey};

/// Number of buckets per pass.
pub const BUCKETS: usize = 256;

/// Bits consumed per pass.
pub const RADIX_BITS: u32 = 8;

/// Extracts digit `pass` (0 = least significant byte) from `key`.
#[inline(always)]
pub(crate) fn digit(key: u32, pass: u32) -> usize {
    ((key >> (pass * RADIX_BITS)) & 0xFF) as usize
}

/// Counts keys per bucket for the given pass.
pub(crate) fn histogram<T: RadixKey>(data: &[T], pass: u32) -> [usize; BUCKETS] {
    let mut counts = [0usize; BUCKETS];
    for value in data {
        counts[digit(value.radix_key(), pass)] += 1;
    }
    counts
}

/// Exclusive start offset of every bucket in the output.
pub(crate) fn bucket_offsets(counts: &[usize; BUCKETS], ascending: bool) -> [usize; BUCKETS] {
    let mut offsets = [0usize; BUCKETS];
    let mut running = 0;
    if ascending {
        for bucket in 0..BUCKETS {
            offsets[bucket] = running;
            running += counts[bucket];
        }
    } else {
        for bucket in (0..BUCKETS).rev() {
            offsets[bucket] = running;
            running += counts[bucket];
        }
    }
    offsets
}

/// Returns true if a pass with these counts would not move anything.
#[inline]
pub(crate) fn is_trivial_pass(counts: &[usize; BUCKETS], len: usize) -> bool {
    counts.iter().any(|&c| c == len)
}

/// Stable scatter of `src` into `dst` by digit `pass`, consuming `offsets`.
pub(crate) fn scatter_pass<T: RadixKey>(
    src: &[T],
    dst: &mut [T],
    pass: u32,
    offsets: &mut [usize; BUCKETS],
) {
    for value in src {
        let bucket = digit(value.radix_key(), pass);
        dst[offsets[bucket]] = *value;
        offsets[bucket] += 1;
    }
}

/// Sorts `data` by key.
pub fn radix_sort<T: RadixKey>(data: &mut [T], ascending: bool) {
    let Some((_, max)) = key_bounds(data) else {
        return;
    };
    radix_sort_passes(data, ascending, passes_for(max));
}

/// Sorts `data` using only the lowest `passes` digits of each key.
pub(crate) fn radix_sort_passes<T: RadixKey>(data: &mut [T], ascending: bool, passes: u32) {
    if data.len() < 2 || passes == 0 {
        return;
    }

    let len = data.len();
    let mut buffer = data.to_vec();
    let mut in_data = true;

    for pass in 0..passes {
        let (src, dst): (&[T], &mut [T]) = if in_data {
            (&*data, &mut buffer[..])
        } else {
            (&buffer[..], &mut *data)
        };

        let counts = histogram(src, pass);
        if is_trivial_pass(&counts, len) {
            continue;
        }
        let mut offsets = bucket_offsets(&counts, ascending);
        scatter_pass(src, dst, pass, &mut offsets);
        in_data = !in_data;
    }

    if !in_data {
        data.copy_from_slice(&buffer);
    }
}
