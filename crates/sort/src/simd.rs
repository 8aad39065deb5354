//! Vectorized radix sort.
//!
//! Keys are extracted once into a dense `u32` lane buffer. The maximum-key
//! reduction and the per-pass digit histogram then run over that buffer,
//! eight lanes at a time with AVX2 when the CPU has it, or in unrolled scalar
//! lanes otherwise. The scatter itself stays scalar.

use std::sync::OnceLock;

use crate::key::{passes_for, RadixKey};
use crate::radix::{self, bucket_offsets, is_trivial_pass, BUCKETS, RADIX_BITS};

/// Inputs shorter than this go to the serial radix sort.
pub const SIMD_MIN_LEN: usize = 1_000;

/// Elements ahead of the cursor to prefetch.
const PREFETCH_DISTANCE: usize = 64;

/// SIMD feature level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum SimdLevel {
    /// No SIMD available.
    #[default]
    None,
    /// SSE4.2 (x86_64).
    Sse42,
    /// AVX2 (x86_64).
    Avx2,
    /// AVX-512 (x86_64).
    Avx512,
    /// NEON (aarch64).
    Neon,
}

impl SimdLevel {
    /// Get string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SimdLevel::None => "none",
            SimdLevel::Sse42 => "sse4.2",
            SimdLevel::Avx2 => "avx2",
            SimdLevel::Avx512 => "avx512",
            SimdLevel::Neon => "neon",
        }
    }

    /// Number of 32-bit lanes per vector.
    pub fn lanes(self) -> usize {
        match self {
            SimdLevel::None => 1,
            SimdLevel::Sse42 | SimdLevel::Neon => 4,
            SimdLevel::Avx2 => 8,
            SimdLevel::Avx512 => 16,
        }
    }
}

/// Detect available SIMD level at runtime.
pub fn detect_simd() -> SimdLevel {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx512f") {
            return SimdLevel::Avx512;
        }
        if is_x86_feature_detected!("avx2") {
            return SimdLevel::Avx2;
        }
        if is_x86_feature_detected!("sse4.2") {
            return SimdLevel::Sse42;
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        return SimdLevel::Neon;
    }

    SimdLevel::None
}

static SIMD_LEVEL: OnceLock<SimdLevel> = OnceLock::new();

/// Get the current SIMD level (cached).
pub fn simd_level() -> SimdLevel {
    *SIMD_LEVEL.get_or_init(detect_simd)
}

/// Returns true if the AVX2 lane path is compiled in and usable on this CPU.
pub fn vector_path_available() -> bool {
    cfg!(all(feature = "simd", target_arch = "x86_64")) && has_avx2()
}

#[inline]
fn has_avx2() -> bool {
    matches!(simd_level(), SimdLevel::Avx2 | SimdLevel::Avx512)
}

/// Sorts `data` by key using the lane-buffer radix sort.
pub fn simd_radix_sort<T: RadixKey>(data: &mut [T], ascending: bool) {
    if data.len() < SIMD_MIN_LEN {
        radix::radix_sort(data, ascending);
        return;
    }

    let len = data.len();
    let mut keys: Vec<u32> = data.iter().map(RadixKey::radix_key).collect();
    let passes = passes_for(max_key(&keys));
    if passes == 0 {
        return;
    }

    let mut buffer = data.to_vec();
    let mut key_buffer = vec![0u32; len];
    let mut in_data = true;

    for pass in 0..passes {
        let shift = pass * RADIX_BITS;
        let (src, dst, src_keys, dst_keys): (&[T], &mut [T], &[u32], &mut [u32]) = if in_data {
            (&*data, &mut buffer[..], &keys[..], &mut key_buffer[..])
        } else {
            (&buffer[..], &mut *data, &key_buffer[..], &mut keys[..])
        };

        let counts = digit_histogram(src_keys, shift);
        if is_trivial_pass(&counts, len) {
            continue;
        }

        let mut offsets = bucket_offsets(&counts, ascending);
        for (value, &key) in src.iter().zip(src_keys) {
            let bucket = ((key >> shift) & 0xFF) as usize;
            let slot = offsets[bucket];
            dst[slot] = *value;
            dst_keys[slot] = key;
            offsets[bucket] = slot + 1;
        }
        in_data = !in_data;
    }

    if !in_data {
        data.copy_from_slice(&buffer);
    }
}

/// Maximum of `keys`, zero when empty.
pub(crate) fn max_key(keys: &[u32]) -> u32 {
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        if keys.len() >= 8 && has_avx2() {
            // SAFETY: AVX2 availability was just checked.
            return unsafe { max_key_avx2(keys) };
        }
    }

    max_key_scalar(keys)
}

/// Scalar reduction over eight independent lanes.
fn max_key_scalar(keys: &[u32]) -> u32 {
    let mut lanes = [0u32; 8];
    let chunks = keys.chunks_exact(8);
    let remainder = chunks.remainder();

    for chunk in chunks {
        for (lane, &key) in lanes.iter_mut().zip(chunk) {
            *lane = (*lane).max(key);
        }
    }

    let tail = remainder.iter().copied().max().unwrap_or(0);
    lanes.iter().copied().fold(tail, u32::max)
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
unsafe fn max_key_avx2(keys: &[u32]) -> u32 {
    use std::arch::x86_64::*;

    let chunks = keys.chunks_exact(8);
    let remainder = chunks.remainder();
    let mut acc = _mm256_setzero_si256();

    for (i, chunk) in chunks.enumerate() {
        // SAFETY: AVX2 is enabled via target_feature; `chunk` holds 8 u32s.
        // Prefetch never faults, and `wrapping_add` keeps the address computation defined.
        unsafe {
            _mm_prefetch::<_MM_HINT_T0>(
                keys.as_ptr().wrapping_add(i * 8 + PREFETCH_DISTANCE) as *const i8,
            );
            let v = _mm256_loadu_si256(chunk.as_ptr() as *const __m256i);
            acc = _mm256_max_epu32(acc, v);
        }
    }

    let mut lanes = [0u32; 8];
    // SAFETY: `lanes` is 32 bytes.
    unsafe { _mm256_storeu_si256(lanes.as_mut_ptr() as *mut __m256i, acc) };

    let tail = remainder.iter().copied().max().unwrap_or(0);
    lanes.iter().copied().fold(tail, u32::max)
}

/// Histogram of the byte at `shift` in every key.
pub(crate) fn digit_histogram(keys: &[u32], shift: u32) -> [usize; BUCKETS] {
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        if keys.len() >= 64 && has_avx2() {
            // SAFETY: AVX2 availability was just checked.
            return unsafe { digit_histogram_avx2(keys, shift) };
        }
    }

    digit_histogram_scalar(keys, shift)
}

/// Four-bank unrolled histogram.
fn digit_histogram_scalar(keys: &[u32], shift: u32) -> [usize; BUCKETS] {
    let mut banks = [[0usize; BUCKETS]; 4];
    let chunks = keys.chunks_exact(4);
    let remainder = chunks.remainder();

    for chunk in chunks {
        banks[0][((chunk[0] >> shift) & 0xFF) as usize] += 1;
        banks[1][((chunk[1] >> shift) & 0xFF) as usize] += 1;
        banks[2][((chunk[2] >> shift) & 0xFF) as usize] += 1;
        banks[3][((chunk[3] >> shift) & 0xFF) as usize] += 1;
    }
    for &key in remainder {
        banks[0][((key >> shift) & 0xFF) as usize] += 1;
    }

    merge_banks(&banks)
}

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
#[target_feature(enable = "avx2")]
unsafe fn digit_histogram_avx2(keys: &[u32], shift: u32) -> [usize; BUCKETS] {
    use std::arch::x86_64::*;

    let mut banks = [[0usize; BUCKETS]; 4];
    let mask = _mm256_set1_epi32(0xFF);
    let count = _mm_cvtsi32_si128(shift as i32);
    let mut digits = [0u32; 8];

    let chunks = keys.chunks_exact(8);
    let remainder = chunks.remainder();

    for (i, chunk) in chunks.enumerate() {
        // SAFETY: AVX2 is enabled via target_feature; `chunk` holds 8 u32s and
        // `digits` is 32 bytes.
        unsafe {
            _mm_prefetch::<_MM_HINT_T0>(
                keys.as_ptr().wrapping_add(i * 8 + PREFETCH_DISTANCE) as *const i8,
            );
            let v = _mm256_loadu_si256(chunk.as_ptr() as *const __m256i);
            let d = _mm256_and_si256(_mm256_srl_epi32(v, count), mask);
            _mm256_storeu_si256(digits.as_mut_ptr() as *mut __m256i, d);
        }

        banks[0][digits[0] as usize] += 1;
        banks[1][digits[1] as usize] += 1;
        banks[2][digits[2] as usize] += 1;
        banks[3][digits[3] as usize] += 1;
        banks[0][digits[4] as usize] += 1;
        banks[1][digits[5] as usize] += 1;
        banks[2][digits[6] as usize] += 1;
        banks[3][digits[7] as usize] += 1;
    }

    for &key in remainder {
        banks[0][((key >> shift) & 0xFF) as usize] += 1;
    }

    merge_banks(&banks)
}

fn merge_banks(banks: &[[usize; BUCKETS]; 4]) -> [usize; BUCKETS] {
    let mut counts = [0usize; BUCKETS];
    for (bucket, count) in counts.iter_mut().enumerate() {
        *count = banks[0][bucket] + banks[1][bucket] + banks[2][bucket] + banks[3][bucket];
    }
    counts
}
