//! Shared output buffer for parallel scatter passes.

use std::marker::PhantomData;

/// A mutable slice that several workers write into concurrently.
///
/// Each worker owns a disjoint set of indices, established before the
/// workers start (per-worker offsets or atomic cursor reservations).
pub(crate) struct ScatterBuffer<'a, T> {
    ptr: *mut T,
    len: usize,
    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: writes go to disjoint indices (see `write`), and the borrow of the
// underlying slice lasts as long as the buffer.
unsafe impl<T: Send> Send for ScatterBuffer<'_, T> {}
unsafe impl<T: Send> Sync for ScatterBuffer<'_, T> {}

impl<'a, T: Copy> ScatterBuffer<'a, T> {
    pub(crate) fn new(slice: &'a mut [T]) -> Self {
        Self {
            ptr: slice.as_mut_ptr(),
            len: slice.len(),
            _marker: PhantomData,
        }
    }

    /// Writes `value` at `index`.
    ///
    /// # Safety
    ///
    /// No other thread may write or read `index` while the buffer is alive.
    #[inline]
    pub(crate) unsafe fn write(&self, index: usize, value: T) {
        assert!(index < self.len, "scatter index {index} out of bounds ({})", self.len);
        // SAFETY: in bounds per the assert; exclusivity is the caller's contract.
        unsafe { self.ptr.add(index).write(value) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_disjoint_parallel_writes() {
        let mut out = vec![0u32; 1000];
        {
            let buffer = ScatterBuffer::new(&mut out);
            let buffer = &buffer;
            thread::scope(|s| {
                for worker in 0..4usize {
                    s.spawn(move || {
                        for i in (worker..1000).step_by(4) {
                            // SAFETY: each worker owns indices congruent to its id.
                            unsafe { buffer.write(i, i as u32 * 2) };
                        }
                    });
                }
            });
        }
        assert!(out.iter().enumerate().all(|(i, &v)| v == i as u32 * 2));
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_write_panics() {
        let mut out = vec![0u32; 2];
        let buffer = ScatterBuffer::new(&mut out);
        // SAFETY: single-threaded.
        unsafe { buffer.write(2, 1) };
    }
}
