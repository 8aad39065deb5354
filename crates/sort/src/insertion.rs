//! Insertion sort for tiny inputs.

use crate::key::RadixKey;

/// Inputs shorter than this are insertion-sorted by the engine.
pub const INSERTION_THRESHOLD: usize = 64;

/// Stable in-place insertion sort by key.
pub fn insertion_sort<T: RadixKey>(data: &mut [T], ascending: bool) {
    for i in 1..data.len() {
        let value = data[i];
        let key = value.radix_key();
        let mut j = i;
        while j > 0 {
            let prev = data[j - 1].radix_key();
            let out_of_order = if ascending { prev > key } else { prev < key };
            if !out_of_order {
                break;
            }
            data[j] = data[j - 1];
            j -= 1;
        }
        data[j] = value;
    }
}
