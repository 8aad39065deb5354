//! Parallel merge sort.
//!
//! Splits are forked with [`rayon::join`] on a pool built for the call.

use std::cmp::Ordering;

use crate::key::RadixKey;

/// Below this length a split is sorted with the standard library sort.
pub const SEQUENTIAL_CUTOFF: usize = 1_000;

/// Splits at depth below this fork the left half.
pub const MAX_SPLIT_DEPTH: u32 = 4;

#[inline]
fn compare<T: RadixKey>(a: &T, b: &T, ascending: bool) -> Ordering {
    let ord = a.radix_key().cmp(&b.radix_key());
    if ascending {
        ord
    } else {
        ord.reverse()
    }
}

/// Stable divide-and-conquer merge sort. Splits fork up to
/// [`MAX_SPLIT_DEPTH`], so at most `2^MAX_SPLIT_DEPTH` workers run.
pub fn parallel_merge_sort<T: RadixKey>(data: &mut [T], ascending: bool) {
    if data.len() < 2 {
        return;
    }
    let mut buffer = data.to_vec();
    if data.len() <= SEQUENTIAL_CUTOFF {
        sort_split(data, &mut buffer, ascending, MAX_SPLIT_DEPTH);
        return;
    }

    let built = rayon::ThreadPoolBuilder::new()
        .num_threads(1 << MAX_SPLIT_DEPTH)
        .thread_name(|i| format!("packplan-merge-{i}"))
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| sort_split(data, &mut buffer, ascending, 0))
        });
    if let Err(err) = built {
        log::warn!("merge sort pool unavailable ({err}); sorting inline");
        sort_split(data, &mut buffer, ascending, MAX_SPLIT_DEPTH);
    }
}

fn sort_split<T: RadixKey>(data: &mut [T], buffer: &mut [T], ascending: bool, depth: u32) {
    if data.len() <= SEQUENTIAL_CUTOFF {
        data.sort_by(|a, b| compare(a, b, ascending));
        return;
    }

    let mid = data.len() / 2;
    {
        let (left, right) = data.split_at_mut(mid);
        let (left_buf, right_buf) = buffer.split_at_mut(mid);

        if depth < MAX_SPLIT_DEPTH {
            rayon::join(
                || sort_split(left, left_buf, ascending, depth + 1),
                || sort_split(right, right_buf, ascending, depth + 1),
            );
        } else {
            sort_split(left, left_buf, ascending, depth + 1);
            sort_split(right, right_buf, ascending, depth + 1);
        }
    }

    merge_into(&data[..mid], &data[mid..], buffer, ascending);
    data.copy_from_slice(buffer);
}

/// Merges two sorted runs into `out`, taking from `left` on ties.
fn merge_into<T: RadixKey>(left: &[T], right: &[T], out: &mut [T], ascending: bool) {
    let (mut i, mut j, mut k) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        if compare(&right[j], &left[i], ascending) == Ordering::Less {
            out[k] = right[j];
            j += 1;
        } else {
            out[k] = left[i];
            i += 1;
        }
        k += 1;
    }
    let rest_left = &left[i..];
    out[k..k + rest_left.len()].copy_from_slice(rest_left);
    k += rest_left.len();
    out[k..].copy_from_slice(&right[j..]);
}
