//! Kendall-tau rank distance between permutations.
//!
//! The second permutation is re-expressed in the rank order induced by the
//! first, which turns the discordant-pair count into an inversion count.
//! Inversions are counted with a merge sort that adds the cross inversions
//! found at each merge: O(n log n) time, O(n) extra space.
//!
//! # References
//!
//! - Kendall (1938), "A New Measure of Rank Correlation"
//! - Sedgewick & Wayne, *Algorithms* 4th ed., §2.5 (KendallTau)

use crate::error::{LandscapeError, Result};
use crate::numeric::Coordinate;
use std::collections::HashMap;

/// Counts inversions in `values`, sorting it in place.
///
/// An inversion is a pair `i < j` with `values[i] > values[j]`.
///
/// # Examples
///
/// ```
/// use u_landscape::metric::count_inversions;
///
/// let mut v = vec![3, 2, 1, 0];
/// assert_eq!(count_inversions(&mut v), 6);
/// assert_eq!(v, vec![0, 1, 2, 3]);
/// ```
pub fn count_inversions(values: &mut [usize]) -> u64 {
    let mut aux = values.to_vec();
    sort_and_count(values, &mut aux)
}

fn sort_and_count(a: &mut [usize], aux: &mut [usize]) -> u64 {
    let n = a.len();
    if n <= 1 {
        return 0;
    }
    let mid = n.div_ceil(2);
    let mut inversions = {
        let (left, right) = a.split_at_mut(mid);
        let (aux_left, aux_right) = aux.split_at_mut(mid);
        sort_and_count(left, aux_left) + sort_and_count(right, aux_right)
    };
    inversions += merge(a, aux, mid);
    inversions
}

/// Merges the sorted halves `a[..mid]` and `a[mid..]`, returning the number
/// of pairs split across the halves that were out of order.
fn merge(a: &mut [usize], aux: &mut [usize], mid: usize) -> u64 {
    aux.copy_from_slice(a);
    let n = a.len();
    let (mut i, mut j) = (0, mid);
    let mut inversions = 0u64;
    for slot in a.iter_mut() {
        if i >= mid {
            *slot = aux[j];
            j += 1;
        } else if j >= n {
            *slot = aux[i];
            i += 1;
        } else if aux[j] < aux[i] {
            *slot = aux[j];
            j += 1;
            // every remaining left element is greater than aux[j]
            inversions += (mid - i) as u64;
        } else {
            *slot = aux[i];
            i += 1;
        }
    }
    inversions
}

/// Position of each symbol of `reference`, failing on duplicates.
fn rank_map(reference: &[Coordinate]) -> Result<HashMap<String, usize>> {
    let mut ranks = HashMap::with_capacity(reference.len());
    for (i, c) in reference.iter().enumerate() {
        if ranks.insert(c.token(), i).is_some() {
            return Err(LandscapeError::TypeMismatch(format!(
                "repeated symbol {c} in permutation"
            )));
        }
    }
    Ok(ranks)
}

/// Number of discordant pairs between two permutations of the same symbols.
///
/// # Errors
///
/// - [`LandscapeError::DimensionMismatch`] if the lengths differ.
/// - [`LandscapeError::TypeMismatch`] if either side repeats a symbol or
///   `b` holds a symbol absent from `a`.
pub fn kendall_tau_inversions(a: &[Coordinate], b: &[Coordinate]) -> Result<u64> {
    if a.len() != b.len() {
        return Err(LandscapeError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    let ranks = rank_map(a)?;
    let mut seen = vec![false; a.len()];
    let mut remapped = Vec::with_capacity(b.len());
    for c in b {
        let rank = *ranks.get(&c.token()).ok_or_else(|| {
            LandscapeError::TypeMismatch(format!("symbol {c} is not in the other permutation"))
        })?;
        if std::mem::replace(&mut seen[rank], true) {
            return Err(LandscapeError::TypeMismatch(format!(
                "repeated symbol {c} in permutation"
            )));
        }
        remapped.push(rank);
    }
    Ok(count_inversions(&mut remapped))
}

/// For an adjacent swap of `candidate[i]` and `candidate[i + 1]`, reports per
/// seed whether `candidate[i]` (`+1`) or `candidate[i + 1]` (`-1`) comes
/// first in that seed.
///
/// Swapping the pair moves the candidate one step away from seeds marked
/// `+1` and one step closer to seeds marked `-1`, so un-normalised
/// distances can be updated without recomputing them.
///
/// # Errors
///
/// - [`LandscapeError::InvalidParameter`] if `i + 1` is out of range.
/// - [`LandscapeError::TypeMismatch`] if a seed holds neither symbol.
pub fn kendall_tau_adjust(
    candidate: &[Coordinate],
    seeds: &[Vec<Coordinate>],
    i: usize,
) -> Result<Vec<i8>> {
    if i + 1 >= candidate.len() {
        return Err(LandscapeError::InvalidParameter(format!(
            "swap position {i} out of range for length {}",
            candidate.len()
        )));
    }
    let (x_i, x_j) = (&candidate[i], &candidate[i + 1]);
    seeds
        .iter()
        .map(|seed| {
            seed.iter()
                .find_map(|e| {
                    if e == x_i {
                        Some(1)
                    } else if e == x_j {
                        Some(-1)
                    } else {
                        None
                    }
                })
                .ok_or_else(|| {
                    LandscapeError::TypeMismatch(format!("did not find {x_i} or {x_j} in seed"))
                })
        })
        .collect()
}
