use std::sync::OnceLock;

use crate::error::{PedError, Result};

/// Hard cap on the number of individuals simultaneously missing a parent of
/// one sex. Bell(7) = 877 partitions per sex, so one enumeration handles at
/// most 877 x 877 candidate assignments; beyond that the search must be
/// split by the caller.
pub const MAX_MISSING: usize = 7;

/// A set partition of `{0, .., k-1}` in canonical restricted-growth form.
///
/// `assignment[i]` is the 0-based group label of element `i`. Labels are a
/// contiguous range starting at 0 and first occurrences appear in element
/// order, so every partition has exactly one representation and the
/// enumeration order is reproducible across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPartition {
    assignment: Vec<usize>,
    n_groups: usize,
}

impl SetPartition {
    /// Number of elements being partitioned.
    pub fn n_elements(&self) -> usize {
        self.assignment.len()
    }

    /// Number of groups. Zero only for the empty partition.
    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    /// Group label of each element.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// Elements of each group in label order; elements within a group are
    /// ascending.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.n_groups];
        for (elem, &g) in self.assignment.iter().enumerate() {
            groups[g].push(elem);
        }
        groups
    }
}

/// All set partitions of `{0, .., k-1}` in canonical enumeration order.
///
/// The table for every size up to [`MAX_MISSING`] is built once per process
/// on first use and is read-only afterwards, so the returned slice can be
/// shared across concurrent callers without locking. The lengths are the
/// Bell numbers B(0)..B(7) = 1, 1, 2, 5, 15, 52, 203, 877.
///
/// `partitions_of(0)` yields the single empty partition, so callers with
/// nothing to partition need no special case.
///
/// # Errors
/// Returns `CapacityExceeded` for `k > MAX_MISSING`.
pub fn partitions_of(k: usize) -> Result<&'static [SetPartition]> {
    static TABLE: OnceLock<Vec<Vec<SetPartition>>> = OnceLock::new();

    if k > MAX_MISSING {
        return Err(PedError::CapacityExceeded {
            what: "elements to partition",
            count: k,
            max: MAX_MISSING,
        });
    }

    let table = TABLE.get_or_init(|| (0..=MAX_MISSING).map(enumerate_partitions).collect());
    Ok(&table[k])
}

/// Enumerate the partitions of `{0, .., k-1}` as restricted growth strings
/// in lexicographic order: element `i` takes any label already in use among
/// elements `0..i`, or the next unused label.
fn enumerate_partitions(k: usize) -> Vec<SetPartition> {
    let mut out = Vec::new();
    let mut assignment = vec![0usize; k];
    extend(&mut assignment, 0, 0, k, &mut out);
    out
}

fn extend(
    assignment: &mut Vec<usize>,
    position: usize,
    n_used: usize,
    k: usize,
    out: &mut Vec<SetPartition>,
) {
    if position == k {
        out.push(SetPartition {
            assignment: assignment.clone(),
            n_groups: n_used,
        });
        return;
    }
    for label in 0..=n_used {
        assignment[position] = label;
        extend(assignment, position + 1, n_used.max(label + 1), k, out);
    }
}
