//! Canonical invariant for sex-symmetry deduplication.
//!
//! Two candidate assignments that connect invented parents to exactly the
//! same child sets, and differ only in which of those roles was labeled
//! father or mother, produce isomorphic pedigrees under same-sex relabeling
//! of the invented individuals. The invariant below is equal for exactly
//! those pairs, so keeping the first assignment per invariant removes the
//! redundancy.

/// Sorted collection of each invented parent's child set. Child sets are
/// ascending by construction, so sorting the outer collection yields one
/// canonical key per equivalence class.
pub(crate) type AssignmentKey = Vec<Vec<usize>>;

/// Key of one candidate assignment, covering invented fathers and mothers
/// alike. Only meaningful when more than one parent is invented; a single
/// invented parent has no symmetric alternative.
pub(crate) fn assignment_key(
    father_groups: &[Vec<usize>],
    mother_groups: &[Vec<usize>],
) -> AssignmentKey {
    let mut key: AssignmentKey = father_groups
        .iter()
        .chain(mother_groups.iter())
        .cloned()
        .collect();
    key.sort();
    key
}
