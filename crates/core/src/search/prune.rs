//! Removal of invented parent pairs that add no structural information.
//!
//! A founder of the original graph receives two invented parents during
//! expansion. When neither of them parents anybody else, the pair only
//! restates that the founder has two parents; dropping it returns the
//! founder to its original state and collapses the "unrelated" assignment
//! onto the input graph instead of a padded copy of it. A pair in which at
//! least one member is shared with another child is kept, since sharing is
//! exactly the sibship information the enumeration exists to propose.

use crate::graph::PedigreeGraph;

/// Remove every uninformative invented parent pair from `expanded`.
///
/// `founders` are the parentless individuals of the original graph and
/// `n_original` its size; invented parents occupy indices `n_original..`.
/// A founder with no children keeps its pair, so an isolated individual
/// completes to a trio rather than collapsing back to a bare singleton.
/// Surviving individuals are renumbered contiguously.
pub(crate) fn prune_founder_parents(
    expanded: &PedigreeGraph,
    founders: &[usize],
    n_original: usize,
) -> PedigreeGraph {
    let mut remove = Vec::new();

    for &f in founders {
        if expanded.children_of(f).is_empty() {
            continue;
        }
        let (Some(father), Some(mother)) = (expanded.father_of(f), expanded.mother_of(f))
        else {
            continue;
        };
        if father < n_original || mother < n_original {
            continue;
        }
        if expanded.children_of(father).len() == 1 && expanded.children_of(mother).len() == 1 {
            remove.push(father);
            remove.push(mother);
        }
    }

    if remove.is_empty() {
        expanded.clone()
    } else {
        expanded.without_individuals(&remove)
    }
}
