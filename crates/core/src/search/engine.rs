use indexmap::IndexSet;

use crate::error::{PedError, Result};
use crate::graph::PedigreeGraph;
use crate::partition::{partitions_of, SetPartition, MAX_MISSING};

use super::inbreeding::{creates_forbidden_mating, forbidden_descendants};
use super::prune::prune_founder_parents;
use super::symmetry::assignment_key;

/// Options controlling the parent-assignment enumeration.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    /// Maximum generational gap allowed between mated linear relatives.
    /// `None` disables the filter, `Some(0)` forbids all linear matings,
    /// `Some(1)` allows parent-child matings but nothing more distant.
    pub max_linear_inbreeding: Option<u32>,
    /// Keep only the first of any two assignments that differ solely in the
    /// sex labels of structurally interchangeable invented parents.
    pub enforce_sex_symmetry: bool,
}

/// Enumerate every way of inventing the parents missing from `graph`.
///
/// Each individual lacking a father is assigned an invented father and each
/// individual lacking a mother an invented mother; individuals in the same
/// group of a set partition share one invented parent. The result holds one
/// completed graph per surviving assignment, every column summing to 0 or 2,
/// in the canonical partition-product order.
///
/// Candidates can be dropped by the sex-symmetry deduplicator or the
/// linear-inbreeding filter, and invented pairs that carry no information
/// are pruned from the emitted graphs, so a graph whose founders all stay
/// unconnected collapses back onto `graph` itself.
///
/// # Errors
/// Returns `CapacityExceeded` when more than [`MAX_MISSING`] individuals
/// lack a father, or more than [`MAX_MISSING`] lack a mother. The caller is
/// expected to split the problem rather than retry.
pub fn add_missing_parents(
    graph: &PedigreeGraph,
    options: &CompletionOptions,
) -> Result<Vec<PedigreeGraph>> {
    let missing_fa = graph.missing_father();
    let missing_mo = graph.missing_mother();

    if missing_fa.len() > MAX_MISSING {
        return Err(PedError::CapacityExceeded {
            what: "individuals missing a father",
            count: missing_fa.len(),
            max: MAX_MISSING,
        });
    }
    if missing_mo.len() > MAX_MISSING {
        return Err(PedError::CapacityExceeded {
            what: "individuals missing a mother",
            count: missing_mo.len(),
            max: MAX_MISSING,
        });
    }

    let n = graph.n_individuals();
    let founders = graph.founders();
    let forbidden = options
        .max_linear_inbreeding
        .map(|bound| forbidden_descendants(graph, bound));

    let father_partitions = partitions_of(missing_fa.len())?;
    let mother_partitions = partitions_of(missing_mo.len())?;

    let mut seen = IndexSet::new();
    let mut results = Vec::new();

    for father_partition in father_partitions {
        let father_groups = relabel(father_partition, &missing_fa);
        for mother_partition in mother_partitions {
            let mother_groups = relabel(mother_partition, &missing_mo);
            let n_invented = father_groups.len() + mother_groups.len();

            if options.enforce_sex_symmetry && n_invented > 1 {
                let key = assignment_key(&father_groups, &mother_groups);
                if !seen.insert(key) {
                    continue;
                }
            }

            if let Some(forbidden) = &forbidden {
                if creates_forbidden_mating(graph, &father_groups, &mother_groups, forbidden) {
                    continue;
                }
            }

            let expanded = graph.with_invented_parents(&father_groups, &mother_groups);
            results.push(prune_founder_parents(&expanded, &founders, n));
        }
    }

    Ok(results)
}

/// Shortcut completion for graphs whose incomplete members each lack
/// exactly one parent: every such individual gets one invented, otherwise
/// unconnected parent of the missing sex. Parentless individuals are
/// founders and are left untouched.
///
/// No combinatorial branching, deduplication or inbreeding check is needed,
/// since each invented parent serves a single individual and cannot create
/// a mating ambiguity. When every founder has a child, the single returned
/// graph equals the pruned all-singleton assignment of
/// [`add_missing_parents`] on the same input.
pub fn add_missing_parents_single(graph: &PedigreeGraph) -> PedigreeGraph {
    let mut father_groups = Vec::new();
    let mut mother_groups = Vec::new();

    for j in 0..graph.n_individuals() {
        if graph.n_parents(j) != 1 {
            continue;
        }
        if graph.father_of(j).is_none() {
            father_groups.push(vec![j]);
        } else {
            mother_groups.push(vec![j]);
        }
    }

    graph.with_invented_parents(&father_groups, &mother_groups)
}

/// Map a partition of `{0, .., k-1}` onto the actual individuals missing a
/// parent, preserving group order.
fn relabel(partition: &SetPartition, members: &[usize]) -> Vec<Vec<usize>> {
    partition
        .groups()
        .into_iter()
        .map(|group| group.into_iter().map(|elem| members[elem]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Sex;

    /// Founder mother 0 with child 1 whose father is unknown: two
    /// individuals missing a father, one missing a mother.
    fn mother_child() -> PedigreeGraph {
        PedigreeGraph::from_parent_indices(
            &[(None, None), (None, Some(0))],
            &[Sex::Female, Sex::Male],
        )
        .unwrap()
    }

    #[test]
    fn test_raw_assignment_count_is_bell_product() {
        // Bell(2) * Bell(1) = 2 assignments.
        let g = mother_child();
        let results = add_missing_parents(&g, &CompletionOptions::default()).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_shared_father_candidate() {
        let g = mother_child();
        let results = add_missing_parents(&g, &CompletionOptions::default()).unwrap();

        // First candidate: 0 and 1 share an invented father, and 0 gets an
        // invented mother. Nothing is private to a founder alone, so
        // nothing is pruned.
        let shared = &results[0];
        assert_eq!(shared.n_individuals(), 4);
        assert_eq!(shared.father_of(0), shared.father_of(1));
        assert_eq!(shared.children_of(2), vec![0, 1]);
    }

    #[test]
    fn test_singleton_candidate_prunes_founder_pair() {
        let g = mother_child();
        let results = add_missing_parents(&g, &CompletionOptions::default()).unwrap();

        // Second candidate: separate fathers. The founder's private pair is
        // pruned away, leaving only the child's invented father.
        let split = &results[1];
        assert_eq!(split.n_individuals(), 3);
        assert!(split.father_of(0).is_none());
        assert!(split.mother_of(0).is_none());
        assert_eq!(split.father_of(1), Some(2));
    }

    #[test]
    fn test_every_column_sums_to_zero_or_two() {
        let g = mother_child();
        let results = add_missing_parents(&g, &CompletionOptions::default()).unwrap();
        for graph in &results {
            for j in 0..graph.n_individuals() {
                let n_parents = graph.n_parents(j);
                assert!(
                    n_parents == 0 || n_parents == 2,
                    "column {} sums to {}",
                    j,
                    n_parents
                );
            }
        }
    }

    #[test]
    fn test_empty_graph_returns_itself() {
        let g = PedigreeGraph::from_parent_indices(&[], &[]).unwrap();
        let results = add_missing_parents(&g, &CompletionOptions::default()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].n_individuals(), 0);
    }

    #[test]
    fn test_capacity_exceeded() {
        // Eight parentless individuals: one over the cap for both sexes.
        let parents = vec![(None, None); 8];
        let sex = vec![Sex::Male; 8];
        let g = PedigreeGraph::from_parent_indices(&parents, &sex).unwrap();

        let result = add_missing_parents(&g, &CompletionOptions::default());
        assert!(matches!(
            result,
            Err(PedError::CapacityExceeded { count: 8, .. })
        ));
    }

    #[test]
    fn test_fast_path_completes_single_parents_only() {
        let g = mother_child();
        let completed = add_missing_parents_single(&g);

        assert_eq!(completed.n_individuals(), 3);
        // The founder stays a founder, the child gets a private father.
        assert!(completed.father_of(0).is_none());
        assert_eq!(completed.father_of(1), Some(2));
        assert_eq!(completed.sex(2), Sex::Male);
        assert_eq!(completed.children_of(2), vec![1]);
    }
}
