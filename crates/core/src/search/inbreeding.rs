//! Linear-descent mating filter.
//!
//! The bound `g` is the maximum generational gap allowed between mated
//! linear relatives: `0` forbids all matings along a parent-child chain,
//! `1` allows parent-child matings but nothing more distant.
//!
//! Every mating created by the expansion involves an invented parent P and,
//! per child, that child's other parent. P is an ancestor of its whole child
//! group, so the mating P x q closes a linear loop iff q descends from a
//! member of the group; the generational gap of the loop is one more than
//! the chain length from that member to q. Co-parents invented in the same
//! step are founders of the expanded graph and can never be linear
//! relatives, so only co-parents present in the original graph matter.

use crate::graph::PedigreeGraph;

/// Per-individual forbidden descendants under bound `g`, computed on the
/// original graph. `forbidden[x][y]` is true iff some parent-child chain
/// from `x` to `y` has length at least `g` (x itself counts at length 0, so
/// `forbidden[x][x]` holds only for `g = 0`).
///
/// Chain lengths are longest-path distances: when several chains connect the
/// same pair, the deepest one decides, since any over-bound loop is enough
/// to reject a mating.
pub(crate) fn forbidden_descendants(graph: &PedigreeGraph, bound: u32) -> Vec<Vec<bool>> {
    let n = graph.n_individuals();
    let order = graph.topological_order();
    let mut forbidden = vec![vec![false; n]; n];

    for x in 0..n {
        let mut depth: Vec<Option<u32>> = vec![None; n];
        depth[x] = Some(0);
        for &v in &order {
            if let Some(d) = depth[v] {
                for c in graph.children_of(v) {
                    if depth[c].map_or(true, |cur| d + 1 > cur) {
                        depth[c] = Some(d + 1);
                    }
                }
            }
        }
        for y in 0..n {
            if let Some(d) = depth[y] {
                forbidden[x][y] = d >= bound;
            }
        }
    }

    forbidden
}

/// Whether a candidate assignment mates an invented parent with a forbidden
/// linear descendant of its own child group.
pub(crate) fn creates_forbidden_mating(
    graph: &PedigreeGraph,
    father_groups: &[Vec<usize>],
    mother_groups: &[Vec<usize>],
    forbidden: &[Vec<bool>],
) -> bool {
    // An invented father mates the recorded mother of each child in its
    // group, an invented mother mates the recorded father.
    father_groups
        .iter()
        .any(|group| group_violates(group, |c| graph.mother_of(c), forbidden))
        || mother_groups
            .iter()
            .any(|group| group_violates(group, |c| graph.father_of(c), forbidden))
}

fn group_violates(
    group: &[usize],
    co_parent: impl Fn(usize) -> Option<usize>,
    forbidden: &[Vec<bool>],
) -> bool {
    group.iter().any(|&child| {
        co_parent(child)
            .map_or(false, |mate| group.iter().any(|&member| forbidden[member][mate]))
    })
}
