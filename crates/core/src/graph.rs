use std::collections::VecDeque;

use crate::error::{PedError, Result};
use crate::types::AdjacencyMatrix;

/// Sex of an individual, fixed at graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// The other sex. An invented parent takes the sex complementary to the
    /// parent its child already has.
    pub fn opposite(self) -> Sex {
        match self {
            Sex::Male => Sex::Female,
            Sex::Female => Sex::Male,
        }
    }
}

/// A pedigree as a square binary parent relation plus a parallel sex vector.
///
/// Individuals are mapped to contiguous 0-based indices. A column may sum to
/// 0 (founder), 1 (one known parent) or 2 (one parent of each sex); when a
/// column sums to 2 the two parents have opposite sexes.
///
/// Graphs are immutable value objects: [`PedigreeGraph::with_invented_parents`]
/// and [`PedigreeGraph::without_individuals`] build new graphs and never
/// modify the receiver, so graphs can be shared freely across candidate
/// branches of an enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct PedigreeGraph {
    parent_of: AdjacencyMatrix,
    sex: Vec<Sex>,
}

impl PedigreeGraph {
    /// Create a graph from a parent matrix and a sex vector.
    ///
    /// # Errors
    /// Returns `InvalidGraph` if the matrix is not square, the sex vector
    /// length does not match, an entry is outside {0, 1}, a column has more
    /// than two parents or two parents of the same sex, an individual is its
    /// own parent, or the parent relation contains a cycle.
    pub fn new(parent_of: AdjacencyMatrix, sex: Vec<Sex>) -> Result<Self> {
        let n = parent_of.nrows();
        if parent_of.ncols() != n {
            return Err(PedError::InvalidGraph(format!(
                "Parent matrix must be square, got {}x{}",
                parent_of.nrows(),
                parent_of.ncols()
            )));
        }
        if sex.len() != n {
            return Err(PedError::InvalidGraph(format!(
                "Sex vector has length {} but the graph has {} individuals",
                sex.len(),
                n
            )));
        }

        for i in 0..n {
            for j in 0..n {
                let v = parent_of[(i, j)];
                if v > 1 {
                    return Err(PedError::InvalidGraph(format!(
                        "Parent matrix entry ({}, {}) is {}, expected 0 or 1",
                        i, j, v
                    )));
                }
            }
        }

        for j in 0..n {
            if parent_of[(j, j)] != 0 {
                return Err(PedError::InvalidGraph(format!(
                    "Individual {} is listed as its own parent",
                    j
                )));
            }

            let mut fathers = 0usize;
            let mut mothers = 0usize;
            for i in 0..n {
                if parent_of[(i, j)] == 1 {
                    match sex[i] {
                        Sex::Male => fathers += 1,
                        Sex::Female => mothers += 1,
                    }
                }
            }
            if fathers + mothers > 2 {
                return Err(PedError::InvalidGraph(format!(
                    "Individual {} has {} parents, expected 0, 1 or 2",
                    j,
                    fathers + mothers
                )));
            }
            if fathers > 1 || mothers > 1 {
                return Err(PedError::InvalidGraph(format!(
                    "Individual {} has two parents of the same sex",
                    j
                )));
            }
        }

        let graph = Self { parent_of, sex };

        // Kahn's algorithm visits every individual iff the relation is
        // acyclic; no individual may be its own ancestor.
        if graph.topological_order().len() != n {
            return Err(PedError::InvalidGraph(
                "Pedigree contains a cycle".to_string(),
            ));
        }

        Ok(graph)
    }

    /// Build a graph from per-individual `(father, mother)` index pairs.
    ///
    /// `None` marks an unknown parent.
    ///
    /// # Errors
    /// Returns `InvalidGraph` if a parent index is out of range, a father is
    /// not male, a mother is not female, or the resulting relation fails
    /// [`PedigreeGraph::new`] validation.
    pub fn from_parent_indices(
        parents: &[(Option<usize>, Option<usize>)],
        sex: &[Sex],
    ) -> Result<Self> {
        let n = parents.len();
        if sex.len() != n {
            return Err(PedError::InvalidGraph(format!(
                "Sex vector has length {} but {} parent pairs were given",
                sex.len(),
                n
            )));
        }

        let mut parent_of = AdjacencyMatrix::zeros(n, n);
        for (j, &(father, mother)) in parents.iter().enumerate() {
            if let Some(f) = father {
                if f >= n {
                    return Err(PedError::InvalidGraph(format!(
                        "Individual {} references father index {} which is out of range",
                        j, f
                    )));
                }
                if sex[f] != Sex::Male {
                    return Err(PedError::InvalidGraph(format!(
                        "Individual {}'s father {} is not male",
                        j, f
                    )));
                }
                parent_of[(f, j)] = 1;
            }
            if let Some(m) = mother {
                if m >= n {
                    return Err(PedError::InvalidGraph(format!(
                        "Individual {} references mother index {} which is out of range",
                        j, m
                    )));
                }
                if sex[m] != Sex::Female {
                    return Err(PedError::InvalidGraph(format!(
                        "Individual {}'s mother {} is not female",
                        j, m
                    )));
                }
                parent_of[(m, j)] = 1;
            }
        }

        Self::new(parent_of, sex.to_vec())
    }

    /// Number of individuals in the graph.
    pub fn n_individuals(&self) -> usize {
        self.sex.len()
    }

    /// Sex of individual `i`.
    ///
    /// # Panics
    /// Panics if `i` is out of bounds.
    pub fn sex(&self, i: usize) -> Sex {
        self.sex[i]
    }

    /// Whether `i` is a parent of `j`.
    pub fn is_parent(&self, i: usize, j: usize) -> bool {
        self.parent_of[(i, j)] == 1
    }

    /// Number of recorded parents of individual `j`.
    pub fn n_parents(&self, j: usize) -> usize {
        (0..self.n_individuals())
            .filter(|&i| self.parent_of[(i, j)] == 1)
            .count()
    }

    /// Index of `j`'s father, or `None` if no male parent is recorded.
    pub fn father_of(&self, j: usize) -> Option<usize> {
        (0..self.n_individuals())
            .find(|&i| self.parent_of[(i, j)] == 1 && self.sex[i] == Sex::Male)
    }

    /// Index of `j`'s mother, or `None` if no female parent is recorded.
    pub fn mother_of(&self, j: usize) -> Option<usize> {
        (0..self.n_individuals())
            .find(|&i| self.parent_of[(i, j)] == 1 && self.sex[i] == Sex::Female)
    }

    /// Indices of the children of individual `i`, ascending.
    pub fn children_of(&self, i: usize) -> Vec<usize> {
        (0..self.n_individuals())
            .filter(|&j| self.parent_of[(i, j)] == 1)
            .collect()
    }

    /// Individuals with no recorded parents.
    pub fn founders(&self) -> Vec<usize> {
        (0..self.n_individuals())
            .filter(|&j| self.n_parents(j) == 0)
            .collect()
    }

    /// Individuals lacking a male parent. Founders appear here as well as in
    /// [`PedigreeGraph::missing_mother`].
    pub fn missing_father(&self) -> Vec<usize> {
        (0..self.n_individuals())
            .filter(|&j| self.father_of(j).is_none())
            .collect()
    }

    /// Individuals lacking a female parent.
    pub fn missing_mother(&self) -> Vec<usize> {
        (0..self.n_individuals())
            .filter(|&j| self.mother_of(j).is_none())
            .collect()
    }

    /// Individuals ordered so that parents precede their children.
    ///
    /// The returned order is shorter than `n_individuals()` iff the relation
    /// contains a cycle; construction rejects such graphs, so callers of a
    /// validated graph always receive a complete order.
    pub(crate) fn topological_order(&self) -> Vec<usize> {
        let n = self.n_individuals();
        let mut in_degree: Vec<usize> = (0..n).map(|j| self.n_parents(j)).collect();
        let mut queue: VecDeque<usize> = (0..n).filter(|&j| in_degree[j] == 0).collect();
        let mut order = Vec::with_capacity(n);

        while let Some(v) = queue.pop_front() {
            order.push(v);
            for c in self.children_of(v) {
                in_degree[c] -= 1;
                if in_degree[c] == 0 {
                    queue.push_back(c);
                }
            }
        }

        order
    }

    /// Build a new graph with one appended row and column per invented
    /// parent: fathers first (sex male), then mothers (sex female), each
    /// connected to the children listed in its group.
    ///
    /// Existing individuals keep their indices; invented parents occupy the
    /// appended tail. Child indices must refer to existing individuals that
    /// lack a parent of the corresponding sex, and the groups of one sex must
    /// be disjoint, which the enumeration guarantees by construction.
    pub fn with_invented_parents(
        &self,
        father_groups: &[Vec<usize>],
        mother_groups: &[Vec<usize>],
    ) -> PedigreeGraph {
        let n = self.n_individuals();
        let total = n + father_groups.len() + mother_groups.len();

        let mut parent_of = AdjacencyMatrix::zeros(total, total);
        for i in 0..n {
            for j in 0..n {
                parent_of[(i, j)] = self.parent_of[(i, j)];
            }
        }

        let mut sex = self.sex.clone();
        let mut row = n;
        for group in father_groups {
            for &child in group {
                parent_of[(row, child)] = 1;
            }
            sex.push(Sex::Male);
            row += 1;
        }
        for group in mother_groups {
            for &child in group {
                parent_of[(row, child)] = 1;
            }
            sex.push(Sex::Female);
            row += 1;
        }

        PedigreeGraph { parent_of, sex }
    }

    /// Build a new graph without the listed individuals, renumbering the
    /// remainder. `keep[new] = old` is the remapping applied to both the
    /// matrix and the sex vector; surviving individuals stay in their
    /// original relative order.
    pub fn without_individuals(&self, remove: &[usize]) -> PedigreeGraph {
        let n = self.n_individuals();
        let mut keep_mask = vec![true; n];
        for &r in remove {
            keep_mask[r] = false;
        }
        let keep: Vec<usize> = (0..n).filter(|&i| keep_mask[i]).collect();

        let m = keep.len();
        let parent_of =
            AdjacencyMatrix::from_fn(m, m, |i, j| self.parent_of[(keep[i], keep[j])]);
        let sex = keep.iter().map(|&i| self.sex[i]).collect();

        PedigreeGraph { parent_of, sex }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: mother with one child, child's father unknown.
    fn mother_child() -> PedigreeGraph {
        PedigreeGraph::from_parent_indices(
            &[(None, None), (None, Some(0))],
            &[Sex::Female, Sex::Male],
        )
        .unwrap()
    }

    #[test]
    fn test_from_parent_indices_basic() {
        let g = PedigreeGraph::from_parent_indices(
            &[(None, None), (None, None), (Some(0), Some(1))],
            &[Sex::Male, Sex::Female, Sex::Male],
        )
        .unwrap();

        assert_eq!(g.n_individuals(), 3);
        assert!(g.is_parent(0, 2));
        assert!(g.is_parent(1, 2));
        assert!(!g.is_parent(2, 0));
        assert_eq!(g.father_of(2), Some(0));
        assert_eq!(g.mother_of(2), Some(1));
        assert_eq!(g.n_parents(2), 2);
        assert_eq!(g.n_parents(0), 0);
    }

    #[test]
    fn test_derived_sets() {
        let g = mother_child();

        assert_eq!(g.founders(), vec![0]);
        // The founder mother lacks both parents, the child lacks a father.
        assert_eq!(g.missing_father(), vec![0, 1]);
        assert_eq!(g.missing_mother(), vec![0]);
        assert_eq!(g.children_of(0), vec![1]);
        assert_eq!(g.children_of(1), Vec::<usize>::new());
    }

    #[test]
    fn test_non_square_rejected() {
        let m = AdjacencyMatrix::zeros(2, 3);
        let result = PedigreeGraph::new(m, vec![Sex::Male, Sex::Female]);
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("square"), "Error was: {}", msg);
    }

    #[test]
    fn test_sex_length_mismatch_rejected() {
        let m = AdjacencyMatrix::zeros(2, 2);
        let result = PedigreeGraph::new(m, vec![Sex::Male]);
        assert!(result.is_err());
    }

    #[test]
    fn test_entry_outside_binary_rejected() {
        let mut m = AdjacencyMatrix::zeros(2, 2);
        m[(0, 1)] = 2;
        let result = PedigreeGraph::new(m, vec![Sex::Male, Sex::Female]);
        assert!(result.is_err());
    }

    #[test]
    fn test_three_parents_rejected() {
        // Individual 3 with three parents.
        let mut m = AdjacencyMatrix::zeros(4, 4);
        m[(0, 3)] = 1;
        m[(1, 3)] = 1;
        m[(2, 3)] = 1;
        let result =
            PedigreeGraph::new(m, vec![Sex::Male, Sex::Female, Sex::Male, Sex::Female]);
        assert!(result.is_err());
    }

    #[test]
    fn test_same_sex_parents_rejected() {
        let mut m = AdjacencyMatrix::zeros(3, 3);
        m[(0, 2)] = 1;
        m[(1, 2)] = 1;
        let result = PedigreeGraph::new(m, vec![Sex::Male, Sex::Male, Sex::Female]);
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("same sex"), "Error was: {}", msg);
    }

    #[test]
    fn test_self_parent_rejected() {
        let mut m = AdjacencyMatrix::zeros(1, 1);
        m[(0, 0)] = 1;
        let result = PedigreeGraph::new(m, vec![Sex::Male]);
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("own parent"), "Error was: {}", msg);
    }

    #[test]
    fn test_cycle_rejected() {
        // 0 is a parent of 1 and 1 is a parent of 0.
        let mut m = AdjacencyMatrix::zeros(2, 2);
        m[(0, 1)] = 1;
        m[(1, 0)] = 1;
        let result = PedigreeGraph::new(m, vec![Sex::Male, Sex::Female]);
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("cycle"), "Error was: {}", msg);
    }

    #[test]
    fn test_father_must_be_male() {
        let result = PedigreeGraph::from_parent_indices(
            &[(None, None), (Some(0), None)],
            &[Sex::Female, Sex::Male],
        );
        assert!(result.is_err());
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("not male"), "Error was: {}", msg);
    }

    #[test]
    fn test_topological_order_parents_first() {
        // Child listed before its parents.
        let g = PedigreeGraph::from_parent_indices(
            &[(Some(1), Some(2)), (None, None), (None, None)],
            &[Sex::Male, Sex::Male, Sex::Female],
        )
        .unwrap();

        let order = g.topological_order();
        assert_eq!(order.len(), 3);
        let pos = |i: usize| order.iter().position(|&v| v == i).unwrap();
        assert!(pos(1) < pos(0));
        assert!(pos(2) < pos(0));
    }

    #[test]
    fn test_with_invented_parents_appends_tail() {
        let g = mother_child();
        // One invented father shared by both individuals, one invented
        // mother for the founder.
        let expanded = g.with_invented_parents(&[vec![0, 1]], &[vec![0]]);

        assert_eq!(expanded.n_individuals(), 4);
        // Originals keep their indices and edges.
        assert!(expanded.is_parent(0, 1));
        assert_eq!(expanded.sex(0), Sex::Female);
        // Invented father is index 2, invented mother index 3.
        assert_eq!(expanded.sex(2), Sex::Male);
        assert_eq!(expanded.sex(3), Sex::Female);
        assert_eq!(expanded.children_of(2), vec![0, 1]);
        assert_eq!(expanded.children_of(3), vec![0]);
        assert_eq!(expanded.father_of(1), Some(2));

        // The receiver is untouched.
        assert_eq!(g.n_individuals(), 2);
    }

    #[test]
    fn test_without_individuals_renumbers() {
        let g = mother_child();
        let expanded = g.with_invented_parents(&[vec![0], vec![1]], &[vec![0]]);
        assert_eq!(expanded.n_individuals(), 5);

        // Drop the founder's private pair (father 2, mother 4).
        let pruned = expanded.without_individuals(&[2, 4]);

        assert_eq!(pruned.n_individuals(), 3);
        // Survivors keep their relative order: 0, 1, then old index 3.
        assert_eq!(pruned.sex(2), Sex::Male);
        assert_eq!(pruned.father_of(1), Some(2));
        assert_eq!(pruned.n_parents(0), 0);
    }

    #[test]
    fn test_empty_graph() {
        let g = PedigreeGraph::new(AdjacencyMatrix::zeros(0, 0), Vec::new()).unwrap();
        assert_eq!(g.n_individuals(), 0);
        assert!(g.founders().is_empty());
        assert!(g.missing_father().is_empty());
    }

    #[test]
    fn test_sex_opposite() {
        assert_eq!(Sex::Male.opposite(), Sex::Female);
        assert_eq!(Sex::Female.opposite(), Sex::Male);
    }
}
