/// Square binary parent relation. Entry `(i, j)` is 1 iff individual `i` is
/// a parent of individual `j`, so a column collects the parents of one
/// individual and a row collects its children.
pub type AdjacencyMatrix = nalgebra::DMatrix<u8>;
