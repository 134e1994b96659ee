//! Parent-assignment enumeration: the engine, its sex-symmetry
//! deduplicator, the linear-inbreeding filter and the founder-pair pruner.

mod engine;
mod inbreeding;
mod prune;
mod symmetry;

pub use engine::{add_missing_parents, add_missing_parents_single, CompletionOptions};
