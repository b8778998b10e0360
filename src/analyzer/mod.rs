// Analyzer module: aggregates submodules for each analysis phase.

pub mod keywords;
pub mod prediction;
pub mod relation;
pub mod significance;
pub mod term_importance;
