//! Sequential selection of the best hypotheses under an (ε, δ) guarantee.

pub mod best;
pub mod result;
pub mod selector;

pub use best::BestSet;
pub use result::RuleResult;
pub use selector::{Selection, SelectionExit, SelectionParams, SequentialSelector};
