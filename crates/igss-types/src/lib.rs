//! # igss-types
//!
//! Data model shared by the IGSS rule-discovery engine and its evaluation
//! collaborator.
//!
//! ## Contents
//!
//! ```text
//!   DatasetBuilder ──► Dataset ──► Priors (once per run)
//!                        │
//!                        ├── Example (values, label, mutable weight)
//!                        │
//!   Rule ◄── Condition   │
//!     │                  ▼
//!     └──────► ContingencyMatrix ──► EnsembleBuilder ──► EnsembleModel
//! ```
//!
//! Example weights are the only state that changes after a dataset is built.

#![deny(unsafe_code)]

pub mod contingency;
pub mod dataset;
pub mod ensemble;
pub mod error;
pub mod priors;
pub mod rule;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use contingency::{ContingencyMatrix, LIFT_SMOOTHING};
pub use dataset::{Attribute, Dataset, DatasetBuilder, Example, Label};
pub use ensemble::{EnsembleBuilder, EnsembleMember, EnsembleModel};
pub use error::{TypesError, TypesResult};
pub use priors::Priors;
pub use rule::{Condition, Rule};
