//! Conjunctive rules over nominal attributes.
//!
//! A rule is an ordered conjunction of `attribute = value` conditions plus a
//! predicted label. Conditions are kept sorted by attribute index with at most
//! one condition per attribute, which gives every conjunction exactly one
//! canonical form and makes refinement duplicate-free.

use serde::{Deserialize, Serialize};

use crate::dataset::{Attribute, Example, Label};
use crate::error::{TypesError, TypesResult};

/// A single `attribute = value` test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Condition {
    pub attribute: usize,
    pub value: usize,
}

impl Condition {
    pub fn new(attribute: usize, value: usize) -> Self {
        Self { attribute, value }
    }

    pub fn covers(&self, example: &Example) -> bool {
        example.value(self.attribute) == self.value
    }
}

/// A conjunction of conditions predicting one class.
///
/// Identity is the pair (conditions, prediction).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    conditions: Vec<Condition>,
    prediction: Label,
}

impl Rule {
    /// Create a rule; conditions must reference strictly increasing attributes.
    pub fn new(conditions: Vec<Condition>, prediction: Label) -> TypesResult<Self> {
        if conditions
            .windows(2)
            .any(|w| w[0].attribute >= w[1].attribute)
        {
            return Err(TypesError::InvalidRule(
                "conditions must reference strictly increasing attributes".into(),
            ));
        }
        Ok(Self {
            conditions,
            prediction,
        })
    }

    /// One-condition rule.
    pub fn single(condition: Condition, prediction: Label) -> Self {
        Self {
            conditions: vec![condition],
            prediction,
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn prediction(&self) -> Label {
        self.prediction
    }

    /// Number of conditions.
    pub fn complexity(&self) -> usize {
        self.conditions.len()
    }

    pub fn covers(&self, example: &Example) -> bool {
        self.conditions.iter().all(|c| c.covers(example))
    }

    /// Two-class reading of the rule: covered examples get the prediction,
    /// uncovered ones the other label.
    pub fn predict(&self, example: &Example) -> Label {
        if self.covers(example) {
            self.prediction
        } else {
            self.prediction.other()
        }
    }

    /// Attribute of the last condition, if any.
    pub fn last_attribute(&self) -> Option<usize> {
        self.conditions.last().map(|c| c.attribute)
    }

    /// Whether an attribute with a higher index remains to be conjoined.
    pub fn is_refinable(&self, attribute_count: usize) -> bool {
        match self.last_attribute() {
            Some(last) => last + 1 < attribute_count,
            None => attribute_count > 0,
        }
    }

    /// All one-step-more-specific successors: one extra condition on every
    /// value of every attribute after the last conditioned one.
    pub fn refinements(&self, attributes: &[Attribute]) -> Vec<Rule> {
        let start = self.last_attribute().map_or(0, |a| a + 1);
        let mut out = Vec::new();
        for (attribute, attr) in attributes.iter().enumerate().skip(start) {
            for value in 0..attr.arity() {
                let mut conditions = self.conditions.clone();
                conditions.push(Condition::new(attribute, value));
                out.push(Rule {
                    conditions,
                    prediction: self.prediction,
                });
            }
        }
        out
    }

    /// Human-readable form using attribute and value names.
    pub fn describe(&self, attributes: &[Attribute]) -> String {
        let body = if self.conditions.is_empty() {
            "true".to_string()
        } else {
            self.conditions
                .iter()
                .map(|c| match attributes.get(c.attribute) {
                    Some(attr) => format!(
                        "{} = {}",
                        attr.name(),
                        attr.value_name(c.value).unwrap_or("?")
                    ),
                    None => format!("a{} = {}", c.attribute, c.value),
                })
                .collect::<Vec<_>>()
                .join(" AND ")
        };
        format!("{} => {}", body, self.prediction)
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.conditions.is_empty() {
            write!(f, "true")?;
        }
        for (i, c) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " AND ")?;
            }
            write!(f, "a{}={}", c.attribute, c.value)?;
        }
        write!(f, " => {}", self.prediction)
    }
}
