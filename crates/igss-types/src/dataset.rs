//! Nominal datasets with binary labels and mutable example weights.
//!
//! A `Dataset` owns its attribute dictionaries and examples. Example values
//! are stored as indices into the attribute's value dictionary so that
//! rule evaluation is a plain integer comparison.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

// ── Labels ──────────────────────────────────────────────────────────────

/// Binary class label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Both labels, positive first.
    pub const ALL: [Label; 2] = [Label::Positive, Label::Negative];

    /// The opposite label.
    pub fn other(self) -> Label {
        match self {
            Label::Positive => Label::Negative,
            Label::Negative => Label::Positive,
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Label::Positive)
    }

    /// Dense index (positive = 0, negative = 1).
    pub fn index(self) -> usize {
        match self {
            Label::Positive => 0,
            Label::Negative => 1,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Positive => write!(f, "positive"),
            Label::Negative => write!(f, "negative"),
        }
    }
}

// ── Attributes ──────────────────────────────────────────────────────────

/// A nominal attribute with an ordered value dictionary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    name: String,
    values: Vec<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Number of distinct values.
    pub fn arity(&self) -> usize {
        self.values.len()
    }

    /// Dictionary index of a value.
    pub fn value_index(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    /// Value name at a dictionary index.
    pub fn value_name(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

// ── Examples ────────────────────────────────────────────────────────────

/// One labeled, weighted example.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Example {
    values: Vec<usize>,
    label: Label,
    weight: f64,
}

impl Example {
    pub fn new(values: Vec<usize>, label: Label, weight: f64) -> Self {
        Self {
            values,
            label,
            weight,
        }
    }

    /// Value index for an attribute. Out-of-range attributes read as `usize::MAX`,
    /// which no condition matches.
    pub fn value(&self, attribute: usize) -> usize {
        self.values.get(attribute).copied().unwrap_or(usize::MAX)
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }

    pub fn label(&self) -> Label {
        self.label
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

// ── Dataset ─────────────────────────────────────────────────────────────

/// Ordered collection of examples over shared nominal attributes.
///
/// Weights are the only mutable part of a dataset after construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    attributes: Vec<Attribute>,
    examples: Vec<Example>,
}

impl Dataset {
    /// Assemble a dataset from parts, validating value indices and weights.
    pub fn from_parts(attributes: Vec<Attribute>, examples: Vec<Example>) -> TypesResult<Self> {
        if examples.is_empty() {
            return Err(TypesError::EmptyDataset);
        }
        for (row, example) in examples.iter().enumerate() {
            if example.values.len() != attributes.len() {
                return Err(TypesError::ArityMismatch {
                    row,
                    expected: attributes.len(),
                    found: example.values.len(),
                });
            }
            for (attr, &value) in attributes.iter().zip(&example.values) {
                if value >= attr.arity() {
                    return Err(TypesError::UnknownValue {
                        attribute: attr.name.clone(),
                        value: value.to_string(),
                    });
                }
            }
            validate_weight(row, example.weight)?;
        }
        Ok(Self {
            attributes,
            examples,
        })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// Index of an attribute by name.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn example(&self, index: usize) -> Option<&Example> {
        self.examples.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Example> {
        self.examples.iter()
    }

    pub fn labels(&self) -> Vec<Label> {
        self.examples.iter().map(|e| e.label).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.examples.iter().map(|e| e.weight).collect()
    }

    /// Overwrite one example's weight.
    pub fn set_weight(&mut self, index: usize, weight: f64) -> TypesResult<()> {
        validate_weight(index, weight)?;
        let example = self
            .examples
            .get_mut(index)
            .ok_or(TypesError::InvalidWeight { index, weight })?;
        example.weight = weight;
        Ok(())
    }

    /// Reset every weight to 1.0.
    pub fn reset_weights(&mut self) {
        for example in &mut self.examples {
            example.weight = 1.0;
        }
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.examples.iter().map(|e| e.weight).sum()
    }

    /// Sum of weights carried by examples of one label.
    pub fn label_weight(&self, label: Label) -> f64 {
        self.examples
            .iter()
            .filter(|e| e.label == label)
            .map(|e| e.weight)
            .sum()
    }

    pub fn max_weight(&self) -> f64 {
        self.examples.iter().map(|e| e.weight).fold(0.0, f64::max)
    }

    /// Divide every weight by the current maximum so weights lie in [0, 1].
    ///
    /// Returns the divisor. A dataset whose weights are all zero is left untouched.
    pub fn normalize_weights(&mut self) -> f64 {
        let max = self.max_weight();
        if max > 0.0 {
            for example in &mut self.examples {
                example.weight /= max;
            }
        }
        max
    }
}

fn validate_weight(index: usize, weight: f64) -> TypesResult<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(TypesError::InvalidWeight { index, weight });
    }
    Ok(())
}

// ── Builder ─────────────────────────────────────────────────────────────

/// Builds a dataset from string rows, growing value dictionaries on the fly.
#[derive(Debug, Default)]
pub struct DatasetBuilder {
    names: Vec<String>,
    dictionaries: Vec<Vec<String>>,
    lookup: Vec<HashMap<String, usize>>,
    examples: Vec<Example>,
}

impl DatasetBuilder {
    /// Start a builder for the given attribute names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let n = names.len();
        Self {
            names,
            dictionaries: vec![Vec::new(); n],
            lookup: vec![HashMap::new(); n],
            examples: Vec::new(),
        }
    }

    /// Pre-declare the dictionary order of an attribute's values.
    pub fn declare_values(&mut self, attribute: &str, values: &[&str]) -> TypesResult<&mut Self> {
        let idx = self
            .names
            .iter()
            .position(|n| n == attribute)
            .ok_or_else(|| TypesError::UnknownAttribute(attribute.to_string()))?;
        for value in values {
            self.intern(idx, value);
        }
        Ok(self)
    }

    /// Append a row with weight 1.0.
    pub fn push_row(&mut self, values: &[&str], label: Label) -> TypesResult<&mut Self> {
        self.push_weighted_row(values, label, 1.0)
    }

    /// Append a row with an explicit weight.
    pub fn push_weighted_row(
        &mut self,
        values: &[&str],
        label: Label,
        weight: f64,
    ) -> TypesResult<&mut Self> {
        let row = self.examples.len();
        if values.len() != self.names.len() {
            return Err(TypesError::ArityMismatch {
                row,
                expected: self.names.len(),
                found: values.len(),
            });
        }
        validate_weight(row, weight)?;
        let indices = values
            .iter()
            .enumerate()
            .map(|(attr, value)| self.intern(attr, value))
            .collect();
        self.examples.push(Example::new(indices, label, weight));
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn build(self) -> TypesResult<Dataset> {
        let attributes = self
            .names
            .into_iter()
            .zip(self.dictionaries)
            .map(|(name, values)| Attribute::new(name, values))
            .collect();
        Dataset::from_parts(attributes, self.examples)
    }

    fn intern(&mut self, attribute: usize, value: &str) -> usize {
        if let Some(&idx) = self.lookup[attribute].get(value) {
            return idx;
        }
        let idx = self.dictionaries[attribute].len();
        self.dictionaries[attribute].push(value.to_string());
        self.lookup[attribute].insert(value.to_string(), idx);
        idx
    }
}
