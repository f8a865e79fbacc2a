//! Fixed-capacity top-n set used for the best/rest partition.

use crate::hypothesis::HypothesisId;

/// The `capacity` highest-utility entries seen so far, sorted descending.
///
/// Ties keep the entry inserted first.
#[derive(Clone, Debug)]
pub struct BestSet {
    capacity: usize,
    entries: Vec<(HypothesisId, f64)>,
}

impl BestSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Offer an entry. Returns the id that fell out, if any.
    pub fn insert(&mut self, id: HypothesisId, utility: f64) -> Option<HypothesisId> {
        if self.capacity == 0 {
            return Some(id);
        }
        if self.is_full() {
            match self.entries.last() {
                Some(&(_, worst)) if utility > worst => {}
                _ => return Some(id),
            }
        }
        // first position holding a strictly smaller utility
        let pos = self
            .entries
            .iter()
            .position(|&(_, u)| u < utility)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, (id, utility));
        if self.entries.len() > self.capacity {
            self.entries.pop().map(|(evicted, _)| evicted)
        } else {
            None
        }
    }

    pub fn contains(&self, id: HypothesisId) -> bool {
        self.entries.iter().any(|&(e, _)| e == id)
    }

}
