//! Label-binding sugar: a narrowed view of a vector with a fixed subset
//! of labels pre-bound.

use std::sync::Arc;

use crate::error::Result;
use crate::labels::Labels;
use crate::metric::Metric;
use crate::vector::Vector;

impl<M: Metric> Vector<M> {
    /// Derive a view with `bound` merged into every request. Caller
    /// labels win over bound labels on collision.
    pub fn curry(&self, bound: Labels) -> Curried<'_, M> {
        Curried { base: self, bound }
    }
}

/// A vector view with pre-bound labels. Pure delegation: merges the bound
/// labels into each request and forwards to the underlying vector.
pub struct Curried<'a, M: Metric> {
    base: &'a Vector<M>,
    bound: Labels,
}

impl<'a, M: Metric> Curried<'a, M> {
    pub fn get_or_create(&self, labels: &Labels) -> Result<Arc<M>> {
        self.base.get_or_create(&self.merged(labels))
    }

    pub fn delete(&self, labels: &Labels) -> bool {
        self.base.delete(&self.merged(labels))
    }

    /// Narrow further; the new labels win over already-bound ones.
    pub fn curry(&self, labels: Labels) -> Curried<'a, M> {
        Curried {
            base: self.base,
            bound: self.merged(&labels),
        }
    }

    /// Labels bound into this view.
    pub fn bound(&self) -> &Labels {
        &self.bound
    }

    fn merged(&self, labels: &Labels) -> Labels {
        let mut merged = self.bound.clone();
        for (name, value) in labels {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }
}
