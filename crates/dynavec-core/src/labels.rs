//! Positional label registry.
//!
//! Label keys discovered at runtime are assigned stable positions;
//! positions are never reused or reassigned for the lifetime of a
//! registry instance. Hashing is keyed on the registry's *current* view
//! of known keys, so introducing a new key never changes the identity of
//! cells created before it existed.

use std::collections::{BTreeMap, HashMap};

use bytes::{BufMut, BytesMut};
use xxhash_rust::xxh3::xxh3_64;

/// A label map: name -> value. All values are opaque strings.
///
/// `BTreeMap` keeps iteration deterministic so expansion and exposition
/// render in a stable order.
pub type Labels = BTreeMap<String, String>;

/// Registry mapping label names to stable positions.
///
/// Not internally synchronized: a `LabelSet` is only mutated under its
/// owning vector's exclusive lock, together with the instance map and
/// descriptor.
#[derive(Debug, Default)]
pub struct LabelSet {
    constant: Labels,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl LabelSet {
    /// Create a registry seeded with constant labels and no dynamic keys.
    pub fn new(constant: Labels) -> Self {
        Self {
            constant,
            names: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Constant labels fixed at construction.
    pub fn constant(&self) -> &Labels {
        &self.constant
    }

    /// Dynamic key names in position order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of known dynamic keys.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no dynamic keys have been observed yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Translate a label map into a positional value vector, assigning the
    /// next position to every previously unseen key. Keys known to the
    /// registry but absent from the map yield `""`. The flag reports
    /// whether new keys were discovered (the descriptor must be rebuilt).
    pub fn observe(&mut self, labels: &Labels) -> (Vec<String>, bool) {
        let mut values = vec![String::new(); self.names.len()];
        let mut new_keys = false;

        for (name, value) in labels {
            match self.index.get(name) {
                Some(&i) => values[i] = value.clone(),
                None => {
                    self.add(name.clone());
                    values.push(value.clone());
                    new_keys = true;
                }
            }
        }

        (values, new_keys)
    }

    /// Content hash of a label map under the registry's current key view.
    ///
    /// Values of all known keys are joined in position order, `""` for
    /// absent keys, each followed by a 0x00 sentinel; trailing sentinel
    /// padding is trimmed so keys added later do not change existing
    /// hashes. Keys unknown to the registry do not contribute.
    pub fn hash(&self, labels: &Labels) -> u64 {
        let mut buf = BytesMut::new();
        for name in &self.names {
            if let Some(value) = labels.get(name) {
                buf.put_slice(value.as_bytes());
            }
            buf.put_u8(0);
        }

        let mut end = buf.len();
        while end > 0 && buf[end - 1] == 0 {
            end -= 1;
        }

        xxh3_64(&buf[..end])
    }

    /// Reconstruct a full label map from a positional value vector,
    /// padding missing trailing entries with `""` and merging constants.
    /// Constant entries win on key collision.
    pub fn expand(&self, values: &[String]) -> Labels {
        let mut labels = Labels::new();

        for (i, name) in self.names.iter().enumerate() {
            let value = values.get(i).cloned().unwrap_or_default();
            labels.insert(name.clone(), value);
        }
        for (name, value) in &self.constant {
            labels.insert(name.clone(), value.clone());
        }

        labels
    }

    /// True iff every key in `labels` is already known and the map does
    /// not exceed the current key count. Lookups and deletes for maps
    /// failing this cannot match any existing cell.
    pub fn includes(&self, labels: &Labels) -> bool {
        if labels.len() > self.index.len() {
            return false;
        }
        labels.keys().all(|name| self.index.contains_key(name))
    }

    fn add(&mut self, name: String) {
        let i = self.names.len();
        self.names.push(name.clone());
        self.index.insert(name, i);
    }
}
