//! Vector construction options.

use std::time::Duration;

use crate::error::{DynaVecError, Result};
use crate::labels::Labels;

/// Options for creating a metric vector. `name` is mandatory; everything
/// else defaults to off/empty. The fully-qualified name joins namespace,
/// subsystem, and name with `_`.
#[derive(Debug, Clone, Default)]
pub struct Opts {
    pub namespace: String,
    pub subsystem: String,
    pub name: String,
    pub help: String,
    /// Labels attached to every cell of the vector.
    pub const_labels: Labels,
    /// Bucket upper bounds; histogram vectors only.
    pub buckets: Vec<f64>,
    /// How long an untouched cell is kept. Zero means never expire.
    pub expire: Duration,
    /// Cardinality cap. Zero means unbounded.
    pub max_length: usize,
}

impl Opts {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            ..Self::default()
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = subsystem.into();
        self
    }

    pub fn const_labels(mut self, labels: Labels) -> Self {
        self.const_labels = labels;
        self
    }

    pub fn buckets(mut self, buckets: Vec<f64>) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn expire(mut self, expire: Duration) -> Self {
        self.expire = expire;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Namespace, subsystem, and name joined with `_`, skipping empty
    /// components.
    pub fn fq_name(&self) -> String {
        [&self.namespace, &self.subsystem, &self.name]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join("_")
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(DynaVecError::InvalidOpts("name must not be empty".into()));
        }
        for part in [&self.namespace, &self.subsystem, &self.name] {
            if !part.is_empty() && !valid_metric_name(part) {
                return Err(DynaVecError::InvalidOpts(format!(
                    "invalid metric name component: {part:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Metric name components: `[a-zA-Z_:][a-zA-Z0-9_:]*`.
fn valid_metric_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
