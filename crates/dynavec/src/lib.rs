//! Top-level facade crate for dynavec.
//!
//! Re-exports the core vectors and the exporter so users can depend on a
//! single crate.

pub mod core {
    pub use dynavec_core::*;
}

pub mod exporter {
    pub use dynavec_exporter::*;
}
