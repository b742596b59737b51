//! dynavec exporter: the collection-protocol side of dynavec.
//!
//! This crate wires vectors into a scrapeable whole: a collector
//! registry (explicitly injected, never ambient global state), the
//! Prometheus text exposition encoder, the HTTP endpoints, and a strict
//! YAML config for the demo binary (`main.rs`).

pub mod config;
pub mod http;
pub mod registry;
pub mod text;

pub use registry::{MetricFamily, Registry};
