//! Exporter config loader (strict parsing).

use std::fs;

use serde::Deserialize;

use dynavec_core::{DynaVecError, Result};

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| DynaVecError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig =
        serde_yaml::from_str(s).map_err(|e| DynaVecError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(DynaVecError::Config("version must be 1".into()));
        }
        self.exporter.validate()?;
        Ok(())
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_gc_interval_ms")]
    pub gc_interval_ms: u64,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            gc_interval_ms: default_gc_interval_ms(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        if !(1000..=600000).contains(&self.gc_interval_ms) {
            return Err(DynaVecError::Config(
                "exporter.gc_interval_ms must be between 1000 and 600000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:9100".into()
}
fn default_gc_interval_ms() -> u64 {
    30000
}
