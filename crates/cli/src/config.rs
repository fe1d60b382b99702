//! Loading declaration files
//!
//! The format is chosen by extension: `.toml` or `.json`.

use std::path::Path;

use anyhow::{bail, Context, Result};
use orchestrator::{ComplexConf, Membership};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
            Some(ext) => bail!("Unsupported file extension .{} (expected .toml or .json)", ext),
            None => bail!("Cannot tell the format of {} without an extension", path.display()),
        }
    }
}

/// Network memberships captured from a runtime
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MembershipFile {
    #[serde(default)]
    pub networks: Vec<Membership>,
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = Format::from_path(path)?;
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let value = match format {
        Format::Toml => toml::from_str(&content).with_context(|| format!("Invalid TOML in {}", path.display()))?,
        Format::Json => {
            serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))?
        }
    };
    Ok(value)
}

/// Load and validate a complex declaration
pub fn load_complex(path: &Path) -> Result<ComplexConf> {
    let conf: ComplexConf = load(path)?;
    conf.validate()?;
    tracing::debug!(
        complex = %conf.name,
        networks = conf.networks.len(),
        containers = conf.containers.len(),
        "Loaded declaration"
    );
    Ok(conf)
}

pub fn load_memberships(path: &Path) -> Result<Vec<Membership>> {
    let file: MembershipFile = load(path)?;
    Ok(file.networks)
}
