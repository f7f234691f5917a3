use crate::parser::{decode, Profile};
use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

/// Read and decode a profile file
pub fn load_profile(path: &Path) -> Result<Profile> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read profile file {}", path.display()))?;

    debug!("Read {} bytes from {}", data.len(), path.display());

    decode(&data).with_context(|| format!("Failed to decode profile {}", path.display()))
}
