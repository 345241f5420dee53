//! Build fingerprints: deciding whether the toolchain must run again.
//!
//! A fingerprint records content hashes of the rendered artifacts and every
//! design source. It is stored as `<design>.fingerprint` (JSON) next to the
//! bitstream and written only after a successful toolchain run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bsp_common::ContentHash;
use bsp_render::RenderedArtifacts;
use serde::{Deserialize, Serialize};

use crate::driver::Design;
use crate::error::BuildError;

/// Content hashes of everything that determines a bitstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    /// Version of this tool that wrote the record.
    pub tool_version: String,
    /// Hash over the rendered scripts and constraints.
    pub artifacts: ContentHash,
    /// Hash per source file, keyed by path.
    pub sources: BTreeMap<String, ContentHash>,
}

impl Fingerprint {
    /// Hashes the artifacts and reads and hashes every source.
    pub fn compute(artifacts: &RenderedArtifacts, design: &Design) -> Result<Self, BuildError> {
        let artifacts_hash = ContentHash::from_parts([
            artifacts.design_name.as_bytes(),
            design.top.as_bytes(),
            artifacts.build_script.as_bytes(),
            artifacts.pin_constraints.as_bytes(),
            artifacts.post_bitstream_script.as_bytes(),
        ]);
        let mut sources = BTreeMap::new();
        for path in &design.sources {
            let content = std::fs::read(path).map_err(|e| BuildError::io(path, e))?;
            sources.insert(path.display().to_string(), ContentHash::from_bytes(&content));
        }
        Ok(Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            artifacts: artifacts_hash,
            sources,
        })
    }

    /// Path of the fingerprint record for `design_name` in `dir`.
    pub fn path(dir: &Path, design_name: &str) -> PathBuf {
        dir.join(format!("{design_name}.fingerprint"))
    }

    /// Loads a stored fingerprint. Any problem reading it counts as "no
    /// fingerprint" and forces a rebuild.
    pub fn load(dir: &Path, design_name: &str) -> Option<Self> {
        let content = std::fs::read_to_string(Self::path(dir, design_name)).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Stores the fingerprint.
    pub fn save(&self, dir: &Path, design_name: &str) -> Result<(), BuildError> {
        let path = Self::path(dir, design_name);
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            BuildError::io(&path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        std::fs::write(&path, json).map_err(|e| BuildError::io(&path, e))
    }
}
