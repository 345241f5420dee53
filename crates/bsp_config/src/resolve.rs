//! Build resolution: turning a project configuration into render inputs.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use bsp_render::{Overrides, RenderContext};
use std::path::{Path, PathBuf};

/// Everything a build needs from the project configuration, with paths made
/// absolute against the project directory.
#[derive(Debug)]
pub struct ResolvedBuild {
    /// The board to build for.
    pub board: String,
    /// The render context: design name, top, sources, overrides, requests.
    pub context: RenderContext,
    /// HDL sources, resolved against the project directory.
    pub sources: Vec<PathBuf>,
    /// Output directory.
    pub build_dir: PathBuf,
    /// Program the board after building.
    pub program: bool,
    /// Explicit path to the toolchain executable.
    pub vivado: Option<PathBuf>,
}

/// Resolves a loaded configuration.
///
/// `[overrides]` entries become literal text, `[templates]` entries are
/// parsed as templates. Caller overrides sit on top of the board defaults
/// when the context is rendered.
pub fn resolve_build(
    config: &ProjectConfig,
    project_dir: &Path,
) -> Result<ResolvedBuild, ConfigError> {
    let mut overrides = Overrides::new();
    for (key, entry) in &config.overrides {
        let text = entry.require_text("overrides", key)?;
        overrides
            .set_text_named(key, text.to_string())
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    }
    for (key, entry) in &config.templates {
        let template = entry.require_text("templates", key)?;
        overrides
            .set_template_named(key, template)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
    }

    let sources: Vec<PathBuf> = config
        .project
        .sources
        .iter()
        .map(|s| project_dir.join(s))
        .collect();

    let mut context = RenderContext::new(config.project.name.clone())
        .with_sources(sources.iter().map(|p| p.display().to_string()))
        .with_overrides(overrides);
    if let Some(top) = &config.project.top {
        context = context.with_top(top.clone());
    }
    for request in &config.requests.resources {
        context = context.request(request.name.clone(), request.index);
    }
    if config.requests.default_domain {
        context = context.with_default_domain();
    }

    Ok(ResolvedBuild {
        board: config.project.board.clone(),
        context,
        sources,
        build_dir: project_dir.join(&config.build.dir),
        program: config.build.program,
        vivado: config.toolchain.vivado.as_ref().map(PathBuf::from),
    })
}
