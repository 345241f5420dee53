//! Deterministic rendering of toolchain artifacts from a board descriptor.
//!
//! [`render`] merges three override layers, each replacing the previous
//! value of any key it binds:
//!
//! 1. vendor defaults (every hook empty),
//! 2. board defaults derived from the descriptor ([`board_overrides`]),
//! 3. the caller's overrides from the [`RenderContext`].
//!
//! The result is the post-bitstream packaging script, the constraint text,
//! the full pin constraint file, and the batch script. Rendering performs
//! no I/O and the same inputs always yield byte-identical output.
//!
//! ```
//! use bsp_platform::BoardRegistry;
//! use bsp_render::{render, RenderContext};
//!
//! let registry = BoardRegistry::builtin().unwrap();
//! let board = registry.get("picoevb").unwrap();
//! let out = render(board, &RenderContext::new("top")).unwrap();
//! assert!(out.post_bitstream_script.ends_with("-file top.mcs"));
//! ```

#![warn(missing_docs)]

pub mod board;
pub mod context;
pub mod error;
pub mod overrides;
pub mod ports;
pub mod tcl;
pub mod template;
pub mod xdc;

pub use board::{board_overrides, vendor_defaults};
pub use context::{is_safe_design_name, RenderContext};
pub use error::RenderError;
pub use overrides::{Generator, OverrideKey, OverrideValue, Overrides};
pub use template::{Placeholder, Template, TemplateError, TemplateParams};

use bsp_platform::PlatformDescriptor;
use bsp_resource::Resource;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The text artifacts of one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedArtifacts {
    /// The design name the artifacts were rendered for.
    pub design_name: String,
    /// Top-level module the batch script synthesizes.
    pub top: String,
    /// HDL sources the batch script adds, in order.
    pub sources: Vec<String>,
    /// Script run after the bitstream is written (flash packaging).
    pub post_bitstream_script: String,
    /// Timing, power, and configuration constraints.
    pub constraints_text: String,
    /// The complete constraint file: pins, attributes, clocks, then
    /// `constraints_text`.
    pub pin_constraints: String,
    /// The toolchain batch script.
    pub build_script: String,
}

/// Renders every artifact for `platform`.
///
/// Fails without partial output if a requested resource is unknown or
/// requested twice.
pub fn render(
    platform: &PlatformDescriptor,
    context: &RenderContext,
) -> Result<RenderedArtifacts, RenderError> {
    let requested = requested_resources(platform, context)?;

    let mut layers = vendor_defaults();
    layers.layer(&board_overrides(platform));
    layers.layer(context.overrides());

    let params = TemplateParams::new(context.design_name(), platform);
    let resolved: BTreeMap<OverrideKey, String> = layers
        .iter()
        .map(|(key, value)| (key, value.resolve(&params)))
        .collect();
    let text = |key: OverrideKey| resolved.get(&key).cloned().unwrap_or_default();

    let constraints_text = text(OverrideKey::AddConstraints);
    let pin_constraints = xdc::pin_constraints(platform, &requested, &constraints_text);
    let build_script = tcl::build_script(
        &tcl::ScriptInputs {
            params,
            top: context.top(),
            sources: context.sources(),
        },
        &resolved,
    );

    log::debug!(
        "rendered '{}' for {}: {} resource(s), {} caller override(s)",
        context.design_name(),
        platform.name(),
        requested.len(),
        context.overrides().len()
    );
    Ok(RenderedArtifacts {
        design_name: context.design_name().to_string(),
        top: context.top().to_string(),
        sources: context.sources().to_vec(),
        post_bitstream_script: text(OverrideKey::ScriptAfterBitstream),
        constraints_text,
        pin_constraints,
        build_script,
    })
}

fn requested_resources<'a>(
    platform: &'a PlatformDescriptor,
    context: &RenderContext,
) -> Result<Vec<&'a Resource>, RenderError> {
    let mut keys: Vec<(String, u32)> = Vec::new();
    if context.default_domain() {
        let defaults = [platform.default_clock_name(), platform.default_reset_name()];
        keys.extend(defaults.into_iter().flatten().map(|name| (name.to_string(), 0)));
    }
    // Each implicit request absorbs at most one explicit repeat.
    let mut absorbable: BTreeSet<(&str, u32)> =
        keys.iter().map(|(name, index)| (name.as_str(), *index)).collect();
    let implicit = keys.len();

    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for (position, (name, index)) in keys.iter().chain(context.requests()).enumerate() {
        if !seen.insert((name.as_str(), *index)) {
            if position >= implicit && absorbable.remove(&(name.as_str(), *index)) {
                continue;
            }
            return Err(RenderError::DuplicateRequest {
                name: name.clone(),
                index: *index,
            });
        }
        let resource = platform
            .resource(name, *index)
            .ok_or_else(|| RenderError::UnknownResource {
                board: platform.name().to_string(),
                name: name.clone(),
                index: *index,
            })?;
        out.push(resource);
    }
    Ok(out)
}
