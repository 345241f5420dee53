//! Per-build render inputs.

use crate::overrides::{OverrideKey, OverrideValue, Overrides};

/// Everything a single render needs besides the board.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    design_name: String,
    top: Option<String>,
    sources: Vec<String>,
    overrides: Overrides,
    requests: Vec<(String, u32)>,
    default_domain: bool,
}

impl RenderContext {
    /// Creates a context with no overrides and no requested resources.
    pub fn new(design_name: impl Into<String>) -> Self {
        Self {
            design_name: design_name.into(),
            ..Self::default()
        }
    }

    /// Names the top-level module. Defaults to the design name.
    pub fn with_top(mut self, top: impl Into<String>) -> Self {
        self.top = Some(top.into());
        self
    }

    /// Sets the HDL sources added to the project, in order.
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Binds an override, replacing any earlier binding of the key.
    pub fn with_override(mut self, key: OverrideKey, value: OverrideValue) -> Self {
        self.overrides.set(key, value);
        self
    }

    /// Replaces all overrides.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Requests a resource for the pin constraint file.
    pub fn request(mut self, name: impl Into<String>, index: u32) -> Self {
        self.requests.push((name.into(), index));
        self
    }

    /// Also requests the board's default clock and reset, ahead of the
    /// explicit requests.
    pub fn with_default_domain(mut self) -> Self {
        self.default_domain = true;
        self
    }

    /// Returns the design name.
    pub fn design_name(&self) -> &str {
        &self.design_name
    }

    /// Returns the top-level module name.
    pub fn top(&self) -> &str {
        self.top.as_deref().unwrap_or(&self.design_name)
    }

    /// Returns the HDL sources.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Returns the caller's overrides.
    pub fn overrides(&self) -> &Overrides {
        &self.overrides
    }

    /// Returns the explicit resource requests.
    pub fn requests(&self) -> &[(String, u32)] {
        &self.requests
    }

    /// Returns true if the default clock and reset are requested.
    pub fn default_domain(&self) -> bool {
        self.default_domain
    }
}

/// Returns true if `name` is safe to use unquoted in file names and
/// toolchain scripts: ASCII letters, digits, `_` and `-`, not starting with
/// `-`.
///
/// The renderer does not enforce this. Callers that take names from users
/// can check it first.
pub fn is_safe_design_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
