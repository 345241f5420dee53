//! Override keys, values, and the layered override map.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::RenderError;
use crate::template::{Template, TemplateParams};

/// A named hook point or setting in the generated toolchain script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverrideKey {
    /// Runs after sources and constraints are read.
    ScriptAfterRead,
    /// Runs after synthesis.
    ScriptAfterSynth,
    /// Runs after placement.
    ScriptAfterPlace,
    /// Runs after routing.
    ScriptAfterRoute,
    /// Runs just before the bitstream is written.
    ScriptBeforeBitstream,
    /// Runs after the bitstream is written (flash image packaging).
    ScriptAfterBitstream,
    /// Extra constraint text appended to the constraint file.
    AddConstraints,
    /// Extra options passed to synthesis.
    SynthDesignOpts,
}

impl OverrideKey {
    /// Every key, in script order.
    pub const ALL: [OverrideKey; 8] = [
        OverrideKey::ScriptAfterRead,
        OverrideKey::ScriptAfterSynth,
        OverrideKey::ScriptAfterPlace,
        OverrideKey::ScriptAfterRoute,
        OverrideKey::ScriptBeforeBitstream,
        OverrideKey::ScriptAfterBitstream,
        OverrideKey::AddConstraints,
        OverrideKey::SynthDesignOpts,
    ];

    /// Returns the key as written in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            OverrideKey::ScriptAfterRead => "script_after_read",
            OverrideKey::ScriptAfterSynth => "script_after_synth",
            OverrideKey::ScriptAfterPlace => "script_after_place",
            OverrideKey::ScriptAfterRoute => "script_after_route",
            OverrideKey::ScriptBeforeBitstream => "script_before_bitstream",
            OverrideKey::ScriptAfterBitstream => "script_after_bitstream",
            OverrideKey::AddConstraints => "add_constraints",
            OverrideKey::SynthDesignOpts => "synth_design_opts",
        }
    }
}

impl fmt::Display for OverrideKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverrideKey {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| RenderError::InvalidOverride {
                key: s.to_string(),
                reason: "unknown key".to_string(),
            })
    }
}

/// A function computing override text from the render parameters.
pub type Generator = Arc<dyn Fn(&TemplateParams<'_>) -> String + Send + Sync>;

/// The value bound to an override key.
#[derive(Clone)]
pub enum OverrideValue {
    /// Literal text, used as is.
    Text(String),
    /// Text with placeholders, filled at render time.
    Template(Template),
    /// Text computed from the render parameters.
    Generator(Generator),
}

impl OverrideValue {
    /// Creates a literal value.
    pub fn text(text: impl Into<String>) -> Self {
        OverrideValue::Text(text.into())
    }

    /// Creates a generated value.
    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&TemplateParams<'_>) -> String + Send + Sync + 'static,
    {
        OverrideValue::Generator(Arc::new(f))
    }

    /// Produces the final text.
    pub fn resolve(&self, params: &TemplateParams<'_>) -> String {
        match self {
            OverrideValue::Text(text) => text.clone(),
            OverrideValue::Template(template) => template.render(params),
            OverrideValue::Generator(generate) => generate(params),
        }
    }
}

impl fmt::Debug for OverrideValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideValue::Text(text) => f.debug_tuple("Text").field(text).finish(),
            OverrideValue::Template(t) => f.debug_tuple("Template").field(&t.source()).finish(),
            OverrideValue::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// An ordered map from override key to value.
///
/// Setting a key replaces its previous value outright. Layering one map
/// onto another does the same per key; values are never concatenated.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    values: BTreeMap<OverrideKey, OverrideValue>,
}

impl Overrides {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a value, returning the one it replaced.
    pub fn set(&mut self, key: OverrideKey, value: OverrideValue) -> Option<OverrideValue> {
        self.values.insert(key, value)
    }

    /// Binds literal text.
    pub fn set_text(&mut self, key: OverrideKey, text: impl Into<String>) {
        self.set(key, OverrideValue::text(text));
    }

    /// Parses and binds a template.
    pub fn set_template(&mut self, key: OverrideKey, template: &str) -> Result<(), RenderError> {
        let template = Template::parse(template).map_err(|e| RenderError::InvalidOverride {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.set(key, OverrideValue::Template(template));
        Ok(())
    }

    /// Binds a generator.
    pub fn set_generator<F>(&mut self, key: OverrideKey, f: F)
    where
        F: Fn(&TemplateParams<'_>) -> String + Send + Sync + 'static,
    {
        self.set(key, OverrideValue::generator(f));
    }

    /// Binds literal text to a key given by name.
    pub fn set_text_named(&mut self, key: &str, text: impl Into<String>) -> Result<(), RenderError> {
        let key: OverrideKey = key.parse()?;
        self.set_text(key, text);
        Ok(())
    }

    /// Binds a template to a key given by name.
    pub fn set_template_named(&mut self, key: &str, template: &str) -> Result<(), RenderError> {
        let key: OverrideKey = key.parse()?;
        self.set_template(key, template)
    }

    /// Returns the value bound to a key.
    pub fn get(&self, key: OverrideKey) -> Option<&OverrideValue> {
        self.values.get(&key)
    }

    /// Returns true if the key is bound.
    pub fn contains(&self, key: OverrideKey) -> bool {
        self.values.contains_key(&key)
    }

    /// Applies `other` on top of this map: each key it binds wins.
    pub fn layer(&mut self, other: &Overrides) {
        for (key, value) in &other.values {
            self.values.insert(*key, value.clone());
        }
    }

    /// Iterates over bindings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (OverrideKey, &OverrideValue)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    /// Returns the number of bound keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
