//! Configuration types deserialized from `bsp.toml`.

use crate::error::ConfigError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The top-level project configuration parsed from `bsp.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Design name, board, top module and sources.
    pub project: ProjectMeta,
    /// Build directory and programming settings.
    #[serde(default)]
    pub build: BuildConfig,
    /// Where to find the vendor toolchain.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Literal override text, keyed by override name.
    #[serde(default)]
    pub overrides: BTreeMap<String, OverrideEntry>,
    /// Override templates with placeholders, keyed by override name.
    #[serde(default)]
    pub templates: BTreeMap<String, OverrideEntry>,
    /// Resources the design uses.
    #[serde(default)]
    pub requests: RequestConfig,
}

/// The value of an `[overrides]` or `[templates]` entry.
///
/// Anything but a string is kept as [`OverrideEntry::Invalid`] so that
/// validation can name the offending key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OverrideEntry {
    /// Override text or template source.
    Text(String),
    /// A value of any other TOML type.
    Invalid(toml::Value),
}

impl OverrideEntry {
    /// Returns the text, or `None` for a non-string value.
    pub fn text(&self) -> Option<&str> {
        match self {
            OverrideEntry::Text(text) => Some(text),
            OverrideEntry::Invalid(_) => None,
        }
    }

    /// Returns the text, or a validation error naming `[section] key`.
    pub(crate) fn require_text(&self, section: &str, key: &str) -> Result<&str, ConfigError> {
        self.text().ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "override '{key}' in [{section}] must be a string"
            ))
        })
    }
}

/// Core project metadata required in every `bsp.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The design name. Names every generated artifact.
    pub name: String,
    /// The board to build for, as listed by `bsp boards`.
    pub board: String,
    /// Top-level module name. Defaults to the design name.
    #[serde(default)]
    pub top: Option<String>,
    /// HDL source files relative to the project directory.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub sources: Vec<String>,
}

/// Build output settings.
#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    /// Output directory relative to the project directory.
    #[serde(default = "default_build_dir")]
    pub dir: String,
    /// Program the board after a successful build.
    #[serde(default)]
    pub program: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            dir: default_build_dir(),
            program: false,
        }
    }
}

fn default_build_dir() -> String {
    "build".to_string()
}

/// Toolchain location settings.
#[derive(Debug, Default, Deserialize)]
pub struct ToolchainConfig {
    /// Path to the `vivado` executable.
    #[serde(default)]
    pub vivado: Option<String>,
}

/// The resources to constrain.
#[derive(Debug, Default, Deserialize)]
pub struct RequestConfig {
    /// Explicit requests, written `name:index` or just `name` for index 0.
    #[serde(default)]
    pub resources: Vec<ResourceRequest>,
    /// Also constrain the board's default clock and reset.
    #[serde(default)]
    pub default_domain: bool,
}

/// A `(name, index)` resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Resource name.
    pub name: String,
    /// Resource index.
    pub index: u32,
}

impl FromStr for ResourceRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, index) = match s.split_once(':') {
            Some((name, index)) => {
                let index = index
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| format!("invalid resource index in '{s}'"))?;
                (name.trim(), index)
            }
            None => (s.trim(), 0),
        };
        if name.is_empty() {
            return Err(format!("missing resource name in '{s}'"));
        }
        Ok(Self {
            name: name.to_string(),
            index,
        })
    }
}

impl fmt::Display for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.index)
    }
}

impl<'de> Deserialize<'de> for ResourceRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RequestVisitor;

        impl Visitor<'_> for RequestVisitor {
            type Value = ResourceRequest;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a resource request like \"led:0\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(RequestVisitor)
    }
}

fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parsing() {
        let r: ResourceRequest = "led:3".parse().unwrap();
        assert_eq!(r, ResourceRequest { name: "led".to_string(), index: 3 });
        let r: ResourceRequest = "clk100".parse().unwrap();
        assert_eq!(r.index, 0);
        assert_eq!(r.to_string(), "clk100:0");
        assert!("led:x".parse::<ResourceRequest>().is_err());
        assert!(":1".parse::<ResourceRequest>().is_err());
    }

    #[test]
    fn override_entry_text() {
        assert_eq!(OverrideEntry::Text("a".to_string()).text(), Some("a"));
        let entry = OverrideEntry::Invalid(toml::Value::Integer(42));
        assert!(entry.text().is_none());
        let err = entry.require_text("overrides", "add_constraints").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref m)
            if m == "override 'add_constraints' in [overrides] must be a string"));
    }

    #[test]
    fn build_defaults() {
        let build = BuildConfig::default();
        assert_eq!(build.dir, "build");
        assert!(!build.program);
    }
}
