//! Electrical attributes attached to pins (I/O standard, pulls, drive).

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::ResourceError;

/// A set of electrical attributes, e.g. `IOSTANDARD=LVCMOS33`, `DRIVE=8`.
///
/// Keys are unique and kept in sorted order so that emitted constraint
/// text never depends on declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attrs(BTreeMap<String, String>);

impl Attrs {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an attribute set from key/value pairs, rejecting repeated keys.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, ResourceError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = BTreeMap::new();
        for (key, value) in pairs {
            let key = key.into();
            if map.contains_key(&key) {
                return Err(ResourceError::DuplicateAttribute(key));
            }
            map.insert(key, value.into());
        }
        Ok(Self(map))
    }

    /// Returns the value of an attribute.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns these attributes with `child` laid over them; the child's
    /// value wins for keys present in both.
    pub fn overlay(&self, child: &Attrs) -> Attrs {
        let mut merged = self.0.clone();
        for (key, value) in &child.0 {
            merged.insert(key.clone(), value.clone());
        }
        Attrs(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_sorted() {
        let attrs =
            Attrs::from_pairs([("PULLUP", "true"), ("IOSTANDARD", "LVCMOS33"), ("DRIVE", "8")])
                .unwrap();
        let keys: Vec<_> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["DRIVE", "IOSTANDARD", "PULLUP"]);
        assert_eq!(attrs.get("DRIVE"), Some("8"));
    }

    #[test]
    fn duplicate_key_rejected() {
        let err = Attrs::from_pairs([("IOSTANDARD", "LVDS"), ("IOSTANDARD", "LVDS_25")])
            .unwrap_err();
        assert_eq!(err, ResourceError::DuplicateAttribute("IOSTANDARD".to_string()));
    }

    #[test]
    fn overlay_child_wins() {
        let parent = Attrs::from_pairs([("IOSTANDARD", "SSTL15"), ("SLEW", "FAST")]).unwrap();
        let child = Attrs::from_pairs([("IOSTANDARD", "DIFF_SSTL15")]).unwrap();
        let merged = parent.overlay(&child);
        assert_eq!(merged.get("IOSTANDARD"), Some("DIFF_SSTL15"));
        assert_eq!(merged.get("SLEW"), Some("FAST"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn empty_overlay_is_identity() {
        let parent = Attrs::from_pairs([("IOSTANDARD", "LVCMOS33")]).unwrap();
        assert_eq!(parent.overlay(&Attrs::new()), parent);
        assert!(Attrs::new().is_empty());
    }
}
