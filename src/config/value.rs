//! Loosely-typed configuration values.
//!
//! A [`ConfigTree`] maps string keys to [`ConfigValue`]s, where a value is a
//! scalar, a list, or another tree. Trees deserialize straight from JSON so
//! override files need no schema.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{VizError, VizResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ConfigValue>),
    Tree(ConfigTree),
}

impl ConfigValue {
    pub fn as_tree(&self) -> Option<&ConfigTree> {
        match self {
            ConfigValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Int(i) => Some(*i as f64),
            ConfigValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => ConfigValue::Null,
            Value::Bool(b) => ConfigValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ConfigValue::Int(i),
                None => ConfigValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ConfigValue::Str(s),
            Value::Array(items) => ConfigValue::List(items.into_iter().map(ConfigValue::from).collect()),
            Value::Object(map) => ConfigValue::Tree(ConfigTree(
                map.into_iter().map(|(k, v)| (k, ConfigValue::from(v))).collect(),
            )),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<i32> for ConfigValue {
    fn from(i: i32) -> Self {
        ConfigValue::Int(i as i64)
    }
}

impl From<f64> for ConfigValue {
    fn from(f: f64) -> Self {
        ConfigValue::Float(f)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Str(s)
    }
}

impl From<ConfigTree> for ConfigValue {
    fn from(tree: ConfigTree) -> Self {
        ConfigValue::Tree(tree)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ConfigValue::Null, Into::into)
    }
}

/// A nested named-parameter structure, one per chart invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTree(BTreeMap<String, ConfigValue>);

impl ConfigTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a JSON object into a tree. Anything other than an object is rejected.
    pub fn from_json(value: serde_json::Value) -> VizResult<Self> {
        match ConfigValue::from(value) {
            ConfigValue::Tree(tree) => Ok(tree),
            _ => Err(VizError::ConfigType {
                path: "<root>".to_string(),
                expected: "a JSON object",
            }),
        }
    }

    pub fn to_json(&self) -> VizResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Looks up a dotted path such as `axis.grid_style.alpha`.
    pub fn get_path(&self, path: &str) -> Option<&ConfigValue> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_tree()?.0.get(part)?;
        }
        Some(current)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Option<ConfigValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut ConfigValue> {
        self.0.get_mut(key)
    }

    /// Dotted paths of every non-tree leaf, sorted.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaves(self, "", &mut paths);
        paths
    }

    /// Typed view of a nested section.
    pub fn section<'a>(&'a self, name: &'a str) -> VizResult<Section<'a>> {
        match self.0.get(name) {
            Some(ConfigValue::Tree(tree)) => Ok(Section { path: name.to_string(), tree }),
            Some(_) => Err(VizError::ConfigType {
                path: name.to_string(),
                expected: "a section",
            }),
            None => Err(VizError::MissingKey { path: name.to_string() }),
        }
    }

    /// Typed view of the whole tree, for flat configurations.
    pub fn root(&self) -> Section<'_> {
        Section {
            path: String::new(),
            tree: self,
        }
    }
}

fn collect_leaves(tree: &ConfigTree, prefix: &str, out: &mut Vec<String>) {
    for (key, value) in tree.iter() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            ConfigValue::Tree(child) if !child.is_empty() => collect_leaves(child, &path, out),
            _ => out.push(path),
        }
    }
}

impl FromIterator<(String, ConfigValue)> for ConfigTree {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        ConfigTree(iter.into_iter().collect())
    }
}

/// Borrowed view of one section of a resolved tree.
///
/// Accessors report the full dotted path when a leaf is absent or has the
/// wrong shape; this is where a malformed override finally surfaces.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    path: String,
    tree: &'a ConfigTree,
}

impl<'a> Section<'a> {
    fn key_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn type_error(&self, key: &str, expected: &'static str) -> VizError {
        VizError::ConfigType {
            path: self.key_path(key),
            expected,
        }
    }

    pub fn tree(&self) -> &'a ConfigTree {
        self.tree
    }

    pub fn get(&self, key: &str) -> Option<&'a ConfigValue> {
        self.tree.get(key)
    }

    pub fn require(&self, key: &str) -> VizResult<&'a ConfigValue> {
        self.tree.get(key).ok_or_else(|| VizError::MissingKey {
            path: self.key_path(key),
        })
    }

    pub fn child(&self, key: &str) -> VizResult<Section<'a>> {
        match self.require(key)? {
            ConfigValue::Tree(tree) => Ok(Section {
                path: self.key_path(key),
                tree,
            }),
            _ => Err(self.type_error(key, "a section")),
        }
    }

    pub fn f64(&self, key: &str) -> VizResult<f64> {
        self.require(key)?
            .as_f64()
            .ok_or_else(|| self.type_error(key, "a number"))
    }

    /// Numeric leaf that may be null.
    pub fn opt_f64(&self, key: &str) -> VizResult<Option<f64>> {
        match self.tree.get(key) {
            None | Some(ConfigValue::Null) => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.type_error(key, "a number or null")),
        }
    }

    pub fn u32(&self, key: &str) -> VizResult<u32> {
        let value = self.f64(key)?;
        if value < 0.0 || value > u32::MAX as f64 {
            return Err(self.type_error(key, "a non-negative integer"));
        }
        Ok(value.round() as u32)
    }

    pub fn str(&self, key: &str) -> VizResult<&'a str> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| self.type_error(key, "a string"))
    }

    /// String leaf that may be null (e.g. an axis label that falls back to a chart-specific default).
    pub fn opt_str(&self, key: &str) -> VizResult<Option<&'a str>> {
        match self.tree.get(key) {
            None | Some(ConfigValue::Null) => Ok(None),
            Some(ConfigValue::Str(s)) => Ok(Some(s)),
            Some(_) => Err(self.type_error(key, "a string or null")),
        }
    }

    pub fn bool(&self, key: &str) -> VizResult<bool> {
        self.require(key)?
            .as_bool()
            .ok_or_else(|| self.type_error(key, "a boolean"))
    }

    pub fn str_list(&self, key: &str) -> VizResult<Vec<&'a str>> {
        let items = self
            .require(key)?
            .as_list()
            .ok_or_else(|| self.type_error(key, "a list of strings"))?;
        items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| self.type_error(key, "a list of strings")))
            .collect()
    }

    pub fn f64_list(&self, key: &str) -> VizResult<Vec<f64>> {
        let items = self
            .require(key)?
            .as_list()
            .ok_or_else(|| self.type_error(key, "a list of numbers"))?;
        items
            .iter()
            .map(|item| item.as_f64().ok_or_else(|| self.type_error(key, "a list of numbers")))
            .collect()
    }

    /// Two-element numeric list such as `figsize`.
    pub fn f64_pair(&self, key: &str) -> VizResult<(f64, f64)> {
        match self.f64_list(key)?.as_slice() {
            [a, b] => Ok((*a, *b)),
            _ => Err(self.type_error(key, "a pair of numbers")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> ConfigTree {
        ConfigTree::from_json(json!({
            "figure": {"figsize": [16, 8], "dpi": 300},
            "axis": {"xlabel": null, "grid_style": {"linestyle": ":", "alpha": 0.4}},
            "title": "flat"
        }))
        .unwrap()
    }

    #[test]
    fn test_from_json_keeps_integers_and_floats_apart() {
        let tree = sample();
        assert_eq!(tree.get_path("figure.dpi"), Some(&ConfigValue::Int(300)));
        assert_eq!(tree.get_path("axis.grid_style.alpha"), Some(&ConfigValue::Float(0.4)));
        assert_eq!(tree.get_path("axis.xlabel"), Some(&ConfigValue::Null));
        assert_eq!(tree.get_path("axis.missing"), None);
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(ConfigTree::from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn test_leaf_paths() {
        assert_eq!(
            sample().leaf_paths(),
            vec![
                "axis.grid_style.alpha",
                "axis.grid_style.linestyle",
                "axis.xlabel",
                "figure.dpi",
                "figure.figsize",
                "title",
            ]
        );
    }

    #[test]
    fn test_section_accessors() {
        let tree = sample();
        let figure = tree.section("figure").unwrap();
        assert_eq!(figure.f64_pair("figsize").unwrap(), (16.0, 8.0));
        assert_eq!(figure.u32("dpi").unwrap(), 300);

        let axis = tree.section("axis").unwrap();
        assert_eq!(axis.opt_str("xlabel").unwrap(), None);
        assert_eq!(axis.child("grid_style").unwrap().str("linestyle").unwrap(), ":");
        assert_eq!(tree.root().str("title").unwrap(), "flat");
    }

    #[test]
    fn test_accessor_errors_carry_full_path() {
        let tree = sample();
        let grid = tree.section("axis").unwrap().child("grid_style").unwrap();
        match grid.bool("alpha").unwrap_err() {
            VizError::ConfigType { path, expected } => {
                assert_eq!(path, "axis.grid_style.alpha");
                assert_eq!(expected, "a boolean");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            tree.section("legend").unwrap_err(),
            VizError::MissingKey { ref path } if path == "legend"
        ));
        assert!(matches!(tree.section("title"), Err(VizError::ConfigType { .. })));
    }

    #[test]
    fn test_serde_round_trip_through_json_text() {
        let tree = sample();
        let text = serde_json::to_string(&tree).unwrap();
        let back: ConfigTree = serde_json::from_str(&text).unwrap();
        assert_eq!(back, tree);
    }
}
