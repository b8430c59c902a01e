//! Layered configuration resolution.
//!
//! A chart's parameters come from three layers, later layers winning:
//! the registry default for the chart kind, an optional caller-supplied
//! override tree, and keyword overrides keyed by section name. Each layer is
//! deep-merged into a scratch copy of the previous result, so the registry
//! entry is never touched.

use super::registry;
use super::value::{ConfigTree, ConfigValue};
use crate::types::ChartKind;

/// Deep-merge `overlay` onto `base`, returning a new tree.
///
/// Nested trees are merged recursively; every other value (scalars, lists,
/// null) in `overlay` replaces the base value wholesale.
pub fn deep_merge(base: &ConfigTree, overlay: &ConfigTree) -> ConfigTree {
    let mut result = base.clone();
    result.merge_from(overlay);
    result
}

impl ConfigTree {
    /// In-place deep merge of `overlay` into this tree.
    pub fn merge_from(&mut self, overlay: &ConfigTree) {
        for (key, overlay_value) in overlay.iter() {
            if let (Some(ConfigValue::Tree(base_tree)), ConfigValue::Tree(overlay_tree)) =
                (self.entry_mut(key), overlay_value)
            {
                base_tree.merge_from(overlay_tree);
                continue;
            }
            self.insert(key.clone(), overlay_value.clone());
        }
    }
}

/// Resolve `defaults` against an optional override tree and keyword overrides.
pub fn resolve(defaults: &ConfigTree, overrides: Option<&ConfigTree>, keywords: &ConfigTree) -> ConfigTree {
    let mut resolved = defaults.clone();
    if let Some(overrides) = overrides {
        resolved.merge_from(overrides);
    }
    resolved.merge_from(keywords);
    resolved
}

/// Default leaves that are missing from `resolved`.
///
/// Always empty for trees produced by [`resolve`]; producers use it in debug
/// logging and tests use it to pin the invariant.
pub fn missing_leaves(defaults: &ConfigTree, resolved: &ConfigTree) -> Vec<String> {
    defaults
        .leaf_paths()
        .into_iter()
        .filter(|path| resolved.get_path(path).is_none())
        .collect()
}

/// Per-call chart options: the override tree, keyword overrides and the display flag.
#[derive(Debug, Clone, Default)]
pub struct ChartOptions {
    config: Option<ConfigTree>,
    keywords: ConfigTree,
    show: bool,
    font: Option<String>,
}

impl ChartOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caller-supplied override tree (middle precedence).
    pub fn config(mut self, config: ConfigTree) -> Self {
        self.config = Some(config);
        self
    }

    /// Keyword override for one section (highest precedence).
    ///
    /// Setting the same section twice replaces the earlier keyword value.
    /// For flat interactive configurations `section` is a leaf key.
    pub fn set(mut self, section: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.keywords.insert(section, value);
        self
    }

    pub fn show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Font family for static renderers, normally taken from the [`Environment`](super::Environment).
    pub fn font(mut self, family: impl Into<String>) -> Self {
        self.font = Some(family.into());
        self
    }

    pub fn font_family(&self) -> &str {
        self.font.as_deref().unwrap_or(super::Environment::DEFAULT_FONT)
    }

    pub fn wants_display(&self) -> bool {
        self.show
    }

    pub fn override_tree(&self) -> Option<&ConfigTree> {
        self.config.as_ref()
    }

    pub fn keywords(&self) -> &ConfigTree {
        &self.keywords
    }

    /// Resolve these options against the registry default for `kind`.
    pub fn resolve(&self, kind: ChartKind) -> ConfigTree {
        let defaults = registry::defaults(kind);
        let resolved = resolve(defaults, self.config.as_ref(), &self.keywords);
        if cfg!(feature = "dev") {
            let missing = missing_leaves(defaults, &resolved);
            tracing::debug!(chart = %kind, ?missing, "resolved configuration");
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> ConfigTree {
        ConfigTree::from_json(value).unwrap()
    }

    #[test]
    fn test_deep_merge_recurses_into_trees() {
        let base = tree(json!({"a": {"x": 1, "y": 2}, "b": 3}));
        let overlay = tree(json!({"a": {"y": 20}}));
        assert_eq!(deep_merge(&base, &overlay), tree(json!({"a": {"x": 1, "y": 20}, "b": 3})));
    }

    #[test]
    fn test_scalar_over_tree_replaces() {
        let base = tree(json!({"a": {"x": 1}}));
        let overlay = tree(json!({"a": "flat"}));
        assert_eq!(deep_merge(&base, &overlay), tree(json!({"a": "flat"})));
    }

    #[test]
    fn test_tree_over_scalar_replaces() {
        let base = tree(json!({"a": 1}));
        let overlay = tree(json!({"a": {"x": 2}}));
        assert_eq!(deep_merge(&base, &overlay), tree(json!({"a": {"x": 2}})));
    }

    #[test]
    fn test_null_overlay_replaces_value() {
        let base = tree(json!({"line": {"marker": "o"}}));
        let overlay = tree(json!({"line": {"marker": null}}));
        assert_eq!(deep_merge(&base, &overlay).get_path("line.marker"), Some(&ConfigValue::Null));
    }

    #[test]
    fn test_deep_merge_leaves_inputs_untouched() {
        let base = tree(json!({"a": {"x": 1}}));
        let overlay = tree(json!({"a": {"x": 2}}));
        let before = base.clone();
        let _ = deep_merge(&base, &overlay);
        assert_eq!(base, before);
    }

    #[test]
    fn test_resolve_precedence() {
        let defaults = tree(json!({"text": {"title": "default", "size": 12}}));
        let overrides = tree(json!({"text": {"title": "override"}}));
        let keywords = tree(json!({"text": {"title": "keyword"}}));

        let resolved = resolve(&defaults, Some(&overrides), &keywords);
        assert_eq!(resolved.get_path("text.title"), Some(&ConfigValue::from("keyword")));
        assert_eq!(resolved.get_path("text.size"), Some(&ConfigValue::Int(12)));

        let resolved = resolve(&defaults, Some(&overrides), &ConfigTree::new());
        assert_eq!(resolved.get_path("text.title"), Some(&ConfigValue::from("override")));
    }

    #[test]
    fn test_missing_leaves_detects_removed_paths() {
        let defaults = tree(json!({"a": {"x": 1, "y": 2}}));
        let broken = tree(json!({"a": {"x": 1}}));
        assert_eq!(missing_leaves(&defaults, &broken), vec!["a.y".to_string()]);
        assert!(missing_leaves(&defaults, &defaults).is_empty());
    }

    #[test]
    fn test_chart_options_builder() {
        let options = ChartOptions::new()
            .config(tree(json!({"output": {"filename": "custom"}})))
            .set("line", tree(json!({"linewidth": 2.0})))
            .show(true);
        assert!(options.wants_display());

        let resolved = options.resolve(ChartKind::StaticLine);
        assert_eq!(resolved.get_path("output.filename"), Some(&ConfigValue::from("custom")));
        assert_eq!(resolved.get_path("line.linewidth"), Some(&ConfigValue::Float(2.0)));
        assert_eq!(resolved.get_path("line.color"), Some(&ConfigValue::from("#2c7fb8")));
    }
}
