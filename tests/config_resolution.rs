use pretty_assertions::assert_eq;
use serde_json::json;
use tempviz::analysis::{group_values, TimeFields};
use tempviz::config::{defaults, missing_leaves, ChartOptions, ConfigTree, ConfigValue};
use tempviz::data::{generate_temperature_data, GeneratorSettings};
use tempviz::{ChartKind, GroupBy};

/// Tree holding `value` at the dotted `path`.
fn tree_at(path: &str, value: ConfigValue) -> ConfigTree {
    let mut parts: Vec<&str> = path.split('.').collect();
    let leaf = parts.pop().unwrap();
    let mut tree = ConfigTree::new().with(leaf, value);
    while let Some(part) = parts.pop() {
        tree = ConfigTree::new().with(part, tree);
    }
    tree
}

/// Keyword override for `path`: the first segment names the section.
fn keyword_at(options: ChartOptions, path: &str, value: ConfigValue) -> ChartOptions {
    match path.split_once('.') {
        Some((section, rest)) => options.set(section, tree_at(rest, value)),
        None => options.set(path, value),
    }
}

#[test]
fn test_defaults_resolve_to_registry_entry() {
    for kind in ChartKind::ALL {
        let before = defaults(kind).clone();
        let resolved = ChartOptions::new().resolve(kind);
        assert_eq!(&resolved, defaults(kind), "{kind}");
        assert_eq!(defaults(kind), &before, "{kind}");
    }
}

#[test]
fn test_registry_survives_overriding_resolutions() {
    for kind in ChartKind::ALL {
        let before = defaults(kind).clone();
        for path in before.leaf_paths() {
            let options = ChartOptions::new().config(tree_at(&path, ConfigValue::from("changed")));
            let resolved = options.resolve(kind);
            assert_eq!(resolved.get_path(&path), Some(&ConfigValue::from("changed")));
        }
        assert_eq!(defaults(kind), &before, "{kind} registry entry was modified");
        assert_eq!(ChartOptions::new().resolve(kind), before);
    }
}

#[test]
fn test_keyword_beats_override_tree_beats_default() {
    for kind in ChartKind::ALL {
        for path in defaults(kind).leaf_paths() {
            let options = ChartOptions::new().config(tree_at(&path, ConfigValue::from("Y")));
            assert_eq!(options.resolve(kind).get_path(&path), Some(&ConfigValue::from("Y")));

            let options = keyword_at(options, &path, ConfigValue::from("Z"));
            assert_eq!(options.resolve(kind).get_path(&path), Some(&ConfigValue::from("Z")), "{kind} {path}");
        }
    }
}

#[test]
fn test_overriding_one_leaf_leaves_siblings_alone() {
    for kind in ChartKind::ALL {
        let paths = defaults(kind).leaf_paths();
        for target in &paths {
            let resolved = ChartOptions::new()
                .config(tree_at(target, ConfigValue::from("changed")))
                .resolve(kind);
            for other in paths.iter().filter(|p| *p != target) {
                assert_eq!(
                    resolved.get_path(other),
                    defaults(kind).get_path(other),
                    "{kind}: overriding {target} disturbed {other}"
                );
            }
            assert!(missing_leaves(defaults(kind), &resolved).is_empty());
        }
    }
}

#[test]
fn test_keyword_section_merges_instead_of_replacing() {
    let options = ChartOptions::new().set("line", ConfigTree::from_json(json!({"linewidth": 3})).unwrap());
    let resolved = options.resolve(ChartKind::StaticLine);
    assert_eq!(resolved.get_path("line.linewidth"), Some(&ConfigValue::Int(3)));
    assert_eq!(resolved.get_path("line.color"), defaults(ChartKind::StaticLine).get_path("line.color"));
    assert!(missing_leaves(defaults(ChartKind::StaticLine), &resolved).is_empty());
}

#[test]
fn test_lists_are_replaced_wholesale() {
    let mut checked = 0;
    for kind in ChartKind::ALL {
        for path in defaults(kind).leaf_paths() {
            let Some(ConfigValue::List(items)) = defaults(kind).get_path(&path) else {
                continue;
            };
            assert!(!items.is_empty());
            let shorter = ConfigValue::List(vec![ConfigValue::from("#000000")]);
            let resolved = ChartOptions::new().config(tree_at(&path, shorter.clone())).resolve(kind);
            assert_eq!(resolved.get_path(&path), Some(&shorter), "{kind} {path}");
            checked += 1;
        }
    }
    assert!(checked >= 5);
}

#[test]
fn test_new_sections_are_inserted_verbatim() {
    let extra = json!({"annotations": {"notes": ["a", "b"], "nested": {"x": 1}}});
    for kind in ChartKind::ALL {
        let resolved = ChartOptions::new()
            .config(ConfigTree::from_json(extra.clone()).unwrap())
            .resolve(kind);
        let expected = ConfigTree::from_json(extra["annotations"].clone()).unwrap();
        assert_eq!(resolved.get("annotations"), Some(&ConfigValue::Tree(expected)));
        assert!(missing_leaves(defaults(kind), &resolved).is_empty());
    }
}

#[test]
fn test_generated_year_groups_into_months() {
    let series = generate_temperature_data(&GeneratorSettings::with_seed(42)).unwrap();
    assert_eq!(series.len(), 365 * 24);

    let groups = group_values(&series, GroupBy::Month);
    assert_eq!(groups.len(), 12);
    for (month, values) in &groups {
        assert!((28 * 24..=31 * 24).contains(&values.len()), "month {month}");
    }
    assert_eq!(groups[&2].len(), 696);
}

#[test]
fn test_day_of_year_in_leap_year() {
    let ts = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let fields = TimeFields::of(&ts);
    assert_eq!(fields.day_of_year, 61);
    assert_eq!(fields.hour, 0);
}
