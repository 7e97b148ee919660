//! Heuristic JSON importer
//!
//! JSON files from other tools rarely agree on a schema, so this module runs
//! an ordered chain of strategies over the parsed document. Each strategy is
//! a pure function that either recognises the document shape and returns at
//! least one draft record, or returns `None`. The first strategy with a
//! non-empty result wins; if none applies the result is empty.
//!
//! Strategies, in order:
//! 1. list of objects with aliased field names
//! 2. one object holding parallel arrays (`ids`, `names`, ...)
//! 3. one object holding a single array under a feature-like key
//! 4. list of positional arrays `[id, name, description, priority]`

use log::debug;
use serde_json::{Map, Value};
use std::fmt;

use crate::models::{Draft, Feature};

const ID_ALIASES: &[&str] = &["id", "i", "idx"];
const NAME_ALIASES: &[&str] = &["name", "n"];
const DESCRIPTION_ALIASES: &[&str] = &["description", "desc", "d"];
const PRIORITY_ALIASES: &[&str] = &["priority", "prio", "priory", "p"];

const ID_LIST_ALIASES: &[&str] = &["ids", "id_list", "idarray"];
const NAME_LIST_ALIASES: &[&str] = &["names", "titles", "featurenames"];
const DESCRIPTION_LIST_ALIASES: &[&str] = &["descriptions", "descs", "featuredescriptions"];
const PRIORITY_LIST_ALIASES: &[&str] = &["priorities", "prioritylist", "prio"];

/// Key fragments marking the array that holds the records in strategy 3
const CONTAINER_KEY_MARKERS: &[&str] = &["feature", "entries"];

/// Prefixes stripped from a key before checking it for an id alias
const ID_KEY_PREFIXES: &[&str] = &["feature", "entry"];

/// The parsing strategies of the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ListOfObjects,
    ParallelArrays,
    NestedArray,
    ArrayOfArrays,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::ListOfObjects => write!(f, "list of objects"),
            Strategy::ParallelArrays => write!(f, "object of parallel arrays"),
            Strategy::NestedArray => write!(f, "nested feature array"),
            Strategy::ArrayOfArrays => write!(f, "array of arrays"),
        }
    }
}

type StrategyFn = fn(&Value) -> Option<Vec<Draft>>;

const CHAIN: &[(Strategy, StrategyFn)] = &[
    (Strategy::ListOfObjects, list_of_objects),
    (Strategy::ParallelArrays, parallel_arrays),
    (Strategy::NestedArray, nested_array),
    (Strategy::ArrayOfArrays, array_of_arrays),
];

/// Outcome of running the chain over one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// The strategy that produced the records, if any applied
    pub strategy: Option<Strategy>,
    /// Sanitized records
    pub features: Vec<Feature>,
}

/// Resolves raw JSON text into canonical records. Never fails.
pub fn resolve(raw: &str) -> Vec<Feature> {
    resolve_detailed(raw).features
}

/// Like [`resolve`], but also reports which strategy applied
pub fn resolve_detailed(raw: &str) -> Resolution {
    let text = raw.trim_start_matches('\u{feff}');
    match serde_json::from_str::<Value>(text) {
        Ok(root) => resolve_value(&root),
        Err(e) => {
            debug!("Input is not valid JSON, nothing to resolve: {}", e);
            Resolution::default()
        }
    }
}

/// Runs the strategy chain over an already parsed document
pub fn resolve_value(root: &Value) -> Resolution {
    for (strategy, parse) in CHAIN {
        if let Some(drafts) = parse(root) {
            debug!("Resolved {} record(s) using the {} strategy", drafts.len(), strategy);
            return Resolution {
                strategy: Some(*strategy),
                features: drafts.into_iter().map(Draft::into_feature).collect(),
            };
        }
    }

    debug!("No import strategy matched the document");
    Resolution::default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Name,
    Description,
    Priority,
}

/// Case-insensitive exact alias match
fn exact_field(key: &str) -> Option<Field> {
    let key = key.to_lowercase();
    let key = key.as_str();
    if ID_ALIASES.contains(&key) {
        Some(Field::Id)
    } else if NAME_ALIASES.contains(&key) {
        Some(Field::Name)
    } else if DESCRIPTION_ALIASES.contains(&key) {
        Some(Field::Description)
    } else if PRIORITY_ALIASES.contains(&key) {
        Some(Field::Priority)
    } else {
        None
    }
}

/// Alias match used inside a feature container
///
/// Besides exact aliases, keys like `feature_id` or `featureId` count as ids
/// and any key containing a multi-letter alias (`featureName`, `longDesc`,
/// `prioLevel`) counts for name, description or priority.
fn lenient_field(key: &str) -> Option<Field> {
    if let Some(field) = exact_field(key) {
        return Some(field);
    }

    let lowered = key.to_lowercase();
    if is_id_variant(&lowered) {
        return Some(Field::Id);
    }

    let contains_alias = |aliases: &[&str]| {
        aliases
            .iter()
            .filter(|alias| alias.len() > 1)
            .any(|alias| lowered.contains(alias))
    };

    if contains_alias(NAME_ALIASES) {
        Some(Field::Name)
    } else if contains_alias(DESCRIPTION_ALIASES) {
        Some(Field::Description)
    } else if contains_alias(PRIORITY_ALIASES) {
        Some(Field::Priority)
    } else {
        None
    }
}

fn is_id_variant(lowered: &str) -> bool {
    let normalized: String = lowered.chars().filter(|c| c.is_alphanumeric()).collect();
    let stripped = ID_KEY_PREFIXES
        .iter()
        .find_map(|prefix| normalized.strip_prefix(prefix))
        .unwrap_or(normalized.as_str());
    ID_ALIASES.contains(&stripped)
}

/// Native integer, or a string holding one
fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Textual form of a scalar; containers and null have none
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn assign(draft: &mut Draft, field: Field, value: &Value) {
    match field {
        Field::Id if draft.id.is_none() => draft.id = parse_int(value),
        Field::Name if draft.name.is_none() => draft.name = text_of(value),
        Field::Description if draft.description.is_none() => draft.description = text_of(value),
        Field::Priority if draft.priority.is_none() => draft.priority = parse_int(value),
        _ => {}
    }
}

/// Builds a draft from one object: aliased keys first, then the leftovers
/// positionally. Returns `None` when nothing could be extracted.
fn draft_from_object(object: &Map<String, Value>, matcher: fn(&str) -> Option<Field>) -> Option<Draft> {
    let mut draft = Draft::default();
    let mut unclaimed = Vec::new();

    for (key, value) in object {
        match matcher(key) {
            Some(field) => assign(&mut draft, field, value),
            None => unclaimed.push(value),
        }
    }

    for value in unclaimed {
        if draft.id.is_none() {
            if let Some(id) = value.as_i64().filter(|id| *id > 0) {
                draft.id = Some(id);
                continue;
            }
        }

        if let Value::String(s) = value {
            if draft.name.is_none() {
                draft.name = Some(s.clone());
                continue;
            }
            if draft.description.is_none() {
                draft.description = Some(s.clone());
                continue;
            }
        }

        // Only the first two unclaimed strings are used; later ones may still
        // feed the priority when they hold a number.
        if draft.priority.is_none() {
            if let Some(priority) = parse_int(value) {
                draft.priority = Some(priority);
            }
        }
    }

    (!draft.is_empty()).then_some(draft)
}

fn drafts_from_items(items: &[Value], matcher: fn(&str) -> Option<Field>) -> Option<Vec<Draft>> {
    let drafts: Vec<Draft> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|object| draft_from_object(object, matcher))
        .collect();

    (!drafts.is_empty()).then_some(drafts)
}

fn list_of_objects(root: &Value) -> Option<Vec<Draft>> {
    drafts_from_items(root.as_array()?, exact_field)
}

fn find_list<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Vec<Value>> {
    object
        .iter()
        .filter(|(key, _)| aliases.contains(&key.to_lowercase().as_str()))
        .find_map(|(_, value)| value.as_array())
}

fn at(column: Option<&Vec<Value>>, i: usize) -> Option<&Value> {
    column.and_then(|values| values.get(i))
}

fn parallel_arrays(root: &Value) -> Option<Vec<Draft>> {
    let object = root.as_object()?;

    let ids = find_list(object, ID_LIST_ALIASES);
    let names = find_list(object, NAME_LIST_ALIASES);
    let descriptions = find_list(object, DESCRIPTION_LIST_ALIASES);
    let priorities = find_list(object, PRIORITY_LIST_ALIASES);

    let len = [ids, names, descriptions, priorities]
        .into_iter()
        .flatten()
        .map(Vec::len)
        .max()?;
    if len == 0 {
        return None;
    }

    let drafts = (0..len)
        .map(|i| Draft {
            id: at(ids, i).and_then(parse_int),
            name: at(names, i).and_then(text_of),
            description: at(descriptions, i).and_then(text_of),
            priority: at(priorities, i).and_then(parse_int),
        })
        .collect();

    Some(drafts)
}

fn is_container_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    CONTAINER_KEY_MARKERS.iter().any(|marker| lowered.contains(marker))
}

fn nested_array(root: &Value) -> Option<Vec<Draft>> {
    let object = root.as_object()?;

    let mut containers = object
        .iter()
        .filter(|(key, value)| value.is_array() && is_container_key(key));

    let (_, items) = containers.next()?;
    if containers.next().is_some() {
        return None;
    }

    drafts_from_items(items.as_array()?, lenient_field)
}

fn array_of_arrays(root: &Value) -> Option<Vec<Draft>> {
    let drafts: Vec<Draft> = root
        .as_array()?
        .iter()
        .filter_map(Value::as_array)
        .filter_map(|row| {
            let draft = Draft {
                id: row.first().and_then(parse_int),
                name: row.get(1).and_then(text_of),
                description: row.get(2).and_then(text_of),
                priority: row.get(3).and_then(parse_int),
            };

            let not_blank = |text: &Option<String>| text.as_deref().is_some_and(|t| !t.trim().is_empty());
            let keep = draft.id.is_some_and(|id| id > 0)
                || not_blank(&draft.name)
                || not_blank(&draft.description)
                || draft.priority.is_some_and(|p| p > 0);

            keep.then_some(draft)
        })
        .collect();

    (!drafts.is_empty()).then_some(drafts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{any, prop_assert, prop_assert_eq, proptest};

    #[test]
    fn test_list_of_objects_aliases_and_clamp() {
        let resolution = resolve_detailed(r#"[{"id":"5","n":"X","d":"Y","p":"11"}]"#);
        assert_eq!(resolution.strategy, Some(Strategy::ListOfObjects));
        assert_eq!(resolution.features, vec![Feature::new(5, "X", "Y", 0)]);
    }

    #[test]
    fn test_list_of_objects_case_insensitive() {
        let features = resolve(r#"[{"ID":2,"Name":"Search","DESC":"Full text","Prio":7}]"#);
        assert_eq!(features, vec![Feature::new(2, "Search", "Full text", 7)]);
    }

    #[test]
    fn test_canonical_document_resolves() {
        let raw = r#"[
            {"Id": 1, "Name": "A", "Description": "", "Priority": 0},
            {"Id": 2, "Name": "B", "Description": "b", "Priority": 10}
        ]"#;
        let features = resolve(raw);
        assert_eq!(features.len(), 2);
        assert_eq!(features[0], Feature::new(1, "A", "", 0));
        assert_eq!(features[1], Feature::new(2, "B", "b", 10));
    }

    #[test]
    fn test_positional_fallback() {
        let raw = r#"[{"key": 7, "title": "A", "text": "B", "extra": "C", "rank": "3"}]"#;
        let features = resolve(raw);
        assert_eq!(features, vec![Feature::new(7, "A", "B", 3)]);
    }

    #[test]
    fn test_positional_ignores_non_positive_id() {
        // 0 cannot be an id, so it becomes the priority candidate instead
        let features = resolve(r#"[{"a": 0, "b": 4, "label": "X"}]"#);
        assert_eq!(features, vec![Feature::new(4, "X", "", 0)]);
    }

    #[test]
    fn test_alias_with_unparseable_value_stays_unset() {
        let features = resolve(r#"[{"id": "abc", "name": "X", "priority": "high"}]"#);
        assert_eq!(features, vec![Feature::new(0, "X", "", 0)]);
    }

    #[test]
    fn test_objects_without_usable_fields_are_dropped() {
        let features = resolve(r#"[{"tags": [1, 2]}, {"name": "kept"}, 42]"#);
        assert_eq!(features, vec![Feature::new(0, "kept", "", 0)]);
    }

    #[test]
    fn test_null_text_becomes_empty() {
        let features = resolve(r#"[{"id": 1, "name": null, "description": null}]"#);
        assert_eq!(features, vec![Feature::new(1, "", "", 0)]);
    }

    #[test]
    fn test_parallel_arrays() {
        let raw = r#"{
            "ids": [1, "2", 3],
            "titles": ["A", "B"],
            "featureDescriptions": ["a", "b", "c"],
            "priorityList": [1, 20, "4"]
        }"#;
        let resolution = resolve_detailed(raw);
        assert_eq!(resolution.strategy, Some(Strategy::ParallelArrays));
        assert_eq!(
            resolution.features,
            vec![
                Feature::new(1, "A", "a", 1),
                Feature::new(2, "B", "b", 0),
                Feature::new(3, "", "c", 4),
            ]
        );
    }

    #[test]
    fn test_parallel_arrays_empty_is_not_applicable() {
        let resolution = resolve_detailed(r#"{"ids": [], "names": []}"#);
        assert_eq!(resolution.strategy, None);
        assert!(resolution.features.is_empty());
    }

    #[test]
    fn test_nested_feature_array() {
        let resolution = resolve_detailed(r#"{"features":[{"name":"A"}]}"#);
        assert_eq!(resolution.strategy, Some(Strategy::NestedArray));
        assert_eq!(resolution.features, vec![Feature::new(0, "A", "", 0)]);
    }

    #[test]
    fn test_nested_array_lenient_keys() {
        let raw = r#"{
            "version": 2,
            "myEntries": [
                {"feature_id": 9, "featureName": "Export", "longDescription": "CSV", "prioLevel": "6"}
            ]
        }"#;
        let features = resolve(raw);
        assert_eq!(features, vec![Feature::new(9, "Export", "CSV", 6)]);
    }

    #[test]
    fn test_nested_array_ambiguous_container() {
        let raw = r#"{"features": [{"name": "A"}], "entries": [{"name": "B"}]}"#;
        let resolution = resolve_detailed(raw);
        assert_eq!(resolution.strategy, None);
    }

    #[test]
    fn test_array_of_arrays() {
        let raw = r#"[[1, "A", "a", 3], ["2", "B"], [0, " ", "", 0], []]"#;
        let resolution = resolve_detailed(raw);
        assert_eq!(resolution.strategy, Some(Strategy::ArrayOfArrays));
        assert_eq!(
            resolution.features,
            vec![Feature::new(1, "A", "a", 3), Feature::new(2, "B", "", 0)]
        );
    }

    #[test]
    fn test_empty_strategy_falls_through_to_next() {
        // Empty parallel arrays yield nothing, so the nested container wins
        let resolution = resolve_detailed(r#"{"ids": [], "features": [{"name": "A"}]}"#);
        assert_eq!(resolution.strategy, Some(Strategy::NestedArray));
        assert_eq!(resolution.features, vec![Feature::new(0, "A", "", 0)]);

        // No object yields a record, so the array rows are used
        let resolution = resolve_detailed(r#"[{"tags": [1]}, [1, "A"]]"#);
        assert_eq!(resolution.strategy, Some(Strategy::ArrayOfArrays));
        assert_eq!(resolution.features, vec![Feature::new(1, "A", "", 0)]);
    }

    #[test]
    fn test_malformed_input_is_empty() {
        assert!(resolve("{not json").is_empty());
        assert!(resolve("").is_empty());
        assert!(resolve("42").is_empty());
        assert!(resolve("[]").is_empty());
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let features = resolve("\u{feff}[{\"id\": 1}]");
        assert_eq!(features, vec![Feature::new(1, "", "", 0)]);
    }

    #[test]
    fn test_lenient_field_matching() {
        assert_eq!(lenient_field("featureId"), Some(Field::Id));
        assert_eq!(lenient_field("_id"), Some(Field::Id));
        assert_eq!(lenient_field("entry-idx"), Some(Field::Id));
        assert_eq!(lenient_field("identifier"), None);
        assert_eq!(lenient_field("displayName"), Some(Field::Name));
        assert_eq!(lenient_field("shortDesc"), Some(Field::Description));
        assert_eq!(lenient_field("PRIORITY_RANK"), Some(Field::Priority));
        assert_eq!(lenient_field("owner"), None);
    }

    proptest! {
        #[test]
        fn prop_priority_always_in_range(priority in any::<i64>(), name in ".*") {
            let raw = serde_json::json!([{ "id": 1, "name": name, "priority": priority }]).to_string();
            for feature in resolve(&raw) {
                prop_assert!(feature.priority <= 10);
                if (1..=10).contains(&priority) {
                    prop_assert_eq!(i64::from(feature.priority), priority);
                } else {
                    prop_assert_eq!(feature.priority, 0);
                }
            }
        }
    }
}
