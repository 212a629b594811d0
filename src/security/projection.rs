//! Allow-list field projection.
//!
//! The same `pick` serves both directions: inbound bodies are sanitized
//! before a draft is built, and stored records are projected before they
//! are serialized to the client. A [`FieldSpec`] is a strict allow-list;
//! anything it does not name is dropped.

use serde::Serialize;
use serde_json::{Map, Value};

/// A named, ordered set of field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

impl FieldSpec {
    pub const fn new(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields }
    }

    pub fn allows(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }
}

/// Copy the top-level keys named by `allow` out of `source`.
///
/// Non-object sources yield an empty map.
pub fn pick(source: &Value, allow: &FieldSpec) -> Map<String, Value> {
    let Some(object) = source.as_object() else {
        return Map::new();
    };

    allow
        .fields
        .iter()
        .filter_map(|field| {
            object
                .get(*field)
                .map(|value| ((*field).to_string(), value.clone()))
        })
        .collect()
}

/// Input sanitizer: filter a raw request body down to `allow`.
pub fn sanitize(raw: &Value, allow: &FieldSpec) -> Value {
    Value::Object(pick(raw, allow))
}

/// Response shaper: serialize `record` and keep only `allow`'s fields.
pub fn project<T: Serialize>(record: &T, allow: &FieldSpec) -> Result<Value, serde_json::Error> {
    let value = serde_json::to_value(record)?;
    Ok(Value::Object(pick(&value, allow)))
}

/// Element-wise [`project`]; order preserved.
pub fn project_all<'a, T, I>(records: I, allow: &FieldSpec) -> Result<Vec<Value>, serde_json::Error>
where
    T: Serialize + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records.into_iter().map(|record| project(record, allow)).collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    const KEYS: &[&str] = &["id", "name", "email", "isAdmin", "role", "notes", "__proto__", "status"];

    fn leaked_spec(fields: Vec<&'static str>) -> FieldSpec {
        FieldSpec::new("generated", Box::leak(fields.into_boxed_slice()))
    }

    fn allow_list() -> impl Strategy<Value = FieldSpec> {
        prop::sample::subsequence(KEYS, 0..=KEYS.len()).prop_map(leaked_spec)
    }

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| serde_json::json!(n)),
            "[a-zA-Z0-9 ]{0,20}".prop_map(Value::String),
        ]
    }

    fn body() -> impl Strategy<Value = Value> {
        let key = prop_oneof![prop::sample::select(KEYS).prop_map(String::from), "[a-zA-Z_]{1,8}"];
        let nested = leaf().prop_recursive(2, 16, 4, |inner| {
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect()))
        });
        prop_oneof![
            4 => prop::collection::btree_map(key, nested, 0..10)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
            1 => leaf(),
        ]
    }

    proptest! {
        #[test]
        fn output_keys_are_allowed_and_present(raw in body(), allow in allow_list()) {
            let out = sanitize(&raw, &allow);
            let out = out.as_object().unwrap();
            for (key, value) in out {
                prop_assert!(allow.allows(key), "{key} is not allow-listed");
                prop_assert_eq!(Some(value), raw.get(key));
            }
            if let Some(source) = raw.as_object() {
                let expected: BTreeSet<_> = source.keys().filter(|k| allow.allows(k)).collect();
                let actual: BTreeSet<_> = out.keys().collect();
                prop_assert_eq!(actual, expected);
            }
        }

        #[test]
        fn sanitize_is_idempotent_for_any_body(raw in body(), allow in allow_list()) {
            let once = sanitize(&raw, &allow);
            prop_assert_eq!(sanitize(&once, &allow), once);
        }

        #[test]
        fn narrowing_the_allow_list_narrows_the_output(raw in body(), allow in allow_list()) {
            let wide = sanitize(&raw, &FieldSpec::new("all", KEYS));
            prop_assert_eq!(sanitize(&wide, &allow), sanitize(&raw, &allow));
        }
    }
}
