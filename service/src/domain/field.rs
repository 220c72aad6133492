//! Custom [`Fields`] of upstream entities.

use std::fmt;

use derive_more::{Deref, From, Into};
use serde::{
    de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_json::{Map, Number, Value};

/// Bag of custom fields (ACF fields or post-meta) of an upstream entity.
///
/// Upstream represents an empty bag either as `{}`, `[]`, `null` or `false`
/// depending on the entity type, so all of them deserialize into an empty
/// [`Fields`].
#[derive(Clone, Debug, Default, Deref, Eq, From, Into, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Indicates whether these [`Fields`] contain no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value of the field with the provided `key`.
    ///
    /// Missing fields are reported as [`Value::Null`].
    #[must_use]
    pub fn value(&self, key: &str) -> &Value {
        self.0.get(key).unwrap_or(&Value::Null)
    }

    /// Sets the field with the provided `key` to the provided `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        drop(self.0.insert(key.into(), value.into()));
    }

    /// Lists keys of these (submitted) [`Fields`], whose values don't match
    /// the `actual` ones under [`loosely_eq()`].
    #[must_use]
    pub fn mismatches<'s>(&'s self, actual: &Self) -> Vec<&'s str> {
        self.0
            .iter()
            .filter(|(k, v)| !loosely_eq(v, actual.value(k)))
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Returns a copy of these [`Fields`] with every key prefixed with the
    /// provided `prefix`.
    #[must_use]
    pub fn prefixed(&self, prefix: &str) -> Self {
        Self(
            self.0
                .iter()
                .map(|(k, v)| (format!("{prefix}{k}"), v.clone()))
                .collect(),
        )
    }
}

impl FromIterator<(String, Value)> for Fields {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        /// [`Visitor`] accepting every upstream shape of [`Fields`].
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object, an empty list, `null` or `false`")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Map::new();
                while let Some((k, v)) = map.next_entry::<String, Value>()? {
                    drop(fields.insert(k, v));
                }
                Ok(Fields(fields))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                if seq.next_element::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(1, &self));
                }
                Ok(Fields::default())
            }

            fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if v {
                    Err(E::invalid_value(de::Unexpected::Bool(v), &self))
                } else {
                    Ok(Fields::default())
                }
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Fields::default())
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Fields::default())
            }
        }

        deserializer.deserialize_any(FieldsVisitor)
    }
}

/// Compares a `submitted` field value with the `actual` one read back from
/// upstream, tolerating the representation drift upstream introduces.
///
/// - `null`, a missing value and `""` are all the same absence;
/// - numbers are compared by value (`42 == 42.0`);
/// - a number equals a string holding the same number (`42 == "42"`);
/// - lists and objects are compared element-wise by the same rules;
/// - anything else is compared strictly.
#[must_use]
pub fn loosely_eq(submitted: &Value, actual: &Value) -> bool {
    match (submitted, actual) {
        (a, b) if is_absent(a) || is_absent(b) => {
            is_absent(a) && is_absent(b)
        }
        (Value::Number(a), Value::Number(b)) => number_eq(a, b),
        (Value::Number(n), Value::String(s))
        | (Value::String(s), Value::Number(n)) => number_eq_str(n, s),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len()
                && a.iter().zip(b).all(|(a, b)| loosely_eq(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.keys()
                .chain(b.keys())
                .all(|k| loosely_eq(value_of(a, k), value_of(b, k)))
        }
        (a, b) => a == b,
    }
}

/// Checks whether the provided [`Value`] represents an absent value.
fn is_absent(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(_)
        | Value::Number(_)
        | Value::Array(_)
        | Value::Object(_) => false,
    }
}

/// Returns the [`Value`] under the provided `key`, or [`Value::Null`].
fn value_of<'m>(map: &'m Map<String, Value>, key: &str) -> &'m Value {
    map.get(key).unwrap_or(&Value::Null)
}

/// Compares [`Number`]s by value, regardless of their integer or float
/// representation (`42 == 42.0`).
fn number_eq(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => (a - b).abs() < f64::EPSILON,
        _ => false,
    }
}

/// Compares a [`Number`] with its possible string representation.
fn number_eq_str(n: &Number, s: &str) -> bool {
    let s = s.trim();
    if n.to_string() == s {
        return true;
    }
    match (n.as_f64(), s.parse::<f64>()) {
        (Some(n), Ok(s)) => (n - s).abs() < f64::EPSILON,
        _ => false,
    }
}

#[cfg(test)]
mod spec {
    use serde_json::{json, Value};

    use super::{loosely_eq, Fields};

    #[test]
    fn absence_is_equal() {
        assert!(loosely_eq(&Value::Null, &json!("")));
        assert!(loosely_eq(&json!(""), &Value::Null));
        assert!(loosely_eq(&Value::Null, &Value::Null));

        let empty = Fields::default();
        assert!(loosely_eq(empty.value("missing"), &Value::Null));
        assert!(loosely_eq(empty.value("missing"), &json!("")));
    }

    #[test]
    fn numbers_equal_their_strings() {
        assert!(loosely_eq(&json!(42), &json!("42")));
        assert!(loosely_eq(&json!("42"), &json!(42)));
        assert!(loosely_eq(&json!(4.5), &json!("4.5")));
        assert!(loosely_eq(&json!(42), &json!("42.0")));

        assert!(loosely_eq(&json!(42), &json!(42.0)));
        assert!(loosely_eq(&json!(42.0), &json!(42)));
        assert!(!loosely_eq(&json!(42), &json!(42.5)));

        assert!(!loosely_eq(&json!(42), &json!("43")));
        assert!(!loosely_eq(&json!(42), &json!("forty-two")));
    }

    #[test]
    fn distinct_values_differ() {
        assert!(!loosely_eq(&json!("a"), &json!("b")));
        assert!(!loosely_eq(&json!("a"), &Value::Null));
        assert!(!loosely_eq(&json!(0), &Value::Null));
        assert!(!loosely_eq(&json!(true), &json!(false)));
    }

    #[test]
    fn nested_values_compare_loosely() {
        assert!(loosely_eq(&json!([1, "2"]), &json!(["1", 2])));
        assert!(!loosely_eq(&json!([1, 2]), &json!([1])));
        assert!(loosely_eq(
            &json!({"price": 10, "note": null}),
            &json!({"price": "10", "note": ""}),
        ));
        assert!(loosely_eq(&json!({"note": null}), &json!({})));
        assert!(!loosely_eq(&json!({"price": 10}), &json!({"price": 11})));
    }

    #[test]
    fn lists_mismatched_keys() {
        let submitted: Fields = serde_json::from_value(json!({
            "price": 42,
            "brand": "Neumann",
            "note": null,
        }))
        .unwrap();
        let actual: Fields = serde_json::from_value(json!({
            "price": "42",
            "brand": "AKG",
        }))
        .unwrap();

        assert_eq!(submitted.mismatches(&actual), vec!["brand"]);
        assert!(submitted.mismatches(&submitted).is_empty());
    }

    #[test]
    fn deserializes_every_empty_shape() {
        for empty in [json!([]), json!(null), json!(false), json!({})] {
            assert_eq!(
                serde_json::from_value::<Fields>(empty).unwrap(),
                Fields::default(),
            );
        }
        assert!(serde_json::from_value::<Fields>(json!([1])).is_err());
        assert!(serde_json::from_value::<Fields>(json!(true)).is_err());
    }

    #[test]
    fn prefixes_keys() {
        let fields: Fields =
            serde_json::from_value(json!({"price": 42})).unwrap();

        assert_eq!(
            serde_json::to_value(fields.prefixed("acf_")).unwrap(),
            json!({"acf_price": 42}),
        );
    }
}
