//! Field references
//!
//! A field key either names a check value directly (`email`) or addresses
//! one element of a sequence-valued field (`items[2]`). The key is parsed
//! once, when the rule table is built.

use std::fmt;

use crate::value::{CheckValues, Value, EMPTY};

/// A parsed field key.
///
/// # Example
///
/// ```rust
/// use sluice::{CheckValues, FieldRef, Value};
///
/// let mut values = CheckValues::new();
/// values.insert("items".to_string(), Value::from(vec!["a", "b", "c"]));
///
/// let field = FieldRef::parse("items[2]");
/// assert_eq!(field.resolve(&values), &Value::from("c"));
///
/// // Missing fields resolve to the empty string
/// assert_eq!(FieldRef::parse("missing").resolve(&values), &Value::from(""));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    key: String,
    indexed: Option<(String, usize)>,
}

impl FieldRef {
    /// Parse a field key, recognising a trailing `[<digits>]` suffix.
    ///
    /// The base must be non-empty and must not itself contain `[`.
    pub fn parse(key: impl Into<String>) -> Self {
        let key = key.into();
        let indexed = split_indexed(&key).map(|(base, index)| (base.to_string(), index));
        FieldRef { key, indexed }
    }

    /// The key as written in the rule table.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Base key and index, if the key has the indexed form.
    pub fn indexed(&self) -> Option<(&str, usize)> {
        self.indexed.as_ref().map(|(base, index)| (base.as_str(), *index))
    }

    /// Resolve the current value of this field.
    ///
    /// An exact key match wins. Otherwise an indexed key looks up the
    /// element of its base sequence. Anything else resolves to the empty
    /// string, so unresolved fields still validate instead of aborting.
    /// A `Null` counts as unset at every step.
    pub fn resolve<'v>(&self, values: &'v CheckValues) -> &'v Value {
        if let Some(value) = set(values.get(&self.key)) {
            return value;
        }
        self.indexed
            .as_ref()
            .and_then(|(base, index)| set(values.get(base)).and_then(|v| set(v.get(*index))))
            .unwrap_or(&EMPTY)
    }
}

fn set(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !matches!(v, Value::Null))
}

fn split_indexed(key: &str) -> Option<(&str, usize)> {
    let open = key.strip_suffix(']')?;
    let bracket = open.rfind('[')?;
    let (base, digits) = (&open[..bracket], &open[bracket + 1..]);
    if base.is_empty() || base.contains('[') {
        return None;
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|index| (base, index))
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl From<&str> for FieldRef {
    fn from(key: &str) -> Self {
        FieldRef::parse(key)
    }
}

impl From<String> for FieldRef {
    fn from(key: String) -> Self {
        FieldRef::parse(key)
    }
}
