//! Serde support for rule tables (feature-gated)
//!
//! The wire shape is the nested, message-last form:
//!
//! ```json
//! {
//!   "name": { "notEmpty": ["Name is required"], "maxLength": [7, "Too long"] },
//!   "password": { "betweenLength": [5, 10, "5 to 10 characters"] }
//! }
//! ```
//!
//! Deserialization preserves declaration order and runs the same checks as
//! [`RuleTable::insert`], so a malformed table fails to deserialize.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{FieldRules, RuleTable};
use crate::value::Value;

type Wire = IndexMap<String, IndexMap<String, Vec<Value>>>;

impl Serialize for RuleTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, field) in &self.fields {
            map.serialize_entry(key, &WireField(field))?;
        }
        map.end()
    }
}

struct WireField<'a>(&'a FieldRules);

impl Serialize for WireField<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.rules.len()))?;
        for (name, rule) in &self.0.rules {
            map.serialize_entry(name, &rule.invocation.clone().into_list())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Wire::deserialize(deserializer)?;
        let mut table = RuleTable::new();
        for (field, rules) in wire {
            for (rule, list) in rules {
                table
                    .insert_list(field.clone(), rule, list)
                    .map_err(serde::de::Error::custom)?;
            }
        }
        Ok(table)
    }
}
