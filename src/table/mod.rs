//! Rule tables
//!
//! A [`RuleTable`] maps field keys to rule names to [`RuleInvocation`]s,
//! preserving declaration order. Field keys are parsed into [`FieldRef`]s and
//! built-in parameters are bound as rules are inserted, so every error a
//! table can have is reported at construction time. The one exception is a
//! custom rule name, which can only be checked against the registry at
//! validation time.
//!
//! # Example
//!
//! ```rust
//! use sluice::{RuleInvocation, RuleTable};
//!
//! let rules = RuleTable::new()
//!     .rule("name", "notEmpty", RuleInvocation::new("Name is required"))?
//!     .rule("name", "maxLength", RuleInvocation::new("Name is too long").with_param(7))?
//!     .rule("password", "betweenLength", RuleInvocation::new("5 to 10 characters").with_param(5).with_param(10))?;
//!
//! assert_eq!(rules.len(), 2);
//! assert_eq!(rules.rule_count(), 3);
//!
//! // Malformed built-in parameters are rejected up front
//! assert!(RuleTable::new()
//!     .rule("name", "maxLength", RuleInvocation::new("too long"))
//!     .is_err());
//! # Ok::<(), sluice::ConfigError>(())
//! ```

#[cfg(feature = "serde")]
mod serde_impl;

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::field::FieldRef;
use crate::rule::{BuiltinCall, BuiltinRule};
use crate::value::Value;

/// Positional parameters plus the message to report when the rule fails.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleInvocation {
    params: Vec<Value>,
    message: String,
}

impl RuleInvocation {
    /// An invocation with no parameters.
    pub fn new(message: impl Into<String>) -> Self {
        RuleInvocation {
            params: Vec::new(),
            message: message.into(),
        }
    }

    /// Append a positional parameter.
    pub fn with_param(mut self, param: impl Into<Value>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Split a message-last list: `[param..., message]`.
    ///
    /// Returns `None` when the list is empty or its last element is not a
    /// string.
    ///
    /// ```rust
    /// use sluice::{RuleInvocation, Value};
    ///
    /// let inv = RuleInvocation::from_list(vec![Value::Int(7), Value::from("E2")]).unwrap();
    /// assert_eq!(inv.params(), &[Value::Int(7)]);
    /// assert_eq!(inv.message(), "E2");
    ///
    /// assert!(RuleInvocation::from_list(vec![]).is_none());
    /// assert!(RuleInvocation::from_list(vec![Value::Int(7)]).is_none());
    /// ```
    pub fn from_list(mut list: Vec<Value>) -> Option<Self> {
        match list.pop()? {
            Value::Str(message) => Some(RuleInvocation {
                params: list,
                message,
            }),
            _ => None,
        }
    }

    /// Back to the message-last list form.
    pub fn into_list(self) -> Vec<Value> {
        let mut list = self.params;
        list.push(Value::Str(self.message));
        list
    }

    /// Parameters passed after the subject value.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Message reported on failure, before templating.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A rule as stored in the table: name, invocation and, for built-ins,
/// the bound call.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundRule {
    name: String,
    invocation: RuleInvocation,
    builtin: Option<BuiltinCall>,
}

impl BoundRule {
    fn bind(field: &str, name: String, invocation: RuleInvocation) -> Result<Self, ConfigError> {
        let builtin = match BuiltinRule::from_name(&name) {
            Some(rule) => Some(rule.bind(invocation.params()).map_err(|source| {
                ConfigError::InvalidParams {
                    field: field.to_string(),
                    rule: name.clone(),
                    source,
                }
            })?),
            None => None,
        };
        Ok(BoundRule {
            name,
            invocation,
            builtin,
        })
    }

    /// Rule name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters and message.
    pub fn invocation(&self) -> &RuleInvocation {
        &self.invocation
    }

    /// The bound built-in, if the name is a built-in.
    pub fn builtin(&self) -> Option<&BuiltinCall> {
        self.builtin.as_ref()
    }
}

/// The rules declared for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRules {
    field: FieldRef,
    rules: IndexMap<String, BoundRule>,
}

impl FieldRules {
    /// The parsed field key.
    pub fn field(&self) -> &FieldRef {
        &self.field
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = &BoundRule> {
        self.rules.values()
    }

    /// The rule declared under `name`.
    pub fn get(&self, name: &str) -> Option<&BoundRule> {
        self.rules.get(name)
    }

    /// Number of rules on this field.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the field has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Ordered field → rule → invocation table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTable {
    fields: IndexMap<String, FieldRules>,
}

impl RuleTable {
    /// An empty table. Validating against it always passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a rule on a field.
    ///
    /// Redeclaring a rule name on the same field replaces the earlier
    /// invocation and keeps its position.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        invocation: RuleInvocation,
    ) -> Result<(), ConfigError> {
        let field = field.into();
        let bound = BoundRule::bind(&field, rule.into(), invocation)?;
        let entry = self
            .fields
            .entry(field)
            .or_insert_with_key(|key| FieldRules {
                field: FieldRef::parse(key.as_str()),
                rules: IndexMap::new(),
            });
        entry.rules.insert(bound.name.clone(), bound);
        Ok(())
    }

    /// Declare a rule from its message-last list form.
    pub fn insert_list(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        list: Vec<Value>,
    ) -> Result<(), ConfigError> {
        let (field, rule) = (field.into(), rule.into());
        match RuleInvocation::from_list(list) {
            Some(invocation) => self.insert(field, rule, invocation),
            None => Err(ConfigError::MissingMessage { field, rule }),
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn rule(
        mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        invocation: RuleInvocation,
    ) -> Result<Self, ConfigError> {
        self.insert(field, rule, invocation)?;
        Ok(self)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldRules> {
        self.fields.values()
    }

    /// The rules declared for `field`.
    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.fields.get(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field has rules.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of rules across all fields.
    pub fn rule_count(&self) -> usize {
        self.fields.values().map(FieldRules::len).sum()
    }
}
