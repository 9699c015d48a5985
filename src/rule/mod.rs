//! Rules: built-in predicates, custom predicates and the registry that
//! dispatches between them
//!
//! A rule is a predicate over a subject [`Value`] and the positional
//! parameters declared in the rule table. Built-in rules are fixed and
//! always win over a custom rule with the same name.
//!
//! # Example
//!
//! ```rust
//! use sluice::rule::{Rule, RuleRegistry};
//! use sluice::Value;
//!
//! let mut registry = RuleRegistry::new();
//! registry.register("oneOf", |value: &Value, params: &[Value]| params.contains(value));
//!
//! let rule = registry.custom("oneOf").unwrap();
//! assert!(rule.check(&Value::from("b"), &[Value::from("a"), Value::from("b")]));
//! assert!(!rule.check(&Value::from("c"), &[Value::from("a"), Value::from("b")]));
//! ```

mod builtin;
mod date;
mod registry;

use std::fmt;

use crate::encoding::Encoding;
use crate::value::Value;

pub use builtin::{BuiltinCall, BuiltinRule};
pub use date::{is_calendar_date, DateFormat, DEFAULT_DATE_FORMAT};
pub use registry::RuleRegistry;

/// A custom predicate, invoked with the subject value and the declared
/// parameters.
///
/// Implemented for every `Fn(&Value, &[Value]) -> bool + Send + Sync`, so
/// closures and plain functions register directly.
pub trait Rule: Send + Sync {
    /// Returns true when `value` passes.
    fn check(&self, value: &Value, params: &[Value]) -> bool;
}

// Blanket impl for closures
impl<F> Rule for F
where
    F: Fn(&Value, &[Value]) -> bool + Send + Sync,
{
    #[inline]
    fn check(&self, value: &Value, params: &[Value]) -> bool {
        self(value, params)
    }
}

/// A resolved rule: either a bound built-in or a registered custom rule.
#[derive(Clone, Copy)]
pub enum RuleRef<'a> {
    /// A built-in with its parameters already bound.
    Builtin(&'a BuiltinCall),
    /// A custom rule; receives the raw parameters.
    Custom(&'a dyn Rule),
}

impl RuleRef<'_> {
    /// Evaluate the rule.
    ///
    /// Built-ins ignore `params` because theirs were bound ahead of time.
    pub fn check(&self, value: &Value, params: &[Value], encoding: Encoding) -> bool {
        match self {
            RuleRef::Builtin(call) => call.check(value, encoding),
            RuleRef::Custom(rule) => rule.check(value, params),
        }
    }

    /// Returns true for the built-in variant.
    pub fn is_builtin(&self) -> bool {
        matches!(self, RuleRef::Builtin(_))
    }
}

impl fmt::Debug for RuleRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleRef::Builtin(call) => f.debug_tuple("Builtin").field(call).finish(),
            RuleRef::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
