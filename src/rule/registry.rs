//! Name-based rule dispatch

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{BuiltinCall, BuiltinRule, Rule, RuleRef};

/// Custom rules by name, plus the lookup that enforces built-in precedence.
///
/// Cloning is cheap: rules are shared behind `Arc`.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    custom: IndexMap<String, Arc<dyn Rule>>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a custom rule, replacing any custom rule of the same name.
    ///
    /// A rule named after a built-in is stored but can never run, since the
    /// built-in always resolves first.
    pub fn register(&mut self, name: impl Into<String>, rule: impl Rule + 'static) {
        let name = name.into();
        if BuiltinRule::from_name(&name).is_some() {
            #[cfg(feature = "tracing")]
            tracing::warn!(rule = %name, "custom rule is shadowed by the built-in of the same name");
        }
        self.custom.insert(name, Arc::new(rule));
    }

    /// Remove a custom rule, returning whether one was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.custom.shift_remove(name).is_some()
    }

    /// The custom rule registered under `name`, ignoring built-ins.
    pub fn custom(&self, name: &str) -> Option<&dyn Rule> {
        self.custom.get(name).map(|rule| rule.as_ref())
    }

    /// Returns true if `name` dispatches to something.
    pub fn contains(&self, name: &str) -> bool {
        BuiltinRule::from_name(name).is_some() || self.custom.contains_key(name)
    }

    /// Names of the registered custom rules, in registration order.
    pub fn custom_names(&self) -> impl Iterator<Item = &str> {
        self.custom.keys().map(String::as_str)
    }

    /// Number of registered custom rules.
    pub fn len(&self) -> usize {
        self.custom.len()
    }

    /// Returns true if no custom rule is registered.
    pub fn is_empty(&self) -> bool {
        self.custom.is_empty()
    }

    /// Resolve a rule for execution.
    ///
    /// The bound built-in is used when present; the custom registry is only
    /// consulted without one. `None` means the name resolves to nothing.
    pub fn resolve<'a>(
        &'a self,
        name: &str,
        builtin: Option<&'a BuiltinCall>,
    ) -> Option<RuleRef<'a>> {
        match builtin {
            Some(call) => Some(RuleRef::Builtin(call)),
            None => self.custom(name).map(RuleRef::Custom),
        }
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}
