//! The validation engine
//!
//! [`Validator`] owns the check values, the rule table, the custom rules
//! and the settings. Each run walks the table in declaration order,
//! resolves each field's value, dispatches every rule through the
//! [`RuleRegistry`] and records failures in a fresh [`ErrorReport`].
//!
//! # Example
//!
//! ```rust
//! use sluice::{RuleInvocation, RuleTable, Validator, Value};
//!
//! let mut validator = Validator::new();
//! validator.set_custom_rule("xxx", |_: &Value, _: &[Value]| true);
//! validator.set_check_values([
//!     ("name", Value::from("my name")),
//!     ("email_address", Value::from("test@example.com")),
//!     ("birthday", Value::from("")),
//!     ("custom", Value::from("xxx")),
//! ]);
//! validator.set_rules(
//!     RuleTable::new()
//!         .rule("name", "notEmpty", RuleInvocation::new("Error message 1"))?
//!         .rule("name", "maxLength", RuleInvocation::new("Error message 2").with_param(7))?
//!         .rule("email_address", "email", RuleInvocation::new("Error message 3"))?
//!         .rule("birthday", "date", RuleInvocation::new("Error message 5").with_param("Y/m/d"))?
//!         .rule("birthday", "notEmpty", RuleInvocation::new("Error message 6"))?
//!         .rule("custom", "xxx", RuleInvocation::new("Error message 7").with_param("arg_1"))?,
//! );
//!
//! assert!(!validator.validate()?);
//! assert_eq!(validator.error_count(), 2);
//! assert_eq!(validator.error_message("birthday", "date"), "Error message 5");
//! assert_eq!(validator.field_errors("birthday").len(), 2);
//! assert!(validator.field_errors("name").is_empty());
//! # Ok::<(), sluice::ConfigError>(())
//! ```

use crate::encoding::Encoding;
use crate::error::ConfigError;
use crate::report::{ErrorMap, ErrorReport, ErrorReporter, FieldErrors, MessageTemplate};
use crate::rule::{BuiltinRule, Rule, RuleRegistry};
use crate::table::RuleTable;
use crate::value::{CheckValues, Value};

/// Declarative field validator.
///
/// Configuration may be replaced between runs. [`validate`](Self::validate)
/// keeps the last report for the getters; [`check`](Self::check) only
/// returns it and can run through a shared reference.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    values: CheckValues,
    rules: RuleTable,
    registry: RuleRegistry,
    encoding: Encoding,
    template: Option<MessageTemplate>,
    report: ErrorReport,
}

impl Validator {
    /// A validator with UTF-8 length counting and no template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the encoding used by length rules.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Builder: set the message template.
    pub fn with_template(mut self, template: MessageTemplate) -> Self {
        self.template = Some(template);
        self
    }

    /// Replace the values to validate.
    pub fn set_check_values<I, K, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    /// Replace the rule table.
    pub fn set_rules(&mut self, rules: RuleTable) {
        self.rules = rules;
    }

    /// Set the encoding used by length rules.
    ///
    /// Parse names with [`str::parse`]: `"utf-8".parse::<Encoding>()?`.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// Wrap every message in an element, e.g. `<p class="err">...</p>`.
    pub fn set_error_message_tag(&mut self, tag: &str, attributes: Option<&str>) {
        self.template = Some(MessageTemplate::tag(tag, attributes));
    }

    /// Set or clear the message template.
    pub fn set_error_template(&mut self, template: Option<MessageTemplate>) {
        self.template = template;
    }

    /// Register a custom rule. Built-in names stay built-in.
    pub fn set_custom_rule(&mut self, name: impl Into<String>, rule: impl Rule + 'static) {
        self.registry.register(name, rule);
    }

    /// The values to validate.
    pub fn check_values(&self) -> &CheckValues {
        &self.values
    }

    /// The rule table.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// The custom rules.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// The encoding used by length rules.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// The message template, if any.
    pub fn template(&self) -> Option<&MessageTemplate> {
        self.template.as_ref()
    }

    /// Run every rule and return a fresh report.
    ///
    /// Does not touch the stored report. Fails only on configuration
    /// errors: a rule name with neither a built-in nor a custom
    /// implementation.
    pub fn check(&self) -> Result<ErrorReport, ConfigError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "validate",
            fields = self.rules.len(),
            rules = self.rules.rule_count()
        )
        .entered();

        let mut reporter = ErrorReporter::new(self.template.as_ref());

        for field in self.rules.fields() {
            let key = field.field().key();
            let value = field.field().resolve(&self.values);

            for bound in field.rules() {
                let rule = self
                    .registry
                    .resolve(bound.name(), bound.builtin())
                    .ok_or_else(|| ConfigError::UnknownRule {
                        field: key.to_string(),
                        rule: bound.name().to_string(),
                    })?;

                let invocation = bound.invocation();
                let passed = rule.check(value, invocation.params(), self.encoding);

                #[cfg(feature = "tracing")]
                tracing::trace!(
                    field = key,
                    rule = bound.name(),
                    builtin = rule.is_builtin(),
                    passed,
                    "rule evaluated"
                );

                if !passed {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(field = key, rule = bound.name(), "rule failed");
                    reporter.record(key, bound.name(), invocation.message());
                }
            }
        }

        let report = reporter.finish();

        #[cfg(feature = "tracing")]
        tracing::debug!(failures = report.count(), "validation finished");

        Ok(report)
    }

    /// Run every rule, keep the report, and return whether all passed.
    ///
    /// The previous report is discarded first, so a configuration error
    /// leaves an empty report behind rather than a stale one.
    pub fn validate(&mut self) -> Result<bool, ConfigError> {
        self.report = ErrorReport::new();
        self.report = self.check()?;
        Ok(self.report.is_valid())
    }

    /// The report from the last [`validate`](Self::validate).
    pub fn report(&self) -> &ErrorReport {
        &self.report
    }

    /// All messages from the last run, field → rule → message.
    pub fn error_messages(&self) -> &ErrorMap {
        self.report.messages()
    }

    /// Messages for one field from the last run; empty if none.
    pub fn field_errors(&self, field: &str) -> &FieldErrors {
        self.report.field(field)
    }

    /// One message from the last run, or `""`.
    pub fn error_message(&self, field: &str, rule: &str) -> &str {
        self.report.message(field, rule)
    }

    /// Number of failed rules in the last run.
    pub fn error_count(&self) -> usize {
        self.report.count()
    }

    /// Names of the built-in rules, in documentation order.
    pub fn rule_names() -> &'static [&'static str] {
        &BuiltinRule::NAMES
    }
}
