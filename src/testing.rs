//! Testing utilities for code that validates with Sluice
//!
//! Assertion macros over [`ErrorReport`](crate::ErrorReport)s, and
//! property-based testing support for [`Value`](crate::Value) behind the
//! `proptest` feature.
//!
//! # Examples
//!
//! ```rust
//! use sluice::{assert_invalid, assert_rule_failed, assert_valid};
//! use sluice::{RuleInvocation, RuleTable, Validator};
//!
//! let mut validator = Validator::new();
//! validator.set_rules(RuleTable::new().rule("name", "notEmpty", RuleInvocation::new("Required"))?);
//!
//! validator.set_check_values([("name", "Ada")]);
//! assert_valid!(validator.check()?);
//!
//! validator.set_check_values([("name", "")]);
//! let report = validator.check()?;
//! assert_invalid!(report);
//! assert_rule_failed!(report, "name", "notEmpty");
//! assert_rule_failed!(report, "name", "notEmpty", "Required");
//! # Ok::<(), sluice::ConfigError>(())
//! ```

/// Assert that a report has no failures.
///
/// # Example
///
/// ```rust
/// use sluice::{assert_valid, ErrorReport};
///
/// assert_valid!(ErrorReport::new());
/// ```
#[macro_export]
macro_rules! assert_valid {
    ($report:expr) => {{
        let report: &$crate::ErrorReport = &$report;
        if !report.is_valid() {
            panic!(
                "Expected valid report, got {} failure(s): {:?}",
                report.count(),
                report.messages()
            );
        }
    }};
}

/// Assert that a report has at least one failure.
#[macro_export]
macro_rules! assert_invalid {
    ($report:expr) => {{
        let report: &$crate::ErrorReport = &$report;
        if report.is_valid() {
            panic!("Expected invalid report, got no failures");
        }
    }};
}

/// Assert that a specific rule failed on a field, optionally with a
/// specific (templated) message.
#[macro_export]
macro_rules! assert_rule_failed {
    ($report:expr, $field:expr, $rule:expr) => {{
        let report: &$crate::ErrorReport = &$report;
        if !report.has_error($field, $rule) {
            panic!(
                "Expected rule `{}` to fail on field `{}`, recorded failures: {:?}",
                $rule,
                $field,
                report.messages()
            );
        }
    }};
    ($report:expr, $field:expr, $rule:expr, $message:expr) => {{
        let report: &$crate::ErrorReport = &$report;
        $crate::assert_rule_failed!(*report, $field, $rule);
        assert_eq!(report.message($field, $rule), $message);
    }};
}

#[cfg(feature = "proptest")]
use proptest::prelude::*;

#[cfg(feature = "proptest")]
impl Arbitrary for crate::Value {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use crate::Value;

        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int),
            (-1.0e9f64..1.0e9).prop_map(Value::Float),
            ".{0,12}".prop_map(Value::Str),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop::collection::vec(inner, 0..4).prop_map(Value::List)
        })
        .boxed()
    }
}
