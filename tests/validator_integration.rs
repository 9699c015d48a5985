//! End-to-end validation scenarios

use sluice::{assert_invalid, assert_rule_failed, assert_valid};
use sluice::{ConfigError, Encoding, RuleInvocation, RuleTable, Validator, Value};

fn signup_rules(name_max: i64) -> RuleTable {
    RuleTable::new()
        .rule("name", "notEmpty", RuleInvocation::new("E1"))
        .and_then(|t| t.rule("name", "maxLength", RuleInvocation::new("E2").with_param(name_max)))
        .and_then(|t| t.rule("email_address", "email", RuleInvocation::new("E3")))
        .and_then(|t| {
            t.rule(
                "password",
                "betweenLength",
                RuleInvocation::new("E4").with_param(5).with_param(10),
            )
        })
        .unwrap()
}

fn signup_validator(name_max: i64) -> Validator {
    let mut validator = Validator::new();
    validator.set_check_values([
        ("name", "my name"),
        ("email_address", "test@example.com"),
        ("password", "1234567890"),
    ]);
    validator.set_rules(signup_rules(name_max));
    validator
}

#[test]
fn signup_passes_when_name_fits_inclusive_bound() {
    // "my name" is exactly seven characters
    let mut validator = signup_validator(7);
    assert_eq!(validator.validate(), Ok(true));
    assert_eq!(validator.error_count(), 0);
    assert_eq!(validator.error_message("name", "maxLength"), "");
}

#[test]
fn signup_reports_only_the_failing_rule() {
    let mut validator = signup_validator(6);
    assert_eq!(validator.validate(), Ok(false));
    assert_eq!(validator.error_message("name", "maxLength"), "E2");
    assert_eq!(validator.error_count(), 1);
    assert_eq!(validator.error_messages().len(), 1);
    assert!(validator.field_errors("password").is_empty());
}

#[test]
fn indexed_field_resolves_sequence_element() {
    let mut validator = Validator::new();
    validator.set_check_values([("items", vec!["a", "b", "c"])]);
    validator.set_rules(
        RuleTable::new()
            .rule("items[2]", "equal", RuleInvocation::new("not c").with_param("c"))
            .unwrap(),
    );
    assert_eq!(validator.validate(), Ok(true));
}

#[test]
fn error_message_tag_wraps_messages() {
    let mut validator = Validator::new();
    validator.set_error_message_tag("p", Some(r#"class="err""#));
    validator.set_check_values([("name", "")]);
    validator.set_rules(
        RuleTable::new()
            .rule("name", "notEmpty", RuleInvocation::new("Required"))
            .unwrap(),
    );

    assert_eq!(validator.validate(), Ok(false));
    assert_eq!(
        validator.error_message("name", "notEmpty"),
        r#"<p class="err">Required</p>"#
    );
}

#[test]
fn date_rule_is_calendar_correct() {
    let rules = RuleTable::new()
        .rule("birthday", "date", RuleInvocation::new("bad date"))
        .unwrap();
    let mut validator = Validator::new();
    validator.set_rules(rules);

    validator.set_check_values([("birthday", vec![2021, 2, 30])]);
    assert_eq!(validator.validate(), Ok(false));
    assert_eq!(validator.error_message("birthday", "date"), "bad date");

    validator.set_check_values([("birthday", vec![2020, 2, 29])]);
    assert_eq!(validator.validate(), Ok(true));

    validator.set_check_values([("birthday", "2021-02-30")]);
    assert_eq!(validator.validate(), Ok(false));

    validator.set_check_values([("birthday", "2020-02-29")]);
    assert_eq!(validator.validate(), Ok(true));
}

#[test]
fn twelve_hour_timestamps_validate() {
    let rules = RuleTable::new()
        .rule("sent", "date", RuleInvocation::new("bad time").with_param("Y-m-d g:i"))
        .unwrap();
    let mut validator = Validator::new();
    validator.set_rules(rules);

    validator.set_check_values([("sent", "2020-01-01 9:30")]);
    assert_eq!(validator.validate(), Ok(true));

    validator.set_check_values([("sent", "2020-01-01 g:30")]);
    assert_eq!(validator.validate(), Ok(false));
}

#[test]
fn unknown_date_token_is_a_config_error() {
    let err = RuleTable::new()
        .rule("sent", "date", RuleInvocation::new("bad").with_param("Y-m-d q"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidParams { ref rule, .. } if rule == "date"));
}

#[test]
fn errors_do_not_leak_between_runs() {
    let mut validator = signup_validator(6);
    assert_eq!(validator.validate(), Ok(false));
    assert_eq!(validator.error_count(), 1);

    validator.set_check_values([
        ("name", "me"),
        ("email_address", "test@example.com"),
        ("password", "1234567890"),
    ]);
    assert_eq!(validator.validate(), Ok(true));
    assert_eq!(validator.error_count(), 0);
    assert!(validator.error_messages().is_empty());
}

#[test]
fn custom_not_empty_never_overrides_builtin() {
    let mut validator = Validator::new();
    validator.set_custom_rule("notEmpty", |_: &Value, _: &[Value]| true);
    validator.set_check_values([("name", "")]);
    validator.set_rules(
        RuleTable::new()
            .rule("name", "notEmpty", RuleInvocation::new("E1"))
            .unwrap(),
    );

    let report = validator.check().unwrap();
    assert_rule_failed!(report, "name", "notEmpty", "E1");
}

#[test]
fn unknown_rule_fails_loudly_and_is_not_counted() {
    let mut validator = Validator::new();
    validator.set_rules(
        RuleTable::new()
            .rule("custom", "xxx", RuleInvocation::new("E7"))
            .unwrap(),
    );

    let err = validator.validate().unwrap_err();
    assert_eq!(
        err,
        ConfigError::UnknownRule {
            field: "custom".to_string(),
            rule: "xxx".to_string(),
        }
    );
    assert_eq!(validator.error_count(), 0);

    validator.set_custom_rule("xxx", |_: &Value, _: &[Value]| false);
    assert_eq!(validator.validate(), Ok(false));
    assert_eq!(validator.error_count(), 1);
}

#[test]
fn unresolved_fields_validate_as_empty() {
    let mut validator = Validator::new();
    validator.set_rules(
        RuleTable::new()
            .rule("missing", "notEmpty", RuleInvocation::new("required"))
            .and_then(|t| t.rule("missing", "maxLength", RuleInvocation::new("long").with_param(0)))
            .unwrap(),
    );

    let report = validator.check().unwrap();
    assert_eq!(report.count(), 1);
    assert_rule_failed!(report, "missing", "notEmpty", "required");
}

#[test]
fn null_field_validates_like_a_missing_one() {
    let rules = RuleTable::new()
        .rule("x", "maxLength", RuleInvocation::new("too long").with_param(5))
        .unwrap();
    let mut validator = Validator::new();
    validator.set_rules(rules);

    validator.set_check_values([("x", Value::Null)]);
    assert_eq!(validator.validate(), Ok(true));

    validator.set_check_values(Vec::<(String, Value)>::new());
    assert_eq!(validator.validate(), Ok(true));
}

#[test]
fn form_with_every_rule_kind() {
    let rules = RuleTable::new()
        .rule("code", "length", RuleInvocation::new("E").with_param(4))
        .and_then(|t| t.rule("nick", "minLength", RuleInvocation::new("E").with_param(2)))
        .and_then(|t| t.rule("nick", "alphaNumeric", RuleInvocation::new("E")))
        .and_then(|t| t.rule("first", "alpha", RuleInvocation::new("E")))
        .and_then(|t| t.rule("confirm", "equal", RuleInvocation::new("E").with_param("yes")))
        .and_then(|t| t.rule("age", "numeric", RuleInvocation::new("E")))
        .and_then(|t| t.rule("age", "minValue", RuleInvocation::new("E").with_param(18)))
        .and_then(|t| t.rule("age", "maxValue", RuleInvocation::new("E").with_param(130)))
        .and_then(|t| {
            t.rule(
                "score",
                "betweenValue",
                RuleInvocation::new("E").with_param(0.0).with_param(1.0),
            )
        })
        .and_then(|t| t.rule("site", "url", RuleInvocation::new("E")))
        .and_then(|t| t.rule("start", "date", RuleInvocation::new("E").with_param("d/m/Y")))
        .unwrap();

    let mut validator = Validator::new();
    validator.set_rules(rules);
    validator.set_check_values([
        ("code", Value::from("AB12")),
        ("nick", Value::from("ada99")),
        ("first", Value::from("Ada")),
        ("confirm", Value::from("yes")),
        ("age", Value::from("36")),
        ("score", Value::Float(0.75)),
        ("site", Value::from("https://example.com/profile?id=1")),
        ("start", Value::from("10/12/1815")),
    ]);
    assert_valid!(validator.check().unwrap());

    validator.set_check_values([
        ("code", Value::from("AB1")),
        ("nick", Value::from("a")),
        ("first", Value::from("Ada1")),
        ("confirm", Value::from("Yes")),
        ("age", Value::from("old")),
        ("score", Value::Int(2)),
        ("site", Value::from("gopher://example.com")),
        ("start", Value::from("31/04/1815")),
    ]);
    let report = validator.check().unwrap();
    assert_invalid!(report);
    // nick "a" is alphanumeric; age fails numeric, minValue and maxValue
    assert_eq!(report.count(), 10);
    assert_eq!(report.field("age").len(), 3);
}

#[test]
fn single_byte_encoding_counts_bytes() {
    let mut validator = Validator::new();
    validator.set_encoding("8bit".parse::<Encoding>().unwrap());
    validator.set_check_values([("name", "日本")]);
    validator.set_rules(
        RuleTable::new()
            .rule("name", "length", RuleInvocation::new("E").with_param(6))
            .unwrap(),
    );
    assert_eq!(validator.validate(), Ok(true));
}

#[test]
fn shared_validator_checks_from_many_threads() {
    let validator = signup_validator(6);
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let report = validator.check().unwrap();
                assert_eq!(report.count(), 1);
            });
        }
    });
}
