//! Built-in rules
//!
//! Every built-in is a pure function of the subject value, its declared
//! parameters and the configured [`Encoding`]. Parameters are bound into a
//! typed [`BuiltinCall`] when the rule table is built, so a malformed
//! table is rejected before any value is checked.

use std::sync::LazyLock;

use crate::encoding::Encoding;
use crate::error::ParamError;
use crate::value::Value;

use super::date::{DateFormat, DEFAULT_DATE_FORMAT};

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap()
});

static URL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^(?:https?|ftp)://[-_.!~*'()a-zA-Z0-9;/?:@&=+$,%#]+$").unwrap()
});

/// Names of the built-in rules.
///
/// A built-in always shadows a custom rule registered under the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinRule {
    /// `length(n)`: character count equals `n`.
    Length,
    /// `minLength(n)`: character count is at least `n`.
    MinLength,
    /// `maxLength(n)`: character count is at most `n`.
    MaxLength,
    /// `betweenLength(min, max)`: `minLength(min)` and `maxLength(max)`.
    BetweenLength,
    /// `equal(other)`: strict equality, type included.
    Equal,
    /// `minValue(n)`: numeric and at least `n`.
    MinValue,
    /// `maxValue(n)`: numeric and at most `n`.
    MaxValue,
    /// `betweenValue(min, max)`: numeric and within `[min, max]`.
    BetweenValue,
    /// `notEmpty`: anything but `""`, `[]` and null.
    NotEmpty,
    /// `alpha`: non-empty, ASCII letters `[A-Za-z]` only.
    Alpha,
    /// `alphaNumeric`: non-empty, ASCII letters and digits only.
    AlphaNumeric,
    /// `numeric`: reads as an optionally signed integer or float.
    Numeric,
    /// `email`: pragmatic RFC 5322 address.
    Email,
    /// `url`: `http`, `https` or `ftp` URL.
    Url,
    /// `date([format])`: a real calendar date.
    Date,
}

impl BuiltinRule {
    /// All built-ins in their documented order.
    pub const ALL: [BuiltinRule; 15] = [
        BuiltinRule::Length,
        BuiltinRule::MinLength,
        BuiltinRule::MaxLength,
        BuiltinRule::BetweenLength,
        BuiltinRule::Equal,
        BuiltinRule::MinValue,
        BuiltinRule::MaxValue,
        BuiltinRule::BetweenValue,
        BuiltinRule::NotEmpty,
        BuiltinRule::Alpha,
        BuiltinRule::AlphaNumeric,
        BuiltinRule::Numeric,
        BuiltinRule::Email,
        BuiltinRule::Url,
        BuiltinRule::Date,
    ];

    /// Rule names as they appear in rule tables, in [`ALL`](Self::ALL) order.
    pub const NAMES: [&'static str; 15] = [
        "length",
        "minLength",
        "maxLength",
        "betweenLength",
        "equal",
        "minValue",
        "maxValue",
        "betweenValue",
        "notEmpty",
        "alpha",
        "alphaNumeric",
        "numeric",
        "email",
        "url",
        "date",
    ];

    /// The rule-table name of this built-in.
    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// Look up a built-in by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
    }

    /// Bind declared parameters, checking arity and types.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sluice::{BuiltinCall, BuiltinRule, Value};
    ///
    /// let call = BuiltinRule::MaxLength.bind(&[Value::Int(7)]).unwrap();
    /// assert_eq!(call, BuiltinCall::MaxLength(7));
    ///
    /// assert!(BuiltinRule::MaxLength.bind(&[Value::from("seven")]).is_err());
    /// assert!(BuiltinRule::Email.bind(&[Value::Int(1)]).is_err());
    /// ```
    pub fn bind(self, params: &[Value]) -> Result<BuiltinCall, ParamError> {
        let call = match self {
            BuiltinRule::Length => {
                arity(params, 1, "1")?;
                BuiltinCall::Length(length_param(params, 0)?)
            }
            BuiltinRule::MinLength => {
                arity(params, 1, "1")?;
                BuiltinCall::MinLength(length_param(params, 0)?)
            }
            BuiltinRule::MaxLength => {
                arity(params, 1, "1")?;
                BuiltinCall::MaxLength(length_param(params, 0)?)
            }
            BuiltinRule::BetweenLength => {
                arity(params, 2, "2")?;
                let (min, max) = (length_param(params, 0)?, length_param(params, 1)?);
                if min > max {
                    return Err(ParamError::invalid(
                        1,
                        format!("maximum {} is below minimum {}", max, min),
                    ));
                }
                BuiltinCall::BetweenLength { min, max }
            }
            BuiltinRule::Equal => {
                arity(params, 1, "1")?;
                BuiltinCall::Equal(params[0].clone())
            }
            BuiltinRule::MinValue => {
                arity(params, 1, "1")?;
                BuiltinCall::MinValue(number_param(params, 0)?)
            }
            BuiltinRule::MaxValue => {
                arity(params, 1, "1")?;
                BuiltinCall::MaxValue(number_param(params, 0)?)
            }
            BuiltinRule::BetweenValue => {
                arity(params, 2, "2")?;
                let (min, max) = (number_param(params, 0)?, number_param(params, 1)?);
                if min > max {
                    return Err(ParamError::invalid(
                        1,
                        format!("maximum {} is below minimum {}", max, min),
                    ));
                }
                BuiltinCall::BetweenValue { min, max }
            }
            BuiltinRule::NotEmpty => unary(params, BuiltinCall::NotEmpty)?,
            BuiltinRule::Alpha => unary(params, BuiltinCall::Alpha)?,
            BuiltinRule::AlphaNumeric => unary(params, BuiltinCall::AlphaNumeric)?,
            BuiltinRule::Numeric => unary(params, BuiltinCall::Numeric)?,
            BuiltinRule::Email => unary(params, BuiltinCall::Email)?,
            BuiltinRule::Url => unary(params, BuiltinCall::Url)?,
            BuiltinRule::Date => {
                let format = match params {
                    [] => DEFAULT_DATE_FORMAT,
                    [Value::Str(format)] => format.as_str(),
                    [other] => {
                        return Err(ParamError::invalid(
                            0,
                            format!("date format must be a string, got {}", other.kind()),
                        ))
                    }
                    _ => {
                        return Err(ParamError::Arity {
                            expected: "0 or 1",
                            got: params.len(),
                        })
                    }
                };
                let format = DateFormat::parse(format).map_err(|e| ParamError::invalid(0, e))?;
                BuiltinCall::Date(format)
            }
        };
        Ok(call)
    }
}

fn arity(params: &[Value], expected: usize, label: &'static str) -> Result<(), ParamError> {
    if params.len() == expected {
        Ok(())
    } else {
        Err(ParamError::Arity {
            expected: label,
            got: params.len(),
        })
    }
}

fn unary(params: &[Value], call: BuiltinCall) -> Result<BuiltinCall, ParamError> {
    arity(params, 0, "0").map(|()| call)
}

fn length_param(params: &[Value], index: usize) -> Result<usize, ParamError> {
    match &params[index] {
        Value::Int(n) => usize::try_from(*n).map_err(|_| {
            ParamError::invalid(index, format!("length must not be negative, got {}", n))
        }),
        other => Err(ParamError::invalid(
            index,
            format!("length must be an integer, got {}", other.kind()),
        )),
    }
}

fn number_param(params: &[Value], index: usize) -> Result<f64, ParamError> {
    params[index].as_number().ok_or_else(|| {
        ParamError::invalid(index, format!("bound must be numeric, got {}", params[index]))
    })
}

/// A built-in rule with its parameters bound.
#[derive(Debug, Clone, PartialEq)]
pub enum BuiltinCall {
    /// See [`BuiltinRule::Length`].
    Length(usize),
    /// See [`BuiltinRule::MinLength`].
    MinLength(usize),
    /// See [`BuiltinRule::MaxLength`].
    MaxLength(usize),
    /// See [`BuiltinRule::BetweenLength`].
    BetweenLength {
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },
    /// See [`BuiltinRule::Equal`].
    Equal(Value),
    /// See [`BuiltinRule::MinValue`].
    MinValue(f64),
    /// See [`BuiltinRule::MaxValue`].
    MaxValue(f64),
    /// See [`BuiltinRule::BetweenValue`].
    BetweenValue {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// See [`BuiltinRule::NotEmpty`].
    NotEmpty,
    /// See [`BuiltinRule::Alpha`].
    Alpha,
    /// See [`BuiltinRule::AlphaNumeric`].
    AlphaNumeric,
    /// See [`BuiltinRule::Numeric`].
    Numeric,
    /// See [`BuiltinRule::Email`].
    Email,
    /// See [`BuiltinRule::Url`].
    Url,
    /// See [`BuiltinRule::Date`].
    Date(DateFormat),
}

impl BuiltinCall {
    /// Which built-in this call binds.
    pub fn rule(&self) -> BuiltinRule {
        match self {
            BuiltinCall::Length(_) => BuiltinRule::Length,
            BuiltinCall::MinLength(_) => BuiltinRule::MinLength,
            BuiltinCall::MaxLength(_) => BuiltinRule::MaxLength,
            BuiltinCall::BetweenLength { .. } => BuiltinRule::BetweenLength,
            BuiltinCall::Equal(_) => BuiltinRule::Equal,
            BuiltinCall::MinValue(_) => BuiltinRule::MinValue,
            BuiltinCall::MaxValue(_) => BuiltinRule::MaxValue,
            BuiltinCall::BetweenValue { .. } => BuiltinRule::BetweenValue,
            BuiltinCall::NotEmpty => BuiltinRule::NotEmpty,
            BuiltinCall::Alpha => BuiltinRule::Alpha,
            BuiltinCall::AlphaNumeric => BuiltinRule::AlphaNumeric,
            BuiltinCall::Numeric => BuiltinRule::Numeric,
            BuiltinCall::Email => BuiltinRule::Email,
            BuiltinCall::Url => BuiltinRule::Url,
            BuiltinCall::Date(_) => BuiltinRule::Date,
        }
    }

    /// Evaluate the rule against a value.
    pub fn check(&self, value: &Value, encoding: Encoding) -> bool {
        match self {
            BuiltinCall::Length(n) => char_count(value, encoding) == Some(*n),
            BuiltinCall::MinLength(n) => min_length(value, *n, encoding),
            BuiltinCall::MaxLength(n) => max_length(value, *n, encoding),
            BuiltinCall::BetweenLength { min, max } => {
                min_length(value, *min, encoding) && max_length(value, *max, encoding)
            }
            BuiltinCall::Equal(other) => value == other,
            BuiltinCall::MinValue(n) => value.as_number().is_some_and(|v| v >= *n),
            BuiltinCall::MaxValue(n) => value.as_number().is_some_and(|v| v <= *n),
            BuiltinCall::BetweenValue { min, max } => value
                .as_number()
                .is_some_and(|v| v >= *min && v <= *max),
            BuiltinCall::NotEmpty => !value.is_empty(),
            BuiltinCall::Alpha => all_chars(value, char::is_ascii_alphabetic),
            BuiltinCall::AlphaNumeric => all_chars(value, char::is_ascii_alphanumeric),
            BuiltinCall::Numeric => value.is_numeric(),
            BuiltinCall::Email => value.as_text().is_some_and(|s| EMAIL_REGEX.is_match(&s)),
            BuiltinCall::Url => value.as_text().is_some_and(|s| URL_REGEX.is_match(&s)),
            BuiltinCall::Date(format) => format.check(value),
        }
    }
}

fn char_count(value: &Value, encoding: Encoding) -> Option<usize> {
    value.as_text().map(|s| encoding.count(&s))
}

fn min_length(value: &Value, min: usize, encoding: Encoding) -> bool {
    char_count(value, encoding).is_some_and(|len| len >= min)
}

fn max_length(value: &Value, max: usize, encoding: Encoding) -> bool {
    char_count(value, encoding).is_some_and(|len| len <= max)
}

// empty text fails: there is no character to satisfy the class
fn all_chars(value: &Value, class: fn(&char) -> bool) -> bool {
    value
        .as_text()
        .is_some_and(|s| !s.is_empty() && s.chars().all(|c| class(&c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(rule: BuiltinRule, params: &[Value]) -> BuiltinCall {
        rule.bind(params).unwrap()
    }

    fn check(rule: BuiltinRule, params: &[Value], value: impl Into<Value>) -> bool {
        call(rule, params).check(&value.into(), Encoding::Unicode)
    }

    #[test]
    fn test_names_round_trip() {
        for rule in BuiltinRule::ALL {
            assert_eq!(BuiltinRule::from_name(rule.name()), Some(rule));
        }
        assert_eq!(BuiltinRule::from_name("NotEmpty"), None);
        assert_eq!(BuiltinRule::from_name("xxx"), None);
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(check(BuiltinRule::Length, &[Value::Int(5)], "héllo"));
        assert!(!check(BuiltinRule::Length, &[Value::Int(6)], "héllo"));
        assert!(call(BuiltinRule::Length, &[Value::Int(6)])
            .check(&Value::from("héllo"), Encoding::SingleByte));
        assert!(check(BuiltinRule::Length, &[Value::Int(3)], 123));
        assert!(!check(BuiltinRule::Length, &[Value::Int(0)], vec!["a"]));
    }

    #[test]
    fn test_min_max_length() {
        assert!(check(BuiltinRule::MinLength, &[Value::Int(3)], "abc"));
        assert!(!check(BuiltinRule::MinLength, &[Value::Int(3)], "ab"));
        assert!(check(BuiltinRule::MaxLength, &[Value::Int(7)], "my name"));
        assert!(!check(BuiltinRule::MaxLength, &[Value::Int(6)], "my name"));
        assert!(check(BuiltinRule::MaxLength, &[Value::Int(0)], ""));
    }

    #[test]
    fn test_length_of_floats_counts_rounded_text() {
        assert!(check(BuiltinRule::Length, &[Value::Int(3)], 0.1 + 0.2));
        assert!(check(BuiltinRule::Length, &[Value::Int(6)], 1e-7));
        assert!(check(BuiltinRule::MaxLength, &[Value::Int(3)], 1.5));
    }

    #[test]
    fn test_between_length() {
        let params = [Value::Int(5), Value::Int(10)];
        assert!(check(BuiltinRule::BetweenLength, &params, "1234567890"));
        assert!(check(BuiltinRule::BetweenLength, &params, "12345"));
        assert!(!check(BuiltinRule::BetweenLength, &params, "1234"));
        assert!(!check(BuiltinRule::BetweenLength, &params, "12345678901"));
    }

    #[test]
    fn test_equal_is_strict() {
        assert!(check(BuiltinRule::Equal, &[Value::from("abc")], "abc"));
        assert!(!check(BuiltinRule::Equal, &[Value::from("1")], 1));
        assert!(!check(BuiltinRule::Equal, &[Value::Float(1.0)], 1));
        assert!(check(BuiltinRule::Equal, &[Value::Int(1)], 1));
    }

    #[test]
    fn test_value_bounds() {
        assert!(check(BuiltinRule::MinValue, &[Value::Int(18)], 18));
        assert!(check(BuiltinRule::MinValue, &[Value::Int(18)], "18.5"));
        assert!(!check(BuiltinRule::MinValue, &[Value::Int(18)], 17));
        assert!(check(BuiltinRule::MaxValue, &[Value::Float(1.5)], "-3"));
        assert!(!check(BuiltinRule::MaxValue, &[Value::Float(1.5)], 2));
        let params = [Value::Int(1), Value::Int(10)];
        assert!(check(BuiltinRule::BetweenValue, &params, 1));
        assert!(check(BuiltinRule::BetweenValue, &params, 10.0));
        assert!(!check(BuiltinRule::BetweenValue, &params, 10.5));
    }

    #[test]
    fn test_value_bounds_reject_non_numeric() {
        assert!(!check(BuiltinRule::MinValue, &[Value::Int(-100)], "abc"));
        assert!(!check(BuiltinRule::MaxValue, &[Value::Int(100)], ""));
        assert!(!check(BuiltinRule::MaxValue, &[Value::Int(100)], Value::Null));
        assert!(!check(
            BuiltinRule::BetweenValue,
            &[Value::Int(0), Value::Int(100)],
            vec![1]
        ));
    }

    #[test]
    fn test_not_empty() {
        assert!(check(BuiltinRule::NotEmpty, &[], "x"));
        assert!(check(BuiltinRule::NotEmpty, &[], 0));
        assert!(!check(BuiltinRule::NotEmpty, &[], ""));
        assert!(!check(BuiltinRule::NotEmpty, &[], Value::List(vec![])));
        assert!(!check(BuiltinRule::NotEmpty, &[], Value::Null));
    }

    #[test]
    fn test_alpha_and_alphanumeric() {
        assert!(check(BuiltinRule::Alpha, &[], "hello"));
        assert!(check(BuiltinRule::Alpha, &[], "HeLLo"));
        assert!(!check(BuiltinRule::Alpha, &[], "héllo"));
        assert!(!check(BuiltinRule::Alpha, &[], "Ωmega"));
        assert!(!check(BuiltinRule::Alpha, &[], "hello1"));
        assert!(!check(BuiltinRule::Alpha, &[], "hello world"));
        assert!(!check(BuiltinRule::Alpha, &[], ""));
        assert!(check(BuiltinRule::AlphaNumeric, &[], "abc123"));
        assert!(check(BuiltinRule::AlphaNumeric, &[], 123));
        assert!(!check(BuiltinRule::AlphaNumeric, &[], "abc_123"));
        assert!(!check(BuiltinRule::AlphaNumeric, &[], "x²"));
        assert!(!check(BuiltinRule::AlphaNumeric, &[], "١٢٣"));
        assert!(!check(BuiltinRule::AlphaNumeric, &[], ""));
    }

    #[test]
    fn test_numeric() {
        assert!(check(BuiltinRule::Numeric, &[], "-12.5"));
        assert!(check(BuiltinRule::Numeric, &[], 7));
        assert!(!check(BuiltinRule::Numeric, &[], "12a"));
        assert!(!check(BuiltinRule::Numeric, &[], ""));
    }

    #[test]
    fn test_email() {
        assert!(check(BuiltinRule::Email, &[], "test@example.com"));
        assert!(check(BuiltinRule::Email, &[], "first.last+tag@sub.example.co"));
        assert!(check(BuiltinRule::Email, &[], "user@localhost"));
        assert!(!check(BuiltinRule::Email, &[], "test@-example.com"));
        assert!(!check(BuiltinRule::Email, &[], "test@example-.com"));
        assert!(!check(BuiltinRule::Email, &[], "test.example.com"));
        assert!(!check(BuiltinRule::Email, &[], "a b@example.com"));
        assert!(!check(BuiltinRule::Email, &[], ""));
    }

    #[test]
    fn test_url() {
        assert!(check(BuiltinRule::Url, &[], "http://example.com"));
        assert!(check(BuiltinRule::Url, &[], "https://example.com/a?b=c&d=e#frag"));
        assert!(check(BuiltinRule::Url, &[], "ftp://files.example.com/pub"));
        assert!(!check(BuiltinRule::Url, &[], "mailto:user@example.com"));
        assert!(!check(BuiltinRule::Url, &[], "https://"));
        assert!(!check(BuiltinRule::Url, &[], "https://exa mple.com"));
        assert!(!check(BuiltinRule::Url, &[], "xhttp://example.com"));
    }

    #[test]
    fn test_date() {
        assert!(check(BuiltinRule::Date, &[], vec![2020, 2, 29]));
        assert!(!check(BuiltinRule::Date, &[], vec![2021, 2, 30]));
        assert!(check(BuiltinRule::Date, &[], "2020-02-29"));
        let slashed = [Value::from("Y/m/d")];
        assert!(check(BuiltinRule::Date, &slashed, "2020/02/29"));
        assert!(!check(BuiltinRule::Date, &slashed, "2021/02/30"));
        assert!(!check(BuiltinRule::Date, &slashed, ""));
    }

    #[test]
    fn test_bind_arity() {
        assert_eq!(
            BuiltinRule::BetweenLength.bind(&[Value::Int(1)]),
            Err(ParamError::Arity {
                expected: "2",
                got: 1
            })
        );
        assert_eq!(
            BuiltinRule::NotEmpty.bind(&[Value::Int(1)]),
            Err(ParamError::Arity {
                expected: "0",
                got: 1
            })
        );
        assert!(matches!(
            BuiltinRule::Date.bind(&[Value::from("Y"), Value::from("m")]),
            Err(ParamError::Arity { expected: "0 or 1", got: 2 })
        ));
    }

    #[test]
    fn test_bind_types() {
        assert!(BuiltinRule::Length.bind(&[Value::Int(-1)]).is_err());
        assert!(BuiltinRule::Length.bind(&[Value::Float(2.0)]).is_err());
        assert!(BuiltinRule::MinValue.bind(&[Value::from("ten")]).is_err());
        assert_eq!(
            BuiltinRule::MinValue.bind(&[Value::from("10")]),
            Ok(BuiltinCall::MinValue(10.0))
        );
        assert!(BuiltinRule::Date.bind(&[Value::Int(1)]).is_err());
        assert!(BuiltinRule::Date.bind(&[Value::from("m/d")]).is_err());
    }

    #[test]
    fn test_bind_rejects_inverted_bounds() {
        assert_eq!(
            BuiltinRule::BetweenLength.bind(&[Value::Int(10), Value::Int(5)]),
            Err(ParamError::invalid(1, "maximum 5 is below minimum 10"))
        );
        assert!(BuiltinRule::BetweenValue
            .bind(&[Value::Int(3), Value::Int(2)])
            .is_err());
        assert!(BuiltinRule::BetweenValue
            .bind(&[Value::Int(2), Value::Int(2)])
            .is_ok());
    }

    #[test]
    fn test_call_reports_its_rule() {
        for rule in [BuiltinRule::NotEmpty, BuiltinRule::Email, BuiltinRule::Date] {
            assert_eq!(call(rule, &[]).rule(), rule);
        }
    }
}
