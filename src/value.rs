//! Dynamic values checked by the validator
//!
//! Check values arrive as loosely-shaped data (form fields, decoded JSON
//! payloads), so they are represented by a small tagged [`Value`] type
//! rather than by Rust structs. Rule parameters use the same type.
//!
//! # Example
//!
//! ```rust
//! use sluice::Value;
//!
//! assert_eq!(Value::from("abc"), Value::Str("abc".to_string()));
//! assert_eq!(Value::from(vec![1, 2]), Value::List(vec![Value::Int(1), Value::Int(2)]));
//! assert!(Value::from("").is_empty());
//! assert_eq!(Value::from(" -1.5e3").as_number(), Some(-1500.0));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;

/// Values to validate, keyed by field name.
///
/// Order is preserved but irrelevant to validation; the rule table decides
/// the evaluation order.
pub type CheckValues = IndexMap<String, Value>;

static NUMERIC_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^\s*[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?\s*$").unwrap()
});

/// A dynamically-typed check value or rule parameter.
///
/// Equality is strict: `Int(1)`, `Float(1.0)` and `Str("1")` are three
/// different values.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    /// Absence of a value.
    #[default]
    Null,
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered sequence, addressable with indexed field keys.
    List(Vec<Value>),
}

/// The value an unresolvable field validates against.
pub(crate) static EMPTY: Value = Value::Str(String::new());

impl Value {
    /// Returns true for the empty string, the empty sequence and `Null`.
    ///
    /// Numeric zero and `false` are values, not absences, and are not empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Str(s) => s.is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => false,
        }
    }

    /// Numeric view of the value.
    ///
    /// Integers and floats convert directly. Strings convert when they read
    /// as an optionally signed decimal number with an optional exponent,
    /// surrounded by optional whitespace. Everything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if f.is_finite() => Some(*f),
            Value::Str(s) if NUMERIC_REGEX.is_match(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns true if [`as_number`](Self::as_number) succeeds.
    pub fn is_numeric(&self) -> bool {
        self.as_number().is_some()
    }

    /// Textual view used by character-based rules.
    ///
    /// Strings borrow, numbers format. Floats print with 14 significant
    /// digits and switch to `1.0E-7` style outside `1e-4..1e14`, so
    /// `0.1 + 0.2` reads as `0.3`. Sequences, booleans and `Null` have no
    /// text form.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Str(s) => Some(Cow::Borrowed(s)),
            Value::Int(i) => Some(Cow::Owned(i.to_string())),
            Value::Float(f) => Some(Cow::Owned(float_text(*f))),
            _ => None,
        }
    }

    /// The string slice, if this is a `Str`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is an `Int` or a string of decimal digits.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Str(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().ok()
            }
            _ => None,
        }
    }

    /// The element at `index`, if this is a `List` long enough.
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(index),
            _ => None,
        }
    }

    /// Short name of the variant, used in configuration error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
        }
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        return "NAN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "INF" } else { "-INF" }.to_string();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // 14 significant digits; the exponent is taken after rounding
    let sci = format!("{:.13e}", f);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return f.to_string();
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if !(-4..14).contains(&exp) {
        let mantissa = trim_fraction(mantissa);
        let dot = if mantissa.contains('.') { "" } else { ".0" };
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}{}E{}{}", mantissa, dot, sign, exp.abs())
    } else {
        let decimals = usize::try_from(13 - exp).unwrap_or(0);
        trim_fraction(&format!("{:.*}", decimals, f)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Value::List(iter.into_iter().map(Into::into).collect())
    }
}
