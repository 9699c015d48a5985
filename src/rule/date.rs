//! Calendar-correct date checking
//!
//! A format string only says how to split a string into components. The
//! components are then checked against the calendar, so `2021/02/30`
//! fails even though it has the right shape.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime};
use regex::Regex;

use crate::value::Value;

/// Format used by `date` when the rule declares no parameter.
pub const DEFAULT_DATE_FORMAT: &str = "Y-m-d";

const YEARS: std::ops::RangeInclusive<i64> = 1000..=9999;

/// A compiled date format.
///
/// | token | meaning                        |
/// |-------|--------------------------------|
/// | `Y`   | 4-digit year                   |
/// | `y`   | 2-digit year (`70`–`99` → 19xx) |
/// | `m`   | 2-digit month                  |
/// | `n`   | 1–2 digit month                |
/// | `d`   | 2-digit day                    |
/// | `j`   | 1–2 digit day                  |
/// | `w`   | weekday, `0` (Sunday)–`6`      |
/// | `H`   | 2-digit hour (0–23)            |
/// | `G`   | 1–2 digit hour (0–23)          |
/// | `h`   | 2-digit hour (01–12)           |
/// | `g`   | 1–2 digit hour (1–12)          |
/// | `i`   | 2-digit minute                 |
/// | `s`   | 2-digit second                 |
///
/// `\` escapes the next character. Other ASCII letters are rejected so a
/// misspelt token cannot silently become a literal; every remaining
/// character is literal.
///
/// # Example
///
/// ```rust
/// use sluice::{DateFormat, Value};
///
/// let format = DateFormat::parse("Y/m/d").unwrap();
/// assert!(format.check(&Value::from("2020/02/29")));
/// assert!(!format.check(&Value::from("2021/02/30")));
/// assert!(!format.check(&Value::from("2021-02-03")));
///
/// let stamp = DateFormat::parse("Y-m-d g:i").unwrap();
/// assert!(stamp.check(&Value::from("2020-01-01 9:30")));
/// assert!(!stamp.check(&Value::from("2020-01-01 13:30")));
/// ```
#[derive(Clone)]
pub struct DateFormat {
    source: String,
    pattern: Regex,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Component {
    Year,
    ShortYear,
    Month,
    Day,
    Weekday,
    Hour,
    Hour12,
    Minute,
    Second,
}

impl Component {
    fn group(self) -> &'static str {
        match self {
            Component::Year => "year",
            Component::ShortYear => "short_year",
            Component::Month => "month",
            Component::Day => "day",
            Component::Weekday => "weekday",
            Component::Hour => "hour",
            Component::Hour12 => "hour12",
            Component::Minute => "minute",
            Component::Second => "second",
        }
    }

    /// Tokens sharing a slot cannot appear together.
    fn slot(self) -> &'static str {
        match self {
            Component::Year | Component::ShortYear => "year",
            Component::Hour | Component::Hour12 => "hour",
            other => other.group(),
        }
    }
}

fn token(c: char) -> Option<(Component, &'static str)> {
    match c {
        'Y' => Some((Component::Year, "[0-9]{4}")),
        'y' => Some((Component::ShortYear, "[0-9]{2}")),
        'm' => Some((Component::Month, "[0-9]{2}")),
        'n' => Some((Component::Month, "[0-9]{1,2}")),
        'd' => Some((Component::Day, "[0-9]{2}")),
        'j' => Some((Component::Day, "[0-9]{1,2}")),
        'w' => Some((Component::Weekday, "[0-9]")),
        'H' => Some((Component::Hour, "[0-9]{2}")),
        'G' => Some((Component::Hour, "[0-9]{1,2}")),
        'h' => Some((Component::Hour12, "[0-9]{2}")),
        'g' => Some((Component::Hour12, "[0-9]{1,2}")),
        'i' => Some((Component::Minute, "[0-9]{2}")),
        's' => Some((Component::Second, "[0-9]{2}")),
        _ => None,
    }
}

impl DateFormat {
    /// Compile a format string.
    ///
    /// Fails when a component appears twice, when year, month or day is
    /// missing, on an unescaped ASCII letter that is not a token, or when
    /// the format ends in a lone `\`.
    pub fn parse(format: &str) -> Result<Self, String> {
        let mut pattern = String::from("^");
        let mut seen: Vec<Component> = Vec::new();
        let mut chars = format.chars();
        let mut buf = [0u8; 4];

        while let Some(c) = chars.next() {
            if c == '\\' {
                let escaped = chars
                    .next()
                    .ok_or_else(|| format!("date format `{}` ends with a lone `\\`", format))?;
                pattern.push_str(&regex::escape(escaped.encode_utf8(&mut buf)));
                continue;
            }
            match token(c) {
                Some((component, digits)) => {
                    if seen.iter().any(|s| s.slot() == component.slot()) {
                        return Err(format!(
                            "date format `{}` has more than one {} token",
                            format,
                            component.slot()
                        ));
                    }
                    seen.push(component);
                    pattern.push_str(&format!("(?P<{}>{})", component.group(), digits));
                }
                None if c.is_ascii_alphabetic() => {
                    return Err(format!(
                        "date format `{}` has unknown token `{}`; escape literal letters with `\\`",
                        format, c
                    ));
                }
                None => pattern.push_str(&regex::escape(c.encode_utf8(&mut buf))),
            }
        }

        let has = |slot: &str| seen.iter().any(|c| c.slot() == slot);
        if !(has("year") && has("month") && has("day")) {
            return Err(format!(
                "date format `{}` needs year (Y or y), month (m or n) and day (d or j) tokens",
                format
            ));
        }
        pattern.push('$');

        let pattern = Regex::new(&pattern).map_err(|e| e.to_string())?;
        Ok(DateFormat {
            source: format.to_string(),
            pattern,
        })
    }

    /// The format string as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check a value against this format and the calendar.
    ///
    /// Strings are split by the format. A `[year, month, day]` sequence is
    /// checked directly and ignores the format.
    pub fn check(&self, value: &Value) -> bool {
        match value {
            Value::Str(s) => self.check_str(s),
            Value::List(parts) => check_parts(parts),
            _ => false,
        }
    }

    fn check_str(&self, s: &str) -> bool {
        let Some(caps) = self.pattern.captures(s) else {
            return false;
        };
        // every captured group is all digits and at most four long
        let number = |name: &str| -> Option<i64> {
            caps.name(name).and_then(|m| m.as_str().parse().ok())
        };

        let year = number("year").or_else(|| number("short_year").map(expand_short_year));
        let (Some(year), Some(month), Some(day)) = (year, number("month"), number("day")) else {
            return false;
        };
        if !is_calendar_date(year, month, day) {
            return false;
        }
        if let Some(weekday) = number("weekday") {
            if !is_weekday_of(weekday, year, month, day) {
                return false;
            }
        }

        let hour = match (number("hour"), number("hour12")) {
            (Some(hour), _) => hour,
            (None, Some(hour12)) if (1..=12).contains(&hour12) => hour12 % 12,
            (None, Some(_)) => return false,
            (None, None) => 0,
        };
        is_clock_time(hour, number("minute").unwrap_or(0), number("second").unwrap_or(0))
    }
}

/// Two-digit years pivot at 70: `69` is 2069, `70` is 1970.
fn expand_short_year(year: i64) -> i64 {
    if year < 70 {
        2000 + year
    } else {
        1900 + year
    }
}

fn is_weekday_of(weekday: i64, year: i64, month: i64, day: i64) -> bool {
    // only called after is_calendar_date, so the casts are in range
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        .is_some_and(|date| i64::from(date.weekday().num_days_from_sunday()) == weekday)
}

fn check_parts(parts: &[Value]) -> bool {
    match parts {
        [year, month, day] => match (year.as_int(), month.as_int(), day.as_int()) {
            (Some(y), Some(m), Some(d)) => is_calendar_date(y, m, d),
            _ => false,
        },
        _ => false,
    }
}

/// True for a real calendar day with a 4-digit year.
pub fn is_calendar_date(year: i64, month: i64, day: i64) -> bool {
    if !YEARS.contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return false;
    }
    // ranges checked above, the casts cannot truncate
    NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).is_some()
}

fn is_clock_time(hour: i64, minute: i64, second: i64) -> bool {
    match (u32::try_from(hour), u32::try_from(minute), u32::try_from(second)) {
        (Ok(h), Ok(m), Ok(s)) => NaiveTime::from_hms_opt(h, m, s).is_some(),
        _ => false,
    }
}

impl fmt::Debug for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DateFormat").field(&self.source).finish()
    }
}

impl PartialEq for DateFormat {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}
