//! Error reports and message templates

use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::error::ConfigError;

/// Messages for one field, keyed by rule name.
pub type FieldErrors = IndexMap<String, String>;

/// Messages for every failing field, keyed by field key.
pub type ErrorMap = IndexMap<String, FieldErrors>;

static NO_ERRORS: LazyLock<FieldErrors> = LazyLock::new(FieldErrors::new);

/// Wraps every recorded message.
///
/// # Example
///
/// ```rust
/// use sluice::MessageTemplate;
///
/// let tag = MessageTemplate::tag("p", Some(r#"class="err""#));
/// assert_eq!(tag.apply("Required"), r#"<p class="err">Required</p>"#);
///
/// let custom = MessageTemplate::new("* [{message}]").unwrap();
/// assert_eq!(custom.apply("Required"), "* Required");
///
/// assert!(MessageTemplate::new("no marker").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    template: String,
}

impl MessageTemplate {
    /// Marker replaced by the raw message.
    pub const PLACEHOLDER: &'static str = "[{message}]";

    /// A custom template; must contain [`PLACEHOLDER`](Self::PLACEHOLDER)
    /// exactly once.
    pub fn new(template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = template.into();
        if template.matches(Self::PLACEHOLDER).count() != 1 {
            return Err(ConfigError::InvalidTemplate(template));
        }
        Ok(MessageTemplate { template })
    }

    /// Wrap messages in an element: `<tag attributes>message</tag>`.
    ///
    /// Attributes are inserted verbatim after a single space; neither part
    /// is escaped.
    pub fn tag(name: &str, attributes: Option<&str>) -> Self {
        let attributes = match attributes {
            Some(attrs) if !attrs.is_empty() => format!(" {}", attrs),
            _ => String::new(),
        };
        MessageTemplate {
            template: format!("<{name}{attributes}>{}</{name}>", Self::PLACEHOLDER),
        }
    }

    /// Substitute `raw` for the marker.
    pub fn apply(&self, raw: &str) -> String {
        self.template.replacen(Self::PLACEHOLDER, raw, 1)
    }

    /// The template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// The outcome of one validation run.
///
/// Messages are stored after templating. A report is never mutated once
/// returned; every run builds a fresh one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ErrorReport {
    messages: ErrorMap,
    count: usize,
}

impl ErrorReport {
    /// An empty, passing report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no rule failed.
    pub fn is_valid(&self) -> bool {
        self.count == 0
    }

    /// Number of failed rules across all fields.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Every message, field → rule → message.
    pub fn messages(&self) -> &ErrorMap {
        &self.messages
    }

    /// Messages for one field; empty when the field passed or is unknown.
    pub fn field(&self, field: &str) -> &FieldErrors {
        self.messages.get(field).unwrap_or(&*NO_ERRORS)
    }

    /// The message for one rule on one field, or `""` when it passed.
    pub fn message(&self, field: &str, rule: &str) -> &str {
        self.messages
            .get(field)
            .and_then(|rules| rules.get(rule))
            .map_or("", String::as_str)
    }

    /// Returns true if `rule` failed on `field`.
    pub fn has_error(&self, field: &str, rule: &str) -> bool {
        self.messages
            .get(field)
            .is_some_and(|rules| rules.contains_key(rule))
    }

    /// Consume the report, keeping the messages.
    pub fn into_messages(self) -> ErrorMap {
        self.messages
    }
}

/// Builds an [`ErrorReport`] during a run.
#[derive(Debug)]
pub(crate) struct ErrorReporter<'t> {
    template: Option<&'t MessageTemplate>,
    report: ErrorReport,
}

impl<'t> ErrorReporter<'t> {
    pub(crate) fn new(template: Option<&'t MessageTemplate>) -> Self {
        ErrorReporter {
            template,
            report: ErrorReport::new(),
        }
    }

    /// Record a failure, templating the message and counting it.
    pub(crate) fn record(&mut self, field: &str, rule: &str, raw: &str) {
        let message = match self.template {
            Some(template) => template.apply(raw),
            None => raw.to_string(),
        };
        self.report
            .messages
            .entry(field.to_string())
            .or_default()
            .insert(rule.to_string(), message);
        self.report.count += 1;
    }

    pub(crate) fn finish(self) -> ErrorReport {
        self.report
    }
}
