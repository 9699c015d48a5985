//! # Sluice
//!
//! > *"Let the valid water through"*
//!
//! Declarative, data-driven field validation for Rust.
//!
//! ## Philosophy
//!
//! **Sluice** keeps rules as **data** and predicates as **code**:
//! - **Rules** live in a [`RuleTable`] (field → rule → parameters +
//!   message) that can be built in code or deserialized from config.
//! - **Predicates** are the fixed built-ins plus any custom [`Rule`] you
//!   register. Built-ins always win a name clash.
//!
//! Every failing rule is collected, so a form reports everything that is
//! wrong at once.
//!
//! ## Quick Example
//!
//! ```rust
//! use sluice::{RuleInvocation, RuleTable, Validator};
//!
//! let mut validator = Validator::new();
//! validator.set_check_values([
//!     ("name", "my name"),
//!     ("email_address", "test@example.com"),
//!     ("password", "1234"),
//! ]);
//! validator.set_rules(
//!     RuleTable::new()
//!         .rule("name", "notEmpty", RuleInvocation::new("Name is required"))?
//!         .rule("name", "maxLength", RuleInvocation::new("Name is too long").with_param(7))?
//!         .rule("email_address", "email", RuleInvocation::new("Invalid email"))?
//!         .rule(
//!             "password",
//!             "betweenLength",
//!             RuleInvocation::new("5 to 10 characters").with_param(5).with_param(10),
//!         )?,
//! );
//!
//! if !validator.validate()? {
//!     assert_eq!(validator.error_count(), 1);
//!     assert_eq!(
//!         validator.error_message("password", "betweenLength"),
//!         "5 to 10 characters"
//!     );
//! }
//! # Ok::<(), sluice::ConfigError>(())
//! ```
//!
//! ## Features
//!
//! - `tracing`: spans and events for each validation run
//! - `serde`: (de)serialize [`Value`], [`RuleTable`] and [`ErrorReport`]
//! - `proptest`: `Arbitrary` for [`Value`]

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod encoding;
pub mod error;
pub mod field;
pub mod report;
pub mod rule;
pub mod table;
pub mod testing;
pub mod validator;
pub mod value;

// Re-exports
pub use encoding::Encoding;
pub use error::{ConfigError, ParamError};
pub use field::FieldRef;
pub use report::{ErrorMap, ErrorReport, FieldErrors, MessageTemplate};
pub use rule::{BuiltinCall, BuiltinRule, DateFormat, Rule, RuleRef, RuleRegistry};
pub use table::{BoundRule, FieldRules, RuleInvocation, RuleTable};
pub use validator::Validator;
pub use value::{CheckValues, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::encoding::Encoding;
    pub use crate::error::ConfigError;
    pub use crate::report::{ErrorReport, MessageTemplate};
    pub use crate::rule::Rule;
    pub use crate::table::{RuleInvocation, RuleTable};
    pub use crate::validator::Validator;
    pub use crate::value::Value;
}
