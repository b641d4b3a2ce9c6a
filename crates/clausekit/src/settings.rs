//! Builder configuration.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// How parameter placeholders are written into the composed SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// PostgreSQL positional placeholders: `$1, $2, ...`
    Dollar,
    /// Named placeholders: `@p0`, `:p0`, ...
    Named { prefix: char },
    /// Anonymous positional placeholders: `?`
    Question,
}

impl PlaceholderStyle {
    /// Write the placeholder for the binding at `index` (0-based) named `name`.
    pub(crate) fn write(&self, out: &mut String, index: usize, name: &str) {
        match self {
            PlaceholderStyle::Dollar => {
                let _ = write!(out, "${}", index + 1);
            }
            PlaceholderStyle::Named { prefix } => {
                out.push(*prefix);
                out.push_str(name);
            }
            PlaceholderStyle::Question => out.push('?'),
        }
    }
}

/// Configuration for a [`FluentBuilder`](crate::FluentBuilder).
///
/// Defaults: `$n` placeholders, generated names `p0, p1, ...`, no parameter reuse,
/// upper-case clause keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderSettings {
    /// Placeholder syntax.
    pub placeholder: PlaceholderStyle,
    /// Prefix for generated parameter names.
    pub parameter_name_prefix: String,
    /// Reuse an existing binding when an equal value is formatted again. Ignored for `?`.
    pub reuse_parameters: bool,
    /// Emit clause keywords in lower case.
    pub lower_case_clauses: bool,
    /// Truncate SQL in log events (in bytes). `None` means no truncation.
    pub max_logged_sql_length: Option<usize>,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            placeholder: PlaceholderStyle::Dollar,
            parameter_name_prefix: "p".to_string(),
            reuse_parameters: false,
            lower_case_clauses: false,
            max_logged_sql_length: Some(200),
        }
    }
}

impl BuilderSettings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the placeholder style.
    pub fn with_placeholder(mut self, placeholder: PlaceholderStyle) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Use named placeholders with the given prefix character (e.g. `@`).
    pub fn with_named_placeholders(mut self, prefix: char) -> Self {
        self.placeholder = PlaceholderStyle::Named { prefix };
        self
    }

    /// Set the prefix for generated parameter names.
    pub fn with_parameter_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parameter_name_prefix = prefix.into();
        self
    }

    /// Reuse bindings for repeated values.
    ///
    /// Two values are considered equal when they have the same type and the same
    /// textual form. Values appended through `append_param` are never reused.
    pub fn with_reuse_parameters(mut self, reuse: bool) -> Self {
        self.reuse_parameters = reuse;
        self
    }

    /// Emit `select`, `where`, ... instead of `SELECT`, `WHERE`, ...
    pub fn with_lower_case_clauses(mut self, lower: bool) -> Self {
        self.lower_case_clauses = lower;
        self
    }

    /// Set maximum SQL length in log events.
    pub fn with_max_logged_sql_length(mut self, len: usize) -> Self {
        self.max_logged_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_log_truncate(mut self) -> Self {
        self.max_logged_sql_length = None;
        self
    }
}
