//! Clause composition sessions.
//!
//! A [`ClauseSession`] mediates one clause's stream of literal text and dynamic values
//! into a [`ClauseSink`] (normally a [`FluentBuilder`](crate::FluentBuilder)).
//!
//! ```text
//! begin(enabled) ──► start_clause_action(kind)
//!   append_literal / append_formatted   (forwarded, any number of times)
//! close()        ──► end_clause_action(kind)
//!
//! begin(disabled): every call is a no-op, close() included
//! ```

use crate::clause::ClauseKind;
use crate::error::{BuilderError, BuilderResult};
use crate::formatter::FormatHint;
use crate::param::Param;
use std::fmt::Display;
use tokio_postgres::types::ToSql;

/// The hooks a session drives.
pub trait ClauseSink {
    /// A clause of `kind` starts.
    fn start_clause_action(&mut self, kind: ClauseKind) -> BuilderResult<()>;

    /// The clause of `kind` ends.
    fn end_clause_action(&mut self, kind: ClauseKind) -> BuilderResult<()>;

    /// Append trusted literal SQL verbatim.
    fn append_literal(&mut self, text: &str);

    /// Append a dynamic value, bound or inlined according to `hint`.
    fn append_formatted(&mut self, value: Param, hint: FormatHint);

    /// Capacity hint for the clause about to be composed. The default ignores it.
    fn reserve(&mut self, literal_length: usize, formatted_count: usize) {
        let _ = (literal_length, formatted_count);
    }
}

/// A short-lived session composing one clause.
///
/// The enabled flag is decided once, at [`ClauseSession::begin`]. A disabled session
/// never touches its sink. An enabled session that is dropped without [`close`]
/// closes itself.
///
/// [`close`]: ClauseSession::close
pub struct ClauseSession<'a> {
    kind: ClauseKind,
    enabled: bool,
    /// Present while the session is open.
    sink: Option<&'a mut dyn ClauseSink>,
}

impl<'a> ClauseSession<'a> {
    /// Open a session for `kind` against `builder`.
    ///
    /// `literal_length` and `formatted_count` are capacity hints. A `condition` of
    /// `None` means enabled. Fails with [`BuilderError::Argument`] naming `builder`
    /// when no builder is given, whatever the condition.
    pub fn begin(
        kind: ClauseKind,
        literal_length: usize,
        formatted_count: usize,
        builder: Option<&'a mut dyn ClauseSink>,
        condition: Option<bool>,
    ) -> BuilderResult<Self> {
        let builder = builder.ok_or(BuilderError::argument("builder"))?;
        let enabled = condition.unwrap_or(true);
        if !enabled {
            return Ok(Self {
                kind,
                enabled,
                sink: None,
            });
        }

        builder.reserve(literal_length, formatted_count);
        builder.start_clause_action(kind)?;
        Ok(Self {
            kind,
            enabled,
            sink: Some(builder),
        })
    }

    /// The clause kind of this session.
    pub fn kind(&self) -> ClauseKind {
        self.kind
    }

    /// Whether the session was enabled at creation.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the session is enabled and not yet closed.
    pub fn is_open(&self) -> bool {
        self.sink.is_some()
    }

    /// Append trusted literal SQL. Never creates a parameter.
    pub fn append_literal(&mut self, text: &str) -> &mut Self {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.append_literal(text);
        }
        self
    }

    /// Append a dynamic value. [`FormatHint::None`] binds it, [`FormatHint::Raw`]
    /// inlines its `Display` form.
    pub fn append_formatted<T>(&mut self, value: T, hint: FormatHint) -> &mut Self
    where
        T: ToSql + Display + Send + Sync + 'static,
    {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.append_formatted(Param::new(value), hint);
        }
        self
    }

    /// Append a value that can only be bound (e.g. `Option<T>`, `Vec<T>`).
    pub fn append_param<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Send + Sync + 'static,
    {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.append_formatted(Param::opaque(value), FormatHint::None);
        }
        self
    }

    /// Append a pre-wrapped value.
    pub fn append_value(&mut self, value: Param, hint: FormatHint) -> &mut Self {
        if let Some(sink) = self.sink.as_deref_mut() {
            sink.append_formatted(value, hint);
        }
        self
    }

    /// Shorthand for `append_formatted(value, FormatHint::Raw)`.
    pub fn append_raw<T>(&mut self, value: T) -> &mut Self
    where
        T: ToSql + Display + Send + Sync + 'static,
    {
        self.append_formatted(value, FormatHint::Raw)
    }

    /// End the clause. Later calls, and calls on a disabled session, do nothing.
    pub fn close(&mut self) -> BuilderResult<()> {
        match self.sink.take() {
            Some(sink) => sink.end_clause_action(self.kind),
            None => Ok(()),
        }
    }
}

impl Drop for ClauseSession<'_> {
    fn drop(&mut self) {
        if let Some(sink) = self.sink.take() {
            tracing::warn!(
                target: "clausekit.sql",
                kind = %self.kind,
                "clause session dropped while open; closing it"
            );
            if let Err(err) = sink.end_clause_action(self.kind) {
                tracing::warn!(target: "clausekit.sql", error = %err, "failed to close clause session");
            }
        }
    }
}

impl std::fmt::Debug for ClauseSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClauseSession")
            .field("kind", &self.kind)
            .field("enabled", &self.enabled)
            .field("open", &self.is_open())
            .finish()
    }
}
