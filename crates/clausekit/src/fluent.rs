//! Fluent, clause-aware SQL builder.
//!
//! [`FluentBuilder`] owns the SQL text and the parameter store for one query. Each
//! clause is composed through a [`ClauseSession`]; the builder writes the clause keyword
//! and separators, the session streams literal text and values.
//!
//! # Example
//!
//! ```ignore
//! use clausekit::{FluentBuilder, FormatHint};
//!
//! let mut b = FluentBuilder::new();
//! b.select(|s| { s.append_literal("u.id, u.name"); })?
//!     .from(|s| { s.append_literal("users u"); })?
//!     .left_join(|s| {
//!         s.append_literal("orders o ON o.user_id = u.id AND o.status = ")
//!             .append_formatted("open", FormatHint::None);
//!     })?
//!     .where_if(min_age.is_some(), |s| {
//!         s.append_literal("u.age >= ").append_param(min_age);
//!     })?
//!     .order_by(|s| { s.append_formatted(sort_column, FormatHint::Raw); })?;
//!
//! let (sql, params) = b.render()?;
//! ```

use crate::clause::{ClauseFamily, ClauseKind, push_affix};
use crate::error::{BuilderError, BuilderResult};
use crate::formatter::{FormatHint, format_value};
use crate::param::{Param, ParamStore, ParameterBinding};
use crate::query::BuiltQuery;
use crate::session::{ClauseSession, ClauseSink};
use crate::settings::{BuilderSettings, PlaceholderStyle};
use crate::tracker::ClauseState;
use std::collections::HashSet;
use tokio_postgres::types::ToSql;

/// Builder that accumulates clause fragments into one parameterized statement.
#[derive(Debug, Clone, Default)]
pub struct FluentBuilder {
    settings: BuilderSettings,
    text: String,
    params: ParamStore,
    state: ClauseState,
    /// Family of the most recently started clause.
    last_family: Option<ClauseFamily>,
    /// Every family started so far.
    emitted: HashSet<ClauseFamily>,
    filter_group_open: bool,
    /// Written when the open clause ends.
    pending_suffix: &'static str,
}

/// Start a new fluent builder with default settings.
pub fn fluent() -> FluentBuilder {
    FluentBuilder::new()
}

/// Truncate `sql` to at most `max` bytes on a char boundary.
fn truncate_for_log(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => {
            let mut end = max;
            while !sql.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &sql[..end])
        }
        _ => sql.to_string(),
    }
}

impl FluentBuilder {
    /// Create an empty builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with the given settings.
    pub fn with_settings(settings: BuilderSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// The builder's settings.
    pub fn settings(&self) -> &BuilderSettings {
        &self.settings
    }

    /// SQL composed so far. An open filter group is not yet closed here; use
    /// [`FluentBuilder::render`] for the final text.
    pub fn sql(&self) -> &str {
        &self.text
    }

    /// Parameter bindings in order.
    pub fn parameters(&self) -> &[ParameterBinding] {
        self.params.bindings()
    }

    /// Parameter names in order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.params.names().collect()
    }

    /// Number of bound parameters.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Whether a clause is currently open.
    pub fn is_clause_open(&self) -> bool {
        self.state.is_open()
    }

    /// Bind a value under an explicit name.
    ///
    /// The value is not referenced by any placeholder until the caller writes one
    /// (e.g. `@tenant` as literal text with named placeholders). Anonymous `?`
    /// placeholders cannot refer to a name, so this fails with
    /// [`BuilderError::InvalidOperation`] under [`PlaceholderStyle::Question`].
    pub fn add_parameter<T>(&mut self, name: impl Into<String>, value: T) -> BuilderResult<&mut Self>
    where
        T: ToSql + Send + Sync + 'static,
    {
        if self.settings.placeholder == PlaceholderStyle::Question {
            return Err(BuilderError::invalid_operation(
                "named parameters cannot be added with `?` placeholders",
            ));
        }
        self.params.bind_named(name, Param::opaque(value))?;
        Ok(self)
    }

    /// Discard all text, parameters and clause state. Settings are kept.
    pub fn reset(&mut self) -> &mut Self {
        self.text.clear();
        self.params.clear();
        self.state = ClauseState::new();
        self.last_family = None;
        self.emitted.clear();
        self.filter_group_open = false;
        self.pending_suffix = "";
        self
    }

    // ==================== Clause entry points ====================

    /// Compose a clause of `kind` through `f`.
    pub fn clause<F>(&mut self, kind: ClauseKind, f: F) -> BuilderResult<&mut Self>
    where
        F: FnOnce(&mut ClauseSession<'_>),
    {
        self.clause_if(kind, true, f)
    }

    /// Compose a clause of `kind` through `f` when `condition` holds.
    ///
    /// With a `false` condition `f` is not called, so expressions inside it are never
    /// evaluated, and nothing is written or bound.
    pub fn clause_if<F>(&mut self, kind: ClauseKind, condition: bool, f: F) -> BuilderResult<&mut Self>
    where
        F: FnOnce(&mut ClauseSession<'_>),
    {
        {
            let sink: &mut dyn ClauseSink = &mut *self;
            let mut session = ClauseSession::begin(kind, 0, 0, Some(sink), Some(condition))?;
            if session.is_enabled() {
                f(&mut session);
            }
            session.close()?;
        }
        Ok(self)
    }

    fn integer_clause(&mut self, kind: ClauseKind, condition: bool, n: u64) -> BuilderResult<&mut Self> {
        self.clause_if(kind, condition, |s| {
            s.append_literal(&n.to_string());
        })
    }

    /// `LIMIT n`
    pub fn limit(&mut self, rows: u64) -> BuilderResult<&mut Self> {
        self.integer_clause(ClauseKind::Limit, true, rows)
    }

    /// `LIMIT n` when `condition` holds.
    pub fn limit_if(&mut self, condition: bool, rows: u64) -> BuilderResult<&mut Self> {
        self.integer_clause(ClauseKind::Limit, condition, rows)
    }

    /// `OFFSET n`
    pub fn offset(&mut self, rows: u64) -> BuilderResult<&mut Self> {
        self.integer_clause(ClauseKind::Offset, true, rows)
    }

    /// `OFFSET n` when `condition` holds.
    pub fn offset_if(&mut self, condition: bool, rows: u64) -> BuilderResult<&mut Self> {
        self.integer_clause(ClauseKind::Offset, condition, rows)
    }

    /// `OFFSET n ROWS`
    pub fn offset_rows(&mut self, rows: u64) -> BuilderResult<&mut Self> {
        self.integer_clause(ClauseKind::OffsetRows, true, rows)
    }

    /// `FETCH NEXT n ROWS ONLY`
    pub fn fetch_next(&mut self, rows: u64) -> BuilderResult<&mut Self> {
        self.integer_clause(ClauseKind::FetchNext, true, rows)
    }

    // ==================== Output ====================

    fn ensure_closed(&self) -> BuilderResult<()> {
        match self.state.current() {
            Some(kind) => Err(BuilderError::invalid_operation(format!(
                "cannot render while clause {kind} is open"
            ))),
            None => Ok(()),
        }
    }

    fn final_text(&self) -> String {
        let mut out = self.text.clone();
        if self.filter_group_open {
            out.push(')');
        }
        out
    }

    /// Final SQL text and parameter bindings in order.
    ///
    /// Fails with [`BuilderError::InvalidOperation`] while a clause is open.
    pub fn render(&self) -> BuilderResult<(String, Vec<ParameterBinding>)> {
        self.ensure_closed()?;
        let sql = self.final_text();
        tracing::debug!(
            target: "clausekit.sql",
            param_count = self.params.len(),
            sql = %truncate_for_log(&sql, self.settings.max_logged_sql_length),
            "rendered query"
        );
        Ok((sql, self.params.bindings().to_vec()))
    }

    /// Consume the builder into a [`BuiltQuery`] ready to hand to a client.
    pub fn build(mut self) -> BuilderResult<BuiltQuery> {
        self.ensure_closed()?;
        let sql = self.final_text();
        tracing::debug!(
            target: "clausekit.sql",
            param_count = self.params.len(),
            sql = %truncate_for_log(&sql, self.settings.max_logged_sql_length),
            "built query"
        );
        Ok(BuiltQuery::new(sql, self.params.take(), self.settings.placeholder))
    }

    // ==================== Clause bookkeeping ====================

    fn check_order(&self, kind: ClauseKind) -> BuilderResult<()> {
        let family = kind.family();
        let Some(last) = self.last_family else {
            return Ok(());
        };
        if last == family {
            if !family.is_repeatable() {
                return Err(BuilderError::invalid_operation(format!(
                    "clause {kind} can only appear once"
                )));
            }
        } else if family.stage() < last.stage() {
            return Err(BuilderError::invalid_operation(format!(
                "clause {kind} cannot follow {last:?}"
            )));
        } else if self.emitted.contains(&family) {
            return Err(BuilderError::invalid_operation(format!(
                "clause {kind} cannot resume {family:?} after {last:?}"
            )));
        }
        Ok(())
    }
}

impl ClauseSink for FluentBuilder {
    fn start_clause_action(&mut self, kind: ClauseKind) -> BuilderResult<()> {
        if !self.state.is_open() {
            self.check_order(kind)?;
        }
        self.state.start_clause(kind)?;

        let lower = self.settings.lower_case_clauses;
        let family = kind.family();
        let same_family = self.last_family == Some(family);

        if self.filter_group_open && !(kind.joins_filter_group() && same_family) {
            self.text.push(')');
            self.filter_group_open = false;
        }

        let affixes = if same_family {
            kind.following(self.filter_group_open)
        } else {
            if !self.text.is_empty() {
                self.text.push(' ');
            }
            kind.leading()
        };
        push_affix(&mut self.text, affixes.prefix, lower);

        if kind.opens_filter_group() || kind.joins_filter_group() {
            self.filter_group_open = true;
        }
        self.pending_suffix = affixes.suffix;
        self.last_family = Some(family);
        self.emitted.insert(family);

        tracing::trace!(target: "clausekit.sql", %kind, "clause started");
        Ok(())
    }

    fn end_clause_action(&mut self, kind: ClauseKind) -> BuilderResult<()> {
        self.state.end_clause(kind)?;
        let suffix = std::mem::take(&mut self.pending_suffix);
        push_affix(&mut self.text, suffix, self.settings.lower_case_clauses);
        tracing::trace!(target: "clausekit.sql", %kind, "clause ended");
        Ok(())
    }

    fn append_literal(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn append_formatted(&mut self, value: Param, hint: FormatHint) {
        let outcome = format_value(&mut self.text, &mut self.params, &self.settings, value, hint);
        tracing::trace!(target: "clausekit.sql", ?outcome, "value formatted");
    }

    fn reserve(&mut self, literal_length: usize, formatted_count: usize) {
        let additional = literal_length.saturating_add(formatted_count.saturating_mul(4));
        if self.text.try_reserve(additional).is_err() {
            tracing::debug!(target: "clausekit.sql", additional, "capacity hint ignored");
        }
    }
}

/// Generates a `name` / `name_if` pair of entry points per clause kind.
macro_rules! clause_entry_points {
    ($( $kind:ident => $name:ident, $name_if:ident, $sql:literal; )*) => {
        impl FluentBuilder {
            $(
                #[doc = concat!("Compose a `", $sql, "` clause.")]
                pub fn $name<F>(&mut self, f: F) -> BuilderResult<&mut Self>
                where
                    F: FnOnce(&mut ClauseSession<'_>),
                {
                    self.clause_if(ClauseKind::$kind, true, f)
                }

                #[doc = concat!("Compose a `", $sql, "` clause when `condition` holds.")]
                pub fn $name_if<F>(&mut self, condition: bool, f: F) -> BuilderResult<&mut Self>
                where
                    F: FnOnce(&mut ClauseSession<'_>),
                {
                    self.clause_if(ClauseKind::$kind, condition, f)
                }
            )*
        }
    };
}

clause_entry_points! {
    Select => select, select_if, "SELECT";
    SelectDistinct => select_distinct, select_distinct_if, "SELECT DISTINCT";
    InsertInto => insert_into, insert_into_if, "INSERT INTO";
    Update => update, update_if, "UPDATE";
    DeleteFrom => delete_from, delete_from_if, "DELETE FROM";
    From => from, from_if, "FROM";
    Values => values, values_if, "VALUES (...)";
    Set => set, set_if, "SET";
    Join => join, join_if, "JOIN";
    InnerJoin => inner_join, inner_join_if, "INNER JOIN";
    LeftJoin => left_join, left_join_if, "LEFT JOIN";
    RightJoin => right_join, right_join_if, "RIGHT JOIN";
    Where => where_, where_if, "WHERE ... AND";
    OrWhere => or_where, or_where_if, "WHERE ... OR";
    WhereFilter => where_filter, where_filter_if, "WHERE (... AND (";
    OrWhereFilter => or_where_filter, or_where_filter_if, "WHERE (... OR (";
    WithFilter => with_filter, with_filter_if, "... AND ... (inside a filter group)";
    WithOrFilter => with_or_filter, with_or_filter_if, "... OR ... (inside a filter group)";
    GroupBy => group_by, group_by_if, "GROUP BY";
    Having => having, having_if, "HAVING";
    OrderBy => order_by, order_by_if, "ORDER BY";
}
