//! Clause kinds and their formatting conventions.
//!
//! Every [`ClauseKind`] belongs to a [`ClauseFamily`]: the SQL keyword it contributes to.
//! The family decides what is written before the first fragment (`WHERE `), between
//! fragments of the same family (` AND `, `, `) and where it may appear in a statement.

use std::fmt;

/// The logical SQL clause a fragment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Select,
    SelectDistinct,
    InsertInto,
    Update,
    DeleteFrom,
    From,
    Values,
    Set,
    Join,
    InnerJoin,
    LeftJoin,
    RightJoin,
    Where,
    OrWhere,
    WhereFilter,
    OrWhereFilter,
    WithFilter,
    WithOrFilter,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    OffsetRows,
    FetchNext,
}

/// Group of clause kinds sharing one SQL keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseFamily {
    Select,
    InsertInto,
    Update,
    DeleteFrom,
    From,
    Values,
    Set,
    Join,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
    FetchNext,
}

impl ClauseFamily {
    /// Position within a statement. A family may not start after a family with a
    /// higher stage.
    pub fn stage(self) -> u8 {
        match self {
            ClauseFamily::Select
            | ClauseFamily::InsertInto
            | ClauseFamily::Update
            | ClauseFamily::DeleteFrom => 0,
            ClauseFamily::From | ClauseFamily::Values | ClauseFamily::Set => 1,
            ClauseFamily::Join => 2,
            ClauseFamily::Where => 3,
            ClauseFamily::GroupBy => 4,
            ClauseFamily::Having => 5,
            ClauseFamily::OrderBy => 6,
            ClauseFamily::Limit => 7,
            ClauseFamily::Offset => 8,
            ClauseFamily::FetchNext => 9,
        }
    }

    /// Whether the family accepts more than one fragment.
    pub fn is_repeatable(self) -> bool {
        !matches!(
            self,
            ClauseFamily::InsertInto
                | ClauseFamily::Update
                | ClauseFamily::DeleteFrom
                | ClauseFamily::Limit
                | ClauseFamily::Offset
                | ClauseFamily::FetchNext
        )
    }
}

/// Text written around one fragment of a clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Affixes {
    /// Written before the fragment.
    pub prefix: &'static str,
    /// Written after the fragment when the clause ends.
    pub suffix: &'static str,
}

impl ClauseKind {
    /// The family this kind contributes to.
    pub fn family(self) -> ClauseFamily {
        match self {
            ClauseKind::Select | ClauseKind::SelectDistinct => ClauseFamily::Select,
            ClauseKind::InsertInto => ClauseFamily::InsertInto,
            ClauseKind::Update => ClauseFamily::Update,
            ClauseKind::DeleteFrom => ClauseFamily::DeleteFrom,
            ClauseKind::From => ClauseFamily::From,
            ClauseKind::Values => ClauseFamily::Values,
            ClauseKind::Set => ClauseFamily::Set,
            ClauseKind::Join | ClauseKind::InnerJoin | ClauseKind::LeftJoin | ClauseKind::RightJoin => {
                ClauseFamily::Join
            }
            ClauseKind::Where
            | ClauseKind::OrWhere
            | ClauseKind::WhereFilter
            | ClauseKind::OrWhereFilter
            | ClauseKind::WithFilter
            | ClauseKind::WithOrFilter => ClauseFamily::Where,
            ClauseKind::GroupBy => ClauseFamily::GroupBy,
            ClauseKind::Having => ClauseFamily::Having,
            ClauseKind::OrderBy => ClauseFamily::OrderBy,
            ClauseKind::Limit => ClauseFamily::Limit,
            ClauseKind::Offset | ClauseKind::OffsetRows => ClauseFamily::Offset,
            ClauseKind::FetchNext => ClauseFamily::FetchNext,
        }
    }

    /// Whether this kind opens a parenthesized filter group.
    pub fn opens_filter_group(self) -> bool {
        matches!(self, ClauseKind::WhereFilter | ClauseKind::OrWhereFilter)
    }

    /// Whether this kind joins the currently open filter group.
    pub fn joins_filter_group(self) -> bool {
        matches!(self, ClauseKind::WithFilter | ClauseKind::WithOrFilter)
    }

    /// Affixes for the first fragment of the family.
    pub(crate) fn leading(self) -> Affixes {
        let (prefix, suffix) = match self {
            ClauseKind::Select => ("SELECT ", ""),
            ClauseKind::SelectDistinct => ("SELECT DISTINCT ", ""),
            ClauseKind::InsertInto => ("INSERT INTO ", ""),
            ClauseKind::Update => ("UPDATE ", ""),
            ClauseKind::DeleteFrom => ("DELETE FROM ", ""),
            ClauseKind::From => ("FROM ", ""),
            ClauseKind::Values => ("VALUES (", ")"),
            ClauseKind::Set => ("SET ", ""),
            ClauseKind::Join => ("JOIN ", ""),
            ClauseKind::InnerJoin => ("INNER JOIN ", ""),
            ClauseKind::LeftJoin => ("LEFT JOIN ", ""),
            ClauseKind::RightJoin => ("RIGHT JOIN ", ""),
            ClauseKind::Where | ClauseKind::OrWhere => ("WHERE ", ""),
            ClauseKind::WhereFilter
            | ClauseKind::OrWhereFilter
            | ClauseKind::WithFilter
            | ClauseKind::WithOrFilter => ("WHERE (", ""),
            ClauseKind::GroupBy => ("GROUP BY ", ""),
            ClauseKind::Having => ("HAVING ", ""),
            ClauseKind::OrderBy => ("ORDER BY ", ""),
            ClauseKind::Limit => ("LIMIT ", ""),
            ClauseKind::Offset => ("OFFSET ", ""),
            ClauseKind::OffsetRows => ("OFFSET ", " ROWS"),
            ClauseKind::FetchNext => ("FETCH NEXT ", " ROWS ONLY"),
        };
        Affixes { prefix, suffix }
    }

    /// Affixes for a later fragment of the same family.
    ///
    /// `in_group` is true when a filter group is open (only relevant for filter kinds).
    pub(crate) fn following(self, in_group: bool) -> Affixes {
        let (prefix, suffix) = match self {
            ClauseKind::Select | ClauseKind::SelectDistinct => (", ", ""),
            ClauseKind::From | ClauseKind::Set | ClauseKind::GroupBy | ClauseKind::OrderBy => {
                (", ", "")
            }
            ClauseKind::Values => (", (", ")"),
            ClauseKind::Join => (" JOIN ", ""),
            ClauseKind::InnerJoin => (" INNER JOIN ", ""),
            ClauseKind::LeftJoin => (" LEFT JOIN ", ""),
            ClauseKind::RightJoin => (" RIGHT JOIN ", ""),
            ClauseKind::Where | ClauseKind::Having => (" AND ", ""),
            ClauseKind::OrWhere => (" OR ", ""),
            ClauseKind::WhereFilter => (" AND (", ""),
            ClauseKind::OrWhereFilter => (" OR (", ""),
            ClauseKind::WithFilter if in_group => (" AND ", ""),
            ClauseKind::WithOrFilter if in_group => (" OR ", ""),
            ClauseKind::WithFilter | ClauseKind::WithOrFilter => (" AND (", ""),
            // Single-valued families never reach here; keep the leading form.
            ClauseKind::InsertInto
            | ClauseKind::Update
            | ClauseKind::DeleteFrom
            | ClauseKind::Limit
            | ClauseKind::Offset
            | ClauseKind::OffsetRows
            | ClauseKind::FetchNext => return self.leading(),
        };
        Affixes { prefix, suffix }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Write `affix` into `out`, lower-casing ASCII keywords when requested.
///
/// Affixes only contain keywords and punctuation, so lowering them never touches
/// caller-supplied text.
pub(crate) fn push_affix(out: &mut String, affix: &str, lower_case: bool) {
    if lower_case {
        out.extend(affix.chars().map(|c| c.to_ascii_lowercase()));
    } else {
        out.push_str(affix);
    }
}
