//! # clausekit
//!
//! Compose parameterized SQL clause by clause.
//!
//! ## Features
//!
//! - **Clause tracking**: every fragment belongs to a [`ClauseKind`]; the builder writes the
//!   keyword (`WHERE`, `LEFT JOIN`, ...) and the separator between fragments of the same clause
//! - **Conditional clauses**: every entry point has an `_if` form; a disabled clause writes
//!   no text and binds no parameters
//! - **Parameter safety**: dynamic values are always bound unless explicitly marked
//!   [`FormatHint::Raw`] (`{value:raw}` in `sql!` templates)
//! - **Protocol checks**: mismatched clause start/end, overlapping clauses and rendering
//!   with an open clause are reported as [`BuilderError::InvalidOperation`]
//! - **Execution hand-off**: [`BuiltQuery`] runs on any [`GenericClient`]
//!   (`tokio_postgres::Client` / `Transaction`)
//!
//! ## Example
//!
//! ```ignore
//! use clausekit::{FluentBuilder, sql};
//!
//! let mut b = FluentBuilder::new();
//! b.select(sql!("o.id, o.total"))?
//!     .from(sql!("orders o"))?
//!     .left_join(sql!("customers c ON c.id = o.customer_id"))?
//!     .where_(sql!("c.id = {customer_id}"))?
//!     .where_if(status.is_some(), sql!("o.status = {status_text}"))?
//!     .order_by(sql!("{sort_column:raw} DESC"))?
//!     .limit(20)?;
//!
//! let rows = b.build()?.query(&client).await?;
//! ```

extern crate self as clausekit;

pub mod clause;
pub mod client;
pub mod error;
pub mod fluent;
pub mod formatter;
pub mod param;
pub mod query;
pub mod session;
pub mod settings;
pub mod tracker;

pub use clause::{ClauseFamily, ClauseKind};
pub use client::GenericClient;
pub use error::{BuilderError, BuilderResult};
pub use fluent::{FluentBuilder, fluent};
pub use formatter::{FormatHint, Formatted};
pub use param::{Param, ParamStore, ParameterBinding};
pub use query::BuiltQuery;
pub use session::{ClauseSession, ClauseSink};
pub use settings::{BuilderSettings, PlaceholderStyle};
pub use tracker::ClauseState;

#[cfg(feature = "macros")]
pub use clausekit_macros::sql;
