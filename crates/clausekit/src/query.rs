//! A rendered statement ready to be handed to a database client.

use crate::client::GenericClient;
use crate::error::{BuilderError, BuilderResult};
use crate::param::ParameterBinding;
use crate::settings::PlaceholderStyle;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// The result of building a query: SQL text plus ordered parameter bindings.
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    sql: String,
    params: Vec<ParameterBinding>,
    placeholder: PlaceholderStyle,
}

impl BuiltQuery {
    pub(crate) fn new(sql: String, params: Vec<ParameterBinding>, placeholder: PlaceholderStyle) -> Self {
        Self {
            sql,
            params,
            placeholder,
        }
    }

    /// The SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Parameter bindings in order.
    pub fn params(&self) -> &[ParameterBinding] {
        &self.params
    }

    /// Parameter names in order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name()).collect()
    }

    /// Placeholder syntax used in [`BuiltQuery::sql`].
    pub fn placeholder(&self) -> PlaceholderStyle {
        self.placeholder
    }

    /// Get parameters as references for tokio-postgres.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.value().as_sql()).collect()
    }

    /// Split into SQL text and bindings.
    pub fn into_parts(self) -> (String, Vec<ParameterBinding>) {
        (self.sql, self.params)
    }

    /// Validate that the query can be executed through a [`GenericClient`].
    fn validate(&self) -> BuilderResult<()> {
        if self.placeholder != PlaceholderStyle::Dollar {
            return Err(BuilderError::invalid_operation(format!(
                "queries with {:?} placeholders cannot be executed by tokio-postgres; use PlaceholderStyle::Dollar",
                self.placeholder
            )));
        }
        Ok(())
    }

    /// Execute query and return all rows.
    pub async fn query(&self, conn: &impl GenericClient) -> BuilderResult<Vec<Row>> {
        self.validate()?;
        let params = self.params_ref();
        conn.query(&self.sql, &params).await
    }

    /// Execute query and return the first row.
    pub async fn query_one(&self, conn: &impl GenericClient) -> BuilderResult<Row> {
        self.validate()?;
        let params = self.params_ref();
        conn.query_one(&self.sql, &params).await
    }

    /// Execute query and return at most one row.
    pub async fn query_opt(&self, conn: &impl GenericClient) -> BuilderResult<Option<Row>> {
        self.validate()?;
        let params = self.params_ref();
        conn.query_opt(&self.sql, &params).await
    }

    /// Execute and return affected row count.
    pub async fn execute(&self, conn: &impl GenericClient) -> BuilderResult<u64> {
        self.validate()?;
        let params = self.params_ref();
        conn.execute(&self.sql, &params).await
    }
}
