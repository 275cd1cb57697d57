//! Lightweight query wrapper for hand-written SQL

use crate::client::GenericClient;
use crate::error::{DbError, DbResult};
use crate::log::SqlLog;
use crate::row::FromRow;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// A statement plus its positional parameters.
///
/// Before anything is sent the statement is checked: the highest `$n`
/// placeholder must equal the number of bound parameters.
///
/// # Example
///
/// ```ignore
/// use pgfilter::query;
///
/// let account: Account = query("SELECT ... FROM accounts WHERE id = $1")
///     .bind(1_i64)
///     .fetch_one_as(&client)
///     .await?;
/// ```
pub struct Query {
    sql: String,
    params: Vec<Box<dyn ToSql + Sync + Send>>,
    tag: Option<String>,
    log: SqlLog,
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("sql", &self.sql)
            .field("params", &self.params)
            .field("tag", &self.tag)
            .finish()
    }
}

/// Create a new query with the given SQL
pub fn query(sql: impl Into<String>) -> Query {
    Query {
        sql: sql.into(),
        params: Vec::new(),
        tag: None,
        log: SqlLog::default(),
    }
}

impl Query {
    /// Bind a parameter to the query
    pub fn bind<T: ToSql + Sync + Send + 'static>(mut self, value: T) -> Self {
        self.params.push(Box::new(value));
        self
    }

    /// Label the statement in the SQL log.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Override the SQL log settings.
    pub fn log(mut self, log: SqlLog) -> Self {
        self.log = log;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Borrow the parameters in the shape `tokio-postgres` expects.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params.iter().map(|p| p.as_ref() as _).collect()
    }

    /// Check that placeholders and bound parameters line up.
    pub fn validate(&self) -> DbResult<()> {
        let highest = max_placeholder(&self.sql);
        if highest != self.params.len() {
            return Err(DbError::validation(format!(
                "statement references ${highest} but {} parameter(s) are bound",
                self.params.len()
            )));
        }
        Ok(())
    }

    fn prepare(&self) -> DbResult<Vec<&(dyn ToSql + Sync)>> {
        self.validate()?;
        self.log
            .emit(self.tag.as_deref(), &self.sql, self.params.len());
        Ok(self.params_ref())
    }

    /// Execute the query and return all rows
    pub async fn fetch_all(&self, conn: &impl GenericClient) -> DbResult<Vec<Row>> {
        let params = self.prepare()?;
        conn.query(&self.sql, &params).await
    }

    /// Execute the query and return all rows mapped to type T
    pub async fn fetch_all_as<T: FromRow>(&self, conn: &impl GenericClient) -> DbResult<Vec<T>> {
        let rows = self.fetch_all(conn).await?;
        rows.iter().map(T::from_row).collect()
    }

    /// Execute the query and return the first row
    ///
    /// Returns [`DbError::NotFound`] if no rows are returned.
    pub async fn fetch_one(&self, conn: &impl GenericClient) -> DbResult<Row> {
        let params = self.prepare()?;
        conn.query_one(&self.sql, &params).await
    }

    /// Execute the query and return the first row mapped to type T
    pub async fn fetch_one_as<T: FromRow>(&self, conn: &impl GenericClient) -> DbResult<T> {
        let row = self.fetch_one(conn).await?;
        T::from_row(&row)
    }

    /// Execute the query and return at most one row
    pub async fn fetch_opt(&self, conn: &impl GenericClient) -> DbResult<Option<Row>> {
        let params = self.prepare()?;
        conn.query_opt(&self.sql, &params).await
    }

    /// Execute the query and return at most one row mapped to type T
    pub async fn fetch_opt_as<T: FromRow>(
        &self,
        conn: &impl GenericClient,
    ) -> DbResult<Option<T>> {
        let row = self.fetch_opt(conn).await?;
        row.as_ref().map(T::from_row).transpose()
    }

    /// Execute the statement and return the number of affected rows
    pub async fn execute(&self, conn: &impl GenericClient) -> DbResult<u64> {
        let params = self.prepare()?;
        conn.execute(&self.sql, &params).await
    }
}

/// Highest `$n` placeholder in `sql`.
///
/// Text inside string literals, quoted identifiers, comments and dollar-quoted
/// bodies is skipped.
pub(crate) fn max_placeholder(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut highest = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            // `''` inside a literal (and `""` inside an identifier) closes and
            // immediately reopens, which needs no special case.
            b'\'' | b'"' => i = skip_past(bytes, i + 1, &bytes[i..=i]),
            b'-' if bytes.get(i + 1) == Some(&b'-') => i = skip_past(bytes, i + 2, b"\n"),
            b'/' if bytes.get(i + 1) == Some(&b'*') => i = skip_block_comment(bytes, i + 2),
            b'$' if i > 0 && is_ident_byte(bytes[i - 1]) => i += 1,
            b'$' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    if let Ok(n) = sql[start..end].parse::<usize>() {
                        highest = highest.max(n);
                    }
                    i = end;
                } else if let Some(tag_len) = dollar_tag_len(&bytes[i..]) {
                    i = skip_past(bytes, i + tag_len, &bytes[i..i + tag_len]);
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }

    highest
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Length of a `$tag$` opener at the start of `rest` (`$$` included).
fn dollar_tag_len(rest: &[u8]) -> Option<usize> {
    let body = rest.get(1..)?;
    if body.first().is_some_and(|b| b.is_ascii_digit()) {
        return None;
    }
    let close = body.iter().position(|&b| b == b'$')?;
    body[..close]
        .iter()
        .all(|&b| b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80)
        .then_some(close + 2)
}

/// Index just after the next `needle` at or after `from`, or the end of input.
fn skip_past(bytes: &[u8], from: usize, needle: &[u8]) -> usize {
    bytes
        .get(from..)
        .and_then(|rest| rest.windows(needle.len()).position(|w| w == needle))
        .map_or(bytes.len(), |pos| from + pos + needle.len())
}

/// Block comments nest.
fn skip_block_comment(bytes: &[u8], mut i: usize) -> usize {
    let mut depth = 1;
    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            depth += 1;
            i += 2;
        } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
            depth -= 1;
            i += 2;
            if depth == 0 {
                return i;
            }
        } else {
            i += 1;
        }
    }
    bytes.len()
}
