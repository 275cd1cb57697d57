//! SQL debug logging.
//!
//! With the `tracing` feature enabled every statement run through
//! [`Query`](crate::Query) is emitted at DEBUG on the `pgfilter.sql` target
//! before execution. Without the feature [`SqlLog::emit`] compiles to nothing.

/// Settings for the statement log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlLog {
    /// Truncate long SQL strings (in bytes, on a char boundary). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for SqlLog {
    fn default() -> Self {
        Self {
            max_sql_length: Some(200),
        }
    }
}

impl SqlLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    /// Emit one event for a statement about to be executed.
    #[cfg(feature = "tracing")]
    pub(crate) fn emit(&self, tag: Option<&str>, sql: &str, param_count: usize) {
        let tag = tag.unwrap_or("-");
        let sql = self.truncate_sql(sql);
        tracing::debug!(target: "pgfilter.sql", tag, param_count, sql = %sql, "pgfilter sql");
    }

    #[cfg(not(feature = "tracing"))]
    #[inline]
    pub(crate) fn emit(&self, _tag: Option<&str>, _sql: &str, _param_count: usize) {}
}

#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("SELECT 1", 6), "SELECT");
        // 'é' is two bytes; cutting inside it backs off.
        assert_eq!(truncate_sql_bytes("né", 2), "n");
    }

    #[test]
    fn long_sql_gets_an_ellipsis() {
        let log = SqlLog::new().max_sql_length(6);
        assert_eq!(log.truncate_sql("SELECT id FROM accounts"), "SELECT...");
        assert_eq!(log.truncate_sql("SELECT"), "SELECT");

        let log = SqlLog::new().no_truncate();
        assert_eq!(
            log.truncate_sql("SELECT id FROM accounts"),
            "SELECT id FROM accounts"
        );
    }
}
