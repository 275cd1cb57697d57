//! Dynamic WHERE-clause assembly for the accounts table.
//!
//! [`build`] turns an [`AccountFilter`] into a [`PredicateResult`]: rendered
//! conditions plus one bound [`Argument`] per condition, in the fixed order
//! `name`, `active`, `fav_color`. Membership tests bind the whole sequence as
//! a single array parameter, so the statement text does not depend on how
//! many names or colors are given.
//!
//! # Example
//!
//! ```ignore
//! use pgfilter::predicate::{self, AccountFilter};
//!
//! let filter = AccountFilter::new().names(["Jane", "John"]).active(true);
//! let result = predicate::build(&filter);
//! assert_eq!(result.conditions(), ["name = ANY($1)", "active = $2"]);
//!
//! let rows = result.compose(SELECT_ACCOUNTS).fetch_all(&client).await?;
//! ```

mod argument;
mod builder;
mod filter;

#[cfg(test)]
mod tests;

pub use argument::Argument;
pub use builder::PredicateBuilder;
pub use filter::AccountFilter;

use crate::query::{Query, query};

/// Conditions and their arguments, aligned 1:1 with `$1..$n`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateResult {
    conditions: Vec<String>,
    arguments: Vec<Argument>,
}

impl PredicateResult {
    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Argument>) {
        (self.conditions, self.arguments)
    }

    /// Conditions joined with `AND`, or `None` when there are none.
    pub fn where_clause(&self) -> Option<String> {
        if self.conditions.is_empty() {
            None
        } else {
            Some(self.conditions.join(" AND "))
        }
    }

    /// Append ` WHERE ...` to `base_sql` (only if there are conditions) and
    /// bind the arguments in order.
    pub fn compose(self, base_sql: &str) -> Query {
        let sql = match self.where_clause() {
            Some(clause) => format!("{base_sql} WHERE {clause}"),
            None => base_sql.to_string(),
        };
        self.arguments
            .into_iter()
            .fold(query(sql), |q, argument| q.bind(argument))
    }
}

/// Build the predicate for `filter`. Total: every filter, including the empty
/// one, yields a result.
pub fn build(filter: &AccountFilter) -> PredicateResult {
    let mut builder = PredicateBuilder::new();
    builder
        .any("name", &filter.names)
        .eq("active", filter.active)
        .any("fav_color", &filter.fav_colors);
    builder.finish()
}
