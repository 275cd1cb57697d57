//! # pgfilter
//!
//! Dynamic WHERE-clause assembly and array transcoding for Postgres, built
//! around one table (`accounts`) and three queries: by id, all, and by filter.
//!
//! ## Features
//!
//! - **Numbered placeholders**: optional filters become `col = $n` /
//!   `col = ANY($n)` conditions with positionally aligned arguments
//! - **One argument per membership test**: the statement text does not grow
//!   with the number of values
//! - **Array transcoding**: text and binary Postgres array formats through an
//!   explicit, immutable [`TypeRegistry`](array::TypeRegistry)
//! - **Transaction-friendly**: pass a transaction anywhere a `GenericClient` is expected
//!
//! ## Example
//!
//! ```ignore
//! use pgfilter::{AccountDao, AccountFilter};
//!
//! let client = pgfilter::connect(&database_url).await?;
//! let dao = AccountDao::new(&client);
//!
//! let filter = AccountFilter::new()
//!     .names(["Jane", "John"])
//!     .active(true)
//!     .fav_colors(["red", "blue", "green"]);
//!
//! for account in dao.select_by_filter(&filter).await? {
//!     println!("{account}");
//! }
//! ```

pub mod account;
pub mod array;
pub mod client;
pub mod error;
pub mod log;
pub mod predicate;
pub mod query;
pub mod row;

pub use account::{Account, AccountDao, Color};
pub use client::{GenericClient, connect};
pub use error::{DbError, DbResult};
pub use log::SqlLog;
pub use predicate::{AccountFilter, Argument, PredicateBuilder, PredicateResult};
pub use query::{Query, query};
pub use row::{FromRow, RowExt};
