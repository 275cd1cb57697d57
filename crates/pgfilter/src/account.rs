//! The `accounts` table: row model, enum column and data-access object.
//!
//! ```sql
//! CREATE TYPE colors AS ENUM ('red', 'green', 'blue');
//! CREATE TABLE accounts (
//!     id          bigserial PRIMARY KEY,
//!     name        varchar(50) NOT NULL,
//!     email       varchar(50) NOT NULL UNIQUE,
//!     active      boolean NOT NULL,
//!     fav_color   colors,
//!     fav_numbers int[],
//!     properties  jsonb,
//!     created_at  timestamptz NOT NULL
//! );
//! ```

use crate::array::PgArray;
use crate::client::GenericClient;
use crate::error::DbResult;
use crate::log::SqlLog;
use crate::predicate::{self, AccountFilter};
use crate::query::{Query, query};
use crate::row::{FromRow, RowExt};
use bytes::BytesMut;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type};

/// Base statement; dynamic predicates are appended to it.
pub const SELECT_ACCOUNTS: &str = "SELECT id, name, email, active, fav_color, fav_numbers, properties, created_at FROM accounts";

pub const SELECT_ACCOUNT_BY_ID: &str = "SELECT id, name, email, active, fav_color, fav_numbers, properties, created_at FROM accounts WHERE id = $1";

pub const SELECT_ALL_ACCOUNTS: &str = "SELECT id, name, email, active, fav_color, fav_numbers, properties, created_at FROM accounts ORDER BY id";

/// A label of the `colors` enum. Also reads from and binds to text columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(pub String);

impl Color {
    pub const PG_TYPE: &'static str = "colors";

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Color {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

fn color_accepts(ty: &Type) -> bool {
    (matches!(ty.kind(), Kind::Enum(_)) && ty.name() == Color::PG_TYPE)
        || *ty == Type::TEXT
        || *ty == Type::VARCHAR
}

impl ToSql for Color {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        self.0.as_str().to_sql(ty, out)
    }

    fn accepts(ty: &Type) -> bool {
        color_accepts(ty)
    }

    tokio_postgres::types::to_sql_checked!();
}

impl<'a> FromSql<'a> for Color {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        let s = <&str as FromSql>::from_sql(ty, raw)?;
        Ok(Self(s.to_string()))
    }

    fn accepts(ty: &Type) -> bool {
        color_accepts(ty)
    }
}

/// One row of `accounts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub active: bool,
    pub fav_color: Option<Color>,
    /// NULL and `{}` both scan as empty.
    pub fav_numbers: PgArray<i32>,
    pub properties: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl FromRow for Account {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            name: row.try_get_column("name")?,
            email: row.try_get_column("email")?,
            active: row.try_get_column("active")?,
            fav_color: row.try_get_column("fav_color")?,
            fav_numbers: row.try_get_column("fav_numbers")?,
            properties: row.try_get_column("properties")?,
            created_at: row.try_get_column("created_at")?,
        })
    }
}

struct OrNil<'a, T>(Option<&'a T>);

impl<T: fmt::Display> fmt::Display for OrNil<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => v.fmt(f),
            None => f.write_str("<nil>"),
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fav_numbers = (!self.fav_numbers.is_empty()).then_some(&self.fav_numbers);
        writeln!(f, "Account:")?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Email: {}", self.email)?;
        writeln!(f, "Active: {}", self.active)?;
        writeln!(f, "FavColor: {}", OrNil(self.fav_color.as_ref()))?;
        writeln!(f, "FavNumbers: {}", OrNil(fav_numbers))?;
        writeln!(f, "Properties: {}", OrNil(self.properties.as_ref()))?;
        write!(f, "CreatedAt: {}", self.created_at)
    }
}

/// Runs the three account queries on any [`GenericClient`].
///
/// ```ignore
/// let dao = AccountDao::new(&client);
/// let jane = dao.select_by_id(1).await?;
/// let matching = dao
///     .select_by_filter(&AccountFilter::new().names(["Jane", "John"]))
///     .await?;
/// ```
pub struct AccountDao<'c, C: GenericClient> {
    client: &'c C,
    log: SqlLog,
}

impl<'c, C: GenericClient> AccountDao<'c, C> {
    pub fn new(client: &'c C) -> Self {
        Self {
            client,
            log: SqlLog::default(),
        }
    }

    /// Override the SQL log settings used for every statement.
    pub fn with_log(mut self, log: SqlLog) -> Self {
        self.log = log;
        self
    }

    /// `None` when no account has this id.
    pub async fn select_by_id(&self, id: i64) -> DbResult<Option<Account>> {
        query(SELECT_ACCOUNT_BY_ID)
            .bind(id)
            .tag("accounts.select_by_id")
            .log(self.log.clone())
            .fetch_opt_as(self.client)
            .await
    }

    pub async fn select_all(&self) -> DbResult<Vec<Account>> {
        query(SELECT_ALL_ACCOUNTS)
            .tag("accounts.select_all")
            .log(self.log.clone())
            .fetch_all_as(self.client)
            .await
    }

    pub async fn select_by_filter(&self, filter: &AccountFilter) -> DbResult<Vec<Account>> {
        let result = predicate::build(filter);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "pgfilter.sql",
            conditions = ?result.conditions(),
            arguments = ?result.arguments(),
            "dynamic account filter"
        );

        result
            .compose(SELECT_ACCOUNTS)
            .tag("accounts.select_by_filter")
            .log(self.log.clone())
            .fetch_all_as(self.client)
            .await
    }

    /// The statement [`select_by_filter`](Self::select_by_filter) would run.
    pub fn filter_query(filter: &AccountFilter) -> Query {
        predicate::build(filter).compose(SELECT_ACCOUNTS)
    }
}
