use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::Postgres;

/// A typed query parameter. `None` binds a SQL NULL of the right column type.
#[derive(Debug, Clone, PartialEq)]
pub enum Bind {
    Text(Option<String>),
    BigInt(Option<i64>),
    Date(Option<NaiveDate>),
    Decimal(Option<Decimal>),
}

impl Bind {
    /// True for the absent marker, whatever the column type
    pub fn is_absent(&self) -> bool {
        matches!(
            self,
            Bind::Text(None) | Bind::BigInt(None) | Bind::Date(None) | Bind::Decimal(None)
        )
    }

    pub fn bind_to<'q, T>(
        self,
        query: QueryAs<'q, Postgres, T, PgArguments>,
    ) -> QueryAs<'q, Postgres, T, PgArguments>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow>,
    {
        match self {
            Bind::Text(v) => query.bind(v),
            Bind::BigInt(v) => query.bind(v),
            Bind::Date(v) => query.bind(v),
            Bind::Decimal(v) => query.bind(v),
        }
    }
}

/// Ordered column assignments, used for both INSERT and partial UPDATE
pub type Assignments = Vec<(&'static str, Bind)>;

/// A built statement and the values to bind, in placeholder order
#[derive(Debug, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<Bind>,
}

impl Statement {
    pub fn query_as<T>(&self) -> QueryAs<'_, Postgres, T, PgArguments>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow>,
    {
        let mut query = sqlx::query_as::<_, T>(&self.sql);
        for bind in self.binds.iter().cloned() {
            query = bind.bind_to(query);
        }
        query
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

/// SQL for one table. Identifiers come from entity definitions, never from requests.
pub struct QueryBuilder {
    table: &'static str,
    columns: &'static [&'static str],
}

impl QueryBuilder {
    pub fn new(table: &'static str, columns: &'static [&'static str]) -> Self {
        Self { table, columns }
    }

    fn returning(&self) -> String {
        self.columns.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ")
    }

    pub fn insert(&self, assignments: Assignments) -> Statement {
        let (names, binds): (Vec<_>, Vec<_>) = assignments.into_iter().unzip();
        let columns = names.iter().map(|c| quote(c)).collect::<Vec<_>>().join(", ");
        let placeholders = (1..=binds.len())
            .map(|i| format!("${}", i))
            .collect::<Vec<_>>()
            .join(", ");

        Statement {
            sql: format!(
                "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
                quote(self.table),
                columns,
                placeholders,
                self.returning()
            ),
            binds,
        }
    }

    /// Partial update by id. Returns `None` when there is nothing to assign.
    pub fn update(&self, id: i64, assignments: Assignments) -> Option<Statement> {
        if assignments.is_empty() {
            return None;
        }

        let (names, mut binds): (Vec<_>, Vec<_>) = assignments.into_iter().unzip();
        let set_clause = names
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{} = ${}", quote(c), i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        binds.push(Bind::BigInt(Some(id)));

        Some(Statement {
            sql: format!(
                "UPDATE {} SET {}, \"updated_at\" = NOW() WHERE \"id\" = ${} RETURNING {}",
                quote(self.table),
                set_clause,
                binds.len(),
                self.returning()
            ),
            binds,
        })
    }

    pub fn select_by_id(&self, id: i64) -> Statement {
        Statement {
            sql: format!(
                "SELECT {} FROM {} WHERE \"id\" = $1",
                self.returning(),
                quote(self.table)
            ),
            binds: vec![Bind::BigInt(Some(id))],
        }
    }

    /// Select all rows, optionally filtered on one column, newest first
    pub fn select(&self, filter: Option<(&'static str, Bind)>) -> Statement {
        let mut sql = format!("SELECT {} FROM {}", self.returning(), quote(self.table));
        let mut binds = Vec::new();
        if let Some((column, value)) = filter {
            sql.push_str(&format!(" WHERE {} = $1", quote(column)));
            binds.push(value);
        }
        sql.push_str(" ORDER BY \"id\" DESC");
        Statement { sql, binds }
    }

    pub fn count(&self, filter: Option<(&'static str, Bind)>) -> Statement {
        let mut sql = format!("SELECT COUNT(*) AS count FROM {}", quote(self.table));
        let mut binds = Vec::new();
        if let Some((column, value)) = filter {
            sql.push_str(&format!(" WHERE {} = $1", quote(column)));
            binds.push(value);
        }
        Statement { sql, binds }
    }

    pub fn delete(&self, id: i64) -> Statement {
        Statement {
            sql: format!(
                "DELETE FROM {} WHERE \"id\" = $1 RETURNING {}",
                quote(self.table),
                self.returning()
            ),
            binds: vec![Bind::BigInt(Some(id))],
        }
    }
}
