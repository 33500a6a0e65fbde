use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use sqlx::{postgres::PgRow, FromRow, PgExecutor, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::{Assignments, Bind, QueryBuilder};

/// Conversion of an input record into column assignments
pub trait IntoAssignments {
    fn into_assignments(self) -> Assignments;
}

/// A table-backed record type
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin + Serialize + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
    /// Human-readable name used in not-found messages
    const LABEL: &'static str;

    /// Input record, used whole for inserts and as a partial record for updates
    type Fields: IntoAssignments + DeserializeOwned + Send + 'static;
}

/// CRUD over one entity table, each call its own implicit transaction
pub struct Repository<T> {
    pool: PgPool,
    _phantom: PhantomData<T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _phantom: PhantomData,
        }
    }
}

/// Drop absent fields, leaving the assignments of a partial update
pub fn present_only(assignments: Assignments) -> Assignments {
    assignments
        .into_iter()
        .filter(|(_, bind)| !bind.is_absent())
        .collect()
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    fn builder() -> QueryBuilder {
        QueryBuilder::new(T::TABLE, T::COLUMNS)
    }

    fn not_found(id: i64) -> DatabaseError {
        DatabaseError::NotFound(format!("{} {} not found", T::LABEL, id))
    }

    pub async fn create(&self, fields: T::Fields) -> Result<T, DatabaseError> {
        Self::create_in(&self.pool, fields).await
    }

    /// Insert through any executor, e.g. an open transaction
    pub async fn create_in<'c, E>(executor: E, fields: T::Fields) -> Result<T, DatabaseError>
    where
        E: PgExecutor<'c>,
    {
        let stmt = Self::builder().insert(fields.into_assignments());
        let row = stmt.query_as::<T>().fetch_one(executor).await?;
        tracing::debug!(table = T::TABLE, "Inserted record");
        Ok(row)
    }

    pub async fn get(&self, id: i64) -> Result<T, DatabaseError> {
        let stmt = Self::builder().select_by_id(id);
        stmt.query_as::<T>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn list(&self) -> Result<Vec<T>, DatabaseError> {
        let stmt = Self::builder().select(None);
        Ok(stmt.query_as::<T>().fetch_all(&self.pool).await?)
    }

    pub async fn list_by(&self, column: &'static str, value: Bind) -> Result<Vec<T>, DatabaseError> {
        let stmt = Self::builder().select(Some((column, value)));
        Ok(stmt.query_as::<T>().fetch_all(&self.pool).await?)
    }

    pub async fn count(&self) -> Result<i64, DatabaseError> {
        let stmt = Self::builder().count(None);
        let (count,) = stmt.query_as::<(i64,)>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    pub async fn count_by(&self, column: &'static str, value: Bind) -> Result<i64, DatabaseError> {
        let stmt = Self::builder().count(Some((column, value)));
        let (count,) = stmt.query_as::<(i64,)>().fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Partial update: only fields present in `patch` are written. An empty
    /// patch writes nothing and returns the stored record untouched.
    pub async fn update(&self, id: i64, patch: T::Fields) -> Result<T, DatabaseError> {
        let Some(stmt) = Self::builder().update(id, present_only(patch.into_assignments())) else {
            tracing::debug!(table = T::TABLE, id, "No changes, skipping update");
            return self.get(id).await;
        };

        stmt.query_as::<T>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn delete(&self, id: i64) -> Result<T, DatabaseError> {
        let stmt = Self::builder().delete(id);
        stmt.query_as::<T>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Self::not_found(id))
    }
}
