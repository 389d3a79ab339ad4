//! Two-state (present/absent) relationship between an owner and a target,
//! shared by follows, favorites and shopping-list entries.

use sea_query::{Expr, ExprTrait, Iden, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::SqlitePool;

use crate::{Error, Result};

pub const ALREADY_EXISTS: &str = "Record already exists.";
pub const DOES_NOT_EXIST: &str = "Record does not exist.";

#[derive(Clone, Copy)]
pub struct Link<T> {
    pub table: T,
    pub owner: T,
    pub target: T,
    pub created_at: T,
}

impl<T> Link<T>
where
    T: Iden + Copy + Send + Sync + 'static,
{
    pub async fn exists(&self, pool: &SqlitePool, owner: i64, target: i64) -> Result<bool> {
        let statement = Query::select()
            .column(self.owner)
            .from(self.table)
            .and_where(Expr::col(self.owner).eq(owner))
            .and_where(Expr::col(self.target).eq(target))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_with(&sql, values)
            .fetch_optional(pool)
            .await?
            .is_some())
    }

    /// Inserts the pair. The primary key on (owner, target) turns a concurrent
    /// duplicate into a conflict as well, and a target deleted meanwhile is a
    /// not-found.
    pub async fn add(&self, pool: &SqlitePool, owner: i64, target: i64) -> Result<()> {
        let statement = Query::insert()
            .into_table(self.table)
            .columns([self.owner, self.target, self.created_at])
            .values_panic([owner.into(), target.into(), crate::now().into()])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(pool).await {
            Ok(_) => Ok(()),
            Err(err) if crate::is_unique_violation(&err) => {
                Err(Error::Conflict(ALREADY_EXISTS.to_owned()))
            }
            Err(err) if crate::is_foreign_key_violation(&err) => Err(Error::NotFound),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn remove(&self, pool: &SqlitePool, owner: i64, target: i64) -> Result<()> {
        let statement = Query::delete()
            .from_table(self.table)
            .and_where(Expr::col(self.owner).eq(owner))
            .and_where(Expr::col(self.target).eq(target))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(pool).await?;

        if result.rows_affected() == 0 {
            return Err(Error::Conflict(DOES_NOT_EXIST.to_owned()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_query::Iden;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    #[derive(Iden, Clone, Copy)]
    enum Pin {
        Table,
        UserId,
        ItemId,
        CreatedAt,
    }

    const PIN: Link<Pin> = Link {
        table: Pin::Table,
        owner: Pin::UserId,
        target: Pin::ItemId,
        created_at: Pin::CreatedAt,
    };

    async fn pool() -> anyhow::Result<SqlitePool> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;
        sqlx::query("CREATE TABLE item (id INTEGER PRIMARY KEY)")
            .execute(&pool)
            .await?;
        sqlx::query("INSERT INTO item (id) VALUES (2), (3)")
            .execute(&pool)
            .await?;
        sqlx::query(
            "CREATE TABLE pin (user_id INTEGER NOT NULL, \
             item_id INTEGER NOT NULL REFERENCES item (id) ON DELETE CASCADE, \
             created_at INTEGER NOT NULL, PRIMARY KEY (user_id, item_id))",
        )
        .execute(&pool)
        .await?;

        Ok(pool)
    }

    #[tokio::test]
    async fn add_twice_is_a_conflict() -> anyhow::Result<()> {
        let pool = pool().await?;

        PIN.add(&pool, 1, 2).await?;
        assert!(PIN.exists(&pool, 1, 2).await?);
        assert!(!PIN.exists(&pool, 2, 1).await?);

        let err = PIN.add(&pool, 1, 2).await.unwrap_err();
        assert_eq!(err.to_string(), ALREADY_EXISTS);

        PIN.add(&pool, 1, 3).await?;

        Ok(())
    }

    #[tokio::test]
    async fn remove_absent_is_a_conflict() -> anyhow::Result<()> {
        let pool = pool().await?;

        PIN.add(&pool, 1, 2).await?;
        PIN.remove(&pool, 1, 2).await?;
        assert!(!PIN.exists(&pool, 1, 2).await?);

        let err = PIN.remove(&pool, 1, 2).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(err.to_string(), DOES_NOT_EXIST);

        Ok(())
    }

    #[tokio::test]
    async fn add_for_vanished_target_is_not_found() -> anyhow::Result<()> {
        let pool = pool().await?;

        sqlx::query("DELETE FROM item WHERE id = 3")
            .execute(&pool)
            .await?;

        let err = PIN.add(&pool, 1, 3).await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
        assert!(!PIN.exists(&pool, 1, 3).await?);

        Ok(())
    }
}
