use std::ops::Deref;

use foodgram_db::table::{Follow, User};
use foodgram_shared::{Page, Pagination, user::Role};
use sea_query::{
    Alias, Expr, ExprTrait, Order, Query as Select, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

#[derive(Clone)]
pub struct Query(pub foodgram_shared::State);

impl Deref for Query {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserView {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

/// What the auth layer needs to accept or reject a token.
#[derive(Debug, FromRow)]
pub struct AuthRow {
    pub id: i64,
    pub username: String,
    pub role: sqlx::types::Text<Role>,
    pub token_version: i64,
}

impl AuthRow {
    pub fn is_admin(&self) -> bool {
        self.role.0 == Role::Admin
    }
}

/// `EXISTS (follow viewer -> user.id)`, constant false for anonymous viewers.
fn is_subscribed_expr(viewer: Option<i64>) -> Expr {
    let Some(viewer) = viewer else {
        return Expr::val(false);
    };

    Expr::exists(
        Select::select()
            .expr(Expr::val(1))
            .from(Follow::Table)
            .and_where(Expr::col((Follow::Table, Follow::UserId)).eq(viewer))
            .and_where(
                Expr::col((Follow::Table, Follow::AuthorId)).equals((User::Table, User::Id)),
            )
            .to_owned(),
    )
}

fn view_statement(viewer: Option<i64>) -> SelectStatement {
    Select::select()
        .columns([
            (User::Table, User::Email),
            (User::Table, User::Id),
            (User::Table, User::Username),
            (User::Table, User::FirstName),
            (User::Table, User::LastName),
        ])
        .expr_as(is_subscribed_expr(viewer), Alias::new("is_subscribed"))
        .from(User::Table)
        .to_owned()
}

impl Query {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self(state)
    }

    pub async fn find(
        &self,
        viewer: Option<i64>,
        id: i64,
    ) -> foodgram_shared::Result<Option<UserView>> {
        let statement = view_statement(viewer)
            .and_where(Expr::col((User::Table, User::Id)).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, UserView, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    /// Batch lookup keyed by id, used to embed authors in recipe listings.
    pub async fn find_many(
        &self,
        viewer: Option<i64>,
        ids: &[i64],
    ) -> foodgram_shared::Result<Vec<UserView>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let statement = view_statement(viewer)
            .and_where(Expr::col((User::Table, User::Id)).is_in(ids.iter().copied()))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, UserView, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn list(
        &self,
        viewer: Option<i64>,
        pagination: Pagination,
    ) -> foodgram_shared::Result<Page<UserView>> {
        let statement = Select::select()
            .expr(Expr::cust("COUNT(*)"))
            .from(User::Table)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(&self.read_db)
            .await? as u64;

        pagination.check(count)?;

        let statement = view_statement(viewer)
            .order_by_expr(Expr::col((User::Table, User::Id)), Order::Asc)
            .limit(pagination.limit)
            .offset(pagination.offset())
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let results = sqlx::query_as_with::<_, UserView, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(Page { count, results })
    }

    pub async fn find_auth(&self, id: i64) -> foodgram_shared::Result<Option<AuthRow>> {
        let statement = Select::select()
            .columns([User::Id, User::Username, User::Role, User::TokenVersion])
            .from(User::Table)
            .and_where(Expr::col(User::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, AuthRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }
}
