use foodgram_db::table::{Follow, User};
use foodgram_shared::{Page, Pagination};
use sea_query::{Alias, Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::UserView;

impl crate::Query {
    /// Authors followed by `user_id`, most recent follow first.
    pub async fn subscriptions(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> foodgram_shared::Result<Page<UserView>> {
        let statement = Query::select()
            .expr(Expr::cust("COUNT(*)"))
            .from(Follow::Table)
            .and_where(Expr::col(Follow::UserId).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(&self.read_db)
            .await? as u64;

        pagination.check(count)?;

        let statement = Query::select()
            .columns([
                (User::Table, User::Email),
                (User::Table, User::Id),
                (User::Table, User::Username),
                (User::Table, User::FirstName),
                (User::Table, User::LastName),
            ])
            .expr_as(Expr::val(true), Alias::new("is_subscribed"))
            .from(Follow::Table)
            .inner_join(
                User::Table,
                Expr::col((User::Table, User::Id)).equals((Follow::Table, Follow::AuthorId)),
            )
            .and_where(Expr::col((Follow::Table, Follow::UserId)).eq(user_id))
            .order_by_expr(Expr::col((Follow::Table, Follow::CreatedAt)), Order::Desc)
            .order_by_expr(Expr::col((Follow::Table, Alias::new("rowid"))), Order::Desc)
            .limit(pagination.limit)
            .offset(pagination.offset())
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let results = sqlx::query_as_with::<_, UserView, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(Page { count, results })
    }
}
