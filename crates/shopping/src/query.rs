use std::ops::Deref;

use foodgram_db::table::{Ingredient, RecipeIngredient, ShoppingList, User};
use foodgram_shared::Error;
use sea_query::{Expr, ExprTrait, Query as Select, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

use crate::aggregation::{self, AggregatedIngredient};

#[derive(Clone)]
pub struct Query(pub foodgram_shared::State);

impl Deref for Query {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Query {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self(state)
    }

    /// Ingredient lines of every recipe in the user's shopping list, summed
    /// per (name, unit).
    pub async fn ingredients(
        &self,
        user_id: i64,
    ) -> foodgram_shared::Result<Vec<AggregatedIngredient>> {
        let statement = Select::select()
            .columns([
                (Ingredient::Table, Ingredient::Name),
                (Ingredient::Table, Ingredient::MeasurementUnit),
            ])
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(ShoppingList::Table)
            .inner_join(
                RecipeIngredient::Table,
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId))
                    .equals((ShoppingList::Table, ShoppingList::RecipeId)),
            )
            .inner_join(
                Ingredient::Table,
                Expr::col((Ingredient::Table, Ingredient::Id))
                    .equals((RecipeIngredient::Table, RecipeIngredient::IngredientId)),
            )
            .and_where(Expr::col((ShoppingList::Table, ShoppingList::UserId)).eq(user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (String, String, i64), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(aggregation::aggregate(rows.into_iter().map(
            |(name, unit, amount)| (name, unit, Ord::max(amount, 0) as u64),
        )))
    }

    /// Plain-text shopping list for `user_id`.
    pub async fn build(&self, user_id: i64) -> foodgram_shared::Result<String> {
        let statement = Select::select()
            .column(User::Username)
            .from(User::Table)
            .and_where(Expr::col(User::Id).eq(user_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(username) = sqlx::query_scalar_with::<_, String, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
        else {
            return Err(Error::NotFound);
        };

        let items = self.ingredients(user_id).await?;

        Ok(aggregation::render(&username, &items))
    }
}
