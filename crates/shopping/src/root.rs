use std::ops::Deref;

use foodgram_db::table::{Recipe, ShoppingList};
use foodgram_shared::{Error, toggle::Link};
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;

pub const LINK: Link<ShoppingList> = Link {
    table: ShoppingList::Table,
    owner: ShoppingList::UserId,
    target: ShoppingList::RecipeId,
    created_at: ShoppingList::CreatedAt,
};

#[derive(Clone)]
pub struct Command(pub foodgram_shared::State);

impl Deref for Command {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self(state)
    }

    pub async fn add(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<()> {
        self.ensure_recipe(recipe_id).await?;
        LINK.add(&self.write_db, user_id, recipe_id).await?;

        tracing::info!(user = user_id, recipe = recipe_id, "added to shopping list");

        Ok(())
    }

    pub async fn remove(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<()> {
        self.ensure_recipe(recipe_id).await?;
        LINK.remove(&self.write_db, user_id, recipe_id).await?;

        tracing::info!(user = user_id, recipe = recipe_id, "removed from shopping list");

        Ok(())
    }

    async fn ensure_recipe(&self, recipe_id: i64) -> foodgram_shared::Result<()> {
        let statement = Query::select()
            .column(Recipe::Id)
            .from(Recipe::Table)
            .and_where(Expr::col(Recipe::Id).eq(recipe_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let found = sqlx::query_with(&sql, values)
            .fetch_optional(&self.read_db)
            .await?;

        if found.is_none() {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
