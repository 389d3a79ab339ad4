use std::ops::Deref;

use foodgram_db::table::FavoriteRecipe;
use foodgram_shared::{Error, toggle::Link};

use crate::repository;

pub const LINK: Link<FavoriteRecipe> = Link {
    table: FavoriteRecipe::Table,
    owner: FavoriteRecipe::UserId,
    target: FavoriteRecipe::RecipeId,
    created_at: FavoriteRecipe::CreatedAt,
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
    pub async fn save(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<()> {
        if repository::find(&self.read_db, recipe_id).await?.is_none() {
            return Err(Error::NotFound);
        }

        LINK.add(&self.write_db, user_id, recipe_id).await?;

        tracing::info!(user = user_id, recipe = recipe_id, "recipe favorited");

        Ok(())
    }

    pub async fn unsave(&self, user_id: i64, recipe_id: i64) -> foodgram_shared::Result<()> {
        if repository::find(&self.read_db, recipe_id).await?.is_none() {
            return Err(Error::NotFound);
        }

        LINK.remove(&self.write_db, user_id, recipe_id).await?;

        tracing::info!(user = user_id, recipe = recipe_id, "recipe unfavorited");

        Ok(())
    }
}
