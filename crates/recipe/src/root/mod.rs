use std::ops::Deref;

use foodgram_shared::Error;
use serde::Deserialize;
use validator::Validate;

use crate::repository;

mod create;
mod delete;
mod update;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IngredientAmount {
    pub id: i64,
    pub amount: i64,
}

/// Write payload shared by create and update. The image is the media path of
/// an already stored file.
#[derive(Debug, Default, Clone, Validate)]
pub struct RecipeInput {
    #[validate(length(max = 72))]
    pub name: Option<String>,
    pub text: Option<String>,
    #[validate(range(min = 1, max = 32767))]
    pub cooking_time: Option<i64>,
    #[validate(length(min = 1, max = 255))]
    pub image: Option<String>,
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub tags: Option<Vec<i64>>,
}

#[derive(Clone)]
pub struct Command {
    state: foodgram_shared::State,
    pub favorite: crate::favorite::Command,
}

impl Deref for Command {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self {
            favorite: crate::favorite::Command(state.clone()),
            state,
        }
    }

    /// Storage-backed checks: unknown ingredients are a not-found, unknown
    /// tags a field error.
    async fn check_references(
        &self,
        ingredients: &[IngredientAmount],
        tags: &[i64],
    ) -> foodgram_shared::Result<()> {
        let ids = ingredients.iter().map(|i| i.id).collect::<Vec<_>>();
        if !repository::missing_ingredients(&self.read_db, &ids)
            .await?
            .is_empty()
        {
            return Err(Error::NotFound);
        }

        if let Some(id) = repository::missing_tags(&self.read_db, tags)
            .await?
            .first()
        {
            return Err(Error::field(
                "tags",
                "does_not_exist",
                format!("Invalid pk \"{id}\" - object does not exist."),
            ));
        }

        Ok(())
    }

    /// Loads the recipe and checks that `user_id` may change it.
    async fn owned(
        &self,
        user_id: i64,
        id: i64,
    ) -> foodgram_shared::Result<repository::RecipeRef> {
        let Some(recipe) = repository::find(&self.read_db, id).await? else {
            return Err(Error::NotFound);
        };

        if recipe.author_id != user_id {
            return Err(Error::Forbidden);
        }

        Ok(recipe)
    }
}
