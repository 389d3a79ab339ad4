use crate::repository;

impl super::Command {
    /// Removes the recipe and, through cascades, its ingredient, tag, favorite
    /// and shopping-list rows. Returns the image path for the caller to clean up.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, user_id: i64, id: i64) -> foodgram_shared::Result<Option<String>> {
        let recipe = self.owned(user_id, id).await?;

        repository::delete(&self.write_db, recipe.id).await?;

        tracing::info!(recipe = id, author = user_id, "recipe deleted");

        Ok(recipe.image)
    }
}
