use crate::{RecipeInput, repository, validate};

impl super::Command {
    /// Applies present scalar fields and replaces both associations. Returns the
    /// previous image path when a new image replaced it.
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        input: RecipeInput,
    ) -> foodgram_shared::Result<Option<String>> {
        let recipe = self.owned(user_id, id).await?;

        let input = validate::normalize(input);
        validate::validate_input(&input, false)?;

        let (Some(ingredients), Some(tags)) = (input.ingredients, input.tags) else {
            foodgram_shared::bail!("Ingredients and tags are required.");
        };

        self.check_references(&ingredients, &tags).await?;

        let replaced_image = match (&input.image, recipe.image) {
            (Some(new), Some(old)) if *new != old => Some(old),
            _ => None,
        };

        let mut tx = self.write_db.begin().await?;

        repository::update(
            &mut *tx,
            id,
            repository::UpdateInput {
                name: input.name,
                text: input.text,
                image: input.image,
                cooking_time: input.cooking_time,
            },
        )
        .await?;

        repository::replace_ingredients(&mut *tx, id, &ingredients).await?;
        repository::replace_tags(&mut *tx, id, &tags).await?;

        tx.commit().await?;

        tracing::info!(recipe = id, author = user_id, "recipe updated");

        Ok(replaced_image)
    }
}
