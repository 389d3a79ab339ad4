use crate::{RecipeInput, repository, validate};

impl super::Command {
    #[tracing::instrument(skip(self, input))]
    pub async fn create(
        &self,
        author_id: i64,
        input: RecipeInput,
    ) -> foodgram_shared::Result<i64> {
        let input = validate::normalize(input);
        validate::validate_input(&input, true)?;

        let RecipeInput {
            name: Some(name),
            text: Some(text),
            cooking_time: Some(cooking_time),
            image: Some(image),
            ingredients: Some(ingredients),
            tags: Some(tags),
        } = input
        else {
            foodgram_shared::bail!("Incomplete recipe.");
        };

        self.check_references(&ingredients, &tags).await?;

        let mut tx = self.write_db.begin().await?;

        let id = repository::create(
            &mut *tx,
            repository::CreateInput {
                author_id,
                name,
                text,
                image,
                cooking_time,
            },
        )
        .await?;

        repository::replace_ingredients(&mut *tx, id, &ingredients).await?;
        repository::replace_tags(&mut *tx, id, &tags).await?;

        tx.commit().await?;

        tracing::info!(recipe = id, author = author_id, "recipe created");

        Ok(id)
    }
}
