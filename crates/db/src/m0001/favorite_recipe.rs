use sea_query::{
    ColumnDef, ForeignKey, ForeignKeyAction, Index, Table, TableCreateStatement,
    TableDropStatement,
};

use crate::table::{FavoriteRecipe, Recipe, User};

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(FavoriteRecipe::Table)
        .col(ColumnDef::new(FavoriteRecipe::UserId).integer().not_null())
        .col(ColumnDef::new(FavoriteRecipe::RecipeId).integer().not_null())
        .col(ColumnDef::new(FavoriteRecipe::CreatedAt).big_integer().not_null())
        .primary_key(
            Index::create()
                .col(FavoriteRecipe::UserId)
                .col(FavoriteRecipe::RecipeId),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_favorite_recipe_user")
                .from(FavoriteRecipe::Table, FavoriteRecipe::UserId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_favorite_recipe_recipe")
                .from(FavoriteRecipe::Table, FavoriteRecipe::RecipeId)
                .to(Recipe::Table, Recipe::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(FavoriteRecipe::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
