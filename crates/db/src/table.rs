use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum User {
    Table,
    Id,
    Email,
    Username,
    FirstName,
    LastName,
    Password,
    Role,
    TokenVersion,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Follow {
    Table,
    UserId,
    AuthorId,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Tag {
    Table,
    Id,
    Name,
    Color,
    Slug,
}

#[derive(Iden, Clone, Copy)]
pub enum Ingredient {
    Table,
    Id,
    Name,
    MeasurementUnit,
}

#[derive(Iden, Clone, Copy)]
pub enum Recipe {
    Table,
    Id,
    AuthorId,
    Name,
    Text,
    Image,
    CookingTime,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum RecipeIngredient {
    Table,
    RecipeId,
    IngredientId,
    Amount,
}

#[derive(Iden, Clone, Copy)]
pub enum RecipeTag {
    Table,
    RecipeId,
    TagId,
}

#[derive(Iden, Clone, Copy)]
pub enum FavoriteRecipe {
    Table,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum ShoppingList {
    Table,
    UserId,
    RecipeId,
    CreatedAt,
}
