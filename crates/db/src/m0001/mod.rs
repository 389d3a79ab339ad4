mod favorite_recipe;
mod follow;
mod ingredient;
mod recipe;
mod recipe_ingredient;
mod recipe_tag;
mod shopping_list;
mod tag;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "foodgram",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        user::CreateUk2,
        follow::CreateTable,
        follow::CreateIdx1,
        tag::CreateTable,
        ingredient::CreateTable,
        ingredient::CreateUk1,
        recipe::CreateTable,
        recipe::CreateIdx1,
        recipe_ingredient::CreateTable,
        recipe_tag::CreateTable,
        favorite_recipe::CreateTable,
        shopping_list::CreateTable
    ]
);
