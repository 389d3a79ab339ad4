use std::{collections::HashMap, ops::Deref};

use foodgram_db::table::{
    FavoriteRecipe, Ingredient, Recipe as RecipeTable, RecipeIngredient, RecipeTag, ShoppingList,
    Tag,
};
use foodgram_shared::{Page, Pagination};
use sea_query::{
    Alias, Expr, ExprTrait, Order, Query as Select, SelectStatement, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;

use crate::tag::TagView;

#[derive(Clone)]
pub struct Query(pub foodgram_shared::State);

impl Deref for Query {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub id: i64,
    pub author_id: i64,
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i64,
    pub is_favorited: bool,
    pub is_in_shopping_list: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct RecipeShort {
    pub id: i64,
    pub name: String,
    pub image: Option<String>,
    pub cooking_time: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct RecipeIngredientView {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

#[derive(Debug, Clone)]
pub struct Recipe {
    pub row: RecipeRow,
    pub tags: Vec<TagView>,
    pub ingredients: Vec<RecipeIngredientView>,
}

#[derive(Debug, Default, Clone)]
pub struct Filter {
    pub author: Option<i64>,
    /// Tag slugs; a recipe matches when it carries any of them.
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_list: bool,
}

fn flag_expr<T>(viewer: Option<i64>, table: T, owner: T, target: T) -> Expr
where
    T: sea_query::Iden + Copy + Send + Sync + 'static,
{
    let Some(viewer) = viewer else {
        return Expr::val(false);
    };

    Expr::exists(
        Select::select()
            .expr(Expr::val(1))
            .from(table)
            .and_where(Expr::col((table, owner)).eq(viewer))
            .and_where(
                Expr::col((table, target)).equals((RecipeTable::Table, RecipeTable::Id)),
            )
            .to_owned(),
    )
}

fn favorited_expr(viewer: Option<i64>) -> Expr {
    flag_expr(
        viewer,
        FavoriteRecipe::Table,
        FavoriteRecipe::UserId,
        FavoriteRecipe::RecipeId,
    )
}

fn in_shopping_list_expr(viewer: Option<i64>) -> Expr {
    flag_expr(
        viewer,
        ShoppingList::Table,
        ShoppingList::UserId,
        ShoppingList::RecipeId,
    )
}

fn row_statement(viewer: Option<i64>) -> SelectStatement {
    Select::select()
        .columns([
            (RecipeTable::Table, RecipeTable::Id),
            (RecipeTable::Table, RecipeTable::AuthorId),
            (RecipeTable::Table, RecipeTable::Name),
            (RecipeTable::Table, RecipeTable::Text),
            (RecipeTable::Table, RecipeTable::Image),
            (RecipeTable::Table, RecipeTable::CookingTime),
        ])
        .expr_as(favorited_expr(viewer), Alias::new("is_favorited"))
        .expr_as(in_shopping_list_expr(viewer), Alias::new("is_in_shopping_list"))
        .from(RecipeTable::Table)
        .to_owned()
}

fn apply_filter(statement: &mut SelectStatement, viewer: Option<i64>, filter: &Filter) {
    if let Some(author) = filter.author {
        statement.and_where(Expr::col((RecipeTable::Table, RecipeTable::AuthorId)).eq(author));
    }

    if !filter.tags.is_empty() {
        statement.and_where(Expr::exists(
            Select::select()
                .expr(Expr::val(1))
                .from(RecipeTag::Table)
                .inner_join(
                    Tag::Table,
                    Expr::col((Tag::Table, Tag::Id))
                        .equals((RecipeTag::Table, RecipeTag::TagId)),
                )
                .and_where(
                    Expr::col((RecipeTag::Table, RecipeTag::RecipeId))
                        .equals((RecipeTable::Table, RecipeTable::Id)),
                )
                .and_where(
                    Expr::col((Tag::Table, Tag::Slug)).is_in(filter.tags.iter().cloned()),
                )
                .to_owned(),
        ));
    }

    if filter.is_favorited {
        statement.and_where(favorited_expr(viewer));
    }

    if filter.is_in_shopping_list {
        statement.and_where(in_shopping_list_expr(viewer));
    }
}

impl Query {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self(state)
    }

    /// Newest first. Flag filters match nothing for anonymous viewers.
    pub async fn list(
        &self,
        viewer: Option<i64>,
        filter: &Filter,
        pagination: Pagination,
    ) -> foodgram_shared::Result<Page<Recipe>> {
        if viewer.is_none() && (filter.is_favorited || filter.is_in_shopping_list) {
            pagination.check(0)?;

            return Ok(Page {
                count: 0,
                results: vec![],
            });
        }

        let mut statement = Select::select()
            .expr(Expr::cust("COUNT(*)"))
            .from(RecipeTable::Table)
            .to_owned();
        apply_filter(&mut statement, viewer, filter);

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let count = sqlx::query_scalar_with::<_, i64, _>(&sql, values)
            .fetch_one(&self.read_db)
            .await? as u64;

        pagination.check(count)?;

        let mut statement = row_statement(viewer);
        apply_filter(&mut statement, viewer, filter);
        statement
            .order_by_expr(
                Expr::col((RecipeTable::Table, RecipeTable::CreatedAt)),
                Order::Desc,
            )
            .order_by_expr(Expr::col((RecipeTable::Table, RecipeTable::Id)), Order::Desc)
            .limit(pagination.limit)
            .offset(pagination.offset());

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let results = self.load_relations(rows).await?;

        Ok(Page { count, results })
    }

    pub async fn find(
        &self,
        viewer: Option<i64>,
        id: i64,
    ) -> foodgram_shared::Result<Option<Recipe>> {
        let statement = row_statement(viewer)
            .and_where(Expr::col((RecipeTable::Table, RecipeTable::Id)).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(row) = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.load_relations(vec![row]).await?.pop())
    }

    pub async fn find_short(&self, id: i64) -> foodgram_shared::Result<Option<RecipeShort>> {
        let statement = Select::select()
            .columns([
                RecipeTable::Id,
                RecipeTable::Name,
                RecipeTable::Image,
                RecipeTable::CookingTime,
            ])
            .from(RecipeTable::Table)
            .and_where(Expr::col(RecipeTable::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, RecipeShort, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    /// Short recipes of each author, newest first, at most `limit` per author.
    pub async fn by_authors(
        &self,
        author_ids: &[i64],
        limit: Option<u64>,
    ) -> foodgram_shared::Result<HashMap<i64, Vec<RecipeShort>>> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let statement = Select::select()
            .columns([
                RecipeTable::AuthorId,
                RecipeTable::Id,
                RecipeTable::Name,
                RecipeTable::Image,
                RecipeTable::CookingTime,
            ])
            .from(RecipeTable::Table)
            .and_where(Expr::col(RecipeTable::AuthorId).is_in(author_ids.iter().copied()))
            .order_by_expr(Expr::col(RecipeTable::CreatedAt), Order::Desc)
            .order_by_expr(Expr::col(RecipeTable::Id), Order::Desc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows =
            sqlx::query_as_with::<_, (i64, i64, String, Option<String>, i64), _>(&sql, values)
                .fetch_all(&self.read_db)
                .await?;

        let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);
        let mut recipes: HashMap<i64, Vec<RecipeShort>> = HashMap::new();
        for (author_id, id, name, image, cooking_time) in rows {
            let entry = recipes.entry(author_id).or_default();
            if entry.len() < limit {
                entry.push(RecipeShort {
                    id,
                    name,
                    image,
                    cooking_time,
                });
            }
        }

        Ok(recipes)
    }

    pub async fn count_by_authors(
        &self,
        author_ids: &[i64],
    ) -> foodgram_shared::Result<HashMap<i64, u64>> {
        if author_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let statement = Select::select()
            .column(RecipeTable::AuthorId)
            .expr(Expr::cust("COUNT(*)"))
            .from(RecipeTable::Table)
            .and_where(Expr::col(RecipeTable::AuthorId).is_in(author_ids.iter().copied()))
            .group_by_col(RecipeTable::AuthorId)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (i64, i64), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(author_id, count)| (author_id, count as u64))
            .collect())
    }

    /// Ingredient lines of each recipe, ordered by ingredient name.
    pub async fn ingredients_by_recipes(
        &self,
        recipe_ids: &[i64],
    ) -> foodgram_shared::Result<HashMap<i64, Vec<RecipeIngredientView>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let statement = Select::select()
            .column((RecipeIngredient::Table, RecipeIngredient::RecipeId))
            .columns([
                (Ingredient::Table, Ingredient::Id),
                (Ingredient::Table, Ingredient::Name),
                (Ingredient::Table, Ingredient::MeasurementUnit),
            ])
            .column((RecipeIngredient::Table, RecipeIngredient::Amount))
            .from(RecipeIngredient::Table)
            .inner_join(
                Ingredient::Table,
                Expr::col((Ingredient::Table, Ingredient::Id))
                    .equals((RecipeIngredient::Table, RecipeIngredient::IngredientId)),
            )
            .and_where(
                Expr::col((RecipeIngredient::Table, RecipeIngredient::RecipeId))
                    .is_in(recipe_ids.iter().copied()),
            )
            .order_by_expr(Expr::col((Ingredient::Table, Ingredient::Name)), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (i64, i64, String, String, i64), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut ingredients: HashMap<i64, Vec<RecipeIngredientView>> = HashMap::new();
        for (recipe_id, id, name, measurement_unit, amount) in rows {
            ingredients
                .entry(recipe_id)
                .or_default()
                .push(RecipeIngredientView {
                    id,
                    name,
                    measurement_unit,
                    amount,
                });
        }

        Ok(ingredients)
    }

    async fn load_relations(&self, rows: Vec<RecipeRow>) -> foodgram_shared::Result<Vec<Recipe>> {
        let ids = rows.iter().map(|r| r.id).collect::<Vec<_>>();
        let mut tags = crate::tag::Query(self.0.clone()).by_recipes(&ids).await?;
        let mut ingredients = self.ingredients_by_recipes(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| Recipe {
                tags: tags.remove(&row.id).unwrap_or_default(),
                ingredients: ingredients.remove(&row.id).unwrap_or_default(),
                row,
            })
            .collect())
    }
}
