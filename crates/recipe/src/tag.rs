use std::{collections::HashMap, ops::Deref, sync::LazyLock};

use foodgram_db::table::{RecipeTag, Tag};
use regex::Regex;
use sea_query::{Expr, ExprTrait, Order, Query as Select, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Serialize;
use sqlx::prelude::FromRow;
use validator::Validate;

static RE_COLOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());
static RE_SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct TagView {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Clone)]
pub struct Query(pub foodgram_shared::State);

impl Deref for Query {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Query {
    pub async fn list(&self) -> foodgram_shared::Result<Vec<TagView>> {
        let statement = Select::select()
            .columns([Tag::Id, Tag::Name, Tag::Color, Tag::Slug])
            .from(Tag::Table)
            .order_by_expr(Expr::col(Tag::Id), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, TagView, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn find(&self, id: i64) -> foodgram_shared::Result<Option<TagView>> {
        let statement = Select::select()
            .columns([Tag::Id, Tag::Name, Tag::Color, Tag::Slug])
            .from(Tag::Table)
            .and_where(Expr::col(Tag::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, TagView, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }

    /// Tags of each recipe, ordered by tag id.
    pub async fn by_recipes(
        &self,
        recipe_ids: &[i64],
    ) -> foodgram_shared::Result<HashMap<i64, Vec<TagView>>> {
        if recipe_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let statement = Select::select()
            .column((RecipeTag::Table, RecipeTag::RecipeId))
            .columns([
                (Tag::Table, Tag::Id),
                (Tag::Table, Tag::Name),
                (Tag::Table, Tag::Color),
                (Tag::Table, Tag::Slug),
            ])
            .from(RecipeTag::Table)
            .inner_join(
                Tag::Table,
                Expr::col((Tag::Table, Tag::Id)).equals((RecipeTag::Table, RecipeTag::TagId)),
            )
            .and_where(
                Expr::col((RecipeTag::Table, RecipeTag::RecipeId))
                    .is_in(recipe_ids.iter().copied()),
            )
            .order_by_expr(Expr::col((Tag::Table, Tag::Id)), Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, (i64, i64, String, String, String), _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?;

        let mut tags: HashMap<i64, Vec<TagView>> = HashMap::new();
        for (recipe_id, id, name, color, slug) in rows {
            tags.entry(recipe_id).or_default().push(TagView {
                id,
                name,
                color,
                slug,
            });
        }

        Ok(tags)
    }
}

#[derive(Validate)]
pub struct CreateInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(regex(path = *RE_COLOR, message = "Enter a valid hex color, e.g. #49B64E."))]
    pub color: String,
    #[validate(
        length(min = 1, max = 100),
        regex(path = *RE_SLUG, message = "Enter a valid slug.")
    )]
    pub slug: String,
}

#[derive(Clone)]
pub struct Command(pub foodgram_shared::State);

impl Deref for Command {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub async fn create(&self, input: CreateInput) -> foodgram_shared::Result<i64> {
        input.validate()?;

        let statement = sea_query::Query::insert()
            .into_table(Tag::Table)
            .columns([Tag::Name, Tag::Color, Tag::Slug])
            .values_panic([
                input.name.into(),
                input.color.to_uppercase().into(),
                input.slug.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values).execute(&self.write_db).await {
            Ok(result) => Ok(result.last_insert_rowid()),
            Err(err) if foodgram_shared::is_unique_violation(&err) => {
                foodgram_shared::bail!("A tag with that name, color or slug already exists.")
            }
            Err(err) => Err(err.into()),
        }
    }
}
