use std::ops::Deref;

use foodgram_db::table::Ingredient;
use sea_query::{
    Expr, ExprTrait, LikeExpr, OnConflict, Order, Query as Select, SqliteQueryBuilder,
};
use sea_query_sqlx::SqlxBinder;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct IngredientView {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
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
    /// Ingredients whose name starts with `search`, ordered by name.
    pub async fn search(
        &self,
        search: Option<&str>,
    ) -> foodgram_shared::Result<Vec<IngredientView>> {
        let mut statement = Select::select()
            .columns([Ingredient::Id, Ingredient::Name, Ingredient::MeasurementUnit])
            .from(Ingredient::Table)
            .order_by_expr(Expr::col(Ingredient::Name), Order::Asc)
            .order_by_expr(Expr::col(Ingredient::MeasurementUnit), Order::Asc)
            .to_owned();

        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            let escaped = search
                .replace('!', "!!")
                .replace('%', "!%")
                .replace('_', "!_");

            let pattern = LikeExpr::new(format!("{escaped}%")).escape('!');
            statement.and_where(Expr::col(Ingredient::Name).like(pattern));
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientView, _>(&sql, values)
            .fetch_all(&self.read_db)
            .await?)
    }

    pub async fn find(&self, id: i64) -> foodgram_shared::Result<Option<IngredientView>> {
        let statement = Select::select()
            .columns([Ingredient::Id, Ingredient::Name, Ingredient::MeasurementUnit])
            .from(Ingredient::Table)
            .and_where(Expr::col(Ingredient::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, IngredientView, _>(&sql, values)
            .fetch_optional(&self.read_db)
            .await?)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ImportInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 200))]
    pub measurement_unit: String,
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
    /// Bulk load; pairs already present are skipped. Returns the number of new rows.
    pub async fn import(&self, input: Vec<ImportInput>) -> foodgram_shared::Result<u64> {
        for item in input.iter() {
            item.validate()?;
        }

        let mut tx = self.write_db.begin().await?;
        let mut imported = 0;

        for chunk in input.chunks(200) {
            let mut statement = sea_query::Query::insert()
                .into_table(Ingredient::Table)
                .columns([Ingredient::Name, Ingredient::MeasurementUnit])
                .on_conflict(
                    OnConflict::columns([Ingredient::Name, Ingredient::MeasurementUnit])
                        .do_nothing()
                        .to_owned(),
                )
                .to_owned();

            for item in chunk {
                statement.values_panic([
                    item.name.trim().into(),
                    item.measurement_unit.trim().into(),
                ]);
            }

            let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
            imported += sqlx::query_with(&sql, values)
                .execute(&mut *tx)
                .await?
                .rows_affected();
        }

        tx.commit().await?;

        tracing::info!(imported, total = input.len(), "ingredients imported");

        Ok(imported)
    }
}
