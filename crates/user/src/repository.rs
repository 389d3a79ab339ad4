use foodgram_db::table::User;
use foodgram_shared::user::Role;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};

#[derive(FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: sqlx::types::Text<Role>,
    pub token_version: i64,
}

pub enum FindType {
    Id(i64),
    Email(String),
    Username(String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> foodgram_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([
            User::Id,
            User::Email,
            User::Username,
            User::Password,
            User::Role,
            User::TokenVersion,
        ])
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        FindType::Email(email) => {
            statement.and_where(Expr::col(User::Email).eq(email.to_lowercase()))
        }
        FindType::Username(username) => statement.and_where(Expr::col(User::Username).eq(username)),
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub(crate) struct CreateInput {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    input: CreateInput,
) -> Result<i64, sqlx::Error> {
    let statement = Query::insert()
        .into_table(User::Table)
        .columns([
            User::Email,
            User::Username,
            User::FirstName,
            User::LastName,
            User::Password,
            User::Role,
            User::TokenVersion,
            User::CreatedAt,
        ])
        .values_panic([
            input.email.into(),
            input.username.into(),
            input.first_name.into(),
            input.last_name.into(),
            input.password.into(),
            Role::User.to_string().into(),
            0.into(),
            foodgram_shared::now().into(),
        ])
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(result.last_insert_rowid())
}

#[derive(Default)]
pub struct UpdateInput {
    pub id: i64,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub bump_token_version: bool,
}

pub async fn update(pool: &SqlitePool, input: UpdateInput) -> foodgram_shared::Result<()> {
    let mut statement = Query::update()
        .table(User::Table)
        .and_where(Expr::col(User::Id).eq(input.id))
        .to_owned();

    if let Some(password) = input.password {
        statement.value(User::Password, password);
    }

    if let Some(role) = input.role {
        statement.value(User::Role, role.as_ref());
    }

    if input.bump_token_version {
        statement.value(User::TokenVersion, Expr::col(User::TokenVersion).add(1));
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let result = sqlx::query_with(&sql, values).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(foodgram_shared::Error::NotFound);
    }

    Ok(())
}
