use axum::{
    Router,
    routing::{get, post},
};
use sqlx::SqlitePool;
use tower_http::services::ServeDir;

use crate::{config::Config, media::MediaStorage};

mod auth;
mod health;
mod ingredients;
mod recipes;
mod tags;
mod users;
mod views;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub media: MediaStorage,
    pub pool: SqlitePool,
    pub user_command: foodgram_user::Command,
    pub user_query: foodgram_user::Query,
    pub recipe_command: foodgram_recipe::Command,
    pub recipe_query: foodgram_recipe::Query,
    pub tag_query: foodgram_recipe::tag::Query,
    pub ingredient_query: foodgram_recipe::ingredient::Query,
    pub shopping_command: foodgram_shopping::Command,
    pub shopping_query: foodgram_shopping::Query,
}

impl AppState {
    pub fn new(config: Config, state: foodgram_shared::State) -> anyhow::Result<Self> {
        let media = MediaStorage::new(
            &config.media.root,
            &config.server.base_url,
            &config.media.url_prefix,
        )?;

        Ok(Self {
            config,
            media,
            pool: state.read_db.clone(),
            user_command: foodgram_user::Command::new(state.clone()),
            user_query: foodgram_user::Query::new(state.clone()),
            recipe_command: foodgram_recipe::Command::new(state.clone()),
            recipe_query: foodgram_recipe::Query::new(state.clone()),
            tag_query: foodgram_recipe::tag::Query(state.clone()),
            ingredient_query: foodgram_recipe::ingredient::Query(state.clone()),
            shopping_command: foodgram_shopping::Command::new(state.clone()),
            shopping_query: foodgram_shopping::Query::new(state),
        })
    }
}

pub fn router(app_state: AppState) -> Router {
    let media_prefix = format!(
        "/{}",
        app_state.config.media.url_prefix.trim_matches('/')
    );
    let media = ServeDir::new(app_state.media.root());

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/api/auth/token/login/", post(auth::login))
        .route("/api/auth/token/logout/", post(auth::logout))
        .route("/api/users/", get(users::list).post(users::register))
        .route("/api/users/me/", get(users::me))
        .route("/api/users/set_password/", post(users::set_password))
        .route("/api/users/subscriptions/", get(users::subscriptions))
        .route("/api/users/{id}/", get(users::detail))
        .route(
            "/api/users/{id}/subscribe/",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .route("/api/tags/", get(tags::list))
        .route("/api/tags/{id}/", get(tags::detail))
        .route("/api/ingredients/", get(ingredients::list))
        .route("/api/ingredients/{id}/", get(ingredients::detail))
        .route("/api/recipes/", get(recipes::list).post(recipes::create))
        .route(
            "/api/recipes/download_shopping_list/",
            get(recipes::download_shopping_list),
        )
        .route(
            "/api/recipes/{id}/",
            get(recipes::detail)
                .patch(recipes::update)
                .put(recipes::update)
                .delete(recipes::delete),
        )
        .route(
            "/api/recipes/{id}/favorite/",
            post(recipes::favorite).delete(recipes::unfavorite),
        )
        .route(
            "/api/recipes/{id}/shopping_list/",
            post(recipes::add_to_shopping_list).delete(recipes::remove_from_shopping_list),
        )
        .nest_service(&media_prefix, media)
        .with_state(app_state)
}
