#![allow(dead_code)]

use std::{io::Cursor, path::PathBuf, str::FromStr};

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{HeaderMap, Method, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use foodgram::config::{
    Config, DatabaseConfig, JwtConfig, MediaConfig, ObservabilityConfig, PaginationConfig,
    ServerConfig,
};
use foodgram_recipe::{ingredient::ImportInput, tag};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;
use tower::ServiceExt;

pub const BASE_URL: &str = "http://localhost:8000";

pub struct TestApp {
    pub router: Router,
    pub state: foodgram_shared::State,
    pub media_root: PathBuf,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text).unwrap_or(Value::Null)
    }
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 8000,
            base_url: BASE_URL.to_owned(),
        },
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.child("db.sqlite3").display()),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            issuer: "foodgram".to_owned(),
            audience: "foodgram".to_owned(),
            expiration_days: 7,
        },
        media: MediaConfig {
            root: dir.child("media").display().to_string(),
            url_prefix: "/media/".to_owned(),
        },
        pagination: PaginationConfig {
            page_size: 6,
            max_page_size: 100,
        },
        observability: ObservabilityConfig::default(),
    }
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<foodgram_shared::State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    foodgram_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(foodgram_shared::State::new(pool))
}

pub async fn setup_test_app(dir: &TempDir) -> anyhow::Result<TestApp> {
    let config = test_config(dir);
    let state = setup_test_state(dir.child("db.sqlite3")).await?;
    let media_root = PathBuf::from(&config.media.root);

    let app_state = foodgram::AppState::new(config, state.clone())?;

    Ok(TestApp {
        router: foodgram::router(app_state),
        state,
        media_root,
    })
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await?.to_bytes();

        Ok(TestResponse {
            status,
            headers,
            text: String::from_utf8(bytes.to_vec())?,
        })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> anyhow::Result<TestResponse> {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> anyhow::Result<TestResponse> {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> anyhow::Result<TestResponse> {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Registers `name` through the API and returns its id.
    pub async fn register(&self, name: &str) -> anyhow::Result<i64> {
        let res = self
            .post(
                "/api/users/",
                None,
                json!({
                    "email": format!("{name}@foodgram.localhost"),
                    "username": name,
                    "first_name": "John",
                    "last_name": "Doe",
                    "password": "my_password",
                }),
            )
            .await?;

        assert_eq!(res.status, StatusCode::CREATED, "{}", res.text);

        res.json()["id"]
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("missing id in {}", res.text))
    }

    pub async fn login(&self, name: &str, password: &str) -> anyhow::Result<TestResponse> {
        self.post(
            "/api/auth/token/login/",
            None,
            json!({
                "email": format!("{name}@foodgram.localhost"),
                "password": password,
            }),
        )
        .await
    }

    /// Registers and logs in, returning `(id, token)`.
    pub async fn create_user(&self, name: &str) -> anyhow::Result<(i64, String)> {
        let id = self.register(name).await?;
        let res = self.login(name, "my_password").await?;
        assert_eq!(res.status, StatusCode::OK, "{}", res.text);

        let token = res.json()["auth_token"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("missing token in {}", res.text))?;

        Ok((id, token))
    }

    /// `breakfast` (id 1), `dinner` (id 2); flour g (1), milk ml (2),
    /// salt g (3), egg pcs (4).
    pub async fn seed_catalog(&self) -> anyhow::Result<()> {
        let tags = tag::Command(self.state.clone());
        for (name, color, slug) in [
            ("Breakfast", "#E26C2D", "breakfast"),
            ("Dinner", "#49B64E", "dinner"),
        ] {
            tags.create(tag::CreateInput {
                name: name.to_owned(),
                color: color.to_owned(),
                slug: slug.to_owned(),
            })
            .await?;
        }

        let items = [("flour", "g"), ("milk", "ml"), ("salt", "g"), ("egg", "pcs")]
            .into_iter()
            .map(|(name, unit)| ImportInput {
                name: name.to_owned(),
                measurement_unit: unit.to_owned(),
            })
            .collect();

        foodgram_recipe::ingredient::Command(self.state.clone())
            .import(items)
            .await?;

        Ok(())
    }

    /// Creates a recipe through the API and returns its id.
    pub async fn create_recipe(
        &self,
        token: &str,
        name: &str,
        ingredients: &[(i64, i64)],
        tags: &[i64],
    ) -> anyhow::Result<i64> {
        let res = self
            .post("/api/recipes/", Some(token), recipe_body(name, ingredients, tags))
            .await?;

        assert_eq!(res.status, StatusCode::CREATED, "{}", res.text);

        res.json()["id"]
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("missing id in {}", res.text))
    }

    /// Media path of an absolute image URL.
    pub fn media_file(&self, url: &str) -> PathBuf {
        let name = url
            .strip_prefix(&format!("{BASE_URL}/media/"))
            .unwrap_or(url);

        self.media_root.join(name)
    }
}

pub fn png_data_uri() -> String {
    let mut bytes = Cursor::new(Vec::new());
    image::RgbImage::new(2, 2)
        .write_to(&mut bytes, image::ImageFormat::Png)
        .unwrap();

    format!("data:image/png;base64,{}", STANDARD.encode(bytes.into_inner()))
}

pub fn recipe_body(name: &str, ingredients: &[(i64, i64)], tags: &[i64]) -> Value {
    json!({
        "name": name,
        "text": format!("How to cook {name}."),
        "cooking_time": 15,
        "image": png_data_uri(),
        "ingredients": ingredients
            .iter()
            .map(|(id, amount)| json!({ "id": id, "amount": amount }))
            .collect::<Vec<_>>(),
        "tags": tags,
    })
}
