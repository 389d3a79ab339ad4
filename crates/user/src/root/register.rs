use std::sync::LazyLock;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use foodgram_shared::Error;
use regex::Regex;
use validator::Validate;

use crate::repository::{self, FindType};

static RE_USERNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").unwrap());

#[derive(Validate)]
pub struct RegisterInput {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(
        length(min = 1, max = 150),
        regex(
            path = *RE_USERNAME,
            message = "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
        )
    )]
    pub username: String,
    #[validate(length(min = 1, max = 150))]
    pub first_name: String,
    #[validate(length(min = 1, max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl super::Command {
    pub async fn register(&self, input: RegisterInput) -> foodgram_shared::Result<i64> {
        input.validate()?;

        let email = input.email.trim().to_lowercase();

        if repository::find(&self.read_db, FindType::Email(email.to_owned()))
            .await?
            .is_some()
        {
            return Err(Error::field(
                "email",
                "unique",
                "A user with that email already exists.",
            ));
        }

        if repository::find(&self.read_db, FindType::Username(input.username.to_owned()))
            .await?
            .is_some()
        {
            return Err(Error::field(
                "username",
                "unique",
                "A user with that username already exists.",
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)?
            .to_string();

        let id = match repository::create(
            &self.write_db,
            repository::CreateInput {
                email,
                username: input.username,
                first_name: input.first_name,
                last_name: input.last_name,
                password,
            },
        )
        .await
        {
            Ok(id) => id,
            Err(err) if foodgram_shared::is_unique_violation(&err) => {
                foodgram_shared::bail!("A user with that email or username already exists.")
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(user = id, "user registered");

        Ok(id)
    }
}
