use argon2::{Argon2, PasswordHash, PasswordVerifier};
use validator::Validate;

use crate::repository::{self, FindType};

const INVALID_CREDENTIALS: &str = "Unable to log in with provided credentials.";

#[derive(Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Identity embedded in an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub id: i64,
    pub token_version: i64,
}

impl super::Command {
    pub async fn login(&self, input: LoginInput) -> foodgram_shared::Result<Credentials> {
        input.validate()?;

        let Some(user) = repository::find(&self.read_db, FindType::Email(input.email)).await?
        else {
            foodgram_shared::bail!("{INVALID_CREDENTIALS}");
        };

        let parsed_hash = PasswordHash::new(&user.password)?;

        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            foodgram_shared::bail!("{INVALID_CREDENTIALS}");
        }

        Ok(Credentials {
            id: user.id,
            token_version: user.token_version,
        })
    }
}
