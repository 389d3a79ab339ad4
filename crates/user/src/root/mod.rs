use std::ops::Deref;

use crate::repository;

mod login;
mod password;
mod register;
mod role;

pub use login::{Credentials, LoginInput};
pub use password::SetPasswordInput;
pub use register::RegisterInput;

#[derive(Clone)]
pub struct Command {
    state: foodgram_shared::State,
    pub follow: crate::follow::Command,
}

impl Deref for Command {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self {
            follow: crate::follow::Command(state.clone()),
            state,
        }
    }

    /// Invalidates every token issued so far for this user.
    pub async fn logout(&self, id: i64) -> foodgram_shared::Result<()> {
        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id,
                bump_token_version: true,
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(user = id, "user logged out");

        Ok(())
    }
}
