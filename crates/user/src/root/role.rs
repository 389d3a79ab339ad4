use foodgram_shared::{Error, user::Role};

use crate::repository::{self, FindType};

impl super::Command {
    pub async fn set_role(
        &self,
        email: impl Into<String>,
        role: Role,
    ) -> foodgram_shared::Result<i64> {
        let Some(user) = repository::find(&self.read_db, FindType::Email(email.into())).await?
        else {
            return Err(Error::NotFound);
        };

        if user.role.0 == role {
            return Ok(user.id);
        }

        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id: user.id,
                role: Some(role),
                ..Default::default()
            },
        )
        .await?;

        tracing::info!(user = user.id, role = %role, "role changed");

        Ok(user.id)
    }
}
