use clap::ValueEnum;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Role {
    User,
    Admin,
}

impl From<Role> for foodgram_shared::user::Role {
    fn from(value: Role) -> Self {
        match value {
            Role::User => foodgram_shared::user::Role::User,
            Role::Admin => foodgram_shared::user::Role::Admin,
        }
    }
}

pub async fn set_role(config: &foodgram::Config, email: String, role: Role) -> anyhow::Result<()> {
    let pool = foodgram::create_pool(&config.database.url, 1).await?;
    let command = foodgram_user::Command::new(foodgram_shared::State::new(pool));

    match command.set_role(email.to_owned(), role.into()).await {
        Ok(id) => {
            let role = foodgram_shared::user::Role::from(role);
            tracing::info!(user = id, %role, "{email} role updated");
        }
        Err(foodgram_shared::Error::NotFound) => tracing::error!("user {email} not found"),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
