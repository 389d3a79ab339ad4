use std::ops::Deref;

use foodgram_db::table::Follow;
use foodgram_shared::{Error, toggle::Link};

use crate::repository::{self, FindType};

mod query;

pub const LINK: Link<Follow> = Link {
    table: Follow::Table,
    owner: Follow::UserId,
    target: Follow::AuthorId,
    created_at: Follow::CreatedAt,
};

#[derive(Clone)]
pub struct Command(pub foodgram_shared::State);

impl Deref for Command {
    type Target = foodgram_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Command {
    pub fn new(state: foodgram_shared::State) -> Self {
        Self(state)
    }

    pub async fn subscribe(&self, user_id: i64, author_id: i64) -> foodgram_shared::Result<()> {
        if user_id == author_id {
            foodgram_shared::bail!("You cannot subscribe to yourself.");
        }

        self.ensure_author(author_id).await?;
        LINK.add(&self.write_db, user_id, author_id).await?;

        tracing::info!(user = user_id, author = author_id, "subscribed");

        Ok(())
    }

    pub async fn unsubscribe(&self, user_id: i64, author_id: i64) -> foodgram_shared::Result<()> {
        self.ensure_author(author_id).await?;
        LINK.remove(&self.write_db, user_id, author_id).await?;

        tracing::info!(user = user_id, author = author_id, "unsubscribed");

        Ok(())
    }

    async fn ensure_author(&self, author_id: i64) -> foodgram_shared::Result<()> {
        if repository::find(&self.read_db, FindType::Id(author_id))
            .await?
            .is_none()
        {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
