// src/application/commands/news/view.rs
use super::NewsCommandService;
use crate::{
    application::{
        error::{ApplicationError, ApplicationResult},
        ports::events::EventBus,
    },
    domain::news::{NewsEvent, NewsId, PageProperties, PropertyKey, PropertyStore, UserId},
};

impl NewsCommandService {
    /// Record that a user viewed the article. Idempotent per (article, user):
    /// a repeated view changes nothing and broadcasts nothing. Last write
    /// wins on the page bag; lost increments under concurrent writes to the
    /// same article are an accepted risk.
    pub async fn mark_read(&self, id: i64, user: &str) -> ApplicationResult<()> {
        let id = NewsId::new(id)?;
        let viewer = UserId::new(user)?;
        let key = PropertyKey::page(id);
        let item = self
            .properties
            .get_item(&key)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("article {id} not found")))?;
        let mut page = PageProperties::from_map(&item.properties);
        if page.deleted {
            return Err(ApplicationError::not_found(format!(
                "article {id} not found"
            )));
        }
        if !page.record_view(&viewer) {
            return Ok(());
        }
        self.properties
            .update_item(&key, page.to_map(), &viewer)
            .await?;
        self.bus.broadcast(&NewsEvent::Viewed { id, viewer });
        Ok(())
    }
}
