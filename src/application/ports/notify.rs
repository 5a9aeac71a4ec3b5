// src/application/ports/notify.rs
use crate::domain::news::{Audience, NewsId, SpaceId, UserId};
use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    /// A new article was posted in a space.
    Post,
    /// Users were mentioned in the article body.
    Mention { mentioned: BTreeSet<UserId> },
    /// The article was published to an audience. `exclude_space_members`
    /// suppresses re-notifying members already reached under the space-only
    /// audience.
    Publish {
        audience: Option<Audience>,
        exclude_space_members: bool,
    },
}

#[derive(Debug, Clone)]
pub struct NotificationRequest {
    pub news_id: NewsId,
    pub space_id: SpaceId,
    pub author: UserId,
    pub actor: UserId,
    pub title: String,
    pub kind: NotificationKind,
}

#[derive(Debug, Error)]
#[error("notification dispatch failed: {0}")]
pub struct NotificationError(pub String);

/// Best-effort notification dispatch. Callers log failures and never
/// propagate them: a content change must not fail because of a
/// notification hiccup.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn notify(&self, request: NotificationRequest) -> Result<(), NotificationError>;
}
