use crate::domain::news::value_objects::{Language, NewsId, SpaceId, UserId};

/// Lifecycle events broadcast to interested listeners (gamification,
/// analytics, search reindexing, activity updates). Fire-and-forget; never
/// part of the authoritative state.
#[derive(Debug, Clone)]
pub enum NewsEvent {
    /// Consumed by analytics.
    NewsPosted { id: NewsId, author: UserId },
    /// Consumed by gamification.
    ArticlePosted { id: NewsId, space_id: SpaceId },
    Updated { id: NewsId },
    Published { id: NewsId },
    Scheduled { id: NewsId },
    Shared { id: NewsId, space_id: SpaceId },
    Viewed { id: NewsId, viewer: UserId },
    Deleted { id: NewsId },
    TranslationAdded { id: NewsId, lang: Language },
}

impl NewsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewsPosted { .. } => "news.post",
            Self::ArticlePosted { .. } => "news.gamification.post",
            Self::Updated { .. } => "news.update",
            Self::Published { .. } => "news.publish",
            Self::Scheduled { .. } => "news.schedule",
            Self::Shared { .. } => "news.share",
            Self::Viewed { .. } => "news.view",
            Self::Deleted { .. } => "news.delete",
            Self::TranslationAdded { .. } => "news.translation.add",
        }
    }

    pub fn news_id(&self) -> NewsId {
        match self {
            Self::NewsPosted { id, .. }
            | Self::ArticlePosted { id, .. }
            | Self::Updated { id }
            | Self::Published { id }
            | Self::Scheduled { id }
            | Self::Shared { id, .. }
            | Self::Viewed { id, .. }
            | Self::Deleted { id }
            | Self::TranslationAdded { id, .. } => *id,
        }
    }
}
