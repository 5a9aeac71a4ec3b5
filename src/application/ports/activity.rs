use crate::domain::errors::DomainResult;
use crate::domain::news::{ActivityId, NewsId, SpaceId, UserId};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct Activity {
    pub id: ActivityId,
    pub space_id: SpaceId,
    pub poster: UserId,
    pub title: String,
    pub hidden: bool,
    /// Article the activity belongs to, when it is a news activity.
    pub news_id: Option<NewsId>,
    /// Original activity when this one is a shared copy.
    pub shared_from: Option<ActivityId>,
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub space_id: SpaceId,
    pub poster: UserId,
    pub title: String,
    pub hidden: bool,
    pub news_id: Option<NewsId>,
}

#[async_trait]
pub trait ActivityFeed: Send + Sync {
    async fn create_activity(&self, activity: NewActivity) -> DomainResult<Activity>;

    async fn get_activity(&self, id: ActivityId) -> DomainResult<Option<Activity>>;

    /// Refresh an existing activity: toggle visibility and, when `bump` is
    /// set, move it back to the top of the stream.
    async fn update_activity(&self, id: ActivityId, hidden: bool, bump: bool) -> DomainResult<()>;

    async fn delete_activity(&self, id: ActivityId) -> DomainResult<()>;
}
