// src/application/ports/social.rs
use crate::domain::errors::DomainResult;
use crate::domain::news::{SpaceId, UserId};
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct Space {
    pub id: SpaceId,
    pub display_name: String,
}

/// Social-graph facade: space lookups and role membership. Role semantics
/// are owned by the social layer; this crate only combines them.
#[async_trait]
pub trait SpaceDirectory: Send + Sync {
    async fn space_by_id(&self, id: SpaceId) -> DomainResult<Option<Space>>;

    async fn is_member(&self, space: SpaceId, user: &UserId) -> DomainResult<bool>;

    async fn is_redactor(&self, space: SpaceId, user: &UserId) -> DomainResult<bool>;

    async fn is_manager(&self, space: SpaceId, user: &UserId) -> DomainResult<bool>;

    async fn is_publisher(&self, space: SpaceId, user: &UserId) -> DomainResult<bool>;

    async fn is_super_manager(&self, user: &UserId) -> DomainResult<bool>;

    /// Whether the user may redact content in the space (redactor, manager,
    /// or super-manager).
    async fn can_redact(&self, space: SpaceId, user: &UserId) -> DomainResult<bool>;

    /// Platform-wide publisher membership, independent of any space.
    async fn is_platform_publisher(&self, user: &UserId) -> DomainResult<bool>;

    /// Platform-wide content administration (target management).
    async fn is_platform_manager(&self, user: &UserId) -> DomainResult<bool>;

    async fn members_of(&self, space: SpaceId) -> DomainResult<Vec<UserId>>;
}
