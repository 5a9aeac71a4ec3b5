// src/application/dto/actor.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::news::UserId;

/// Caller identity passed to every exposed operation. Capabilities are not
/// cached here; they are resolved against the space directory per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    pub user: UserId,
}

impl ActorContext {
    pub fn new(user: impl Into<String>) -> ApplicationResult<Self> {
        let user = UserId::new(user).map_err(|_| {
            ApplicationError::validation("actor context requires a user identifier")
        })?;
        Ok(Self { user })
    }

    pub fn from_user(user: UserId) -> Self {
        Self { user }
    }
}
