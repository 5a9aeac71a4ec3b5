// src/infrastructure/memory/social.rs
use crate::application::ports::social::{Space, SpaceDirectory};
use crate::domain::errors::DomainResult;
use crate::domain::news::{SpaceId, UserId};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

#[derive(Default)]
struct SpaceRecord {
    display_name: String,
    members: BTreeSet<UserId>,
    redactors: BTreeSet<UserId>,
    managers: BTreeSet<UserId>,
    publishers: BTreeSet<UserId>,
}

#[derive(Default)]
struct State {
    spaces: HashMap<SpaceId, SpaceRecord>,
    super_managers: BTreeSet<UserId>,
    platform_publishers: BTreeSet<UserId>,
    platform_managers: BTreeSet<UserId>,
}

/// Embedded space directory with explicit role assignment, used as the test
/// double for the social layer.
#[derive(Default)]
pub struct InMemorySpaceDirectory {
    state: Mutex<State>,
}

impl InMemorySpaceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_space(&self, id: SpaceId, display_name: impl Into<String>) {
        let mut state = self.state.lock().expect("space directory poisoned");
        state.spaces.entry(id).or_default().display_name = display_name.into();
    }

    pub fn add_member(&self, space: SpaceId, user: &UserId) {
        let mut state = self.state.lock().expect("space directory poisoned");
        state
            .spaces
            .entry(space)
            .or_default()
            .members
            .insert(user.clone());
    }

    /// Redactors are members with content-redaction rights.
    pub fn add_redactor(&self, space: SpaceId, user: &UserId) {
        let mut state = self.state.lock().expect("space directory poisoned");
        let record = state.spaces.entry(space).or_default();
        record.members.insert(user.clone());
        record.redactors.insert(user.clone());
    }

    pub fn add_manager(&self, space: SpaceId, user: &UserId) {
        let mut state = self.state.lock().expect("space directory poisoned");
        let record = state.spaces.entry(space).or_default();
        record.members.insert(user.clone());
        record.managers.insert(user.clone());
    }

    pub fn add_publisher(&self, space: SpaceId, user: &UserId) {
        let mut state = self.state.lock().expect("space directory poisoned");
        let record = state.spaces.entry(space).or_default();
        record.members.insert(user.clone());
        record.publishers.insert(user.clone());
    }

    pub fn grant_super_manager(&self, user: &UserId) {
        let mut state = self.state.lock().expect("space directory poisoned");
        state.super_managers.insert(user.clone());
    }

    pub fn grant_platform_publisher(&self, user: &UserId) {
        let mut state = self.state.lock().expect("space directory poisoned");
        state.platform_publishers.insert(user.clone());
    }

    pub fn grant_platform_manager(&self, user: &UserId) {
        let mut state = self.state.lock().expect("space directory poisoned");
        state.platform_managers.insert(user.clone());
    }
}

#[async_trait]
impl SpaceDirectory for InMemorySpaceDirectory {
    async fn space_by_id(&self, id: SpaceId) -> DomainResult<Option<Space>> {
        let state = self.state.lock().expect("space directory poisoned");
        Ok(state.spaces.get(&id).map(|record| Space {
            id,
            display_name: record.display_name.clone(),
        }))
    }

    async fn is_member(&self, space: SpaceId, user: &UserId) -> DomainResult<bool> {
        let state = self.state.lock().expect("space directory poisoned");
        Ok(state
            .spaces
            .get(&space)
            .is_some_and(|record| record.members.contains(user)))
    }

    async fn is_redactor(&self, space: SpaceId, user: &UserId) -> DomainResult<bool> {
        let state = self.state.lock().expect("space directory poisoned");
        Ok(state
            .spaces
            .get(&space)
            .is_some_and(|record| record.redactors.contains(user)))
    }

    async fn is_manager(&self, space: SpaceId, user: &UserId) -> DomainResult<bool> {
        let state = self.state.lock().expect("space directory poisoned");
        Ok(state
            .spaces
            .get(&space)
            .is_some_and(|record| record.managers.contains(user)))
    }

    async fn is_publisher(&self, space: SpaceId, user: &UserId) -> DomainResult<bool> {
        let state = self.state.lock().expect("space directory poisoned");
        Ok(state
            .spaces
            .get(&space)
            .is_some_and(|record| record.publishers.contains(user)))
    }

    async fn is_super_manager(&self, user: &UserId) -> DomainResult<bool> {
        let state = self.state.lock().expect("space directory poisoned");
        Ok(state.super_managers.contains(user))
    }

    async fn can_redact(&self, space: SpaceId, user: &UserId) -> DomainResult<bool> {
        let state = self.state.lock().expect("space directory poisoned");
        if state.super_managers.contains(user) {
            return Ok(true);
        }
        Ok(state.spaces.get(&space).is_some_and(|record| {
            record.redactors.contains(user) || record.managers.contains(user)
        }))
    }

    async fn is_platform_publisher(&self, user: &UserId) -> DomainResult<bool> {
        let state = self.state.lock().expect("space directory poisoned");
        Ok(state.platform_publishers.contains(user))
    }

    async fn is_platform_manager(&self, user: &UserId) -> DomainResult<bool> {
        let state = self.state.lock().expect("space directory poisoned");
        Ok(state.platform_managers.contains(user))
    }

    async fn members_of(&self, space: SpaceId) -> DomainResult<Vec<UserId>> {
        let state = self.state.lock().expect("space directory poisoned");
        Ok(state
            .spaces
            .get(&space)
            .map(|record| record.members.iter().cloned().collect())
            .unwrap_or_default())
    }
}
