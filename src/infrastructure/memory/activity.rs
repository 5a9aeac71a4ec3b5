// src/infrastructure/memory/activity.rs
use crate::application::ports::activity::{Activity, ActivityFeed, NewActivity};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::news::ActivityId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct State {
    next_id: i64,
    activities: HashMap<i64, Activity>,
}

#[derive(Default)]
pub struct InMemoryActivityFeed {
    state: Mutex<State>,
}

impl InMemoryActivityFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: current feed content.
    pub fn all(&self) -> Vec<Activity> {
        let state = self.state.lock().expect("activity feed poisoned");
        let mut activities: Vec<_> = state.activities.values().cloned().collect();
        activities.sort_by_key(|activity| i64::from(activity.id));
        activities
    }

    /// Test hook: register a shared copy of an existing activity, the way
    /// the social layer does before `share_news` is called.
    pub fn add_shared_copy(&self, origin: ActivityId, space_id: crate::domain::news::SpaceId) -> Activity {
        let mut state = self.state.lock().expect("activity feed poisoned");
        let origin_activity = state
            .activities
            .get(&i64::from(origin))
            .cloned()
            .expect("origin activity exists");
        state.next_id += 1;
        let activity = Activity {
            id: ActivityId(state.next_id),
            space_id,
            poster: origin_activity.poster.clone(),
            title: origin_activity.title.clone(),
            hidden: false,
            news_id: None,
            shared_from: Some(origin),
        };
        let next_id = state.next_id;
        state.activities.insert(next_id, activity.clone());
        activity
    }
}

#[async_trait]
impl ActivityFeed for InMemoryActivityFeed {
    async fn create_activity(&self, activity: NewActivity) -> DomainResult<Activity> {
        let mut state = self.state.lock().expect("activity feed poisoned");
        state.next_id += 1;
        let activity = Activity {
            id: ActivityId(state.next_id),
            space_id: activity.space_id,
            poster: activity.poster,
            title: activity.title,
            hidden: activity.hidden,
            news_id: activity.news_id,
            shared_from: None,
        };
        let next_id = state.next_id;
        state.activities.insert(next_id, activity.clone());
        Ok(activity)
    }

    async fn get_activity(&self, id: ActivityId) -> DomainResult<Option<Activity>> {
        let state = self.state.lock().expect("activity feed poisoned");
        Ok(state.activities.get(&i64::from(id)).cloned())
    }

    async fn update_activity(&self, id: ActivityId, hidden: bool, _bump: bool) -> DomainResult<()> {
        let mut state = self.state.lock().expect("activity feed poisoned");
        let activity = state
            .activities
            .get_mut(&i64::from(id))
            .ok_or_else(|| DomainError::NotFound(format!("activity {id} not found")))?;
        activity.hidden = hidden;
        Ok(())
    }

    async fn delete_activity(&self, id: ActivityId) -> DomainResult<()> {
        let mut state = self.state.lock().expect("activity feed poisoned");
        state.activities.remove(&i64::from(id));
        Ok(())
    }
}
