// src/application/services/mod.rs
pub mod deletion;

use std::sync::Arc;

use crate::application::{
    commands::{news::NewsCommandService, targets::TargetingService},
    permissions::PermissionEvaluator,
    ports::{
        activity::ActivityFeed, events::EventBus, notify::NotificationGateway,
        search::SearchIndex, social::SpaceDirectory, time::Clock,
    },
    queries::news::NewsQueryService,
};
use crate::domain::news::{NoteStore, PropertyStore};

/// Wires the command and query services over a set of port implementations.
pub struct ApplicationServices {
    pub news_commands: Arc<NewsCommandService>,
    pub news_queries: Arc<NewsQueryService>,
    pub targeting: Arc<TargetingService>,
    pub permissions: Arc<PermissionEvaluator>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        notes: Arc<dyn NoteStore>,
        properties: Arc<dyn PropertyStore>,
        spaces: Arc<dyn SpaceDirectory>,
        activities: Arc<dyn ActivityFeed>,
        search: Arc<dyn SearchIndex>,
        bus: Arc<dyn EventBus>,
        notifications: Arc<dyn NotificationGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let permissions = Arc::new(PermissionEvaluator::new(Arc::clone(&spaces)));
        let targeting = Arc::new(TargetingService::new(
            Arc::clone(&properties),
            Arc::clone(&permissions),
        ));
        let news_queries = Arc::new(NewsQueryService::new(
            Arc::clone(&notes),
            Arc::clone(&properties),
            Arc::clone(&activities),
            Arc::clone(&targeting),
            Arc::clone(&permissions),
        ));
        let news_commands = Arc::new(NewsCommandService::new(
            notes,
            properties,
            spaces,
            activities,
            search,
            bus,
            notifications,
            Arc::clone(&permissions),
            Arc::clone(&targeting),
            Arc::clone(&news_queries),
            clock,
        ));

        Self {
            news_commands,
            news_queries,
            targeting,
            permissions,
        }
    }
}
