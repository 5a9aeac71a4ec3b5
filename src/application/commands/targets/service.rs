// src/application/commands/targets/service.rs
use std::sync::Arc;

use crate::{
    application::{permissions::PermissionEvaluator, services::deletion::PendingDeletions},
    domain::news::{PropertyStore, TargetName},
};

pub struct TargetingService {
    pub(super) properties: Arc<dyn PropertyStore>,
    pub(super) permissions: Arc<PermissionEvaluator>,
    pub(super) pending_deletions: PendingDeletions<TargetName>,
}

impl TargetingService {
    pub fn new(properties: Arc<dyn PropertyStore>, permissions: Arc<PermissionEvaluator>) -> Self {
        Self {
            properties,
            permissions,
            pending_deletions: PendingDeletions::new(),
        }
    }
}
