// src/application/services/deletion.rs
//
// Grace-period deletion bookkeeping. One instance per delete queue (articles,
// targets). Check-then-act is atomic per key: the timer task and an undo call
// racing on the same key cannot both win.
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::news::UserId;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct PendingDeletions<K> {
    entries: Arc<Mutex<HashMap<K, UserId>>>,
}

impl<K> Default for PendingDeletions<K> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K> PendingDeletions<K>
where
    K: Eq + Hash + Clone + Send,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a deletion. A second request for the same key replaces the
    /// original requester.
    pub async fn arm(&self, key: K, requested_by: UserId) {
        self.entries.lock().await.insert(key, requested_by);
    }

    /// Called by the timer at fire time: removes the entry and returns the
    /// original requester, or `None` when an undo won the race.
    pub async fn take_if_armed(&self, key: &K) -> Option<UserId> {
        self.entries.lock().await.remove(key)
    }

    /// Disarm a pending deletion. Only the original requester may undo; any
    /// other caller leaves the deletion armed.
    pub async fn disarm(&self, key: &K, caller: &UserId) -> ApplicationResult<()> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            None => Err(ApplicationError::not_found("no pending deletion")),
            Some(requested_by) if requested_by != caller => Err(ApplicationError::forbidden(
                "pending deletion belongs to another user",
            )),
            Some(_) => {
                entries.remove(key);
                Ok(())
            }
        }
    }

    pub async fn is_armed(&self, key: &K) -> bool {
        self.entries.lock().await.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    #[tokio::test]
    async fn disarm_is_restricted_to_the_requester() {
        let pending = PendingDeletions::new();
        pending.arm(7_i64, user("amal")).await;

        let err = pending.disarm(&7, &user("badr")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Forbidden(_)));
        assert!(pending.is_armed(&7).await);

        pending.disarm(&7, &user("amal")).await.unwrap();
        assert!(!pending.is_armed(&7).await);
    }

    #[tokio::test]
    async fn take_if_armed_loses_to_an_earlier_undo() {
        let pending = PendingDeletions::new();
        pending.arm(3_i64, user("amal")).await;
        pending.disarm(&3, &user("amal")).await.unwrap();
        assert!(pending.take_if_armed(&3).await.is_none());
    }
}
