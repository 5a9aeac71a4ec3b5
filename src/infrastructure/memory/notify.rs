// src/infrastructure/memory/notify.rs
use crate::application::ports::notify::{
    NotificationError, NotificationGateway, NotificationRequest,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Recording gateway; flip `set_failing` to verify that notification
/// failures never surface to callers.
#[derive(Default)]
pub struct RecordingNotificationGateway {
    sent: Mutex<Vec<NotificationRequest>>,
    failing: AtomicBool,
}

impl RecordingNotificationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().expect("notification gateway poisoned").clone()
    }
}

#[async_trait]
impl NotificationGateway for RecordingNotificationGateway {
    async fn notify(&self, request: NotificationRequest) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError("notification channel down".into()));
        }
        self.sent
            .lock()
            .expect("notification gateway poisoned")
            .push(request);
        Ok(())
    }
}
