// src/infrastructure/memory/bus.rs
use crate::application::ports::events::EventBus;
use crate::domain::news::NewsEvent;
use std::sync::Mutex;

/// Synchronous in-process bus that keeps every broadcast event, in order.
#[derive(Default)]
pub struct RecordingEventBus {
    events: Mutex<Vec<NewsEvent>>,
}

impl RecordingEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NewsEvent> {
        self.events.lock().expect("event bus poisoned").clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(NewsEvent::name).collect()
    }

    pub fn count_of(&self, name: &str) -> usize {
        self.events()
            .iter()
            .filter(|event| event.name() == name)
            .count()
    }
}

impl EventBus for RecordingEventBus {
    fn broadcast(&self, event: &NewsEvent) {
        tracing::debug!(event = event.name(), news_id = %event.news_id(), "event broadcast");
        self.events
            .lock()
            .expect("event bus poisoned")
            .push(event.clone());
    }
}
