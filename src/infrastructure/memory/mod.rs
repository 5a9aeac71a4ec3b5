// src/infrastructure/memory/mod.rs
//
// Embedded adapters for every port: the backend the integration tests run
// against, and a reference for real store implementations.
pub mod activity;
pub mod bus;
pub mod notes;
pub mod notify;
pub mod properties;
pub mod search;
pub mod social;

pub use activity::InMemoryActivityFeed;
pub use bus::RecordingEventBus;
pub use notes::InMemoryNoteStore;
pub use notify::RecordingNotificationGateway;
pub use properties::InMemoryPropertyStore;
pub use search::{IndexOp, RecordingSearchIndex};
pub use social::InMemorySpaceDirectory;
