// src/application/ports/mod.rs
pub mod activity;
pub mod events;
pub mod notify;
pub mod search;
pub mod social;
pub mod time;

// Type aliases to make port injection sites more descriptive and reduce `dyn` noise
pub type ClockPort = dyn time::Clock;
pub type EventBusPort = dyn events::EventBus;
pub type SearchIndexPort = dyn search::SearchIndex;
pub type SpaceDirectoryPort = dyn social::SpaceDirectory;
pub type ActivityFeedPort = dyn activity::ActivityFeed;
pub type NotificationGatewayPort = dyn notify::NotificationGateway;
