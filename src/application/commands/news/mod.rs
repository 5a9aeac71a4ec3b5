// src/application/commands/news/mod.rs
mod create;
mod delete;
mod mentions;
mod post;
mod publish;
mod schedule;
mod service;
mod share;
mod translation;
mod update;
mod view;

pub use create::{CreateNewsCommand, CreateNewsCommandBuilder};
pub use post::PostNewsCommand;
pub use publish::PublishNewsCommand;
pub use schedule::{ScheduleNewsCommand, spawn_scheduler};
pub use service::NewsCommandService;
pub use share::ShareNewsCommand;
pub use translation::AddTranslationCommand;
pub use update::{
    SaveLatestDraftCommand, UpdateArticleCommand, UpdateDraftCommand, UpdateKind, UpdateNews,
};
