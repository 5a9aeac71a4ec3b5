pub mod entity;
pub mod events;
pub mod note;
pub mod properties;
pub mod repository;
pub mod value_objects;

pub use entity::News;
pub use events::NewsEvent;
pub use note::{DraftKind, DraftPage, NewDraft, NewNote, Note, NoteVersion};
pub use properties::{
    AssignmentProperties, DraftProperties, PageProperties, TargetProperties, VersionProperties,
};
pub use repository::{NoteStore, PropertyItem, PropertyKey, PropertyMap, PropertyObjectType, PropertyStore};
pub use value_objects::{
    ActivityId, ActivityRef, Audience, DraftId, Language, NewsBody, NewsId, NewsTitle,
    PublicationState, SpaceId, TargetName, UserId, VersionId,
};
