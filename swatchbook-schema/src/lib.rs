pub mod auth;
pub mod component;
pub mod error;
pub mod project;
pub mod value;

pub use auth::{SigninRequest, SignupRequest, UserView};
pub use component::{
    Component, ComponentCreate, ComponentType, ComponentUpdate, ResolvedStyle, StyleRefs,
    StyleSlot,
};
pub use error::{ApiErrorBody, ApiErrorObject};
pub use project::{Project, ProjectAggregate, ProjectCreate, Revisioned};
pub use value::{Value, ValueDraft, ValueKind, ValueUpdate};

/// Primary key type shared by every persisted entity.
pub type EntityId = i64;

/// Per-project write counter. Served as the `ETag` of a project aggregate.
pub type Revision = i64;
