//! Client side of the API: project cache, stores and form state.
//!
//! A `Workspace` opens one project at a time and hands out a `ProjectSession`;
//! stores and forms are built from that session and patch its snapshot after
//! every successful write.

mod api;
mod components;
mod error;
mod forms;
mod http;
mod preview;
mod session;
mod values;

#[cfg(test)]
mod tests;

pub use api::{Fetched, TokensApi};
pub use components::ComponentStore;
pub use error::ClientError;
pub use forms::{
    ComponentDraft, ComponentForm, ComponentIntent, ComponentSaved, PRESET_RADII,
    PRESET_SPACINGS, ValueForm, ValueIntent, presets,
};
pub use http::HttpTokensApi;
pub use preview::{StylePreview, placeholder};
pub use session::{ProjectSession, Workspace};
pub use values::ValueStore;
