//! Create / patch payloads accepted by the database actor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use swatchbook_schema::{
    ComponentType, EntityId, ResolvedStyle, Revisioned, StyleRefs, StyleSlot, Value, ValueKind,
};

use crate::error::SwatchError;

/// Abstraction for applying a patch payload/envelope to the database.
#[async_trait]
pub trait DbPatchable {
    async fn apply_patch(&self, pool: &SqlitePool)
    -> Result<Revisioned<PatchedRecord>, SwatchError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreateRow {
    pub owner_user_id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueCreate {
    pub project_id: EntityId,
    pub kind: ValueKind,
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentCreateRow {
    pub project_id: EntityId,
    pub component_type: ComponentType,
    pub variant: String,
    pub styles: StyleRefs,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuePatch {
    /// `None` => do not change; `Some(v)` => update
    pub label: Option<String>,
    /// `None` => do not change; `Some(v)` => update
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentStylePatch {
    pub background_color: Option<EntityId>,
    pub text_color: Option<EntityId>,
    pub border_color: Option<EntityId>,
    pub border_radius: Option<EntityId>,
    pub padding_x: Option<EntityId>,
    pub padding_y: Option<EntityId>,
}

impl ComponentStylePatch {
    pub fn get(&self, slot: StyleSlot) -> Option<EntityId> {
        match slot {
            StyleSlot::BackgroundColor => self.background_color,
            StyleSlot::TextColor => self.text_color,
            StyleSlot::BorderColor => self.border_color,
            StyleSlot::BorderRadius => self.border_radius,
            StyleSlot::PaddingX => self.padding_x,
            StyleSlot::PaddingY => self.padding_y,
        }
    }
}

impl From<StyleRefs> for ComponentStylePatch {
    fn from(refs: StyleRefs) -> Self {
        Self {
            background_color: Some(refs.background_color),
            text_color: Some(refs.text_color),
            border_color: Some(refs.border_color),
            border_radius: Some(refs.border_radius),
            padding_x: Some(refs.padding_x),
            padding_y: Some(refs.padding_y),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "snake_case")]
pub enum StorePatch {
    Value {
        project_id: EntityId,
        kind: ValueKind,
        id: EntityId,
        patch: ValuePatch,
    },
    ComponentStyle {
        project_id: EntityId,
        component_type: ComponentType,
        component_id: EntityId,
        patch: ComponentStylePatch,
    },
}

/// Record returned by a successful patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchedRecord {
    Value(Value),
    Style(ResolvedStyle),
}
