use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use swatchbook_schema::{EntityId, Project, Revision, StyleRefs, UserView, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbUser {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for UserView {
    fn from(row: DbUser) -> Self {
        UserView {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbProject {
    pub id: EntityId,
    pub name: String,
    pub owner_user_id: EntityId,
    pub revision: Revision,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbProject> for Project {
    fn from(row: DbProject) -> Self {
        Project {
            id: row.id,
            name: row.name,
            owner_user_id: row.owner_user_id,
            revision: row.revision,
            created_at: row.created_at,
        }
    }
}

/// Row of any of the `color` / `radius` / `spacing` tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbValue {
    pub id: EntityId,
    pub label: String,
    pub value: String,
    pub project_id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbValue> for Value {
    fn from(row: DbValue) -> Self {
        Value {
            id: row.id,
            label: row.label,
            value: row.value,
            project_id: row.project_id,
        }
    }
}

/// `component` joined with its `component_style` row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbComponentRow {
    pub id: EntityId,
    #[sqlx(rename = "type")]
    pub component_type: String,
    pub variant: String,
    pub project_id: EntityId,
    pub background_color_id: EntityId,
    pub text_color_id: EntityId,
    pub border_color_id: EntityId,
    pub border_radius_id: EntityId,
    pub padding_x_id: EntityId,
    pub padding_y_id: EntityId,
}

impl DbComponentRow {
    pub fn refs(&self) -> StyleRefs {
        StyleRefs {
            background_color: self.background_color_id,
            text_color: self.text_color_id,
            border_color: self.border_color_id,
            border_radius: self.border_radius_id,
            padding_x: self.padding_x_id,
            padding_y: self.padding_y_id,
        }
    }
}
