//! Projects and the full project aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentType};
use crate::value::{Value, ValueKind};
use crate::{EntityId, Revision};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub owner_user_id: EntityId,
    pub revision: Revision,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/project`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectCreate {
    #[serde(default)]
    pub name: String,
}

/// Everything the client needs to render a project: `GET /api/project/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAggregate {
    pub id: EntityId,
    pub name: String,
    pub revision: Revision,
    pub colors: Vec<Value>,
    pub radii: Vec<Value>,
    pub spacings: Vec<Value>,
    pub components: Vec<Component>,
}

impl ProjectAggregate {
    pub fn values(&self, kind: ValueKind) -> &[Value] {
        match kind {
            ValueKind::Color => &self.colors,
            ValueKind::Radius => &self.radii,
            ValueKind::Spacing => &self.spacings,
        }
    }

    pub fn components_of(&self, component_type: ComponentType) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |c| c.component_type == component_type)
    }
}

/// A written record paired with the project revision it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revisioned<T> {
    pub revision: Revision,
    pub record: T,
}

impl<T> Revisioned<T> {
    pub fn new(revision: Revision, record: T) -> Self {
        Self { revision, record }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Revisioned<U> {
        Revisioned {
            revision: self.revision,
            record: f(self.record),
        }
    }
}
