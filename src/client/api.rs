use async_trait::async_trait;
use swatchbook_schema::{
    Component, ComponentCreate, ComponentType, ComponentUpdate, EntityId, Project,
    ProjectAggregate, ResolvedStyle, Revision, Revisioned, Value, ValueDraft, ValueKind,
};

use crate::client::error::ClientError;

/// Result of a conditional fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    Modified(T),
    /// Server revision still equals the one we sent.
    NotModified,
}

/// The `/api` surface the client stores depend on.
///
/// Mutations return the record together with the project revision produced
/// by the write, so the caller can check it against its snapshot.
#[async_trait]
pub trait TokensApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError>;

    async fn create_project(&self, name: &str) -> Result<Project, ClientError>;

    /// `known` is sent as `If-None-Match`.
    async fn fetch_project(
        &self,
        project_id: EntityId,
        known: Option<Revision>,
    ) -> Result<Fetched<ProjectAggregate>, ClientError>;

    async fn list_values(
        &self,
        project_id: EntityId,
        kind: ValueKind,
    ) -> Result<Vec<Value>, ClientError>;

    async fn create_value(
        &self,
        project_id: EntityId,
        kind: ValueKind,
        draft: &ValueDraft,
    ) -> Result<Revisioned<Value>, ClientError>;

    async fn update_value(
        &self,
        project_id: EntityId,
        kind: ValueKind,
        id: EntityId,
        draft: &ValueDraft,
    ) -> Result<Revisioned<Value>, ClientError>;

    async fn create_component(
        &self,
        project_id: EntityId,
        component_type: ComponentType,
        create: &ComponentCreate,
    ) -> Result<Revisioned<Component>, ClientError>;

    async fn update_component(
        &self,
        project_id: EntityId,
        component_type: ComponentType,
        update: &ComponentUpdate,
    ) -> Result<Revisioned<ResolvedStyle>, ClientError>;
}
