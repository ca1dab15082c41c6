use swatchbook_cache::SnapshotPatch;
use swatchbook_schema::{
    Component, ComponentCreate, ComponentType, ComponentUpdate, EntityId, ResolvedStyle,
    StyleRefs,
};
use tracing::{debug, warn};

use crate::client::error::ClientError;
use crate::client::session::ProjectSession;

/// Component variants of the active project.
#[derive(Clone)]
pub struct ComponentStore {
    session: ProjectSession,
}

impl ComponentStore {
    pub fn new(session: ProjectSession) -> Self {
        Self { session }
    }

    /// Cached components of one type, in creation order.
    pub fn components_of(&self, component_type: ComponentType) -> Vec<Component> {
        self.session
            .snapshot()
            .map(|s| s.components_of(component_type).cloned().collect())
            .unwrap_or_default()
    }

    pub fn component(&self, id: EntityId) -> Option<Component> {
        self.session.snapshot()?.component(id).cloned()
    }

    pub async fn create_component(
        &self,
        component_type: ComponentType,
        variant: &str,
        styles: StyleRefs,
    ) -> Result<Component, ClientError> {
        let variant = variant.trim();
        if variant.is_empty() {
            return Err(ClientError::validation("Variant name is required"));
        }

        let project_id = self.session.project_id();
        let body = ComponentCreate {
            variant: variant.to_string(),
            styles,
        };
        let created = self
            .session
            .api
            .create_component(project_id, component_type, &body)
            .await
            .inspect_err(|e| {
                warn!(project_id, component_type = %component_type, error = %e, "create component failed");
            })?;

        let component = created.record;
        self.session.patch(
            SnapshotPatch::InsertComponent(component.clone()),
            Some(created.revision),
        );
        debug!(project_id, id = component.id, "component created");
        Ok(component)
    }

    /// Replaces the style references of a cached component. Unknown ids are
    /// rejected before any request is sent.
    pub async fn edit_component(
        &self,
        id: EntityId,
        styles: StyleRefs,
    ) -> Result<ResolvedStyle, ClientError> {
        let existing = self
            .component(id)
            .ok_or_else(|| ClientError::NotFound(format!("component {id}")))?;

        let project_id = self.session.project_id();
        let body = ComponentUpdate {
            id,
            variant: existing.variant.clone(),
            styles,
        };
        let updated = self
            .session
            .api
            .update_component(project_id, existing.component_type, &body)
            .await
            .inspect_err(|e| warn!(project_id, id, error = %e, "edit component failed"))?;

        let styles = updated.record;
        self.session.patch(
            SnapshotPatch::ReplaceStyles {
                component_id: id,
                styles: styles.clone(),
            },
            Some(updated.revision),
        );
        debug!(project_id, id, "component styles replaced");
        Ok(styles)
    }
}
