use std::sync::Arc;
use swatchbook_cache::{PatchOutcome, SnapshotPatch};
use swatchbook_schema::{EntityId, Value, ValueDraft, ValueKind};
use tracing::{debug, warn};

use crate::client::error::ClientError;
use crate::client::session::ProjectSession;

/// Colors, radii and spacings of the active project.
///
/// Every method leaves both caches untouched when the request fails.
#[derive(Clone)]
pub struct ValueStore {
    session: ProjectSession,
}

impl ValueStore {
    pub fn new(session: ProjectSession) -> Self {
        Self { session }
    }

    /// Cached list for `kind` when present; otherwise one `GET /api/value`
    /// whose result fills both the per-kind cache and the project snapshot.
    pub async fn fetch_values(&self, kind: ValueKind) -> Result<Arc<Vec<Value>>, ClientError> {
        let project_id = self.session.project_id();
        if let Some(values) = self.session.value_lists.get(project_id, kind) {
            return Ok(values);
        }

        let values = self
            .session
            .api
            .list_values(project_id, kind)
            .await
            .inspect_err(|e| warn!(project_id, kind = %kind, error = %e, "fetch values failed"))?;
        debug!(project_id, kind = %kind, count = values.len(), "values fetched");

        self.session.refresh_values(kind, values.clone());
        Ok(self.session.value_lists.put(project_id, kind, values))
    }

    pub async fn create_value(
        &self,
        kind: ValueKind,
        draft: &ValueDraft,
    ) -> Result<Value, ClientError> {
        if !draft.is_complete() {
            return Err(ClientError::validation("Label and value are required"));
        }

        let project_id = self.session.project_id();
        let created = self
            .session
            .api
            .create_value(project_id, kind, draft)
            .await
            .inspect_err(|e| warn!(project_id, kind = %kind, error = %e, "create value failed"))?;

        let value = created.record;
        self.session
            .value_lists
            .append(project_id, kind, value.clone());
        self.session.patch(
            SnapshotPatch::InsertValue {
                kind,
                value: value.clone(),
            },
            Some(created.revision),
        );
        Ok(value)
    }

    /// Saves `draft` over value `id` and rewrites every cached component slot
    /// of `kind` that references it.
    pub async fn edit_value(
        &self,
        kind: ValueKind,
        id: EntityId,
        draft: &ValueDraft,
    ) -> Result<Value, ClientError> {
        if !draft.is_complete() {
            return Err(ClientError::validation("Label and value are required"));
        }

        let project_id = self.session.project_id();
        let updated = self
            .session
            .api
            .update_value(project_id, kind, id, draft)
            .await
            .inspect_err(
                |e| warn!(project_id, kind = %kind, id, error = %e, "edit value failed"),
            )?;

        let value = updated.record;
        self.session
            .value_lists
            .replace(project_id, kind, value.clone());
        let outcome = self.session.patch(
            SnapshotPatch::ReplaceValue {
                kind,
                value: value.clone(),
            },
            Some(updated.revision),
        );
        if let PatchOutcome::Applied { effect, .. } = outcome {
            debug!(project_id, kind = %kind, id, propagated = effect.propagated, "value edited");
        }
        Ok(value)
    }
}
