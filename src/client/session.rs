use std::sync::Arc;
use swatchbook_cache::{
    CacheState, PatchOutcome, ProjectCache, ProjectSnapshot, SnapshotPatch, ValueListCache,
};
use swatchbook_schema::{EntityId, Project, Revision, Value, ValueKind};
use tracing::{debug, info, warn};

use crate::client::api::{Fetched, TokensApi};
use crate::client::error::ClientError;
use crate::config::CacheConfig;

/// Entry point of the client: lists projects and opens one at a time.
pub struct Workspace {
    api: Arc<dyn TokensApi>,
    cache: ProjectCache,
    value_lists: ValueListCache,
    active: Option<EntityId>,
}

impl Workspace {
    pub fn new(api: Arc<dyn TokensApi>, cfg: &CacheConfig) -> Self {
        Self {
            api,
            cache: ProjectCache::new(cfg.max_capacity),
            value_lists: ValueListCache::new(cfg.max_capacity, cfg.time_to_idle()),
            active: None,
        }
    }

    pub fn active(&self) -> Option<EntityId> {
        self.active
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ClientError> {
        self.api.list_projects().await
    }

    pub async fn create_project(&self, name: &str) -> Result<Project, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::validation("Project name is required"));
        }
        self.api.create_project(name).await
    }

    /// Drops every cached view of the previous and the target project, then
    /// loads the target from scratch.
    pub async fn switch_to(&mut self, project_id: EntityId) -> Result<ProjectSession, ClientError> {
        if let Some(previous) = self.active.take() {
            self.cache.invalidate(previous);
            self.value_lists.invalidate_project(previous);
        }
        self.value_lists.invalidate_project(project_id);
        self.cache.begin_loading(project_id);

        let session = ProjectSession {
            api: self.api.clone(),
            cache: self.cache.clone(),
            value_lists: self.value_lists.clone(),
            project_id,
        };

        match self.api.fetch_project(project_id, None).await {
            Ok(Fetched::Modified(aggregate)) => {
                let snapshot = self.cache.populate(aggregate);
                info!(
                    project_id,
                    revision = snapshot.revision,
                    components = snapshot.components.len(),
                    "project loaded"
                );
                self.active = Some(project_id);
                Ok(session)
            }
            Ok(Fetched::NotModified) => {
                self.cache.invalidate(project_id);
                Err(ClientError::Parse(
                    "unconditional project fetch answered 304".to_string(),
                ))
            }
            Err(e) => {
                warn!(project_id, error = %e, "project load failed");
                self.cache.invalidate(project_id);
                Err(e)
            }
        }
    }
}

/// Handle on the active project, passed to every store and form.
#[derive(Clone)]
pub struct ProjectSession {
    pub(crate) api: Arc<dyn TokensApi>,
    cache: ProjectCache,
    pub(crate) value_lists: ValueListCache,
    project_id: EntityId,
}

impl ProjectSession {
    pub fn project_id(&self) -> EntityId {
        self.project_id
    }

    pub fn state(&self) -> CacheState {
        self.cache.state(self.project_id)
    }

    pub fn snapshot(&self) -> Option<Arc<ProjectSnapshot>> {
        self.cache.get(self.project_id)
    }

    pub fn is_stale(&self) -> bool {
        self.snapshot().is_some_and(|s| s.stale)
    }

    /// Conditional refetch keyed on the snapshot revision. `304` keeps the
    /// snapshot; anything newer replaces it and clears the stale mark.
    pub async fn ensure_fresh(&self) -> Result<Arc<ProjectSnapshot>, ClientError> {
        let current = self.snapshot();
        let known = current.as_ref().map(|s| s.revision);

        match self.api.fetch_project(self.project_id, known).await {
            Ok(Fetched::NotModified) => match current {
                Some(snapshot) => {
                    debug!(project_id = self.project_id, "project not modified");
                    Ok(snapshot)
                }
                // Evicted while the request was in flight.
                None => self.reload().await,
            },
            Ok(Fetched::Modified(aggregate)) => {
                self.value_lists.invalidate_project(self.project_id);
                Ok(self.cache.populate(aggregate))
            }
            Err(e) => {
                warn!(project_id = self.project_id, error = %e, "project refresh failed");
                Err(e)
            }
        }
    }

    async fn reload(&self) -> Result<Arc<ProjectSnapshot>, ClientError> {
        match self.api.fetch_project(self.project_id, None).await? {
            Fetched::Modified(aggregate) => {
                self.value_lists.invalidate_project(self.project_id);
                Ok(self.cache.populate(aggregate))
            }
            Fetched::NotModified => Err(ClientError::Parse(
                "unconditional project fetch answered 304".to_string(),
            )),
        }
    }

    /// Applies a patch to the project snapshot and reports a revision gap.
    pub(crate) fn patch(&self, patch: SnapshotPatch, revision: Option<Revision>) -> PatchOutcome {
        let outcome = self.cache.patch(self.project_id, patch, revision);
        match outcome {
            PatchOutcome::Applied {
                revision,
                stale: true,
                ..
            } => {
                warn!(
                    project_id = self.project_id,
                    cached_revision = revision,
                    "project changed elsewhere, snapshot marked stale"
                );
            }
            PatchOutcome::Applied { .. } => {}
            PatchOutcome::Missing => {
                warn!(
                    project_id = self.project_id,
                    "write saved but no snapshot to patch, reopen the project"
                );
            }
        }
        outcome
    }

    /// Folds a fresh value listing into the snapshot. Not a patch: the cache
    /// state and revision stay as they are.
    pub(crate) fn refresh_values(&self, kind: ValueKind, values: Vec<Value>) {
        if let PatchOutcome::Applied { effect, .. } =
            self.cache.refresh_values(self.project_id, kind, values)
        {
            debug!(
                project_id = self.project_id,
                kind = %kind,
                propagated = effect.propagated,
                "value list folded into snapshot"
            );
        }
    }
}
