use async_trait::async_trait;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use swatchbook_cache::CacheState;
use swatchbook_schema::{
    Component, ComponentCreate, ComponentType, ComponentUpdate, EntityId, Project,
    ProjectAggregate, ResolvedStyle, Revision, Revisioned, StyleRefs, StyleSlot, Value,
    ValueDraft, ValueKind,
};

use super::*;
use crate::config::CacheConfig;

const PROJECT: EntityId = 1;

/// In-memory stand-in for the server: one project, revision bumped per write.
struct FakeApi {
    state: Mutex<ProjectAggregate>,
    next_id: AtomicUsize,
    fail_writes: AtomicBool,
    fetches: AtomicUsize,
    list_calls: AtomicUsize,
    writes: AtomicUsize,
}

impl FakeApi {
    fn seeded() -> Arc<Self> {
        let state = ProjectAggregate {
            id: PROJECT,
            name: "Design system".to_string(),
            revision: 3,
            colors: vec![value(1, "Primary", "#112233")],
            radii: vec![value(1, "sm", "4px")],
            spacings: vec![value(1, "md", "8px")],
            components: Vec::new(),
        };
        Arc::new(FakeApi {
            state: Mutex::new(state),
            next_id: AtomicUsize::new(100),
            fail_writes: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        })
    }

    /// Simulates a write from another session.
    fn foreign_write(&self) {
        self.state.lock().unwrap().revision += 1;
    }

    fn fail(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    fn write_guard(&self) -> Result<(), ClientError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                code: "INTERNAL_ERROR".to_string(),
                message: "An internal server error occurred.".to_string(),
            });
        }
        Ok(())
    }

    fn next_id(&self) -> EntityId {
        self.next_id.fetch_add(1, Ordering::SeqCst) as EntityId
    }
}

fn value(id: EntityId, label: &str, v: &str) -> Value {
    Value {
        id,
        label: label.to_string(),
        value: v.to_string(),
        project_id: PROJECT,
    }
}

fn values_mut(agg: &mut ProjectAggregate, kind: ValueKind) -> &mut Vec<Value> {
    match kind {
        ValueKind::Color => &mut agg.colors,
        ValueKind::Radius => &mut agg.radii,
        ValueKind::Spacing => &mut agg.spacings,
    }
}

fn resolve(agg: &ProjectAggregate, component_id: EntityId, refs: StyleRefs) -> ResolvedStyle {
    let get = |slot: StyleSlot| {
        agg.values(slot.kind())
            .iter()
            .find(|v| v.id == refs.get(slot))
            .cloned()
            .expect("fake api: unknown reference")
    };
    ResolvedStyle {
        component_id,
        background_color: get(StyleSlot::BackgroundColor),
        text_color: get(StyleSlot::TextColor),
        border_color: get(StyleSlot::BorderColor),
        border_radius: get(StyleSlot::BorderRadius),
        padding_x: get(StyleSlot::PaddingX),
        padding_y: get(StyleSlot::PaddingY),
    }
}

#[async_trait]
impl TokensApi for FakeApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ClientError> {
        Ok(Vec::new())
    }

    async fn create_project(&self, _name: &str) -> Result<Project, ClientError> {
        Err(ClientError::validation("not supported by fake"))
    }

    async fn fetch_project(
        &self,
        _project_id: EntityId,
        known: Option<Revision>,
    ) -> Result<Fetched<ProjectAggregate>, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let s = self.state.lock().unwrap();
        if known == Some(s.revision) {
            return Ok(Fetched::NotModified);
        }
        Ok(Fetched::Modified(s.clone()))
    }

    async fn list_values(
        &self,
        _project_id: EntityId,
        kind: ValueKind,
    ) -> Result<Vec<Value>, ClientError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.state.lock().unwrap().values(kind).to_vec())
    }

    async fn create_value(
        &self,
        _project_id: EntityId,
        kind: ValueKind,
        draft: &ValueDraft,
    ) -> Result<Revisioned<Value>, ClientError> {
        self.write_guard()?;
        let created = value(self.next_id(), &draft.label, &draft.value);
        let mut s = self.state.lock().unwrap();
        values_mut(&mut s, kind).push(created.clone());
        s.revision += 1;
        Ok(Revisioned::new(s.revision, created))
    }

    async fn update_value(
        &self,
        _project_id: EntityId,
        kind: ValueKind,
        id: EntityId,
        draft: &ValueDraft,
    ) -> Result<Revisioned<Value>, ClientError> {
        self.write_guard()?;
        let mut s = self.state.lock().unwrap();
        let slot = values_mut(&mut s, kind)
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("{kind} {id}")))?;
        slot.label = draft.label.clone();
        slot.value = draft.value.clone();
        let updated = slot.clone();
        s.revision += 1;
        Ok(Revisioned::new(s.revision, updated))
    }

    async fn create_component(
        &self,
        project_id: EntityId,
        component_type: ComponentType,
        create: &ComponentCreate,
    ) -> Result<Revisioned<Component>, ClientError> {
        self.write_guard()?;
        let id = self.next_id();
        let mut s = self.state.lock().unwrap();
        let component = Component {
            id,
            component_type,
            variant: create.variant.clone(),
            project_id,
            styles: resolve(&s, id, create.styles),
        };
        s.components.push(component.clone());
        s.revision += 1;
        Ok(Revisioned::new(s.revision, component))
    }

    async fn update_component(
        &self,
        _project_id: EntityId,
        _component_type: ComponentType,
        update: &ComponentUpdate,
    ) -> Result<Revisioned<ResolvedStyle>, ClientError> {
        self.write_guard()?;
        let mut s = self.state.lock().unwrap();
        let styles = resolve(&s, update.id, update.styles);
        let component = s
            .components
            .iter_mut()
            .find(|c| c.id == update.id)
            .ok_or_else(|| ClientError::NotFound(format!("component {}", update.id)))?;
        component.styles = styles.clone();
        s.revision += 1;
        Ok(Revisioned::new(s.revision, styles))
    }
}

async fn open(api: Arc<FakeApi>) -> (Workspace, ProjectSession) {
    let mut workspace = Workspace::new(api, &CacheConfig::default());
    let session = workspace.switch_to(PROJECT).await.unwrap();
    (workspace, session)
}

#[tokio::test]
async fn edited_color_reaches_cached_button_without_refetch() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    assert_eq!(session.state(), CacheState::Populated);

    let components = ComponentStore::new(session.clone());
    let button = components
        .create_component(ComponentType::Button, "Submit", StyleRefs::uniform(1))
        .await
        .unwrap();
    for slot in StyleSlot::ALL {
        assert_eq!(button.styles.slot(slot).id, 1);
    }

    let values = ValueStore::new(session.clone());
    values
        .edit_value(ValueKind::Color, 1, &ValueDraft::new("Primary", "#ffffff"))
        .await
        .unwrap();

    let snapshot = session.snapshot().unwrap();
    let cached = snapshot.component(button.id).unwrap();
    assert_eq!(cached.styles.background_color.value, "#ffffff");
    assert_eq!(cached.styles.text_color.value, "#ffffff");
    assert_eq!(cached.styles.border_color.value, "#ffffff");
    assert_eq!(cached.styles.border_radius.value, "4px");
    assert_eq!(cached.styles.padding_x.value, "8px");
    assert_eq!(
        StylePreview::of_component(cached).to_css(),
        "background-color: #ffffff; color: #ffffff; border-color: #ffffff; border-radius: 4px; padding: 8px 8px;"
    );
    assert_eq!(snapshot.revision, 5);
    assert!(!snapshot.stale);
    assert_eq!(session.state(), CacheState::Patched(2));
    assert_eq!(api.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_edit_leaves_cache_untouched() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    let values = ValueStore::new(session.clone());
    let listed = values.fetch_values(ValueKind::Color).await.unwrap();
    let before = session.snapshot().unwrap();

    api.fail(true);
    let err = values
        .edit_value(ValueKind::Color, 1, &ValueDraft::new("Primary", "#ffffff"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 500, .. }));

    assert_eq!(*session.snapshot().unwrap(), *before);
    let again = values.fetch_values(ValueKind::Color).await.unwrap();
    assert_eq!(again, listed);
}

#[tokio::test]
async fn editing_unknown_component_is_rejected_locally() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    let before = session.snapshot().unwrap();

    let err = ComponentStore::new(session.clone())
        .edit_component(404, StyleRefs::uniform(1))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(api.writes.load(Ordering::SeqCst), 0);
    assert_eq!(*session.snapshot().unwrap(), *before);
}

#[tokio::test]
async fn fetch_values_hits_the_api_once_and_sees_creates() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    let values = ValueStore::new(session.clone());

    assert_eq!(values.fetch_values(ValueKind::Radius).await.unwrap().len(), 1);
    let created = values
        .create_value(ValueKind::Radius, &ValueDraft::new("lg", "12px"))
        .await
        .unwrap();
    let radii = values.fetch_values(ValueKind::Radius).await.unwrap();

    assert_eq!(api.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(radii.len(), 2);
    assert_eq!(radii[1], created);
    assert!(session.snapshot().unwrap().value(ValueKind::Radius, created.id).is_some());
}

#[tokio::test]
async fn fetch_values_is_a_read_and_refreshes_component_slots() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    let button = ComponentStore::new(session.clone())
        .create_component(ComponentType::Button, "Submit", StyleRefs::uniform(1))
        .await
        .unwrap();
    assert_eq!(session.state(), CacheState::Patched(1));

    // Another session recolors Primary behind our back.
    api.state.lock().unwrap().colors[0].value = "#00ff00".to_string();

    let colors = ValueStore::new(session.clone())
        .fetch_values(ValueKind::Color)
        .await
        .unwrap();
    assert_eq!(colors[0].value, "#00ff00");

    assert_eq!(session.state(), CacheState::Patched(1));
    let snapshot = session.snapshot().unwrap();
    assert_eq!(snapshot.revision, 4);
    assert_eq!(snapshot.colors[0].value, "#00ff00");
    let cached = snapshot.component(button.id).unwrap();
    assert_eq!(cached.styles.background_color.value, "#00ff00");
    assert_eq!(cached.styles.border_radius.value, "4px");
}

#[tokio::test]
async fn fetch_values_leaves_fresh_snapshot_populated() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;

    ValueStore::new(session.clone())
        .fetch_values(ValueKind::Spacing)
        .await
        .unwrap();

    assert_eq!(session.state(), CacheState::Populated);
}

#[tokio::test]
async fn incomplete_draft_never_reaches_the_api() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;

    let err = ValueStore::new(session)
        .create_value(ValueKind::Color, &ValueDraft::new("", "#000000"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(api.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn foreign_write_marks_snapshot_stale_until_refresh() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;

    api.foreign_write();
    ValueStore::new(session.clone())
        .create_value(ValueKind::Color, &ValueDraft::new("Accent", "#ff0000"))
        .await
        .unwrap();
    let snapshot = session.snapshot().unwrap();
    assert!(snapshot.stale);
    assert_eq!(snapshot.revision, 3);
    assert_eq!(snapshot.colors.len(), 2);

    let fresh = session.ensure_fresh().await.unwrap();
    assert!(!fresh.stale);
    assert_eq!(fresh.revision, 5);
    assert_eq!(session.state(), CacheState::Populated);
}

#[tokio::test]
async fn ensure_fresh_keeps_snapshot_on_not_modified() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    let before = session.snapshot().unwrap();

    let after = session.ensure_fresh().await.unwrap();

    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn switching_projects_resets_the_previous_one() {
    let api = FakeApi::seeded();
    let (mut ws, session) = open(api.clone()).await;
    assert_eq!(ws.active(), Some(PROJECT));

    let again = ws.switch_to(PROJECT).await.unwrap();
    assert_eq!(again.state(), CacheState::Populated);
    assert_eq!(session.state(), CacheState::Populated);
    assert_eq!(api.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn value_form_resets_on_success_and_keeps_draft_on_failure() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    let mut form = ValueForm::new(session, ValueKind::Spacing);
    assert_eq!(form.draft().value, "4px");
    assert!(presets(ValueKind::Spacing).contains(&"40px"));

    form.set_label("xl");
    form.set_value("40px");
    api.fail(true);
    assert!(form.submit().await.is_err());
    assert_eq!(form.draft().label, "xl");
    assert!(form.error().is_some());
    assert!(!form.is_pending());

    api.fail(false);
    let saved = form.submit().await.unwrap();
    assert_eq!(saved.value, "40px");
    assert_eq!(form.draft(), &ValueDraft::new("", "4px"));
    assert!(form.error().is_none());
}

#[tokio::test]
async fn value_form_refuses_second_submission_while_pending() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    let mut form = ValueForm::new(session, ValueKind::Color);
    form.set_label("Primary");

    let intent = form.submission().unwrap();
    assert!(form.is_pending());
    assert!(matches!(form.submission(), Err(ClientError::Busy)));

    let result = intent.send(form.store(), form.kind()).await;
    form.complete(&result);
    assert!(!form.is_pending());
    assert_eq!(api.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn value_form_edit_goes_through_propagation() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    ComponentStore::new(session.clone())
        .create_component(ComponentType::Select, "Default", StyleRefs::uniform(1))
        .await
        .unwrap();

    let mut form = ValueForm::new(session.clone(), ValueKind::Spacing);
    let spacing = session.snapshot().unwrap().spacings[0].clone();
    form.begin_edit(&spacing);
    assert_eq!(form.editing(), Some(1));
    form.set_value("16px");
    form.submit().await.unwrap();

    let snapshot = session.snapshot().unwrap();
    let select = snapshot.components_of(ComponentType::Select).next().unwrap();
    assert_eq!(select.styles.padding_x.value, "16px");
    assert_eq!(select.styles.padding_y.value, "16px");
    assert_eq!(form.editing(), None);
}

#[tokio::test]
async fn component_form_requires_all_slots_and_locks_variant_on_edit() {
    let api = FakeApi::seeded();
    let (_ws, session) = open(api.clone()).await;
    let mut form = ComponentForm::new(session.clone(), ComponentType::Button);

    assert!(form.set_variant("Primary"));
    form.set_slot(StyleSlot::BackgroundColor, Some(1));
    let err = form.submission().unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(form.error(), Some("Select all six styles"));

    let preview = form.preview().unwrap();
    assert_eq!(preview.background_color, "#112233");
    assert_eq!(preview.border_color, "#f0f0f0");

    for slot in StyleSlot::ALL {
        form.set_slot(slot, Some(1));
    }
    let saved = form.submit().await.unwrap();
    let ComponentSaved::Created(button) = saved else {
        panic!("expected a created component");
    };
    assert_eq!(form.existing().len(), 1);

    form.begin_edit(&button);
    assert!(!form.set_variant("Renamed"));
    assert_eq!(form.draft().variant, "Primary");
    let saved = form.submit().await.unwrap();
    assert!(matches!(saved, ComponentSaved::Updated(_)));
}
