//! Form state for the value and component tabs.
//!
//! Submitting is split in two so the `pending` flag is observable while the
//! request runs: `submission()` validates and marks the form pending, the
//! returned intent is sent on its own, and `complete()` folds the result
//! back in. `submit()` does all three in one call.

use swatchbook_schema::{
    Component, ComponentType, EntityId, ResolvedStyle, StyleRefs, StyleSlot, Value, ValueDraft,
    ValueKind,
};
use tracing::debug;

use crate::client::components::ComponentStore;
use crate::client::error::ClientError;
use crate::client::preview::StylePreview;
use crate::client::session::ProjectSession;
use crate::client::values::ValueStore;

pub const PRESET_RADII: [&str; 10] = [
    "2px", "4px", "6px", "8px", "10px", "12px", "14px", "16px", "18px", "20px",
];

pub const PRESET_SPACINGS: [&str; 11] = [
    "2px", "4px", "8px", "12px", "16px", "20px", "24px", "28px", "32px", "36px", "40px",
];

/// Predefined choices offered for a kind; colors are free-form.
pub fn presets(kind: ValueKind) -> &'static [&'static str] {
    match kind {
        ValueKind::Color => &[],
        ValueKind::Radius => &PRESET_RADII,
        ValueKind::Spacing => &PRESET_SPACINGS,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueIntent {
    Create(ValueDraft),
    Edit(EntityId, ValueDraft),
}

impl ValueIntent {
    pub async fn send(&self, store: &ValueStore, kind: ValueKind) -> Result<Value, ClientError> {
        match self {
            ValueIntent::Create(draft) => store.create_value(kind, draft).await,
            ValueIntent::Edit(id, draft) => store.edit_value(kind, *id, draft).await,
        }
    }
}

pub struct ValueForm {
    store: ValueStore,
    kind: ValueKind,
    draft: ValueDraft,
    editing: Option<EntityId>,
    pending: bool,
    error: Option<String>,
}

impl ValueForm {
    pub fn new(session: ProjectSession, kind: ValueKind) -> Self {
        Self {
            store: ValueStore::new(session),
            kind,
            draft: Self::default_draft(kind),
            editing: None,
            pending: false,
            error: None,
        }
    }

    fn default_draft(kind: ValueKind) -> ValueDraft {
        ValueDraft::new("", kind.default_value())
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    pub fn draft(&self) -> &ValueDraft {
        &self.draft
    }

    pub fn editing(&self) -> Option<EntityId> {
        self.editing
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.draft.label = label.into();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.draft.value = value.into();
    }

    pub fn begin_edit(&mut self, value: &Value) {
        self.draft = ValueDraft::new(value.label.clone(), value.value.clone());
        self.editing = Some(value.id);
        self.error = None;
    }

    pub fn reset(&mut self) {
        self.draft = Self::default_draft(self.kind);
        self.editing = None;
        self.error = None;
    }

    /// Validates the draft and marks the form pending.
    pub fn submission(&mut self) -> Result<ValueIntent, ClientError> {
        if self.pending {
            return Err(ClientError::Busy);
        }
        if !self.draft.is_complete() {
            let err = ClientError::validation("Label and value are required");
            self.error = Some(err.user_message());
            return Err(err);
        }

        self.pending = true;
        self.error = None;
        Ok(match self.editing {
            Some(id) => ValueIntent::Edit(id, self.draft.clone()),
            None => ValueIntent::Create(self.draft.clone()),
        })
    }

    /// Success resets to the kind default; failure keeps the draft.
    pub fn complete(&mut self, result: &Result<Value, ClientError>) {
        self.pending = false;
        match result {
            Ok(value) => {
                debug!(kind = %self.kind, id = value.id, "value form saved");
                self.reset();
            }
            Err(e) => self.error = Some(e.user_message()),
        }
    }

    pub async fn submit(&mut self) -> Result<Value, ClientError> {
        let intent = self.submission()?;
        let result = intent.send(&self.store, self.kind).await;
        self.complete(&result);
        result
    }
}

/// Component draft with six optional slot ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentDraft {
    pub variant: String,
    slots: [Option<EntityId>; 6],
}

fn slot_index(slot: StyleSlot) -> usize {
    match slot {
        StyleSlot::BackgroundColor => 0,
        StyleSlot::TextColor => 1,
        StyleSlot::BorderColor => 2,
        StyleSlot::BorderRadius => 3,
        StyleSlot::PaddingX => 4,
        StyleSlot::PaddingY => 5,
    }
}

impl ComponentDraft {
    pub fn slot(&self, slot: StyleSlot) -> Option<EntityId> {
        self.slots[slot_index(slot)]
    }

    pub fn set_slot(&mut self, slot: StyleSlot, id: Option<EntityId>) {
        self.slots[slot_index(slot)] = id;
    }

    /// `None` until all six slots are selected.
    pub fn refs(&self) -> Option<StyleRefs> {
        Some(StyleRefs {
            background_color: self.slot(StyleSlot::BackgroundColor)?,
            text_color: self.slot(StyleSlot::TextColor)?,
            border_color: self.slot(StyleSlot::BorderColor)?,
            border_radius: self.slot(StyleSlot::BorderRadius)?,
            padding_x: self.slot(StyleSlot::PaddingX)?,
            padding_y: self.slot(StyleSlot::PaddingY)?,
        })
    }

    fn from_component(component: &Component) -> Self {
        let refs = component.styles.refs();
        let mut draft = Self {
            variant: component.variant.clone(),
            ..Self::default()
        };
        for slot in StyleSlot::ALL {
            draft.set_slot(slot, Some(refs.get(slot)));
        }
        draft
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentIntent {
    Create { variant: String, styles: StyleRefs },
    Edit { id: EntityId, styles: StyleRefs },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentSaved {
    Created(Component),
    Updated(ResolvedStyle),
}

impl ComponentIntent {
    pub async fn send(
        &self,
        store: &ComponentStore,
        component_type: ComponentType,
    ) -> Result<ComponentSaved, ClientError> {
        match self {
            ComponentIntent::Create { variant, styles } => store
                .create_component(component_type, variant, *styles)
                .await
                .map(ComponentSaved::Created),
            ComponentIntent::Edit { id, styles } => store
                .edit_component(*id, *styles)
                .await
                .map(ComponentSaved::Updated),
        }
    }
}

pub struct ComponentForm {
    session: ProjectSession,
    store: ComponentStore,
    component_type: ComponentType,
    draft: ComponentDraft,
    editing: Option<EntityId>,
    pending: bool,
    error: Option<String>,
}

impl ComponentForm {
    pub fn new(session: ProjectSession, component_type: ComponentType) -> Self {
        Self {
            store: ComponentStore::new(session.clone()),
            session,
            component_type,
            draft: ComponentDraft::default(),
            editing: None,
            pending: false,
            error: None,
        }
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    pub fn draft(&self) -> &ComponentDraft {
        &self.draft
    }

    pub fn editing(&self) -> Option<EntityId> {
        self.editing
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Existing variants of this form's type.
    pub fn existing(&self) -> Vec<Component> {
        self.store.components_of(self.component_type)
    }

    /// Returns `false` while editing: the variant name is fixed at creation.
    pub fn set_variant(&mut self, variant: impl Into<String>) -> bool {
        if self.editing.is_some() {
            return false;
        }
        self.draft.variant = variant.into();
        true
    }

    pub fn set_slot(&mut self, slot: StyleSlot, id: Option<EntityId>) {
        self.draft.set_slot(slot, id);
    }

    pub fn begin_edit(&mut self, component: &Component) {
        self.draft = ComponentDraft::from_component(component);
        self.editing = Some(component.id);
        self.error = None;
    }

    pub fn reset(&mut self) {
        self.draft = ComponentDraft::default();
        self.editing = None;
        self.error = None;
    }

    /// Live preview of the draft. Unselected slots show placeholders.
    pub fn preview(&self) -> Option<StylePreview> {
        let snapshot = self.session.snapshot()?;
        Some(StylePreview::resolve(&snapshot, |slot| self.draft.slot(slot)))
    }

    pub fn submission(&mut self) -> Result<ComponentIntent, ClientError> {
        if self.pending {
            return Err(ClientError::Busy);
        }

        let checked = if self.draft.variant.trim().is_empty() {
            Err(ClientError::validation("Variant name is required"))
        } else {
            self.draft
                .refs()
                .ok_or_else(|| ClientError::validation("Select all six styles"))
        };
        let styles = match checked {
            Ok(styles) => styles,
            Err(err) => {
                self.error = Some(err.user_message());
                return Err(err);
            }
        };

        self.pending = true;
        self.error = None;
        Ok(match self.editing {
            Some(id) => ComponentIntent::Edit { id, styles },
            None => ComponentIntent::Create {
                variant: self.draft.variant.clone(),
                styles,
            },
        })
    }

    pub fn complete(&mut self, result: &Result<ComponentSaved, ClientError>) {
        self.pending = false;
        match result {
            Ok(_) => {
                debug!(component_type = %self.component_type, "component form saved");
                self.reset();
            }
            Err(e) => self.error = Some(e.user_message()),
        }
    }

    pub async fn submit(&mut self) -> Result<ComponentSaved, ClientError> {
        let intent = self.submission()?;
        let result = intent.send(&self.store, self.component_type).await;
        self.complete(&result);
        result
    }
}
