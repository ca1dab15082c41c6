use ahash::AHashMap;
use swatchbook_schema::{
    Component, ComponentType, EntityId, ProjectAggregate, ResolvedStyle, Revision, Value,
    ValueKind,
};

use crate::propagate::propagate_value;

/// Denormalized copy of one project's values and components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSnapshot {
    pub project_id: EntityId,
    pub name: String,
    /// Last server revision this snapshot is known to match.
    pub revision: Revision,
    /// Set when a write response revealed a foreign write we have not seen.
    pub stale: bool,
    /// Number of in-place patches applied since the snapshot was loaded.
    pub patches: u32,
    pub colors: Vec<Value>,
    pub radii: Vec<Value>,
    pub spacings: Vec<Value>,
    pub components: Vec<Component>,
}

impl From<ProjectAggregate> for ProjectSnapshot {
    fn from(aggregate: ProjectAggregate) -> Self {
        Self {
            project_id: aggregate.id,
            name: aggregate.name,
            revision: aggregate.revision,
            stale: false,
            patches: 0,
            colors: aggregate.colors,
            radii: aggregate.radii,
            spacings: aggregate.spacings,
            components: aggregate.components,
        }
    }
}

/// A single in-place edit of a snapshot.
#[derive(Debug, Clone)]
pub enum SnapshotPatch {
    /// Append a freshly created value.
    InsertValue { kind: ValueKind, value: Value },
    /// Replace a value by id and rewrite every component slot referencing it.
    ReplaceValue { kind: ValueKind, value: Value },
    /// Replace the whole list of one kind (after an uncached fetch), rewriting
    /// component slots that reference the listed values.
    ReplaceValues { kind: ValueKind, values: Vec<Value> },
    /// Append a freshly created component.
    InsertComponent(Component),
    /// Replace the styles of an existing component.
    ReplaceStyles {
        component_id: EntityId,
        styles: ResolvedStyle,
    },
}

/// What a patch did to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatchEffect {
    /// `false` when the patch targeted an id that is not in the snapshot.
    pub matched: bool,
    /// Component slots rewritten by value propagation.
    pub propagated: usize,
}

impl ProjectSnapshot {
    pub fn values(&self, kind: ValueKind) -> &[Value] {
        match kind {
            ValueKind::Color => &self.colors,
            ValueKind::Radius => &self.radii,
            ValueKind::Spacing => &self.spacings,
        }
    }

    fn values_mut(&mut self, kind: ValueKind) -> &mut Vec<Value> {
        match kind {
            ValueKind::Color => &mut self.colors,
            ValueKind::Radius => &mut self.radii,
            ValueKind::Spacing => &mut self.spacings,
        }
    }

    pub fn value(&self, kind: ValueKind, id: EntityId) -> Option<&Value> {
        self.values(kind).iter().find(|v| v.id == id)
    }

    /// `id -> value` lookup for one kind, as used by previews.
    pub fn value_map(&self, kind: ValueKind) -> AHashMap<EntityId, &str> {
        self.values(kind)
            .iter()
            .map(|v| (v.id, v.value.as_str()))
            .collect()
    }

    pub fn component(&self, id: EntityId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn components_of(&self, component_type: ComponentType) -> impl Iterator<Item = &Component> {
        self.components
            .iter()
            .filter(move |c| c.component_type == component_type)
    }

    pub fn apply(&mut self, patch: SnapshotPatch) -> PatchEffect {
        match patch {
            SnapshotPatch::InsertValue { kind, value } => {
                self.values_mut(kind).push(value);
                PatchEffect {
                    matched: true,
                    propagated: 0,
                }
            }
            SnapshotPatch::ReplaceValue { kind, value } => {
                let matched = match self.values_mut(kind).iter_mut().find(|v| v.id == value.id) {
                    Some(slot) => {
                        *slot = value.clone();
                        true
                    }
                    None => false,
                };
                let propagated = propagate_value(&mut self.components, kind, &value);
                PatchEffect {
                    matched,
                    propagated,
                }
            }
            SnapshotPatch::ReplaceValues { kind, values } => {
                let propagated = values
                    .iter()
                    .map(|value| propagate_value(&mut self.components, kind, value))
                    .sum();
                *self.values_mut(kind) = values;
                PatchEffect {
                    matched: true,
                    propagated,
                }
            }
            SnapshotPatch::InsertComponent(component) => {
                self.components.push(component);
                PatchEffect {
                    matched: true,
                    propagated: 0,
                }
            }
            SnapshotPatch::ReplaceStyles {
                component_id,
                styles,
            } => {
                let matched = match self.components.iter_mut().find(|c| c.id == component_id) {
                    Some(component) => {
                        component.styles = styles;
                        true
                    }
                    None => false,
                };
                PatchEffect {
                    matched,
                    propagated: 0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{PROJECT, aggregate, button, value};

    #[test]
    fn replace_value_updates_list_and_components() {
        let mut snapshot = ProjectSnapshot::from(aggregate(3));

        let effect = snapshot.apply(SnapshotPatch::ReplaceValue {
            kind: ValueKind::Color,
            value: value(1, "Primary", "#ffffff"),
        });

        assert!(effect.matched);
        assert_eq!(effect.propagated, 3);
        assert_eq!(snapshot.colors[0].value, "#ffffff");
        let styles = &snapshot.components[0].styles;
        assert_eq!(styles.background_color.value, "#ffffff");
        assert_eq!(styles.border_radius.value, "4px");
        assert_eq!(styles.padding_x.value, "8px");
    }

    #[test]
    fn replace_styles_on_unknown_component_reports_no_match() {
        let mut snapshot = ProjectSnapshot::from(aggregate(3));
        let before = snapshot.clone();

        let effect = snapshot.apply(SnapshotPatch::ReplaceStyles {
            component_id: 999,
            styles: button(999, PROJECT, "Ghost").styles,
        });

        assert!(!effect.matched);
        assert_eq!(snapshot, before);
    }

    #[test]
    fn value_map_indexes_by_id() {
        let mut snapshot = ProjectSnapshot::from(aggregate(1));
        snapshot.apply(SnapshotPatch::InsertValue {
            kind: ValueKind::Color,
            value: value(2, "Accent", "#ff0000"),
        });

        let colors = snapshot.value_map(ValueKind::Color);
        assert_eq!(colors.get(&1), Some(&"#112233"));
        assert_eq!(colors.get(&2), Some(&"#ff0000"));
        assert_eq!(snapshot.components_of(ComponentType::Button).count(), 1);
        assert_eq!(snapshot.components_of(ComponentType::Select).count(), 0);
    }
}
