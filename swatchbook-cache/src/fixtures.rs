use swatchbook_schema::{
    Component, ComponentType, EntityId, ProjectAggregate, ResolvedStyle, Value,
};

pub(crate) const PROJECT: EntityId = 7;

pub(crate) fn value(id: EntityId, label: &str, value: &str) -> Value {
    Value {
        id,
        label: label.to_string(),
        value: value.to_string(),
        project_id: PROJECT,
    }
}

/// A button whose six slots point at color 1, radius 1 and spacing 1.
pub(crate) fn button(id: EntityId, project_id: EntityId, variant: &str) -> Component {
    let color = value(1, "Primary", "#112233");
    Component {
        id,
        component_type: ComponentType::Button,
        variant: variant.to_string(),
        project_id,
        styles: ResolvedStyle {
            component_id: id,
            background_color: color.clone(),
            text_color: color.clone(),
            border_color: color,
            border_radius: value(1, "sm", "4px"),
            padding_x: value(1, "md", "8px"),
            padding_y: value(1, "md", "8px"),
        },
    }
}

pub(crate) fn aggregate(revision: i64) -> ProjectAggregate {
    ProjectAggregate {
        id: PROJECT,
        name: "Design system".to_string(),
        revision,
        colors: vec![value(1, "Primary", "#112233")],
        radii: vec![value(1, "sm", "4px")],
        spacings: vec![value(1, "md", "8px")],
        components: vec![button(10, PROJECT, "Submit")],
    }
}
