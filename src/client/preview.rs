//! CSS preview of a component style, resolved against the project snapshot.

use std::fmt::Write as _;
use swatchbook_cache::ProjectSnapshot;
use swatchbook_schema::{Component, EntityId, StyleSlot, ValueKind};

/// Shown for a slot with no selection, or one pointing at an unknown value.
pub fn placeholder(slot: StyleSlot) -> &'static str {
    match slot {
        StyleSlot::BackgroundColor | StyleSlot::BorderColor => "#f0f0f0",
        StyleSlot::TextColor => "#000000",
        StyleSlot::BorderRadius | StyleSlot::PaddingX | StyleSlot::PaddingY => "0",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylePreview {
    pub background_color: String,
    pub color: String,
    pub border_color: String,
    pub border_radius: String,
    pub padding_x: String,
    pub padding_y: String,
}

impl StylePreview {
    /// Resolves each slot id through the snapshot's value maps.
    pub fn resolve<F>(snapshot: &ProjectSnapshot, slot_id: F) -> Self
    where
        F: Fn(StyleSlot) -> Option<EntityId>,
    {
        let colors = snapshot.value_map(ValueKind::Color);
        let radii = snapshot.value_map(ValueKind::Radius);
        let spacings = snapshot.value_map(ValueKind::Spacing);

        let pick = |slot: StyleSlot| -> String {
            let map = match slot.kind() {
                ValueKind::Color => &colors,
                ValueKind::Radius => &radii,
                ValueKind::Spacing => &spacings,
            };
            slot_id(slot)
                .and_then(|id| map.get(&id).copied())
                .unwrap_or_else(|| placeholder(slot))
                .to_string()
        };

        Self {
            background_color: pick(StyleSlot::BackgroundColor),
            color: pick(StyleSlot::TextColor),
            border_color: pick(StyleSlot::BorderColor),
            border_radius: pick(StyleSlot::BorderRadius),
            padding_x: pick(StyleSlot::PaddingX),
            padding_y: pick(StyleSlot::PaddingY),
        }
    }

    /// Uses the values embedded in a cached component.
    pub fn of_component(component: &Component) -> Self {
        let styles = &component.styles;
        Self {
            background_color: styles.background_color.value.clone(),
            color: styles.text_color.value.clone(),
            border_color: styles.border_color.value.clone(),
            border_radius: styles.border_radius.value.clone(),
            padding_x: styles.padding_x.value.clone(),
            padding_y: styles.padding_y.value.clone(),
        }
    }

    pub fn declarations(&self) -> [(&'static str, String); 5] {
        [
            ("background-color", self.background_color.clone()),
            ("color", self.color.clone()),
            ("border-color", self.border_color.clone()),
            ("border-radius", self.border_radius.clone()),
            ("padding", format!("{} {}", self.padding_y, self.padding_x)),
        ]
    }

    /// Inline style string, e.g. for a `style` attribute.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (property, value) in self.declarations() {
            if !css.is_empty() {
                css.push(' ');
            }
            let _ = write!(css, "{property}: {value};");
        }
        css
    }
}
