//! Component variants and their style references.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::EntityId;
use crate::value::{Value, ValueKind};

/// UI control types a component variant can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Button,
    Select,
    TextInput,
    RadioInput,
    CheckboxInput,
}

impl ComponentType {
    pub const ALL: [ComponentType; 5] = [
        ComponentType::Button,
        ComponentType::Select,
        ComponentType::TextInput,
        ComponentType::RadioInput,
        ComponentType::CheckboxInput,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ComponentType::Button => "button",
            ComponentType::Select => "select",
            ComponentType::TextInput => "text_input",
            ComponentType::RadioInput => "radio_input",
            ComponentType::CheckboxInput => "checkbox_input",
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown component type: {s}"))
    }
}

/// One of the six named references on a component's style record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleSlot {
    BackgroundColor,
    TextColor,
    BorderColor,
    BorderRadius,
    PaddingX,
    PaddingY,
}

impl StyleSlot {
    pub const ALL: [StyleSlot; 6] = [
        StyleSlot::BackgroundColor,
        StyleSlot::TextColor,
        StyleSlot::BorderColor,
        StyleSlot::BorderRadius,
        StyleSlot::PaddingX,
        StyleSlot::PaddingY,
    ];

    /// Kind of value this slot must reference.
    pub fn kind(self) -> ValueKind {
        match self {
            StyleSlot::BackgroundColor | StyleSlot::TextColor | StyleSlot::BorderColor => {
                ValueKind::Color
            }
            StyleSlot::BorderRadius => ValueKind::Radius,
            StyleSlot::PaddingX | StyleSlot::PaddingY => ValueKind::Spacing,
        }
    }

    /// JSON field name, as used in `styles` payloads.
    pub fn field_name(self) -> &'static str {
        match self {
            StyleSlot::BackgroundColor => "backgroundColor",
            StyleSlot::TextColor => "textColor",
            StyleSlot::BorderColor => "borderColor",
            StyleSlot::BorderRadius => "borderRadius",
            StyleSlot::PaddingX => "paddingX",
            StyleSlot::PaddingY => "paddingY",
        }
    }
}

impl fmt::Display for StyleSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// The six value ids a component style points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRefs {
    pub background_color: EntityId,
    pub text_color: EntityId,
    pub border_color: EntityId,
    pub border_radius: EntityId,
    pub padding_x: EntityId,
    pub padding_y: EntityId,
}

impl StyleRefs {
    pub fn get(&self, slot: StyleSlot) -> EntityId {
        match slot {
            StyleSlot::BackgroundColor => self.background_color,
            StyleSlot::TextColor => self.text_color,
            StyleSlot::BorderColor => self.border_color,
            StyleSlot::BorderRadius => self.border_radius,
            StyleSlot::PaddingX => self.padding_x,
            StyleSlot::PaddingY => self.padding_y,
        }
    }

    /// Same id in every slot. Handy when a project has one value per kind.
    pub fn uniform(id: EntityId) -> Self {
        Self {
            background_color: id,
            text_color: id,
            border_color: id,
            border_radius: id,
            padding_x: id,
            padding_y: id,
        }
    }
}

/// A component style with every reference resolved to its value record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub component_id: EntityId,
    pub background_color: Value,
    pub text_color: Value,
    pub border_color: Value,
    pub border_radius: Value,
    pub padding_x: Value,
    pub padding_y: Value,
}

impl ResolvedStyle {
    pub fn slot(&self, slot: StyleSlot) -> &Value {
        match slot {
            StyleSlot::BackgroundColor => &self.background_color,
            StyleSlot::TextColor => &self.text_color,
            StyleSlot::BorderColor => &self.border_color,
            StyleSlot::BorderRadius => &self.border_radius,
            StyleSlot::PaddingX => &self.padding_x,
            StyleSlot::PaddingY => &self.padding_y,
        }
    }

    pub fn slot_mut(&mut self, slot: StyleSlot) -> &mut Value {
        match slot {
            StyleSlot::BackgroundColor => &mut self.background_color,
            StyleSlot::TextColor => &mut self.text_color,
            StyleSlot::BorderColor => &mut self.border_color,
            StyleSlot::BorderRadius => &mut self.border_radius,
            StyleSlot::PaddingX => &mut self.padding_x,
            StyleSlot::PaddingY => &mut self.padding_y,
        }
    }

    pub fn refs(&self) -> StyleRefs {
        StyleRefs {
            background_color: self.background_color.id,
            text_color: self.text_color.id,
            border_color: self.border_color.id,
            border_radius: self.border_radius.id,
            padding_x: self.padding_x.id,
            padding_y: self.padding_y.id,
        }
    }
}

/// A component variant with its resolved style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: EntityId,
    #[serde(rename = "type")]
    pub component_type: ComponentType,
    pub variant: String,
    pub project_id: EntityId,
    pub styles: ResolvedStyle,
}

/// Body of `POST /api/component`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentCreate {
    #[serde(default)]
    pub variant: String,
    pub styles: StyleRefs,
}

/// Body of `PUT /api/component`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentUpdate {
    pub id: EntityId,
    #[serde(default)]
    pub variant: String,
    pub styles: StyleRefs,
}
