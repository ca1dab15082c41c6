//! Design values (colors, radii, spacings).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::EntityId;
use crate::component::StyleSlot;

/// The three kinds of design value. Serialized as the `type` query parameter
/// of `/api/value` (`color`, `radius`, `spacing`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Color,
    Radius,
    Spacing,
}

impl ValueKind {
    pub const ALL: [ValueKind; 3] = [ValueKind::Color, ValueKind::Radius, ValueKind::Spacing];

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Color => "color",
            ValueKind::Radius => "radius",
            ValueKind::Spacing => "spacing",
        }
    }

    /// Initial value of a fresh draft for this kind.
    pub fn default_value(self) -> &'static str {
        match self {
            ValueKind::Color => "#000000",
            ValueKind::Radius => "2px",
            ValueKind::Spacing => "4px",
        }
    }

    /// Style slots that hold a reference to a value of this kind.
    pub fn slots(self) -> &'static [StyleSlot] {
        match self {
            ValueKind::Color => &[
                StyleSlot::BackgroundColor,
                StyleSlot::TextColor,
                StyleSlot::BorderColor,
            ],
            ValueKind::Radius => &[StyleSlot::BorderRadius],
            ValueKind::Spacing => &[StyleSlot::PaddingX, StyleSlot::PaddingY],
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(ValueKind::Color),
            "radius" => Ok(ValueKind::Radius),
            "spacing" => Ok(ValueKind::Spacing),
            other => Err(format!("unknown value type: {other}")),
        }
    }
}

/// A persisted design value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub id: EntityId,
    pub label: String,
    pub value: String,
    pub project_id: EntityId,
}

/// Body of `POST /api/value`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDraft {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl ValueDraft {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Both fields must be non-empty after trimming.
    pub fn is_complete(&self) -> bool {
        !self.label.trim().is_empty() && !self.value.trim().is_empty()
    }
}

/// Body of `PUT /api/value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueUpdate {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}
