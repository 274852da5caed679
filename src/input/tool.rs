//! Drawing tool selection.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing tool selection.
///
/// Exactly one tool is active at a time. The active tool decides the surface
/// editing mode and, for the ink tools, the attributes of new strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand ink (default)
    Pen,
    /// Wide translucent marker with a rectangular tip
    Highlighter,
    /// Removes whole strokes or parts of strokes
    Eraser,
    /// Lasso selection of existing strokes
    Select,
    /// Reserved; puts the surface in a non-drawing mode
    Text,
}

impl Tool {
    /// Whether the tool lays down ink.
    pub fn is_ink(&self) -> bool {
        matches!(self, Self::Pen | Self::Highlighter)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pen => "pen",
            Self::Highlighter => "highlighter",
            Self::Eraser => "eraser",
            Self::Select => "select",
            Self::Text => "text",
        }
    }
}

impl std::str::FromStr for Tool {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pen" => Ok(Self::Pen),
            "highlighter" => Ok(Self::Highlighter),
            "eraser" => Ok(Self::Eraser),
            "select" => Ok(Self::Select),
            "text" => Ok(Self::Text),
            _ => Err(()),
        }
    }
}

/// How the eraser removes ink.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum EraserMode {
    /// Touching a stroke deletes all of it
    ByStroke,
    /// Only the covered part is removed, possibly splitting the stroke
    #[default]
    ByPoint,
}

impl std::str::FromStr for EraserMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "by-stroke" | "stroke" => Ok(Self::ByStroke),
            "by-point" | "point" => Ok(Self::ByPoint),
            _ => Err(()),
        }
    }
}
