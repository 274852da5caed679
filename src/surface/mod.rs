//! Boundary between the session engine and the host drawing surface.
//!
//! The host surface owns rendering and pointer input. The engine tells it
//! which editing mode and attributes to use and swaps its stroke set for undo,
//! redo and load; the surface reports committed and erased strokes back as
//! [`SurfaceEvent`]s.

mod memory;

pub use memory::MemorySurface;

use crate::draw::{DrawingAttributes, StrokeCollection, TileDescriptor};
use serde::Serialize;

/// What pointer input on the surface does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditingMode {
    /// Pointer lays down ink with the current attributes
    Ink,
    /// Pointer selects existing strokes
    Select,
    /// Pointer does nothing (reserved for text)
    None,
    /// Touching a stroke deletes the whole stroke
    EraseByStroke,
    /// Removes ink under a square eraser of the given side length
    EraseByPoint { size: f64 },
}

/// Change notifications raised by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A new stroke was committed by the user
    StrokeCollected,
    /// Ink was erased (whole strokes or parts of strokes)
    StrokeErased,
}

/// Everything a tool change asks the surface to apply, in one value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceUpdate {
    pub editing_mode: Option<EditingMode>,
    pub attributes: Option<DrawingAttributes>,
    /// Drop whatever strokes are currently selected
    pub clear_selection: bool,
}

impl SurfaceUpdate {
    pub fn mode(mode: EditingMode) -> Self {
        Self {
            editing_mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn ink(attributes: DrawingAttributes) -> Self {
        Self {
            editing_mode: Some(EditingMode::Ink),
            attributes: Some(attributes),
            clear_selection: false,
        }
    }

    /// Attributes only, leaving the editing mode as it is.
    pub fn attributes(attributes: DrawingAttributes) -> Self {
        Self {
            attributes: Some(attributes),
            ..Self::default()
        }
    }

    /// Applies the update to `surface`.
    pub fn apply_to<S: InkSurface + ?Sized>(&self, surface: &mut S) {
        if let Some(mode) = self.editing_mode {
            surface.set_editing_mode(mode);
        }
        if self.clear_selection {
            surface.clear_selection();
        }
        if let Some(attributes) = self.attributes {
            surface.set_drawing_attributes(attributes);
        }
    }
}

/// Host drawing surface driven by an [`InkSession`](crate::session::InkSession).
pub trait InkSurface {
    /// The strokes currently shown.
    fn strokes(&self) -> &StrokeCollection;

    /// Replaces the shown strokes.
    ///
    /// Returns any change notifications the surface raised while doing so;
    /// the session routes them through history with pushes suppressed.
    fn replace_strokes(&mut self, strokes: StrokeCollection) -> Vec<SurfaceEvent>;

    fn set_editing_mode(&mut self, mode: EditingMode);

    fn set_drawing_attributes(&mut self, attributes: DrawingAttributes);

    fn clear_selection(&mut self);

    fn set_background(&mut self, tile: TileDescriptor);
}
