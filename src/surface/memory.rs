//! In-memory surface used headless and in tests.

use super::{EditingMode, InkSurface, SurfaceEvent};
use crate::draw::{
    BackgroundStyle, DrawingAttributes, Stroke, StrokeCollection, TileDescriptor, generate,
};
use kurbo::{Point, Rect};

/// Surface that keeps strokes in memory and applies pointer gestures the way a
/// real canvas would for the current editing mode.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    strokes: StrokeCollection,
    editing_mode: EditingMode,
    attributes: DrawingAttributes,
    background: TileDescriptor,
    /// Indices of selected strokes (selection mode only)
    selection: Vec<usize>,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::with_strokes(StrokeCollection::new())
    }

    /// Starts with existing ink already on the canvas.
    pub fn with_strokes(strokes: StrokeCollection) -> Self {
        Self {
            strokes,
            editing_mode: EditingMode::Ink,
            attributes: DrawingAttributes::default(),
            background: generate(BackgroundStyle::None),
            selection: Vec::new(),
        }
    }

    pub fn editing_mode(&self) -> EditingMode {
        self.editing_mode
    }

    pub fn attributes(&self) -> &DrawingAttributes {
        &self.attributes
    }

    pub fn background(&self) -> &TileDescriptor {
        &self.background
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    /// Traces a gesture through `points`.
    ///
    /// In ink mode this commits a stroke with the current attributes; in the
    /// erase modes it erases along the path. Returns the resulting change
    /// notification, or `None` when nothing changed.
    pub fn trace(&mut self, points: &[Point]) -> Option<SurfaceEvent> {
        if points.is_empty() {
            return None;
        }

        match self.editing_mode {
            EditingMode::Ink => {
                self.strokes
                    .push(Stroke::new(points.to_vec(), self.attributes));
                Some(SurfaceEvent::StrokeCollected)
            }
            EditingMode::EraseByStroke => {
                let removed: usize = points
                    .iter()
                    .map(|p| self.strokes.erase_strokes_at(*p))
                    .sum();
                (removed > 0).then_some(SurfaceEvent::StrokeErased)
            }
            EditingMode::EraseByPoint { size } => {
                let mut changed = false;
                for point in points {
                    let area = Rect::from_center_size(*point, (size, size));
                    changed |= self.strokes.erase_area(area);
                }
                changed.then_some(SurfaceEvent::StrokeErased)
            }
            EditingMode::Select => {
                self.selection = self
                    .strokes
                    .iter()
                    .enumerate()
                    .filter(|(_, stroke)| points.iter().any(|p| stroke.hit_test(*p, 0.0)))
                    .map(|(index, _)| index)
                    .collect();
                None
            }
            EditingMode::None => None,
        }
    }
}

impl InkSurface for MemorySurface {
    fn strokes(&self) -> &StrokeCollection {
        &self.strokes
    }

    fn replace_strokes(&mut self, strokes: StrokeCollection) -> Vec<SurfaceEvent> {
        self.strokes = strokes;
        self.selection.clear();
        Vec::new()
    }

    fn set_editing_mode(&mut self, mode: EditingMode) {
        self.editing_mode = mode;
    }

    fn set_drawing_attributes(&mut self, attributes: DrawingAttributes) {
        self.attributes = attributes;
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn set_background(&mut self, tile: TileDescriptor) {
        self.background = tile;
    }
}
