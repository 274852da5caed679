use super::core::{ERASER_SIZE_RANGE, SIZE_RANGE, ToolStateMachine, clamp_size};
use crate::draw::Color;
use crate::input::tool::{EraserMode, Tool};
use crate::surface::SurfaceUpdate;

impl ToolStateMachine {
    /// Stores the picked color. Re-resolves ink attributes if an ink tool is active.
    pub fn set_color(&mut self, color: Color) -> Option<SurfaceUpdate> {
        self.state.current_color = color;
        self.ink_update()
    }

    /// Stores the pen size. Re-resolves ink attributes if an ink tool is active.
    pub fn set_size(&mut self, size: f64) -> Option<SurfaceUpdate> {
        self.state.current_size = clamp_size(size, SIZE_RANGE);
        self.ink_update()
    }

    /// Toggles calligraphy. Re-resolves ink attributes if an ink tool is active.
    pub fn set_calligraphy(&mut self, enabled: bool) -> Option<SurfaceUpdate> {
        self.state.calligraphy_enabled = enabled;
        self.ink_update()
    }

    /// Stores the eraser mode. Re-applies the eraser if it is active.
    pub fn set_eraser_mode(&mut self, mode: EraserMode) -> Option<SurfaceUpdate> {
        self.state.eraser_mode = mode;
        self.eraser_update()
    }

    /// Stores the eraser size.
    ///
    /// Only has a visible effect while the point eraser is active; with the
    /// stroke eraser the new size is picked up when switching to point mode.
    pub fn set_eraser_size(&mut self, size: f64) -> Option<SurfaceUpdate> {
        self.state.eraser_size = clamp_size(size, ERASER_SIZE_RANGE);
        if self.state.eraser_mode == EraserMode::ByPoint {
            self.eraser_update()
        } else {
            None
        }
    }

    fn ink_update(&self) -> Option<SurfaceUpdate> {
        self.state
            .active_tool
            .is_ink()
            .then(|| SurfaceUpdate::attributes(self.attributes()))
    }

    fn eraser_update(&self) -> Option<SurfaceUpdate> {
        (self.state.active_tool == Tool::Eraser)
            .then(|| SurfaceUpdate::mode(self.eraser_editing_mode()))
    }
}
