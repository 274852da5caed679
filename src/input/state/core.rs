//! Tool state machine.

use crate::draw::{AttributeRules, BLACK, Color, DrawingAttributes};
use crate::input::tool::{EraserMode, Tool};
use crate::surface::{EditingMode, SurfaceUpdate};
use log::debug;

/// Smallest and largest accepted pen size in pixels.
pub const SIZE_RANGE: (f64, f64) = (1.0, 50.0);

/// Smallest and largest accepted eraser side length in pixels.
pub const ERASER_SIZE_RANGE: (f64, f64) = (1.0, 100.0);

/// What a tool selection should do, decided purely from the active and
/// requested tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDecision {
    /// Switch to the requested tool
    Switch,
    /// The tool is already active: open its secondary options instead
    OpenOptions,
}

/// Decides how to handle a request to select `requested` while `active` is in use.
pub fn decide_transition(active: Tool, requested: Tool) -> TransitionDecision {
    if active == requested {
        TransitionDecision::OpenOptions
    } else {
        TransitionDecision::Switch
    }
}

/// Outcome of [`ToolStateMachine::select_tool`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolTransition {
    /// The active tool changed; `update` must be applied to the surface
    Switched {
        from: Tool,
        to: Tool,
        update: SurfaceUpdate,
    },
    /// Second consecutive selection of `0`: show its options, nothing else changes
    OpenOptions(Tool),
}

/// Session-scoped tool settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolState {
    pub active_tool: Tool,
    pub eraser_mode: EraserMode,
    /// Side length of the point eraser (only used by [`EraserMode::ByPoint`])
    pub eraser_size: f64,
    pub calligraphy_enabled: bool,
    /// The color the user picked; never rewritten by highlighter policy
    pub current_color: Color,
    pub current_size: f64,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            active_tool: Tool::Pen,
            eraser_mode: EraserMode::ByPoint,
            eraser_size: 10.0,
            calligraphy_enabled: false,
            current_color: BLACK,
            current_size: 4.0,
        }
    }
}

/// Owns the active tool and its sub-settings and turns every change into the
/// surface update it requires.
///
/// Changes are applied immediately: each call returns the update for the
/// surface, or `None` when the active tool is not affected.
#[derive(Debug, Clone)]
pub struct ToolStateMachine {
    pub(super) state: ToolState,
    pub(super) rules: AttributeRules,
}

impl Default for ToolStateMachine {
    fn default() -> Self {
        Self::new(ToolState::default(), AttributeRules::default())
    }
}

impl ToolStateMachine {
    /// Creates a machine starting from `state`, clamping out-of-range sizes.
    pub fn new(mut state: ToolState, rules: AttributeRules) -> Self {
        state.current_size = clamp_size(state.current_size, SIZE_RANGE);
        state.eraser_size = clamp_size(state.eraser_size, ERASER_SIZE_RANGE);
        Self { state, rules }
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn active_tool(&self) -> Tool {
        self.state.active_tool
    }

    /// Handles a tool-selection event.
    pub fn select_tool(&mut self, requested: Tool) -> ToolTransition {
        let from = self.state.active_tool;
        match decide_transition(from, requested) {
            TransitionDecision::OpenOptions => {
                debug!("Tool {} re-selected; opening options", requested.as_str());
                ToolTransition::OpenOptions(requested)
            }
            TransitionDecision::Switch => {
                self.state.active_tool = requested;
                debug!("Tool {} -> {}", from.as_str(), requested.as_str());
                ToolTransition::Switched {
                    from,
                    to: requested,
                    update: self.current_update(),
                }
            }
        }
    }

    /// The full surface update for the active tool.
    pub fn current_update(&self) -> SurfaceUpdate {
        match self.state.active_tool {
            Tool::Pen | Tool::Highlighter => SurfaceUpdate::ink(self.attributes()),
            Tool::Eraser => SurfaceUpdate::mode(self.eraser_editing_mode()),
            Tool::Select => SurfaceUpdate {
                clear_selection: true,
                ..SurfaceUpdate::mode(EditingMode::Select)
            },
            Tool::Text => SurfaceUpdate::mode(EditingMode::None),
        }
    }

    /// Attributes the active tool paints with.
    ///
    /// Non-ink tools resolve as a plain pen so the surface always holds a
    /// usable profile.
    pub fn attributes(&self) -> DrawingAttributes {
        self.rules.resolve(
            self.state.active_tool,
            self.state.current_color,
            self.state.current_size,
            self.state.calligraphy_enabled,
        )
    }

    /// Editing mode for the eraser, read from the stored eraser settings.
    pub fn eraser_editing_mode(&self) -> EditingMode {
        match self.state.eraser_mode {
            EraserMode::ByStroke => EditingMode::EraseByStroke,
            EraserMode::ByPoint => EditingMode::EraseByPoint {
                size: self.state.eraser_size,
            },
        }
    }
}

pub(super) fn clamp_size(size: f64, (min, max): (f64, f64)) -> f64 {
    if size.is_nan() {
        return min;
    }
    if !(min..=max).contains(&size) {
        log::warn!("Size {size:.1} outside {min:.1}-{max:.1}, clamping");
    }
    size.clamp(min, max)
}
