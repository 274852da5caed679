use super::notify::{LogNotifier, Notifier};
use super::persist::{self, PersistError, PersistOptions};
use crate::config::{Action, Config, KeyBinding, KeybindingsConfig};
use crate::draw::{AttributeRules, BackgroundStyle, Color, StrokeCollection, generate};
use crate::history::StrokeHistory;
use crate::input::{EraserMode, Key, Modifiers, Tool, ToolState, ToolStateMachine, ToolTransition};
use crate::surface::{InkSurface, SurfaceEvent, SurfaceUpdate};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;

/// One inking session: tool state, stroke history, paper style and the
/// attached drawing surface.
///
/// Until a surface is attached, tool and background changes are only
/// recorded; history, clearing and file operations do nothing.
pub struct InkSession<S: InkSurface, N: Notifier = LogNotifier> {
    tools: ToolStateMachine,
    history: StrokeHistory,
    background: BackgroundStyle,
    persist: PersistOptions,
    action_map: HashMap<KeyBinding, Action>,
    notifier: N,
    surface: Option<S>,
}

impl<S: InkSurface> Default for InkSession<S> {
    fn default() -> Self {
        Self::new(LogNotifier)
    }
}

impl<S: InkSurface, N: Notifier> InkSession<S, N> {
    /// Session with built-in defaults.
    pub fn new(notifier: N) -> Self {
        Self {
            tools: ToolStateMachine::default(),
            history: StrokeHistory::new(),
            background: BackgroundStyle::default(),
            persist: PersistOptions::default(),
            action_map: default_action_map(),
            notifier,
            surface: None,
        }
    }

    /// Session starting from the user's configuration.
    pub fn from_config(config: &Config, notifier: N) -> Self {
        let action_map = config.keybindings.build_action_map().unwrap_or_else(|err| {
            warn!("Invalid keybindings ({err}), using defaults");
            default_action_map()
        });

        Self {
            tools: ToolStateMachine::new(config.tool_state(), config.attribute_rules()),
            history: StrokeHistory::new(),
            background: config.background.style,
            persist: PersistOptions::from_config(&config.persistence),
            action_map,
            notifier,
            surface: None,
        }
    }

    /// Overrides the starting tool settings and highlighter rules.
    pub fn with_tools(mut self, state: ToolState, rules: AttributeRules) -> Self {
        self.tools = ToolStateMachine::new(state, rules);
        self
    }

    /// Attaches the drawing surface.
    ///
    /// The active tool and paper style are applied to it, and history is reset
    /// to a single snapshot of whatever the surface already shows.
    pub fn attach_surface(&mut self, mut surface: S) {
        self.tools.current_update().apply_to(&mut surface);
        surface.set_background(generate(self.background));
        self.history = StrokeHistory::with_initial(surface.strokes());
        info!(
            "Surface attached with {} strokes, tool {}",
            surface.strokes().len(),
            self.tools.active_tool().as_str()
        );
        self.surface = Some(surface);
    }

    /// Detaches and returns the surface, if any.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn tool_state(&self) -> &ToolState {
        self.tools.state()
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    pub fn background_style(&self) -> BackgroundStyle {
        self.background
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Records a change the surface reports.
    ///
    /// Committed and erased strokes each become one undoable state. Events
    /// raised while a restored state is being applied are ignored by history.
    pub fn handle_surface_event(&mut self, event: SurfaceEvent) {
        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        match event {
            SurfaceEvent::StrokeCollected | SurfaceEvent::StrokeErased => {
                debug!("Surface event {:?}", event);
                self.history.push(surface.strokes());
            }
        }
    }

    /// Handles a tool button press.
    ///
    /// Pressing the active tool again reports [`ToolTransition::OpenOptions`]
    /// and leaves the surface untouched.
    pub fn select_tool(&mut self, tool: Tool) -> ToolTransition {
        let transition = self.tools.select_tool(tool);
        if let ToolTransition::Switched { update, .. } = &transition {
            self.apply(Some(*update));
        }
        transition
    }

    pub fn set_color(&mut self, color: Color) {
        let update = self.tools.set_color(color);
        self.apply(update);
    }

    pub fn set_size(&mut self, size: f64) {
        let update = self.tools.set_size(size);
        self.apply(update);
    }

    pub fn set_calligraphy(&mut self, enabled: bool) {
        let update = self.tools.set_calligraphy(enabled);
        self.apply(update);
    }

    pub fn set_eraser_mode(&mut self, mode: EraserMode) {
        let update = self.tools.set_eraser_mode(mode);
        self.apply(update);
    }

    pub fn set_eraser_size(&mut self, size: f64) {
        let update = self.tools.set_eraser_size(size);
        self.apply(update);
    }

    pub fn set_background_style(&mut self, style: BackgroundStyle) {
        self.background = style;
        debug!("Background style set to {}", style.as_str());
        if let Some(surface) = self.surface.as_mut() {
            surface.set_background(generate(style));
        }
    }

    /// Removes all strokes as one undoable step.
    pub fn clear_canvas(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        replay(&mut self.history, surface, StrokeCollection::new());
        self.history.push(surface.strokes());
        info!("Canvas cleared");
    }

    pub fn undo(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Some(restored) = self.history.undo(surface.strokes()) {
            replay(&mut self.history, surface, restored);
        }
    }

    pub fn redo(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Some(restored) = self.history.redo(surface.strokes()) {
            replay(&mut self.history, surface, restored);
        }
    }

    /// Writes the shown strokes to `path`.
    ///
    /// The outcome is reported through the notifier; a failure changes nothing.
    pub fn save(&mut self, path: &Path) -> Result<(), PersistError> {
        let Some(surface) = self.surface.as_ref() else {
            debug!("Save ignored: no surface attached");
            return Ok(());
        };

        match persist::save_strokes(path, surface.strokes(), &self.persist) {
            Ok(_) => {
                self.notifier.notify("Save Successful!");
                Ok(())
            }
            Err(err) => {
                warn!("Failed to save strokes to {}: {}", path.display(), err);
                self.notifier.notify(&format!("Save Failed: {err}"));
                Err(err)
            }
        }
    }

    /// Replaces the shown strokes with the contents of `path`.
    ///
    /// A successful load is one undoable step. On failure the user is notified
    /// and neither the strokes nor the history change.
    pub fn load(&mut self, path: &Path) -> Result<(), PersistError> {
        let Some(surface) = self.surface.as_mut() else {
            debug!("Load ignored: no surface attached");
            return Ok(());
        };

        match persist::load_strokes(path, &self.persist) {
            Ok(decoded) => {
                replay(&mut self.history, surface, decoded.strokes);
                self.history.push(surface.strokes());
                info!("Loaded strokes from {}", path.display());
                Ok(())
            }
            Err(err) => {
                warn!("Failed to load strokes from {}: {}", path.display(), err);
                self.notifier.notify(&format!("Load Failed: {err}"));
                Err(err)
            }
        }
    }

    /// Runs the action bound to `key` with `modifiers`, if any.
    ///
    /// Returns the action that ran.
    pub fn on_key_press(&mut self, key: Key, modifiers: Modifiers) -> Option<Action> {
        let name = key.binding_name()?;
        let binding = KeyBinding::pressed(&name, modifiers.ctrl, modifiers.shift, modifiers.alt);
        let action = self.action_map.get(&binding).copied()?;
        debug!("Key {:?} -> {:?}", key, action);

        match action {
            Action::Undo => self.undo(),
            Action::Redo => self.redo(),
            Action::ClearCanvas => self.clear_canvas(),
        }
        Some(action)
    }

    fn apply(&mut self, update: Option<SurfaceUpdate>) {
        if let (Some(update), Some(surface)) = (update, self.surface.as_mut()) {
            update.apply_to(surface);
        }
    }
}

/// Swaps the surface's strokes for `strokes` with history pushes suppressed,
/// routing whatever change events the surface raises meanwhile.
fn replay<S: InkSurface>(history: &mut StrokeHistory, surface: &mut S, strokes: StrokeCollection) {
    history.suppressed(|history| {
        for event in surface.replace_strokes(strokes) {
            debug!("Surface event {:?} during replay", event);
            history.push(surface.strokes());
        }
    });
}

fn default_action_map() -> HashMap<KeyBinding, Action> {
    KeybindingsConfig::default()
        .build_action_map()
        .unwrap_or_default()
}
