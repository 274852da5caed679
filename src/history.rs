//! Undo/redo history over stroke collection snapshots.

use crate::draw::StrokeCollection;
use log::debug;

/// Undo and redo stacks of whole-canvas snapshots.
///
/// The undo stack always holds at least the initial snapshot, so the canvas
/// can never be undone past the state it started in. Every snapshot stored or
/// handed out is an independent copy.
#[derive(Debug)]
pub struct StrokeHistory {
    undo_stack: Vec<StrokeCollection>,
    redo_stack: Vec<StrokeCollection>,
    /// Set while a restored state is being applied to the surface
    suppressed: bool,
}

impl Default for StrokeHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeHistory {
    /// Creates a history seeded with an empty canvas.
    pub fn new() -> Self {
        Self::with_initial(&StrokeCollection::new())
    }

    /// Creates a history seeded with a copy of `initial`.
    pub fn with_initial(initial: &StrokeCollection) -> Self {
        Self {
            undo_stack: vec![initial.clone()],
            redo_stack: Vec::new(),
            suppressed: false,
        }
    }

    /// Records `current` as a new undoable state and drops the redo history.
    ///
    /// Ignored while [`suppressed`](Self::suppressed) is running.
    pub fn push(&mut self, current: &StrokeCollection) {
        if self.suppressed {
            debug!("History push suppressed during replay");
            return;
        }

        self.undo_stack.push(current.clone());
        self.redo_stack.clear();
        debug!(
            "History push: {} strokes (undo depth {})",
            current.len(),
            self.undo_stack.len()
        );
    }

    /// Steps back one state.
    ///
    /// `live` is what the surface currently shows; it is saved for redo. The
    /// returned collection is the state to apply. Returns `None` when only the
    /// initial state is left.
    pub fn undo(&mut self, live: &StrokeCollection) -> Option<StrokeCollection> {
        if self.undo_stack.len() <= 1 {
            return None;
        }

        self.redo_stack.push(live.clone());
        self.undo_stack.pop();
        let restored = self.undo_stack.last().cloned();
        debug!(
            "Undo: undo depth {}, redo depth {}",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        restored
    }

    /// Steps forward one state. Returns `None` when there is nothing to redo.
    pub fn redo(&mut self, live: &StrokeCollection) -> Option<StrokeCollection> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(live.clone());
        debug!(
            "Redo: undo depth {}, redo depth {}",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        Some(next)
    }

    /// Runs `apply` with pushes disabled, then re-enables them.
    ///
    /// Used around programmatic replacement of the surface's strokes so that
    /// change notifications the surface raises while being updated do not
    /// land in history.
    pub fn suppressed<R>(&mut self, apply: impl FnOnce(&mut Self) -> R) -> R {
        self.suppressed = true;
        let result = apply(self);
        self.suppressed = false;
        result
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// The most recently recorded state.
    pub fn current(&self) -> Option<&StrokeCollection> {
        self.undo_stack.last()
    }
}
