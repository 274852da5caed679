//! Input handling and tool state machine.
//!
//! This module holds the active tool and its settings, decides what a tool
//! selection does, and describes keyboard input in a backend-neutral way so
//! configured shortcuts can be matched.

pub mod events;
pub mod modifiers;
pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use events::Key;
pub use modifiers::Modifiers;
pub use state::{ToolState, ToolStateMachine, ToolTransition, TransitionDecision, decide_transition};
pub use tool::{EraserMode, Tool};
