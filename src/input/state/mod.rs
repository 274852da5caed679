mod actions;
mod core;

pub use self::core::{
    ERASER_SIZE_RANGE, SIZE_RANGE, ToolState, ToolStateMachine, ToolTransition,
    TransitionDecision, decide_transition,
};
