//! Session controller and stroke persistence.
//!
//! [`InkSession`] ties the tool state machine, the stroke history and the host
//! surface together. Stroke files are JSON, optionally gzip-compressed, and are
//! written atomically.

mod controller;
mod notify;
mod persist;

pub use controller::InkSession;
pub use notify::{LogNotifier, Notifier, RecordingNotifier};
pub use persist::{
    CURRENT_VERSION, DecodedStrokes, PersistError, PersistOptions, StrokeFileInfo, deserialize,
    inspect_file, load_strokes, save_strokes, serialize,
};

#[cfg(test)]
mod tests;
