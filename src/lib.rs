//! Library exports for the inkpad session engine.
//!
//! Hosts embed [`session::InkSession`] and implement [`surface::InkSurface`]
//! for their drawing widget. Configuration data structures are exposed so
//! external tools can share validation logic and the config schema.

pub mod config;
pub mod draw;
pub mod history;
pub mod input;
pub mod session;
pub mod surface;
pub mod util;

pub use config::Config;
pub use session::InkSession;
