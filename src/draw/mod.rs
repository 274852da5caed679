//! Drawing primitives shared by the session engine.
//!
//! This module defines the core drawing types:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Stroke`] / [`StrokeCollection`]: committed ink on the canvas
//! - [`DrawingAttributes`]: the attribute profile resolved from tool settings
//! - [`TileDescriptor`]: repeating paper backgrounds

pub mod attributes;
pub mod background;
pub mod color;
pub mod stroke;

pub use attributes::{AttributeRules, DrawingAttributes, TipShape, resolve};
pub use background::{BackgroundStyle, LineSpec, TileDescriptor, generate};
pub use color::Color;
pub use stroke::{Stroke, StrokeCollection};

pub use color::{BLACK, BLUE, GREEN, LIGHT_BLUE, LIGHT_GRAY, ORANGE, PINK, RED, WHITE, YELLOW};
