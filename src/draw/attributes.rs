//! Drawing attribute profiles and the rules that resolve them from tool settings.

use super::color::{Color, YELLOW};
use crate::input::Tool;
use kurbo::Affine;
use serde::{Deserialize, Serialize};

/// Fixed highlighter tip size in pixels.
pub const HIGHLIGHTER_SIZE: f64 = 20.0;

/// Rotation applied to the calligraphy tip, in degrees.
pub const CALLIGRAPHY_ANGLE_DEGREES: f64 = 45.0;

/// Height of the calligraphy tip relative to its width.
pub const CALLIGRAPHY_FLATTEN: f64 = 0.3;

/// Geometry of the stylus tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipShape {
    Ellipse,
    Rectangle,
}

/// Concrete attributes a surface uses to paint new strokes.
///
/// Profiles are plain values: they are rebuilt on every attribute-affecting
/// event and never mutated after being handed to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingAttributes {
    pub color: Color,
    pub width: f64,
    pub height: f64,
    pub tip: TipShape,
    /// Optional tip transform (rotation and flattening for calligraphy)
    pub tip_transform: Option<Affine>,
    pub is_highlighter: bool,
    /// Smooth the recorded points into curves when rendering
    pub fit_to_curve: bool,
}

impl DrawingAttributes {
    /// Round pen tip of the given color and size.
    pub fn pen(color: Color, size: f64) -> Self {
        Self {
            color,
            width: size,
            height: size,
            tip: TipShape::Ellipse,
            tip_transform: None,
            is_highlighter: false,
            fit_to_curve: true,
        }
    }
}

impl Default for DrawingAttributes {
    fn default() -> Self {
        Self::pen(super::color::BLACK, 4.0)
    }
}

/// Tunables for highlighter resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeRules {
    /// Width and height forced onto highlighter strokes
    pub highlighter_size: f64,
    /// Color substituted when the highlighter would otherwise draw pure black
    pub highlighter_fallback: Color,
}

impl Default for AttributeRules {
    fn default() -> Self {
        Self {
            highlighter_size: HIGHLIGHTER_SIZE,
            highlighter_fallback: YELLOW,
        }
    }
}

impl AttributeRules {
    /// Resolves tool settings into a drawing attribute profile.
    ///
    /// The result depends only on the arguments. Highlighters get a fixed
    /// rectangular tip and never paint pure black; a calligraphy pen gets an
    /// elliptical tip rotated by 45° and flattened to 30% so stroke thickness
    /// varies with drawing direction.
    pub fn resolve(
        &self,
        tool: Tool,
        color: Color,
        size: f64,
        calligraphy_enabled: bool,
    ) -> DrawingAttributes {
        let mut attributes = DrawingAttributes::pen(color, size);

        match tool {
            Tool::Highlighter => {
                attributes.width = self.highlighter_size;
                attributes.height = self.highlighter_size;
                attributes.tip = TipShape::Rectangle;
                attributes.is_highlighter = true;
                if color.is_black() {
                    attributes.color = self.highlighter_fallback;
                }
            }
            Tool::Pen if calligraphy_enabled => {
                // The transform only renders with an elliptical tip.
                attributes.tip = TipShape::Ellipse;
                attributes.tip_transform = Some(calligraphy_transform());
            }
            _ => {}
        }

        attributes
    }
}

/// Resolves with the default highlighter rules.
pub fn resolve(tool: Tool, color: Color, size: f64, calligraphy_enabled: bool) -> DrawingAttributes {
    AttributeRules::default().resolve(tool, color, size, calligraphy_enabled)
}

/// Rotate first, then flatten the perpendicular axis.
pub fn calligraphy_transform() -> Affine {
    Affine::scale_non_uniform(1.0, CALLIGRAPHY_FLATTEN)
        * Affine::rotate(CALLIGRAPHY_ANGLE_DEGREES.to_radians())
}
