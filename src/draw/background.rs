//! Paper backgrounds as repeating tiles.

use super::color::{Color, LIGHT_BLUE, LIGHT_GRAY, WHITE};
use kurbo::Point;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Thickness of the paper lines in pixels.
pub const PAPER_LINE_THICKNESS: f64 = 0.5;

/// Ruled paper tile size (width is arbitrary, height is the line spacing).
pub const RULE_TILE: (f64, f64) = (100.0, 40.0);

/// Grid paper tile size.
pub const GRID_TILE: (f64, f64) = (20.0, 20.0);

/// Paper style shown behind the strokes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundStyle {
    /// Plain white paper
    #[default]
    None,
    /// Horizontal ruled lines
    Rule,
    /// Square grid
    Grid,
}

impl BackgroundStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rule => "rule",
            Self::Grid => "grid",
        }
    }
}

impl std::str::FromStr for BackgroundStyle {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "blank" => Ok(Self::None),
            "rule" | "ruled" => Ok(Self::Rule),
            "grid" => Ok(Self::Grid),
            _ => Err(()),
        }
    }
}

/// One line segment drawn inside a tile, in tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    pub from: Point,
    pub to: Point,
    pub color: Color,
    pub thickness: f64,
}

/// Repeating background pattern.
///
/// The tile is laid out in absolute pixels starting at the canvas origin and
/// repeats in both directions. A descriptor without a tile size is a plain
/// fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDescriptor {
    /// Tile size in pixels, `None` for an untiled fill
    pub tile_size: Option<(f64, f64)>,
    /// Opaque paper fill painted under the lines
    pub fill: Color,
    pub lines: Vec<LineSpec>,
}

impl TileDescriptor {
    pub fn tile_width(&self) -> Option<f64> {
        self.tile_size.map(|(w, _)| w)
    }

    pub fn tile_height(&self) -> Option<f64> {
        self.tile_size.map(|(_, h)| h)
    }

    pub fn is_plain(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Builds the tile descriptor for a paper style.
pub fn generate(style: BackgroundStyle) -> TileDescriptor {
    match style {
        BackgroundStyle::None => TileDescriptor {
            tile_size: None,
            fill: WHITE,
            lines: Vec::new(),
        },
        BackgroundStyle::Rule => {
            let (w, h) = RULE_TILE;
            TileDescriptor {
                tile_size: Some(RULE_TILE),
                fill: WHITE,
                lines: vec![paper_line((0.0, h), (w, h), LIGHT_BLUE)],
            }
        }
        BackgroundStyle::Grid => {
            let (w, h) = GRID_TILE;
            TileDescriptor {
                tile_size: Some(GRID_TILE),
                fill: WHITE,
                lines: vec![
                    paper_line((0.0, 0.0), (w, 0.0), LIGHT_GRAY),
                    paper_line((0.0, 0.0), (0.0, h), LIGHT_GRAY),
                ],
            }
        }
    }
}

fn paper_line(from: (f64, f64), to: (f64, f64), color: Color) -> LineSpec {
    LineSpec {
        from: from.into(),
        to: to.into(),
        color,
        thickness: PAPER_LINE_THICKNESS,
    }
}
