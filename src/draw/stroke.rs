//! Strokes and the ordered collections that make up a canvas.

use super::attributes::DrawingAttributes;
use kurbo::{Line, ParamCurveNearest, Point, Rect};
use serde::{Deserialize, Serialize};

/// One continuous gesture: the traced points plus the attributes it was drawn with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Points in the order they were traced
    pub points: Vec<Point>,
    /// Attributes active when the stroke was committed
    pub attributes: DrawingAttributes,
}

impl Stroke {
    pub fn new(points: Vec<Point>, attributes: DrawingAttributes) -> Self {
        Self { points, attributes }
    }

    /// Whether every coordinate and attribute value is a finite number.
    pub fn is_finite(&self) -> bool {
        let attributes = &self.attributes;
        let color = attributes.color;
        self.points.iter().all(|p| p.is_finite())
            && attributes.width.is_finite()
            && attributes.height.is_finite()
            && [color.r, color.g, color.b, color.a]
                .iter()
                .all(|c| c.is_finite())
            && attributes.tip_transform.is_none_or(|t| t.is_finite())
    }

    /// Returns true when `point` lies on the painted area of this stroke,
    /// widened by `tolerance`.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let reach = self.attributes.width.max(self.attributes.height) / 2.0 + tolerance;
        let reach_sq = reach * reach;

        match self.points.as_slice() {
            [] => false,
            [only] => (*only - point).hypot2() <= reach_sq,
            points => points.windows(2).any(|pair| {
                let segment = Line::new(pair[0], pair[1]);
                segment.nearest(point, 1e-6).distance_sq <= reach_sq
            }),
        }
    }

    /// Cuts away the part of the stroke covered by `area`, returning the
    /// surviving runs as new strokes with the same attributes.
    ///
    /// `area` is widened by half the tip size, so the eraser only has to touch
    /// the painted ink. Segments crossing the area are cut at the crossing
    /// points. Returns `None` when the stroke is untouched.
    pub fn split_outside(&self, area: Rect) -> Option<Vec<Stroke>> {
        let reach = self.attributes.width.max(self.attributes.height) / 2.0;
        let area = area.inflate(reach, reach);

        match self.points.as_slice() {
            [] => return None,
            [only] => return contains_closed(area, *only).then(Vec::new),
            _ => {}
        }

        let mut touched = false;
        let mut pieces = Vec::new();
        let mut run: Vec<Point> = Vec::new();
        let mut flush = |run: &mut Vec<Point>| {
            if run.len() >= 2 {
                pieces.push(Stroke::new(std::mem::take(run), self.attributes));
            }
            run.clear();
        };

        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            match clip_segment(Line::new(a, b), area) {
                None => {
                    if run.is_empty() {
                        run.push(a);
                    }
                    run.push(b);
                }
                Some((enter, leave)) => {
                    touched = true;
                    if enter > CLIP_EPSILON {
                        if run.is_empty() {
                            run.push(a);
                        }
                        run.push(a.lerp(b, enter));
                    }
                    flush(&mut run);
                    if leave < 1.0 - CLIP_EPSILON {
                        run.push(a.lerp(b, leave));
                        run.push(b);
                    }
                }
            }
        }
        flush(&mut run);

        touched.then_some(pieces)
    }
}

const CLIP_EPSILON: f64 = 1e-9;

fn contains_closed(area: Rect, p: Point) -> bool {
    p.x >= area.x0 && p.x <= area.x1 && p.y >= area.y0 && p.y <= area.y1
}

/// Parameter range `(enter, leave)` of `line` that lies inside `area`
/// (Liang-Barsky), or `None` if the segment misses it.
fn clip_segment(line: Line, area: Rect) -> Option<(f64, f64)> {
    let delta = line.p1 - line.p0;
    let mut enter = 0.0_f64;
    let mut leave = 1.0_f64;

    let edges = [
        (-delta.x, line.p0.x - area.x0),
        (delta.x, area.x1 - line.p0.x),
        (-delta.y, line.p0.y - area.y0),
        (delta.y, area.y1 - line.p0.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                enter = enter.max(t);
            } else {
                leave = leave.min(t);
            }
        }
    }

    let degenerate = delta.hypot2() == 0.0;
    if enter > leave || (!degenerate && leave - enter <= CLIP_EPSILON) {
        return None;
    }
    Some((enter, leave))
}

/// Ordered set of strokes (first = bottom, last = top).
///
/// Cloning produces a fully independent copy; history snapshots rely on that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeCollection {
    pub strokes: Vec<Stroke>,
}

impl StrokeCollection {
    /// Creates an empty collection.
    pub const fn new() -> Self {
        Self {
            strokes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Adds a stroke on top of the existing ones.
    pub fn push(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stroke> {
        self.strokes.iter()
    }

    /// Total number of recorded points across all strokes.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.points.len()).sum()
    }

    /// Removes every stroke hit at `point`. Returns how many were removed.
    pub fn erase_strokes_at(&mut self, point: Point) -> usize {
        let before = self.strokes.len();
        self.strokes.retain(|stroke| !stroke.hit_test(point, 0.0));
        before - self.strokes.len()
    }

    /// Cuts the part of each stroke covered by `area`, keeping z-order.
    /// Returns true if anything changed.
    pub fn erase_area(&mut self, area: Rect) -> bool {
        let mut changed = false;
        let mut kept = Vec::with_capacity(self.strokes.len());
        for stroke in self.strokes.drain(..) {
            match stroke.split_outside(area) {
                Some(pieces) => {
                    changed = true;
                    kept.extend(pieces);
                }
                None => kept.push(stroke),
            }
        }
        self.strokes = kept;
        changed
    }
}

impl FromIterator<Stroke> for StrokeCollection {
    fn from_iter<I: IntoIterator<Item = Stroke>>(iter: I) -> Self {
        Self {
            strokes: iter.into_iter().collect(),
        }
    }
}
