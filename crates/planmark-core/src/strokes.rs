//! Freehand strokes and the recorder that captures them.

use crate::color::PenColor;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// A freehand path in image space drawn with a single color.
///
/// Always holds at least one point; deserialization rejects empty or
/// non-finite point lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StrokeData")]
pub struct Stroke {
    id: StrokeId,
    /// Points in image space, in drawing order.
    points: Vec<Point>,
    /// Pen color the stroke was drawn with.
    pub color: PenColor,
    /// Width in image-space pixels.
    pub width: f64,
}

impl Stroke {
    /// Start a stroke at a single point.
    pub fn new(start: Point, color: PenColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            color,
            width,
        }
    }

    /// Create from existing points. Returns None for an empty point list.
    pub fn from_points(points: Vec<Point>, color: PenColor, width: f64) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            points,
            color,
            width,
        })
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A tap without drag.
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }

    fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Polyline through the points (a lone `move_to` for a dot).
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(*first);
            for point in points {
                path.line_to(*point);
            }
        }
        path
    }

    /// Bounding box of the points (without stroke width).
    pub fn bounds(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        self.points
            .iter()
            .skip(1)
            .fold(Rect::from_points(*first, *first), |rect, p| rect.union_pt(*p))
    }
}

/// Unchecked wire form of a [`Stroke`].
#[derive(Deserialize)]
struct StrokeData {
    id: StrokeId,
    points: Vec<Point>,
    color: PenColor,
    width: f64,
}

impl TryFrom<StrokeData> for Stroke {
    type Error = &'static str;

    fn try_from(data: StrokeData) -> Result<Self, Self::Error> {
        if data.points.is_empty() {
            return Err("stroke has no points");
        }
        if !data.points.iter().all(|p| is_finite(*p)) {
            return Err("stroke has non-finite points");
        }
        if !(data.width.is_finite() && data.width > 0.0) {
            return Err("stroke width must be finite and positive");
        }
        Ok(Self {
            id: data.id,
            points: data.points,
            color: data.color,
            width: data.width,
        })
    }
}

/// Records the in-progress stroke and the ordered list of committed strokes.
#[derive(Debug, Clone)]
pub struct StrokeRecorder {
    current: Option<Stroke>,
    committed: Vec<Stroke>,
    width: f64,
    keep_dots: bool,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new(2.0, true)
    }
}

impl StrokeRecorder {
    /// Create an empty recorder. `keep_dots` controls whether taps are committed.
    pub fn new(width: f64, keep_dots: bool) -> Self {
        Self {
            current: None,
            committed: Vec::new(),
            width,
            keep_dots,
        }
    }

    /// Start a new stroke. Returns false (and does nothing) if one is in progress.
    pub fn begin(&mut self, point: Point, color: PenColor) -> bool {
        if self.current.is_some() {
            log::debug!("Stroke already in progress, ignoring begin");
            return false;
        }
        if !is_finite(point) {
            log::warn!("Ignoring stroke start at non-finite point {:?}", point);
            return false;
        }
        self.current = Some(Stroke::new(point, color, self.width));
        true
    }

    /// Append a point to the current stroke. Returns false when nothing was appended.
    pub fn extend(&mut self, point: Point) -> bool {
        match self.current.as_mut() {
            Some(stroke) if is_finite(point) => {
                stroke.push(point);
                true
            }
            Some(_) => {
                log::warn!("Dropping non-finite stroke point {:?}", point);
                false
            }
            None => false,
        }
    }

    /// Move the current stroke onto the committed list.
    ///
    /// Returns the committed stroke's id, or None if there was nothing to
    /// commit (or the stroke was a dot and dots are discarded).
    pub fn commit(&mut self) -> Option<StrokeId> {
        let stroke = self.current.take()?;
        if stroke.is_empty() || (stroke.is_dot() && !self.keep_dots) {
            log::debug!("Discarding stroke with {} point(s)", stroke.len());
            return None;
        }
        let id = stroke.id();
        log::debug!("Committed stroke {} with {} point(s)", id, stroke.len());
        self.committed.push(stroke);
        Some(id)
    }

    /// Discard the current stroke. Returns true if one was in progress.
    pub fn abort(&mut self) -> bool {
        self.current.take().is_some()
    }

    /// Remove the most recently committed stroke.
    pub fn undo(&mut self) -> Option<Stroke> {
        self.committed.pop()
    }

    /// Remove all strokes, including the one in progress.
    pub fn clear(&mut self) -> bool {
        let had_any = self.current.is_some() || !self.committed.is_empty();
        self.current = None;
        self.committed.clear();
        had_any
    }

    pub fn current(&self) -> Option<&Stroke> {
        self.current.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.current.is_some()
    }

    /// Committed strokes, oldest first.
    pub fn committed(&self) -> &[Stroke] {
        &self.committed
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

fn is_finite(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}
