//! Pointer events delivered by the host UI.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in screen space; timestamps are host milliseconds and only
/// used for ordering diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        timestamp_ms: u64,
    },
    Move {
        position: Point,
        #[serde(default)]
        timestamp_ms: u64,
    },
    Up {
        position: Point,
        #[serde(default)]
        timestamp_ms: u64,
    },
}

impl PointerEvent {
    pub fn down(position: Point, timestamp_ms: u64) -> Self {
        PointerEvent::Down { position, timestamp_ms }
    }

    pub fn moved(position: Point, timestamp_ms: u64) -> Self {
        PointerEvent::Move { position, timestamp_ms }
    }

    pub fn up(position: Point, timestamp_ms: u64) -> Self {
        PointerEvent::Up { position, timestamp_ms }
    }

    /// Screen-space position of the event.
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position, .. }
            | PointerEvent::Up { position, .. } => position,
        }
    }

    pub fn timestamp_ms(&self) -> u64 {
        match *self {
            PointerEvent::Down { timestamp_ms, .. }
            | PointerEvent::Move { timestamp_ms, .. }
            | PointerEvent::Up { timestamp_ms, .. } => timestamp_ms,
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            PointerEvent::Down { .. } => "down",
            PointerEvent::Move { .. } => "move",
            PointerEvent::Up { .. } => "up",
        }
    }
}
