//! Gesture routing: turns pointer events into pan or stroke operations.
//!
//! The router is an explicit three-state machine. The active [`Mode`] is read
//! only on pointer-down, so flipping the mode mid-gesture never turns a
//! half-drawn stroke into a pan (or the other way round); the current gesture
//! has to finish first.

use crate::color::PenColor;
use crate::input::PointerEvent;
use crate::strokes::{StrokeId, StrokeRecorder};
use crate::viewport::ViewportController;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What a pointer drag does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Drags draw freehand strokes.
    Annotate,
    /// Drags pan the view.
    #[default]
    Navigate,
}

/// Current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Drawing,
    Panning {
        /// Screen position the last accepted pan delta was measured from.
        last: Point,
    },
}

/// Result of routing one pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// The event had no effect.
    Ignored,
    StrokeStarted,
    StrokeExtended,
    StrokeCommitted(StrokeId),
    /// The stroke ended but was not kept (a tap with dots disabled).
    StrokeDiscarded,
    /// The stroke left the image and was thrown away.
    StrokeAborted,
    PanStarted,
    Panned,
    /// The view settled on the pan target. A drag that ends where the view
    /// already is yields [`GestureOutcome::Ignored`] instead.
    PanFinished,
}

impl GestureOutcome {
    /// Whether the event changed anything that is drawn.
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, GestureOutcome::Ignored | GestureOutcome::PanStarted)
    }
}

/// Dispatches pointer events to the viewport or the stroke recorder.
#[derive(Debug, Clone, Default)]
pub struct GestureRouter {
    state: GestureState,
}

impl GestureRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Drop the current gesture without committing anything.
    pub fn reset(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Route one pointer event.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        mode: Mode,
        pen_color: PenColor,
        viewport: &mut ViewportController,
        strokes: &mut StrokeRecorder,
    ) -> GestureOutcome {
        let position = event.position();
        let positioned = !matches!(event, PointerEvent::Up { .. });
        if positioned && !(position.x.is_finite() && position.y.is_finite()) {
            log::warn!("Ignoring pointer {} at non-finite position {:?}", event.kind(), position);
            return GestureOutcome::Ignored;
        }

        let outcome = match (self.state, event) {
            (GestureState::Idle, PointerEvent::Down { position, .. }) => match mode {
                Mode::Annotate => {
                    let point = viewport.view().to_image_space(position);
                    if !viewport.contains_image_point(point) {
                        return GestureOutcome::Ignored;
                    }
                    if !strokes.begin(point, pen_color) {
                        return GestureOutcome::Ignored;
                    }
                    self.state = GestureState::Drawing;
                    GestureOutcome::StrokeStarted
                }
                Mode::Navigate => {
                    viewport.begin_pan();
                    self.state = GestureState::Panning { last: position };
                    GestureOutcome::PanStarted
                }
            },

            (GestureState::Drawing, PointerEvent::Move { position, .. }) => {
                let point = viewport.view().to_image_space(position);
                if viewport.contains_image_point(point) {
                    if strokes.extend(point) {
                        GestureOutcome::StrokeExtended
                    } else {
                        GestureOutcome::Ignored
                    }
                } else {
                    strokes.abort();
                    self.state = GestureState::Idle;
                    GestureOutcome::StrokeAborted
                }
            }

            (GestureState::Drawing, PointerEvent::Up { .. }) => {
                self.state = GestureState::Idle;
                match strokes.commit() {
                    Some(id) => GestureOutcome::StrokeCommitted(id),
                    None => GestureOutcome::StrokeDiscarded,
                }
            }

            (GestureState::Panning { last }, PointerEvent::Move { position, .. }) => {
                // Sub-threshold movement keeps accumulating against the old anchor.
                if viewport.pan(position - last) {
                    self.state = GestureState::Panning { last: position };
                    GestureOutcome::Panned
                } else {
                    GestureOutcome::Ignored
                }
            }

            (GestureState::Panning { .. }, PointerEvent::Up { .. }) => {
                self.state = GestureState::Idle;
                if viewport.finish_pan() {
                    GestureOutcome::PanFinished
                } else {
                    GestureOutcome::Ignored
                }
            }

            // Moves and ups with no gesture, or a second down mid-gesture.
            _ => GestureOutcome::Ignored,
        };

        if outcome != GestureOutcome::Ignored {
            log::debug!(
                "Pointer {} at {:?} (t={}ms, {:?}) -> {:?}, state {:?}",
                event.kind(),
                event.position(),
                event.timestamp_ms(),
                mode,
                outcome,
                self.state
            );
        }
        outcome
    }
}
