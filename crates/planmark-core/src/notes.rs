//! Text notes pinned to image positions.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A short text label anchored at an image-space position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub position: Point,
    pub text: String,
}

impl Note {
    /// Create a note; returns None if the text is blank.
    pub fn new(position: Point, text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self { position, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_rejected() {
        assert!(Note::new(Point::new(1.0, 1.0), "   ").is_none());
        let note = Note::new(Point::new(1.0, 1.0), "Exit").unwrap();
        assert_eq!(note.text, "Exit");
    }
}
