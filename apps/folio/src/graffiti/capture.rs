//! Pointer-drag accumulation with distance decimation.

use serde::{Deserialize, Serialize};

use crate::graffiti::geometry::Vec3;
use crate::graffiti::stroke::GraffitiPoint;

/// Points closer than this to the previous one are dropped.
pub const MIN_POINT_DISTANCE: f64 = 0.1;

const PRIMARY_BUTTON: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerType {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone)]
pub struct StrokeCapture {
    drawing: bool,
    points: Vec<GraffitiPoint>,
    min_distance: f64,
}

impl Default for StrokeCapture {
    fn default() -> Self {
        Self::new(MIN_POINT_DISTANCE)
    }
}

impl StrokeCapture {
    pub fn new(min_distance: f64) -> Self {
        Self {
            drawing: false,
            points: Vec::new(),
            min_distance,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn points(&self) -> &[GraffitiPoint] {
        &self.points
    }

    /// Starts a gesture. Returns false when the press is ignored: over
    /// interactive UI, or a non-primary mouse button.
    pub fn pointer_down(&mut self, pointer: PointerType, button: u16, over_ui: bool) -> bool {
        if over_ui {
            return false;
        }
        if pointer == PointerType::Mouse && button != PRIMARY_BUTTON {
            return false;
        }
        self.drawing = true;
        self.points.clear();
        true
    }

    /// Adds the projected pointer position. Returns true if it was kept.
    pub fn pointer_move(&mut self, target: Option<Vec3>) -> bool {
        if !self.drawing {
            return false;
        }
        let Some(target) = target else {
            return false;
        };
        let far_enough = match self.points.last() {
            Some(&last) => Vec3::from(last).distance_to(&target) > self.min_distance,
            None => true,
        };
        if far_enough {
            self.points.push(target.to_array());
        }
        far_enough
    }

    /// Ends the gesture, yielding its points if any were kept.
    pub fn pointer_up(&mut self) -> Option<Vec<GraffitiPoint>> {
        if !self.drawing {
            return None;
        }
        self.drawing = false;
        let points = std::mem::take(&mut self.points);
        (!points.is_empty()).then_some(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f64, y: f64) -> Option<Vec3> {
        Some(Vec3::new(x, y, 0.0))
    }

    #[test]
    fn test_close_moves_are_decimated() {
        let mut capture = StrokeCapture::default();
        assert!(capture.pointer_down(PointerType::Mouse, 0, false));
        assert!(capture.pointer_move(at(0.0, 0.0)));
        assert!(!capture.pointer_move(at(0.05, 0.0)));
        assert!(!capture.pointer_move(at(0.0, 0.09)));
        assert!(!capture.pointer_move(at(0.07, 0.07)));
        assert_eq!(capture.points().len(), 1);
    }

    #[test]
    fn test_each_far_move_adds_exactly_one_point() {
        let mut capture = StrokeCapture::default();
        capture.pointer_down(PointerType::Touch, 0, false);
        for i in 0..5 {
            assert!(capture.pointer_move(at(i as f64 * 0.5, 0.0)));
        }
        assert_eq!(capture.points().len(), 5);
        assert_eq!(capture.points()[4], [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_decimation_measures_from_last_kept_point() {
        let mut capture = StrokeCapture::default();
        capture.pointer_down(PointerType::Pen, 0, false);
        capture.pointer_move(at(0.0, 0.0));
        // Creeping forward in small steps eventually clears the threshold.
        capture.pointer_move(at(0.06, 0.0));
        assert!(capture.pointer_move(at(0.12, 0.0)));
        assert_eq!(capture.points().len(), 2);
    }

    #[test]
    fn test_presses_over_ui_or_secondary_button_are_ignored() {
        let mut capture = StrokeCapture::default();
        assert!(!capture.pointer_down(PointerType::Mouse, 0, true));
        assert!(!capture.pointer_down(PointerType::Mouse, 2, false));
        assert!(!capture.is_drawing());
        assert!(!capture.pointer_move(at(1.0, 1.0)));
        assert!(capture.pointer_up().is_none());
    }

    #[test]
    fn test_pointer_up_without_points_yields_nothing_and_ends_drawing() {
        let mut capture = StrokeCapture::default();
        capture.pointer_down(PointerType::Mouse, 0, false);
        capture.pointer_move(None);
        assert!(capture.pointer_up().is_none());
        assert!(!capture.is_drawing());
    }

    #[test]
    fn test_pointer_up_returns_points_and_resets() {
        let mut capture = StrokeCapture::default();
        capture.pointer_down(PointerType::Mouse, 0, false);
        capture.pointer_move(at(0.0, 0.0));
        capture.pointer_move(at(1.0, 0.0));
        let points = capture.pointer_up().unwrap();
        assert_eq!(points.len(), 2);
        assert!(capture.points().is_empty());
        assert!(capture.pointer_up().is_none());
    }
}
