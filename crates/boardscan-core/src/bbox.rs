//! Piece detections with an explicit pixel space.
//!
//! A box always knows which coordinate system it lives in: [`SourcePx`]
//! for the (working-resolution) input photograph, [`RotatedPx`] for the
//! photograph after the quarter turn, [`CanonicalPx`] for the warped square
//! the grid is mapped in. Moving between spaces only
//! happens through [`BoundingBox::reproject`], so a source box can never be
//! handed to the grid mapper by accident.

use std::fmt::Debug;
use std::marker::PhantomData;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::Homography;

/// Marker for a pixel coordinate system.
pub trait PixelSpace: Copy + Debug + Default + PartialEq + 'static {
    const NAME: &'static str;
}

/// Pixels of the input photograph after working-resolution resizing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourcePx;

/// Pixels of the photograph after the quarter-turn rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RotatedPx;

/// Pixels of the warped canonical board image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CanonicalPx;

impl PixelSpace for SourcePx {
    const NAME: &'static str = "source";
}

impl PixelSpace for RotatedPx {
    const NAME: &'static str = "rotated";
}

impl PixelSpace for CanonicalPx {
    const NAME: &'static str = "canonical";
}

/// How box coordinates are rounded as they move between pixel spaces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxRounding {
    /// Truncate toward zero on entry and after every stage, so boxes are
    /// whole pixels throughout. A piece whose base sits within a pixel of
    /// a square edge lands on the same side as an integer-box pipeline.
    #[default]
    Truncate,
    /// Keep sub-pixel coordinates end to end.
    Exact,
}

/// Axis-aligned detection box `(x1, y1) .. (x2, y2)` tagged with its class.
///
/// Invariant: `x1 <= x2` and `y1 <= y2`. Constructors enforce it;
/// deserialized boxes should go through [`BoundingBox::normalized`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct BoundingBox<S: PixelSpace = SourcePx> {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub class_id: u32,
    pub class_label: String,
    #[serde(skip)]
    space: PhantomData<S>,
}

pub type SourceBox = BoundingBox<SourcePx>;
pub type RotatedBox = BoundingBox<RotatedPx>;
pub type CanonicalBox = BoundingBox<CanonicalPx>;

impl<S: PixelSpace> BoundingBox<S> {
    pub fn new(
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        class_id: u32,
        class_label: impl Into<String>,
    ) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
            class_id,
            class_label: class_label.into(),
            space: PhantomData,
        }
    }

    /// Smallest axis-aligned box containing all `points`.
    ///
    /// Returns `None` for an empty slice or when any point is not finite.
    pub fn enclosing(
        points: &[Point2<f32>],
        class_id: u32,
        class_label: impl Into<String>,
    ) -> Option<Self> {
        if points.is_empty() || points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return None;
        }
        let (mut x1, mut y1) = (f32::INFINITY, f32::INFINITY);
        let (mut x2, mut y2) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            x1 = x1.min(p.x);
            y1 = y1.min(p.y);
            x2 = x2.max(p.x);
            y2 = y2.max(p.y);
        }
        Some(Self::new(x1, y1, x2, y2, class_id, class_label))
    }

    /// Re-establish `x1 <= x2`, `y1 <= y2` (e.g. after deserialization).
    pub fn normalized(self) -> Self {
        Self::new(
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.class_id,
            self.class_label,
        )
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Corners in top-left, top-right, bottom-right, bottom-left order.
    pub fn corners(&self) -> [Point2<f32>; 4] {
        [
            Point2::new(self.x1, self.y1),
            Point2::new(self.x2, self.y1),
            Point2::new(self.x2, self.y2),
            Point2::new(self.x1, self.y2),
        ]
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new((self.x1 + self.x2) * 0.5, (self.y1 + self.y2) * 0.5)
    }

    /// Middle of the bottom edge: where the piece stands on the board.
    pub fn bottom_center(&self) -> Point2<f32> {
        Point2::new((self.x1 + self.x2) * 0.5, self.y2)
    }

    /// Scale both axes, staying in the same space. Used when the working
    /// resolution differs from the detector's input resolution.
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        Self::new(
            self.x1 * sx,
            self.y1 * sy,
            self.x2 * sx,
            self.y2 * sy,
            self.class_id,
            self.class_label.clone(),
        )
    }

    /// Every coordinate truncated toward zero. NaN stays NaN.
    pub fn truncated(&self) -> Self {
        Self::new(
            self.x1.trunc(),
            self.y1.trunc(),
            self.x2.trunc(),
            self.y2.trunc(),
            self.class_id,
            self.class_label.clone(),
        )
    }

    pub fn rounded(&self, rounding: BoxRounding) -> Self {
        match rounding {
            BoxRounding::Truncate => self.truncated(),
            BoxRounding::Exact => self.clone(),
        }
    }

    /// True when all four coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Map all four corners through `h` and take their axis-aligned hull.
    ///
    /// This is lossy: a rotated or keystoned quad is widened to the
    /// rectangle around it. Only the anchor point is used downstream.
    /// A box with a corner on the horizon line of `h` has no finite image;
    /// it is still returned, with NaN coordinates, so that callers see
    /// every input box come out the other side.
    pub fn reproject<T: PixelSpace>(&self, h: &Homography) -> BoundingBox<T> {
        let mapped = self.corners().map(|p| h.apply(p));
        BoundingBox::enclosing(&mapped, self.class_id, self.class_label.clone()).unwrap_or_else(
            || {
                BoundingBox::new(
                    f32::NAN,
                    f32::NAN,
                    f32::NAN,
                    f32::NAN,
                    self.class_id,
                    self.class_label.clone(),
                )
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_orders_coordinates() {
        let b = SourceBox::new(30.0, 40.0, 10.0, 5.0, 3, "white-rook");
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (10.0, 5.0, 30.0, 40.0));
        assert_eq!(b.width(), 20.0);
        assert_eq!(b.height(), 35.0);
    }

    #[test]
    fn anchors_use_bottom_edge_or_centre() {
        let b = SourceBox::new(10.0, 20.0, 30.0, 60.0, 0, "black-king");
        assert_eq!(b.bottom_center(), Point2::new(20.0, 60.0));
        assert_eq!(b.center(), Point2::new(20.0, 40.0));
    }

    #[test]
    fn reproject_takes_hull_of_rotated_corners() {
        let b = SourceBox::new(0.0, 0.0, 10.0, 4.0, 1, "white-pawn");
        let r = Homography::rotation_ccw90(11, 11);
        let out: CanonicalBox = b.reproject(&r);
        assert!(out.is_finite());
        // (x, y) -> (y, 10 - x)
        assert_eq!((out.x1, out.y1, out.x2, out.y2), (0.0, 0.0, 4.0, 10.0));
        assert_eq!(out.class_label, "white-pawn");
        assert_eq!(out.class_id, 1);
    }

    #[test]
    fn truncation_moves_toward_zero() {
        let b = CanonicalBox::new(20.8, -0.7, 49.6, 30.99, 6, "white-pawn");
        let t = b.truncated();
        assert_eq!((t.x1, t.y1, t.x2, t.y2), (20.0, 0.0, 49.0, 30.0));
        assert_eq!(b.rounded(BoxRounding::Exact), b);
        assert_eq!(b.rounded(BoxRounding::Truncate), t);

        let nan = CanonicalBox::new(f32::NAN, f32::NAN, f32::NAN, f32::NAN, 0, "x");
        assert!(!nan.truncated().is_finite());
    }

    #[test]
    fn deserialized_boxes_can_be_normalized() {
        let raw = r#"{"x1":5,"y1":9,"x2":1,"y2":2,"class_id":7,"class_label":"black-queen"}"#;
        let b: SourceBox = serde_json::from_str(raw).expect("parse");
        let b = b.normalized();
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (1.0, 2.0, 5.0, 9.0));
    }

    #[test]
    fn box_on_the_horizon_comes_back_unplaceable() {
        // w = 1 - x / 10 vanishes on x = 10
        let h = Homography::from_array([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-0.1, 0.0, 1.0]]);
        let b = SourceBox::new(0.0, 0.0, 10.0, 5.0, 2, "white-knight");
        let out: CanonicalBox = b.reproject(&h);
        assert!(!out.is_finite());
        assert_eq!(out.class_label, "white-knight");
    }

    #[test]
    fn enclosing_rejects_non_finite_points() {
        let pts = [Point2::new(0.0, 0.0), Point2::new(f32::INFINITY, 1.0)];
        assert!(CanonicalBox::enclosing(&pts, 0, "x").is_none());
        assert!(CanonicalBox::enclosing(&[], 0, "x").is_none());
    }
}
