//! Board outline extraction from a segmentation mask.

use ::image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area};
use imageproc::point::Point;
use log::{debug, info};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::GeometryError;

/// Polygon approximation settings for the board outline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourParams {
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub epsilon_frac: f64,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self { epsilon_frac: 0.02 }
    }
}

/// Finds the board quadrilateral in a binary region mask.
///
/// Any non-zero mask pixel is foreground. Only outermost contours are
/// considered; the one enclosing the largest area is taken to be the board.
#[derive(Clone, Debug, Default)]
pub struct ContourExtractor {
    pub params: ContourParams,
}

impl ContourExtractor {
    pub fn new(params: ContourParams) -> Self {
        Self { params }
    }

    /// Return the four outline vertices, in contour order (not yet
    /// canonicalized).
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(width = mask.width(), height = mask.height()))
    )]
    pub fn extract(&self, mask: &GrayImage) -> Result<[Point2<f32>; 4], GeometryError> {
        let contours = find_contours::<i32>(mask);
        let largest = contours
            .iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .map(|c| (contour_area(&c.points).abs(), c))
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, c)| c)
            .ok_or_else(|| GeometryError::not_detected("mask has no foreground contour"))?;

        let perimeter = arc_length(&largest.points, true);
        let epsilon = self.params.epsilon_frac * perimeter;
        if epsilon.is_nan() || epsilon <= 0.0 {
            return Err(GeometryError::not_detected(format!(
                "largest contour is too small (perimeter {perimeter:.1} px)"
            )));
        }

        let polygon = approximate_closed(&largest.points, epsilon);
        debug!(
            "largest of {} contours: {} points, perimeter {:.1}, approximated to {} vertices",
            contours.len(),
            largest.points.len(),
            perimeter,
            polygon.len()
        );

        let vertices: [Point<i32>; 4] = polygon.as_slice().try_into().map_err(|_| {
            GeometryError::not_detected(format!(
                "board outline approximates to {} vertices, expected 4",
                polygon.len()
            ))
        })?;

        info!("board outline: {:?}", vertices.map(|p| (p.x, p.y)));
        Ok(vertices.map(to_point2))
    }
}

fn to_point2(p: Point<i32>) -> Point2<f32> {
    Point2::new(p.x as f32, p.y as f32)
}

/// Douglas-Peucker on a closed curve.
///
/// The curve is split at the point farthest from its first point, each half
/// is simplified as an open chain, and the joint vertices are then dropped
/// again if they turn out to lie on a straight edge (the trace may start in
/// the middle of a side).
fn approximate_closed(points: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let first = points[0];
    let (far, far_d2) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, dist2(*p, first)))
        .max_by_key(|&(_, d)| d)
        .unwrap_or((0, 0));
    if far_d2 == 0 {
        return vec![first];
    }

    let mut out = approximate_polygon_dp(&points[..=far], epsilon, false);
    out.pop();
    let mut tail = points[far..].to_vec();
    tail.push(first);
    out.extend(approximate_polygon_dp(&tail, epsilon, false));
    out.pop();

    drop_collinear(out, epsilon)
}

fn drop_collinear(mut poly: Vec<Point<i32>>, epsilon: f64) -> Vec<Point<i32>> {
    let mut changed = true;
    while changed && poly.len() > 3 {
        changed = false;
        for i in 0..poly.len() {
            let n = poly.len();
            let prev = poly[(i + n - 1) % n];
            let next = poly[(i + 1) % n];
            if distance_to_line(poly[i], prev, next) <= epsilon {
                poly.remove(i);
                changed = true;
                break;
            }
        }
    }
    poly
}

fn dist2(a: Point<i32>, b: Point<i32>) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

fn distance_to_line(p: Point<i32>, a: Point<i32>, b: Point<i32>) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let len = dx.hypot(dy);
    if len == 0.0 {
        return (p.x as f64 - ax).hypot(p.y as f64 - ay);
    }
    ((p.x as f64 - ax) * dy - (p.y as f64 - ay) * dx).abs() / len
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::Luma;
    use imageproc::drawing::draw_polygon_mut;

    fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) {
                Luma([1])
            } else {
                Luma([0])
            }
        })
    }

    fn sorted(mut v: Vec<(i32, i32)>) -> Vec<(i32, i32)> {
        v.sort();
        v
    }

    #[test]
    fn rectangle_mask_yields_its_corners() {
        let mask = rect_mask(256, 256, 20, 30, 219, 229);
        let quad = ContourExtractor::default().extract(&mask).expect("quad");
        let got = sorted(quad.iter().map(|p| (p.x as i32, p.y as i32)).collect());
        assert_eq!(got, vec![(20, 30), (20, 229), (219, 30), (219, 229)]);
    }

    #[test]
    fn largest_blob_wins_over_noise() {
        let mut mask = rect_mask(256, 256, 60, 60, 200, 200);
        for (x, y) in [(5, 5), (6, 5), (5, 6), (250, 10)] {
            mask.put_pixel(x, y, Luma([255]));
        }
        let quad = ContourExtractor::default().extract(&mask).expect("quad");
        let got = sorted(quad.iter().map(|p| (p.x as i32, p.y as i32)).collect());
        assert_eq!(got, vec![(60, 60), (60, 200), (200, 60), (200, 200)]);
    }

    #[test]
    fn enclosed_area_beats_contour_length() {
        // a long one-pixel scratch traces far more contour points than the board
        let mut mask = rect_mask(256, 256, 100, 100, 139, 139);
        for x in 2..252 {
            mask.put_pixel(x, 5, Luma([1]));
        }
        let quad = ContourExtractor::default().extract(&mask).expect("quad");
        let got = sorted(quad.iter().map(|p| (p.x as i32, p.y as i32)).collect());
        assert_eq!(got, vec![(100, 100), (100, 139), (139, 100), (139, 139)]);
    }

    #[test]
    fn tilted_quadrilateral_is_found() {
        let mut mask = GrayImage::new(256, 256);
        let poly = [
            Point::new(40, 20),
            Point::new(230, 50),
            Point::new(210, 235),
            Point::new(25, 200),
        ];
        draw_polygon_mut(&mut mask, &poly, Luma([1]));
        let quad = ContourExtractor::default().extract(&mask).expect("quad");
        for expected in poly {
            let close = quad.iter().any(|p| {
                (p.x - expected.x as f32).abs() <= 3.0 && (p.y - expected.y as f32).abs() <= 3.0
            });
            assert!(close, "missing vertex near {expected:?} in {quad:?}");
        }
    }

    #[test]
    fn empty_mask_is_not_a_board() {
        let mask = GrayImage::new(64, 64);
        let err = ContourExtractor::default().extract(&mask).unwrap_err();
        assert!(matches!(err, GeometryError::BoardNotDetected { .. }));
    }

    #[test]
    fn triangle_is_not_a_board() {
        let mut mask = GrayImage::new(128, 128);
        let tri = [Point::new(10, 10), Point::new(120, 20), Point::new(60, 110)];
        draw_polygon_mut(&mut mask, &tri, Luma([1]));
        let err = ContourExtractor::default().extract(&mask).unwrap_err();
        assert!(matches!(err, GeometryError::BoardNotDetected { .. }));
    }

    #[test]
    fn single_pixel_is_too_small() {
        let mut mask = GrayImage::new(16, 16);
        mask.put_pixel(8, 8, Luma([1]));
        assert!(ContourExtractor::default().extract(&mask).is_err());
    }
}
