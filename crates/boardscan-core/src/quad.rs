use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// How four unordered outline vertices are put into canonical order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerOrder {
    /// Sort by angle around the centroid, then start at the vertex closest
    /// to the image origin. Works for any in-plane rotation below 45°.
    #[default]
    Polar,
    /// Sort by `(y, x)`: the two upper vertices become the top edge, the
    /// two lower ones the bottom edge. Only reliable when the board is
    /// close to axis-aligned in the photograph.
    RowMajor,
}

/// Board outline in pixel space, always in top-left, top-right,
/// bottom-right, bottom-left order (clockwise on screen).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    pub corners: [Point2<f32>; 4],
}

impl Quad {
    /// Wrap corners that are already in canonical order.
    pub fn from_ordered(corners: [Point2<f32>; 4]) -> Self {
        Self { corners }
    }

    /// Put arbitrary vertices into canonical order.
    pub fn from_unordered(points: [Point2<f32>; 4], order: CornerOrder) -> Self {
        match order {
            CornerOrder::Polar => Self::order_polar(points),
            CornerOrder::RowMajor => Self::order_row_major(points),
        }
    }

    fn order_polar(mut points: [Point2<f32>; 4]) -> Self {
        let c = centroid(&points);
        // atan2 grows clockwise on screen because y points down
        points.sort_by(|a, b| {
            let ta = (a.y - c.y).atan2(a.x - c.x);
            let tb = (b.y - c.y).atan2(b.x - c.x);
            ta.total_cmp(&tb)
        });
        let start = points
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (a.x + a.y).total_cmp(&(b.x + b.y)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        points.rotate_left(start);
        Self { corners: points }
    }

    fn order_row_major(mut points: [Point2<f32>; 4]) -> Self {
        points.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
        let [a, b, c, d] = points;
        let (tl, tr) = if a.x <= b.x { (a, b) } else { (b, a) };
        let (bl, br) = if c.x <= d.x { (c, d) } else { (d, c) };
        Self {
            corners: [tl, tr, br, bl],
        }
    }

    pub fn top_left(&self) -> Point2<f32> {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point2<f32> {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point2<f32> {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point2<f32> {
        self.corners[3]
    }

    /// Vertex mean.
    pub fn centroid(&self) -> Point2<f32> {
        centroid(&self.corners)
    }

    /// Unsigned shoelace area in square pixels.
    pub fn area(&self) -> f32 {
        polygon_area(&self.corners)
    }

    /// Push every vertex `margin` pixels away from the centroid along the
    /// centroid→vertex direction.
    ///
    /// Returns `None` when a vertex sits on the centroid, since it then
    /// has no outward direction.
    pub fn shifted_outward(&self, margin: f32) -> Option<Quad> {
        let c = self.centroid();
        let mut out = self.corners;
        for p in out.iter_mut() {
            let dir: Vector2<f32> = *p - c;
            let len = dir.norm();
            if len <= f32::EPSILON {
                return None;
            }
            *p += dir * (margin / len);
        }
        Some(Quad { corners: out })
    }

    /// Map every vertex through `f`, keeping the order.
    pub fn map(&self, f: impl Fn(Point2<f32>) -> Point2<f32>) -> Quad {
        Quad {
            corners: self.corners.map(f),
        }
    }
}

fn centroid(points: &[Point2<f32>]) -> Point2<f32> {
    let n = points.len().max(1) as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0_f32, 0.0_f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point2::new(sx / n, sy / n)
}

/// Unsigned area of a simple polygon (shoelace formula).
pub fn polygon_area(points: &[Point2<f32>]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64)
        .sum();
    (twice.abs() * 0.5) as f32
}
