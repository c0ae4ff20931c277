use crate::sampling::sample_bilinear_rgb;
use ::image::RgbImage;
use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};
use serde::{Deserialize, Serialize};

/// A 3x3 projective transform acting on homogeneous pixel coordinates.
///
/// Affine maps (the 90° rotation) are stored in the same type with a
/// `[0, 0, 1]` bottom row so they compose with perspective maps directly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity())
    }

    pub fn from_array(rows: [[f64; 3]; 3]) -> Self {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2], rows[1][0], rows[1][1], rows[1][2], rows[2][0],
            rows[2][1], rows[2][2],
        ]))
    }

    pub fn to_array(&self) -> [[f64; 3]; 3] {
        [
            [self.h[(0, 0)], self.h[(0, 1)], self.h[(0, 2)]],
            [self.h[(1, 0)], self.h[(1, 1)], self.h[(1, 2)]],
            [self.h[(2, 0)], self.h[(2, 1)], self.h[(2, 2)]],
        ]
    }

    /// Pure translation by `(tx, ty)`.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(Matrix3::new(
            1.0, 0.0, tx, //
            0.0, 1.0, ty, //
            0.0, 0.0, 1.0,
        ))
    }

    /// Quarter turn counter-clockwise (as seen on screen, y pointing down)
    /// about the centre of a `width x height` pixel grid, re-centred on the
    /// `height x width` grid of the rotated image.
    ///
    /// Pixel `(x, y)` lands on `(y, width - 1 - x)`, which is exactly where
    /// [`image::imageops::rotate270`] puts it.
    pub fn rotation_ccw90(width: u32, height: u32) -> Self {
        let cx = (width as f64 - 1.0) * 0.5;
        let cy = (height as f64 - 1.0) * 0.5;
        // the rotated canvas swaps its extents, and so its centre
        let rotate = Self::new(Matrix3::new(
            0.0, 1.0, 0.0, //
            -1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0,
        ));
        Self::translation(cy, cx)
            .compose(&rotate)
            .compose(&Self::translation(-cx, -cy))
    }

    /// `self ∘ inner`: apply `inner` first, then `self`.
    pub fn compose(&self, inner: &Homography) -> Homography {
        Homography::new(self.h * inner.h)
    }

    /// Chain-friendly form of [`Homography::compose`]: apply `self` first, then `next`.
    pub fn then(&self, next: &Homography) -> Homography {
        next.compose(self)
    }

    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        Point2::new((v[0] / w) as f32, (v[1] / w) as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

fn hartley_normalization(cx: f64, cy: f64, mean_dist: f64) -> Matrix3<f64> {
    let s = if mean_dist > 1e-12 {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::<f64>::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn normalize_points4(pts: &[Point2<f32>; 4]) -> ([Point2<f64>; 4], Matrix3<f64>) {
    let n = 4.0_f64;
    let (mut cx, mut cy) = (0.0_f64, 0.0_f64);
    for p in pts {
        cx += p.x as f64;
        cy += p.y as f64;
    }
    cx /= n;
    cy /= n;

    let mean_dist = pts
        .iter()
        .map(|p| (p.x as f64 - cx).hypot(p.y as f64 - cy))
        .sum::<f64>()
        / n;

    let t = hartley_normalization(cx, cy, mean_dist);

    let mut out = [Point2::new(0.0_f64, 0.0_f64); 4];
    for (i, p) in pts.iter().enumerate() {
        let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
        out[i] = Point2::new(v[0], v[1]);
    }

    (out, t)
}

fn normalize_homography(h: Matrix3<f64>) -> Option<Matrix3<f64>> {
    let s = h[(2, 2)];
    if s.abs() < 1e-12 || !s.is_finite() {
        return None;
    }
    let h = h / s;
    h.iter().all(|v| v.is_finite()).then_some(h)
}

/// Compute H such that `dst ~ H * src` from exactly four correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Returns `None`
/// when three of the points are collinear (the system is singular).
pub fn homography_from_4pt(src: &[Point2<f32>; 4], dst: &[Point2<f32>; 4]) -> Option<Homography> {
    // Unknowns: [h11 h12 h13 h21 h22 h23 h31 h32], with h33 = 1
    // h11 x + h12 y + h13 - u h31 x - u h32 y = u
    // h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let (src_n, t_src) = normalize_points4(src);
    let (dst_n, t_dst) = normalize_points4(dst);

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let (x, y) = (src_n[k].x, src_n[k].y);
        let (u, v) = (dst_n[k].x, dst_n[k].y);

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b)?;

    let hn = Matrix3::<f64>::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    // H = T_dst^-1 * Hn * T_src
    let h_den = t_dst.try_inverse()? * hn * t_src;
    let h_den = normalize_homography(h_den)?;

    Some(Homography::new(h_den))
}

/// Warp into the canonical image: for each output pixel, map back to the
/// source via `h_src_from_dst` and sample bilinearly. Pixels that land
/// outside the source stay black.
pub fn warp_perspective_rgb(
    src: &RgbImage,
    h_src_from_dst: Homography,
    out_w: u32,
    out_h: u32,
) -> RgbImage {
    RgbImage::from_fn(out_w, out_h, |x, y| {
        let ps = h_src_from_dst.apply(Point2::new(x as f32, y as f32));
        sample_bilinear_rgb(src, ps.x, ps.y)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::Rgb;

    fn assert_close(a: Point2<f32>, b: Point2<f32>, tol: f32) {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.6},{:.6}) ~ ({:.6},{:.6}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn inverse_round_trips_points() {
        let h = Homography::new(Matrix3::new(
            1.2, 0.1, 5.0, //
            -0.05, 0.9, 3.0, //
            0.001, 0.0005, 1.0,
        ));
        let inv = h.inverse().expect("invertible");

        for p in [
            Point2::new(0.0_f32, 0.0),
            Point2::new(50.0_f32, -20.0),
            Point2::new(320.0_f32, 200.0),
        ] {
            assert_close(inv.apply(h.apply(p)), p, 1e-3);
        }
    }

    #[test]
    fn four_point_solver_recovers_h() {
        let ground_truth = Homography::new(Matrix3::new(
            0.8, 0.05, 120.0, //
            -0.02, 1.1, 80.0, //
            0.0009, -0.0004, 1.0,
        ));

        let rect = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(180.0_f32, 0.0),
            Point2::new(180.0_f32, 130.0),
            Point2::new(0.0_f32, 130.0),
        ];
        let dst = rect.map(|p| ground_truth.apply(p));

        let recovered = homography_from_4pt(&rect, &dst).expect("recoverable");

        for p in [
            Point2::new(0.0_f32, 0.0),
            Point2::new(60.0, 40.0),
            Point2::new(150.0, 120.0),
        ] {
            assert_close(recovered.apply(p), ground_truth.apply(p), 1e-3);
        }
    }

    #[test]
    fn collinear_points_have_no_solution() {
        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(20.0, 0.0),
            Point2::new(30.0, 0.0),
        ];
        let dst = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(255.0, 0.0),
            Point2::new(255.0, 255.0),
            Point2::new(0.0, 255.0),
        ];
        assert!(homography_from_4pt(&src, &dst).is_none());
    }

    #[test]
    fn quarter_turn_matches_image_rotate270() {
        let r = Homography::rotation_ccw90(4, 3);
        // top-left goes to bottom-left of the 3x4 rotated grid
        assert_close(r.apply(Point2::new(0.0, 0.0)), Point2::new(0.0, 3.0), 1e-5);
        assert_close(r.apply(Point2::new(3.0, 0.0)), Point2::new(0.0, 0.0), 1e-5);
        assert_close(r.apply(Point2::new(3.0, 2.0)), Point2::new(2.0, 0.0), 1e-5);

        let mut img = RgbImage::new(4, 3);
        img.put_pixel(3, 2, Rgb([255, 0, 0]));
        let rotated = ::image::imageops::rotate270(&img);
        assert_eq!(rotated.dimensions(), (3, 4));
        assert_eq!(rotated.get_pixel(2, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn then_applies_left_to_right() {
        let a = Homography::translation(5.0, 0.0);
        let b = Homography::rotation_ccw90(11, 11);
        let p = Point2::new(1.0_f32, 2.0);
        assert_close(a.then(&b).apply(p), b.apply(a.apply(p)), 1e-5);
    }

    #[test]
    fn warp_with_identity_copies_pixels() {
        let src = RgbImage::from_fn(8, 8, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 7]));
        let out = warp_perspective_rgb(&src, Homography::identity(), 8, 8);
        assert_eq!(out, src);
    }
}
