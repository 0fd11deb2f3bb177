//! Exact four-point projective transform.
//!
//! The 8 unknowns of H (with `h22 = 1`) are solved from the four corner
//! correspondences by Gaussian elimination with partial pivoting. Points are
//! normalized first (centroid at the origin, mean distance √2) so the
//! singularity tolerance does not depend on image resolution.

use super::{Point2D, Quadrilateral};
use crate::error::TryOnError;

/// Pivots below this magnitude mark the linear system as singular
pub const SINGULAR_EPS: f64 = 1e-9;

/// Projective denominators below this are treated as points at infinity
const W_EPS: f64 = 1e-12;

/// Row-major 3x3 projective transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography {
    pub m: [[f64; 3]; 3],
}

type Mat3 = [[f64; 3]; 3];

fn mat_mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

#[rustfmt::skip]
fn determinant(m: &Mat3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1]) -
    m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
    m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

#[rustfmt::skip]
fn adjugate(m: &Mat3) -> Mat3 {
    [
        [
            m[1][1] * m[2][2] - m[1][2] * m[2][1],
            m[0][2] * m[2][1] - m[0][1] * m[2][2],
            m[0][1] * m[1][2] - m[0][2] * m[1][1],
        ],
        [
            m[1][2] * m[2][0] - m[1][0] * m[2][2],
            m[0][0] * m[2][2] - m[0][2] * m[2][0],
            m[0][2] * m[1][0] - m[0][0] * m[1][2],
        ],
        [
            m[1][0] * m[2][1] - m[1][1] * m[2][0],
            m[0][1] * m[2][0] - m[0][0] * m[2][1],
            m[0][0] * m[1][1] - m[0][1] * m[1][0],
        ],
    ]
}

fn frobenius(m: &Mat3) -> f64 {
    m.iter().flatten().map(|v| v * v).sum::<f64>().sqrt()
}

/// Similarity that moves the centroid to the origin and scales the mean
/// distance from it to √2, with its inverse.
fn normalizer(points: &[Point2D; 4]) -> (Mat3, Mat3) {
    let cx = points.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<f64>() / 4.0;
    let mean_dist = points
        .iter()
        .map(|p| (p.x - cx).hypot(p.y - cy))
        .sum::<f64>()
        / 4.0;

    let s = if mean_dist > W_EPS {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    let t = [[s, 0.0, -s * cx], [0.0, s, -s * cy], [0.0, 0.0, 1.0]];
    let t_inv = [[1.0 / s, 0.0, cx], [0.0, 1.0 / s, cy], [0.0, 0.0, 1.0]];
    (t, t_inv)
}

fn apply_mat(m: &Mat3, p: &Point2D) -> Point2D {
    let w = m[2][0] * p.x + m[2][1] * p.y + m[2][2];
    Point2D::new(
        (m[0][0] * p.x + m[0][1] * p.y + m[0][2]) / w,
        (m[1][0] * p.x + m[1][1] * p.y + m[1][2]) / w,
    )
}

/// Solve `a * x = b` for an 8x8 system in place.
///
/// Returns `None` when a pivot falls below [`SINGULAR_EPS`].
#[allow(clippy::needless_range_loop)]
fn solve_8x8(mut a: [[f64; 8]; 8], mut b: [f64; 8]) -> Option<[f64; 8]> {
    for col in 0..8 {
        let mut pivot = col;
        for row in (col + 1)..8 {
            if a[row][col].abs() > a[pivot][col].abs() {
                pivot = row;
            }
        }
        if !(a[pivot][col].abs() >= SINGULAR_EPS) {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..8 {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..8 {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0; 8];
    for row in (0..8).rev() {
        let tail: f64 = ((row + 1)..8).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}

impl Homography {
    pub const IDENTITY: Homography = Homography {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Transform mapping each `src` corner onto the matching `dst` corner
    pub fn estimate(src: &Quadrilateral, dst: &Quadrilateral) -> Result<Self, TryOnError> {
        let _span = tracing::debug_span!("estimate_homography").entered();

        if src.corners.iter().chain(dst.corners.iter()).any(|p| !p.is_finite()) {
            return Err(TryOnError::SingularTransform(
                "correspondences contain a non-finite coordinate".into(),
            ));
        }

        let (t_src, _) = normalizer(&src.corners);
        let (t_dst, t_dst_inv) = normalizer(&dst.corners);

        // Each correspondence (x, y) -> (u, v) contributes:
        //   h0 x + h1 y + h2 - h6 x u - h7 y u = u
        //   h3 x + h4 y + h5 - h6 x v - h7 y v = v
        let mut a = [[0.0; 8]; 8];
        let mut b = [0.0; 8];
        for i in 0..4 {
            let s = apply_mat(&t_src, &src.corners[i]);
            let d = apply_mat(&t_dst, &dst.corners[i]);
            let (x, y, u, v) = (s.x, s.y, d.x, d.y);

            a[2 * i] = [x, y, 1.0, 0.0, 0.0, 0.0, -x * u, -y * u];
            b[2 * i] = u;
            a[2 * i + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -x * v, -y * v];
            b[2 * i + 1] = v;
        }

        let h = solve_8x8(a, b).ok_or_else(|| {
            TryOnError::SingularTransform("point correspondence system is singular".into())
        })?;

        let normalized = [[h[0], h[1], h[2]], [h[3], h[4], h[5]], [h[6], h[7], 1.0]];
        let rank_measure = determinant(&normalized).abs() / frobenius(&normalized).powi(3);
        if !(rank_measure >= SINGULAR_EPS) {
            return Err(TryOnError::SingularTransform(format!(
                "solved transform is rank deficient (|det|/|H|³ = {rank_measure:.3e})"
            )));
        }

        let mut m = mat_mul(&t_dst_inv, &mat_mul(&normalized, &t_src));
        let scale = m[2][2];
        if !(scale.abs() >= W_EPS) {
            return Err(TryOnError::SingularTransform(
                "transform sends the origin to infinity".into(),
            ));
        }
        for v in m.iter_mut().flatten() {
            *v /= scale;
        }
        if m.iter().flatten().any(|v| !v.is_finite()) {
            return Err(TryOnError::SingularTransform(format!(
                "solved transform is not finite: {m:?}"
            )));
        }

        tracing::debug!("Homography: {:?}", m);
        Ok(Self { m })
    }

    /// Project a point, or `None` if it maps to infinity
    pub fn apply(&self, p: Point2D) -> Option<Point2D> {
        let m = &self.m;
        let w = m[2][0] * p.x + m[2][1] * p.y + m[2][2];
        if w.abs() < W_EPS {
            return None;
        }
        Some(apply_mat(m, &p))
    }

    pub fn determinant(&self) -> f64 {
        determinant(&self.m)
    }

    pub fn inverse(&self) -> Result<Self, TryOnError> {
        let det = self.determinant();
        if !(det.abs() >= W_EPS) {
            return Err(TryOnError::SingularTransform(format!(
                "matrix is not invertible (det = {det:.3e})"
            )));
        }
        let mut m = adjugate(&self.m);
        for v in m.iter_mut().flatten() {
            *v /= det;
        }
        Ok(Self { m })
    }
}
