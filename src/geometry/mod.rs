mod homography;
mod landmarks;
mod mapper;

pub use homography::Homography;
pub use landmarks::{CoordinateSpace, Joint, Landmark, LandmarkSet};
pub use mapper::{torso_quad, TORSO_JOINTS};

/// Minimum absolute area, in pixels², of a usable quadrilateral
pub const MIN_QUAD_AREA: f64 = 1.0;

/// Points closer than this are treated as coincident
const COINCIDENT_EPS: f64 = 1e-6;

/// A 2D point in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Twice the signed area of the triangle `a, b, c`
fn cross(a: &Point2D, b: &Point2D, c: &Point2D) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Four corners in fixed order: top-left, top-right, bottom-right, bottom-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrilateral {
    pub corners: [Point2D; 4],
}

impl Quadrilateral {
    pub const fn new(corners: [Point2D; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned rectangle `(0,0), (w,0), (w,h), (0,h)`
    pub fn from_size(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self::new([
            Point2D::new(0.0, 0.0),
            Point2D::new(w, 0.0),
            Point2D::new(w, h),
            Point2D::new(0.0, h),
        ])
    }

    /// Shoelace signed area; the sign reflects the winding
    pub fn signed_area(&self) -> f64 {
        let c = &self.corners;
        let mut twice = 0.0;
        for i in 0..4 {
            let (p, q) = (c[i], c[(i + 1) % 4]);
            twice += p.x * q.y - q.x * p.y;
        }
        twice / 2.0
    }

    pub fn centroid(&self) -> Point2D {
        let (sx, sy) = self
            .corners
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point2D::new(sx / 4.0, sy / 4.0)
    }

    /// Checks the quad can serve as a transform target.
    ///
    /// Rejects non-finite or coincident corners, any three collinear
    /// corners, and an absolute area below [`MIN_QUAD_AREA`]. Comparisons are
    /// written so that a NaN never passes.
    pub fn check_non_degenerate(&self) -> Result<(), String> {
        let c = &self.corners;
        if let Some(i) = c.iter().position(|p| !p.is_finite()) {
            return Err(format!("corner {i} is not finite: {:?}", c[i]));
        }

        for i in 0..4 {
            for j in (i + 1)..4 {
                if !(c[i].distance(&c[j]) >= COINCIDENT_EPS) {
                    return Err(format!("corners {i} and {j} coincide at {:?}", c[i]));
                }
            }
        }

        let area = self.signed_area().abs();
        if !(area >= MIN_QUAD_AREA) {
            return Err(format!("area {area:.3} px² is below {MIN_QUAD_AREA} px²"));
        }

        for skip in 0..4 {
            let tri: Vec<&Point2D> = (0..4).filter(|&k| k != skip).map(|k| &c[k]).collect();
            let tri_area = cross(tri[0], tri[1], tri[2]).abs() / 2.0;
            if !(tri_area >= MIN_QUAD_AREA / 2.0) {
                return Err(format!("three corners are collinear (corner {skip} excluded)"));
            }
        }

        Ok(())
    }

    /// Point-in-polygon for a simple quad of either winding
    pub fn contains(&self, p: &Point2D) -> bool {
        let c = &self.corners;
        let signs: Vec<f64> = (0..4).map(|i| cross(&c[i], &c[(i + 1) % 4], p)).collect();
        signs.iter().all(|&s| s >= 0.0) || signs.iter().all(|&s| s <= 0.0)
    }
}
