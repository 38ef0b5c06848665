//! Affine transforms for shape geometry.
//!
//! Shapes coming out of a document often carry a `transform` attribute
//! (`translate(...) rotate(...)`, nested group matrices, ...). We bake those
//! into the points right after flattening so everything downstream works in
//! one coordinate space.

use crate::geometry::Point;

/// A 2D affine matrix `[a c e; b d f; 0 0 1]`, SVG order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation in degrees about the origin.
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Parse an SVG transform list such as `"translate(10 5) rotate(45)"`.
    ///
    /// Malformed strings give `None`; callers treat that as identity, in
    /// line with skipping anything we can't read.
    pub fn parse(text: &str) -> Option<Affine> {
        let ts: svgtypes::Transform = text.parse().ok()?;
        let affine = Affine::new(ts.a, ts.b, ts.c, ts.d, ts.e, ts.f);
        affine.is_finite().then_some(affine)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn is_finite(&self) -> bool {
        [self.a, self.b, self.c, self.d, self.e, self.f].iter().all(|v| v.is_finite())
    }

    /// `self` applied after `inner` (parent * child in SVG nesting).
    pub fn then(&self, inner: &Affine) -> Affine {
        Affine::new(
            self.a * inner.a + self.c * inner.b,
            self.b * inner.a + self.d * inner.b,
            self.a * inner.c + self.c * inner.d,
            self.b * inner.c + self.d * inner.d,
            self.a * inner.e + self.c * inner.f + self.e,
            self.b * inner.e + self.d * inner.f + self.f,
        )
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Transform every point of every ring in place.
    pub fn apply_rings(&self, rings: &mut [Vec<Point>]) {
        if self.is_identity() {
            return;
        }
        for ring in rings.iter_mut() {
            for p in ring.iter_mut() {
                *p = self.apply(*p);
            }
        }
    }
}
