//! Plain `[f64; 3]` vector helpers.
//!
//! Positions are expressed in the coordinates of the active field
//! provider, indexed by [`U`], [`V`] and [`W`].

/// A three-component vector in field-provider coordinates.
pub type Vec3 = [f64; 3];

/// Index of the first (radial-like) coordinate.
pub const U: usize = 0;
/// Index of the second coordinate.
pub const V: usize = 1;
/// Index of the third coordinate.
pub const W: usize = 2;

/// Dot product.
#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product `a × b`.
#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean norm.
#[inline]
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// `s * a`.
#[inline]
pub fn scale(s: f64, a: Vec3) -> Vec3 {
    [s * a[0], s * a[1], s * a[2]]
}

/// `a + b`.
#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// `a - b`.
#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Whether every component is finite.
#[inline]
pub fn is_finite(a: Vec3) -> bool {
    a.iter().all(|c| c.is_finite())
}

/// Unit vector along `a`, or `None` for a zero or non-finite vector.
pub fn unit(a: Vec3) -> Option<Vec3> {
    let n = norm(a);
    if n > 0.0 && n.is_finite() {
        Some(scale(1.0 / n, a))
    } else {
        None
    }
}

/// Two unit vectors completing `b` (assumed unit) to a right-handed
/// orthonormal triad `(e1, e2, b)`.
pub fn perpendicular_basis(b: Vec3) -> (Vec3, Vec3) {
    // Seed with the axis least aligned with b.
    let seed = if b[0].abs() <= b[1].abs() && b[0].abs() <= b[2].abs() {
        [1.0, 0.0, 0.0]
    } else if b[1].abs() <= b[2].abs() {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, 0.0, 1.0]
    };
    let e1 = unit(cross(seed, b)).unwrap_or([1.0, 0.0, 0.0]);
    let e2 = cross(b, e1);
    (e1, e2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_of_axes_is_right_handed() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn unit_rejects_zero() {
        assert!(unit([0.0; 3]).is_none());
        assert_eq!(unit([0.0, 3.0, 0.0]), Some([0.0, 1.0, 0.0]));
    }

    #[test]
    fn perpendicular_basis_is_orthonormal() {
        for b in [
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            unit([1.0, 2.0, 3.0]).unwrap(),
        ] {
            let (e1, e2) = perpendicular_basis(b);
            assert!(dot(e1, b).abs() < 1e-12);
            assert!(dot(e2, b).abs() < 1e-12);
            assert!(dot(e1, e2).abs() < 1e-12);
            assert!((norm(e1) - 1.0).abs() < 1e-12);
            assert!((norm(e2) - 1.0).abs() < 1e-12);
            // Right-handed: e1 × e2 = b.
            let c = cross(e1, e2);
            assert!(norm(sub(c, b)) < 1e-12);
        }
    }
}
