/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Map `u` in `[0, 1]` linearly onto `[lower, upper]`.
#[inline]
pub fn lerp(lower: Real, upper: Real, u: Real) -> Real {
    lower + u * (upper - lower)
}

pub fn all_finite(values: &[Real]) -> bool {
    values.iter().all(|v| v.is_finite())
}
