//! Brent root bracketing.

use crate::error::{ModelError, NumericError, Result};

/// Iteration cap for [`brent`].
pub const BRENT_MAX_ITERATIONS: usize = 100;
/// Relative interval width at which [`brent`] accepts convergence.
pub const BRENT_EPSREL: f64 = 1e-4;

/// Brent's method on `[lower, upper]`.
///
/// Requires `lower < upper` but not that the bracket straddle zero: when
/// both endpoint values share a sign the iteration still runs and
/// returns the point it settles on, mirroring the lenient behaviour the
/// threshold solvers depend on. Convergence is declared when the
/// bracketing interval shrinks below `BRENT_EPSREL` relative to its
/// endpoints; otherwise the estimate after `BRENT_MAX_ITERATIONS`
/// iterations is returned. Failures raised by `f` propagate unchanged.
pub fn brent<F>(mut f: F, lower: f64, upper: f64) -> Result<f64>
where
    F: FnMut(f64) -> Result<f64>,
{
    if lower >= upper {
        return Err(ModelError::InvalidArgument(
            "invalid interval: lower bound must be less than upper bound".to_string(),
        ));
    }

    let mut a = lower;
    let mut b = upper;
    let mut fa = f(a)?;
    let mut fb = f(b)?;
    if !fa.is_finite() || !fb.is_finite() {
        return Err(NumericError::NoSolution.into());
    }
    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = b - a;

    for _ in 0..BRENT_MAX_ITERATIONS {
        let mut ac_equal = false;

        if (fb < 0.0 && fc < 0.0) || (fb > 0.0 && fc > 0.0) {
            ac_equal = true;
            c = a;
            fc = fa;
            d = b - a;
            e = b - a;
        }
        if fc.abs() < fb.abs() {
            ac_equal = true;
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 0.5 * f64::EPSILON * b.abs();
        let m = 0.5 * (c - b);

        if fb == 0.0 {
            return Ok(b);
        }
        if m.abs() <= tol {
            return Ok(b);
        }

        if e.abs() < tol || fa.abs() <= fb.abs() {
            // Bisection.
            d = m;
            e = m;
        } else {
            let s = fb / fa;
            let (mut p, mut q);
            if ac_equal {
                // Linear interpolation.
                p = 2.0 * m * s;
                q = 1.0 - s;
            } else {
                // Inverse quadratic interpolation.
                let qq = fa / fc;
                let rr = fb / fc;
                p = s * (2.0 * m * qq * (qq - rr) - (b - a) * (rr - 1.0));
                q = (qq - 1.0) * (rr - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        }

        a = b;
        fa = fb;
        if d.abs() > tol {
            b += d;
        } else {
            b += if m > 0.0 { tol } else { -tol };
        }
        fb = f(b)?;
        if !fb.is_finite() {
            return Err(NumericError::NoSolution.into());
        }

        let (int_lo, int_hi) = if b < c { (b, c) } else { (c, b) };
        let min_abs = if (int_lo > 0.0 && int_hi > 0.0) || (int_lo < 0.0 && int_hi < 0.0) {
            int_lo.abs().min(int_hi.abs())
        } else {
            0.0
        };
        if int_hi - int_lo < BRENT_EPSREL * min_abs {
            return Ok(b);
        }
    }

    Ok(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_simple_root() {
        let root = brent(|x| Ok(x * x - 2.0), 0.0, 2.0).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn finds_transcendental_root() {
        let root = brent(|x| Ok(x.cos() - x), 0.0, 1.0).unwrap();
        assert!((root - 0.7390851332151607).abs() < 1e-6);
    }

    #[test]
    fn rejects_inverted_interval() {
        let err = brent(|x| Ok(x), 1.0, 0.0).unwrap_err();
        assert!(matches!(err, ModelError::InvalidArgument(_)));
    }

    #[test]
    fn tolerates_non_straddling_bracket() {
        // Both endpoints positive; the iteration must terminate without
        // panicking and return a finite point.
        let value = brent(|x| Ok(x * x + 1.0), -1.0, 1.0).unwrap();
        assert!(value.is_finite());
    }
}
