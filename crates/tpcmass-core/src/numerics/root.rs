//! Bracketed scalar root finding over a caller-supplied function: an
//! inclusive linear scan that locates sign-change subintervals, and Brent's
//! method (inverse quadratic interpolation with secant and bisection
//! safeguards) to refine one of them. The two stages compose but stand on
//! their own; nothing here knows about the physics upstairs.

use crate::numerics::linear_grid;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootOptions {
    pub absolute_tolerance: f64,
    pub relative_tolerance: f64,
    pub max_iterations: usize,
}

impl Default for RootOptions {
    fn default() -> Self {
        Self {
            absolute_tolerance: 1.0e-12,
            relative_tolerance: 4.0 * f64::EPSILON,
            max_iterations: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketedRoot {
    pub root: f64,
    pub residual: f64,
    pub iterations: usize,
}

/// One subinterval of a scan over which the function changes sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignChange {
    pub lower: f64,
    pub upper: f64,
    pub f_lower: f64,
    pub f_upper: f64,
}

impl SignChange {
    /// True when the function passes from positive to negative across the
    /// subinterval.
    pub fn is_descending(&self) -> bool {
        self.f_lower > 0.0 && self.f_upper < 0.0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RootError {
    #[error("root bracket [{lower}, {upper}] must be finite and strictly ordered")]
    InvalidBracket { lower: f64, upper: f64 },
    #[error("scan requires at least one segment, got {segments}")]
    InvalidSegments { segments: usize },
    #[error("function value at {at} is not finite")]
    NonFiniteValue { at: f64 },
    #[error(
        "no sign change over [{lower}, {upper}]: f(lower)={f_lower}, f(upper)={f_upper}"
    )]
    NoSignChange {
        lower: f64,
        upper: f64,
        f_lower: f64,
        f_upper: f64,
    },
    #[error("no convergence after {iterations} iterations, bracket width {width}")]
    NonConvergence { iterations: usize, width: f64 },
}

/// Evaluates `f` on an inclusive linear grid of `segments` subintervals and
/// returns every subinterval whose endpoint values bracket a zero, in order.
pub fn scan_sign_change<F>(
    f: F,
    lower: f64,
    upper: f64,
    segments: usize,
) -> Result<Vec<SignChange>, RootError>
where
    F: Fn(f64) -> f64,
{
    if !lower.is_finite() || !upper.is_finite() || lower >= upper {
        return Err(RootError::InvalidBracket { lower, upper });
    }
    if segments == 0 {
        return Err(RootError::InvalidSegments { segments });
    }

    let grid = linear_grid(lower, upper, segments + 1)
        .ok_or(RootError::InvalidSegments { segments })?;
    let mut values = Vec::with_capacity(grid.len());
    for &x in &grid {
        let value = f(x);
        if !value.is_finite() {
            return Err(RootError::NonFiniteValue { at: x });
        }
        values.push(value);
    }

    let mut changes = Vec::new();
    for index in 0..segments {
        let f_lower = values[index];
        let f_upper = values[index + 1];
        if f_lower * f_upper <= 0.0 {
            changes.push(SignChange {
                lower: grid[index],
                upper: grid[index + 1],
                f_lower,
                f_upper,
            });
        }
    }

    Ok(changes)
}

/// Brent's method over `[lower, upper]`. The bracket must straddle a zero;
/// an endpoint that is already an exact zero is returned with zero
/// iterations. Convergence uses the usual two-level width criterion
/// `2*rel_tol*|b| + abs_tol/2`.
pub fn brent_root<F>(
    f: F,
    lower: f64,
    upper: f64,
    options: &RootOptions,
) -> Result<BracketedRoot, RootError>
where
    F: Fn(f64) -> f64,
{
    if !lower.is_finite() || !upper.is_finite() || lower >= upper {
        return Err(RootError::InvalidBracket { lower, upper });
    }

    let mut a = lower;
    let mut b = upper;
    let mut fa = f(a);
    let mut fb = f(b);
    if !fa.is_finite() {
        return Err(RootError::NonFiniteValue { at: a });
    }
    if !fb.is_finite() {
        return Err(RootError::NonFiniteValue { at: b });
    }
    if fa == 0.0 {
        return Ok(BracketedRoot {
            root: a,
            residual: fa,
            iterations: 0,
        });
    }
    if fb == 0.0 {
        return Ok(BracketedRoot {
            root: b,
            residual: fb,
            iterations: 0,
        });
    }
    if (fa > 0.0) == (fb > 0.0) {
        return Err(RootError::NoSignChange {
            lower,
            upper,
            f_lower: fa,
            f_upper: fb,
        });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=options.max_iterations {
        if (fb > 0.0) == (fc > 0.0) {
            // Keep c on the opposite side of the root from b.
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tolerance =
            2.0 * options.relative_tolerance * b.abs() + 0.5 * options.absolute_tolerance;
        let midpoint_offset = 0.5 * (c - b);
        if midpoint_offset.abs() <= tolerance || fb == 0.0 {
            return Ok(BracketedRoot {
                root: b,
                residual: fb,
                iterations: iteration - 1,
            });
        }

        if e.abs() >= tolerance && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, degrading to the secant rule
            // when only two points are distinct.
            let s = fb / fa;
            let mut p;
            let mut q;
            if a == c {
                p = 2.0 * midpoint_offset * s;
                q = 1.0 - s;
            } else {
                let qa = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * midpoint_offset * qa * (qa - r) - (b - a) * (r - 1.0));
                q = (qa - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let interpolation_bound =
                (3.0 * midpoint_offset * q - (tolerance * q).abs()).min((e * q).abs());
            if 2.0 * p < interpolation_bound {
                e = d;
                d = p / q;
            } else {
                d = midpoint_offset;
                e = d;
            }
        } else {
            d = midpoint_offset;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tolerance {
            b += d;
        } else {
            b += tolerance.copysign(midpoint_offset);
        }
        fb = f(b);
        if !fb.is_finite() {
            return Err(RootError::NonFiniteValue { at: b });
        }
    }

    Err(RootError::NonConvergence {
        iterations: options.max_iterations,
        width: (c - b).abs(),
    })
}

#[cfg(test)]
mod tests {
    use super::{BracketedRoot, RootError, RootOptions, brent_root, scan_sign_change};

    #[test]
    fn brent_finds_polynomial_root() {
        let options = RootOptions::default();
        let result =
            brent_root(|x| x * x - 4.0, 0.0, 5.0, &options).expect("root should be found");

        assert!((result.root - 2.0).abs() <= 1.0e-10);
        assert!(result.residual.abs() <= 1.0e-9);
        assert!(result.iterations < options.max_iterations);
    }

    #[test]
    fn brent_finds_transcendental_root() {
        let options = RootOptions::default();
        let result =
            brent_root(|x| x.cos() - x, 0.0, 1.0, &options).expect("root should be found");

        assert!((result.root - 0.739_085_133_215_160_6).abs() <= 1.0e-12);
    }

    #[test]
    fn brent_returns_exact_endpoint_zero_immediately() {
        let options = RootOptions::default();
        let result = brent_root(|x| x, 0.0, 1.0, &options).expect("endpoint zero");

        assert_eq!(
            result,
            BracketedRoot {
                root: 0.0,
                residual: 0.0,
                iterations: 0,
            }
        );
    }

    #[test]
    fn brent_rejects_bracket_without_sign_change() {
        let error = brent_root(|x| x * x + 1.0, -1.0, 1.0, &RootOptions::default())
            .expect_err("no root in bracket");
        assert_eq!(
            error,
            RootError::NoSignChange {
                lower: -1.0,
                upper: 1.0,
                f_lower: 2.0,
                f_upper: 2.0,
            }
        );
    }

    #[test]
    fn brent_rejects_invalid_brackets() {
        let error =
            brent_root(|x| x, 2.0, 1.0, &RootOptions::default()).expect_err("reversed bracket");
        assert_eq!(
            error,
            RootError::InvalidBracket {
                lower: 2.0,
                upper: 1.0,
            }
        );

        let error = brent_root(|x| x, f64::NAN, 1.0, &RootOptions::default())
            .expect_err("non-finite bracket");
        assert!(matches!(error, RootError::InvalidBracket { .. }));
    }

    #[test]
    fn brent_reports_non_convergence_on_tight_budget() {
        let options = RootOptions {
            max_iterations: 2,
            ..RootOptions::default()
        };
        let error =
            brent_root(|x| x.cos() - x, 0.0, 1.0, &options).expect_err("budget too small");
        assert!(matches!(
            error,
            RootError::NonConvergence { iterations: 2, .. }
        ));
    }

    #[test]
    fn scan_locates_every_sign_change_in_order() {
        // 64 segments give an exact binary step, so no grid node lands on a
        // root and each crossing shows up as exactly one subinterval.
        let cubic = |x: f64| (x - 1.0) * (x - 3.0) * (x - 7.0);
        let changes = scan_sign_change(cubic, 0.0, 10.0, 64).expect("scan should succeed");

        assert_eq!(changes.len(), 3);
        assert!(changes[0].lower <= 1.0 && 1.0 <= changes[0].upper);
        assert!(changes[1].lower <= 3.0 && 3.0 <= changes[1].upper);
        assert!(changes[2].lower <= 7.0 && 7.0 <= changes[2].upper);

        // The cubic rises through 1 and 7 and falls through 3.
        assert!(!changes[0].is_descending());
        assert!(changes[1].is_descending());
        assert!(!changes[2].is_descending());

        let options = RootOptions::default();
        for (change, expected) in changes.iter().zip([1.0, 3.0, 7.0]) {
            let result = brent_root(cubic, change.lower, change.upper, &options)
                .expect("refinement should succeed");
            assert!((result.root - expected).abs() <= 1.0e-9);
        }
    }

    #[test]
    fn scan_returns_empty_for_sign_preserving_functions() {
        let changes =
            scan_sign_change(|x| x * x + 0.5, -2.0, 2.0, 40).expect("scan should succeed");
        assert!(changes.is_empty());
    }

    #[test]
    fn scan_validates_inputs() {
        let error = scan_sign_change(|x| x, 0.0, 1.0, 0).expect_err("zero segments");
        assert_eq!(error, RootError::InvalidSegments { segments: 0 });

        let error = scan_sign_change(|x| x, 1.0, 1.0, 10).expect_err("degenerate bracket");
        assert!(matches!(error, RootError::InvalidBracket { .. }));

        let error = scan_sign_change(|x| (x - 0.5).ln(), 0.0, 1.0, 10)
            .expect_err("non-finite values should fail");
        assert_eq!(error, RootError::NonFiniteValue { at: 0.0 });
    }
}
