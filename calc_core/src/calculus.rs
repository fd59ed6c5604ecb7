//! # Calculus Approximations
//!
//! Numerical integration (trapezoidal rule) and differentiation (central
//! difference). The engine applies both to one fixed demonstration function,
//! [`demo_function`] `f(x) = x²`; the approximators themselves take any `Fn(f64) -> f64`.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculus::{demo_function, derivative_central, integrate_trapezoid};
//!
//! let area = integrate_trapezoid(demo_function, 0.0, 1.0, 1000);
//! assert!((area - 1.0 / 3.0).abs() < 1e-6);
//!
//! let slope = derivative_central(demo_function, 3.0, 0.0001);
//! assert!((slope - 6.0).abs() < 1e-6);
//! ```

/// Subintervals used by the integral key
pub const INTEGRATION_INTERVALS: u32 = 1000;

/// Step used by the derivative key
pub const DERIVATIVE_STEP: f64 = 0.0001;

/// Text form of [`demo_function`] used in history lines
pub const DEMO_FUNCTION_TEXT: &str = "x^2";

/// f(x) = x²
pub fn demo_function(x: f64) -> f64 {
    x * x
}

/// Definite integral of `f` from `lower` to `upper` by the trapezoidal rule.
///
/// Samples `f` at `intervals + 1` evenly spaced points; the two endpoints
/// carry half weight. Reversed bounds give a negated area. `intervals` of 0
/// is treated as 1.
pub fn integrate_trapezoid<F>(f: F, lower: f64, upper: f64, intervals: u32) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = intervals.max(1);
    let h = (upper - lower) / f64::from(n);

    let sum: f64 = (0..=n)
        .map(|i| {
            let x = lower + f64::from(i) * h;
            let weight = if i == 0 || i == n { 0.5 } else { 1.0 };
            weight * f(x)
        })
        .sum();

    h * sum
}

/// Derivative of `f` at `x` by central difference `(f(x+h) - f(x-h)) / 2h`.
pub fn derivative_central<F>(f: F, x: f64, h: f64) -> f64
where
    F: Fn(f64) -> f64,
{
    (f(x + h) - f(x - h)) / (2.0 * h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_of_square_zero_to_one() {
        let result = integrate_trapezoid(demo_function, 0.0, 1.0, INTEGRATION_INTERVALS);
        // Trapezoid error for x² is (b-a)h²/6 = 1.6667e-7
        assert!((result - (1.0 / 3.0 + 1.0 / 6.0e6)).abs() < 1e-10);
    }

    #[test]
    fn test_integral_reversed_bounds() {
        let forward = integrate_trapezoid(demo_function, 0.0, 2.0, INTEGRATION_INTERVALS);
        let backward = integrate_trapezoid(demo_function, 2.0, 0.0, INTEGRATION_INTERVALS);
        assert!((forward + backward).abs() < 1e-9);
    }

    #[test]
    fn test_integral_empty_range() {
        assert_eq!(integrate_trapezoid(demo_function, 5.0, 5.0, INTEGRATION_INTERVALS), 0.0);
    }

    #[test]
    fn test_integral_of_linear_function_is_exact() {
        let result = integrate_trapezoid(|x| 2.0 * x + 1.0, 0.0, 3.0, 10);
        assert!((result - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_intervals_treated_as_one() {
        let result = integrate_trapezoid(|x| x, 0.0, 2.0, 0);
        assert!((result - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_of_square() {
        assert!((derivative_central(demo_function, 3.0, DERIVATIVE_STEP) - 6.0).abs() < 1e-6);
        assert!((derivative_central(demo_function, -2.0, DERIVATIVE_STEP) + 4.0).abs() < 1e-6);
        assert!(derivative_central(demo_function, 0.0, DERIVATIVE_STEP).abs() < 1e-9);
    }
}
