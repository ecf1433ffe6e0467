//! Not-a-knot cubic interpolating splines.
//!
//! The spline is stored in local power form on every interval,
//! `s(t) = y_i + d (b_i + d (c_i + d e_i))` with `d = t - x_i`, so it reproduces every knot
//! value exactly.

use common::{ConfigurationError, Float};

/// A filler trait to make working with small integers easier :)
trait Small: num::Num + Copy {
    /// Produces the number two.
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Produces the number six.
    fn six() -> Self {
        let three = Self::two() + Self::one();
        Self::two() * three
    }
}

impl<T: num::Num + Copy> Small for T {}

/// The smallest number of knots a not-a-knot cubic can be fitted through.
pub const MIN_KNOTS: usize = 4;

/// A piecewise cubic `C^2` curve through a set of knots, with a continuous third derivative at
/// the second and second-to-last knot.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline<T: Float> {
    /// The knot locations, strictly increasing.
    knots: Vec<T>,
    /// The value of the curve at every knot.
    values: Vec<T>,
    /// The `(b, c, e)` coefficients of every interval.
    coefficients: Vec<[T; 3]>,
}

impl<T: Float> CubicSpline<T> {
    /// Fits the spline through `(knots[i], values[i])`.
    ///
    /// # Errors
    /// Fails with [`ConfigurationError::LengthMismatch`] if the slices differ in length, with
    /// [`ConfigurationError::TooFewControlPoints`] for fewer than [`MIN_KNOTS`] points, with
    /// [`ConfigurationError::NonFinite`] for NaN or infinite inputs and with
    /// [`ConfigurationError::UnorderedKnots`] unless the knots strictly increase.
    pub fn fit(knots: &[T], values: &[T]) -> Result<Self, ConfigurationError> {
        let n = knots.len();
        if values.len() != n {
            return Err(ConfigurationError::LengthMismatch {
                knots: n,
                values: values.len(),
            });
        }
        if n < MIN_KNOTS {
            return Err(ConfigurationError::TooFewControlPoints { count: n });
        }
        if knots.iter().any(|v| !v.is_finite()) {
            return Err(ConfigurationError::NonFinite { name: "knots" });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigurationError::NonFinite { name: "values" });
        }
        if knots.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ConfigurationError::UnorderedKnots);
        }

        let h: Vec<T> = knots.windows(2).map(|w| w[1] - w[0]).collect();
        let slopes: Vec<T> = values
            .windows(2)
            .zip(&h)
            .map(|(w, &h)| (w[1] - w[0]) / h)
            .collect();

        let second = Self::second_derivatives(&h, &slopes);

        let coefficients = (0..n - 1)
            .map(|i| {
                let (m0, m1) = (second[i], second[i + 1]);
                [
                    slopes[i] - h[i] * (T::two() * m0 + m1) / T::six(),
                    m0 / T::two(),
                    (m1 - m0) / (T::six() * h[i]),
                ]
            })
            .collect();

        Ok(Self {
            knots: knots.to_vec(),
            values: values.to_vec(),
            coefficients,
        })
    }

    /// Solves for the second derivative at every knot.
    ///
    /// The two not-a-knot conditions express the end unknowns in terms of their neighbours; once
    /// they are eliminated, the interior unknowns form a tridiagonal system.
    fn second_derivatives(h: &[T], slopes: &[T]) -> Vec<T> {
        let n = h.len() + 1;
        let m = n - 2;
        let six = T::six();
        let two = T::two();

        let mut sub = vec![T::zero(); m];
        let mut diag = vec![T::zero(); m];
        let mut sup = vec![T::zero(); m];
        let mut rhs = vec![T::zero(); m];

        for i in 1..n - 1 {
            let j = i - 1;
            sub[j] = h[i - 1];
            diag[j] = two * (h[i - 1] + h[i]);
            sup[j] = h[i];
            rhs[j] = six * (slopes[i] - slopes[i - 1]);
        }

        let (h0, h1) = (h[0], h[1]);
        diag[0] = (h0 + h1) * (h0 + two * h1) / h1;
        sup[0] = (h1 * h1 - h0 * h0) / h1;
        sub[0] = T::zero();

        let (a, b) = (h[n - 3], h[n - 2]);
        sub[m - 1] = (a * a - b * b) / a;
        diag[m - 1] = (a + b) * (two * a + b) / a;
        sup[m - 1] = T::zero();

        let interior = solve_tridiagonal(&sub, &diag, &sup, &rhs);

        let mut second = Vec::with_capacity(n);
        second.push(((h0 + h1) * interior[0] - h0 * interior[1]) / h1);
        second.extend_from_slice(&interior);
        second.push(((a + b) * interior[m - 1] - b * interior[m - 2]) / a);

        second
    }

    /// Evaluates the curve at `t`. Times outside the knot range use the nearest end piece.
    pub fn evaluate(&self, t: T) -> T {
        let last = self.coefficients.len() - 1;
        if t == self.knots[last + 1] {
            return self.values[last + 1];
        }

        let i = self
            .knots
            .partition_point(|&k| k <= t)
            .saturating_sub(1)
            .min(last);

        let [b, c, e] = self.coefficients[i];
        let d = t - self.knots[i];
        self.values[i] + d * (b + d * (c + d * e))
    }

    /// The knot locations.
    pub fn knots(&self) -> &[T] {
        &self.knots
    }

    /// The values at the knots.
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

/// Thomas algorithm for a diagonally dominant tridiagonal system. `sub[0]` and `sup[m - 1]` are
/// ignored.
fn solve_tridiagonal<T: Float>(sub: &[T], diag: &[T], sup: &[T], rhs: &[T]) -> Vec<T> {
    let m = diag.len();
    let mut c = vec![T::zero(); m];
    let mut d = vec![T::zero(); m];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for j in 1..m {
        let denom = diag[j] - sub[j] * c[j - 1];
        c[j] = sup[j] / denom;
        d[j] = (rhs[j] - sub[j] * d[j - 1]) / denom;
    }

    let mut x = d;
    for j in (0..m - 1).rev() {
        x[j] = x[j] - c[j] * x[j + 1];
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(t: f64) -> f64 {
        t * t * t - 2.0 * t * t + t - 3.0
    }

    #[test]
    fn passes_through_every_knot_exactly() {
        let knots = [0.0, 0.5, 1.0, 1.5, 2.0, 2.5];
        let values = [0.0, 1.3, -0.7, 2.1, 0.4, -1.9];
        let spline = CubicSpline::fit(&knots, &values).unwrap();

        for (&k, &v) in knots.iter().zip(&values) {
            assert_eq!(spline.evaluate(k), v, "spline must interpolate knot at {k}");
        }
    }

    #[test]
    fn reproduces_cubic_polynomials() {
        let knots: Vec<f64> = (0..7).map(|i| i as f64 * 0.75).collect();
        let values: Vec<f64> = knots.iter().copied().map(cubic).collect();
        let spline = CubicSpline::fit(&knots, &values).unwrap();

        for i in 0..=90 {
            let t = i as f64 * 0.05;
            let err = (spline.evaluate(t) - cubic(t)).abs();
            assert!(err < 1e-9, "not-a-knot spline should be exact on a cubic, error {err} at {t}");
        }
    }

    #[test]
    fn four_knots_give_the_interpolating_cubic() {
        let knots = [0.0, 1.0, 2.0, 3.0];
        let values = knots.map(cubic);
        let spline = CubicSpline::fit(&knots, &values).unwrap();

        let err = (spline.evaluate(2.4) - cubic(2.4)).abs();
        assert!(err < 1e-12, "four knots define a single cubic, error {err}");
        let err = (spline.evaluate(3.5) - cubic(3.5)).abs();
        assert!(err < 1e-9, "extrapolation continues the end piece, error {err}");
    }

    #[test]
    fn rejects_too_few_knots() {
        assert_eq!(
            CubicSpline::fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]),
            Err(ConfigurationError::TooFewControlPoints { count: 3 }),
            "three knots cannot carry a not-a-knot cubic"
        );
        assert_eq!(
            CubicSpline::fit(&[0.0, 1.0, 1.0, 2.0], &[0.0; 4]),
            Err(ConfigurationError::UnorderedKnots),
            "repeated knots are rejected"
        );
        assert_eq!(
            CubicSpline::fit(&[0.0, 2.0, 1.0, 3.0], &[0.0; 4]),
            Err(ConfigurationError::UnorderedKnots),
            "decreasing knots are rejected"
        );
        assert_eq!(
            CubicSpline::fit(&[0.0, 1.0, 2.0, 3.0], &[0.0; 5]),
            Err(ConfigurationError::LengthMismatch {
                knots: 4,
                values: 5
            }),
            "one value per knot"
        );
        assert_eq!(
            CubicSpline::fit(&[0.0, 1.0, 2.0, 3.0], &[0.0, f64::NAN, 0.0, 0.0]),
            Err(ConfigurationError::NonFinite { name: "values" }),
            "NaN values are rejected"
        );
    }
}
