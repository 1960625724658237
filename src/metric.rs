use num_traits::Float;

/// Distance metric used to compare a feature vector with a query sample.
///
/// Each metric applies a per-dimension operation and sums the results,
/// starting from `F::zero()`.
///
/// The definitions are literal and two of them differ from their textbook
/// namesakes:
///
/// - [`Metric::Euclidean`] returns the **squared** Euclidean distance (no square root).
/// - [`Metric::Chebyshev`] returns the **signed** sum of differences `Σ (a_i - b_i)`,
///   not the maximum absolute difference. It can be negative and is not symmetric.
/// - [`Metric::Manhattan`] returns `Σ |a_i - b_i|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Euclidean,
    Chebyshev,
    Manhattan,
}

impl Metric {
    /// Computes the distance between `a` and `b` under this metric.
    ///
    /// # Example
    ///
    /// ```
    /// use knn::Metric;
    ///
    /// assert_eq!(Metric::Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
    /// assert_eq!(Metric::Manhattan.distance(&[1.0, 2.0], &[4.0, 6.0]), 7.0);
    /// assert_eq!(Metric::Chebyshev.distance(&[1.0, 5.0], &[4.0, 2.0]), 0.0);
    /// ```
    pub fn distance<F: Float, const N: usize>(&self, a: &[F; N], b: &[F; N]) -> F {
        let op: fn(F, F) -> F = match self {
            Metric::Euclidean => |x, y| (x - y) * (x - y),
            Metric::Chebyshev => |x, y| x - y,
            Metric::Manhattan => |x, y| (x - y).abs(),
        };
        a.iter()
            .zip(b.iter())
            .fold(F::zero(), |acc, (&x, &y)| acc + op(x, y))
    }
}
