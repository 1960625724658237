use std::cmp::Ordering;
use std::marker::PhantomData;
use std::num::NonZeroUsize;

use log::{debug, trace, warn};
use num_traits::Float;

use crate::error::{Error, Result};
use crate::metric::Metric;

const DEFAULT_NEIGHBOURS: NonZeroUsize = NonZeroUsize::MIN.saturating_add(9);

/// A labeled feature vector of fixed dimension `N`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePoint<T, F, const N: usize> {
    pub features: [F; N],
    pub label: T,
}

impl<T, F, const N: usize> FeaturePoint<T, F, N> {
    pub fn new(features: [F; N], label: T) -> Self {
        Self { features, label }
    }
}

impl<T, F, const N: usize> From<([F; N], T)> for FeaturePoint<T, F, N> {
    fn from((features, label): ([F; N], T)) -> Self {
        Self { features, label }
    }
}

/// The label of a feature point together with its distance to a query sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceRecord<T, F> {
    pub label: T,
    pub distance: F,
}

/// How a label is chosen from the sorted distance records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Label of the single nearest record. The neighbour count only bounds
    /// how many records must be available.
    #[default]
    Nearest,
    /// Majority vote among the `k` nearest records. Equal vote counts are
    /// resolved by the lower summed distance, then by the earlier position
    /// in the sorted records.
    Majority,
}

/// Configuration options for the k-NN classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KNNConfig {
    /// Number of neighbours considered (10 by default).
    pub neighbours: NonZeroUsize,
    /// Distance metric used by subsequent distance computations.
    pub metric: Metric,
    /// Label selection strategy.
    pub selection: Selection,
}

impl KNNConfig {
    /// Create a config with 10 neighbours, the Euclidean metric and nearest selection.
    pub fn new() -> Self {
        Self {
            neighbours: DEFAULT_NEIGHBOURS,
            metric: Metric::Euclidean,
            selection: Selection::Nearest,
        }
    }

    /// Customize the number of neighbours.
    pub fn with_neighbours(mut self, neighbours: NonZeroUsize) -> Self {
        self.neighbours = neighbours;
        self
    }

    /// Customize the distance metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Customize the label selection strategy.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }
}

impl Default for KNNConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A nearest-neighbour classifier that accumulates distance records across
/// queries and predicts a label from them.
///
/// Records produced by [`compute_distances`](Self::compute_distances) are
/// appended to the records of earlier calls; they are only discarded by
/// [`reset`](Self::reset) or [`classify`](Self::classify).
///
/// Every operation that touches the records takes `&mut self`, so a single
/// instance cannot be used from several threads at once without an external
/// lock such as a `Mutex`. Use one classifier per query context.
///
/// # Type Parameters
/// - `T`: The label type.
/// - `F`: The coordinate type (`f32` or `f64`).
/// - `N`: The dimension of every feature vector.
///
/// # Example
///
/// ```
/// use knn::{FeaturePoint, KNNClassifier, Metric};
///
/// let features = vec![
///     FeaturePoint::new([1.0, 2.0], "A"),
///     FeaturePoint::new([2.0, 3.0], "A"),
///     FeaturePoint::new([6.0, 7.0], "B"),
/// ];
///
/// let mut knn = KNNClassifier::new();
/// knn.set_metric(Metric::Manhattan);
/// knn.compute_distances(&features, &[5.5, 6.5]);
///
/// // Only three records are accumulated, fewer than the default 10 neighbours.
/// assert!(knn.predict().is_err());
///
/// knn.set_neighbours(std::num::NonZeroUsize::new(3).unwrap());
/// assert_eq!(knn.predict().unwrap(), "B");
/// ```
#[derive(Debug, Clone)]
pub struct KNNClassifier<T, F, const N: usize> {
    config: KNNConfig,
    distances: Vec<DistanceRecord<T, F>>,
    _dimension_marker: PhantomData<[F; N]>,
}

impl<T, F, const N: usize> Default for KNNClassifier<T, F, N> {
    fn default() -> Self {
        Self::with_config(KNNConfig::default())
    }
}

impl<T, F, const N: usize> KNNClassifier<T, F, N> {
    /// Constructs a classifier with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a classifier from an explicit configuration.
    pub fn with_config(config: KNNConfig) -> Self {
        Self {
            config,
            distances: Vec::new(),
            _dimension_marker: PhantomData,
        }
    }

    /// The current configuration.
    pub fn config(&self) -> &KNNConfig {
        &self.config
    }

    /// Metric applied by the next distance computation.
    pub fn metric(&self) -> Metric {
        self.config.metric
    }

    /// Number of neighbours `k`.
    pub fn neighbours(&self) -> NonZeroUsize {
        self.config.neighbours
    }

    /// Label selection strategy.
    pub fn selection(&self) -> Selection {
        self.config.selection
    }

    /// Changes the metric used by later calls to `compute_distances`.
    /// Records already accumulated keep their distances.
    pub fn set_metric(&mut self, metric: Metric) {
        self.config.metric = metric;
    }

    /// Changes `k`. Takes effect at the next prediction.
    pub fn set_neighbours(&mut self, neighbours: NonZeroUsize) {
        self.config.neighbours = neighbours;
    }

    /// Changes how the next prediction picks a label.
    pub fn set_selection(&mut self, selection: Selection) {
        self.config.selection = selection;
    }

    /// The accumulated records. After a prediction they are sorted by distance.
    pub fn distances(&self) -> &[DistanceRecord<T, F>] {
        &self.distances
    }

    /// Number of accumulated records.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Returns `true` if no records have been accumulated.
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Discards every accumulated record. The configuration is kept.
    pub fn reset(&mut self) {
        self.distances.clear();
    }
}

impl<T, F, const N: usize> KNNClassifier<T, F, N>
where
    T: PartialEq + Clone,
    F: Float,
{
    /// Appends one record per feature point, in the order of `feature_set`,
    /// holding the point's label and its distance to `sample`.
    pub fn compute_distances(&mut self, feature_set: &[FeaturePoint<T, F, N>], sample: &[F; N]) {
        let metric = self.config.metric;
        self.distances.extend(feature_set.iter().map(|point| DistanceRecord {
            label: point.label.clone(),
            distance: metric.distance(&point.features, sample),
        }));
        debug!(
            "appended {} {:?} distance records ({} accumulated)",
            feature_set.len(),
            metric,
            self.distances.len()
        );
    }

    /// Sorts the accumulated records by ascending distance and predicts a label.
    ///
    /// The sort is stable, so records at equal distances keep their insertion
    /// order. NaN distances sort after all others.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyResultSet`] if no records have been accumulated.
    /// - [`Error::InsufficientNeighbours`] if the neighbour count exceeds the
    ///   number of accumulated records.
    pub fn predict(&mut self) -> Result<T> {
        let available = self.distances.len();
        if available == 0 {
            warn!("prediction requested with no distance records");
            return Err(Error::EmptyResultSet);
        }
        let k = self.config.neighbours.get();
        if k > available {
            warn!("prediction requested with k = {k} but only {available} records");
            return Err(Error::InsufficientNeighbours {
                requested: k,
                available,
            });
        }

        self.distances
            .sort_by(|a, b| compare_distances(a.distance, b.distance));

        let label = match self.config.selection {
            Selection::Nearest => {
                let nearest = &self.distances[0];
                debug!("nearest record at distance {:?}", nearest.distance.to_f64());
                nearest.label.clone()
            }
            // A window holding only NaN distances falls back to the first record.
            Selection::Majority => majority_vote(&self.distances[..k])
                .unwrap_or_else(|| self.distances[0].label.clone()),
        };
        Ok(label)
    }

    /// Resets the accumulated records, computes distances for `sample` and
    /// predicts its label, so that earlier queries have no influence.
    pub fn classify(
        &mut self,
        feature_set: &[FeaturePoint<T, F, N>],
        sample: &[F; N],
    ) -> Result<T> {
        self.reset();
        self.compute_distances(feature_set, sample);
        self.predict()
    }

    /// Like [`predict`](Self::predict), but returns `T::default()` where
    /// `predict` would report an error.
    pub fn predict_or_default(&mut self) -> T
    where
        T: Default,
    {
        self.predict().unwrap_or_default()
    }
}

/// Ascending order with NaN placed after every other value.
fn compare_distances<F: Float>(a: F, b: F) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

struct Tally<'a, T, F> {
    label: &'a T,
    votes: usize,
    total_distance: F,
}

/// Majority vote over already sorted neighbours. Records with a NaN distance
/// do not vote; returns `None` when no record has a comparable distance.
fn majority_vote<T: PartialEq + Clone, F: Float>(
    neighbours: &[DistanceRecord<T, F>],
) -> Option<T> {
    // Labels only need equality, so tallies are kept in first-seen order.
    let mut tallies: Vec<Tally<'_, T, F>> = Vec::new();
    for record in neighbours.iter().filter(|r| !r.distance.is_nan()) {
        match tallies.iter_mut().find(|t| *t.label == record.label) {
            Some(tally) => {
                tally.votes += 1;
                tally.total_distance = tally.total_distance + record.distance;
            }
            None => tallies.push(Tally {
                label: &record.label,
                votes: 1,
                total_distance: record.distance,
            }),
        }
    }

    let mut best: Option<&Tally<'_, T, F>> = None;
    for tally in &tallies {
        best = match best {
            Some(current)
                if tally.votes < current.votes
                    || (tally.votes == current.votes
                        && compare_distances(tally.total_distance, current.total_distance)
                            != Ordering::Less) =>
            {
                Some(current)
            }
            _ => Some(tally),
        };
    }

    trace!(
        "majority vote over {} neighbours: {} distinct labels",
        neighbours.len(),
        tallies.len()
    );
    best.map(|tally| tally.label.clone())
}
