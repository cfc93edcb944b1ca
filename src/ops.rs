//! Fuzzy operators used by the inference engine.
//!
//! The engine is fixed to min conjunction, min (Mamdani) implication, max
//! aggregation and a discretized center of gravity.

use num::Float;

/// Conjunction of two degrees.
#[inline]
pub fn and<F: Float>(u: F, v: F) -> F {
    F::min(u, v)
}

/// Disjunction of two degrees.
#[inline]
pub fn or<F: Float>(u: F, v: F) -> F {
    F::max(u, v)
}

/// Conjunction over any number of degrees. An empty premise holds fully.
pub fn and_all<F: Float>(degrees: impl IntoIterator<Item = F>) -> F {
    degrees.into_iter().fold(F::one(), and)
}

/// Disjunction over any number of degrees. Nothing fired means nothing holds.
pub fn or_all<F: Float>(degrees: impl IntoIterator<Item = F>) -> F {
    degrees.into_iter().fold(F::zero(), or)
}

/// Mamdani implication: the consequence is clipped at the premise's strength.
#[inline]
pub fn implication<F: Float>(premise: F, consequence: F) -> F {
    and(premise, consequence)
}

/// Running sums of a discretized center of gravity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid<F> {
    weight: F,
    weighted_sum: F,
}

impl<F: Float> Default for Centroid<F> {
    fn default() -> Self {
        Centroid {
            weight: F::zero(),
            weighted_sum: F::zero(),
        }
    }
}

impl<F: Float> Centroid<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, y: F, membership: F) {
        self.weight = self.weight + membership;
        self.weighted_sum = self.weighted_sum + membership * y;
    }

    pub fn weight(&self) -> F {
        self.weight
    }

    /// The weighted mean of the samples.
    ///
    /// A zero total weight is replaced by one, so an empty fuzzy output
    /// defuzzifies to exactly zero instead of NaN.
    pub fn value(&self) -> F {
        let weight = if self.weight == F::zero() {
            F::one()
        } else {
            self.weight
        };

        self.weighted_sum / weight
    }
}

impl<F: Float> FromIterator<(F, F)> for Centroid<F> {
    fn from_iter<I: IntoIterator<Item = (F, F)>>(samples: I) -> Self {
        let mut centroid = Centroid::new();

        for (y, membership) in samples {
            centroid.add(y, membership);
        }

        centroid
    }
}

#[test]
fn test_and_or() {
    assert_eq!(and(0.3, 0.7), 0.3);
    assert_eq!(and(0.7, 0.3), 0.3);
    assert_eq!(or(0.3, 0.7), 0.7);
    assert_eq!(or(0.7, 0.3), 0.7);
    assert_eq!(implication(1., 0.25), 0.25);
}

#[test]
fn test_folds() {
    assert_eq!(and_all([0.9, 0.2, 0.6]), 0.2);
    assert_eq!(and_all([0.4]), 0.4);
    assert_eq!(and_all(Vec::<f64>::new()), 1.);
    assert_eq!(or_all([0.1, 0.8, 0.6]), 0.8);
    assert_eq!(or_all([0.4]), 0.4);
    assert_eq!(or_all(Vec::<f32>::new()), 0.);
}

#[test]
fn test_centroid() {
    let centroid: Centroid<f64> = [(0., 0.5), (10., 0.5)].into_iter().collect();

    assert_eq!(centroid.weight(), 1.);
    assert_eq!(centroid.value(), 5.);

    let centroid: Centroid<f64> = [(2., 0.), (4., 1.), (8., 1.)].into_iter().collect();

    assert_eq!(centroid.value(), 6.);
}

#[test]
fn test_centroid_zero_weight() {
    let centroid: Centroid<f32> = [(3., 0.), (4., 0.)].into_iter().collect();

    assert_eq!(centroid.weight(), 0.);
    assert_eq!(centroid.value(), 0.);
    assert_eq!(Centroid::<f64>::new().value(), 0.);
}
