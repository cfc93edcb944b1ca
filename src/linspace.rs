use num::Float;

/// Evenly spaced samples starting at `start`.
pub struct Linspace<F> {
    start: F,
    step: F,
    index: usize,
    len: usize,
}

impl<F: Float> Linspace<F> {
    /// `n` samples spanning `[min, max]`, both ends included.
    pub fn new(min: F, max: F, n: usize) -> Self {
        Linspace {
            start: min,
            step: Self::step_for(min, max, n),
            index: 0,
            len: n,
        }
    }

    /// Walks `min, min + step, ...` while the sample does not pass `max`.
    ///
    /// The sample count is `floor((max - min) / step) + 1`, so the last sample
    /// falls short of `max` when `step` does not divide the range evenly.
    /// `step` must be finite and positive.
    pub fn stepped(min: F, max: F, step: F) -> Self {
        // A negative or NaN ratio collapses to the lower bound alone
        let num_steps = ((max - min) / step).floor().to_usize().unwrap_or(0);

        Linspace {
            start: min,
            step,
            index: 0,
            len: num_steps + 1,
        }
    }

    /// Spacing of `n` samples over `[min, max]`.
    pub fn step_for(min: F, max: F, n: usize) -> F {
        if n > 1 {
            let num_steps = F::from(n - 1).unwrap_or_else(F::one);
            (max - min) / num_steps
        } else {
            F::zero()
        }
    }
}

impl<F: Float> Iterator for Linspace<F> {
    type Item = F;

    #[inline]
    fn next(&mut self) -> Option<F> {
        if self.index >= self.len {
            None
        } else {
            // Multiply rather than accumulate so later samples don't drift
            let i = F::from(self.index)?;
            self.index += 1;
            Some(self.start + self.step * i)
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl<F: Float> ExactSizeIterator for Linspace<F> {}

#[test]
fn test_linspace() {
    let samples: Vec<f64> = Linspace::new(0., 1., 5).collect();

    assert_eq!(samples, vec![0., 0.25, 0.5, 0.75, 1.]);
    assert_eq!(Linspace::new(3.0f32, 7., 1).collect::<Vec<_>>(), vec![3.]);
    assert_eq!(Linspace::<f64>::new(0., 1., 0).count(), 0);
}

#[test]
fn test_stepped_includes_end_when_divisible() {
    assert_eq!(Linspace::stepped(0., 10., 10.).collect::<Vec<f64>>(), vec![0., 10.]);
    assert_eq!(Linspace::stepped(0., 10., 2.5).collect::<Vec<f64>>(), vec![0., 2.5, 5., 7.5, 10.]);
}

#[test]
fn test_stepped_truncates() {
    // 10 / 3 floors to 3 steps; the walk stops at 9 rather than reaching 10
    assert_eq!(Linspace::stepped(0., 10., 3.).collect::<Vec<f64>>(), vec![0., 3., 6., 9.]);
    // a step wider than the range still visits the lower bound
    assert_eq!(Linspace::stepped(0., 10., 25.).collect::<Vec<f64>>(), vec![0.]);
}

#[test]
fn test_default_resolution_step() {
    let mut samples = Linspace::stepped(0., 10., Linspace::step_for(0., 10., 10));

    assert_eq!(samples.len(), 10);
    assert_eq!(samples.next(), Some(0.));
    assert_eq!(samples.last(), Some(10.));
}
