use num::Float;

use crate::error::Result;
use crate::shape::{Shape, ShapeKind};

/// A linguistic value, e.g. "cold", defined by its membership function.
///
/// Terms start out unset and are given a shape once while the owning
/// variable is configured.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Term<F> {
    shape: Option<Shape<F>>,
}

impl<F: Float> Term<F> {
    pub fn new(shape: Shape<F>) -> Self {
        Term { shape: Some(shape) }
    }

    pub fn unset() -> Self {
        Term { shape: None }
    }

    pub fn set(&mut self, kind: ShapeKind, thresholds: &[F]) -> Result<()> {
        self.shape = Some(Shape::new(kind, thresholds)?);

        Ok(())
    }

    pub fn shape(&self) -> Option<&Shape<F>> {
        self.shape.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.shape.is_some()
    }

    /// Degree of membership of `x`. An unset term never matches.
    pub fn membership(&self, x: F) -> F {
        match &self.shape {
            Some(shape) => shape.membership(x),
            None => F::zero(),
        }
    }
}

impl<F: Float> From<Shape<F>> for Term<F> {
    fn from(shape: Shape<F>) -> Self {
        Term::new(shape)
    }
}

#[test]
fn test_unset_term() {
    let term = Term::<f64>::unset();

    assert!(!term.is_set());
    assert_eq!(term.membership(0.), 0.);
    assert_eq!(term.membership(f64::MAX), 0.);
    assert_eq!(Term::<f32>::default(), Term::unset());
}

#[test]
fn test_set_term() {
    let mut term = Term::unset();

    term.set(ShapeKind::TrapezoidLeft, &[10., 30.]).unwrap();

    assert!(term.is_set());
    assert_eq!(term.shape(), Some(&Shape::TrapezoidLeft(10., 30.)));
    assert_eq!(term.membership(28.), 0.1);
}

#[test]
fn test_failed_set_keeps_previous_shape() {
    let mut term = Term::new(Shape::Singleton(5.));

    assert!(term.set(ShapeKind::TrapezoidCenter, &[1., 2., 3.]).is_err());
    assert_eq!(term.shape(), Some(&Shape::Singleton(5.)));
    assert_eq!(term.membership(5.), 1.);
}
