//! Membership function shapes.
//!
//! Every shape maps a crisp value onto a degree in `[0, 1]`. Boundaries are
//! half-open on the left: at `x == a` a shape returns the value of the branch
//! ending at `a`, never the one starting there.

use num::Float;

use crate::error::{FuzzyError, Result};

/// 1 up to `a`, falling to 0 at `b`.
pub fn trapezoid_left<F: Float>(a: F, b: F, x: F) -> F {
    if x <= a {
        F::one()
    } else if x <= b {
        (b - x) / (b - a)
    } else {
        F::zero()
    }
}

/// 0 up to `a`, rising to 1 at `b`.
pub fn trapezoid_right<F: Float>(a: F, b: F, x: F) -> F {
    if x <= a {
        F::zero()
    } else if x <= b {
        (x - a) / (b - a)
    } else {
        F::one()
    }
}

/// Rises over `(a, b]`, holds 1 over `(b, c]`, falls over `(c, d]`.
pub fn trapezoid_center<F: Float>(a: F, b: F, c: F, d: F, x: F) -> F {
    if x <= a {
        F::zero()
    } else if x <= b {
        (x - a) / (b - a)
    } else if x <= c {
        F::one()
    } else if x <= d {
        (d - x) / (d - c)
    } else {
        F::zero()
    }
}

/// Peaks at 1 on `b`, zero outside `(a, c]`.
pub fn triangular<F: Float>(a: F, b: F, c: F, x: F) -> F {
    if x <= a {
        F::zero()
    } else if x <= b {
        (x - a) / (b - a)
    } else if x <= c {
        (c - x) / (c - b)
    } else {
        F::zero()
    }
}

/// 1 on exactly `a`, 0 everywhere else. No tolerance is applied.
pub fn singleton<F: Float>(a: F, x: F) -> F {
    if x == a {
        F::one()
    } else {
        F::zero()
    }
}

/// Selector for the shape of a term's membership function.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ShapeKind {
    TrapezoidLeft,
    TrapezoidCenter,
    TrapezoidRight,
    Triangular,
    Singleton,
}

impl ShapeKind {
    /// How many thresholds this shape consumes.
    pub fn arity(self) -> usize {
        match self {
            Self::Singleton => 1,
            Self::TrapezoidLeft | Self::TrapezoidRight => 2,
            Self::Triangular => 3,
            Self::TrapezoidCenter => 4,
        }
    }
}

/// A shape together with its thresholds.
///
/// Thresholds are expected to be non-decreasing in the order listed. That is
/// not checked: out of order thresholds still give a well defined, if
/// meaningless, curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape<F> {
    TrapezoidLeft(F, F),
    TrapezoidCenter(F, F, F, F),
    TrapezoidRight(F, F),
    Triangular(F, F, F),
    Singleton(F),
}

impl<F: Float> Shape<F> {
    /// Builds a shape from a kind and exactly [`ShapeKind::arity`] thresholds.
    pub fn new(kind: ShapeKind, thresholds: &[F]) -> Result<Self> {
        let shape = match (kind, thresholds) {
            (ShapeKind::TrapezoidLeft, &[a, b]) => Self::TrapezoidLeft(a, b),
            (ShapeKind::TrapezoidCenter, &[a, b, c, d]) => Self::TrapezoidCenter(a, b, c, d),
            (ShapeKind::TrapezoidRight, &[a, b]) => Self::TrapezoidRight(a, b),
            (ShapeKind::Triangular, &[a, b, c]) => Self::Triangular(a, b, c),
            (ShapeKind::Singleton, &[a]) => Self::Singleton(a),
            _ => {
                return Err(FuzzyError::InvalidParameterCount {
                    kind,
                    expected: kind.arity(),
                    found: thresholds.len(),
                })
            },
        };

        Ok(shape)
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::TrapezoidLeft(..) => ShapeKind::TrapezoidLeft,
            Self::TrapezoidCenter(..) => ShapeKind::TrapezoidCenter,
            Self::TrapezoidRight(..) => ShapeKind::TrapezoidRight,
            Self::Triangular(..) => ShapeKind::Triangular,
            Self::Singleton(..) => ShapeKind::Singleton,
        }
    }

    pub fn membership(&self, x: F) -> F {
        match *self {
            Self::TrapezoidLeft(a, b) => trapezoid_left(a, b, x),
            Self::TrapezoidCenter(a, b, c, d) => trapezoid_center(a, b, c, d, x),
            Self::TrapezoidRight(a, b) => trapezoid_right(a, b, x),
            Self::Triangular(a, b, c) => triangular(a, b, c, x),
            Self::Singleton(a) => singleton(a, x),
        }
    }
}

#[test]
fn test_trapezoid_left() {
    assert_eq!(trapezoid_left(10., 30., -5.), 1.);
    assert_eq!(trapezoid_left(10., 30., 10.), 1.);
    assert_eq!(trapezoid_left(10., 30., 20.), 0.5);
    assert_eq!(trapezoid_left(10., 30., 30.), 0.);
    assert_eq!(trapezoid_left(10., 30., 31.), 0.);
}

#[test]
fn test_trapezoid_right() {
    assert_eq!(trapezoid_right(50., 70., 50.), 0.);
    assert_eq!(trapezoid_right(50., 70., 55.), 0.25);
    assert_eq!(trapezoid_right(50., 70., 70.), 1.);
    assert_eq!(trapezoid_right(50., 70., 1e9), 1.);
}

#[test]
fn test_trapezoid_center() {
    let mu = |x| trapezoid_center(10., 30., 50., 70., x);

    assert_eq!(mu(10.), 0.);
    assert_eq!(mu(28.), 0.9);
    assert_eq!(mu(30.), 1.);
    assert_eq!(mu(50.), 1.);
    assert_eq!(mu(60.), 0.5);
    assert_eq!(mu(70.), 0.);
    assert_eq!(mu(80.), 0.);
}

#[test]
fn test_triangular() {
    assert_eq!(triangular(2.5, 5., 7.5, 2.5), 0.);
    assert_eq!(triangular(2.5, 5., 7.5, 3.75), 0.5);
    assert_eq!(triangular(2.5, 5., 7.5, 5.), 1.);
    assert_eq!(triangular(2.5, 5., 7.5, 6.25), 0.5);
    assert_eq!(triangular(2.5, 5., 7.5, 7.5), 0.);
    assert_eq!(triangular(2.5, 5., 7.5, 9.), 0.);
}

#[test]
fn test_singleton() {
    assert_eq!(singleton(10.0f32, 10.), 1.);
    assert_eq!(singleton(10.0f32, 10.000001), 0.);
    assert_eq!(singleton(0.0f64, -0.0), 1.);
}

#[test]
fn test_shape_parameter_count() {
    assert_eq!(
        Shape::new(ShapeKind::Triangular, &[1., 2.]),
        Err(FuzzyError::InvalidParameterCount {
            kind: ShapeKind::Triangular,
            expected: 3,
            found: 2,
        })
    );
    assert_eq!(
        Shape::new(ShapeKind::Singleton, &[1., 2.]),
        Err(FuzzyError::InvalidParameterCount {
            kind: ShapeKind::Singleton,
            expected: 1,
            found: 2,
        })
    );

    let shape = Shape::new(ShapeKind::TrapezoidCenter, &[0., 1., 2., 3.]).unwrap();

    assert_eq!(shape, Shape::TrapezoidCenter(0., 1., 2., 3.));
    assert_eq!(shape.kind(), ShapeKind::TrapezoidCenter);
    assert_eq!(shape.membership(1.5), 1.);
}
