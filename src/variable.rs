use std::ops::{Index, RangeInclusive};

use num::Float;
use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::error::{FuzzyError, Result};
use crate::linspace::Linspace;
use crate::shape::ShapeKind;
use crate::terms::Term;

/// Number of samples a universe is split into unless told otherwise.
pub const DEFAULT_RESOLUTION: usize = 10;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Whether a variable is measured (premise side) or inferred (consequence side).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Role {
    Input,
    Output,
}

/// Universe of discourse: the bounds of a variable and the step used to
/// sample it during defuzzification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Universe<F> {
    low: F,
    high: F,
    interval: F,
}

impl<F: Float> Universe<F> {
    /// `[low, high]` sampled at [`DEFAULT_RESOLUTION`] points.
    pub fn new(low: F, high: F) -> Result<Self> {
        Self::with_resolution(low, high, DEFAULT_RESOLUTION)
    }

    /// `[low, high]` sampled at `n` evenly spaced points, both ends included.
    pub fn with_resolution(low: F, high: F, n: usize) -> Result<Self> {
        Self::with_interval(low, high, Linspace::step_for(low, high, n))
    }

    /// `[low, high]` walked in steps of `interval`.
    ///
    /// Singleton outputs usually need this: a coarse default step can skip
    /// the exact point a singleton sits on.
    pub fn with_interval(low: F, high: F, interval: F) -> Result<Self> {
        let valid = low.is_finite()
            && high.is_finite()
            && low < high
            && interval.is_finite()
            && interval > F::zero();

        if !valid {
            return Err(FuzzyError::InvalidDomain {
                low: low.to_f64().unwrap_or(f64::NAN),
                high: high.to_f64().unwrap_or(f64::NAN),
                interval: interval.to_f64().unwrap_or(f64::NAN),
            });
        }

        Ok(Universe { low, high, interval })
    }

    pub fn low(&self) -> F {
        self.low
    }

    pub fn high(&self) -> F {
        self.high
    }

    pub fn interval(&self) -> F {
        self.interval
    }

    /// The points visited when defuzzifying over this universe.
    pub fn samples(&self) -> Linspace<F> {
        Linspace::stepped(self.low, self.high, self.interval)
    }
}

/// A linguistic variable, e.g. "temperature": an ordered list of terms over
/// one universe of discourse.
///
/// A term's position is its id; rules refer to terms by that index.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable<F> {
    terms: Vec<Term<F>>,
    universe: Universe<F>,
    role: Role,
}

impl<F: Float> Variable<F> {
    /// A variable with `n_terms` unset terms.
    pub fn new(universe: Universe<F>, role: Role, n_terms: usize) -> Self {
        Variable {
            terms: vec![Term::unset(); n_terms],
            universe,
            role,
        }
    }

    pub fn set_term(&mut self, index: usize, kind: ShapeKind, thresholds: &[F]) -> Result<()> {
        let len = self.terms.len();
        let term = self
            .terms
            .get_mut(index)
            .ok_or_else(|| FuzzyError::out_of_range("term", index, len))?;

        term.set(kind, thresholds)
    }

    pub fn set_universe(&mut self, universe: Universe<F>) {
        self.universe = universe;
    }

    pub fn term(&self, index: usize) -> Result<&Term<F>> {
        self.terms
            .get(index)
            .ok_or_else(|| FuzzyError::out_of_range("term", index, self.terms.len()))
    }

    pub fn terms(&self) -> &[Term<F>] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn universe(&self) -> &Universe<F> {
        &self.universe
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Degree to which `x` belongs to the term at `index`.
    pub fn membership(&self, index: usize, x: F) -> Result<F> {
        Ok(self.term(index)?.membership(x))
    }
}

/// Arena owning every variable of a fuzzy system.
#[derive(Clone, Debug, Default)]
pub struct Variables<F>(pub(crate) SlotMap<VariableKey, Variable<F>>);

impl<F: Float> Variables<F> {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    /// Adds a variable with `n_terms` unset terms over `universe_range`.
    ///
    /// If the interval is not provided the universe is sampled at
    /// [`DEFAULT_RESOLUTION`] points.
    pub fn add(
        &mut self,
        universe_range: RangeInclusive<F>,
        role: Role,
        n_terms: usize,
        interval: Option<F>,
    ) -> Result<VariableKey> {
        let (low, high) = universe_range.into_inner();
        let universe = match interval {
            Some(interval) => Universe::with_interval(low, high, interval)?,
            None => Universe::new(low, high)?,
        };
        let key = self.0.insert(Variable::new(universe, role, n_terms));

        debug!(?key, ?role, n_terms, "added variable");

        Ok(key)
    }

    /// Replaces the universe of an existing variable.
    pub fn set_domain(&mut self, key: VariableKey, low: F, high: F, interval: F) -> Result<()> {
        let universe = Universe::with_interval(low, high, interval)?;

        self.get_mut(key)?.set_universe(universe);
        debug!(?key, "overrode universe of discourse");

        Ok(())
    }

    /// Gives the term at `index` of variable `key` its membership function.
    pub fn set_term(&mut self, key: VariableKey, index: usize, kind: ShapeKind, thresholds: &[F]) -> Result<()> {
        self.get_mut(key)?.set_term(index, kind, thresholds)
    }

    pub fn get(&self, key: VariableKey) -> Result<&Variable<F>> {
        self.0.get(key).ok_or(FuzzyError::UnknownVariable)
    }

    fn get_mut(&mut self, key: VariableKey) -> Result<&mut Variable<F>> {
        self.0.get_mut(key).ok_or(FuzzyError::UnknownVariable)
    }

    pub fn membership(&self, key: VariableKey, index: usize, x: F) -> Result<F> {
        self.get(key)?.membership(index, x)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F> Index<VariableKey> for Variables<F> {
    type Output = Variable<F>;

    fn index(&self, key: VariableKey) -> &Variable<F> {
        &self.0[key]
    }
}

#[test]
fn test_default_interval() {
    let universe = Universe::new(0., 10.).unwrap();

    assert_eq!(universe.interval(), 10. / 9.);
    assert_eq!(universe.samples().len(), DEFAULT_RESOLUTION);
    assert_eq!(Universe::with_resolution(0., 255., 2).unwrap().interval(), 255.);
}

#[test]
fn test_invalid_universe() {
    assert!(matches!(
        Universe::with_interval(0., 10., 0.),
        Err(FuzzyError::InvalidDomain { interval, .. }) if interval == 0.
    ));
    assert!(Universe::with_interval(0., 10., -1.).is_err());
    assert!(Universe::with_interval(10., 0., 1.).is_err());
    assert!(Universe::with_interval(5., 5., 1.).is_err());
    assert!(Universe::with_interval(0., f64::INFINITY, 1.).is_err());
    assert!(Universe::with_interval(0., 10., f64::NAN).is_err());
    assert!(Universe::<f64>::with_resolution(0., 10., 1).is_err());
}

#[test]
fn test_two_point_universe() {
    let universe = Universe::with_interval(0.0f32, 10., 10.).unwrap();

    assert_eq!(universe.samples().collect::<Vec<_>>(), vec![0., 10.]);
}

#[test]
fn test_set_term_out_of_range() {
    let mut vars = Variables::new();
    let temp = vars.add(0. ..=100., Role::Input, 3, None).unwrap();

    assert_eq!(
        vars.set_term(temp, 3, ShapeKind::TrapezoidRight, &[50., 70.]),
        Err(FuzzyError::IndexOutOfRange {
            what: "term",
            index: 3,
            len: 3,
        })
    );
    assert_eq!(
        vars.membership(temp, 7, 20.),
        Err(FuzzyError::IndexOutOfRange {
            what: "term",
            index: 7,
            len: 3,
        })
    );
}

#[test]
fn test_variable_membership() {
    let mut vars = Variables::new();
    let hum = vars.add(0. ..=100., Role::Input, 2, None).unwrap();

    vars.set_term(hum, 0, ShapeKind::TrapezoidLeft, &[30., 60.]).unwrap();
    vars.set_term(hum, 1, ShapeKind::TrapezoidRight, &[30., 60.]).unwrap();

    assert_eq!(vars.len(), 1);
    assert_eq!(vars[hum].len(), 2);
    assert_eq!(vars[hum].role(), Role::Input);
    assert_eq!(vars.membership(hum, 0, 45.), Ok(0.5));
    assert_eq!(vars.membership(hum, 1, 45.), Ok(0.5));
    assert_eq!(vars.membership(hum, 1, 90.), Ok(1.));
}

#[test]
fn test_set_domain() {
    let mut vars = Variables::<f32>::new();
    let prop = vars.add(0. ..=10., Role::Output, 2, None).unwrap();

    assert_eq!(vars[prop].universe().samples().len(), 10);

    vars.set_domain(prop, 0., 10., 10.).unwrap();

    assert_eq!(vars[prop].universe().samples().collect::<Vec<_>>(), vec![0., 10.]);
    assert!(vars.set_domain(prop, 0., 10., 0.).is_err());
    // a rejected override leaves the previous universe in place
    assert_eq!(vars[prop].universe().interval(), 10.);
}

#[test]
fn test_unknown_variable() {
    let mut vars = Variables::<f64>::new();
    let mut other = Variables::<f64>::new();
    let foreign = other.add(0. ..=1., Role::Input, 1, None).unwrap();

    assert_eq!(vars.get(foreign).err(), Some(FuzzyError::UnknownVariable));
    assert_eq!(
        vars.set_term(foreign, 0, ShapeKind::Singleton, &[0.5]),
        Err(FuzzyError::UnknownVariable)
    );
}
