//! A Mamdani fuzzy inference engine.
//!
//! Crisp inputs are fuzzified through the terms of input variables, combined
//! by conjunctive rules (min), aggregated across rules (max) and turned back
//! into a crisp value with a center of gravity over the sampled output
//! universe.
//!
//! Configuration happens once, on [`Variables`] and [`Rules`]. Handing both to
//! [`InferenceSystem::new`] validates and freezes them; the resulting system
//! is evaluated through `&self` only and can be shared across threads.
//!
//! ```
//! use fuzzy_mamdani::{InferenceSystem, Role, Rules, ShapeKind, Variables};
//!
//! # fn main() -> fuzzy_mamdani::Result<()> {
//! let mut vars = Variables::new();
//! let temp = vars.add(0. ..=100., Role::Input, 2, None)?;
//! let heat = vars.add(0. ..=10., Role::Output, 2, None)?;
//!
//! vars.set_term(temp, 0, ShapeKind::TrapezoidLeft, &[10., 30.])?;
//! vars.set_term(temp, 1, ShapeKind::TrapezoidRight, &[10., 30.])?;
//! vars.set_term(heat, 0, ShapeKind::TrapezoidLeft, &[2.5, 5.])?;
//! vars.set_term(heat, 1, ShapeKind::TrapezoidRight, &[5., 7.5])?;
//!
//! let mut rules = Rules::new();
//!
//! // cold -> heat high, warm -> heat low
//! rules.add(temp.is(0), heat.is(1));
//! rules.add(temp.is(1), heat.is(0));
//!
//! let system = InferenceSystem::new(vars, rules, &[temp], &[heat])?;
//! let power = system.defuzzify(&[5.], 0)?;
//!
//! assert!(power > 5.);
//! # Ok(())
//! # }
//! ```

mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
pub mod ops;
mod outputs;
mod rules;
pub mod shape;
mod terms;
mod variable;

pub use dsl::{Conjunction, Proposition};
pub use error::{FuzzyError, Result};
pub use inference::InferenceSystem;
pub use inputs::Inputs;
pub use linspace::Linspace;
pub use outputs::Outputs;
pub use rules::{Rule, Rules};
pub use shape::{Shape, ShapeKind};
pub use terms::Term;
pub use variable::{Role, Universe, Variable, VariableKey, Variables, DEFAULT_RESOLUTION};
