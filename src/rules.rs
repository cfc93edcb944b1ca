use num::Float;

use crate::dsl::{Conjunction, Proposition};
use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::ops::{and, implication};
use crate::variable::{VariableKey, Variables};

#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    pub fn add(&mut self, premise: impl Into<Conjunction>, consequence: impl Into<Conjunction>) {
        self.0.push(Rule::new(premise, consequence));
    }

    pub fn push(&mut self, rule: Rule) {
        self.0.push(rule);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Rule> for Rules {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Rules(iter.into_iter().collect())
    }
}

/// IF `premise` THEN `consequence`, both conjunctive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rule {
    pub(crate) premise: Conjunction,
    pub(crate) consequence: Conjunction,
}

impl Rule {
    pub fn new(premise: impl Into<Conjunction>, consequence: impl Into<Conjunction>) -> Self {
        Rule {
            premise: premise.into(),
            consequence: consequence.into(),
        }
    }

    /// Builds a rule from a row of a rule table: one term index per premise
    /// variable and one per consequence variable.
    pub fn from_table(
        premise_vars: &[VariableKey],
        premise_terms: &[usize],
        consequence_vars: &[VariableKey],
        consequence_terms: &[usize],
    ) -> Result<Self> {
        fn zip(vars: &[VariableKey], terms: &[usize]) -> Result<Conjunction> {
            if vars.len() != terms.len() {
                return Err(FuzzyError::LengthMismatch {
                    expected: vars.len(),
                    found: terms.len(),
                });
            }

            Ok(vars.iter().zip(terms).map(|(&var, &term)| Proposition::new(var, term)).collect())
        }

        Ok(Rule {
            premise: zip(premise_vars, premise_terms)?,
            consequence: zip(consequence_vars, consequence_terms)?,
        })
    }

    pub fn premise(&self) -> &Conjunction {
        &self.premise
    }

    pub fn consequence(&self) -> &Conjunction {
        &self.consequence
    }

    /// Degree to which the premise holds for `inputs`. Each proposition is
    /// matched against the reading of its own variable.
    pub fn premise_degree<F: Float>(&self, vars: &Variables<F>, inputs: &Inputs<'_, F>) -> Result<F> {
        self.premise.propositions().iter().try_fold(F::one(), |alpha, prop| -> Result<F> {
            let x = inputs.get(prop.variable)?;

            Ok(and(alpha, vars.membership(prop.variable, prop.term, x)?))
        })
    }

    /// The proposition feeding output `slot`.
    pub fn consequence_at(&self, slot: usize) -> Result<&Proposition> {
        let consequence = self.consequence.propositions();

        consequence
            .get(slot)
            .ok_or_else(|| FuzzyError::out_of_range("output slot", slot, consequence.len()))
    }

    /// Firing strength of this rule at the candidate output value `output`
    /// for output `slot`: the premise degree clipped by how well `output`
    /// matches the consequent term.
    pub fn fire<F: Float>(&self, vars: &Variables<F>, inputs: &Inputs<'_, F>, output: F, slot: usize) -> Result<F> {
        let alpha = self.premise_degree(vars, inputs)?;
        let prop = self.consequence_at(slot)?;
        let degree = vars.membership(prop.variable, prop.term, output)?;

        Ok(implication(alpha, degree))
    }
}

#[cfg(test)]
fn heater_vars() -> (Variables<f64>, [VariableKey; 3]) {
    use crate::shape::ShapeKind::*;
    use crate::variable::Role;

    let mut vars = Variables::new();
    let temp = vars.add(0. ..=100., Role::Input, 3, None).unwrap();
    let hum = vars.add(0. ..=100., Role::Input, 2, None).unwrap();
    let heat = vars.add(0. ..=10., Role::Output, 3, None).unwrap();

    vars.set_term(temp, 0, TrapezoidLeft, &[10., 30.]).unwrap();
    vars.set_term(temp, 1, TrapezoidCenter, &[10., 30., 50., 70.]).unwrap();
    vars.set_term(temp, 2, TrapezoidRight, &[50., 70.]).unwrap();
    vars.set_term(hum, 0, TrapezoidLeft, &[30., 60.]).unwrap();
    vars.set_term(hum, 1, TrapezoidRight, &[30., 60.]).unwrap();
    vars.set_term(heat, 0, TrapezoidLeft, &[2.5, 5.]).unwrap();
    vars.set_term(heat, 1, Triangular, &[2.5, 5., 7.5]).unwrap();
    vars.set_term(heat, 2, TrapezoidRight, &[5., 7.5]).unwrap();

    (vars, [temp, hum, heat])
}

#[test]
fn test_premise_degree_is_min() {
    let (vars, [temp, hum, heat]) = heater_vars();
    let rule = Rule::new(temp.is(1).and(hum.is(0)), heat.is(1));
    let declared = [temp, hum];
    let degree = |readings: &[f64]| rule.premise_degree(&vars, &Inputs::new(&declared, readings).unwrap());

    // cool(28) = 0.9, dry(45) = 0.5
    assert_eq!(degree(&[28., 45.]), Ok(0.5));
    // cool(20) = 0.5, dry(30) = 1
    assert_eq!(degree(&[20., 30.]), Ok(0.5));
    assert_eq!(degree(&[90., 30.]), Ok(0.));
}

#[test]
fn test_premise_matches_by_variable() {
    let (vars, [temp, hum, heat]) = heater_vars();
    let declared = [temp, hum];
    let inputs = Inputs::new(&declared, &[28., 45.]).unwrap();
    let canonical = Rule::new(temp.is(1).and(hum.is(0)), heat.is(1));
    let reordered = Rule::new(hum.is(0).and(temp.is(1)), heat.is(1));

    assert_eq!(reordered.premise_degree(&vars, &inputs), canonical.premise_degree(&vars, &inputs));
    // humidity alone: dry(45) = 0.5, whatever the temperature reads
    assert_eq!(Rule::new(hum.is(0), heat.is(1)).premise_degree(&vars, &inputs), Ok(0.5));
    assert_eq!(Rule::new(temp.is(1), heat.is(1)).premise_degree(&vars, &inputs), Ok(0.9));
    // temperature read against the same variable twice
    assert_eq!(
        Rule::new(temp.is(0).and(temp.is(1)), heat.is(1)).premise_degree(&vars, &inputs),
        Ok(0.1)
    );
}

#[test]
fn test_empty_premise_holds() {
    let (vars, [_, _, heat]) = heater_vars();
    let rule = Rule::new(Conjunction::new(), heat.is(2));
    let inputs = Inputs::new(&[], &[]).unwrap();

    assert_eq!(rule.premise_degree(&vars, &inputs), Ok(1.));
    assert_eq!(rule.fire(&vars, &inputs, 10., 0), Ok(1.));
    assert_eq!(rule.fire(&vars, &inputs, 6.25, 0), Ok(0.5));
}

#[test]
fn test_fire_clips_consequence() {
    let (vars, [temp, hum, heat]) = heater_vars();
    let rule = Rule::new(temp.is(1).and(hum.is(0)), heat.is(1));
    let declared = [temp, hum];
    let inputs = Inputs::new(&declared, &[20., 30.]).unwrap();

    // premise 0.5 caps the triangle's peak
    assert_eq!(rule.fire(&vars, &inputs, 5., 0), Ok(0.5));
    // below the cap the consequence decides
    assert_eq!(rule.fire(&vars, &inputs, 3.125, 0), Ok(0.25));
    assert_eq!(rule.fire(&vars, &inputs, 9., 0), Ok(0.));
}

#[test]
fn test_fire_bad_indices() {
    let (vars, [temp, hum, heat]) = heater_vars();
    let rule = Rule::new(temp.is(1).and(hum.is(0)), heat.is(1));
    let only_temp = [temp];
    let declared = [temp, hum];
    let inputs = Inputs::new(&declared, &[20., 30.]).unwrap();

    assert_eq!(
        rule.fire(&vars, &Inputs::new(&only_temp, &[20.]).unwrap(), 5., 0),
        Err(FuzzyError::UndeclaredInput)
    );
    assert_eq!(
        rule.fire(&vars, &inputs, 5., 1),
        Err(FuzzyError::IndexOutOfRange {
            what: "output slot",
            index: 1,
            len: 1,
        })
    );

    let rule = Rule::new(temp.is(3).and(hum.is(0)), heat.is(1));

    assert_eq!(
        rule.fire(&vars, &inputs, 5., 0),
        Err(FuzzyError::IndexOutOfRange {
            what: "term",
            index: 3,
            len: 3,
        })
    );
}

#[test]
fn test_from_table() {
    let (_, [temp, hum, heat]) = heater_vars();
    let rule = Rule::from_table(&[temp, hum], &[2, 1], &[heat], &[0]).unwrap();

    assert_eq!(rule, Rule::new(temp.is(2).and(hum.is(1)), heat.is(0)));
    assert_eq!(
        Rule::from_table(&[temp, hum], &[2], &[heat], &[0]),
        Err(FuzzyError::LengthMismatch { expected: 2, found: 1 })
    );
    assert_eq!(
        Rule::from_table(&[temp, hum], &[2, 1], &[heat], &[0, 1]),
        Err(FuzzyError::LengthMismatch { expected: 1, found: 2 })
    );
}

#[test]
fn test_rules_collection() {
    let (_, [temp, hum, heat]) = heater_vars();
    let mut rules = Rules::with_capacity(2);

    rules.add(temp.is(0).and(hum.is(0)), heat.is(1));
    rules.push(Rule::from_table(&[temp, hum], &[0, 1], &[heat], &[2]).unwrap());

    assert_eq!(rules.len(), 2);
    assert_eq!(
        rules.iter().map(|rule| rule.consequence_at(0).unwrap().term).collect::<Vec<_>>(),
        vec![1, 2]
    );
}
