use num::Float;
use tracing::{debug, trace};

use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::ops::{or, Centroid};
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::variable::{Role, Universe, VariableKey, Variables};

/// A frozen Mamdani rule base.
///
/// Built once from fully configured variables and rules, then evaluated any
/// number of times through `&self`. Nothing is mutated during evaluation, so
/// a system can be shared between threads without locking.
#[derive(Clone, Debug)]
pub struct InferenceSystem<F> {
    variables: Variables<F>,
    rules: Rules,
    inputs: Vec<VariableKey>,
    outputs: Vec<VariableKey>,
}

impl<F: Float> InferenceSystem<F> {
    /// Validates and freezes a rule base.
    ///
    /// `inputs` lists the input variables in the order their crisp readings
    /// are passed to evaluation. `outputs` lists the output variable of each
    /// slot in order. Every rule must conclude on exactly these outputs in
    /// this order. A premise may name any subset of the inputs, in any order.
    pub fn new(
        variables: Variables<F>,
        rules: Rules,
        inputs: &[VariableKey],
        outputs: &[VariableKey],
    ) -> Result<Self> {
        for &key in inputs {
            expect_role(&variables, key, Role::Input)?;
        }

        for &key in outputs {
            expect_role(&variables, key, Role::Output)?;
        }

        for (i, rule) in rules.iter().enumerate() {
            for prop in rule.premise().propositions() {
                expect_role(&variables, prop.variable, Role::Input)?;

                if !inputs.contains(&prop.variable) {
                    debug!(rule = i, "premise names an undeclared input");
                    return Err(FuzzyError::UndeclaredInput);
                }

                variables.get(prop.variable)?.term(prop.term)?;
            }

            let consequence = rule.consequence().propositions();

            if consequence.len() != outputs.len() {
                return Err(FuzzyError::LengthMismatch {
                    expected: outputs.len(),
                    found: consequence.len(),
                });
            }

            for (slot, (prop, &output)) in consequence.iter().zip(outputs).enumerate() {
                if prop.variable != output {
                    return Err(FuzzyError::InconsistentConsequence { rule: i, slot });
                }

                variables.get(prop.variable)?.term(prop.term)?;
            }
        }

        debug!(
            n_variables = variables.len(),
            n_rules = rules.len(),
            n_inputs = inputs.len(),
            n_outputs = outputs.len(),
            "built inference system"
        );

        Ok(Self {
            variables,
            rules,
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
        })
    }

    pub fn variables(&self) -> &Variables<F> {
        &self.variables
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Input variables, in the order readings are passed in.
    pub fn inputs(&self) -> &[VariableKey] {
        &self.inputs
    }

    /// Output variables, indexed by slot.
    pub fn outputs(&self) -> &[VariableKey] {
        &self.outputs
    }

    /// Universe of discourse of the output variable at `slot`.
    pub fn output_domain(&self, slot: usize) -> Result<&Universe<F>> {
        let key = self
            .outputs
            .get(slot)
            .ok_or_else(|| FuzzyError::out_of_range("output slot", slot, self.outputs.len()))?;

        Ok(self.variables.get(*key)?.universe())
    }

    /// Membership of the candidate value `output` in the aggregated fuzzy
    /// output of `slot`: the strongest firing over all rules, 0 for an empty
    /// rule base. `inputs` holds one reading per declared input variable.
    pub fn aggregate(&self, inputs: &[F], output: F, slot: usize) -> Result<F> {
        if slot >= self.outputs.len() {
            return Err(FuzzyError::out_of_range("output slot", slot, self.outputs.len()));
        }

        self.aggregate_readings(&Inputs::new(&self.inputs, inputs)?, output, slot)
    }

    fn aggregate_readings(&self, inputs: &Inputs<'_, F>, output: F, slot: usize) -> Result<F> {
        self.rules.iter().try_fold(F::zero(), |strongest, rule| -> Result<F> {
            Ok(or(strongest, rule.fire(&self.variables, inputs, output, slot)?))
        })
    }

    /// Crisp value of output `slot` by discretized center of gravity.
    ///
    /// The output universe is walked from its low bound in steps of its
    /// interval. If nothing fires anywhere on the walk the result is 0.
    pub fn defuzzify(&self, inputs: &[F], slot: usize) -> Result<F> {
        let universe = self.output_domain(slot)?;
        let inputs = Inputs::new(&self.inputs, inputs)?;
        let mut centroid = Centroid::new();
        let mut n_samples = 0usize;

        for y in universe.samples() {
            centroid.add(y, self.aggregate_readings(&inputs, y, slot)?);
            n_samples += 1;
        }

        let crisp = centroid.value();

        if centroid.weight() == F::zero() {
            debug!(slot, n_samples, "no rule fired over the output universe, defaulting to 0");
        }

        trace!(
            slot,
            n_samples,
            weight = ?centroid.weight().to_f64(),
            crisp = ?crisp.to_f64(),
            "defuzzified"
        );

        Ok(crisp)
    }

    /// Defuzzifies every output slot in order.
    pub fn eval(&self, inputs: &[F]) -> Result<Outputs<F>> {
        let crisp = (0..self.outputs.len())
            .map(|slot| self.defuzzify(inputs, slot))
            .collect::<Result<Vec<_>>>()?;

        Ok(Outputs::new(crisp))
    }
}

fn expect_role<F: Float>(variables: &Variables<F>, key: VariableKey, expected: Role) -> Result<()> {
    let found = variables.get(key)?.role();

    if found != expected {
        return Err(FuzzyError::RoleMismatch { expected, found });
    }

    Ok(())
}

#[cfg(test)]
mod scenarios {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::dsl::Conjunction;
    use crate::rules::Rule;
    use crate::shape::ShapeKind::*;

    const COLD: usize = 0;
    const COOL: usize = 1;
    const HOT: usize = 2;
    const DRY: usize = 0;
    const WET: usize = 1;
    const LOW: usize = 0;
    const MED: usize = 1;
    const HIGH: usize = 2;

    fn heater_variables() -> (Variables<f64>, [VariableKey; 3]) {
        let mut vars = Variables::new();
        let temp = vars.add(0. ..=100., Role::Input, 3, None).unwrap();
        let hum = vars.add(0. ..=100., Role::Input, 2, None).unwrap();
        let heat = vars.add(0. ..=10., Role::Output, 3, None).unwrap();

        vars.set_term(temp, COLD, TrapezoidLeft, &[10., 30.]).unwrap();
        vars.set_term(temp, COOL, TrapezoidCenter, &[10., 30., 50., 70.]).unwrap();
        vars.set_term(temp, HOT, TrapezoidRight, &[50., 70.]).unwrap();
        vars.set_term(hum, DRY, TrapezoidLeft, &[30., 60.]).unwrap();
        vars.set_term(hum, WET, TrapezoidRight, &[30., 60.]).unwrap();
        vars.set_term(heat, LOW, TrapezoidLeft, &[2.5, 5.]).unwrap();
        vars.set_term(heat, MED, Triangular, &[2.5, 5., 7.5]).unwrap();
        vars.set_term(heat, HIGH, TrapezoidRight, &[5., 7.5]).unwrap();

        (vars, [temp, hum, heat])
    }

    fn heater() -> InferenceSystem<f64> {
        let (vars, [temp, hum, heat]) = heater_variables();
        let mut rules = Rules::with_capacity(6);

        rules.add(temp.is(COLD).and(hum.is(DRY)), heat.is(MED));
        rules.add(temp.is(COLD).and(hum.is(WET)), heat.is(HIGH));
        rules.add(temp.is(COOL).and(hum.is(DRY)), heat.is(MED));
        rules.add(temp.is(COOL).and(hum.is(WET)), heat.is(HIGH));
        rules.add(temp.is(HOT).and(hum.is(DRY)), heat.is(LOW));
        rules.add(temp.is(HOT).and(hum.is(WET)), heat.is(LOW));

        InferenceSystem::new(vars, rules, &[temp, hum], &[heat]).unwrap()
    }

    // Two joystick axes driving two propellers with on/off singleton outputs
    fn propellers() -> InferenceSystem<f32> {
        const TABLE: [([usize; 2], [usize; 2]); 9] = [
            ([0, 0], [0, 0]),
            ([1, 0], [0, 0]),
            ([2, 0], [0, 0]),
            ([0, 1], [0, 1]),
            ([1, 1], [0, 0]),
            ([2, 1], [1, 0]),
            ([0, 2], [0, 1]),
            ([1, 2], [1, 1]),
            ([2, 2], [1, 0]),
        ];

        let mut vars = Variables::new();
        let x = vars.add(0. ..=255., Role::Input, 3, None).unwrap();
        let y = vars.add(0. ..=255., Role::Input, 3, None).unwrap();
        let left = vars.add(0. ..=10., Role::Output, 2, Some(10.)).unwrap();
        let right = vars.add(0. ..=10., Role::Output, 2, None).unwrap();

        vars.set_domain(right, 0., 10., 10.).unwrap();

        for axis in [x, y] {
            vars.set_term(axis, 0, TrapezoidLeft, &[0., 112.]).unwrap();
            vars.set_term(axis, 1, TrapezoidCenter, &[0., 112., 144., 255.]).unwrap();
            vars.set_term(axis, 2, TrapezoidRight, &[144., 255.]).unwrap();
        }

        for prop in [left, right] {
            vars.set_term(prop, 0, Singleton, &[0.]).unwrap();
            vars.set_term(prop, 1, Singleton, &[10.]).unwrap();
        }

        let rules = TABLE
            .iter()
            .map(|(premise, consequence)| Rule::from_table(&[x, y], premise, &[left, right], consequence))
            .collect::<Result<Rules>>()
            .unwrap();

        InferenceSystem::new(vars, rules, &[x, y], &[left, right]).unwrap()
    }

    #[test]
    fn test_heater() {
        let system = heater();

        assert_abs_diff_eq!(system.defuzzify(&[28., 39.2], 0).unwrap(), 6.203288490284008, epsilon = 1e-12);
        assert_abs_diff_eq!(system.defuzzify(&[90., 90.], 0).unwrap(), 1.6825396825396826, epsilon = 1e-12);
        // cold and dry fire fully and only MED fires: the symmetric triangle's peak
        assert_abs_diff_eq!(system.defuzzify(&[0., 0.], 0).unwrap(), 5., epsilon = 1e-12);
    }

    #[test]
    fn test_single_rule_dominates() {
        let (vars, [temp, hum, heat]) = heater_variables();
        let mut rules = Rules::new();

        rules.add(temp.is(COLD).and(hum.is(DRY)), heat.is(MED));
        rules.add(temp.is(HOT).and(hum.is(WET)), heat.is(HIGH));
        rules.add(temp.is(HOT).and(hum.is(DRY)), heat.is(LOW));

        let system = InferenceSystem::new(vars, rules, &[temp, hum], &[heat]).unwrap();
        let interval = system.output_domain(0).unwrap().interval();

        assert_abs_diff_eq!(system.defuzzify(&[5., 10.], 0).unwrap(), 5., epsilon = interval);
    }

    #[test]
    fn test_nothing_fires() {
        let (vars, [temp, hum, heat]) = heater_variables();
        let mut rules = Rules::new();

        rules.add(temp.is(HOT).and(hum.is(WET)), heat.is(HIGH));
        rules.add(temp.is(HOT).and(hum.is(DRY)), heat.is(LOW));

        let system = InferenceSystem::new(vars, rules, &[temp, hum], &[heat]).unwrap();
        let crisp = system.defuzzify(&[20., 50.], 0).unwrap();

        assert_eq!(crisp, 0.);
        assert!(crisp.is_finite());
    }

    #[test]
    fn test_coarse_universe_skips_singleton() {
        let mut vars = Variables::new();
        let level = vars.add(0. ..=1., Role::Input, 1, None).unwrap();
        let valve = vars.add(0. ..=10., Role::Output, 1, None).unwrap();

        vars.set_term(level, 0, TrapezoidRight, &[0., 0.5]).unwrap();
        vars.set_term(valve, 0, Singleton, &[5.]).unwrap();

        let mut rules = Rules::new();

        rules.add(level.is(0), valve.is(0));

        let system = InferenceSystem::new(vars.clone(), rules.clone(), &[level], &[valve]).unwrap();

        // 10 samples over [0, 10] never land on 5
        assert_eq!(system.defuzzify(&[1.], 0), Ok(0.));

        vars.set_domain(valve, 0., 10., 2.5).unwrap();

        let system = InferenceSystem::new(vars, rules, &[level], &[valve]).unwrap();

        assert_eq!(system.defuzzify(&[1.], 0), Ok(5.));
    }

    #[test]
    fn test_two_point_domain() {
        let system = propellers();
        let domain = system.output_domain(0).unwrap();

        assert_eq!(domain.samples().collect::<Vec<_>>(), vec![0., 10.]);
        // full right stick: left propeller on, right propeller off
        assert_eq!(system.eval(&[255., 128.]).unwrap().as_slice(), &[10., 0.]);
    }

    #[test]
    fn test_propellers() {
        let system = propellers();
        let forward = system.eval(&[128., 200.]).unwrap();
        let turn = system.eval(&[200., 128.]).unwrap();

        assert_eq!(forward.len(), 2);
        assert_abs_diff_eq!(forward[0], 5.045045, epsilon = 1e-4);
        assert_abs_diff_eq!(forward[1], 5.045045, epsilon = 1e-4);
        assert_abs_diff_eq!(turn[0], 5.045045, epsilon = 1e-4);
        assert_eq!(turn.get(1), Some(0.));
        assert_eq!(system.eval(&[255., 255.]).unwrap().into_vec(), vec![10., 0.]);
        assert_eq!(system.eval(&[128., 128.]).unwrap().into_vec(), vec![0., 0.]);
    }

    fn single_rule(premise: impl Into<Conjunction>) -> InferenceSystem<f64> {
        let (vars, [temp, hum, heat]) = heater_variables();
        let mut rules = Rules::new();

        rules.add(premise, heat.is(HIGH));

        InferenceSystem::new(vars, rules, &[temp, hum], &[heat]).unwrap()
    }

    #[test]
    fn test_premise_order_is_irrelevant() {
        let (_, [temp, hum, _]) = heater_variables();
        let canonical = single_rule(temp.is(COLD).and(hum.is(WET)));
        let reordered = single_rule(hum.is(WET).and(temp.is(COLD)));

        // cold and wet: HIGH clipped at 1
        assert_abs_diff_eq!(canonical.defuzzify(&[0., 100.], 0).unwrap(), 8.317460317460318, epsilon = 1e-12);

        for inputs in [[0., 100.], [28., 39.2], [15., 55.], [90., 90.]] {
            assert_eq!(reordered.defuzzify(&inputs, 0), canonical.defuzzify(&inputs, 0));
        }
    }

    #[test]
    fn test_partial_premise_reads_its_own_input() {
        let (_, [temp, hum, _]) = heater_variables();
        let wet = single_rule(hum.is(WET));
        let cold = single_rule(temp.is(COLD));

        assert_abs_diff_eq!(wet.defuzzify(&[0., 100.], 0).unwrap(), 8.317460317460318, epsilon = 1e-12);
        // hot but wet still fires on humidity alone
        assert_eq!(wet.defuzzify(&[90., 100.], 0), wet.defuzzify(&[0., 100.], 0));
        // dry: nothing fires
        assert_eq!(wet.defuzzify(&[0., 0.], 0), Ok(0.));
        assert_eq!(cold.defuzzify(&[0., 0.], 0), wet.defuzzify(&[0., 100.], 0));
        assert_eq!(cold.defuzzify(&[90., 100.], 0), Ok(0.));
    }

    #[test]
    fn test_mixed_rule_base_matches_canonical() {
        let (vars, [temp, hum, heat]) = heater_variables();
        let mut rules = Rules::with_capacity(6);

        rules.add(hum.is(DRY).and(temp.is(COLD)), heat.is(MED));
        rules.add(temp.is(COLD).and(hum.is(WET)), heat.is(HIGH));
        rules.add(hum.is(DRY).and(temp.is(COOL)), heat.is(MED));
        rules.add(temp.is(COOL).and(hum.is(WET)), heat.is(HIGH));
        rules.push(Rule::from_table(&[hum, temp], &[DRY, HOT], &[heat], &[LOW]).unwrap());
        rules.add(hum.is(WET).and(temp.is(HOT)), heat.is(LOW));

        let mixed = InferenceSystem::new(vars, rules, &[temp, hum], &[heat]).unwrap();
        let canonical = heater();

        for inputs in [[28., 39.2], [90., 90.], [0., 0.], [0., 100.], [33.3, 47.1], [65., 20.]] {
            assert_eq!(mixed.eval(&inputs), canonical.eval(&inputs));
        }
    }

    #[test]
    fn test_rejects_undeclared_input() {
        let (vars, [temp, hum, heat]) = heater_variables();
        let mut rules = Rules::new();

        rules.add(temp.is(COLD).and(hum.is(WET)), heat.is(HIGH));

        assert_eq!(
            InferenceSystem::new(vars.clone(), rules, &[temp], &[heat]).err(),
            Some(FuzzyError::UndeclaredInput)
        );
        assert_eq!(
            InferenceSystem::new(vars, Rules::new(), &[temp, heat], &[heat]).err(),
            Some(FuzzyError::RoleMismatch {
                expected: Role::Input,
                found: Role::Output,
            })
        );
    }

    #[test]
    fn test_aggregate_is_strongest_rule() {
        let system = heater();
        let inputs = [28., 39.2];
        let readings = Inputs::new(system.inputs(), &inputs).unwrap();

        for y in [0., 2.5, 4., 5., 6.5, 9.] {
            let strongest = system
                .rules()
                .iter()
                .map(|rule| rule.fire(system.variables(), &readings, y, 0).unwrap())
                .fold(0., f64::max);

            assert_eq!(system.aggregate(&inputs, y, 0), Ok(strongest));
        }
    }

    #[test]
    fn test_empty_rule_base() {
        let (vars, [temp, hum, heat]) = heater_variables();
        let system = InferenceSystem::new(vars, Rules::new(), &[temp, hum], &[heat]).unwrap();

        assert_eq!(system.aggregate(&[50., 50.], 5., 0), Ok(0.));
        assert_eq!(system.defuzzify(&[50., 50.], 0), Ok(0.));
    }

    #[test]
    fn test_repeatable() {
        let system = heater();
        let first = system.defuzzify(&[33.3, 47.1], 0).unwrap();

        for _ in 0..5 {
            assert_eq!(system.defuzzify(&[33.3, 47.1], 0).unwrap().to_bits(), first.to_bits());
        }
    }

    #[test]
    fn test_shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InferenceSystem<f32>>();

        let system = heater();
        let expected = system.defuzzify(&[28., 39.2], 0).unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| system.defuzzify(&[28., 39.2], 0).unwrap()))
                .collect();

            for handle in handles {
                assert_eq!(handle.join().unwrap().to_bits(), expected.to_bits());
            }
        });
    }

    #[test]
    fn test_bad_slot_and_inputs() {
        let system = heater();

        assert_eq!(
            system.defuzzify(&[28., 39.2], 1),
            Err(FuzzyError::IndexOutOfRange {
                what: "output slot",
                index: 1,
                len: 1,
            })
        );
        assert!(system.output_domain(3).is_err());
        assert_eq!(
            system.defuzzify(&[28.], 0),
            Err(FuzzyError::IndexOutOfRange {
                what: "input",
                index: 1,
                len: 1,
            })
        );
    }

    #[test]
    fn test_rejects_role_mismatch() {
        let (vars, [temp, hum, heat]) = heater_variables();
        let mut rules = Rules::new();

        rules.add(temp.is(COLD).and(heat.is(LOW)), heat.is(MED));

        assert_eq!(
            InferenceSystem::new(vars.clone(), rules, &[temp], &[heat]).err(),
            Some(FuzzyError::RoleMismatch {
                expected: Role::Input,
                found: Role::Output,
            })
        );
        assert_eq!(
            InferenceSystem::new(vars, Rules::new(), &[temp], &[hum]).err(),
            Some(FuzzyError::RoleMismatch {
                expected: Role::Output,
                found: Role::Input,
            })
        );
    }

    #[test]
    fn test_rejects_inconsistent_consequence() {
        let (mut vars, [temp, hum, heat]) = heater_variables();
        let fan = vars.add(0. ..=10., Role::Output, 1, None).unwrap();
        let mut rules = Rules::new();

        rules.add(temp.is(COLD).and(hum.is(DRY)), heat.is(MED));
        rules.add(temp.is(HOT).and(hum.is(DRY)), fan.is(0));

        assert_eq!(
            InferenceSystem::new(vars.clone(), rules.clone(), &[temp, hum], &[heat]).err(),
            Some(FuzzyError::InconsistentConsequence { rule: 1, slot: 0 })
        );
        assert_eq!(
            InferenceSystem::new(vars, rules, &[temp, hum], &[heat, fan]).err(),
            Some(FuzzyError::LengthMismatch { expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_rejects_bad_term_index() {
        let (vars, [temp, hum, heat]) = heater_variables();
        let mut rules = Rules::new();

        rules.add(temp.is(COLD).and(hum.is(2)), heat.is(MED));

        assert_eq!(
            InferenceSystem::new(vars.clone(), rules, &[temp, hum], &[heat]).err(),
            Some(FuzzyError::IndexOutOfRange {
                what: "term",
                index: 2,
                len: 2,
            })
        );

        let mut rules = Rules::new();

        rules.add(temp.is(COLD).and(hum.is(DRY)), heat.is(HIGH + 1));

        assert!(InferenceSystem::new(vars, rules, &[temp, hum], &[heat]).is_err());
    }

    #[test]
    fn test_rejects_unknown_variable() {
        let (vars, [temp, hum, heat]) = heater_variables();
        let mut other = Variables::<f64>::new();
        let stranger = (0..4)
            .map(|_| other.add(0. ..=1., Role::Output, 1, None).unwrap())
            .last()
            .unwrap();
        let mut rules = Rules::new();

        rules.add(temp.is(COLD).and(hum.is(DRY)), heat.is(MED));

        assert_eq!(
            InferenceSystem::new(vars, rules, &[temp, hum], &[stranger]).err(),
            Some(FuzzyError::UnknownVariable)
        );
    }
}
