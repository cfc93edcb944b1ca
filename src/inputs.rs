use crate::error::{FuzzyError, Result};
use crate::variable::VariableKey;

/// Crisp readings paired with the input variables they belong to.
///
/// `values[n]` is the reading of `keys[n]`. Propositions look their reading
/// up by variable, so a premise may name its inputs in any order or only
/// some of them.
#[derive(Clone, Copy, Debug)]
pub struct Inputs<'a, F> {
    keys: &'a [VariableKey],
    values: &'a [F],
}

impl<'a, F: Copy> Inputs<'a, F> {
    pub fn new(keys: &'a [VariableKey], values: &'a [F]) -> Result<Self> {
        if values.len() < keys.len() {
            return Err(FuzzyError::out_of_range("input", values.len(), values.len()));
        }

        if values.len() > keys.len() {
            return Err(FuzzyError::LengthMismatch {
                expected: keys.len(),
                found: values.len(),
            });
        }

        Ok(Inputs { keys, values })
    }

    /// Reading of the input variable `key`.
    pub fn get(&self, key: VariableKey) -> Result<F> {
        self.keys
            .iter()
            .position(|&k| k == key)
            .and_then(|n| self.values.get(n).copied())
            .ok_or(FuzzyError::UndeclaredInput)
    }

    pub fn keys(&self) -> &'a [VariableKey] {
        self.keys
    }

    pub fn values(&self) -> &'a [F] {
        self.values
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[test]
fn test_lookup_by_variable() {
    use slotmap::SlotMap;

    let mut keys = SlotMap::<VariableKey, ()>::with_key();
    let temp = keys.insert(());
    let hum = keys.insert(());
    let heat = keys.insert(());
    let declared = [temp, hum];

    let inputs = Inputs::new(&declared, &[28., 39.2]).unwrap();

    assert_eq!(inputs.get(hum), Ok(39.2));
    assert_eq!(inputs.get(temp), Ok(28.));
    assert_eq!(inputs.get(heat), Err(FuzzyError::UndeclaredInput));
    assert_eq!(inputs.len(), 2);
}

#[test]
fn test_reading_count_must_match() {
    use slotmap::SlotMap;

    let mut keys = SlotMap::<VariableKey, ()>::with_key();
    let declared = [keys.insert(()), keys.insert(())];

    assert_eq!(
        Inputs::new(&declared, &[28.]).err(),
        Some(FuzzyError::IndexOutOfRange {
            what: "input",
            index: 1,
            len: 1,
        })
    );
    assert_eq!(
        Inputs::new(&declared, &[28., 39.2, 1.]).err(),
        Some(FuzzyError::LengthMismatch { expected: 2, found: 3 })
    );
    assert!(Inputs::<f64>::new(&[], &[]).unwrap().is_empty());
}
