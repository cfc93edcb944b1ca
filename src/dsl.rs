use crate::variable::VariableKey;

/// "`variable` is `term`", naming the term by its index in the variable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Proposition {
    pub variable: VariableKey,
    pub term: usize,
}

impl Proposition {
    pub fn new(variable: VariableKey, term: usize) -> Self {
        Proposition { variable, term }
    }

    pub fn and(self, rhs: Proposition) -> Conjunction {
        Conjunction(vec![self, rhs])
    }
}

/// Propositions joined by AND, in order.
///
/// On the premise side each proposition reads the crisp input of its own
/// variable, so order does not matter. On the consequence side the n-th
/// proposition feeds the n-th output slot.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Conjunction(pub(crate) Vec<Proposition>);

impl Conjunction {
    pub fn new() -> Self {
        Conjunction(Vec::new())
    }

    pub fn and(mut self, rhs: Proposition) -> Self {
        self.0.push(rhs);
        self
    }

    pub fn propositions(&self) -> &[Proposition] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Proposition> for Conjunction {
    fn from(prop: Proposition) -> Self {
        Conjunction(vec![prop])
    }
}

impl From<Vec<Proposition>> for Conjunction {
    fn from(props: Vec<Proposition>) -> Self {
        Conjunction(props)
    }
}

impl FromIterator<Proposition> for Conjunction {
    fn from_iter<I: IntoIterator<Item = Proposition>>(iter: I) -> Self {
        Conjunction(iter.into_iter().collect())
    }
}

impl VariableKey {
    pub fn is(self, term: usize) -> Proposition {
        Proposition::new(self, term)
    }
}

#[test]
fn test_conjunction_order() {
    use slotmap::SlotMap;

    let mut keys = SlotMap::<VariableKey, ()>::with_key();
    let temp = keys.insert(());
    let hum = keys.insert(());
    let wind = keys.insert(());

    let premise = temp.is(0).and(hum.is(1)).and(wind.is(2));

    assert_eq!(premise.len(), 3);
    assert_eq!(
        premise.propositions(),
        &[Proposition::new(temp, 0), Proposition::new(hum, 1), Proposition::new(wind, 2)]
    );
    assert_eq!(Conjunction::from(temp.is(4)).propositions(), &[Proposition::new(temp, 4)]);
    assert!(Conjunction::new().is_empty());
}
