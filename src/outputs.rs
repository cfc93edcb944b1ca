use std::ops::Index;

/// Crisp results of one evaluation, one per output slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Outputs<F>(Vec<F>);

impl<F: Copy> Outputs<F> {
    pub(crate) fn new(crisp: Vec<F>) -> Self {
        Self(crisp)
    }

    pub fn get(&self, slot: usize) -> Option<F> {
        self.0.get(slot).copied()
    }

    pub fn as_slice(&self) -> &[F] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<F> {
        self.0
    }
}

impl<F> Index<usize> for Outputs<F> {
    type Output = F;

    fn index(&self, slot: usize) -> &F {
        &self.0[slot]
    }
}
