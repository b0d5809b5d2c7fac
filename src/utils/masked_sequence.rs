use num::{BigUint, Zero};

/// A fixed sequence of elements together with a bit mask over their positions.
///
/// The mask can be stepped like a binary counter; starting from zero and calling
/// [`MaskedSequence::increment`] until it wraps back to zero visits all `2^len` subsets.
///
/// # Example
/// ```
/// use postman::utils::MaskedSequence;
/// let mut seq = MaskedSequence::new(vec!['a', 'b']);
/// let mut visited = 0;
/// loop {
///     seq.increment();
///     visited += 1;
///     if seq.is_empty_mask() {
///         break;
///     }
/// }
/// assert_eq!(visited, 4);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MaskedSequence<T> {
    elements: Vec<T>,
    mask: BigUint,
}

impl<T> MaskedSequence<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self {
            elements,
            mask: BigUint::zero(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.elements.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.elements.iter()
    }

    /// Returns whether position `i` is selected by the mask
    pub fn has(&self, i: usize) -> bool {
        self.mask.bit(i as u64)
    }

    pub fn flip(&mut self, i: usize) {
        debug_assert!(i < self.len());
        let i = i as u64;
        let value = !self.mask.bit(i);
        self.mask.set_bit(i, value);
    }

    /// Advances the mask to the next subset in counting order; wraps to zero
    /// after the all-ones mask.
    pub fn increment(&mut self) {
        self.mask += 1u32;
        let overflow = self.len() as u64;
        if self.mask.bit(overflow) {
            self.mask.set_bit(overflow, false);
        }
    }

    pub fn is_empty_mask(&self) -> bool {
        self.mask.is_zero()
    }

    pub fn mask(&self) -> &BigUint {
        &self.mask
    }

    pub fn set_mask(&mut self, mask: BigUint) {
        debug_assert!(mask.bits() <= self.len() as u64);
        self.mask = mask;
    }

    pub fn clear_mask(&mut self) {
        self.mask.set_zero();
    }

    /// Iterates over the elements whose positions are selected by the mask
    pub fn selected(&self) -> impl Iterator<Item = &T> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, x)| self.has(i).then_some(x))
    }
}

impl<T: PartialEq> MaskedSequence<T> {
    /// Returns the position of `elem` or `None` if it is not contained
    pub fn index(&self, elem: &T) -> Option<usize> {
        self.elements.iter().position(|x| x == elem)
    }

    /// Returns the position of `elem` together with its mask bit
    pub fn index_with_bit(&self, elem: &T) -> Option<(usize, bool)> {
        self.index(elem).map(|i| (i, self.has(i)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn enumerates_all_subsets_once() {
        for n in 0..6 {
            let mut seq = MaskedSequence::new((0..n).collect());
            let mut seen = HashSet::new();
            loop {
                seq.increment();
                assert!(seen.insert(seq.mask().clone()));
                if seq.is_empty_mask() {
                    break;
                }
            }
            assert_eq!(seen.len(), 1 << n);
        }
    }

    #[test]
    fn flip_and_lookup() {
        let mut seq = MaskedSequence::new(vec![10, 20, 30]);
        assert!(seq.selected().next().is_none());

        seq.flip(1);
        seq.flip(2);
        seq.flip(2);
        assert!(seq.has(1));
        assert!(!seq.has(2));
        assert_eq!(seq.index_with_bit(&20), Some((1, true)));
        assert_eq!(seq.index_with_bit(&30), Some((2, false)));
        assert_eq!(seq.index(&40), None);
        assert_eq!(seq.selected().copied().collect::<Vec<_>>(), vec![20]);

        seq.set_mask(BigUint::from(0b101u32));
        assert_eq!(seq.selected().copied().collect::<Vec<_>>(), vec![10, 30]);
        seq.clear_mask();
        assert!(seq.is_empty_mask());
    }

    #[test]
    fn wide_masks() {
        let mut seq = MaskedSequence::new((0..100).collect::<Vec<u32>>());
        seq.flip(99);
        assert!(seq.has(99));
        assert_eq!(seq.mask().bits(), 100);
        seq.increment();
        assert!(seq.has(0) && seq.has(99));
    }
}
