//! Reflector: a keyed pairing of symbols.
//!
//! Even inputs give a fixed-point-free involution. A single element maps to
//! itself. For longer odd inputs the leftover element is folded into the first
//! pair as a 3-cycle `a -> b -> z -> a`, so nothing is left fixed; the inverse
//! map is kept for decoding.
//!
//! On odd inputs this gives up `reflect(reflect(x)) == x` for those three
//! elements in exchange for having no fixed point. [`Reflector::is_involution`]
//! tells the two cases apart.

use crate::random::DeterministicRng;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reflector<T: Eq + Hash> {
    forward: HashMap<T, T>,
    inverse: HashMap<T, T>,
}

impl<T: Clone + Eq + Hash> Reflector<T> {
    /// Shuffle `items` with `rng` and pair consecutive elements
    pub fn generate(mut items: Vec<T>, rng: &mut DeterministicRng) -> Self {
        rng.shuffle(&mut items);

        let mut forward = HashMap::with_capacity(items.len());
        let mut pairs = items.chunks_exact(2);
        for pair in &mut pairs {
            forward.insert(pair[0].clone(), pair[1].clone());
            forward.insert(pair[1].clone(), pair[0].clone());
        }

        if let [leftover] = pairs.remainder() {
            if items.len() == 1 {
                forward.insert(leftover.clone(), leftover.clone());
            } else {
                let (a, b) = (items[0].clone(), items[1].clone());
                forward.insert(b.clone(), leftover.clone());
                forward.insert(leftover.clone(), a.clone());
                forward.insert(a, b);
            }
        }

        let inverse = forward
            .iter()
            .map(|(from, to)| (to.clone(), from.clone()))
            .collect();
        Self { forward, inverse }
    }

    pub fn reflect(&self, item: &T) -> Option<&T> {
        self.forward.get(item)
    }

    /// Inverse of [`Reflector::reflect`]
    pub fn unreflect(&self, item: &T) -> Option<&T> {
        self.inverse.get(item)
    }

    /// True when every element pairs back to itself under a second reflection
    pub fn is_involution(&self) -> bool {
        self.forward == self.inverse
    }

    pub fn mapping(&self) -> &HashMap<T, T> {
        &self.forward
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

/// Index-based reflector over `0..size`, seeded from `key`
pub fn generate_index_reflector(key: &str, size: usize) -> BTreeMap<usize, usize> {
    let mut rng = DeterministicRng::from_seed_str(key);
    Reflector::generate((0..size).collect(), &mut rng)
        .forward
        .into_iter()
        .collect()
}
