use hashbrown::HashSet;
use std::hash::Hash;

/// What it takes to turn one set into another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta<K: Eq + Hash> {
    pub add:    HashSet<K>,
    pub remove: HashSet<K>
}

impl<K: Clone + Eq + Hash> Delta<K> {
    pub fn new(old: &HashSet<K>, new: &HashSet<K>) -> Self {
        Self {
            add:    new.difference(old).cloned().collect(),
            remove: old.difference(new).cloned().collect()
        }
    }

    pub fn changes(&self) -> usize {
        self.add.len() + self.remove.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(xs: &[i32]) -> HashSet<i32> {
        xs.iter().cloned().collect()
    }

    #[test]
    fn computes_both_sides() {
        let delta = Delta::new(&set(&[1, 3, 2]), &set(&[1, 4, 5]));
        assert_eq!(delta.add, set(&[4, 5]));
        assert_eq!(delta.remove, set(&[2, 3]));
        assert_eq!(delta.changes(), 4);
    }

    #[test]
    fn identical_sets_need_nothing() {
        let delta = Delta::new(&set(&[1, 2]), &set(&[2, 1]));
        assert!(delta.is_empty());
    }

    #[test]
    fn from_empty_adds_everything() {
        let delta = Delta::new(&HashSet::new(), &set(&[7]));
        assert_eq!(delta.add, set(&[7]));
        assert!(delta.remove.is_empty());
    }
}
