use hashbrown::HashMap;
use crate::error::{SamplingError, Result};
use crate::graph::Edge;

/// Fixed-capacity edge sample with O(1) membership and O(1) removal.
///
/// Edges live in a dense slot vector; `positions` maps each edge to its slot.
/// Removal moves the last edge into the vacated slot and re-points its entry.
#[derive(Debug, Clone)]
pub struct EdgeReservoir {
    capacity: usize,
    slots: Vec<Edge>,
    positions: HashMap<Edge, usize>,
}

impl EdgeReservoir {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, edge: Edge) -> Result<()> {
        if self.positions.contains_key(&edge) {
            return Err(SamplingError::DuplicateEdge(edge.0, edge.1));
        }
        if self.is_full() {
            return Err(SamplingError::invariant(format!(
                "reservoir of capacity {} is full",
                self.capacity
            )));
        }
        self.positions.insert(edge, self.slots.len());
        self.slots.push(edge);
        Ok(())
    }

    /// Remove `edge`, returning whether it was resident.
    pub fn remove(&mut self, edge: &Edge) -> bool {
        let Some(pos) = self.positions.remove(edge) else {
            return false;
        };
        self.slots.swap_remove(pos);
        if let Some(&moved) = self.slots.get(pos) {
            self.positions.insert(moved, pos);
        }
        true
    }

    pub fn contains(&self, edge: &Edge) -> bool {
        self.positions.contains_key(edge)
    }

    pub fn get(&self, pos: usize) -> Option<Edge> {
        self.slots.get(pos).copied()
    }

    pub fn position(&self, edge: &Edge) -> Option<usize> {
        self.positions.get(edge).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn edges(&self) -> &[Edge] {
        &self.slots
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.positions.clear();
    }

    /// Slot vector and reverse index agree and respect the capacity.
    pub fn is_consistent(&self) -> bool {
        self.slots.len() == self.positions.len()
            && self.slots.len() <= self.capacity
            && self
                .slots
                .iter()
                .enumerate()
                .all(|(pos, edge)| self.positions.get(edge) == Some(&pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_until_full() {
        let mut reservoir = EdgeReservoir::new(2);
        reservoir.insert((1, 2)).unwrap();
        reservoir.insert((2, 3)).unwrap();

        assert!(reservoir.is_full());
        assert!(matches!(
            reservoir.insert((3, 4)),
            Err(SamplingError::InvariantViolation(_))
        ));
        assert_eq!(reservoir.len(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut reservoir = EdgeReservoir::new(4);
        reservoir.insert((1, 2)).unwrap();
        assert!(matches!(
            reservoir.insert((1, 2)),
            Err(SamplingError::DuplicateEdge(1, 2))
        ));
    }

    #[test]
    fn test_remove_moves_last_into_slot() {
        let mut reservoir = EdgeReservoir::new(4);
        for edge in [(1, 2), (2, 3), (3, 4), (4, 5)] {
            reservoir.insert(edge).unwrap();
        }

        assert!(reservoir.remove(&(2, 3)));
        assert_eq!(reservoir.get(1), Some((4, 5)));
        assert_eq!(reservoir.position(&(4, 5)), Some(1));
        assert!(!reservoir.contains(&(2, 3)));
        assert!(reservoir.is_consistent());

        // Removing the last slot needs no fix-up
        assert!(reservoir.remove(&(3, 4)));
        assert_eq!(reservoir.edges(), &[(1, 2), (4, 5)]);
        assert!(!reservoir.remove(&(3, 4)));
        assert!(reservoir.is_consistent());
    }
}
