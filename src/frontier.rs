use std::collections::BTreeMap;

/// Sparse index of frontier cells, keyed by packed cell index.
///
/// The value is the timestep at which the cell was most recently classified
/// as a frontier; the target selector uses it as a recency signal. The key
/// set mirrors exactly the cells marked `Frontier` in the owning drone's
/// internal map. An ordered map keeps iteration deterministic.
#[derive(Clone, Debug, Default)]
pub struct FrontierIndex {
    cells: BTreeMap<usize, u32>,
}

impl FrontierIndex {
    pub fn new() -> Self {
        FrontierIndex {
            cells: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, index: usize, timestep: u32) {
        self.cells.insert(index, timestep);
    }

    pub fn remove(&mut self, index: usize) {
        self.cells.remove(&index);
    }

    pub fn contains(&self, index: usize) -> bool {
        self.cells.contains_key(&index)
    }

    pub fn timestep(&self, index: usize) -> Option<u32> {
        self.cells.get(&index).copied()
    }

    /// Iterates over (packed index, discovery timestep) in key order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.cells.iter().map(|(&i, &ts)| (i, ts))
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }
}
