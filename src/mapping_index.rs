//! Per-read-name storage for the mappings of one track.

use indexmap::IndexMap;

use crate::mapping::Mapping;

/// Arena of mappings for one track of a pair experiment, grouped by
/// read name. Positions in the arena are stable; groups iterate in
/// insertion order.
#[derive(Debug, Default)]
pub struct MappingIndex {
    mappings: Vec<Mapping>,
    by_read_name: IndexMap<String, Vec<usize>>,
}

impl MappingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MappingIndex {
            mappings: Vec::with_capacity(capacity),
            by_read_name: IndexMap::new(),
        }
    }

    /// Add a mapping and return its arena position.
    pub fn insert(&mut self, mapping: Mapping) -> usize {
        let pos = self.mappings.len();
        self.by_read_name
            .entry(mapping.read_name().to_string())
            .or_default()
            .push(pos);
        self.mappings.push(mapping);
        pos
    }

    pub fn get(&self, pos: usize) -> &Mapping {
        &self.mappings[pos]
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Arena positions of every mapping carrying `read_name`.
    pub fn group(&self, read_name: &str) -> Option<&[usize]> {
        self.by_read_name.get(read_name).map(Vec::as_slice)
    }

    pub fn contains_read(&self, read_name: &str) -> bool {
        self.by_read_name.contains_key(read_name)
    }

    /// Read names in first-seen order.
    pub fn read_names(&self) -> impl Iterator<Item = &str> {
        self.by_read_name.keys().map(String::as_str)
    }

    pub fn iter_groups(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.by_read_name
            .iter()
            .map(|(name, positions)| (name.as_str(), positions.as_slice()))
    }

    pub fn num_reads(&self) -> usize {
        self.by_read_name.len()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Summary statistics over the read-name groups.
    pub fn stats(&self) -> MappingIndexStats {
        let group_sizes: Vec<usize> = self.by_read_name.values().map(Vec::len).collect();
        let total: usize = group_sizes.iter().sum();
        let multi_mapped = self
            .mappings
            .iter()
            .filter(|m| m.num_hits() > 1)
            .count();

        MappingIndexStats {
            num_reads: group_sizes.len(),
            num_mappings: total,
            max_mappings_per_read: group_sizes.iter().max().copied().unwrap_or(0),
            multi_mapped,
        }
    }
}

/// Statistics about one track's mappings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingIndexStats {
    pub num_reads: usize,
    pub num_mappings: usize,
    pub max_mappings_per_read: usize,
    pub multi_mapped: usize,
}
