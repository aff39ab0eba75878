//! The engine's keyed copy of the facility graph.
//!
//! # Data layout
//!
//! Areas are kept in a `Vec` in the order the collaborator supplied them, and
//! a `HashMap<AreaId, usize>` index maps ids to positions.  Metrics and
//! bottleneck detection iterate the `Vec` (stable, caller-defined order); the
//! tick loop resolves ids through the index.
//!
//! If the same id appears twice, the area keeps the position of its first
//! occurrence and the value of its last, and the id is recorded in
//! [`FacilityGraph::duplicates`] for the validation pass.

use std::collections::HashMap;

use pf_core::AreaId;

use crate::{Area, Connection};

#[derive(Clone, Debug, Default)]
pub struct FacilityGraph {
    areas:       Vec<Area>,
    index:       HashMap<AreaId, usize>,
    connections: Vec<Connection>,
    duplicates:  Vec<AreaId>,
}

impl FacilityGraph {
    pub fn new(areas: Vec<Area>, connections: Vec<Connection>) -> Self {
        let mut graph = Self {
            areas: Vec::with_capacity(areas.len()),
            index: HashMap::with_capacity(areas.len()),
            connections,
            duplicates: Vec::new(),
        };
        for area in areas {
            match graph.index.get(&area.id) {
                Some(&slot) => {
                    graph.duplicates.push(area.id.clone());
                    graph.areas[slot] = area;
                }
                None => {
                    graph.index.insert(area.id.clone(), graph.areas.len());
                    graph.areas.push(area);
                }
            }
        }
        graph
    }

    /// A graph with no areas; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn get(&self, id: &str) -> Option<&Area> {
        self.index.get(id).map(|&i| &self.areas[i])
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All areas, in supplied order, one entry per id.
    #[inline]
    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    /// Carried for the collaborator; routing does not consult connections.
    #[inline]
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Ids that appeared more than once in the input.
    #[inline]
    pub fn duplicates(&self) -> &[AreaId] {
        &self.duplicates
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
