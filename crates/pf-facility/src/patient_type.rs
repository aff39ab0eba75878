//! Patient archetypes and their probabilistic routing tables.

use serde::{Deserialize, Serialize};

use pf_core::{AreaId, PatientTypeId, ENTRY};

/// One probabilistic routing edge.
///
/// `from` is an area id or the `ENTRY` sentinel; `to` is an area id or the
/// `EXIT` sentinel.  Probabilities of edges sharing a `from` are not required
/// to sum to one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPath {
    pub from:                AreaId,
    pub to:                  AreaId,
    pub probability:         f64,
    #[serde(default)]
    pub avg_transition_time: f64,
}

impl FlowPath {
    pub fn new(from: impl Into<AreaId>, to: impl Into<AreaId>, probability: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            probability,
            avg_transition_time: 0.0,
        }
    }
}

/// A named patient archetype.  Immutable reference data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientType {
    pub id:               PatientTypeId,
    #[serde(default)]
    pub name:             String,
    #[serde(default)]
    pub description:      String,
    /// Higher priority patients walk faster between areas.
    #[serde(default)]
    pub priority:         f64,
    #[serde(default)]
    pub color:            String,
    #[serde(default)]
    pub avg_process_time: f64,
    /// Routing table, in declaration order.
    #[serde(default)]
    pub flow_path:        Vec<FlowPath>,
}

impl PatientType {
    pub fn new(id: impl Into<PatientTypeId>, priority: f64, flow_path: Vec<FlowPath>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            description: String::new(),
            priority,
            color: String::new(),
            avg_process_time: 0.0,
            flow_path,
        }
    }

    /// The first edge leaving `ENTRY`, if any.
    pub fn entry_edge(&self) -> Option<&FlowPath> {
        self.flow_path.iter().find(|p| p.from.is_entry())
    }

    /// All edges leaving `area`, in declaration order.
    pub fn edges_from<'a>(&'a self, area: &'a str) -> impl Iterator<Item = &'a FlowPath> + 'a {
        self.flow_path.iter().filter(move |p| p.from.as_str() == area)
    }

    /// Distinct edge sources other than `ENTRY`, in first-appearance order.
    pub fn sources(&self) -> Vec<&AreaId> {
        let mut seen: Vec<&AreaId> = Vec::new();
        for p in &self.flow_path {
            if p.from.as_str() != ENTRY && !seen.contains(&&p.from) {
                seen.push(&p.from);
            }
        }
        seen
    }
}
