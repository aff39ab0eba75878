//! The collaborator's full layout document.

use serde::{Deserialize, Serialize};

use crate::{Area, Connection, Dimensions, FacilityGraph};

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetadata {
    pub created:  String,
    pub modified: String,
    pub author:   String,
    pub version:  String,
}

/// A facility floor plan as authored in the layout editor.
///
/// The engine only needs [`areas`](Self::areas) and
/// [`connections`](Self::connections); use [`graph`](Self::graph) to derive
/// the keyed copy it runs on.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacilityLayout {
    pub id:          String,
    pub name:        String,
    pub description: String,
    pub dimensions:  Dimensions,
    /// Pixels per metre in the editor.
    pub scale:       f64,
    pub grid_size:   f64,
    pub areas:       Vec<Area>,
    pub connections: Vec<Connection>,
    pub metadata:    LayoutMetadata,
}

impl FacilityLayout {
    /// Build the engine's keyed graph from this layout.
    pub fn graph(&self) -> FacilityGraph {
        FacilityGraph::new(self.areas.clone(), self.connections.clone())
    }
}
