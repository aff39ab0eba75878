//! Areas (capacity-bounded service stations) and the connections between them.
//!
//! Field names serialize in camelCase to match the layout editor's JSON.
//! Only `id`, `position`, and the `capacity`/`processTime`/`expectedWaitTime`
//! properties matter to the engine; everything else is display metadata and
//! defaults when absent.

use serde::{Deserialize, Serialize};

use pf_core::{AreaId, Point};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AreaCategory {
    Wash,
    Ipc,
    Logistics,
    #[default]
    Clinical,
}

/// Operational status shown by the editor.  Not consulted by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaState {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width:  f64,
    pub height: f64,
}

#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaProperties {
    /// Concurrent patients in service.  `0` means the area never admits.
    pub capacity:           u32,
    /// Service duration in minutes.
    pub process_time:       f64,
    /// Target wait in minutes; `0` disables the wait-ratio indicator.
    pub expected_wait_time: f64,
    pub priority:           f64,
    pub staff_required:     u32,
    pub equipment_list:     Vec<String>,
    pub color:              String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id:         AreaId,
    #[serde(default)]
    pub name:       String,
    #[serde(default)]
    pub category:   AreaCategory,
    #[serde(rename = "type", default)]
    pub area_type:  String,
    pub position:   Point,
    #[serde(default)]
    pub dimensions: Dimensions,
    pub properties: AreaProperties,
    #[serde(default)]
    pub status:     AreaState,
    #[serde(default)]
    pub notes:      String,
}

impl Area {
    /// An area with the engine-relevant fields set and display fields
    /// defaulted.  `name` starts out equal to the id.
    pub fn new(
        id:                 impl Into<AreaId>,
        capacity:           u32,
        process_time:       f64,
        expected_wait_time: f64,
        position:           Point,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            category: AreaCategory::default(),
            area_type: String::new(),
            position,
            dimensions: Dimensions::default(),
            properties: AreaProperties {
                capacity,
                process_time,
                expected_wait_time,
                ..AreaProperties::default()
            },
            status: AreaState::default(),
            notes: String::new(),
        }
    }

    /// Replace the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.properties.capacity
    }

    /// Service duration in simulated milliseconds.
    #[inline]
    pub fn process_time_ms(&self) -> f64 {
        self.properties.process_time * pf_core::MS_PER_MINUTE
    }

    #[inline]
    pub fn expected_wait_time(&self) -> f64 {
        self.properties.expected_wait_time
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    #[default]
    Primary,
    Secondary,
    Emergency,
}

/// A corridor between two areas.  Carried with the graph; routing follows
/// patient-type flow paths, not connections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id:            String,
    pub from:          AreaId,
    pub to:            AreaId,
    #[serde(default)]
    pub bidirectional: bool,
    #[serde(default)]
    pub distance:      f64,
    #[serde(rename = "type", default)]
    pub kind:          ConnectionKind,
}
