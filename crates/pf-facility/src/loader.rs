//! Loaders for collaborator-authored reference data.
//!
//! # Formats
//!
//! | Function               | Input                                                  |
//! |------------------------|--------------------------------------------------------|
//! | [`load_layout_json`]   | layout editor JSON document (`FacilityLayout`)         |
//! | [`load_catalog_json`]  | JSON array of `PatientType`                            |
//! | [`load_flow_paths_csv`]| CSV routing rows, one edge per row                     |
//!
//! The CSV format groups edges per patient type in file order:
//!
//! ```csv
//! patient_type,from,to,probability,avg_transition_time
//! emergency,ENTRY,triage,1.0,0
//! emergency,triage,consult,0.7,2
//! emergency,triage,EXIT,0.3,0
//! ```
//!
//! `avg_transition_time` may be left empty.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use pf_core::PatientTypeId;

use crate::{FacilityError, FacilityLayout, FacilityResult, FlowPath, PatientType};

// ── JSON ──────────────────────────────────────────────────────────────────────

pub fn load_layout_json(path: &Path) -> FacilityResult<FacilityLayout> {
    load_layout_reader(BufReader::new(File::open(path)?))
}

pub fn load_layout_reader<R: Read>(reader: R) -> FacilityResult<FacilityLayout> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn load_catalog_json(path: &Path) -> FacilityResult<Vec<PatientType>> {
    load_catalog_reader(BufReader::new(File::open(path)?))
}

/// Parse a JSON array of patient types.  Ids must be unique.
pub fn load_catalog_reader<R: Read>(reader: R) -> FacilityResult<Vec<PatientType>> {
    let catalog: Vec<PatientType> = serde_json::from_reader(reader)?;
    for (i, ty) in catalog.iter().enumerate() {
        if catalog[..i].iter().any(|other| other.id == ty.id) {
            return Err(FacilityError::Parse(format!("duplicate patient type id {:?}", ty.id.as_str())));
        }
    }
    Ok(catalog)
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct FlowPathRecord {
    patient_type:        String,
    from:                String,
    to:                  String,
    probability:         f64,
    #[serde(default)]
    avg_transition_time: Option<f64>,
}

pub fn load_flow_paths_csv(path: &Path) -> FacilityResult<Vec<(PatientTypeId, Vec<FlowPath>)>> {
    load_flow_paths_reader(File::open(path)?)
}

/// Like [`load_flow_paths_csv`] but accepts any `Read` source.
///
/// Returns one entry per patient type in order of first appearance; edges
/// keep their row order, which is the order routing walks them.
pub fn load_flow_paths_reader<R: Read>(reader: R) -> FacilityResult<Vec<(PatientTypeId, Vec<FlowPath>)>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut groups: Vec<(PatientTypeId, Vec<FlowPath>)> = Vec::new();

    for result in csv_reader.deserialize::<FlowPathRecord>() {
        let row = result?;
        let ty = row.patient_type.trim();
        if ty.is_empty() {
            return Err(FacilityError::Parse("flow path row with empty patient_type".into()));
        }
        let edge = FlowPath {
            from:                row.from.trim().into(),
            to:                  row.to.trim().into(),
            probability:         row.probability,
            avg_transition_time: row.avg_transition_time.unwrap_or(0.0),
        };
        match groups.iter_mut().find(|(id, _)| id.as_str() == ty) {
            Some((_, edges)) => edges.push(edge),
            None => groups.push((ty.into(), vec![edge])),
        }
    }

    Ok(groups)
}
