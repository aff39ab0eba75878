//! The demo outpatient clinic: six areas in a row along a corridor and two
//! patient types.

use std::io::Cursor;

use anyhow::{Context, Result};

use pf_core::Point;
use pf_facility::{load_flow_paths_reader, Area, AreaCategory, FacilityLayout, PatientType};

// Edge order is routing order.  Rows from an area summing below 1 leave the
// remainder as an implicit exit.
const FLOW_PATHS_CSV: &str = "\
patient_type,from,to,probability,avg_transition_time\n\
walk-in,ENTRY,reception,1.0,\n\
walk-in,reception,triage,1.0,1\n\
walk-in,triage,consult,0.8,1\n\
walk-in,triage,EXIT,0.2,\n\
walk-in,consult,lab,0.3,2\n\
walk-in,consult,pharmacy,0.5,2\n\
walk-in,lab,consult,0.6,2\n\
walk-in,pharmacy,EXIT,1.0,\n\
urgent,ENTRY,triage,1.0,\n\
urgent,triage,imaging,0.5,1\n\
urgent,triage,consult,0.5,1\n\
urgent,imaging,consult,1.0,2\n\
urgent,consult,pharmacy,0.7,2\n\
urgent,pharmacy,EXIT,1.0,\n\
";

/// `(id, name, category, capacity, process min, expected wait min, x)`
const AREAS: [(&str, &str, AreaCategory, u32, f64, f64, f64); 6] = [
    ("reception", "Reception",    AreaCategory::Logistics,      2, 3.0,  5.0,  0.0),
    ("triage",    "Triage",       AreaCategory::Clinical,       2, 6.0,  10.0, 12.0),
    ("consult",   "Consultation", AreaCategory::Clinical,       3, 15.0, 20.0, 24.0),
    ("lab",       "Laboratory",   AreaCategory::Clinical,       1, 12.0, 15.0, 36.0),
    ("imaging",   "Imaging",      AreaCategory::Clinical,       1, 20.0, 15.0, 48.0),
    ("pharmacy",  "Pharmacy",     AreaCategory::Logistics,      1, 4.0,  5.0,  60.0),
];

pub fn build_layout() -> FacilityLayout {
    let areas = AREAS
        .iter()
        .map(|&(id, name, category, capacity, process, wait, x)| {
            let mut area = Area::new(id, capacity, process, wait, Point::new(x, 0.0)).named(name);
            area.category = category;
            area
        })
        .collect();

    FacilityLayout {
        id: "clinic-demo".into(),
        name: "Demo Outpatient Clinic".into(),
        scale: 10.0,
        grid_size: 1.0,
        areas,
        ..FacilityLayout::default()
    }
}

pub fn build_catalog() -> Result<Vec<PatientType>> {
    let groups = load_flow_paths_reader(Cursor::new(FLOW_PATHS_CSV)).context("embedded flow paths")?;
    Ok(groups
        .into_iter()
        .map(|(id, edges)| {
            let priority = if id == "urgent" { 3.0 } else { 1.0 };
            let name = if id == "urgent" { "Urgent care" } else { "Walk-in" };
            let mut ty = PatientType::new(id, priority, edges);
            ty.name = name.into();
            ty
        })
        .collect())
}
