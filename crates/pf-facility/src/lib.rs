//! `pf-facility`: the facility graph and patient-type routing catalog.
//!
//! Both are reference data owned by the collaborator (the layout editor);
//! the engine holds a derived, keyed copy.
//!
//! # Crate layout
//!
//! | Module             | Contents                                                     |
//! |--------------------|--------------------------------------------------------------|
//! | [`area`]           | `Area`, `AreaProperties`, `Connection`, `Dimensions`         |
//! | [`layout`]         | `FacilityLayout`: the collaborator's full layout document   |
//! | [`patient_type`]   | `PatientType`, `FlowPath`                                    |
//! | [`graph`]          | `FacilityGraph`: order-preserving area list + id index      |
//! | [`validate`]       | `validate`, `Diagnostic`: dangling-reference report         |
//! | [`loader`]         | JSON layout/catalog loaders, CSV flow-path loader            |
//! | [`error`]          | `FacilityError`, `FacilityResult<T>`                         |

pub mod area;
pub mod error;
pub mod graph;
pub mod layout;
pub mod loader;
pub mod patient_type;
pub mod validate;

#[cfg(test)]
mod tests;

pub use area::{Area, AreaCategory, AreaProperties, AreaState, Connection, ConnectionKind, Dimensions};
pub use error::{FacilityError, FacilityResult};
pub use graph::FacilityGraph;
pub use layout::{FacilityLayout, LayoutMetadata};
pub use loader::{
    load_catalog_json, load_catalog_reader, load_flow_paths_csv, load_flow_paths_reader,
    load_layout_json, load_layout_reader,
};
pub use patient_type::{FlowPath, PatientType};
pub use validate::{validate, Diagnostic, DiagnosticKind, DiagnosticLevel, EdgeEnd};
