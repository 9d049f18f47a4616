//! ---
//! aiot_section: "02-simulation"
//! aiot_subsection: "module"
//! aiot_type: "source"
//! aiot_scope: "code"
//! aiot_description: "Simulation module exports and wire types."
//! aiot_version: "v0.1.0"
//! aiot_owner: "tbd"
//! ---
//! Power-consumption simulation for the AIoT panel: the request/response
//! model spoken with the detection service, the 3-point streams the panel
//! submits, and the labelled datasets used to train the detector.

pub mod dataset;
pub mod generator;
pub mod model;

pub use dataset::{generate_dataset, write_csv, DatasetError, DatasetSpec, LabelledSample};
pub use generator::{generate_time_series, TimeSeriesGenerator, SAMPLE_SPACING_MINUTES, SERIES_LEN};
pub use model::{
    DataPoint, PredictionResult, Regime, ScoredPoint, SimulationRequest, ANOMALOUS_LABEL,
};
