pub mod batch;
pub mod component_id;
pub mod container;
pub mod core_api;
pub mod operation;
pub mod rounding;
pub mod structure;
pub mod transform;
