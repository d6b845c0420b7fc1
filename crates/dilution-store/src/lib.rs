//! # dilution-store
//! JSON-file-backed measurement datasets and tracer registry.
//!
//! Implements the `dilution-core` collaborator traits:
//! - [`ReferenceDataset`] — the fixed reference file, parsed at startup
//! - [`CustomDataset`] — user submissions with write-through persistence
//! - [`DataSources`] — the active-source selector over the two datasets
//! - [`JsonTracerRegistry`] — tracer reference data

pub mod custom;
pub mod reference;
pub mod registry;
pub mod select;

pub use custom::CustomDataset;
pub use reference::ReferenceDataset;
pub use registry::JsonTracerRegistry;
pub use select::DataSources;
