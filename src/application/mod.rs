//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the single use case of the application: predict from the form.

mod prediction;

pub use prediction::PredictionService;
