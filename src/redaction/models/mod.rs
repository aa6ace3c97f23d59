//! Data models for detection and redaction

pub mod entity;
pub mod result;

pub use entity::{DetectionMethod, Entity, PiiCategory};
pub use result::{RedactionResult, Telemetry};
