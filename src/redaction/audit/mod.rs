//! Audit logging for redaction runs
//!
//! One line per `redact` call. Original values are only ever written as
//! SHA-256 hashes.

pub mod logger;

pub use logger::AuditLogger;
