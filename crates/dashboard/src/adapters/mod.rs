// Rust guideline compliant 2026-10-17

//! Adapters (secondary ports) for the dashboard binary.
//!
//! Each sub-module implements a port trait defined in the `domain` crate or
//! consumes the store on behalf of the presentation layer.

pub mod summary_reporter;
pub mod traced_sink;
