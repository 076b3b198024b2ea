//! Transcript-to-task-graph pipeline.
//!
//! This module turns one raw meeting transcript into a batch of persisted
//! task records with explicit inter-task dependencies: fingerprint-based
//! idempotent intake, dependency sanitization, cycle detection and marking,
//! and the derived-state engine that computes task readiness from a flat
//! completion set. The module follows hexagonal architecture:
//!
//! - Domain types and graph algorithms in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
