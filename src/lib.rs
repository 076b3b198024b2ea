//! Stenograph: meeting-transcript task-graph pipeline.
//!
//! This crate turns unstructured meeting transcripts into actionable task
//! graphs: it fingerprints transcripts for idempotent intake, sanitizes the
//! dependency lists an extraction backend produces, detects and marks
//! circular dependencies, and derives a live readiness state for every task
//! as the user marks work done.
//!
//! # Architecture
//!
//! Stenograph follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (extraction backends,
//!   storage, etc.)
//!
//! # Modules
//!
//! - [`taskgraph`]: Transcript intake, dependency analysis, and derived
//!   task state

pub mod taskgraph;
