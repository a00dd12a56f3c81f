//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the `ProvenanceControl` I/O boundary trait
//! but are themselves concrete structs, not traits.

mod control;

pub use control::{CallFailure, CallOutcome, ControlCall, ControlService, StateReport};
