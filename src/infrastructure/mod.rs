//! Infrastructure layer: securityfs transport, wire codec and DI container
//!
//! This layer implements the I/O boundary trait and wires up services.

pub mod di;
pub mod error;
pub mod securityfs;
pub mod traits;
pub mod wire;

pub use error::{InfraError, InfraResult};
pub use securityfs::SecurityFsControl;
