//! I/O boundary traits for testability
//!
//! The provenance subsystem is reached only through `ProvenanceControl`,
//! allowing services to be tested with recording implementations.

use std::io;
use std::path::Path;

use crate::domain::{FileProvenance, FilterKind};

/// Control-plane operations exposed by the provenance subsystem.
///
/// Every method is a single round trip; implementations must not cache.
pub trait ProvenanceControl: Send + Sync {
    /// Is event capture active.
    fn enabled(&self) -> io::Result<bool>;

    /// Turn event capture on or off.
    fn set_enabled(&self, on: bool) -> io::Result<()>;

    /// Is whole-system capture active.
    fn all(&self) -> io::Result<bool>;

    /// Turn whole-system capture on or off.
    fn set_all(&self, on: bool) -> io::Result<()>;

    /// Current mask of a filter set.
    fn filter(&self, kind: FilterKind) -> io::Result<u32>;

    fn add_filter(&self, kind: FilterKind, id: u32) -> io::Result<()>;

    fn remove_filter(&self, kind: FilterKind, id: u32) -> io::Result<()>;

    /// Clear a filter set.
    fn reset_filter(&self, kind: FilterKind) -> io::Result<()>;

    /// Read the provenance record attached to a file.
    fn read_file(&self, path: &Path) -> io::Result<FileProvenance>;

    fn track_file(&self, path: &Path, on: bool) -> io::Result<()>;

    fn propagate_file(&self, path: &Path, on: bool) -> io::Result<()>;

    /// Apply a taint value to a file.
    fn taint_file(&self, path: &Path, taint: u64) -> io::Result<()>;

    fn opaque_file(&self, path: &Path, on: bool) -> io::Result<()>;
}
