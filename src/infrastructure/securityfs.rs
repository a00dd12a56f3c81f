//! securityfs implementation of `ProvenanceControl`
//!
//! Each call opens one control node under the provenance securityfs
//! directory, performs a single read or write, and closes it.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::domain::{DomainError, FileProvenance, FilterKind};
use crate::infrastructure::traits::ProvenanceControl;
use crate::infrastructure::wire::{self, FileOp, FilterOp};

/// Where the provenance LSM mounts its control nodes.
pub const DEFAULT_CONTROL_DIR: &str = "/sys/kernel/security/provenance";

pub const ENABLE_NODE: &str = "enable";
pub const ALL_NODE: &str = "all";
pub const FILE_NODE: &str = "file";

// Upper bound on what a boolean or mask node may return.
const SMALL_READ_CAP: u64 = 64;

/// Control node backing a filter set.
pub fn filter_node(kind: FilterKind) -> &'static str {
    match kind {
        FilterKind::Node => "node_filter",
        FilterKind::Relation => "relation_filter",
        FilterKind::PropagateNode => "propagate_node_filter",
        FilterKind::PropagateRelation => "propagate_relation_filter",
    }
}

/// Provenance control through securityfs nodes.
#[derive(Debug, Clone)]
pub struct SecurityFsControl {
    root: PathBuf,
}

impl SecurityFsControl {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn node(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn read_node(&self, name: &str) -> io::Result<Vec<u8>> {
        let path = self.node(name);
        trace!("read_node: {}", path.display());
        let mut buf = Vec::new();
        File::open(&path)?
            .take(SMALL_READ_CAP)
            .read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn write_node(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.node(name);
        trace!("write_node: {} ({} bytes)", path.display(), bytes.len());
        let mut file = OpenOptions::new().write(true).open(&path)?;
        file.write_all(bytes)
    }

    /// Issue one `read(2)` with the request already in `buf`; the subsystem
    /// answers in place.
    fn exchange(&self, name: &str, buf: &mut [u8]) -> io::Result<()> {
        let path = self.node(name);
        trace!("exchange: {} ({} bytes)", path.display(), buf.len());
        let n = File::open(&path)?.read(buf)?;
        if n != buf.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("short read from {}: {} of {} bytes", path.display(), n, buf.len()),
            ));
        }
        Ok(())
    }

    fn write_filter(&self, kind: FilterKind, id: u32, op: FilterOp) -> io::Result<()> {
        debug!("filter: {:?} {:?} id={:#x}", kind, op, id);
        self.write_node(filter_node(kind), &wire::encode_filter_request(id, op))
    }

    fn write_file(&self, path: &Path, op: FileOp, value: u64) -> io::Result<()> {
        let canonical = std::fs::canonicalize(path)?;
        debug!("file: {:?} value={} path={}", op, value, canonical.display());
        let request = wire::encode_file_request(&canonical, op, value)?;
        self.write_node(FILE_NODE, &request)
    }
}

fn invalid_data(e: DomainError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, e)
}

impl ProvenanceControl for SecurityFsControl {
    fn enabled(&self) -> io::Result<bool> {
        wire::decode_bool(&self.read_node(ENABLE_NODE)?).map_err(invalid_data)
    }

    fn set_enabled(&self, on: bool) -> io::Result<()> {
        debug!("set_enabled: {}", on);
        self.write_node(ENABLE_NODE, wire::encode_bool(on))
    }

    fn all(&self) -> io::Result<bool> {
        wire::decode_bool(&self.read_node(ALL_NODE)?).map_err(invalid_data)
    }

    fn set_all(&self, on: bool) -> io::Result<()> {
        debug!("set_all: {}", on);
        self.write_node(ALL_NODE, wire::encode_bool(on))
    }

    fn filter(&self, kind: FilterKind) -> io::Result<u32> {
        wire::decode_mask(&self.read_node(filter_node(kind))?).map_err(invalid_data)
    }

    fn add_filter(&self, kind: FilterKind, id: u32) -> io::Result<()> {
        self.write_filter(kind, id, FilterOp::Add)
    }

    fn remove_filter(&self, kind: FilterKind, id: u32) -> io::Result<()> {
        self.write_filter(kind, id, FilterOp::Remove)
    }

    fn reset_filter(&self, kind: FilterKind) -> io::Result<()> {
        self.write_filter(kind, 0, FilterOp::Reset)
    }

    fn read_file(&self, path: &Path) -> io::Result<FileProvenance> {
        let canonical = std::fs::canonicalize(path)?;
        debug!("read_file: {}", canonical.display());
        let mut buf = wire::encode_file_request(&canonical, FileOp::Read, 0)?;
        self.exchange(FILE_NODE, &mut buf)?;
        wire::decode_file_response(&buf).map_err(invalid_data)
    }

    fn track_file(&self, path: &Path, on: bool) -> io::Result<()> {
        self.write_file(path, FileOp::Tracked, u64::from(on))
    }

    fn propagate_file(&self, path: &Path, on: bool) -> io::Result<()> {
        self.write_file(path, FileOp::Propagate, u64::from(on))
    }

    fn taint_file(&self, path: &Path, taint: u64) -> io::Result<()> {
        self.write_file(path, FileOp::Taint, taint)
    }

    fn opaque_file(&self, path: &Path, on: bool) -> io::Result<()> {
        self.write_file(path, FileOp::Opaque, u64::from(on))
    }
}
