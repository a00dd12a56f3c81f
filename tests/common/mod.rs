//! Recording `ProvenanceControl` double shared by integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use provctl::application::services::{CallFailure, ControlCall};
use provctl::application::ApplicationError;
use provctl::config::Settings;
use provctl::domain::{FileProvenance, FilterKind, FilterMasks};
use provctl::infrastructure::di::ServiceContainer;
use provctl::infrastructure::traits::ProvenanceControl;

type FailWhen = Box<dyn Fn(&ControlCall) -> bool + Send + Sync>;

/// Records every call; answers reads from canned values.
pub struct FakeControl {
    calls: Mutex<Vec<ControlCall>>,
    fail_when: FailWhen,
    pub enabled: bool,
    pub all: bool,
    pub masks: FilterMasks,
    pub records: HashMap<PathBuf, FileProvenance>,
}

impl Default for FakeControl {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_when: Box::new(|_| false),
            enabled: false,
            all: false,
            masks: FilterMasks::default(),
            records: HashMap::new(),
        }
    }
}

impl FakeControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls matching `pred` fail with `PermissionDenied`.
    pub fn failing(pred: impl Fn(&ControlCall) -> bool + Send + Sync + 'static) -> Self {
        Self {
            fail_when: Box::new(pred),
            ..Self::default()
        }
    }

    pub fn with_record(mut self, path: impl Into<PathBuf>, record: FileProvenance) -> Self {
        self.records.insert(path.into(), record);
        self
    }

    pub fn calls(&self) -> Vec<ControlCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ControlCall) -> io::Result<()> {
        let fail = (self.fail_when)(&call);
        self.calls.lock().unwrap().push(call);
        if fail {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        } else {
            Ok(())
        }
    }
}

impl ProvenanceControl for FakeControl {
    fn enabled(&self) -> io::Result<bool> {
        self.record(ControlCall::GetEnabled).map(|_| self.enabled)
    }

    fn set_enabled(&self, on: bool) -> io::Result<()> {
        self.record(ControlCall::SetEnabled(on))
    }

    fn all(&self) -> io::Result<bool> {
        self.record(ControlCall::GetAll).map(|_| self.all)
    }

    fn set_all(&self, on: bool) -> io::Result<()> {
        self.record(ControlCall::SetAll(on))
    }

    fn filter(&self, kind: FilterKind) -> io::Result<u32> {
        self.record(ControlCall::GetFilter(kind))
            .map(|_| self.masks.get(kind))
    }

    fn add_filter(&self, kind: FilterKind, id: u32) -> io::Result<()> {
        self.record(ControlCall::AddFilter(kind, id))
    }

    fn remove_filter(&self, kind: FilterKind, id: u32) -> io::Result<()> {
        self.record(ControlCall::RemoveFilter(kind, id))
    }

    fn reset_filter(&self, kind: FilterKind) -> io::Result<()> {
        self.record(ControlCall::ResetFilter(kind))
    }

    fn read_file(&self, path: &Path) -> io::Result<FileProvenance> {
        self.record(ControlCall::ReadFile(path.to_path_buf()))?;
        self.records
            .get(path)
            .copied()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }

    fn track_file(&self, path: &Path, on: bool) -> io::Result<()> {
        self.record(ControlCall::TrackFile(path.to_path_buf(), on))
    }

    fn propagate_file(&self, path: &Path, on: bool) -> io::Result<()> {
        self.record(ControlCall::PropagateFile(path.to_path_buf(), on))
    }

    fn taint_file(&self, path: &Path, taint: u64) -> io::Result<()> {
        self.record(ControlCall::TaintFile(path.to_path_buf(), taint))
    }

    fn opaque_file(&self, path: &Path, on: bool) -> io::Result<()> {
        self.record(ControlCall::OpaqueFile(path.to_path_buf(), on))
    }
}

/// Container wired to the given fake.
pub fn container(fake: Arc<FakeControl>) -> ServiceContainer {
    ServiceContainer::with_deps(Settings::default(), fake)
}

/// Failed calls carried by a control error.
pub fn failures(err: &ApplicationError) -> &[CallFailure] {
    match err {
        ApplicationError::ControlFailed { failures, .. } => failures.as_slice(),
        other => panic!("expected a control failure, got: {other}"),
    }
}
