//! Provenance control service
//!
//! One method per control operation. Each method issues its calls against the
//! `ProvenanceControl` boundary and turns the statuses into an
//! `ApplicationResult`. Nothing is cached between calls.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{CaptureState, FileProvenance, FilterKind, FilterMasks, TrackMode};
use crate::infrastructure::traits::ProvenanceControl;

/// A single call into the control plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCall {
    GetEnabled,
    SetEnabled(bool),
    GetAll,
    SetAll(bool),
    GetFilter(FilterKind),
    AddFilter(FilterKind, u32),
    RemoveFilter(FilterKind, u32),
    ResetFilter(FilterKind),
    ReadFile(PathBuf),
    TrackFile(PathBuf, bool),
    PropagateFile(PathBuf, bool),
    TaintFile(PathBuf, u64),
    OpaqueFile(PathBuf, bool),
}

impl fmt::Display for ControlCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlCall::GetEnabled => write!(f, "get capture state"),
            ControlCall::SetEnabled(on) => write!(f, "set capture {on}"),
            ControlCall::GetAll => write!(f, "get whole-system state"),
            ControlCall::SetAll(on) => write!(f, "set whole-system {on}"),
            ControlCall::GetFilter(kind) => write!(f, "get {kind}"),
            ControlCall::AddFilter(kind, id) => write!(f, "add {id:#x} to {kind}"),
            ControlCall::RemoveFilter(kind, id) => write!(f, "remove {id:#x} from {kind}"),
            ControlCall::ResetFilter(kind) => write!(f, "reset {kind}"),
            ControlCall::ReadFile(p) => write!(f, "read {}", p.display()),
            ControlCall::TrackFile(p, on) => write!(f, "set tracked={on} on {}", p.display()),
            ControlCall::PropagateFile(p, on) => {
                write!(f, "set propagate={on} on {}", p.display())
            }
            ControlCall::TaintFile(p, v) => write!(f, "apply taint {v} to {}", p.display()),
            ControlCall::OpaqueFile(p, on) => write!(f, "set opaque={on} on {}", p.display()),
        }
    }
}

/// Status of one issued call.
#[derive(Debug)]
pub struct CallOutcome {
    pub call: ControlCall,
    pub result: io::Result<()>,
}

/// A call that reported failure, with its own system error.
#[derive(Debug)]
pub struct CallFailure {
    pub call: ControlCall,
    pub source: io::Error,
}

/// Everything `-s` prints, plus any reads that fell back to defaults.
#[derive(Debug, Default)]
pub struct StateReport {
    pub capture: CaptureState,
    pub masks: FilterMasks,
    pub failures: Vec<CallFailure>,
}

/// Service issuing control operations against the provenance subsystem.
pub struct ControlService {
    control: Arc<dyn ProvenanceControl>,
}

impl ControlService {
    /// Create a new control service.
    pub fn new(control: Arc<dyn ProvenanceControl>) -> Self {
        Self { control }
    }

    /// Read both capture flags and all four filter masks.
    ///
    /// A failed read does not abort: the value falls back to its default and
    /// the failure is recorded in the report.
    #[instrument(skip(self))]
    pub fn state(&self) -> StateReport {
        let mut report = StateReport::default();

        match self.control.enabled() {
            Ok(on) => report.capture.enabled = on,
            Err(e) => report.failures.push(failure(ControlCall::GetEnabled, e)),
        }
        match self.control.all() {
            Ok(on) => report.capture.all = on,
            Err(e) => report.failures.push(failure(ControlCall::GetAll, e)),
        }
        for kind in [
            FilterKind::Node,
            FilterKind::Relation,
            FilterKind::PropagateNode,
            FilterKind::PropagateRelation,
        ] {
            match self.control.filter(kind) {
                Ok(mask) => report.masks.set(kind, mask),
                Err(e) => report.failures.push(failure(ControlCall::GetFilter(kind), e)),
            }
        }

        debug!(
            "state: capture={:?} masks={:?} failures={}",
            report.capture,
            report.masks,
            report.failures.len()
        );
        report
    }

    #[instrument(skip(self))]
    pub fn set_enabled(&self, on: bool) -> ApplicationResult<()> {
        let call = ControlCall::SetEnabled(on);
        let result = self.control.set_enabled(on);
        single(
            "Could not enable/disable provenance capture",
            CallOutcome { call, result },
        )
    }

    #[instrument(skip(self))]
    pub fn set_all(&self, on: bool) -> ApplicationResult<()> {
        let call = ControlCall::SetAll(on);
        let result = self.control.set_all(on);
        single(
            "Could not activate/deactivate whole-system provenance capture",
            CallOutcome { call, result },
        )
    }

    #[instrument(skip(self))]
    pub fn read_file(&self, path: &Path) -> ApplicationResult<FileProvenance> {
        self.control
            .read_file(path)
            .map_err(|e| ApplicationError::ControlFailed {
                context: "Could not read file provenance information".to_string(),
                failures: vec![failure(ControlCall::ReadFile(path.to_path_buf()), e)],
            })
    }

    /// Set tracking and propagation for a file.
    ///
    /// Both calls are always issued, even if the first one fails.
    #[instrument(skip(self))]
    pub fn track(&self, path: &Path, mode: TrackMode) -> ApplicationResult<()> {
        let tracked = mode.tracked();
        let propagate = mode.propagate();

        let outcomes = vec![
            CallOutcome {
                call: ControlCall::TrackFile(path.to_path_buf(), tracked),
                result: self.control.track_file(path, tracked),
            },
            CallOutcome {
                call: ControlCall::PropagateFile(path.to_path_buf(), propagate),
                result: self.control.propagate_file(path, propagate),
            },
        ];
        collect(
            "Could not change tracking settings for this file",
            outcomes,
        )
    }

    #[instrument(skip(self))]
    pub fn taint(&self, path: &Path, value: u64) -> ApplicationResult<()> {
        let call = ControlCall::TaintFile(path.to_path_buf(), value);
        let result = self.control.taint_file(path, value);
        single(
            "Could not change taint settings for this file",
            CallOutcome { call, result },
        )
    }

    #[instrument(skip(self))]
    pub fn opaque(&self, path: &Path, on: bool) -> ApplicationResult<()> {
        let call = ControlCall::OpaqueFile(path.to_path_buf(), on);
        let result = self.control.opaque_file(path, on);
        single(
            "Could not change opacity settings for this file",
            CallOutcome { call, result },
        )
    }

    /// Add or remove a type id from one filter set.
    #[instrument(skip(self))]
    pub fn filter(&self, kind: FilterKind, id: u32, add: bool) -> ApplicationResult<()> {
        let outcome = if add {
            CallOutcome {
                call: ControlCall::AddFilter(kind, id),
                result: self.control.add_filter(kind, id),
            }
        } else {
            CallOutcome {
                call: ControlCall::RemoveFilter(kind, id),
                result: self.control.remove_filter(kind, id),
            }
        };
        let context = match kind {
            FilterKind::PropagateNode | FilterKind::PropagateRelation => {
                "Could not change propagation settings"
            }
            FilterKind::Node | FilterKind::Relation => "Could not change filter settings",
        };
        single(context, outcome)
    }

    /// Reset all four filter sets. Every reset is issued regardless of failures.
    #[instrument(skip(self))]
    pub fn reset_filters(&self) -> ApplicationResult<()> {
        let outcomes = FilterKind::ALL
            .iter()
            .map(|kind| CallOutcome {
                call: ControlCall::ResetFilter(*kind),
                result: self.control.reset_filter(*kind),
            })
            .collect();
        collect("Could not reset filters", outcomes)
    }
}

fn failure(call: ControlCall, source: io::Error) -> CallFailure {
    debug!("{} failed: {}", call, source);
    CallFailure { call, source }
}

fn single(context: &str, outcome: CallOutcome) -> ApplicationResult<()> {
    collect(context, vec![outcome])
}

fn collect(context: &str, outcomes: Vec<CallOutcome>) -> ApplicationResult<()> {
    let failures: Vec<CallFailure> = outcomes
        .into_iter()
        .filter_map(|o| match o.result {
            Ok(()) => {
                debug!("{} ok", o.call);
                None
            }
            Err(e) => Some(failure(o.call, e)),
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ApplicationError::ControlFailed {
            context: context.to_string(),
            failures,
        })
    }
}
