//! Terminal output formatting
//!
//! Diagnostics go to stderr with colored prefixes; data is rendered into any
//! `Write` so it can be captured. Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE.

use std::io::{self, Write};

use colored::Colorize;

use crate::application::services::StateReport;
use crate::domain::{FileProvenance, FilterKind};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

fn on_off(on: bool) -> &'static str {
    if on {
        "enabled"
    } else {
        "disabled"
    }
}

/// Render capture flags and filter masks.
pub fn write_state(out: &mut dyn Write, report: &StateReport) -> io::Result<()> {
    let masks = &report.masks;
    writeln!(out, "Provenance capture:")?;
    writeln!(out, "- capture {};", on_off(report.capture.enabled))?;
    writeln!(out, "- all {};", on_off(report.capture.all))?;
    writeln!(out)?;
    writeln!(out, "{} ({:x}):", FilterKind::Node.label(), masks.node)?;
    writeln!(out, "{} ({:x}):", FilterKind::Relation.label(), masks.relation)?;
    writeln!(out)?;
    writeln!(
        out,
        "{} ({:x}):",
        FilterKind::PropagateNode.label(),
        masks.propagate_node
    )?;
    writeln!(
        out,
        "{} ({:x}):",
        FilterKind::PropagateRelation.label(),
        masks.propagate_relation
    )
}

/// Render a file provenance record.
pub fn write_record(out: &mut dyn Write, record: &FileProvenance) -> io::Result<()> {
    let id = &record.identifier;
    writeln!(out, "Identifier: {}", id.encode())?;
    writeln!(out, "Type: {}", id.node_type)?;
    writeln!(out, "ID: {}", id.id)?;
    writeln!(out, "Boot ID: {}", id.boot_id)?;
    writeln!(out, "Machine ID: {}", id.machine_id)?;
    writeln!(out, "Taint: {}", record.taint.encode())?;
    writeln!(out)?;
    if record.is_tracked() {
        writeln!(out, "File is tracked.")?;
    } else {
        writeln!(out, "File is not tracked.")?;
    }
    if record.is_opaque() {
        writeln!(out, "File is opaque.")?;
    } else {
        writeln!(out, "File is not opaque.")?;
    }
    if record.propagates() {
        writeln!(out, "File propagates tracking.")
    } else {
        writeln!(out, "File is not propagating tracking.")
    }
}
