//! provctl: control-plane client for the CamFlow provenance-capture LSM
//!
//! Layers, outermost first: `cli` (argument model and dispatch),
//! `application` (control service), `infrastructure` (securityfs transport and
//! wire codec), `domain` (records, filters, type names).

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
