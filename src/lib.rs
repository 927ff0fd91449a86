//! Library crate for tcp-probe-rs exposing the probe, run loop and reporting.
pub mod probe;
pub mod report;
pub mod runner;
pub mod target;
pub mod types;
