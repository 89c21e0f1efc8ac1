//! Unit tests for the cfdeploy CLI
//!
//! These tests use recording fakes of the platform and tracker ports and run
//! fast without external I/O.

mod cutover_service;
mod helpers;
mod mocks;
mod tracker_service;
