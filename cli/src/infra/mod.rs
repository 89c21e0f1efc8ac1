//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, HTTP
//! clients for the platform and the trackers, filesystem access, and
//! configuration loading.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod cf_api;
pub mod cf_cli;
pub mod cf_install;
pub mod command_runner;
pub mod config;
pub mod fs;
pub mod jira;
pub mod servicenow;
