//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app;
pub mod config;
pub mod error;
pub mod route;
pub mod tracker;

pub use app::{AppInstance, AppState};
pub use config::{BuildConfig, DeployConfig, DeploymentTarget, EnvSettings, ToolSettings};
pub use error::{ConfigError, DeployError, PlatformError, RouteTableError, TrackerError};
pub use route::{AppRoute, Route, RouteBinding, RouteFilter};
pub use tracker::{ChangeRequest, SemverBump, Story};
