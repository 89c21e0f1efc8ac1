//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod cutover;
pub mod deploy;
pub mod manifest;
pub mod platform;
pub mod promote;
pub mod session;
pub mod tracker;
