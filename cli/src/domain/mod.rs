//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod progress;
pub mod push;
pub mod target;

pub use config::{PushConfig, set_config_value, validate_config_key, validate_config_value};
pub use error::{ApplyError, ConfigError, OperationError, PushError, TargetError};
pub use progress::{DisplayContext, ProgressEvent, Warnings, render};
pub use push::{Application, ApplicationConfig, CommandLineSettings, ManifestApplication};
pub use target::{Scope, Target, check_target};
