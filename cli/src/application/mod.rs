//! Application layer: port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain`, never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod ports;
pub mod services;
pub mod streams;

pub use ports::{ConfigStore, PushActor, UserInterface};
pub use streams::{ApplySender, ApplyStreams, apply_channel};
