//! Infrastructure layer: concrete implementations of the application ports.

pub mod config;
pub mod fs;
pub mod local_actor;
pub mod registry;

pub use config::{YamlConfigStore, push_home};
pub use local_actor::LocalPushActor;
pub use registry::AppRegistry;
