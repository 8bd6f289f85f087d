//! Consistency and notification core of the collaborative task manager.
//! This crate is the single source of truth for project/task view invariants.

pub mod config;
pub mod events;
pub mod logging;
pub mod model;
pub mod policy;
pub mod ports;
pub mod registry;
mod remote;
pub mod session;
pub mod view;

pub use config::{ConfigError, CoreConfig, LoggingConfig};
pub use events::broadcast::{Broadcast, Subscription, SubscriptionScope};
pub use events::project_bus::{ProjectEvent, ProjectEventBus};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::project::{Project, ProjectId, ProjectValidationError};
pub use model::task::{AssignedUser, Geometry, Task, TaskId, TaskValidationError};
pub use model::user::{User, UserId};
pub use policy::{
    is_owner, should_notify_on_deletion, EvictionReason, PROJECT_REMOVED_WARNING,
    USER_REMOVED_WARNING,
};
pub use ports::{
    Authenticator, Completion, Destination, Navigator, Notifier, Transport, TransportError,
    TransportResult,
};
pub use registry::{RegistryError, TaskRegistry};
pub use session::Session;
pub use view::{ProjectView, ViewContext, ViewError, ViewState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
