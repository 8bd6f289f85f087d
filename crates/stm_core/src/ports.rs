//! Contracts of the collaborators the core depends on.
//!
//! # Responsibility
//! - Describe authentication, remote calls, navigation and notifications as
//!   traits so the presentation layer can plug in its own implementations.
//!
//! # Invariants
//! - No port call blocks. Remote results arrive later through a
//!   [`Completion`] callback.
//! - A successful mutating remote call is eventually followed by a
//!   `project_changed` emission carrying the confirmed snapshot.

use crate::model::project::ProjectId;
use crate::model::task::TaskId;
use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Remote call failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The remote service answered and refused the request.
    Rejected { message: String },
    /// The remote service could not be reached.
    Unreachable { message: String },
}

impl TransportError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { message } => write!(f, "remote call rejected: {message}"),
            Self::Unreachable { message } => write!(f, "remote service unreachable: {message}"),
        }
    }
}

impl Error for TransportError {}

pub type TransportResult = Result<(), TransportError>;

/// One-shot callback invoked with the outcome of a remote call.
pub type Completion = Box<dyn FnOnce(TransportResult)>;

/// Navigation target inside the client application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Destination(String);

impl Destination {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Project overview, the landing page after an eviction.
    pub fn manager() -> Self {
        Self::new("/manager")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::manager()
    }
}

impl Display for Destination {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the authenticated user's identity.
pub trait Authenticator {
    fn current_user_id(&self) -> UserId;
}

/// Remote service requests.
///
/// Implementations must invoke `done` exactly once, at some later point.
pub trait Transport {
    fn remove_user(&self, project_id: &ProjectId, user_id: &UserId, done: Completion);
    fn invite_user(&self, project_id: &ProjectId, user_id: &UserId, done: Completion);
    fn leave_project(&self, project_id: &ProjectId, done: Completion);
    fn delete_project(&self, project_id: &ProjectId, done: Completion);
    fn assign_task(&self, task_id: &TaskId, user_id: &UserId, done: Completion);
    fn unassign_task(&self, task_id: &TaskId, done: Completion);
    fn set_process_points(&self, task_id: &TaskId, points: u32, done: Completion);
}

/// Router of the presentation layer.
pub trait Navigator {
    fn navigate_to(&self, destination: &Destination);
}

/// Fire-and-forget user notifications.
pub trait Notifier {
    fn add_warning(&self, message: &str);
    fn add_error(&self, message: &str);
}
