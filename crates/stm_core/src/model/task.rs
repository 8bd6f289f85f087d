//! Task domain model.
//!
//! # Responsibility
//! - Define the assignable unit of work inside a project.
//! - Keep the process-point range valid for every constructed value.
//!
//! # Invariants
//! - `max_process_points >= 1`.
//! - `process_points <= max_process_points`.
//! - At most one assignee, stored as an identifying handle only.

use crate::model::user::{User, UserId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

string_id!(
    /// Opaque task identifier issued by the remote service.
    TaskId
);

/// Opaque map geometry payload (GeoJSON feature text on the wire).
///
/// The core never inspects it; it is carried along with the task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(String);

impl Geometry {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Handle to the user assigned to a task.
///
/// The user entity itself stays owned by the project's membership list; the
/// name is kept only as a display hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedUser {
    pub id: UserId,
    pub name: Option<String>,
}

impl From<&User> for AssignedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: Some(user.name.clone()),
        }
    }
}

/// Task value validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyId,
    MaxProcessPointsTooLow,
    ProcessPointsOutOfRange { points: u32, max: u32 },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "task id must not be empty"),
            Self::MaxProcessPointsTooLow => {
                write!(f, "max process points must be at least 1")
            }
            Self::ProcessPointsOutOfRange { points, max } => {
                write!(f, "process points of task are out of range ({points} / {max})")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Geo-referenced unit of assignable work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    id: TaskId,
    name: String,
    process_points: u32,
    max_process_points: u32,
    geometry: Geometry,
    assigned_user: Option<AssignedUser>,
}

impl Task {
    /// Creates an unassigned task.
    ///
    /// # Errors
    /// - `EmptyId` when `id` is blank.
    /// - `MaxProcessPointsTooLow` when `max_process_points == 0`.
    /// - `ProcessPointsOutOfRange` when `process_points > max_process_points`.
    pub fn new(
        id: impl Into<TaskId>,
        name: impl Into<String>,
        process_points: u32,
        max_process_points: u32,
        geometry: Geometry,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id: id.into(),
            name: name.into(),
            process_points,
            max_process_points,
            geometry,
            assigned_user: None,
        };
        task.validate()?;
        Ok(task)
    }

    /// Checks the value invariants of this task.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_blank() {
            return Err(TaskValidationError::EmptyId);
        }
        if self.max_process_points < 1 {
            return Err(TaskValidationError::MaxProcessPointsTooLow);
        }
        check_points(self.process_points, self.max_process_points)
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn process_points(&self) -> u32 {
        self.process_points
    }

    pub fn max_process_points(&self) -> u32 {
        self.max_process_points
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn assigned_user(&self) -> Option<&AssignedUser> {
        self.assigned_user.as_ref()
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_user.is_some()
    }

    pub fn is_assigned_to(&self, user_id: &UserId) -> bool {
        self.assigned_user
            .as_ref()
            .is_some_and(|assigned| &assigned.id == user_id)
    }

    /// Returns whether all process points are reached.
    pub fn is_done(&self) -> bool {
        self.process_points == self.max_process_points
    }

    /// Checks whether `points` is a valid new progress value for this task.
    pub fn check_process_points(&self, points: u32) -> Result<(), TaskValidationError> {
        check_points(points, self.max_process_points)
    }

    /// Returns a copy assigned to `user`, replacing any previous assignee.
    pub fn with_assignee(&self, user: &User) -> Self {
        Self {
            assigned_user: Some(AssignedUser::from(user)),
            ..self.clone()
        }
    }

    pub fn without_assignee(&self) -> Self {
        Self {
            assigned_user: None,
            ..self.clone()
        }
    }

    /// Returns a copy with updated progress.
    pub fn with_process_points(&self, points: u32) -> Result<Self, TaskValidationError> {
        self.check_process_points(points)?;
        Ok(Self {
            process_points: points,
            ..self.clone()
        })
    }
}

fn check_points(points: u32, max: u32) -> Result<(), TaskValidationError> {
    if points > max {
        return Err(TaskValidationError::ProcessPointsOutOfRange { points, max });
    }
    Ok(())
}

/// Wire shape of a task as exchanged with the remote service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: TaskId,
    #[serde(default)]
    name: String,
    process_points: u32,
    max_process_points: u32,
    #[serde(default)]
    geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assigned_user: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assigned_user_name: Option<String>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        // The remote side reports "no assignee" as an empty string.
        let assigned_user = record
            .assigned_user
            .filter(|id| !id.is_blank())
            .map(|id| AssignedUser {
                id,
                name: record.assigned_user_name,
            });
        let task = Self {
            id: record.id,
            name: record.name,
            process_points: record.process_points,
            max_process_points: record.max_process_points,
            geometry: record.geometry,
            assigned_user,
        };
        task.validate()?;
        Ok(task)
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        let (assigned_user, assigned_user_name) = match task.assigned_user {
            Some(assigned) => (Some(assigned.id), assigned.name),
            None => (None, None),
        };
        Self {
            id: task.id,
            name: task.name,
            process_points: task.process_points,
            max_process_points: task.max_process_points,
            geometry: task.geometry,
            assigned_user,
            assigned_user_name,
        }
    }
}
