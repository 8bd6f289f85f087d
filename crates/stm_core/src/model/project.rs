//! Project domain model.
//!
//! # Invariants
//! - The owner is a member even when not listed in `members`.
//! - Members are unique by user id.
//! - Task ids are unique; task order is display order and the first task is
//!   the default selection.

use crate::model::task::{Task, TaskId, TaskValidationError};
use crate::model::user::{User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

string_id!(
    /// Opaque project identifier issued by the remote service.
    ProjectId
);

/// Project value validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyId,
    DuplicateTask(TaskId),
    InvalidTask(TaskValidationError),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "project id must not be empty"),
            Self::DuplicateTask(id) => write!(f, "task listed twice in project: {id}"),
            Self::InvalidTask(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTask(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for ProjectValidationError {
    fn from(value: TaskValidationError) -> Self {
        Self::InvalidTask(value)
    }
}

/// Collaborative workspace owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProjectRecord", into = "ProjectRecord")]
pub struct Project {
    id: ProjectId,
    name: String,
    owner: User,
    members: Vec<User>,
    tasks: Vec<Task>,
    needs_assignment: bool,
}

impl Project {
    /// Creates a project with no tasks and the owner as only member.
    pub fn new(
        id: impl Into<ProjectId>,
        name: impl Into<String>,
        owner: User,
    ) -> Result<Self, ProjectValidationError> {
        let project = Self {
            id: id.into(),
            name: name.into(),
            owner,
            members: Vec::new(),
            tasks: Vec::new(),
            needs_assignment: false,
        };
        project.validate()?;
        Ok(project)
    }

    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.id.is_blank() {
            return Err(ProjectValidationError::EmptyId);
        }
        let mut seen = HashSet::new();
        for task in &self.tasks {
            task.validate()?;
            if !seen.insert(task.id()) {
                return Err(ProjectValidationError::DuplicateTask(task.id().clone()));
            }
        }
        Ok(())
    }

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &User {
        &self.owner
    }

    /// Explicitly listed members, which may or may not repeat the owner.
    pub fn members(&self) -> &[User] {
        &self.members
    }

    /// All members with the owner first and no duplicates.
    pub fn all_members(&self) -> impl Iterator<Item = &User> {
        std::iter::once(&self.owner).chain(self.members.iter().filter(|m| **m != self.owner))
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        &self.owner.id == user_id || self.members.iter().any(|m| &m.id == user_id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Default selection when the project is opened.
    pub fn first_task(&self) -> Option<&Task> {
        self.tasks.first()
    }

    /// When set, only the assignee may change a task's process points.
    pub fn needs_assignment(&self) -> bool {
        self.needs_assignment
    }

    pub fn total_process_points(&self) -> u64 {
        self.tasks
            .iter()
            .map(|task| u64::from(task.max_process_points()))
            .sum()
    }

    pub fn done_process_points(&self) -> u64 {
        self.tasks
            .iter()
            .map(|task| u64::from(task.process_points()))
            .sum()
    }

    /// Returns a copy with `user` added to the member list.
    pub fn with_member(&self, user: User) -> Self {
        let mut next = self.clone();
        if !next.is_member(&user.id) {
            next.members.push(user);
        }
        next
    }

    /// Returns a copy without `user_id` in the member list.
    ///
    /// The owner cannot be removed this way and stays a member. Tasks assigned
    /// to the removed user are unassigned.
    pub fn without_member(&self, user_id: &UserId) -> Self {
        let mut next = self.clone();
        next.members.retain(|m| &m.id != user_id);
        if &next.owner.id != user_id {
            next.tasks = next
                .tasks
                .iter()
                .map(|task| {
                    if task.is_assigned_to(user_id) {
                        task.without_assignee()
                    } else {
                        task.clone()
                    }
                })
                .collect();
        }
        next
    }

    /// Returns a copy where `task` replaces the task with the same id, or is
    /// appended when no such task exists.
    pub fn with_task(&self, task: Task) -> Self {
        let mut next = self.clone();
        match next.tasks.iter_mut().find(|t| t.id() == task.id()) {
            Some(slot) => *slot = task,
            None => next.tasks.push(task),
        }
        next
    }

    pub fn with_needs_assignment(&self, needs_assignment: bool) -> Self {
        Self {
            needs_assignment,
            ..self.clone()
        }
    }
}

/// Wire shape of a project snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRecord {
    id: ProjectId,
    #[serde(default)]
    name: String,
    owner: User,
    #[serde(default)]
    members: Vec<User>,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    needs_assignment: bool,
}

impl TryFrom<ProjectRecord> for Project {
    type Error = ProjectValidationError;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        let mut members: Vec<User> = Vec::with_capacity(record.members.len());
        for user in record.members {
            if !members.contains(&user) {
                members.push(user);
            }
        }
        let project = Self {
            id: record.id,
            name: record.name,
            owner: record.owner,
            members,
            tasks: record.tasks,
            needs_assignment: record.needs_assignment,
        };
        project.validate()?;
        Ok(project)
    }
}

impl From<Project> for ProjectRecord {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            owner: project.owner,
            members: project.members,
            tasks: project.tasks,
            needs_assignment: project.needs_assignment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectValidationError};
    use crate::model::task::{Geometry, Task};
    use crate::model::user::{User, UserId};

    fn project() -> Project {
        Project::new("p1", "Roads", User::new("u1", "Maria")).expect("valid project")
    }

    fn task(id: &str, points: u32, max: u32) -> Task {
        Task::new(id, id, points, max, Geometry::default()).expect("valid task")
    }

    #[test]
    fn owner_is_implicit_member() {
        let project = project();
        assert!(project.members().is_empty());
        assert!(project.is_member(&UserId::new("u1")));
        assert!(!project.is_member(&UserId::new("u2")));
        assert_eq!(project.all_members().count(), 1);
    }

    #[test]
    fn with_member_is_idempotent_and_all_members_skips_owner_duplicate() {
        let project = project()
            .with_member(User::new("u2", "Peter"))
            .with_member(User::new("u2", "Peter"))
            .with_member(User::new("u1", "Maria"));
        assert_eq!(project.members().len(), 1);
        assert_eq!(project.all_members().count(), 2);
    }

    #[test]
    fn without_member_unassigns_their_tasks_and_keeps_owner() {
        let peter = User::new("u2", "Peter");
        let project = project()
            .with_member(peter.clone())
            .with_task(task("t1", 0, 10).with_assignee(&peter));

        let next = project.without_member(&peter.id);
        assert!(!next.is_member(&peter.id));
        assert!(!next.tasks()[0].is_assigned());
        assert!(project.tasks()[0].is_assigned());

        let still_owned = next.without_member(&UserId::new("u1"));
        assert!(still_owned.is_member(&UserId::new("u1")));
    }

    #[test]
    fn with_task_replaces_in_place_and_keeps_order() {
        let project = project()
            .with_task(task("t1", 0, 10))
            .with_task(task("t2", 0, 5))
            .with_task(task("t1", 3, 10));

        let ids: Vec<&str> = project.tasks().iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(project.first_task().map(Task::process_points), Some(3));
        assert_eq!(project.total_process_points(), 15);
        assert_eq!(project.done_process_points(), 3);
    }

    #[test]
    fn new_rejects_blank_id() {
        let err = Project::new("", "x", User::new("u1", "Maria")).unwrap_err();
        assert_eq!(err, ProjectValidationError::EmptyId);
    }
}
