//! Membership and ownership decisions.
//!
//! Pure functions only; the project view applies them to incoming events.

use crate::model::project::Project;
use crate::model::user::UserId;

/// Warning shown to non-owners when the open project was deleted.
pub const PROJECT_REMOVED_WARNING: &str = "This project has been removed";
/// Warning shown when the viewer was removed from the open project.
pub const USER_REMOVED_WARNING: &str = "You have been removed from this project";

/// Why a project view was forced to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    ProjectDeleted,
    UserRemoved,
}

impl EvictionReason {
    /// Warning for `viewer`, or `None` when the viewer gets no warning.
    ///
    /// A deleted project only warns non-owners since the owner caused it.
    /// Member removal always warns.
    pub fn warning(self, project: &Project, viewer: &UserId) -> Option<&'static str> {
        match self {
            Self::ProjectDeleted => {
                should_notify_on_deletion(project, viewer).then_some(PROJECT_REMOVED_WARNING)
            }
            Self::UserRemoved => Some(USER_REMOVED_WARNING),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ProjectDeleted => "project_deleted",
            Self::UserRemoved => "user_removed",
        }
    }
}

pub fn is_owner(project: &Project, user_id: &UserId) -> bool {
    &project.owner().id == user_id
}

pub fn should_notify_on_deletion(project: &Project, user_id: &UserId) -> bool {
    !is_owner(project, user_id)
}

#[cfg(test)]
mod tests {
    use super::{
        is_owner, should_notify_on_deletion, EvictionReason, PROJECT_REMOVED_WARNING,
        USER_REMOVED_WARNING,
    };
    use crate::model::project::Project;
    use crate::model::user::{User, UserId};

    fn project() -> Project {
        Project::new("p1", "Roads", User::new("u1", "Maria"))
            .expect("valid project")
            .with_member(User::new("u2", "Peter"))
    }

    #[test]
    fn ownership_is_decided_by_id_only() {
        let project = project();
        for (user, owner) in [("u1", true), ("u2", false), ("u3", false), ("", false)] {
            let id = UserId::new(user);
            assert_eq!(is_owner(&project, &id), owner, "user `{user}`");
            assert_eq!(should_notify_on_deletion(&project, &id), !owner);
        }
    }

    #[test]
    fn deletion_warns_only_non_owners() {
        let project = project();
        assert_eq!(
            EvictionReason::ProjectDeleted.warning(&project, &UserId::new("u1")),
            None
        );
        assert_eq!(
            EvictionReason::ProjectDeleted.warning(&project, &UserId::new("u2")),
            Some(PROJECT_REMOVED_WARNING)
        );
    }

    #[test]
    fn removal_always_warns() {
        let project = project();
        for user in ["u1", "u2"] {
            assert_eq!(
                EvictionReason::UserRemoved.warning(&project, &UserId::new(user)),
                Some(USER_REMOVED_WARNING)
            );
        }
    }
}
