//! Project-level event streams shared by every open project view.

use crate::events::broadcast::{Broadcast, Subscription};
use crate::model::project::{Project, ProjectId};
use log::debug;
use serde::{Deserialize, Serialize};

/// One project-level event as produced by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ProjectEvent {
    /// Full updated snapshot of a project.
    Changed(Project),
    /// The project was permanently removed.
    Deleted(ProjectId),
    /// A member was removed from the project.
    UserRemoved(ProjectId),
}

impl ProjectEvent {
    pub fn project_id(&self) -> &ProjectId {
        match self {
            Self::Changed(project) => project.id(),
            Self::Deleted(id) | Self::UserRemoved(id) => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Changed(_) => "project_changed",
            Self::Deleted(_) => "project_deleted",
            Self::UserRemoved(_) => "project_user_removed",
        }
    }
}

/// Three independent hot streams of project events.
///
/// The bus is a relay, not a store: it keeps no project state. Cloning yields
/// another handle to the same streams.
#[derive(Clone, Default)]
pub struct ProjectEventBus {
    changed: Broadcast<Project>,
    deleted: Broadcast<ProjectId>,
    user_removed: Broadcast<ProjectId>,
}

impl ProjectEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_project_changed(&self, handler: impl Fn(&Project) + 'static) -> Subscription {
        self.changed.subscribe(handler)
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_project_deleted(&self, handler: impl Fn(&ProjectId) + 'static) -> Subscription {
        self.deleted.subscribe(handler)
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_project_user_removed(
        &self,
        handler: impl Fn(&ProjectId) + 'static,
    ) -> Subscription {
        self.user_removed.subscribe(handler)
    }

    pub fn publish_project_changed(&self, project: &Project) {
        self.changed.emit(project);
    }

    pub fn publish_project_deleted(&self, project_id: &ProjectId) {
        self.deleted.emit(project_id);
    }

    pub fn publish_project_user_removed(&self, project_id: &ProjectId) {
        self.user_removed.emit(project_id);
    }

    /// Routes `event` to its stream.
    pub fn publish(&self, event: &ProjectEvent) {
        debug!(
            "event={} module=events status=publish project_id={}",
            event.kind(),
            event.project_id()
        );
        match event {
            ProjectEvent::Changed(project) => self.publish_project_changed(project),
            ProjectEvent::Deleted(id) => self.publish_project_deleted(id),
            ProjectEvent::UserRemoved(id) => self.publish_project_user_removed(id),
        }
    }

    /// Total subscriber count across the three streams.
    pub fn subscriber_count(&self) -> usize {
        self.changed.subscriber_count()
            + self.deleted.subscriber_count()
            + self.user_removed.subscriber_count()
    }
}
