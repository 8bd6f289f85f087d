//! Project view controller.
//!
//! # Responsibility
//! - Own the in-memory snapshot of the project the user is looking at.
//! - Reconcile it with project events and evict the viewer when the project
//!   is deleted or the viewer was removed from it.
//! - Forward membership intents (remove, invite, leave, delete) to the
//!   transport.
//!
//! # Invariants
//! - Lifecycle is `Loading -> Active -> {Evicted, Closed}`; terminal states
//!   are never left.
//! - Only `Active` reacts to events. Events for another project id are stale
//!   and dropped.
//! - A `project_changed` snapshot replaces local state entirely.
//! - Leaving `Active` releases every bus subscription at once, discards the
//!   snapshot and clears a selection that pointed into this project.
//! - An eviction produces at most one warning and exactly one navigation.

use crate::events::broadcast::SubscriptionScope;
use crate::events::project_bus::ProjectEventBus;
use crate::model::project::{Project, ProjectId};
use crate::model::user::{User, UserId};
use crate::policy::{self, EvictionReason};
use crate::ports::{Authenticator, Destination, Navigator, Notifier, Transport};
use crate::registry::TaskRegistry;
use crate::remote::report_failure;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::{Rc, Weak};

pub const REMOVE_USER_FAILED_ERROR: &str = "Could not remove user";
pub const LEAVE_FAILED_ERROR: &str = "Could not leave project";
pub const DELETE_FAILED_ERROR: &str = "Could not delete project";
pub const DELETE_NOT_OWNER_ERROR: &str = "Only the owner can delete this project";

/// Error shown when inviting `user` failed.
pub fn invite_failed_error(user: &User) -> String {
    format!("Could not invite user '{}'", user.name)
}

/// Lifecycle state of a project view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Active,
    Evicted(EvictionReason),
    Closed,
}

impl ViewState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Active => "active",
            Self::Evicted(_) => "evicted",
            Self::Closed => "closed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Evicted(_) | Self::Closed)
    }
}

/// Project view operation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// The operation needs an active project.
    NotActive { state: ViewState },
    /// `activate` was called on a view that already left `Loading`.
    NotLoading { state: ViewState },
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotActive { state } => {
                write!(f, "project view is not active (state: {})", state.as_str())
            }
            Self::NotLoading { state } => write!(
                f,
                "project view can only be activated while loading (state: {})",
                state.as_str()
            ),
        }
    }
}

impl Error for ViewError {}

/// Collaborators a project view works with.
#[derive(Clone)]
pub struct ViewContext {
    pub registry: TaskRegistry,
    pub bus: ProjectEventBus,
    pub authenticator: Rc<dyn Authenticator>,
    pub transport: Rc<dyn Transport>,
    pub notifier: Rc<dyn Notifier>,
    pub navigator: Rc<dyn Navigator>,
    pub eviction_destination: Destination,
}

struct ViewInner {
    ctx: ViewContext,
    state: Cell<ViewState>,
    project: RefCell<Option<Project>>,
    subscriptions: RefCell<SubscriptionScope>,
    // Set while this view found nothing to select and nobody selected since.
    awaiting_first_task: Cell<bool>,
}

/// Controller of one opened project.
///
/// Dropping the view closes it.
pub struct ProjectView {
    inner: Rc<ViewInner>,
}

impl ProjectView {
    /// Creates a view in `Loading` state.
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                ctx,
                state: Cell::new(ViewState::Loading),
                project: RefCell::new(None),
                subscriptions: RefCell::new(SubscriptionScope::new()),
                awaiting_first_task: Cell::new(false),
            }),
        }
    }

    /// Creates a view and activates it with an already resolved project.
    pub fn open(ctx: ViewContext, project: Project) -> Self {
        let view = Self::new(ctx);
        view.inner.enter_active(project);
        view
    }

    /// Moves a `Loading` view to `Active` with `project` as current state.
    ///
    /// Subscribes to the project event streams and selects the project's
    /// first task, or clears the selection when the project has no tasks.
    pub fn activate(&self, project: Project) -> Result<(), ViewError> {
        let state = self.inner.state.get();
        if state != ViewState::Loading {
            return Err(ViewError::NotLoading { state });
        }
        self.inner.enter_active(project);
        Ok(())
    }

    pub fn state(&self) -> ViewState {
        self.inner.state.get()
    }

    /// Reason of the eviction, once evicted.
    pub fn eviction_reason(&self) -> Option<EvictionReason> {
        match self.inner.state.get() {
            ViewState::Evicted(reason) => Some(reason),
            _ => None,
        }
    }

    /// Current snapshot; `None` unless active.
    pub fn project(&self) -> Option<Project> {
        self.inner.project.borrow().clone()
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.inner
            .project
            .borrow()
            .as_ref()
            .map(|project| project.id().clone())
    }

    /// Whether the authenticated user owns the current project.
    ///
    /// `false` when no project is active.
    pub fn is_owner(&self) -> bool {
        let viewer = self.inner.ctx.authenticator.current_user_id();
        self.inner
            .project
            .borrow()
            .as_ref()
            .is_some_and(|project| policy::is_owner(project, &viewer))
    }

    /// Requests removal of `user_id` from the project.
    ///
    /// Local state is left as is; a confirmed snapshot follows on success.
    pub fn on_user_removed(&self, user_id: &UserId) -> Result<(), ViewError> {
        let project_id = self.require_active()?;
        self.inner.ctx.transport.remove_user(
            &project_id,
            user_id,
            report_failure(
                &self.inner.ctx.notifier,
                "remove_user",
                format!("{project_id}/{user_id}"),
                REMOVE_USER_FAILED_ERROR.to_string(),
            ),
        );
        Ok(())
    }

    /// Requests that `user` is invited to the project.
    pub fn on_user_invited(&self, user: &User) -> Result<(), ViewError> {
        let project_id = self.require_active()?;
        self.inner.ctx.transport.invite_user(
            &project_id,
            &user.id,
            report_failure(
                &self.inner.ctx.notifier,
                "invite_user",
                format!("{project_id}/{}", user.id),
                invite_failed_error(user),
            ),
        );
        Ok(())
    }

    /// Requests that the viewer leaves the project.
    ///
    /// The eviction itself happens when the matching event arrives.
    pub fn leave_project(&self) -> Result<(), ViewError> {
        let project_id = self.require_active()?;
        self.inner.ctx.transport.leave_project(
            &project_id,
            report_failure(
                &self.inner.ctx.notifier,
                "leave_project",
                project_id.to_string(),
                LEAVE_FAILED_ERROR.to_string(),
            ),
        );
        Ok(())
    }

    /// Requests deletion of the project. Owner only.
    ///
    /// A non-owner gets an error notification and nothing is sent.
    pub fn delete_project(&self) -> Result<(), ViewError> {
        let project_id = self.require_active()?;
        if !self.is_owner() {
            warn!("event=delete_project module=view status=refused project_id={project_id} reason=not_owner");
            self.inner.ctx.notifier.add_error(DELETE_NOT_OWNER_ERROR);
            return Ok(());
        }
        self.inner.ctx.transport.delete_project(
            &project_id,
            report_failure(
                &self.inner.ctx.notifier,
                "delete_project",
                project_id.to_string(),
                DELETE_FAILED_ERROR.to_string(),
            ),
        );
        Ok(())
    }

    /// Closes the view without navigation or notification.
    ///
    /// No-op once the view is already evicted or closed.
    pub fn close(&self) {
        let state = self.inner.state.get();
        if state.is_terminal() {
            return;
        }
        self.inner.state.set(ViewState::Closed);
        let project = self.inner.leave_active();
        info!(
            "event=view_closed module=view status=ok project_id={} from={}",
            project
                .as_ref()
                .map(|p| p.id().as_str())
                .unwrap_or("none"),
            state.as_str()
        );
    }

    fn require_active(&self) -> Result<ProjectId, ViewError> {
        let state = self.inner.state.get();
        match (state, self.project_id()) {
            (ViewState::Active, Some(id)) => Ok(id),
            _ => Err(ViewError::NotActive { state }),
        }
    }
}

impl Drop for ProjectView {
    fn drop(&mut self) {
        self.close();
    }
}

impl ViewInner {
    fn enter_active(self: &Rc<Self>, project: Project) {
        info!(
            "event=view_opened module=view status=ok project_id={} tasks={}",
            project.id(),
            project.tasks().len()
        );
        let first_task = project.first_task().cloned();
        *self.project.borrow_mut() = Some(project);
        self.state.set(ViewState::Active);
        self.subscribe();

        // An empty project leaves the selection alone; it may belong to another view.
        match first_task {
            Some(task) => self.ctx.registry.select_task(task),
            None => self.awaiting_first_task.set(true),
        }
    }

    fn subscribe(self: &Rc<Self>) {
        let bus = &self.ctx.bus;
        let mut scope = self.subscriptions.borrow_mut();

        let weak = Rc::downgrade(self);
        scope.hold(bus.on_project_changed(move |snapshot| {
            with_view(&weak, |view| view.handle_changed(snapshot));
        }));
        let weak = Rc::downgrade(self);
        scope.hold(bus.on_project_deleted(move |project_id| {
            with_view(&weak, |view| {
                view.handle_eviction(project_id, EvictionReason::ProjectDeleted)
            });
        }));
        let weak = Rc::downgrade(self);
        scope.hold(bus.on_project_user_removed(move |project_id| {
            with_view(&weak, |view| {
                view.handle_eviction(project_id, EvictionReason::UserRemoved)
            });
        }));
    }

    /// Returns whether an event for `project_id` concerns this view now.
    fn accepts(&self, kind: &str, project_id: &ProjectId) -> bool {
        let state = self.state.get();
        if state != ViewState::Active {
            debug!("event={kind} module=view status=ignored project_id={project_id} state={}", state.as_str());
            return false;
        }
        let current = self.project.borrow().as_ref().map(|p| p.id().clone());
        if current.as_ref() != Some(project_id) {
            debug!("event={kind} module=view status=stale project_id={project_id}");
            return false;
        }
        true
    }

    fn handle_changed(&self, snapshot: &Project) {
        if !self.accepts("project_changed", snapshot.id()) {
            return;
        }
        let previous = self.project.replace(Some(snapshot.clone()));
        info!(
            "event=project_changed module=view status=replaced project_id={} tasks={}",
            snapshot.id(),
            snapshot.tasks().len()
        );
        self.resync_selection(previous.as_ref(), snapshot);
    }

    /// Keeps the registry pointing at the current version of the selected task.
    fn resync_selection(&self, previous: Option<&Project>, snapshot: &Project) {
        let registry = &self.ctx.registry;
        let selected = registry.get_selected_task().ok();
        let Some(selected) = selected else {
            if self.awaiting_first_task.get() {
                if let Some(first) = snapshot.first_task() {
                    self.awaiting_first_task.set(false);
                    registry.select_task(first.clone());
                }
            }
            return;
        };
        self.awaiting_first_task.set(false);

        let belongs_here = previous.is_some_and(|p| p.task(selected.id()).is_some());
        if !belongs_here {
            return;
        }
        match snapshot.task(selected.id()) {
            Some(updated) if *updated != selected => registry.select_task(updated.clone()),
            Some(_) => {}
            None => match snapshot.first_task() {
                Some(first) => registry.select_task(first.clone()),
                None => {
                    registry.clear_selection();
                    self.awaiting_first_task.set(true);
                }
            },
        }
    }

    fn handle_eviction(&self, project_id: &ProjectId, reason: EvictionReason) {
        if !self.accepts(reason.as_str(), project_id) {
            return;
        }
        self.state.set(ViewState::Evicted(reason));
        let project = self.leave_active();

        let viewer = self.ctx.authenticator.current_user_id();
        let warning = project
            .as_ref()
            .and_then(|project| reason.warning(project, &viewer));
        info!(
            "event=view_evicted module=view status=ok project_id={project_id} reason={} warned={}",
            reason.as_str(),
            warning.is_some()
        );

        if let Some(message) = warning {
            self.ctx.notifier.add_warning(message);
        }
        self.ctx
            .navigator
            .navigate_to(&self.ctx.eviction_destination);
    }

    /// Releases subscriptions, discards the snapshot and clears a selection
    /// that pointed into it. Returns the discarded snapshot.
    fn leave_active(&self) -> Option<Project> {
        let released = self.subscriptions.borrow_mut().release_all();
        debug!("event=subscriptions_released module=view status=ok count={released}");

        let project = self.project.take();
        if let (Some(project), Some(selected)) =
            (project.as_ref(), self.ctx.registry.selected_task_id())
        {
            if project.task(&selected).is_some() {
                self.ctx.registry.clear_selection();
            }
        }
        project
    }
}

fn with_view(weak: &Weak<ViewInner>, f: impl FnOnce(&ViewInner)) {
    if let Some(view) = weak.upgrade() {
        f(&view);
    }
}
