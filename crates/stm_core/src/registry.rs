//! Session-scoped selected-task registry.
//!
//! # Responsibility
//! - Hold the task currently focused by the session and broadcast changes.
//! - Forward assignment and progress intents to the transport.
//!
//! # Invariants
//! - `get_selected_task()` always returns the most recent selection.
//! - Subscribers see every selection made after they subscribed, in order,
//!   before `select_task` returns. No history is replayed.
//! - Intents never mutate the selection; only a later confirmed project
//!   snapshot does.

use crate::events::broadcast::{Broadcast, Subscription};
use crate::model::task::{Task, TaskId};
use crate::model::user::User;
use crate::ports::{Notifier, Transport};
use crate::remote::report_failure;
use log::{debug, warn};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub const ASSIGN_FAILED_ERROR: &str = "Could not assign user";
pub const UNASSIGN_FAILED_ERROR: &str = "Could not unassign user";
pub const SET_POINTS_FAILED_ERROR: &str = "Could not set process points";
pub const POINTS_OUT_OF_RANGE_ERROR: &str = "Process points are out of range";

/// Registry query errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// No task was selected in this session yet, or the selection was cleared.
    NotSelected,
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSelected => write!(f, "no task is selected"),
        }
    }
}

impl Error for RegistryError {}

struct RegistryInner {
    selected: RefCell<Option<Task>>,
    selection_changed: Broadcast<Task>,
    transport: Rc<dyn Transport>,
    notifier: Rc<dyn Notifier>,
}

/// Holder of the session's selected task.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct TaskRegistry {
    inner: Rc<RegistryInner>,
}

impl TaskRegistry {
    pub fn new(transport: Rc<dyn Transport>, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                selected: RefCell::new(None),
                selection_changed: Broadcast::new(),
                transport,
                notifier,
            }),
        }
    }

    /// Replaces the selection and notifies every subscriber with `task`.
    pub fn select_task(&self, task: Task) {
        debug!(
            "event=task_selected module=registry status=ok task_id={}",
            task.id()
        );
        *self.inner.selected.borrow_mut() = Some(task.clone());
        self.inner.selection_changed.emit(&task);
    }

    pub fn get_selected_task(&self) -> Result<Task, RegistryError> {
        self.inner
            .selected
            .borrow()
            .clone()
            .ok_or(RegistryError::NotSelected)
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.inner
            .selected
            .borrow()
            .as_ref()
            .map(|task| task.id().clone())
    }

    /// Drops the selection without notifying subscribers.
    pub fn clear_selection(&self) {
        if self.inner.selected.replace(None).is_some() {
            debug!("event=selection_cleared module=registry status=ok");
        }
    }

    /// Subscribes to selections made from now on.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_selection_changed(&self, handler: impl Fn(&Task) + 'static) -> Subscription {
        self.inner.selection_changed.subscribe(handler)
    }

    /// Requests that `user` becomes the assignee of `task_id`.
    ///
    /// Always forwarded. Whether the task is still free is decided remotely.
    pub fn assign(&self, task_id: &TaskId, user: &User) {
        self.inner.transport.assign_task(
            task_id,
            &user.id,
            report_failure(
                &self.inner.notifier,
                "assign_task",
                task_id.to_string(),
                ASSIGN_FAILED_ERROR.to_string(),
            ),
        );
    }

    /// Requests that `task_id` loses its assignee.
    pub fn unassign(&self, task_id: &TaskId) {
        self.inner.transport.unassign_task(
            task_id,
            report_failure(
                &self.inner.notifier,
                "unassign_task",
                task_id.to_string(),
                UNASSIGN_FAILED_ERROR.to_string(),
            ),
        );
    }

    /// Requests new progress for `task_id`.
    ///
    /// Refused locally, with an error notification, when `task_id` is the
    /// selected task and `points` exceeds its maximum.
    pub fn set_process_points(&self, task_id: &TaskId, points: u32) {
        if let Some(Err(err)) = self
            .selected_matching(task_id)
            .map(|task| task.check_process_points(points))
        {
            warn!("event=set_process_points module=registry status=refused task_id={task_id} error={err}");
            self.inner.notifier.add_error(POINTS_OUT_OF_RANGE_ERROR);
            return;
        }

        self.inner.transport.set_process_points(
            task_id,
            points,
            report_failure(
                &self.inner.notifier,
                "set_process_points",
                task_id.to_string(),
                SET_POINTS_FAILED_ERROR.to_string(),
            ),
        );
    }

    fn selected_matching(&self, task_id: &TaskId) -> Option<Task> {
        self.inner
            .selected
            .borrow()
            .as_ref()
            .filter(|task| task.id() == task_id)
            .cloned()
    }
}
