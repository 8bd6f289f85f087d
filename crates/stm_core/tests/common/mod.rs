#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use stm_core::{
    Authenticator, Completion, CoreConfig, Destination, Geometry, Navigator, Notifier, Project,
    ProjectId, Session, Task, TaskId, Transport, TransportError, User, UserId,
};

pub fn maria() -> User {
    User::new("u1", "Maria")
}

pub fn peter() -> User {
    User::new("u2", "Peter")
}

pub fn task(id: &str, points: u32, max: u32) -> Task {
    Task::new(id, format!("Task {id}"), points, max, Geometry::new("{}")).unwrap()
}

/// `p1`, owned by Maria, Peter as member, tasks `t1` and `t2`.
pub fn project_p1() -> Project {
    Project::new("p1", "Roads", maria())
        .unwrap()
        .with_member(peter())
        .with_task(task("t1", 0, 10))
        .with_task(task("t2", 2, 5))
}

pub fn project_p2() -> Project {
    Project::new("p2", "Buildings", peter())
        .unwrap()
        .with_member(maria())
        .with_task(task("t9", 0, 3))
}

pub struct StaticAuthenticator {
    user_id: RefCell<UserId>,
}

impl StaticAuthenticator {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: RefCell::new(UserId::new(user_id)),
        }
    }
}

impl Authenticator for StaticAuthenticator {
    fn current_user_id(&self) -> UserId {
        self.user_id.borrow().clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Warning(String),
    Error(String),
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn warnings(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|notice| match notice {
                Notice::Warning(message) => Some(message.clone()),
                Notice::Error(_) => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|notice| match notice {
                Notice::Error(message) => Some(message.clone()),
                Notice::Warning(_) => None,
            })
            .collect()
    }

    pub fn count(&self) -> usize {
        self.notices.borrow().len()
    }
}

impl Notifier for RecordingNotifier {
    fn add_warning(&self, message: &str) {
        self.notices
            .borrow_mut()
            .push(Notice::Warning(message.to_string()));
    }

    fn add_error(&self, message: &str) {
        self.notices
            .borrow_mut()
            .push(Notice::Error(message.to_string()));
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: RefCell<Vec<Destination>>,
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&self, destination: &Destination) {
        self.visited.borrow_mut().push(destination.clone());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    RemoveUser(ProjectId, UserId),
    InviteUser(ProjectId, UserId),
    LeaveProject(ProjectId),
    DeleteProject(ProjectId),
    AssignTask(TaskId, UserId),
    UnassignTask(TaskId),
    SetProcessPoints(TaskId, u32),
}

/// Transport that records calls and parks their completions until the test
/// resolves them.
#[derive(Default)]
pub struct FakeTransport {
    pub calls: RefCell<Vec<Call>>,
    pending: RefCell<VecDeque<Completion>>,
}

impl FakeTransport {
    fn record(&self, call: Call, done: Completion) {
        self.calls.borrow_mut().push(call);
        self.pending.borrow_mut().push_back(done);
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Resolves the oldest pending call.
    pub fn resolve_next(&self, result: Result<(), TransportError>) {
        let done = self
            .pending
            .borrow_mut()
            .pop_front()
            .expect("a pending remote call");
        done(result);
    }
}

impl Transport for FakeTransport {
    fn remove_user(&self, project_id: &ProjectId, user_id: &UserId, done: Completion) {
        self.record(Call::RemoveUser(project_id.clone(), user_id.clone()), done);
    }

    fn invite_user(&self, project_id: &ProjectId, user_id: &UserId, done: Completion) {
        self.record(Call::InviteUser(project_id.clone(), user_id.clone()), done);
    }

    fn leave_project(&self, project_id: &ProjectId, done: Completion) {
        self.record(Call::LeaveProject(project_id.clone()), done);
    }

    fn delete_project(&self, project_id: &ProjectId, done: Completion) {
        self.record(Call::DeleteProject(project_id.clone()), done);
    }

    fn assign_task(&self, task_id: &TaskId, user_id: &UserId, done: Completion) {
        self.record(Call::AssignTask(task_id.clone(), user_id.clone()), done);
    }

    fn unassign_task(&self, task_id: &TaskId, done: Completion) {
        self.record(Call::UnassignTask(task_id.clone()), done);
    }

    fn set_process_points(&self, task_id: &TaskId, points: u32, done: Completion) {
        self.record(Call::SetProcessPoints(task_id.clone(), points), done);
    }
}

/// A session for `viewer` wired to recording collaborators.
pub struct Harness {
    pub session: Session,
    pub notifier: Rc<RecordingNotifier>,
    pub navigator: Rc<RecordingNavigator>,
    pub transport: Rc<FakeTransport>,
}

impl Harness {
    pub fn new(viewer: &str) -> Self {
        let notifier = Rc::new(RecordingNotifier::default());
        let navigator = Rc::new(RecordingNavigator::default());
        let transport = Rc::new(FakeTransport::default());
        let session = Session::new(
            CoreConfig::default(),
            Rc::new(StaticAuthenticator::new(viewer)),
            transport.clone(),
            notifier.clone(),
            navigator.clone(),
        );
        Self {
            session,
            notifier,
            navigator,
            transport,
        }
    }

    pub fn navigations(&self) -> Vec<Destination> {
        self.navigator.visited.borrow().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.transport.calls.borrow().clone()
    }
}
