//! Per-connection session wiring.
//!
//! A session is constructed explicitly once the user is authenticated and
//! handed to whichever views need it. It owns the task registry and the
//! project event bus, so their lifetime is the session's, not the process's.

use crate::config::CoreConfig;
use crate::events::project_bus::ProjectEventBus;
use crate::model::project::Project;
use crate::model::user::UserId;
use crate::ports::{Authenticator, Navigator, Notifier, Transport};
use crate::registry::TaskRegistry;
use crate::view::{ProjectView, ViewContext};
use std::rc::Rc;

pub struct Session {
    config: CoreConfig,
    registry: TaskRegistry,
    bus: ProjectEventBus,
    authenticator: Rc<dyn Authenticator>,
    transport: Rc<dyn Transport>,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
}

impl Session {
    pub fn new(
        config: CoreConfig,
        authenticator: Rc<dyn Authenticator>,
        transport: Rc<dyn Transport>,
        notifier: Rc<dyn Notifier>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let registry = TaskRegistry::new(Rc::clone(&transport), Rc::clone(&notifier));
        Self {
            config,
            registry,
            bus: ProjectEventBus::new(),
            authenticator,
            transport,
            notifier,
            navigator,
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Event bus the transport layer publishes project events on.
    pub fn bus(&self) -> &ProjectEventBus {
        &self.bus
    }

    pub fn current_user_id(&self) -> UserId {
        self.authenticator.current_user_id()
    }

    /// Collaborators for a project view of this session.
    pub fn view_context(&self) -> ViewContext {
        ViewContext {
            registry: self.registry.clone(),
            bus: self.bus.clone(),
            authenticator: Rc::clone(&self.authenticator),
            transport: Rc::clone(&self.transport),
            notifier: Rc::clone(&self.notifier),
            navigator: Rc::clone(&self.navigator),
            eviction_destination: self.config.eviction_destination.clone(),
        }
    }

    /// Opens an already resolved project in a new, active view.
    pub fn open_project(&self, project: Project) -> ProjectView {
        ProjectView::open(self.view_context(), project)
    }
}
