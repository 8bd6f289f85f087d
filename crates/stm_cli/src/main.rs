//! CLI smoke and replay entry point.
//!
//! # Responsibility
//! - Verify `stm_core` linkage with a deterministic version probe.
//! - Replay a JSON scenario (viewer, project, events) through a session and
//!   print every notification and navigation the core produces.

use clap::Parser;
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use stm_core::{
    init_logging, Authenticator, Completion, CoreConfig, Destination, Navigator, Notifier,
    Project, ProjectEvent, ProjectId, Session, TaskId, Transport, TransportError, UserId,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON scenario to replay (viewer, project, events).
    scenario: Option<PathBuf>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Scenario {
    viewer: UserId,
    #[serde(default)]
    config: CoreConfig,
    project: Project,
    #[serde(default)]
    events: Vec<ProjectEvent>,
}

struct FixedViewer(UserId);

impl Authenticator for FixedViewer {
    fn current_user_id(&self) -> UserId {
        self.0.clone()
    }
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn add_warning(&self, message: &str) {
        println!("warning: {message}");
    }

    fn add_error(&self, message: &str) {
        println!("error: {message}");
    }
}

struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate_to(&self, destination: &Destination) {
        println!("navigate: {destination}");
    }
}

/// Replays have no remote side; every request fails immediately.
struct OfflineTransport;

impl OfflineTransport {
    fn fail(done: Completion) {
        done(Err(TransportError::unreachable("replay mode has no remote service")));
    }
}

impl Transport for OfflineTransport {
    fn remove_user(&self, _: &ProjectId, _: &UserId, done: Completion) {
        Self::fail(done);
    }

    fn invite_user(&self, _: &ProjectId, _: &UserId, done: Completion) {
        Self::fail(done);
    }

    fn leave_project(&self, _: &ProjectId, done: Completion) {
        Self::fail(done);
    }

    fn delete_project(&self, _: &ProjectId, done: Completion) {
        Self::fail(done);
    }

    fn assign_task(&self, _: &TaskId, _: &UserId, done: Completion) {
        Self::fail(done);
    }

    fn unassign_task(&self, _: &TaskId, done: Completion) {
        Self::fail(done);
    }

    fn set_process_points(&self, _: &TaskId, _: u32, done: Completion) {
        Self::fail(done);
    }
}

fn replay(path: &Path) -> Result<(), String> {
    let shown = path.display();
    let raw =
        std::fs::read_to_string(path).map_err(|err| format!("cannot read `{shown}`: {err}"))?;
    let scenario: Scenario =
        serde_json::from_str(&raw).map_err(|err| format!("invalid scenario `{shown}`: {err}"))?;
    scenario.config.validate().map_err(|err| err.to_string())?;
    if scenario.config.logging.dir.is_some() {
        init_logging(&scenario.config.logging).map_err(|err| err.to_string())?;
    }

    let session = Session::new(
        scenario.config,
        Rc::new(FixedViewer(scenario.viewer)),
        Rc::new(OfflineTransport),
        Rc::new(ConsoleNotifier),
        Rc::new(ConsoleNavigator),
    );
    let view = session.open_project(scenario.project);
    print_selection(&session);

    for event in &scenario.events {
        println!("> {} {}", event.kind(), event.project_id());
        session.bus().publish(event);
        print_selection(&session);
    }

    println!("final state: {}", view.state().as_str());
    info!(
        "event=replay_done module=cli status=ok events={}",
        scenario.events.len()
    );
    Ok(())
}

fn print_selection(session: &Session) {
    match session.registry().get_selected_task() {
        Ok(task) => println!(
            "selected: {} ({}/{})",
            task.id(),
            task.process_points(),
            task.max_process_points()
        ),
        Err(err) => println!("selected: none ({err})"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    println!("stm_core version={}", stm_core::core_version());

    let Some(path) = cli.scenario else {
        return ExitCode::SUCCESS;
    };
    match replay(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
