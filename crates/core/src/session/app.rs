use std::sync::{Arc, Weak};

use super::Session;
use crate::entry::Entry;
use crate::inmem::MemFolder;
use crate::namespace::Context;

/// Status every app starts with.
pub const STATUS_READY: &str = "Ready";

/// Parameters for starting a named routine on an app.
#[derive(Debug, Clone)]
pub struct RoutineParams {
	pub routine_name: String,
	pub input: Option<Entry>,
}

impl RoutineParams {
	pub fn named(routine_name: impl Into<String>) -> Self {
		Self {
			routine_name: routine_name.into(),
			input: None,
		}
	}
}

/// Starts routines on apps. Returns the id of the started process, if any.
pub trait RoutineLauncher: Send + Sync {
	fn start_routine(&self, app: &App, params: RoutineParams) -> Option<String>;
}

/// Launcher recording each start as a process entry of the app.
///
/// The entry is a folder `{RoutineName, Status}` stored under a fresh id in
/// [`App::processes`]. Running the routine belongs to the process subsystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl RoutineLauncher for ProcessLauncher {
	fn start_routine(&self, app: &App, params: RoutineParams) -> Option<String> {
		let pid = uuid::Uuid::new_v4().simple().to_string();
		let mut record = vec![
			("RoutineName", Entry::string("RoutineName", params.routine_name.clone())),
			("Status", Entry::string("Status", "Pending")),
		];
		if let Some(input) = params.input {
			record.push(("Input", input));
		}

		app.processes().insert(pid.clone(), Entry::folder(MemFolder::with_children(pid.clone(), record)));
		tracing::info!(target: "sky.app", app = %app.name(), routine = %params.routine_name, %pid, "routine started");
		Some(pid)
	}
}

/// An app discovered under a chart's `/apps`.
pub struct App {
	name: String,
	session: Weak<Session>,
	processes: Arc<MemFolder>,
	status: String,
	namespace: Arc<MemFolder>,
	context: Context,
	launcher: Arc<dyn RoutineLauncher>,
}

impl App {
	pub(crate) fn new(
		name: impl Into<String>,
		session: Weak<Session>,
		namespace: Arc<MemFolder>,
		context: Context,
		launcher: Arc<dyn RoutineLauncher>,
	) -> Self {
		Self {
			name: name.into(),
			session,
			processes: Arc::new(MemFolder::new("processes")),
			status: STATUS_READY.to_string(),
			namespace,
			context,
			launcher,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The owning session, while it is alive.
	pub fn session(&self) -> Option<Arc<Session>> {
		self.session.upgrade()
	}

	pub fn processes(&self) -> &Arc<MemFolder> {
		&self.processes
	}

	pub fn status(&self) -> &str {
		&self.status
	}

	/// Root folder of the app's namespace.
	pub fn namespace(&self) -> &Arc<MemFolder> {
		&self.namespace
	}

	pub fn context(&self) -> &Context {
		&self.context
	}

	pub fn start_routine(&self, params: RoutineParams) -> Option<String> {
		self.launcher.start_routine(self, params)
	}
}

impl std::fmt::Debug for App {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("App")
			.field("name", &self.name)
			.field("status", &self.status)
			.field("namespace", &self.namespace.names())
			.finish()
	}
}
