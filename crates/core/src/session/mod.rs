//! Sessions over a mounted chart and the apps discovered in it.
//!
//! A [`Session`] is handed out before its chart is mounted. Bootstrap runs as
//! a detached task that fills in the chart context and the app list; callers
//! can observe progress through [`Session::state`] or wait on
//! [`Session::bootstrapped`].

mod app;
pub(crate) mod bootstrap;

use std::sync::{Arc, OnceLock, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use tokio::sync::watch;

pub use app::{App, ProcessLauncher, RoutineLauncher, RoutineParams, STATUS_READY};

use crate::inmem::ObscuredFolder;
use crate::namespace::Context;

/// Hosting service mapping of session identifiers to sessions.
pub type SessionsFolder = ObscuredFolder<Arc<Session>>;

/// Progress of a session's bootstrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapState {
	/// Bootstrap has not finished yet.
	Pending,
	/// The chart URI could not be resolved; the session stays empty.
	Unresolved,
	/// The chart was mounted and `apps` apps were registered.
	Complete { apps: usize },
	/// Bootstrap was never scheduled: the registration was rejected or no
	/// runtime was available. The session stays empty.
	Unscheduled,
}

impl BootstrapState {
	pub fn is_terminal(&self) -> bool {
		!matches!(self, BootstrapState::Pending)
	}
}

pub struct Session {
	chart_url: String,
	id: OnceLock<String>,
	uri: OnceLock<String>,
	sessions: OnceLock<Weak<SessionsFolder>>,
	context: OnceLock<Context>,
	apps: RwLock<IndexMap<String, Arc<App>>>,
	state: watch::Sender<BootstrapState>,
}

impl Session {
	pub(crate) fn new(chart_url: impl Into<String>) -> Self {
		let (state, _) = watch::channel(BootstrapState::Pending);
		Self {
			chart_url: chart_url.into(),
			id: OnceLock::new(),
			uri: OnceLock::new(),
			sessions: OnceLock::new(),
			context: OnceLock::new(),
			apps: RwLock::new(IndexMap::new()),
			state,
		}
	}

	pub fn chart_url(&self) -> &str {
		&self.chart_url
	}

	/// Identifier under which the session is registered.
	pub fn id(&self) -> Option<&str> {
		self.id.get().map(String::as_str)
	}

	/// Service-local address of the session.
	pub fn uri(&self) -> Option<&str> {
		self.uri.get().map(String::as_str)
	}

	/// The sessions folder this session is registered in.
	pub fn sessions(&self) -> Option<Arc<SessionsFolder>> {
		self.sessions.get().and_then(Weak::upgrade)
	}

	/// Root context over the mounted chart, once bootstrap has mounted it.
	pub fn context(&self) -> Option<&Context> {
		self.context.get()
	}

	/// Snapshot of the registered apps in registration order.
	pub fn apps(&self) -> Vec<Arc<App>> {
		self.apps.read().values().cloned().collect()
	}

	pub fn app_names(&self) -> Vec<String> {
		self.apps.read().keys().cloned().collect()
	}

	pub fn app(&self, name: &str) -> Option<Arc<App>> {
		self.apps.read().get(name).cloned()
	}

	pub fn state(&self) -> BootstrapState {
		self.state.borrow().clone()
	}

	/// Waits until bootstrap reaches a terminal state.
	pub async fn bootstrapped(&self) -> BootstrapState {
		let mut rx = self.state.subscribe();
		match rx.wait_for(BootstrapState::is_terminal).await {
			Ok(state) => state.clone(),
			Err(_) => self.state(),
		}
	}

	pub(crate) fn register(&self, id: &str, uri: String, sessions: &Arc<SessionsFolder>) {
		let _ = self.id.set(id.to_string());
		let _ = self.uri.set(uri);
		let _ = self.sessions.set(Arc::downgrade(sessions));
	}

	/// Sets the chart context. Only the first call has an effect.
	pub(crate) fn set_context(&self, context: Context) -> bool {
		self.context.set(context).is_ok()
	}

	/// Adds `app` unless an app of that name is already present.
	///
	/// Returns the app that ends up registered under the name.
	pub(crate) fn insert_app(&self, app: Arc<App>) -> Arc<App> {
		let mut apps = self.apps.write();
		Arc::clone(apps.entry(app.name().to_string()).or_insert(app))
	}

	pub(crate) fn set_state(&self, state: BootstrapState) {
		self.state.send_replace(state);
	}
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("chart_url", &self.chart_url)
			.field("uri", &self.uri.get())
			.field("apps", &self.app_names())
			.field("state", &*self.state.borrow())
			.finish()
	}
}
