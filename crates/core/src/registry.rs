//! Session registry.
//!
//! [`Root`] owns the per-process session cache and the hosting service's
//! sessions folder. Opening a chart URL for the first time registers a new
//! session and schedules its bootstrap; later opens return the cached session.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::config::SessionConfig;
use crate::remote::{Importer, RemoteImporter};
use crate::resolver::Resolver;
use crate::session::{BootstrapState, ProcessLauncher, RoutineLauncher, Session, SessionsFolder, bootstrap};

/// Name of the hosting service's sessions folder.
pub const SESSIONS_FOLDER: &str = "sessions";

pub struct Root {
	config: SessionConfig,
	resolver: Arc<Resolver>,
	launcher: Arc<dyn RoutineLauncher>,
	cache: Mutex<HashMap<String, Arc<Session>>>,
	sessions: OnceLock<Arc<SessionsFolder>>,
}

impl Root {
	/// Creates a root importing charts over the network.
	pub fn new(config: SessionConfig) -> Self {
		let resolver = Arc::new(Resolver::new(Arc::new(RemoteImporter), &config));
		Self {
			config,
			resolver,
			launcher: Arc::new(ProcessLauncher),
			cache: Mutex::new(HashMap::new()),
			sessions: OnceLock::new(),
		}
	}

	/// Replaces the importer charts are mounted through.
	pub fn with_importer(mut self, importer: Arc<dyn Importer>) -> Self {
		self.resolver = Arc::new(Resolver::new(importer, &self.config));
		self
	}

	/// Replaces the launcher app routines are started with.
	pub fn with_launcher(mut self, launcher: Arc<dyn RoutineLauncher>) -> Self {
		self.launcher = launcher;
		self
	}

	/// The sessions folder, created on first use.
	pub fn sessions(&self) -> &Arc<SessionsFolder> {
		self.sessions
			.get_or_init(|| Arc::new(SessionsFolder::with_limit(SESSIONS_FOLDER, self.config.max_sessions)))
	}

	/// The cached session for `chart_url`, if one was opened.
	pub fn cached(&self, chart_url: &str) -> Option<Arc<Session>> {
		self.cache.lock().get(chart_url).cloned()
	}

	/// Opens the session for `chart_url`.
	///
	/// Returns the cached session when one exists. Otherwise registers a new
	/// session and returns it before its bootstrap has run; `None` means the
	/// sessions folder rejected the registration.
	///
	/// Must be called within a tokio runtime for bootstrap to be scheduled;
	/// otherwise the session is left [`BootstrapState::Unscheduled`].
	pub fn open_session(&self, chart_url: &str) -> Option<Arc<Session>> {
		let mut cache = self.cache.lock();
		if let Some(session) = cache.get(chart_url) {
			tracing::debug!(target: "sky.registry", chart = %chart_url, "session cache hit");
			return Some(Arc::clone(session));
		}

		let session = Arc::new(Session::new(chart_url));
		cache.insert(chart_url.to_string(), Arc::clone(&session));

		let sessions = self.sessions();
		let id = uuid::Uuid::new_v4().simple().to_string();
		if !sessions.insert(id.clone(), Arc::clone(&session)) {
			tracing::warn!(target: "sky.registry", chart = %chart_url, %id, "sessions folder rejected the session");
			session.set_state(BootstrapState::Unscheduled);
			return None;
		}
		session.register(&id, self.config.session_uri(&id), sessions);
		tracing::info!(target: "sky.registry", chart = %chart_url, uri = ?session.uri(), "session registered");

		match tokio::runtime::Handle::try_current() {
			Ok(handle) => {
				handle.spawn(bootstrap::bootstrap(Arc::clone(&session), Arc::clone(&self.resolver), Arc::clone(&self.launcher)));
			}
			Err(err) => {
				tracing::warn!(target: "sky.registry", chart = %chart_url, error = %err, "no runtime; bootstrap not scheduled");
				session.set_state(BootstrapState::Unscheduled);
			}
		}

		Some(session)
	}
}

impl std::fmt::Debug for Root {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Root")
			.field("config", &self.config)
			.field("sessions", &self.cache.lock().len())
			.finish()
	}
}
