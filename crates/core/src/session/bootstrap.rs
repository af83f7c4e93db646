//! Mounts a session's chart and registers the apps found under `/apps`.

use std::sync::Arc;

use super::{App, BootstrapState, RoutineLauncher, RoutineParams, Session};
use crate::composer;
use crate::namespace::{Context, Namespace};
use crate::resolver::Resolver;

/// Base URI the mounted chart context is anchored at.
pub(crate) const CHART_CONTEXT_URI: &str = "tmp:/";

/// Routine started on every registered app.
pub(crate) const LAUNCH_ROUTINE: &str = "launch";

/// Runs the bootstrap of `session` to completion.
///
/// Never fails: an unresolvable chart leaves the session empty and a chart
/// without `/apps` completes with no apps.
pub(crate) async fn bootstrap(session: Arc<Session>, resolver: Arc<Resolver>, launcher: Arc<dyn RoutineLauncher>) {
	let chart_url = session.chart_url().to_string();

	let Some(root) = resolver.resolve(&chart_url).await else {
		tracing::info!(target: "sky.bootstrap", chart = %chart_url, "chart unresolved; session stays empty");
		session.set_state(BootstrapState::Unresolved);
		return;
	};

	let context = Context::new(Namespace::new(CHART_CONTEXT_URI, root));
	session.set_context(context.clone());

	let Some(apps_folder) = context.get_folder("/apps").await else {
		tracing::debug!(target: "sky.bootstrap", chart = %chart_url, "chart has no /apps");
		session.set_state(BootstrapState::Complete { apps: 0 });
		return;
	};

	let names = match apps_folder.children().await {
		Ok(names) => names,
		Err(err) => {
			tracing::warn!(target: "sky.bootstrap", chart = %chart_url, error = %err, "listing /apps failed");
			Vec::new()
		}
	};

	let mut registered = 0;
	for name in names {
		if context.get_folder(&format!("/apps/{name}")).await.is_none() {
			tracing::debug!(target: "sky.bootstrap", app = %name, "not an app; skipping");
			continue;
		}

		let namespace = composer::compose(&context, &name).await;
		let app = Arc::new(App::new(
			name.clone(),
			Arc::downgrade(&session),
			namespace.root,
			namespace.context,
			Arc::clone(&launcher),
		));
		let app = session.insert_app(app);
		registered += 1;

		let pid = app.start_routine(RoutineParams::named(LAUNCH_ROUTINE));
		tracing::info!(target: "sky.bootstrap", app = %name, pid = ?pid, "app registered");
	}

	tracing::info!(target: "sky.bootstrap", chart = %chart_url, apps = registered, "bootstrap complete");
	session.set_state(BootstrapState::Complete { apps: registered });
}
