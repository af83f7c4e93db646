//! Per-app namespace composition.
//!
//! Each app sees a synthesized root with a fixed layout:
//!
//! ```text
//! state/    fresh, owned by the app
//! export/   fresh, owned by the app
//! session/  the chart root (shared)
//! source/   /apps/<name> from the chart
//! config/   /config/<name> from the chart, created if absent
//! persist/  /persist/<name> from the chart, created if absent
//! ```

use std::sync::Arc;

use crate::entry::Entry;
use crate::inmem::MemFolder;
use crate::namespace::{Context, Namespace};

/// Prefix of every app namespace base URI; the app name follows it.
pub const APP_NAMESPACE_PREFIX: &str = "skylink://skychart.local/~";

/// Chart areas each app gets a private subtree of.
const SHARED_AREAS: [&str; 2] = ["config", "persist"];

/// The synthesized tree for one app.
pub struct AppNamespace {
	pub root: Arc<MemFolder>,
	pub context: Context,
}

/// Builds the namespace for `app_name` over the mounted chart.
///
/// Creates `/config/<app>` and `/persist/<app>` in the chart when missing.
pub async fn compose(chart: &Context, app_name: &str) -> AppNamespace {
	let root = Arc::new(MemFolder::new(app_name));
	root.insert("state", Entry::folder(MemFolder::new("state")));
	root.insert("export", Entry::folder(MemFolder::new("export")));
	root.insert("session", chart.root().clone());

	match chart.get(&format!("/apps/{app_name}")).await {
		Some(source) => {
			root.insert("source", source);
		}
		None => tracing::warn!(target: "sky.composer", app = %app_name, "app source disappeared; omitting source"),
	}

	for area in SHARED_AREAS {
		if let Some(subtree) = ensure_subtree(chart, area, app_name).await {
			root.insert(area, subtree);
		}
	}

	let namespace = Namespace::new(format!("{APP_NAMESPACE_PREFIX}{app_name}"), Entry::Folder(root.clone()));
	AppNamespace {
		root,
		context: Context::new(namespace),
	}
}

/// Fetches `/<area>/<app>` from the chart, creating it once if absent.
async fn ensure_subtree(chart: &Context, area: &str, app_name: &str) -> Option<Entry> {
	let path = format!("/{area}/{app_name}");
	if let Some(existing) = chart.get_folder(&path).await {
		return Some(Entry::Folder(existing));
	}

	tracing::info!(target: "sky.composer", app = %app_name, %path, "creating missing subtree");
	match chart.put(&path, Entry::folder(MemFolder::new(app_name))).await {
		Ok(true) => {}
		Ok(false) => tracing::warn!(target: "sky.composer", app = %app_name, %path, "chart rejected subtree creation"),
		Err(err) => tracing::warn!(target: "sky.composer", app = %app_name, %path, error = %err, "subtree creation failed"),
	}

	let created = chart.get_folder(&path).await.map(Entry::Folder);
	if created.is_none() {
		tracing::warn!(target: "sky.composer", app = %app_name, %path, "proceeding without {area}");
	}
	created
}
