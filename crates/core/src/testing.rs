//! Test doubles for the remote-import and routine-launch seams.
//!
//! - [`StubImporter`]: serves in-memory trees in place of remote exports
//! - [`RecordingLauncher`]: records every routine start instead of running it
//! - [`stub_skychart`]: a skychart namespace whose open function knows a fixed set of charts
//!
//! # Example
//!
//! ```ignore
//! use sky::testing::{StubImporter, RecordingLauncher};
//!
//! let importer = StubImporter::new();
//! importer.serve("ws://host/~~export/ws", chart_root);
//! let root = Root::new(SessionConfig::default())
//!     .with_importer(Arc::new(importer))
//!     .with_launcher(Arc::new(RecordingLauncher::default()));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::inmem::{MemFolder, MemFunction};
use crate::remote::Importer;
use crate::session::{App, RoutineLauncher, RoutineParams};

/// [`Importer`] answering from a fixed table of export URLs.
///
/// Unknown URLs fail like an unreachable host. URLs marked with
/// [`StubImporter::hang`] never complete.
#[derive(Default)]
pub struct StubImporter {
	exports: Mutex<HashMap<String, Entry>>,
	hanging: Mutex<Vec<String>>,
	imported: Mutex<Vec<String>>,
}

impl StubImporter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Serves `root` for imports of `url`.
	pub fn serve(&self, url: impl Into<String>, root: Entry) {
		self.exports.lock().insert(url.into(), root);
	}

	/// Makes imports of `url` block forever.
	pub fn hang(&self, url: impl Into<String>) {
		self.hanging.lock().push(url.into());
	}

	/// Every URL imported so far, in call order.
	pub fn imported(&self) -> Vec<String> {
		self.imported.lock().clone()
	}
}

#[async_trait]
impl Importer for StubImporter {
	async fn import(&self, url: &str) -> Result<Entry> {
		self.imported.lock().push(url.to_string());

		let hang = self.hanging.lock().iter().any(|u| u == url);
		if hang {
			std::future::pending::<()>().await;
		}

		let served = self.exports.lock().get(url).cloned();
		served.ok_or_else(|| {
			Error::Runtime(sky_runtime::Error::ConnectionFailed {
				endpoint: url.to_string(),
				reason: "no stub export".to_string(),
			})
		})
	}
}

/// A routine start captured by [`RecordingLauncher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRecord {
	pub app: String,
	pub routine: String,
	/// Whether the app was already visible in its session when launched.
	pub registered: bool,
}

/// [`RoutineLauncher`] that only records starts.
#[derive(Default)]
pub struct RecordingLauncher {
	launches: Mutex<Vec<LaunchRecord>>,
}

impl RecordingLauncher {
	pub fn launches(&self) -> Vec<LaunchRecord> {
		self.launches.lock().clone()
	}
}

impl RoutineLauncher for RecordingLauncher {
	fn start_routine(&self, app: &App, params: RoutineParams) -> Option<String> {
		let registered = app.session().is_some_and(|session| session.app(app.name()).is_some());
		let mut launches = self.launches.lock();
		launches.push(LaunchRecord {
			app: app.name().to_string(),
			routine: params.routine_name,
			registered,
		});
		Some(format!("proc-{}", launches.len()))
	}
}

/// Builds a skychart root whose `/pub/open/invoke` opens the given charts.
///
/// Opening a chart yields a folder whose `browse/invoke` returns that chart's
/// root. Unknown chart names produce nothing.
pub fn stub_skychart(charts: impl IntoIterator<Item = (String, Entry)>) -> Entry {
	let charts: Arc<HashMap<String, Entry>> = Arc::new(charts.into_iter().collect());

	let open = MemFunction::new("invoke", move |input: Option<Entry>| {
		let charts = Arc::clone(&charts);
		async move {
			let name = match input {
				Some(Entry::String(s)) => s.value,
				_ => return Ok(None),
			};
			let Some(chart) = charts.get(&name).cloned() else {
				return Ok(None);
			};

			let browse = MemFunction::new("invoke", move |_| {
				let chart = chart.clone();
				async move { Ok::<_, Error>(Some(chart)) }
			});
			let browse_folder = MemFolder::with_children("browse", [("invoke", Entry::function(browse))]);
			let meta = MemFolder::with_children(name.clone(), [("browse", Entry::folder(browse_folder))]);
			Ok::<_, Error>(Some(Entry::folder(meta)))
		}
	});

	let open_folder = MemFolder::with_children("open", [("invoke", Entry::function(open))]);
	let pub_folder = MemFolder::with_children("pub", [("open", Entry::folder(open_folder))]);
	Entry::folder(MemFolder::with_children("", [("pub", Entry::folder(pub_folder))]))
}

/// Builds a chart root with an `/apps` folder holding one empty folder per name.
pub fn stub_chart<'a>(apps: impl IntoIterator<Item = &'a str>) -> Arc<MemFolder> {
	let apps_folder = MemFolder::new("apps");
	for name in apps {
		let source = MemFolder::new(name);
		source.insert("launch", Entry::string("launch", format!("-- launch {name}")));
		apps_folder.insert(name, Entry::folder(source));
	}
	Arc::new(MemFolder::with_children("", [("apps", Entry::folder(apps_folder))]))
}
