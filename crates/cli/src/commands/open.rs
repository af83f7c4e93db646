use std::time::Duration;

use sky::{Root, Session, SessionConfig};

use crate::cli::OpenArgs;
use crate::error::{CliError, Result};
use crate::output::{AppData, Diagnostic, OpenData, OutputFormat, SessionState};

pub async fn execute(config: &SessionConfig, args: OpenArgs, format: OutputFormat) -> Result<()> {
	let root = Root::new(config.clone());
	let data = open_session(&root, &args).await?;
	let diagnostics = diagnose(&data);
	super::emit_success(
		"open",
		serde_json::json!({ "chartUrl": args.chart_url, "wait": args.wait }),
		data,
		diagnostics,
		format,
	);
	Ok(())
}

/// Opens the session for `args.chart_url` on `root`, optionally waiting for bootstrap.
pub async fn open_session(root: &Root, args: &OpenArgs) -> Result<OpenData> {
	let session = root.open_session(&args.chart_url).ok_or_else(|| CliError::SessionRejected {
		chart_url: args.chart_url.clone(),
	})?;

	if args.wait {
		tokio::time::timeout(Duration::from_millis(args.timeout_ms), session.bootstrapped())
			.await
			.map_err(|_| CliError::Timeout {
				ms: args.timeout_ms,
				condition: format!("bootstrap of {}", args.chart_url),
			})?;
	}

	Ok(describe(&session))
}

fn describe(session: &Session) -> OpenData {
	let apps = session
		.apps()
		.iter()
		.map(|app| AppData {
			name: app.name().to_string(),
			status: app.status().to_string(),
			namespace: app.namespace().names(),
			processes: app.processes().names(),
		})
		.collect();

	OpenData {
		chart_url: session.chart_url().to_string(),
		session_id: session.id().map(str::to_string),
		uri: session.uri().map(str::to_string),
		state: SessionState::from(&session.state()),
		apps,
	}
}

/// Namespace children every composed app is expected to carry.
const APP_NAMESPACE: [&str; 6] = ["state", "export", "session", "source", "config", "persist"];

/// Notes on an opened session that the caller should not have to dig out of the logs.
pub fn diagnose(data: &OpenData) -> Vec<Diagnostic> {
	let mut diagnostics = Vec::new();
	match data.state {
		SessionState::Pending => {
			diagnostics.push(Diagnostic::info("bootstrap still running; pass --wait to list apps"));
		}
		SessionState::Unresolved => {
			diagnostics.push(Diagnostic::warning(format!(
				"chart {} could not be resolved; the session is empty",
				data.chart_url
			)));
		}
		SessionState::Unscheduled => {
			diagnostics.push(Diagnostic::warning(format!(
				"bootstrap of {} was never scheduled; the session is empty",
				data.chart_url
			)));
		}
		SessionState::Complete => {}
	}

	for app in &data.apps {
		for child in APP_NAMESPACE {
			if !app.namespace.iter().any(|name| name == child) {
				diagnostics.push(Diagnostic::warning(format!("app {} has no {child} in its namespace", app.name)));
			}
		}
	}
	diagnostics
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use sky::Entry;
	use sky::testing::{StubImporter, stub_chart};

	use super::*;
	use crate::cli::DEFAULT_WAIT_MS;
	use crate::output::DiagnosticLevel;

	fn args(chart_url: &str, wait: bool) -> OpenArgs {
		OpenArgs {
			chart_url: chart_url.to_string(),
			wait,
			timeout_ms: DEFAULT_WAIT_MS,
		}
	}

	#[tokio::test]
	async fn open_with_wait_lists_apps() {
		let importer = Arc::new(StubImporter::new());
		importer.serve("ws://host/~~export/ws", Entry::Folder(stub_chart(["chat", "notes"])));
		let root = Root::new(SessionConfig::default()).with_importer(importer);

		let data = open_session(&root, &args("skylink+ws://host", true)).await.unwrap();
		assert_eq!(data.state, SessionState::Complete);
		assert_eq!(data.apps.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(), vec!["chat", "notes"]);
		assert!(data.apps.iter().all(|a| a.status == "Ready" && a.processes.len() == 1));
		assert!(data.uri.unwrap().ends_with(&format!("/pub/sessions/{}", data.session_id.unwrap())));
	}

	#[tokio::test]
	async fn open_without_wait_reports_pending() {
		let importer = Arc::new(StubImporter::new());
		importer.hang("ws://host/~~export/ws");
		let root = Root::new(SessionConfig::default()).with_importer(importer);

		let data = open_session(&root, &args("skylink+ws://host", false)).await.unwrap();
		assert_eq!(data.state, SessionState::Pending);
		assert!(data.apps.is_empty());
	}

	#[tokio::test]
	async fn wait_times_out_on_hanging_import() {
		let importer = Arc::new(StubImporter::new());
		importer.hang("ws://host/~~export/ws");
		let root = Root::new(SessionConfig::default()).with_importer(importer);

		let mut args = args("skylink+ws://host", true);
		args.timeout_ms = 20;
		let err = open_session(&root, &args).await.unwrap_err();
		assert!(matches!(err, CliError::Timeout { ms: 20, .. }));
	}

	#[tokio::test]
	async fn rejected_session_is_an_error() {
		let config = SessionConfig {
			max_sessions: Some(0),
			..SessionConfig::default()
		};
		let root = Root::new(config).with_importer(Arc::new(StubImporter::new()));

		let err = open_session(&root, &args("ftp://x", false)).await.unwrap_err();
		assert!(matches!(err, CliError::SessionRejected { .. }));
	}

	#[tokio::test]
	async fn unresolved_chart_is_reported_as_a_warning() {
		let root = Root::new(SessionConfig::default()).with_importer(Arc::new(StubImporter::new()));

		let data = open_session(&root, &args("ftp://x", true)).await.unwrap();
		assert_eq!(data.state, SessionState::Unresolved);

		let diagnostics = diagnose(&data);
		assert_eq!(diagnostics.len(), 1);
		assert_eq!(diagnostics[0].level, DiagnosticLevel::Warning);
		assert!(diagnostics[0].message.contains("ftp://x"));
	}

	#[tokio::test]
	async fn complete_session_has_no_diagnostics() {
		let importer = Arc::new(StubImporter::new());
		importer.serve("ws://host/~~export/ws", Entry::Folder(stub_chart(["chat"])));
		let root = Root::new(SessionConfig::default()).with_importer(importer);

		let data = open_session(&root, &args("skylink+ws://host", true)).await.unwrap();
		assert!(diagnose(&data).is_empty());
	}

	#[test]
	fn app_missing_an_area_is_reported() {
		let data = OpenData {
			chart_url: "skylink+ws://host".into(),
			session_id: None,
			uri: None,
			state: SessionState::Complete,
			apps: vec![AppData {
				name: "chat".into(),
				status: "Ready".into(),
				namespace: ["state", "export", "session", "source", "persist"].map(String::from).to_vec(),
				processes: vec![],
			}],
		};

		let diagnostics = diagnose(&data);
		assert_eq!(diagnostics, vec![Diagnostic::warning("app chat has no config in its namespace")]);
	}
}
