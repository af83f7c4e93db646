use super::*;

fn open_data() -> OpenData {
	OpenData {
		chart_url: "skylink+ws://host".into(),
		session_id: Some("abc".into()),
		uri: Some("skylink+ws://localhost:9234/pub/sessions/abc".into()),
		state: SessionState::Complete,
		apps: vec![AppData {
			name: "chat".into(),
			status: "Ready".into(),
			namespace: vec!["state".into(), "export".into(), "session".into(), "source".into()],
			processes: vec![],
		}],
	}
}

#[test]
fn result_builder_success() {
	let result = ResultBuilder::new("open").data(open_data()).build();

	assert!(result.ok);
	assert_eq!(result.command, "open");
	assert_eq!(result.schema_version, Some(SCHEMA_VERSION));
	assert!(result.error.is_none());
	assert!(result.timings.is_some());
}

#[test]
fn result_builder_error() {
	let result: CommandResult<OpenData> = ResultBuilder::new("open")
		.error(CommandError {
			code: ErrorCode::SessionRejected,
			message: "sessions folder is full".into(),
			details: None,
		})
		.build();

	assert!(!result.ok);
	assert!(result.data.is_none());
	assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::SessionRejected);
}

#[test]
fn error_code_display_matches_serde() {
	for code in [ErrorCode::ResolveFailed, ErrorCode::SessionRejected, ErrorCode::NotFound, ErrorCode::ConfigError] {
		let json = serde_json::to_string(&code).unwrap();
		assert_eq!(json, format!("\"{code}\""));
	}
}

#[test]
fn diagnostics_serialize_only_when_present() {
	let quiet = serde_json::to_value(ResultBuilder::new("open").data(open_data()).build()).unwrap();
	assert!(quiet.get("diagnostics").is_none());

	let noisy = ResultBuilder::new("open")
		.data(open_data())
		.diagnostics([Diagnostic::warning("chart skylink+ws://host mounted nothing")])
		.build();
	assert!(noisy.ok);
	let json = serde_json::to_value(&noisy).unwrap();
	assert_eq!(json["diagnostics"][0]["level"], "warning");
	assert_eq!(json["diagnostics"][0]["message"], "chart skylink+ws://host mounted nothing");
}

#[test]
fn serialize_open_result() {
	let result = ResultBuilder::new("open").data(open_data()).build();
	let json = serde_json::to_value(&result).unwrap();

	assert_eq!(json["ok"], true);
	assert_eq!(json["data"]["chartUrl"], "skylink+ws://host");
	assert_eq!(json["data"]["state"], "complete");
	assert_eq!(json["data"]["apps"][0]["name"], "chat");
	assert!(json["data"]["apps"][0].get("processes").is_none());
	assert!(json.get("error").is_none());
}

#[test]
fn session_state_from_bootstrap_state() {
	assert_eq!(SessionState::from(&BootstrapState::Pending), SessionState::Pending);
	assert_eq!(SessionState::from(&BootstrapState::Complete { apps: 3 }), SessionState::Complete);
	assert_eq!(SessionState::from(&BootstrapState::Unscheduled), SessionState::Unscheduled);
	assert_eq!(serde_json::to_value(SessionState::Unscheduled).unwrap(), "unscheduled");
}
