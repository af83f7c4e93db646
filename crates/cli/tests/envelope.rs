//! Integration tests for the `sky` output envelope.

use std::path::PathBuf;
use std::process::Command;

use serde_json::json;

fn sky_binary() -> PathBuf {
	PathBuf::from(env!("CARGO_BIN_EXE_sky"))
}

fn run(args: &[&str]) -> (serde_json::Value, bool) {
	let output = Command::new(sky_binary())
		.env_remove("RUST_LOG")
		.args(["-f", "ndjson"])
		.args(args)
		.output()
		.expect("failed to execute sky");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let parsed = serde_json::from_str::<serde_json::Value>(stdout.trim()).unwrap_or_else(|_| json!({ "raw": stdout }));
	(parsed, output.status.success())
}

#[test]
fn open_unknown_scheme_still_returns_a_session() {
	let (json, success) = run(&["open", "ftp://x", "--wait", "--timeout-ms", "2000"]);

	assert!(success, "open should succeed: {json}");
	assert_eq!(json["ok"], true);
	assert_eq!(json["command"], "open");
	assert_eq!(json["data"]["chartUrl"], "ftp://x");
	assert_eq!(json["data"]["state"], "unresolved");
	assert_eq!(json["data"]["apps"], json!([]));
	assert!(json["data"]["uri"].as_str().unwrap().contains(":9234/pub/sessions/"));
	assert_eq!(json["diagnostics"][0]["level"], "warning");
	assert!(json["diagnostics"][0]["message"].as_str().unwrap().contains("ftp://x"));
}

#[test]
fn resolve_unknown_scheme_fails_with_envelope() {
	let (json, success) = run(&["resolve", "ftp://x"]);

	assert!(!success);
	assert_eq!(json["ok"], false);
	assert_eq!(json["command"], "resolve");
	assert_eq!(json["error"]["code"], "RESOLVE_FAILED");
	assert_eq!(json["error"]["details"]["uri"], "ftp://x");
}

#[test]
fn bad_config_path_is_reported() {
	let (json, success) = run(&["--config", "/nonexistent/sky.json", "open", "ftp://x"]);

	assert!(!success);
	assert_eq!(json["error"]["code"], "CONFIG_ERROR");
}
