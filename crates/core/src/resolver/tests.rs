use super::*;
use crate::inmem::{MemFolder, MemFunction};
use crate::testing::{StubImporter, stub_chart, stub_skychart};

fn resolver(importer: &Arc<StubImporter>) -> Resolver {
	Resolver::new(Arc::clone(importer) as Arc<dyn Importer>, &SessionConfig::default())
}

#[test]
fn chart_name_requires_three_labels() {
	assert_eq!(chart_name("foo.chart.local"), Some("foo"));
	assert_eq!(chart_name("foo.bar.chart.local"), None);
	assert_eq!(chart_name("foo.charts.local"), None);
	assert_eq!(chart_name(".chart.local"), None);
	assert_eq!(chart_name("skychart"), None);
}

#[tokio::test]
async fn skylink_http_imports_export_path_only() {
	let importer = Arc::new(StubImporter::new());
	importer.serve("https://host:8443/~~export", Entry::folder(MemFolder::new("")));

	let entry = resolver(&importer).resolve("skylink+https://host:8443/ignored/path?q=1").await;
	assert!(entry.is_some());
	assert_eq!(importer.imported(), vec!["https://host:8443/~~export"]);
}

#[tokio::test]
async fn skylink_ws_imports_ws_export() {
	let importer = Arc::new(StubImporter::new());
	importer.serve("ws://host/~~export/ws", Entry::folder(MemFolder::new("")));

	assert!(resolver(&importer).resolve("skylink+ws://host").await.is_some());
	assert_eq!(importer.imported(), vec!["ws://host/~~export/ws"]);
}

#[tokio::test]
async fn unknown_scheme_and_host_resolve_to_none() {
	let importer = Arc::new(StubImporter::new());
	let resolver = resolver(&importer);

	assert!(matches!(resolver.try_resolve("ftp://x").await, Err(Error::UnknownScheme(s)) if s == "ftp"));
	assert!(matches!(resolver.try_resolve("skylink://foo.example.com").await, Err(Error::UnknownHost(_))));
	assert!(matches!(resolver.try_resolve("not a uri").await, Err(Error::InvalidUri { .. })));
	assert!(resolver.resolve("ftp://x").await.is_none());
	assert!(importer.imported().is_empty());
}

#[tokio::test]
async fn chart_host_bootstraps_through_skychart() {
	let chart = stub_chart(["chat"]);
	let importer = Arc::new(StubImporter::new());
	importer.serve(
		"ws://skychart/~~export/ws",
		stub_skychart([("foo".to_string(), Entry::Folder(chart.clone()))]),
	);

	let entry = resolver(&importer).resolve("skylink://foo.chart.local").await.unwrap();
	assert!(entry.same_node(&Entry::Folder(chart)));
	assert_eq!(importer.imported(), vec!["ws://skychart/~~export/ws"]);
}

#[tokio::test]
async fn unknown_chart_fails_open() {
	let importer = Arc::new(StubImporter::new());
	importer.serve("ws://skychart/~~export/ws", stub_skychart([]));

	let err = resolver(&importer).try_resolve("skylink://bar.chart.local").await.unwrap_err();
	assert!(matches!(err, Error::SkychartOpenFailed(ref c) if c == "bar"));
}

#[tokio::test]
async fn skychart_without_open_function_fails() {
	let importer = Arc::new(StubImporter::new());
	importer.serve("ws://skychart/~~export/ws", Entry::folder(MemFolder::new("")));

	let err = resolver(&importer).try_resolve("skylink://foo.chart.local").await.unwrap_err();
	assert!(matches!(err, Error::MissingFunction(ref p) if p == SKYCHART_OPEN_PATH));
}

#[tokio::test]
async fn meta_without_browse_fails() {
	let open = MemFunction::new("invoke", |_| async { Ok::<_, Error>(Some(Entry::folder(MemFolder::new("meta")))) });
	let open_folder = MemFolder::with_children("open", [("invoke", Entry::function(open))]);
	let pub_folder = MemFolder::with_children("pub", [("open", Entry::folder(open_folder))]);
	let skychart = Entry::folder(MemFolder::with_children("", [("pub", Entry::folder(pub_folder))]));

	let importer = Arc::new(StubImporter::new());
	importer.serve("ws://skychart/~~export/ws", skychart);

	let err = resolver(&importer).try_resolve("skylink://foo.chart.local").await.unwrap_err();
	assert!(matches!(err, Error::SkychartBrowseFailed(_)));
}

#[tokio::test]
async fn self_referencing_skychart_hits_depth_bound() {
	let importer = Arc::new(StubImporter::new());
	let config = SessionConfig {
		skychart_uri: "skylink://loop.chart.local".to_string(),
		..SessionConfig::default()
	};
	let resolver = Resolver::new(Arc::clone(&importer) as Arc<dyn Importer>, &config);

	let err = resolver.try_resolve("skylink://foo.chart.local").await.unwrap_err();
	assert!(matches!(err, Error::RecursionLimit { depth: 2, .. }));
	assert!(importer.imported().is_empty());
}

#[tokio::test]
async fn open_wire_returns_folder_at_uri_path() {
	let chart = stub_chart(["chat"]);
	let importer = Arc::new(StubImporter::new());
	importer.serve("http://host/~~export", Entry::Folder(chart));

	let resolver = resolver(&importer);
	let folder = resolver.open_wire("skylink+http://host/apps/chat").await.unwrap();
	assert_eq!(folder.name(), "chat");
	assert!(resolver.open_wire("skylink+http://host/apps/missing").await.is_none());
}

#[test]
fn wire_path_skips_bare_roots() {
	assert_eq!(wire_path("skylink+ws://host"), None);
	assert_eq!(wire_path("skylink+ws://host/"), None);
	assert_eq!(wire_path("skylink+http://host:80/apps/chat/"), Some("/apps/chat".to_string()));
	assert_eq!(wire_path("not a uri"), None);
}

#[tokio::test]
async fn unknown_scheme_logs_a_resolver_warning() {
	let logs = crate::test_logs::LogCapture::warnings();
	let importer = Arc::new(StubImporter::new());

	assert!(resolver(&importer).resolve("ftp://x").await.is_none());

	let warnings = logs.lines_for("sky.resolver");
	assert_eq!(warnings.len(), 1, "{}", logs.text());
	assert!(warnings[0].contains("WARN"));
	assert!(warnings[0].contains("uri=ftp://x"));
	assert!(warnings[0].contains("Unknown skylink URI scheme: ftp"));
}
