use std::sync::Arc;

use sky::resolver::wire_path;
use sky::{Context, Entry, Namespace, RemoteImporter, Resolver, SessionConfig};

use crate::cli::ResolveArgs;
use crate::error::{CliError, Result};
use crate::output::{OutputFormat, ResolveData};

pub async fn execute(config: &SessionConfig, args: ResolveArgs, format: OutputFormat) -> Result<()> {
	let resolver = Resolver::new(Arc::new(RemoteImporter), config);
	let data = resolve_uri(&resolver, &args).await?;
	super::emit_success(
		"resolve",
		serde_json::json!({ "uri": args.uri, "path": args.path }),
		data,
		Vec::new(),
		format,
	);
	Ok(())
}

/// Resolves `args.uri` and describes the entry at `args.path` (default `/`).
///
/// Without `--path`, a URI that carries its own path is opened as a wire:
/// the folder at that path inside the mounted namespace is listed.
pub async fn resolve_uri(resolver: &Resolver, args: &ResolveArgs) -> Result<ResolveData> {
	if let (None, Some(path)) = (&args.path, wire_path(&args.uri)) {
		let folder = resolver.open_wire(&args.uri).await.ok_or_else(|| CliError::NotFound {
			uri: args.uri.clone(),
			path: path.clone(),
		})?;
		return Ok(ResolveData {
			uri: args.uri.clone(),
			path,
			kind: "folder".to_string(),
			children: folder.children().await?,
		});
	}

	let root = resolver.try_resolve(&args.uri).await.map_err(|source| CliError::Resolve {
		uri: args.uri.clone(),
		source,
	})?;

	let path = args.path.clone().unwrap_or_else(|| "/".to_string());
	let ctx = Context::new(Namespace::new(args.uri.clone(), root));
	let entry = ctx.try_get(&path).await?.ok_or_else(|| CliError::NotFound {
		uri: args.uri.clone(),
		path: path.clone(),
	})?;

	let children = match &entry {
		Entry::Folder(folder) => folder.children().await?,
		_ => Vec::new(),
	};

	Ok(ResolveData {
		uri: args.uri.clone(),
		path,
		kind: entry.kind().to_string(),
		children,
	})
}
