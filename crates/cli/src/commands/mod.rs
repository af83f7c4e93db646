mod open;
mod resolve;

use std::path::Path;

use serde::Serialize;
use sky::SessionConfig;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::output::{self, Diagnostic, OutputFormat, ResultBuilder};

pub use open::open_session;
pub use resolve::resolve_uri;

pub async fn dispatch(cli: Cli) -> Result<()> {
	let config = load_config(cli.config.as_deref())?;
	let format = cli.format;

	match cli.command {
		Commands::Open(args) => open::execute(&config, args, format).await,
		Commands::Resolve(args) => resolve::execute(&config, args, format).await,
	}
}

/// Loads the session config from `path` (or defaults) and applies `SKY_*` overrides.
pub fn load_config(path: Option<&Path>) -> Result<SessionConfig> {
	let config = match path {
		Some(path) => SessionConfig::load(path).map_err(|source| CliError::Config {
			path: path.to_path_buf(),
			source,
		})?,
		None => SessionConfig::default(),
	};
	Ok(config.with_env()?)
}

fn emit_success<T: Serialize>(
	command: &str,
	inputs: serde_json::Value,
	data: T,
	diagnostics: Vec<Diagnostic>,
	format: OutputFormat,
) {
	let result = ResultBuilder::new(command)
		.inputs(inputs)
		.data(data)
		.diagnostics(diagnostics)
		.build();
	output::print_result(&result, format);
}
