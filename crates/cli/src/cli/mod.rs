
use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

/// Help colours: section headings stand out, chart URLs and flags read as literals.
fn help_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Blue.on_default().bold().underline())
		.usage(AnsiColor::Blue.on_default().bold())
		.literal(AnsiColor::Magenta.on_default())
		.placeholder(AnsiColor::Yellow.on_default())
		.error(AnsiColor::Red.on_default().bold())
		.valid(AnsiColor::Green.on_default())
		.invalid(AnsiColor::Red.on_default())
}

/// Default time `open --wait` waits for bootstrap.
pub const DEFAULT_WAIT_MS: u64 = 10_000;

#[derive(Parser, Debug)]
#[command(name = "sky")]
#[command(about = "Open and inspect skylink chart sessions")]
#[command(version)]
#[command(styles = help_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Session config file (JSON)
	#[arg(short, long, global = true, value_name = "FILE")]
	pub config: Option<PathBuf>,

	/// Output format: json (default), ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "json")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Open a session over a chart and report its apps.
	Open(OpenArgs),
	/// Resolve a skylink URI and list what it mounts.
	Resolve(ResolveArgs),
}

impl Commands {
	/// Command name as reported in the output envelope.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Open(_) => "open",
			Commands::Resolve(_) => "resolve",
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct OpenArgs {
	/// Chart URL (for example: skylink://me.chart.local, skylink+ws://host:9234).
	#[arg(value_name = "CHART_URL")]
	pub chart_url: String,

	/// Wait for bootstrap to finish before reporting.
	#[arg(long)]
	pub wait: bool,

	/// Upper bound on --wait, in milliseconds.
	#[arg(long, value_name = "MS", default_value_t = DEFAULT_WAIT_MS, requires = "wait")]
	pub timeout_ms: u64,
}

#[derive(Args, Debug, Clone)]
pub struct ResolveArgs {
	/// Skylink URI to resolve.
	#[arg(value_name = "URI")]
	pub uri: String,

	/// Folder path inside the mounted namespace to list.
	#[arg(long, value_name = "PATH")]
	pub path: Option<String>,
}
