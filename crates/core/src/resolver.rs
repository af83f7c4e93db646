//! Skylink URI resolver.
//!
//! Turns a chart reference into a mounted remote entry:
//!
//! | scheme | behaviour |
//! |---|---|
//! | `skylink+http(s)` | import `http(s)://<authority>/~~export` |
//! | `skylink+ws(s)` | import `ws(s)://<authority>/~~export/ws` |
//! | `skylink` | `<chart>.chart.local` only: bootstrap through the skychart |
//!
//! Only the scheme and authority of the URI take part; path and query are
//! ignored. The skychart bootstrap resolves the skychart URI recursively,
//! bounded by [`SessionConfig::max_resolve_depth`].

#[cfg(test)]
mod tests;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sky_protocol::{HTTP_EXPORT_SUFFIX, WS_EXPORT_SUFFIX};
use url::Url;

use crate::config::SessionConfig;
use crate::entry::{Entry, Folder};
use crate::error::{Error, Result};
use crate::namespace::{Context, Namespace};
use crate::remote::Importer;

/// Namespace base the skychart service is mounted under.
pub const SKYCHART_NAMESPACE: &str = "skylink://skychart.local";

/// Path of the skychart's chart-open function.
pub const SKYCHART_OPEN_PATH: &str = "/pub/open/invoke";

type ResolveFuture<'a> = Pin<Box<dyn Future<Output = Result<Entry>> + Send + 'a>>;

pub struct Resolver {
	importer: Arc<dyn Importer>,
	skychart_uri: String,
	max_depth: usize,
}

impl Resolver {
	pub fn new(importer: Arc<dyn Importer>, config: &SessionConfig) -> Self {
		Self {
			importer,
			skychart_uri: config.skychart_uri.clone(),
			max_depth: config.max_resolve_depth,
		}
	}

	/// Resolves `uri`, logging any failure and returning `None` for it.
	pub async fn resolve(&self, uri: &str) -> Option<Entry> {
		match self.try_resolve(uri).await {
			Ok(entry) => Some(entry),
			Err(err) => {
				tracing::warn!(target: "sky.resolver", %uri, error = %err, "skylink open failed");
				None
			}
		}
	}

	pub async fn try_resolve(&self, uri: &str) -> Result<Entry> {
		self.resolve_at(uri, 0).await
	}

	/// Resolves the namespace behind `uri` and returns the folder at the URI's
	/// path inside it.
	pub async fn open_wire(&self, uri: &str) -> Option<Arc<dyn Folder>> {
		let parsed = match parse(uri) {
			Ok(parsed) => parsed,
			Err(err) => {
				tracing::warn!(target: "sky.resolver", %uri, error = %err, "skylink wire open failed");
				return None;
			}
		};

		let base = format!("{}://{}", parsed.scheme(), authority(&parsed).ok()?);
		let root = self.resolve(&base).await?;
		let ctx = Context::new(Namespace::new("tmp:/", root));
		ctx.get_folder(parsed.path()).await
	}

	fn resolve_at<'a>(&'a self, uri: &'a str, depth: usize) -> ResolveFuture<'a> {
		Box::pin(async move {
			if depth >= self.max_depth {
				return Err(Error::RecursionLimit {
					uri: uri.to_string(),
					depth,
				});
			}

			let parsed = parse(uri)?;
			tracing::info!(target: "sky.resolver", scheme = parsed.scheme(), host = ?parsed.host_str(), "importing");

			match parsed.scheme() {
				"skylink+http" | "skylink+https" => self.import(&parsed, HTTP_EXPORT_SUFFIX).await,
				"skylink+ws" | "skylink+wss" => self.import(&parsed, WS_EXPORT_SUFFIX).await,
				"skylink" => {
					let host = parsed.host_str().unwrap_or_default();
					match chart_name(host) {
						Some(chart) => self.open_chart(chart, depth).await,
						None => Err(Error::UnknownHost(host.to_string())),
					}
				}
				other => Err(Error::UnknownScheme(other.to_string())),
			}
		})
	}

	async fn import(&self, uri: &Url, suffix: &str) -> Result<Entry> {
		let transport = uri.scheme().trim_start_matches("skylink+");
		let url = format!("{transport}://{}{suffix}", authority(uri)?);
		self.importer.import(&url).await
	}

	/// Opens `chart` through the cluster-local skychart.
	async fn open_chart(&self, chart: &str, depth: usize) -> Result<Entry> {
		let skychart = self.resolve_at(&self.skychart_uri, depth + 1).await?;
		let ctx = Context::new(Namespace::new(SKYCHART_NAMESPACE, skychart));

		let open = ctx
			.get_function(SKYCHART_OPEN_PATH)
			.await
			.ok_or_else(|| Error::MissingFunction(SKYCHART_OPEN_PATH.to_string()))?;

		let meta = open
			.invoke(Some(Entry::string("", chart)))
			.await?
			.ok_or_else(|| Error::SkychartOpenFailed(chart.to_string()))?
			.into_folder()?;

		let browse = meta
			.fetch("browse")
			.await?
			.ok_or_else(|| Error::SkychartBrowseFailed(chart.to_string()))?
			.into_folder()?
			.fetch("invoke")
			.await?
			.ok_or_else(|| Error::SkychartBrowseFailed(chart.to_string()))?
			.into_function()?;

		browse
			.invoke(None)
			.await?
			.ok_or_else(|| Error::SkychartBrowseFailed(chart.to_string()))
	}
}

/// Path of `uri` when it names something below the mounted root.
pub fn wire_path(uri: &str) -> Option<String> {
	let parsed = Url::parse(uri).ok()?;
	let path = parsed.path().trim_end_matches('/');
	(!path.is_empty()).then(|| path.to_string())
}

fn parse(uri: &str) -> Result<Url> {
	Url::parse(uri).map_err(|e| Error::InvalidUri {
		uri: uri.to_string(),
		reason: e.to_string(),
	})
}

/// `host[:port]` of a parsed URI.
fn authority(uri: &Url) -> Result<String> {
	let host = uri.host_str().filter(|h| !h.is_empty()).ok_or_else(|| Error::InvalidUri {
		uri: uri.to_string(),
		reason: "missing host".to_string(),
	})?;
	Ok(match uri.port() {
		Some(port) => format!("{host}:{port}"),
		None => host.to_string(),
	})
}

/// Returns `<chart>` for a `<chart>.chart.local` host.
fn chart_name(host: &str) -> Option<&str> {
	match host.split('.').collect::<Vec<_>>().as_slice() {
		[chart, "chart", "local"] if !chart.is_empty() => Some(*chart),
		_ => None,
	}
}
