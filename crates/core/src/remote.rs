//! Remote entries backed by a skylink export.
//!
//! [`RemoteImporter`] connects to an export URL and returns its root as an
//! [`Entry`]. Folders and functions below it stay remote: every `children`,
//! `fetch`, `put` and `invoke` is a request over the shared [`Link`].

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use sky_protocol::{EntryType, WireEntry};
use sky_runtime::Link;

use crate::entry::{Entry, Folder, Function};
use crate::error::{Error, Result};
use crate::inmem::MemFolder;

/// Imports a remote namespace tree from an absolute export URL.
#[async_trait]
pub trait Importer: Send + Sync {
	async fn import(&self, url: &str) -> Result<Entry>;
}

/// [`Importer`] that connects over HTTP or WebSocket.
#[derive(Debug, Default, Clone, Copy)]
pub struct RemoteImporter;

#[async_trait]
impl Importer for RemoteImporter {
	async fn import(&self, url: &str) -> Result<Entry> {
		tracing::debug!(target: "sky.remote", %url, "importing remote namespace");
		let link = Link::connect(url).await?;
		let root = link.get("/").await?.ok_or_else(|| Error::NotFound(format!("{url} /")))?;
		decode_at(&link, "/", root)
	}
}

/// Folder living on a remote export.
pub struct RemoteFolder {
	link: Link,
	path: String,
	name: String,
}

impl RemoteFolder {
	pub fn new(link: Link, path: impl Into<String>) -> Self {
		let path = path.into();
		Self {
			name: leaf_name(&path).to_string(),
			link,
			path,
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}
}

#[async_trait]
impl Folder for RemoteFolder {
	fn name(&self) -> &str {
		&self.name
	}

	async fn children(&self) -> Result<Vec<String>> {
		let listing = self.link.enumerate(&self.path).await?;
		Ok(listing.unwrap_or_default().into_iter().map(|entry| entry.name).collect())
	}

	async fn fetch(&self, name: &str) -> Result<Option<Entry>> {
		let path = child_path(&self.path, name);
		match self.link.get(&path).await? {
			Some(wire) => decode_at(&self.link, &path, wire).map(Some),
			None => Ok(None),
		}
	}

	async fn put(&self, name: &str, entry: Option<Entry>) -> Result<bool> {
		let wire = match entry {
			Some(entry) => Some(encode(name, &entry).await?),
			None => None,
		};
		Ok(self.link.store(&child_path(&self.path, name), wire).await?)
	}
}

/// Function living on a remote export.
pub struct RemoteFunction {
	link: Link,
	path: String,
	name: String,
}

impl RemoteFunction {
	pub fn new(link: Link, path: impl Into<String>) -> Self {
		let path = path.into();
		Self {
			name: leaf_name(&path).to_string(),
			link,
			path,
		}
	}

	pub fn path(&self) -> &str {
		&self.path
	}
}

#[async_trait]
impl Function for RemoteFunction {
	fn name(&self) -> &str {
		&self.name
	}

	async fn invoke(&self, input: Option<Entry>) -> Result<Option<Entry>> {
		let input = match input {
			Some(entry) => Some(encode("", &entry).await?),
			None => None,
		};
		match self.link.invoke(&self.path, input).await? {
			Some(output) => decode_inline(&self.link, output).map(Some),
			None => Ok(None),
		}
	}
}

/// Decodes an entry known to live at `path` on the export.
fn decode_at(link: &Link, path: &str, wire: WireEntry) -> Result<Entry> {
	let path = wire.handle.as_deref().unwrap_or(path);
	match wire.kind {
		EntryType::Folder => Ok(Entry::folder(RemoteFolder::new(link.clone(), path))),
		EntryType::Function => Ok(Entry::function(RemoteFunction::new(link.clone(), path))),
		EntryType::String => Ok(Entry::string(leaf_name(path), wire.string_value.unwrap_or_default())),
		EntryType::Blob => Err(Error::Unsupported(format!("blob entry at {path}"))),
	}
}

/// Decodes an entry returned by value, such as an invocation output.
///
/// Folders and functions carrying a handle stay remote. Inline folders are
/// materialized as in-memory snapshots.
fn decode_inline(link: &Link, wire: WireEntry) -> Result<Entry> {
	if let Some(handle) = wire.handle.clone() {
		return decode_at(link, &handle, wire);
	}

	match wire.kind {
		EntryType::Folder => {
			let folder = MemFolder::new(wire.name);
			for child in wire.children.unwrap_or_default() {
				let name = child.name.clone();
				folder.insert(name, decode_inline(link, child)?);
			}
			Ok(Entry::folder(folder))
		}
		EntryType::String => Ok(Entry::string(wire.name, wire.string_value.unwrap_or_default())),
		EntryType::Function => Err(Error::Unsupported(format!("function '{}' returned without a handle", wire.name))),
		EntryType::Blob => Err(Error::Unsupported(format!("blob entry '{}'", wire.name))),
	}
}

type EncodeFuture<'a> = Pin<Box<dyn Future<Output = Result<WireEntry>> + Send + 'a>>;

/// Encodes an entry for sending by value. Folders are copied deeply.
fn encode<'a>(name: &'a str, entry: &'a Entry) -> EncodeFuture<'a> {
	Box::pin(async move {
		match entry {
			Entry::String(string) => Ok(WireEntry::string(name, string.value.clone())),
			Entry::Folder(folder) => {
				let mut children = Vec::new();
				for child_name in folder.children().await? {
					if let Some(child) = folder.fetch(&child_name).await? {
						children.push(encode(&child_name, &child).await?);
					}
				}
				Ok(WireEntry::folder(name, children))
			}
			Entry::Function(function) => Err(Error::Unsupported(format!("cannot send function '{}' by value", function.name()))),
		}
	})
}

pub(crate) fn child_path(base: &str, name: &str) -> String {
	if base.ends_with('/') {
		format!("{base}{name}")
	} else {
		format!("{base}/{name}")
	}
}

fn leaf_name(path: &str) -> &str {
	path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}
