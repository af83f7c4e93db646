//! Namespaces and path-based contexts.
//!
//! A [`Namespace`] anchors a root [`Entry`] at a base URI. A [`Context`] walks
//! `/`-separated paths through that root, fetching one segment at a time.


use std::sync::Arc;

use crate::entry::{Entry, Folder, Function};
use crate::error::{Error, Result};
use crate::inmem::MemFolder;

/// A named tree of entries anchored at a base URI.
#[derive(Debug)]
pub struct Namespace {
	base_uri: String,
	root: Entry,
}

impl Namespace {
	pub fn new(base_uri: impl Into<String>, root: Entry) -> Self {
		Self {
			base_uri: base_uri.into(),
			root,
		}
	}

	pub fn base_uri(&self) -> &str {
		&self.base_uri
	}

	pub fn root(&self) -> &Entry {
		&self.root
	}
}

/// Root context performing path lookups in a [`Namespace`].
///
/// Cheap to clone; clones share the namespace.
#[derive(Debug, Clone)]
pub struct Context {
	namespace: Arc<Namespace>,
}

impl Context {
	pub fn new(namespace: Namespace) -> Self {
		Self {
			namespace: Arc::new(namespace),
		}
	}

	pub fn namespace(&self) -> &Namespace {
		&self.namespace
	}

	pub fn root(&self) -> &Entry {
		self.namespace.root()
	}

	/// Looks up `path`, logging and swallowing lookup failures.
	pub async fn get(&self, path: &str) -> Option<Entry> {
		match self.try_get(path).await {
			Ok(entry) => entry,
			Err(err) => {
				tracing::debug!(target: "sky.namespace", base = %self.namespace.base_uri, %path, error = %err, "lookup failed");
				None
			}
		}
	}

	/// Looks up `path`. A missing segment, or a segment below a non-folder,
	/// is `Ok(None)`; transport failures are errors.
	pub async fn try_get(&self, path: &str) -> Result<Option<Entry>> {
		let mut current = self.root().clone();
		for segment in segments(path) {
			let Entry::Folder(folder) = current else {
				return Ok(None);
			};
			match folder.fetch(segment).await? {
				Some(next) => current = next,
				None => return Ok(None),
			}
		}
		Ok(Some(current))
	}

	pub async fn get_folder(&self, path: &str) -> Option<Arc<dyn Folder>> {
		self.narrow(path, self.get(path).await?.into_folder())
	}

	pub async fn get_function(&self, path: &str) -> Option<Arc<dyn Function>> {
		self.narrow(path, self.get(path).await?.into_function())
	}

	/// Stores `entry` at `path`, creating missing parent folders on the way.
	///
	/// Returns whether the final write was accepted.
	pub async fn put(&self, path: &str, entry: Entry) -> Result<bool> {
		let parts: Vec<&str> = segments(path).collect();
		let Some((leaf, parents)) = parts.split_last() else {
			return Err(Error::Unsupported(format!("cannot replace the root of {}", self.namespace.base_uri)));
		};

		let mut folder = self.root().clone().into_folder()?;
		for segment in parents {
			folder = match folder.fetch(segment).await? {
				Some(existing) => existing.into_folder()?,
				None => {
					tracing::debug!(target: "sky.namespace", base = %self.namespace.base_uri, %segment, "creating missing folder");
					folder.put(segment, Some(Entry::folder(MemFolder::new(*segment)))).await?;
					folder
						.fetch(segment)
						.await?
						.ok_or_else(|| Error::NotFound(path.to_string()))?
						.into_folder()?
				}
			};
		}

		folder.put(leaf, Some(entry)).await
	}

	fn narrow<T>(&self, path: &str, narrowed: Result<T>) -> Option<T> {
		narrowed
			.inspect_err(|err| tracing::debug!(target: "sky.namespace", %path, error = %err, "entry has the wrong kind"))
			.ok()
	}
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
	path.split('/').filter(|s| !s.is_empty())
}
