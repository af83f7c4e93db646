//! In-memory folder and function primitives.
//!
//! - [`MemFolder`]: ordered, concurrency-safe folder of entries
//! - [`MemFunction`]: function backed by an async closure
//! - [`ObscuredFolder`]: keyed mapping that refuses to enumerate its contents

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::entry::{Entry, Folder, Function};
use crate::error::Result;

/// Folder kept in memory. Children enumerate in insertion order.
pub struct MemFolder {
	name: String,
	entries: RwLock<IndexMap<String, Entry>>,
}

impl MemFolder {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			entries: RwLock::new(IndexMap::new()),
		}
	}

	/// Creates a folder pre-populated with `(name, entry)` pairs.
	pub fn with_children<N: Into<String>>(name: impl Into<String>, children: impl IntoIterator<Item = (N, Entry)>) -> Self {
		let entries = children.into_iter().map(|(n, e)| (n.into(), e)).collect();
		Self {
			name: name.into(),
			entries: RwLock::new(entries),
		}
	}

	pub fn get(&self, name: &str) -> Option<Entry> {
		self.entries.read().get(name).cloned()
	}

	/// Inserts or replaces a child, returning the previous entry.
	pub fn insert(&self, name: impl Into<String>, entry: Entry) -> Option<Entry> {
		self.entries.write().insert(name.into(), entry)
	}

	pub fn remove(&self, name: &str) -> Option<Entry> {
		self.entries.write().shift_remove(name)
	}

	pub fn names(&self) -> Vec<String> {
		self.entries.read().keys().cloned().collect()
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

#[async_trait]
impl Folder for MemFolder {
	fn name(&self) -> &str {
		&self.name
	}

	async fn children(&self) -> Result<Vec<String>> {
		Ok(self.names())
	}

	async fn fetch(&self, name: &str) -> Result<Option<Entry>> {
		Ok(self.get(name))
	}

	async fn put(&self, name: &str, entry: Option<Entry>) -> Result<bool> {
		match entry {
			Some(entry) => {
				self.insert(name, entry);
			}
			None => {
				self.remove(name);
			}
		}
		Ok(true)
	}
}

/// Boxed future returned by a [`MemFunction`] handler.
pub type FunctionFuture = Pin<Box<dyn Future<Output = Result<Option<Entry>>> + Send>>;

/// Handler function: optional input entry → async optional output entry.
pub type FunctionFn = Arc<dyn Fn(Option<Entry>) -> FunctionFuture + Send + Sync>;

/// Function whose body is an async closure.
pub struct MemFunction {
	name: String,
	handler: FunctionFn,
}

impl MemFunction {
	pub fn new<F, Fut>(name: impl Into<String>, handler: F) -> Self
	where
		F: Fn(Option<Entry>) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Option<Entry>>> + Send + 'static,
	{
		Self {
			name: name.into(),
			handler: Arc::new(move |input| Box::pin(handler(input))),
		}
	}
}

#[async_trait]
impl Function for MemFunction {
	fn name(&self) -> &str {
		&self.name
	}

	async fn invoke(&self, input: Option<Entry>) -> Result<Option<Entry>> {
		(self.handler)(input).await
	}
}

/// Keyed mapping that does not enumerate its contents.
///
/// Values can only be reached by knowing their key. Inserting an existing key
/// or inserting past the optional capacity limit is rejected.
pub struct ObscuredFolder<V> {
	name: String,
	entries: DashMap<String, V>,
	count: AtomicUsize,
	limit: Option<usize>,
}

impl<V: Clone> ObscuredFolder<V> {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			entries: DashMap::new(),
			count: AtomicUsize::new(0),
			limit: None,
		}
	}

	/// Creates a folder that accepts at most `limit` entries.
	pub fn with_limit(name: impl Into<String>, limit: Option<usize>) -> Self {
		Self {
			limit,
			..Self::new(name)
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn get(&self, key: &str) -> Option<V> {
		self.entries.get(key).map(|r| r.value().clone())
	}

	/// Inserts `value` under a fresh `key`. Returns false if rejected.
	pub fn insert(&self, key: impl Into<String>, value: V) -> bool {
		let MapEntry::Vacant(slot) = self.entries.entry(key.into()) else {
			return false;
		};

		let reserved = self.count.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| match self.limit {
			Some(limit) if n >= limit => None,
			_ => Some(n + 1),
		});
		if reserved.is_err() {
			return false;
		}

		slot.insert(value);
		true
	}

	pub fn len(&self) -> usize {
		self.count.load(Ordering::SeqCst)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[async_trait]
impl Folder for ObscuredFolder<Entry> {
	fn name(&self) -> &str {
		&self.name
	}

	async fn children(&self) -> Result<Vec<String>> {
		Ok(Vec::new())
	}

	async fn fetch(&self, name: &str) -> Result<Option<Entry>> {
		Ok(self.get(name))
	}

	async fn put(&self, name: &str, entry: Option<Entry>) -> Result<bool> {
		match entry {
			Some(entry) => Ok(self.insert(name, entry)),
			None => Ok(false),
		}
	}
}
