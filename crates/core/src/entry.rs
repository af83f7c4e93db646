//! Entry - typed handles to namespace nodes.
//!
//! Every node of a namespace is an [`Entry`]: a folder, a callable function,
//! or a string leaf. Narrowing to a concrete kind is explicit and fallible
//! through [`Entry::into_folder`], [`Entry::into_function`] and
//! [`Entry::into_string`].

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// A directory-like node.
#[async_trait]
pub trait Folder: Send + Sync {
	fn name(&self) -> &str;

	/// Names of the immediate children. Obscured folders may return nothing.
	async fn children(&self) -> Result<Vec<String>>;

	/// Fetches a single child by name.
	async fn fetch(&self, name: &str) -> Result<Option<Entry>>;

	/// Stores `entry` under `name`, or removes `name` when `entry` is `None`.
	///
	/// Returns whether the folder accepted the write.
	async fn put(&self, name: &str, entry: Option<Entry>) -> Result<bool>;
}

/// A callable node.
#[async_trait]
pub trait Function: Send + Sync {
	fn name(&self) -> &str;

	/// Invokes the function. `Ok(None)` means it produced nothing.
	async fn invoke(&self, input: Option<Entry>) -> Result<Option<Entry>>;
}

/// A string leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEntry {
	pub name: String,
	pub value: String,
}

/// Discriminant of an [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
	Folder,
	Function,
	String,
}

impl fmt::Display for EntryKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EntryKind::Folder => f.write_str("folder"),
			EntryKind::Function => f.write_str("function"),
			EntryKind::String => f.write_str("string"),
		}
	}
}

/// Handle to a node in a namespace.
///
/// Cloning an entry shares the underlying node; it never copies a subtree.
#[derive(Clone)]
pub enum Entry {
	Folder(Arc<dyn Folder>),
	Function(Arc<dyn Function>),
	String(StringEntry),
}

impl Entry {
	/// Creates a string-valued entry.
	pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
		Entry::String(StringEntry {
			name: name.into(),
			value: value.into(),
		})
	}

	pub fn folder(folder: impl Folder + 'static) -> Self {
		Entry::Folder(Arc::new(folder))
	}

	pub fn function(function: impl Function + 'static) -> Self {
		Entry::Function(Arc::new(function))
	}

	pub fn kind(&self) -> EntryKind {
		match self {
			Entry::Folder(_) => EntryKind::Folder,
			Entry::Function(_) => EntryKind::Function,
			Entry::String(_) => EntryKind::String,
		}
	}

	pub fn name(&self) -> &str {
		match self {
			Entry::Folder(folder) => folder.name(),
			Entry::Function(function) => function.name(),
			Entry::String(string) => &string.name,
		}
	}

	pub fn into_folder(self) -> Result<Arc<dyn Folder>> {
		match self {
			Entry::Folder(folder) => Ok(folder),
			other => Err(other.wrong_kind(EntryKind::Folder)),
		}
	}

	pub fn into_function(self) -> Result<Arc<dyn Function>> {
		match self {
			Entry::Function(function) => Ok(function),
			other => Err(other.wrong_kind(EntryKind::Function)),
		}
	}

	pub fn into_string(self) -> Result<StringEntry> {
		match self {
			Entry::String(string) => Ok(string),
			other => Err(other.wrong_kind(EntryKind::String)),
		}
	}

	/// Returns true if both entries are handles to the same node.
	///
	/// Strings compare by value since they carry no identity.
	pub fn same_node(&self, other: &Entry) -> bool {
		match (self, other) {
			(Entry::Folder(a), Entry::Folder(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
			(Entry::Function(a), Entry::Function(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
			(Entry::String(a), Entry::String(b)) => a == b,
			_ => false,
		}
	}

	fn wrong_kind(&self, expected: EntryKind) -> Error {
		Error::WrongKind {
			expected,
			found: self.kind(),
		}
	}
}

impl fmt::Debug for Entry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Entry::String(string) => f
				.debug_struct("String")
				.field("name", &string.name)
				.field("value", &string.value)
				.finish(),
			other => f
				.debug_struct("Entry")
				.field("kind", &other.kind())
				.field("name", &other.name())
				.finish(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::inmem::MemFolder;

	#[test]
	fn narrowing_a_string_to_folder_fails_cleanly() {
		let err = Entry::string("a", "chat").into_folder().err().unwrap();
		match err {
			Error::WrongKind { expected, found } => {
				assert_eq!(expected, EntryKind::Folder);
				assert_eq!(found, EntryKind::String);
			}
			other => panic!("Expected WrongKind, got {other:?}"),
		}
	}

	#[test]
	fn clones_share_the_same_node() {
		let entry = Entry::folder(MemFolder::new("apps"));
		let clone = entry.clone();
		assert!(entry.same_node(&clone));
		assert!(!entry.same_node(&Entry::folder(MemFolder::new("apps"))));
	}

	#[test]
	fn name_and_kind_follow_the_variant() {
		let entry = Entry::folder(MemFolder::new("config"));
		assert_eq!(entry.name(), "config");
		assert_eq!(entry.kind(), EntryKind::Folder);
		assert_eq!(Entry::string("x", "y").into_string().unwrap().value, "y");
	}
}
