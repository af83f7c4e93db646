//! Request, response and entry shapes exchanged with a namespace export.
//!
//! An export (`/~~export` over HTTP, `/~~export/ws` over WebSocket) accepts
//! one [`Request`] per message and answers with exactly one [`Response`].
//! Over WebSocket, responses arrive in the order the requests were written.
//!
//! Field names are PascalCase on the wire:
//!
//! ```json
//! {"Op": "get", "Path": "/apps/chat"}
//! {"Ok": true, "Output": {"Name": "chat", "Type": "Folder", "Children": []}}
//! ```

use serde::{Deserialize, Serialize};

/// Operation requested from an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
	/// Liveness probe, answered with `Ok: true` and no output.
	Ping,
	/// Fetch a single entry. Folders are returned with shallow children.
	Get,
	/// List a folder's children, returned as a folder entry.
	Enumerate,
	/// Store `Input` at `Dest`, or delete `Dest` when `Input` is absent.
	Store,
	/// Invoke the function at `Path` with `Input`.
	Invoke,
}

/// Kind of a [`WireEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
	Folder,
	String,
	Function,
	Blob,
}

/// A node of a remote namespace as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireEntry {
	#[serde(default)]
	pub name: String,
	#[serde(rename = "Type")]
	pub kind: EntryType,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub string_value: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub children: Option<Vec<WireEntry>>,
	/// Path on the exporting server where this folder or function stays
	/// addressable. Set on invocation outputs that cannot be sent inline.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub handle: Option<String>,
}

impl WireEntry {
	/// Creates a string entry.
	pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: EntryType::String,
			string_value: Some(value.into()),
			children: None,
			handle: None,
		}
	}

	/// Creates a folder entry carrying `children` inline.
	pub fn folder(name: impl Into<String>, children: Vec<WireEntry>) -> Self {
		Self {
			name: name.into(),
			kind: EntryType::Folder,
			string_value: None,
			children: Some(children),
			handle: None,
		}
	}

	/// Creates a function entry.
	pub fn function(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			kind: EntryType::Function,
			string_value: None,
			children: None,
			handle: None,
		}
	}

	/// Marks this entry as addressable at `path` on the exporting server.
	pub fn with_handle(mut self, path: impl Into<String>) -> Self {
		self.handle = Some(path.into());
		self
	}

	/// Returns the child names, or an empty list for non-folders.
	pub fn child_names(&self) -> Vec<String> {
		self.children
			.as_deref()
			.unwrap_or_default()
			.iter()
			.map(|c| c.name.clone())
			.collect()
	}
}

/// A single operation sent to an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Request {
	pub op: Op,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dest: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub input: Option<WireEntry>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub depth: Option<u32>,
}

impl Request {
	pub fn ping() -> Self {
		Self::new(Op::Ping)
	}

	pub fn get(path: impl Into<String>) -> Self {
		Self {
			path: Some(path.into()),
			..Self::new(Op::Get)
		}
	}

	pub fn enumerate(path: impl Into<String>) -> Self {
		Self {
			path: Some(path.into()),
			depth: Some(1),
			..Self::new(Op::Enumerate)
		}
	}

	pub fn store(dest: impl Into<String>, input: Option<WireEntry>) -> Self {
		Self {
			dest: Some(dest.into()),
			input,
			..Self::new(Op::Store)
		}
	}

	pub fn invoke(path: impl Into<String>, input: Option<WireEntry>) -> Self {
		Self {
			path: Some(path.into()),
			input,
			..Self::new(Op::Invoke)
		}
	}

	fn new(op: Op) -> Self {
		Self {
			op,
			path: None,
			dest: None,
			input: None,
			depth: None,
		}
	}
}

/// The answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Response {
	pub ok: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub output: Option<WireEntry>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl Response {
	pub fn ok(output: Option<WireEntry>) -> Self {
		Self {
			ok: true,
			output,
			error: None,
		}
	}

	pub fn failed(error: impl Into<String>) -> Self {
		Self {
			ok: false,
			output: None,
			error: Some(error.into()),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn request_uses_pascal_case_and_lowercase_op() {
		let json = serde_json::to_string(&Request::get("/apps")).unwrap();
		assert_eq!(json, r#"{"Op":"get","Path":"/apps"}"#);
	}

	#[test]
	fn store_without_input_omits_the_field() {
		let json = serde_json::to_value(Request::store("/config/chat", None)).unwrap();
		assert_eq!(json["Op"], "store");
		assert_eq!(json["Dest"], "/config/chat");
		assert!(json.get("Input").is_none());
	}

	#[test]
	fn folder_entry_parses_children_and_handle() {
		let json = r#"{
			"Name": "meta",
			"Type": "Folder",
			"Handle": "/sessions/abc/meta",
			"Children": [{"Name": "browse", "Type": "Folder"}, {"Name": "id", "Type": "String", "StringValue": "x"}]
		}"#;
		let entry: WireEntry = serde_json::from_str(json).unwrap();
		assert_eq!(entry.kind, EntryType::Folder);
		assert_eq!(entry.handle.as_deref(), Some("/sessions/abc/meta"));
		assert_eq!(entry.child_names(), vec!["browse", "id"]);
		assert_eq!(entry.children.unwrap()[1].string_value.as_deref(), Some("x"));
	}

	#[test]
	fn failed_response_without_output() {
		let response: Response = serde_json::from_str(r#"{"Ok": false, "Error": "not found"}"#).unwrap();
		assert!(!response.ok);
		assert!(response.output.is_none());
		assert_eq!(response.error.as_deref(), Some("not found"));
	}

	#[test]
	fn string_entry_without_name_defaults_empty() {
		let entry: WireEntry = serde_json::from_str(r#"{"Type": "String", "StringValue": "chat"}"#).unwrap();
		assert_eq!(entry.name, "");
		assert_eq!(entry, WireEntry::string("", "chat"));
	}
}
