//! Skylink Runtime - transports and links to remote namespace exports
//!
//! This crate provides the low-level plumbing for importing a remote
//! namespace tree:
//!
//! - **Transport**: one request/response exchange over HTTP or WebSocket
//! - **Link**: typed `get`/`enumerate`/`store`/`invoke` operations over a transport
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   sky-rs    │  Entries, namespaces, sessions
//! └──────┬──────┘
//!        │ wraps Link in RemoteFolder / RemoteFunction
//! ┌──────▼──────┐
//! │ sky-runtime │  This crate
//! │  ┌────────┐ │
//! │  │ Link   │ │  Typed export operations
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │ Trans  │ │  HTTP/WebSocket transport
//! │  └────────┘ │
//! └─────────────┘
//! ```

pub mod error;
pub mod link;
pub mod transport;

pub use error::{Error, Result};
pub use link::Link;
pub use transport::{ExchangeFuture, HttpTransport, Transport, WebSocketTransport, connect};
