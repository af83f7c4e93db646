//! Wire types for the skylink namespace export protocol.
//!
//! This crate only carries the serde shapes; transports live in `sky-runtime`
//! and the entry model lives in `sky-rs`.

pub mod wire;

pub use wire::{EntryType, Op, Request, Response, WireEntry};

/// Path suffix appended to an HTTP base URL to reach its export.
pub const HTTP_EXPORT_SUFFIX: &str = "/~~export";

/// Path suffix appended to a WebSocket base URL to reach its export.
pub const WS_EXPORT_SUFFIX: &str = "/~~export/ws";
