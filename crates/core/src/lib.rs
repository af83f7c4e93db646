//! sky: session-open pipeline for skylink charts.
//!
//! A [`Root`] opens sessions over remotely mounted charts:
//!
//! 1. [`Resolver`] turns a skylink URI into a mounted [`Entry`]
//! 2. bootstrap walks the chart's `/apps` and registers an [`App`] per app
//! 3. [`composer::compose`] gives each app its own namespace over the chart
//!
//! # Example
//!
//! ```ignore
//! use sky::{Root, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let root = Root::new(SessionConfig::default());
//!     let session = root.open_session("skylink+ws://charts.example:9234").unwrap();
//!     session.bootstrapped().await;
//!     for app in session.apps() {
//!         println!("{} -> {}", app.name(), app.status());
//!     }
//! }
//! ```

pub mod composer;
pub mod config;
pub mod entry;
pub mod error;
pub mod inmem;
pub mod namespace;
pub mod registry;
pub mod remote;
pub mod resolver;
pub mod session;
pub mod testing;

#[cfg(test)]
mod test_logs;

pub use composer::AppNamespace;
pub use config::SessionConfig;
pub use entry::{Entry, EntryKind, Folder, Function, StringEntry};
pub use error::{Error, Result};
pub use inmem::{MemFolder, MemFunction, ObscuredFolder};
pub use namespace::{Context, Namespace};
pub use registry::Root;
pub use remote::{Importer, RemoteFolder, RemoteFunction, RemoteImporter};
pub use resolver::Resolver;
pub use session::{App, BootstrapState, ProcessLauncher, RoutineLauncher, RoutineParams, Session, SessionsFolder};

// Re-export the wire and transport crates for callers that talk to exports directly
pub use sky_protocol;
pub use sky_runtime;
