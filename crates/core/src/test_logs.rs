//! Captures `tracing` output of the current thread for assertions.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Clone, Default)]
struct Buffer(Arc<Mutex<Vec<u8>>>);

impl Write for Buffer {
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		self.0.lock().extend_from_slice(buf);
		Ok(buf.len())
	}

	fn flush(&mut self) -> std::io::Result<()> {
		Ok(())
	}
}

impl<'a> MakeWriter<'a> for Buffer {
	type Writer = Buffer;

	fn make_writer(&'a self) -> Self::Writer {
		self.clone()
	}
}

/// Collects warnings and errors while alive.
///
/// The subscriber is thread-local, so tasks must run on the test's thread
/// (the default current-thread `#[tokio::test]` runtime).
pub(crate) struct LogCapture {
	buffer: Buffer,
	_guard: DefaultGuard,
}

impl LogCapture {
	pub(crate) fn warnings() -> Self {
		let buffer = Buffer::default();
		let subscriber = tracing_subscriber::fmt()
			.with_writer(buffer.clone())
			.with_max_level(Level::WARN)
			.with_ansi(false)
			.without_time()
			.finish();
		Self {
			buffer,
			_guard: tracing::subscriber::set_default(subscriber),
		}
	}

	pub(crate) fn text(&self) -> String {
		String::from_utf8_lossy(&self.buffer.0.lock()).into_owned()
	}

	/// Lines logged under `target`.
	pub(crate) fn lines_for(&self, target: &str) -> Vec<String> {
		let needle = format!(" {target}:");
		self.text().lines().filter(|line| line.contains(&needle)).map(str::to_string).collect()
	}
}
