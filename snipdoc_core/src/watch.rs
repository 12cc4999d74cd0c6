use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

/// A blocking stream of changed paths.
pub trait ChangeSource {
	/// Wait for the next change. `None` ends the watch loop.
	fn next_change(&mut self) -> Option<PathBuf>;
}

impl<I: Iterator<Item = PathBuf>> ChangeSource for I {
	fn next_change(&mut self) -> Option<PathBuf> {
		self.next()
	}
}

/// Accepts a change only when `min_interval` has passed since the last
/// accepted one.
#[derive(Debug, Clone)]
pub struct WatchGate {
	min_interval: Duration,
	last_accepted: Option<Instant>,
}

impl WatchGate {
	pub fn new(min_interval: Duration) -> Self {
		Self {
			min_interval,
			last_accepted: None,
		}
	}

	/// Decide whether a change seen at `now` triggers a rebuild. The first
	/// change is always accepted.
	pub fn accept(&mut self, now: Instant) -> bool {
		let accepted = self
			.last_accepted
			.is_none_or(|last| now.saturating_duration_since(last) >= self.min_interval);

		if accepted {
			self.last_accepted = Some(now);
		}

		accepted
	}
}

/// Run `rebuild` once for every change `gate` accepts, until `changes` ends.
///
/// Rebuilds run one after another on the calling thread, so a new build never
/// starts while another is running. Returns the number of rebuilds.
pub fn watch<S, R>(changes: &mut S, gate: &mut WatchGate, mut rebuild: R) -> usize
where
	S: ChangeSource + ?Sized,
	R: FnMut(&PathBuf),
{
	let mut rebuilds = 0;

	while let Some(path) = changes.next_change() {
		if !gate.accept(Instant::now()) {
			tracing::trace!(path = %path.display(), "change ignored");
			continue;
		}

		tracing::debug!(path = %path.display(), "change accepted");
		rebuild(&path);
		rebuilds += 1;
	}

	rebuilds
}
