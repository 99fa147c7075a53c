use std::any::TypeId;
use std::sync::OnceLock;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use dashmap::DashMap;

/// Frame counts for one interceptor type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
	/// Frames ever created.
	pub total: usize,
	/// Highest number of frames alive at the same time.
	pub max_live: usize,
	pub live: usize,
}

#[derive(Debug)]
struct Stats {
	name: &'static str,
	total: AtomicUsize,
	max_live: AtomicUsize,
	live: AtomicUsize,
}

impl Stats {
	fn new(name: &'static str) -> Self {
		Self {
			name,
			total: AtomicUsize::new(0),
			max_live: AtomicUsize::new(0),
			live: AtomicUsize::new(0),
		}
	}

	fn snapshot(&self) -> FrameStats {
		FrameStats {
			total: self.total.load(Ordering::Relaxed),
			max_live: self.max_live.load(Ordering::Relaxed),
			live: self.live.load(Ordering::Relaxed),
		}
	}
}

static COUNTS: OnceLock<DashMap<TypeId, Stats>> = OnceLock::new();

fn counts() -> &'static DashMap<TypeId, Stats> {
	COUNTS.get_or_init(DashMap::new)
}

/// Counts one live interceptor frame for as long as it exists.
#[derive(Debug)]
pub(crate) struct FrameCount {
	interceptor: TypeId,
}

impl FrameCount {
	pub(crate) fn new(interceptor: TypeId, name: &'static str) -> Self {
		let entry = counts()
			.entry(interceptor)
			.or_insert_with(|| Stats::new(name));

		entry.total.fetch_add(1, Ordering::Relaxed);
		let live = entry.live.fetch_add(1, Ordering::Relaxed) + 1;
		entry.max_live.fetch_max(live, Ordering::Relaxed);

		Self { interceptor }
	}
}

impl Drop for FrameCount {
	fn drop(&mut self) {
		if let Some(entry) = counts().get(&self.interceptor) {
			entry.live.fetch_sub(1, Ordering::Relaxed);
		}
	}
}

/// Frame counts for interceptors of type `X`.
pub fn frames<X: 'static>() -> FrameStats {
	counts()
		.get(&TypeId::of::<X>())
		.map(|entry| entry.snapshot())
		.unwrap_or_default()
}

/// One line per interceptor type, sorted by name: live frames, then the
/// high-water mark and the number of frames ever built.
pub fn report() -> String {
	let mut lines: Vec<String> = counts()
		.iter()
		.map(|entry| {
			let stats = entry.value().snapshot();
			format!(
				"{}: {} live (max {}, built {})",
				entry.value().name,
				stats.live,
				stats.max_live,
				stats.total
			)
		})
		.collect();
	lines.sort();
	lines.join("\n")
}
