use std::sync::Mutex;

use time::{Duration, OffsetDateTime};

/// A photo observed in the channel or group that has no description yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPhoto {
	pub message_id: i64,
	pub source_id: i64,
	pub file_id: String,
	pub observed_at: OffsetDateTime,
}

/// Keyed store of photos awaiting a description, at most one live entry per
/// `(source_id, message_id)`. A single lock covers every operation so the
/// periodic sweep can interleave with inserts and removals from the dispatch
/// path. Entries keep insertion order; `find_by_file_id` returns the first
/// match in that order.
#[derive(Debug, Default)]
pub struct PendingStore {
	entries: Mutex<Vec<PendingPhoto>>,
}
impl PendingStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or overwrites the entry for the photo's key. An overwrite keeps
	/// the original insertion position.
	pub fn insert(&self, photo: PendingPhoto) {
		let mut entries = self.lock();

		match entries
			.iter_mut()
			.find(|entry| entry.source_id == photo.source_id && entry.message_id == photo.message_id)
		{
			Some(entry) => *entry = photo,
			None => entries.push(photo),
		}
	}

	pub fn get(&self, source_id: i64, message_id: i64) -> Option<PendingPhoto> {
		self.lock()
			.iter()
			.find(|entry| entry.source_id == source_id && entry.message_id == message_id)
			.cloned()
	}

	/// Correlation keys on content identity, not the arriving description's
	/// own message id, hence the linear scan by `file_id`.
	pub fn find_by_file_id(&self, file_id: &str) -> Option<PendingPhoto> {
		self.lock().iter().find(|entry| entry.file_id == file_id).cloned()
	}

	/// Idempotent; removing an absent key is a no-op.
	pub fn remove(&self, source_id: i64, message_id: i64) {
		self.lock()
			.retain(|entry| entry.source_id != source_id || entry.message_id != message_id);
	}

	/// Removes every entry older than `ttl` and returns the count removed.
	pub fn sweep_expired(&self, now: OffsetDateTime, ttl: Duration) -> usize {
		let mut entries = self.lock();
		let before = entries.len();

		entries.retain(|entry| now - entry.observed_at <= ttl);

		before - entries.len()
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PendingPhoto>> {
		self.entries.lock().unwrap_or_else(|err| err.into_inner())
	}
}
