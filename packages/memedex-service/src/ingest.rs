use memedex_domain::{PendingPhoto, ReplyTarget};
use memedex_storage::models::MemeUpsert;
use time::OffsetDateTime;

use crate::MemeService;

impl MemeService {
	/// Records a photo as awaiting a description. Re-observing the same
	/// `(source, message)` overwrites the entry.
	pub fn observe_photo(&self, source_id: i64, message_id: i64, file_id: String) {
		self.pending.insert(PendingPhoto {
			message_id,
			source_id,
			file_id,
			observed_at: OffsetDateTime::now_utc(),
		});
	}

	/// Resolves a description to the photo(s) it describes and persists them.
	///
	/// Decision order, first match wins:
	/// 1. A reply target that itself carries a photo is attributed directly,
	///    keyed by the forward origin when the target is a forwarded channel
	///    post and by the target's own ids otherwise.
	/// 2. A pending entry with the same `file_id` is attributed as well, under
	///    its own key. The channel's posting and the group's relay of one image
	///    are separate addressable records sharing one description.
	/// 3. Otherwise the candidate resolves to nothing and is dropped.
	///
	/// Persistence failures are logged and swallowed; the event counts as
	/// handled either way.
	pub async fn attribute_description(&self, reply: &ReplyTarget, description: &str) {
		let file_id = match &reply.file_id {
			Some(file_id) => {
				let (message_id, channel_id) = match reply.forward_origin {
					Some(origin) => (origin.message_id, origin.channel_id),
					None => (reply.message_id, reply.source_id),
				};

				self.persist(&MemeUpsert {
					message_id,
					channel_id,
					file_id: file_id.clone(),
					description: description.to_string(),
				})
				.await;
				self.pending.remove(channel_id, message_id);

				Some(file_id.clone())
			},
			// The transport stripped the photo from the reply target; the
			// pending entry observed for that exact message still knows it.
			None => self.pending.get(reply.source_id, reply.message_id).map(|entry| entry.file_id),
		};
		let Some(file_id) = file_id else {
			tracing::debug!(
				message_id = reply.message_id,
				source_id = reply.source_id,
				"Dropped a description with no resolvable photo."
			);

			return;
		};

		if let Some(entry) = self.pending.find_by_file_id(&file_id) {
			self.persist(&MemeUpsert {
				message_id: entry.message_id,
				channel_id: entry.source_id,
				file_id: entry.file_id,
				description: description.to_string(),
			})
			.await;
			self.pending.remove(entry.source_id, entry.message_id);
		}
	}

	/// Evicts pending photos past their retention window. Returns the count
	/// removed.
	pub fn sweep_pending(&self, now: OffsetDateTime) -> usize {
		let removed = self.pending.sweep_expired(now, self.pending_ttl);

		if removed > 0 {
			tracing::info!(removed, "Swept expired pending photos.");
		}

		removed
	}

	async fn persist(&self, meme: &MemeUpsert) {
		if let Err(err) = self.store.upsert(meme).await {
			tracing::error!(
				error = %err,
				message_id = meme.message_id,
				channel_id = meme.channel_id,
				"Failed to persist a described meme."
			);
		}
	}
}
