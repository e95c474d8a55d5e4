use time::OffsetDateTime;

/// Key and payload of an idempotent meme write. Unique per
/// `(message_id, channel_id)`; the second write to a key overwrites `file_id`
/// and `description`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemeUpsert {
	pub message_id: i64,
	pub channel_id: i64,
	pub file_id: String,
	pub description: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MemeRecord {
	pub message_id: i64,
	pub channel_id: i64,
	pub file_id: String,
	pub description: String,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RankedMeme {
	pub message_id: i64,
	pub channel_id: i64,
	pub file_id: String,
	pub description: String,
	pub relevance: f32,
}
