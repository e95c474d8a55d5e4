use crate::{
	Result,
	db::Db,
	models::{MemeUpsert, RankedMeme},
};

pub async fn upsert_meme(db: &Db, meme: &MemeUpsert) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO memes (
	message_id,
	channel_id,
	file_id,
	description
)
VALUES ($1, $2, $3, $4)
ON CONFLICT (message_id, channel_id) DO UPDATE
SET
	file_id = EXCLUDED.file_id,
	description = EXCLUDED.description,
	updated_at = now()",
	)
	.bind(meme.message_id)
	.bind(meme.channel_id)
	.bind(meme.file_id.as_str())
	.bind(meme.description.as_str())
	.execute(&db.pool)
	.await?;

	Ok(())
}

/// Ranked full-text lookup. `ts_query` must already be in the backend's
/// boolean syntax (see `memedex_domain::query::normalize_query`); an empty or
/// malformed query surfaces as a backend error.
pub async fn search_memes(db: &Db, ts_query: &str) -> Result<Vec<RankedMeme>> {
	let results = sqlx::query_as::<_, RankedMeme>(
		"\
SELECT
	message_id,
	channel_id,
	file_id,
	description,
	ts_rank(search_vec, query) AS relevance
FROM memes, to_tsquery('english', $1) AS query
WHERE search_vec @@ query
ORDER BY relevance DESC",
	)
	.bind(ts_query)
	.fetch_all(&db.pool)
	.await?;

	Ok(results)
}
