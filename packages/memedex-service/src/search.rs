use memedex_domain::{PAGINATION_MARKER, query};
use memedex_storage::models::RankedMeme;

use crate::MemeService;

/// What the transport should send back for a one-shot search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchReply {
	/// Top-ranked match, plus a pagination payload when more results exist and
	/// the payload fits the transport's callback-data bound.
	Hit { file_id: String, caption: String, more: Option<String> },
	Empty,
	Failed,
}

/// Full ranked listing behind the "show more" affordance.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingReply {
	Listing(String),
	Empty,
	Failed,
}

impl MemeService {
	pub async fn search(&self, raw_query: &str) -> SearchReply {
		let Some(results) = self.ranked_results(raw_query).await else {
			return SearchReply::Failed;
		};
		let Some(top) = results.first() else {
			return SearchReply::Empty;
		};

		SearchReply::Hit {
			file_id: top.file_id.clone(),
			caption: self.caption(top),
			more: if results.len() > 1 { self.pagination_payload(raw_query) } else { None },
		}
	}

	pub async fn search_listing(&self, raw_query: &str) -> ListingReply {
		let Some(results) = self.ranked_results(raw_query).await else {
			return ListingReply::Failed;
		};

		if results.is_empty() {
			return ListingReply::Empty;
		}

		ListingReply::Listing(render_listing(&results))
	}

	async fn ranked_results(&self, raw_query: &str) -> Option<Vec<RankedMeme>> {
		let ts_query = query::normalize_query(raw_query);

		match self.store.search(&ts_query).await {
			Ok(results) => Some(results),
			Err(err) => {
				tracing::error!(error = %err, raw_query, "Search backend call failed.");

				None
			},
		}
	}

	fn caption(&self, result: &RankedMeme) -> String {
		let max_chars = self.search_cfg.caption_max_chars as usize;
		let description = result.description.chars().take(max_chars).collect::<String>();

		format!("Match ({:.3}): {description}", result.relevance)
	}

	fn pagination_payload(&self, raw_query: &str) -> Option<String> {
		let payload = format!("{PAGINATION_MARKER}{raw_query}");

		// Oversized payloads omit the affordance rather than truncating the
		// query, which would paginate a different search than the one shown.
		(payload.len() <= self.search_cfg.max_callback_data_bytes as usize).then_some(payload)
	}
}

fn render_listing(results: &[RankedMeme]) -> String {
	results
		.iter()
		.enumerate()
		.map(|(index, result)| {
			format!("{}. ({:.3}) {}", index + 1, result.relevance, result.description)
		})
		.collect::<Vec<_>>()
		.join("\n")
}
