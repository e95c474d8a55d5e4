//! Named event handlers and the routing table wiring them together.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex},
};

use memedex_domain::{ClassifiedEvent, Command};
use memedex_service::{ListingReply, MemeService, SearchReply};

use crate::{
	BoxFuture, Result,
	router::{Handler, Router, Transport},
};

pub const GREETING: &str =
	"Hi! I am a meme search bot. Send me a text query and I will find the best matching meme for you.";
pub const HELP: &str = "Send me a text query and I will find the best matching meme for you.";
pub const NO_MATCH: &str = "No matching memes found.";
pub const SEARCH_FAILED: &str = "An error occurred while searching. Please try again later.";

pub fn router(service: Arc<MemeService>, transport: Arc<dyn Transport>) -> Router {
	Router::new()
		.register("ingest-photo", 10, Box::new(IngestPhotoHandler { service: service.clone() }))
		.register(
			"ingest-description",
			20,
			Box::new(IngestDescriptionHandler { service: service.clone() }),
		)
		.register("command", 30, Box::new(CommandHandler { transport: transport.clone() }))
		.register(
			"search",
			40,
			Box::new(SearchHandler { service: service.clone(), transport: transport.clone() }),
		)
		.register(
			"paginate",
			50,
			Box::new(PaginateHandler { service, transport, listings: Mutex::new(HashMap::new()) }),
		)
		.register("discard", 100, Box::new(DiscardHandler))
}

struct IngestPhotoHandler {
	service: Arc<MemeService>,
}
impl Handler for IngestPhotoHandler {
	fn accepts(&self, event: &ClassifiedEvent) -> bool {
		matches!(event, ClassifiedEvent::PhotoPosted { .. })
	}

	fn handle<'a>(&'a self, event: &'a ClassifiedEvent) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if let ClassifiedEvent::PhotoPosted { source_id, message_id, file_id } = event {
				self.service.observe_photo(*source_id, *message_id, file_id.clone());
			}

			Ok(())
		})
	}
}

struct IngestDescriptionHandler {
	service: Arc<MemeService>,
}
impl Handler for IngestDescriptionHandler {
	fn accepts(&self, event: &ClassifiedEvent) -> bool {
		matches!(event, ClassifiedEvent::DescriptionCandidate { .. })
	}

	fn handle<'a>(&'a self, event: &'a ClassifiedEvent) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if let ClassifiedEvent::DescriptionCandidate { reply, text } = event {
				self.service.attribute_description(reply, text).await;
			}

			Ok(())
		})
	}
}

struct CommandHandler {
	transport: Arc<dyn Transport>,
}
impl Handler for CommandHandler {
	fn accepts(&self, event: &ClassifiedEvent) -> bool {
		matches!(event, ClassifiedEvent::Command { .. })
	}

	fn handle<'a>(&'a self, event: &'a ClassifiedEvent) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if let ClassifiedEvent::Command { command, requester } = event {
				let text = match command {
					Command::Start => GREETING,
					Command::Help => HELP,
				};

				self.transport.send_text(*requester, text).await?;
			}

			Ok(())
		})
	}
}

struct SearchHandler {
	service: Arc<MemeService>,
	transport: Arc<dyn Transport>,
}
impl Handler for SearchHandler {
	fn accepts(&self, event: &ClassifiedEvent) -> bool {
		matches!(event, ClassifiedEvent::SearchQuery { .. })
	}

	fn handle<'a>(&'a self, event: &'a ClassifiedEvent) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			if let ClassifiedEvent::SearchQuery { text, requester } = event {
				match self.service.search(text).await {
					SearchReply::Hit { file_id, caption, more } =>
						self.transport
							.send_photo(*requester, &file_id, &caption, more.as_deref())
							.await?,
					SearchReply::Empty => {
						self.transport.send_text(*requester, NO_MATCH).await?;
					},
					SearchReply::Failed => {
						self.transport.send_text(*requester, SEARCH_FAILED).await?;
					},
				}
			}

			Ok(())
		})
	}
}

/// Re-runs the search behind a "show more" callback and renders the full
/// listing. The first request for a `(chat, query)` pair sends a new message;
/// repeats edit that message in place instead of flooding the chat.
struct PaginateHandler {
	service: Arc<MemeService>,
	transport: Arc<dyn Transport>,
	listings: Mutex<HashMap<(i64, String), i64>>,
}
impl PaginateHandler {
	fn listing_message(&self, requester: i64, raw_query: &str) -> Option<i64> {
		self.lock().get(&(requester, raw_query.to_string())).copied()
	}

	fn remember_listing(&self, requester: i64, raw_query: &str, message_id: i64) {
		self.lock().insert((requester, raw_query.to_string()), message_id);
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(i64, String), i64>> {
		self.listings.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl Handler for PaginateHandler {
	fn accepts(&self, event: &ClassifiedEvent) -> bool {
		matches!(event, ClassifiedEvent::PaginationRequest { .. })
	}

	fn handle<'a>(&'a self, event: &'a ClassifiedEvent) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let ClassifiedEvent::PaginationRequest { raw_query, requester, interaction_id } =
				event
			else {
				return Ok(());
			};

			if let Err(err) = self.transport.answer_callback(interaction_id).await {
				tracing::warn!(error = %err, "Failed to acknowledge a callback.");
			}

			let listing = match self.service.search_listing(raw_query).await {
				ListingReply::Listing(listing) => listing,
				ListingReply::Empty => {
					self.transport.send_text(*requester, NO_MATCH).await?;

					return Ok(());
				},
				ListingReply::Failed => {
					self.transport.send_text(*requester, SEARCH_FAILED).await?;

					return Ok(());
				},
			};

			match self.listing_message(*requester, raw_query) {
				Some(message_id) => {
					// Unchanged results make this edit a no-op the transport
					// may reject; that is not worth surfacing.
					if let Err(err) =
						self.transport.edit_message_text(*requester, message_id, &listing).await
					{
						tracing::warn!(error = %err, "Failed to edit a listing message.");
					}
				},
				None => {
					let message_id = self.transport.send_text(*requester, &listing).await?;

					self.remember_listing(*requester, raw_query, message_id);
				},
			}

			Ok(())
		})
	}
}

/// Terminal catch-all; everything that reaches it was already classified as
/// not actionable.
struct DiscardHandler;
impl Handler for DiscardHandler {
	fn accepts(&self, _event: &ClassifiedEvent) -> bool {
		true
	}

	fn handle<'a>(&'a self, _event: &'a ClassifiedEvent) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			tracing::trace!("Discarded event.");

			Ok(())
		})
	}
}
