use std::sync::{
	Arc, Mutex,
	atomic::{AtomicI64, Ordering},
};

use memedex_bot::{
	BoxFuture, Result, handlers,
	router::{Router, Transport},
};
use memedex_config::Config;
use memedex_domain::{ClassifiedEvent, Command, ReplyTarget};
use memedex_service::{MemeService, MemeStore};
use memedex_storage::models::{MemeUpsert, RankedMeme};

#[derive(Debug, Clone, PartialEq)]
enum Sent {
	Text { chat_id: i64, text: String },
	Photo { chat_id: i64, file_id: String, caption: String, more: Option<String> },
	Edit { chat_id: i64, message_id: i64, text: String },
	Callback { id: String },
}

#[derive(Default)]
struct RecordingTransport {
	sent: Mutex<Vec<Sent>>,
	next_message_id: AtomicI64,
}
impl RecordingTransport {
	fn new() -> Arc<Self> {
		Arc::new(Self { sent: Mutex::new(Vec::new()), next_message_id: AtomicI64::new(100) })
	}

	fn record(&self, sent: Sent) {
		self.sent.lock().unwrap().push(sent);
	}

	fn sent(&self) -> Vec<Sent> {
		self.sent.lock().unwrap().clone()
	}
}
impl Transport for RecordingTransport {
	fn send_text<'a>(&'a self, chat_id: i64, text: &'a str) -> BoxFuture<'a, Result<i64>> {
		Box::pin(async move {
			self.record(Sent::Text { chat_id, text: text.to_string() });

			Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
		})
	}

	fn send_photo<'a>(
		&'a self,
		chat_id: i64,
		file_id: &'a str,
		caption: &'a str,
		more: Option<&'a str>,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.record(Sent::Photo {
				chat_id,
				file_id: file_id.to_string(),
				caption: caption.to_string(),
				more: more.map(str::to_string),
			});

			Ok(())
		})
	}

	fn edit_message_text<'a>(
		&'a self,
		chat_id: i64,
		message_id: i64,
		text: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.record(Sent::Edit { chat_id, message_id, text: text.to_string() });

			Ok(())
		})
	}

	fn answer_callback<'a>(&'a self, callback_id: &'a str) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.record(Sent::Callback { id: callback_id.to_string() });

			Ok(())
		})
	}
}

#[derive(Default)]
struct CannedStore {
	upserts: Mutex<Vec<MemeUpsert>>,
	results: Vec<RankedMeme>,
	fail: bool,
}
impl CannedStore {
	fn recorded(&self) -> Vec<MemeUpsert> {
		self.upserts.lock().unwrap().clone()
	}
}
impl MemeStore for CannedStore {
	fn upsert<'a>(
		&'a self,
		meme: &'a MemeUpsert,
	) -> BoxFuture<'a, memedex_service::Result<()>> {
		Box::pin(async move {
			self.upserts.lock().unwrap().push(meme.clone());

			Ok(())
		})
	}

	fn search<'a>(
		&'a self,
		_ts_query: &'a str,
	) -> BoxFuture<'a, memedex_service::Result<Vec<RankedMeme>>> {
		Box::pin(async move {
			if self.fail {
				return Err(memedex_storage::Error::from(sqlx::Error::PoolClosed).into());
			}

			Ok(self.results.clone())
		})
	}
}

fn config() -> Config {
	toml::from_str(
		r#"
		[service]
		log_level = "info"

		[telegram]
		bot_token = "test-token"

		[routing]
		channel         = "memes_channel"
		group           = "memes_group"
		description_bot = "describer_bot"

		[storage.postgres]
		dsn            = "postgres://localhost/memedex"
		pool_max_conns = 1
		"#,
	)
	.expect("Failed to build config.")
}

fn fixture(store: CannedStore) -> (Arc<CannedStore>, Arc<RecordingTransport>, Router) {
	let store = Arc::new(store);
	let transport = RecordingTransport::new();
	let service = Arc::new(MemeService::new(&config(), store.clone()));
	let router = handlers::router(service, transport.clone());

	(store, transport, router)
}

fn ranked(file_id: &str, description: &str, relevance: f32) -> RankedMeme {
	RankedMeme {
		message_id: 1,
		channel_id: -100,
		file_id: file_id.to_string(),
		description: description.to_string(),
		relevance,
	}
}

#[tokio::test]
async fn commands_reply_with_greeting_and_help() {
	let (_, transport, router) = fixture(CannedStore::default());

	router
		.dispatch(&ClassifiedEvent::Command { command: Command::Start, requester: 7 })
		.await
		.expect("Dispatch failed.");
	router
		.dispatch(&ClassifiedEvent::Command { command: Command::Help, requester: 7 })
		.await
		.expect("Dispatch failed.");

	assert_eq!(transport.sent(), [
		Sent::Text { chat_id: 7, text: handlers::GREETING.to_string() },
		Sent::Text { chat_id: 7, text: handlers::HELP.to_string() },
	]);
}

#[tokio::test]
async fn photo_and_description_events_persist_a_meme() {
	let (store, transport, router) = fixture(CannedStore::default());

	router
		.dispatch(&ClassifiedEvent::PhotoPosted {
			source_id: -100,
			message_id: 5,
			file_id: "F".to_string(),
		})
		.await
		.expect("Dispatch failed.");
	router
		.dispatch(&ClassifiedEvent::DescriptionCandidate {
			reply: ReplyTarget {
				message_id: 5,
				source_id: -100,
				file_id: Some("F".to_string()),
				forward_origin: None,
			},
			text: "a funny cat".to_string(),
		})
		.await
		.expect("Dispatch failed.");

	let recorded = store.recorded();

	assert_eq!(recorded.len(), 1);
	assert_eq!(recorded[0].description, "a funny cat");
	// Ingestion is silent.
	assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn search_hit_sends_the_top_photo_with_a_more_button() {
	let (_, transport, router) = fixture(CannedStore {
		results: vec![ranked("file-a", "funny cat", 0.9), ranked("file-b", "funny dog", 0.5)],
		..CannedStore::default()
	});

	router
		.dispatch(&ClassifiedEvent::SearchQuery { text: "funny".to_string(), requester: 7 })
		.await
		.expect("Dispatch failed.");

	assert_eq!(transport.sent(), [Sent::Photo {
		chat_id: 7,
		file_id: "file-a".to_string(),
		caption: "Match (0.900): funny cat".to_string(),
		more: Some("more:funny".to_string()),
	}]);
}

#[tokio::test]
async fn empty_and_failed_searches_send_plain_text() {
	let (_, transport, router) = fixture(CannedStore::default());

	router
		.dispatch(&ClassifiedEvent::SearchQuery { text: "nothing".to_string(), requester: 7 })
		.await
		.expect("Dispatch failed.");

	assert_eq!(transport.sent(), [Sent::Text {
		chat_id: 7,
		text: handlers::NO_MATCH.to_string(),
	}]);

	let (_, transport, router) = fixture(CannedStore { fail: true, ..CannedStore::default() });

	router
		.dispatch(&ClassifiedEvent::SearchQuery { text: "anything".to_string(), requester: 7 })
		.await
		.expect("Dispatch failed.");

	assert_eq!(transport.sent(), [Sent::Text {
		chat_id: 7,
		text: handlers::SEARCH_FAILED.to_string(),
	}]);
}

#[tokio::test]
async fn repeated_pagination_edits_the_listing_in_place() {
	let (_, transport, router) = fixture(CannedStore {
		results: vec![ranked("file-a", "funny cat", 0.9), ranked("file-b", "funny dog", 0.5)],
		..CannedStore::default()
	});
	let request = ClassifiedEvent::PaginationRequest {
		raw_query: "funny".to_string(),
		requester: 7,
		interaction_id: "cb-1".to_string(),
	};

	router.dispatch(&request).await.expect("Dispatch failed.");
	router.dispatch(&request).await.expect("Dispatch failed.");

	let listing = "1. (0.900) funny cat\n2. (0.500) funny dog".to_string();

	assert_eq!(transport.sent(), [
		Sent::Callback { id: "cb-1".to_string() },
		Sent::Text { chat_id: 7, text: listing.clone() },
		Sent::Callback { id: "cb-1".to_string() },
		Sent::Edit { chat_id: 7, message_id: 100, text: listing },
	]);
}

#[tokio::test]
async fn ignored_events_produce_no_outbound_traffic() {
	let (store, transport, router) = fixture(CannedStore::default());

	router.dispatch(&ClassifiedEvent::Ignored).await.expect("Dispatch failed.");

	assert!(transport.sent().is_empty());
	assert!(store.recorded().is_empty());
}
