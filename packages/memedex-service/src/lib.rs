//! Correlation and search logic on top of the meme store, independent of any
//! transport.

mod error;
pub use error::{Error, Result};

pub mod ingest;
pub mod search;
pub use search::{ListingReply, SearchReply};

use std::{future::Future, pin::Pin, sync::Arc};

use memedex_config::Config;
use memedex_domain::PendingStore;
use memedex_storage::{
	db::Db,
	models::{MemeUpsert, RankedMeme},
	queries,
};
use time::Duration;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persistence seam of the service. Production uses [`Db`]; tests substitute a
/// recording fake.
pub trait MemeStore
where
	Self: Send + Sync,
{
	fn upsert<'a>(&'a self, meme: &'a MemeUpsert) -> BoxFuture<'a, Result<()>>;

	fn search<'a>(&'a self, ts_query: &'a str) -> BoxFuture<'a, Result<Vec<RankedMeme>>>;
}
impl MemeStore for Db {
	fn upsert<'a>(&'a self, meme: &'a MemeUpsert) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(queries::upsert_meme(self, meme).await?) })
	}

	fn search<'a>(&'a self, ts_query: &'a str) -> BoxFuture<'a, Result<Vec<RankedMeme>>> {
		Box::pin(async move { Ok(queries::search_memes(self, ts_query).await?) })
	}
}

/// Owns the pending-photo store; nothing outside the service mutates it.
pub struct MemeService {
	store: Arc<dyn MemeStore>,
	pending: PendingStore,
	pending_ttl: Duration,
	search_cfg: memedex_config::Search,
}
impl MemeService {
	pub fn new(cfg: &Config, store: Arc<dyn MemeStore>) -> Self {
		Self {
			store,
			pending: PendingStore::new(),
			pending_ttl: Duration::hours(cfg.ingest.pending_ttl_hours),
			search_cfg: cfg.search.clone(),
		}
	}

	pub fn pending_len(&self) -> usize {
		self.pending.len()
	}
}
